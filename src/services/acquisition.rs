use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::generator::HashtagGenerator;
use super::sources::{HashtagSource, default_sources};
use crate::clients::fetcher::{PageFetcher, SourceError};
use crate::config::HashtagConfig;
use crate::hashtags::catalog::popular_tags;
use crate::hashtags::{HashtagSet, MAX_TAGS, Platform, TagOrigin};

/// Ordered live sources for one platform. The first source that yields a
/// usable set wins.
#[derive(Clone, Default)]
pub struct SourceChain {
    sources: Vec<Arc<dyn HashtagSource>>,
}

impl SourceChain {
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn HashtagSource>>) -> Self {
        Self { sources }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Tries each source in order. On total failure returns every error seen.
    pub async fn run(&self, platform: Platform) -> Result<HashtagSet, Vec<SourceError>> {
        let mut failures = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            match source.attempt(platform).await {
                Ok(set) => {
                    info!(platform = %platform, source = source.name(), tags = set.tags.len(), "Live hashtags acquired");
                    metrics::counter!("hashtag_source_total", "source" => source.name().to_string(), "outcome" => "hit")
                        .increment(1);
                    return Ok(set);
                }
                Err(e) => {
                    debug!(platform = %platform, error = %e, "Hashtag source failed");
                    let outcome = if e.is_unavailable() {
                        "unavailable"
                    } else {
                        "insufficient"
                    };
                    metrics::counter!("hashtag_source_total", "source" => source.name().to_string(), "outcome" => outcome)
                        .increment(1);
                    failures.push(e);
                }
            }
        }

        Err(failures)
    }
}

/// Shuffled static list for `platform`, or `None` when it has no static stage.
#[must_use]
pub fn static_fallback(platform: Platform) -> Option<HashtagSet> {
    let popular = popular_tags(platform)?;
    let mut tags: Vec<String> = popular.iter().map(|t| (*t).to_string()).collect();
    // Unseeded: output order is meant to vary between calls.
    tags.shuffle(&mut rand::rng());
    tags.truncate(MAX_TAGS);

    Some(HashtagSet {
        platform,
        tags,
        origin: TagOrigin::Static,
    })
}

/// Runs a platform's full acquisition pipeline: live sources, the static
/// stage and escalation to the generator.
pub struct HashtagAcquirer {
    chains: HashMap<Platform, SourceChain>,
    generator: HashtagGenerator,
    escalate_static: bool,
}

impl HashtagAcquirer {
    #[must_use]
    pub fn new(
        chains: HashMap<Platform, SourceChain>,
        generator: HashtagGenerator,
        escalate_static: bool,
    ) -> Self {
        Self {
            chains,
            generator,
            escalate_static,
        }
    }

    /// Builds the default site chains for every platform.
    #[must_use]
    pub fn with_default_sources(
        config: &HashtagConfig,
        fetcher: &Arc<dyn PageFetcher>,
        generator: HashtagGenerator,
    ) -> Self {
        let chains = Platform::ALL
            .into_iter()
            .map(|p| (p, SourceChain::new(default_sources(p, config, fetcher))))
            .collect();
        Self::new(chains, generator, config.escalate_static_to_ai)
    }

    pub async fn acquire(&self, platform: Platform) -> HashtagSet {
        let chain_result = match self.chains.get(&platform) {
            Some(chain) => chain.run(platform).await,
            None => Err(Vec::new()),
        };

        let failures = match chain_result {
            Ok(set) => return set,
            Err(failures) => failures,
        };

        warn!(
            platform = %platform,
            failed_sources = failures.len(),
            "All live hashtag sources failed"
        );

        let Some(static_set) = static_fallback(platform) else {
            return self.generator.generate(platform).await;
        };

        if self.escalate_static && static_set.is_estimated() {
            debug!(platform = %platform, "Escalating static hashtag list to generator");
            return self.generator.generate(platform).await;
        }

        static_set
    }
}
