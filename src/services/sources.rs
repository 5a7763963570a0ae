use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::clients::fetcher::{FetchRequest, PageFetcher, SourceError};
use crate::config::HashtagConfig;
use crate::hashtags::{HashtagSet, MIN_SOURCE_TAGS, Platform, clean_candidates};
use crate::parser::{
    EmbeddedJsonParser, HashtagPatternParser, JsonKeyParser, SourceParser, TrendBlockParser,
};

const TRENDS24_BASE: &str = "https://trends24.in";
const TRENDS24_REFERER: &str = "https://trends24.in/";
const SEARCH_REFERER: &str = "https://www.google.com/";
const LISTING_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// One link in a platform's source chain.
#[async_trait]
pub trait HashtagSource: Send + Sync {
    fn name(&self) -> &str;

    async fn attempt(&self, platform: Platform) -> Result<HashtagSet, SourceError>;
}

/// A single external page, fetched once and handed to each parser in turn
/// until one of them yields enough usable tags.
pub struct SiteSource {
    request: FetchRequest,
    parsers: Vec<Box<dyn SourceParser>>,
    fetcher: Arc<dyn PageFetcher>,
}

impl SiteSource {
    #[must_use]
    pub fn new(
        request: FetchRequest,
        parsers: Vec<Box<dyn SourceParser>>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            request,
            parsers,
            fetcher,
        }
    }
}

#[async_trait]
impl HashtagSource for SiteSource {
    fn name(&self) -> &str {
        &self.request.source_name
    }

    async fn attempt(&self, platform: Platform) -> Result<HashtagSet, SourceError> {
        let body = self.fetcher.fetch(&self.request).await?;

        let mut best = 0;
        for parser in &self.parsers {
            let tags = clean_candidates(platform, parser.parse(&body));
            debug!(
                source = %self.request.source_name,
                parser = parser.name(),
                found = tags.len(),
                "Parsed trend source"
            );

            if tags.len() >= MIN_SOURCE_TAGS {
                return Ok(HashtagSet::live(platform, &self.request.source_name, tags));
            }
            best = best.max(tags.len());
        }

        Err(SourceError::InsufficientYield {
            source_name: self.request.source_name.clone(),
            found: best,
        })
    }
}

fn listing(
    name: &str,
    url: &str,
    config: &HashtagConfig,
    parser: Box<dyn SourceParser>,
    fetcher: &Arc<dyn PageFetcher>,
) -> Arc<dyn HashtagSource> {
    let request = FetchRequest {
        source_name: name.to_string(),
        url: url.to_string(),
        accept_language: LISTING_ACCEPT_LANGUAGE.to_string(),
        referer: SEARCH_REFERER.to_string(),
        timeout: config.listing_timeout(),
    };
    Arc::new(SiteSource::new(request, vec![parser], Arc::clone(fetcher)))
}

/// The live sources for `platform`, in the order they should be tried.
#[must_use]
pub fn default_sources(
    platform: Platform,
    config: &HashtagConfig,
    fetcher: &Arc<dyn PageFetcher>,
) -> Vec<Arc<dyn HashtagSource>> {
    match platform {
        Platform::X => {
            let request = FetchRequest {
                source_name: "trends24".to_string(),
                url: format!("{TRENDS24_BASE}/{}/", config.x_region.trim_matches('/')),
                accept_language: config.x_accept_language.clone(),
                referer: TRENDS24_REFERER.to_string(),
                timeout: config.trends_timeout(),
            };
            let parsers: Vec<Box<dyn SourceParser>> = vec![
                Box::new(TrendBlockParser),
                Box::new(HashtagPatternParser),
                Box::new(EmbeddedJsonParser),
            ];
            vec![Arc::new(SiteSource::new(
                request,
                parsers,
                Arc::clone(fetcher),
            ))]
        }
        Platform::Instagram => vec![
            listing(
                "best-hashtags",
                "https://best-hashtags.com/hashtag/instagram/",
                config,
                Box::new(HashtagPatternParser),
                fetcher,
            ),
            listing(
                "displaypurposes",
                "https://displaypurposes.com/ranking/trending",
                config,
                Box::new(JsonKeyParser::new("hashtag")),
                fetcher,
            ),
            listing(
                "inflact",
                "https://inflact.com/tools/instagram-hashtags-generator/",
                config,
                Box::new(HashtagPatternParser),
                fetcher,
            ),
        ],
        Platform::TikTok => vec![
            listing(
                "best-hashtags",
                "https://best-hashtags.com/hashtag/tiktok/",
                config,
                Box::new(HashtagPatternParser),
                fetcher,
            ),
            listing(
                "ranktracker",
                "https://www.ranktracker.com/tr/tiktok-hashtag-generator/",
                config,
                Box::new(HashtagPatternParser),
                fetcher,
            ),
            listing(
                "tiktokhashtags",
                "https://tiktokhashtags.com/",
                config,
                Box::new(HashtagPatternParser),
                fetcher,
            ),
        ],
        Platform::LinkedIn => vec![
            listing(
                "best-hashtags",
                "https://best-hashtags.com/hashtag/linkedin/",
                config,
                Box::new(HashtagPatternParser),
                fetcher,
            ),
            listing(
                "linkedin",
                "https://www.linkedin.com/feed/hashtag/",
                config,
                Box::new(HashtagPatternParser),
                fetcher,
            ),
            listing(
                "socialmediaexaminer",
                "https://www.socialmediaexaminer.com/linkedin-hashtags/",
                config,
                Box::new(HashtagPatternParser),
                fetcher,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedFetcher {
        body: Result<String, u16>,
        seen: Mutex<Vec<FetchRequest>>,
    }

    impl CannedFetcher {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn status(code: u16) -> Arc<Self> {
            Arc::new(Self {
                body: Err(code),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PageFetcher for CannedFetcher {
        async fn fetch(&self, request: &FetchRequest) -> Result<String, SourceError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.body {
                Ok(body) => Ok(body.clone()),
                Err(status) => Err(SourceError::Status {
                    source_name: request.source_name.clone(),
                    status: *status,
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_x_falls_through_parsers_on_same_body() {
        // No trend-item blocks, so the pattern scan has to pick these up.
        let page = "<p>#Deprem #Galatasaray #Ankara #ffffff #2024</p>";
        let canned = CannedFetcher::ok(page);
        let fetcher: Arc<dyn PageFetcher> = canned.clone();
        let sources = default_sources(Platform::X, &HashtagConfig::default(), &fetcher);
        assert_eq!(sources.len(), 1);

        let set = sources[0].attempt(Platform::X).await.unwrap();
        assert_eq!(set.tags, vec!["deprem", "galatasaray", "ankara"]);
        assert!(!set.is_estimated());

        let seen = canned.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://trends24.in/turkey/");
        assert_eq!(seen[0].referer, "https://trends24.in/");
    }

    #[tokio::test]
    async fn test_short_yield_is_reported() {
        let fetcher: Arc<dyn PageFetcher> = CannedFetcher::ok("#travel #instagram #123");
        let sources = default_sources(Platform::Instagram, &HashtagConfig::default(), &fetcher);
        let err = sources[0].attempt(Platform::Instagram).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::InsufficientYield { found: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_http_failure_propagates_as_source_error() {
        let fetcher: Arc<dyn PageFetcher> = CannedFetcher::status(403);
        let sources = default_sources(Platform::TikTok, &HashtagConfig::default(), &fetcher);
        assert_eq!(sources.len(), 3);
        let err = sources[1].attempt(Platform::TikTok).await.unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(sources[1].name(), "ranktracker");
    }

    #[tokio::test]
    async fn test_listing_requests_use_listing_timeout() {
        let config = HashtagConfig {
            listing_timeout_seconds: 3,
            ..HashtagConfig::default()
        };
        let canned = CannedFetcher::ok("");
        let fetcher: Arc<dyn PageFetcher> = canned.clone();
        let sources = default_sources(Platform::LinkedIn, &config, &fetcher);
        let _ = sources[2].attempt(Platform::LinkedIn).await;

        let seen = canned.seen.lock().unwrap();
        assert_eq!(seen[0].timeout, std::time::Duration::from_secs(3));
        assert_eq!(seen[0].accept_language, "en-US,en;q=0.9");
        assert_eq!(seen[0].source_name, "socialmediaexaminer");
    }
}
