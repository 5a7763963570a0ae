use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::openai::{ChatMessage, CompletionRequest, LlmClient};
use crate::config::LlmConfig;
use crate::hashtags::catalog::{fallback_list, fallback_tags};
use crate::hashtags::{HashtagSet, MAX_TAGS, Platform, TagOrigin, clean_candidates};

const OUTPUT_FORMAT: &str = "#hashtag1 #hashtag2 #hashtag3 ... #hashtag10";

const fn domain_hints(platform: Platform) -> &'static str {
    match platform {
        Platform::X => "current events, technology, entertainment, sports and politics",
        Platform::Instagram => "fashion, beauty, travel, food, fitness and lifestyle",
        Platform::LinkedIn => {
            "business, careers, technology, leadership, entrepreneurship and professional development"
        }
        Platform::TikTok => "entertainment, dance, comedy, life hacks and viral challenges",
    }
}

/// System prompt for the trend-analyst persona of `platform`.
#[must_use]
pub fn system_prompt(platform: Platform) -> String {
    format!(
        "You are a {name} trend analysis expert. Estimate the 10 most popular hashtags on {name} right now. \
         Consider trending hashtags in categories such as {hints}. \
         Reply with the hashtags only, as a list, without explanations. Format: {OUTPUT_FORMAT}",
        name = platform.display_name(),
        hints = domain_hints(platform),
    )
}

#[must_use]
pub fn user_prompt(platform: Platform) -> String {
    format!(
        "List the 10 most popular hashtags on {} right now. Only give the hashtags, each with its # sign.",
        platform.display_name()
    )
}

/// `#tag` tokens from a free-text reply, cleaned and deduplicated.
#[must_use]
pub fn parse_generated_tags(platform: Platform, reply: &str) -> Vec<String> {
    let tokens = reply
        .split_whitespace()
        .filter(|token| token.starts_with('#'))
        .map(|token| {
            token
                .trim_start_matches('#')
                .trim_end_matches(|c: char| !c.is_alphanumeric() && c != '_')
        })
        .filter(|token| !token.is_empty());

    clean_candidates(platform, tokens)
}

/// Pads `tags` from the platform's fallback list up to [`MAX_TAGS`].
fn pad_from_fallback(platform: Platform, mut tags: Vec<String>) -> Vec<String> {
    for fallback in fallback_tags(platform) {
        if tags.len() >= MAX_TAGS {
            break;
        }
        if !tags.iter().any(|t| t == fallback) {
            tags.push((*fallback).to_string());
        }
    }
    tags
}

/// Produces estimated hashtag lists from the LLM when live sources fail.
pub struct HashtagGenerator {
    llm: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl HashtagGenerator {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmClient>, config: &LlmConfig) -> Self {
        Self {
            llm,
            model: config.hashtag_model.clone(),
            temperature: config.hashtag_temperature,
            max_tokens: config.hashtag_max_tokens,
        }
    }

    #[must_use]
    pub fn request_for(&self, platform: Platform) -> CompletionRequest {
        CompletionRequest {
            model: Some(self.model.clone()),
            messages: vec![
                ChatMessage::system(system_prompt(platform)),
                ChatMessage::user(user_prompt(platform)),
            ],
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
        }
    }

    /// Never fails; LLM errors degrade to the fallback list.
    pub async fn generate(&self, platform: Platform) -> HashtagSet {
        let request = self.request_for(platform);

        match self.llm.complete(&request).await {
            Ok(reply) => {
                let parsed = parse_generated_tags(platform, &reply);
                debug!(platform = %platform, parsed = parsed.len(), "Generated hashtags");
                metrics::counter!("hashtag_generator_total", "outcome" => "generated")
                    .increment(1);
                HashtagSet {
                    platform,
                    tags: pad_from_fallback(platform, parsed),
                    origin: TagOrigin::Generated,
                }
            }
            Err(e) => {
                warn!(platform = %platform, error = %e, "Hashtag generation failed, using fallback list");
                metrics::counter!("hashtag_generator_total", "outcome" => "fallback")
                    .increment(1);
                HashtagSet {
                    platform,
                    tags: fallback_list(platform),
                    origin: TagOrigin::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedLlm {
        reply: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            self.reply.clone().ok_or_else(|| anyhow!("rate limited"))
        }
    }

    fn generator(reply: Option<&str>) -> (HashtagGenerator, Arc<ScriptedLlm>) {
        let llm = Arc::new(ScriptedLlm {
            reply: reply.map(str::to_string),
            requests: Mutex::new(Vec::new()),
        });
        let generator = HashtagGenerator::new(llm.clone(), &LlmConfig::default());
        (generator, llm)
    }

    #[test]
    fn test_parse_strips_markers_and_punctuation() {
        let reply = "1. #Deprem, #Galatasaray! #deprem not-a-tag #123 #\n#Şehir";
        let tags = parse_generated_tags(Platform::X, reply);
        assert_eq!(tags, vec!["deprem", "galatasaray", "şehir"]);
    }

    #[test]
    fn test_prompts_are_platform_specific() {
        assert!(system_prompt(Platform::X).contains("X (Twitter)"));
        assert!(system_prompt(Platform::LinkedIn).contains("leadership"));
        assert!(system_prompt(Platform::TikTok).contains(OUTPUT_FORMAT));
        assert!(user_prompt(Platform::Instagram).contains("Instagram"));
    }

    #[tokio::test]
    async fn test_short_reply_is_padded() {
        let (generator, llm) = generator(Some("#Sunset #Coffee #Sunset"));
        let set = generator.generate(Platform::Instagram).await;

        assert_eq!(set.tags.len(), MAX_TAGS);
        assert_eq!(&set.tags[..2], ["sunset", "coffee"]);
        assert_eq!(set.origin, TagOrigin::Generated);
        assert!(set.is_estimated());

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests[0].model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(requests[0].max_tokens, Some(200));
    }

    #[tokio::test]
    async fn test_llm_failure_returns_fallback_verbatim() {
        let (generator, _) = generator(None);
        let set = generator.generate(Platform::TikTok).await;
        assert_eq!(set.tags, fallback_list(Platform::TikTok));
        assert_eq!(set.origin, TagOrigin::Fallback);
    }
}
