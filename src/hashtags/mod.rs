//! Hashtag domain types shared by the parsers, the acquisition chain and the cache.

pub mod catalog;
pub mod filter;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use filter::{is_likely_noise, is_noise_for};

/// Maximum number of tags kept in any result.
pub const MAX_TAGS: usize = 10;

/// Minimum number of usable tags for a source to count as a hit.
pub const MIN_SOURCE_TAGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    X,
    Instagram,
    LinkedIn,
    TikTok,
}

impl Platform {
    pub const ALL: [Self; 4] = [Self::X, Self::Instagram, Self::LinkedIn, Self::TikTok];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Instagram => "instagram",
            Self::LinkedIn => "linkedin",
            Self::TikTok => "tiktok",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::X => "X (Twitter)",
            Self::Instagram => "Instagram",
            Self::LinkedIn => "LinkedIn",
            Self::TikTok => "TikTok",
        }
    }

    /// Comma separated list of the accepted identifiers, for error messages.
    #[must_use]
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Platform {
    /// Exact match on the wire identifier (`x`, `instagram`, `linkedin`,
    /// `tiktok`). The `FromStr` impl is the lenient form used by the CLI.
    #[must_use]
    pub fn from_identifier(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == id)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown platform '{0}'. Valid platforms: x, instagram, linkedin, tiktok")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "x" | "twitter" => Ok(Self::X),
            "instagram" => Ok(Self::Instagram),
            "linkedin" => Ok(Self::LinkedIn),
            "tiktok" => Ok(Self::TikTok),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

/// Where a set of tags came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOrigin {
    /// Scraped from a live trend or listing site.
    Live { source: String },
    /// Shuffled static popular list.
    Static,
    /// Produced by the LLM (possibly padded from the fallback list).
    Generated,
    /// LLM unavailable; fallback list returned verbatim.
    Fallback,
}

impl TagOrigin {
    #[must_use]
    pub const fn is_estimated(&self) -> bool {
        !matches!(self, Self::Live { .. })
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Live { source } => source,
            Self::Static => "static",
            Self::Generated => "generated",
            Self::Fallback => "fallback",
        }
    }
}

/// Tags produced by one run of the acquisition chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashtagSet {
    pub platform: Platform,
    pub tags: Vec<String>,
    pub origin: TagOrigin,
}

impl HashtagSet {
    #[must_use]
    pub fn live(platform: Platform, source: &str, tags: Vec<String>) -> Self {
        Self {
            platform,
            tags,
            origin: TagOrigin::Live {
                source: source.to_string(),
            },
        }
    }

    #[must_use]
    pub const fn is_estimated(&self) -> bool {
        self.origin.is_estimated()
    }
}

/// Strips leading `#` markers and surrounding whitespace, lowercases.
#[must_use]
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().trim_start_matches('#').trim().to_lowercase()
}

/// Normalizes, drops noise and duplicates, keeps first-appearance order,
/// truncates to [`MAX_TAGS`].
#[must_use]
pub fn clean_candidates<I, S>(platform: Platform, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|c| normalize_tag(c.as_ref()))
        .filter(|tag| !is_noise_for(platform, tag))
        .filter(|tag| seen.insert(tag.clone()))
        .take(MAX_TAGS)
        .collect()
}
