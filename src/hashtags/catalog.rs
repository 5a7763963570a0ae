//! Static tag lists used when live sources and the LLM are unavailable.
//!
//! Every entry must pass [`super::is_noise_for`] for its platform; the
//! generator pads with these lists without re-filtering.

use super::Platform;

/// Broad "evergreen" tags, shuffled when every listing site fails.
/// X has no static stage: a Trends24 failure goes straight to generation.
#[must_use]
pub const fn popular_tags(platform: Platform) -> Option<&'static [&'static str]> {
    match platform {
        Platform::X => None,
        Platform::Instagram => Some(&[
            "love",
            "instagood",
            "photooftheday",
            "fashion",
            "beautiful",
            "art",
            "photography",
            "nature",
            "reels",
            "travel",
            "style",
            "food",
            "fitness",
            "motivation",
            "lifestyle",
            "ootd",
            "viral",
            "explore",
            "aesthetic",
            "vibe",
            "mood",
            "inspiration",
        ]),
        Platform::TikTok => Some(&[
            "viral",
            "comedy",
            "dance",
            "music",
            "funny",
            "love",
            "fashion",
            "beauty",
            "food",
            "travel",
            "fitness",
            "motivation",
            "life",
            "art",
            "pov",
            "explore",
            "challenge",
            "aesthetic",
            "vibe",
            "mood",
        ]),
        Platform::LinkedIn => Some(&[
            "leadership",
            "innovation",
            "career",
            "entrepreneurship",
            "technology",
            "marketing",
            "networking",
            "success",
            "motivation",
            "productivity",
            "startup",
            "management",
            "sales",
            "hr",
            "finance",
            "strategy",
            "growth",
            "digital",
        ]),
    }
}

/// Fixed list returned (or used as padding) when generation falls short.
#[must_use]
pub const fn fallback_tags(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::X => &[
            "news",
            "viral",
            "breaking",
            "update",
            "world",
            "politics",
            "tech",
            "sports",
            "entertainment",
            "economy",
        ],
        Platform::Instagram => &[
            "instagood",
            "photooftheday",
            "lifestyle",
            "love",
            "fashion",
            "beautiful",
            "art",
            "photography",
            "nature",
            "travel",
        ],
        Platform::LinkedIn => &[
            "leadership",
            "innovation",
            "career",
            "entrepreneurship",
            "technology",
            "marketing",
            "networking",
            "success",
            "management",
            "productivity",
        ],
        Platform::TikTok => &[
            "viral",
            "comedy",
            "dance",
            "music",
            "funny",
            "love",
            "fashion",
            "challenge",
            "pov",
            "duet",
        ],
    }
}

/// Owned copy of the fallback list, at most [`super::MAX_TAGS`] long.
#[must_use]
pub fn fallback_list(platform: Platform) -> Vec<String> {
    fallback_tags(platform)
        .iter()
        .take(super::MAX_TAGS)
        .map(|t| (*t).to_string())
        .collect()
}
