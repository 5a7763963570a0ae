//! Noise detection for scraped hashtag candidates.
//!
//! Trend pages are full of tokens that look like hashtags but are not:
//! CSS colour codes (`#03a9f4`), HTML entity numbers (`&#39;`), anchors,
//! and navigation words such as "trending".

use super::Platform;

const MIN_TAG_LEN: usize = 2;
const MAX_TAG_LEN: usize = 50;

/// Site chrome words rejected on every platform.
const COMMON_DENYLIST: &[&str] = &["trend", "trending", "hashtag", "hashtags", "popular", "best"];

const fn platform_denylist(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::X => &["x", "twitter"],
        Platform::Instagram => &["instagram", "insta"],
        Platform::LinkedIn => &["linkedin", "linked", "business", "professional"],
        Platform::TikTok => &["tiktok", "tik", "fyp", "foryou"],
    }
}

/// Looks like a CSS hex colour: 3 to 6 characters, all hex digits (so no
/// letter from `g` to `z`).
fn is_hex_color(token: &str) -> bool {
    (3..=6).contains(&token.len()) && token.chars().all(|c| c.is_ascii_hexdigit())
}

fn structural_noise(token: &str) -> bool {
    let len = token.chars().count();
    if !(MIN_TAG_LEN..MAX_TAG_LEN).contains(&len) {
        return true;
    }

    if token.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    if is_hex_color(token) {
        return true;
    }

    !token.chars().any(char::is_alphabetic)
}

fn denylisted(list: &[&str], token: &str) -> bool {
    list.iter().any(|w| w.eq_ignore_ascii_case(token))
}

/// Platform-independent noise check: structure plus the common denylist and
/// every platform's own name.
#[must_use]
pub fn is_likely_noise(token: &str) -> bool {
    structural_noise(token)
        || denylisted(COMMON_DENYLIST, token)
        || Platform::ALL
            .iter()
            .any(|p| p.as_str().eq_ignore_ascii_case(token))
}

/// Noise check including the platform-specific denylist (e.g. `fyp` on TikTok).
#[must_use]
pub fn is_noise_for(platform: Platform, token: &str) -> bool {
    is_likely_noise(token) || denylisted(platform_denylist(platform), token)
}
