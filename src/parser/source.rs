//! Extraction of hashtag candidates from raw trend and listing pages.
//!
//! Parsers never fail: markup changes on the remote sites are expected, so a
//! page that does not match simply yields no candidates and the caller moves
//! on to the next strategy or source.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Turns a raw response body into candidate tokens, in order of appearance.
/// Output may contain duplicates and noise; cleaning happens downstream.
pub trait SourceParser: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse(&self, body: &str) -> Vec<String>;
}

struct PageRegex {
    trend_block: Regex,
    hashtag: Regex,
    json_script: Regex,
}

impl PageRegex {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<PageRegex>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    trend_block: Regex::new(
                        r#"(?is)<div[^>]*class="[^"]*trend-item[^"]*"[^>]*>.*?<a[^>]*href="[^"]*"[^>]*>([^<]+)</a>"#,
                    )
                    .ok()?,
                    hashtag: Regex::new(r"#(\w+)").ok()?,
                    json_script: Regex::new(
                        r#"(?is)<script[^>]*type="application/json"[^>]*>(.*?)</script>"#,
                    )
                    .ok()?,
                })
            })
            .as_ref()
    }
}

fn strip_marker(text: &str) -> String {
    text.trim().trim_start_matches('#').trim().to_string()
}

/// Link text inside repeated `trend-item` blocks (Trends24 layout).
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendBlockParser;

impl SourceParser for TrendBlockParser {
    fn name(&self) -> &'static str {
        "trend-block"
    }

    fn parse(&self, body: &str) -> Vec<String> {
        let Some(re) = PageRegex::get() else {
            return Vec::new();
        };
        re.trend_block
            .captures_iter(body)
            .filter_map(|c| c.get(1))
            .map(|m| strip_marker(&html_escape::decode_html_entities(m.as_str())))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Every `#word` occurrence in the page. `\w` is Unicode aware, so Turkish
/// and other locale letters are captured.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashtagPatternParser;

impl SourceParser for HashtagPatternParser {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn parse(&self, body: &str) -> Vec<String> {
        let Some(re) = PageRegex::get() else {
            return Vec::new();
        };
        // `&#39;` and `&#x27;` are character references, not tags.
        re.hashtag
            .captures_iter(body)
            .filter(|c| {
                c.get(0)
                    .is_some_and(|m| !body[..m.start()].ends_with('&'))
            })
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// `<script type="application/json">` payloads carrying a `trends` or
/// `hashtags` array.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedJsonParser;

impl EmbeddedJsonParser {
    fn tags_from_value(value: &Value) -> Vec<String> {
        let Some(items) = value
            .get("trends")
            .or_else(|| value.get("hashtags"))
            .and_then(Value::as_array)
        else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.as_str()),
                Value::Object(_) => ["name", "hashtag", "text"]
                    .iter()
                    .find_map(|key| item.get(*key).and_then(Value::as_str)),
                _ => None,
            })
            .map(strip_marker)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl SourceParser for EmbeddedJsonParser {
    fn name(&self) -> &'static str {
        "embedded-json"
    }

    fn parse(&self, body: &str) -> Vec<String> {
        let Some(re) = PageRegex::get() else {
            return Vec::new();
        };
        re.json_script
            .captures_iter(body)
            .filter_map(|c| c.get(1))
            .filter_map(|m| serde_json::from_str::<Value>(m.as_str().trim()).ok())
            .flat_map(|v| Self::tags_from_value(&v))
            .collect()
    }
}

/// Values of a quoted JSON key anywhere in the page, e.g. `"hashtag":"travel"`.
/// Used for listing sites that inline their data into scripts.
#[derive(Debug, Clone)]
pub struct JsonKeyParser {
    pattern: Option<Regex>,
}

impl JsonKeyParser {
    #[must_use]
    pub fn new(key: &str) -> Self {
        let pattern = Regex::new(&format!(r#""{}"\s*:\s*"([^"]+)""#, regex::escape(key))).ok();
        Self { pattern }
    }
}

impl SourceParser for JsonKeyParser {
    fn name(&self) -> &'static str {
        "json-key"
    }

    fn parse(&self, body: &str) -> Vec<String> {
        let Some(re) = &self.pattern else {
            return Vec::new();
        };
        re.captures_iter(body)
            .filter_map(|c| c.get(1))
            .map(|m| strip_marker(m.as_str()))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRENDS_PAGE: &str = r##"
        <html><head><style>.a { color: #03a9f4; } .b { color: #fff; }</style></head>
        <body>
          <div class="list-container">
            <div class="trend-item first">
              <span class="rank">1</span>
              <a href="/trend/1">#Galatasaray</a>
            </div>
            <div class="trend-item"><a href="/trend/2">Deprem</a></div>
            <div class="trend-item"><a href="/trend/3">#Sezen&#39;in</a></div>
          </div>
        </body></html>
    "##;

    #[test]
    fn test_trend_block_extracts_link_text() {
        let tags = TrendBlockParser.parse(TRENDS_PAGE);
        assert_eq!(tags, vec!["Galatasaray", "Deprem", "Sezen'in"]);
    }

    #[test]
    fn test_pattern_scan_keeps_order_and_noise() {
        let tags = HashtagPatternParser.parse(TRENDS_PAGE);
        assert_eq!(tags.first().map(String::as_str), Some("03a9f4"));
        assert!(tags.contains(&"Galatasaray".to_string()));
        assert!(tags.contains(&"fff".to_string()));
    }

    #[test]
    fn test_pattern_scan_skips_character_references() {
        let body = "<p>It&#x27;s &#x2F;path &#x3C;b&#x3E; &#39;q&#39; #travel #sunset</p>";
        let tags = HashtagPatternParser.parse(body);
        assert_eq!(tags, vec!["travel", "sunset"]);

        let only_entities = "<p>&#x27;&#x2F;&#x3C;&#x3E;&#x60;</p>";
        assert!(HashtagPatternParser.parse(only_entities).is_empty());
    }

    #[test]
    fn test_pattern_scan_captures_locale_letters() {
        let tags = HashtagPatternParser.parse("<p>#Çağdaş #seçim2025 and #ılık</p>");
        assert_eq!(tags, vec!["Çağdaş", "seçim2025", "ılık"]);
    }

    #[test]
    fn test_embedded_json_fields() {
        let page = r##"
            <script type="application/json">{"trends":[{"name":"#alpha"},{"hashtag":"beta"},{"text":"gamma"},42]}</script>
            <script type="application/json">{"hashtags":["delta"]}</script>
            <script type="application/json">{not json</script>
        "##;
        let tags = EmbeddedJsonParser.parse(page);
        assert_eq!(tags, vec!["alpha", "beta", "gamma", "delta"]);
    }

    #[test]
    fn test_json_key_parser() {
        let page = r#"window.__DATA__ = [{"hashtag":"love","rank":1},{"hashtag": "travel"}]"#;
        let tags = JsonKeyParser::new("hashtag").parse(page);
        assert_eq!(tags, vec!["love", "travel"]);
    }

    #[test]
    fn test_malformed_input_yields_nothing() {
        let junk = "<div class=\"trend-item\"><a href=";
        assert!(TrendBlockParser.parse(junk).is_empty());
        assert!(EmbeddedJsonParser.parse(junk).is_empty());
        assert!(JsonKeyParser::new("hashtag").parse(junk).is_empty());
        assert!(HashtagPatternParser.parse("").is_empty());
    }
}
