pub mod source;

pub use source::{
    EmbeddedJsonParser, HashtagPatternParser, JsonKeyParser, SourceParser, TrendBlockParser,
};
