pub mod agenda;
pub mod hashtag_cache;
pub mod message;
