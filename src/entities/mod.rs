pub mod prelude;

pub mod agenda_items;
pub mod chat_messages;
pub mod hashtag_cache;
