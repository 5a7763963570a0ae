pub use super::agenda_items::Entity as AgendaItems;
pub use super::chat_messages::Entity as ChatMessages;
pub use super::hashtag_cache::Entity as HashtagCache;
