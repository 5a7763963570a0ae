pub mod acquisition;
pub use acquisition::{HashtagAcquirer, SourceChain};

pub mod generator;
pub use generator::HashtagGenerator;

pub mod sources;
pub use sources::{HashtagSource, SiteSource};

pub mod hashtag_service;
pub use hashtag_service::{
    CacheEntry, CachedHashtags, Clock, HashtagCacheManager, HashtagCacheStore, HashtagError,
    SystemClock,
};

pub mod chat_service;
pub mod chat_service_impl;
pub use chat_service::{ChatError, ChatService, IncomingMessage};
pub use chat_service_impl::SeaOrmChatService;

pub mod agenda_service;
pub mod agenda_service_impl;
pub use agenda_service::{AgendaError, AgendaService, CreateAgendaItem, UpdateAgendaItem};
pub use agenda_service_impl::SeaOrmAgendaService;
