mod cache;
mod hashtags;
mod init;

pub use cache::{cmd_cache_clear, cmd_cache_purge, cmd_cache_show};
pub use hashtags::cmd_hashtags;
pub use init::cmd_init;
