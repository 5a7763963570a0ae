use chrono::Utc;

use crate::config::Config;
use crate::db::Store;
use crate::hashtags::Platform;
use crate::services::HashtagCacheStore;

async fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::new(&config.general.database_path).await
}

pub async fn cmd_cache_show(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let entries = store.list_entries().await?;

    if entries.is_empty() {
        println!("Hashtag cache is empty.");
        return Ok(());
    }

    let now = Utc::now();
    println!("{:<10} {:<22} {:<6} {:<20} Expires", "Platform", "Source", "Tags", "Updated");
    println!("{:-<80}", "");
    for entry in entries {
        let state = if entry.is_fresh_at(now) { "" } else { " (expired)" };
        println!(
            "{:<10} {:<22} {:<6} {:<20} {}{}",
            entry.platform.as_str(),
            entry.source,
            entry.tags.len(),
            entry.last_updated.format("%Y-%m-%d %H:%M"),
            entry.expires_at.format("%Y-%m-%d %H:%M"),
            state
        );
    }

    Ok(())
}

pub async fn cmd_cache_clear(config: &Config, platform: Option<&str>) -> anyhow::Result<()> {
    let platform = platform.map(str::parse::<Platform>).transpose()?;
    let store = open_store(config).await?;
    let removed = store.clear(platform).await?;

    match platform {
        Some(p) => println!("Removed {removed} cached row(s) for {}", p.as_str()),
        None => println!("Removed {removed} cached row(s)"),
    }
    Ok(())
}

pub async fn cmd_cache_purge(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let removed = store.purge_expired(Utc::now()).await?;
    println!("Purged {removed} expired row(s)");
    Ok(())
}
