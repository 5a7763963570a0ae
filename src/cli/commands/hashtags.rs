use futures::future::join_all;

use crate::config::Config;
use crate::hashtags::Platform;
use crate::services::CachedHashtags;
use crate::state::SharedState;

pub async fn cmd_hashtags(
    config: Config,
    platform: Option<&str>,
    all: bool,
    refresh: bool,
) -> anyhow::Result<()> {
    let platforms = if all {
        Platform::ALL.to_vec()
    } else {
        let name = platform.unwrap_or_default();
        vec![name.parse::<Platform>()?]
    };

    let state = SharedState::new(config).await?;

    // Platforms use disjoint cache keys, so they can be fetched concurrently.
    let lookups = platforms.iter().map(|&platform| {
        let hashtags = &state.hashtags;
        async move {
            if refresh {
                hashtags.refresh(platform).await
            } else {
                hashtags.get_or_refresh(platform).await
            }
        }
    });
    let results = join_all(lookups).await;

    for (platform, result) in platforms.into_iter().zip(results) {
        match result {
            Ok(cached) => print_hashtags(platform, &cached),
            Err(e) => eprintln!("{}: {}", platform.as_str(), e),
        }
    }

    Ok(())
}

fn print_hashtags(platform: Platform, result: &CachedHashtags) {
    let entry = &result.entry;
    let mut flags = vec![entry.source.clone()];
    if entry.is_estimated {
        flags.push("estimated".to_string());
    }
    if result.cached {
        flags.push("cached".to_string());
    }

    println!("{} ({})", platform.display_name(), flags.join(", "));
    println!("{:-<60}", "");
    if entry.tags.is_empty() {
        println!("  (no hashtags)");
    }
    for tag in &entry.tags {
        println!("  #{tag}");
    }
    println!();
}
