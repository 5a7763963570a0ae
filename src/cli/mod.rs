//! CLI module - Command-line interface for SocialMate
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// SocialMate - social media assistant
/// Trending hashtags, a content chat and a posting agenda
#[derive(Parser)]
#[command(name = "socialmate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    #[command(alias = "web", alias = "daemon")]
    Serve,

    /// Print the current hashtags for a platform
    #[command(alias = "tags")]
    Hashtags {
        /// One of x, instagram, linkedin, tiktok
        #[arg(required_unless_present = "all")]
        platform: Option<String>,
        /// Every platform
        #[arg(long, conflicts_with = "platform")]
        all: bool,
        /// Bypass the cache and fetch again
        #[arg(long)]
        refresh: bool,
    },

    /// Inspect or maintain the hashtag cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show cached rows with their expiry
    #[command(alias = "ls")]
    Show,
    /// Remove cached rows for one platform, or all of them
    #[command(alias = "rm")]
    Clear {
        platform: Option<String>,
    },
    /// Remove expired rows
    Purge,
}

pub use commands::*;
