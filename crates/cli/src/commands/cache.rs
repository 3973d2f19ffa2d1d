//! `gqlvis cache`

use crate::{context, OutputOptions};
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use gqlvis_cache::{Cache, FileCache};

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum CacheCommands {
    /// Delete the persistent type cache
    Clear,
    /// Print the location of the persistent type cache
    Path,
}

pub fn run(
    globals: &context::GlobalArgs,
    command: CacheCommands,
    output: OutputOptions,
) -> Result<()> {
    let config = context::load(globals)?;
    let Some(path) = config.cache.file() else {
        if output.show_info {
            eprintln!(
                "{}",
                "No cache directory configured; types are only cached in memory".yellow()
            );
        }
        return Ok(());
    };

    match command {
        CacheCommands::Path => println!("{}", path.display()),
        CacheCommands::Clear => {
            let existed = path.exists();
            FileCache::new(&path)
                .clear()
                .with_context(|| format!("Failed to clear {}", path.display()))?;
            if output.show_info {
                let message = if existed { "Cleared" } else { "Already empty:" };
                eprintln!("{} {}", message.green(), path.display());
            }
        }
    }
    Ok(())
}
