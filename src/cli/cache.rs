//! Cache maintenance command handler.

use anyhow::Result;
use chrono::{DateTime, Local};

use metasurf::cache::AnalysisCache;
use metasurf::config::Config;

use super::CacheAction;

/// Manage the analysis cache.
pub(crate) fn cmd_cache(action: CacheAction) -> Result<()> {
    let config = Config::load();
    let mut cache = AnalysisCache::open(AnalysisCache::path_under(&config.data_dir()));

    match action {
        CacheAction::Status => {
            println!("Analysis Cache");
            println!("--------------");
            println!("  Entries: {}", cache.len());
            let mut index = cache.stored_at_index();
            index.sort_by_key(|(_, stored_at)| *stored_at);
            for (key, stored_at_ms) in index {
                let stored = DateTime::from_timestamp_millis(stored_at_ms as i64)
                    .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                println!("  {}  stored {}", &key[..8.min(key.len())], stored);
            }
        }
        CacheAction::Sweep => {
            let removed = cache.sweep_expired();
            println!("Removed {} expired entr{}.", removed, plural_y(removed));
        }
        CacheAction::Clear => {
            let had = cache.len();
            cache.clear();
            println!("Cleared {} entr{}.", had, plural_y(had));
        }
    }

    Ok(())
}

fn plural_y(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}
