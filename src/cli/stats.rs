//! Stats command handler.
//!
//! Reads the analytics aggregate directly; no provider (and no API key)
//! is needed to look at the counters.

use anyhow::Result;

use metasurf::analytics::UsageTracker;
use metasurf::config::Config;

use super::common;

/// Show usage statistics.
pub(crate) fn cmd_stats() -> Result<()> {
    let config = Config::load();
    let tracker = UsageTracker::open(UsageTracker::path_under(&config.data_dir()));
    common::print_stats(&tracker.snapshot());
    Ok(())
}
