//! Shared CLI helpers: session construction and result rendering.

use anyhow::Result;

use metasurf::analytics::UsageStats;
use metasurf::analyzer::{Analysis, Source};
use metasurf::app::{Session, AI_DISCLAIMER, PROVIDER_RATE_LIMITS};
use metasurf::config::Config;

/// Build a session from the on-disk config.
pub(crate) fn build_session() -> Result<Session> {
    let config = Config::load();
    Ok(Session::from_config(&config)?)
}

/// Print an analysis with its source tag and the standing footer.
pub(crate) fn print_analysis(analysis: &Analysis) {
    let source = match analysis.source {
        Source::Cache => "cached",
        Source::Live => "live",
    };
    println!();
    println!(
        "{} by {} [{}] ({})",
        analysis.payload.title, analysis.payload.author, analysis.payload.category, source
    );
    println!("{}", "-".repeat(60));
    println!("{}", analysis.payload.content);
    println!("{}", "-".repeat(60));
    println!("API Limits: {}", PROVIDER_RATE_LIMITS);
    println!("{}", AI_DISCLAIMER);
}

/// Render an analysis behind a panic boundary. A rendering fault is
/// replaced with a generic notice instead of taking down the session.
pub(crate) fn print_analysis_guarded(analysis: &Analysis) {
    if std::panic::catch_unwind(|| print_analysis(analysis)).is_err() {
        eprintln!("Something went wrong while displaying the result. Please try again.");
    }
}

/// Print the usage-statistics summary panel.
pub(crate) fn print_stats(stats: &UsageStats) {
    println!("Usage Statistics");
    println!("----------------");
    println!("  Total analyses: {}", stats.total());
    println!("  Cache hits:     {}", stats.cache_hits);
    println!("  API calls:      {}", stats.api_calls);
    if !stats.categories.is_empty() {
        println!("  By category:");
        let mut categories: Vec<_> = stats.categories.iter().collect();
        categories.sort_by_key(|(name, _)| name.as_str());
        for (name, count) in categories {
            println!("    {}: {}", name, count);
        }
    }
}
