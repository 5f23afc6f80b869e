//! One-shot analyze command handler.

use anyhow::Result;

use super::common;

/// Analyze a single work and print the result plus the usage summary.
pub(crate) async fn cmd_analyze(title: &str, author: &str, category: &str) -> Result<()> {
    let session = common::build_session()?;
    let analysis = session.submit(title, author, category).await?;
    common::print_analysis_guarded(&analysis);
    println!();
    common::print_stats(&session.analytics());
    Ok(())
}
