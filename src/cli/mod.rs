//! Command line interface for relopack.

mod args;

pub use args::Args;

use crate::bundler::Relocator;
use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let settings = args.into_settings()?;
    let relocator = Relocator::new(settings)?;
    let report = relocator.run().await?;

    if report.unresolved.is_empty() {
        println!(
            "bundled {} libraries, relocated {} entries",
            report.bundled.len(),
            report.placed.len()
        );
    } else {
        println!(
            "bundled {} libraries, relocated {} entries, {} unresolved (see warnings)",
            report.bundled.len(),
            report.placed.len(),
            report.unresolved.len()
        );
    }
    Ok(0)
}
