use anyhow::Result;
use tracing::{info, warn};

use crate::cli::CleanArgs;
use crate::store::FlatStore;

pub fn run(args: CleanArgs) -> Result<()> {
    let store = FlatStore::new(&args.output_path);

    match store.clean()? {
        Some(report) => info!(
            path = %store.path().display(),
            lines_before = report.lines_before,
            lines_after = report.lines_after,
            lines_changed = report.lines_changed,
            "flat store cleaned"
        ),
        None => warn!(path = %store.path().display(), "flat store missing, nothing to clean"),
    }

    Ok(())
}
