use anyhow::Result;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::store::{FlatStore, PhraseStore, SqlitePhraseStore, with_store};

pub fn run(args: StatusArgs) -> Result<()> {
    let flat_store = FlatStore::new(&args.output_path);
    if flat_store.exists() {
        info!(
            path = %flat_store.path().display(),
            phrases = flat_store.line_count()?,
            "flat store status"
        );
    } else {
        warn!(path = %flat_store.path().display(), "flat store missing");
    }

    if args.db_path.exists() {
        let store = SqlitePhraseStore::connect(&args.db_path)?;
        let records = with_store(store, |store| Ok(store.count()?))?;
        info!(path = %args.db_path.display(), records, "phrase store status");
    } else {
        warn!(path = %args.db_path.display(), "phrase store missing");
    }

    Ok(())
}
