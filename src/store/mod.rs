pub mod document;
pub mod flat;

pub use document::{
    CreateOutcome, PhraseStore, SqlitePhraseStore, UpsertCounts, import_entries, upsert_records,
    with_store,
};
pub use flat::{CleanReport, FlatStore};
