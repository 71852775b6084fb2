use std::fs;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::info;

use crate::cli::{ImportArgs, JsonKeys};
use crate::model::PhraseRecord;
use crate::pipeline::strip_decoration;
use crate::store::{SqlitePhraseStore, import_entries, with_store};

pub fn run(args: ImportArgs) -> Result<()> {
    let raw = fs::read(&args.input_path)
        .with_context(|| format!("failed to read {}", args.input_path.display()))?;
    let entries = parse_entries(&raw, &args.keys)
        .with_context(|| format!("failed to parse {}", args.input_path.display()))?;

    info!(
        path = %args.input_path.display(),
        entries = entries.len(),
        "loaded import file"
    );

    let store = SqlitePhraseStore::connect(&args.db_path)?;
    let counts = with_store(store, |store| Ok(import_entries(store, &entries)))?;

    info!(
        created = counts.created,
        existing = counts.existing,
        failed = counts.failed,
        "import completed"
    );
    Ok(())
}

pub(crate) fn parse_entries(
    raw: &[u8],
    keys: &JsonKeys,
) -> Result<Vec<Result<PhraseRecord, String>>> {
    let document: Value = serde_json::from_slice(raw)?;
    let Value::Array(items) = document else {
        bail!("expected a JSON array of objects");
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| entry_to_record(index, item, keys))
        .collect())
}

fn entry_to_record(
    index: usize,
    item: &Value,
    keys: &JsonKeys,
) -> Result<PhraseRecord, String> {
    let Some(object) = item.as_object() else {
        return Err(format!("entry {index} is not an object"));
    };

    let source = object
        .get(&keys.source_key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("entry {index} has no string '{}'", keys.source_key))?;

    let text = strip_decoration(source);
    if text.is_empty() {
        return Err(format!("entry {index} is empty after normalization"));
    }

    let translation = object
        .get(&keys.target_key)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Ok(PhraseRecord { text, translation })
}
