use std::fs;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::info;

use crate::cli::{ExportArgs, ExportFormat, JsonKeys};
use crate::model::PhraseRecord;
use crate::store::{PhraseStore, SqlitePhraseStore, with_store};
use crate::util::{ensure_parent_directory, join_lines};

pub fn run(args: ExportArgs) -> Result<()> {
    let store = SqlitePhraseStore::connect(&args.db_path)?;

    let (payload, count) = with_store(store, |store| match args.format {
        ExportFormat::Text => {
            let texts = store.find_texts()?;
            Ok((join_lines(&texts), texts.len()))
        }
        ExportFormat::Json => {
            let records = store.find_all()?;
            Ok((render_json(&records, &args.keys)?, records.len()))
        }
    })?;

    ensure_parent_directory(&args.output_path)?;
    fs::write(&args.output_path, payload)
        .with_context(|| format!("failed to write {}", args.output_path.display()))?;

    info!(path = %args.output_path.display(), phrases = count, "export completed");
    Ok(())
}

pub(crate) fn render_json(records: &[PhraseRecord], keys: &JsonKeys) -> Result<String> {
    let entries: Vec<Value> = records
        .iter()
        .map(|record| {
            let mut entry = Map::new();
            entry.insert(keys.source_key.clone(), Value::String(record.text.clone()));
            entry.insert(
                keys.target_key.clone(),
                Value::String(record.translation.clone()),
            );
            Value::Object(entry)
        })
        .collect();

    let mut rendered =
        serde_json::to_string_pretty(&entries).context("failed to serialize export")?;
    rendered.push('\n');
    Ok(rendered)
}
