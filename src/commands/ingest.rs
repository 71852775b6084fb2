use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::IngestArgs;
use crate::model::{IngestCounts, IngestPaths, IngestRunManifest, Phrase, PhraseRecord};
use crate::pipeline::{PipelineRun, ReadOptions, Stage, filter_new, normalize_batch, read_sources};
use crate::store::{FlatStore, PhraseStore, SqlitePhraseStore, upsert_records, with_store};
use crate::util::{now_utc_string, utc_compact_string, write_json_pretty};

pub fn run(args: IngestArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    info!(
        input_dir = %args.input_dir.display(),
        sink = args.sink.as_str(),
        dry_run = args.dry_run,
        run_id = %run_id,
        "starting ingest"
    );

    let mut run = PipelineRun::new();
    let options = ReadOptions {
        column_aliases: args.columns.clone(),
        skip_bad_files: args.skip_bad_files,
    };

    let (raw, report) = read_sources(&mut run, &args.input_dir, &options)?;
    let mut counts = IngestCounts {
        source_count: report.sources.len(),
        skipped_source_count: report.skipped_source_count,
        phrases_read: raw.len(),
        ..IngestCounts::default()
    };

    let (phrases, emptied) = normalize_batch(&mut run, raw)?;
    counts.phrases_emptied_by_normalization = emptied;

    persist(&mut run, &args, &phrases, &mut counts)?;
    run.advance(Stage::Done)?;

    info!(
        stage = run.stage().as_str(),
        read = counts.phrases_read,
        appended = counts.flat_appended,
        created = counts.records_created,
        existing = counts.records_existing,
        failed = counts.records_failed,
        "ingest completed"
    );

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = IngestRunManifest {
            manifest_version: 1,
            run_id,
            status: "completed".to_string(),
            sink: args.sink.as_str().to_string(),
            dry_run: args.dry_run,
            started_at,
            updated_at: now_utc_string(),
            paths: IngestPaths {
                input_dir: args.input_dir.display().to_string(),
                output_path: args.output_path.display().to_string(),
                db_path: args.db_path.display().to_string(),
            },
            counts,
            sources: report.sources,
            warnings: report.warnings,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote ingest run manifest");
    }

    Ok(())
}

fn persist(
    run: &mut PipelineRun,
    args: &IngestArgs,
    phrases: &[Phrase],
    counts: &mut IngestCounts,
) -> Result<()> {
    let texts: Vec<&str> = phrases.iter().map(|phrase| phrase.text.as_str()).collect();
    let flat_store = FlatStore::new(&args.output_path);

    run.advance(Stage::Deduplicating)?;
    let fresh = if args.sink.uses_flat() {
        let seen = flat_store.load_seen()?;
        let fresh = filter_new(&texts, &seen);
        counts.flat_duplicates = texts.len() - fresh.len();
        info!(
            candidates = texts.len(),
            fresh = fresh.len(),
            seen = seen.len(),
            "deduplicated against flat store"
        );
        fresh
    } else {
        Vec::new()
    };

    run.advance(Stage::Persisting)?;
    // Connect before any write so a store failure leaves both sinks untouched.
    let store = if args.sink.uses_document() && !args.dry_run {
        Some(SqlitePhraseStore::connect(&args.db_path)?)
    } else {
        None
    };
    if args.dry_run {
        for text in &fresh {
            info!(phrase = %text, "would append");
        }
        if args.sink.uses_document() {
            for phrase in phrases {
                info!(phrase = %phrase.text, file = %phrase.origin, "would create record");
            }
        }
        info!("dry run, nothing persisted");
        return Ok(());
    }

    if args.sink.uses_flat() {
        counts.flat_appended = match flat_store.append(&fresh) {
            Ok(appended) => appended,
            Err(err) => {
                if let Some(store) = store {
                    if let Err(release_err) = store.disconnect() {
                        warn!(error = %release_err, "failed to release phrase store");
                    }
                }
                return Err(err);
            }
        };
    }

    if let Some(store) = store {
        let records: Vec<PhraseRecord> = phrases.iter().map(PhraseRecord::from).collect();
        let upserted = with_store(store, |store| Ok(upsert_records(store, &records)))?;
        counts.records_created = upserted.created;
        counts.records_existing = upserted.existing;
        counts.records_failed = upserted.failed;
    }

    Ok(())
}
