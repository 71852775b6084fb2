use std::path::Path;

use anyhow::{Result, bail};
use tracing::{debug, error, info, warn};

use crate::model::{Phrase, SourceEntry};
use crate::pipeline::normalize::strip_decoration;
use crate::pipeline::sources::{SourceFile, scan_directory};
use crate::util::sha256_file;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Stage {
    Idle,
    Scanning,
    Reading,
    Normalizing,
    Deduplicating,
    Persisting,
    Done,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Reading => "reading",
            Self::Normalizing => "normalizing",
            Self::Deduplicating => "deduplicating",
            Self::Persisting => "persisting",
            Self::Done => "done",
        }
    }
}

#[derive(Debug)]
pub struct PipelineRun {
    stage: Stage,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineRun {
    pub fn new() -> Self {
        Self { stage: Stage::Idle }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn advance(&mut self, next: Stage) -> Result<()> {
        if next <= self.stage {
            bail!(
                "pipeline cannot move from {} back to {}",
                self.stage.as_str(),
                next.as_str()
            );
        }
        debug!(from = self.stage.as_str(), to = next.as_str(), "pipeline stage");
        self.stage = next;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub column_aliases: Vec<String>,
    pub skip_bad_files: bool,
}

#[derive(Debug, Default)]
pub struct ReadReport {
    pub sources: Vec<SourceEntry>,
    pub skipped_source_count: usize,
    pub warnings: Vec<String>,
}

pub fn read_sources(
    run: &mut PipelineRun,
    input_dir: &Path,
    options: &ReadOptions,
) -> Result<(Vec<Phrase>, ReadReport)> {
    run.advance(Stage::Scanning)?;
    let sources = scan_directory(input_dir)?;
    info!(
        input_dir = %input_dir.display(),
        source_count = sources.len(),
        "scanned input directory"
    );

    run.advance(Stage::Reading)?;
    let mut report = ReadReport::default();
    let mut phrases = Vec::new();

    for source in &sources {
        let filename = source.filename();
        info!(file = %filename, kind = source.kind.as_str(), "reading source");

        let (texts, sha256) = match load_source(source, &options.column_aliases) {
            Ok(loaded) => loaded,
            Err(err) if options.skip_bad_files => {
                warn!(file = %filename, error = %err, "skipping unreadable source");
                report.skipped_source_count += 1;
                report.warnings.push(err.to_string());
                continue;
            }
            Err(err) => {
                error!(file = %filename, error = %err, "aborting run on unreadable source");
                return Err(err);
            }
        };

        report.sources.push(SourceEntry {
            filename: filename.clone(),
            kind: source.kind.as_str().to_string(),
            sha256,
            phrase_count: texts.len(),
        });
        phrases.extend(texts.into_iter().map(|text| Phrase::new(text, filename.as_str())));
    }

    Ok((phrases, report))
}

/// Reads a source and hashes it as one step, so either failure goes through the
/// same abort-or-skip policy.
pub(crate) fn load_source(
    source: &SourceFile,
    column_aliases: &[String],
) -> Result<(Vec<String>, String)> {
    let texts = source.read(column_aliases)?;
    let sha256 = sha256_file(&source.path)?;
    Ok((texts, sha256))
}

pub fn normalize_batch(
    run: &mut PipelineRun,
    phrases: Vec<Phrase>,
) -> Result<(Vec<Phrase>, usize)> {
    run.advance(Stage::Normalizing)?;

    let mut emptied = 0;
    let mut normalized = Vec::with_capacity(phrases.len());
    for mut phrase in phrases {
        let text = strip_decoration(&phrase.text);
        if text.is_empty() {
            debug!(
                file = %phrase.origin,
                original = %phrase.text,
                "phrase empty after normalization"
            );
            emptied += 1;
            continue;
        }
        phrase.text = text;
        normalized.push(phrase);
    }

    Ok((normalized, emptied))
}
