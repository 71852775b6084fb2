use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    pub text: String,
    pub origin: String,
}

impl Phrase {
    pub fn new(text: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: origin.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRecord {
    pub text: String,
    #[serde(default)]
    pub translation: String,
}

impl From<&Phrase> for PhraseRecord {
    fn from(phrase: &Phrase) -> Self {
        Self {
            text: phrase.text.clone(),
            translation: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceEntry {
    pub filename: String,
    pub kind: String,
    pub sha256: String,
    pub phrase_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestPaths {
    pub input_dir: String,
    pub output_path: String,
    pub db_path: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestCounts {
    pub source_count: usize,
    pub skipped_source_count: usize,
    pub phrases_read: usize,
    pub phrases_emptied_by_normalization: usize,
    pub flat_appended: usize,
    pub flat_duplicates: usize,
    pub records_created: usize,
    pub records_existing: usize,
    pub records_failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub sink: String,
    pub dry_run: bool,
    pub started_at: String,
    pub updated_at: String,
    pub paths: IngestPaths,
    pub counts: IngestCounts,
    pub sources: Vec<SourceEntry>,
    pub warnings: Vec<String>,
}
