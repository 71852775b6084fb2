use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::pipeline::DEFAULT_COLUMN_ALIASES;

#[derive(Parser, Debug)]
#[command(
    name = "phrasebank",
    version,
    about = "Phrase list ingestion, cleanup and synchronization tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Ingest(IngestArgs),
    Clean(CleanArgs),
    Export(ExportArgs),
    Import(ImportArgs),
    Status(StatusArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SinkMode {
    Flat,
    Document,
    Both,
}

impl SinkMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Document => "document",
            Self::Both => "both",
        }
    }

    pub fn uses_flat(self) -> bool {
        matches!(self, Self::Flat | Self::Both)
    }

    pub fn uses_document(self) -> bool {
        matches!(self, Self::Document | Self::Both)
    }
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    #[arg(long, default_value = "input")]
    pub input_dir: PathBuf,

    #[arg(long, default_value = "output.txt")]
    pub output_path: PathBuf,

    #[arg(long, default_value = "phrases.sqlite")]
    pub db_path: PathBuf,

    #[arg(long, value_enum, default_value_t = SinkMode::Flat)]
    pub sink: SinkMode,

    #[arg(long = "column", default_values = DEFAULT_COLUMN_ALIASES.iter().copied())]
    pub columns: Vec<String>,

    #[arg(long, default_value_t = false)]
    pub skip_bad_files: bool,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    #[arg(long, default_value = "output.txt")]
    pub output_path: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct JsonKeys {
    #[arg(long, default_value = "sourceText")]
    pub source_key: String,

    #[arg(long, default_value = "targetText")]
    pub target_key: String,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(long, default_value = "phrases.sqlite")]
    pub db_path: PathBuf,

    #[arg(long, default_value = "export.txt")]
    pub output_path: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
    pub format: ExportFormat,

    #[command(flatten)]
    pub keys: JsonKeys,
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    #[arg(long)]
    pub input_path: PathBuf,

    #[arg(long, default_value = "phrases.sqlite")]
    pub db_path: PathBuf,

    #[command(flatten)]
    pub keys: JsonKeys,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "output.txt")]
    pub output_path: PathBuf,

    #[arg(long, default_value = "phrases.sqlite")]
    pub db_path: PathBuf,
}
