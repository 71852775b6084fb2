use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::SourceError;

pub const DEFAULT_COLUMN_ALIASES: &[&str] = &["text", "InputText"];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SourceKind {
    Text,
    Tabular,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|ext| ext.to_str())?;
        if ext.eq_ignore_ascii_case("txt") {
            Some(Self::Text)
        } else if ext.eq_ignore_ascii_case("csv") {
            Some(Self::Tabular)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Tabular => "csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl SourceFile {
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn read(&self, column_aliases: &[String]) -> Result<Vec<String>, SourceError> {
        match self.kind {
            SourceKind::Text => read_text_source(&self.path),
            SourceKind::Tabular => read_tabular_source(&self.path, column_aliases),
        }
    }
}

pub fn scan_directory(input_dir: &Path) -> Result<Vec<SourceFile>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        if let Some(kind) = SourceKind::from_path(&path) {
            sources.push(SourceFile { path, kind });
        }
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

pub fn read_text_source(path: &Path) -> Result<Vec<String>, SourceError> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_text_lines(&content))
}

pub fn parse_text_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split(';').next().unwrap_or_default().trim())
        .filter(|phrase| !phrase.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn read_tabular_source(
    path: &Path,
    column_aliases: &[String],
) -> Result<Vec<String>, SourceError> {
    let file = fs::File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_tabular(file, column_aliases).map_err(|err| match err {
        TabularError::Csv(source) => SourceError::Parse {
            path: path.to_path_buf(),
            source,
        },
        TabularError::MissingColumn { line } => SourceError::MissingColumn {
            path: path.to_path_buf(),
            aliases: column_aliases.join(", "),
            line,
        },
    })
}

#[derive(Debug)]
pub(crate) enum TabularError {
    Csv(csv::Error),
    MissingColumn { line: u64 },
}

pub(crate) fn parse_tabular<R: std::io::Read>(
    reader: R,
    column_aliases: &[String],
) -> Result<Vec<String>, TabularError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(TabularError::Csv)?.clone();
    let columns = resolve_columns(&headers, column_aliases);

    let mut phrases = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(TabularError::Csv)?;

        if columns.is_empty() {
            if record.iter().any(|field| !field.trim().is_empty()) {
                let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                return Err(TabularError::MissingColumn { line });
            }
            continue;
        }

        let phrase = columns
            .iter()
            .filter_map(|&index| record.get(index))
            .map(str::trim)
            .find(|value| !value.is_empty());

        if let Some(phrase) = phrase {
            phrases.push(phrase.to_string());
        }
    }

    Ok(phrases)
}

fn resolve_columns(headers: &csv::StringRecord, column_aliases: &[String]) -> Vec<usize> {
    column_aliases
        .iter()
        .filter_map(|alias| headers.iter().position(|header| header.trim() == alias))
        .collect()
}
