use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::pipeline::{SeenSet, strip_decoration};
use crate::util::{ensure_parent_directory, join_lines};

#[derive(Debug, Clone)]
pub struct FlatStore {
    path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub lines_before: usize,
    pub lines_after: usize,
    pub lines_changed: usize,
}

impl FlatStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read_content(&self) -> Result<Option<String>> {
        if !self.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        Ok(Some(content))
    }

    pub fn load_seen(&self) -> Result<SeenSet> {
        let content = self.read_content()?.unwrap_or_default();
        Ok(SeenSet::from_lines(content.lines()))
    }

    pub fn line_count(&self) -> Result<usize> {
        let content = self.read_content()?.unwrap_or_default();
        Ok(content.lines().filter(|line| !line.trim().is_empty()).count())
    }

    /// Appends `lines` with a single write. Callers filter them against
    /// `load_seen` first.
    pub fn append<S: AsRef<str>>(&self, lines: &[S]) -> Result<usize> {
        if lines.is_empty() {
            info!(path = %self.path.display(), "no new phrases to append");
            return Ok(0);
        }
        ensure_parent_directory(&self.path)?;

        let needs_separator = self
            .read_content()?
            .is_some_and(|content| !content.is_empty() && !content.ends_with('\n'));

        let mut payload = String::new();
        if needs_separator {
            payload.push('\n');
        }
        payload.push_str(&join_lines(lines));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {} for append", self.path.display()))?;
        file.write_all(payload.as_bytes())
            .with_context(|| format!("failed to append to {}", self.path.display()))?;

        info!(path = %self.path.display(), added = lines.len(), "appended new phrases");
        Ok(lines.len())
    }

    /// Strips decoration from every stored line, dropping lines that become empty
    /// or repeat an earlier one. Returns `None` when the store does not exist.
    pub fn clean(&self) -> Result<Option<CleanReport>> {
        let Some(content) = self.read_content()? else {
            return Ok(None);
        };

        let mut report = CleanReport::default();
        let mut seen = SeenSet::default();
        let mut cleaned = Vec::new();

        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            report.lines_before += 1;
            let stripped = strip_decoration(line);
            if stripped != line {
                report.lines_changed += 1;
            }
            if stripped.is_empty() || seen.contains(&stripped) {
                continue;
            }
            seen.commit(std::slice::from_ref(&stripped));
            cleaned.push(stripped);
        }
        report.lines_after = cleaned.len();

        self.replace_contents(&join_lines(&cleaned))?;
        Ok(Some(report))
    }

    fn replace_contents(&self, content: &str) -> Result<()> {
        let parent_dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .with_context(|| format!("failed to create temp file in {}", parent_dir.display()))?;
        temp_file
            .write_all(content.as_bytes())
            .with_context(|| format!("failed to write temp file for {}", self.path.display()))?;
        temp_file
            .persist(&self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
