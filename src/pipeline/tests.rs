use std::fs;

use tempfile::tempdir;

use super::driver::load_source;
use super::sources::{
    SourceFile, SourceKind, parse_tabular, parse_text_lines, read_tabular_source, read_text_source,
    scan_directory,
};
use super::*;
use crate::error::SourceError;
use crate::model::Phrase;
use crate::util::sha256_file;

fn aliases() -> Vec<String> {
    DEFAULT_COLUMN_ALIASES.iter().map(|alias| alias.to_string()).collect()
}

#[test]
fn text_source_takes_field_before_semicolon() {
    let phrases = parse_text_lines("Marhaba;hello\nKifak;how are you\n");
    assert_eq!(phrases, vec!["Marhaba", "Kifak"]);
}

#[test]
fn text_source_keeps_lines_without_delimiter_and_drops_blanks() {
    let phrases = parse_text_lines("  Yalla  \r\n\n;only translation\n   \nSabah el kheir;x;y\n");
    assert_eq!(phrases, vec!["Yalla", "Sabah el kheir"]);
}

#[test]
fn text_source_reports_missing_file_as_io_error() {
    let dir = tempdir().unwrap();
    let err = read_text_source(&dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
}

#[test]
fn tabular_source_reads_text_column() {
    let phrases = parse_tabular("text,other\nShukran,x\n".as_bytes(), &aliases()).unwrap();
    assert_eq!(phrases, vec!["Shukran"]);
}

#[test]
fn tabular_source_falls_back_to_input_text_per_record() {
    let data = "id,text,InputText\n1,,Habibi\n2,  Inshallah ,ignored\n3,,\n";
    let phrases = parse_tabular(data.as_bytes(), &aliases()).unwrap();
    assert_eq!(phrases, vec!["Habibi", "Inshallah"]);
}

#[test]
fn tabular_source_uses_input_text_when_text_column_absent() {
    let data = "InputText,Label\nMabrouk,greeting\n";
    let phrases = parse_tabular(data.as_bytes(), &aliases()).unwrap();
    assert_eq!(phrases, vec!["Mabrouk"]);
}

#[test]
fn tabular_source_without_known_column_fails_on_first_non_empty_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.csv");
    fs::write(&path, "word,meaning\nYalla,let's go\n").unwrap();

    let err = read_tabular_source(&path, &aliases()).unwrap_err();
    match err {
        SourceError::MissingColumn { aliases, line, .. } => {
            assert_eq!(aliases, "text, InputText");
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn tabular_source_without_known_column_but_no_records_is_empty() {
    let phrases = parse_tabular("word,meaning\n".as_bytes(), &aliases()).unwrap();
    assert!(phrases.is_empty());
}

#[test]
fn tabular_source_rejects_ragged_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    fs::write(&path, "text,other\nShukran,x\nAfwan\n").unwrap();

    let err = read_tabular_source(&path, &aliases()).unwrap_err();
    assert!(matches!(err, SourceError::Parse { .. }));
}

#[test]
fn scan_directory_routes_by_extension_and_sorts() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.csv"), "text\nShukran\n").unwrap();
    fs::write(dir.path().join("a.TXT"), "Marhaba;hello\n").unwrap();
    fs::write(dir.path().join("notes.md"), "ignored").unwrap();
    fs::create_dir(dir.path().join("nested.txt")).unwrap();

    let sources = scan_directory(dir.path()).unwrap();
    let names: Vec<String> = sources.iter().map(|source| source.filename()).collect();
    assert_eq!(names, vec!["a.TXT", "b.csv"]);
    assert_eq!(sources[0].kind, SourceKind::Text);
    assert_eq!(sources[1].kind, SourceKind::Tabular);
}

#[test]
fn strip_decoration_removes_emoji_and_trims_ends() {
    assert_eq!(strip_decoration("Yalla 😀 bye"), "Yalla  bye");
    assert_eq!(strip_decoration("  ❤️ Habibi 🇱🇧 "), "Habibi");
    assert_eq!(strip_decoration("👨\u{200D}👩\u{200D}👧"), "");
    assert_eq!(strip_decoration("Ça va? مرحبا"), "Ça va? مرحبا");
}

#[test]
fn strip_decoration_is_idempotent() {
    let samples = [
        "Yalla 😀 bye",
        " 🙏 ",
        "☀️ Sabah el kheir ☕",
        "plain",
        "",
        "🤣🤣 \u{FE0F} haha",
    ];
    for sample in samples {
        let once = strip_decoration(sample);
        assert_eq!(strip_decoration(&once), once, "sample: {sample:?}");
    }
}

#[test]
fn filter_new_skips_seen_and_preserves_order() {
    let seen = SeenSet::from_lines(["Kifak", "Marhaba"]);
    let candidates = ["Yalla", "Marhaba", "Shukran", "Kifak", "Afwan"];

    let fresh = filter_new(&candidates, &seen);
    assert_eq!(fresh, vec!["Yalla", "Shukran", "Afwan"]);
    assert!(fresh.iter().all(|text| !seen.contains(text)));
    assert_eq!(seen.len(), 2);
}

#[test]
fn filter_new_is_exact_match_and_collapses_batch_repeats() {
    let seen = SeenSet::from_lines(["marhaba"]);
    let candidates = ["Marhaba", "Marhaba", "marhaba", "Marhaba "];

    let fresh = filter_new(&candidates, &seen);
    assert_eq!(fresh, vec!["Marhaba", "Marhaba "]);
}

#[test]
fn seen_set_commit_is_explicit() {
    let mut seen = SeenSet::default();
    let fresh = filter_new(&["Yalla"], &seen);
    assert!(!seen.contains("Yalla"));

    seen.commit(&fresh);
    assert!(seen.contains("Yalla"));
    assert!(filter_new(&["Yalla"], &seen).is_empty());
}

#[test]
fn pipeline_run_only_moves_forward() {
    let mut run = PipelineRun::new();
    assert_eq!(run.stage(), Stage::Idle);

    run.advance(Stage::Scanning).unwrap();
    run.advance(Stage::Reading).unwrap();
    assert!(run.advance(Stage::Scanning).is_err());
    assert!(run.advance(Stage::Reading).is_err());
    assert_eq!(run.stage(), Stage::Reading);
}

#[test]
fn read_sources_concatenates_files_in_scan_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "Marhaba;hello\nKifak;how are you\n").unwrap();
    fs::write(dir.path().join("b.csv"), "text,other\nShukran,x\n").unwrap();

    let mut run = PipelineRun::new();
    let options = ReadOptions {
        column_aliases: aliases(),
        skip_bad_files: false,
    };
    let (phrases, report) = read_sources(&mut run, dir.path(), &options).unwrap();

    let texts: Vec<&str> = phrases.iter().map(|phrase| phrase.text.as_str()).collect();
    assert_eq!(texts, vec!["Marhaba", "Kifak", "Shukran"]);
    assert_eq!(phrases[2].origin, "b.csv");
    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.sources[0].phrase_count, 2);
    assert_eq!(report.sources[0].sha256.len(), 64);
    assert_eq!(run.stage(), Stage::Reading);
}

#[test]
fn read_sources_aborts_on_bad_file_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "Marhaba\n").unwrap();
    fs::write(dir.path().join("b.csv"), "word\nYalla\n").unwrap();

    let mut run = PipelineRun::new();
    let options = ReadOptions {
        column_aliases: aliases(),
        skip_bad_files: false,
    };
    assert!(read_sources(&mut run, dir.path(), &options).is_err());
}

#[test]
fn read_sources_skips_bad_file_when_isolated() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "Marhaba\n").unwrap();
    fs::write(dir.path().join("b.csv"), "word\nYalla\n").unwrap();
    fs::write(dir.path().join("c.txt"), "Kifak\n").unwrap();

    let mut run = PipelineRun::new();
    let options = ReadOptions {
        column_aliases: aliases(),
        skip_bad_files: true,
    };
    let (phrases, report) = read_sources(&mut run, dir.path(), &options).unwrap();

    let texts: Vec<&str> = phrases.iter().map(|phrase| phrase.text.as_str()).collect();
    assert_eq!(texts, vec!["Marhaba", "Kifak"]);
    assert_eq!(report.skipped_source_count, 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("b.csv"));
}

#[test]
fn load_source_returns_texts_with_content_hash() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "Marhaba;hello\n").unwrap();
    let source = SourceFile {
        path: path.clone(),
        kind: SourceKind::Text,
    };

    let (texts, sha256) = load_source(&source, &aliases()).unwrap();
    assert_eq!(texts, vec!["Marhaba"]);
    assert_eq!(sha256, sha256_file(&path).unwrap());
}

#[test]
fn load_source_fails_for_missing_source() {
    let dir = tempdir().unwrap();
    let missing = SourceFile {
        path: dir.path().join("gone.txt"),
        kind: SourceKind::Text,
    };
    assert!(load_source(&missing, &aliases()).is_err());
}

#[test]
fn normalize_batch_strips_and_drops_emptied_phrases() {
    let mut run = PipelineRun::new();
    run.advance(Stage::Reading).unwrap();

    let phrases = vec![
        Phrase::new("Yalla 😀", "a.txt"),
        Phrase::new("🎉🎉", "a.txt"),
        Phrase::new("Kifak", "b.csv"),
    ];
    let (normalized, emptied) = normalize_batch(&mut run, phrases).unwrap();

    let texts: Vec<&str> = normalized.iter().map(|phrase| phrase.text.as_str()).collect();
    assert_eq!(texts, vec!["Yalla", "Kifak"]);
    assert_eq!(emptied, 1);
    assert_eq!(run.stage(), Stage::Normalizing);
}
