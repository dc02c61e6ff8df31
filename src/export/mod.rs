use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::scrape::types::{Downloaded, PartOutcome, TableRow};

pub mod csv;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Json => "json", ExportFormat::Csv => "csv" }
    }
}

#[derive(Debug, Default)]
pub struct ExportSummary {
    pub files: Vec<PathBuf>,
    /// "no data" notes for parts that produced no file.
    pub messages: Vec<String>,
}

/// One file per part (or per story) named `<dialect> - <key>.<ext>` under `dir`.
pub fn write_downloaded(dir: &Path, format: ExportFormat, dialect: &str, data: &Downloaded) -> Result<ExportSummary> {
    ensure_directory(dir)?;
    let mut writer = EntryWriter { dir, format, dialect, seen: HashMap::new() };
    let mut summary = ExportSummary::default();

    match data {
        Downloaded::Grammar(c) => writer.outcomes(c.outcomes(), &mut summary)?,
        Downloaded::Vocabulary(c) => writer.outcomes(c.outcomes(), &mut summary)?,
        Downloaded::Story(groups) => {
            for g in groups {
                summary.files.push(writer.entry(&g.title, &g.records)?);
            }
        }
    }
    Ok(summary)
}

struct EntryWriter<'a> {
    dir: &'a Path,
    format: ExportFormat,
    dialect: &'a str,
    seen: HashMap<String, usize>,
}

impl EntryWriter<'_> {
    fn outcomes<R: Serialize + TableRow>(&mut self, outcomes: &[PartOutcome<R>], summary: &mut ExportSummary) -> Result<()> {
        for o in outcomes {
            match o {
                PartOutcome::Found { part, records } => summary.files.push(self.entry(part, records)?),
                PartOutcome::Empty { message, .. } => summary.messages.push(message.clone()),
            }
        }
        Ok(())
    }

    fn entry<R: Serialize + TableRow>(&mut self, key: &str, records: &[R]) -> Result<PathBuf> {
        let stem = format!("{} - {}", self.dialect, sanitize_key(key));
        let path = resolve_filename(self.dir, &stem, &mut self.seen, self.format.ext());
        match self.format {
            ExportFormat::Json => write_json(&path, records)?,
            ExportFormat::Csv => csv::write_table(&path, records)?,
        }
        Ok(path)
    }
}

/// Non-ASCII text is written as-is.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, value)?;
    out.flush()?;
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        bail!("Path exists but is not a directory: {}", dir.display());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Keys come from page text; keep them to a single path component.
pub fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control() { '_' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') { "untitled".to_string() } else { cleaned }
}

/// First occurrence: "<stem>.ext"; later ones "<stem> (N).ext" with N starting at 2.
fn resolve_filename(dir: &Path, stem: &str, seen: &mut HashMap<String, usize>, ext: &str) -> PathBuf {
    let count = seen.entry(stem.to_string()).or_insert(0);
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };
    *count += 1;
    dir.join(filename)
}
