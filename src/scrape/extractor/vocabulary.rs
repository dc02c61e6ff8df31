use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use super::{container, field_text, row_text, rows, selector, Extractor, Records};
use crate::errors::ScrapeError;
use crate::scrape::sound::{self, NOT_FOUND};
use crate::scrape::types::VocabularyRecord;

const CONTAINER: &str = "table";
const ALPHABET_CELL: &str = "td.alphabet";

/// Word list: rows grouped under single-letter header rows (`td.alphabet`).
#[derive(Clone, Copy, Debug, Default)]
pub struct VocabularyExtractor;

impl Extractor for VocabularyExtractor {
    type Record = VocabularyRecord;

    fn extract<'a>(&self, doc: &'a Html) -> Result<Records<'a, VocabularyRecord>, ScrapeError> {
        let table = container(doc, CONTAINER)?;
        let rows = remove_alphabet_rows(rows(table)?)?;
        let ab = selector(".ab")?;
        let ch = selector(".ch")?;
        Ok(Box::new(rows.into_iter().map(move |row| clean_row(&row, &ab, &ch))))
    }
}

/// First pass collects every alphabet marker text, second drops rows that are only a marker.
fn remove_alphabet_rows(rows: Vec<ElementRef<'_>>) -> Result<Vec<ElementRef<'_>>, ScrapeError> {
    let marker = selector(ALPHABET_CELL)?;
    let alphabet: HashSet<String> = rows.iter().filter_map(|row| field_text(row, &marker)).collect();
    if alphabet.is_empty() {
        return Ok(rows);
    }
    Ok(rows.into_iter().filter(|row| !alphabet.contains(&row_text(row))).collect())
}

fn clean_row(row: &ElementRef<'_>, ab: &Selector, ch: &Selector) -> Result<VocabularyRecord, ScrapeError> {
    let html = row.html();
    Ok(VocabularyRecord {
        vocab: field_text(row, ab).unwrap_or_else(|| NOT_FOUND.to_string()),
        chinese_translation: field_text(row, ch).unwrap_or_else(|| NOT_FOUND.to_string()),
        sound_url: sound::normalize(sound::find_sound_path(&html)?),
    })
}
