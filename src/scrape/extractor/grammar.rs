use scraper::{ElementRef, Html, Selector};

use super::{container, field_text, rows, selector, Extractor, Records};
use crate::errors::ScrapeError;
use crate::scrape::sound::{self, NOT_FOUND};
use crate::scrape::types::GrammarRecord;

const CONTAINER: &str = ".template-1";

/// Example sentences: one `<tr>` per sentence with code / ab / ch cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct GrammarExtractor;

struct Cells {
    code: Selector,
    ab: Selector,
    ch: Selector,
}

impl Extractor for GrammarExtractor {
    type Record = GrammarRecord;

    fn extract<'a>(&self, doc: &'a Html) -> Result<Records<'a, GrammarRecord>, ScrapeError> {
        let table = container(doc, CONTAINER)?;
        let rows = rows(table)?;
        let cells = Cells { code: selector(".code")?, ab: selector(".ab")?, ch: selector(".ch")? };
        Ok(Box::new(
            rows.into_iter()
                .enumerate()
                .map(move |(i, row)| clean_row(i + 1, &row, &cells)),
        ))
    }
}

fn clean_row(n: usize, row: &ElementRef<'_>, cells: &Cells) -> Result<GrammarRecord, ScrapeError> {
    let id = field_text(row, &cells.code).ok_or(ScrapeError::MalformedRow { row: n, field: "code" })?;
    let dialect = field_text(row, &cells.ab).unwrap_or_else(|| NOT_FOUND.to_string());
    let chinese_translation = field_text(row, &cells.ch).unwrap_or_else(|| NOT_FOUND.to_string());
    let html = row.html();
    let sound_url = sound::normalize(sound::find_sound_path(&html)?);
    Ok(GrammarRecord { id, dialect, chinese_translation, sound_url })
}
