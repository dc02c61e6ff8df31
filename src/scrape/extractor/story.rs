use scraper::{ElementRef, Html, Selector};

use super::{container, field_text, rows, selector, Extractor, Records};
use crate::errors::ScrapeError;
use crate::scrape::sound;
use crate::scrape::types::StoryRecord;

/// Long-form texts live in `div#part_<id>`; title rows carry no audio.
#[derive(Clone, Copy, Debug)]
pub struct StoryExtractor {
    pub part_id: u32,
}

impl Default for StoryExtractor {
    fn default() -> Self { Self { part_id: 19 } }
}

impl Extractor for StoryExtractor {
    type Record = StoryRecord;

    fn extract<'a>(&self, doc: &'a Html) -> Result<Records<'a, StoryRecord>, ScrapeError> {
        let css = format!("div#part_{}", self.part_id);
        let part = container(doc, &css)?;
        let rows = rows(part)?;
        let ab = selector(".ab")?;
        let ch = selector(".ch")?;
        Ok(Box::new(
            rows.into_iter()
                .map(move |row| clean_row(&row, &ab, &ch))
                // separators and layout rows come out with no dialect text
                .filter(|r| !matches!(r, Ok(rec) if rec.dialect.is_empty())),
        ))
    }
}

fn clean_row(row: &ElementRef<'_>, ab: &Selector, ch: &Selector) -> Result<StoryRecord, ScrapeError> {
    let html = row.html();
    Ok(StoryRecord {
        dialect: field_text(row, ab).unwrap_or_default(),
        chinese_translation: field_text(row, ch).unwrap_or_default(),
        sound_url: sound::normalize(sound::find_sound_path(&html)?),
    })
}
