use scraper::{ElementRef, Html, Selector};

use crate::errors::ScrapeError;

mod grammar;
mod story;
mod vocabulary;

pub use grammar::GrammarExtractor;
pub use story::StoryExtractor;
pub use vocabulary::VocabularyExtractor;

/// Single-pass sequence of parsed rows borrowed from one document.
pub type Records<'a, R> = Box<dyn Iterator<Item = Result<R, ScrapeError>> + 'a>;

pub trait Extractor {
    type Record;

    /// Locate the record container and hand back its rows lazily.
    /// A missing container fails here; per-row problems surface as items.
    fn extract<'a>(&self, doc: &'a Html) -> Result<Records<'a, Self::Record>, ScrapeError>;
}

pub(crate) fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{css}: {e:?}")))
}

pub(crate) fn container<'a>(doc: &'a Html, css: &str) -> Result<ElementRef<'a>, ScrapeError> {
    let sel = selector(css)?;
    doc.select(&sel)
        .next()
        .ok_or_else(|| ScrapeError::MalformedDocument { selector: css.to_string() })
}

/// `<tr>` descendants of the container, in document order.
pub(crate) fn rows<'a>(table: ElementRef<'a>) -> Result<Vec<ElementRef<'a>>, ScrapeError> {
    let tr = selector("tr")?;
    Ok(table.select(&tr).collect())
}

/// Trimmed text of the first element under `row` matching `sel`.
pub(crate) fn field_text(row: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    row.select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

pub(crate) fn row_text(row: &ElementRef<'_>) -> String {
    row.text().collect::<String>().trim().to_string()
}
