use tracing::Instrument;

use super::extractor::{Extractor, GrammarExtractor, StoryExtractor, VocabularyExtractor};
use super::fetch::PageFetcher;
use super::sound::NO_AUDIO;
use super::types::{Collected, GrammarRecord, PartOutcome, StoryGroup, StoryRecord, VocabularyRecord};
use crate::errors::ScrapeError;
use crate::planner::{self, RequestDescriptor};
use crate::telemetry;
use crate::telemetry::ops::download::Phase as DownloadPhase;

/// One content category: which requests it owns and how it assembles their records.
pub trait Downloader {
    type Output;

    fn requests(&self) -> Result<Vec<RequestDescriptor>, ScrapeError>;

    async fn download<F: PageFetcher>(&self, fetcher: &F) -> Result<Self::Output, ScrapeError>;
}

pub struct GrammarDownloader {
    dialect: String,
    part: Option<String>,
}

pub struct VocabularyDownloader {
    dialect: String,
    part: Option<String>,
}

pub struct StoryDownloader {
    dialect: String,
    part: Option<String>,
}

impl GrammarDownloader {
    pub fn new(dialect: &str, part: Option<&str>) -> Self {
        Self { dialect: dialect.to_string(), part: part.map(str::to_string) }
    }
}

impl VocabularyDownloader {
    pub fn new(dialect: &str, part: Option<&str>) -> Self {
        Self { dialect: dialect.to_string(), part: part.map(str::to_string) }
    }
}

impl StoryDownloader {
    pub fn new(dialect: &str, part: Option<&str>) -> Self {
        Self { dialect: dialect.to_string(), part: part.map(str::to_string) }
    }
}

// The catalog is partitioned by position: grammar owns everything but the
// last two parts, vocabulary the second-to-last, story the last.
fn narrow(
    owned: Vec<RequestDescriptor>,
    dialect: &str,
    part: Option<&str>,
) -> Result<Vec<RequestDescriptor>, ScrapeError> {
    match part {
        Some(name) => planner::find_part(owned, dialect, name).map(|r| vec![r]),
        None => Ok(owned),
    }
}

impl Downloader for GrammarDownloader {
    type Output = Collected<GrammarRecord>;

    fn requests(&self) -> Result<Vec<RequestDescriptor>, ScrapeError> {
        let mut all = planner::plan_all(&self.dialect)?;
        all.truncate(all.len().saturating_sub(2));
        narrow(all, &self.dialect, self.part.as_deref())
    }

    async fn download<F: PageFetcher>(&self, fetcher: &F) -> Result<Self::Output, ScrapeError> {
        let requests = self.requests()?;
        let mut outcomes = Vec::with_capacity(requests.len());
        for req in &requests {
            outcomes.push(collect_part(fetcher, &GrammarExtractor, req).await?);
        }
        Ok(shape(self.part.is_some(), outcomes))
    }
}

impl Downloader for VocabularyDownloader {
    type Output = Collected<VocabularyRecord>;

    fn requests(&self) -> Result<Vec<RequestDescriptor>, ScrapeError> {
        let all = planner::plan_all(&self.dialect)?;
        let owned: Vec<RequestDescriptor> = all.into_iter().rev().skip(1).take(1).collect();
        narrow(owned, &self.dialect, self.part.as_deref())
    }

    async fn download<F: PageFetcher>(&self, fetcher: &F) -> Result<Self::Output, ScrapeError> {
        let requests = self.requests()?;
        let mut outcomes = Vec::with_capacity(requests.len());
        for req in &requests {
            outcomes.push(collect_part(fetcher, &VocabularyExtractor, req).await?);
        }
        Ok(shape(self.part.is_some(), outcomes))
    }
}

impl Downloader for StoryDownloader {
    type Output = Vec<StoryGroup>;

    fn requests(&self) -> Result<Vec<RequestDescriptor>, ScrapeError> {
        let all = planner::plan_all(&self.dialect)?;
        let owned: Vec<RequestDescriptor> = all.into_iter().last().into_iter().collect();
        narrow(owned, &self.dialect, self.part.as_deref())
    }

    async fn download<F: PageFetcher>(&self, fetcher: &F) -> Result<Self::Output, ScrapeError> {
        let log = telemetry::download();
        let mut groups = Vec::new();
        for req in self.requests()? {
            let extractor = StoryExtractor { part_id: req.part_id };
            let records = fetch_and_extract(fetcher, &extractor, &req).await?;
            let _s = log.span(&DownloadPhase::Group).entered();
            let mut grouped = group_stories(records, req.part);
            log.debug(format!("{} — {} stories", req.part, grouped.len()));
            groups.append(&mut grouped);
        }
        Ok(groups)
    }
}

async fn fetch_and_extract<E, F>(
    fetcher: &F,
    extractor: &E,
    req: &RequestDescriptor,
) -> Result<Vec<E::Record>, ScrapeError>
where
    E: Extractor,
    F: PageFetcher,
{
    let log = telemetry::download();
    let doc = fetcher
        .fetch(&req.url)
        .instrument(log.span_kv(&DownloadPhase::Fetch, [("part", req.part.to_string()), ("url", req.url.clone())]))
        .await?;

    let _s = log.span(&DownloadPhase::Extract).entered();
    let records = extractor.extract(&doc)?.collect::<Result<Vec<_>, _>>()?;
    log.part_summary(req.dialect, req.part, records.len());
    Ok(records)
}

async fn collect_part<E, F>(
    fetcher: &F,
    extractor: &E,
    req: &RequestDescriptor,
) -> Result<PartOutcome<E::Record>, ScrapeError>
where
    E: Extractor,
    F: PageFetcher,
{
    let records = fetch_and_extract(fetcher, extractor, req).await?;
    if records.is_empty() {
        return Ok(PartOutcome::Empty { part: req.part.to_string(), message: no_data_message(req) });
    }
    Ok(PartOutcome::Found { part: req.part.to_string(), records })
}

pub fn no_data_message(req: &RequestDescriptor) -> String {
    format!("no data for part {} ({})", req.part, req.dialect)
}

fn shape<R>(single: bool, mut outcomes: Vec<PartOutcome<R>>) -> Collected<R> {
    if single && outcomes.len() == 1 {
        if let Some(one) = outcomes.pop() {
            return Collected::One(one);
        }
    }
    Collected::Many(outcomes)
}

/// Split a flat story table at its title rows (rows without audio).
/// Lines that come before the first title are kept under `fallback_title`.
pub fn group_stories(records: Vec<StoryRecord>, fallback_title: &str) -> Vec<StoryGroup> {
    let mut bounds: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.sound_url == NO_AUDIO)
        .map(|(i, _)| i)
        .collect();

    let mut groups = Vec::with_capacity(bounds.len() + 1);
    let first = bounds.first().copied().unwrap_or(records.len());
    if first > 0 {
        groups.push(StoryGroup { title: fallback_title.to_string(), records: records[..first].to_vec() });
    }

    bounds.push(records.len());
    for w in bounds.windows(2) {
        let (start, end) = (w[0], w[1]);
        groups.push(StoryGroup { title: title_of(&records[start]), records: records[start + 1..end].to_vec() });
    }
    groups
}

fn title_of(row: &StoryRecord) -> String {
    if row.chinese_translation.is_empty() { row.dialect.clone() } else { row.chinese_translation.clone() }
}
