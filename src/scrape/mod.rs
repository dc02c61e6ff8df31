pub mod download;
pub mod extractor;
pub mod fetch;
pub mod sound;
pub mod types;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::errors::ScrapeError;
use crate::export::{self, ExportFormat};
use crate::planner::RequestDescriptor;
use crate::telemetry::{self};
use crate::telemetry::ops::download::Phase as DownloadPhase;

use self::download::{Downloader, GrammarDownloader, StoryDownloader, VocabularyDownloader};
use self::fetch::{FetcherConfig, HttpFetcher, PageFetcher};
use self::types::{DownloadApply, DownloadPlan, Downloaded};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContentKind {
    Grammar,
    #[value(name = "vocab")]
    Vocabulary,
    Story,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Grammar => "grammar",
            ContentKind::Vocabulary => "vocab",
            ContentKind::Story => "story",
        }
    }
}

/// Requests a download of `kind` would issue, in order.
pub fn requests_for(dialect: &str, kind: ContentKind, part: Option<&str>) -> Result<Vec<RequestDescriptor>, ScrapeError> {
    match kind {
        ContentKind::Grammar => GrammarDownloader::new(dialect, part).requests(),
        ContentKind::Vocabulary => VocabularyDownloader::new(dialect, part).requests(),
        ContentKind::Story => StoryDownloader::new(dialect, part).requests(),
    }
}

pub async fn download<F: PageFetcher>(
    fetcher: &F,
    dialect: &str,
    kind: ContentKind,
    part: Option<&str>,
) -> Result<Downloaded, ScrapeError> {
    Ok(match kind {
        ContentKind::Grammar => Downloaded::Grammar(GrammarDownloader::new(dialect, part).download(fetcher).await?),
        ContentKind::Vocabulary => Downloaded::Vocabulary(VocabularyDownloader::new(dialect, part).download(fetcher).await?),
        ContentKind::Story => Downloaded::Story(StoryDownloader::new(dialect, part).download(fetcher).await?),
    })
}

#[derive(Args)]
pub struct DownloadCmd {
    /// Dialect name, e.g. 泰雅語
    dialect: String,
    #[arg(value_enum)]
    kind: ContentKind,
    /// Restrict to one content part of this category
    #[arg(long)] part: Option<String>,
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)] format: ExportFormat,
    #[arg(long, default_value = ".")] out: PathBuf,
    #[arg(long, default_value_t = false)] apply: bool,
}

pub async fn run(args: DownloadCmd) -> Result<()> {
    let t0 = Instant::now();
    let log = telemetry::download();
    let _g = log.root_span_kv([
        ("dialect", args.dialect.clone()),
        ("kind", args.kind.as_str().to_string()),
        ("part", format!("{:?}", args.part)),
        ("format", args.format.ext().to_string()),
        ("out", args.out.display().to_string()),
        ("apply", args.apply.to_string()),
    ]).entered();

    let _sp = log.span(&DownloadPhase::Plan).entered();
    let requests = requests_for(&args.dialect, args.kind, args.part.as_deref())?;
    drop(_sp);

    if !args.apply {
        log.info(format!("📝 Download plan — dialect={} kind={} requests={}", args.dialect, args.kind.as_str(), requests.len()));
        for r in &requests {
            log.info(format!("  {} → {}", r.part, r.url));
        }
        log.info("   Use --apply to fetch and write files.");
        if telemetry::config::json_mode() {
            let plan = DownloadPlan { dialect: args.dialect.clone(), kind: args.kind.as_str(), requests };
            log.plan(&plan)?;
        }
        return Ok(());
    }

    let fetcher = HttpFetcher::new(FetcherConfig::from_env()).context("build http client")?;
    let data = download(&fetcher, &args.dialect, args.kind, args.part.as_deref())
        .await
        .with_context(|| format!("download {} {}", args.dialect, args.kind.as_str()))?;

    let _w = log.span_kv(&DownloadPhase::Write, [("dir", args.out.display().to_string())]).entered();
    let summary = export::write_downloaded(&args.out, args.format, &args.dialect, &data)?;
    drop(_w);

    for m in &summary.messages {
        log.warn(m);
    }
    let records = data.record_count();
    log.totals(records, summary.files.len(), summary.messages.len());

    if telemetry::config::json_mode() {
        let result = DownloadApply {
            dialect: args.dialect,
            kind: args.kind.as_str(),
            records,
            files: summary.files.iter().map(|p| p.display().to_string()).collect(),
            messages: summary.messages,
        };
        log.result_timed(&result, t0)?;
    }
    Ok(())
}
