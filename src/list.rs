use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::catalog::{self, ContentPart, Dialect};
use crate::planner;
use crate::telemetry::{self};
use crate::telemetry::ops::list::Phase as ListPhase;

/// ilrdc list dialects/parts/urls
#[derive(Args)]
pub struct ListCmd {
    #[command(subcommand)]
    pub cmd: ListSub,
}

#[derive(Subcommand)]
pub enum ListSub {
    /// Supported dialects and their site ids
    Dialects,
    /// Content parts in catalog order
    Parts,
    /// Page URLs a dialect would be fetched from
    Urls {
        dialect: String,
        #[arg(long)]
        part: Option<String>,
    },
}

#[derive(Serialize)]
struct PartRow {
    #[serde(flatten)]
    part: ContentPart,
    kind: &'static str,
}

pub fn run(args: ListCmd) -> Result<()> {
    let log = telemetry::list();
    let _g = log.root_span().entered();
    match args.cmd {
        ListSub::Dialects => list_dialects(),
        ListSub::Parts => list_parts(),
        ListSub::Urls { dialect, part } => list_urls(&dialect, part.as_deref()),
    }
}

fn list_dialects() -> Result<()> {
    let log = telemetry::list();
    let _s = log.span(&ListPhase::Dialects).entered();
    for Dialect { name, id } in catalog::DIALECTS {
        log.info(format!("  l={:<3} {}", id, name));
    }
    if telemetry::config::json_mode() {
        log.result(&catalog::DIALECTS)?;
    }
    Ok(())
}

fn list_parts() -> Result<()> {
    let log = telemetry::list();
    let _s = log.span(&ListPhase::Parts).entered();
    let rows: Vec<PartRow> = catalog::PARTS
        .iter()
        .enumerate()
        .map(|(i, p)| PartRow { part: *p, kind: category_of(i, catalog::PARTS.len()) })
        .collect();
    for r in &rows {
        log.info(format!("  p={:<3} {:<8} {}", r.part.id, r.kind, r.part.name));
    }
    if telemetry::config::json_mode() {
        log.result(&rows)?;
    }
    Ok(())
}

fn list_urls(dialect: &str, part: Option<&str>) -> Result<()> {
    let log = telemetry::list();
    let _s = log.span_kv(&ListPhase::Urls, [("dialect", dialect.to_string()), ("part", format!("{:?}", part))]).entered();
    let requests = planner::plan(dialect, part)?.into_vec();
    for r in &requests {
        log.info_kv(&format!("  {} → {}", r.part, r.url), [("part_id", r.part_id.to_string())]);
    }
    if telemetry::config::json_mode() {
        log.result(&requests)?;
    }
    Ok(())
}

/// Position decides the category: all but the last two parts are grammar.
fn category_of(index: usize, total: usize) -> &'static str {
    match total.saturating_sub(index) {
        1 => "story",
        2 => "vocab",
        _ => "grammar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScrapeError;

    #[test]
    fn categories_by_position() {
        let n = catalog::PARTS.len();
        assert_eq!(category_of(0, n), "grammar");
        assert_eq!(category_of(n - 3, n), "grammar");
        assert_eq!(category_of(n - 2, n), "vocab");
        assert_eq!(category_of(n - 1, n), "story");
    }

    #[test]
    fn part_rows_flatten_catalog_entries() {
        let row = PartRow { part: catalog::PARTS[15], kind: "vocab" };
        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(v["name"], "基本詞彙");
        assert_eq!(v["id"], 18);
        assert_eq!(v["kind"], "vocab");
    }

    #[test]
    fn urls_reject_unknown_part() {
        let err = list_urls("泰雅語", Some("不存在")).unwrap_err();
        assert!(matches!(err.downcast_ref::<ScrapeError>(), Some(ScrapeError::PartNotFound { .. })));
        assert!(list_urls("泰雅語", Some("長篇語料")).is_ok());
    }

    #[test]
    fn urls_resolve_the_dialect_first() {
        let err = list_urls("火星語", Some("不存在")).unwrap_err();
        assert!(matches!(err.downcast_ref::<ScrapeError>(), Some(ScrapeError::UnknownDialect(_))));
    }
}
