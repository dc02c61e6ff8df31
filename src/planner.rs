use serde::Serialize;

use crate::catalog;
use crate::errors::ScrapeError;

/// One concrete fetch target: a (dialect, part) pair and its page URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    pub dialect: &'static str,
    pub part: &'static str,
    #[serde(skip)]
    pub part_id: u32,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    One(RequestDescriptor),
    All(Vec<RequestDescriptor>),
}

impl Plan {
    pub fn into_vec(self) -> Vec<RequestDescriptor> {
        match self {
            Plan::One(r) => vec![r],
            Plan::All(v) => v,
        }
    }
}

/// Every part of the catalog for `dialect`, in catalog order.
pub fn plan_all(dialect: &str) -> Result<Vec<RequestDescriptor>, ScrapeError> {
    let dialect_id = catalog::dialect_id(dialect)?;
    // name is re-resolved from the id so descriptors always carry the canonical spelling
    let dialect_name = catalog::dialect_name(dialect_id)
        .ok_or_else(|| ScrapeError::UnknownDialect(dialect.to_string()))?;

    let requests = catalog::all_part_ids()
        .into_iter()
        .filter_map(|part_id| {
            catalog::part_name(part_id).map(|part| RequestDescriptor {
                dialect: dialect_name,
                part,
                part_id,
                url: catalog::build_url(dialect_id, part_id),
            })
        })
        .collect();
    Ok(requests)
}

pub fn plan(dialect: &str, part: Option<&str>) -> Result<Plan, ScrapeError> {
    let all = plan_all(dialect)?;
    match part {
        None => Ok(Plan::All(all)),
        Some(name) => find_part(all, dialect, name).map(Plan::One),
    }
}

/// Resolve the part name in the catalog, then scan an already built request list for it.
pub fn find_part(
    requests: Vec<RequestDescriptor>,
    dialect: &str,
    part: &str,
) -> Result<RequestDescriptor, ScrapeError> {
    let not_found = || ScrapeError::PartNotFound { dialect: dialect.to_string(), part: part.to_string() };
    let wanted = catalog::part_id(part).ok_or_else(not_found)?;
    requests.into_iter().find(|r| r.part_id == wanted).ok_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn full_plan_has_one_request_per_part() {
        let Plan::All(reqs) = plan("布農語", None).unwrap() else { panic!("expected full plan") };
        assert_eq!(reqs.len(), 17);
        let urls: HashSet<&str> = reqs.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls.len(), 17);
        let names: Vec<&str> = reqs.iter().map(|r| r.part).collect();
        let catalog_names: Vec<&str> = catalog::PARTS.iter().map(|p| p.name).collect();
        assert_eq!(names, catalog_names);
        assert!(reqs.iter().all(|r| r.dialect == "布農語"));
        assert_eq!(reqs[0].url, "http://ilrdc.tw/grammar/index.php?l=6&p=3");
    }

    #[test]
    fn named_part_narrows_to_one() {
        let Plan::One(req) = plan("泰雅語", Some("基本詞彙")).unwrap() else { panic!("expected one") };
        assert_eq!(req.part, "基本詞彙");
        assert_eq!(req.part_id, 18);
        assert_eq!(req.url, "http://ilrdc.tw/grammar/index.php?l=2&p=18");
    }

    #[test]
    fn unknown_part_fails_fast() {
        let err = plan("泰雅語", Some("火星語法")).unwrap_err();
        assert!(matches!(err, ScrapeError::PartNotFound { .. }));
    }

    #[test]
    fn unknown_dialect_fails_before_parts() {
        let err = plan("nope", Some("基本詞彙")).unwrap_err();
        assert!(matches!(err, ScrapeError::UnknownDialect(_)));
    }
}
