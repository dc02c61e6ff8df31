use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GrammarRecord {
    pub id: String,
    pub dialect: String,
    pub chinese_translation: String,
    pub sound_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VocabularyRecord {
    pub vocab: String,
    pub chinese_translation: String,
    pub sound_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoryRecord {
    pub dialect: String,
    pub chinese_translation: String,
    pub sound_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoryGroup {
    pub title: String,
    pub records: Vec<StoryRecord>,
}

/// Row view used by the table writer.
pub trait TableRow {
    fn id(&self) -> Option<&str> { None }
    fn dialect_text(&self) -> &str;
    fn translation(&self) -> &str;
    fn sound_url(&self) -> &str;
}

impl TableRow for GrammarRecord {
    fn id(&self) -> Option<&str> { Some(&self.id) }
    fn dialect_text(&self) -> &str { &self.dialect }
    fn translation(&self) -> &str { &self.chinese_translation }
    fn sound_url(&self) -> &str { &self.sound_url }
}

impl TableRow for VocabularyRecord {
    fn dialect_text(&self) -> &str { &self.vocab }
    fn translation(&self) -> &str { &self.chinese_translation }
    fn sound_url(&self) -> &str { &self.sound_url }
}

impl TableRow for StoryRecord {
    fn dialect_text(&self) -> &str { &self.dialect }
    fn translation(&self) -> &str { &self.chinese_translation }
    fn sound_url(&self) -> &str { &self.sound_url }
}

/// Result for one requested part. An empty page is reported as a message, not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PartOutcome<R> {
    Found { part: String, records: Vec<R> },
    Empty { part: String, message: String },
}

impl<R> PartOutcome<R> {
    pub fn part(&self) -> &str {
        match self {
            PartOutcome::Found { part, .. } | PartOutcome::Empty { part, .. } => part,
        }
    }

    pub fn record_count(&self) -> usize {
        match self {
            PartOutcome::Found { records, .. } => records.len(),
            PartOutcome::Empty { .. } => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Collected<R> {
    One(PartOutcome<R>),
    Many(Vec<PartOutcome<R>>),
}

impl<R> Collected<R> {
    pub fn outcomes(&self) -> &[PartOutcome<R>] {
        match self {
            Collected::One(o) => std::slice::from_ref(o),
            Collected::Many(v) => v,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Downloaded {
    Grammar(Collected<GrammarRecord>),
    Vocabulary(Collected<VocabularyRecord>),
    Story(Vec<StoryGroup>),
}

impl Downloaded {
    pub fn record_count(&self) -> usize {
        match self {
            Downloaded::Grammar(c) => c.outcomes().iter().map(PartOutcome::record_count).sum(),
            Downloaded::Vocabulary(c) => c.outcomes().iter().map(PartOutcome::record_count).sum(),
            Downloaded::Story(groups) => groups.iter().map(|g| g.records.len()).sum(),
        }
    }
}

// Plan / result envelope payloads
#[derive(Serialize)]
pub struct DownloadPlan {
    pub dialect: String,
    pub kind: &'static str,
    pub requests: Vec<crate::planner::RequestDescriptor>,
}

#[derive(Serialize)]
pub struct DownloadApply {
    pub dialect: String,
    pub kind: &'static str,
    pub records: usize,
    pub files: Vec<String>,
    pub messages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_serialize_without_tags() {
        let found: PartOutcome<VocabularyRecord> = PartOutcome::Found {
            part: "基本詞彙".into(),
            records: vec![VocabularyRecord {
                vocab: "aw".into(),
                chinese_translation: "好的；是的".into(),
                sound_url: "沒有音檔".into(),
            }],
        };
        let v = serde_json::to_value(&found).unwrap();
        assert_eq!(v["part"], "基本詞彙");
        assert_eq!(v["records"][0]["vocab"], "aw");

        let empty: PartOutcome<VocabularyRecord> =
            PartOutcome::Empty { part: "基本詞彙".into(), message: "no data".into() };
        let v = serde_json::to_value(&empty).unwrap();
        assert_eq!(v["message"], "no data");
        assert!(v.get("records").is_none());
    }

    #[test]
    fn record_count_skips_empty_parts() {
        let c: Collected<GrammarRecord> = Collected::Many(vec![
            PartOutcome::Empty { part: "a".into(), message: "m".into() },
            PartOutcome::Found {
                part: "b".into(),
                records: vec![GrammarRecord {
                    id: "(4-1)a.".into(),
                    dialect: "x".into(),
                    chinese_translation: "y".into(),
                    sound_url: "z".into(),
                }],
            },
        ]);
        assert_eq!(Downloaded::Grammar(c).record_count(), 1);
    }
}
