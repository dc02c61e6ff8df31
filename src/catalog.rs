use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::errors::ScrapeError;

pub const BASE_URL: &str = "http://ilrdc.tw/grammar";
pub const SOUND_BASE_URL: &str = "https://ilrdc.tw/grammar";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Dialect {
    pub name: &'static str,
    pub id: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ContentPart {
    pub name: &'static str,
    pub id: u32,
}

pub const DIALECTS: [Dialect; 10] = [
    Dialect { name: "泰雅語", id: 2 },
    Dialect { name: "邵語", id: 4 },
    Dialect { name: "賽德克語", id: 5 },
    Dialect { name: "布農語", id: 6 },
    Dialect { name: "魯凱語", id: 8 },
    Dialect { name: "噶瑪蘭語", id: 10 },
    Dialect { name: "卑南語", id: 12 },
    Dialect { name: "雅美語", id: 13 },
    Dialect { name: "撒奇萊雅語", id: 14 },
    Dialect { name: "卡那卡那富語", id: 15 },
];

// Order matters: the last two entries are vocabulary and long-form text.
pub const PARTS: [ContentPart; 17] = [
    ContentPart { name: "詞彙與構詞", id: 3 },
    ContentPart { name: "基本句型及詞序", id: 4 },
    ContentPart { name: "格謂標記與代名詞系統", id: 5 },
    ContentPart { name: "焦點與時貌語氣系統", id: 6 },
    ContentPart { name: "存在句所有句方位句結構", id: 7 },
    ContentPart { name: "祈使句結構", id: 8 },
    ContentPart { name: "使動結構", id: 9 },
    ContentPart { name: "否定句結構", id: 10 },
    ContentPart { name: "疑問句結構", id: 11 },
    ContentPart { name: "連動結構", id: 12 },
    ContentPart { name: "補語結構", id: 13 },
    ContentPart { name: "修飾結構", id: 14 },
    ContentPart { name: "並列結構", id: 15 },
    ContentPart { name: "其他結構", id: 16 },
    ContentPart { name: "標點符號", id: 17 },
    ContentPart { name: "基本詞彙", id: 18 },
    ContentPart { name: "長篇語料", id: 19 },
];

struct Index {
    dialect_by_name: HashMap<&'static str, u32>,
    dialect_by_id: HashMap<u32, &'static str>,
    part_by_name: HashMap<&'static str, u32>,
    part_by_id: HashMap<u32, &'static str>,
}

fn index() -> &'static Index {
    static INDEX: OnceLock<Index> = OnceLock::new();
    INDEX.get_or_init(|| Index {
        dialect_by_name: DIALECTS.iter().map(|d| (d.name, d.id)).collect(),
        dialect_by_id: DIALECTS.iter().map(|d| (d.id, d.name)).collect(),
        part_by_name: PARTS.iter().map(|p| (p.name, p.id)).collect(),
        part_by_id: PARTS.iter().map(|p| (p.id, p.name)).collect(),
    })
}

pub fn dialect_id(name: &str) -> Result<u32, ScrapeError> {
    index()
        .dialect_by_name
        .get(name.trim())
        .copied()
        .ok_or_else(|| ScrapeError::UnknownDialect(name.to_string()))
}

pub fn dialect_name(id: u32) -> Option<&'static str> {
    index().dialect_by_id.get(&id).copied()
}

pub fn part_id(name: &str) -> Option<u32> {
    index().part_by_name.get(name.trim()).copied()
}

pub fn part_name(id: u32) -> Option<&'static str> {
    index().part_by_id.get(&id).copied()
}

/// Part ids in declaration order.
pub fn all_part_ids() -> Vec<u32> {
    PARTS.iter().map(|p| p.id).collect()
}

pub fn build_url(dialect_id: u32, part_id: u32) -> String {
    format!("{}/index.php?l={}&p={}", BASE_URL.trim_end_matches('/'), dialect_id, part_id)
}
