use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::SOUND_BASE_URL;
use crate::errors::ScrapeError;

pub const NO_AUDIO: &str = "沒有音檔";
pub const NOT_FOUND: &str = "not found";

// src="./<path>.<ext>" and then nothing but tags other than td/th/tr up to the cell close.
// The audio markup carries no class we could select on, so this runs over the row's HTML.
const SOUND_PATTERN: &str =
    r#"src="\.([^"]*?(?:mp3|wav|ogg|wma))"[^<]*(?:</?(?:[^t/>]|t[^dhr>]|t[dhr]\w)[^>]*>[^<]*)*</td"#;

fn sound_regex() -> Result<&'static Regex, ScrapeError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SOUND_PATTERN))
        .as_ref()
        .map_err(|e| ScrapeError::Pattern(e.to_string()))
}

/// Raw sound path (everything after `src="."`) inside a serialized table row.
pub fn find_sound_path(row_html: &str) -> Result<Option<&str>, ScrapeError> {
    let re = sound_regex()?;
    Ok(re.captures(row_html).and_then(|caps| caps.get(1)).map(|m| m.as_str()))
}

/// Absolute sound URL for a raw path, or the no-audio sentinel.
///
/// Some files on the site lost the dot before their extension (`4-1-3mp3`);
/// when the last four characters hold no dot one is put back before the last three.
/// Paths are joined to the base as-is; page paths always start with `/`.
pub fn normalize(raw: Option<&str>) -> String {
    let Some(path) = raw else { return NO_AUDIO.to_string() };

    let chars: Vec<char> = path.chars().collect();
    let n = chars.len();
    let fixed = if n >= 3 && !chars[n.saturating_sub(4)..].contains(&'.') {
        let head: String = chars[..n - 3].iter().collect();
        let ext: String = chars[n - 3..].iter().collect();
        format!("{head}.{ext}")
    } else {
        path.to_string()
    };
    format!("{SOUND_BASE_URL}{fixed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_missing_extension_dot() {
        assert_eq!(normalize(Some("6/4-1-3mp3")), "https://ilrdc.tw/grammar6/4-1-3.mp3");
        assert_eq!(normalize(Some("/sound/2/A2-1-4wav")), "https://ilrdc.tw/grammar/sound/2/A2-1-4.wav");
    }

    #[test]
    fn keeps_wellformed_paths() {
        assert_eq!(normalize(Some("6/4-1-3.mp3")), "https://ilrdc.tw/grammar6/4-1-3.mp3");
        assert_eq!(normalize(Some("/sound/2/4-1-1.ogg")), "https://ilrdc.tw/grammar/sound/2/4-1-1.ogg");
    }

    #[test]
    fn absent_path_is_no_audio() {
        assert_eq!(normalize(None), "沒有音檔");
    }

    #[test]
    fn short_paths_are_joined_verbatim() {
        assert_eq!(normalize(Some("mp3")), "https://ilrdc.tw/grammar.mp3");
        assert_eq!(normalize(Some("ab")), "https://ilrdc.tw/grammarab");
    }

    #[test]
    fn pattern_compiles() {
        assert!(sound_regex().is_ok());
    }

    fn path(html: &str) -> Option<&str> {
        find_sound_path(html).unwrap()
    }

    #[test]
    fn finds_every_accepted_extension() {
        for ext in ["mp3", "wav", "ogg", "wma"] {
            let html = format!(r#"<tr><td class="ab">a</td><td><audio src="./sound/2/1-1.{ext}"></audio></td></tr>"#);
            let expected = format!("/sound/2/1-1.{ext}");
            assert_eq!(path(&html), Some(expected.as_str()));

            let broken = format!(r#"<tr><td><img src="./sound/2/1-1{ext}"></td></tr>"#);
            let expected = format!("/sound/2/1-1{ext}");
            assert_eq!(path(&broken), Some(expected.as_str()));
        }
    }

    #[test]
    fn nested_tags_starting_with_t_are_allowed() {
        let html = r#"<tr><td><audio src="./sound/2/1.mp3"><track kind="captions"></audio></td></tr>"#;
        assert_eq!(path(html), Some("/sound/2/1.mp3"));
        let html = r#"<tr><td><audio src="./sound/2/2.mp3"></audio><time>0:03</time></td></tr>"#;
        assert_eq!(path(html), Some("/sound/2/2.mp3"));
    }

    #[test]
    fn stops_at_table_structure() {
        assert_eq!(path(r#"<tr><td><audio src="./sound/2/1.mp3"></audio></tr><tr><td>x</td></tr>"#), None);
        assert_eq!(path(r#"<tr><td><audio src="./sound/2/1.mp3"></audio><th>x</th></td>"#), None);
    }

    #[test]
    fn ignores_other_files_and_unclosed_cells() {
        assert_eq!(path(r#"<tr><td><img src="./img/logo.png"></td></tr>"#), None);
        assert_eq!(path(r#"<tr><td class="ch">沒有</td></tr>"#), None);
        assert_eq!(path(r#"<div><audio src="./sound/1.mp3"></audio></div>"#), None);
    }

    #[test]
    fn end_to_end_with_normalizer() {
        let html = r#"<tr><td><audio src="./sound/6/4-1-3mp3"></audio></td></tr>"#;
        assert_eq!(normalize(path(html)), "https://ilrdc.tw/grammar/sound/6/4-1-3.mp3");
    }
}
