// src/ingest/normalize.rs
//! Field-by-field helpers for decoding untrusted feed records.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::Value;

/// Decode HTML entities, strip tags, collapse whitespace.
pub fn clean_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[a-z][^>]*>").expect("tag regex"));
    let stripped = re_tags.replace_all(&decoded, " ");

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("ws regex"));
    re_ws.replace_all(&stripped, " ").trim().to_string()
}

/// Walk nested objects along `path`; `None` if any hop is not an object.
pub fn lookup<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(raw, |v, key| v.as_object().and_then(|o| o.get(*key)))
}

/// A string field, trimmed; non-strings and blank strings count as absent.
pub fn str_at(raw: &Value, path: &[&str]) -> Option<String> {
    lookup(raw, path)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Like [`str_at`], but the value is human text and gets [`clean_text`].
pub fn text_at(raw: &Value, path: &[&str]) -> Option<String> {
    lookup(raw, path)
        .and_then(Value::as_str)
        .map(clean_text)
        .filter(|s| !s.is_empty())
}
