//! Ordering declaration reader.
//!
//! Each traversable directory carries a JSON object (`_meta.json` by default)
//! whose key order is the reading order of that directory's entries:
//!
//! ```json
//! {
//!   "index": "Overview",
//!   "guides": {},
//!   "---": { "type": "separator" },
//!   "github": { "title": "GitHub", "href": "https://github.com/example" }
//! }
//! ```
//!
//! Descriptors are parsed once into [`EntryKind`]; only [`EntryKind::Content`]
//! entries are handed to the collector.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use corpusgen_shared::{CorpusError, EntryKind, Result};

/// A parsed ordering declaration, in declaration order.
#[derive(Debug, Clone)]
pub struct MetaFile {
    /// Path of the declaration file.
    pub path: PathBuf,
    /// Every declared entry with its classification.
    pub entries: Vec<(String, EntryKind)>,
}

impl MetaFile {
    /// Names of the navigable entries, in declaration order.
    pub fn navigable(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, kind)| kind.is_navigable())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Return the navigable entry names declared for `dir`.
///
/// A directory without a declaration yields an empty list.
pub fn read_meta(dir: &Path, meta_file: &str) -> Result<Vec<String>> {
    Ok(load_meta(dir, meta_file)?
        .map(|meta| meta.navigable())
        .unwrap_or_default())
}

/// Load and classify the declaration for `dir`, if there is one.
pub fn load_meta(dir: &Path, meta_file: &str) -> Result<Option<MetaFile>> {
    let path = dir.join(meta_file);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            trace!(dir = %dir.display(), "no ordering declaration");
            return Ok(None);
        }
        Err(e) => return Err(CorpusError::io(&path, e)),
    };

    let entries = parse_meta(&path, &content)?;
    debug!(path = %path.display(), entries = entries.len(), "read ordering declaration");

    Ok(Some(MetaFile { path, entries }))
}

/// Parse declaration text. `path` is only used for error reporting.
pub fn parse_meta(path: &Path, content: &str) -> Result<Vec<(String, EntryKind)>> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| CorpusError::meta(path, e.to_string()))?;

    let Value::Object(map) = value else {
        return Err(CorpusError::meta(path, "top level must be a JSON object"));
    };

    Ok(map
        .into_iter()
        .map(|(name, descriptor)| {
            let kind = classify(&descriptor);
            (name, kind)
        })
        .collect())
}

/// Classify one entry descriptor.
///
/// Only object descriptors can mark an entry as non-emitting; bare strings
/// (title shorthand) and any other value are content entries.
pub fn classify(descriptor: &Value) -> EntryKind {
    let Value::Object(fields) = descriptor else {
        return EntryKind::Content;
    };

    if fields.get("type").and_then(Value::as_str) == Some("separator") {
        return EntryKind::Separator;
    }

    match link_target(fields) {
        Some(href) => EntryKind::ExternalLink { href },
        None => EntryKind::Content,
    }
}

/// The `href` field, if present and truthy.
fn link_target(fields: &Map<String, Value>) -> Option<String> {
    match fields.get("href")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{temp_dir, write_file};
    use serde_json::json;

    #[test]
    fn classify_descriptor_kinds() {
        assert_eq!(classify(&json!({})), EntryKind::Content);
        assert_eq!(classify(&json!("Introduction")), EntryKind::Content);
        assert_eq!(classify(&json!({"title": "API", "type": "page"})), EntryKind::Content);
        assert_eq!(classify(&json!({"type": "separator"})), EntryKind::Separator);
        assert_eq!(
            classify(&json!({"title": "GitHub", "href": "https://github.com/0xSplits"})),
            EntryKind::ExternalLink {
                href: "https://github.com/0xSplits".into()
            }
        );
    }

    #[test]
    fn classify_ignores_falsy_href() {
        assert_eq!(classify(&json!({"href": ""})), EntryKind::Content);
        assert_eq!(classify(&json!({"href": null})), EntryKind::Content);
        assert_eq!(classify(&json!({"href": false})), EntryKind::Content);
    }

    #[test]
    fn separator_wins_over_href() {
        assert_eq!(
            classify(&json!({"type": "separator", "href": "https://x.example"})),
            EntryKind::Separator
        );
    }

    #[test]
    fn parse_meta_preserves_declaration_order() {
        let content = r#"{"zeta": {}, "alpha": {}, "---": {"type": "separator"}, "mid": "Mid"}"#;
        let entries = parse_meta(Path::new("_meta.json"), content).unwrap();
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "---", "mid"]);
    }

    #[test]
    fn parse_meta_rejects_invalid_json() {
        let err = parse_meta(Path::new("pages/_meta.json"), "{ not json").unwrap_err();
        assert!(matches!(err, CorpusError::Meta { .. }));
        assert!(err.to_string().contains("pages/_meta.json"));
    }

    #[test]
    fn parse_meta_rejects_non_object() {
        let err = parse_meta(Path::new("_meta.json"), r#"["a", "b"]"#).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn read_meta_drops_non_emitting_entries() {
        let tmp = temp_dir();
        write_file(
            &tmp,
            "_meta.json",
            r#"{"intro": {}, "sep": {"type":"separator"}, "external": {"href":"https://x.example"}, "guides": {}}"#,
        );

        let names = read_meta(&tmp, "_meta.json").unwrap();
        assert_eq!(names, vec!["intro".to_string(), "guides".to_string()]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn read_meta_missing_file_is_empty() {
        let tmp = temp_dir();
        assert!(read_meta(&tmp, "_meta.json").unwrap().is_empty());
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn load_meta_keeps_all_entries() {
        let tmp = temp_dir();
        write_file(&tmp, "nav.json", r#"{"a": {}, "b": {"type": "separator"}}"#);

        let meta = load_meta(&tmp, "nav.json").unwrap().unwrap();
        assert_eq!(meta.entries.len(), 2);
        assert_eq!(meta.navigable(), vec!["a".to_string()]);
        assert_eq!(meta.path, tmp.join("nav.json"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
