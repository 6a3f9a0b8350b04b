//! Scene-collection loading and the recursive chunk search.
//!
//! OBS serializes a scene collection as one JSON document; a VST 2.x filter
//! instance appears somewhere inside it as an object carrying `plugin_path`
//! (the DLL the host loads) and `chunk_data` (the plugin's opaque state,
//! base64). Nothing else about the document shape is assumed.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// DLL file name identifying a ReaFIR instance. Compared as a literal,
/// case-sensitive suffix of `plugin_path`; separators are not normalized.
const REAFIR_SUFFIX: &str = "reafir_standalone.dll";

/// Read and parse a scene collection file.
pub fn load_scene(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file \"{}\"", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Error decoding scene file \"{}\"", path.display()))
}

/// Collect every ReaFIR `chunk_data` payload in the document, in depth-first
/// pre-order. Borrows from the document, so matches are zero-copy.
pub fn find_chunk_data(root: &Value) -> Vec<&str> {
    let mut found = Vec::new();
    walk(root, &mut found);
    found
}

fn walk<'a>(value: &'a Value, found: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            let is_reafir = map
                .get("plugin_path")
                .and_then(Value::as_str)
                .is_some_and(|p| p.ends_with(REAFIR_SUFFIX));
            if is_reafir {
                // A matching entry without usable chunk data is simply skipped.
                if let Some(chunk) = map.get("chunk_data").and_then(Value::as_str) {
                    found.push(chunk);
                }
            }
            for v in map.values() {
                walk(v, found);
            }
        }
        Value::Array(items) => {
            for v in items {
                walk(v, found);
            }
        }
        // Scalars hold no nested entries.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_match_returns_its_chunk_data() {
        let doc = json!({
            "sources": [{
                "name": "mic",
                "filters": [{
                    "plugin_path": "C:/Program Files/VSTPlugins/reafir_standalone.dll",
                    "chunk_data": "AAAA"
                }]
            }]
        });
        assert_eq!(find_chunk_data(&doc), vec!["AAAA"]);
    }

    #[test]
    fn document_without_qualifying_entries_yields_nothing() {
        let doc = json!({
            "a": 1,
            "b": [true, null, "reafir_standalone.dll"],
            "c": {"plugin_path": "C:/VST/eq.dll", "chunk_data": "ZZZZ"}
        });
        assert!(find_chunk_data(&doc).is_empty());
    }

    #[test]
    fn matches_are_collected_in_document_order() {
        let doc = json!({
            "a": {"plugin_path": "x/reafir_standalone.dll", "chunk_data": "X"},
            "b": [{"plugin_path": "y/reafir_standalone.dll", "chunk_data": "Y"}]
        });
        assert_eq!(find_chunk_data(&doc), vec!["X", "Y"]);
    }

    #[test]
    fn parent_entry_is_collected_before_nested_ones() {
        let doc = json!({
            "plugin_path": "outer/reafir_standalone.dll",
            "chunk_data": "OUTER",
            "children": [{
                "plugin_path": "inner/reafir_standalone.dll",
                "chunk_data": "INNER"
            }]
        });
        assert_eq!(find_chunk_data(&doc), vec!["OUTER", "INNER"]);
    }

    #[test]
    fn missing_or_null_chunk_data_contributes_nothing() {
        let doc = json!([
            {"plugin_path": "foo/reafir_standalone.dll"},
            {"plugin_path": "bar/reafir_standalone.dll", "chunk_data": null}
        ]);
        assert!(find_chunk_data(&doc).is_empty());
    }

    #[test]
    fn suffix_match_is_literal_and_case_sensitive() {
        let doc = json!([
            {"plugin_path": "x/REAFIR_STANDALONE.DLL", "chunk_data": "upper"},
            {"plugin_path": "x\\reafir_standalone.dll", "chunk_data": "backslash"},
            {"plugin_path": "reafir_standalone.dll", "chunk_data": "bare"}
        ]);
        // The uppercase path does not qualify; separator style is irrelevant
        // because only the suffix is compared.
        assert_eq!(find_chunk_data(&doc), vec!["backslash", "bare"]);
    }

    #[test]
    fn non_string_chunk_data_is_skipped() {
        let doc = json!({"plugin_path": "x/reafir_standalone.dll", "chunk_data": 42});
        assert!(find_chunk_data(&doc).is_empty());
    }

    #[test]
    fn load_scene_reports_the_offending_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        let err = load_scene(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn load_scene_parses_valid_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        fs::write(&path, r#"{"sources": []}"#).unwrap();
        let doc = load_scene(&path).unwrap();
        assert!(doc.get("sources").is_some());
    }
}
