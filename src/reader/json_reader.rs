use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

use crate::models::{RawRow, RowSet, SourceKind};

/// Keys checked, in order, for the document list when the root is an object.
const LIST_KEYS: &[&str] = &["products", "items", "data"];

/// Normalizes a JSON tree of any accepted shape into a `RowSet`: a bare
/// array, an object wrapping the list under `products`/`items`/`data`, a bare
/// object (one document), or a bare primitive (one document under `value`).
pub fn read_json(root: &Value) -> Result<RowSet> {
    let documents: Vec<&Value> = match root {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => {
            let wrapped = LIST_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(|v| v.as_array()));

            match wrapped {
                Some(items) => items.iter().collect(),
                None => vec![root],
            }
        }
        _ => vec![root],
    };

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for document in documents {
        let row = flatten_document(document);

        for key in row.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }

        rows.push(row);
    }

    Ok(RowSet {
        source: SourceKind::Json,
        columns,
        rows,
    })
}

pub fn read_json_path(path: &Path) -> Result<RowSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;
    let root: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))?;
    read_json(&root)
}

/// One level of flattening: scalars are stringified, arrays of scalars are
/// joined with spaces (so tag lists classify well), anything deeper is
/// carried as compact JSON text.
fn flatten_document(document: &Value) -> RawRow {
    match document {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| (key.clone(), value_to_string(value)))
            .collect(),
        other => {
            let mut row = RawRow::new();
            row.insert("value".to_string(), value_to_string(other));
            row
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => {
            if items.iter().all(|v| !v.is_array() && !v.is_object()) {
                items
                    .iter()
                    .map(value_to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            } else {
                value.to_string()
            }
        }
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let root = json!([
            {"id": "P1", "name": "Cap", "price": 199},
            {"id": "P2", "name": "Hat", "price": 299, "brand": "Acme"}
        ]);

        let set = read_json(&root).unwrap();
        assert_eq!(set.source, SourceKind::Json);
        assert_eq!(set.rows.len(), 2);
        assert_eq!(set.rows[0]["price"], "199");
        // Union of keys in first-seen order.
        assert_eq!(set.columns, vec!["id", "name", "price", "brand"]);
    }

    #[test]
    fn test_wrapped_lists() {
        for key in ["products", "items", "data"] {
            let root = json!({ key: [{"id": "P1"}] });
            let set = read_json(&root).unwrap();
            assert_eq!(set.rows.len(), 1, "shape {key}");
        }
    }

    #[test]
    fn test_bare_object_is_single_document() {
        let root = json!({"id": "P1", "name": "Cap"});
        let set = read_json(&root).unwrap();

        assert_eq!(set.rows.len(), 1);
        assert_eq!(set.rows[0]["name"], "Cap");
    }

    #[test]
    fn test_bare_primitive() {
        let root = json!("hello");
        let set = read_json(&root).unwrap();

        assert_eq!(set.rows.len(), 1);
        assert_eq!(set.rows[0]["value"], "hello");
    }

    #[test]
    fn test_scalar_arrays_join_with_spaces() {
        let root = json!([{"id": "P1", "tags": ["summer", "sale"]}]);
        let set = read_json(&root).unwrap();

        assert_eq!(set.rows[0]["tags"], "summer sale");
    }

    #[test]
    fn test_nested_objects_carried_as_json_text() {
        let root = json!([{"id": "P1", "meta": {"weight": 2}}]);
        let set = read_json(&root).unwrap();

        assert_eq!(set.rows[0]["meta"], r#"{"weight":2}"#);
    }

    #[test]
    fn test_nulls_become_empty_strings() {
        let root = json!([{"id": "P1", "brand": null}]);
        let set = read_json(&root).unwrap();

        assert_eq!(set.rows[0]["brand"], "");
    }
}
