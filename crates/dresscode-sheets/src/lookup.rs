//! Safe nested lookup over the analysis tree
//!
//! Every lookup is total: a missing key, a non-mapping intermediate value, or
//! a null leaf all resolve to the caller's default.

use serde_json::Value;

/// Walk `path` through nested mappings
///
/// Returns `None` when any segment is missing, when an intermediate value is
/// not a mapping, or when the leaf is null.
///
/// # Examples
///
/// ```
/// use dresscode_sheets::lookup::lookup;
/// use serde_json::json;
///
/// let tree = json!({"uniform": {"standard_uniform": {"status": "指定あり"}}});
/// assert_eq!(
///     lookup(&tree, ["uniform", "standard_uniform", "status"]),
///     Some(&json!("指定あり"))
/// );
/// assert_eq!(lookup(&tree, ["uniform", "missing"]), None);
/// ```
pub fn lookup<'a, I, S>(value: &'a Value, path: I) -> Option<&'a Value>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut current = value;
    for segment in path {
        current = current.as_object()?.get(segment.as_ref())?;
    }
    (!current.is_null()).then_some(current)
}

/// Look up a scalar and render it as cell text, or `default`
pub fn lookup_text<I, S>(value: &Value, path: I, default: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lookup(value, path)
        .map(cell_text)
        .unwrap_or_else(|| default.to_string())
}

/// Look up a list and join its entries with `separator`
///
/// A scalar at the path is rendered as a one-element list. Null entries are
/// skipped.
pub fn lookup_joined<I, S>(value: &Value, path: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match lookup(value, path) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(cell_text)
            .collect::<Vec<_>>()
            .join(separator),
        Some(other) => cell_text(other),
        None => String::new(),
    }
}

/// Render a value as cell text
///
/// Strings are written as-is; numbers and booleans use their JSON spelling;
/// nested structures are written as compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> Value {
        json!({
            "general": {
                "revision_process": { "status": "規定あり", "evidence": null }
            },
            "appearance": {
                "hair": {
                    "prohibited_styles_modifications": { "items": ["パーマ", "染色"] }
                }
            },
            "count": 3,
            "flat": "not a mapping"
        })
    }

    #[test]
    fn test_lookup_present() {
        let tree = tree();
        assert_eq!(
            lookup_text(&tree, ["general", "revision_process", "status"], ""),
            "規定あり"
        );
    }

    #[test]
    fn test_lookup_null_leaf_uses_default() {
        let tree = tree();
        assert_eq!(lookup(&tree, ["general", "revision_process", "evidence"]), None);
        assert_eq!(
            lookup_text(&tree, ["general", "revision_process", "evidence"], "-"),
            "-"
        );
    }

    #[test]
    fn test_lookup_through_non_mapping() {
        let tree = tree();
        assert_eq!(lookup(&tree, ["flat", "status"]), None);
        assert_eq!(lookup(&tree, ["count", "x", "y"]), None);
    }

    #[test]
    fn test_lookup_on_non_object_root() {
        assert_eq!(lookup(&json!([1, 2]), ["a"]), None);
        assert_eq!(lookup_text(&Value::Null, ["a"], ""), "");
    }

    #[test]
    fn test_empty_path_returns_root() {
        let tree = tree();
        assert_eq!(lookup(&tree, Vec::<&str>::new()), Some(&tree));
    }

    #[test]
    fn test_non_string_scalars() {
        let tree = tree();
        assert_eq!(lookup_text(&tree, ["count"], ""), "3");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_joined_list() {
        let tree = tree();
        let path = ["appearance", "hair", "prohibited_styles_modifications", "items"];
        assert_eq!(lookup_joined(&tree, path, ", "), "パーマ, 染色");
    }

    #[test]
    fn test_joined_missing_and_scalar() {
        assert_eq!(lookup_joined(&json!({}), ["items"], ", "), "");
        assert_eq!(lookup_joined(&json!({"items": "A"}), ["items"], ", "), "A");
        assert_eq!(lookup_joined(&json!({"items": []}), ["items"], ", "), "");
        assert_eq!(
            lookup_joined(&json!({"items": ["A", null, "B"]}), ["items"], ", "),
            "A, B"
        );
    }
}
