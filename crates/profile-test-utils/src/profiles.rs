//! JSON builders for profile documents and manifests.

use serde_json::{Map, Value, json};

/// A profile document with `type`, `name` and, when given, `inherits`.
///
/// `kind` is the raw `type` value (`"filament"`, `"machine_model"`, ...).
pub fn profile(kind: &str, name: &str, inherits: Option<&str>) -> Value {
    let mut doc = Map::new();
    doc.insert("type".to_string(), json!(kind));
    doc.insert("name".to_string(), json!(name));
    if let Some(parent) = inherits {
        doc.insert("inherits".to_string(), json!(parent));
    }
    Value::Object(doc)
}

/// Like [`profile`], plus `instantiation`.
pub fn instantiated(kind: &str, name: &str, inherits: Option<&str>, instantiation: bool) -> Value {
    with(
        profile(kind, name, inherits),
        "instantiation",
        json!(if instantiation { "true" } else { "false" }),
    )
}

/// Return `doc` with `key` set to `value`.
///
/// # Panics
/// Panics if `doc` is not an object.
pub fn with(mut doc: Value, key: &str, value: Value) -> Value {
    doc.as_object_mut()
        .expect("profile document must be an object")
        .insert(key.to_string(), value);
    doc
}

/// Return `doc` without `key`.
pub fn without(mut doc: Value, key: &str) -> Value {
    if let Some(obj) = doc.as_object_mut() {
        obj.remove(key);
    }
    doc
}

/// A manifest with a name and version and no lists.
pub fn manifest(vendor: &str, version: &str) -> Value {
    json!({
        "name": vendor,
        "version": version,
        "force_update": "0",
        "description": format!("{vendor} configurations"),
    })
}

/// A manifest list value from `(name, sub_path)` pairs.
pub fn records(items: &[(&str, &str)]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|(name, sub_path)| json!({"name": name, "sub_path": sub_path}))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_without_parent_has_no_inherits() {
        let doc = profile("filament", "base", None);
        assert!(doc.get("inherits").is_none());
        assert_eq!(doc["type"], "filament");
    }

    #[test]
    fn test_instantiated_uses_string_flag() {
        let doc = instantiated("machine", "X1C 0.4", Some("base"), true);
        assert_eq!(doc["instantiation"], "true");
        assert_eq!(doc["inherits"], "base");
    }

    #[test]
    fn test_with_and_without() {
        let doc = with(profile("filament", "a", None), "filament_id", json!("GFA00"));
        assert_eq!(doc["filament_id"], "GFA00");
        let doc = without(doc, "type");
        assert!(doc.get("type").is_none());
    }
}
