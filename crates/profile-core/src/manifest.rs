//! Vendor manifest (`<root>/<Vendor>.json`)
//!
//! The manifest is kept as an ordered JSON object rather than a fixed
//! struct: vendors carry keys this tool does not know about, and rewriting a
//! manifest must not reorder or drop them. Typed accessors cover the keys the
//! slicer reads.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use profile_fs::{NormalizedPath, json};

use crate::entry::{ManifestRecord, ProfileKind};
use crate::{Error, Result};

/// A vendor profile version such as `02.00.00.54`.
///
/// One to four dot-separated unsigned integers. Leading zeros are allowed
/// and the original text is kept for display.
#[derive(Debug, Clone)]
pub struct ProfileVersion {
    parts: Vec<u32>,
    text: String,
}

impl ProfileVersion {
    pub fn parts(&self) -> &[u32] {
        &self.parts
    }
}

impl FromStr for ProfileVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err("version is empty".to_string());
        }
        let parts = text
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(format!("'{part}' is not a number"));
                }
                part.parse::<u32>()
                    .map_err(|_| format!("'{part}' is out of range"))
            })
            .collect::<std::result::Result<Vec<u32>, String>>()?;
        if parts.len() > 4 {
            return Err(format!("expected at most 4 components, found {}", parts.len()));
        }
        Ok(Self {
            parts,
            text: text.to_string(),
        })
    }
}

impl fmt::Display for ProfileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for ProfileVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for ProfileVersion {}

impl PartialOrd for ProfileVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProfileVersion {
    /// Missing trailing components compare as zero.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| {
                let a = self.parts.get(i).copied().unwrap_or(0);
                let b = other.parts.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

/// A vendor's top-level manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorManifest {
    vendor: String,
    doc: Map<String, Value>,
}

impl VendorManifest {
    /// A fresh manifest holding only the vendor name.
    pub fn new(vendor: impl Into<String>) -> Self {
        let vendor = vendor.into();
        let mut doc = Map::new();
        doc.insert("name".to_string(), Value::String(vendor.clone()));
        Self { vendor, doc }
    }

    /// Wrap a parsed document. It must be a JSON object.
    pub fn from_value(vendor: impl Into<String>, value: Value) -> Result<Self> {
        let vendor = vendor.into();
        match value {
            Value::Object(doc) => Ok(Self { vendor, doc }),
            _ => Err(Error::InvalidManifest {
                vendor,
                reason: "top-level value is not a JSON object".to_string(),
            }),
        }
    }

    /// Load `<root>/<vendor>.json`.
    pub fn load(vendor: impl Into<String>, path: &NormalizedPath) -> Result<Self> {
        let value = json::load_value(path)?;
        Self::from_value(vendor, value)
    }

    /// The vendor this manifest belongs to (its file stem).
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// The manifest's own `name` key.
    pub fn name(&self) -> Option<&str> {
        self.doc.get("name").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.doc.get("description").and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.doc.get("url").and_then(Value::as_str)
    }

    /// `force_update` is stored as `"0"`/`"1"` by most vendors, sometimes as a bool.
    pub fn force_update(&self) -> bool {
        match self.doc.get("force_update") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "1" || s.eq_ignore_ascii_case("true"),
            Some(Value::Number(n)) => n.as_u64().is_some_and(|n| n != 0),
            _ => false,
        }
    }

    /// Raw `version` text, if present.
    pub fn version_text(&self) -> Option<&str> {
        self.doc.get("version").and_then(Value::as_str)
    }

    /// Parsed `version`. `Ok(None)` when the key is absent.
    pub fn version(&self) -> std::result::Result<Option<ProfileVersion>, String> {
        match self.doc.get("version") {
            None => Ok(None),
            Some(Value::String(s)) => s.parse().map(Some),
            Some(_) => Err("version is not a string".to_string()),
        }
    }

    /// Whether the manifest has a list for `kind`.
    pub fn has_list(&self, kind: ProfileKind) -> bool {
        self.doc.contains_key(kind.list_key())
    }

    /// Records listed for `kind`, in manifest order. A missing list is empty.
    pub fn records(&self, kind: ProfileKind) -> Result<Vec<ManifestRecord>> {
        let key = kind.list_key();
        let Some(list) = self.doc.get(key) else {
            return Ok(Vec::new());
        };
        let Value::Array(items) = list else {
            return Err(self.invalid(format!("'{key}' is not an array")));
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let name = item.get("name").and_then(Value::as_str);
                let sub_path = item.get("sub_path").and_then(Value::as_str);
                match (name, sub_path) {
                    (Some(name), Some(sub_path)) => Ok(ManifestRecord {
                        name: name.to_string(),
                        sub_path: sub_path.replace('\\', "/"),
                    }),
                    _ => Err(self.invalid(format!(
                        "'{key}[{i}]' needs string 'name' and 'sub_path'"
                    ))),
                }
            })
            .collect()
    }

    /// Replace the list for `kind`.
    ///
    /// An existing list is replaced in place. A new list is inserted before
    /// the first list that loads after it, or appended.
    pub fn set_records(&mut self, kind: ProfileKind, records: &[ManifestRecord]) {
        let list = Value::Array(
            records
                .iter()
                .map(|r| {
                    let mut obj = Map::new();
                    obj.insert("name".to_string(), Value::String(r.name.clone()));
                    obj.insert("sub_path".to_string(), Value::String(r.sub_path.clone()));
                    Value::Object(obj)
                })
                .collect(),
        );

        let key = kind.list_key();
        if let Some(slot) = self.doc.get_mut(key) {
            *slot = list;
            return;
        }

        let later_keys: Vec<&str> = ProfileKind::ALL
            .iter()
            .filter(|k| **k > kind)
            .map(|k| k.list_key())
            .collect();
        let mut rebuilt = Map::with_capacity(self.doc.len() + 1);
        let mut pending = Some(list);
        for (k, v) in std::mem::take(&mut self.doc) {
            if later_keys.contains(&k.as_str()) {
                if let Some(list) = pending.take() {
                    rebuilt.insert(key.to_string(), list);
                }
            }
            rebuilt.insert(k, v);
        }
        if let Some(list) = pending {
            rebuilt.insert(key.to_string(), list);
        }
        self.doc = rebuilt;
    }

    /// The underlying document.
    pub fn as_value(&self) -> Value {
        Value::Object(self.doc.clone())
    }

    /// Pretty JSON text as written to disk.
    pub fn render(&self) -> Result<String> {
        Ok(json::to_pretty_string(&self.doc)?)
    }

    /// Write the manifest atomically.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        let content = self.render()?;
        profile_fs::io::write_atomic(path, content.as_bytes())?;
        Ok(())
    }

    fn invalid(&self, reason: String) -> Error {
        Error::InvalidManifest {
            vendor: self.vendor.clone(),
            reason,
        }
    }
}
