//! Directory scanning of a vendor's profile files
//!
//! Every JSON file below `<vendor>/machine`, `<vendor>/process` and
//! `<vendor>/filament` becomes a [`ScannedProfile`]. A file that cannot be
//! read, is not a JSON object, or lacks a usable `name` becomes a
//! [`ScanFailure`] instead; the rest of the vendor is still scanned.

use serde::Serialize;
use serde_json::{Map, Value};

use profile_fs::{NormalizedPath, io, json};

use crate::Result;
use crate::entry::{Entry, ProfileKind};
use crate::tree::ProfileTree;

/// Top-level vendor directories that hold profile files.
pub const PROFILE_DIRECTORIES: [&str; 3] = ["machine", "process", "filament"];

/// State of a profile's `instantiation` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instantiation {
    /// `"true"`: a selectable profile
    Instantiated,
    /// `"false"`: an abstract base profile
    Abstract,
    /// The key is absent
    Missing,
    /// Any other value
    Invalid,
}

/// A profile file that parsed successfully.
#[derive(Debug, Clone)]
pub struct ScannedProfile {
    pub entry: Entry,
    /// Absolute location of the file
    pub path: NormalizedPath,
    /// The file had no `type` key; the kind comes from its directory
    pub kind_inferred: bool,
    /// All top-level keys of the file
    pub fields: Map<String, Value>,
}

impl ScannedProfile {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn kind(&self) -> ProfileKind {
        self.entry.kind
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A string field; empty strings count as absent.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn instantiation(&self) -> Instantiation {
        match self.fields.get("instantiation") {
            None => Instantiation::Missing,
            Some(Value::String(s)) if s == "true" => Instantiation::Instantiated,
            Some(Value::String(s)) if s == "false" => Instantiation::Abstract,
            Some(Value::Bool(true)) => Instantiation::Instantiated,
            Some(Value::Bool(false)) => Instantiation::Abstract,
            Some(_) => Instantiation::Invalid,
        }
    }

    pub fn is_instantiated(&self) -> bool {
        self.instantiation() == Instantiation::Instantiated
    }
}

/// A profile file that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub sub_path: String,
    pub reason: String,
}

/// Everything found in one vendor directory.
#[derive(Debug, Clone, Default)]
pub struct VendorScan {
    pub vendor: String,
    /// Parsed profiles, sorted by sub-path
    pub profiles: Vec<ScannedProfile>,
    /// Files that could not be used
    pub failures: Vec<ScanFailure>,
}

impl VendorScan {
    /// Profiles of one kind, in scan order.
    pub fn of_kind(&self, kind: ProfileKind) -> impl Iterator<Item = &ScannedProfile> {
        self.profiles.iter().filter(move |p| p.kind() == kind)
    }

    /// The resolver batch for one kind.
    pub fn entries(&self, kind: ProfileKind) -> Vec<Entry> {
        self.of_kind(kind).map(|p| p.entry.clone()).collect()
    }

    /// Number of profiles of one kind.
    pub fn count(&self, kind: ProfileKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn by_sub_path(&self, sub_path: &str) -> Option<&ScannedProfile> {
        self.profiles.iter().find(|p| p.entry.sub_path == sub_path)
    }

    pub fn find(&self, kind: ProfileKind, name: &str) -> Option<&ScannedProfile> {
        self.of_kind(kind).find(|p| p.name() == name)
    }

    /// Whether `sub_path` failed to parse.
    pub fn failed(&self, sub_path: &str) -> bool {
        self.failures.iter().any(|f| f.sub_path == sub_path)
    }
}

/// Scan all profile files of a vendor.
pub fn scan_vendor(tree: &ProfileTree, vendor: &str) -> Result<VendorScan> {
    tree.require_vendor(vendor)?;
    let vendor_dir = tree.vendor_dir(vendor);

    let mut scan = VendorScan {
        vendor: vendor.to_string(),
        ..VendorScan::default()
    };

    for dir_name in PROFILE_DIRECTORIES {
        let dir = vendor_dir.join(dir_name);
        for path in io::files_with_extension(&dir, "json")? {
            let Some(sub_path) = path.relative_to(&vendor_dir) else {
                continue;
            };
            match read_profile(&path, &sub_path, dir_name) {
                Ok(profile) => {
                    tracing::debug!(
                        vendor,
                        name = %profile.entry.name,
                        kind = %profile.entry.kind,
                        sub_path = %sub_path,
                        "Scanned profile"
                    );
                    scan.profiles.push(profile);
                }
                Err(reason) => {
                    tracing::warn!(vendor, sub_path = %sub_path, %reason, "Skipping profile file");
                    scan.failures.push(ScanFailure { sub_path, reason });
                }
            }
        }
    }

    scan.profiles.sort_by(|a, b| a.entry.sub_path.cmp(&b.entry.sub_path));
    scan.failures.sort_by(|a, b| a.sub_path.cmp(&b.sub_path));

    tracing::debug!(
        vendor,
        profiles = scan.profiles.len(),
        failures = scan.failures.len(),
        "Vendor scan complete"
    );
    Ok(scan)
}

fn read_profile(
    path: &NormalizedPath,
    sub_path: &str,
    dir_name: &str,
) -> std::result::Result<ScannedProfile, String> {
    let content = io::read_text(path).map_err(|e| e.to_string())?;
    let value = json::parse_value(path, &content).map_err(|e| match e {
        profile_fs::Error::JsonParse { message, .. } => format!("invalid JSON: {message}"),
        other => other.to_string(),
    })?;
    parse_profile(value, path.clone(), sub_path, dir_name)
}

/// Turn a parsed JSON document into a profile.
///
/// `dir_name` is the top-level vendor directory the file was found in and
/// decides the kind when the document has no `type`.
pub fn parse_profile(
    value: Value,
    path: NormalizedPath,
    sub_path: &str,
    dir_name: &str,
) -> std::result::Result<ScannedProfile, String> {
    let Value::Object(fields) = value else {
        return Err("top-level value is not a JSON object".to_string());
    };

    let name = match fields.get("name") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::String(_)) => return Err("'name' is empty".to_string()),
        Some(_) => return Err("'name' is not a string".to_string()),
        None => return Err("missing 'name'".to_string()),
    };

    let inherits = match fields.get("inherits") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err("'inherits' is not a string".to_string()),
    };

    let (kind, kind_inferred) = match fields.get("type") {
        Some(Value::String(s)) => (
            s.parse::<ProfileKind>().map_err(|e| e.to_string())?,
            false,
        ),
        Some(_) => return Err("'type' is not a string".to_string()),
        None => match ProfileKind::from_directory(dir_name) {
            Some(kind) => (kind, true),
            None => return Err(format!("missing 'type' outside a known directory ({dir_name})")),
        },
    };

    let entry = Entry {
        name,
        kind,
        inherits,
        sub_path: sub_path.to_string(),
    };

    Ok(ScannedProfile {
        entry,
        path,
        kind_inferred,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value, dir: &str) -> std::result::Result<ScannedProfile, String> {
        parse_profile(value, NormalizedPath::new("/x.json"), "x.json", dir)
    }

    #[test]
    fn test_parse_full_profile() {
        let profile = parse(
            json!({
                "type": "filament",
                "name": "Bambu PLA Basic @BBL X1C",
                "inherits": "Bambu PLA Basic @base",
                "instantiation": "true"
            }),
            "filament",
        )
        .unwrap();

        assert_eq!(profile.kind(), ProfileKind::Filament);
        assert_eq!(profile.entry.inherits.as_deref(), Some("Bambu PLA Basic @base"));
        assert!(!profile.kind_inferred);
        assert!(profile.is_instantiated());
    }

    #[test]
    fn test_missing_type_is_inferred_from_directory() {
        let profile = parse(json!({"name": "fdm_process_common"}), "process").unwrap();
        assert_eq!(profile.kind(), ProfileKind::Process);
        assert!(profile.kind_inferred);
    }

    #[test]
    fn test_machine_model_type_in_machine_dir() {
        let doc = json!({"type": "machine_model", "name": "Bambu Lab X1 Carbon"});
        let profile = parse(doc, "machine").unwrap();
        assert_eq!(profile.kind(), ProfileKind::MachineModel);
    }

    #[test]
    fn test_empty_inherits_is_root() {
        let profile = parse(json!({"name": "base", "inherits": ""}), "filament").unwrap();
        assert_eq!(profile.entry.inherits, None);
    }

    #[test]
    fn test_rejections() {
        assert!(parse(json!([1, 2]), "filament").is_err());
        assert!(parse(json!({"type": "filament"}), "filament").is_err());
        assert!(parse(json!({"name": 3}), "filament").is_err());
        assert!(parse(json!({"name": "a", "inherits": ["b"]}), "filament").is_err());
        assert!(parse(json!({"name": "a", "type": "printer"}), "filament").is_err());
    }

    #[test]
    fn test_instantiation_states() {
        let with = |v: Value| parse(json!({"name": "a", "instantiation": v}), "filament").unwrap();
        assert_eq!(with(json!("false")).instantiation(), Instantiation::Abstract);
        assert_eq!(with(json!(true)).instantiation(), Instantiation::Instantiated);
        assert_eq!(with(json!("yes")).instantiation(), Instantiation::Invalid);
        assert_eq!(
            parse(json!({"name": "a"}), "filament").unwrap().instantiation(),
            Instantiation::Missing
        );
    }
}
