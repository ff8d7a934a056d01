//! [`TestProfiles`] builder for profile tree scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// A temporary profiles root with helpers for writing vendors.
///
/// # Example
///
/// ```rust,no_run
/// use profile_test_utils::TestProfiles;
/// use profile_test_utils::profiles::{manifest, profile};
///
/// let tree = TestProfiles::new();
/// tree.write_manifest("Voron", manifest("Voron", "01.00.00.00"));
/// tree.write_profile("Voron", "process/base.json", profile("process", "base", None));
/// tree.assert_file_exists("Voron/process/base.json");
/// ```
pub struct TestProfiles {
    temp_dir: TempDir,
}

impl Default for TestProfiles {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProfiles {
    /// Create an empty profiles root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// The profiles root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` below the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `<root>/<vendor>.json` and create `<root>/<vendor>/`.
    pub fn write_manifest(&self, vendor: &str, manifest: Value) {
        fs::create_dir_all(self.root().join(vendor)).unwrap();
        self.write_json(&format!("{vendor}.json"), &manifest);
    }

    /// Write a profile at `<root>/<vendor>/<sub_path>`.
    pub fn write_profile(&self, vendor: &str, sub_path: &str, profile: Value) {
        self.write_json(&format!("{vendor}/{sub_path}"), &profile);
    }

    /// Write raw text at `rel`, creating parent directories.
    pub fn write_raw(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", path.display()));
    }

    fn write_json(&self, rel: &str, value: &Value) {
        let text = serde_json::to_string_pretty(value).unwrap();
        self.write_raw(rel, &text);
    }

    /// Read and parse a JSON file below the root.
    ///
    /// # Panics
    /// Panics if the file is missing or not valid JSON.
    pub fn read_json(&self, rel: &str) -> Value {
        let path = self.path(rel);
        let text = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        serde_json::from_str(&text)
            .unwrap_or_else(|e| panic!("Invalid JSON in {}: {e}", path.display()))
    }

    /// Raw text of a file below the root.
    pub fn read_text(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Names listed under `list_key` in a vendor manifest, in order.
    pub fn listed_names(&self, vendor: &str, list_key: &str) -> Vec<String> {
        self.read_json(&format!("{vendor}.json"))[list_key]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item["name"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Assert that `rel` exists below the root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{manifest, profile, records, with};

    #[test]
    fn test_write_manifest_creates_vendor_dir() {
        let tree = TestProfiles::new();
        tree.write_manifest("Voron", manifest("Voron", "1.0"));
        assert!(tree.path("Voron").is_dir());
        assert_eq!(tree.read_json("Voron.json")["name"], "Voron");
    }

    #[test]
    fn test_listed_names() {
        let tree = TestProfiles::new();
        tree.write_manifest(
            "Voron",
            with(
                manifest("Voron", "1.0"),
                "process_list",
                records(&[("a", "process/a.json"), ("b", "process/b.json")]),
            ),
        );
        assert_eq!(tree.listed_names("Voron", "process_list"), ["a", "b"]);
        assert!(tree.listed_names("Voron", "filament_list").is_empty());
    }

    #[test]
    fn test_write_profile_nested() {
        let tree = TestProfiles::new();
        tree.write_profile(
            "Voron",
            "filament/Generic/pla.json",
            profile("filament", "pla", None),
        );
        tree.assert_file_exists("Voron/filament/Generic/pla.json");
    }
}
