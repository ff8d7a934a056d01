//! Vendor discovery under a profiles root
//!
//! A profiles root looks like:
//!
//! ```text
//! resources/profiles/
//!   BBL.json            <- vendor manifest
//!   BBL/
//!     machine/...
//!     process/...
//!     filament/...
//!   Creality.json
//!   Creality/
//! ```

use std::fs;

use profile_fs::NormalizedPath;

use crate::{Error, Result};

/// The directory holding all vendor manifests and vendor directories.
#[derive(Debug, Clone)]
pub struct ProfileTree {
    root: NormalizedPath,
}

impl ProfileTree {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    /// Open a tree, failing when the root directory does not exist.
    pub fn open(root: impl Into<NormalizedPath>) -> Result<Self> {
        let tree = Self::new(root);
        if !tree.root.is_dir() {
            return Err(Error::RootNotFound {
                path: tree.root.to_string(),
            });
        }
        Ok(tree)
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Path of `<root>/<vendor>.json`.
    pub fn manifest_path(&self, vendor: &str) -> NormalizedPath {
        self.root.join(&format!("{vendor}.json"))
    }

    /// Path of `<root>/<vendor>/`.
    pub fn vendor_dir(&self, vendor: &str) -> NormalizedPath {
        self.root.join(vendor)
    }

    /// Whether the vendor has a manifest or a directory.
    pub fn has_vendor(&self, vendor: &str) -> bool {
        self.manifest_path(vendor).is_file() || self.vendor_dir(vendor).is_dir()
    }

    /// Fail with `VendorNotFound` unless the vendor exists.
    pub fn require_vendor(&self, vendor: &str) -> Result<()> {
        if self.has_vendor(vendor) {
            Ok(())
        } else {
            Err(Error::VendorNotFound {
                vendor: vendor.to_string(),
                root: self.root.to_string(),
            })
        }
    }

    /// Vendor names, sorted.
    ///
    /// A vendor is a `<Name>.json` file with a sibling `<Name>/` directory.
    /// Stray JSON files at the root (blacklists, indexes) are ignored.
    pub fn vendors(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(self.root.to_native())
            .map_err(|e| profile_fs::Error::io(self.root.to_native(), e))?;

        let mut vendors = Vec::new();
        for entry in entries.flatten() {
            let path = NormalizedPath::new(entry.path());
            if path.is_hidden() || !path.is_file() || path.extension() != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem() else {
                continue;
            };
            if self.vendor_dir(name).is_dir() {
                vendors.push(name.to_string());
            } else {
                tracing::debug!(file = %path, "Skipping root JSON without vendor directory");
            }
        }

        vendors.sort();
        Ok(vendors)
    }
}
