//! Manifest generation
//!
//! Rebuilds a vendor manifest's record lists from the profile files on disk,
//! in an order the slicer can load. Keys other than the selected lists are
//! left untouched.

use std::collections::BTreeMap;

use similar::{ChangeTag, TextDiff};

use profile_fs::{NormalizedPath, io, json};

use crate::Result;
use crate::entry::ProfileKind;
use crate::manifest::VendorManifest;
use crate::resolver::{Resolution, UnresolvedPolicy, resolve};
use crate::scan::{ScanFailure, scan_vendor};
use crate::tree::ProfileTree;

/// Options for [`ManifestGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub policy: UnresolvedPolicy,
    /// Lists to regenerate
    pub kinds: Vec<ProfileKind>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            policy: UnresolvedPolicy::default(),
            kinds: ProfileKind::ALL.to_vec(),
        }
    }
}

/// Outcome of generating one vendor's manifest. Nothing is written yet.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub vendor: String,
    /// Where the manifest lives
    pub path: NormalizedPath,
    pub resolutions: BTreeMap<ProfileKind, Resolution>,
    pub failures: Vec<ScanFailure>,
    pub manifest: VendorManifest,
    /// Manifest text before generation; `None` when there was no manifest
    pub previous: Option<String>,
    pub rendered: String,
}

impl GenerateReport {
    /// Whether the rendered manifest differs from what is on disk.
    pub fn changed(&self) -> bool {
        self.previous.as_deref() != Some(self.rendered.as_str())
    }

    pub fn has_cycles(&self) -> bool {
        self.resolutions.values().any(Resolution::has_cycles)
    }

    /// Number of entries with unmet dependencies across all lists.
    pub fn unresolved_count(&self) -> usize {
        self.resolutions.values().map(|r| r.unresolved.len()).sum()
    }

    /// Unified diff from the previous manifest to the rendered one.
    pub fn unified_diff(&self) -> String {
        let old = self.previous.as_deref().unwrap_or("");
        let file = format!("{}.json", self.vendor);
        TextDiff::from_lines(old, self.rendered.as_str())
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{file}"), &format!("b/{file}"))
            .to_string()
    }

    /// Lines (inserted, deleted) by the change.
    pub fn line_changes(&self) -> (usize, usize) {
        let old = self.previous.as_deref().unwrap_or("");
        let diff = TextDiff::from_lines(old, self.rendered.as_str());
        diff.iter_all_changes()
            .fold((0, 0), |(ins, del), change| match change.tag() {
                ChangeTag::Insert => (ins + 1, del),
                ChangeTag::Delete => (ins, del + 1),
                ChangeTag::Equal => (ins, del),
            })
    }
}

/// Regenerates manifest lists for vendors of one tree.
pub struct ManifestGenerator<'a> {
    tree: &'a ProfileTree,
    options: GenerateOptions,
}

impl<'a> ManifestGenerator<'a> {
    pub fn new(tree: &'a ProfileTree, options: GenerateOptions) -> Self {
        Self { tree, options }
    }

    /// Scan and resolve `vendor`, and render its new manifest.
    pub fn generate(&self, vendor: &str) -> Result<GenerateReport> {
        let scan = scan_vendor(self.tree, vendor)?;
        let path = self.tree.manifest_path(vendor);

        let previous = io::read_text_if_exists(&path)?;
        let mut manifest = match &previous {
            Some(text) => VendorManifest::from_value(vendor, json::parse_value(&path, text)?)?,
            None => {
                tracing::debug!(vendor, "No manifest found, starting from an empty one");
                VendorManifest::new(vendor)
            }
        };

        let mut resolutions = BTreeMap::new();
        for &kind in &self.options.kinds {
            let entries = scan.entries(kind);
            let resolution = resolve(&entries, self.options.policy);

            // Keep manifests free of lists the vendor never had
            if !entries.is_empty() || manifest.has_list(kind) {
                manifest.set_records(kind, &resolution.records());
            }

            for unresolved in &resolution.unresolved {
                tracing::warn!(
                    vendor,
                    kind = %kind,
                    name = %unresolved.name,
                    reason = %unresolved.reason,
                    "Unresolved profile"
                );
            }
            tracing::debug!(
                vendor,
                kind = %kind,
                ordered = resolution.ordered.len(),
                unresolved = resolution.unresolved.len(),
                "Resolved manifest list"
            );
            resolutions.insert(kind, resolution);
        }

        let rendered = manifest.render()?;

        Ok(GenerateReport {
            vendor: vendor.to_string(),
            path,
            resolutions,
            failures: scan.failures,
            manifest,
            previous,
            rendered,
        })
    }

    /// Persist a report. Returns whether anything was written.
    pub fn write(&self, report: &GenerateReport) -> Result<bool> {
        if !report.changed() {
            tracing::debug!(vendor = %report.vendor, "Manifest unchanged");
            return Ok(false);
        }
        io::write_atomic(&report.path, report.rendered.as_bytes())?;
        tracing::info!(vendor = %report.vendor, path = %report.path, "Wrote manifest");
        Ok(true)
    }
}
