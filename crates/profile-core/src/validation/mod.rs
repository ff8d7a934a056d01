//! Vendor validation
//!
//! Cross-checks a vendor's manifest against the profile files on disk and
//! the inheritance graph of each kind. Every problem found is collected into
//! a [`ValidationReport`]; only failures to read the tree itself are errors.

mod report;

pub use report::{CheckStatus, Issue, IssueKind, Severity, ValidationReport};

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::Result;
use crate::config::CheckSettings;
use crate::entry::ProfileKind;
use crate::manifest::VendorManifest;
use crate::resolver::{UnresolvedPolicy, UnresolvedReason, resolve};
use crate::scan::{Instantiation, ScannedProfile, VendorScan, scan_vendor};
use crate::tree::ProfileTree;

/// Validates vendors of one profile tree.
pub struct Validator<'a> {
    tree: &'a ProfileTree,
    settings: CheckSettings,
}

impl<'a> Validator<'a> {
    pub fn new(tree: &'a ProfileTree, settings: CheckSettings) -> Self {
        Self { tree, settings }
    }

    /// Validate every vendor in the tree.
    pub fn validate_all(&self) -> Result<ValidationReport> {
        let mut combined = ValidationReport::default();
        for vendor in self.tree.vendors()? {
            combined = combined.merge(self.validate_vendor(&vendor)?);
        }
        Ok(combined)
    }

    /// Validate a single vendor.
    pub fn validate_vendor(&self, vendor: &str) -> Result<ValidationReport> {
        let scan = scan_vendor(self.tree, vendor)?;
        let mut report = ValidationReport::new(vendor);
        report.checked = scan.profiles.len() + scan.failures.len();

        for failure in &scan.failures {
            report.push(
                Issue::new(IssueKind::MalformedFile, failure.reason.clone())
                    .file(failure.sub_path.clone()),
            );
        }

        if let Some(manifest) = self.load_manifest(vendor, &mut report) {
            self.check_manifest_version(&manifest, &mut report);
            self.check_manifest_lists(&manifest, &scan, &mut report);
        }

        for kind in ProfileKind::ALL {
            check_duplicate_names(&scan, kind, &mut report);
            self.check_dependencies(&scan, kind, &mut report);
        }

        for profile in &scan.profiles {
            self.check_profile_fields(&scan, profile, &mut report);
        }

        tracing::debug!(
            vendor,
            checked = report.checked,
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "Validated vendor"
        );
        Ok(report)
    }

    fn load_manifest(
        &self,
        vendor: &str,
        report: &mut ValidationReport,
    ) -> Option<VendorManifest> {
        let path = self.tree.manifest_path(vendor);
        let file = format!("{vendor}.json");
        if !path.is_file() {
            report.push(
                Issue::new(IssueKind::InvalidManifest, "manifest file not found").file(file),
            );
            return None;
        }
        match VendorManifest::load(vendor, &path) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                report.push(Issue::new(IssueKind::InvalidManifest, e.to_string()).file(file));
                None
            }
        }
    }

    fn check_manifest_version(&self, manifest: &VendorManifest, report: &mut ValidationReport) {
        let file = format!("{}.json", manifest.vendor());
        match manifest.version() {
            Ok(Some(_)) => {}
            Ok(None) => {
                report.push(
                    Issue::new(IssueKind::InvalidVersion, "manifest has no 'version'").file(file),
                );
            }
            Err(reason) => {
                let message = format!("invalid version: {reason}");
                report.push(Issue::new(IssueKind::InvalidVersion, message).file(file));
            }
        }
    }

    fn check_manifest_lists(
        &self,
        manifest: &VendorManifest,
        scan: &VendorScan,
        report: &mut ValidationReport,
    ) {
        let vendor_dir = self.tree.vendor_dir(manifest.vendor());
        let mut listed: HashSet<String> = HashSet::new();

        for kind in ProfileKind::ALL {
            let records = match manifest.records(kind) {
                Ok(records) => records,
                Err(e) => {
                    report.push(
                        Issue::new(IssueKind::InvalidManifest, e.to_string())
                            .file(format!("{}.json", manifest.vendor())),
                    );
                    continue;
                }
            };

            // First position of each name in this list
            let mut position: HashMap<&str, usize> = HashMap::new();
            for (i, record) in records.iter().enumerate() {
                position.entry(record.name.as_str()).or_insert(i);
            }

            for (i, record) in records.iter().enumerate() {
                if !listed.insert(record.sub_path.clone()) {
                    report.push(
                        Issue::new(IssueKind::DuplicateName, "file is listed more than once")
                            .profile(record.name.clone())
                            .file(record.sub_path.clone()),
                    );
                    continue;
                }

                let Some(profile) = scan.by_sub_path(&record.sub_path) else {
                    let on_disk = vendor_dir.join(&record.sub_path).is_file();
                    if !scan.failed(&record.sub_path) && !on_disk {
                        let message =
                            format!("{} references a file that does not exist", kind.list_key());
                        report.push(
                            Issue::new(IssueKind::MissingFile, message)
                                .profile(record.name.clone())
                                .file(record.sub_path.clone()),
                        );
                    }
                    continue;
                };

                if profile.name() != record.name {
                    let message = format!(
                        "listed as '{}' but the file is named '{}'",
                        record.name,
                        profile.name()
                    );
                    report.push(
                        Issue::new(IssueKind::NameMismatch, message)
                            .profile(profile.name())
                            .file(record.sub_path.clone()),
                    );
                }

                let inferred_same_dir =
                    profile.kind_inferred && profile.kind().directory() == kind.directory();
                if profile.kind() != kind && !inferred_same_dir {
                    let message = format!(
                        "listed in {} but has type '{}'",
                        kind.list_key(),
                        profile.kind()
                    );
                    report.push(
                        Issue::new(IssueKind::KindMismatch, message)
                            .profile(profile.name())
                            .file(record.sub_path.clone()),
                    );
                }

                if self.settings.check_order {
                    let parent_later = profile
                        .entry
                        .inherits
                        .as_deref()
                        .and_then(|parent| position.get(parent).map(|&at| (parent, at)))
                        .filter(|&(_, at)| at > i);
                    if let Some((parent, _)) = parent_later {
                        let message =
                            format!("listed before its parent '{parent}' in {}", kind.list_key());
                        report.push(
                            Issue::new(IssueKind::OutOfOrder, message)
                                .profile(profile.name())
                                .file(record.sub_path.clone()),
                        );
                    }
                }
            }
        }

        for profile in &scan.profiles {
            if !listed.contains(&profile.entry.sub_path) {
                report.push(
                    Issue::new(IssueKind::UnlistedFile, "not listed in the vendor manifest")
                        .profile(profile.name())
                        .file(profile.entry.sub_path.clone()),
                );
            }
        }
    }

    fn check_dependencies(
        &self,
        scan: &VendorScan,
        kind: ProfileKind,
        report: &mut ValidationReport,
    ) {
        let resolution = resolve(&scan.entries(kind), UnresolvedPolicy::AppendAtEnd);
        for unresolved in resolution.unresolved {
            let issue = match &unresolved.reason {
                UnresolvedReason::MissingParent { parent } => {
                    let message = format!(
                        "inherits '{parent}', which is not a {kind} profile of this vendor"
                    );
                    let issue = Issue::new(IssueKind::UnmetDependency, message);
                    if self.settings.strict {
                        issue.severity(Severity::Error)
                    } else {
                        issue
                    }
                }
                reason => Issue::new(IssueKind::DependencyCycle, reason.to_string()),
            };
            report.push(issue.profile(unresolved.name).file(unresolved.sub_path));
        }
    }

    fn check_profile_fields(
        &self,
        scan: &VendorScan,
        profile: &ScannedProfile,
        report: &mut ValidationReport,
    ) {
        let issue = |kind: IssueKind, message: String| {
            Issue::new(kind, message)
                .profile(profile.name())
                .file(profile.entry.sub_path.clone())
        };

        if profile.kind_inferred {
            report.push(issue(
                IssueKind::MissingType,
                format!("no 'type' key; assumed '{}' from its directory", profile.kind()),
            ));
        }

        if profile.kind().is_instantiable() {
            match profile.instantiation() {
                Instantiation::Missing => {
                    report.push(issue(
                        IssueKind::InvalidInstantiation,
                        "no 'instantiation' key".to_string(),
                    ));
                }
                Instantiation::Invalid => {
                    report.push(issue(
                        IssueKind::InvalidInstantiation,
                        "'instantiation' must be \"true\" or \"false\"".to_string(),
                    ));
                }
                Instantiation::Instantiated | Instantiation::Abstract => {}
            }
        }

        if !profile.is_instantiated() {
            return;
        }

        match profile.kind() {
            ProfileKind::Filament if scan.vendor != self.settings.template_vendor => {
                if inherited_str(scan, profile, "filament_id").is_none() {
                    report.push(issue(
                        IssueKind::MissingFilamentId,
                        "instantiated filament has no 'filament_id' of its own or inherited"
                            .to_string(),
                    ));
                }
            }
            ProfileKind::Machine => {
                let model = inherited_str(scan, profile, "printer_model");
                if let Some(model) = model
                    && scan.find(ProfileKind::MachineModel, model).is_none()
                {
                    report.push(issue(
                        IssueKind::UnknownPrinterModel,
                        format!("printer_model '{model}' is not a machine model of this vendor"),
                    ));
                }
            }
            _ => {}
        }

        if let Some(Value::Array(printers)) = profile.field("compatible_printers") {
            let named = printers
                .iter()
                .filter_map(Value::as_str)
                .filter(|p| !p.is_empty());
            for printer in named {
                if scan.find(ProfileKind::Machine, printer).is_none() {
                    report.push(issue(
                        IssueKind::UnknownCompatiblePrinter,
                        format!("compatible printer '{printer}' is not a machine of this vendor"),
                    ));
                }
            }
        }
    }
}

fn check_duplicate_names(scan: &VendorScan, kind: ProfileKind, report: &mut ValidationReport) {
    let mut first: HashMap<&str, &str> = HashMap::new();
    for profile in scan.of_kind(kind) {
        match first.get(profile.name()) {
            Some(&original) => report.push(
                Issue::new(
                    IssueKind::DuplicateName,
                    format!("{kind} name already defined by {original}"),
                )
                .profile(profile.name())
                .file(profile.entry.sub_path.clone()),
            ),
            None => {
                first.insert(profile.name(), profile.entry.sub_path.as_str());
            }
        }
    }
}

/// Look `key` up on `profile`, then along its `inherits` chain within the
/// same kind. Stops at a missing parent or when the chain revisits a name.
pub fn inherited_str<'s>(
    scan: &'s VendorScan,
    profile: &'s ScannedProfile,
    key: &str,
) -> Option<&'s str> {
    let mut visited: HashSet<&str> = HashSet::from([profile.name()]);
    let mut current = profile;
    loop {
        if let Some(value) = current.field_str(key) {
            return Some(value);
        }
        let parent = current.entry.inherits.as_deref()?;
        if !visited.insert(parent) {
            return None;
        }
        current = scan.find(profile.kind(), parent)?;
    }
}
