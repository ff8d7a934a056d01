//! Report types for vendor validation
//!
//! Validation never stops at the first problem. Every finding becomes an
//! [`Issue`] and the caller decides from the aggregate whether the run failed.

use serde::{Deserialize, Serialize};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// What kind of problem an issue describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A profile file could not be parsed or lacks a name
    MalformedFile,
    /// The manifest lists a file that does not exist
    MissingFile,
    /// A profile file exists but no manifest list mentions it
    UnlistedFile,
    /// The manifest record's name differs from the file's `name`
    NameMismatch,
    /// A record sits in the list of another profile type
    KindMismatch,
    /// Two profiles of one kind share a name
    DuplicateName,
    /// `inherits` names no profile of the same kind
    UnmetDependency,
    /// The profile is on, or blocked by, an inheritance cycle
    DependencyCycle,
    /// The manifest lists a child before its parent
    OutOfOrder,
    /// The manifest version is missing or malformed
    InvalidVersion,
    /// A manifest list is structurally broken
    InvalidManifest,
    /// The profile has no `type` key
    MissingType,
    /// `instantiation` is missing or not `"true"`/`"false"`
    InvalidInstantiation,
    /// An instantiated filament has no `filament_id`, own or inherited
    MissingFilamentId,
    /// A machine's `printer_model` names no machine model
    UnknownPrinterModel,
    /// `compatible_printers` names a machine the vendor does not define
    UnknownCompatiblePrinter,
}

impl IssueKind {
    /// Stable identifier, as used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::MalformedFile => "malformed_file",
            IssueKind::MissingFile => "missing_file",
            IssueKind::UnlistedFile => "unlisted_file",
            IssueKind::NameMismatch => "name_mismatch",
            IssueKind::KindMismatch => "kind_mismatch",
            IssueKind::DuplicateName => "duplicate_name",
            IssueKind::UnmetDependency => "unmet_dependency",
            IssueKind::DependencyCycle => "dependency_cycle",
            IssueKind::OutOfOrder => "out_of_order",
            IssueKind::InvalidVersion => "invalid_version",
            IssueKind::InvalidManifest => "invalid_manifest",
            IssueKind::MissingType => "missing_type",
            IssueKind::InvalidInstantiation => "invalid_instantiation",
            IssueKind::MissingFilamentId => "missing_filament_id",
            IssueKind::UnknownPrinterModel => "unknown_printer_model",
            IssueKind::UnknownCompatiblePrinter => "unknown_compatible_printer",
        }
    }

    /// Severity used when the check is not configured otherwise.
    pub fn default_severity(self) -> Severity {
        match self {
            IssueKind::UnmetDependency
            | IssueKind::MissingType
            | IssueKind::InvalidInstantiation
            | IssueKind::UnknownCompatiblePrinter => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    /// Profile name the issue concerns, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Sub-path (or manifest file name) the issue concerns, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            profile: None,
            file: None,
            message: message.into(),
        }
    }

    pub fn profile(mut self, name: impl Into<String>) -> Self {
        self.profile = Some(name.into());
        self
    }

    pub fn file(mut self, sub_path: impl Into<String>) -> Self {
        self.file = Some(sub_path.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Overall outcome of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// No issues
    Healthy,
    /// Only warnings
    Warnings,
    /// At least one error
    Failed,
}

/// Findings for one vendor (or several, after [`ValidationReport::merge`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Vendors covered by this report
    pub vendors: Vec<String>,
    /// Number of profile files examined
    pub checked: usize,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new(vendor: impl Into<String>) -> Self {
        Self {
            vendors: vec![vendor.into()],
            checked: 0,
            issues: Vec::new(),
        }
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    pub fn has(&self, kind: IssueKind) -> bool {
        self.count(kind) > 0
    }

    pub fn status(&self) -> CheckStatus {
        if self.errors().next().is_some() {
            CheckStatus::Failed
        } else if self.warnings().next().is_some() {
            CheckStatus::Warnings
        } else {
            CheckStatus::Healthy
        }
    }

    /// Whether the run passes. Strict mode also fails on warnings.
    pub fn is_success(&self, strict: bool) -> bool {
        match self.status() {
            CheckStatus::Healthy => true,
            CheckStatus::Warnings => !strict,
            CheckStatus::Failed => false,
        }
    }

    /// Combine two reports; the resulting status is the worse of the two.
    pub fn merge(mut self, other: ValidationReport) -> Self {
        self.vendors.extend(other.vendors);
        self.checked += other.checked;
        self.issues.extend(other.issues);
        self
    }
}
