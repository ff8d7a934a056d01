//! Core layer for the OrcaSlicer profile tooling
//!
//! OrcaSlicer ships printer, process and filament profiles per vendor. Each
//! vendor has a manifest (`<Vendor>.json`) listing its profile files, and the
//! slicer loads those lists in order, resolving every `inherits` reference
//! against profiles it already loaded. This crate provides:
//!
//! - **Resolution**: dependency-ordering of a batch of profiles ([`resolver`])
//! - **Scanning**: reading a vendor's profile files into entries ([`scan`])
//! - **Manifests**: order-preserving manifest editing ([`manifest`])
//! - **Generation**: rebuilding manifest lists from disk ([`generate`])
//! - **Validation**: cross-checking manifests, files and inheritance ([`validation`])
//! - **Configuration**: layered TOML settings ([`config`])
//!
//! # Architecture
//!
//! ```text
//!               profile-cli
//!                    |
//!              profile-core
//!   tree -> scan -> resolver -> generate
//!                     |       -> validation
//!                    |
//!               profile-fs
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod generate;
pub mod manifest;
pub mod resolver;
pub mod scan;
pub mod tree;
pub mod validation;

pub use config::{CheckSettings, ConfigResolver, ResolveSettings, ToolConfig};
pub use entry::{Entry, ManifestRecord, ProfileKind};
pub use error::{Error, Result};
pub use generate::{GenerateOptions, GenerateReport, ManifestGenerator};
pub use manifest::{ProfileVersion, VendorManifest};
pub use resolver::{
    DependencyGraph, Resolution, Unresolved, UnresolvedPolicy, UnresolvedReason, resolve,
};
pub use scan::{Instantiation, ScanFailure, ScannedProfile, VendorScan, scan_vendor};
pub use tree::ProfileTree;
pub use validation::{CheckStatus, Issue, IssueKind, Severity, ValidationReport, Validator};
