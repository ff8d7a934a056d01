//! Shared test fixtures for the orca-profiles workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`profiles`]: JSON builders for profile documents and manifests
//! - [`tree`]: [`TestProfiles`](tree::TestProfiles), a temporary profiles root

pub mod profiles;
pub mod tree;

pub use tree::TestProfiles;
