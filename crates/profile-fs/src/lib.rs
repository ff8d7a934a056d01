//! Filesystem layer for the OrcaSlicer profile tooling
//!
//! Provides forward-slash path handling, atomic writes and the JSON
//! load/save conventions used by vendor profile trees.

pub mod error;
pub mod io;
pub mod json;
pub mod path;

pub use error::{Error, Result};
pub use path::NormalizedPath;
