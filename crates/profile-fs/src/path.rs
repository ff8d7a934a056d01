//! Normalized path handling for profile trees
//!
//! Manifest `sub_path` values always use forward slashes, whatever the host
//! platform. `NormalizedPath` keeps that form internally and converts to a
//! native `PathBuf` only at I/O boundaries.

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// The segment may itself contain several components, as manifest
    /// sub-paths do (`filament/Generic/Generic PLA.json`).
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let segment_trimmed = segment_normalized.trim_start_matches('/');
        let joined = if self.inner.is_empty() {
            segment_trimmed.to_string()
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_trimmed)
        } else {
            format!("{}/{}", self.inner, segment_trimmed)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the file name without its extension.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[..idx]),
            _ => Some(name),
        }
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Whether the file name starts with a dot.
    pub fn is_hidden(&self) -> bool {
        self.file_name().is_some_and(|name| name.starts_with('.'))
    }

    /// Express this path relative to `base`, component-wise.
    ///
    /// Returns `None` when `self` does not live under `base`.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<String> {
        let base = base.inner.trim_end_matches('/');
        if base.is_empty() {
            return Some(self.inner.clone());
        }
        let rest = self.inner.strip_prefix(base)?;
        if rest.is_empty() {
            return Some(String::new());
        }
        rest.strip_prefix('/').map(|r| r.to_string())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_are_normalized() {
        let path = NormalizedPath::new("profiles\\BBL\\filament\\PLA.json");
        assert_eq!(path.as_str(), "profiles/BBL/filament/PLA.json");
    }

    #[test]
    fn test_join_multi_component_segment() {
        let base = NormalizedPath::new("profiles/BBL");
        let joined = base.join("filament/Generic PLA.json");
        assert_eq!(joined.as_str(), "profiles/BBL/filament/Generic PLA.json");
    }

    #[test]
    fn test_file_stem_keeps_inner_dots() {
        let path = NormalizedPath::new("machine/Bambu Lab X1 0.4 nozzle.json");
        assert_eq!(path.file_stem(), Some("Bambu Lab X1 0.4 nozzle"));
    }

    #[test]
    fn test_relative_to() {
        let base = NormalizedPath::new("/tmp/profiles/BBL");
        let file = NormalizedPath::new("/tmp/profiles/BBL/process/0.20mm Standard.json");
        assert_eq!(
            file.relative_to(&base).as_deref(),
            Some("process/0.20mm Standard.json")
        );
    }

    #[test]
    fn test_relative_to_rejects_sibling_prefix() {
        let base = NormalizedPath::new("/tmp/profiles/BBL");
        let file = NormalizedPath::new("/tmp/profiles/BBLX/process/a.json");
        assert_eq!(file.relative_to(&base), None);
    }

    #[test]
    fn test_hidden_files() {
        assert!(NormalizedPath::new("filament/.DS_Store").is_hidden());
        assert!(!NormalizedPath::new("filament/PLA.json").is_hidden());
    }
}
