//! Configuration resolution with layered merge
//!
//! Layers, later overriding earlier:
//! 1. Global defaults (`<config_dir>/orca-profiles/config.toml`)
//! 2. Tree config (`<profiles root>/.orca-profiles.toml`)
//!
//! Tables are merged key by key, so a layer only needs the keys it changes.

use std::fs;
use std::path::{Path, PathBuf};

use profile_fs::NormalizedPath;

use super::ToolConfig;
use crate::{Error, Result};

/// File name of the per-tree configuration layer.
pub const TREE_CONFIG_FILE: &str = ".orca-profiles.toml";

/// Resolves [`ToolConfig`] for a profiles root.
pub struct ConfigResolver {
    root: NormalizedPath,

    /// Override for the global config directory (used for testing).
    /// When `None`, `dirs::config_dir()/orca-profiles` is used.
    global_config_dir_override: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            root,
            global_config_dir_override: None,
        }
    }

    /// Create a resolver with a custom global config directory.
    pub fn with_global_config_dir(root: NormalizedPath, global_config_dir: PathBuf) -> Self {
        Self {
            root,
            global_config_dir_override: Some(global_config_dir),
        }
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("orca-profiles"))
    }

    /// Path of the tree-level layer.
    pub fn tree_config_path(&self) -> NormalizedPath {
        self.root.join(TREE_CONFIG_FILE)
    }

    pub fn has_tree_config(&self) -> bool {
        self.tree_config_path().is_file()
    }

    /// Merge all layers. Missing layers are skipped; invalid TOML is an error.
    pub fn resolve(&self) -> Result<ToolConfig> {
        let mut merged = toml::Table::new();

        if let Some(global_dir) = self.global_config_dir() {
            let global_config_path = global_dir.join("config.toml");
            if global_config_path.is_file() {
                tracing::debug!(?global_config_path, "Loading global config (layer 1)");
                merge_tables(&mut merged, read_layer(&global_config_path)?);
            } else {
                tracing::debug!(?global_config_path, "No global config (layer 1) - skipping");
            }
        }

        let tree_config_path = self.tree_config_path();
        if tree_config_path.is_file() {
            tracing::debug!(path = %tree_config_path, "Loading tree config (layer 2)");
            merge_tables(&mut merged, read_layer(&tree_config_path.to_native())?);
        }

        // Every layer was checked on read, so the merge deserializes cleanly
        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| Error::ConfigParse {
                path: self.tree_config_path().to_native(),
                message: e.to_string(),
            })
    }
}

/// Read one layer, rejecting it unless it deserializes as a `ToolConfig`
/// on its own so errors name the file that holds the bad value.
fn read_layer(path: &Path) -> Result<toml::Table> {
    let parse_error = |e: toml::de::Error| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let content = fs::read_to_string(path).map_err(|e| profile_fs::Error::io(path, e))?;
    let table = content.parse::<toml::Table>().map_err(parse_error)?;
    toml::Value::Table(table.clone())
        .try_into::<ToolConfig>()
        .map_err(parse_error)?;
    Ok(table)
}

/// Deep-merge `overlay` into `base`; non-table values in `overlay` win.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::UnresolvedPolicy;
    use tempfile::TempDir;

    fn resolver_for(root: &Path, global: &Path) -> ConfigResolver {
        ConfigResolver::with_global_config_dir(NormalizedPath::new(root), global.to_path_buf())
    }

    #[test]
    fn resolve_returns_defaults_when_no_config_exists() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver_for(temp.path(), &temp.path().join("global"));

        assert!(!resolver.has_tree_config());
        let config = resolver.resolve().unwrap();
        assert_eq!(config, ToolConfig::default());
        assert_eq!(config.check.template_vendor, "Template");
        assert!(config.check.check_order);
    }

    #[test]
    fn resolve_merges_tree_over_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global");
        fs::create_dir_all(&global).unwrap();
        fs::write(
            global.join("config.toml"),
            "[resolve]\nunresolved = \"exclude\"\n\n[check]\nstrict = true\n",
        )
        .unwrap();
        fs::write(
            temp.path().join(TREE_CONFIG_FILE),
            "[check]\nstrict = false\ntemplate_vendor = \"OrcaFilamentLibrary\"\n",
        )
        .unwrap();

        let config = resolver_for(temp.path(), &global).resolve().unwrap();

        // Global-only key survives, tree keys override
        assert_eq!(config.resolve.unresolved, UnresolvedPolicy::Exclude);
        assert!(!config.check.strict);
        assert_eq!(config.check.template_vendor, "OrcaFilamentLibrary");
        assert!(config.check.check_order);
    }

    #[test]
    fn resolve_rejects_invalid_toml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(TREE_CONFIG_FILE), "[check\nstrict = ").unwrap();

        let err = resolver_for(temp.path(), &temp.path().join("global"))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn resolve_rejects_unknown_policy() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(TREE_CONFIG_FILE),
            "[resolve]\nunresolved = \"abort\"\n",
        )
        .unwrap();

        let result = resolver_for(temp.path(), &temp.path().join("global")).resolve();
        assert!(result.is_err());
    }

    #[test]
    fn resolve_names_the_global_layer_on_bad_value() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global");
        fs::create_dir_all(&global).unwrap();
        fs::write(global.join("config.toml"), "[resolve]\nunresolved = \"abort\"\n").unwrap();
        fs::write(temp.path().join(TREE_CONFIG_FILE), "[check]\nstrict = true\n").unwrap();

        let err = resolver_for(temp.path(), &global).resolve().unwrap_err();
        match err {
            Error::ConfigParse { path, .. } => assert_eq!(path, global.join("config.toml")),
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }
}
