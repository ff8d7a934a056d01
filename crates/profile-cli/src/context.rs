//! Profiles-root context shared by all commands
//!
//! Opens the profile tree given by `--profiles-dir` and resolves the layered
//! configuration for it. Commands receive everything through this value; the
//! working directory is never changed.

use std::path::Path;

use profile_core::{ConfigResolver, ProfileTree, ToolConfig, UnresolvedPolicy};

use crate::error::{CliError, Result};

/// An opened profiles root with its effective configuration.
#[derive(Debug)]
pub struct ProfileContext {
    pub tree: ProfileTree,
    pub config: ToolConfig,
}

impl ProfileContext {
    /// Open `profiles_dir` and resolve its configuration.
    pub fn load(profiles_dir: &Path) -> Result<Self> {
        let tree = ProfileTree::open(profiles_dir)?;
        let config = ConfigResolver::new(tree.root().clone()).resolve()?;
        tracing::debug!(root = %tree.root(), ?config, "Loaded profiles context");
        Ok(Self { tree, config })
    }

    /// The policy from the command line, falling back to configuration.
    pub fn policy(&self, flag: Option<UnresolvedPolicy>) -> UnresolvedPolicy {
        flag.unwrap_or(self.config.resolve.unresolved)
    }

    /// The named vendor, or every vendor in the tree.
    pub fn vendors(&self, vendor: Option<&str>) -> Result<Vec<String>> {
        match vendor {
            Some(name) => {
                self.tree.require_vendor(name)?;
                Ok(vec![name.to_string()])
            }
            None => {
                let vendors = self.tree.vendors()?;
                if vendors.is_empty() {
                    return Err(CliError::user(format!(
                        "No vendor manifests found in {}",
                        self.tree.root()
                    )));
                }
                Ok(vendors)
            }
        }
    }
}
