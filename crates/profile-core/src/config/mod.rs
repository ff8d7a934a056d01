//! Tool configuration
//!
//! Settings come from TOML layers merged by [`ConfigResolver`]; the CLI then
//! applies its flags on top.

mod resolver;

pub use resolver::{ConfigResolver, TREE_CONFIG_FILE};

use serde::{Deserialize, Serialize};

use crate::resolver::UnresolvedPolicy;

/// Effective configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub resolve: ResolveSettings,
    pub check: CheckSettings,
}

/// `[resolve]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveSettings {
    /// How generation treats entries with unmet dependencies
    pub unresolved: UnresolvedPolicy,
}

/// `[check]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Fail on warnings too
    pub strict: bool,
    /// Vendor whose filaments need no `filament_id`
    pub template_vendor: String,
    /// Flag manifest lists that put a child before its parent
    pub check_order: bool,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            strict: false,
            template_vendor: "Template".to_string(),
            check_order: true,
        }
    }
}
