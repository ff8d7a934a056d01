//! Profile entries and their kinds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The category a profile belongs to.
///
/// Variant order is the order in which the slicer loads manifest lists:
/// machine models first, then processes, filaments, and finally machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// A printer model (`type: "machine_model"`)
    MachineModel,
    /// A print process preset (`type: "process"`)
    Process,
    /// A filament preset (`type: "filament"`)
    Filament,
    /// A printer preset (`type: "machine"`)
    Machine,
}

impl ProfileKind {
    /// Every kind, in manifest load order.
    pub const ALL: [ProfileKind; 4] = [
        ProfileKind::MachineModel,
        ProfileKind::Process,
        ProfileKind::Filament,
        ProfileKind::Machine,
    ];

    /// The value of the `type` key in a profile file.
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileKind::MachineModel => "machine_model",
            ProfileKind::Process => "process",
            ProfileKind::Filament => "filament",
            ProfileKind::Machine => "machine",
        }
    }

    /// The manifest key holding this kind's records.
    pub fn list_key(self) -> &'static str {
        match self {
            ProfileKind::MachineModel => "machine_model_list",
            ProfileKind::Process => "process_list",
            ProfileKind::Filament => "filament_list",
            ProfileKind::Machine => "machine_list",
        }
    }

    /// The top-level vendor sub-directory this kind's files live in.
    ///
    /// Machine models share the `machine` directory with machines.
    pub fn directory(self) -> &'static str {
        match self {
            ProfileKind::MachineModel | ProfileKind::Machine => "machine",
            ProfileKind::Process => "process",
            ProfileKind::Filament => "filament",
        }
    }

    /// Kind to assume for a file without a `type` key, from its directory.
    pub fn from_directory(dir: &str) -> Option<Self> {
        match dir {
            "machine" => Some(ProfileKind::Machine),
            "process" => Some(ProfileKind::Process),
            "filament" => Some(ProfileKind::Filament),
            _ => None,
        }
    }

    /// Whether profiles of this kind carry an `instantiation` flag.
    pub fn is_instantiable(self) -> bool {
        !matches!(self, ProfileKind::MachineModel)
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "machine_model" => Ok(ProfileKind::MachineModel),
            "process" => Ok(ProfileKind::Process),
            "filament" => Ok(ProfileKind::Filament),
            "machine" => Ok(ProfileKind::Machine),
            other => Err(Error::UnknownProfileKind {
                value: other.to_string(),
            }),
        }
    }
}

/// A single named profile with optional inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Profile name, unique within a batch
    pub name: String,
    /// Category of the profile
    #[serde(rename = "type")]
    pub kind: ProfileKind,
    /// Name of the parent profile, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,
    /// Location relative to the vendor directory, forward slashes
    pub sub_path: String,
}

impl Entry {
    pub fn new(name: impl Into<String>, kind: ProfileKind, sub_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            inherits: None,
            sub_path: sub_path.into(),
        }
    }

    /// Builder-style setter for the parent reference.
    pub fn inheriting(mut self, parent: impl Into<String>) -> Self {
        self.inherits = Some(parent.into());
        self
    }

    /// The `{name, sub_path}` pair written into a manifest list.
    pub fn record(&self) -> ManifestRecord {
        ManifestRecord {
            name: self.name.clone(),
            sub_path: self.sub_path.clone(),
        }
    }
}

/// One element of a manifest list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub name: String,
    pub sub_path: String,
}
