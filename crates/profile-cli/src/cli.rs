//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use profile_core::{ProfileKind, UnresolvedPolicy};

/// Order, generate and validate OrcaSlicer vendor profile manifests
#[derive(Parser, Debug)]
#[command(name = "orca-profiles")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Profiles root holding the <Vendor>.json manifests
    #[arg(
        long,
        global = true,
        env = "ORCA_PROFILES_DIR",
        default_value = "resources/profiles"
    )]
    pub profiles_dir: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List vendors with their profile counts
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the load order of a vendor's profiles
    ///
    /// Examples:
    ///   orca-profiles order BBL                 # All profile types
    ///   orca-profiles order BBL --kind filament # Filaments only
    Order {
        /// Vendor name (the manifest's file stem)
        vendor: String,

        /// Profile type (machine_model, process, filament, machine)
        #[arg(short, long)]
        kind: Option<ProfileKind>,

        /// What to do with profiles whose parent is missing (append, exclude)
        #[arg(long)]
        policy: Option<UnresolvedPolicy>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a vendor manifest's profile lists in load order
    ///
    /// Examples:
    ///   orca-profiles generate Voron              # Rewrite every list
    ///   orca-profiles generate Voron -k filament  # Only filament_list
    ///   orca-profiles generate Voron --dry-run    # Show a diff instead
    Generate {
        /// Vendor name (the manifest's file stem)
        vendor: String,

        /// Lists to regenerate; repeatable. Defaults to all
        #[arg(short, long = "kind")]
        kinds: Vec<ProfileKind>,

        /// What to do with profiles whose parent is missing (append, exclude)
        #[arg(long)]
        policy: Option<UnresolvedPolicy>,

        /// Preview changes without writing the manifest
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Validate manifests, profile files and inheritance
    Check {
        /// Vendor to check; all vendors when omitted
        vendor: Option<String>,

        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,

        /// Output as JSON for CI integration
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   orca-profiles completions bash > ~/.local/share/bash-completion/completions/orca-profiles
    ///   orca-profiles completions zsh > ~/.zfunc/_orca-profiles
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
