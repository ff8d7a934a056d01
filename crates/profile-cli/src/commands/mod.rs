//! Command implementations for profile-cli
//!
//! Each `run_*` function prints its own output and returns whether the
//! command succeeded; fatal problems come back as errors.

pub mod check;
pub mod completions;
pub mod generate;
pub mod list;
pub mod order;

pub use check::run_check;
pub use completions::run_completions;
pub use generate::run_generate;
pub use list::run_list;
pub use order::run_order;
