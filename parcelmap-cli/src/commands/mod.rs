//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`build`] - Full and incremental pyramid builds
//! - [`claims`] - Claim map export
//! - [`config`] - Configuration management (init, show)

pub mod build;
pub mod claims;
pub mod config;

/// Process exit status of a successful command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Nothing needed to change
    UpToDate,
    /// At least one tile was written
    Rebuilt,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::UpToDate => 0,
            ExitStatus::Rebuilt => 2,
        }
    }
}
