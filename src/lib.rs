//! schemekeeper - Colorscheme Collection Manager for Vim
//!
//! schemekeeper keeps a local collection of third-party colorscheme
//! repositories up to date from a plain-text manifest and aggregates their
//! autoload scripts, color files, and extras into a single runtimepath-ready
//! plugin tree.
//!
//! ## Core Features
//!
//! - **Manifest-driven**: one repository URL per line in `repos.txt`
//! - **Clone or update**: working directories are cloned once, pulled after
//! - **Selective sync**: autoload, colors, and extras merged into unified trees
//! - **Clean teardown**: generated trees removed without touching the cache
//!
//! ## Modules
//!
//! - [`manifest`]: Manifest parsing and entry naming
//! - [`layout`]: The fixed collection directory layout
//! - [`git`]: Clone and update operations
//! - [`sync`]: Selective copy into the unified tree

pub mod config;
pub mod git;
pub mod health;
pub mod layout;
pub mod manifest;
pub mod process;
pub mod sync;

pub use config::Config;
pub use git::{GitClient, PullOutcome, PullSummary};
pub use health::HealthCheck;
pub use layout::Layout;
pub use manifest::{Manifest, RepoEntry};
pub use sync::{SyncEngine, SyncOutcome, SyncSummary};
