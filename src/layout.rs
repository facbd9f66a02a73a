//! Collection layout - the well-known directories under the root
//!
//! Every command runs against a fixed layout: a `repos/` cache holding the
//! cloned working directories, and four destination trees (`autoload/`,
//! `colors/`, `extras/`, `lua/`) that `sync` populates and `clean` tears
//! down. Setup is idempotent and runs before every command.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory names, fixed relative to the collection root
pub const REPOS_DIR: &str = "repos";
pub const AUTOLOAD_DIR: &str = "autoload";
pub const COLORS_DIR: &str = "colors";
pub const EXTRAS_DIR: &str = "extras";
pub const LUA_DIR: &str = "lua";

/// The resolved directory layout of a collection
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,

    /// Clone cache: one working directory per manifest entry
    pub repos_dir: PathBuf,

    /// Unified autoload destination
    pub autoload_dir: PathBuf,

    /// Unified colors destination
    pub colors_dir: PathBuf,

    /// Unified extras destination
    pub extras_dir: PathBuf,

    /// Lua destination: created and cleaned for layout symmetry, but only
    /// ever consulted as a *source* marker when deciding to skip lua repos
    pub lua_dir: PathBuf,
}

impl Layout {
    /// Build the layout for a collection root
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            repos_dir: root.join(REPOS_DIR),
            autoload_dir: root.join(AUTOLOAD_DIR),
            colors_dir: root.join(COLORS_DIR),
            extras_dir: root.join(EXTRAS_DIR),
            lua_dir: root.join(LUA_DIR),
        }
    }

    /// The collection root this layout was built from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The four trees populated by `sync` and removed by `clean`
    pub fn destination_dirs(&self) -> [&Path; 4] {
        [
            &self.autoload_dir,
            &self.colors_dir,
            &self.extras_dir,
            &self.lua_dir,
        ]
    }

    /// All five managed directories (destinations plus the repos cache)
    pub fn all_dirs(&self) -> [&Path; 5] {
        [
            &self.repos_dir,
            &self.autoload_dir,
            &self.colors_dir,
            &self.extras_dir,
            &self.lua_dir,
        ]
    }

    /// Create any missing managed directories (idempotent)
    pub async fn ensure(&self) -> Result<()> {
        for dir in self.all_dirs() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        debug!("Layout ready under {}", self.root.display());
        Ok(())
    }

    /// Remove the destination trees, leaving the repos cache untouched
    ///
    /// Returns the number of trees actually removed; already-absent trees are
    /// skipped.
    pub async fn clean(&self) -> Result<usize> {
        let mut removed = 0;

        for dir in self.destination_dirs() {
            if !dir.exists() {
                debug!("Destination already absent: {}", dir.display());
                continue;
            }

            tokio::fs::remove_dir_all(dir)
                .await
                .with_context(|| format!("Failed to remove directory: {}", dir.display()))?;

            info!("Removed {}", dir.display());
            removed += 1;
        }

        Ok(removed)
    }
}
