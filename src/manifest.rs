//! Manifest parsing - the plain-text list of colorscheme repositories
//!
//! The manifest (`repos.txt` by default) drives every operation: one
//! repository URL per line. Each line becomes a [`RepoEntry`] whose name is
//! derived from the URL, and the set of entries is what `pull`, `sync`, and
//! `doctor` iterate over.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single repository drawn from the manifest
///
/// The name doubles as the working-directory name under the repos cache, so
/// two URLs that reduce to the same name collide; the manifest resolves that
/// by letting the later line win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    /// Working-directory name (URL basename, `.git` suffix stripped)
    pub name: String,

    /// Clone URL exactly as written in the manifest
    pub url: String,
}

impl RepoEntry {
    /// Path of this repository's working directory under the repos cache
    pub fn work_dir(&self, repos_dir: &Path) -> PathBuf {
        repos_dir.join(&self.name)
    }
}

/// The parsed manifest: ordered repository entries with unique names
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<RepoEntry>,
}

impl Manifest {
    /// Load and parse a manifest file
    ///
    /// Blank and whitespace-only lines are skipped. When two lines derive the
    /// same name, the later URL replaces the earlier one while the entry
    /// keeps its original position.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest file: {}", path.display()))?;

        Ok(Self::parse(&content))
    }

    /// Parse manifest text into entries
    pub fn parse(content: &str) -> Self {
        let mut entries: Vec<RepoEntry> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (lineno, raw_line) in content.lines().enumerate() {
            let url = raw_line.trim();
            if url.is_empty() {
                debug!("Skipping blank manifest line {}", lineno + 1);
                continue;
            }

            let name = derive_name(url);
            match positions.get(&name) {
                Some(&index) => {
                    debug!(
                        "Manifest line {} overrides earlier entry '{}'",
                        lineno + 1,
                        name
                    );
                    entries[index].url = url.to_string();
                }
                None => {
                    positions.insert(name.clone(), entries.len());
                    entries.push(RepoEntry {
                        name,
                        url: url.to_string(),
                    });
                }
            }
        }

        Self { entries }
    }

    /// Iterate entries in manifest order
    pub fn entries(&self) -> impl Iterator<Item = &RepoEntry> {
        self.entries.iter()
    }

    /// Number of entries after deduplication
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its derived name
    pub fn get(&self, name: &str) -> Option<&RepoEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

/// Derive a repository name from its URL: the final path segment with one
/// trailing `.git` suffix removed (trailing slashes ignored)
pub fn derive_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let base = trimmed.rsplit('/').next().unwrap_or(trimmed);
    base.strip_suffix(".git").unwrap_or(base).to_string()
}
