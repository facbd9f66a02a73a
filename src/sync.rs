//! Selective copy of colorscheme files into the unified plugin tree
//!
//! `sync` walks the manifest sequentially and copies from each working
//! directory whatever the entry provides: autoload scripts recursively,
//! `*.vim` color files flat, extras recursively. Two special cases hold:
//! the base16 collection contributes only its grayscale variants, and
//! repositories shipping a `lua/` directory are skipped whole since lua
//! colorschemes are not supported yet. Every skip is an explicit outcome,
//! never a silent no-op.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::layout::{Layout, AUTOLOAD_DIR, COLORS_DIR, EXTRAS_DIR, LUA_DIR};
use crate::manifest::{Manifest, RepoEntry};

/// The one repository whose colors are filtered down to grayscale variants
pub const GRAYSCALE_SOURCE_REPO: &str = "base16-vim";

/// Filename pattern selecting the grayscale color files
pub const GRAYSCALE_FILE_PATTERN: &str = "base16-grayscale-*.vim";

/// Filename pattern selecting color files from a colors directory
pub const VIM_FILE_PATTERN: &str = "*.vim";

/// Glob-style filename pattern: `*` matches any run of characters,
/// everything else is literal
#[derive(Debug, Clone)]
pub struct FilePattern {
    raw: String,
    regex: Option<Regex>,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Self {
        let regex = if pattern.contains('*') {
            let pattern_regex = pattern.replace('.', r"\.").replace('*', ".*");
            Regex::new(&format!("^{}$", pattern_regex)).ok()
        } else {
            None
        };

        Self {
            raw: pattern.to_string(),
            regex,
        }
    }

    /// Check whether a file name matches this pattern
    pub fn matches(&self, name: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(name),
            None => name == self.raw,
        }
    }
}

/// Outcome of syncing a single repository
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// Files were copied into the unified tree
    Synced { name: String, files_copied: usize },
    /// Entry was skipped; reason says why
    Skipped { name: String, reason: String },
    /// A copy operation failed; the batch continues
    Failed { name: String, error: String },
}

/// Results from a complete sync run
#[derive(Debug, Clone)]
pub struct SyncSummary {
    pub total: usize,
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
    pub files_copied: usize,
    pub duration: Duration,
    pub outcomes: Vec<SyncOutcome>,
}

impl SyncSummary {
    fn compile(outcomes: Vec<SyncOutcome>, duration: Duration) -> Self {
        let total = outcomes.len();
        let mut synced = 0;
        let mut skipped = 0;
        let mut failed = 0;
        let mut files_copied = 0;

        for outcome in &outcomes {
            match outcome {
                SyncOutcome::Synced {
                    files_copied: count,
                    ..
                } => {
                    synced += 1;
                    files_copied += count;
                }
                SyncOutcome::Skipped { .. } => skipped += 1,
                SyncOutcome::Failed { .. } => failed += 1,
            }
        }

        Self {
            total,
            synced,
            skipped,
            failed,
            files_copied,
            duration,
            outcomes,
        }
    }
}

/// Copies colorscheme files from working directories into the unified tree
pub struct SyncEngine {
    layout: Layout,
    vim_pattern: FilePattern,
    grayscale_pattern: FilePattern,
}

impl SyncEngine {
    /// Create a sync engine for the given layout
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            vim_pattern: FilePattern::new(VIM_FILE_PATTERN),
            grayscale_pattern: FilePattern::new(GRAYSCALE_FILE_PATTERN),
        }
    }

    /// Sync every manifest entry in order, collecting per-entry outcomes
    pub async fn sync_all(&self, manifest: &Manifest) -> Result<SyncSummary> {
        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(manifest.len());

        for entry in manifest.entries() {
            println!("==> {}", entry.url);

            let outcome = match self.sync_entry(entry).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Sync failed for {}: {:#}", entry.name, e);
                    SyncOutcome::Failed {
                        name: entry.name.clone(),
                        error: format!("{:#}", e),
                    }
                }
            };

            outcomes.push(outcome);
        }

        Ok(SyncSummary::compile(outcomes, start.elapsed()))
    }

    /// Copy one entry's files into the unified tree
    pub async fn sync_entry(&self, entry: &RepoEntry) -> Result<SyncOutcome> {
        let work_dir = entry.work_dir(&self.layout.repos_dir);

        if !work_dir.is_dir() {
            info!("No working directory for {}, skipping", entry.name);
            return Ok(SyncOutcome::Skipped {
                name: entry.name.clone(),
                reason: "no working directory (run pull first)".to_string(),
            });
        }

        if entry.name == GRAYSCALE_SOURCE_REPO {
            return self.sync_grayscale(entry, &work_dir).await;
        }

        // Lua colorschemes are not supported yet
        if work_dir.join(LUA_DIR).is_dir() {
            info!("Skipping lua colorscheme {}", entry.name);
            return Ok(SyncOutcome::Skipped {
                name: entry.name.clone(),
                reason: "lua colorscheme (not supported yet)".to_string(),
            });
        }

        let mut files_copied = 0;

        let autoload_src = work_dir.join(AUTOLOAD_DIR);
        if autoload_src.is_dir() {
            println!(
                "--> copy {}/ -> {}",
                AUTOLOAD_DIR,
                self.layout.autoload_dir.display()
            );
            files_copied += copy_tree(&autoload_src, &self.layout.autoload_dir).await?;
        }

        let colors_src = work_dir.join(COLORS_DIR);
        if colors_src.is_dir() {
            println!(
                "--> copy {}/{} -> {}",
                COLORS_DIR,
                VIM_FILE_PATTERN,
                self.layout.colors_dir.display()
            );
            files_copied +=
                copy_matching_files(&colors_src, &self.layout.colors_dir, &self.vim_pattern)
                    .await?;
        }

        let extras_src = work_dir.join(EXTRAS_DIR);
        if extras_src.is_dir() {
            println!(
                "--> copy {}/ -> {}",
                EXTRAS_DIR,
                self.layout.extras_dir.display()
            );
            files_copied += copy_tree(&extras_src, &self.layout.extras_dir).await?;
        }

        info!("Synced {} ({} files)", entry.name, files_copied);
        Ok(SyncOutcome::Synced {
            name: entry.name.clone(),
            files_copied,
        })
    }

    /// The base16 collection ships hundreds of variants; only the grayscale
    /// ones are wanted, and nothing else from that repository is taken.
    async fn sync_grayscale(&self, entry: &RepoEntry, work_dir: &Path) -> Result<SyncOutcome> {
        let colors_src = work_dir.join(COLORS_DIR);
        if !colors_src.is_dir() {
            return Ok(SyncOutcome::Skipped {
                name: entry.name.clone(),
                reason: "no colors directory".to_string(),
            });
        }

        println!(
            "--> copy {}/{} -> {}",
            COLORS_DIR,
            GRAYSCALE_FILE_PATTERN,
            self.layout.colors_dir.display()
        );
        let files_copied =
            copy_matching_files(&colors_src, &self.layout.colors_dir, &self.grayscale_pattern)
                .await?;

        info!("Synced {} ({} grayscale files)", entry.name, files_copied);
        Ok(SyncOutcome::Synced {
            name: entry.name.clone(),
            files_copied,
        })
    }
}

/// Recursively copy the contents of `src` into `dest`, merging with whatever
/// is already there. Returns the number of files copied.
pub async fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("Failed to relativize {}", entry.path().display()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .await
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target)
                .await
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Copy the regular files directly under `src` whose names match `pattern`
/// into `dest`. Subdirectories are not descended into.
pub async fn copy_matching_files(
    src: &Path,
    dest: &Path,
    pattern: &FilePattern,
) -> Result<usize> {
    let mut copied = 0;
    let mut entries = fs::read_dir(src)
        .await
        .with_context(|| format!("Failed to read {}", src.display()))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to read {}", src.display()))?
    {
        if !entry.file_type().await?.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let name = match file_name.to_str() {
            Some(name) => name,
            None => continue,
        };

        if !pattern.matches(name) {
            continue;
        }

        fs::copy(entry.path(), dest.join(name))
            .await
            .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        copied += 1;
    }

    Ok(copied)
}
