//! Git operations - cloning and updating manifest repositories
//!
//! `pull` walks the manifest sequentially: entries without a working
//! directory are cloned into the repos cache, existing ones get a `git pull`
//! inside their working directory. Failures never abort the batch; they are
//! collected as outcomes and reported in the summary.

use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::layout::Layout;
use crate::manifest::{Manifest, RepoEntry};
use crate::process;

/// What `pull` will do for an entry, decided by working-directory existence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullAction {
    /// No working directory yet: clone fresh into the repos cache
    Clone,
    /// Working directory present: update it from its remote
    Update,
}

impl PullAction {
    /// Decide the action for an entry. Exactly one of clone/update applies.
    pub fn for_entry(entry: &RepoEntry, repos_dir: &Path) -> Self {
        if entry.work_dir(repos_dir).is_dir() {
            PullAction::Update
        } else {
            PullAction::Clone
        }
    }
}

/// Outcome of pulling a single repository
#[derive(Debug, Clone)]
pub enum PullOutcome {
    /// Repository was cloned for the first time
    Cloned { name: String },
    /// Existing repository was updated from its remote
    Updated { name: String },
    /// The git command failed; the batch continues
    Failed { name: String, error: String },
}

/// Results from a complete pull run
#[derive(Debug, Clone)]
pub struct PullSummary {
    pub total: usize,
    pub cloned: usize,
    pub updated: usize,
    pub failed: usize,
    pub duration: Duration,
    pub outcomes: Vec<PullOutcome>,
}

impl PullSummary {
    fn compile(outcomes: Vec<PullOutcome>, duration: Duration) -> Self {
        let total = outcomes.len();
        let mut cloned = 0;
        let mut updated = 0;
        let mut failed = 0;

        for outcome in &outcomes {
            match outcome {
                PullOutcome::Cloned { .. } => cloned += 1,
                PullOutcome::Updated { .. } => updated += 1,
                PullOutcome::Failed { .. } => failed += 1,
            }
        }

        Self {
            total,
            cloned,
            updated,
            failed,
            duration,
            outcomes,
        }
    }
}

/// Git client operating on a collection layout
pub struct GitClient {
    layout: Layout,
}

impl GitClient {
    /// Create a git client for the given layout
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Pull every manifest entry in order, collecting per-entry outcomes
    pub async fn pull_all(&self, manifest: &Manifest) -> Result<PullSummary> {
        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(manifest.len());

        for entry in manifest.entries() {
            println!("==> {}", entry.url);

            let outcome = match self.pull_entry(entry).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Pull failed for {}: {:#}", entry.name, e);
                    PullOutcome::Failed {
                        name: entry.name.clone(),
                        error: format!("{:#}", e),
                    }
                }
            };

            outcomes.push(outcome);
        }

        Ok(PullSummary::compile(outcomes, start.elapsed()))
    }

    /// Clone or update one entry depending on its working directory
    pub async fn pull_entry(&self, entry: &RepoEntry) -> Result<PullOutcome> {
        match PullAction::for_entry(entry, &self.layout.repos_dir) {
            PullAction::Clone => self.clone_repository(entry).await,
            PullAction::Update => self.update_repository(entry).await,
        }
    }

    /// Clone a repository into the repos cache under its derived name
    async fn clone_repository(&self, entry: &RepoEntry) -> Result<PullOutcome> {
        let output = process::run_command(
            "git",
            &["clone", &entry.url, &entry.name],
            &self.layout.repos_dir,
        )
        .await?;

        if !output.success {
            warn!("git clone failed for {}", entry.name);
            return Ok(PullOutcome::Failed {
                name: entry.name.clone(),
                error: output.error_summary(),
            });
        }

        info!("Cloned {}", entry.name);
        Ok(PullOutcome::Cloned {
            name: entry.name.clone(),
        })
    }

    /// Run `git pull` inside an existing working directory
    async fn update_repository(&self, entry: &RepoEntry) -> Result<PullOutcome> {
        let work_dir = entry.work_dir(&self.layout.repos_dir);
        let output = process::run_command("git", &["pull"], &work_dir).await?;

        if !output.success {
            warn!("git pull failed for {}", entry.name);
            return Ok(PullOutcome::Failed {
                name: entry.name.clone(),
                error: output.error_summary(),
            });
        }

        info!("Updated {}", entry.name);
        Ok(PullOutcome::Updated {
            name: entry.name.clone(),
        })
    }
}
