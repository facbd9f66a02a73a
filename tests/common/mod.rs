//! Shared fixtures for schemekeeper integration tests
//!
//! Builds throwaway collection roots and local git origins so pull and sync
//! can be exercised end to end without touching the network.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use schemekeeper::{Config, Layout};

/// A throwaway collection root with optional local git origins next to it
pub struct TestCollection {
    temp: TempDir,
    pub root: PathBuf,
}

impl TestCollection {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = temp.path().join("collection");
        std::fs::create_dir_all(&root).expect("Failed to create collection root");

        Self { temp, root }
    }

    pub fn config(&self) -> Config {
        Config {
            root: self.root.display().to_string(),
            manifest: "repos.txt".to_string(),
        }
    }

    pub fn layout(&self) -> Layout {
        Layout::new(&self.root)
    }

    /// Write the manifest, one URL per line
    pub fn write_manifest(&self, urls: &[&str]) {
        let mut content = urls.join("\n");
        content.push('\n');
        std::fs::write(self.root.join("repos.txt"), content).expect("Failed to write manifest");
    }

    /// Write a config file pointing at this collection root
    pub fn write_config_file(&self) -> PathBuf {
        let path = self.temp.path().join("config.yml");
        let content = format!(
            "root: \"{}\"\nmanifest: \"repos.txt\"\n",
            self.root.display()
        );
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }

    /// Create a local origin repository with one commit; returns its URL
    /// (a plain path, which git clone accepts)
    pub fn create_origin(&self, name: &str, files: &[(&str, &str)]) -> String {
        let origin = self.temp.path().join("origins").join(name);
        std::fs::create_dir_all(&origin).expect("Failed to create origin dir");

        run_git(&origin, &["init"]);
        run_git(&origin, &["config", "user.email", "tests@example.com"]);
        run_git(&origin, &["config", "user.name", "Integration Tests"]);

        write_files(&origin, files);

        run_git(&origin, &["add", "."]);
        run_git(&origin, &["commit", "-m", "Initial import"]);

        origin.display().to_string()
    }

    /// Add a commit to an existing origin
    pub fn commit_to_origin(&self, name: &str, files: &[(&str, &str)]) {
        let origin = self.temp.path().join("origins").join(name);
        write_files(&origin, files);
        run_git(&origin, &["add", "."]);
        run_git(&origin, &["commit", "-m", "Update colors"]);
    }

    /// Fake an already-pulled working directory without involving git
    pub fn add_work_dir(&self, name: &str, files: &[(&str, &str)]) {
        let work_dir = self.root.join("repos").join(name);
        write_files(&work_dir, files);
    }
}

fn write_files(base: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = base.join(rel);
        std::fs::create_dir_all(path.parent().expect("file has no parent"))
            .expect("Failed to create parent dir");
        std::fs::write(&path, content).expect("Failed to write file");
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");

    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
}
