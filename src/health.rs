//! Preflight checks for the `doctor` command
//!
//! Verifies that git is available, the manifest is readable, and the
//! collection root is usable before any real work is attempted.

use crate::config::Config;
use crate::layout::Layout;
use crate::manifest::Manifest;

/// Result of all preflight checks
#[derive(Debug, Clone)]
pub struct HealthCheck {
    /// Git installation status
    pub git: CheckResult,
    /// Manifest file status
    pub manifest: CheckResult,
    /// Collection root status
    pub root: CheckResult,
    /// Repos cache coverage (warning only, pull fixes it)
    pub repos_cache: CheckResult,
}

/// Result of an individual check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
    pub is_warning: bool,
}

#[allow(dead_code)]
impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: None,
            is_warning: false,
        }
    }

    fn ok_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: Some(details.into()),
            is_warning: false,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            details: None,
            is_warning: false,
        }
    }

    fn error_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            details: Some(details.into()),
            is_warning: false,
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: None,
            is_warning: true,
        }
    }

    fn warning_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: Some(details.into()),
            is_warning: true,
        }
    }
}

impl HealthCheck {
    /// Run all preflight checks
    pub fn run(config: &Config) -> Self {
        Self {
            git: Self::check_git(),
            manifest: Self::check_manifest(config),
            root: Self::check_root(config),
            repos_cache: Self::check_repos_cache(config),
        }
    }

    /// Check if all required checks passed (excludes warnings)
    pub fn all_passed(&self) -> bool {
        self.git.passed && self.manifest.passed && self.root.passed
        // Repos cache coverage is informational, not required
    }

    /// Get list of failed checks (errors only, not warnings)
    pub fn errors(&self) -> Vec<&CheckResult> {
        [&self.git, &self.manifest, &self.root, &self.repos_cache]
            .into_iter()
            .filter(|r| !r.passed && !r.is_warning)
            .collect()
    }

    /// Get list of warnings
    pub fn warnings(&self) -> Vec<&CheckResult> {
        [&self.git, &self.manifest, &self.root, &self.repos_cache]
            .into_iter()
            .filter(|r| r.is_warning)
            .collect()
    }

    /// Check git installation
    fn check_git() -> CheckResult {
        match std::process::Command::new("git").arg("--version").output() {
            Ok(output) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout);
                CheckResult::ok_with_details("Git installed", version.trim().to_string())
            }
            Ok(_) => CheckResult::error("Git command failed"),
            Err(_) => CheckResult::error_with_details(
                "Git not found in PATH",
                "Install git: https://git-scm.com/downloads",
            ),
        }
    }

    /// Check the manifest exists and parses
    fn check_manifest(config: &Config) -> CheckResult {
        let path = config.manifest_path();
        if !path.is_file() {
            return CheckResult::error_with_details(
                "Manifest not found",
                format!(
                    "Create {} with one repository URL per line",
                    path.display()
                ),
            );
        }

        match Manifest::load(&path) {
            Ok(manifest) if manifest.is_empty() => CheckResult::warning_with_details(
                "Manifest is empty",
                format!("Add repository URLs to {}", path.display()),
            ),
            Ok(manifest) => CheckResult::ok_with_details(
                "Manifest readable",
                format!("{} repositories listed", manifest.len()),
            ),
            Err(e) => {
                CheckResult::error_with_details("Manifest unreadable", format!("{:#}", e))
            }
        }
    }

    /// Check the collection root
    fn check_root(config: &Config) -> CheckResult {
        let root = config.root_dir();
        if root.is_dir() {
            CheckResult::ok_with_details("Collection root exists", root.display().to_string())
        } else if root.exists() {
            CheckResult::error_with_details(
                "Collection root is not a directory",
                root.display().to_string(),
            )
        } else {
            CheckResult::warning_with_details(
                "Collection root does not exist yet",
                format!("It will be created on the next run: {}", root.display()),
            )
        }
    }

    /// Check how many manifest entries have a working directory
    fn check_repos_cache(config: &Config) -> CheckResult {
        let manifest = match Manifest::load(&config.manifest_path()) {
            Ok(manifest) => manifest,
            Err(_) => {
                return CheckResult::warning("Repos cache not checked (manifest unreadable)")
            }
        };

        let layout = Layout::new(&config.root_dir());
        let present = manifest
            .entries()
            .filter(|entry| entry.work_dir(&layout.repos_dir).is_dir())
            .count();

        if present == manifest.len() {
            CheckResult::ok_with_details(
                "Repos cache complete",
                format!(
                    "{} of {} working directories present",
                    present,
                    manifest.len()
                ),
            )
        } else {
            CheckResult::warning_with_details(
                "Repos cache incomplete",
                format!(
                    "{} of {} working directories present. Run: schemekeeper pull",
                    present,
                    manifest.len()
                ),
            )
        }
    }

    /// Get all checks as a slice for iteration
    pub fn all_checks(&self) -> [(&'static str, &CheckResult); 4] {
        [
            ("Git Installation", &self.git),
            ("Manifest", &self.manifest),
            ("Collection Root", &self.root),
            ("Repos Cache", &self.repos_cache),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(root: &std::path::Path) -> Config {
        Config {
            root: root.display().to_string(),
            manifest: "repos.txt".to_string(),
        }
    }

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("Test passed");
        assert!(result.passed);
        assert!(!result.is_warning);
        assert!(result.details.is_none());
    }

    #[test]
    fn test_check_result_warning_still_passes() {
        let result = CheckResult::warning("Heads up");
        assert!(result.passed);
        assert!(result.is_warning);
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error_with_details("Broken", "Details");
        assert!(!result.passed);
        assert!(!result.is_warning);
        assert_eq!(result.details, Some("Details".to_string()));
    }

    #[test]
    fn test_git_check() {
        let result = HealthCheck::check_git();
        // Git should be installed in dev environment
        assert!(result.passed);
        assert!(result.details.is_some());
    }

    #[test]
    fn test_check_manifest_missing() {
        let temp = TempDir::new().unwrap();
        let result = HealthCheck::check_manifest(&config_for(temp.path()));

        assert!(!result.passed);
        assert!(result.details.unwrap().contains("repos.txt"));
    }

    #[test]
    fn test_check_manifest_with_entries() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("repos.txt"),
            "https://example.com/a.git\nhttps://example.com/b.git\n",
        )
        .unwrap();

        let result = HealthCheck::check_manifest(&config_for(temp.path()));

        assert!(result.passed);
        assert!(!result.is_warning);
        assert!(result.details.unwrap().contains("2 repositories"));
    }

    #[test]
    fn test_check_manifest_empty_is_a_warning() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("repos.txt"), "\n\n").unwrap();

        let result = HealthCheck::check_manifest(&config_for(temp.path()));

        assert!(result.passed);
        assert!(result.is_warning);
    }

    #[test]
    fn test_check_root_existing() {
        let temp = TempDir::new().unwrap();
        let result = HealthCheck::check_root(&config_for(temp.path()));
        assert!(result.passed);
        assert!(!result.is_warning);
    }

    #[test]
    fn test_check_root_missing_is_a_warning() {
        let temp = TempDir::new().unwrap();
        let result = HealthCheck::check_root(&config_for(&temp.path().join("not-yet")));
        assert!(result.passed);
        assert!(result.is_warning);
    }

    #[test]
    fn test_check_root_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("occupied");
        std::fs::write(&file, "in the way").unwrap();

        let result = HealthCheck::check_root(&config_for(&file));
        assert!(!result.passed);
    }

    #[test]
    fn test_check_repos_cache_counts_work_dirs() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("repos.txt"),
            "https://example.com/pulled.git\nhttps://example.com/pending.git\n",
        )
        .unwrap();
        std::fs::create_dir_all(temp.path().join("repos/pulled")).unwrap();

        let result = HealthCheck::check_repos_cache(&config_for(temp.path()));

        assert!(result.is_warning);
        assert!(result.details.unwrap().contains("1 of 2"));
    }

    #[test]
    fn test_check_repos_cache_complete() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("repos.txt"), "https://example.com/done.git\n")
            .unwrap();
        std::fs::create_dir_all(temp.path().join("repos/done")).unwrap();

        let result = HealthCheck::check_repos_cache(&config_for(temp.path()));

        assert!(result.passed);
        assert!(!result.is_warning);
    }

    #[test]
    fn test_all_passed_ignores_warnings() {
        let health = HealthCheck {
            git: CheckResult::ok("Git OK"),
            manifest: CheckResult::ok("Manifest OK"),
            root: CheckResult::warning("Root missing"),
            repos_cache: CheckResult::warning("Cache incomplete"),
        };
        assert!(health.all_passed());
    }

    #[test]
    fn test_all_passed_with_failing_manifest() {
        let health = HealthCheck {
            git: CheckResult::ok("Git OK"),
            manifest: CheckResult::error("Manifest missing"),
            root: CheckResult::ok("Root OK"),
            repos_cache: CheckResult::ok("Cache OK"),
        };
        assert!(!health.all_passed());
    }

    #[test]
    fn test_errors_excludes_warnings() {
        let health = HealthCheck {
            git: CheckResult::error("Git missing"),
            manifest: CheckResult::ok("Manifest OK"),
            root: CheckResult::ok("Root OK"),
            repos_cache: CheckResult::warning("Cache incomplete"),
        };
        let errors = health.errors();
        assert_eq!(errors.len(), 1);
        assert!(!errors[0].passed);
    }

    #[test]
    fn test_warnings_returns_only_warnings() {
        let health = HealthCheck {
            git: CheckResult::ok("Git OK"),
            manifest: CheckResult::error("Manifest missing"),
            root: CheckResult::ok("Root OK"),
            repos_cache: CheckResult::warning("Cache incomplete"),
        };
        let warnings = health.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].is_warning);
    }

    #[test]
    fn test_all_checks_returns_all_four() {
        let health = HealthCheck {
            git: CheckResult::ok("Git OK"),
            manifest: CheckResult::ok("Manifest OK"),
            root: CheckResult::ok("Root OK"),
            repos_cache: CheckResult::ok("Cache OK"),
        };
        let checks = health.all_checks();
        assert_eq!(checks.len(), 4);
        assert_eq!(checks[0].0, "Git Installation");
        assert_eq!(checks[1].0, "Manifest");
        assert_eq!(checks[2].0, "Collection Root");
        assert_eq!(checks[3].0, "Repos Cache");
    }
}
