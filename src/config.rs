use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for schemekeeper
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Collection root: the directory holding the manifest, the repos cache,
    /// and the unified destination trees
    #[serde(default = "default_root")]
    pub root: String,

    /// Manifest file name, resolved relative to the root unless absolute
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

// Default value functions
fn default_root() -> String {
    ".".to_string()
}
fn default_manifest() -> String {
    "repos.txt".to_string()
}

impl Config {
    /// Load configuration from the default location or create a default config
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            let config = Self::default();

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }

            config.save(&config_path)?;

            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        // Expand environment variables in paths
        config.expand_paths()?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("schemekeeper").join("config.yml"))
    }

    /// Expand environment variables and `~` in configured paths
    pub fn expand_paths(&mut self) -> Result<()> {
        self.root = shellexpand::full(&self.root)
            .context("Failed to expand root path")?
            .into_owned();

        self.manifest = shellexpand::full(&self.manifest)
            .context("Failed to expand manifest path")?
            .into_owned();

        Ok(())
    }

    /// The collection root as a path
    pub fn root_dir(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    /// Absolute or root-relative location of the manifest file
    pub fn manifest_path(&self) -> PathBuf {
        let manifest = Path::new(&self.manifest);
        if manifest.is_absolute() {
            manifest.to_path_buf()
        } else {
            self.root_dir().join(manifest)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            manifest: default_manifest(),
        }
    }
}
