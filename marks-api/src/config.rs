use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub const DEFAULT_DATA_PATH: &str = "marks.json";
pub const DEFAULT_WELCOME: &str =
    "Welcome to the Student Marks API. Use /api?name=X&name=Y to get marks.";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub listen: Option<String>,
    // Location of the marks dataset, relative to `deployment_root` when that is set
    // and the file exists there, otherwise relative to the working directory.
    pub data_path: Option<String>,
    pub deployment_root: Option<String>,
    // Message served on `GET /`. Defaults to `DEFAULT_WELCOME`.
    pub welcome_message: Option<String>,
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let cfg_str = fs::read_to_string(path)?;
        Ok(toml::from_str(&cfg_str)?)
    }

    /// Like [`Config::from_file`], but a missing file means "all defaults".
    pub fn from_file_or_default(path: &str) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            info!("Config file '{}' not found, using defaults", path);
            return Ok(Config::default());
        }
        Self::from_file(path)
    }

    pub fn apply_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("MARKS_API_LISTEN") {
            debug!("listen overridden from environment: {}", v);
            self.listen = Some(v);
        }
        if let Some(v) = lookup("MARKS_API_DATA") {
            debug!("data_path overridden from environment: {}", v);
            self.data_path = Some(v);
        }
        if let Some(v) = lookup("MARKS_API_ROOT") {
            debug!("deployment_root overridden from environment: {}", v);
            self.deployment_root = Some(v);
        }
        self
    }

    pub fn listen_addr(&self) -> &str {
        self.listen.as_deref().unwrap_or(DEFAULT_LISTEN)
    }

    pub fn welcome_message(&self) -> &str {
        self.welcome_message.as_deref().unwrap_or(DEFAULT_WELCOME)
    }

    /// Picks the dataset location without reading it: the copy under the
    /// deployment root wins when present, otherwise the working-directory path.
    pub fn resolve_data_path(&self) -> PathBuf {
        let data_path = Path::new(self.data_path.as_deref().unwrap_or(DEFAULT_DATA_PATH));
        if let Some(root) = &self.deployment_root {
            let candidate = Path::new(root).join(data_path);
            if candidate.exists() {
                return candidate;
            }
            debug!(
                "Dataset not found at {}, falling back to {}",
                candidate.display(),
                data_path.display()
            );
        }
        data_path.to_path_buf()
    }
}
