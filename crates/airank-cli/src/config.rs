//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use airank_core::Jitter;
use airank_toolify::Pacing;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for airank
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub encryption: EncryptionConfig,
    pub http: HttpSettings,
    pub pacing: PacingConfig,
    pub toolify: ToolifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
    /// Write the readable `.json` next to every `.enc`
    pub keep_plaintext: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            keep_plaintext: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    pub key_file: PathBuf,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            key_file: PathBuf::from(airank_store::DEFAULT_KEY_FILE),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_attempts: 3,
        }
    }
}

impl HttpSettings {
    pub fn http_config(&self) -> airank_core::HttpConfig {
        airank_core::HttpConfig {
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Delay ranges as `[min, max]` seconds
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub retry_delay: [f64; 2],
    pub page_delay: [f64; 2],
    pub combination_delay: [f64; 2],
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            retry_delay: [2.0, 5.0],
            page_delay: [1.0, 3.0],
            combination_delay: [2.0, 5.0],
        }
    }
}

impl PacingConfig {
    pub fn pacing(&self) -> Pacing {
        let jitter = |[min, max]: [f64; 2]| Jitter::from_secs(min, max);
        Pacing {
            retry: jitter(self.retry_delay),
            page: jitter(self.page_delay),
            combination: jitter(self.combination_delay),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolifyConfig {
    pub base_url: String,
}

impl Default for ToolifyConfig {
    fn default() -> Self {
        Self {
            base_url: airank_toolify::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./airank.toml (current directory)
    /// 2. ~/.config/airank/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("airank.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "airank") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.output.data_dir, PathBuf::from("./data"));
        assert!(config.output.keep_plaintext);
        assert_eq!(config.encryption.key_file, PathBuf::from("encryption_key.key"));
        assert_eq!(config.http.timeout_secs, 15);
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.toolify.base_url, "https://www.toolify.ai/self-api/v1/top/");
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[output]
data_dir = "/srv/airank/data"
keep_plaintext = false

[http]
timeout_secs = 30

[pacing]
page_delay = [0.5, 1.5]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.output.data_dir, PathBuf::from("/srv/airank/data"));
        assert!(!config.output.keep_plaintext);
        assert_eq!(config.http.timeout_secs, 30);
        // untouched fields keep their defaults
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.pacing.retry_delay, [2.0, 5.0]);

        let pacing = config.pacing.pacing();
        assert_eq!(pacing.page.min(), Duration::from_millis(500));
        assert_eq!(pacing.page.max(), Duration::from_millis(1500));
    }

    #[test]
    fn from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("airank.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = \"soon\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("airank.toml"));
    }

    #[test]
    fn http_config_timeout() {
        let settings = HttpSettings {
            timeout_secs: 7,
            max_attempts: 1,
        };
        assert_eq!(settings.http_config().timeout, Duration::from_secs(7));
    }
}
