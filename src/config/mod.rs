use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::core::DEFAULT_MAX_PAGES;
use crate::infrastructure::api::Endpoints;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CRAWL_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Directory for `jobscope.log*`; defaults to `<data dir>/logs`
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub default_max_pages: u32,
    pub request_timeout_secs: u64,
    pub crawl_timeout_secs: u64,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Endpoints::default().base().to_string(),
            default_max_pages: DEFAULT_MAX_PAGES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            crawl_timeout_secs: DEFAULT_CRAWL_TIMEOUT_SECS,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn crawl_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl_timeout_secs.max(1))
    }
}

/// Outcome of reading the config file
#[derive(Debug)]
pub struct Loaded {
    pub config: Config,
    pub path: Option<PathBuf>,
    /// Set when the file exists but could not be used
    pub warning: Option<String>,
}

/// Load config from `explicit` or the default location. A missing file yields
/// defaults silently; an unreadable or malformed one yields defaults plus a
/// warning for the status bar.
pub fn load(explicit: Option<&Path>) -> Loaded {
    let path = explicit.map(Path::to_path_buf).or_else(config_path);
    let Some(path) = path else {
        return Loaded {
            config: Config::default(),
            path: None,
            warning: None,
        };
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
            return Loaded {
                config: Config::default(),
                path: Some(path),
                warning: None,
            };
        }
        Err(err) => {
            return Loaded {
                config: Config::default(),
                warning: Some(format!("Config {} unreadable: {err}", path.display())),
                path: Some(path),
            };
        }
    };
    match parse(&content) {
        Ok(config) => Loaded {
            config,
            path: Some(path),
            warning: None,
        },
        Err(err) => Loaded {
            config: Config::default(),
            warning: Some(format!("Config {} ignored: {err}", path.display())),
            path: Some(path),
        },
    }
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("JOBSCOPE_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("jobscope").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("jobscope").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "jobscope", "jobscope")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("jobscope"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("jobscope"));
    }
    directories::ProjectDirs::from("io", "jobscope", "jobscope")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_dir(config: &Config) -> PathBuf {
    config
        .logging
        .dir
        .clone()
        .or_else(|| data_dir().map(|dir| dir.join("logs")))
        .unwrap_or_else(|| PathBuf::from(".jobscope").join("logs"))
}

pub fn export_dir() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("exports"))
        .unwrap_or_else(|| PathBuf::from(".jobscope").join("exports"))
}
