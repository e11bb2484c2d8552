//! Application settings and paths.
//!
//! Settings live in `settings.json` under the XDG config directory. Every
//! field is optional in the file; missing fields take the defaults below.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::ReachabilityMethod;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/netvis)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Resolve the platform configuration directory.
    pub fn new() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "netvis", "netvis").ok_or(ConfigError::DirectoryNotFound)?;
        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Scan defaults, overridable from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Port selection string ("22,80", "all", "none").
    pub ports: String,
    /// Per-probe timeout in milliseconds.
    pub timeout_ms: u64,
    /// Minimum spacing between probes, in seconds.
    pub rate_limit_seconds: f64,
    /// Daily scan window, `HH:MM-HH:MM`.
    pub scan_window: String,
    /// Maximum concurrent host jobs.
    pub workers: usize,
    /// Engagement label recorded in results.
    pub engagement: String,
    /// Reachability mechanism.
    pub reachability: ReachabilityMethod,
    /// Reverse-resolve reachable hosts.
    pub resolve_hostnames: bool,
    /// Read the local neighbor table before probing.
    pub passive: bool,
    /// Extra port to service name entries.
    pub services: BTreeMap<u16, String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            ports: "22,80,443,3389".to_string(),
            timeout_ms: 1000,
            rate_limit_seconds: 0.2,
            scan_window: "00:00-23:59".to_string(),
            workers: crate::scanner::DEFAULT_WORKERS,
            engagement: "UNSPECIFIED".to_string(),
            reachability: ReachabilityMethod::Ping,
            resolve_hostnames: false,
            passive: true,
            services: BTreeMap::new(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when no file exists.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();
        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from a specific file, which must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded settings");
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.ports, "22,80,443,3389");
        assert_eq!(settings.timeout_ms, 1000);
        assert_eq!(settings.rate_limit_seconds, 0.2);
        assert_eq!(settings.scan_window, "00:00-23:59");
        assert!(settings.passive);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "workers": 8, "reachability": "tcp", "services": {{ "5432": "postgresql" }} }}"#
        )
        .unwrap();

        let settings = AppSettings::load_from(file.path()).unwrap();
        assert_eq!(settings.workers, 8);
        assert_eq!(settings.reachability, ReachabilityMethod::Tcp);
        assert_eq!(settings.services.get(&5432).map(String::as_str), Some("postgresql"));
        assert_eq!(settings.timeout_ms, 1000);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppSettings::load_from(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            AppSettings::load_from(file.path()),
            Err(ConfigError::InvalidFormat(_))
        ));
    }
}
