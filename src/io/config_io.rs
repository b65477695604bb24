use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Settings;

/// Error type for reading config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `$XDG_CONFIG_HOME/tasktable`, falling back to `~/.config/tasktable`
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    base.join("tasktable")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn default_state_path() -> PathBuf {
    config_dir().join("state.json")
}

/// Read settings from `path`. A missing file yields defaults; a malformed
/// one is an error.
pub fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Settings::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

impl Settings {
    /// The state file, or the default location under the config dir
    pub fn state_path(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(default_state_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = read_settings(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(settings.columns.default_min_width, 60);
        assert!(settings.tasks_file.is_none());
        assert!(settings.ui.colors.is_empty());
    }

    #[test]
    fn reads_all_sections() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r##"state_file = "/tmp/tt-state.json"
tasks_file = "tasks.json"

[columns]
default_min_width = 80

[ui.colors]
green = "#00FF00"
"##,
        )
        .unwrap();

        let settings = read_settings(&path).unwrap();
        assert_eq!(settings.state_path(), PathBuf::from("/tmp/tt-state.json"));
        assert_eq!(settings.tasks_file, Some(PathBuf::from("tasks.json")));
        assert_eq!(settings.columns.default_min_width, 80);
        assert_eq!(settings.ui.colors.get("green").map(String::as_str), Some("#00FF00"));
    }

    #[test]
    fn partial_sections_use_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[columns]\n").unwrap();
        let settings = read_settings(&path).unwrap();
        assert_eq!(settings.columns.default_min_width, 60);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "state_file = [").unwrap();
        assert!(matches!(
            read_settings(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
