//! Environment-driven settings.
//!
//! Values come from the process environment, which `main` first populates
//! from a `.env` file via `dotenvy`. CLI flags override them.

use std::path::PathBuf;

pub const DATA_PATH_VAR: &str = "BIKESHARE_DATA_PATH";
pub const LOG_FILE_VAR: &str = "LOG_FILE_PATH";

const DEFAULT_DATA_PATH: &str = "hour.csv";
const DEFAULT_LOG_FILE: &str = "logs/bikeshare_dash.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Hourly usage CSV loaded at startup.
    pub data_path: PathBuf,
    /// Rolling JSON log file; rotated daily.
    pub log_file_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            data_path: get(DATA_PATH_VAR, DEFAULT_DATA_PATH),
            log_file_path: get(LOG_FILE_VAR, DEFAULT_LOG_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.data_path, PathBuf::from("hour.csv"));
        assert_eq!(settings.log_file_path, PathBuf::from("logs/bikeshare_dash.log"));
    }

    #[test]
    fn test_values_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (DATA_PATH_VAR, "/data/hour.csv"),
            (LOG_FILE_VAR, "  "),
        ]);
        let settings = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(settings.data_path, PathBuf::from("/data/hour.csv"));
        assert_eq!(settings.log_file_path, PathBuf::from("logs/bikeshare_dash.log"));
    }
}
