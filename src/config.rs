//! Driver configuration.
//!
//! ```toml
//! shortfall = "best-effort"
//!
//! [[cases]]
//! label = "first"
//! path = "testcases/testcase1.json"
//!
//! [[cases]]
//! path = "testcases/testcase2.json"
//! ```

use crate::batch::Case;
use crate::Shortfall;
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CaseSpec {
    pub label: Option<String>,
    pub path: PathBuf,
}

impl CaseSpec {
    pub fn into_case(self) -> Case {
        match self.label {
            Some(label) => Case::new(label, self.path),
            None => Case::from_path(self.path),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub shortfall: Shortfall,
    #[serde(default = "default_cases")]
    pub cases: Vec<CaseSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            shortfall: Shortfall::default(),
            cases: default_cases(),
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }

    pub fn cases(&self) -> Vec<Case> {
        self.cases.iter().cloned().map(CaseSpec::into_case).collect()
    }
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn default_cases() -> Vec<CaseSpec> {
    ["testcase1.json", "testcase2.json"]
        .iter()
        .map(|path| CaseSpec {
            label: None,
            path: PathBuf::from(path),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.shortfall, Shortfall::Reject);
        let labels: Vec<String> = settings.cases().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["testcase1", "testcase2"]);

        let empty: Settings = "".parse().unwrap();
        assert_eq!(empty, settings);
    }

    #[test]
    fn test_parse() {
        let settings: Settings = r#"
            shortfall = "best-effort"

            [[cases]]
            label = "first"
            path = "a.json"

            [[cases]]
            path = "dir/b.json"
        "#
        .parse()
        .unwrap();

        assert_eq!(settings.shortfall, Shortfall::BestEffort);
        let cases = settings.cases();
        assert_eq!(cases[0].label, "first");
        assert_eq!(cases[1].label, "b");
        assert_eq!(cases[1].source, PathBuf::from("dir/b.json"));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(matches!(
            "shortfall = \"guess\"".parse::<Settings>(),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            "threads = 4".parse::<Settings>(),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "shortfall = \"reject\"").unwrap();
        writeln!(file, "[[cases]]").unwrap();
        writeln!(file, "path = \"x.json\"").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.cases.len(), 1);

        assert!(matches!(
            Settings::load("/nonexistent/config.toml"),
            Err(ConfigError::Read { .. })
        ));
    }
}
