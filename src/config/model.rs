// src/config/model.rs

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::exec::{DEFAULT_BINARY, StopMode};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [runner]
/// binary = "ffmpeg"
/// stop = "terminate"
/// timeout = "90s"
///
/// [io]
/// stdin = "null"
/// stdout = "inherit"
/// stderr = "proc.log"
///
/// [env]
/// FFREPORT = "file=report.log:level=32"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub runner: RunnerSection,

    #[serde(default)]
    pub io: IoSection,

    /// Extra environment variables for the child, on top of the inherited ones.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    /// Executable name (looked up on `PATH`) or path.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// What to do with the process when the run is cancelled.
    #[serde(default)]
    pub stop: StopMode,

    /// Duration string (e.g. `"90s"`) after which the run is cancelled.
    #[serde(default)]
    pub timeout: Option<String>,
}

fn default_binary() -> String {
    DEFAULT_BINARY.to_string()
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            stop: StopMode::default(),
            timeout: None,
        }
    }
}

/// `[io]` section: where the child's standard streams go.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IoSection {
    #[serde(default = "Redirect::null")]
    pub stdin: Redirect,

    #[serde(default = "Redirect::inherit")]
    pub stdout: Redirect,

    #[serde(default = "Redirect::inherit")]
    pub stderr: Redirect,
}

impl Default for IoSection {
    fn default() -> Self {
        Self {
            stdin: Redirect::Null,
            stdout: Redirect::Inherit,
            stderr: Redirect::Inherit,
        }
    }
}

/// Target of one standard stream.
///
/// `"null"` and `"inherit"` are keywords; any other string is a file path.
/// Output files are created if missing and appended to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Redirect {
    Null,
    Inherit,
    File(PathBuf),
}

impl Redirect {
    fn null() -> Self {
        Redirect::Null
    }

    fn inherit() -> Self {
        Redirect::Inherit
    }

    /// Open the target for the child's stdin.
    pub fn input(&self) -> Result<Stdio> {
        match self {
            Redirect::Null => Ok(Stdio::null()),
            Redirect::Inherit => Ok(Stdio::inherit()),
            Redirect::File(path) => {
                let file = OpenOptions::new()
                    .read(true)
                    .open(path)
                    .with_context(|| format!("opening stdin file {:?}", path))?;
                Ok(Stdio::from(file))
            }
        }
    }

    /// Open the target for the child's stdout or stderr.
    pub fn output(&self) -> Result<Stdio> {
        match self {
            Redirect::Null => Ok(Stdio::null()),
            Redirect::Inherit => Ok(Stdio::inherit()),
            Redirect::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("opening output file {:?}", path))?;
                Ok(Stdio::from(file))
            }
        }
    }
}

impl From<String> for Redirect {
    fn from(s: String) -> Self {
        match s.trim() {
            "null" => Redirect::Null,
            "inherit" => Redirect::Inherit,
            path => Redirect::File(PathBuf::from(path)),
        }
    }
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub binary: String,
    pub stop: StopMode,
    pub timeout: Option<Duration>,
    pub io: IoSection,
    pub env: BTreeMap<String, String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        Self {
            binary: raw.runner.binary,
            stop: raw.runner.stop,
            timeout: None,
            io: raw.io,
            env: raw.env,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_keywords_and_paths() {
        assert_eq!(Redirect::from("null".to_string()), Redirect::Null);
        assert_eq!(Redirect::from(" inherit ".to_string()), Redirect::Inherit);
        assert_eq!(
            Redirect::from("logs/proc.log".to_string()),
            Redirect::File(PathBuf::from("logs/proc.log"))
        );
        assert_eq!(
            Redirect::from(" logs/proc.log\n".to_string()),
            Redirect::File(PathBuf::from("logs/proc.log"))
        );
        assert_eq!(Redirect::from("   ".to_string()), Redirect::File(PathBuf::new()));
    }

    #[test]
    fn output_redirect_creates_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.log");
        Redirect::File(path.clone()).output()?;
        assert!(path.is_file());
        Ok(())
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = Redirect::File(dir.path().join("missing.txt")).input();
        assert!(res.is_err());
    }
}
