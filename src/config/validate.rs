// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, Redirect};
use crate::errors::{Result, RunError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = RunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_binary(&raw)?;
        validate_io(&raw)?;
        validate_env(&raw)?;

        let timeout = match raw.runner.timeout.as_deref() {
            Some(s) => Some(parse_timeout(s)?),
            None => None,
        };

        Ok(ConfigFile {
            binary: raw.runner.binary,
            stop: raw.runner.stop,
            timeout,
            io: raw.io,
            env: raw.env,
        })
    }
}

fn validate_binary(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runner.binary.trim().is_empty() {
        return Err(RunError::Config(
            "[runner].binary must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_io(cfg: &RawConfigFile) -> Result<()> {
    let streams = [
        ("stdin", &cfg.io.stdin),
        ("stdout", &cfg.io.stdout),
        ("stderr", &cfg.io.stderr),
    ];
    for (name, redirect) in streams {
        if let Redirect::File(path) = redirect {
            if path.as_os_str().is_empty() {
                return Err(RunError::Config(format!(
                    "[io].{name} must be \"null\", \"inherit\" or a file path (got a blank string)"
                )));
            }
        }
    }
    Ok(())
}

fn validate_env(cfg: &RawConfigFile) -> Result<()> {
    for key in cfg.env.keys() {
        if key.is_empty() || key.contains('=') || key.contains('\0') {
            return Err(RunError::Config(format!(
                "[env] has invalid variable name '{key}'"
            )));
        }
    }
    Ok(())
}

/// Parse a timeout, rejecting zero.
pub fn parse_timeout(s: &str) -> Result<Duration> {
    let d = parse_duration(s).map_err(|e| RunError::Config(format!("invalid timeout: {e}")))?;
    if d.is_zero() {
        return Err(RunError::Config("timeout must be greater than zero".to_string()));
    }
    Ok(d)
}

/// Parse a simple duration string like `"500ms"`, `"3s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => scaled_secs(value, 60),
        "h" => scaled_secs(value, 60 * 60),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

fn scaled_secs(value: u64, secs_per_unit: u64) -> std::result::Result<Duration, String> {
    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' is out of range", value))
}
