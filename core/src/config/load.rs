use std::path::Path;

use serde::Deserialize;

use super::types::TeeOptions;
use crate::error::{Result, TeeError};

#[derive(Deserialize)]
struct ConfigFile {
    tee: TeeOptions,
}

/// Parse the `[tee]` table of a TOML document.
pub fn load_from_str(s: &str) -> Result<TeeOptions> {
    let file: ConfigFile =
        toml::from_str(s).map_err(|e| TeeError::config(format!("invalid tee config: {e}")))?;
    file.tee.validate()?;
    Ok(file.tee)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<TeeOptions> {
    let s = std::fs::read_to_string(path.as_ref())?;
    load_from_str(&s)
}

/// Apply `TEELOG_*` environment overrides on top of `opts`.
pub fn apply_env_overrides(opts: &mut TeeOptions) -> Result<()> {
    apply_overrides(opts, |key| std::env::var(key).ok())
}

pub(crate) fn apply_overrides<F>(opts: &mut TeeOptions, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("TEELOG_PATH") {
        opts.logpath = v.trim().into();
    }
    if let Some(v) = get("TEELOG_REDIRECT_STDERR") {
        opts.redirect_stderr = parse_bool("TEELOG_REDIRECT_STDERR", &v)?;
    }
    if let Some(v) = get("TEELOG_APPEND") {
        opts.append_mode = parse_bool("TEELOG_APPEND", &v)?;
    }
    if let Some(v) = get("TEELOG_STRIP_FORMATTING") {
        opts.strip_formatting_for_file = parse_bool("TEELOG_STRIP_FORMATTING", &v)?;
    }
    if let Some(v) = get("TEELOG_IMMEDIATE_FLUSH") {
        opts.immediately_flush = parse_bool("TEELOG_IMMEDIATE_FLUSH", &v)?;
    }

    opts.validate()
}

fn parse_bool(key: &str, v: &str) -> Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(TeeError::config(format!(
            "{key}: expected a boolean, got '{other}'"
        ))),
    }
}
