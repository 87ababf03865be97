use crate::domain::checklist::ChecklistState;
use crate::domain::constants::{DEFAULT_LOG_PATH, SETTINGS_RELATIVE_PATH};
use crate::domain::models::{BatchEntry, SettingsFile};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn settings_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(SETTINGS_RELATIVE_PATH))
}

/// Loads the settings file. An explicit path must exist; the per-user default is optional.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<SettingsFile> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("settings file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match settings_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(SettingsFile::default()),
        },
    };
    let raw = std::fs::read_to_string(&path)?;
    let settings: SettingsFile = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid settings file {}: {}", path.display(), e))?;
    log::debug!("loaded settings from {}", path.display());
    Ok(settings)
}

/// `--log` wins over the settings file, which wins over the built-in default.
pub fn resolve_log_path(flag: Option<&Path>, settings: &SettingsFile) -> PathBuf {
    if let Some(p) = flag {
        return p.to_path_buf();
    }
    settings
        .general
        .log_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH))
}

/// Reads a JSON object of check id -> bool.
pub fn load_checks_file(path: &Path) -> anyhow::Result<ChecklistState> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("could not read checks file {}: {}", path.display(), e))?;
    let map: BTreeMap<String, bool> = serde_json::from_str(&raw)?;
    Ok(ChecklistState::from_raw(map)?)
}

/// Reads a JSON array of batch review entries.
pub fn load_batch_file(path: &Path) -> anyhow::Result<Vec<BatchEntry>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("could not read batch file {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&raw)?)
}
