use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::extract::UploadSyntax;

/// Global configuration loaded from `~/.config/tapload/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaploadConfig {
    /// Upload syntax used when none is given on the command line: "tap" (default) or "dali".
    #[serde(default)]
    pub syntax: UploadSyntax,
    /// Directory where inline files are staged before extraction (None = fresh temp dir).
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
    /// Delete staged files nobody referenced. When false, extraction runs as a dry run.
    #[serde(default = "default_delete_unreferenced")]
    pub delete_unreferenced: bool,
}

fn default_delete_unreferenced() -> bool {
    true
}

impl Default for TaploadConfig {
    fn default() -> Self {
        Self {
            syntax: UploadSyntax::default(),
            staging_dir: None,
            delete_unreferenced: default_delete_unreferenced(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tapload")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TaploadConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] with an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<TaploadConfig> {
    if !path.exists() {
        let default_cfg = TaploadConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TaploadConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
