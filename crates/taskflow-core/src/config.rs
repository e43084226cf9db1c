use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::Deserialize;
use tracing::{debug, info};

/// User configuration, read from a TOML file.
///
/// Resolution order for the file: `--config` flag, `$TASKFLOW_CONFIG`, then
/// `~/.config/taskflow/config.toml`. A missing file means defaults; a file
/// that exists but does not parse is a user error and is surfaced, unlike
/// corruption in the task store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data: DataSection,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSection {
    pub location: Option<String>,
}

impl Config {
    #[tracing::instrument(skip(override_path))]
    pub fn load(override_path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = resolve_config_path(override_path) else {
            debug!("no config file, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            debug!(config = %path.display(), "config file absent, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let cfg: Config = toml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;

        info!(config = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn color_enabled(&self) -> bool {
        self.color.as_deref().map(parse_bool).unwrap_or(true)
    }
}

fn resolve_config_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var("TASKFLOW_CONFIG") {
        return Some(expand_tilde(Path::new(&env_path)));
    }

    dirs::config_dir().map(|dir| dir.join("taskflow").join("config.toml"))
}

/// Where the task store lives: `--data` flag, then `data.location` from the
/// config, then `~/.taskflow`. The directory itself is created later by
/// [`crate::store::Store::open`].
#[tracing::instrument(skip(cfg, override_dir))]
pub fn resolve_data_dir(cfg: &Config, override_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = override_dir {
        return Ok(path.to_path_buf());
    }

    if let Some(location) = &cfg.data.location {
        return Ok(expand_tilde(Path::new(location)));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(home.join(".taskflow"))
}

fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "on" | "true"
    )
}
