use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::path_map::PrettyRoutes;

/// Global configuration loaded from `~/.config/pagemirror/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Upper bound on asset downloads in flight at once (None = no bound).
    pub max_concurrent_downloads: Option<usize>,
    /// Connect timeout for every HTTP transfer, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout for a single asset transfer, in seconds.
    pub transfer_timeout_secs: u64,
    /// Total timeout for loading the page itself, in seconds.
    pub page_load_timeout_secs: u64,
    /// User-Agent sent with every request (None = libcurl default).
    pub user_agent: Option<String>,
    /// How an extensionless page path is turned into the base directory.
    pub pretty_routes: PrettyRoutes,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: None,
            connect_timeout_secs: 15,
            transfer_timeout_secs: 120,
            page_load_timeout_secs: 60,
            user_agent: None,
            pretty_routes: PrettyRoutes::default(),
        }
    }
}

impl MirrorConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_secs(self.transfer_timeout_secs)
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pagemirror")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MirrorConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MirrorConfig = toml::from_str(&data)?;
    Ok(cfg)
}
