use std::{env, path::PathBuf};

use super::schema::{Settings, StorageSettings};

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `MONOFM__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MONOFM")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Load settings, logging and falling back to defaults when the file is
    /// unreadable or the values are invalid.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(s) => match s.validate() {
                Ok(()) => s,
                Err(msg) => {
                    log::warn!("invalid config, using defaults: {msg}");
                    Self::default()
                }
            },
            Err(e) => {
                // Config is optional; failures should not prevent the app from starting.
                log::warn!("failed to load config, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.tick_interval_ms == 0 {
            return Err("playback.tick_interval_ms must be >= 1".to_string());
        }
        if self.storage.namespace.trim().is_empty() {
            return Err("storage.namespace must not be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.playback.volume_step) {
            return Err("playback.volume_step must be within 0..=1".to_string());
        }
        Ok(())
    }
}

impl StorageSettings {
    /// Directory holding this namespace's keys, or `None` when no base
    /// directory can be determined.
    pub fn namespace_dir(&self) -> Option<PathBuf> {
        let base = self.dir.clone().or_else(default_data_dir)?;
        Some(base.join(&self.namespace))
    }
}

/// Resolve the config path from `MONOFM_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MONOFM_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/monofm/config.toml`
/// or `~/.config/monofm/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_home("XDG_CONFIG_HOME", ".config").map(|d| d.join("monofm").join("config.toml"))
}

/// `$XDG_DATA_HOME/monofm` or `~/.local/share/monofm`.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_home("XDG_DATA_HOME", ".local/share").map(|d| d.join("monofm"))
}

fn xdg_home(var: &str, fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(fallback))
    }
}
