use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default location of the main configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging defaults, TOML, environment variables, and JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads application configuration rooted at a specific TOML file.
    ///
    /// Missing files are skipped, so an absent config yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Self::figment(path)
            .merge(Env::prefixed("APP_").split("__"))
            .join(Json::file(path.with_extension("json")))
            .extract()?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Loads application configuration with a specific profile overlay.
    ///
    /// `config/Config.toml` is read first, then `config/Config.{profile}.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(path: impl AsRef<Path>, profile: &str) -> Result<AppConfig> {
        let path = path.as_ref();
        let profile_path = path.with_extension(format!("{profile}.toml"));
        let config: AppConfig = Self::figment(path)
            .merge(Toml::file(profile_path))
            .merge(Env::prefixed("APP_").split("__"))
            .join(Json::file(path.with_extension("json")))
            .extract()?;

        Ok(config)
    }

    /// Defaults overlaid with the TOML file, without environment overrides.
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::file(path))
    }
}
