use std::num::NonZeroU8;
use std::path::PathBuf;
use std::{env, fs};

use anyhow::{Context, Result};
use config::{Config as HierarchicalConfig, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;
use xdg::BaseDirectories;

/// Name of bookstore managed directories (config, cache)
const BOOKSTORE_DIR_NAME: &str = "bookstore";
const BOOKSTORE_CONFIG_DIR_VAR: &str = "BOOKSTORE_CONFIG_DIR";
pub const BOOKSTORE_CONFIG_FILE: &str = "bookstore.toml";

#[derive(Clone, Debug, Deserialize, Default, Serialize)]
pub struct Config {
    /// bookstore configuration options
    #[serde(default, flatten)]
    pub store: StoreConfig,
}

/// Describes the configuration for the bookstore CLI
#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct StoreConfig {
    /// The URL of the storefront API to use
    // Using a URL type here adds an extra trailing slash,
    // so just use a String.
    pub store_url: Option<String>,

    /// Token authenticating the customer session
    ///
    /// Written by `bookstore login`, removed by `bookstore logout`.
    pub token: Option<String>,

    /// How many items `bookstore search` should show by default
    pub search_limit: Option<NonZeroU8>,
}

impl Config {
    /// Load the layered configuration: defaults, then the TOML config file,
    /// then `BOOKSTORE_*` environment variables.
    pub fn parse() -> Result<Config> {
        let config_file = config_file_path()?;
        debug!(path = ?config_file, "reading config");

        let builder = HierarchicalConfig::builder()
            .add_source(File::from(config_file).required(false))
            .add_source(Environment::with_prefix("BOOKSTORE"));

        let config = builder
            .build()
            .context("could not read configuration")?
            .try_deserialize()
            .context("could not parse configuration")?;

        Ok(config)
    }

    /// Replace the stored session token, keeping the rest of the config
    /// file intact.
    pub fn write_token(token: Option<String>) -> Result<()> {
        let config_file = config_file_path()?;

        let mut config = match fs::read_to_string(&config_file) {
            Ok(contents) => toml::from_str::<Config>(&contents)
                .context("could not parse existing config file")?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(err) => return Err(err).context("could not read config file"),
        };

        config.store.token = token;

        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent).context("could not create config directory")?;
        }
        let serialized = toml::to_string_pretty(&config).context("could not serialize config")?;
        fs::write(&config_file, serialized).context("could not write config file")?;
        debug!(path = ?config_file, "config written");

        Ok(())
    }
}

/// Path of the user's config file.
///
/// `$BOOKSTORE_CONFIG_DIR` overrides the XDG config home, which keeps tests
/// and scripted use away from the user's real configuration.
fn config_file_path() -> Result<PathBuf> {
    if let Ok(dir) = env::var(BOOKSTORE_CONFIG_DIR_VAR) {
        return Ok(PathBuf::from(dir).join(BOOKSTORE_CONFIG_FILE));
    }

    let dirs = BaseDirectories::with_prefix(BOOKSTORE_DIR_NAME);
    let config_home = dirs
        .get_config_home()
        .context("could not determine config directory ($HOME is unset?)")?;
    Ok(config_home.join(BOOKSTORE_CONFIG_FILE))
}
