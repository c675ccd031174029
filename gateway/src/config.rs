use admin_config::Config;
use anyhow::Context;

use crate::args::{Args, DEFAULT_CONFIG_PATH};

/// Loads the configuration file. A missing file at the default location
/// falls back to the default configuration.
pub(crate) fn load(args: &Args) -> anyhow::Result<Config> {
    if args.config.as_os_str() == DEFAULT_CONFIG_PATH && !args.config.exists() {
        return Ok(Config::default());
    }

    Config::load(&args.config).context("loading the admin gateway configuration")
}
