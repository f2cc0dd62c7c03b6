//! CLI command implementations.

pub(crate) mod embed;
pub(crate) mod render;

use std::path::PathBuf;

use clap::Args;
use gmap_config::{CliSettings, Config};
use gmap_renderer::{ConfigSource, EnvSource, MapConfig};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use embed::EmbedArgs;
pub(crate) use render::RenderArgs;

/// Map settings shared by all commands.
#[derive(Args, Debug, Default)]
pub(crate) struct MapArgs {
    /// Path to configuration file (default: auto-discover gmap.toml).
    #[arg(short, long, env = "GMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Google API key (default: config file, then GOOGLE_API_KEY).
    #[arg(long)]
    google_api_key: Option<String>,

    /// Iframe width (overrides config).
    #[arg(long)]
    width: Option<String>,

    /// Iframe height (overrides config).
    #[arg(long)]
    height: Option<String>,

    /// Wrap maps in a fluid, full-width container.
    #[arg(long)]
    fluid: bool,

    /// Use fixed-size maps even if the config enables fluid mode.
    #[arg(long, conflicts_with = "fluid")]
    no_fluid: bool,
}

impl MapArgs {
    /// Resolve the effective map configuration.
    ///
    /// Precedence: flags, then `gmap.toml`, then `GOOGLE_API_KEY` (key only),
    /// then built-in defaults.
    pub(crate) fn resolve(self, output: &Output) -> Result<MapConfig, CliError> {
        self.resolve_with(&EnvSource, output)
    }

    fn resolve_with(
        self,
        source: &dyn ConfigSource,
        output: &Output,
    ) -> Result<MapConfig, CliError> {
        let fluid = self.resolve_fluid();
        let cli_settings = CliSettings {
            google_api_key: self.google_api_key,
            width: self.width,
            height: self.height,
            fluid,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        match &config.config_path {
            Some(path) => tracing::info!(path = %path.display(), "Loaded configuration"),
            None => tracing::info!("No configuration file found, using defaults"),
        }

        let map_config = config.map_options().resolve_with(source);
        if map_config.google_api_key().is_empty() {
            output.warning("Warning: no Google API key configured; maps will not load");
        }
        tracing::info!(
            width = %map_config.width(),
            height = %map_config.height(),
            fluid = map_config.fluid(),
            "Resolved map configuration"
        );

        Ok(map_config)
    }

    fn resolve_fluid(&self) -> Option<bool> {
        if self.fluid {
            Some(true)
        } else if self.no_fluid {
            Some(false)
        } else {
            None
        }
    }
}
