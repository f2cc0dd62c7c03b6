//! `gmap embed` command implementation.

use clap::Args;
use gmap_renderer::{GoogleMapPattern, embed_url};

use super::MapArgs;
use crate::error::CliError;
use crate::output::{Output, write_document};

/// Arguments for the embed command.
#[derive(Args)]
pub(crate) struct EmbedArgs {
    /// Location to show, as it would appear inside `[map:...]`.
    location: String,

    /// Print only the embed URL instead of the HTML fragment.
    #[arg(long)]
    url: bool,

    #[command(flatten)]
    map: MapArgs,
}

impl EmbedArgs {
    /// Execute the embed command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.map.resolve(output)?;
        let fragment = if self.url {
            embed_url(config.google_api_key(), &self.location)
        } else {
            GoogleMapPattern::new(config).render(&self.location).to_html()
        };
        write_document(&fragment)?;
        Ok(())
    }
}
