//! Google Maps embeds for markdown.
//!
//! Adds an inline `[map:<location>]` directive to markdown rendering. Each
//! directive is replaced with an `iframe` pointing at the Google Maps Embed
//! API, optionally wrapped in a responsive container.
//!
//! # Architecture
//!
//! - [`MapOptions`] / [`MapConfig`]: explicit settings layered over a
//!   [`ConfigSource`] lookup (process environment by default) and built-in
//!   defaults
//! - [`GoogleMapPattern`]: renders one directive match into an [`Element`] tree
//! - [`PatternProcessor`]: registry of named [`InlinePattern`]s applied to
//!   pulldown-cmark text events
//! - [`MarkdownConverter`]: pulldown-cmark rendering with registered
//!   [`Extension`]s
//!
//! # Example
//!
//! ```
//! use gmap_renderer::{GoogleMapExtension, MapOptions, MarkdownConverter};
//!
//! let config = MapOptions::new()
//!     .with_google_api_key("KEY")
//!     .with_width(600u32)
//!     .with_height(400u32)
//!     .resolve();
//!
//! let html = MarkdownConverter::new()
//!     .with_extension(GoogleMapExtension::new(config))
//!     .convert("Visit [map:City of London]");
//!
//! assert!(html.contains(r#"width="600""#));
//! assert!(html.contains("q=City+of+London"));
//! ```

mod config;
mod converter;
mod element;
mod google_map;
mod pattern;

pub use config::{
    ConfigSource, DEFAULT_HEIGHT, DEFAULT_WIDTH, Dimension, EnvSource, GOOGLE_API_KEY, MapConfig,
    MapOptions,
};
pub use converter::{MarkdownConverter, markdown_to_html};
pub use element::{Element, Node, escape_html};
pub use google_map::{
    EMBED_BASE_URL, GoogleMapExtension, GoogleMapPattern, MAP_PATTERN, PATTERN_NAME, embed_url,
};
pub use pattern::{Extension, InlinePattern, PatternProcessor};
