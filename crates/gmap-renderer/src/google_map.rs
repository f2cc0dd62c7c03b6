//! Google Maps embed pattern: `[map:<location>]`.
//!
//! Each directive becomes an `iframe` pointing at the Maps Embed API, or, in
//! fluid mode, the same iframe inside a responsive `div.iframe-wrapper`.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::{Captures, Regex};

use crate::config::{ConfigSource, MapConfig, MapOptions};
use crate::element::{Element, Node};
use crate::pattern::{Extension, InlinePattern, PatternProcessor};

/// Directive regex. The location runs up to the first `]`.
pub const MAP_PATTERN: &str = r"\[map:(?P<location_name>[^\]]+)\]";

/// Name the pattern is registered under.
pub const PATTERN_NAME: &str = "google_map";

/// Protocol-relative Maps Embed API endpoint.
pub const EMBED_BASE_URL: &str = "//www.google.com/maps/embed/v1/place?";

const WRAPPER_CLASS: &str = "iframe-wrapper";
const WRAPPER_STYLE: &str = "position:relative;padding-bottom:56.25%;padding-top:25px;height:0;";
const FLUID_IFRAME_STYLE: &str = "position:absolute;top:0;left:0;width:100%;height:100%;";

static MAP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(MAP_PATTERN).unwrap());

/// Form encoding: everything except `A-Z a-z 0-9 - . _ ~` and space, which
/// becomes `+` afterwards.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b' ');

fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
}

/// Build the embed URL for a location.
///
/// # Example
///
/// ```
/// use gmap_renderer::embed_url;
///
/// assert_eq!(
///     embed_url("KEY", "City of London"),
///     "//www.google.com/maps/embed/v1/place?key=KEY&q=City+of+London"
/// );
/// ```
#[must_use]
pub fn embed_url(api_key: &str, location: &str) -> String {
    format!(
        "{EMBED_BASE_URL}key={}&q={}",
        encode_query_value(api_key),
        encode_query_value(location)
    )
}

/// Inline pattern rendering `[map:<location>]` as an embedded map.
#[derive(Clone, Debug)]
pub struct GoogleMapPattern {
    config: MapConfig,
}

impl GoogleMapPattern {
    /// Create a pattern rendering with the given configuration.
    #[must_use]
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }

    /// Configuration used for rendering.
    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Render the map fragment for a location.
    ///
    /// The location is used verbatim: no trimming, escaping or case folding.
    #[must_use]
    pub fn render(&self, location: &str) -> Element {
        let mut iframe = Element::new("iframe");
        iframe.set("width", self.config.width().as_str());
        iframe.set("height", self.config.height().as_str());
        iframe.set("src", embed_url(self.config.google_api_key(), location));
        iframe.set("allowfullscreen", "true");
        iframe.set("frameborder", "0");

        if !self.config.fluid() {
            return iframe;
        }

        iframe.set("style", FLUID_IFRAME_STYLE);

        let mut wrapper = Element::new("div");
        wrapper.set("class", WRAPPER_CLASS);
        wrapper.set("style", WRAPPER_STYLE);
        wrapper.append(iframe);
        wrapper
    }
}

impl InlinePattern for GoogleMapPattern {
    fn regex(&self) -> &Regex {
        &MAP_RE
    }

    fn handle_match(&self, caps: &Captures<'_>) -> Option<Node> {
        let location = caps.name("location_name")?.as_str();
        Some(self.render(location).into())
    }
}

/// Markdown extension providing the `[map:<location>]` syntax.
///
/// # Example
///
/// ```
/// use gmap_renderer::{GoogleMapExtension, MapOptions, MarkdownConverter};
///
/// let extension = GoogleMapExtension::new(
///     MapOptions::new().with_google_api_key("KEY").resolve(),
/// );
/// let html = MarkdownConverter::new()
///     .with_extension(extension)
///     .convert("[map:London]");
///
/// assert!(html.contains("key=KEY&amp;q=London"));
/// ```
#[derive(Clone, Debug)]
pub struct GoogleMapExtension {
    config: MapConfig,
}

impl GoogleMapExtension {
    /// Create the extension from a resolved configuration.
    #[must_use]
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }

    /// Resolve `options` against the process environment.
    #[must_use]
    pub fn from_options(options: MapOptions) -> Self {
        Self::new(options.resolve())
    }

    /// Resolve `options` against a custom lookup.
    #[must_use]
    pub fn with_source(options: MapOptions, source: &dyn ConfigSource) -> Self {
        Self::new(options.resolve_with(source))
    }

    /// Resolved configuration.
    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }
}

impl Extension for GoogleMapExtension {
    fn extend(self, processor: &mut PatternProcessor) {
        processor.register(PATTERN_NAME, GoogleMapPattern::new(self.config));
    }
}
