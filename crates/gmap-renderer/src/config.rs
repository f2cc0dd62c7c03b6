//! Map configuration and its resolution.
//!
//! Settings are layered, highest priority first:
//!
//! 1. Explicit values from [`MapOptions`]
//! 2. A [`ConfigSource`] lookup (process environment by default)
//! 3. Built-in defaults
//!
//! Only the API key consults the lookup, under [`GOOGLE_API_KEY`]. Width,
//! height and the fluid flag fall straight through to their defaults.

use std::fmt;

/// Lookup name for the Google API key.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Default iframe width.
pub const DEFAULT_WIDTH: u32 = 500;

/// Default iframe height.
pub const DEFAULT_HEIGHT: u32 = 300;

/// Source of fallback configuration values.
///
/// Implemented for any `Fn(&str, &str) -> String` closure, so tests can inject
/// a fixed lookup:
///
/// ```
/// use gmap_renderer::{ConfigSource, GOOGLE_API_KEY};
///
/// let source = |key: &str, fallback: &str| {
///     if key == GOOGLE_API_KEY { "MYKEY".to_owned() } else { fallback.to_owned() }
/// };
/// assert_eq!(source.get(GOOGLE_API_KEY, ""), "MYKEY");
/// ```
pub trait ConfigSource {
    /// Get the value for `key`, or `fallback` if the source has none.
    fn get(&self, key: &str, fallback: &str) -> String;
}

impl<F> ConfigSource for F
where
    F: Fn(&str, &str) -> String,
{
    fn get(&self, key: &str, fallback: &str) -> String {
        self(key, fallback)
    }
}

/// [`ConfigSource`] backed by process environment variables.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str, fallback: &str) -> String {
        std::env::var(key).unwrap_or_else(|_| fallback.to_owned())
    }
}

/// Iframe dimension, given either as a number or as a string.
///
/// The value is emitted as-is into the `width`/`height` attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dimension(String);

impl Dimension {
    /// String form used in the rendered attribute.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u32> for Dimension {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for Dimension {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Dimension {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Explicit configuration values supplied by the caller.
///
/// All fields are optional. Only `Some` values take precedence over the
/// lookup and built-in defaults.
#[derive(Clone, Debug, Default)]
pub struct MapOptions {
    /// Google API key.
    pub google_api_key: Option<String>,
    /// Iframe width.
    pub width: Option<Dimension>,
    /// Iframe height.
    pub height: Option<Dimension>,
    /// Wrap the iframe in a fluid container.
    pub fluid: Option<bool>,
}

impl MapOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Google API key.
    #[must_use]
    pub fn with_google_api_key(mut self, key: impl Into<String>) -> Self {
        self.google_api_key = Some(key.into());
        self
    }

    /// Set the iframe width.
    #[must_use]
    pub fn with_width(mut self, width: impl Into<Dimension>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Set the iframe height.
    #[must_use]
    pub fn with_height(mut self, height: impl Into<Dimension>) -> Self {
        self.height = Some(height.into());
        self
    }

    /// Enable or disable fluid sizing.
    #[must_use]
    pub fn with_fluid(mut self, fluid: bool) -> Self {
        self.fluid = Some(fluid);
        self
    }

    /// Resolve against the process environment.
    #[must_use]
    pub fn resolve(self) -> MapConfig {
        self.resolve_with(&EnvSource)
    }

    /// Resolve against a custom lookup.
    ///
    /// The lookup is only consulted for the API key, and only when no
    /// explicit key was given.
    #[must_use]
    pub fn resolve_with(self, source: &dyn ConfigSource) -> MapConfig {
        let google_api_key = self
            .google_api_key
            .unwrap_or_else(|| source.get(GOOGLE_API_KEY, ""));

        MapConfig {
            google_api_key,
            width: self.width.unwrap_or_else(|| DEFAULT_WIDTH.into()),
            height: self.height.unwrap_or_else(|| DEFAULT_HEIGHT.into()),
            fluid: self.fluid.unwrap_or(false),
        }
    }
}

/// Resolved map configuration.
///
/// Read-only once built; shared by every render of a converter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapConfig {
    google_api_key: String,
    width: Dimension,
    height: Dimension,
    fluid: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapOptions::new().resolve_with(&|_: &str, fallback: &str| fallback.to_owned())
    }
}

impl MapConfig {
    /// Google API key (may be empty).
    #[must_use]
    pub fn google_api_key(&self) -> &str {
        &self.google_api_key
    }

    /// Iframe width.
    #[must_use]
    pub fn width(&self) -> &Dimension {
        &self.width
    }

    /// Iframe height.
    #[must_use]
    pub fn height(&self) -> &Dimension {
        &self.height
    }

    /// Whether output is wrapped for fluid sizing.
    #[must_use]
    pub fn fluid(&self) -> bool {
        self.fluid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    fn key_source(key: &str, _fallback: &str) -> String {
        if key == GOOGLE_API_KEY {
            "MYKEY".to_owned()
        } else {
            String::new()
        }
    }

    fn empty_source(_key: &str, fallback: &str) -> String {
        fallback.to_owned()
    }

    #[test]
    fn test_literal_defaults() {
        let config = MapOptions::new().resolve_with(&empty_source);

        assert_eq!(config.google_api_key(), "");
        assert_eq!(config.width().as_str(), "500");
        assert_eq!(config.height().as_str(), "300");
        assert!(!config.fluid());
    }

    #[test]
    fn test_default_impl_matches_literal_defaults() {
        assert_eq!(MapConfig::default(), MapOptions::new().resolve_with(&empty_source));
    }

    #[test]
    fn test_api_key_from_source() {
        let config = MapOptions::new().resolve_with(&key_source);
        assert_eq!(config.google_api_key(), "MYKEY");
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = MapOptions::new()
            .with_google_api_key("OVERRIDDENKEY")
            .resolve_with(&key_source);
        assert_eq!(config.google_api_key(), "OVERRIDDENKEY");
    }

    #[test]
    fn test_explicit_api_key_with_empty_source() {
        let config = MapOptions::new()
            .with_google_api_key("OVERRIDDENKEY")
            .resolve_with(&empty_source);
        assert_eq!(config.google_api_key(), "OVERRIDDENKEY");
    }

    #[test]
    fn test_source_receives_empty_fallback() {
        let seen = RefCell::new(Vec::new());
        let source = |key: &str, fallback: &str| {
            seen.borrow_mut().push((key.to_owned(), fallback.to_owned()));
            fallback.to_owned()
        };

        let _ = MapOptions::new().resolve_with(&source);

        assert_eq!(
            seen.into_inner(),
            vec![(GOOGLE_API_KEY.to_owned(), String::new())]
        );
    }

    #[test]
    fn test_dimensions_ignore_source() {
        // Only the API key is looked up; width/height/fluid never are.
        let source = |key: &str, _fallback: &str| match key {
            "width" | "WIDTH" | "height" | "HEIGHT" => "999".to_owned(),
            "fluid" | "FLUID" => "true".to_owned(),
            _ => String::new(),
        };

        let config = MapOptions::new().resolve_with(&source);

        assert_eq!(config.width().as_str(), "500");
        assert_eq!(config.height().as_str(), "300");
        assert!(!config.fluid());
    }

    #[test]
    fn test_explicit_dimensions() {
        let config = MapOptions::new()
            .with_width(600u32)
            .with_height("400")
            .with_fluid(true)
            .resolve_with(&empty_source);

        assert_eq!(config.width().as_str(), "600");
        assert_eq!(config.height().as_str(), "400");
        assert!(config.fluid());
    }

    #[test]
    fn test_dimension_conversions() {
        assert_eq!(Dimension::from(600u32).to_string(), "600");
        assert_eq!(Dimension::from("100%").as_str(), "100%");
        assert_eq!(Dimension::from(String::from("42")).as_str(), "42");
    }

    #[test]
    fn test_env_source_fallback() {
        let value = EnvSource.get("GMAP_TEST_SURELY_UNSET_VARIABLE", "fallback");
        assert_eq!(value, "fallback");
    }
}
