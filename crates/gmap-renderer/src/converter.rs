//! Markdown to HTML conversion with inline pattern extensions.

use pulldown_cmark::{Options, Parser, html};

use crate::config::MapConfig;
use crate::google_map::GoogleMapExtension;
use crate::pattern::{Extension, PatternProcessor};

/// Markdown to HTML converter.
///
/// pulldown-cmark parses the document, registered inline patterns rewrite its
/// text events, and the resulting stream is rendered to HTML.
///
/// # Example
///
/// ```
/// use gmap_renderer::MarkdownConverter;
///
/// let html = MarkdownConverter::new().convert("Foo");
/// assert_eq!(html, "<p>Foo</p>");
/// ```
pub struct MarkdownConverter {
    processor: PatternProcessor,
    gfm: bool,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter {
    /// Create a converter with no extensions and GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            processor: PatternProcessor::new(),
            gfm: true,
        }
    }

    /// Register an extension.
    #[must_use]
    pub fn with_extension<E: Extension>(mut self, extension: E) -> Self {
        extension.extend(&mut self.processor);
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Registered inline patterns.
    #[must_use]
    pub fn processor(&self) -> &PatternProcessor {
        &self.processor
    }

    fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Convert markdown to HTML.
    ///
    /// The trailing newline emitted after the last block is dropped.
    #[must_use]
    pub fn convert(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.parser_options());
        let events = self.processor.expand(parser);

        let mut output = String::with_capacity(markdown.len() + markdown.len() / 2);
        html::push_html(&mut output, events.into_iter());

        if output.ends_with('\n') {
            output.pop();
        }
        output
    }
}

/// Convert markdown to HTML with the Google Maps extension enabled.
#[must_use]
pub fn markdown_to_html(markdown: &str, config: MapConfig) -> String {
    MarkdownConverter::new()
        .with_extension(GoogleMapExtension::new(config))
        .convert(markdown)
}
