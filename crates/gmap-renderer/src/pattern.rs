//! Inline pattern registry.
//!
//! Inline patterns are regex-driven handlers that turn matched text into
//! element trees. The [`PatternProcessor`] applies them to the text events of
//! a pulldown-cmark stream: each match is replaced by an inline HTML event
//! holding the serialized node. Code blocks and code spans are never matched.
//!
//! # Example
//!
//! ```
//! use std::sync::LazyLock;
//!
//! use gmap_renderer::{Element, InlinePattern, Node, PatternProcessor};
//! use pulldown_cmark::{Parser, html};
//! use regex::{Captures, Regex};
//!
//! static KBD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[kbd:([^\]]+)\]").unwrap());
//!
//! struct KbdPattern;
//!
//! impl InlinePattern for KbdPattern {
//!     fn regex(&self) -> &Regex { &KBD }
//!
//!     fn handle_match(&self, caps: &Captures<'_>) -> Option<Node> {
//!         let mut kbd = Element::new("kbd");
//!         kbd.append(Node::Text(caps[1].to_owned()));
//!         Some(kbd.into())
//!     }
//! }
//!
//! let mut processor = PatternProcessor::new();
//! processor.register("kbd", KbdPattern);
//!
//! let events = processor.expand(Parser::new("Press [kbd:Ctrl+C]."));
//! let mut out = String::new();
//! html::push_html(&mut out, events.into_iter());
//!
//! assert_eq!(out, "<p>Press <kbd>Ctrl+C</kbd>.</p>\n");
//! ```

use std::ops::Range;

use pulldown_cmark::{Event, Tag, TagEnd, TextMergeStream};
use regex::{Captures, Regex};

use crate::element::Node;

/// Handler for an inline pattern.
///
/// Handlers receive one regex match at a time and return the node to splice
/// in its place. They hold no per-call state, so one registered pattern can
/// serve any number of documents, in parallel if needed.
pub trait InlinePattern: Send + Sync {
    /// Regex matched against each run of text.
    fn regex(&self) -> &Regex;

    /// Build the replacement for a match.
    ///
    /// Returns `None` to leave the matched text unchanged.
    fn handle_match(&self, caps: &Captures<'_>) -> Option<Node>;
}

/// A markdown extension that contributes inline patterns.
pub trait Extension {
    /// Register this extension's patterns with the processor.
    fn extend(self, processor: &mut PatternProcessor);
}

/// Ordered registry of named inline patterns.
#[derive(Default)]
pub struct PatternProcessor {
    patterns: Vec<(String, Box<dyn InlinePattern>)>,
}

impl PatternProcessor {
    /// Create an empty processor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern under `name`.
    ///
    /// Registering a name twice replaces the earlier pattern but keeps its
    /// position in the matching order.
    pub fn register<P: InlinePattern + 'static>(&mut self, name: impl Into<String>, pattern: P) {
        let name = name.into();
        let pattern: Box<dyn InlinePattern> = Box::new(pattern);
        match self.patterns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = pattern,
            None => self.patterns.push((name, pattern)),
        }
    }

    /// Check whether a pattern is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.patterns.iter().any(|(n, _)| n == name)
    }

    /// Number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if no patterns are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Apply the registered patterns to a markdown event stream.
    ///
    /// Adjacent text events are merged first. Each run of text and soft line
    /// breaks is then matched as one string, with `\n` for every soft break,
    /// so a directive may wrap onto the next line of its paragraph. Text
    /// inside fenced or indented code blocks passes through untouched; code
    /// spans are separate [`Event::Code`] events and are never matched.
    pub fn expand<'a, I>(&self, events: I) -> Vec<Event<'a>>
    where
        I: Iterator<Item = Event<'a>>,
    {
        let mut output = Vec::new();
        let mut run = Vec::new();
        let mut in_code_block = false;
        let mut fragments = 0;

        for event in TextMergeStream::new(events) {
            match event {
                Event::Text(_) | Event::SoftBreak
                    if !in_code_block && !self.patterns.is_empty() =>
                {
                    run.push(event);
                }
                other => {
                    fragments += self.flush_run(&mut run, &mut output);
                    match &other {
                        Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                        Event::End(TagEnd::CodeBlock) => in_code_block = false,
                        _ => {}
                    }
                    output.push(other);
                }
            }
        }
        fragments += self.flush_run(&mut run, &mut output);

        tracing::debug!(fragments, "Expanded inline patterns");
        output
    }

    /// Expand a buffered run of text and soft break events into `output`.
    /// Returns the number of fragments produced.
    fn flush_run<'a>(&self, run: &mut Vec<Event<'a>>, output: &mut Vec<Event<'a>>) -> usize {
        if run.is_empty() {
            return 0;
        }

        let mut text = String::new();
        let mut breaks = Vec::new();
        for event in &*run {
            if let Event::Text(chunk) = event {
                text.push_str(chunk);
            } else {
                breaks.push(text.len());
                text.push('\n');
            }
        }

        if self.earliest_match(&text, 0).is_none() {
            output.append(run);
            return 0;
        }
        run.clear();

        let mut fragments = 0;
        let mut pos = 0;
        let mut emitted = 0;

        while let Some((pattern, caps)) = self.earliest_match(&text, pos) {
            let Some(whole) = caps.get(0) else { break };

            if let Some(node) = pattern.handle_match(&caps) {
                push_text(&text, emitted..whole.start(), &breaks, output);
                output.push(Event::InlineHtml(node.to_html().into()));
                emitted = whole.end();
                fragments += 1;
            }

            // Step past empty matches so the loop always advances.
            pos = if whole.end() > whole.start() {
                whole.end()
            } else {
                text[whole.end()..]
                    .chars()
                    .next()
                    .map_or(text.len(), |c| whole.end() + c.len_utf8())
            };
        }

        push_text(&text, emitted..text.len(), &breaks, output);
        fragments
    }

    /// Find the leftmost match at or after `pos`; ties go to the earliest
    /// registered pattern.
    fn earliest_match<'h>(
        &self,
        text: &'h str,
        pos: usize,
    ) -> Option<(&dyn InlinePattern, Captures<'h>)> {
        if pos >= text.len() {
            return None;
        }

        let mut best: Option<(&dyn InlinePattern, Captures<'h>)> = None;
        for (_, pattern) in &self.patterns {
            let Some(caps) = pattern.regex().captures_at(text, pos) else {
                continue;
            };
            let start = match_start(&caps);
            if best.as_ref().is_none_or(|(_, b)| start < match_start(b)) {
                best = Some((pattern.as_ref(), caps));
            }
        }
        best
    }
}

/// Emit `text[range]` as text events, restoring a soft break at every offset
/// in `breaks`.
fn push_text(text: &str, range: Range<usize>, breaks: &[usize], output: &mut Vec<Event<'_>>) {
    let mut start = range.start;
    for &offset in breaks.iter().filter(|&&b| range.contains(&b)) {
        if offset > start {
            output.push(Event::Text(text[start..offset].to_owned().into()));
        }
        output.push(Event::SoftBreak);
        start = offset + 1;
    }
    if range.end > start {
        output.push(Event::Text(text[start..range.end].to_owned().into()));
    }
}

fn match_start(caps: &Captures<'_>) -> usize {
    caps.get(0).map_or(usize::MAX, |m| m.start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Parser, html};

    use crate::element::Element;

    static KBD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[kbd:(?P<key>[^\]]+)\]").unwrap());

    static ABBR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[abbr:(?P<text>[^\]]+)\]").unwrap());

    struct TestKbd;

    impl InlinePattern for TestKbd {
        fn regex(&self) -> &Regex {
            &KBD_RE
        }

        fn handle_match(&self, caps: &Captures<'_>) -> Option<Node> {
            let mut kbd = Element::new("kbd");
            kbd.append(Node::Text(caps["key"].to_owned()));
            Some(kbd.into())
        }
    }

    struct TestAbbr;

    impl InlinePattern for TestAbbr {
        fn regex(&self) -> &Regex {
            &ABBR_RE
        }

        fn handle_match(&self, caps: &Captures<'_>) -> Option<Node> {
            let mut abbr = Element::new("abbr");
            abbr.append(Node::Text(caps["text"].to_owned()));
            Some(abbr.into())
        }
    }

    struct Declining;

    impl InlinePattern for Declining {
        fn regex(&self) -> &Regex {
            &KBD_RE
        }

        fn handle_match(&self, _caps: &Captures<'_>) -> Option<Node> {
            None
        }
    }

    fn kbd_processor() -> PatternProcessor {
        let mut processor = PatternProcessor::new();
        processor.register("kbd", TestKbd);
        processor
    }

    fn render(processor: &PatternProcessor, markdown: &str) -> String {
        let mut out = String::new();
        html::push_html(&mut out, processor.expand(Parser::new(markdown)).into_iter());
        out
    }

    #[test]
    fn test_single_match() {
        let output = render(&kbd_processor(), "Press [kbd:Ctrl+C] to copy.");
        assert_eq!(output, "<p>Press <kbd>Ctrl+C</kbd> to copy.</p>\n");
    }

    #[test]
    fn test_multiple_matches_in_order() {
        let output = render(&kbd_processor(), "[kbd:A]then[kbd:B]");
        assert_eq!(output, "<p><kbd>A</kbd>then<kbd>B</kbd></p>\n");
    }

    #[test]
    fn test_no_match_passthrough() {
        let output = render(&kbd_processor(), "plain [text] here");
        assert_eq!(output, "<p>plain [text] here</p>\n");
    }

    #[test]
    fn test_empty_processor_passthrough() {
        let processor = PatternProcessor::new();
        assert!(processor.is_empty());
        assert_eq!(render(&processor, "[kbd:A]"), "<p>[kbd:A]</p>\n");
    }

    #[test]
    fn test_unmatched_text_event_is_reused() {
        let events = kbd_processor().expand(Parser::new("just text"));
        assert_eq!(events.iter().filter(|e| matches!(e, Event::Text(_))).count(), 1);
        assert!(!events.iter().any(|e| matches!(e, Event::InlineHtml(_))));
    }

    #[test]
    fn test_skips_fenced_code() {
        let output = render(&kbd_processor(), "```\n[kbd:inside]\n```\n\n[kbd:outside]");

        assert!(output.contains("<code>[kbd:inside]\n</code>"));
        assert!(output.contains("<kbd>outside</kbd>"));
    }

    #[test]
    fn test_skips_indented_code() {
        let output = render(&kbd_processor(), "    [kbd:inside]");
        assert_eq!(output, "<pre><code>[kbd:inside]\n</code></pre>\n");
    }

    #[test]
    fn test_skips_code_span() {
        let output = render(&kbd_processor(), "`[kbd:A]` and [kbd:B]");
        assert_eq!(output, "<p><code>[kbd:A]</code> and <kbd>B</kbd></p>\n");
    }

    #[test]
    fn test_matches_inside_emphasis() {
        let output = render(&kbd_processor(), "*press [kbd:A]*");
        assert_eq!(output, "<p><em>press <kbd>A</kbd></em></p>\n");
    }

    #[test]
    fn test_match_spans_soft_break() {
        let output = render(&kbd_processor(), "[kbd:Ctrl\n+C]");
        assert_eq!(output, "<p><kbd>Ctrl\n+C</kbd></p>\n");
    }

    #[test]
    fn test_soft_breaks_around_match_preserved() {
        let events = kbd_processor().expand(Parser::new("a\n[kbd:A]\nb"));
        assert_eq!(events.iter().filter(|e| matches!(e, Event::SoftBreak)).count(), 2);

        let output = render(&kbd_processor(), "a\n[kbd:A]\nb");
        assert_eq!(output, "<p>a\n<kbd>A</kbd>\nb</p>\n");
    }

    #[test]
    fn test_declined_match_across_lines_left_unchanged() {
        let mut processor = PatternProcessor::new();
        processor.register("kbd", Declining);

        assert_eq!(render(&processor, "x [kbd:A\nB] y"), "<p>x [kbd:A\nB] y</p>\n");
    }

    #[test]
    fn test_link_reference_takes_precedence() {
        let output = render(&kbd_processor(), "[kbd:A]: /x\n\nPress [kbd:A]");
        assert_eq!(output, "<p>Press <a href=\"/x\">kbd:A</a></p>\n");
    }

    #[test]
    fn test_declined_match_left_unchanged() {
        let mut processor = PatternProcessor::new();
        processor.register("kbd", Declining);

        assert_eq!(render(&processor, "x [kbd:A] y"), "<p>x [kbd:A] y</p>\n");
    }

    #[test]
    fn test_earliest_match_across_patterns() {
        let mut processor = PatternProcessor::new();
        processor.register("kbd", TestKbd);
        processor.register("abbr", TestAbbr);

        let output = render(&processor, "[abbr:HTML] and [kbd:K]");
        assert_eq!(output, "<p><abbr>HTML</abbr> and <kbd>K</kbd></p>\n");
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut processor = kbd_processor();
        processor.register("kbd", Declining);

        assert_eq!(processor.len(), 1);
        assert!(processor.contains("kbd"));
        assert!(!processor.contains("abbr"));
        assert_eq!(render(&processor, "[kbd:A]"), "<p>[kbd:A]</p>\n");
    }

    #[test]
    fn test_node_text_is_escaped() {
        let output = render(&kbd_processor(), "[kbd:a &lt; b]");
        assert_eq!(output, "<p><kbd>a &lt; b</kbd></p>\n");
    }

    #[test]
    fn test_extension_registers_patterns() {
        struct KbdExtension;

        impl Extension for KbdExtension {
            fn extend(self, processor: &mut PatternProcessor) {
                processor.register("kbd", TestKbd);
            }
        }

        let mut processor = PatternProcessor::new();
        KbdExtension.extend(&mut processor);

        assert!(processor.contains("kbd"));
    }
}
