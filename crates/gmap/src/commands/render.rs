//! `gmap render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use gmap_renderer::{GoogleMapExtension, MarkdownConverter};

use super::MapArgs;
use crate::error::CliError;
use crate::output::{Output, write_document};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render ("-" or omitted reads stdin).
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable GitHub-flavored extensions (tables, strikethrough, task lists).
    #[arg(long)]
    no_gfm: bool,

    #[command(flatten)]
    map: MapArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the input/output cannot be accessed.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.map.resolve(output)?;
        let markdown = read_input(self.input.as_deref())?;

        let converter = MarkdownConverter::new()
            .with_gfm(!self.no_gfm)
            .with_extension(GoogleMapExtension::new(config));

        let start = std::time::Instant::now();
        let html = converter.convert(&markdown);
        tracing::info!(
            bytes = markdown.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Rendered document"
        );

        match self.output {
            Some(path) => {
                std::fs::write(&path, format!("{html}\n"))?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => write_document(&html)?,
        }

        Ok(())
    }
}

fn read_input(input: Option<&Path>) -> Result<String, CliError> {
    match input {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "# Title\n\n[map:Paris]\n").unwrap();

        assert_eq!(read_input(Some(&path)).unwrap(), "# Title\n\n[map:Paris]\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("missing.md"))).unwrap_err();

        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.md");
        let out = dir.path().join("doc.html");
        let config = dir.path().join("gmap.toml");
        std::fs::write(&input, "[map:Oslo]\n").unwrap();
        std::fs::write(&config, "[map]\ngoogle_api_key = \"KEY\"\n").unwrap();

        let args = RenderArgs {
            input: Some(input),
            output: Some(out.clone()),
            no_gfm: false,
            map: MapArgs {
                config: Some(config),
                ..MapArgs::default()
            },
        };
        args.execute(&Output::new()).unwrap();

        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.starts_with("<p><iframe "));
        assert!(html.contains("key=KEY&amp;q=Oslo"));
        assert!(html.ends_with("</p>\n"));
    }
}
