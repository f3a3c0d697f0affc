//! CLI command implementations.

mod export;
mod render;
mod templates;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use larkdown_config::{CliSettings, Config};
use larkdown_diagrams::{KrokiRasterizer, rasterize_html};
use larkdown_preview::{MarkdownParser, cell_to_markdown};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use export::ExportArgs;
pub(crate) use render::RenderArgs;
pub(crate) use templates::TemplatesArgs;

/// Options shared by every command that renders a document.
#[derive(Args)]
pub(crate) struct DocumentArgs {
    /// Template id (overrides config).
    #[arg(short, long)]
    template: Option<String>,

    /// Code theme id (overrides config).
    #[arg(long)]
    code_theme: Option<String>,

    /// Concrete theme color, e.g. `#1a73e8` (overrides config).
    #[arg(long)]
    theme_color: Option<String>,

    /// Treat the input as a JSON table cell value.
    #[arg(long)]
    cell_json: bool,

    /// Replace mermaid diagrams with SVG rendered by Kroki.
    #[arg(long)]
    rasterize_diagrams: bool,

    /// Kroki server URL (overrides config).
    #[arg(long)]
    kroki_url: Option<String>,

    /// Path to configuration file (default: auto-discover larkdown.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl DocumentArgs {
    fn load_config(&self, dark_mode: Option<bool>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            template: self.template.clone(),
            code_theme: self.code_theme.clone(),
            dark_mode,
            theme_color: self.theme_color.clone(),
            kroki_url: self.kroki_url.clone(),
            ..Default::default()
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Markdown text of the input.
    fn markdown(&self, input: String) -> Result<String, CliError> {
        if self.cell_json {
            let value: serde_json::Value = serde_json::from_str(&input)?;
            Ok(cell_to_markdown(&value))
        } else {
            Ok(input)
        }
    }

    /// Render markdown to HTML, rasterizing diagrams if asked.
    fn render(&self, config: &Config, markdown: &str, output: &Output) -> Result<String, CliError> {
        tracing::debug!(
            template = %config.preview.template,
            bytes = markdown.len(),
            "Rendering markdown"
        );
        let parser = MarkdownParser::new().max_input_bytes(config.preview.max_input_bytes);
        let html = parser.try_parse(markdown, &config.preview.template, &config.render_options())?;

        if !self.rasterize_diagrams {
            return Ok(html);
        }

        let kroki = KrokiRasterizer::new(&config.diagrams.kroki_url, config.diagrams.timeout());
        let (html, outcome) = rasterize_html(&html, config.preview.dark_mode, &kroki);
        if outcome.success {
            output.info(&outcome.message);
        } else {
            output.warning(&format!("Warning: {}", outcome.message));
        }
        Ok(html)
    }
}

/// Read a file, or stdin for `-`.
fn read_input(input: &Path) -> Result<String, CliError> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().lock().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(input)?)
}

/// Write to a file, or stdout when no path is given.
fn write_output(path: Option<&Path>, content: &[u8]) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, content)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn document_args(cell_json: bool) -> DocumentArgs {
        DocumentArgs {
            template: None,
            code_theme: None,
            theme_color: None,
            cell_json,
            rasterize_diagrams: false,
            kroki_url: None,
            config: None,
        }
    }

    #[test]
    fn test_cell_json_input() {
        let input = r##"[{"type":"text","text":"# Title\n"},{"type":"url","text":"docs","link":"https://x.dev"}]"##;
        assert_eq!(
            document_args(true).markdown(input.to_owned()).unwrap(),
            "# Title\n[docs](https://x.dev)"
        );
        assert_eq!(document_args(false).markdown(input.to_owned()).unwrap(), input);
    }

    #[test]
    fn test_invalid_cell_json() {
        let err = document_args(true).markdown("{".to_owned()).unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        write_output(Some(&path), b"<p>x</p>").unwrap();
        assert_eq!(read_input(&path).unwrap(), "<p>x</p>");
    }
}
