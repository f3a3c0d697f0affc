//! `larkdown export` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use larkdown_config::Config;
use larkdown_export::{ExportDocument, PdfMargin, PdfOptions, RemotePdfClient, export_pdf};

use super::{DocumentArgs, read_input, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Markdown file to export.
    input: PathBuf,

    /// Output file.
    #[arg(short, long)]
    output: PathBuf,

    /// Write the standalone HTML page instead of requesting a PDF.
    #[arg(long)]
    html_only: bool,

    /// PDF service endpoint (overrides config).
    #[arg(long)]
    endpoint: Option<String>,

    #[command(flatten)]
    document: DocumentArgs,
}

impl ExportArgs {
    /// Execute the export command.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the PDF service rejects the page.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        // Printed pages are always light.
        let mut config = self.document.load_config(Some(false))?;
        if let Some(endpoint) = &self.endpoint {
            config.export.endpoint.clone_from(endpoint);
            config.validate()?;
        }

        let markdown = self.document.markdown(read_input(&self.input)?)?;
        let html = self.document.render(&config, &markdown, &output)?;
        let page = build_page(&self.input, html);

        if self.html_only {
            write_output(Some(&self.output), page.as_bytes())?;
            output.success(&format!("Wrote {}", self.output.display()));
            return Ok(());
        }

        output.info(&format!("Generating PDF via {}...", config.export.endpoint));
        let client = RemotePdfClient::new(&config.export.endpoint, config.export.timeout());
        let outcome = export_pdf(&client, &page, &pdf_options(&config));

        match outcome.pdf {
            Some(pdf) if outcome.success => {
                write_output(Some(&self.output), &pdf)?;
                output.success(&format!("Wrote {} ({})", self.output.display(), outcome.message));
                Ok(())
            }
            _ => Err(CliError::Export(outcome.message)),
        }
    }
}

/// Standalone page titled after the input file, with images resolved next to it.
fn build_page(input: &Path, html: String) -> String {
    let mut document = ExportDocument::new(html);
    if let Some(stem) = input.file_stem() {
        document = document.title(stem.to_string_lossy());
    }
    if let Some(dir) = input.parent() {
        document = document.base_dir(dir);
    }
    document.build()
}

fn pdf_options(config: &Config) -> PdfOptions {
    let export = &config.export;
    PdfOptions {
        format: export.format.clone(),
        print_background: export.print_background,
        margin: PdfMargin {
            top: export.margin.top.clone(),
            bottom: export.margin.bottom.clone(),
            left: export.margin.left.clone(),
            right: export.margin.right.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pdf_options_from_config() {
        let config = Config::default();
        assert_eq!(pdf_options(&config), PdfOptions::default());
    }

    #[test]
    fn test_build_page_title_and_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.svg"), "<svg/>").unwrap();
        let input = dir.path().join("weekly-report.md");

        let page = build_page(&input, r#"<p><img src="logo.svg" alt=""></p>"#.to_owned());
        assert!(page.contains("<title>weekly-report</title>"));
        assert!(page.contains(r#"src="data:image/svg+xml;base64,PHN2Zy8+""#));
    }
}
