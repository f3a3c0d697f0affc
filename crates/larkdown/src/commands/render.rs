//! `larkdown render` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::{DocumentArgs, read_input, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file, or `-` for stdin.
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Render for a dark host theme.
    #[arg(long)]
    dark: bool,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    document: DocumentArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or rendered.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.document.load_config(self.dark.then_some(true))?;

        let markdown = self.document.markdown(read_input(&self.input)?)?;
        let html = self.document.render(&config, &markdown, &output)?;

        write_output(self.output.as_deref(), html.as_bytes())?;
        if let Some(path) = &self.output {
            output.success(&format!("Wrote {}", path.display()));
        }
        Ok(())
    }
}
