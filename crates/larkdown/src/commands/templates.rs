//! `larkdown templates` command implementation.

use clap::Args;
use larkdown_style::{CatalogEntry, TemplateRegistry, code_themes};
use serde::Serialize;

use super::write_output;
use crate::error::CliError;

/// Arguments for the templates command.
#[derive(Args)]
pub(crate) struct TemplatesArgs {
    /// Print the catalog as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Catalog<'a> {
    templates: Vec<CatalogEntry<'a>>,
    code_themes: Vec<CatalogEntry<'static>>,
}

impl TemplatesArgs {
    /// Execute the templates command.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let catalog = Catalog {
            templates: TemplateRegistry::builtin().catalog(),
            code_themes: code_themes().iter().map(|t| t.info()).collect(),
        };

        let text = if self.json {
            let mut json = serde_json::to_string_pretty(&catalog)?;
            json.push('\n');
            json
        } else {
            format_catalog(&catalog)
        };
        write_output(None, text.as_bytes())
    }
}

fn format_catalog(catalog: &Catalog<'_>) -> String {
    let mut text = String::from("Templates:\n");
    push_entries(&mut text, &catalog.templates);
    text.push_str("\nCode themes:\n");
    push_entries(&mut text, &catalog.code_themes);
    text
}

fn push_entries(text: &mut String, entries: &[CatalogEntry<'_>]) {
    let width = entries.iter().map(|e| e.id.len()).max().unwrap_or(0);
    for entry in entries {
        let line = format!("  {:<width$}  {}  {}", entry.id, entry.name, entry.description);
        text.push_str(line.trim_end());
        text.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_catalog() {
        let catalog = Catalog {
            templates: vec![CatalogEntry {
                id: "default",
                name: "Default",
                description: "Clean document style",
            }],
            code_themes: vec![
                CatalogEntry {
                    id: "vs",
                    name: "Visual Studio",
                    description: "",
                },
                CatalogEntry {
                    id: "github",
                    name: "GitHub",
                    description: "Light",
                },
            ],
        };
        assert_eq!(
            format_catalog(&catalog),
            "Templates:\n  default  Default  Clean document style\n\nCode themes:\n  vs      Visual Studio\n  github  GitHub  Light\n"
        );
    }

    #[test]
    fn test_builtin_catalog_lists_default_first() {
        let templates = TemplateRegistry::builtin().catalog();
        assert_eq!(templates[0].id, "default");
        assert!(code_themes().iter().any(|t| t.id == "github-dark"));
    }
}
