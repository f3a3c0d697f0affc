//! PDF generation through a remote rendering service.

use std::time::Duration;

use larkdown_diagrams::create_agent;
use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::error::ExportError;

/// Default PDF service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://base.xiaoliangai.com/api/pdf/generate";

/// Upper bound on a generated PDF.
const MAX_PDF_BYTES: u64 = 64 * 1024 * 1024;

/// Page margins as CSS lengths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PdfMargin {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
}

impl PdfMargin {
    /// The same margin on every side.
    pub fn uniform(length: impl Into<String>) -> Self {
        let length = length.into();
        Self {
            top: length.clone(),
            bottom: length.clone(),
            left: length.clone(),
            right: length,
        }
    }
}

/// Page setup sent with every document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOptions {
    /// Paper format, e.g. `A4`.
    pub format: String,
    pub print_background: bool,
    pub margin: PdfMargin,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            format: "A4".to_owned(),
            print_background: true,
            margin: PdfMargin::uniform("10mm"),
        }
    }
}

#[derive(Serialize)]
struct PdfRequest<'a> {
    html: &'a str,
    options: &'a PdfOptions,
}

#[derive(Deserialize)]
struct ServiceErrorBody {
    message: Option<String>,
}

/// Turns a self-contained HTML page into PDF bytes.
pub trait PdfBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ExportError`] when the PDF cannot be produced.
    fn generate(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, ExportError>;
}

/// [`PdfBackend`] posting pages to an HTTP service.
pub struct RemotePdfClient {
    agent: Agent,
    endpoint: String,
}

impl RemotePdfClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PdfBackend for RemotePdfClient {
    fn generate(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, ExportError> {
        let body = serde_json::to_vec(&PdfRequest { html, options })?;

        tracing::info!(endpoint = %self.endpoint, bytes = body.len(), "Requesting PDF");
        let response = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/pdf")
            .send(&body[..])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ExportError::Service {
                status,
                message: service_message(&error_body),
            });
        }

        Ok(body_reader
            .with_config()
            .limit(MAX_PDF_BYTES)
            .read_to_vec()?)
    }
}

/// The `message` of a JSON error body, or the body itself.
fn service_message(body: &str) -> String {
    serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                "PDF generation failed".to_owned()
            } else {
                body.to_owned()
            }
        })
}

/// Result of one export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOutcome {
    pub success: bool,
    pub message: String,
    pub pdf: Option<Vec<u8>>,
}

/// Generate a PDF, reporting failure as a value.
pub fn export_pdf<B>(backend: &B, html: &str, options: &PdfOptions) -> ExportOutcome
where
    B: PdfBackend + ?Sized,
{
    match backend.generate(html, options) {
        Ok(pdf) => ExportOutcome {
            success: true,
            message: format!("generated PDF ({} bytes)", pdf.len()),
            pdf: Some(pdf),
        },
        Err(e) => {
            tracing::warn!(error = %e, "PDF export failed");
            ExportOutcome {
                success: false,
                message: e.to_string(),
                pdf: None,
            }
        }
    }
}
