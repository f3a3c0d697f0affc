//! Diagram rasterization through a Kroki server.

use std::time::Duration;

use ureq::Agent;

/// Why one diagram failed to rasterize.
#[derive(Debug, thiserror::Error)]
pub enum DiagramErrorKind {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("render superseded by a newer one")]
    Stale,
}

/// Single diagram rendering error.
#[derive(Debug, thiserror::Error)]
#[error("diagram {index}: {kind}")]
pub struct DiagramError {
    pub index: usize,
    pub kind: DiagramErrorKind,
}

/// Turns mermaid source into SVG markup.
pub trait DiagramRasterizer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`DiagramErrorKind`] when the diagram cannot be rendered.
    fn rasterize(&self, source: &str, dark_mode: bool) -> Result<String, DiagramErrorKind>;
}

/// Create HTTP agent with the specified timeout.
///
/// Status codes are not turned into errors so that error bodies can be read.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Rasterizer posting diagrams to `{server}/mermaid/svg`.
#[derive(Clone, Debug)]
pub struct KrokiRasterizer {
    agent: Agent,
    server_url: String,
}

impl KrokiRasterizer {
    pub fn new(server_url: impl Into<String>, timeout: Duration) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_owned();
        Self {
            agent: create_agent(timeout),
            server_url,
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

/// Mermaid theme requested from Kroki.
fn mermaid_theme(dark_mode: bool) -> &'static str {
    if dark_mode { "dark" } else { "default" }
}

impl DiagramRasterizer for KrokiRasterizer {
    fn rasterize(&self, source: &str, dark_mode: bool) -> Result<String, DiagramErrorKind> {
        let url = format!("{}/mermaid/svg", self.server_url);

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .header("Kroki-Diagram-Options-Theme", mermaid_theme(dark_mode))
            .send(source.as_bytes())
            .map_err(|e| DiagramErrorKind::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(DiagramErrorKind::Http(format!("HTTP {status}: {error_body}")));
        }

        body.read_to_string()
            .map_err(|e| DiagramErrorKind::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url_trailing_slash_trimmed() {
        let rasterizer = KrokiRasterizer::new("https://kroki.io/", Duration::from_secs(5));
        assert_eq!(rasterizer.server_url(), "https://kroki.io");
    }

    #[test]
    fn test_mermaid_theme() {
        assert_eq!(mermaid_theme(true), "dark");
        assert_eq!(mermaid_theme(false), "default");
    }

    #[test]
    fn test_error_messages() {
        let err = DiagramError {
            index: 2,
            kind: DiagramErrorKind::Http("HTTP 400: bad".to_owned()),
        };
        assert_eq!(err.to_string(), "diagram 2: HTTP error: HTTP 400: bad");
    }
}
