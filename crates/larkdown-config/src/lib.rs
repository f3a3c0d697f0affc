//! Configuration management for larkdown.
//!
//! Parses `larkdown.toml` with serde and discovers it in the current
//! directory or its parents. Every section is optional.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` and `${VAR:-default}` are expanded in:
//! - `diagrams.kroki_url`
//! - `export.endpoint`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use larkdown_style::{RenderOptions, StyleModel};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "larkdown.toml";

/// Accepted timeout range, in seconds.
const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=600;

/// Paper formats the PDF service understands.
const PAPER_FORMATS: &[&str] = &["A3", "A4", "A5", "Letter", "Legal"];

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub template: Option<String>,
    pub code_theme: Option<String>,
    pub dark_mode: Option<bool>,
    pub theme_color: Option<String>,
    pub kroki_url: Option<String>,
    pub export_endpoint: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub preview: PreviewConfig,
    /// Style overrides applied on top of the selected template.
    pub style: StyleModel,
    pub diagrams: DiagramsConfig,
    pub export: ExportConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub template: String,
    pub code_theme: Option<String>,
    pub dark_mode: bool,
    pub theme_color: Option<String>,
    /// Documents larger than this fail to render.
    pub max_input_bytes: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            template: "default".to_owned(),
            code_theme: None,
            dark_mode: false,
            theme_color: None,
            max_input_bytes: 1024 * 1024,
        }
    }
}

/// Diagram rasterization settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Kroki server URL.
    pub kroki_url: String,
    pub timeout_secs: u64,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            kroki_url: "${KROKI_URL:-https://kroki.io}".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl DiagramsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// PDF export settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// PDF service endpoint.
    pub endpoint: String,
    /// Paper format, one of `A3`, `A4`, `A5`, `Letter`, `Legal`.
    pub format: String,
    pub print_background: bool,
    pub timeout_secs: u64,
    pub margin: MarginConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://base.xiaoliangai.com/api/pdf/generate".to_owned(),
            format: "A4".to_owned(),
            print_background: true,
            timeout_secs: 60,
            margin: MarginConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Page margins as CSS lengths.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: "10mm".to_owned(),
            bottom: "10mm".to_owned(),
            left: "10mm".to_owned(),
            right: "10mm".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path, e.g. `diagrams.kroki_url`.
        field: String,
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn require_timeout(secs: u64, field: &str) -> Result<(), ConfigError> {
    if !TIMEOUT_RANGE.contains(&secs) {
        return Err(ConfigError::Validation(format!(
            "{field} must be between {} and {} seconds",
            TIMEOUT_RANGE.start(),
            TIMEOUT_RANGE.end()
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration, then apply CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `larkdown.toml` in the current directory and its parents, and uses
    /// defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the result is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.expand_env_vars()?;
        config.validate()?;

        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(template) = &settings.template {
            self.preview.template.clone_from(template);
        }
        if let Some(code_theme) = &settings.code_theme {
            self.preview.code_theme = Some(code_theme.clone());
        }
        if let Some(dark_mode) = settings.dark_mode {
            self.preview.dark_mode = dark_mode;
        }
        if let Some(theme_color) = &settings.theme_color {
            self.preview.theme_color = Some(theme_color.clone());
        }
        if let Some(kroki_url) = &settings.kroki_url {
            self.diagrams.kroki_url.clone_from(kroki_url);
        }
        if let Some(endpoint) = &settings.export_endpoint {
            self.export.endpoint.clone_from(endpoint);
        }
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.diagrams.kroki_url =
            expand::expand_env(&self.diagrams.kroki_url, "diagrams.kroki_url")?;
        self.export.endpoint = expand::expand_env(&self.export.endpoint, "export.endpoint")?;
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.preview.template, "preview.template")?;
        if self.preview.max_input_bytes == 0 {
            return Err(ConfigError::Validation(
                "preview.max_input_bytes must be greater than 0".to_owned(),
            ));
        }

        require_http_url(&self.diagrams.kroki_url, "diagrams.kroki_url")?;
        require_timeout(self.diagrams.timeout_secs, "diagrams.timeout_secs")?;

        require_http_url(&self.export.endpoint, "export.endpoint")?;
        require_timeout(self.export.timeout_secs, "export.timeout_secs")?;
        if !PAPER_FORMATS.contains(&self.export.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "export.format must be one of {}",
                PAPER_FORMATS.join(", ")
            )));
        }
        Ok(())
    }

    /// Render options for the configured preview defaults.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            code_theme: self.preview.code_theme.clone(),
            dark_mode: self.preview.dark_mode,
            theme_color: self.preview.theme_color.clone(),
            style_overrides: self.style.clone(),
        }
    }
}

/// Search for the config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larkdown_style::BlockElement;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config
    }

    #[test]
    fn test_defaults() {
        let config = parse("");
        assert_eq!(config.preview.template, "default");
        assert_eq!(config.preview.max_input_bytes, 1_048_576);
        assert_eq!(config.diagrams.timeout(), Duration::from_secs(30));
        assert_eq!(config.export.format, "A4");
        assert_eq!(config.export.margin.left, "10mm");
        assert!(config.export.print_background);
        assert!(config.style.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r##"
[preview]
template = "wechat"
code_theme = "dracula"
dark_mode = true
theme_color = "#07c160"

[style.base]
fontSize = "15px"

[style.block.h1]
font-size = "28px"

[diagrams]
kroki_url = "https://kroki.example.com"
timeout_secs = 10

[export]
format = "Letter"
[export.margin]
top = "20mm"
"##,
        );

        assert_eq!(config.preview.template, "wechat");
        assert_eq!(config.diagrams.kroki_url, "https://kroki.example.com");
        assert_eq!(config.export.margin.top, "20mm");
        assert_eq!(config.export.margin.bottom, "10mm");

        let options = config.render_options();
        assert_eq!(options.code_theme.as_deref(), Some("dracula"));
        assert!(options.dark_mode);
        assert_eq!(options.style_overrides.base.get("font-size"), Some("15px"));
        assert_eq!(
            options
                .style_overrides
                .block_style(BlockElement::H1)
                .and_then(|s| s.get("fontSize")),
            Some("28px")
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            ("[preview]\nmax_input_bytes = 0", "preview.max_input_bytes"),
            ("[diagrams]\nkroki_url = \"kroki.io\"", "diagrams.kroki_url"),
            ("[diagrams]\ntimeout_secs = 0", "diagrams.timeout_secs"),
            ("[export]\ntimeout_secs = 601", "export.timeout_secs"),
            ("[export]\nformat = \"B5\"", "export.format"),
            ("[export]\nendpoint = \"ftp://x\"", "export.endpoint"),
        ];
        for (toml, field) in cases {
            let err = parse(toml).validate().unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)), "{toml}");
            assert!(err.to_string().contains(field), "{err}");
        }
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            template: Some("wechat".to_owned()),
            dark_mode: Some(true),
            kroki_url: Some("http://localhost:8000".to_owned()),
            ..CliSettings::default()
        });

        assert_eq!(config.preview.template, "wechat");
        assert!(config.preview.dark_mode);
        assert_eq!(config.preview.code_theme, None);
        assert_eq!(config.diagrams.kroki_url, "http://localhost:8000");
    }

    #[test]
    fn test_discover_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("notes/2026");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            discover_config(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[preview]\ntemplate = \"wechat\"\n").unwrap();

        let config = Config::load(
            Some(&path),
            Some(&CliSettings {
                code_theme: Some("nord".to_owned()),
                ..CliSettings::default()
            }),
        )
        .unwrap();
        assert_eq!(config.preview.template, "wechat");
        assert_eq!(config.preview.code_theme.as_deref(), Some("nord"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/larkdown.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[preview\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
