//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Bare `$VAR` is left alone, so URLs containing `$` survive.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("LARKDOWN_TEST_PDF_HOST", "pdf.internal");
        }
        let result = expand_env("https://${LARKDOWN_TEST_PDF_HOST}/generate", "export.endpoint");
        assert_eq!(result.unwrap(), "https://pdf.internal/generate");
        unsafe {
            std::env::remove_var("LARKDOWN_TEST_PDF_HOST");
        }
    }

    #[test]
    fn test_default_used_when_unset() {
        let result = expand_env("${LARKDOWN_TEST_UNSET:-https://kroki.io}", "diagrams.kroki_url");
        assert_eq!(result.unwrap(), "https://kroki.io");
    }

    #[test]
    fn test_missing_var_names_field() {
        let err = expand_env("${LARKDOWN_TEST_MISSING}", "diagrams.kroki_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "environment variable error in diagrams.kroki_url: ${LARKDOWN_TEST_MISSING} not set"
        );
    }

    #[test]
    fn test_bare_dollar_untouched() {
        assert_eq!(expand_env("https://h/$path", "x").unwrap(), "https://h/$path");
    }
}
