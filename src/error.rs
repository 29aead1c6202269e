use crate::result::ResultKind;
use crate::search::FacetSortType;
use thiserror::Error;

/// Errors raised while building requests or mapping responses
#[derive(Error, Debug)]
pub enum SolrError {
    /// A required configuration argument was blank or otherwise unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Facet sort type not supported by the active protocol
    #[error("Unsupported facet sort type: {0}")]
    UnsupportedSortType(FacetSortType),

    /// Response JSON is missing required structure or holds an unparsable value
    #[error("Unexpected JSON format ({reason}): {raw}")]
    MalformedResponse { reason: String, raw: String },

    /// No result builder registered for the requested kind
    #[error("No result builder mapped for {0}")]
    UnmappedDependency(ResultKind),

    /// A parameter reported itself invalid
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A single-instance parameter was added twice
    #[error("Parameter '{0}' does not allow multiple instances")]
    DuplicateParameter(&'static str),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure reported by the transport collaborator
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SolrError {
    /// Build a `MalformedResponse` carrying the raw response for diagnostics
    pub fn malformed(reason: impl Into<String>, raw: &serde_json::Value) -> Self {
        SolrError::MalformedResponse {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            SolrError::InvalidArgument(_) => "INVALID_ARGUMENT",
            SolrError::UnsupportedSortType(_) => "UNSUPPORTED_SORT_TYPE",
            SolrError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            SolrError::UnmappedDependency(_) => "UNMAPPED_DEPENDENCY",
            SolrError::ValidationFailed(_) => "VALIDATION_FAILED",
            SolrError::DuplicateParameter(_) => "DUPLICATE_PARAMETER",
            SolrError::Configuration(_) => "CONFIGURATION_ERROR",
            SolrError::Transport(_) => "TRANSPORT_ERROR",
            SolrError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for SolrError {
    fn from(err: serde_json::Error) -> Self {
        SolrError::Serialization(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for SolrError {
    fn from(err: config::ConfigError) -> Self {
        SolrError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type SolrResult<T> = std::result::Result<T, SolrError>;

/// Fails with `InvalidArgument` when `value` is empty or whitespace only
pub(crate) fn require_non_blank(argument: &str, value: &str) -> SolrResult<()> {
    if value.trim().is_empty() {
        return Err(SolrError::InvalidArgument(format!(
            "'{}' must not be blank",
            argument
        )));
    }
    Ok(())
}

/// Fails with `InvalidArgument` when `value` contains characters that would break
/// local-params syntax (`{!key=… ex=…}`) or JSON facet keys
pub(crate) fn require_local_param_safe(argument: &str, value: &str) -> SolrResult<()> {
    require_non_blank(argument, value)?;
    let safe = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !safe {
        return Err(SolrError::InvalidArgument(format!(
            "'{}' may only contain ASCII letters, digits, '_', '.' or '-' (got '{}')",
            argument, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SolrError::InvalidArgument("x".to_string()).error_code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            SolrError::UnmappedDependency(ResultKind::Documents).error_code(),
            "UNMAPPED_DEPENDENCY"
        );
        assert_eq!(
            SolrError::DuplicateParameter("offset").error_code(),
            "DUPLICATE_PARAMETER"
        );
    }

    #[test]
    fn test_malformed_carries_raw_response() {
        let raw = serde_json::json!({"responseX": {}});
        match SolrError::malformed("missing 'response'", &raw) {
            SolrError::MalformedResponse { reason, raw } => {
                assert_eq!(reason, "missing 'response'");
                assert!(raw.contains("responseX"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("alias", "total").is_ok());
        assert!(matches!(
            require_non_blank("alias", "   "),
            Err(SolrError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_require_local_param_safe() {
        assert!(require_local_param_safe("alias", "near_me-1.0").is_ok());
        assert!(require_local_param_safe("alias", "a b").is_err());
        assert!(require_local_param_safe("alias", "x}y").is_err());
        assert!(require_local_param_safe("tag", "k=v").is_err());
        assert!(require_local_param_safe("tag", "").is_err());
    }
}
