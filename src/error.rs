//! Error types for the provider, realtime, and configuration seams.
//!
//! DESIGN
//! ======
//! Every error carries a grepable code via [`ErrorCode`]. Provider errors
//! propagate to callers; realtime errors never do and are only reported
//! to a diagnostics sink by the session store.

/// Grepable error code and retry hint, shared by all error enums here.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// PROVIDER
// =============================================================================

/// Errors produced by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider could not be reached or answered with a failure.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// The operation requires an active session.
    #[error("no active session")]
    NotSignedIn,
}

impl ErrorCode for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "E_PROVIDER_UNAVAILABLE",
            Self::NotSignedIn => "E_NOT_SIGNED_IN",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

// =============================================================================
// REALTIME
// =============================================================================

/// Errors produced by a realtime authorization attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RealtimeError {
    #[error("realtime authorization rejected: empty access token")]
    EmptyToken,

    #[error("realtime channel closed")]
    Closed,

    #[error("realtime authorization failed: {0}")]
    Rejected(String),
}

impl ErrorCode for RealtimeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyToken => "E_REALTIME_EMPTY_TOKEN",
            Self::Closed => "E_REALTIME_CLOSED",
            Self::Rejected(_) => "E_REALTIME_REJECTED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Errors produced while loading [`crate::config::AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPort(_) => "E_CONFIG_PORT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_unavailable_is_retryable() {
        let err = ProviderError::Unavailable("timeout".into());
        assert_eq!(err.error_code(), "E_PROVIDER_UNAVAILABLE");
        assert!(err.retryable());
        assert!(!ProviderError::NotSignedIn.retryable());
    }

    #[test]
    fn realtime_codes_are_distinct() {
        let codes = [
            RealtimeError::EmptyToken.error_code(),
            RealtimeError::Closed.error_code(),
            RealtimeError::Rejected("nope".into()).error_code(),
        ];
        assert_eq!(codes.len(), codes.iter().collect::<std::collections::HashSet<_>>().len());
    }

    #[test]
    fn realtime_rejected_display_includes_reason() {
        let err = RealtimeError::Rejected("jwt expired".into());
        assert_eq!(err.to_string(), "realtime authorization failed: jwt expired");
        assert!(err.retryable());
        assert!(!RealtimeError::Closed.retryable());
    }

    #[test]
    fn config_error_is_not_retryable() {
        let err = ConfigError::InvalidPort("abc".into());
        assert_eq!(err.error_code(), "E_CONFIG_PORT");
        assert!(!err.retryable());
        assert!(err.to_string().contains("abc"));
    }
}
