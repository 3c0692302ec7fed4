//! Error types for abrief.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! - **Configuration**: unreadable/invalid config or missing secrets. The
//!   only fatal category; detected before any network call.
//! - **Authentication**: BI session could not be established or a read kept
//!   returning 401 after re-auth. Degrades the revenue path, never fatal.
//! - **Network**: transport failures, including the post-retry
//!   [`AbriefError::RequestFailed`] sentinel that downstream stages treat as
//!   "no data".
//! - **Provider**: malformed or unusable provider responses.
//! - **Internal**: I/O, JSON, and unclassified errors.
//!
//! Each error has a stable error code (e.g., `ABR-C001`) for programmatic
//! handling. Per-account data gaps are not errors at all: they degrade to
//! explicit "unknown" values carried through to the final record.

use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T, E = AbriefError> = std::result::Result<T, E>;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Configuration issues (parse errors, missing fields, missing secrets).
    Configuration,
    /// Authentication issues (session unavailable, persistent 401).
    Authentication,
    /// Network issues (timeouts, connection errors, retry exhaustion).
    Network,
    /// Provider-specific issues (unusable payloads, malformed responses).
    Provider,
    /// Internal errors (bugs, I/O, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Configuration => "Configuration error",
            Self::Authentication => "Authentication error",
            Self::Network => "Network error",
            Self::Provider => "Provider error",
            Self::Internal => "Internal error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
///
/// Only configuration-level failures produce a non-success code; per-account
/// data gaps are reported as warnings while the run continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Unreadable or invalid configuration, missing secret
    ConfigError = 2,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

// =============================================================================
// Error Type
// =============================================================================

/// Main error type for abrief operations.
#[derive(Error, Debug)]
pub enum AbriefError {
    // ==========================================================================
    // Configuration errors (fatal, pre-network)
    // ==========================================================================
    /// Configuration file not found at expected path.
    #[error("config file not found: {path}")]
    ConfigNotFound { path: String },

    /// Error parsing configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Required field missing or invalid in configuration.
    #[error("invalid config: {field}: {message}")]
    ConfigInvalid { field: String, message: String },

    /// Required secret environment variable not set.
    #[error("environment variable not set: {name}")]
    MissingSecret { name: String },

    // ==========================================================================
    // Authentication errors (non-fatal, degrade the revenue path)
    // ==========================================================================
    /// BI session could not be established.
    #[error("BI session unavailable: {reason}")]
    AuthUnavailable { reason: String },

    /// Read returned 401 and the single re-auth + retry also failed.
    #[error("unauthorized reading {endpoint} after re-authentication")]
    Unauthorized { endpoint: String },

    // ==========================================================================
    // Network errors (recovered by retry; sentinel after exhaustion)
    // ==========================================================================
    /// All retry attempts exhausted. Downstream treats this as "no data".
    #[error("request failed after {attempts} attempts: {last_error}")]
    RequestFailed { attempts: u32, last_error: String },

    /// Generic network error (pre-retry classification).
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timeout after {0}s")]
    Timeout(u64),

    // ==========================================================================
    // Provider errors
    // ==========================================================================
    /// Failed to parse a provider response.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    /// Provider returned a 2xx response with no usable payload.
    #[error("no usable payload from {provider}")]
    EmptyPayload { provider: String },

    // ==========================================================================
    // Internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AbriefError {
    /// Map error to process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::MissingSecret { .. } => ExitCode::ConfigError,

            Self::AuthUnavailable { .. }
            | Self::Unauthorized { .. }
            | Self::RequestFailed { .. }
            | Self::Network(_)
            | Self::Timeout(_)
            | Self::ParseResponse(_)
            | Self::EmptyPayload { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::MissingSecret { .. } => ErrorCategory::Configuration,

            Self::AuthUnavailable { .. } | Self::Unauthorized { .. } => {
                ErrorCategory::Authentication
            }

            Self::RequestFailed { .. } | Self::Network(_) | Self::Timeout(_) => {
                ErrorCategory::Network
            }

            Self::ParseResponse(_) | Self::EmptyPayload { .. } => ErrorCategory::Provider,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `ABR-{category}{number}` where category is:
    /// - C: Configuration
    /// - A: Authentication
    /// - N: Network
    /// - P: Provider
    /// - X: Internal
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "ABR-C001",
            Self::ConfigParse { .. } => "ABR-C002",
            Self::ConfigInvalid { .. } => "ABR-C003",
            Self::MissingSecret { .. } => "ABR-C004",

            Self::AuthUnavailable { .. } => "ABR-A001",
            Self::Unauthorized { .. } => "ABR-A002",

            Self::Timeout(_) => "ABR-N001",
            Self::RequestFailed { .. } => "ABR-N002",
            Self::Network(_) => "ABR-N099",

            Self::ParseResponse(_) => "ABR-P001",
            Self::EmptyPayload { .. } => "ABR-P002",

            Self::Io(_) => "ABR-X001",
            Self::Json(_) => "ABR-X002",
            Self::Other(_) => "ABR-X099",
        }
    }

    /// Whether this is a fatal, pre-network configuration failure.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.category(), ErrorCategory::Configuration)
    }

    /// Returns whether the error is potentially recoverable by retrying.
    ///
    /// Only the transport consults this; no caller above the transport
    /// performs its own retry loop.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}
