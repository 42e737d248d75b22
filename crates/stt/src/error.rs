use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SttError>;

/// Transcription errors
#[derive(Debug, Error)]
pub enum SttError {
    /// The outbound payload could not be built (empty audio, bad metadata, bad header)
    #[error("Request construction failed: {0}")]
    RequestConstructionFailed(String),

    /// Transport-level failure: timeout, DNS, connection refused
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// Provider answered with a non-2xx status
    #[error("Provider API error ({status}): {body}")]
    NonOkStatus { status: u16, body: String },

    /// Provider answered 2xx with a body that does not match its schema
    #[error("Failed to decode provider response: {0}")]
    ResponseDecodeFailed(String),

    /// The chain was built without any provider
    #[error("No transcription providers configured")]
    NoProvidersConfigured,

    /// Every provider in the chain failed, in attempt order
    #[error("All transcription providers failed, last error: {}", describe_last(.attempts))]
    AllProvidersFailed { attempts: Vec<ProviderFailure> },

    /// Invalid provider configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// One failed attempt inside a chain run
#[derive(Debug, Error)]
#[error("provider {ordinal} ({provider}) failed: {error}")]
pub struct ProviderFailure {
    /// 1-based position of the provider in the chain
    pub ordinal: usize,
    /// Configured provider name
    pub provider: String,
    #[source]
    pub error: Box<SttError>,
}

fn describe_last(attempts: &[ProviderFailure]) -> String {
    attempts
        .last()
        .map_or_else(|| "no provider was attempted".to_string(), ToString::to_string)
}

impl SttError {
    /// Last attempt of a failed chain run, if any
    pub fn last_failure(&self) -> Option<&ProviderFailure> {
        match self {
            Self::AllProvidersFailed { attempts } => attempts.last(),
            _ => None,
        }
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestConstructionFailed(_) => StatusCode::BAD_REQUEST,
            Self::NetworkFailure(_) | Self::ResponseDecodeFailed(_) => StatusCode::BAD_GATEWAY,
            Self::NonOkStatus { status, .. } => match *status {
                401 => StatusCode::UNAUTHORIZED,
                403 => StatusCode::FORBIDDEN,
                429 => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::NoProvidersConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::AllProvidersFailed { attempts } => attempts
                .last()
                .map_or(StatusCode::BAD_GATEWAY, |failure| failure.error.status_code()),
            Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string for the response
    pub fn error_type(&self) -> &str {
        match self {
            Self::RequestConstructionFailed(_) => "invalid_request_error",
            Self::NetworkFailure(_)
            | Self::NonOkStatus { .. }
            | Self::ResponseDecodeFailed(_)
            | Self::AllProvidersFailed { .. } => "api_error",
            Self::NoProvidersConfigured => "service_unavailable",
            Self::ConfigError(_) => "internal_error",
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            Self::ConfigError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}
