// Errors from the recommendation call.

use thiserror::Error;

/// Why a recommendation request failed. Every variant is non-fatal: the UI
/// shows it and the user may ask again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    #[error("LLM not configured: set anthropic_api_key in config/credentials.toml or ANTHROPIC_API_KEY")]
    NotConfigured,

    #[error("model call timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("API returned status {status}: {message}")]
    ApiStatus { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("model returned no content")]
    EmptyResponse,

    #[error("could not parse model output as JSON: {0}")]
    Unparseable(String),

    #[error("request cancelled")]
    Cancelled,
}

impl AdvisorError {
    /// Whether asking again could plausibly succeed without user action.
    pub fn is_retryable(&self) -> bool {
        match self {
            AdvisorError::NotConfigured | AdvisorError::Cancelled => false,
            AdvisorError::ApiStatus { status, .. } => *status == 429 || *status >= 500,
            AdvisorError::Timeout { .. }
            | AdvisorError::Transport(_)
            | AdvisorError::EmptyResponse
            | AdvisorError::Unparseable(_) => true,
        }
    }
}
