// Draft recommendations from the Anthropic Messages API: prompt construction
// over the ranked shortlist, the streaming client, and response parsing.

pub mod advisor;
pub mod client;
pub mod error;
pub mod prompt;
pub mod protocol;
pub mod recommendation;
pub mod request;

#[cfg(test)]
mod test_support;

pub use advisor::{get_draft_recommendations, get_draft_recommendations_with, stream_draft_recommendations};
pub use client::{ClaudeClient, Completion, LlmClient};
pub use error::AdvisorError;
pub use prompt::PromptOptions;
pub use protocol::{LlmEvent, LlmStatus};
pub use recommendation::{AdviceReport, DraftAdvice};
pub use request::{LegacyRequest, LegacySettings, LegacyState, Preferences, RecommendationRequest};
