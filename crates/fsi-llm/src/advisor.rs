// The recommendation entry point: rank, prompt, call, parse.

use tokio::sync::mpsc;
use tracing::{info, warn};

use fsi_core::config::LlmSettings;

use crate::client::{Completion, LlmClient};
use crate::error::AdvisorError;
use crate::prompt::{build_prompt, system_prompt, PromptOptions};
use crate::protocol::LlmEvent;
use crate::recommendation::{parse_recommendations, AdviceReport};
use crate::request::RecommendationRequest;

/// System and user messages for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPrompt {
    pub system: String,
    pub user: String,
}

pub fn prepare_prompt(request: &RecommendationRequest, options: &PromptOptions) -> PreparedPrompt {
    PreparedPrompt {
        system: system_prompt(request.preferences.sport),
        user: build_prompt(request, options),
    }
}

/// Parse a finished completion into a report, logging schema deviations.
pub fn finish_report(completion: Completion, settings: &LlmSettings) -> Result<AdviceReport, AdvisorError> {
    let advice = parse_recommendations(&completion.text).inspect_err(|e| {
        warn!(error = %e, chars = completion.text.len(), "model output did not parse");
    })?;
    let mut report = AdviceReport::new(advice, settings.model.clone());
    report.input_tokens = completion.input_tokens;
    report.output_tokens = completion.output_tokens;
    for warning in &report.warnings {
        warn!(%warning, "recommendation deviates from schema");
    }
    info!(
        top_targets = report.advice.top_targets.len(),
        warnings = report.warnings.len(),
        "recommendations ready"
    );
    Ok(report)
}

/// Draft recommendations for `request` with the default shortlist.
pub async fn get_draft_recommendations(
    request: &RecommendationRequest,
    client: &LlmClient,
    settings: &LlmSettings,
) -> Result<AdviceReport, AdvisorError> {
    get_draft_recommendations_with(request, client, settings, &PromptOptions::default()).await
}

/// Draft recommendations with explicit scoring weights and shortlist size.
///
/// An empty candidate pool yields an empty report without calling the model.
pub async fn get_draft_recommendations_with(
    request: &RecommendationRequest,
    client: &LlmClient,
    settings: &LlmSettings,
    options: &PromptOptions,
) -> Result<AdviceReport, AdvisorError> {
    if !client.is_active() {
        return Err(AdvisorError::NotConfigured);
    }
    if request.candidates.is_empty() {
        info!("no candidates available; skipping model call");
        return Ok(AdviceReport::empty(settings.model.clone()));
    }

    let prompt = prepare_prompt(request, options);
    let completion = client.complete(settings, &prompt.system, &prompt.user).await?;
    finish_report(completion, settings)
}

/// Stream a recommendation call over `tx`. The receiver parses the final
/// `Complete` text with `finish_report`.
pub async fn stream_draft_recommendations(
    request: &RecommendationRequest,
    client: &LlmClient,
    settings: &LlmSettings,
    options: &PromptOptions,
    tx: mpsc::Sender<LlmEvent>,
    generation: u64,
) {
    let prompt = prepare_prompt(request, options);
    client
        .stream_message(settings, &prompt.system, &prompt.user, tx, generation)
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClaudeClient;
    use crate::request::Preferences;
    use crate::test_support::{serve_once, sse_response};
    use fsi_core::{LeagueSettings, PlayerCandidate, RosterState, Sport};

    const ADVICE: &str = r#"{"top_targets":[{"player":"Bijan Robinson","pos":"RB","team":"ATL","best_pick":true,"why_best_pick":"elite volume","why_for_team":"fills RB1"}],"sleepers":[{"player":"Rashee Rice","pos":"WR","team":"KC","why_sleeper":"target share"}],"avoids":[],"notes":"Take the RB."}"#;

    fn settings() -> LlmSettings {
        LlmSettings {
            model: "test-model".to_string(),
            timeout_secs: 5,
            ..LlmSettings::default()
        }
    }

    fn request() -> RecommendationRequest {
        let mut bijan = PlayerCandidate::new("Bijan Robinson", "RB", "ATL");
        bijan.proj_pts = Some(290.0);
        bijan.adp = Some(4.0);
        let mut rice = PlayerCandidate::new("Rashee Rice", "WR", "KC");
        rice.proj_pts = Some(210.0);
        RecommendationRequest {
            candidates: vec![bijan, rice],
            state: RosterState::default(),
            settings: LeagueSettings::default(),
            preferences: Preferences {
                sport: Some(Sport::Nfl),
                position_priority: Vec::new(),
            },
        }
    }

    #[test]
    fn prepared_prompt_uses_sport_and_shortlist() {
        let prompt = prepare_prompt(&request(), &PromptOptions::default());
        assert!(prompt.system.contains("fantasy football"));
        assert!(prompt.user.contains("Bijan Robinson"));
        assert!(prompt.user.contains("candidates_sorted"));
    }

    #[tokio::test]
    async fn end_to_end_against_mock_server() {
        // Split mid-token to exercise reassembly.
        let (head, tail) = ADVICE.split_at(40);
        let (url, request_rx) = serve_once(sse_response(&[head, tail], 900, 120)).await;
        let client = LlmClient::Active(ClaudeClient::new("sk-test").with_base_url(url));

        let report = get_draft_recommendations(&request(), &client, &settings())
            .await
            .unwrap();

        assert_eq!(report.advice.best_pick().unwrap().player, "Bijan Robinson");
        assert_eq!(report.advice.notes, "Take the RB.");
        assert_eq!(report.model, "test-model");
        assert_eq!(report.input_tokens, 900);
        assert_eq!(report.output_tokens, 120);
        // Only one top target came back.
        assert!(report.warnings.iter().any(|w| w.contains("5 top targets")));

        let sent = request_rx.await.unwrap();
        assert!(sent.contains("candidates_sorted"));
        assert!(sent.contains("fantasy football"));
    }

    #[tokio::test]
    async fn disabled_client_is_not_configured() {
        let err = get_draft_recommendations(&request(), &LlmClient::Disabled, &settings())
            .await
            .unwrap_err();
        assert_eq!(err, AdvisorError::NotConfigured);
    }

    #[tokio::test]
    async fn empty_pool_skips_the_call() {
        // Points at a closed port; reaching it would fail the test.
        let client = LlmClient::Active(ClaudeClient::new("sk-test").with_base_url("http://127.0.0.1:9/"));
        let mut req = request();
        req.candidates.clear();
        let report = get_draft_recommendations(&req, &client, &settings()).await.unwrap();
        assert!(report.advice.is_empty());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.input_tokens, 0);
    }

    #[tokio::test]
    async fn unparseable_output_is_an_error() {
        let (url, _) = serve_once(sse_response(&["I'd take Bijan."], 10, 5)).await;
        let client = LlmClient::Active(ClaudeClient::new("sk-test").with_base_url(url));
        let err = get_draft_recommendations(&request(), &client, &settings())
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Unparseable(_)));
    }

    #[tokio::test]
    async fn streaming_variant_emits_complete() {
        let (url, _) = serve_once(sse_response(&[ADVICE], 1, 1)).await;
        let client = LlmClient::Active(ClaudeClient::new("sk-test").with_base_url(url));
        let (tx, mut rx) = mpsc::channel(16);
        stream_draft_recommendations(&request(), &client, &settings(), &PromptOptions::default(), tx, 2)
            .await;

        let mut last = None;
        while let Some(event) = rx.recv().await {
            last = Some(event);
        }
        match last {
            Some(LlmEvent::Complete { full_text, generation, input_tokens, output_tokens }) => {
                assert_eq!(generation, 2);
                let completion = Completion { text: full_text, input_tokens, output_tokens };
                let report = finish_report(completion, &settings()).unwrap();
                assert_eq!(report.advice.sleepers[0].player, "Rashee Rice");
            }
            other => panic!("expected Complete, got {other:?}"),
        }
    }
}
