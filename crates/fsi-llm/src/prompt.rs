// Prompt construction for draft recommendations.
//
// The candidates are ranked by the scoring engine before the model sees
// them, so the model starts from an ordered shortlist with the numbers
// already computed and spends its effort on judgment.

use serde_json::{json, Value};

use fsi_core::{Scorer, ScoredCandidate, Sport};

use crate::request::RecommendationRequest;

/// Candidates sent to the model when not configured otherwise.
pub const DEFAULT_SHORTLIST_SIZE: usize = 18;

/// How the candidate shortlist is built.
#[derive(Debug, Clone)]
pub struct PromptOptions {
    pub scorer: Scorer,
    pub shortlist_size: usize,
}

impl Default for PromptOptions {
    fn default() -> Self {
        PromptOptions {
            scorer: Scorer::default(),
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// System prompt and schema
// ---------------------------------------------------------------------------

fn sport_word(sport: Option<Sport>) -> &'static str {
    match sport {
        Some(Sport::Nfl) => "football",
        Some(Sport::Nba) => "basketball",
        Some(Sport::Mlb) => "baseball",
        Some(Sport::Nhl) => "hockey",
        None => "sports",
    }
}

/// System prompt for every recommendation call.
pub fn system_prompt(sport: Option<Sport>) -> String {
    format!(
        "You are an elite fantasy {} draft assistant. Be decisive, brief, and pragmatic. \
         Assume redraft unless noted. Avoid clichés. Cite logic with data points (ADP, role, \
         scheme, injury). Return STRICT JSON that matches the schema.",
        sport_word(sport)
    )
}

/// JSON schema the model's answer must follow.
pub fn response_schema() -> Value {
    let player_fields = |extra: &[&str]| {
        let mut props = serde_json::Map::new();
        for key in ["player", "pos", "team"] {
            props.insert(key.to_string(), json!({"type": "string"}));
        }
        for key in extra {
            let ty = if *key == "best_pick" { "boolean" } else { "string" };
            props.insert(key.to_string(), json!({"type": ty}));
        }
        let required: Vec<&str> = ["player", "pos", "team"].iter().chain(extra).copied().collect();
        json!({"type": "object", "properties": props, "required": required})
    };

    json!({
        "type": "object",
        "properties": {
            "top_targets": {
                "type": "array", "minItems": 5, "maxItems": 5,
                "items": player_fields(&["best_pick", "why_best_pick", "why_for_team"])
            },
            "sleepers": {
                "type": "array", "minItems": 1, "maxItems": 3,
                "items": player_fields(&["why_sleeper"])
            },
            "avoids": {
                "type": "array", "minItems": 0, "maxItems": 2,
                "items": player_fields(&["reason"])
            },
            "notes": {"type": "string"}
        },
        "required": ["top_targets", "sleepers", "avoids", "notes"]
    })
}

// ---------------------------------------------------------------------------
// User prompt
// ---------------------------------------------------------------------------

const TASKS: &str = "\
TASKS:
1) Choose 5 top targets for the upcoming pick. Balance positional needs and value. \
Include a short, actionable reason. Highlight exactly ONE 'best_pick': true and include 'why_best_pick'. \
Describe why each player is a great pick for this team in a few sentences under 'why_for_team'.
2) List 3 sleepers likely available in the next few rounds with 'why_sleeper'.
3) List up to 2 avoids with 'reason'.
4) Add 2-3 sentence 'notes' with roster build advice or pivot plan if a positional run happens.

Return STRICT JSON ONLY. Do not include markdown, commentary, or extra keys.
";

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn format_candidate(scored: &ScoredCandidate) -> Value {
    let c = &scored.candidate;
    json!({
        "player": c.name,
        "pos": c.position,
        "team": c.team,
        "bye": c.bye,
        "ecr": c.ecr,
        "adp": c.adp,
        "proj_pts": c.proj_pts,
        "tier": c.tier,
        "score": round4(scored.score),
    })
}

/// The ranked shortlist the prompt will contain.
pub fn shortlist(request: &RecommendationRequest, options: &PromptOptions) -> Vec<ScoredCandidate> {
    options.scorer.rank_scored(
        &request.candidates,
        &request.state,
        &request.settings,
        options.shortlist_size,
    )
}

/// The user message: pretty JSON context, the task list, then the schema.
pub fn build_prompt(request: &RecommendationRequest, options: &PromptOptions) -> String {
    let candidates: Vec<Value> = shortlist(request, options).iter().map(format_candidate).collect();
    let schema = response_schema();

    let context = json!({
        "league": request.settings,
        "state": request.state,
        "preferences": request.preferences,
        "candidates_sorted": candidates,
        "schema": schema,
    });

    format!("CONTEXT:\n{context:#}\n\n{TASKS}SCHEMA:\n{schema}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Preferences;
    use fsi_core::{LeagueSettings, PlayerCandidate, QbFormat, RosterState};

    fn request_with(n: usize) -> RecommendationRequest {
        let candidates = (0..n)
            .map(|i| {
                let mut p = PlayerCandidate::new(format!("Player {i}"), "WR", "TST");
                p.proj_pts = Some(100.0 + i as f64);
                p.adp = Some(30.0);
                p.tier = Some(3);
                p
            })
            .collect();
        RecommendationRequest {
            candidates,
            state: RosterState {
                pick_overall: 24,
                ..RosterState::default()
            },
            settings: LeagueSettings {
                qb_format: QbFormat::Superflex,
                ..LeagueSettings::default()
            },
            preferences: Preferences {
                sport: Some(Sport::Nfl),
                position_priority: vec!["RB".into(), "TE".into()],
            },
        }
    }

    fn context_of(prompt: &str) -> Value {
        let start = prompt.find('{').unwrap();
        let end = prompt.find("\n\nTASKS:").unwrap();
        serde_json::from_str(&prompt[start..end]).unwrap()
    }

    #[test]
    fn system_prompt_names_the_sport() {
        assert!(system_prompt(Some(Sport::Nba)).contains("fantasy basketball"));
        assert!(system_prompt(None).contains("fantasy sports"));
        assert!(system_prompt(None).contains("STRICT JSON"));
    }

    #[test]
    fn schema_requires_all_sections() {
        let schema = response_schema();
        assert_eq!(schema["required"], json!(["top_targets", "sleepers", "avoids", "notes"]));
        assert_eq!(schema["properties"]["top_targets"]["minItems"], 5);
        assert_eq!(schema["properties"]["sleepers"]["maxItems"], 3);
        assert_eq!(schema["properties"]["avoids"]["maxItems"], 2);
        assert_eq!(
            schema["properties"]["top_targets"]["items"]["properties"]["best_pick"]["type"],
            "boolean"
        );
        let required = &schema["properties"]["avoids"]["items"]["required"];
        assert_eq!(*required, json!(["player", "pos", "team", "reason"]));
    }

    #[test]
    fn prompt_keeps_top_eighteen_in_score_order() {
        let prompt = build_prompt(&request_with(25), &PromptOptions::default());
        let context = context_of(&prompt);
        let candidates = context["candidates_sorted"].as_array().unwrap();
        assert_eq!(candidates.len(), 18);
        assert_eq!(candidates[0]["player"], "Player 24");
        let scores: Vec<f64> = candidates.iter().map(|c| c["score"].as_f64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn prompt_carries_league_state_and_preferences() {
        let prompt = build_prompt(&request_with(3), &PromptOptions::default());
        let context = context_of(&prompt);
        assert_eq!(context["league"]["qb_format"], "SF");
        assert_eq!(context["league"]["teams"], 12);
        assert_eq!(context["state"]["pick_overall"], 24);
        assert_eq!(context["preferences"]["position_priority"], json!(["RB", "TE"]));
        assert_eq!(context["preferences"]["sport"], "NFL");
        assert!(context["schema"].is_object());
        assert!(prompt.contains("Highlight exactly ONE 'best_pick': true"));
        assert!(prompt.trim_end().ends_with('}'));
    }

    #[test]
    fn candidate_fields_and_rounded_score() {
        let prompt = build_prompt(&request_with(1), &PromptOptions::default());
        let context = context_of(&prompt);
        let c = &context["candidates_sorted"][0];
        assert_eq!(c["pos"], "WR");
        assert_eq!(c["team"], "TST");
        assert!(c["bye"].is_null());
        assert_eq!(c["tier"], 3);
        let score = c["score"].as_f64().unwrap();
        assert!(((score * 10_000.0).round() - score * 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn shortlist_size_is_configurable() {
        let options = PromptOptions {
            shortlist_size: 4,
            ..PromptOptions::default()
        };
        assert_eq!(shortlist(&request_with(10), &options).len(), 4);
        assert!(shortlist(&request_with(0), &options).is_empty());
    }
}
