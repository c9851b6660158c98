// Parsing the model's JSON answer into typed draft advice.
//
// Models sometimes wrap the JSON in a markdown fence or add a sentence before
// it. Parsing tries the whole text first, then the first fenced block, then the
// outermost braces. Missing or null keys become empty values; deviations from
// the requested counts are reported as warnings, not errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AdvisorError;

/// Treat an explicit JSON `null` like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopTarget {
    #[serde(deserialize_with = "null_as_default")]
    pub player: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pos: String,
    #[serde(deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(deserialize_with = "null_as_default")]
    pub best_pick: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub why_best_pick: String,
    #[serde(deserialize_with = "null_as_default")]
    pub why_for_team: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sleeper {
    #[serde(deserialize_with = "null_as_default")]
    pub player: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pos: String,
    #[serde(deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(deserialize_with = "null_as_default")]
    pub why_sleeper: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Avoid {
    #[serde(deserialize_with = "null_as_default")]
    pub player: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pos: String,
    #[serde(deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reason: String,
}

/// The model's structured answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftAdvice {
    #[serde(deserialize_with = "null_as_default")]
    pub top_targets: Vec<TopTarget>,
    #[serde(deserialize_with = "null_as_default")]
    pub sleepers: Vec<Sleeper>,
    #[serde(deserialize_with = "null_as_default")]
    pub avoids: Vec<Avoid>,
    #[serde(deserialize_with = "null_as_default")]
    pub notes: String,
}

impl DraftAdvice {
    /// The first target flagged as the best pick.
    pub fn best_pick(&self) -> Option<&TopTarget> {
        self.top_targets.iter().find(|t| t.best_pick)
    }

    pub fn is_empty(&self) -> bool {
        self.top_targets.is_empty()
            && self.sleepers.is_empty()
            && self.avoids.is_empty()
            && self.notes.trim().is_empty()
    }

    /// Ways the answer departs from the requested shape.
    pub fn schema_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.top_targets.len() != 5 {
            warnings.push(format!(
                "expected 5 top targets, got {}",
                self.top_targets.len()
            ));
        }
        let best = self.top_targets.iter().filter(|t| t.best_pick).count();
        if best != 1 {
            warnings.push(format!("expected exactly one best_pick, got {best}"));
        }
        if !(1..=3).contains(&self.sleepers.len()) {
            warnings.push(format!(
                "expected 1-3 sleepers, got {}",
                self.sleepers.len()
            ));
        }
        if self.avoids.len() > 2 {
            warnings.push(format!("expected at most 2 avoids, got {}", self.avoids.len()));
        }
        if self.notes.trim().is_empty() {
            warnings.push("notes are empty".to_string());
        }
        warnings
    }
}

/// Parsed advice together with how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceReport {
    pub advice: DraftAdvice,
    pub warnings: Vec<String>,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub generated_at: DateTime<Utc>,
}

impl AdviceReport {
    pub fn new(advice: DraftAdvice, model: impl Into<String>) -> Self {
        let warnings = advice.schema_warnings();
        AdviceReport {
            advice,
            warnings,
            model: model.into(),
            input_tokens: 0,
            output_tokens: 0,
            generated_at: Utc::now(),
        }
    }

    /// Report for a pool with nobody left to recommend. Carries no schema
    /// warnings since no model output was produced.
    pub fn empty(model: impl Into<String>) -> Self {
        AdviceReport {
            warnings: Vec::new(),
            ..Self::new(DraftAdvice::default(), model)
        }
    }
}

// ---------------------------------------------------------------------------
// Salvage parsing
// ---------------------------------------------------------------------------

/// Body of the first ``` fenced block, without its language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    // Skip a language tag such as `json` on the opening line.
    let body_start = rest.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &rest[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// From the first `{` to the last `}`.
fn outer_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse model output into advice, salvaging JSON embedded in prose.
pub fn parse_recommendations(text: &str) -> Result<DraftAdvice, AdvisorError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AdvisorError::EmptyResponse);
    }

    let strict_err = match serde_json::from_str::<DraftAdvice>(trimmed) {
        Ok(advice) => return Ok(advice),
        Err(e) => e,
    };

    let salvaged = [fenced_block(trimmed), outer_braces(trimmed)]
        .into_iter()
        .flatten()
        .find_map(|candidate| serde_json::from_str::<DraftAdvice>(candidate).ok());

    salvaged.ok_or_else(|| AdvisorError::Unparseable(strict_err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "top_targets": [
            {"player": "A", "pos": "RB", "team": "X", "best_pick": true, "why_best_pick": "volume", "why_for_team": "fills RB2"},
            {"player": "B", "pos": "WR", "team": "X", "best_pick": false, "why_for_team": "target share"},
            {"player": "C", "pos": "WR", "team": "Y", "best_pick": false, "why_for_team": "deep threat"},
            {"player": "D", "pos": "TE", "team": "Y", "best_pick": false, "why_for_team": "scarcity"},
            {"player": "E", "pos": "QB", "team": "Z", "best_pick": false, "why_for_team": "rushing floor"}
        ],
        "sleepers": [{"player": "S", "pos": "WR", "team": "Z", "why_sleeper": "new OC"}],
        "avoids": [{"player": "V", "pos": "RB", "team": "Q", "reason": "committee"}],
        "notes": "Lean RB early, WR depth later."
    }"#;

    #[test]
    fn strict_json_parses_with_no_warnings() {
        let advice = parse_recommendations(FULL).unwrap();
        assert_eq!(advice.top_targets.len(), 5);
        assert_eq!(advice.best_pick().unwrap().player, "A");
        assert_eq!(advice.sleepers[0].why_sleeper, "new OC");
        assert_eq!(advice.avoids[0].reason, "committee");
        assert!(advice.schema_warnings().is_empty());
    }

    #[test]
    fn fenced_block_is_salvaged() {
        let text = format!("Here you go:\n```json\n{FULL}\n```\nGood luck!");
        let advice = parse_recommendations(&text).unwrap();
        assert_eq!(advice.top_targets.len(), 5);
    }

    #[test]
    fn outer_braces_are_salvaged() {
        let text = format!("Sure! {FULL} Hope that helps.");
        let advice = parse_recommendations(&text).unwrap();
        assert_eq!(advice.notes, "Lean RB early, WR depth later.");
    }

    #[test]
    fn missing_and_null_keys_default_to_empty() {
        let advice = parse_recommendations(r#"{"top_targets": null, "notes": "n"}"#).unwrap();
        assert!(advice.top_targets.is_empty());
        assert!(advice.sleepers.is_empty());
        assert!(advice.avoids.is_empty());
        assert_eq!(advice.notes, "n");
        assert!(advice.best_pick().is_none());
    }

    #[test]
    fn null_fields_inside_entries_default() {
        let advice = parse_recommendations(
            r#"{"top_targets": [{"player": "A", "team": null, "best_pick": null}]}"#,
        )
        .unwrap();
        assert_eq!(advice.top_targets[0].team, "");
        assert!(!advice.top_targets[0].best_pick);
    }

    #[test]
    fn garbage_is_unparseable() {
        let err = parse_recommendations("I cannot help with that.").unwrap_err();
        assert!(matches!(err, AdvisorError::Unparseable(_)));
        let err = parse_recommendations("{ not json }").unwrap_err();
        assert!(matches!(err, AdvisorError::Unparseable(_)));
    }

    #[test]
    fn blank_text_is_empty_response() {
        assert_eq!(parse_recommendations("  \n").unwrap_err(), AdvisorError::EmptyResponse);
    }

    #[test]
    fn warnings_report_count_deviations() {
        let advice = parse_recommendations(
            r#"{"top_targets": [
                {"player": "A", "best_pick": true},
                {"player": "B", "best_pick": true}
            ], "avoids": [{}, {}, {}]}"#,
        )
        .unwrap();
        let warnings = advice.schema_warnings();
        assert!(warnings.iter().any(|w| w.contains("5 top targets, got 2")));
        assert!(warnings.iter().any(|w| w.contains("one best_pick, got 2")));
        assert!(warnings.iter().any(|w| w.contains("1-3 sleepers, got 0")));
        assert!(warnings.iter().any(|w| w.contains("at most 2 avoids, got 3")));
        assert!(warnings.iter().any(|w| w.contains("notes")));
    }

    #[test]
    fn report_collects_warnings() {
        let report = AdviceReport::new(DraftAdvice::default(), "test-model");
        assert!(report.advice.is_empty());
        assert_eq!(report.model, "test-model");
        assert!(!report.warnings.is_empty());
    }

    #[test]
    fn empty_report_has_no_warnings() {
        let report = AdviceReport::empty("test-model");
        assert!(report.advice.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.model, "test-model");
    }
}
