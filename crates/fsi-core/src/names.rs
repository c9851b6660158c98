// Pasted name lists, name normalization, and fuzzy removal of drafted
// players from the rankings pool.

use regex::Regex;
use rapidfuzz::fuzz;
use thiserror::Error;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::model::PlayerCandidate;

/// Default similarity (0-100) at which a ranked name counts as drafted.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 90.0;

#[derive(Debug, Error)]
pub enum NamesError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Compiled patterns for cleaning free-text name lists.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    separators: Regex,
    bullet: Regex,
    space_runs: Regex,
    disallowed: Regex,
    threshold: f64,
}

impl NameMatcher {
    pub fn new(threshold: f64) -> Result<Self, NamesError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| NamesError::InvalidPattern(e.to_string()))
        };
        Ok(Self {
            separators: compile(r"[\r\n,;]+")?,
            bullet: compile(r"^(\d+[).\]]\s*|-+\s*|\*\s*)")?,
            space_runs: compile(r"\s+")?,
            disallowed: compile(r"[^a-z\s.\-'/]")?,
            threshold: threshold.clamp(0.0, 100.0),
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Split pasted text into one clean name per entry.
    ///
    /// Entries are separated by newlines, commas or semicolons. Leading
    /// numbering (`1.`, `2)`, `3]`) and bullets (`-`, `*`) are stripped and
    /// runs of whitespace collapsed. Duplicates are dropped
    /// case-insensitively, keeping the first spelling.
    pub fn parse_lines(&self, text: &str) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for raw in self.separators.split(text) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let unbulleted = self.bullet.replace(trimmed, "");
            let cleaned = self.space_runs.replace_all(unbulleted.trim(), " ").into_owned();
            if cleaned.is_empty() {
                continue;
            }
            if seen.insert(cleaned.to_lowercase()) {
                out.push(cleaned);
            }
        }
        out
    }

    /// Canonical form for comparison: NFKD, ASCII only, lowercase, anything
    /// outside letters, whitespace and `.-'/` replaced by a space, whitespace
    /// collapsed.
    pub fn normalize_name(&self, name: &str) -> String {
        let ascii: String = name.nfkd().filter(char::is_ascii).collect();
        let lowered = ascii.to_lowercase();
        let replaced = self.disallowed.replace_all(&lowered, " ");
        self.space_runs.replace_all(replaced.trim(), " ").into_owned()
    }

    /// Similarity of two already-normalized names on a 0-100 scale.
    ///
    /// Indel ratio: `2 * LCS / (len_a + len_b)`. A name missing only a
    /// suffix ("Patrick Mahomes" against "Patrick Mahomes II") still
    /// clears the default threshold.
    pub fn similarity(a: &str, b: &str) -> f64 {
        fuzz::ratio(a.chars(), b.chars()) * 100.0
    }

    /// Rankings with every player matching a drafted name removed.
    pub fn minus_drafted(
        &self,
        rankings: &[PlayerCandidate],
        drafted: &[String],
    ) -> Vec<PlayerCandidate> {
        let drafted_norm: Vec<String> = drafted
            .iter()
            .map(|d| self.normalize_name(d))
            .filter(|d| !d.is_empty())
            .collect();
        if drafted_norm.is_empty() {
            return rankings.to_vec();
        }

        rankings
            .iter()
            .filter(|row| {
                let name = self.normalize_name(&row.name);
                let taken = drafted_norm
                    .iter()
                    .any(|d| Self::similarity(&name, d) >= self.threshold);
                if taken {
                    debug!("removing drafted player {}", row.name);
                }
                !taken
            })
            .cloned()
            .collect()
    }
}
