// Configuration loading and parsing (league.toml, strategy.toml, credentials.toml).

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::model::{LeagueSettings, QbFormat, ScoringFormat, Sport};
use crate::scoring::ScoringWeights;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    pub credentials: CredentialsConfig,
    /// Directory holding `<sport>_default_rankings.csv`, resolved against
    /// the base directory.
    pub data_dir: PathBuf,
}

impl Config {
    /// The API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.credentials
            .anthropic_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub sport: Sport,
    pub num_teams: u32,
    pub scoring: ScoringFormat,
    pub qb_format: QbFormat,
    /// Overall pick number the session starts at.
    #[serde(default = "default_first_pick")]
    pub first_pick: u32,
    #[serde(default)]
    pub bench_slots: u32,
    /// Positions the user wants emphasized; passed to the model as a
    /// preference, not used in scoring.
    #[serde(default)]
    pub position_priority: Vec<String>,
    #[serde(default)]
    pub starters: BTreeMap<String, u32>,
    #[serde(default)]
    pub roster_limits: BTreeMap<String, u32>,
}

fn default_first_pick() -> u32 {
    1
}

impl LeagueConfig {
    /// League settings for scoring, with position keys uppercased.
    pub fn settings(&self) -> LeagueSettings {
        LeagueSettings {
            teams: self.num_teams,
            scoring: self.scoring,
            qb_format: self.qb_format,
            roster_limits: upper_keys(&self.roster_limits),
        }
    }

    /// Starter slots with position keys uppercased.
    pub fn starters(&self) -> BTreeMap<String, u32> {
        upper_keys(&self.starters)
    }
}

fn upper_keys(map: &BTreeMap<String, u32>) -> BTreeMap<String, u32> {
    map.iter()
        .map(|(k, v)| (k.trim().to_uppercase(), *v))
        .collect()
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    #[serde(default)]
    scoring: ScoringWeights,
    #[serde(default)]
    rankings: RankingsConfig,
    llm: LlmSettings,
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub weights: ScoringWeights,
    pub rankings: RankingsConfig,
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankingsConfig {
    /// Candidates sent to the model.
    pub shortlist_size: usize,
    /// Candidates shown on the Available tab.
    pub display_limit: usize,
    /// Name-match similarity (0-100) that counts as drafted.
    pub fuzzy_threshold: u32,
    pub cache_ttl_secs: u64,
    pub fetch_timeout_secs: u64,
    pub data_dir: String,
    pub file: Option<PathBuf>,
    pub url_override: Option<String>,
    pub urls: BTreeMap<Sport, String>,
}

impl Default for RankingsConfig {
    fn default() -> Self {
        RankingsConfig {
            shortlist_size: 18,
            display_limit: 60,
            fuzzy_threshold: 90,
            cache_ttl_secs: 900,
            fetch_timeout_secs: 12,
            data_dir: "data".to_string(),
            file: None,
            url_override: None,
            urls: BTreeMap::new(),
        }
    }
}

impl RankingsConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Model-call settings, passed explicitly into every recommendation call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmSettings {
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_temperature() -> f64 {
    0.3
}

fn default_timeout_secs() -> u64 {
    60
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        LlmSettings {
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub anthropic_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml`,
/// `config/strategy.toml`, and (optionally) `config/credentials.toml`,
/// all relative to the given `base_dir`.
///
/// This is the lower-level loading primitive: it neither copies defaults nor
/// reads the environment. Prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;
    let league = league_file.league;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let data_dir = base_dir.join(&strategy_file.rankings.data_dir);
    let strategy = StrategyConfig {
        weights: strategy_file.scoring,
        rankings: strategy_file.rankings,
        llm: strategy_file.llm,
    };

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        league,
        strategy,
        credentials,
        data_dir,
    };

    validate(&config)?;

    Ok(config)
}

/// Apply environment overrides: `DRAFT_MODEL` replaces the configured model,
/// `ANTHROPIC_API_KEY` fills in a missing key. `lookup` reads a variable.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(model) = lookup("DRAFT_MODEL").filter(|m| !m.trim().is_empty()) {
        config.strategy.llm.model = model.trim().to_string();
    }
    if config.api_key().is_none() {
        if let Some(key) = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.credentials.anthropic_api_key = Some(key);
        }
    }
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying defaults first and applying environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let mut config = load_config_from(&cwd)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Largest league the draft math is configured for.
pub const MAX_TEAMS: u32 = 32;

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;
    if !(1..=MAX_TEAMS).contains(&league.num_teams) {
        return Err(invalid(
            "league.num_teams",
            format!("must be between 1 and {MAX_TEAMS}, got {}", league.num_teams),
        ));
    }
    if league.first_pick == 0 {
        return Err(invalid("league.first_pick", "must be at least 1"));
    }

    let rankings = &config.strategy.rankings;
    if rankings.shortlist_size == 0 {
        return Err(invalid("rankings.shortlist_size", "must be > 0"));
    }
    if !(1..=500).contains(&rankings.display_limit) {
        return Err(invalid(
            "rankings.display_limit",
            format!("must be between 1 and 500, got {}", rankings.display_limit),
        ));
    }
    if !(50..=100).contains(&rankings.fuzzy_threshold) {
        return Err(invalid(
            "rankings.fuzzy_threshold",
            format!("must be between 50 and 100, got {}", rankings.fuzzy_threshold),
        ));
    }
    if rankings.fetch_timeout_secs == 0 {
        return Err(invalid("rankings.fetch_timeout_secs", "must be > 0"));
    }

    let llm = &config.strategy.llm;
    if llm.model.trim().is_empty() {
        return Err(invalid("llm.model", "must not be empty"));
    }
    if llm.max_tokens == 0 {
        return Err(invalid("llm.max_tokens", "must be > 0"));
    }
    if !(0.0..=1.0).contains(&llm.temperature) {
        return Err(invalid(
            "llm.temperature",
            format!("must be between 0.0 and 1.0 inclusive, got {}", llm.temperature),
        ));
    }
    if llm.timeout_secs == 0 {
        return Err(invalid("llm.timeout_secs", "must be > 0"));
    }

    // Scales divide; every weight must be a real number.
    let w = &config.strategy.weights;
    let weight_fields: &[(&str, f64)] = &[
        ("scoring.projection_weight", w.projection_weight),
        ("scoring.projection_scale", w.projection_scale),
        ("scoring.value_weight", w.value_weight),
        ("scoring.value_scale", w.value_scale),
        ("scoring.tier_weight", w.tier_weight),
        ("scoring.tier_coefficient", w.tier_coefficient),
        ("scoring.need_per_gap", w.need_per_gap),
        ("scoring.run_risk_boost", w.run_risk_boost),
        ("scoring.scarcity_bonus", w.scarcity_bonus),
        ("scoring.superflex_qb_bonus", w.superflex_qb_bonus),
    ];
    for (name, val) in weight_fields {
        if !val.is_finite() {
            return Err(invalid(name, format!("must be finite, got {val}")));
        }
    }
    for (name, val) in [
        ("scoring.projection_scale", w.projection_scale),
        ("scoring.value_scale", w.value_scale),
    ] {
        if val <= 0.0 {
            return Err(invalid(name, format!("must be > 0, got {val}")));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
