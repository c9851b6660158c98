// Rankings loader: resolves where the player pool comes from and turns it
// into `PlayerCandidate`s in rank order.
//
// Source priority:
//   1. local CSV file chosen by the user
//   2. pasted CSV text (only if it contains a comma)
//   3. URL override
//   4. configured URL for the sport
//   5. env `<SPORT>_CSV_URL`
//   6. `data/<sport>_default_rankings.csv`
//   7. built-in defaults

pub mod cache;
pub mod defaults;
pub mod parse;
pub mod source;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::model::{PlayerCandidate, Sport};

pub use cache::{CachedText, RankingsCache, DEFAULT_CACHE_TTL};
pub use parse::{parse_rankings, parse_rankings_str};
pub use source::{HttpFetcher, RankingsFetcher, DEFAULT_FETCH_TIMEOUT};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RankingsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {origin}: {source}")]
    Csv { origin: String, source: csv::Error },

    #[error("rankings CSV must include at least columns: player,pos (missing: {})", missing.join(","))]
    MissingColumns { missing: Vec<String> },

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("fetching {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },
}

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

/// What the user supplied for this load. Empty fields fall through to the
/// next source.
#[derive(Debug, Clone)]
pub struct RankingsRequest {
    pub sport: Sport,
    pub file: Option<PathBuf>,
    pub pasted_csv: Option<String>,
    pub url_override: Option<String>,
}

impl RankingsRequest {
    pub fn for_sport(sport: Sport) -> Self {
        RankingsRequest {
            sport,
            file: None,
            pasted_csv: None,
            url_override: None,
        }
    }
}

/// Which source produced a set of rankings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingsOrigin {
    File(PathBuf),
    Pasted,
    Remote { url: String, cached: bool },
    DataFile(PathBuf),
    BuiltIn(Sport),
}

impl fmt::Display for RankingsOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingsOrigin::File(path) => write!(f, "file {}", path.display()),
            RankingsOrigin::Pasted => f.write_str("pasted CSV"),
            RankingsOrigin::Remote { url, cached: true } => write!(f, "{url} (cached)"),
            RankingsOrigin::Remote { url, cached: false } => f.write_str(url),
            RankingsOrigin::DataFile(path) => write!(f, "{}", path.display()),
            RankingsOrigin::BuiltIn(sport) => write!(f, "built-in {sport} defaults"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedRankings {
    pub players: Vec<PlayerCandidate>,
    pub origin: RankingsOrigin,
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Resolves a `RankingsRequest` against configured sources.
pub struct RankingsLoader {
    urls: BTreeMap<Sport, String>,
    env_urls: BTreeMap<Sport, String>,
    data_dir: PathBuf,
    fetcher: Arc<dyn RankingsFetcher>,
    cache: RankingsCache,
}

impl RankingsLoader {
    pub fn new(
        urls: BTreeMap<Sport, String>,
        data_dir: PathBuf,
        fetcher: Arc<dyn RankingsFetcher>,
        cache: RankingsCache,
    ) -> Self {
        RankingsLoader {
            urls,
            env_urls: BTreeMap::new(),
            data_dir,
            fetcher,
            cache,
        }
    }

    /// URLs from `<SPORT>_CSV_URL` environment variables, used after the
    /// configured URLs.
    pub fn with_env_urls(mut self, env_urls: BTreeMap<Sport, String>) -> Self {
        self.env_urls = env_urls;
        self
    }

    pub fn cache(&self) -> &RankingsCache {
        &self.cache
    }

    /// Forget cached remote text so the next load fetches again.
    pub fn clear_cache(&self) {
        info!("clearing rankings cache ({} entries)", self.cache.len());
        self.cache.clear();
    }

    /// Path of the optional local default rankings for `sport`.
    pub fn data_file(&self, sport: Sport) -> PathBuf {
        self.data_dir
            .join(format!("{}_default_rankings.csv", sport.code().to_lowercase()))
    }

    /// The remote URL that applies to `request`, if any.
    pub fn resolve_url(&self, request: &RankingsRequest) -> Option<String> {
        non_blank(request.url_override.as_deref())
            .or_else(|| non_blank(self.urls.get(&request.sport).map(String::as_str)))
            .or_else(|| non_blank(self.env_urls.get(&request.sport).map(String::as_str)))
    }

    pub async fn load(&self, request: &RankingsRequest) -> Result<LoadedRankings, RankingsError> {
        if let Some(path) = &request.file {
            let players = read_csv_file(path)?;
            return Ok(self.loaded(players, RankingsOrigin::File(path.clone())));
        }

        if let Some(text) = request.pasted_csv.as_deref().filter(|t| t.contains(',')) {
            let players = parse_rankings_str(text, "pasted CSV")?;
            return Ok(self.loaded(players, RankingsOrigin::Pasted));
        }

        if let Some(url) = self.resolve_url(request) {
            let (text, cached) = match self.cache.get(&url) {
                Some(hit) => (hit.text, true),
                None => {
                    let text = self.fetcher.fetch_text(&url).await?;
                    self.cache.insert(&url, text.clone());
                    (text, false)
                }
            };
            let players = parse_rankings_str(&text, &url)?;
            return Ok(self.loaded(players, RankingsOrigin::Remote { url, cached }));
        }

        let data_file = self.data_file(request.sport);
        if data_file.exists() {
            let players = read_csv_file(&data_file)?;
            return Ok(self.loaded(players, RankingsOrigin::DataFile(data_file)));
        }

        let players = parse_rankings_str(defaults::builtin_csv(request.sport), "built-in defaults")?;
        Ok(self.loaded(players, RankingsOrigin::BuiltIn(request.sport)))
    }

    fn loaded(&self, players: Vec<PlayerCandidate>, origin: RankingsOrigin) -> LoadedRankings {
        if players.is_empty() {
            warn!("rankings from {} contained no players", origin);
        } else {
            info!("loaded {} players from {}", players.len(), origin);
        }
        LoadedRankings { players, origin }
    }
}

/// Collect `<SPORT>_CSV_URL` from the process environment.
pub fn env_urls() -> BTreeMap<Sport, String> {
    Sport::ALL
        .into_iter()
        .filter_map(|sport| {
            std::env::var(format!("{}_CSV_URL", sport.code()))
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (sport, v))
        })
        .collect()
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn read_csv_file(path: &Path) -> Result<Vec<PlayerCandidate>, RankingsError> {
    let file = std::fs::File::open(path).map_err(|e| RankingsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_rankings(file, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
