// End-to-end check of the pre-model pipeline: load rankings from a CSV file,
// drop drafted players, build the roster state and rank what is left.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use fsi_core::draft::{build_roster_state, parse_roster_lines};
use fsi_core::names::NameMatcher;
use fsi_core::rankings::{HttpFetcher, RankingsCache, RankingsLoader, RankingsOrigin, RankingsRequest};
use fsi_core::{LeagueSettings, QbFormat, Scorer, Sport};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn loader() -> RankingsLoader {
    let fetcher = HttpFetcher::new(std::time::Duration::from_secs(1)).unwrap();
    RankingsLoader::new(
        BTreeMap::new(),
        std::env::temp_dir().join("fsi_pipeline_no_data"),
        Arc::new(fetcher),
        RankingsCache::default(),
    )
}

fn starters() -> BTreeMap<String, u32> {
    [("QB", 1), ("RB", 2), ("WR", 2), ("TE", 1), ("K", 1)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[tokio::test]
async fn rankings_to_shortlist() {
    let request = RankingsRequest {
        file: Some(fixture("nfl_rankings.csv")),
        ..RankingsRequest::for_sport(Sport::Nfl)
    };
    let loaded = loader().load(&request).await.unwrap();
    assert!(matches!(loaded.origin, RankingsOrigin::File(_)));
    assert_eq!(loaded.players.len(), 20);
    assert_eq!(loaded.players[0].position, "RB");
    assert_eq!(loaded.players[0].tier, Some(1));

    let matcher = NameMatcher::new(90.0).unwrap();
    let drafted = matcher.parse_lines("1. Bijan Robinson\n2. JaMarr Chase\n3) Justin Jefferson");
    let roster = parse_roster_lines("RB: Saquon Barkley\nWR: CeeDee Lamb");

    // Roster players are gone from the pool too.
    let mut taken = drafted.clone();
    taken.extend(roster.names());
    let available = matcher.minus_drafted(&loaded.players, &taken);
    assert_eq!(available.len(), 15);
    assert!(available.iter().all(|p| p.name != "Ja'Marr Chase"));

    let state = build_roster_state(&roster, &starters(), 6, 12, 24);
    assert_eq!(state.draft_round, 2);
    assert_eq!(state.turns_until_next_pick, 0);

    let settings = LeagueSettings {
        roster_limits: BTreeMap::new(),
        ..LeagueSettings::default()
    };
    let scorer = Scorer::default();
    let shortlist = scorer.rank_scored(&available, &state, &settings, 5);
    assert_eq!(shortlist.len(), 5);
    assert!(shortlist.windows(2).all(|w| w[0].score >= w[1].score));

    // Same pool in a superflex league lifts every QB's score.
    let sf = LeagueSettings {
        qb_format: QbFormat::Superflex,
        ..settings.clone()
    };
    let one_qb_all = scorer.rank_scored(&available, &state, &settings, available.len());
    let sf_all = scorer.rank_scored(&available, &state, &sf, available.len());
    let qb_score = |list: &[fsi_core::ScoredCandidate], name: &str| {
        list.iter().find(|s| s.candidate.name == name).map(|s| s.score).unwrap()
    };
    assert!(qb_score(&sf_all, "Josh Allen") > qb_score(&one_qb_all, "Josh Allen"));
}
