// Rankings CSV parsing with header guessing.
//
// Rankings exports disagree on column names ("Player Name", "POS", "RK",
// "AVG", "FPTS"...). Headers are trimmed, lowercased and mapped through an
// alias table onto the canonical names, then each row is deserialized with
// serde against the rewritten header.

use std::io::Read;

use csv::StringRecord;
use serde::Deserialize;
use tracing::{debug, warn};

use super::RankingsError;
use crate::model::PlayerCandidate;

// ---------------------------------------------------------------------------
// Header aliases
// ---------------------------------------------------------------------------

/// Canonical column name and every header that maps onto it.
const HEADER_ALIASES: &[(&str, &[&str])] = &[
    ("player", &["player", "name", "player name", "player_name", "playername"]),
    ("pos", &["pos", "position", "positions"]),
    ("team", &["team", "tm", "nfl team"]),
    ("bye", &["bye", "bye week", "bye_week"]),
    ("ecr", &["ecr", "rank", "rk", "overall"]),
    ("adp", &["adp", "avg", "average draft position"]),
    (
        "proj_pts",
        &["proj_pts", "proj", "fpts", "projection", "points", "projected points"],
    ),
    ("tier", &["tier", "tiers"]),
];

const REQUIRED_COLUMNS: [&str; 2] = ["player", "pos"];

/// Map one raw header onto its canonical name, if it has one.
pub fn canonical_header(raw: &str) -> Option<&'static str> {
    let key = raw.trim_start_matches('\u{feff}').trim().to_lowercase();
    HEADER_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&key.as_str()))
        .map(|(canonical, _)| *canonical)
}

/// Rewrite a header record onto canonical names. The first column matching
/// a canonical name wins; later duplicates and unknown columns get a
/// placeholder name that deserialization ignores.
fn canonical_headers(headers: &StringRecord) -> StringRecord {
    let mut taken: Vec<&'static str> = Vec::new();
    let mut out = StringRecord::new();
    for (idx, raw) in headers.iter().enumerate() {
        match canonical_header(raw) {
            Some(name) if !taken.contains(&name) => {
                taken.push(name);
                out.push_field(name);
            }
            _ => {
                debug!("ignoring rankings column '{}'", raw);
                out.push_field(&format!("_unused_{idx}"));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Raw row
// ---------------------------------------------------------------------------

/// One CSV row against canonical headers. Numbers stay text so a bad value
/// in an optional column drops only that value, not the row.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRankingRow {
    player: String,
    pos: String,
    team: String,
    bye: String,
    ecr: String,
    adp: String,
    proj_pts: String,
    tier: String,
}

impl RawRankingRow {
    fn into_candidate(self) -> Option<PlayerCandidate> {
        let name = self.player.trim();
        if name.is_empty() {
            return None;
        }
        Some(PlayerCandidate {
            name: name.to_string(),
            position: clean_position(&self.pos),
            team: self.team.trim().to_string(),
            bye: parse_whole(&self.bye),
            ecr: parse_number(&self.ecr),
            adp: parse_number(&self.adp),
            proj_pts: parse_number(&self.proj_pts),
            tier: parse_whole(&self.tier),
        })
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_whole(raw: &str) -> Option<u32> {
    parse_number(raw)
        .filter(|v| *v >= 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v.round() as u32)
}

/// Uppercase a position and drop a positional-rank suffix ("RB12" -> "RB").
/// Codes that merely contain digits ("2B", "1B/3B") are left alone.
pub fn clean_position(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let stem = upper.trim_end_matches(|c: char| c.is_ascii_digit());
    if !stem.is_empty()
        && stem.len() < upper.len()
        && stem.chars().all(|c| c.is_ascii_alphabetic())
    {
        stem.to_string()
    } else {
        upper
    }
}

// ---------------------------------------------------------------------------
// Public parsing
// ---------------------------------------------------------------------------

/// Parse rankings CSV from a reader. `origin` names the source in errors
/// and logs. Rows are returned in file order, which is rank order.
pub fn parse_rankings<R: Read>(rdr: R, origin: &str) -> Result<Vec<PlayerCandidate>, RankingsError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|source| RankingsError::Csv {
            origin: origin.to_string(),
            source,
        })?
        .clone();
    let canonical = canonical_headers(&headers);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !canonical.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RankingsError::MissingColumns { missing });
    }

    let mut players = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let mut record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping malformed rankings row {} in {}: {}", line, origin, e);
                continue;
            }
        };
        // Short rows: trailing columns are treated as blank.
        while record.len() < canonical.len() {
            record.push_field("");
        }
        match record.deserialize::<RawRankingRow>(Some(&canonical)) {
            Ok(raw) => {
                if let Some(player) = raw.into_candidate() {
                    players.push(player);
                }
            }
            Err(e) => {
                warn!("skipping malformed rankings row {} in {}: {}", line, origin, e);
            }
        }
    }

    debug!("parsed {} players from {}", players.len(), origin);
    Ok(players)
}

pub fn parse_rankings_str(text: &str, origin: &str) -> Result<Vec<PlayerCandidate>, RankingsError> {
    parse_rankings(text.as_bytes(), origin)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_columns() {
        let players = parse_rankings_str("player,pos\nJosh Allen,qb\n", "test").unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Josh Allen");
        assert_eq!(players[0].position, "QB");
        assert_eq!(players[0].team, "");
        assert_eq!(players[0].adp, None);
    }

    #[test]
    fn guesses_aliased_headers() {
        let csv_data = "\
RK, Player Name ,POS,Tm,Bye Week,AVG,FPTS,Tiers
1,Bijan Robinson,RB1,ATL,5,1.8,310.5,1
2,Ja'Marr Chase,WR1,CIN,10,2.4,305.0,1";
        let players = parse_rankings_str(csv_data, "test").unwrap();
        assert_eq!(players.len(), 2);
        let p = &players[0];
        assert_eq!(p.name, "Bijan Robinson");
        assert_eq!(p.position, "RB");
        assert_eq!(p.team, "ATL");
        assert_eq!(p.bye, Some(5));
        assert_eq!(p.ecr, Some(1.0));
        assert_eq!(p.adp, Some(1.8));
        assert_eq!(p.proj_pts, Some(310.5));
        assert_eq!(p.tier, Some(1));
    }

    #[test]
    fn first_matching_column_wins() {
        let csv_data = "name,player,pos\nFirst Column,Second Column,WR\n";
        let players = parse_rankings_str(csv_data, "test").unwrap();
        assert_eq!(players[0].name, "First Column");
    }

    #[test]
    fn missing_required_columns_is_an_error() {
        let err = parse_rankings_str("player,team\nSomeone,KC\n", "test").unwrap_err();
        match err {
            RankingsError::MissingColumns { missing } => assert_eq!(missing, vec!["pos"]),
            other => panic!("expected MissingColumns, got: {other}"),
        }
        let err = parse_rankings_str("", "test").unwrap_err();
        assert!(matches!(err, RankingsError::MissingColumns { .. }));
    }

    #[test]
    fn blank_players_dropped_and_bad_numbers_absent() {
        let csv_data = "\
player,pos,adp,tier,proj_pts
,RB,3,1,200
Real Player,TE,N/A,two,inf
   ,WR,1,1,1";
        let players = parse_rankings_str(csv_data, "test").unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Real Player");
        assert_eq!(players[0].adp, None);
        assert_eq!(players[0].tier, None);
        assert_eq!(players[0].proj_pts, None);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv_data = "player,pos,team,adp\nShort Row,QB\nFull Row,RB,SF,4\n";
        let players = parse_rankings_str(csv_data, "test").unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].team, "");
        assert_eq!(players[1].adp, Some(4.0));
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let players = parse_rankings_str("\u{feff}Player,Pos\nA,K\n", "test").unwrap();
        assert_eq!(players[0].name, "A");
    }

    #[test]
    fn clean_position_handles_rank_suffixes() {
        assert_eq!(clean_position(" rb12 "), "RB");
        assert_eq!(clean_position("WR"), "WR");
        assert_eq!(clean_position("2B"), "2B");
        assert_eq!(clean_position("2B/SS"), "2B/SS");
        assert_eq!(clean_position("DST3"), "DST");
        assert_eq!(clean_position("7"), "7");
    }

    #[test]
    fn canonical_header_lookup() {
        assert_eq!(canonical_header("Average Draft Position"), Some("adp"));
        assert_eq!(canonical_header(" POSITION "), Some("pos"));
        assert_eq!(canonical_header("ownership"), None);
    }
}
