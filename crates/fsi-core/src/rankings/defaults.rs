// Built-in last-resort rankings so the dashboard works with no data source.

use crate::model::Sport;

const NFL: &str = "\
player,pos,team
Christian McCaffrey,RB,SF
CeeDee Lamb,WR,DAL
Tyreek Hill,WR,MIA
Bijan Robinson,RB,ATL
Justin Jefferson,WR,MIN
Ja'Marr Chase,WR,CIN
Breece Hall,RB,NYJ
Amon-Ra St. Brown,WR,DET
Travis Kelce,TE,KC
A.J. Brown,WR,PHI
";

const NBA: &str = "\
player,pos,team
Nikola Jokic,C,DEN
Luka Doncic,G,DAL
Shai Gilgeous-Alexander,G,OKC
Giannis Antetokounmpo,F,MIL
Jayson Tatum,F,BOS
";

const MLB: &str = "\
player,pos,team
Ronald Acuña Jr.,OF,ATL
Shohei Ohtani,UT,LAD
Mookie Betts,2B/SS,LAD
Julio Rodríguez,OF,SEA
Yordan Álvarez,OF,HOU
";

const NHL: &str = "\
player,pos,team
Connor McDavid,C,EDM
Nathan MacKinnon,C,COL
Auston Matthews,C,TOR
Leon Draisaitl,C,EDM
Mikko Rantanen,RW,COL
";

/// CSV text of the built-in rankings for `sport`.
pub fn builtin_csv(sport: Sport) -> &'static str {
    match sport {
        Sport::Nfl => NFL,
        Sport::Nba => NBA,
        Sport::Mlb => MLB,
        Sport::Nhl => NHL,
    }
}
