use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::osu::{Client, Mode, Mods, OsuResult, ScoringType, TeamType};

const ENDPOINT: &str = "get_match";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MatchInfo {
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub match_id: u64,
    pub name: String,
    pub start_time: DateTime<Utc>,
    // null while the lobby is still open
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MatchScore {
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub slot: u8,
    /// 0 without teams, 1 blue, 2 red
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub team: u8,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub user_id: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub score: u64,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub maxcombo: u32,
    pub rank: String,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub count50: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub count100: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub count300: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub countmiss: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub countgeki: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub countkatu: u32,
    #[serde(deserialize_with = "crate::osu::de::bool_from_str")]
    pub perfect: bool,
    #[serde(deserialize_with = "crate::osu::de::bool_from_str")]
    pub pass: bool,
    /// Only set when free mod was enabled
    #[serde(default)]
    pub enabled_mods: Option<Mods>,
}

/// A single map played in a lobby
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MatchGame {
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub game_id: u64,
    pub start_time: DateTime<Utc>,
    // null for aborted games
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub beatmap_id: u32,
    pub play_mode: Mode,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub match_type: u32,
    pub scoring_type: ScoringType,
    pub team_type: TeamType,
    pub mods: Mods,
    pub scores: Vec<MatchScore>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Match {
    #[serde(rename = "match")]
    pub info: MatchInfo,
    pub games: Vec<MatchGame>,
}

// unknown match ids come back as {"match": 0, "games": []}
#[allow(dead_code)]
#[derive(Deserialize)]
#[serde(untagged)]
enum MatchField {
    Found(MatchInfo),
    Missing(i64),
}

#[derive(Deserialize)]
pub(crate) struct MatchResponse {
    #[serde(rename = "match")]
    info: MatchField,
    #[serde(default)]
    games: Vec<MatchGame>,
}

impl MatchResponse {
    pub(crate) fn into_match(self) -> Option<Match> {
        match self.info {
            MatchField::Found(info) => Some(Match {
                info,
                games: self.games,
            }),
            MatchField::Missing(_) => None,
        }
    }
}

impl Client {
    /// Multiplayer lobby with every game played in it, `None` for unknown ids
    pub fn multiplayer_match(&self, match_id: u64) -> OsuResult<Option<Match>> {
        let mut url = self.endpoint_url(ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("mp", &match_id.to_string());

        let response: MatchResponse = self.request(ENDPOINT, url)?;
        Ok(response.into_match())
    }
}
