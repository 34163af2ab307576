use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::osu::{Client, Mode, Mods, OsuResult, QueryOption, UsernameType};

const ENDPOINT: &str = "get_scores";

/// A score on a beatmap leaderboard
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Score {
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub score_id: u64,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub score: u64,
    pub username: String,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub count300: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub count100: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub count50: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub countmiss: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub maxcombo: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub countkatu: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub countgeki: u32,
    #[serde(deserialize_with = "crate::osu::de::bool_from_str")]
    pub perfect: bool,
    pub enabled_mods: Mods,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub user_id: u32,
    pub date: DateTime<Utc>,
    pub rank: String,
    // null on loved and qualified maps
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub pp: Option<f64>,
    #[serde(deserialize_with = "crate::osu::de::bool_from_str")]
    pub replay_available: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoresOption {
    Mode(Mode),
    User(String, UsernameType),
    Mods(Mods),
    /// Clamped to 1..=100, the api defaults to 50
    Limit(u32),
}

impl QueryOption for ScoresOption {
    fn append_to(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        match self {
            ScoresOption::Mode(mode) => query.append_pair("m", &mode.code().to_string()),
            ScoresOption::User(user, user_type) => query
                .append_pair("u", user)
                .append_pair("type", user_type.to_str()),
            ScoresOption::Mods(mods) => query.append_pair("mods", &mods.bits().to_string()),
            ScoresOption::Limit(limit) => {
                query.append_pair("limit", &(*limit).max(1).min(100).to_string())
            }
        };
    }
}

pub(crate) fn url(client: &Client, beatmap_id: u32, options: &[ScoresOption]) -> OsuResult<Url> {
    let mut url = client.endpoint_url(ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("b", &beatmap_id.to_string());
    options.iter().for_each(|option| option.append_to(&mut url));
    Ok(url)
}

impl Client {
    /// Leaderboard of a beatmap, best score first
    pub fn scores(&self, beatmap_id: u32, options: &[ScoresOption]) -> OsuResult<Vec<Score>> {
        self.request(ENDPOINT, url(self, beatmap_id, options)?)
    }
}
