use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::osu::{Client, Mode, Mods, OsuResult, QueryOption, UsernameType};

const ENDPOINT: &str = "get_user_best";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BestScore {
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub beatmap_id: u32,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub score_id: Option<u64>,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub score: u64,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub maxcombo: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub count300: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub count100: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub count50: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub countmiss: u32,
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
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub pp: f64,
    #[serde(default, deserialize_with = "crate::osu::de::bool_from_str")]
    pub replay_available: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserBestOption {
    Mode(Mode),
    /// Clamped to 1..=100, the api defaults to 10
    Limit(u32),
}

impl QueryOption for UserBestOption {
    fn append_to(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        match self {
            UserBestOption::Mode(mode) => query.append_pair("m", &mode.code().to_string()),
            UserBestOption::Limit(limit) => {
                query.append_pair("limit", &(*limit).max(1).min(100).to_string())
            }
        };
    }
}

pub(crate) fn url(
    client: &Client,
    user: &str,
    user_type: UsernameType,
    options: &[UserBestOption],
) -> OsuResult<Url> {
    let mut url = client.endpoint_url(ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("u", user)
        .append_pair("type", user_type.to_str());
    options.iter().for_each(|option| option.append_to(&mut url));
    Ok(url)
}

impl Client {
    /// Top plays of a user, highest pp first
    pub fn user_best(
        &self,
        user: &str,
        user_type: UsernameType,
        options: &[UserBestOption],
    ) -> OsuResult<Vec<BestScore>> {
        self.request(ENDPOINT, url(self, user, user_type, options)?)
    }
}
