use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::osu::{Client, Mode, Mods, OsuResult, QueryOption, UsernameType};

const ENDPOINT: &str = "get_user_recent";

/// A play from the last 24 hours, failed plays included
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RecentScore {
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub beatmap_id: u32,
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
    /// "F" for failed plays
    pub rank: String,
}

impl RecentScore {
    pub fn passed(&self) -> bool {
        self.rank != "F"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserRecentOption {
    Mode(Mode),
    /// Clamped to 1..=50, the api defaults to 10
    Limit(u32),
}

impl QueryOption for UserRecentOption {
    fn append_to(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        match self {
            UserRecentOption::Mode(mode) => query.append_pair("m", &mode.code().to_string()),
            UserRecentOption::Limit(limit) => {
                query.append_pair("limit", &(*limit).max(1).min(50).to_string())
            }
        };
    }
}

pub(crate) fn url(
    client: &Client,
    user: &str,
    user_type: UsernameType,
    options: &[UserRecentOption],
) -> OsuResult<Url> {
    let mut url = client.endpoint_url(ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("u", user)
        .append_pair("type", user_type.to_str());
    options.iter().for_each(|option| option.append_to(&mut url));
    Ok(url)
}

impl Client {
    pub fn user_recent(
        &self,
        user: &str,
        user_type: UsernameType,
        options: &[UserRecentOption],
    ) -> OsuResult<Vec<RecentScore>> {
        self.request(ENDPOINT, url(self, user, user_type, options)?)
    }
}
