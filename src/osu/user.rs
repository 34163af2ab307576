use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::osu::{Client, Mode, OsuResult, QueryOption, UsernameType};

const ENDPOINT: &str = "get_user";

/// Recent notable activity of a user (ranks, firsts, ...)
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UserEvent {
    pub display_html: String,
    // null for events that aren't about a beatmap
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub beatmap_id: Option<u32>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub beatmapset_id: Option<u32>,
    pub date: DateTime<Utc>,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub epicfactor: u8,
}

// Stats are null for accounts that never played the requested mode
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct User {
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub user_id: u32,
    pub username: String,
    pub join_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count300: Option<u64>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count100: Option<u64>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count50: Option<u64>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub playcount: Option<u64>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub ranked_score: Option<u64>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub total_score: Option<u64>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub pp_rank: Option<u32>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub level: Option<f64>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub pp_raw: Option<f64>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub accuracy: Option<f64>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count_rank_ss: Option<u32>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count_rank_ssh: Option<u32>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count_rank_s: Option<u32>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count_rank_sh: Option<u32>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count_rank_a: Option<u32>,
    pub country: String,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub total_seconds_played: Option<u64>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub pp_country_rank: Option<u32>,
    #[serde(default)]
    pub events: Vec<UserEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserOption {
    Mode(Mode),
    /// How many days of events to include, clamped to 1..=31
    EventDays(u32),
}

impl QueryOption for UserOption {
    fn append_to(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        match self {
            UserOption::Mode(mode) => query.append_pair("m", &mode.code().to_string()),
            UserOption::EventDays(days) => {
                query.append_pair("event_days", &(*days).max(1).min(31).to_string())
            }
        };
    }
}

pub(crate) fn url(
    client: &Client,
    user: &str,
    user_type: UsernameType,
    options: &[UserOption],
) -> OsuResult<Url> {
    let mut url = client.endpoint_url(ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("u", user)
        .append_pair("type", user_type.to_str());
    options.iter().for_each(|option| option.append_to(&mut url));
    Ok(url)
}

impl Client {
    /// Looks up a single user, `None` if nobody matches
    pub fn user(
        &self,
        user: &str,
        user_type: UsernameType,
        options: &[UserOption],
    ) -> OsuResult<Option<User>> {
        let users: Vec<User> = self.request(ENDPOINT, url(self, user, user_type, options)?)?;
        Ok(users.into_iter().next())
    }
}
