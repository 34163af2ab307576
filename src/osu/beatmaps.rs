use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::osu::{
    ApprovalStatus, Client, Genre, Language, Mode, Mods, OsuResult, QueryOption, UsernameType,
};

const ENDPOINT: &str = "get_beatmaps";
const MAX_LIMIT: u32 = 500;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Beatmap {
    pub approved: ApprovalStatus,
    #[serde(default)]
    pub submit_date: Option<DateTime<Utc>>,
    // null for maps that were never ranked, qualified or loved
    #[serde(default)]
    pub approved_date: Option<DateTime<Utc>>,
    pub last_update: DateTime<Utc>,
    pub artist: String,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub beatmap_id: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub beatmapset_id: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub bpm: f64,
    pub creator: String,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub creator_id: u32,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub difficultyrating: f64,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub diff_size: f64,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub diff_overall: f64,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub diff_approach: f64,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub diff_drain: f64,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub hit_length: u32,
    pub source: String,
    pub genre_id: Genre,
    pub language_id: Language,
    pub title: String,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub total_length: u32,
    pub version: String,
    pub file_md5: String,
    pub mode: Mode,
    pub tags: String,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub favourite_count: u64,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub rating: Option<f64>,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub playcount: u64,
    #[serde(deserialize_with = "crate::osu::de::from_str")]
    pub passcount: u64,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count_normal: Option<u32>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count_slider: Option<u32>,
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub count_spinner: Option<u32>,
    // not available for taiko and mania
    #[serde(default, deserialize_with = "crate::osu::de::option_from_str")]
    pub max_combo: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BeatmapOption {
    /// Include converted maps, only has an effect if a mode other than osu!standard is set
    IncludeConverted,
    /// Clamped to 1..=500, the api defaults to 500
    Limit(u32),
    Mode(Mode),
    Hash(String),
    BeatmapId(u32),
    BeatmapsetId(u32),
    Creator(String, UsernameType),
    /// Only maps ranked or loved since this date
    Since(NaiveDate),
    /// Only affects the difficulty values that are returned
    Mods(Mods),
}

impl QueryOption for BeatmapOption {
    fn append_to(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        match self {
            BeatmapOption::IncludeConverted => query.append_pair("a", "1"),
            BeatmapOption::Limit(limit) => {
                query.append_pair("limit", &(*limit).max(1).min(MAX_LIMIT).to_string())
            }
            BeatmapOption::Mode(mode) => query.append_pair("m", &mode.code().to_string()),
            BeatmapOption::Hash(hash) => query.append_pair("h", hash),
            BeatmapOption::BeatmapId(id) => query.append_pair("b", &id.to_string()),
            BeatmapOption::BeatmapsetId(id) => query.append_pair("s", &id.to_string()),
            BeatmapOption::Creator(user, user_type) => query
                .append_pair("u", user)
                .append_pair("type", user_type.to_str()),
            BeatmapOption::Since(date) => {
                query.append_pair("since", &date.format("%Y-%m-%d").to_string())
            }
            BeatmapOption::Mods(mods) => query.append_pair("mods", &mods.bits().to_string()),
        };
    }
}

pub(crate) fn url(client: &Client, options: &[BeatmapOption]) -> OsuResult<Url> {
    let mut url = client.endpoint_url(ENDPOINT)?;
    options.iter().for_each(|option| option.append_to(&mut url));
    Ok(url)
}

impl Client {
    pub fn beatmaps(&self, options: &[BeatmapOption]) -> OsuResult<Vec<Beatmap>> {
        self.request(ENDPOINT, url(self, options)?)
    }
}
