//! Replay endpoint and decoder for the replay payload.
//!
//! The api hands out replays as base64 encoded lzma ("alone" format, not xz) streams. Once
//! decompressed the stream is a comma separated list of frames, each frame looking like
//! `w|x|y|z`:
//!
//! - `w`: milliseconds since the previous frame, negative for sentinel frames
//! - `x`, `y`: cursor position on the 512x384 playfield
//! - `z`: bitmask of the keys held down, see [`Keys`]

use std::io;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use url::Url;

use crate::osu::{Client, Mode, Mods, OsuResult, QueryOption, UsernameType};

const ENDPOINT: &str = "get_replay";

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Replay is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Could not decompress replay: {0}")]
    Decompress(#[from] lzma_rs::error::Error),
}

bitflags! {
    /// Keys and mouse buttons held during a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Keys: u32 {
        const M1 = 1;
        const M2 = 1 << 1;
        const K1 = 1 << 2;
        const K2 = 1 << 3;
        const SMOKE = 1 << 4;
    }
}

/// A single input sample of a replay
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ReplayEvent {
    /// Time since the previous event
    pub time_delta: Duration,
    pub x: f64,
    pub y: f64,
    /// Raw key bitmask, the meaning of the bits depends on the mode
    pub keys: u32,
}

impl ReplayEvent {
    /// Key state interpreted as osu!standard keys
    pub fn pressed(&self) -> Keys {
        Keys::from_bits_retain(self.keys)
    }
}

#[derive(Debug, PartialEq)]
enum Skipped {
    Malformed,
    Sentinel,
}

// Fields that don't parse fall back to 0, only the separator count makes a frame malformed
fn parse_frame(frame: &str) -> Result<ReplayEvent, Skipped> {
    if frame.matches('|').count() != 3 {
        return Err(Skipped::Malformed);
    }

    let fields: Vec<&str> = frame.split('|').map(str::trim).collect();
    let delta: i64 = fields[0].parse().unwrap_or(0);
    let x: f64 = fields[1].parse().unwrap_or(0.0);
    let y: f64 = fields[2].parse().unwrap_or(0.0);
    let keys: u32 = fields[3].parse().unwrap_or(0);

    if delta < 0 {
        return Err(Skipped::Sentinel);
    }

    Ok(ReplayEvent {
        time_delta: Duration::from_millis(delta as u64),
        x,
        y,
        keys,
    })
}

/// Parses already decompressed replay text, dropping malformed and sentinel frames
pub fn parse_frames(text: &str) -> Vec<ReplayEvent> {
    let mut events = Vec::new();
    let (mut malformed, mut sentinels) = (0usize, 0usize);

    for frame in text.split(',') {
        match parse_frame(frame) {
            Ok(event) => events.push(event),
            Err(Skipped::Malformed) => malformed += 1,
            Err(Skipped::Sentinel) => sentinels += 1,
        }
    }

    tracing::trace!(
        "Parsed {} replay frames, skipped {} malformed and {} sentinel frames",
        events.len(),
        malformed,
        sentinels
    );
    events
}

/// Decodes a replay payload as it appears in the api response.
///
/// Quotes and backslashes left over from the JSON envelope are stripped before decoding, so the
/// raw field including its quotes can be passed in directly. Line breaks and other whitespace
/// inside the base64 text are ignored.
pub fn decode_replay(raw: &[u8]) -> Result<Vec<ReplayEvent>, ReplayError> {
    let cleaned: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|b| *b != b'"' && *b != b'\\' && !b.is_ascii_whitespace())
        .collect();

    let compressed = STANDARD.decode(&cleaned)?;
    let mut decompressed = Vec::new();
    lzma_rs::lzma_decompress(&mut compressed.as_slice(), &mut decompressed)?;

    Ok(parse_frames(&String::from_utf8_lossy(&decompressed)))
}

/// Inverse of [`decode_replay`], producing the payload the api would send
pub fn encode_replay(events: &[ReplayEvent]) -> io::Result<String> {
    let text = events
        .iter()
        .map(|event| {
            format!(
                "{}|{}|{}|{}",
                event.time_delta.as_millis(),
                event.x,
                event.y,
                event.keys
            )
        })
        .collect::<Vec<_>>()
        .join(",");

    let mut compressed = Vec::new();
    lzma_rs::lzma_compress(&mut text.as_bytes(), &mut compressed)?;
    Ok(STANDARD.encode(compressed))
}

fn serialize_content<S>(content: &[ReplayEvent], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let encoded = encode_replay(content).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&encoded)
}

fn deserialize_content<'de, D>(deserializer: D) -> Result<Vec<ReplayEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let content = String::deserialize(deserializer)?;
    decode_replay(content.as_bytes()).map_err(serde::de::Error::custom)
}

/// Response of the replay endpoint
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Replay {
    #[serde(
        serialize_with = "serialize_content",
        deserialize_with = "deserialize_content"
    )]
    pub content: Vec<ReplayEvent>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl Replay {
    /// Total length of the replay
    pub fn duration(&self) -> Duration {
        self.content.iter().map(|event| event.time_delta).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplayOption {
    Mode(Mode),
    Mods(Mods),
    /// Picks a specific score instead of the user's best on the map
    ScoreId(u64),
}

impl QueryOption for ReplayOption {
    fn append_to(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        match self {
            ReplayOption::Mode(mode) => query.append_pair("m", &mode.code().to_string()),
            ReplayOption::Mods(mods) => query.append_pair("mods", &mods.bits().to_string()),
            ReplayOption::ScoreId(id) => query.append_pair("s", &id.to_string()),
        };
    }
}

pub(crate) fn url(
    client: &Client,
    beatmap_id: u32,
    user: &str,
    user_type: UsernameType,
    options: &[ReplayOption],
) -> OsuResult<Url> {
    let mut url = client.endpoint_url(ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("b", &beatmap_id.to_string())
        .append_pair("u", user)
        .append_pair("type", user_type.to_str());
    options.iter().for_each(|option| option.append_to(&mut url));
    Ok(url)
}

impl Client {
    /// Fetches and decodes the replay of a score. The api only allows a handful of these per minute
    pub fn replay(
        &self,
        beatmap_id: u32,
        user: &str,
        user_type: UsernameType,
        options: &[ReplayOption],
    ) -> OsuResult<Replay> {
        let url = url(self, beatmap_id, user, user_type, options)?;
        self.request(ENDPOINT, url)
    }
}
