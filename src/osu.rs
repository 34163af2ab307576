/*
    Thin blocking client for the osu! v1 API. Every endpoint lives in its own submodule and only
    builds a url, the actual request and response handling happens here.
*/

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::Client as HttpClient;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::settings::{Settings, SettingsError};

pub mod beatmaps;
mod de;
pub mod matches;
pub mod mods;
pub mod replay;
pub mod scores;
pub mod types;
pub mod user;
pub mod user_best;
pub mod user_recent;

pub use mods::Mods;
pub use replay::{decode_replay, encode_replay, ReplayError, ReplayEvent};
pub use types::{ApprovalStatus, Genre, Language, Mode, ScoringType, TeamType, UsernameType};

pub const API_URL: &str = "https://osu.ppy.sh/api/";

lazy_static! {
    // the api reports dates as "2013-07-02 01:01:12" (UTC), which isn't rfc3339
    static ref DATE_REGEX: Regex = Regex::new(
        r#"(date|time)"\s*:\s*"([0-9]{4}-[0-9]{2}-[0-9]{2}) ([0-9]{2}:[0-9]{2}:[0-9]{2})""#
    )
    .unwrap();
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Error, Debug)]
pub enum OsuApiError {
    #[error("Could not reach the osu! api: {0}")]
    Request(#[from] reqwest::Error),
    #[error("The osu! api responded with status {0}")]
    Status(u16),
    #[error("The osu! api returned an error: {0}")]
    Api(String),
    #[error("Could not parse the osu! api response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid api url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

pub type OsuResult<T> = Result<T, OsuApiError>;

/// Something that can add itself to the query string of a request
pub trait QueryOption {
    fn append_to(&self, url: &mut Url);
}

/// Blocking osu! api client, authenticated with a static api key
#[derive(Debug, Clone)]
pub struct Client {
    key: String,
    base_url: Url,
    http: HttpClient,
}

impl Client {
    pub fn new(key: &str) -> Client {
        Client {
            key: key.to_owned(),
            base_url: Url::parse(API_URL).expect("API_URL is a valid url"),
            http: HttpClient::new(),
        }
    }

    /// Points the client at a different api root, mostly useful for mirrors
    pub fn with_base_url(key: &str, base_url: &str) -> OsuResult<Client> {
        let mut client = Client::new(key);
        client.base_url = normalize_base_url(base_url)?;
        Ok(client)
    }

    pub fn from_settings(settings: &Settings) -> OsuResult<Client> {
        let key = settings.api_key()?;
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Client {
            key,
            base_url: normalize_base_url(&settings.base_url)?,
            http,
        })
    }

    /// Base url of an endpoint with the api key already attached
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> OsuResult<Url> {
        let mut url = self.base_url.join(endpoint)?;
        url.query_pairs_mut().append_pair("k", &self.key);
        Ok(url)
    }

    pub(crate) fn request<T: DeserializeOwned>(&self, endpoint: &str, url: Url) -> OsuResult<T> {
        tracing::info!("Requesting from endpoint {}", endpoint);

        let response = self.http.get(url).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("{} responded with {}", endpoint, status);
            return Err(OsuApiError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_body(&body)
    }
}

fn normalize_base_url(base_url: &str) -> OsuResult<Url> {
    // Url::join drops the last path segment unless it ends with a slash
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{}/", base_url))?)
    }
}

/// Turns a raw response body into `T`, surfacing `{"error": "..."}` bodies as errors
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> OsuResult<T> {
    if let Some(message) = api_error(body) {
        tracing::warn!("osu! api error: {}", message);
        return Err(OsuApiError::Api(message));
    }

    let patched = patch_dates(body);
    Ok(serde_json::from_str(&patched)?)
}

/// Message of a top level `{"error": "..."}` object, wherever the key sits
pub(crate) fn api_error(body: &str) -> Option<String> {
    if !body.trim_start().starts_with('{') {
        return None;
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.error)
}

/// Rewrites `"..._date": "YYYY-MM-DD HH:MM:SS"` into rfc3339 so chrono can take over
pub(crate) fn patch_dates(body: &str) -> String {
    DATE_REGEX
        .replace_all(body, r#"${1}": "${2}T${3}+00:00""#)
        .into_owned()
}
