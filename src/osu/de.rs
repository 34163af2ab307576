//! Deserializers for the way the v1 api encodes values.
//!
//! Nearly every number comes back as a JSON string ("123", "9.5"), booleans are "0"/"1" and
//! missing values are `null`.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value;

fn parse_value<T, E>(value: Value) -> Result<Option<T>, E>
where
    T: FromStr,
    T::Err: Display,
    E: de::Error,
{
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse().map(Some).map_err(E::custom),
        Value::Number(n) => n.to_string().parse().map(Some).map_err(E::custom),
        other => Err(E::custom(format!("expected a number, got {}", other))),
    }
}

pub(crate) fn from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    parse_value::<T, D::Error>(Value::deserialize(deserializer)?)?
        .ok_or_else(|| de::Error::custom("expected a value, got nothing"))
}

pub(crate) fn option_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    parse_value(Value::deserialize(deserializer)?)
}

pub(crate) fn bool_from_str<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_i64().unwrap_or(0) != 0),
        Value::String(s) => match s.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(de::Error::custom(format!("expected a boolean, got {}", other))),
        },
        Value::Null => Ok(false),
        other => Err(de::Error::custom(format!("expected a boolean, got {}", other))),
    }
}
