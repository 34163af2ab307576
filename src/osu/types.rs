use std::fmt::Formatter;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} code: {value}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub value: String,
}

/// Enums the api sends as (stringified) integer codes
macro_rules! numeric_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn code(self) -> i64 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn from_code(code: i64) -> Option<$name> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, UnknownCode> {
                s.trim()
                    .parse::<i64>()
                    .ok()
                    .and_then($name::from_code)
                    .ok_or_else(|| UnknownCode {
                        kind: stringify!($name),
                        value: s.to_owned(),
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($name::$variant => f.write_str(stringify!($variant))),+
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                crate::osu::de::from_str(deserializer)
            }
        }
    };
}

numeric_enum!(
    /// Game mode, `m` in queries
    Mode {
        Osu = 0,
        Taiko = 1,
        Ctb = 2,
        Mania = 3,
    }
);

numeric_enum!(
    /// Ranked state of a beatmap (`approved`)
    ApprovalStatus {
        Loved = 4,
        Qualified = 3,
        Approved = 2,
        Ranked = 1,
        Pending = 0,
        Wip = -1,
        Graveyard = -2,
    }
);

numeric_enum!(
    Language {
        Any = 0,
        Unspecified = 1,
        English = 2,
        Japanese = 3,
        Chinese = 4,
        Instrumental = 5,
        Korean = 6,
        French = 7,
        German = 8,
        Swedish = 9,
        Spanish = 10,
        Italian = 11,
        Russian = 12,
        Polish = 13,
        Other = 14,
    }
);

numeric_enum!(
    Genre {
        Any = 0,
        Unspecified = 1,
        VideoGame = 2,
        Anime = 3,
        Rock = 4,
        Pop = 5,
        Other = 6,
        Novelty = 7,
        HipHop = 9,
        Electronic = 10,
        Metal = 11,
        Classical = 12,
        Folk = 13,
        Jazz = 14,
    }
);

numeric_enum!(
    /// Win condition of a multiplayer game
    ScoringType {
        Score = 0,
        Accuracy = 1,
        Combo = 2,
        ScoreV2 = 3,
    }
);

numeric_enum!(
    TeamType {
        HeadToHead = 0,
        TagCoop = 1,
        TeamVs = 2,
        TagTeamVs = 3,
    }
);

/// Whether a `u` parameter is a user id or a username
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameType {
    Id,
    Name,
}

impl UsernameType {
    pub fn to_str(&self) -> &'static str {
        match self {
            UsernameType::Id => "id",
            UsernameType::Name => "string",
        }
    }
}
