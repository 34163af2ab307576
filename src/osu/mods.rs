use std::fmt::Formatter;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Modifiers applied to a play, as the `mods`/`enabled_mods` bitmask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mods: u32 {
        const NO_FAIL = 1;
        const EASY = 1 << 1;
        const TOUCH_DEVICE = 1 << 2;
        const HIDDEN = 1 << 3;
        const HARD_ROCK = 1 << 4;
        const SUDDEN_DEATH = 1 << 5;
        const DOUBLE_TIME = 1 << 6;
        const RELAX = 1 << 7;
        const HALF_TIME = 1 << 8;
        // always sent together with DOUBLE_TIME
        const NIGHTCORE = 1 << 9;
        const FLASHLIGHT = 1 << 10;
        const AUTOPLAY = 1 << 11;
        const SPUN_OUT = 1 << 12;
        // autopilot
        const RELAX2 = 1 << 13;
        // always sent together with SUDDEN_DEATH
        const PERFECT = 1 << 14;
        const KEY4 = 1 << 15;
        const KEY5 = 1 << 16;
        const KEY6 = 1 << 17;
        const KEY7 = 1 << 18;
        const KEY8 = 1 << 19;
        const FADE_IN = 1 << 20;
        const RANDOM = 1 << 21;
        const CINEMA = 1 << 22;
        const TARGET = 1 << 23;
        const KEY9 = 1 << 24;
        const KEY_COOP = 1 << 25;
        const KEY1 = 1 << 26;
        const KEY3 = 1 << 27;
        const KEY2 = 1 << 28;
        const SCORE_V2 = 1 << 29;
        const MIRROR = 1 << 30;

        const KEY_MOD = Self::KEY1.bits()
            | Self::KEY2.bits()
            | Self::KEY3.bits()
            | Self::KEY4.bits()
            | Self::KEY5.bits()
            | Self::KEY6.bits()
            | Self::KEY7.bits()
            | Self::KEY8.bits()
            | Self::KEY9.bits()
            | Self::KEY_COOP.bits();
        const FREE_MOD_ALLOWED = Self::NO_FAIL.bits()
            | Self::EASY.bits()
            | Self::HIDDEN.bits()
            | Self::HARD_ROCK.bits()
            | Self::SUDDEN_DEATH.bits()
            | Self::FLASHLIGHT.bits()
            | Self::FADE_IN.bits()
            | Self::RELAX.bits()
            | Self::RELAX2.bits()
            | Self::SPUN_OUT.bits()
            | Self::KEY_MOD.bits();
        const SCORE_INCREASE_MODS = Self::HIDDEN.bits()
            | Self::HARD_ROCK.bits()
            | Self::DOUBLE_TIME.bits()
            | Self::FLASHLIGHT.bits()
            | Self::FADE_IN.bits();
    }
}

static NAMES: [(Mods, &str); 31] = [
    (Mods::NO_FAIL, "NoFail"),
    (Mods::EASY, "Easy"),
    (Mods::TOUCH_DEVICE, "TouchDevice"),
    (Mods::HIDDEN, "Hidden"),
    (Mods::HARD_ROCK, "HardRock"),
    (Mods::SUDDEN_DEATH, "SuddenDeath"),
    (Mods::DOUBLE_TIME, "DoubleTime"),
    (Mods::RELAX, "Relax"),
    (Mods::HALF_TIME, "HalfTime"),
    (Mods::NIGHTCORE, "Nightcore"),
    (Mods::FLASHLIGHT, "Flashlight"),
    (Mods::AUTOPLAY, "Autoplay"),
    (Mods::SPUN_OUT, "SpunOut"),
    (Mods::RELAX2, "Relax2"),
    (Mods::PERFECT, "Perfect"),
    (Mods::KEY4, "Key4"),
    (Mods::KEY5, "Key5"),
    (Mods::KEY6, "Key6"),
    (Mods::KEY7, "Key7"),
    (Mods::KEY8, "Key8"),
    (Mods::FADE_IN, "FadeIn"),
    (Mods::RANDOM, "Random"),
    (Mods::CINEMA, "Cinema"),
    (Mods::TARGET, "Target"),
    (Mods::KEY9, "Key9"),
    (Mods::KEY_COOP, "KeyCoop"),
    (Mods::KEY1, "Key1"),
    (Mods::KEY3, "Key3"),
    (Mods::KEY2, "Key2"),
    (Mods::SCORE_V2, "ScoreV2"),
    (Mods::MIRROR, "Mirror"),
];

impl Mods {
    /// Splits the set into its individual mods, lowest bit first
    pub fn list(&self) -> Vec<Mods> {
        (0..u32::BITS)
            .map(|bit| 1u32 << bit)
            .filter(|bit| self.bits() & bit != 0)
            .map(Mods::from_bits_retain)
            .collect()
    }

    /// Name of a single mod, `None` for combinations and unknown bits
    pub fn name(&self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(m, _)| m == self)
            .map(|(_, name)| *name)
    }
}

impl std::fmt::Display for Mods {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self
            .list()
            .iter()
            .map(|m| m.name().unwrap_or("Unknown"))
            .collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl Serialize for Mods {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Mods {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits: u32 = crate::osu::de::from_str(deserializer)?;
        Ok(Mods::from_bits_retain(bits))
    }
}
