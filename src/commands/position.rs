//! Position and velocity value encoding.
//!
//! Several commands share a 16-bit position encoding: the absolute
//! range maps to a percentage, a window above it carries relative
//! offsets, and a handful of reserved codes act as sentinels
//! (`target`, `current`, `default`, `ignore`, `unknown`).

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Raw code for the `target` sentinel.
pub const RAW_TARGET: u16 = 0xD100;
/// Raw code for the `current` sentinel.
pub const RAW_CURRENT: u16 = 0xD200;
/// Raw code for the `default` sentinel.
pub const RAW_DEFAULT: u16 = 0xD300;
/// Raw code for the `ignore` sentinel.
pub const RAW_IGNORE: u16 = 0xD400;
/// Raw code for an unknown position.
pub const RAW_UNKNOWN: u16 = 0xF7FF;

/// Upper bound of the absolute percent range (100% = 0xC800).
const RAW_PERCENT_MAX: u16 = 0xC800;
/// Centre of the relative range (offset 0).
const RAW_RELATIVE_ZERO: u16 = 0xCC00;
/// Upper bound of the relative range (+100%).
const RAW_RELATIVE_MAX: u16 = 0xD000;

/// Division rounding half away from zero, for symmetric percent scaling.
fn round_div(n: i32, d: i32) -> i32 {
    if n >= 0 {
        (n + d / 2) / d
    } else {
        (n - d / 2) / d
    }
}

/// A decoded actuator position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Absolute position in percent (0 = open, 100 = closed).
    Percent(u8),
    /// Relative offset from the current position, in percent.
    Relative(i8),
    /// Use the target position stored in the actuator.
    Target,
    /// Keep the current position.
    Current,
    /// Use the actuator's default position.
    Default,
    /// Do not change this parameter.
    Ignore,
    /// The actuator does not report a position.
    Unknown,
}

impl Position {
    /// Decode a raw 16-bit position value.
    pub fn from_raw(value: u16) -> Self {
        match value {
            v if v <= RAW_PERCENT_MAX => {
                Position::Percent(((u32::from(v) + 0x100) / 0x200) as u8)
            }
            v if v <= RAW_RELATIVE_MAX => {
                let offset =
                    round_div((i32::from(v) - i32::from(RAW_RELATIVE_ZERO)) * 100, 0x400);
                Position::Relative(offset as i8)
            }
            RAW_TARGET => Position::Target,
            RAW_CURRENT => Position::Current,
            RAW_DEFAULT => Position::Default,
            RAW_IGNORE => Position::Ignore,
            _ => Position::Unknown,
        }
    }

    /// Encode into the raw 16-bit wire value.
    pub fn to_raw(self) -> u16 {
        match self {
            Position::Percent(p) => u16::from(p.min(100)) * 0x200,
            Position::Relative(r) => {
                let clamped = i32::from(r).clamp(-100, 100);
                (i32::from(RAW_RELATIVE_ZERO) + round_div(clamped * 0x400, 100)) as u16
            }
            Position::Target => RAW_TARGET,
            Position::Current => RAW_CURRENT,
            Position::Default => RAW_DEFAULT,
            Position::Ignore => RAW_IGNORE,
            Position::Unknown => RAW_UNKNOWN,
        }
    }

    /// Decode from two big-endian payload bytes.
    pub fn from_bytes(hi: u8, lo: u8) -> Self {
        Self::from_raw(u16::from_be_bytes([hi, lo]))
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Position::Percent(p) => serializer.serialize_u8(*p),
            Position::Relative(r) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("relative", r)?;
                map.end()
            }
            Position::Target => serializer.serialize_str("target"),
            Position::Current => serializer.serialize_str("current"),
            Position::Default => serializer.serialize_str("default"),
            Position::Ignore => serializer.serialize_str("ignore"),
            Position::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

/// Accepted JSON shapes: a percent number, a sentinel name, or
/// `{"relative": offset}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PositionRepr {
    Percent(u8),
    Relative { relative: i8 },
    Named(String),
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match PositionRepr::deserialize(deserializer)? {
            PositionRepr::Percent(p) if p <= 100 => Ok(Position::Percent(p)),
            PositionRepr::Percent(p) => Err(de::Error::custom(format!(
                "position percent out of range: {p}"
            ))),
            PositionRepr::Relative { relative } if (-100..=100).contains(&relative) => {
                Ok(Position::Relative(relative))
            }
            PositionRepr::Relative { relative } => Err(de::Error::custom(format!(
                "relative position out of range: {relative}"
            ))),
            PositionRepr::Named(name) => match name.as_str() {
                "target" => Ok(Position::Target),
                "current" => Ok(Position::Current),
                "default" => Ok(Position::Default),
                "ignore" => Ok(Position::Ignore),
                "unknown" => Ok(Position::Unknown),
                other => Err(de::Error::custom(format!("unknown position: {other:?}"))),
            },
        }
    }
}

/// Actuator velocity setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Velocity {
    /// Use the velocity configured in the actuator.
    Default,
    /// Silent operation.
    Slow,
    /// Fast operation.
    Fast,
    /// The actuator has no velocity support.
    NotSupported,
    /// A value outside the specified set.
    Other(u8),
}

impl Velocity {
    /// Decode a raw velocity byte.
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Velocity::Default,
            1 => Velocity::Slow,
            2 => Velocity::Fast,
            255 => Velocity::NotSupported,
            other => Velocity::Other(other),
        }
    }

    /// Encode into the raw wire byte.
    pub fn to_raw(self) -> u8 {
        match self {
            Velocity::Default => 0,
            Velocity::Slow => 1,
            Velocity::Fast => 2,
            Velocity::NotSupported => 255,
            Velocity::Other(v) => v,
        }
    }

    /// Default used when a request omits the velocity parameter.
    pub fn default_wire() -> Self {
        Velocity::Default
    }

    /// Parse a velocity from a request parameter name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "default" => Ok(Velocity::Default),
            "slow" => Ok(Velocity::Slow),
            "fast" => Ok(Velocity::Fast),
            other => Err(Error::InvalidParams(format!("unknown velocity: {other:?}"))),
        }
    }
}

impl Serialize for Velocity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Velocity::Default => serializer.serialize_str("default"),
            Velocity::Slow => serializer.serialize_str("slow"),
            Velocity::Fast => serializer.serialize_str("fast"),
            Velocity::NotSupported => serializer.serialize_str("notSupported"),
            Velocity::Other(v) => serializer.serialize_u8(*v),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VelocityRepr {
    Raw(u8),
    Named(String),
}

impl<'de> Deserialize<'de> for Velocity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match VelocityRepr::deserialize(deserializer)? {
            VelocityRepr::Raw(v) => Ok(Velocity::from_raw(v)),
            VelocityRepr::Named(name) => Velocity::from_name(&name).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decoding() {
        assert_eq!(Position::from_raw(0x0000), Position::Percent(0));
        assert_eq!(Position::from_raw(0x0200), Position::Percent(1));
        assert_eq!(Position::from_raw(0x6400), Position::Percent(50));
        assert_eq!(Position::from_raw(0xC800), Position::Percent(100));
    }

    #[test]
    fn test_percent_rounding() {
        // 0x02FF is closer to 1% (0x0200) than to 2% (0x0400).
        assert_eq!(Position::from_raw(0x02FF), Position::Percent(1));
        assert_eq!(Position::from_raw(0x0300), Position::Percent(2));
    }

    #[test]
    fn test_percent_encoding() {
        assert_eq!(Position::Percent(0).to_raw(), 0x0000);
        assert_eq!(Position::Percent(50).to_raw(), 0x6400);
        assert_eq!(Position::Percent(100).to_raw(), 0xC800);
        // Out-of-range input is clamped.
        assert_eq!(Position::Percent(150).to_raw(), 0xC800);
    }

    #[test]
    fn test_relative_range() {
        assert_eq!(Position::from_raw(0xCC00), Position::Relative(0));
        assert_eq!(Position::from_raw(0xC900), Position::Relative(-75));
        assert_eq!(Position::from_raw(0xD000), Position::Relative(100));
    }

    #[test]
    fn test_relative_roundtrip() {
        for offset in [-75i8, -50, -1, 0, 1, 25, 100] {
            let raw = Position::Relative(offset).to_raw();
            assert_eq!(Position::from_raw(raw), Position::Relative(offset));
        }
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(Position::from_raw(RAW_TARGET), Position::Target);
        assert_eq!(Position::from_raw(RAW_CURRENT), Position::Current);
        assert_eq!(Position::from_raw(RAW_DEFAULT), Position::Default);
        assert_eq!(Position::from_raw(RAW_IGNORE), Position::Ignore);
        assert_eq!(Position::from_raw(RAW_UNKNOWN), Position::Unknown);

        assert_eq!(Position::Target.to_raw(), RAW_TARGET);
        assert_eq!(Position::Ignore.to_raw(), RAW_IGNORE);
    }

    #[test]
    fn test_unmapped_values_are_unknown() {
        assert_eq!(Position::from_raw(0xD105), Position::Unknown);
        assert_eq!(Position::from_raw(0xE000), Position::Unknown);
    }

    #[test]
    fn test_position_percent_roundtrip() {
        for percent in 0..=100u8 {
            let raw = Position::Percent(percent).to_raw();
            assert_eq!(Position::from_raw(raw), Position::Percent(percent));
        }
    }

    #[test]
    fn test_position_deserialize() {
        let p: Position = serde_json::from_str("42").unwrap();
        assert_eq!(p, Position::Percent(42));

        let p: Position = serde_json::from_str("\"target\"").unwrap();
        assert_eq!(p, Position::Target);

        let p: Position = serde_json::from_str("{\"relative\": -20}").unwrap();
        assert_eq!(p, Position::Relative(-20));

        assert!(serde_json::from_str::<Position>("101").is_err());
        assert!(serde_json::from_str::<Position>("\"sideways\"").is_err());
    }

    #[test]
    fn test_position_serialize() {
        assert_eq!(serde_json::to_string(&Position::Percent(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&Position::Target).unwrap(),
            "\"target\""
        );
        assert_eq!(
            serde_json::to_string(&Position::Relative(-20)).unwrap(),
            "{\"relative\":-20}"
        );
    }

    #[test]
    fn test_velocity_mapping() {
        assert_eq!(Velocity::from_raw(0), Velocity::Default);
        assert_eq!(Velocity::from_raw(1), Velocity::Slow);
        assert_eq!(Velocity::from_raw(2), Velocity::Fast);
        assert_eq!(Velocity::from_raw(255), Velocity::NotSupported);
        assert_eq!(Velocity::from_raw(7), Velocity::Other(7));

        assert_eq!(Velocity::Slow.to_raw(), 1);
        assert_eq!(Velocity::Other(7).to_raw(), 7);
    }

    #[test]
    fn test_velocity_deserialize() {
        let v: Velocity = serde_json::from_str("\"fast\"").unwrap();
        assert_eq!(v, Velocity::Fast);
        let v: Velocity = serde_json::from_str("1").unwrap();
        assert_eq!(v, Velocity::Slow);
    }
}
