//! Base-2 byte quantities.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A byte count whose textual form uses base-2 units (`KiB`, `MiB`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Base2Bytes(pub u64);

impl Base2Bytes {
    pub const B: Base2Bytes = Base2Bytes(1);
    pub const KIB: Base2Bytes = Base2Bytes(1 << 10);
    pub const MIB: Base2Bytes = Base2Bytes(1 << 20);
    pub const GIB: Base2Bytes = Base2Bytes(1 << 30);
    pub const TIB: Base2Bytes = Base2Bytes(1 << 40);

    /// `n` kibibytes.
    pub const fn kib(n: u64) -> Self {
        Base2Bytes(n << 10)
    }

    /// `n` mebibytes.
    pub const fn mib(n: u64) -> Self {
        Base2Bytes(n << 20)
    }

    /// `n` gibibytes.
    pub const fn gib(n: u64) -> Self {
        Base2Bytes(n << 30)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for Base2Bytes {
    fn from(bytes: u64) -> Self {
        Base2Bytes(bytes)
    }
}

/// Largest first, so `Display` picks the widest unit that divides evenly.
const UNITS: [(&str, u64); 4] = [
    ("TiB", 1 << 40),
    ("GiB", 1 << 30),
    ("MiB", 1 << 20),
    ("KiB", 1 << 10),
];

impl fmt::Display for Base2Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 != 0 {
            for (suffix, size) in UNITS {
                if self.0 % size == 0 {
                    return write!(f, "{}{}", self.0 / size, suffix);
                }
            }
        }
        write!(f, "{}B", self.0)
    }
}

/// Byte-size parse errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ByteSizeError {
    /// No digits before the unit suffix
    #[error("missing numeric value in byte size '{0}'")]
    MissingNumber(String),

    /// Unit suffix not recognized
    #[error("unknown unit '{unit}' in byte size '{input}'")]
    UnknownUnit { input: String, unit: String },

    /// Value does not fit in 64 bits
    #[error("byte size '{0}' overflows u64")]
    Overflow(String),
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    let multiplier = match unit {
        "" | "B" => 1,
        "KiB" | "KB" | "K" => 1 << 10,
        "MiB" | "MB" | "M" => 1 << 20,
        "GiB" | "GB" | "G" => 1 << 30,
        "TiB" | "TB" | "T" => 1 << 40,
        _ => return None,
    };
    Some(multiplier)
}

impl FromStr for Base2Bytes {
    type Err = ByteSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let split = input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(input.len());
        let (digits, unit) = input.split_at(split);
        if digits.is_empty() {
            return Err(ByteSizeError::MissingNumber(s.to_string()));
        }

        let multiplier = unit_multiplier(unit.trim()).ok_or_else(|| ByteSizeError::UnknownUnit {
            input: s.to_string(),
            unit: unit.trim().to_string(),
        })?;

        digits
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(multiplier))
            .map(Base2Bytes)
            .ok_or_else(|| ByteSizeError::Overflow(s.to_string()))
    }
}

impl Serialize for Base2Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

struct Base2BytesVisitor;

impl<'de> Visitor<'de> for Base2BytesVisitor {
    type Value = Base2Bytes;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a byte count or a size string such as \"8MiB\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Base2Bytes(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(Base2Bytes)
            .map_err(|_| E::custom(format!("byte size cannot be negative: {}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Base2Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(Base2BytesVisitor)
    }
}
