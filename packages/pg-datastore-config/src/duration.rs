//! Duration rendering and serde helpers.

use std::fmt;
use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;

/// Renders a [`Duration`] in the compact `72h3m0.5s` form used by
/// operator-facing messages.
///
/// Durations of a second or more are written as hours, minutes and
/// fractional seconds, omitting leading zero units (`10m0s`, `24h0m0s`,
/// `1.5s`). Shorter durations use the largest fitting sub-second unit
/// (`500ms`, `1.5µs`, `42ns`). Zero is `0s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoDuration(pub Duration);

impl From<Duration> for GoDuration {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl From<&Duration> for GoDuration {
    fn from(duration: &Duration) -> Self {
        Self(*duration)
    }
}

impl fmt::Display for GoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();
        if nanos == 0 {
            return f.write_str("0s");
        }

        if nanos < NANOS_PER_SEC {
            if nanos < NANOS_PER_MICRO {
                return write!(f, "{}ns", nanos);
            }
            let (digits, unit) = if nanos < NANOS_PER_MILLI {
                (3, "µs")
            } else {
                (6, "ms")
            };
            return write!(f, "{}{}", fixed_point(nanos, digits), unit);
        }

        let total_minutes = nanos / NANOS_PER_MIN;
        let hours = total_minutes / 60;
        let minutes = total_minutes % 60;
        if hours > 0 {
            write!(f, "{}h{}m", hours, minutes)?;
        } else if minutes > 0 {
            write!(f, "{}m", minutes)?;
        }
        write!(f, "{}s", fixed_point(nanos % NANOS_PER_MIN, 9))
    }
}

/// Formats `value / 10^digits` with trailing fractional zeros removed.
fn fixed_point(value: u128, digits: u32) -> String {
    let scale = 10u128.pow(digits);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = digits as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Serializes durations in the [`GoDuration`] form, matching the text
/// operators see in error messages.
pub mod go_duration_serde {
    use std::time::Duration;

    use serde::Serializer;

    use super::GoDuration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&GoDuration(*duration))
    }

    /// `None` is written as `null`.
    pub mod option {
        use std::time::Duration;

        use serde::Serializer;

        pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match duration {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }
    }
}

/// Deserializes humantime strings (`"30s"`, `"1h 30m"`) from settings files.
pub mod humantime_serde {
    /// `Option<Duration>` form; `null` or a missing key is `None`.
    pub mod option {
        use std::time::Duration;

        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(s) => humantime::parse_duration(&s)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}
