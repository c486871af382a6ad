use std::str::FromStr;

use crate::DateError;
use crate::consts::{
    EPOCH_WEEKDAY, KEY_CENTURY, KEY_CENTURY_PREFIX, KEY_ERA_BASE, MS_PER_HOUR, MS_PER_WEEK,
};
use crate::fields::{DateFields, days_from_civil, shift_days, shift_months, shift_years, weekday};
use crate::prelude::*;

/// The closed set of calendar bucketing granularities, in table order.
///
/// Each period derives a short fixed-width key from an instant, and can
/// expand such a key back into a display string by pure slicing. Keys
/// compose from coarser periods: the `day` key is the `month` key plus a
/// two-digit day, and so on.
///
/// Year digits are truncated to two, so keys alias every century and are
/// unambiguous only for 2000 through 2099. This is kept deliberately; see
/// the crate docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Period {
    /// Constant bucket holding everything; key `"a"`
    #[display(fmt = "all")]
    All,
    /// Two-digit year, e.g. `"16"`
    #[display(fmt = "year")]
    Year,
    /// Year key plus two-digit month, e.g. `"1605"`
    #[display(fmt = "month")]
    Month,
    /// Month key plus two-digit day, e.g. `"160527"`
    #[display(fmt = "day")]
    Day,
    /// Year key, a literal `0`, and a two-digit week number, e.g. `"16022"`
    #[display(fmt = "week")]
    Week,
    /// Single digit 0 (Sunday) through 6 (Saturday)
    #[display(fmt = "weekday")]
    Weekday,
    /// Weekday digit plus two-digit hour, e.g. `"512"`
    #[display(fmt = "schedule")]
    Schedule,
}

impl Period {
    /// Every registered period, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::All,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Week,
        Self::Weekday,
        Self::Schedule,
    ];

    /// Size of one delta unit in milliseconds, or 0 for periods whose
    /// unit has no fixed length (calendar years, months and days shift
    /// by calendar arithmetic instead).
    pub const fn unit_ms(self) -> i64 {
        match self {
            Self::All | Self::Year | Self::Month | Self::Day | Self::Weekday => 0,
            Self::Week => MS_PER_WEEK,
            Self::Schedule => MS_PER_HOUR,
        }
    }

    /// Derives the bucket key containing `instant`, first advancing it by
    /// `delta` units of this period. Month and year deltas roll over
    /// calendar boundaries; week deltas add seven days; schedule deltas
    /// add hours; `all` ignores the delta entirely.
    pub fn key(self, instant: i64, delta: i32) -> String {
        let delta = i64::from(delta);
        match self {
            Self::All => "a".to_owned(),
            Self::Year => year_key(&DateFields::from_instant(shift_years(instant, delta))),
            Self::Month => {
                let f = DateFields::from_instant(shift_months(instant, delta));
                format!("{}{:02}", year_key(&f), f.month)
            }
            Self::Day => {
                let f = DateFields::from_instant(shift_days(instant, delta));
                format!("{}{:02}{:02}", year_key(&f), f.month, f.day)
            }
            Self::Week => week_key(instant + delta * MS_PER_WEEK),
            Self::Weekday => weekday(shift_days(instant, delta)).to_string(),
            Self::Schedule => {
                let shifted = instant + delta * MS_PER_HOUR;
                let f = DateFields::from_instant(shifted);
                format!("{}{:02}", weekday(shifted), f.hour)
            }
        }
    }

    /// Expands a key of this period into a display string. A pure
    /// reassembly of the key's digits, independent of any clock; keys
    /// shorter than the period's width degrade to empty segments.
    pub fn format_key(self, key: &str) -> String {
        match self {
            Self::All => "all".to_owned(),
            Self::Year => format!("{}{}", KEY_CENTURY_PREFIX, seg(key, 0, 2)),
            Self::Month => format!("{}{}-{}", KEY_CENTURY_PREFIX, seg(key, 0, 2), seg(key, 2, 2)),
            Self::Day => format!(
                "{}{}-{}-{}",
                KEY_CENTURY_PREFIX,
                seg(key, 0, 2),
                seg(key, 2, 2),
                seg(key, 4, 2)
            ),
            Self::Week => format!("{}{}-{}", KEY_CENTURY_PREFIX, seg(key, 0, 2), seg(key, 2, 3)),
            Self::Weekday => key.to_owned(),
            Self::Schedule => format!("{}-{}", seg(key, 0, 1), seg(key, 1, 2)),
        }
    }
}

/// Last two digits of the year relative to the key era. The century is
/// subtracted once, never repeatedly, reproducing the documented
/// 2000-2099 aliasing window.
fn year_key(fields: &DateFields) -> String {
    let mut n = fields.year - KEY_ERA_BASE;
    if n >= KEY_CENTURY {
        n -= KEY_CENTURY;
    }
    format!("{n:02}")
}

/// Year key, a literal zero, and the two-digit week number, where
/// week = ceil((daysSinceJan1 + jan1Weekday + 1) / 7). This is a
/// simplified week rule anchored at January 1st, not ISO-8601 weeks.
fn week_key(instant: i64) -> String {
    let f = DateFields::from_instant(instant);
    let jan1 = days_from_civil(f.year, 1, 1);
    let days_since_jan1 = days_from_civil(f.year, f.month, f.day) - jan1;
    let jan1_weekday = (jan1 + EPOCH_WEEKDAY).rem_euclid(7);
    let week = (days_since_jan1 + jan1_weekday + 1 + 6) / 7;
    format!("{}0{week:02}", year_key(&f))
}

/// Substring of `key` at `start` with at most `len` bytes, tolerating
/// keys shorter than expected.
fn seg(key: &str, start: usize, len: usize) -> &str {
    key.get(start..start + len)
        .or_else(|| key.get(start..))
        .unwrap_or("")
}

impl FromStr for Period {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "weekday" => Ok(Self::Weekday),
            "schedule" => Ok(Self::Schedule),
            other => Err(DateError::UnknownPeriod(other.to_owned())),
        }
    }
}

impl serde::Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
