use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::DateError;
use crate::fields::DateFields;
use crate::prelude::*;

/// The closed set of registered date layouts, in table order.
///
/// Each layout pairs an anchored pattern with a positional reorder rule
/// into the canonical field tuple and the inverse rendering rule. Parsing
/// is lenient about one-digit month/day/hour where the pattern allows it;
/// rendering always emits canonical zero-padded widths, so the two are
/// exact inverses only for canonically padded input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Format {
    /// `05272016120000000`
    #[display(fmt = "mmddyyyyhhiissfff")]
    MmDdYyyyHhIiSsFff,
    /// `160527120000`
    #[display(fmt = "yymmddhhiiss")]
    YyMmDdHhIiSs,
    /// `20160527120000`
    #[display(fmt = "yyyymmddhhiiss")]
    YyyyMmDdHhIiSs,
    /// `052716120000`
    #[display(fmt = "mmddyyhhiiss")]
    MmDdYyHhIiSs,
    /// `20160527`
    #[display(fmt = "yyyymmdd")]
    YyyyMmDd,
    /// `05-27-2016`
    #[display(fmt = "mm-dd-yyyy")]
    MmDdYyyy,
    /// `27/05/2016`
    #[display(fmt = "dd/mm/yyyy")]
    DdMmYyyy,
    /// `27/05`
    #[display(fmt = "dd/mm")]
    DdMm,
    /// `12:00`
    #[display(fmt = "hh:mm")]
    HhMm,
    /// `27/05/2016 12:00:00`
    #[display(fmt = "dd/mm/yyyy hh:ii:ss")]
    DdMmYyyyHhIiSs,
    /// `2016-05-27 12:00:00.000`
    #[display(fmt = "yyyy-mm-dd hh:ii:ss.fff")]
    YyyyMmDdHhIiSsFff,
}

/// Compiled patterns, indexed by variant discriminant.
static PATTERNS: LazyLock<[Regex; Format::ALL.len()]> = LazyLock::new(|| {
    Format::ALL.map(|f| Regex::new(f.pattern()).expect("format table pattern compiles"))
});

impl Format {
    /// Every registered format, in declaration order. Parsing without an
    /// explicit format list tries these from first to last.
    pub const ALL: [Self; 11] = [
        Self::MmDdYyyyHhIiSsFff,
        Self::YyMmDdHhIiSs,
        Self::YyyyMmDdHhIiSs,
        Self::MmDdYyHhIiSs,
        Self::YyyyMmDd,
        Self::MmDdYyyy,
        Self::DdMmYyyy,
        Self::DdMm,
        Self::HhMm,
        Self::DdMmYyyyHhIiSs,
        Self::YyyyMmDdHhIiSsFff,
    ];

    const fn pattern(self) -> &'static str {
        match self {
            Self::MmDdYyyyHhIiSsFff => r"^(\d{2})(\d{2})(\d{4})(\d{2})(\d{2})(\d{2})(\d{3})$",
            Self::YyMmDdHhIiSs | Self::MmDdYyHhIiSs => {
                r"^(\d{2})(\d{2})(\d{2})(\d{2})(\d{2})(\d{2})$"
            }
            Self::YyyyMmDdHhIiSs => r"^(\d{4})(\d{2})(\d{2})(\d{2})(\d{2})(\d{2})$",
            Self::YyyyMmDd => r"^(\d{4})(\d{2})(\d{2})$",
            Self::MmDdYyyy => r"^(\d{1,2})-(\d{1,2})-(\d{4})$",
            Self::DdMmYyyy => r"^(\d{1,2})/(\d{1,2})/(\d{4})$",
            Self::DdMm => r"^(\d{1,2})/(\d{1,2})$",
            Self::HhMm => r"^(\d{1,2}):(\d{2})$",
            Self::DdMmYyyyHhIiSs => r"^(\d{2})/(\d{2})/(\d{4})\s(\d{1,2}):(\d{2}):(\d{2})$",
            Self::YyyyMmDdHhIiSsFff => {
                r"^(\d{4})-(\d{2})-(\d{2})\s(\d{1,2}):(\d{2}):(\d{2})\.(\d{3})$"
            }
        }
    }

    fn regex(self) -> &'static Regex {
        &PATTERNS[self as usize]
    }

    /// Attempts a full match of `input` against this layout, returning
    /// the UTC instant it denotes. Fields the layout omits default to
    /// zero, so date-only layouts produce midnight and time-only layouts
    /// land on the epoch day.
    pub fn parse(self, input: &str) -> Option<i64> {
        let caps = self.regex().captures(input)?;
        Some(self.transform(&caps).instant())
    }

    /// Reorders the positional captures into canonical field order.
    fn transform(self, caps: &Captures<'_>) -> DateFields {
        let g = |index: usize| group(caps, index);
        let (year, month, day, hour, minute, second, millisecond) = match self {
            Self::MmDdYyyyHhIiSsFff => (g(3), g(1), g(2), g(4), g(5), g(6), g(7)),
            Self::YyMmDdHhIiSs => (2000 + g(1), g(2), g(3), g(4), g(5), g(6), 0),
            Self::YyyyMmDdHhIiSs => (g(1), g(2), g(3), g(4), g(5), g(6), 0),
            Self::MmDdYyHhIiSs => (2000 + g(3), g(1), g(2), g(4), g(5), g(6), 0),
            Self::YyyyMmDd => (g(1), g(2), g(3), 0, 0, 0, 0),
            Self::MmDdYyyy => (g(3), g(1), g(2), 0, 0, 0, 0),
            Self::DdMmYyyy => (g(3), g(2), g(1), 0, 0, 0, 0),
            Self::DdMm => (1970, g(2), g(1), 0, 0, 0, 0),
            Self::HhMm => (1970, 1, 1, g(1), g(2), 0, 0),
            Self::DdMmYyyyHhIiSs => (g(3), g(2), g(1), g(4), g(5), g(6), 0),
            Self::YyyyMmDdHhIiSsFff => (g(1), g(2), g(3), g(4), g(5), g(6), g(7)),
        };
        DateFields {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        }
    }

    /// Renders canonical fields back into this layout's text, always
    /// with zero-padded widths.
    pub fn render(self, f: &DateFields) -> String {
        match self {
            Self::MmDdYyyyHhIiSsFff => format!(
                "{:02}{:02}{:04}{:02}{:02}{:02}{:03}",
                f.month, f.day, f.year, f.hour, f.minute, f.second, f.millisecond
            ),
            Self::YyMmDdHhIiSs => format!(
                "{:02}{:02}{:02}{:02}{:02}{:02}",
                f.year.rem_euclid(100),
                f.month,
                f.day,
                f.hour,
                f.minute,
                f.second
            ),
            Self::YyyyMmDdHhIiSs => format!(
                "{:04}{:02}{:02}{:02}{:02}{:02}",
                f.year, f.month, f.day, f.hour, f.minute, f.second
            ),
            Self::MmDdYyHhIiSs => format!(
                "{:02}{:02}{:02}{:02}{:02}{:02}",
                f.month,
                f.day,
                f.year.rem_euclid(100),
                f.hour,
                f.minute,
                f.second
            ),
            Self::YyyyMmDd => format!("{:04}{:02}{:02}", f.year, f.month, f.day),
            Self::MmDdYyyy => format!("{:02}-{:02}-{:04}", f.month, f.day, f.year),
            Self::DdMmYyyy => format!("{:02}/{:02}/{:04}", f.day, f.month, f.year),
            Self::DdMm => format!("{:02}/{:02}", f.day, f.month),
            Self::HhMm => format!("{:02}:{:02}", f.hour, f.minute),
            Self::DdMmYyyyHhIiSs => format!(
                "{:02}/{:02}/{:04} {:02}:{:02}:{:02}",
                f.day, f.month, f.year, f.hour, f.minute, f.second
            ),
            Self::YyyyMmDdHhIiSsFff => format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
                f.year, f.month, f.day, f.hour, f.minute, f.second, f.millisecond
            ),
        }
    }
}

fn group(caps: &Captures<'_>, index: usize) -> i64 {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

impl FromStr for Format {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mmddyyyyhhiissfff" => Ok(Self::MmDdYyyyHhIiSsFff),
            "yymmddhhiiss" => Ok(Self::YyMmDdHhIiSs),
            "yyyymmddhhiiss" => Ok(Self::YyyyMmDdHhIiSs),
            "mmddyyhhiiss" => Ok(Self::MmDdYyHhIiSs),
            "yyyymmdd" => Ok(Self::YyyyMmDd),
            "mm-dd-yyyy" => Ok(Self::MmDdYyyy),
            "dd/mm/yyyy" => Ok(Self::DdMmYyyy),
            "dd/mm" => Ok(Self::DdMm),
            "hh:mm" => Ok(Self::HhMm),
            "dd/mm/yyyy hh:ii:ss" => Ok(Self::DdMmYyyyHhIiSs),
            "yyyy-mm-dd hh:ii:ss.fff" => Ok(Self::YyyyMmDdHhIiSsFff),
            other => Err(DateError::UnknownFormat(other.to_owned())),
        }
    }
}

impl serde::Serialize for Format {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Format {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
