//! Date utilities for fixed-layout timestamp parsing, formatting, and
//! calendar bucket keys.
//!
//! The crate is built around two table-driven engines plus a set of
//! calendar helpers, all UTC-based:
//!
//! - [`Format`]: a closed set of textual date layouts. The engine parses
//!   a string against one or more layouts into a millisecond instant and
//!   renders an instant back into a layout's text.
//! - [`Period`]: a closed set of calendar granularities (`all`, `year`,
//!   `month`, `day`, `week`, `weekday`, `schedule`) that derive short
//!   fixed-width keys for grouping and partitioning, and expand those
//!   keys back into display strings.
//! - Helpers for `yyyymmdd` day numbers, offset-shifted hour bucketing,
//!   day rounding, and relative day ranges.
//!
//! [`DateKit`] ties the engines to a freezable clock and a pluggable
//! error handler. Invalid input never panics or raises; it is reported
//! to the handler and the operation returns an empty sentinel (`0` for
//! instants, `""` for strings).
//!
//! Period keys truncate the year to its last two digits, so they alias
//! every century and are unambiguous only for dates in 2000-2099.
//!
//! ```
//! use datekit::DateKit;
//!
//! let kit = DateKit::new();
//! let instant = kit.parse_with_formats("160527120000", Some(&["yymmddhhiiss"]));
//! assert_eq!(instant, 1_464_350_400_000);
//! assert_eq!(kit.format_instant(instant, "dd/mm/yyyy"), "27/05/2016");
//! assert_eq!(kit.key_for_period("day", Some(instant), 0), "160527");
//! assert_eq!(kit.format_key("day", "160527"), "2016-05-27");
//! ```

mod clock;
mod consts;
mod fields;
mod formats;
mod keys;
mod parse;
mod prelude;
mod range;

pub use clock::ErrorHandler;
pub use consts::{HOURS_PER_DAY, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND, MS_PER_WEEK};
pub use fields::{
    DateFields, bucket_key, day_number, from_day_number, hour_with_offset, round_to_day_start,
    to_iso_string, weekday,
};
pub use formats::Format;
pub use keys::Period;
pub use range::{DayEntry, relative_day_range};

use std::sync::Arc;

use clock::{Clock, ErrorHook};

/// Errors reported through the engine's error handler. Every variant is
/// absorbed at the engine boundary: operations return their empty
/// sentinel instead of propagating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// A requested format name is not in the format table.
    #[error("Invalid date format {0}")]
    UnknownFormat(String),

    /// The input matched none of the attempted formats.
    #[error("Invalid date format {input} with tested formats: {formats}")]
    UnmatchedInput { input: String, formats: String },

    /// A requested period name is not in the period table.
    #[error("Unhandled date period key: {0}")]
    UnknownPeriod(String),

    /// The input was not recognizable as ISO-8601.
    #[error("Invalid ISO-8601 date: {0}")]
    UnparsableIso(String),
}

/// The names of every registered format, in table order.
pub fn list_formats() -> Vec<String> {
    Format::ALL.iter().map(ToString::to_string).collect()
}

/// The names of every registered period, in table order.
pub fn list_periods() -> Vec<String> {
    Period::ALL.iter().map(ToString::to_string).collect()
}

/// The engine context: a clock that can be frozen for tests and an
/// error handler hook, shared by the parse/format and period-key
/// engines. Independent instances carry independent state, so engines
/// in different tests never interfere.
#[derive(Debug, Default)]
pub struct DateKit {
    clock: Clock,
    errors: ErrorHook,
}

impl DateKit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `input` against the requested formats, in order, returning
    /// the instant of the first layout that fully matches.
    ///
    /// `None` tries every registered format in table order. Empty input
    /// is the "no date" sentinel: returns 0 without reporting. Unknown
    /// format names, or input matching no attempted layout, report to
    /// the error handler and return 0.
    pub fn parse_with_formats(&self, input: &str, formats: Option<&[&str]>) -> i64 {
        if input.is_empty() {
            return 0;
        }

        let requested: Vec<&str> = match formats {
            Some(names) => names.to_vec(),
            None => return self.parse_resolved(input, &Format::ALL, None),
        };

        let mut resolved = Vec::with_capacity(requested.len());
        for name in &requested {
            match name.parse::<Format>() {
                Ok(format) => resolved.push(format),
                Err(_) => {
                    self.errors
                        .report(&DateError::UnknownFormat(requested.join(", ")));
                    return 0;
                }
            }
        }
        self.parse_resolved(input, &resolved, Some(&requested))
    }

    /// Parses `input` trying every registered format in table order.
    pub fn parse(&self, input: &str) -> i64 {
        self.parse_with_formats(input, None)
    }

    fn parse_resolved(&self, input: &str, formats: &[Format], names: Option<&[&str]>) -> i64 {
        for format in formats {
            if let Some(instant) = format.parse(input) {
                return instant;
            }
        }
        let formats = names.map_or_else(
            || list_formats().join(", "),
            |names| names.join(", "),
        );
        self.errors.report(&DateError::UnmatchedInput {
            input: input.to_owned(),
            formats,
        });
        0
    }

    /// Renders an instant in the named layout, zero-padded. An unknown
    /// format name reports to the error handler and returns `""`.
    pub fn format_instant(&self, instant: i64, format: &str) -> String {
        match format.parse::<Format>() {
            Ok(format) => format.render(&DateFields::from_instant(instant)),
            Err(error) => {
                self.errors.report(&error);
                String::new()
            }
        }
    }

    /// Full ISO-8601 rendering of an instant, defaulting to the current
    /// time.
    pub fn to_iso_string(&self, instant: Option<i64>) -> String {
        to_iso_string(instant.unwrap_or_else(|| self.now()))
    }

    /// Parses an ISO-8601 string into an instant, delegating to the
    /// `iso8601` parser. A missing or empty input yields the current
    /// time; an unparsable one reports and returns 0.
    pub fn parse_iso(&self, input: Option<&str>) -> i64 {
        let Some(input) = input.filter(|s| !s.is_empty()) else {
            return self.now();
        };
        match parse::parse_iso_8601(input) {
            Ok(instant) => instant,
            Err(error) => {
                self.errors.report(&error);
                0
            }
        }
    }

    /// Derives the period key bucketing `instant` (default: now),
    /// shifted by `delta` units of the period. An unknown period name
    /// reports and returns `""`.
    pub fn key_for_period(&self, period: &str, instant: Option<i64>, delta: i32) -> String {
        match period.parse::<Period>() {
            Ok(period) => period.key(instant.unwrap_or_else(|| self.now()), delta),
            Err(error) => {
                self.errors.report(&error);
                String::new()
            }
        }
    }

    /// Expands a period key into its display string. An unknown period
    /// name reports and returns `""`.
    pub fn format_key(&self, period: &str, key: &str) -> String {
        match period.parse::<Period>() {
            Ok(period) => period.format_key(key),
            Err(error) => {
                self.errors.report(&error);
                String::new()
            }
        }
    }

    /// Offset-shifted UTC hour of an instant (default: now), in 0..=23.
    pub fn hour_with_offset(&self, instant: Option<i64>, offset_ms: i64) -> u8 {
        hour_with_offset(instant.unwrap_or_else(|| self.now()), offset_ms)
    }

    /// UTC midnight of the day containing an instant (default: now).
    pub fn round_to_day_start(&self, instant: Option<i64>) -> i64 {
        round_to_day_start(instant.unwrap_or_else(|| self.now()))
    }

    /// The current instant in milliseconds: either the frozen override
    /// or the system clock.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Freezes the clock at a fixed instant, for deterministic tests.
    pub fn fix_time_at(&self, instant: i64) {
        self.clock.fix_at(instant);
    }

    /// Restores the system clock after [`DateKit::fix_time_at`].
    pub fn reset_time(&self) {
        self.clock.reset();
    }

    /// Replaces the error handler invoked on invalid input. The engine
    /// only requires that it be callable; it may log, panic, or ignore.
    pub fn set_error_handler(&self, handler: impl Fn(&DateError) + Send + Sync + 'static) {
        self.errors.set(Arc::new(handler));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // 2016-05-27T12:00:00.000Z
    const MAY_27_NOON: i64 = 1_464_350_400_000;
    // 2016-05-27T00:00:00.000Z
    const MAY_27: i64 = 1_464_307_200_000;

    /// Engine with a handler that counts reports and keeps messages.
    fn counting_kit() -> (DateKit, Arc<AtomicUsize>, Arc<Mutex<Vec<String>>>) {
        let kit = DateKit::new();
        let count = Arc::new(AtomicUsize::new(0));
        let messages = Arc::new(Mutex::new(Vec::new()));
        let (count_in, messages_in) = (Arc::clone(&count), Arc::clone(&messages));
        kit.set_error_handler(move |error| {
            count_in.fetch_add(1, Ordering::SeqCst);
            messages_in.lock().unwrap().push(error.to_string());
        });
        (kit, count, messages)
    }

    #[test]
    fn test_parse_known_format() {
        let kit = DateKit::new();
        assert_eq!(
            kit.parse_with_formats("160527120000", Some(&["yymmddhhiiss"])),
            MAY_27_NOON
        );
        assert_eq!(
            kit.parse_with_formats("05272016120000000", Some(&["mmddyyyyhhiissfff"])),
            MAY_27_NOON
        );
    }

    #[test]
    fn test_parse_empty_input_is_silent_zero() {
        let (kit, count, _) = counting_kit();
        assert_eq!(kit.parse_with_formats("", None), 0);
        assert_eq!(kit.parse_with_formats("", Some(&["bogus"])), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_parse_unknown_format_name_reports_once() {
        let (kit, count, messages) = counting_kit();
        assert_eq!(
            kit.parse_with_formats("20160527", Some(&["yyyymmdd", "bogus"])),
            0
        );
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(
            messages.lock().unwrap()[0],
            "Invalid date format yyyymmdd, bogus"
        );
    }

    #[test]
    fn test_parse_no_match_reports_once_with_attempts() {
        let (kit, count, messages) = counting_kit();
        assert_eq!(kit.parse_with_formats("bad", Some(&["yyyymmdd"])), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(
            messages.lock().unwrap()[0],
            "Invalid date format bad with tested formats: yyyymmdd"
        );
    }

    #[test]
    fn test_parse_tries_all_formats_in_table_order() {
        let kit = DateKit::new();
        // 052716120000 is ambiguous; yymmddhhiiss comes first in the
        // table and wins, so without an explicit format the string is
        // *not* read as mmddyyhhiiss
        let implicit = kit.parse("052716120000");
        let explicit = kit.parse_with_formats("052716120000", Some(&["mmddyyhhiiss"]));
        assert_eq!(explicit, MAY_27_NOON);
        assert_ne!(implicit, explicit);
    }

    #[test]
    fn test_parse_defaults_missing_fields_to_zero() {
        let kit = DateKit::new();
        assert_eq!(kit.parse_with_formats("20160527", Some(&["yyyymmdd"])), MAY_27);
        // time-only lands on the epoch day
        assert_eq!(
            kit.parse_with_formats("12:00", Some(&["hh:mm"])),
            12 * MS_PER_HOUR
        );
    }

    #[test]
    fn test_format_instant() {
        let kit = DateKit::new();
        assert_eq!(kit.format_instant(MAY_27_NOON, "yymmddhhiiss"), "160527120000");
        assert_eq!(
            kit.format_instant(MAY_27_NOON, "yyyy-mm-dd hh:ii:ss.fff"),
            "2016-05-27 12:00:00.000"
        );
    }

    #[test]
    fn test_format_instant_unknown_name() {
        let (kit, count, messages) = counting_kit();
        assert_eq!(kit.format_instant(MAY_27_NOON, "bogus"), "");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(messages.lock().unwrap()[0], "Invalid date format bogus");
    }

    #[test]
    fn test_round_trip_every_format() {
        let kit = DateKit::new();
        for name in list_formats() {
            let rendered = kit.format_instant(MAY_27_NOON, &name);
            let reparsed = kit.parse_with_formats(&rendered, Some(&[name.as_str()]));
            assert_eq!(
                kit.format_instant(reparsed, &name),
                rendered,
                "{name} did not round-trip"
            );
        }
    }

    #[test]
    fn test_key_for_period() {
        let kit = DateKit::new();
        assert_eq!(kit.key_for_period("day", Some(MAY_27), 0), "160527");
        assert_eq!(kit.key_for_period("week", Some(0), 0), "70001");
        assert_eq!(kit.key_for_period("all", Some(MAY_27), 0), "a");
    }

    #[test]
    fn test_key_for_period_month_delta_rollover() {
        let kit = DateKit::new();
        // advancing by one calendar month must equal the key of the
        // advanced instant, across the December boundary
        let december = kit.parse_with_formats("20161215", Some(&["yyyymmdd"]));
        let january = kit.parse_with_formats("20170115", Some(&["yyyymmdd"]));
        assert_eq!(
            kit.key_for_period("month", Some(december), 1),
            kit.key_for_period("month", Some(january), 0)
        );
    }

    #[test]
    fn test_key_for_period_uses_frozen_clock() {
        let kit = DateKit::new();
        kit.fix_time_at(MAY_27);
        assert_eq!(kit.key_for_period("day", None, 0), "160527");
        assert_eq!(kit.key_for_period("day", None, 1), "160528");
    }

    #[test]
    fn test_key_for_unknown_period() {
        let (kit, count, messages) = counting_kit();
        assert_eq!(kit.key_for_period("decade", Some(MAY_27), 0), "");
        assert_eq!(kit.format_key("decade", "16"), "");
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(
            messages.lock().unwrap()[0],
            "Unhandled date period key: decade"
        );
    }

    #[test]
    fn test_format_key_is_clock_independent() {
        let kit = DateKit::new();
        let before = kit.format_key("day", "160527");
        kit.fix_time_at(0);
        assert_eq!(kit.format_key("day", "160527"), before);
        assert_eq!(before, "2016-05-27");
    }

    #[test]
    fn test_now_fix_and_reset() {
        let kit = DateKit::new();
        kit.fix_time_at(MAY_27_NOON);
        assert_eq!(kit.now(), MAY_27_NOON);
        assert_eq!(kit.to_iso_string(None), "2016-05-27T12:00:00.000Z");

        kit.reset_time();
        assert!(kit.now() > MAY_27_NOON);
    }

    #[test]
    fn test_independent_instances_do_not_interfere() {
        let frozen = DateKit::new();
        let live = DateKit::new();
        frozen.fix_time_at(42);
        assert_eq!(frozen.now(), 42);
        assert!(live.now() > 42);
    }

    #[test]
    fn test_to_iso_string_explicit_instant() {
        let kit = DateKit::new();
        assert_eq!(kit.to_iso_string(Some(0)), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_parse_iso() {
        let kit = DateKit::new();
        assert_eq!(
            kit.parse_iso(Some("2016-05-27T12:00:00.000Z")),
            MAY_27_NOON
        );
        // empty and missing input default to the current time
        kit.fix_time_at(MAY_27);
        assert_eq!(kit.parse_iso(None), MAY_27);
        assert_eq!(kit.parse_iso(Some("")), MAY_27);
    }

    #[test]
    fn test_parse_iso_round_trips_to_string() {
        let kit = DateKit::new();
        let rendered = kit.to_iso_string(Some(MAY_27_NOON));
        assert_eq!(kit.parse_iso(Some(&rendered)), MAY_27_NOON);
    }

    #[test]
    fn test_parse_iso_invalid_reports() {
        let (kit, count, _) = counting_kit();
        assert_eq!(kit.parse_iso(Some("not a date")), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hour_with_offset_defaults_to_now() {
        let kit = DateKit::new();
        kit.fix_time_at(MAY_27_NOON);
        assert_eq!(kit.hour_with_offset(None, 0), 12);
        assert_eq!(kit.hour_with_offset(None, -3 * MS_PER_HOUR), 9);
        assert_eq!(kit.hour_with_offset(Some(0), -MS_PER_HOUR), 23);
    }

    #[test]
    fn test_round_to_day_start_defaults_to_now() {
        let kit = DateKit::new();
        kit.fix_time_at(MAY_27_NOON);
        assert_eq!(kit.round_to_day_start(None), MAY_27);
        assert_eq!(kit.round_to_day_start(Some(MAY_27 + 1)), MAY_27);
    }

    #[test]
    fn test_day_number_scenario() {
        assert_eq!(day_number(MAY_27), 20_160_527);
        assert_eq!(
            to_iso_string(from_day_number(20_160_527)),
            "2016-05-27T00:00:00.000Z"
        );
    }

    #[test]
    fn test_list_formats_and_periods() {
        assert_eq!(list_formats().len(), 11);
        assert_eq!(list_formats()[0], "mmddyyyyhhiissfff");
        assert_eq!(
            list_periods(),
            ["all", "year", "month", "day", "week", "weekday", "schedule"]
        );
    }

    #[test]
    fn test_error_display_is_descriptive() {
        let error = DateError::UnmatchedInput {
            input: "bad".to_owned(),
            formats: "yyyymmdd, hh:mm".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date format bad with tested formats: yyyymmdd, hh:mm"
        );
    }

    #[test]
    fn test_handler_replacement_last_write_wins() {
        let kit = DateKit::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let (first_in, second_in) = (Arc::clone(&first), Arc::clone(&second));

        kit.set_error_handler(move |_| {
            first_in.fetch_add(1, Ordering::SeqCst);
        });
        kit.set_error_handler(move |_| {
            second_in.fetch_add(1, Ordering::SeqCst);
        });

        kit.format_instant(0, "bogus");
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_may_reenter_the_engine() {
        let kit = Arc::new(DateKit::new());
        kit.fix_time_at(MAY_27);
        let seen = Arc::new(Mutex::new(None));
        let (kit_in, seen_in) = (Arc::clone(&kit), Arc::clone(&seen));
        kit.set_error_handler(move |_| {
            *seen_in.lock().unwrap() = Some(kit_in.now());
        });

        kit.format_instant(0, "bogus");
        assert_eq!(*seen.lock().unwrap(), Some(MAY_27));
    }
}
