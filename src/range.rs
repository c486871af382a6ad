use serde::{Deserialize, Serialize};

use crate::consts::MS_PER_DAY;
use crate::fields::{day_number, round_to_day_start, shift_days};

/// One calendar day inside a relative range: the day as a `yyyymmdd`
/// number and the instant that day starts at for the requesting caller
/// (UTC midnight minus the caller's offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayEntry {
    pub day: i64,
    pub time: i64,
}

/// Enumerates the calendar days around an instant, shifted into a
/// caller-supplied UTC offset.
///
/// The anchor day is the one containing `instant + offset_ms`; the range
/// runs from `start_delta` to `end_delta` days relative to that anchor,
/// inclusive, crossing month and year boundaries by calendar arithmetic.
/// Each entry's `time` is that day's UTC midnight with the offset backed
/// out again. A start after the end yields an empty vector.
pub fn relative_day_range(
    instant: i64,
    start_delta: i32,
    end_delta: i32,
    offset_ms: i64,
) -> Vec<DayEntry> {
    let anchor = round_to_day_start(instant + offset_ms);
    let start = shift_days(anchor, i64::from(start_delta));
    let end = shift_days(anchor, i64::from(end_delta));

    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(DayEntry {
            day: day_number(current),
            time: current - offset_ms,
        });
        current += MS_PER_DAY;
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

    // 2016-05-27T14:52:53.000Z (11:52:53 at UTC-3)
    const LATE_MAY_AFTERNOON: i64 = 1_464_360_773_000;

    #[test]
    fn test_offset_week_window() {
        let offset = -3 * MS_PER_HOUR;
        let range = relative_day_range(LATE_MAY_AFTERNOON, -4, 2, offset);

        let days: Vec<i64> = range.iter().map(|entry| entry.day).collect();
        assert_eq!(
            days,
            [
                20_160_523, 20_160_524, 20_160_525, 20_160_526, 20_160_527, 20_160_528, 20_160_529,
            ]
        );
        // each entry starts at that UTC day start minus the offset
        for entry in &range {
            assert_eq!(
                entry.time,
                crate::from_day_number(entry.day) - offset,
                "day {} has a shifted start",
                entry.day
            );
        }
    }

    #[test]
    fn test_single_day() {
        let range = relative_day_range(LATE_MAY_AFTERNOON, 0, 0, 0);
        assert_eq!(
            range,
            [DayEntry {
                day: 20_160_527,
                time: LATE_MAY_AFTERNOON
                    - 14 * MS_PER_HOUR
                    - 52 * MS_PER_MINUTE
                    - 53 * MS_PER_SECOND,
            }]
        );
    }

    #[test]
    fn test_start_after_end_is_empty() {
        assert!(relative_day_range(LATE_MAY_AFTERNOON, 2, -4, 0).is_empty());
        assert!(relative_day_range(LATE_MAY_AFTERNOON, 1, 0, 0).is_empty());
    }

    #[test]
    fn test_crosses_month_boundary() {
        let range = relative_day_range(LATE_MAY_AFTERNOON, 3, 6, 0);
        let days: Vec<i64> = range.iter().map(|entry| entry.day).collect();
        assert_eq!(days, [20_160_530, 20_160_531, 20_160_601, 20_160_602]);
    }

    #[test]
    fn test_crosses_year_boundary() {
        // 2016-12-30T12:00:00Z
        let late_december = 1_483_099_200_000;
        let range = relative_day_range(late_december, 0, 3, 0);
        let days: Vec<i64> = range.iter().map(|entry| entry.day).collect();
        assert_eq!(days, [20_161_230, 20_161_231, 20_170_101, 20_170_102]);
    }

    #[test]
    fn test_positive_offset_shifts_anchor() {
        // 2016-05-27T23:00:00Z with a +2h offset is already the next calendar day
        let eleven_pm = 1_464_307_200_000 + 23 * MS_PER_HOUR;
        let range = relative_day_range(eleven_pm, 0, 0, 2 * MS_PER_HOUR);
        assert_eq!(range.len(), 1);
        assert_eq!(range[0].day, 20_160_528);
    }

    #[test]
    fn test_serde_day_entry() {
        let entry = DayEntry {
            day: 20_160_527,
            time: 1_464_307_200_000,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"day":20160527,"time":1464307200000}"#);
        let parsed: DayEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, parsed);
    }
}
