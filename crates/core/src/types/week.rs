//! ISO-8601 week keys used to group orders on the production calendar.

use core::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing an [`IsoWeek`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WeekParseError {
    /// The input does not have the `YYYY-Www` shape.
    #[error("week must look like YYYY-Www, got {0:?}")]
    Malformed(String),
    /// The week number does not exist in that ISO week-year.
    #[error("week {week} does not exist in ISO year {year}")]
    OutOfRange {
        /// ISO week-year.
        year: i32,
        /// Requested week number.
        week: u32,
    },
}

/// An ISO-8601 week, written `YYYY-Www` (e.g. `2025-W09`).
///
/// Ordering is by year, then by numeric week, so `2025-W9` sorts before
/// `2025-W10` regardless of zero padding in the source text.
///
/// ## Examples
///
/// ```
/// use chrono::NaiveDate;
/// use polvo_planner_core::IsoWeek;
///
/// let week: IsoWeek = "2025-W10".parse().unwrap();
/// assert_eq!(week.to_string(), "2025-W10");
///
/// // 2024-12-30 belongs to the first ISO week of 2025.
/// let due = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
/// assert_eq!(IsoWeek::from_date(due).to_string(), "2025-W01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsoWeek {
    year: i32,
    week: u32,
}

impl IsoWeek {
    /// Build a week, checking that it exists in the given ISO year.
    ///
    /// # Errors
    ///
    /// Returns [`WeekParseError::OutOfRange`] for week 0 or a week past the
    /// last ISO week of `year`.
    pub fn new(year: i32, week: u32) -> Result<Self, WeekParseError> {
        if week == 0 || NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).is_none() {
            return Err(WeekParseError::OutOfRange { year, week });
        }
        Ok(Self { year, week })
    }

    /// The ISO week a calendar date falls in.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Parse a `YYYY-Www` key. Both parts are plain ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is malformed or the week does not exist.
    pub fn parse(s: &str) -> Result<Self, WeekParseError> {
        let malformed = || WeekParseError::Malformed(s.to_owned());
        let (year, week) = s.trim().split_once("-W").ok_or_else(malformed)?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(year) || !digits(week) || week.len() > 2 {
            return Err(malformed());
        }
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let week: u32 = week.parse().map_err(|_| malformed())?;
        Self::new(year, week)
    }

    /// ISO week-year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Week number within the ISO year (1-53).
    #[must_use]
    pub const fn week(&self) -> u32 {
        self.week
    }

    /// Monday of this week.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        // `new`/`parse`/`from_date` only build weeks that exist.
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl std::str::FromStr for IsoWeek {
    type Err = WeekParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for IsoWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IsoWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let week = IsoWeek::parse("2025-W10").unwrap();
        assert_eq!(week.year(), 2025);
        assert_eq!(week.week(), 10);
        assert_eq!(IsoWeek::parse("2025-W7").unwrap().week(), 7);
    }

    #[test]
    fn test_parse_malformed() {
        for input in ["", "2025", "2025-10", "W10-2025", "2025-W", "2025-Wab", "2025-W100"] {
            assert!(
                matches!(IsoWeek::parse(input), Err(WeekParseError::Malformed(_))),
                "{input} should be malformed"
            );
        }
    }

    #[test]
    fn test_parse_rejects_signs() {
        for input in ["+2025-W01", "2025-W+1", "+2025-W+1", "-2025-W01", "2025-W-1"] {
            assert!(
                matches!(IsoWeek::parse(input), Err(WeekParseError::Malformed(_))),
                "{input} should be malformed"
            );
        }
        assert_eq!(IsoWeek::parse("2025-W01").unwrap().to_string(), "2025-W01");
    }

    #[test]
    fn test_parse_out_of_range() {
        assert!(matches!(
            IsoWeek::parse("2025-W00"),
            Err(WeekParseError::OutOfRange { .. })
        ));
        // 2025 has 52 ISO weeks, 2026 has 53.
        assert!(IsoWeek::parse("2025-W53").is_err());
        assert!(IsoWeek::parse("2026-W53").is_ok());
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(IsoWeek::new(2025, 3).unwrap().to_string(), "2025-W03");
    }

    #[test]
    fn test_from_date_uses_iso_year() {
        let date = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert_eq!(IsoWeek::from_date(date).to_string(), "2026-W53");
    }

    #[test]
    fn test_ordering_is_numeric() {
        let mut weeks = vec![
            IsoWeek::parse("2025-W10").unwrap(),
            IsoWeek::parse("2024-W52").unwrap(),
            IsoWeek::parse("2025-W9").unwrap(),
        ];
        weeks.sort();
        let keys: Vec<String> = weeks.iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["2024-W52", "2025-W09", "2025-W10"]);
    }

    #[test]
    fn test_start_date_is_monday() {
        let week = IsoWeek::parse("2025-W10").unwrap();
        assert_eq!(week.start_date(), NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
    }

    #[test]
    fn test_serde_as_string() {
        let week = IsoWeek::parse("2025-W10").unwrap();
        let json = serde_json::to_string(&week).unwrap();
        assert_eq!(json, "\"2025-W10\"");
        let parsed: IsoWeek = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, week);
        assert!(serde_json::from_str::<IsoWeek>("\"2025-10\"").is_err());
    }
}
