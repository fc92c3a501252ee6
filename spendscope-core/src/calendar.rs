//! Calendar utilities: statement date parsing and date decomposition.
//!
//! Week numbers follow ISO-8601 (weeks start on Monday, week 1 holds the
//! year's first Thursday).

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric formats are tried day-first.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d-%B-%Y",
];

/// Parse a date token as printed on a statement ("01/03/2024", "Mar 01, 2024",
/// "Sept 5, 2024", "2024-03-01").
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.is_empty() {
        return None;
    }
    // chrono knows "Sep" and "September" but not "Sept"
    let s = s.replacen("Sept ", "Sep ", 1).replacen("Sept,", "Sep,", 1);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&s, fmt).ok())
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Accepts "Mon", "monday", "SUNDAY", ...
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse().ok()
}

pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Calendar decomposition of a transaction date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarParts {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub day: u32,
    pub weekday: Weekday,
    /// ISO-8601 week number
    pub week_number: u32,
    pub is_weekend: bool,
}

impl CalendarParts {
    pub fn from_date(date: NaiveDate) -> Self {
        let weekday = date.weekday();
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            weekday,
            week_number: date.iso_week().week(),
            is_weekend: is_weekend(weekday),
        }
    }

    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }

    pub fn day_type(&self) -> &'static str {
        if self.is_weekend { "Weekend" } else { "Weekday" }
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }
}

/// A calendar month, printed as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Accepts `2024-03` and the `Mar-2024` label style.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || format!("invalid month '{s}' (expected YYYY-MM)");

        if let Some((y, m)) = s.split_once('-') {
            if let (Ok(year), Ok(month)) = (y.parse::<i32>(), m.parse::<u32>()) {
                return YearMonth::new(year, month).ok_or_else(err);
            }
            let date = NaiveDate::parse_from_str(&format!("01 {y} {m}"), "%d %B %Y")
                .map_err(|_| err())?;
            return Ok(YearMonth::of(date));
        }
        Err(err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_statement_dates() {
        assert_eq!(parse_statement_date("01/03/2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_statement_date("01-03-2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_statement_date("2024-03-01"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_statement_date("Mar 01, 2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_statement_date("Sept 5, 2024"), Some(ymd(2024, 9, 5)));
        assert_eq!(parse_statement_date("June 12, 2024"), Some(ymd(2024, 6, 12)));
        assert_eq!(parse_statement_date("31/02/2024"), None);
        assert_eq!(parse_statement_date("yesterday"), None);
        assert_eq!(parse_statement_date(""), None);
    }

    #[test]
    fn test_decomposition() {
        let friday = CalendarParts::from_date(ymd(2024, 3, 1));
        assert_eq!(friday.month, 3);
        assert_eq!(friday.day, 1);
        assert_eq!(friday.weekday_name(), "Friday");
        assert_eq!(friday.week_number, 9);
        assert!(!friday.is_weekend);
        assert_eq!(friday.day_type(), "Weekday");

        let sunday = CalendarParts::from_date(ymd(2024, 3, 3));
        assert_eq!(sunday.weekday_name(), "Sunday");
        assert!(sunday.is_weekend);
        assert_eq!(sunday.day_type(), "Weekend");
    }

    #[test]
    fn test_iso_week_at_year_boundary() {
        // 2021-01-03 is a Sunday that still belongs to ISO week 53 of 2020
        assert_eq!(CalendarParts::from_date(ymd(2021, 1, 3)).week_number, 53);
        assert_eq!(CalendarParts::from_date(ymd(2021, 1, 4)).week_number, 1);
    }

    #[test]
    fn test_weekend_iff_saturday_or_sunday() {
        let mut date = ymd(2024, 1, 1);
        for _ in 0..366 {
            let parts = CalendarParts::from_date(date);
            let named_weekend = matches!(parts.weekday_name(), "Saturday" | "Sunday");
            assert_eq!(parts.is_weekend, named_weekend, "{date}");
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_year_month() {
        let ym: YearMonth = "2024-03".parse().unwrap();
        assert_eq!(ym, YearMonth { year: 2024, month: 3 });
        assert_eq!(ym.to_string(), "2024-03");
        assert_eq!("Mar-2024".parse::<YearMonth>().unwrap(), ym);
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("march".parse::<YearMonth>().is_err());
        assert!(ym.contains(ymd(2024, 3, 31)));
        assert!(!ym.contains(ymd(2024, 4, 1)));
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("sat"), Some(Weekday::Sat));
        assert_eq!(parse_weekday("Sunday"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("funday"), None);
    }
}
