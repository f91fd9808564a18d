// File: ./src/scrape/date.rs
// Recognizes listing date lines such as "Saturday, November 1, 2025. 8:00 pm"
// and turns them into instants in the venue's time zone.
use crate::error::DateParseError;
use chrono::{DateTime, Datelike, LocalResult, Month, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

/// `Weekday, Month Day, Year. H:MM AM/PM`; the period after the year is mandatory.
static DATE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]+,\s+[A-Za-z]+\s+[0-9]{1,2},\s+[0-9]{4}\.\s+[0-9]{1,2}:[0-9]{2}\s*(?i:am|pm)$")
        .unwrap()
});

const STAMP_FORMAT: &str = "%B %d, %Y %I:%M %p";

#[derive(Debug, Clone, Copy)]
pub struct DateRecognizer {
    tz: Tz,
}

impl DateRecognizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn is_date_line(text: &str) -> bool {
        DATE_LINE_RE.is_match(text)
    }

    /// The date line of a card. When several fragments match, the last one wins.
    pub fn find_date_line<S: AsRef<str>>(fragments: &[S]) -> Option<&str> {
        fragments
            .iter()
            .map(AsRef::as_ref)
            .filter(|t| Self::is_date_line(t))
            .last()
    }

    /// Parses a line already accepted by [`Self::is_date_line`].
    ///
    /// The date and time halves are split on the first `.`, the weekday is
    /// dropped at the first `,`, and the rest goes through a strict
    /// full-month-name, 12-hour-clock parse. Abbreviated months ("Nov") and
    /// a meridiem glued to the minutes ("7:30pm") are rejected. During the
    /// autumn DST overlap the later (standard time) instant is chosen; times
    /// that fall in the spring gap do not exist and are rejected.
    pub fn parse(&self, line: &str) -> Result<DateTime<Tz>, DateParseError> {
        let (date_part, time_part) = line
            .split_once('.')
            .ok_or_else(|| DateParseError::new(line, "no '.' between date and time"))?;
        let (_weekday, month_day_year) = date_part
            .split_once(',')
            .ok_or_else(|| DateParseError::new(line, "no ',' after weekday"))?;

        let month_day_year = month_day_year.trim();
        let time_part = time_part.trim();
        // chrono lets a format space match nothing
        if !time_part.contains(char::is_whitespace) {
            return Err(DateParseError::new(line, "no space before AM/PM"));
        }

        let stamp = format!("{} {}", month_day_year, time_part);
        let naive = NaiveDateTime::parse_from_str(&stamp, STAMP_FORMAT)
            .map_err(|e| DateParseError::new(line, e.to_string()))?;

        // %B also accepts "Nov"; only the full name is allowed.
        let month_token = month_day_year.split_whitespace().next().unwrap_or_default();
        let full_name = u8::try_from(naive.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or_default();
        if !month_token.eq_ignore_ascii_case(full_name) {
            return Err(DateParseError::new(
                line,
                format!("'{}' is not a full month name", month_token),
            ));
        }

        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt),
            LocalResult::Ambiguous(_, standard) => Ok(standard),
            // No shift to the standard offset here: a start time that never
            // happens on the wall clock drops the event instead.
            LocalResult::None => Err(DateParseError::new(
                line,
                format!("{} does not exist in {}", naive, self.tz.name()),
            )),
        }
    }
}
