use time::macros::format_description;
use time::{Date, Month};

use super::SourceError;

/// Inclusive range of calendar months, e.g. `2024-01` through `2024-03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    start: Date,
    end: Date,
}

impl MonthRange {
    /// Parses `YYYY-MM` bounds. The start month must not come after the end month.
    ///
    /// # Examples
    ///
    /// ```
    /// use noteqa::source::MonthRange;
    ///
    /// let range = MonthRange::parse("2024-01", "2024-02").unwrap();
    /// assert_eq!(range.first_day(), "2024-01-01");
    /// assert_eq!(range.last_day(), "2024-02-29");
    /// ```
    pub fn parse(start_month: &str, end_month: &str) -> Result<Self, SourceError> {
        let start = parse_month(start_month)?;
        let end_first = parse_month(end_month)?;
        if start > end_first {
            return Err(SourceError::InvalidQuery(format!(
                "start month {start_month} is after end month {end_month}"
            )));
        }

        Ok(Self {
            start,
            end: last_day_of_month(end_first)?,
        })
    }

    /// First day of the start month, `YYYY-MM-DD`.
    pub fn first_day(&self) -> String {
        iso(self.start)
    }

    /// Last day of the end month, `YYYY-MM-DD`.
    pub fn last_day(&self) -> String {
        iso(self.end)
    }

    /// `YYYY-MM` of the start month.
    pub fn start_month(&self) -> String {
        format!("{:04}-{:02}", self.start.year(), u8::from(self.start.month()))
    }

    /// `YYYY-MM` of the end month.
    pub fn end_month(&self) -> String {
        format!("{:04}-{:02}", self.end.year(), u8::from(self.end.month()))
    }
}

/// Logical filter handed to every row source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    /// Case-insensitive substring of the author's name.
    pub author_pattern: String,
    pub months: MonthRange,
}

impl NoteQuery {
    pub fn new(author_pattern: impl Into<String>, months: MonthRange) -> Self {
        Self {
            author_pattern: author_pattern.into(),
            months,
        }
    }
}

fn parse_month(raw: &str) -> Result<Date, SourceError> {
    let invalid = || SourceError::InvalidQuery(format!("expected YYYY-MM, got '{raw}'"));

    let raw = raw.trim();
    if raw.len() != 7 {
        return Err(invalid());
    }

    Date::parse(&format!("{raw}-01"), format_description!("[year]-[month]-[day]"))
        .map_err(|_| invalid())
}

fn last_day_of_month(first: Date) -> Result<Date, SourceError> {
    let (year, month) = match first.month() {
        Month::December => (first.year() + 1, Month::January),
        m => (first.year(), m.next()),
    };

    Date::from_calendar_date(year, month, 1)
        .ok()
        .and_then(Date::previous_day)
        .ok_or_else(|| SourceError::InvalidQuery(format!("month out of range: {}", iso(first))))
}

fn iso(date: Date) -> String {
    date.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_cover_whole_months() {
        let range = MonthRange::parse("2024-01", "2024-02").unwrap();
        assert_eq!(range.first_day(), "2024-01-01");
        assert_eq!(range.last_day(), "2024-02-29");

        let range = MonthRange::parse("2023-11", "2023-12").unwrap();
        assert_eq!(range.last_day(), "2023-12-31");
        assert_eq!(range.start_month(), "2023-11");
        assert_eq!(range.end_month(), "2023-12");
    }

    #[test]
    fn single_month_range_is_valid() {
        let range = MonthRange::parse("2025-04", "2025-04").unwrap();
        assert_eq!(range.first_day(), "2025-04-01");
        assert_eq!(range.last_day(), "2025-04-30");
    }

    #[test]
    fn rejects_malformed_months() {
        for bad in ["2024-13", "2024-1", "24-01", "2024/01", "", "abcd-ef"] {
            let result = MonthRange::parse(bad, "2024-12");
            assert!(
                matches!(result, Err(SourceError::InvalidQuery(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn rejects_inverted_range() {
        let result = MonthRange::parse("2024-05", "2024-01");
        assert!(matches!(result, Err(SourceError::InvalidQuery(_))));
    }
}
