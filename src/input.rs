//! Parsing and validation of user-entered dates and times.

use anyhow::{Context, Result};
use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use dialoguer::Input;
use owo_colors::OwoColorize;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

/// A point in time as the user entered it: either a whole day or a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl When {
    /// Start of the entered moment (midnight for whole days).
    pub fn as_start(self) -> NaiveDateTime {
        match self {
            When::Date(d) => d.and_time(NaiveTime::MIN),
            When::DateTime(dt) => dt,
        }
    }

    /// End of the entered moment (last instant of the day for whole days).
    pub fn as_end(self) -> NaiveDateTime {
        match self {
            When::Date(d) => agenda_core::end_of_day(d),
            When::DateTime(dt) => dt,
        }
    }
}

/// Parse a date or date/time.
///
/// Accepts `YYYY-MM-DD[ HH:MM]`, `DD.MM.YYYY[ HH:MM]`, and natural language
/// such as "tomorrow 3pm".
pub fn parse_when(input: &str) -> Result<When> {
    let input = input.trim();

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
    {
        return Ok(When::DateTime(dt));
    }

    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(input, f).ok())
    {
        return Ok(When::Date(d));
    }

    fuzzydate::parse(input)
        .map(When::DateTime)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))
}

/// Parse a calendar day.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    match parse_when(input)? {
        When::Date(d) => Ok(d),
        When::DateTime(dt) => Ok(dt.date()),
    }
}

/// Apply a duration string like "30m" or "2h" to a start time.
pub fn apply_duration(start: NaiveDateTime, input: &str) -> Result<NaiveDateTime> {
    let std_dur = humantime::parse_duration(input.trim())
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;

    start
        .checked_add_signed(chrono_dur)
        .context("Duration too large")
}

/// Parse an end input: a duration first, then a date/time.
pub fn parse_end(input: &str, start: NaiveDateTime) -> Result<NaiveDateTime> {
    if let Ok(end) = apply_duration(start, input) {
        return Ok(end);
    }

    let cleaned = input
        .strip_prefix("until ")
        .or_else(|| input.strip_prefix("to "))
        .unwrap_or(input);

    Ok(parse_when(cleaned)?.as_end())
}

/// The end must not precede the start and must be at most one year after it.
pub fn validate_end(start: NaiveDateTime, end: NaiveDateTime) -> Result<()> {
    if end < start {
        anyhow::bail!("The end must not be before the start");
    }

    if start.checked_add_months(Months::new(12)).is_some_and(|max| end > max) {
        anyhow::bail!("An appointment may not last longer than one year");
    }

    Ok(())
}

/// Prompt the user with retry on parse errors.
pub fn prompt_with_retry<T, F>(prompt: &str, parse: F) -> Result<T>
where
    F: Fn(&str) -> Result<T>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    // --- parse_when ---

    #[test]
    fn parse_iso_datetime() {
        assert_eq!(parse_when("2024-01-02 09:00").unwrap(), When::DateTime(at(2024, 1, 2, 9, 0)));
        assert_eq!(parse_when("2024-01-02T09:30").unwrap(), When::DateTime(at(2024, 1, 2, 9, 30)));
    }

    #[test]
    fn parse_dotted_formats() {
        assert_eq!(parse_when("02.01.2024 18:45").unwrap(), When::DateTime(at(2024, 1, 2, 18, 45)));
        assert_eq!(
            parse_when("02.01.2024").unwrap(),
            When::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
    }

    #[test]
    fn parse_date_only() {
        assert_eq!(
            parse_when(" 2024-02-29 ").unwrap(),
            When::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
    }

    #[test]
    fn parse_natural_language() {
        assert!(matches!(parse_when("tomorrow 3pm").unwrap(), When::DateTime(_)));
    }

    #[test]
    fn parse_invalid_input() {
        assert!(parse_when("not a date at all xyz").is_err());
    }

    #[test]
    fn parse_date_drops_time() {
        assert_eq!(
            parse_date("2024-01-02 09:00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    // --- When ---

    #[test]
    fn whole_day_bounds() {
        let day = When::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(day.as_start(), at(2024, 1, 2, 0, 0));
        assert_eq!(day.as_end(), agenda_core::end_of_day(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
    }

    // --- durations and ends ---

    #[test]
    fn apply_duration_minutes() {
        assert_eq!(apply_duration(at(2024, 1, 2, 9, 0), "30m").unwrap(), at(2024, 1, 2, 9, 30));
    }

    #[test]
    fn apply_duration_rejects_garbage() {
        assert!(apply_duration(at(2024, 1, 2, 9, 0), "soon").is_err());
    }

    #[test]
    fn parse_end_duration_string() {
        assert_eq!(parse_end("2h", at(2024, 1, 2, 9, 0)).unwrap(), at(2024, 1, 2, 11, 0));
    }

    #[test]
    fn parse_end_until_datetime() {
        assert_eq!(
            parse_end("until 2024-01-02 17:00", at(2024, 1, 2, 9, 0)).unwrap(),
            at(2024, 1, 2, 17, 0)
        );
    }

    #[test]
    fn parse_end_date_is_end_of_day() {
        let end = parse_end("2024-01-03", at(2024, 1, 2, 9, 0)).unwrap();
        assert_eq!(end, agenda_core::end_of_day(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()));
    }

    // --- validate_end ---

    #[test]
    fn end_before_start_is_rejected() {
        assert!(validate_end(at(2024, 1, 2, 9, 0), at(2024, 1, 2, 8, 0)).is_err());
    }

    #[test]
    fn zero_length_is_allowed() {
        assert!(validate_end(at(2024, 1, 2, 9, 0), at(2024, 1, 2, 9, 0)).is_ok());
    }

    #[test]
    fn one_year_is_the_limit() {
        let start = at(2024, 1, 2, 9, 0);
        assert!(validate_end(start, at(2025, 1, 2, 9, 0)).is_ok());
        assert!(validate_end(start, at(2025, 1, 2, 9, 1)).is_err());
    }
}
