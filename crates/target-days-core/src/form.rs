//! Raw text input from a user-facing form, and its validation into a [`Request`].
//!
//! Everything the aggregator assumes about its inputs is checked here:
//! dates must parse, `end` must not precede `start`, and hours text is
//! normalized to a number. Bad hours text is not an error; it becomes zero.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aggregate::{AggregationResult, MatchingDays, checked_aggregate, matching_days};
use crate::civil_date::CivilDate;
use crate::error::FormError;
use crate::selection::WeekdaySelection;
use crate::weekday::Weekday;

/// One weekday row of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub weekday: Weekday,
    pub enabled: bool,
    pub hours: String,
}

impl DayEntry {
    pub fn enabled(weekday: Weekday, hours: impl Into<String>) -> Self {
        Self {
            weekday,
            enabled: true,
            hours: hours.into(),
        }
    }

    pub fn disabled(weekday: Weekday, hours: impl Into<String>) -> Self {
        Self {
            weekday,
            enabled: false,
            hours: hours.into(),
        }
    }
}

/// Unvalidated form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub start: String,
    pub end: String,
    pub days: Vec<DayEntry>,
    /// Longest accepted closed interval, in days. Unlimited when `None`.
    #[serde(default)]
    pub max_days: Option<u64>,
}

/// Validated inputs, ready for aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    pub start: CivilDate,
    pub end: CivilDate,
    pub selection: WeekdaySelection,
}

impl Request {
    /// Totals for the request. Fails only if the hours sum does not fit a `Decimal`.
    pub fn aggregate(&self) -> Result<AggregationResult, FormError> {
        checked_aggregate(self.start, self.end, &self.selection).ok_or(FormError::HoursOverflow {
            start: self.start,
            end: self.end,
        })
    }

    pub fn matching_days(&self) -> MatchingDays<'_> {
        matching_days(self.start, self.end, &self.selection)
    }

    /// Number of calendar days in the closed interval.
    pub fn span_days(&self) -> u64 {
        self.start.days_until(self.end).unsigned_abs() + 1
    }
}

impl FormInput {
    pub fn validate(&self) -> Result<Request, FormError> {
        let start = parse_date("start", &self.start)?;
        let end = parse_date("end", &self.end)?;
        if end < start {
            return Err(FormError::RangeOrder { start, end });
        }

        // Later rows for the same weekday replace earlier ones.
        let selection: WeekdaySelection = self
            .days
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| (entry.weekday, parse_hours(&entry.hours)))
            .collect();

        let request = Request {
            start,
            end,
            selection,
        };

        if let Some(max) = self.max_days {
            let days = request.span_days();
            if days > max {
                return Err(FormError::RangeTooLong { days, max });
            }
        }

        debug!(
            start = %request.start,
            end = %request.end,
            selected = request.selection.iter().count(),
            "validated form input"
        );
        Ok(request)
    }
}

/// Validate the form and aggregate in one step.
pub fn calculate(input: &FormInput) -> Result<AggregationResult, FormError> {
    input.validate()?.aggregate()
}

/// Parse a `YYYY-MM-DD` date field. `field` names the input in the error.
pub fn parse_date(field: &'static str, text: &str) -> Result<CivilDate, FormError> {
    CivilDate::parse(text).map_err(|_| FormError::InvalidDate {
        field,
        value: text.to_string(),
    })
}

/// Turn hours text into a number.
///
/// Accepts digits with at most one decimal point and no sign. Empty text, a
/// lone `.`, and anything else that does not fit that shape become zero.
pub fn parse_hours(text: &str) -> Decimal {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let well_formed = [whole, frac]
        .iter()
        .all(|part| part.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        warn!(input = text, "hours input is not numeric, using 0");
        return Decimal::ZERO;
    }
    if whole.is_empty() && frac.is_empty() {
        return Decimal::ZERO;
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let frac = if frac.is_empty() { "0" } else { frac };
    match Decimal::from_str(&format!("{whole}.{frac}")) {
        Ok(hours) => hours.normalize(),
        Err(e) => {
            warn!(input = text, error = %e, "hours input out of range, using 0");
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn form(start: &str, end: &str, days: Vec<DayEntry>) -> FormInput {
        FormInput {
            start: start.to_string(),
            end: end.to_string(),
            days,
            max_days: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> CivilDate {
        CivilDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn parse_hours_accepts_decimals() {
        assert_eq!(parse_hours("2"), dec!(2));
        assert_eq!(parse_hours("2.5"), dec!(2.5));
        assert_eq!(parse_hours(".5"), dec!(0.5));
        assert_eq!(parse_hours("3."), dec!(3));
        assert_eq!(parse_hours(" 7.25 "), dec!(7.25));
        assert_eq!(parse_hours("007"), dec!(7));
    }

    #[test]
    fn parse_hours_normalizes_empty_to_zero() {
        assert_eq!(parse_hours(""), Decimal::ZERO);
        assert_eq!(parse_hours("   "), Decimal::ZERO);
        assert_eq!(parse_hours("."), Decimal::ZERO);
    }

    #[test]
    fn parse_hours_normalizes_garbage_to_zero() {
        assert_eq!(parse_hours("abc"), Decimal::ZERO);
        assert_eq!(parse_hours("1.2.3"), Decimal::ZERO);
        assert_eq!(parse_hours("1e3"), Decimal::ZERO);
        assert_eq!(parse_hours("-4"), Decimal::ZERO);
        assert_eq!(parse_hours("+4"), Decimal::ZERO);
        assert_eq!(parse_hours("99999999999999999999999999999999"), Decimal::ZERO);
    }

    #[test]
    fn validate_builds_request() {
        let input = form(
            "2024-01-01",
            "2024-01-07",
            vec![
                DayEntry::enabled(Weekday::Monday, "2"),
                DayEntry::enabled(Weekday::Wednesday, "3"),
            ],
        );
        let request = input.validate().unwrap();
        assert_eq!(request.start, date(2024, 1, 1));
        assert_eq!(request.end, date(2024, 1, 7));
        assert_eq!(request.selection.hours(Weekday::Monday), dec!(2));
        assert_eq!(request.selection.hours(Weekday::Wednesday), dec!(3));
        assert_eq!(request.span_days(), 7);
    }

    #[test]
    fn calculate_first_week_of_2024() {
        let input = form(
            "2024-01-01",
            "2024-01-07",
            vec![
                DayEntry::enabled(Weekday::Monday, "2"),
                DayEntry::enabled(Weekday::Tuesday, ""),
                DayEntry::enabled(Weekday::Wednesday, "3"),
            ],
        );
        let result = calculate(&input).unwrap();
        assert_eq!(result.total_days, 2);
        assert_eq!(result.total_hours, dec!(5));
    }

    #[test]
    fn disabled_days_are_omitted() {
        let input = form(
            "2024-01-01",
            "2024-01-07",
            vec![
                DayEntry::enabled(Weekday::Monday, "2"),
                DayEntry::disabled(Weekday::Tuesday, "8"),
            ],
        );
        let request = input.validate().unwrap();
        assert_eq!(request.selection.iter().count(), 1);
        assert_eq!(request.aggregate().unwrap().total_hours, dec!(2));
    }

    #[test]
    fn invalid_date_is_rejected() {
        let input = form("2024-02-30", "2024-03-01", vec![]);
        match input.validate() {
            Err(FormError::InvalidDate { field, value }) => {
                assert_eq!(field, "start");
                assert_eq!(value, "2024-02-30");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }

        let input = form("2024-01-01", "next week", vec![]);
        assert!(matches!(
            input.validate(),
            Err(FormError::InvalidDate { field: "end", .. })
        ));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let input = form(
            "2024-01-05",
            "2024-01-01",
            vec![DayEntry::enabled(Weekday::Monday, "1")],
        );
        let err = calculate(&input).unwrap_err();
        assert!(matches!(err, FormError::RangeOrder { .. }));
        assert!(
            err.to_string()
                .starts_with("End date must be same or after start date.")
        );
    }

    #[test]
    fn same_day_range_is_accepted() {
        let input = form(
            "2024-03-10",
            "2024-03-10",
            vec![DayEntry::enabled(Weekday::Sunday, "4")],
        );
        let result = calculate(&input).unwrap();
        assert_eq!(result.total_days, 1);
        assert_eq!(result.total_hours, dec!(4));
    }

    #[test]
    fn max_days_ceiling() {
        let mut input = form("2024-01-01", "2024-01-10", vec![]);
        input.max_days = Some(10);
        assert!(input.validate().is_ok());

        input.max_days = Some(9);
        match input.validate() {
            Err(FormError::RangeTooLong { days, max }) => {
                assert_eq!(days, 10);
                assert_eq!(max, 9);
            }
            other => panic!("expected RangeTooLong, got {other:?}"),
        }
    }

    #[test]
    fn huge_hours_overflow_is_an_error() {
        // Largest value parse_hours accepts, on two Mondays.
        let input = form(
            "2024-01-01",
            "2024-01-14",
            vec![DayEntry::enabled(
                Weekday::Monday,
                "79228162514264337593543950335",
            )],
        );
        assert_eq!(
            input.validate().unwrap().selection.hours(Weekday::Monday),
            Decimal::MAX
        );
        match calculate(&input) {
            Err(FormError::HoursOverflow { start, end }) => {
                assert_eq!(start, date(2024, 1, 1));
                assert_eq!(end, date(2024, 1, 14));
            }
            other => panic!("expected HoursOverflow, got {other:?}"),
        }
    }

    #[test]
    fn huge_hours_on_one_day_fits() {
        let input = form(
            "2024-01-01",
            "2024-01-07",
            vec![DayEntry::enabled(
                Weekday::Monday,
                "79228162514264337593543950335",
            )],
        );
        let result = calculate(&input).unwrap();
        assert_eq!(result.total_days, 1);
        assert_eq!(result.total_hours, Decimal::MAX);
    }

    #[test]
    fn unpadded_date_is_rejected() {
        let input = form("2024-1-5", "2024-01-10", vec![]);
        assert!(matches!(
            input.validate(),
            Err(FormError::InvalidDate { field: "start", .. })
        ));
    }

    #[test]
    fn later_entry_for_same_day_wins() {
        let input = form(
            "2024-01-01",
            "2024-01-01",
            vec![
                DayEntry::enabled(Weekday::Monday, "2"),
                DayEntry::enabled(Weekday::Monday, "5"),
            ],
        );
        assert_eq!(calculate(&input).unwrap().total_hours, dec!(5));
    }

    #[test]
    fn form_input_deserializes_without_max_days() {
        let json = r#"{
            "start": "2024-01-01",
            "end": "2024-01-07",
            "days": [{ "weekday": "monday", "enabled": true, "hours": "2" }]
        }"#;
        let input: FormInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.max_days, None);
        assert_eq!(input.days, vec![DayEntry::enabled(Weekday::Monday, "2")]);
    }
}
