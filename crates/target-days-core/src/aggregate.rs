use std::fmt;
use std::iter::FusedIterator;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::civil_date::{CivilDate, DateRange};
use crate::selection::WeekdaySelection;

/// Totals over a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub total_days: u64,
    pub total_hours: Decimal,
}

impl AggregationResult {
    /// Hours rounded to two decimal places with trailing zeros dropped, for display.
    pub fn display_hours(&self) -> Decimal {
        self.total_hours
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
    }
}

impl fmt::Display for AggregationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Number of target days: {}, Total hours: {}",
            self.total_days,
            self.display_hours()
        )
    }
}

/// A date that counted towards a total, and what it contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedDay {
    pub date: CivilDate,
    pub hours: Decimal,
}

/// Count the days in `[start, end]` whose weekday is selected with non-zero hours,
/// and sum those hours.
///
/// If `end < start` the range is empty and the result is all zeros. An hours
/// sum beyond the range of `Decimal` saturates at `Decimal::MAX` (or
/// `Decimal::MIN`); use [`checked_aggregate`] to detect that instead.
pub fn aggregate(start: CivilDate, end: CivilDate, selection: &WeekdaySelection) -> AggregationResult {
    let result = matching_days(start, end, selection).fold(
        AggregationResult::default(),
        |mut acc, day| {
            acc.total_days += 1;
            acc.total_hours = acc.total_hours.saturating_add(day.hours);
            acc
        },
    );
    log_result(start, end, &result);
    result
}

/// Like [`aggregate`], but `None` if the hours sum overflows.
pub fn checked_aggregate(
    start: CivilDate,
    end: CivilDate,
    selection: &WeekdaySelection,
) -> Option<AggregationResult> {
    let result = matching_days(start, end, selection).try_fold(
        AggregationResult::default(),
        |acc, day| {
            Some(AggregationResult {
                total_days: acc.total_days + 1,
                total_hours: acc.total_hours.checked_add(day.hours)?,
            })
        },
    )?;
    log_result(start, end, &result);
    Some(result)
}

fn log_result(start: CivilDate, end: CivilDate, result: &AggregationResult) {
    tracing::debug!(
        %start,
        %end,
        total_days = result.total_days,
        total_hours = %result.total_hours,
        "aggregated range"
    );
}

/// Every date in `[start, end]` that [`aggregate`] would count, in order.
pub fn matching_days(start: CivilDate, end: CivilDate, selection: &WeekdaySelection) -> MatchingDays<'_> {
    MatchingDays {
        days: start.days_through(end),
        selection,
    }
}

#[derive(Debug, Clone)]
pub struct MatchingDays<'a> {
    days: DateRange,
    selection: &'a WeekdaySelection,
}

impl Iterator for MatchingDays<'_> {
    type Item = MatchedDay;

    fn next(&mut self) -> Option<MatchedDay> {
        let selection = self.selection;
        self.days.find_map(|date| {
            let hours = selection.hours(date.weekday());
            (!hours.is_zero()).then_some(MatchedDay { date, hours })
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.days.size_hint().1)
    }
}

impl FusedIterator for MatchingDays<'_> {}
