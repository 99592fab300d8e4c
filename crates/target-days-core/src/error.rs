use thiserror::Error;

use crate::civil_date::CivilDate;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid date '{value}': {source}")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid date '{0}': expected zero-padded YYYY-MM-DD")]
    DateFormat(String),

    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),
}

/// Errors surfaced to the user by the form boundary. Computation is never
/// attempted when one of these is returned.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Invalid start or end date. ({field}: '{value}')")]
    InvalidDate { field: &'static str, value: String },

    #[error("End date must be same or after start date. ({start} > {end})")]
    RangeOrder { start: CivilDate, end: CivilDate },

    #[error("Date range spans {days} day(s), more than the allowed {max}")]
    RangeTooLong { days: u64, max: u64 },

    #[error("Total hours from {start} to {end} exceed the largest representable value")]
    HoursOverflow { start: CivilDate, end: CivilDate },
}
