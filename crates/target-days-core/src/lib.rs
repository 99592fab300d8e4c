pub mod aggregate;
pub mod civil_date;
pub mod error;
pub mod form;
pub mod selection;
pub mod weekday;

pub use aggregate::{AggregationResult, MatchedDay, aggregate, checked_aggregate, matching_days};
pub use civil_date::CivilDate;
pub use selection::WeekdaySelection;
pub use weekday::Weekday;
