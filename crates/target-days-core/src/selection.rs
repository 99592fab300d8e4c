use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::weekday::Weekday;

/// Hours assigned to each chosen weekday.
///
/// A weekday with no entry behaves exactly like one mapped to zero hours.
/// Values are stored as given; sign is not checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Weekday, Decimal>", into = "BTreeMap<Weekday, Decimal>")]
pub struct WeekdaySelection {
    hours: [Option<Decimal>; 7],
}

impl WeekdaySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, day: Weekday, hours: Decimal) -> Self {
        self.set(day, hours);
        self
    }

    pub fn set(&mut self, day: Weekday, hours: Decimal) {
        self.hours[day.index()] = Some(hours);
    }

    pub fn clear(&mut self, day: Weekday) {
        self.hours[day.index()] = None;
    }

    /// Hours for `day`, zero when absent.
    pub fn hours(&self, day: Weekday) -> Decimal {
        self.hours[day.index()].unwrap_or(Decimal::ZERO)
    }

    /// Whether `day` contributes to a total. Explicit zero counts as unselected.
    pub fn is_selected(&self, day: Weekday) -> bool {
        !self.hours(day).is_zero()
    }

    /// Explicit entries, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, Decimal)> + '_ {
        Weekday::ALL
            .into_iter()
            .filter_map(|day| self.hours[day.index()].map(|h| (day, h)))
    }

    pub fn is_empty(&self) -> bool {
        self.hours.iter().all(Option::is_none)
    }
}

impl FromIterator<(Weekday, Decimal)> for WeekdaySelection {
    fn from_iter<I: IntoIterator<Item = (Weekday, Decimal)>>(iter: I) -> Self {
        let mut selection = Self::new();
        for (day, hours) in iter {
            selection.set(day, hours);
        }
        selection
    }
}

impl From<BTreeMap<Weekday, Decimal>> for WeekdaySelection {
    fn from(map: BTreeMap<Weekday, Decimal>) -> Self {
        map.into_iter().collect()
    }
}

impl From<WeekdaySelection> for BTreeMap<Weekday, Decimal> {
    fn from(selection: WeekdaySelection) -> Self {
        selection.iter().collect()
    }
}
