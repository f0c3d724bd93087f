use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use tracing::debug;

use crate::clock::Clock;
use crate::model::event::CalendarEvent;

/// Lookup capability behind the calendar screen. The sample event table
/// the app ships with is one implementation; a real store would be another.
pub trait EventSource {
    fn events_for(&self, date: NaiveDate) -> Vec<CalendarEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventSource {
    events: HashMap<NaiveDate, Vec<CalendarEvent>>,
}

impl InMemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, title: impl Into<String>) {
        self.events.entry(date).or_default().push(CalendarEvent {
            date,
            title: title.into(),
        });
    }
}

impl EventSource for InMemoryEventSource {
    fn events_for(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        self.events.get(&date).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CalendarError {
    #[display(fmt = "selected date is outside the calendar window")]
    OutOfWindow,
}

/// Workforce calendar screen state. Selection is limited to one year back
/// through one year ahead of today, matching the picker's bounds.
pub struct WorkforceCalendar {
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl WorkforceCalendar {
    pub fn new(clock: &impl Clock) -> Self {
        let today = clock.today();
        Self {
            min_date: today.checked_sub_months(Months::new(12)).unwrap_or(today),
            max_date: today.checked_add_months(Months::new(12)).unwrap_or(today),
        }
    }

    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    pub fn select(
        &self,
        date: NaiveDate,
        source: &impl EventSource,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        if date < self.min_date || date > self.max_date {
            return Err(CalendarError::OutOfWindow);
        }

        let events = source.events_for(date);
        debug!(%date, count = events.len(), "calendar date selected");
        Ok(events)
    }
}
