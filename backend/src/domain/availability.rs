//! Free slot computation.
//!
//! Slots are cut from each working window of each working day, aligned to
//! the slot length measured from the Unix epoch, and dropped when a busy
//! range overlaps them. The computation is pure: busy data is fetched by the
//! caller.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use super::calendar::{LocalDateRange, WorkingCalendar};
use super::interval::{BusyRange, TimeInterval};

/// A bookable slot of exactly one slot length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AvailabilitySlot(TimeInterval);

impl AvailabilitySlot {
    /// Slot bounds.
    pub const fn interval(&self) -> &TimeInterval {
        &self.0
    }

    /// Slot start instant.
    pub const fn start(&self) -> DateTime<Utc> {
        self.0.start()
    }

    /// Slot end instant, exclusive.
    pub const fn end(&self) -> DateTime<Utc> {
        self.0.end()
    }
}

/// Compute the ordered free slots of `calendar` over `range`.
///
/// `busy` should hold the scheduled intervals intersecting the query window;
/// order does not matter for correctness. Non-working days and an empty
/// working-day set contribute no slots.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use clinic_backend::domain::{
///     LocalDateRange, TimeZonePolicy, WorkingCalendar, WorkingCalendarDraft,
///     compute_availability,
/// };
///
/// let calendar =
///     WorkingCalendar::new(WorkingCalendarDraft::clinic_default(), TimeZonePolicy::Strict)
///         .unwrap();
/// let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let range = LocalDateRange::new(monday, monday).unwrap();
///
/// assert_eq!(compute_availability(&calendar, &range, &[]).len(), 14);
/// ```
pub fn compute_availability(
    calendar: &WorkingCalendar,
    range: &LocalDateRange,
    busy: &[BusyRange],
) -> Vec<AvailabilitySlot> {
    let slot_length = calendar.slot_length();
    range
        .days()
        .filter(|day| calendar.is_working_day(*day))
        .flat_map(|day| calendar.day_windows(day))
        .flat_map(|window| slots_in_window(&window, slot_length, busy))
        .collect()
}

fn slots_in_window(
    window: &TimeInterval,
    slot_length: TimeDelta,
    busy: &[BusyRange],
) -> Vec<AvailabilitySlot> {
    let mut slots = Vec::new();
    let Some(mut cursor) = align_up(window.start(), slot_length) else {
        return slots;
    };

    while let Some(end) = cursor.checked_add_signed(slot_length) {
        if end > window.end() {
            break;
        }
        let Ok(candidate) = TimeInterval::new(cursor, end) else {
            break;
        };
        if !busy.iter().any(|range| range.blocks(&candidate)) {
            slots.push(AvailabilitySlot(candidate));
        }
        cursor = end;
    }
    slots
}

/// First instant at or after `instant` that is a whole multiple of
/// `slot_length` since the epoch.
fn align_up(instant: DateTime<Utc>, slot_length: TimeDelta) -> Option<DateTime<Utc>> {
    let step = slot_length.num_seconds();
    if step <= 0 {
        return None;
    }
    let seconds = instant.timestamp();
    let remainder = seconds.rem_euclid(step);
    if remainder == 0 && instant.timestamp_subsec_nanos() == 0 {
        return Some(instant);
    }
    DateTime::from_timestamp(seconds - remainder + step, 0)
}

#[cfg(test)]
#[path = "availability_tests.rs"]
mod tests;
