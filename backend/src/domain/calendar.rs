//! Practitioner working calendars and local-to-UTC resolution.
//!
//! A calendar describes when a practitioner accepts bookings: an IANA time
//! zone, opening hours, an optional lunch break, the slot length and the
//! working weekdays. Local wall-clock times are turned into UTC instants per
//! date, so daylight-saving changes move the UTC window rather than the
//! local one.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::warn;

use super::interval::{IntervalError, TimeInterval};

/// Shortest accepted slot length in minutes.
pub const MIN_SLOT_MINUTES: u32 = 5;
/// Longest accepted slot length in minutes.
pub const MAX_SLOT_MINUTES: u32 = 240;

const fn clock(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time,
        None => panic!("invalid clock time"),
    }
}

const DEFAULT_OPEN: NaiveTime = clock(9, 0);
const DEFAULT_CLOSE: NaiveTime = clock(17, 0);
const DEFAULT_LUNCH_START: NaiveTime = clock(12, 0);
const DEFAULT_LUNCH_END: NaiveTime = clock(13, 0);
const DEFAULT_SLOT_MINUTES: u32 = 30;

/// How an unresolvable time zone identifier is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZonePolicy {
    /// Reject the calendar.
    #[default]
    Strict,
    /// Resolve to UTC and log a warning.
    FallbackToUtc,
}

/// Error returned when a time zone policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time zone policy `{0}` (expected `strict` or `fallback-utc`)")]
pub struct TimeZonePolicyParseError(String);

impl FromStr for TimeZonePolicy {
    type Err = TimeZonePolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "fallback-utc" | "fallback_utc" | "fallback-to-utc" => Ok(Self::FallbackToUtc),
            other => Err(TimeZonePolicyParseError(other.to_owned())),
        }
    }
}

/// Validation errors raised while building a [`WorkingCalendar`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarValidationError {
    /// The zone identifier is not in the IANA database.
    #[error("unknown time zone identifier `{id}`")]
    UnknownTimeZone { id: String },
    /// Closing time is not after opening time.
    #[error("close time {close} must be after open time {open}")]
    CloseNotAfterOpen { open: NaiveTime, close: NaiveTime },
    /// Lunch break ends before or when it starts.
    #[error("lunch end {end} must be after lunch start {start}")]
    LunchEndNotAfterStart { start: NaiveTime, end: NaiveTime },
    /// Lunch break starts before opening or ends after closing.
    #[error("lunch {start}-{end} must lie within opening hours {open}-{close}")]
    LunchOutsideOpeningHours {
        start: NaiveTime,
        end: NaiveTime,
        open: NaiveTime,
        close: NaiveTime,
    },
    /// Slot length is outside the accepted range.
    #[error(
        "slot length must be between {min} and {max} minutes, got {minutes}",
        min = MIN_SLOT_MINUTES,
        max = MAX_SLOT_MINUTES
    )]
    SlotLengthOutOfRange { minutes: u32 },
}

/// Set of weekdays on which a practitioner works.
///
/// Stored as a seven-bit mask, Monday in the lowest bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WorkingDays(u8);

impl WorkingDays {
    const MASK: u8 = 0b111_1111;

    /// No working days at all.
    pub const NONE: Self = Self(0);

    /// Monday to Friday.
    pub const fn weekdays() -> Self {
        Self(0b001_1111)
    }

    /// Rebuild from a stored bit mask; bits above Sunday are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    /// Bit mask representation for storage.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Add a day to the set.
    #[must_use]
    pub const fn with(self, day: Weekday) -> Self {
        Self(self.0 | Self::bit(day))
    }

    /// Whether the set contains `day`.
    pub const fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// Whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the days in Monday-first order.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(move |day| self.contains(*day))
    }

    const fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }
}

impl FromIterator<Weekday> for WorkingDays {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// Lunch break inside the working day; no slots are offered during it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunchBreak {
    start: NaiveTime,
    end: NaiveTime,
}

impl LunchBreak {
    /// Local start of the break.
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    /// Local end of the break.
    pub const fn end(&self) -> NaiveTime {
        self.end
    }
}

/// Unvalidated calendar input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCalendarDraft {
    pub time_zone_id: String,
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub lunch_break: Option<(NaiveTime, NaiveTime)>,
    pub slot_minutes: u32,
    pub working_days: WorkingDays,
}

impl WorkingCalendarDraft {
    /// Clinic defaults: UTC, 09:00-17:00, lunch 12:00-13:00, 30-minute slots,
    /// Monday to Friday.
    pub fn clinic_default() -> Self {
        Self {
            time_zone_id: "UTC".to_owned(),
            open: DEFAULT_OPEN,
            close: DEFAULT_CLOSE,
            lunch_break: Some((DEFAULT_LUNCH_START, DEFAULT_LUNCH_END)),
            slot_minutes: DEFAULT_SLOT_MINUTES,
            working_days: WorkingDays::weekdays(),
        }
    }
}

/// Validated working calendar.
///
/// ## Invariants
/// - `close > open`.
/// - When a lunch break is present, its end is after its start and it lies
///   within `[open, close]`.
/// - `slot_minutes` lies in `MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCalendar {
    time_zone_id: String,
    time_zone: Tz,
    open: NaiveTime,
    close: NaiveTime,
    lunch_break: Option<LunchBreak>,
    slot_minutes: u32,
    working_days: WorkingDays,
}

impl WorkingCalendar {
    /// Validate a draft, resolving its zone under `policy`.
    ///
    /// An empty zone identifier means UTC regardless of the policy.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveTime;
    /// use clinic_backend::domain::{TimeZonePolicy, WorkingCalendar, WorkingCalendarDraft};
    ///
    /// let mut draft = WorkingCalendarDraft::clinic_default();
    /// draft.close = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
    /// assert!(WorkingCalendar::new(draft, TimeZonePolicy::Strict).is_err());
    /// ```
    pub fn new(
        draft: WorkingCalendarDraft,
        policy: TimeZonePolicy,
    ) -> Result<Self, CalendarValidationError> {
        let WorkingCalendarDraft {
            time_zone_id,
            open,
            close,
            lunch_break,
            slot_minutes,
            working_days,
        } = draft;

        if close <= open {
            return Err(CalendarValidationError::CloseNotAfterOpen { open, close });
        }
        let lunch_break = match lunch_break {
            Some((start, end)) if end <= start => {
                return Err(CalendarValidationError::LunchEndNotAfterStart { start, end });
            }
            Some((start, end)) if start < open || end > close => {
                return Err(CalendarValidationError::LunchOutsideOpeningHours {
                    start,
                    end,
                    open,
                    close,
                });
            }
            Some((start, end)) => Some(LunchBreak { start, end }),
            None => None,
        };
        if !(MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&slot_minutes) {
            return Err(CalendarValidationError::SlotLengthOutOfRange {
                minutes: slot_minutes,
            });
        }
        let time_zone = resolve_time_zone(&time_zone_id, policy)?;

        Ok(Self {
            time_zone_id,
            time_zone,
            open,
            close,
            lunch_break,
            slot_minutes,
            working_days,
        })
    }

    /// Zone identifier as configured.
    pub fn time_zone_id(&self) -> &str {
        self.time_zone_id.as_str()
    }

    /// Zone used for local-time resolution.
    pub const fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Local opening time.
    pub const fn open(&self) -> NaiveTime {
        self.open
    }

    /// Local closing time.
    pub const fn close(&self) -> NaiveTime {
        self.close
    }

    /// Optional lunch break.
    pub const fn lunch_break(&self) -> Option<LunchBreak> {
        self.lunch_break
    }

    /// Slot length in minutes.
    pub const fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    /// Slot length as a duration.
    pub fn slot_length(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.slot_minutes))
    }

    /// Working weekdays.
    pub const fn working_days(&self) -> WorkingDays {
        self.working_days
    }

    /// Whether `date` falls on a working weekday.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_days.contains(date.weekday())
    }

    /// Convert a local wall-clock time on `date` to UTC.
    ///
    /// Ambiguous times (clocks going back) take the earlier instant. Times
    /// inside a gap (clocks going forward) use the offset in force before the
    /// gap, which lands the same distance past the transition.
    pub fn local_to_utc(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let local = date.and_time(time);
        match self.time_zone.from_local_datetime(&local) {
            LocalResult::Single(resolved) => resolved.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                let before_gap = self
                    .time_zone
                    .offset_from_utc_datetime(&(local - TimeDelta::days(1)))
                    .fix();
                let shifted = local - TimeDelta::seconds(i64::from(before_gap.local_minus_utc()));
                Utc.from_utc_datetime(&shifted)
            }
        }
    }

    /// Bookable UTC windows on `date`: the whole day, or morning and
    /// afternoon around the lunch break. Empty windows are dropped.
    pub fn day_windows(&self, date: NaiveDate) -> Vec<TimeInterval> {
        let bounds = match self.lunch_break {
            Some(lunch) => vec![(self.open, lunch.start), (lunch.end, self.close)],
            None => vec![(self.open, self.close)],
        };
        bounds
            .into_iter()
            .filter_map(|(from, to)| {
                TimeInterval::new(self.local_to_utc(date, from), self.local_to_utc(date, to)).ok()
            })
            .collect()
    }

    /// UTC window covering every slot in `range`: opening on the first day to
    /// closing on the last, widened to any day window that resolves outside
    /// those bounds across a DST gap.
    pub fn query_window(&self, range: &LocalDateRange) -> Result<TimeInterval, IntervalError> {
        let start = self
            .day_windows(range.from())
            .iter()
            .map(TimeInterval::start)
            .fold(self.local_to_utc(range.from(), self.open), Ord::min);
        let end = self
            .day_windows(range.to())
            .iter()
            .map(TimeInterval::end)
            .fold(self.local_to_utc(range.to(), self.close), Ord::max);
        TimeInterval::new(start, end)
    }
}

fn resolve_time_zone(id: &str, policy: TimeZonePolicy) -> Result<Tz, CalendarValidationError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Ok(chrono_tz::UTC);
    }
    match (trimmed.parse::<Tz>(), policy) {
        (Ok(zone), _) => Ok(zone),
        (Err(_), TimeZonePolicy::Strict) => Err(CalendarValidationError::UnknownTimeZone {
            id: trimmed.to_owned(),
        }),
        (Err(_), TimeZonePolicy::FallbackToUtc) => {
            warn!(time_zone_id = trimmed, "unknown time zone; falling back to UTC");
            Ok(chrono_tz::UTC)
        }
    }
}

/// Error returned when a date range is inverted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("toDate {to} must not be before fromDate {from}")]
pub struct DateRangeError {
    from: NaiveDate,
    to: NaiveDate,
}

/// Closed range of local calendar dates `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl LocalDateRange {
    /// Build a range; `to == from` is a single day.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DateRangeError> {
        if to < from {
            return Err(DateRangeError { from, to });
        }
        Ok(Self { from, to })
    }

    /// First date.
    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last date, inclusive.
    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    /// Iterate every date in the range.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let to = self.to;
        self.from.iter_days().take_while(move |day| *day <= to)
    }
}

impl fmt::Display for LocalDateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.from, self.to)
    }
}

#[cfg(test)]
#[path = "calendar_tests.rs"]
mod tests;
