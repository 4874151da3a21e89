//! Cursor-based slot scanner
//!
//! The scan loop is an explicit state machine: [`step`] is a pure transition
//! function over `(cursor, explored)` that either skips ahead (with a
//! reason), yields a candidate for the busy-calendar check, or reports
//! exhaustion. [`scan`] drives the machine and collects free slots.
//!
//! The cursor advances on a fixed 30-minute grid. Fixed granularity bounds
//! the work and matches common scheduling conventions; a free 25-minute gap
//! starting at :15 may be missed, and that trade is accepted.

use chrono::{DateTime, Duration, Timelike, Utc};
use tracing::debug;

use slotwise_domain::{
    AvailabilitySlot, BusyCalendar, SearchConstraints, TimeInterval, SATURDAY, SUNDAY,
};

use crate::wallclock::{
    at_hour_in_zone, date_string_in_zone, hour_in_zone, minute_in_zone, weekday_in_zone,
};

/// Cursor step granularity
pub const STEP_MINUTES: i64 = 30;

/// Why the scanner skipped past a cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Cursor lands on a weekday the caller excluded
    ExcludedWeekday,
    /// Cursor lands on a weekend during a multi-day search
    Weekend,
    /// Cursor is earlier than the start hour on an otherwise valid day
    BeforeStartHour,
    /// Cursor is past the end hour for the day
    AfterEndHour,
    /// The slot (plus trailing buffer) would run past the end hour
    SlotWouldEndLate,
}

/// Scanner position: the cursor instant and how many candidates were evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    pub cursor: DateTime<Utc>,
    pub explored: u32,
}

/// One transition of the scan state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The cursor violated a constraint; jump to `next` without evaluating
    Skip { reason: SkipReason, next: ScanState },
    /// The cursor satisfies every wall-clock constraint; test `buffered`
    /// against the busy calendar and emit `slot` if it is free
    Candidate { slot: AvailabilitySlot, buffered: TimeInterval, next: ScanState },
    /// Window end or exploration cap reached
    Exhausted,
}

/// Initial scanner state for a search
///
/// Anchors the cursor at the start hour on the window's first local day. When
/// that day is "today" (same local date as `now`) and the anchor is already
/// past, the cursor snaps to the next half-hour boundary at or after `now` so
/// a today search never offers slots in the past. Future-day searches stay
/// anchored at the start hour.
pub fn initial_state(
    constraints: &SearchConstraints,
    now: DateTime<Utc>,
) -> ScanState {
    let zone = constraints.timezone;
    let mut cursor = at_hour_in_zone(constraints.window.start, constraints.start_hour, zone);

    let window_starts_today = date_string_in_zone(constraints.window.start, zone)
        == date_string_in_zone(now, zone);
    if window_starts_today && now > cursor {
        cursor = ceil_to_half_hour(now, constraints);
    }

    ScanState { cursor, explored: 0 }
}

/// Pure transition function of the scan
///
/// Does not consult the busy calendar; candidate overlap testing stays in the
/// driver so every wall-clock rule is testable in isolation.
pub fn step(constraints: &SearchConstraints, state: ScanState) -> Transition {
    let zone = constraints.timezone;
    let cursor = state.cursor;

    if cursor >= constraints.window.end || state.explored >= constraints.limits.max_exploration {
        return Transition::Exhausted;
    }

    let weekday = weekday_in_zone(cursor, zone);
    let hour = hour_in_zone(cursor, zone);
    let next_day = ScanState {
        cursor: at_hour_in_zone(cursor + Duration::hours(24), constraints.start_hour, zone),
        explored: state.explored,
    };

    if constraints.excluded_weekdays.contains(&weekday) {
        return Transition::Skip { reason: SkipReason::ExcludedWeekday, next: next_day };
    }

    // Single-day searches may legitimately target a weekend; the caller asked
    // for that date explicitly.
    if !constraints.single_day_search && (weekday == SATURDAY || weekday == SUNDAY) {
        return Transition::Skip { reason: SkipReason::Weekend, next: next_day };
    }

    if hour < constraints.start_hour {
        let mut snapped = at_hour_in_zone(cursor, constraints.start_hour, zone);
        if snapped <= cursor {
            // A DST fold can reproduce the same instant; force progress.
            snapped = cursor + Duration::minutes(STEP_MINUTES);
        }
        return Transition::Skip {
            reason: SkipReason::BeforeStartHour,
            next: ScanState { cursor: snapped, explored: state.explored },
        };
    }

    if hour > constraints.end_hour {
        return Transition::Skip { reason: SkipReason::AfterEndHour, next: next_day };
    }

    let slot_end = cursor
        + Duration::minutes(i64::from(constraints.duration_minutes))
        + Duration::minutes(i64::from(constraints.buffer_after_minutes));

    // With an explicit end-hour bound the caller owns whether the slot fits;
    // only the start-hour checks above apply.
    if !constraints.explicit_end_hour {
        let end_hour = hour_in_zone(slot_end, zone);
        let end_minute = minute_in_zone(slot_end, zone);
        if end_hour > constraints.end_hour
            || (end_hour == constraints.end_hour && end_minute > 0)
        {
            return Transition::Skip { reason: SkipReason::SlotWouldEndLate, next: next_day };
        }
    }

    let buffered = TimeInterval {
        start: cursor - Duration::minutes(i64::from(constraints.buffer_before_minutes)),
        end: slot_end,
    };
    let slot = AvailabilitySlot::starting_at(cursor, constraints.duration_minutes);
    let next = ScanState {
        cursor: cursor + Duration::minutes(STEP_MINUTES),
        explored: state.explored + 1,
    };

    Transition::Candidate { slot, buffered, next }
}

/// Run a full scan: collect free slots in discovery order, truncated to the
/// result cap
///
/// Exhausting the exploration cap before the window end returns whatever was
/// found; the scan never blocks.
pub fn scan(
    constraints: &SearchConstraints,
    busy: &BusyCalendar,
    now: DateTime<Utc>,
) -> Vec<AvailabilitySlot> {
    let mut state = initial_state(constraints, now);
    let mut slots = Vec::new();

    loop {
        match step(constraints, state) {
            Transition::Exhausted => break,
            Transition::Skip { next, .. } => state = next,
            Transition::Candidate { slot, buffered, next } => {
                if busy.is_free(&buffered) {
                    slots.push(slot);
                }
                state = next;
            }
        }
    }

    debug!(
        found = slots.len(),
        explored = state.explored,
        busy_periods = busy.len(),
        "availability scan complete"
    );

    slots.truncate(constraints.limits.max_results);
    slots
}

/// Ceiling to the local :00/:30 grid; an instant already on the grid is its
/// own boundary
fn ceil_to_half_hour(instant: DateTime<Utc>, constraints: &SearchConstraints) -> DateTime<Utc> {
    let local = instant.with_timezone(&constraints.timezone);
    let overshoot = Duration::minutes(i64::from(local.minute() % 30))
        + Duration::seconds(i64::from(local.second()))
        + Duration::nanoseconds(i64::from(local.nanosecond()));

    if overshoot.is_zero() {
        instant
    } else {
        instant - overshoot + Duration::minutes(STEP_MINUTES)
    }
}
