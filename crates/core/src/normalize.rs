//! Constraint normalization: raw search request to a resolved constraint set

use chrono::Duration;
use tracing::debug;

use slotwise_domain::{
    Result, ScanLimits, SearchConstraints, SlotSearchRequest, SlotwiseError, TimeInterval,
    DEFAULT_END_HOUR, DEFAULT_START_HOUR,
};

use crate::wallclock::{date_string_in_zone, parse_zone};

/// Zone applied when the request names none
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Resolve a raw request into immutable [`SearchConstraints`]
///
/// Everything optional becomes concrete: the start hour comes from the
/// explicit bound or the time-of-day preference, the end hour defaults to
/// 18, and single-day detection compares local date strings in the search
/// zone. Contradictory hour bounds are not an error here; the scanner simply
/// finds nothing and the degeneracy is reported on the response.
pub fn normalize(request: &SlotSearchRequest) -> Result<SearchConstraints> {
    if request.duration_minutes == 0 {
        return Err(SlotwiseError::InvalidInput("duration must be at least one minute".into()));
    }
    for hour in [request.not_before_hour, request.not_after_hour].into_iter().flatten() {
        if hour > 23 {
            return Err(SlotwiseError::InvalidInput(format!("hour {hour} is out of range 0-23")));
        }
    }
    for &weekday in &request.excluded_weekdays {
        if weekday > 6 {
            return Err(SlotwiseError::InvalidInput(format!(
                "weekday {weekday} is out of range 0 (Sunday) - 6 (Saturday)"
            )));
        }
    }

    let timezone = parse_zone(request.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE))?;
    let window = TimeInterval::new(request.window_start, request.window_end)?;

    let start_hour = request
        .not_before_hour
        .unwrap_or_else(|| request.preference.map_or(DEFAULT_START_HOUR, |p| p.start_hour()));
    let end_hour = request.not_after_hour.unwrap_or(DEFAULT_END_HOUR);

    let same_local_date = date_string_in_zone(window.start, timezone)
        == date_string_in_zone(window.end, timezone);
    let single_day_search =
        same_local_date || window.end - window.start < Duration::hours(24);

    let defaults = ScanLimits::default();
    let limits = ScanLimits {
        max_results: request.max_results.unwrap_or(defaults.max_results),
        max_exploration: request.max_exploration.unwrap_or(defaults.max_exploration),
    };

    let constraints = SearchConstraints {
        duration_minutes: request.duration_minutes,
        window,
        timezone,
        start_hour,
        end_hour,
        excluded_weekdays: request.excluded_weekdays.iter().copied().collect(),
        buffer_before_minutes: request.buffer_before_minutes,
        buffer_after_minutes: request.buffer_after_minutes,
        single_day_search,
        explicit_end_hour: request.not_after_hour.is_some(),
        limits,
    };

    debug!(
        start_hour = constraints.start_hour,
        end_hour = constraints.end_hour,
        single_day = constraints.single_day_search,
        timezone = %constraints.timezone,
        "normalized search constraints"
    );

    Ok(constraints)
}
