use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use tracing::debug;

use crate::dto::EventMapQuery;
use crate::error::{AppError, Result};
use crate::models::BoundingBox;

/// Parse `minLat,minLon,maxLat,maxLon`. Blank input means no filter.
///
/// Range checks belong to request validation; this only converts.
pub fn parse_bounding_box(raw: Option<&str>) -> Result<Option<BoundingBox>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let values = crate::validation::split_components(raw)
        .into_iter()
        .map(|c| c.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()
        .map_err(|_| {
            AppError::InvalidParameter(format!("Invalid numeric format in bounding box: {raw}"))
        })?;

    match values.as_slice() {
        &[min_lat, min_lon, max_lat, max_lon] => Ok(Some(BoundingBox {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })),
        _ => Err(AppError::InvalidParameter(format!(
            "Bounding box must have 4 components: {raw}"
        ))),
    }
}

/// Resolve optional bounds into a concrete window.
///
/// A missing side is derived from the other one and `window_hours`; with no
/// bounds at all the window ends at `now`. Bounds that cannot be shifted by the
/// window without leaving chrono's range are an `InvalidParameter`.
pub fn create_date_range(
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    window_hours: i64,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let window = TimeDelta::try_hours(window_hours).ok_or_else(|| {
        AppError::InvalidParameter(format!("Event window of {window_hours} hours is out of range"))
    })?;
    let range = match (since, until) {
        (Some(start), Some(end)) => (start, end),
        (Some(start), None) => (start, shift(start, window, "since")?),
        (None, Some(end)) => (shift(end, -window, "until")?, end),
        (None, None) => (shift(now, -window, "now")?, now),
    };
    debug!(start = %range.0, end = %range.1, window_hours, "resolved date range");
    Ok(range)
}

/// Date window of a map query: `since` from its first instant, `until`
/// through its last day, `date` as a whole day when neither is set
pub fn date_range_for_query(
    query: &EventMapQuery,
    window_hours: i64,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    if query.since.is_none() && query.until.is_none() {
        if let Some(day) = query.date {
            return Ok((start_of_day(day), start_of_next_day(day, "date")?));
        }
    }

    create_date_range(
        query.since.map(start_of_day),
        query.until.map(|d| start_of_next_day(d, "until")).transpose()?,
        window_hours,
        now,
    )
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn start_of_next_day(day: NaiveDate, param: &str) -> Result<DateTime<Utc>> {
    shift(start_of_day(day), TimeDelta::days(1), param)
}

fn shift(at: DateTime<Utc>, delta: TimeDelta, param: &str) -> Result<DateTime<Utc>> {
    at.checked_add_signed(delta).ok_or_else(|| {
        AppError::InvalidParameter(format!(
            "Invalid value for '{param}': {} is outside the supported date range",
            at.date_naive()
        ))
    })
}
