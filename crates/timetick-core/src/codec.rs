// File: crates/timetick-core/src/codec.rs
// Summary: Bijective mapping between calendar/duration values and f64 day counts.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Offset, TimeDelta, Timelike, Utc};

use crate::context::AxisContext;
use crate::error::{Result, TimetickError};

// Time-related constants.
pub const HOURS_PER_DAY: f64 = 24.0;
pub const MINS_PER_HOUR: f64 = 60.0;
pub const SECS_PER_MIN: f64 = 60.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

pub const DAYS_PER_WEEK: f64 = 7.0;
pub const DAYS_PER_MONTH: f64 = 30.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

pub const MINS_PER_DAY: f64 = MINS_PER_HOUR * HOURS_PER_DAY;
pub const SECS_PER_HOUR: f64 = SECS_PER_MIN * MINS_PER_HOUR;
pub const SECS_PER_DAY: f64 = SECS_PER_HOUR * HOURS_PER_DAY;
pub const MICROS_PER_DAY: f64 = 1e6 * SECS_PER_DAY;

/// Beyond this distance from the epoch (in days) float roundoff exceeds a
/// few microseconds, so decoded sub-seconds are snapped to 20 us.
const PRECISION_LIMIT_DAYS: f64 = 70.0 * 365.0;

/// A point in calendar time or a signed span without a calendar anchor.
///
/// Zoned inputs keep their offset (so converters can recover it as the
/// axis unit) but all arithmetic happens on the underlying UTC instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TemporalValue {
    Instant(DateTime<FixedOffset>),
    Duration(TimeDelta),
}

impl From<DateTime<FixedOffset>> for TemporalValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Instant(dt)
    }
}

impl From<DateTime<Utc>> for TemporalValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Instant(dt.fixed_offset())
    }
}

impl From<NaiveDateTime> for TemporalValue {
    fn from(dt: NaiveDateTime) -> Self {
        // naive datetimes are interpreted as UTC
        Self::Instant(dt.and_utc().fixed_offset())
    }
}

impl From<TimeDelta> for TemporalValue {
    fn from(td: TimeDelta) -> Self {
        Self::Duration(td)
    }
}

/// Resolve a timezone string to a fixed UTC offset.
///
/// Accepted forms are "UTC" (any case), "Z", and offsets such as "+02:00"
/// or "-05:30". Anything else is an error; named zone databases are the
/// host's concern.
pub fn resolve_timezone(spec: &str) -> Result<FixedOffset> {
    if spec.eq_ignore_ascii_case("utc") || spec == "Z" {
        return Ok(Utc.fix());
    }
    spec.parse::<FixedOffset>()
        .map_err(|_| TimetickError::UnknownTimezone(spec.to_string()))
}

/// Convert an instant to days since the context's epoch.
///
/// The subtraction is done at second granularity with the nanosecond
/// remainder added back as a float, preserving dynamic range across
/// millennia while keeping sub-second precision near the epoch.
pub fn date_to_num(ctx: &AxisContext, d: DateTime<FixedOffset>) -> f64 {
    let epoch = ctx.epoch();
    let seconds = (d.timestamp() - epoch.timestamp()) as f64;
    let extra =
        (d.timestamp_subsec_nanos() as f64 - epoch.timestamp_subsec_nanos() as f64) / 1e9;
    (seconds + extra) / SECS_PER_DAY
}

/// Convert a duration to a day count. 1 day 12 hours yields 1.5. No epoch
/// is involved.
pub fn duration_to_num(td: TimeDelta) -> f64 {
    let seconds = td.num_seconds() as f64;
    let extra = td.subsec_nanos() as f64 / 1e9;
    (seconds + extra) / SECS_PER_DAY
}

/// Convert any temporal value to its axis number.
pub fn to_num(ctx: &AxisContext, v: &TemporalValue) -> f64 {
    match v {
        TemporalValue::Instant(dt) => date_to_num(ctx, *dt),
        TemporalValue::Duration(td) => duration_to_num(*td),
    }
}

/// Sequence form of [`to_num`]. Missing entries map to NaN at the matching
/// position rather than failing the whole batch; this is the masked-value
/// contract relied on by hosts with gappy data.
pub fn seq_to_num(ctx: &AxisContext, values: &[Option<TemporalValue>]) -> Vec<f64> {
    values
        .iter()
        .map(|v| v.as_ref().map_or(f64::NAN, |v| to_num(ctx, v)))
        .collect()
}

/// Decode an axis number back to an instant in the requested timezone.
///
/// Fails if the result lands outside calendar years 1-9999. Far from the
/// epoch the sub-second digits are snapped to the nearest 20 us so float
/// jitter does not leak into labels.
pub fn num_to_date(ctx: &AxisContext, x: f64, tz: FixedOffset) -> Result<DateTime<FixedOffset>> {
    if !x.is_finite() {
        return Err(TimetickError::OutOfRange { value: x });
    }
    let micros = (x * MICROS_PER_DAY).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return Err(TimetickError::OutOfRange { value: x });
    }
    let dt = ctx
        .epoch()
        .checked_add_signed(TimeDelta::microseconds(micros as i64))
        .ok_or(TimetickError::OutOfRange { value: x })?;
    if dt.year() < 1 || dt.year() > 9999 {
        return Err(TimetickError::OutOfRange { value: x });
    }
    let dt = dt.with_timezone(&tz);
    if x.abs() > PRECISION_LIMIT_DAYS {
        return Ok(snap_to_20us(dt));
    }
    Ok(dt)
}

fn snap_to_20us(dt: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let micro = dt.nanosecond() / 1_000;
    let snapped = ((micro as f64 / 20.0).round() as u32) * 20;
    if snapped >= 1_000_000 {
        match dt.with_nanosecond(0) {
            Some(d) => d + TimeDelta::seconds(1),
            None => dt,
        }
    } else {
        dt.with_nanosecond(snapped * 1_000).unwrap_or(dt)
    }
}

/// Decode an axis number to a duration. The fraction part represents
/// hours, minutes, seconds.
pub fn num_to_duration(x: f64) -> TimeDelta {
    TimeDelta::microseconds((x * MICROS_PER_DAY).round() as i64)
}

/// Sequence form of [`num_to_date`]; NaN entries decode to None.
pub fn num_seq_to_dates(
    ctx: &AxisContext,
    xs: &[f64],
    tz: FixedOffset,
) -> Result<Vec<Option<DateTime<FixedOffset>>>> {
    xs.iter()
        .map(|&x| {
            if x.is_nan() {
                Ok(None)
            } else {
                num_to_date(ctx, x, tz).map(Some)
            }
        })
        .collect()
}

/// Equally spaced axis numbers covering `[dstart, dend)` in steps of
/// `step`. The end point is excluded; the last emitted value is the
/// largest `dstart + k*step` strictly before `dend`.
pub fn date_range(
    ctx: &AxisContext,
    dstart: DateTime<FixedOffset>,
    dend: DateTime<FixedOffset>,
    step: TimeDelta,
) -> Vec<f64> {
    let f1 = date_to_num(ctx, dstart);
    let f2 = date_to_num(ctx, dend);
    let step_days = duration_to_num(step);
    if step_days <= 0.0 || !f1.is_finite() || !f2.is_finite() {
        return Vec::new();
    }
    let mut num = ((f2 - f1) / step_days).ceil() as i64;
    // half-open interval: back off if the computed endpoint reaches dend
    let mut end = dstart + step * num as i32;
    if end >= dend {
        num -= 1;
        end = dstart + step * num as i32;
    }
    if num < 0 {
        return Vec::new();
    }
    let f2 = date_to_num(ctx, end);
    let n = num as usize + 1;
    if n == 1 {
        return vec![f1];
    }
    let span = f2 - f1;
    (0..n)
        .map(|i| f1 + span * i as f64 / (n - 1) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_timezone_offsets() {
        assert_eq!(resolve_timezone("UTC").unwrap(), Utc.fix());
        assert_eq!(
            resolve_timezone("+02:00").unwrap(),
            FixedOffset::east_opt(2 * 3600).unwrap()
        );
        assert!(matches!(
            resolve_timezone("Mars/Olympus"),
            Err(TimetickError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn duration_num_is_days() {
        let td = TimeDelta::days(1) + TimeDelta::hours(12);
        assert_eq!(duration_to_num(td), 1.5);
        assert_eq!(duration_to_num(-td), -1.5);
    }

    #[test]
    fn num_to_date_range_checked() {
        let ctx = AxisContext::with_defaults();
        let err = num_to_date(&ctx, 1e9, Utc.fix());
        assert!(matches!(err, Err(TimetickError::OutOfRange { .. })));
        assert!(num_to_date(&ctx, f64::NAN, Utc.fix()).is_err());
    }
}
