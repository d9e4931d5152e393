// File: crates/timetick-core/tests/codec.rs
// Purpose: Validate instant/duration <-> axis number conversions and the epoch contract.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeDelta, TimeZone, Utc};
use timetick_core::{
    date_range, date_to_num, duration_to_num, num_to_date, num_to_duration, seq_to_num,
    AxisContext, Config, TemporalValue, TimetickError,
};

fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, us: u32) -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_micro_opt(h, mi, s, us)
        .unwrap()
        .and_utc()
        .fixed_offset()
}

#[test]
fn noon_after_epoch_is_half_a_day() {
    let ctx = AxisContext::with_defaults();
    assert_eq!(date_to_num(&ctx, instant(1970, 1, 1, 12, 0, 0, 0)), 0.5);
}

#[test]
fn epoch_instant_is_exactly_zero() {
    for epoch in ["1970-01-01T00:00:00", "2000-01-01T00:00:00", "1904-01-01"] {
        let ctx = AxisContext::new(Config {
            epoch: epoch.into(),
            ..Config::default()
        })
        .unwrap();
        let e = ctx.epoch().fixed_offset();
        assert_eq!(date_to_num(&ctx, e), 0.0, "epoch {epoch}");
    }
}

#[test]
fn round_trip_within_a_century_is_microsecond_accurate() {
    let ctx = AxisContext::with_defaults();
    let samples = [
        instant(1970, 1, 1, 0, 0, 0, 1),
        instant(1984, 6, 2, 23, 59, 59, 999_999),
        instant(2024, 7, 15, 3, 4, 5, 123_456),
        instant(2060, 12, 31, 12, 30, 0, 7),
        instant(1902, 2, 3, 4, 5, 6, 789_000),
    ];
    for v in samples {
        let x = date_to_num(&ctx, v);
        let back = num_to_date(&ctx, x, Utc.fix()).unwrap();
        let err = (back - v).num_microseconds().unwrap().abs();
        assert!(err <= 20, "{v} round-tripped with {err} us error");
    }
}

#[test]
fn conversion_is_monotonic() {
    let ctx = AxisContext::with_defaults();
    let samples = [
        instant(1969, 12, 31, 23, 59, 59, 999_999),
        instant(1970, 1, 1, 0, 0, 0, 0),
        instant(1970, 1, 1, 0, 0, 0, 1),
        instant(1999, 3, 4, 0, 0, 0, 0),
        instant(2345, 6, 7, 8, 9, 10, 11),
    ];
    let nums: Vec<f64> = samples.iter().map(|&v| date_to_num(&ctx, v)).collect();
    for w in nums.windows(2) {
        assert!(w[0] < w[1], "expected strictly increasing, got {w:?}");
    }
}

#[test]
fn zoned_inputs_normalize_to_the_same_instant() {
    let ctx = AxisContext::with_defaults();
    let utc = instant(2020, 5, 1, 10, 0, 0, 0);
    let zoned = FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2020, 5, 1, 12, 0, 0)
        .unwrap();
    assert_eq!(date_to_num(&ctx, utc), date_to_num(&ctx, zoned));
}

#[test]
fn missing_sequence_entries_become_nan() {
    let ctx = AxisContext::with_defaults();
    let values = [
        Some(TemporalValue::from(instant(1970, 1, 2, 0, 0, 0, 0))),
        None,
        Some(TemporalValue::Duration(TimeDelta::hours(12))),
    ];
    let nums = seq_to_num(&ctx, &values);
    assert_eq!(nums[0], 1.0);
    assert!(nums[1].is_nan());
    assert_eq!(nums[2], 0.5);
}

#[test]
fn duration_round_trip() {
    let td = TimeDelta::days(3) + TimeDelta::seconds(90) + TimeDelta::microseconds(250);
    assert_eq!(num_to_duration(duration_to_num(td)), td);
    assert_eq!(num_to_duration(duration_to_num(-td)), -td);
}

#[test]
fn decode_outside_calendar_range_fails() {
    let ctx = AxisContext::with_defaults();
    assert!(matches!(
        num_to_date(&ctx, 4_000_000.0, Utc.fix()),
        Err(TimetickError::OutOfRange { .. })
    ));
    assert!(matches!(
        num_to_date(&ctx, -1_000_000.0, Utc.fix()),
        Err(TimetickError::OutOfRange { .. })
    ));
}

#[test]
fn date_range_is_half_open_and_evenly_spaced() {
    let ctx = AxisContext::with_defaults();
    let start = instant(2004, 1, 1, 0, 0, 0, 0);
    let end = instant(2004, 1, 5, 0, 0, 0, 0);
    let nums = date_range(&ctx, start, end, TimeDelta::days(1));
    assert_eq!(nums.len(), 4);
    let first = date_to_num(&ctx, start);
    for (i, &x) in nums.iter().enumerate() {
        assert!((x - (first + i as f64)).abs() < 1e-9);
    }
}
