// File: crates/timetick-core/tests/formatter.rs
// Purpose: Validate fixed, threshold-table and concise label generation.

use std::sync::Arc;

use chrono::{NaiveDate, Offset, Utc};
use timetick_core::{
    date_to_num, format_duration_num, AutoDateFormatter, AxisContext, ConciseDateFormatter,
    ConciseTimedeltaFormatter, Config, ConverterChoice, ConverterRegistry, DurationFormatter,
    HostAxis, ScaledFormat, TickFormatter, TickLocator, TickPlan, TimetickError,
};

fn ctx() -> Arc<AxisContext> {
    Arc::new(AxisContext::with_defaults())
}

fn num(ctx: &AxisContext, y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, us: u32) -> f64 {
    let dt = NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_micro_opt(h, mi, s, us)
        .unwrap()
        .and_utc()
        .fixed_offset();
    date_to_num(ctx, dt)
}

fn day_plan(positions: Vec<f64>) -> TickPlan {
    TickPlan {
        positions,
        unit_days: 1.0,
        interval: 1,
    }
}

#[test]
fn duration_pattern_total_hours() {
    // 1 day 12 hours rendered as total hours
    assert_eq!(format_duration_num(1.5, "%>H:%M").unwrap(), "36:00");
}

#[test]
fn concise_day_ticks_use_month_zero_label_and_offset() {
    let ctx = ctx();
    let fmt = ConciseDateFormatter::new(ctx.clone(), Utc.fix());
    let positions: Vec<f64> = (1..=4).map(|d| num(&ctx, 2005, 2, d, 0, 0, 0, 0)).collect();
    let out = fmt.format_ticks(&day_plan(positions)).unwrap();
    assert_eq!(out.labels, vec!["Feb", "02", "03", "04"]);
    assert_eq!(out.offset, "2005-Feb");
}

#[test]
fn concise_formatting_is_idempotent() {
    let ctx = ctx();
    let fmt = ConciseDateFormatter::new(ctx.clone(), Utc.fix());
    let positions: Vec<f64> = (1..=6).map(|d| num(&ctx, 2005, 2, d, 0, 0, 0, 0)).collect();
    let plan = day_plan(positions);
    let first = fmt.format_ticks(&plan).unwrap();
    let second = fmt.format_ticks(&plan).unwrap();
    assert_eq!(first, second);
}

#[test]
fn concise_strips_shared_trailing_zeros() {
    let ctx = ctx();
    let fmt = ConciseDateFormatter::new(ctx.clone(), Utc.fix());
    let positions: Vec<f64> = [0u32, 500_000, 1_000_000, 1_500_000]
        .iter()
        .map(|&us| num(&ctx, 2005, 1, 1, 11, 5, us / 1_000_000, us % 1_000_000))
        .collect();
    let plan = TickPlan {
        positions,
        unit_days: 1.0 / 86_400e6,
        interval: 1,
    };
    let out = fmt.format_ticks(&plan).unwrap();
    assert_eq!(out.labels, vec!["11:05", "00.5", "01.0", "01.5"]);
}

#[test]
fn concise_january_tick_suppresses_the_offset() {
    let ctx = ctx();
    let fmt = ConciseDateFormatter::new(ctx.clone(), Utc.fix());
    let positions: Vec<f64> = [(2004, 11), (2004, 12), (2005, 1), (2005, 2)]
        .iter()
        .map(|&(y, m)| num(&ctx, y, m, 1, 0, 0, 0, 0))
        .collect();
    let plan = TickPlan {
        positions,
        unit_days: 30.0,
        interval: 1,
    };
    let out = fmt.format_ticks(&plan).unwrap();
    assert_eq!(out.labels, vec!["Nov", "Dec", "2005", "Feb"]);
    assert_eq!(out.offset, "");
}

#[test]
fn concise_duration_day_boundaries_borrow_the_day_label() {
    let fmt = ConciseTimedeltaFormatter::new();
    // hourly ticks around the 2-day mark
    let plan = TickPlan {
        positions: vec![1.75, 2.0, 2.25],
        unit_days: 1.0 / 24.0,
        interval: 6,
    };
    let out = fmt.format_ticks(&plan).unwrap();
    assert_eq!(out.labels, vec!["18:00", "2 d", "6:00"]);
    assert_eq!(out.offset, "");
}

#[test]
fn auto_formatter_picks_pattern_by_unit_size() {
    let ctx = ctx();
    let fmt = AutoDateFormatter::new(ctx.clone(), Utc.fix());
    let x = num(&ctx, 2020, 7, 4, 9, 0, 0, 0);

    let daily = fmt.format_ticks(&day_plan(vec![x])).unwrap();
    assert_eq!(daily.labels, vec!["2020-07-04"]);

    let hourly = fmt
        .format_ticks(&TickPlan {
            positions: vec![x],
            unit_days: 1.0 / 24.0,
            interval: 1,
        })
        .unwrap();
    assert_eq!(hourly.labels, vec!["07-04 09"]);
}

#[test]
fn auto_formatter_accepts_callbacks() {
    let ctx = ctx();
    let mut fmt = AutoDateFormatter::new(ctx.clone(), Utc.fix());
    fmt.set_scaled(
        1.0,
        ScaledFormat::Callback(Box::new(|x, pos| format!("tick {pos} at {x:.1}"))),
    );
    let out = fmt.format_ticks(&day_plan(vec![3.0, 4.0])).unwrap();
    assert_eq!(out.labels, vec!["tick 0 at 3.0", "tick 1 at 4.0"]);
}

#[test]
fn fixed_duration_formatter() {
    let fmt = DurationFormatter::new("%d d %H:%M").unwrap();
    let out = fmt.format_ticks(&day_plan(vec![1.5])).unwrap();
    assert_eq!(out.labels, vec!["1 d 12:00"]);
    assert!(matches!(
        DurationFormatter::new("%j"),
        Err(TimetickError::InvalidPattern(_))
    ));
}

#[test]
fn concise_table_length_is_validated() {
    let ctx = ctx();
    let err = ConciseDateFormatter::with_tables(
        ctx,
        Utc.fix(),
        Some(vec!["%Y".into(), "%b".into()]),
        None,
        None,
        true,
    );
    assert!(matches!(
        err,
        Err(TimetickError::BadFormatTable { expected: 6, got: 2 })
    ));
}

struct FixedAxis {
    view: (f64, f64),
}

impl HostAxis for FixedAxis {
    fn view_interval(&self) -> (f64, f64) {
        self.view
    }
    fn data_interval(&self) -> (f64, f64) {
        self.view
    }
    fn units(&self) -> Option<chrono::FixedOffset> {
        None
    }
}

#[test]
fn switching_converter_follows_the_configuration() {
    let ctx = Arc::new(AxisContext::new(Config::default()).unwrap());
    let registry = ConverterRegistry::with_defaults(&ctx);
    let axis = FixedAxis { view: (0.0, 45.0) };

    let info = registry.date().axis_info(None, &axis).unwrap();
    let plan = info.locator.plan(0.0, 45.0).unwrap();
    let auto_labels = info.formatter.format_ticks(&plan).unwrap();
    assert!(auto_labels.offset.is_empty());
    // the threshold-table formatter spells the year out on every tick
    assert!(auto_labels.labels.iter().all(|l| l.starts_with("19")));

    ctx.update_config(|c| c.converter = ConverterChoice::Concise)
        .unwrap();
    let info = registry.date().axis_info(None, &axis).unwrap();
    let concise_labels = info.formatter.format_ticks(&plan).unwrap();
    // the concise formatter moves the year into the offset instead
    assert!(!concise_labels.offset.is_empty());
    assert!(concise_labels.labels.iter().all(|l| !l.starts_with("19")));
}
