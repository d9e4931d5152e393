// File: crates/demo/src/main.rs
// Summary: Demo prints auto-selected ticks and labels for a date or duration range.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use timetick_core::{
    duration_to_num, AxisContext, Config, ConverterChoice, ConverterRegistry, HostAxis,
    TemporalValue, TickFormatter, TickLocator,
};

struct RangeAxis {
    view: (f64, f64),
}

impl HostAxis for RangeAxis {
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

fn main() -> Result<()> {
    // Accept a range from the CLI or fall back to a sample 36-hour window.
    // A single "36h"/"10d"-style argument demos the duration axis instead.
    let mut args = std::env::args().skip(1);
    let start = args.next().unwrap_or_else(|| "2005-02-01T00:00:00".into());
    let span = parse_duration_span(&start);
    let end = if span.is_some() {
        String::new()
    } else {
        args.next().unwrap_or_else(|| "2005-02-02T12:00:00".into())
    };
    let style = args.next().unwrap_or_else(|| "concise".into());

    let converter = match style.as_str() {
        "auto" => ConverterChoice::Auto,
        _ => ConverterChoice::Concise,
    };
    let ctx = Arc::new(AxisContext::new(Config {
        converter,
        ..Config::default()
    })?);
    let registry = ConverterRegistry::with_defaults(&ctx);

    if let Some(span) = span {
        return print_duration_axis(&registry, span);
    }

    let dstart = chrono::NaiveDateTime::from_str(&start)
        .with_context(|| format!("failed to parse start '{start}'"))?;
    let dend = chrono::NaiveDateTime::from_str(&end)
        .with_context(|| format!("failed to parse end '{end}'"))?;
    println!("Ticking {dstart} .. {dend} ({style})");

    let converter = registry.date();
    let lo = converter.convert(&TemporalValue::from(dstart));
    let hi = converter.convert(&TemporalValue::from(dend));
    let axis = RangeAxis { view: (lo, hi) };

    let info = converter.axis_info(None, &axis)?;
    let plan = info.locator.plan_or_empty(lo, hi)?;
    let labels = info.formatter.format_ticks(&plan)?;

    println!("{} ticks at unit {:.3e} days", plan.positions.len(), plan.unit_days);
    for (x, label) in plan.positions.iter().zip(&labels.labels) {
        let marker = if *x < lo || *x > hi { "  (off-view)" } else { "" };
        println!("  {x:>14.6}  {label}{marker}");
    }
    if !labels.offset.is_empty() {
        println!("offset: {}", labels.offset);
    }
    Ok(())
}

fn parse_duration_span(arg: &str) -> Option<chrono::TimeDelta> {
    let (value, unit) = arg.split_at(arg.len().checked_sub(1)?);
    let n: i64 = value.parse().ok()?;
    match unit {
        "d" => Some(chrono::TimeDelta::days(n)),
        "h" => Some(chrono::TimeDelta::hours(n)),
        "m" => Some(chrono::TimeDelta::minutes(n)),
        _ => None,
    }
}

fn print_duration_axis(registry: &ConverterRegistry, span: chrono::TimeDelta) -> Result<()> {
    println!("Ticking duration 0 .. {span}");
    let hi = duration_to_num(span);
    let axis = RangeAxis { view: (0.0, hi) };
    let converter = registry.duration();
    let info = converter.axis_info(None, &axis)?;
    let plan = info.locator.plan_or_empty(0.0, hi)?;
    let labels = info.formatter.format_ticks(&plan)?;
    println!("{} ticks at unit {:.3e} days", plan.positions.len(), plan.unit_days);
    for (x, label) in plan.positions.iter().zip(&labels.labels) {
        println!("  {x:>10.6}  {label}");
    }
    if !labels.offset.is_empty() {
        println!("offset: {}", labels.offset);
    }
    Ok(())
}
