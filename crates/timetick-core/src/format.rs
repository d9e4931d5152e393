// File: crates/timetick-core/src/format.rs
// Summary: Fixed-pattern and threshold-table tick formatters for dates and durations.

use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset};

use crate::codec::{self, DAYS_PER_MONTH, DAYS_PER_YEAR, MICROS_PER_DAY, MINS_PER_DAY, SECS_PER_DAY};
use crate::context::AxisContext;
use crate::durfmt;
use crate::error::{Result, TimetickError};
use crate::locate::TickPlan;

/// Labels for one tick plan, plus the single offset string some formatters
/// hang in the axis corner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickLabels {
    pub labels: Vec<String>,
    pub offset: String,
}

/// Renders tick positions into display strings. Formatters are pure:
/// formatting the same plan twice yields identical labels and offset.
pub trait TickFormatter {
    fn format_ticks(&self, plan: &TickPlan) -> Result<TickLabels>;

    /// Render a single value outside any plan (cursor readouts and the
    /// like), using the formatter's default pattern.
    fn format_value(&self, x: f64) -> Result<String>;
}

/// chrono strftime with the pattern checked for unknown directives first,
/// so a bad pattern is an error instead of a panic inside `Display`.
pub(crate) fn strftime(dt: &DateTime<FixedOffset>, pattern: &str) -> Result<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|it| matches!(it, Item::Error)) {
        return Err(TimetickError::InvalidPattern(pattern.to_string()));
    }
    Ok(dt.format_with_items(items.into_iter()).to_string())
}

pub(crate) fn validate_date_pattern(pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|it| matches!(it, Item::Error)) {
        return Err(TimetickError::InvalidPattern(pattern.to_string()));
    }
    Ok(())
}

// ---- fixed patterns ---------------------------------------------------------

/// Format every tick with one strftime pattern in a fixed timezone.
pub struct DateFormatter {
    ctx: Arc<AxisContext>,
    tz: FixedOffset,
    pattern: String,
}

impl DateFormatter {
    pub fn new(ctx: Arc<AxisContext>, tz: FixedOffset, pattern: &str) -> Result<Self> {
        validate_date_pattern(pattern)?;
        Ok(Self {
            ctx,
            tz,
            pattern: pattern.to_string(),
        })
    }

    pub fn set_timezone(&mut self, tz: FixedOffset) {
        self.tz = tz;
    }
}

impl TickFormatter for DateFormatter {
    fn format_ticks(&self, plan: &TickPlan) -> Result<TickLabels> {
        let labels = plan
            .positions
            .iter()
            .map(|&x| self.format_value(x))
            .collect::<Result<Vec<_>>>()?;
        Ok(TickLabels {
            labels,
            offset: String::new(),
        })
    }

    fn format_value(&self, x: f64) -> Result<String> {
        let dt = codec::num_to_date(&self.ctx, x, self.tz)?;
        strftime(&dt, &self.pattern)
    }
}

/// Format every tick with one duration pattern (see
/// [`crate::durfmt::format_duration`] for the codes).
pub struct DurationFormatter {
    pattern: String,
}

impl DurationFormatter {
    pub fn new(pattern: &str) -> Result<Self> {
        // a dry run over the zero duration validates the pattern
        durfmt::format_duration(chrono::TimeDelta::zero(), pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
        })
    }
}

impl TickFormatter for DurationFormatter {
    fn format_ticks(&self, plan: &TickPlan) -> Result<TickLabels> {
        let labels = plan
            .positions
            .iter()
            .map(|&x| self.format_value(x))
            .collect::<Result<Vec<_>>>()?;
        Ok(TickLabels {
            labels,
            offset: String::new(),
        })
    }

    fn format_value(&self, x: f64) -> Result<String> {
        durfmt::format_duration_num(x, &self.pattern)
    }
}

// ---- threshold tables -------------------------------------------------------

/// An entry in the unit-size table: a pattern string, or a callback taking
/// `(value, position)` for full programmatic control.
pub enum ScaledFormat {
    Pattern(String),
    Callback(Box<dyn Fn(f64, usize) -> String>),
}

/// Table walking shared by the auto formatters: the entry with the
/// smallest threshold at or above the plan's unit size wins, else the
/// default pattern.
struct ScaledTable {
    default_pattern: String,
    entries: Vec<(f64, ScaledFormat)>,
}

impl ScaledTable {
    fn set(&mut self, threshold: f64, fmt: ScaledFormat) {
        self.entries.retain(|(t, _)| *t != threshold);
        self.entries.push((threshold, fmt));
        self.entries
            .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    }

    fn pick(&self, unit: f64) -> Option<&ScaledFormat> {
        self.entries
            .iter()
            .find(|(threshold, _)| *threshold >= unit)
            .map(|(_, fmt)| fmt)
    }
}

/// Picks a date pattern from the configured per-granularity formats based
/// on the plan's unit size.
pub struct AutoDateFormatter {
    ctx: Arc<AxisContext>,
    tz: FixedOffset,
    table: ScaledTable,
}

impl AutoDateFormatter {
    pub fn new(ctx: Arc<AxisContext>, tz: FixedOffset) -> Self {
        let af = ctx.config().autoformat;
        let mut table = ScaledTable {
            default_pattern: "%Y-%m-%d".into(),
            entries: Vec::new(),
        };
        table.set(DAYS_PER_YEAR, ScaledFormat::Pattern(af.year));
        table.set(DAYS_PER_MONTH, ScaledFormat::Pattern(af.month));
        table.set(1.0, ScaledFormat::Pattern(af.day));
        table.set(1.0 / 24.0, ScaledFormat::Pattern(af.hour));
        table.set(1.0 / MINS_PER_DAY, ScaledFormat::Pattern(af.minute));
        table.set(1.0 / SECS_PER_DAY, ScaledFormat::Pattern(af.second));
        table.set(1.0 / MICROS_PER_DAY, ScaledFormat::Pattern(af.microsecond));
        Self { ctx, tz, table }
    }

    /// Override or add a table entry.
    pub fn set_scaled(&mut self, threshold: f64, fmt: ScaledFormat) {
        self.table.set(threshold, fmt);
    }

    fn render(&self, fmt: Option<&ScaledFormat>, x: f64, pos: usize) -> Result<String> {
        match fmt {
            Some(ScaledFormat::Pattern(p)) => {
                let dt = codec::num_to_date(&self.ctx, x, self.tz)?;
                strftime(&dt, p)
            }
            Some(ScaledFormat::Callback(f)) => Ok(f(x, pos)),
            None => {
                let dt = codec::num_to_date(&self.ctx, x, self.tz)?;
                strftime(&dt, &self.table.default_pattern)
            }
        }
    }
}

impl TickFormatter for AutoDateFormatter {
    fn format_ticks(&self, plan: &TickPlan) -> Result<TickLabels> {
        let fmt = self.table.pick(plan.unit_days);
        let labels = plan
            .positions
            .iter()
            .enumerate()
            .map(|(pos, &x)| self.render(fmt, x, pos))
            .collect::<Result<Vec<_>>>()?;
        Ok(TickLabels {
            labels,
            offset: String::new(),
        })
    }

    fn format_value(&self, x: f64) -> Result<String> {
        self.render(None, x, 0)
    }
}

/// Duration counterpart of [`AutoDateFormatter`].
pub struct AutoTimedeltaFormatter {
    table: ScaledTable,
}

impl Default for AutoTimedeltaFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoTimedeltaFormatter {
    pub fn new() -> Self {
        let mut table = ScaledTable {
            default_pattern: "%d days %H:%M".into(),
            entries: Vec::new(),
        };
        table.set(1.0, ScaledFormat::Pattern("%d days".into()));
        table.set(1.0 / 24.0, ScaledFormat::Pattern("%d days, %H:%M".into()));
        table.set(
            1.0 / MINS_PER_DAY,
            ScaledFormat::Pattern("%d days, %H:%M".into()),
        );
        table.set(
            1.0 / SECS_PER_DAY,
            ScaledFormat::Pattern("%d days, %H:%M:%S".into()),
        );
        table.set(
            1e3 / MICROS_PER_DAY,
            ScaledFormat::Pattern("%d days, %H:%M:%S.%f".into()),
        );
        table.set(
            1.0 / MICROS_PER_DAY,
            ScaledFormat::Pattern("%d days, %H:%M:%S.%f".into()),
        );
        Self { table }
    }

    pub fn set_scaled(&mut self, threshold: f64, fmt: ScaledFormat) {
        self.table.set(threshold, fmt);
    }

    fn render(&self, fmt: Option<&ScaledFormat>, x: f64, pos: usize) -> Result<String> {
        match fmt {
            Some(ScaledFormat::Pattern(p)) => durfmt::format_duration_num(x, p),
            Some(ScaledFormat::Callback(f)) => Ok(f(x, pos)),
            None => durfmt::format_duration_num(x, &self.table.default_pattern),
        }
    }
}

impl TickFormatter for AutoTimedeltaFormatter {
    fn format_ticks(&self, plan: &TickPlan) -> Result<TickLabels> {
        let fmt = self.table.pick(plan.unit_days);
        let labels = plan
            .positions
            .iter()
            .enumerate()
            .map(|(pos, &x)| self.render(fmt, x, pos))
            .collect::<Result<Vec<_>>>()?;
        Ok(TickLabels {
            labels,
            offset: String::new(),
        })
    }

    fn format_value(&self, x: f64) -> Result<String> {
        self.render(None, x, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Offset;

    #[test]
    fn scaled_table_picks_smallest_cover() {
        let mut table = ScaledTable {
            default_pattern: "d".into(),
            entries: Vec::new(),
        };
        table.set(365.0, ScaledFormat::Pattern("y".into()));
        table.set(1.0, ScaledFormat::Pattern("day".into()));
        table.set(30.0, ScaledFormat::Pattern("m".into()));
        let got = match table.pick(2.5) {
            Some(ScaledFormat::Pattern(p)) => p.clone(),
            _ => String::new(),
        };
        assert_eq!(got, "m");
        assert!(table.pick(1000.0).is_none());
    }

    #[test]
    fn bad_date_pattern_rejected_up_front() {
        let ctx = Arc::new(AxisContext::with_defaults());
        let tz = chrono::Utc.fix();
        assert!(matches!(
            DateFormatter::new(ctx, tz, "%Y %Q"),
            Err(TimetickError::InvalidPattern(_))
        ));
    }
}
