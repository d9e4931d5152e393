// File: crates/timetick-core/src/locate.rs
// Summary: Tick locators: calendar rules, anchored years, microsecond stepping, auto-selection.

use std::sync::Arc;

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Weekday};

use crate::codec::{self, DAYS_PER_YEAR, MICROS_PER_DAY};
use crate::context::AxisContext;
use crate::error::{Result, TimetickError};
use crate::rule::{calendar_delta, shift, ByFields, CalendarRule, Frequency};

/// Warn threshold: a healthy axis never wants anywhere near this many ticks.
const MAX_TICKS: usize = 1_000;
/// Hard cap for arithmetic stepping so a misconfigured locator cannot
/// allocate without bound.
const MAX_POSITIONS: usize = 100_000;

/// Distance from the epoch (days) beyond which sub-millisecond ticking is
/// unreliable in the f64 day representation.
const FAR_FROM_EPOCH_DAYS: f64 = 70.0 * 365.0;

/// Immutable result of one locator pass: the tick positions plus the
/// granularity they were generated at. Formatters take the plan as input,
/// so there is no hidden ordering between locating and formatting.
#[derive(Clone, Debug)]
pub struct TickPlan {
    /// Ordered tick positions, in axis (day) units.
    pub positions: Vec<f64>,
    /// Unit size of the selected frequency, in fractional days.
    pub unit_days: f64,
    /// Stride between ticks, in units of the selected frequency.
    pub interval: usize,
}

impl TickPlan {
    pub fn empty(unit_days: f64) -> Self {
        Self {
            positions: Vec::new(),
            unit_days,
            interval: 1,
        }
    }
}

/// A source of tick positions for a numeric view interval.
///
/// Callers may pass the interval bounds in either order.
pub trait TickLocator {
    /// Generate a plan for the interval `[vmin, vmax]`.
    fn plan(&self, vmin: f64, vmax: f64) -> Result<TickPlan>;

    /// Expand a degenerate interval to something tickable. Non-finite
    /// bounds yield the default range.
    fn nonsingular(&self, vmin: f64, vmax: f64) -> (f64, f64);

    /// Unit size (days) of the locator's nominal frequency, before any
    /// auto-selection has run.
    fn unit_days(&self) -> f64;

    /// Just the positions of [`TickLocator::plan`].
    fn tick_values(&self, vmin: f64, vmax: f64) -> Result<Vec<f64>> {
        Ok(self.plan(vmin, vmax)?.positions)
    }

    /// Like [`TickLocator::plan`], but an axis with no data (non-finite
    /// view) yields an empty plan instead of an error.
    fn plan_or_empty(&self, vmin: f64, vmax: f64) -> Result<TickPlan> {
        if !vmin.is_finite() || !vmax.is_finite() {
            return Ok(TickPlan::empty(self.unit_days()));
        }
        self.plan(vmin, vmax)
    }
}

fn ordered(vmin: f64, vmax: f64) -> (f64, f64) {
    if vmax < vmin {
        (vmax, vmin)
    } else {
        (vmin, vmax)
    }
}

fn warn_if_excessive(n: usize, lo: f64, hi: f64) {
    if n > MAX_TICKS {
        log::warn!("generating {n} ticks from {lo} to {hi} exceeds the sanity limit");
    }
}

fn calendar_min() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("year 1 is in range")
}

fn calendar_max() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .expect("year 9999 is in range")
}

/// Integer edge with tolerance for float slop: values within 1e-9 of a
/// whole quotient count as exact.
fn edge_multiple(x: f64, base: f64, round_up: bool) -> i64 {
    let q = x / base;
    let r = q.round();
    if (q - r).abs() < 1e-9 {
        r as i64
    } else if round_up {
        q.ceil() as i64
    } else {
        q.floor() as i64
    }
}

/// Multiples of `base` inside `[lo, hi]`, positions computed by index so
/// no error accumulates across the sweep.
fn multiples_between(lo: f64, hi: f64, base: f64) -> Vec<f64> {
    if base <= 0.0 {
        return Vec::new();
    }
    let k0 = edge_multiple(lo, base, true);
    let k1 = edge_multiple(hi, base, false);
    if k1 < k0 {
        return Vec::new();
    }
    let n = ((k1 - k0) as usize).saturating_add(1);
    if n > MAX_POSITIONS {
        log::warn!("interval {base} yields {n} positions over [{lo}, {hi}]; truncating");
    }
    (k0..=k1)
        .take(MAX_POSITIONS)
        .map(|k| k as f64 * base)
        .collect()
}

// ---- calendar-rule locator --------------------------------------------------

/// Ticks driven by a [`CalendarRule`], rebuilt per view: the rule window is
/// the view padded outward by one calendar delta on each side so endpoint
/// ticks are not lost.
pub struct RuleLocator {
    ctx: Arc<AxisContext>,
    tz: FixedOffset,
    freq: Frequency,
    interval: usize,
    by: ByFields,
}

impl RuleLocator {
    pub fn new(
        ctx: Arc<AxisContext>,
        tz: FixedOffset,
        freq: Frequency,
        interval: usize,
        by: ByFields,
    ) -> Result<Self> {
        if interval == 0 {
            return Err(TimetickError::BadInterval);
        }
        if freq == Frequency::Microsecondly {
            // calendar rules stop at whole seconds
            return Err(TimetickError::UnsupportedFrequency(freq.name()));
        }
        Ok(Self {
            ctx,
            tz,
            freq,
            interval,
            by,
        })
    }

    fn hms0(hours: Option<Vec<u32>>, minutes: Option<Vec<u32>>, seconds: Option<Vec<u32>>) -> ByFields {
        ByFields {
            hours,
            minutes,
            seconds,
            ..ByFields::default()
        }
    }

    /// Ticks on a fixed month/day each `interval` years, anchored at the
    /// rule start rather than at "nice" year multiples.
    pub fn yearly(ctx: Arc<AxisContext>, tz: FixedOffset, interval: usize) -> Result<Self> {
        let mut by = Self::hms0(Some(vec![0]), Some(vec![0]), Some(vec![0]));
        by.months = Some(vec![1]);
        by.month_days = Some(vec![1]);
        Self::new(ctx, tz, Frequency::Yearly, interval, by)
    }

    /// Ticks on a given day of specific months (all months by default).
    pub fn monthly(
        ctx: Arc<AxisContext>,
        tz: FixedOffset,
        months: Option<Vec<u32>>,
        month_day: u32,
        interval: usize,
    ) -> Result<Self> {
        let mut by = Self::hms0(Some(vec![0]), Some(vec![0]), Some(vec![0]));
        by.months = months;
        by.month_days = Some(vec![month_day]);
        Self::new(ctx, tz, Frequency::Monthly, interval, by)
    }

    /// Ticks on occurrences of specific weekdays.
    pub fn weekly(
        ctx: Arc<AxisContext>,
        tz: FixedOffset,
        weekdays: Vec<Weekday>,
        interval: usize,
    ) -> Result<Self> {
        let mut by = Self::hms0(Some(vec![0]), Some(vec![0]), Some(vec![0]));
        by.weekdays = Some(weekdays);
        Self::new(ctx, tz, Frequency::Daily, interval, by)
    }

    /// Ticks on specific days of the month (every day by default).
    pub fn daily(
        ctx: Arc<AxisContext>,
        tz: FixedOffset,
        month_days: Option<Vec<u32>>,
        interval: usize,
    ) -> Result<Self> {
        let mut by = Self::hms0(Some(vec![0]), Some(vec![0]), Some(vec![0]));
        by.month_days = month_days;
        Self::new(ctx, tz, Frequency::Daily, interval, by)
    }

    /// Ticks on specific hours (every hour by default), minutes/seconds
    /// pinned to zero.
    pub fn hourly(
        ctx: Arc<AxisContext>,
        tz: FixedOffset,
        hours: Option<Vec<u32>>,
        interval: usize,
    ) -> Result<Self> {
        let by = Self::hms0(hours, Some(vec![0]), Some(vec![0]));
        Self::new(ctx, tz, Frequency::Hourly, interval, by)
    }

    /// Ticks on specific minutes, seconds pinned to zero.
    pub fn minutely(
        ctx: Arc<AxisContext>,
        tz: FixedOffset,
        minutes: Option<Vec<u32>>,
        interval: usize,
    ) -> Result<Self> {
        let by = Self::hms0(None, minutes, Some(vec![0]));
        Self::new(ctx, tz, Frequency::Minutely, interval, by)
    }

    /// Ticks on specific seconds.
    pub fn secondly(
        ctx: Arc<AxisContext>,
        tz: FixedOffset,
        seconds: Option<Vec<u32>>,
        interval: usize,
    ) -> Result<Self> {
        let by = Self::hms0(None, None, seconds);
        Self::new(ctx, tz, Frequency::Secondly, interval, by)
    }

    fn local_to_num(&self, t: NaiveDateTime) -> Option<f64> {
        self.tz
            .from_local_datetime(&t)
            .single()
            .map(|dt| codec::date_to_num(&self.ctx, dt))
    }

    fn positions(&self, lo: f64, hi: f64) -> Result<Vec<f64>> {
        let a = codec::num_to_date(&self.ctx, lo, self.tz)?.naive_local();
        let b = codec::num_to_date(&self.ctx, hi, self.tz)?.naive_local();
        let delta = calendar_delta(a, b);
        let start = shift(a, &delta, -1)
            .map_or_else(calendar_min, |d| d.max(calendar_min()));
        let until = shift(b, &delta, 1)
            .map_or_else(calendar_max, |d| d.min(calendar_max()));
        let rule = CalendarRule {
            freq: self.freq,
            interval: self.interval,
            by: self.by.clone(),
            start,
            until,
        };
        let occurrences = rule.occurrences();
        if occurrences.is_empty() {
            return Ok(vec![lo, hi]);
        }
        warn_if_excessive(occurrences.len(), lo, hi);
        Ok(occurrences
            .into_iter()
            .filter_map(|t| self.local_to_num(t))
            .collect())
    }
}

impl TickLocator for RuleLocator {
    fn plan(&self, vmin: f64, vmax: f64) -> Result<TickPlan> {
        let (lo, hi) = ordered(vmin, vmax);
        Ok(TickPlan {
            positions: self.positions(lo, hi)?,
            unit_days: self.freq.unit_days(),
            interval: self.interval,
        })
    }

    fn nonsingular(&self, vmin: f64, vmax: f64) -> (f64, f64) {
        expand_if_collapsed(vmin, vmax, self.unit_days(), self.interval)
    }

    fn unit_days(&self) -> f64 {
        self.freq.unit_days()
    }
}

/// Shared degenerate-interval policy for fixed-frequency locators: the
/// default range for an empty axis, otherwise a symmetric expansion of
/// `2 * unit * interval` around a collapsed view.
fn expand_if_collapsed(vmin: f64, vmax: f64, unit: f64, interval: usize) -> (f64, f64) {
    if !vmin.is_finite() || !vmax.is_finite() {
        return (0.0, 1.0);
    }
    let (mut lo, mut hi) = ordered(vmin, vmax);
    if (hi - lo).abs() < 1e-6 {
        lo -= 2.0 * unit * interval as f64;
        hi += 2.0 * unit * interval as f64;
    }
    (lo, hi)
}

// ---- year locator -----------------------------------------------------------

/// Year ticks anchored to multiples of `base` counted from year 1, so a
/// 5-year stride lands on ...1990, 1995, 2000 rather than wherever the
/// view happens to start.
pub struct YearLocator {
    ctx: Arc<AxisContext>,
    tz: FixedOffset,
    base: usize,
    month: u32,
    day: u32,
}

impl YearLocator {
    pub fn new(ctx: Arc<AxisContext>, tz: FixedOffset, base: usize) -> Result<Self> {
        Self::with_anchor(ctx, tz, base, 1, 1)
    }

    /// Tick on `month`/`day` of every `base` years.
    pub fn with_anchor(
        ctx: Arc<AxisContext>,
        tz: FixedOffset,
        base: usize,
        month: u32,
        day: u32,
    ) -> Result<Self> {
        if base == 0 {
            return Err(TimetickError::BadInterval);
        }
        Ok(Self {
            ctx,
            tz,
            base,
            month,
            day,
        })
    }
}

impl TickLocator for YearLocator {
    fn plan(&self, vmin: f64, vmax: f64) -> Result<TickPlan> {
        let (lo, hi) = ordered(vmin, vmax);
        let dmin = codec::num_to_date(&self.ctx, lo, self.tz)?;
        let dmax = codec::num_to_date(&self.ctx, hi, self.tz)?;
        let base = self.base as i32;
        let ymin = (dmin.year().div_euclid(base) * base).max(1);
        let ymax = (((dmax.year() + base - 1).div_euclid(base)) * base).min(9999);
        let mut positions = Vec::new();
        let mut year = ymin;
        while year <= ymax {
            if let Some(t) = NaiveDate::from_ymd_opt(year, self.month, self.day)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
            {
                if let Some(dt) = self.tz.from_local_datetime(&t).single() {
                    positions.push(codec::date_to_num(&self.ctx, dt));
                }
            }
            year += base;
        }
        if positions.is_empty() {
            positions = vec![lo, hi];
        }
        warn_if_excessive(positions.len(), lo, hi);
        Ok(TickPlan {
            positions,
            unit_days: DAYS_PER_YEAR,
            interval: self.base,
        })
    }

    fn nonsingular(&self, vmin: f64, vmax: f64) -> (f64, f64) {
        expand_if_collapsed(vmin, vmax, DAYS_PER_YEAR, self.base)
    }

    fn unit_days(&self) -> f64 {
        DAYS_PER_YEAR
    }
}

// ---- microsecond locator ----------------------------------------------------

/// Sub-second ticks: flat arithmetic stepping over raw microsecond counts,
/// offset by the whole-day part of the view to keep the math well inside
/// f64 precision.
pub struct MicrosecondLocator {
    interval: usize,
}

impl MicrosecondLocator {
    pub fn new(interval: usize) -> Result<Self> {
        if interval == 0 {
            return Err(TimetickError::BadInterval);
        }
        Ok(Self { interval })
    }
}

impl TickLocator for MicrosecondLocator {
    fn plan(&self, vmin: f64, vmax: f64) -> Result<TickPlan> {
        let (lo, hi) = ordered(vmin, vmax);
        let t0 = lo.floor();
        let nmin = (lo - t0) * MICROS_PER_DAY;
        let nmax = (hi - t0) * MICROS_PER_DAY;
        let mut positions: Vec<f64> = multiples_between(nmin, nmax, self.interval as f64)
            .into_iter()
            .map(|t| t / MICROS_PER_DAY + t0)
            .collect();
        if positions.is_empty() {
            positions = vec![lo, hi];
        }
        Ok(TickPlan {
            positions,
            unit_days: 1.0 / MICROS_PER_DAY,
            interval: self.interval,
        })
    }

    fn nonsingular(&self, vmin: f64, vmax: f64) -> (f64, f64) {
        expand_if_collapsed(vmin, vmax, 1.0 / MICROS_PER_DAY, self.interval)
    }

    fn unit_days(&self) -> f64 {
        1.0 / MICROS_PER_DAY
    }
}

// ---- auto date locator ------------------------------------------------------

/// Frequencies the auto search walks, coarsest first.
const DATE_FREQS: [Frequency; 7] = [
    Frequency::Yearly,
    Frequency::Monthly,
    Frequency::Daily,
    Frequency::Hourly,
    Frequency::Minutely,
    Frequency::Secondly,
    Frequency::Microsecondly,
];

struct Selection {
    freq: Frequency,
    interval: usize,
    by: ByFields,
    anchored_years: bool,
}

/// Picks the coarsest frequency that yields at least `minticks` ticks,
/// then the smallest interval multiple that keeps the count under that
/// frequency's maximum.
pub struct AutoDateLocator {
    ctx: Arc<AxisContext>,
    tz: FixedOffset,
    pub minticks: usize,
    pub interval_multiples: bool,
    maxticks: [usize; 7],
    intervald: [Vec<usize>; 7],
}

impl AutoDateLocator {
    pub fn new(ctx: Arc<AxisContext>, tz: FixedOffset, interval_multiples: bool) -> Self {
        let daily = if interval_multiples {
            // 4 instead of 3: a 3-day stride across 31-day months gives
            // 1, 4, ..., 28, 31, 1 which reads as uneven spacing
            vec![1, 2, 4, 7, 14]
        } else {
            vec![1, 2, 3, 7, 14, 21]
        };
        Self {
            ctx,
            tz,
            minticks: 5,
            interval_multiples,
            maxticks: [11, 12, 11, 12, 11, 11, 8],
            intervald: [
                vec![
                    1, 2, 4, 5, 10, 20, 40, 50, 100, 200, 400, 500, 1000, 2000, 4000, 5000, 10000,
                ],
                vec![1, 2, 3, 4, 6],
                daily,
                vec![1, 2, 3, 4, 6, 12],
                vec![1, 5, 10, 15, 30],
                vec![1, 5, 10, 15, 30],
                vec![
                    1, 2, 5, 10, 20, 50, 100, 200, 500, 1000, 2000, 5000, 10000, 20000, 50000,
                    100000, 200000, 500000, 1000000,
                ],
            ],
        }
    }

    /// Cap the tick count for one frequency.
    pub fn set_maxticks(&mut self, freq: Frequency, n: usize) {
        if let Some(i) = DATE_FREQS.iter().position(|&f| f == freq) {
            self.maxticks[i] = n.max(2);
        }
    }

    /// Cap the tick count for every frequency at once.
    pub fn set_all_maxticks(&mut self, n: usize) {
        self.maxticks = [n.max(2); 7];
    }

    /// Replace the interval multiples allowed for one frequency.
    pub fn set_intervals(&mut self, freq: Frequency, intervals: Vec<usize>) -> Result<()> {
        if intervals.iter().any(|&k| k == 0) {
            return Err(TimetickError::BadInterval);
        }
        if let Some(i) = DATE_FREQS.iter().position(|&f| f == freq) {
            self.intervald[i] = intervals;
        }
        Ok(())
    }

    fn natural_range(index: usize) -> Option<std::ops::Range<u32>> {
        match index {
            1 => Some(1..13),
            2 => Some(1..32),
            3 => Some(0..24),
            4 => Some(0..60),
            5 => Some(0..60),
            _ => None,
        }
    }

    fn set_by(by: &mut ByFields, index: usize, values: Option<Vec<u32>>) {
        match index {
            1 => by.months = values,
            2 => by.month_days = values,
            3 => by.hours = values,
            4 => by.minutes = values,
            5 => by.seconds = values,
            _ => {}
        }
    }

    fn select(&self, dmin: NaiveDateTime, dmax: NaiveDateTime) -> Selection {
        let delta = calendar_delta(dmin, dmax);
        let tdelta = dmax - dmin;
        let num_years = delta.years as i64;
        let num_months = num_years * 12 + delta.months as i64;
        // exact elapsed days; month/year averages would drift
        let num_days = tdelta.num_days();
        let num_hours = num_days * 24 + delta.hours;
        let num_minutes = num_hours * 60 + delta.minutes;
        let num_seconds = tdelta.num_seconds();
        let num_micros = tdelta.num_microseconds().unwrap_or(i64::MAX);
        let nums = [
            num_years,
            num_months,
            num_days,
            num_hours,
            num_minutes,
            num_seconds,
            num_micros,
        ];

        // finer-than-frequency fields pin ticks to period starts
        let mut by = ByFields {
            months: Some(vec![1]),
            month_days: Some(vec![1]),
            hours: Some(vec![0]),
            minutes: Some(vec![0]),
            seconds: Some(vec![0]),
            weekdays: None,
        };

        for (i, (&freq, &num)) in DATE_FREQS.iter().zip(&nums).enumerate() {
            if num < self.minticks as i64 {
                // not ticking at this granularity, so leave the field free
                Self::set_by(&mut by, i, None);
                continue;
            }
            let table = &self.intervald[i];
            let mut interval = table.last().copied().unwrap_or(1);
            let mut found = false;
            for &k in table {
                if num <= (k * (self.maxticks[i] - 1)) as i64 {
                    interval = k;
                    found = true;
                    break;
                }
            }
            if !found && !(self.interval_multiples && freq == Frequency::Daily) {
                log::warn!(
                    "unable to pick a {} interval for this range; defaulting to {interval}",
                    freq.name()
                );
            }
            if self.interval_multiples {
                if let Some(range) = Self::natural_range(i) {
                    let strided: Vec<u32> = if i == 2 && interval == 14 {
                        // first and 15th; striding would tick the 29th
                        vec![1, 15]
                    } else if i == 2 && interval == 7 {
                        vec![1, 8, 15, 22]
                    } else {
                        range.step_by(interval).collect()
                    };
                    Self::set_by(&mut by, i, Some(strided));
                    interval = 1;
                }
            } else if let Some(range) = Self::natural_range(i) {
                Self::set_by(&mut by, i, Some(range.collect()));
            }
            return Selection {
                freq,
                interval,
                by,
                anchored_years: freq == Frequency::Yearly && self.interval_multiples,
            };
        }

        // even microseconds are too few; tick every microsecond
        Selection {
            freq: Frequency::Microsecondly,
            interval: 1,
            by,
            anchored_years: false,
        }
    }
}

impl TickLocator for AutoDateLocator {
    fn plan(&self, vmin: f64, vmax: f64) -> Result<TickPlan> {
        let (lo, hi) = ordered(vmin, vmax);
        let dmin = codec::num_to_date(&self.ctx, lo, self.tz)?.naive_local();
        let dmax = codec::num_to_date(&self.ctx, hi, self.tz)?.naive_local();
        let sel = self.select(dmin, dmax);
        match sel.freq {
            Frequency::Microsecondly => {
                if lo > FAR_FROM_EPOCH_DAYS && sel.interval < 1000 {
                    log::warn!(
                        "microsecond ticking far from the epoch is imprecise; \
                         configure an epoch nearer the data"
                    );
                }
                MicrosecondLocator::new(sel.interval)?.plan(lo, hi)
            }
            Frequency::Yearly if sel.anchored_years => {
                YearLocator::new(self.ctx.clone(), self.tz, sel.interval)?.plan(lo, hi)
            }
            freq => RuleLocator::new(self.ctx.clone(), self.tz, freq, sel.interval, sel.by)?
                .plan(lo, hi),
        }
    }

    fn nonsingular(&self, vmin: f64, vmax: f64) -> (f64, f64) {
        if !vmin.is_finite() || !vmax.is_finite() {
            return (0.0, 1.0);
        }
        let (mut lo, mut hi) = ordered(vmin, vmax);
        if lo == hi {
            // default an all-but-empty date axis to a ~4 year window
            lo -= DAYS_PER_YEAR * 2.0;
            hi += DAYS_PER_YEAR * 2.0;
        }
        (lo, hi)
    }

    fn unit_days(&self) -> f64 {
        DAYS_PER_YEAR
    }
}

// ---- duration locators ------------------------------------------------------

fn duration_factor(freq: Frequency) -> Result<f64> {
    match freq {
        Frequency::Yearly | Frequency::Monthly => {
            Err(TimetickError::UnsupportedFrequency(freq.name()))
        }
        f => Ok(f.unit_days()),
    }
}

/// Ticks at regular duration intervals (every 15 minutes, every 2 days...).
pub struct TimedeltaLocator {
    freq: Frequency,
    interval: usize,
}

impl TimedeltaLocator {
    pub fn new(freq: Frequency, interval: usize) -> Result<Self> {
        if interval == 0 {
            return Err(TimetickError::BadInterval);
        }
        duration_factor(freq)?;
        Ok(Self { freq, interval })
    }

    fn base(&self) -> f64 {
        self.freq.unit_days() * self.interval as f64
    }
}

impl TickLocator for TimedeltaLocator {
    fn plan(&self, vmin: f64, vmax: f64) -> Result<TickPlan> {
        let (lo, hi) = ordered(vmin, vmax);
        let mut positions = multiples_between(lo, hi, self.base());
        if positions.is_empty() {
            positions = vec![lo, hi];
        }
        warn_if_excessive(positions.len(), lo, hi);
        Ok(TickPlan {
            positions,
            unit_days: self.freq.unit_days(),
            interval: self.interval,
        })
    }

    fn nonsingular(&self, vmin: f64, vmax: f64) -> (f64, f64) {
        expand_if_collapsed(vmin, vmax, self.freq.unit_days(), self.interval)
    }

    fn unit_days(&self) -> f64 {
        self.freq.unit_days()
    }
}

const DURATION_FREQS: [Frequency; 5] = [
    Frequency::Daily,
    Frequency::Hourly,
    Frequency::Minutely,
    Frequency::Secondly,
    Frequency::Microsecondly,
];

/// Auto-selecting counterpart of [`TimedeltaLocator`]: walks day through
/// microsecond granularities with duration-specific interval tables.
pub struct AutoTimedeltaLocator {
    pub minticks: usize,
    maxticks: [usize; 5],
    intervald: [Vec<usize>; 5],
}

impl Default for AutoTimedeltaLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoTimedeltaLocator {
    pub fn new() -> Self {
        let wide = vec![
            1, 2, 5, 10, 20, 50, 100, 200, 500, 1000, 2000, 5000, 10000, 20000, 50000, 100000,
            200000, 500000, 1000000,
        ];
        Self {
            minticks: 5,
            maxticks: [11, 12, 11, 11, 8],
            intervald: [
                wide.clone(),
                vec![1, 2, 3, 4, 6, 12],
                vec![1, 5, 10, 15, 30],
                vec![1, 5, 10, 15, 30],
                wide,
            ],
        }
    }

    pub fn set_maxticks(&mut self, freq: Frequency, n: usize) {
        if let Some(i) = DURATION_FREQS.iter().position(|&f| f == freq) {
            self.maxticks[i] = n.max(2);
        }
    }

    fn select(&self, span: TimeDelta) -> (Frequency, usize) {
        let num_days = span.num_days();
        let num_seconds = span.num_seconds();
        let num_hours = num_days * 24 + num_seconds / 3600;
        let num_minutes = num_days * 1440 + num_seconds / 60;
        let num_micros = span.num_microseconds().unwrap_or(i64::MAX);
        let nums = [num_days, num_hours, num_minutes, num_seconds, num_micros];
        for (i, (&freq, &num)) in DURATION_FREQS.iter().zip(&nums).enumerate() {
            if num < self.minticks as i64 {
                continue;
            }
            let table = &self.intervald[i];
            let interval = table
                .iter()
                .copied()
                .find(|&k| num <= (k * (self.maxticks[i] - 1)) as i64)
                .or_else(|| table.last().copied())
                .unwrap_or(1);
            return (freq, interval);
        }
        (Frequency::Microsecondly, 1)
    }
}

impl TickLocator for AutoTimedeltaLocator {
    fn plan(&self, vmin: f64, vmax: f64) -> Result<TickPlan> {
        let (lo, hi) = ordered(vmin, vmax);
        let span = codec::num_to_duration(hi) - codec::num_to_duration(lo);
        let (freq, interval) = self.select(span);
        TimedeltaLocator::new(freq, interval)?.plan(lo, hi)
    }

    fn nonsingular(&self, vmin: f64, vmax: f64) -> (f64, f64) {
        if !vmin.is_finite() || !vmax.is_finite() {
            return (0.0, 1.0);
        }
        let (lo, hi) = ordered(vmin, vmax);
        let span = codec::num_to_duration(hi) - codec::num_to_duration(lo);
        let (freq, interval) = self.select(span);
        expand_if_collapsed(lo, hi, freq.unit_days(), interval)
    }

    fn unit_days(&self) -> f64 {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiples_stay_on_grid() {
        let got = multiples_between(0.7, 3.2, 0.5);
        assert_eq!(got, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
        // exact endpoints are kept despite float slop
        let got = multiples_between(1.0, 2.0, 0.1);
        assert_eq!(got.len(), 11);
    }

    #[test]
    fn duration_locator_rejects_calendar_freqs() {
        assert!(TimedeltaLocator::new(Frequency::Monthly, 1).is_err());
        assert!(TimedeltaLocator::new(Frequency::Hourly, 0).is_err());
    }

    #[test]
    fn auto_timedelta_picks_hours_for_36h_span() {
        let loc = AutoTimedeltaLocator::new();
        let (freq, interval) = loc.select(TimeDelta::hours(36));
        assert_eq!(freq, Frequency::Hourly);
        assert_eq!(interval, 6);
    }
}
