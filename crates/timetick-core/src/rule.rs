// File: crates/timetick-core/src/rule.rs
// Summary: Calendar stepping rules: frequencies, calendar-aware deltas, occurrence enumeration.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Weekday};

use crate::codec::{
    DAYS_PER_MONTH, DAYS_PER_WEEK, DAYS_PER_YEAR, HOURS_PER_DAY, MICROS_PER_DAY, MINS_PER_DAY,
    SECS_PER_DAY,
};

/// Hard cap on occurrences generated by a single rule evaluation.
const MAX_OCCURRENCES: usize = 100_000;
/// Step cap so that a rule whose filters reject everything still terminates.
const MAX_STEPS: i64 = 5_000_000;

const US_PER_SEC: i64 = 1_000_000;
const US_PER_MIN: i64 = 60 * US_PER_SEC;
const US_PER_HOUR: i64 = 60 * US_PER_MIN;
const US_PER_DAY: i64 = 24 * US_PER_HOUR;

/// Tick stepping granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
    Microsecondly,
}

impl Frequency {
    /// Nominal size of one unit of this frequency, in fractional days.
    /// Used for comparing frequencies and selecting label formats.
    pub fn unit_days(self) -> f64 {
        match self {
            Frequency::Yearly => DAYS_PER_YEAR,
            Frequency::Monthly => DAYS_PER_MONTH,
            Frequency::Weekly => DAYS_PER_WEEK,
            Frequency::Daily => 1.0,
            Frequency::Hourly => 1.0 / HOURS_PER_DAY,
            Frequency::Minutely => 1.0 / MINS_PER_DAY,
            Frequency::Secondly => 1.0 / SECS_PER_DAY,
            Frequency::Microsecondly => 1.0 / MICROS_PER_DAY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Frequency::Yearly => "yearly",
            Frequency::Monthly => "monthly",
            Frequency::Weekly => "weekly",
            Frequency::Daily => "daily",
            Frequency::Hourly => "hourly",
            Frequency::Minutely => "minutely",
            Frequency::Secondly => "secondly",
            Frequency::Microsecondly => "microsecondly",
        }
    }
}

/// Calendar-aware difference between two datetimes, normalized so that all
/// components share the direction of the difference. Years and months use
/// true calendar arithmetic; the sub-month remainder is exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalendarDelta {
    pub years: i32,
    pub months: i32,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub micros: i64,
}

/// Add (or subtract) whole months, clamping the day to the target month's
/// length (Jan 31 + 1 month = Feb 28).
pub fn add_months(dt: NaiveDateTime, months: i32) -> Option<NaiveDateTime> {
    let date = if months >= 0 {
        dt.date().checked_add_months(Months::new(months as u32))
    } else {
        dt.date().checked_sub_months(Months::new(months.unsigned_abs()))
    }?;
    Some(NaiveDateTime::new(date, dt.time()))
}

fn month_anchor(from: NaiveDateTime, to: NaiveDateTime) -> (i32, NaiveDateTime) {
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let mut anchor = add_months(from, months).unwrap_or(from);
    if to >= from {
        while anchor > to {
            months -= 1;
            anchor = add_months(from, months).unwrap_or(from);
        }
    } else {
        while anchor < to {
            months += 1;
            anchor = add_months(from, months).unwrap_or(from);
        }
    }
    (months, anchor)
}

/// Difference `to - from` as whole years/months plus an exact remainder.
pub fn calendar_delta(from: NaiveDateTime, to: NaiveDateTime) -> CalendarDelta {
    let (months, anchor) = month_anchor(from, to);
    let total_us = (to - anchor).num_microseconds().unwrap_or(0);
    let days = total_us / US_PER_DAY;
    let rem = total_us % US_PER_DAY;
    let hours = rem / US_PER_HOUR;
    let rem = rem % US_PER_HOUR;
    let minutes = rem / US_PER_MIN;
    let rem = rem % US_PER_MIN;
    CalendarDelta {
        years: months / 12,
        months: months % 12,
        days,
        hours,
        minutes,
        seconds: rem / US_PER_SEC,
        micros: rem % US_PER_SEC,
    }
}

/// Shift a datetime by a calendar delta; `sign` is +1 or -1.
pub fn shift(dt: NaiveDateTime, delta: &CalendarDelta, sign: i64) -> Option<NaiveDateTime> {
    let months = (delta.years * 12 + delta.months) * sign as i32;
    let shifted = add_months(dt, months)?;
    let us = delta.days * US_PER_DAY
        + delta.hours * US_PER_HOUR
        + delta.minutes * US_PER_MIN
        + delta.seconds * US_PER_SEC
        + delta.micros;
    shifted.checked_add_signed(TimeDelta::microseconds(us * sign))
}

/// Restriction sets naming which sub-positions within a period receive
/// ticks. A `None` field places no restriction; fields finer than the
/// rule's frequency act as replacements (pinning a tick to, say, minute 0),
/// fields at the frequency's own level act as filters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ByFields {
    pub months: Option<Vec<u32>>,
    pub month_days: Option<Vec<u32>>,
    pub weekdays: Option<Vec<Weekday>>,
    pub hours: Option<Vec<u32>>,
    pub minutes: Option<Vec<u32>>,
    pub seconds: Option<Vec<u32>>,
}

fn passes(set: &Option<Vec<u32>>, v: u32) -> bool {
    set.as_ref().map_or(true, |s| s.contains(&v))
}

/// A concrete stepping rule over an inclusive `[start, until]` window.
///
/// Occurrences are anchored at `start`: every `interval` periods of `freq`,
/// with `by` sets applied. Sub-second stepping is not supported here; the
/// microsecond locator steps arithmetically over raw counts instead.
#[derive(Clone, Debug)]
pub struct CalendarRule {
    pub freq: Frequency,
    pub interval: usize,
    pub by: ByFields,
    pub start: NaiveDateTime,
    pub until: NaiveDateTime,
}

impl CalendarRule {
    /// Enumerate occurrences in `[start, until]`, sorted ascending.
    pub fn occurrences(&self) -> Vec<NaiveDateTime> {
        let mut out = match self.freq {
            Frequency::Yearly => self.yearly(),
            Frequency::Monthly => self.monthly(),
            Frequency::Weekly | Frequency::Daily => self.daily(),
            Frequency::Hourly => self.clocked(3600),
            Frequency::Minutely => self.clocked(60),
            Frequency::Secondly => self.clocked(1),
            Frequency::Microsecondly => Vec::new(),
        };
        out.sort_unstable();
        out.dedup();
        out
    }

    fn interval(&self) -> u64 {
        self.interval.max(1) as u64
    }

    fn expanded_times(&self) -> (Vec<u32>, Vec<u32>, Vec<u32>) {
        let hours = self
            .by
            .hours
            .clone()
            .unwrap_or_else(|| vec![self.start.hour()]);
        let minutes = self
            .by
            .minutes
            .clone()
            .unwrap_or_else(|| vec![self.start.minute()]);
        let seconds = self
            .by
            .seconds
            .clone()
            .unwrap_or_else(|| vec![self.start.second()]);
        (hours, minutes, seconds)
    }

    fn emit_day(&self, date: NaiveDate, times: &(Vec<u32>, Vec<u32>, Vec<u32>), out: &mut Vec<NaiveDateTime>) {
        for &h in &times.0 {
            for &m in &times.1 {
                for &s in &times.2 {
                    if let Some(t) = date.and_hms_opt(h, m, s) {
                        if t >= self.start && t <= self.until {
                            out.push(t);
                        }
                    }
                }
            }
        }
    }

    fn yearly(&self) -> Vec<NaiveDateTime> {
        let mut out = Vec::new();
        let times = self.expanded_times();
        let months = self
            .by
            .months
            .clone()
            .unwrap_or_else(|| vec![self.start.month()]);
        let days = self
            .by
            .month_days
            .clone()
            .unwrap_or_else(|| vec![self.start.day()]);
        let mut year = self.start.year();
        while year <= self.until.year() && out.len() < MAX_OCCURRENCES {
            for &mo in &months {
                for &day in &days {
                    if let Some(date) = NaiveDate::from_ymd_opt(year, mo, day) {
                        self.emit_day(date, &times, &mut out);
                    }
                }
            }
            year += self.interval() as i32;
        }
        out
    }

    fn monthly(&self) -> Vec<NaiveDateTime> {
        let mut out = Vec::new();
        let times = self.expanded_times();
        let days = self
            .by
            .month_days
            .clone()
            .unwrap_or_else(|| vec![self.start.day()]);
        let Some(base) = NaiveDate::from_ymd_opt(self.start.year(), self.start.month(), 1) else {
            return out;
        };
        let mut k: u32 = 0;
        while out.len() < MAX_OCCURRENCES {
            let Some(month_start) = base.checked_add_months(Months::new(k * self.interval() as u32))
            else {
                break;
            };
            if month_start > self.until.date() {
                break;
            }
            if passes(&self.by.months, month_start.month()) {
                for &day in &days {
                    if let Some(date) =
                        NaiveDate::from_ymd_opt(month_start.year(), month_start.month(), day)
                    {
                        self.emit_day(date, &times, &mut out);
                    }
                }
            }
            k += 1;
        }
        out
    }

    fn daily(&self) -> Vec<NaiveDateTime> {
        let mut out = Vec::new();
        let times = self.expanded_times();
        let step = match self.freq {
            Frequency::Weekly => 7 * self.interval(),
            _ => self.interval(),
        };
        let end = self.until.date();
        let mut i: u64 = 0;
        while out.len() < MAX_OCCURRENCES {
            let Some(date) = self.start.date().checked_add_days(Days::new(i * step)) else {
                break;
            };
            if date > end {
                break;
            }
            if passes(&self.by.months, date.month())
                && passes(&self.by.month_days, date.day())
                && self
                    .by
                    .weekdays
                    .as_ref()
                    .map_or(true, |w| w.contains(&date.weekday()))
            {
                self.emit_day(date, &times, &mut out);
            }
            i += 1;
        }
        out
    }

    /// Hour/minute/second stepping on a clock-aligned grid, with finer
    /// fields pinned from the by-sets and same-level sets as filters.
    fn clocked(&self, unit_secs: u64) -> Vec<NaiveDateTime> {
        let mut out = Vec::new();
        let step_secs = (unit_secs * self.interval()) as i64;
        let base = truncate_to(self.start, unit_secs);
        let (_, minutes, seconds) = self.expanded_times();
        let mut k: i64 = 0;
        while out.len() < MAX_OCCURRENCES && k < MAX_STEPS {
            let Some(t0) = TimeDelta::try_seconds(step_secs * k)
                .and_then(|d| base.checked_add_signed(d))
            else {
                break;
            };
            if t0 > self.until {
                break;
            }
            k += 1;
            let date = t0.date();
            if !passes(&self.by.months, date.month())
                || !passes(&self.by.month_days, date.day())
                || self
                    .by
                    .weekdays
                    .as_ref()
                    .map_or(false, |w| !w.contains(&date.weekday()))
                || !passes(&self.by.hours, t0.hour())
            {
                continue;
            }
            match unit_secs {
                3600 => {
                    for &m in &minutes {
                        for &s in &seconds {
                            if let Some(t) = date.and_hms_opt(t0.hour(), m, s) {
                                if t >= self.start && t <= self.until {
                                    out.push(t);
                                }
                            }
                        }
                    }
                }
                60 => {
                    if !passes(&self.by.minutes, t0.minute()) {
                        continue;
                    }
                    for &s in &seconds {
                        if let Some(t) = date.and_hms_opt(t0.hour(), t0.minute(), s) {
                            if t >= self.start && t <= self.until {
                                out.push(t);
                            }
                        }
                    }
                }
                _ => {
                    if passes(&self.by.minutes, t0.minute())
                        && passes(&self.by.seconds, t0.second())
                        && t0 >= self.start
                    {
                        out.push(t0);
                    }
                }
            }
        }
        out
    }
}

fn truncate_to(dt: NaiveDateTime, unit_secs: u64) -> NaiveDateTime {
    let t = dt.time();
    let trimmed = match unit_secs {
        3600 => t.with_minute(0).and_then(|t| t.with_second(0)),
        60 => t.with_second(0),
        _ => Some(t),
    };
    let trimmed = trimmed
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t);
    NaiveDateTime::new(dt.date(), trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn calendar_delta_uses_true_months() {
        let d = calendar_delta(dt(2004, 1, 31, 0, 0, 0), dt(2004, 3, 1, 0, 0, 0));
        assert_eq!((d.years, d.months, d.days), (0, 1, 1)); // Jan 31 -> Feb 29 (leap) -> +1 day
        let d = calendar_delta(dt(2020, 1, 1, 6, 0, 0), dt(2022, 1, 1, 18, 30, 0));
        assert_eq!((d.years, d.months, d.days, d.hours, d.minutes), (2, 0, 0, 12, 30));
    }

    #[test]
    fn calendar_delta_negative_direction() {
        let d = calendar_delta(dt(2021, 3, 15, 0, 0, 0), dt(2021, 1, 15, 0, 0, 0));
        assert_eq!((d.years, d.months, d.days), (0, -2, 0));
        let d = calendar_delta(dt(2021, 3, 1, 0, 0, 0), dt(2021, 1, 31, 0, 0, 0));
        assert_eq!((d.years, d.months, d.days), (0, -1, -1));
    }

    #[test]
    fn monthly_rule_skips_short_months() {
        let rule = CalendarRule {
            freq: Frequency::Monthly,
            interval: 1,
            by: ByFields {
                month_days: Some(vec![31]),
                hours: Some(vec![0]),
                minutes: Some(vec![0]),
                seconds: Some(vec![0]),
                ..ByFields::default()
            },
            start: dt(2021, 1, 1, 0, 0, 0),
            until: dt(2021, 6, 30, 23, 59, 59),
        };
        let months: Vec<u32> = rule.occurrences().iter().map(|t| t.month()).collect();
        assert_eq!(months, vec![1, 3, 5]); // no Feb/Apr/Jun 31st
    }

    #[test]
    fn hourly_rule_filters_and_pins() {
        let rule = CalendarRule {
            freq: Frequency::Hourly,
            interval: 1,
            by: ByFields {
                hours: Some(vec![0, 6, 12, 18]),
                minutes: Some(vec![0]),
                seconds: Some(vec![0]),
                ..ByFields::default()
            },
            start: dt(2021, 5, 1, 3, 30, 0),
            until: dt(2021, 5, 2, 3, 30, 0),
        };
        let got = rule.occurrences();
        assert_eq!(
            got,
            vec![
                dt(2021, 5, 1, 6, 0, 0),
                dt(2021, 5, 1, 12, 0, 0),
                dt(2021, 5, 1, 18, 0, 0),
                dt(2021, 5, 2, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn weekly_rule_steps_seven_days() {
        let rule = CalendarRule {
            freq: Frequency::Weekly,
            interval: 1,
            by: ByFields {
                hours: Some(vec![0]),
                minutes: Some(vec![0]),
                seconds: Some(vec![0]),
                ..ByFields::default()
            },
            start: dt(2021, 5, 3, 0, 0, 0), // a Monday
            until: dt(2021, 5, 31, 0, 0, 0),
        };
        let got = rule.occurrences();
        assert_eq!(got.len(), 5);
        assert!(got.iter().all(|t| t.weekday() == Weekday::Mon));
    }
}
