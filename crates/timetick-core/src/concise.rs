// File: crates/timetick-core/src/concise.rs
// Summary: Redundancy-eliminating tick labels: only the varying part of each date is shown.

use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, TimeDelta, Timelike};

use crate::codec;
use crate::context::AxisContext;
use crate::durfmt::format_duration;
use crate::error::{Result, TimetickError};
use crate::format::{strftime, validate_date_pattern, TickFormatter, TickLabels};
use crate::locate::TickPlan;

// Label levels, coarsest to finest:
// 0 years, 1 months, 2 days, 3 hours, 4 minutes, 5 seconds (+ microseconds).
const LEVELS: usize = 6;

fn to_array(v: Vec<String>, expected: usize) -> Result<Vec<String>> {
    if v.len() != expected {
        return Err(TimetickError::BadFormatTable {
            expected,
            got: v.len(),
        });
    }
    Ok(v)
}

/// The level-scan algorithm shared by the date and duration variants.
///
/// 1. The active level is the finest one whose values differ across the
///    ticks; if everything down to seconds is identical, sub-second digits
///    are assumed to carry the variation.
/// 2. A tick sitting on the canonical zero of the active level borrows the
///    zero format, which shows the parent period instead ("Jan" -> "2005").
/// 3. At the seconds level, trailing zero digits shared by every label are
///    stripped so "0.500000"/"1.000000" render as "0.5"/"1".
/// 4. The offset string (shown once by the host) is the offset format
///    applied to the last tick; it is suppressed entirely when a coarse
///    level already spells the year out in the labels.
fn format_concise<F>(
    tuples: &[[i64; LEVELS]],
    zerovals: &[i64; LEVELS],
    second_level_zero: &[bool],
    formats: &[String],
    zero_formats: &[String],
    offset_formats: &[String],
    show_offset: bool,
    render: F,
) -> Result<TickLabels>
where
    F: Fn(usize, &str) -> Result<String>,
{
    if tuples.is_empty() {
        return Ok(TickLabels::default());
    }

    let mut show_offset = show_offset;
    let mut level = 5usize;
    for lv in (0..LEVELS).rev() {
        let first = tuples[0][lv];
        if tuples.iter().any(|t| t[lv] != first) {
            if lv < 2 && tuples.iter().any(|t| t[lv] == 1) {
                // a year-1 or January tick already carries the year in its
                // zero label, so an offset would repeat (or contradict) it
                show_offset = false;
            }
            level = lv;
            break;
        } else if lv == 0 {
            level = 5;
        }
    }

    let mut labels = Vec::with_capacity(tuples.len());
    for (i, t) in tuples.iter().enumerate() {
        let fmt = if level < 5 {
            if t[level] == zerovals[level] {
                &zero_formats[level]
            } else {
                &formats[level]
            }
        } else if second_level_zero[i] {
            &zero_formats[5]
        } else {
            &formats[5]
        };
        labels.push(render(i, fmt)?);
    }

    if level >= 5 {
        let trailing = labels
            .iter()
            .filter(|s| s.contains('.'))
            .map(|s| s.len() - s.trim_end_matches('0').len())
            .min()
            .unwrap_or(0);
        if trailing > 0 {
            for s in labels.iter_mut() {
                if s.contains('.') {
                    s.truncate(s.len() - trailing);
                    while s.ends_with('.') {
                        s.pop();
                    }
                }
            }
        }
    }

    let offset = if show_offset {
        render(tuples.len() - 1, &offset_formats[level])?
    } else {
        String::new()
    };

    Ok(TickLabels { labels, offset })
}

// ---- dates ------------------------------------------------------------------

/// Figures out the most compact date labels that are still complete,
/// normally fed by the auto locator's plan.
pub struct ConciseDateFormatter {
    ctx: Arc<AxisContext>,
    tz: FixedOffset,
    formats: Vec<String>,
    zero_formats: Vec<String>,
    offset_formats: Vec<String>,
    show_offset: bool,
}

impl ConciseDateFormatter {
    pub fn new(ctx: Arc<AxisContext>, tz: FixedOffset) -> Self {
        Self {
            ctx,
            tz,
            formats: vec![
                "%Y".into(),
                "%b".into(),
                "%d".into(),
                "%H:%M".into(),
                "%H:%M".into(),
                "%S%.6f".into(),
            ],
            zero_formats: vec![
                "".into(),
                "%Y".into(),
                "%b".into(),
                "%b-%d".into(),
                "%H:%M".into(),
                "%H:%M".into(),
            ],
            offset_formats: vec![
                "".into(),
                "%Y".into(),
                "%Y-%b".into(),
                "%Y-%b-%d".into(),
                "%Y-%b-%d".into(),
                "%Y-%b-%d %H:%M".into(),
            ],
            show_offset: true,
        }
    }

    /// Build with user-supplied tables; each table must have 6 entries
    /// (years through seconds). Omitted zero formats borrow the custom
    /// formats shifted one level up.
    pub fn with_tables(
        ctx: Arc<AxisContext>,
        tz: FixedOffset,
        formats: Option<Vec<String>>,
        zero_formats: Option<Vec<String>>,
        offset_formats: Option<Vec<String>>,
        show_offset: bool,
    ) -> Result<Self> {
        let mut out = Self::new(ctx, tz);
        out.show_offset = show_offset;
        if let Some(f) = formats {
            out.formats = to_array(f, LEVELS)?;
            out.zero_formats = std::iter::once(String::new())
                .chain(out.formats[..LEVELS - 1].iter().cloned())
                .collect();
        }
        if let Some(z) = zero_formats {
            out.zero_formats = to_array(z, LEVELS)?;
        }
        if let Some(o) = offset_formats {
            out.offset_formats = to_array(o, LEVELS)?;
        }
        for p in out
            .formats
            .iter()
            .chain(out.zero_formats.iter())
            .chain(out.offset_formats.iter())
        {
            validate_date_pattern(p)?;
        }
        Ok(out)
    }

    /// Full render of one value for cursor readouts.
    pub fn data_short(&self, x: f64) -> Result<String> {
        let dt = codec::num_to_date(&self.ctx, x, self.tz)?;
        strftime(&dt, "%Y-%m-%d %H:%M:%S")
    }
}

impl TickFormatter for ConciseDateFormatter {
    fn format_ticks(&self, plan: &TickPlan) -> Result<TickLabels> {
        let dts = plan
            .positions
            .iter()
            .map(|&x| codec::num_to_date(&self.ctx, x, self.tz))
            .collect::<Result<Vec<DateTime<FixedOffset>>>>()?;
        let tuples: Vec<[i64; LEVELS]> = dts
            .iter()
            .map(|dt| {
                [
                    dt.year() as i64,
                    dt.month() as i64,
                    dt.day() as i64,
                    dt.hour() as i64,
                    dt.minute() as i64,
                    dt.second() as i64,
                ]
            })
            .collect();
        let second_zero: Vec<bool> = dts
            .iter()
            .map(|dt| dt.second() == 0 && dt.nanosecond() / 1_000 == 0)
            .collect();
        format_concise(
            &tuples,
            &[0, 1, 1, 0, 0, 0],
            &second_zero,
            &self.formats,
            &self.zero_formats,
            &self.offset_formats,
            self.show_offset,
            |i, fmt| strftime(&dts[i], fmt),
        )
    }

    fn format_value(&self, x: f64) -> Result<String> {
        let dt = codec::num_to_date(&self.ctx, x, self.tz)?;
        strftime(&dt, "%Y")
    }
}

// ---- durations --------------------------------------------------------------

/// Duration counterpart of [`ConciseDateFormatter`]: levels run days
/// through seconds, and every level's canonical zero is 0.
pub struct ConciseTimedeltaFormatter {
    formats: Vec<String>,
    zero_formats: Vec<String>,
    offset_formats: Vec<String>,
    show_offset: bool,
}

const DURATION_LEVELS: usize = 4;

impl ConciseTimedeltaFormatter {
    pub fn new() -> Self {
        Self::assemble(
            vec!["%d d".into(), "%-H:%M".into(), "%-H:%M".into(), "%-S.%f".into()],
            vec!["%d d".into(), "%d d".into(), "%-H:%M".into(), "%-H:%M".into()],
            vec!["".into(), "".into(), "%d days".into(), "%d days %-H:%M".into()],
            true,
        )
    }

    /// Build with user-supplied 4-entry tables (days through seconds).
    pub fn with_tables(
        formats: Option<Vec<String>>,
        zero_formats: Option<Vec<String>>,
        offset_formats: Option<Vec<String>>,
        show_offset: bool,
    ) -> Result<Self> {
        let formats = match formats {
            Some(f) => to_array(f, DURATION_LEVELS)?,
            None => vec!["%d d".into(), "%-H:%M".into(), "%-H:%M".into(), "%-S.%f".into()],
        };
        let zero_formats = match zero_formats {
            Some(z) => to_array(z, DURATION_LEVELS)?,
            // a day boundary is always labelled as whole days
            None => std::iter::once("%d d".to_string())
                .chain(formats[..DURATION_LEVELS - 1].iter().cloned())
                .collect(),
        };
        let offset_formats = match offset_formats {
            Some(o) => to_array(o, DURATION_LEVELS)?,
            None => vec!["".into(), "".into(), "%d days".into(), "%d days %-H:%M".into()],
        };
        for p in formats
            .iter()
            .chain(zero_formats.iter())
            .chain(offset_formats.iter())
        {
            format_duration(TimeDelta::zero(), p)?;
        }
        Ok(Self::assemble(formats, zero_formats, offset_formats, show_offset))
    }

    /// Extend the 4-entry day..second tables to the 6 shared levels; the
    /// year and month slots never match duration tuples.
    fn assemble(
        formats: Vec<String>,
        zero_formats: Vec<String>,
        offset_formats: Vec<String>,
        show_offset: bool,
    ) -> Self {
        let pad = |v: Vec<String>| -> Vec<String> {
            let mut out = vec![String::new(), String::new()];
            out.extend(v);
            out
        };
        Self {
            formats: pad(formats),
            zero_formats: pad(zero_formats),
            offset_formats: pad(offset_formats),
            show_offset,
        }
    }

    pub fn data_short(&self, x: f64) -> Result<String> {
        format_duration(codec::num_to_duration(x), "%d d %H:%M:%S")
    }

    fn timetuple(td: TimeDelta) -> [i64; LEVELS] {
        let total_us = td.num_microseconds().unwrap_or(0);
        let d = total_us.div_euclid(86_400_000_000);
        let rem = total_us.rem_euclid(86_400_000_000);
        let h = rem / 3_600_000_000;
        let m = (rem / 60_000_000) % 60;
        let s = (rem / 1_000_000) % 60;
        [0, 0, d, h, m, s]
    }
}

impl Default for ConciseTimedeltaFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickFormatter for ConciseTimedeltaFormatter {
    fn format_ticks(&self, plan: &TickPlan) -> Result<TickLabels> {
        let tds: Vec<TimeDelta> = plan
            .positions
            .iter()
            .map(|&x| codec::num_to_duration(x))
            .collect();
        let tuples: Vec<[i64; LEVELS]> = tds.iter().map(|&td| Self::timetuple(td)).collect();
        let second_zero: Vec<bool> = tds
            .iter()
            .map(|td| td.num_microseconds().unwrap_or(0) % 60_000_000 == 0)
            .collect();
        format_concise(
            &tuples,
            &[0, 0, 0, 0, 0, 0],
            &second_zero,
            &self.formats,
            &self.zero_formats,
            &self.offset_formats,
            self.show_offset,
            |i, fmt| format_duration(tds[i], fmt),
        )
    }

    fn format_value(&self, x: f64) -> Result<String> {
        format_duration(codec::num_to_duration(x), "%d d")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_table_length_rejected() {
        let err = ConciseTimedeltaFormatter::with_tables(
            Some(vec!["%d d".into(), "%-H:%M".into()]),
            None,
            None,
            true,
        );
        assert!(matches!(
            err,
            Err(TimetickError::BadFormatTable { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn duration_timetuple_floors() {
        let td = TimeDelta::days(2) + TimeDelta::hours(3) + TimeDelta::minutes(4);
        assert_eq!(ConciseTimedeltaFormatter::timetuple(td), [0, 0, 2, 3, 4, 0]);
        let td = -TimeDelta::hours(1);
        assert_eq!(ConciseTimedeltaFormatter::timetuple(td), [0, 0, -1, 23, 0, 0]);
    }
}
