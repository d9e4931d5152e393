// File: crates/timetick-core/src/durfmt.rs
// Summary: Duration format mini-language (%d, %H:%M:%S, total-unit and microsecond codes).

use chrono::TimeDelta;

use crate::codec::num_to_duration;
use crate::error::{Result, TimetickError};

/// Render a duration with an explicit format string.
///
/// Supported codes:
///   %d   days (no zero padding; there is no upper bound on digits)
///   %H %M %S   zero-padded hours/minutes/seconds within the day
///   %-H %-M %-S   the same without zero padding
///   %>H %>M %>S   totals spanning day boundaries (3 days -> "72" hours)
///   %f   microseconds, zero-padded to 6 digits
///   %%   a literal percent sign
///
/// Negative durations render with a single leading minus. Unknown codes
/// are rejected.
pub fn format_duration(td: TimeDelta, pattern: &str) -> Result<String> {
    let total_us = td.num_microseconds().unwrap_or(i64::MAX);
    let sign = if total_us < 0 { "-" } else { "" };
    let a = total_us.unsigned_abs();

    let us = a % 1_000_000;
    let total_s = a / 1_000_000;
    let d = total_s / 86_400;
    let total_h = total_s / 3_600;
    let total_m = total_s / 60;
    let h = total_h % 24;
    let m = total_m % 60;
    let s = total_s % 60;

    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let code = chars.next().ok_or_else(|| bad_pattern(pattern))?;
        match code {
            '%' => out.push('%'),
            'd' => out.push_str(&d.to_string()),
            'H' => out.push_str(&format!("{h:02}")),
            'M' => out.push_str(&format!("{m:02}")),
            'S' => out.push_str(&format!("{s:02}")),
            'f' => out.push_str(&format!("{us:06}")),
            '-' => match chars.next() {
                Some('H') => out.push_str(&h.to_string()),
                Some('M') => out.push_str(&m.to_string()),
                Some('S') => out.push_str(&s.to_string()),
                _ => return Err(bad_pattern(pattern)),
            },
            '>' => match chars.next() {
                Some('H') => out.push_str(&total_h.to_string()),
                Some('M') => out.push_str(&total_m.to_string()),
                Some('S') => out.push_str(&total_s.to_string()),
                _ => return Err(bad_pattern(pattern)),
            },
            _ => return Err(bad_pattern(pattern)),
        }
    }
    Ok(format!("{sign}{out}"))
}

/// Render an axis number (days) with a duration format string.
pub fn format_duration_num(x: f64, pattern: &str) -> Result<String> {
    format_duration(num_to_duration(x), pattern)
}

fn bad_pattern(pattern: &str) -> TimetickError {
    TimetickError::InvalidPattern(pattern.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_codes() {
        let td = TimeDelta::days(1) + TimeDelta::hours(12) + TimeDelta::minutes(3);
        assert_eq!(format_duration(td, "%d d %H:%M:%S").unwrap(), "1 d 12:03:00");
        assert_eq!(format_duration(td, "%-H:%M").unwrap(), "12:03");
    }

    #[test]
    fn total_codes_span_days() {
        let td = TimeDelta::days(1) + TimeDelta::hours(12);
        assert_eq!(format_duration(td, "%>H:%M").unwrap(), "36:00");
        assert_eq!(format_duration(td, "%>M").unwrap(), "2160");
        assert_eq!(format_duration(td, "%>S").unwrap(), "129600");
    }

    #[test]
    fn negative_and_micros() {
        let td = -(TimeDelta::seconds(90) + TimeDelta::microseconds(250));
        assert_eq!(format_duration(td, "%-S.%f").unwrap(), "-30.000250");
        assert_eq!(format_duration(td, "%>S").unwrap(), "-90");
    }

    #[test]
    fn unknown_code_rejected() {
        let td = TimeDelta::zero();
        assert!(matches!(
            format_duration(td, "%q"),
            Err(TimetickError::InvalidPattern(_))
        ));
        assert!(format_duration(td, "trailing %").is_err());
    }
}
