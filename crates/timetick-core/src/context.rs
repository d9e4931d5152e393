// File: crates/timetick-core/src/context.rs
// Summary: Process-wide context owning the configuration and the single-assignment epoch cell.

use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::codec;
use crate::config::Config;
use crate::error::{Result, TimetickError};

/// Owns the engine's shared state: the configuration store and the epoch.
///
/// The host constructs one context at startup and hands out `Arc` handles
/// to converters and locators. The epoch transitions Unset -> Set exactly
/// once: either explicitly through [`AxisContext::set_epoch`] before any
/// conversion, or lazily from [`Config::epoch`] on first use. A second
/// explicit set fails.
pub struct AxisContext {
    config: RwLock<Config>,
    default_epoch: RwLock<DateTime<Utc>>,
    epoch: OnceLock<DateTime<Utc>>,
}

impl AxisContext {
    /// Build a context, validating the epoch and timezone strings up front.
    pub fn new(config: Config) -> Result<Self> {
        let default_epoch = parse_epoch(&config.epoch)?;
        codec::resolve_timezone(&config.timezone)?;
        Ok(Self {
            config: RwLock::new(config),
            default_epoch: RwLock::new(default_epoch),
            epoch: OnceLock::new(),
        })
    }

    /// Context with the stock configuration.
    pub fn with_defaults() -> Self {
        Self::new(Config::default()).expect("default configuration is valid")
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.config.read().expect("config lock poisoned").clone()
    }

    /// Let the host replace configuration values. Epoch and timezone strings
    /// are re-validated; a change to the epoch string only matters while the
    /// epoch cell is still unset.
    pub fn update_config(&self, f: impl FnOnce(&mut Config)) -> Result<()> {
        let mut guard = self.config.write().expect("config lock poisoned");
        let mut next = guard.clone();
        f(&mut next);
        let default_epoch = parse_epoch(&next.epoch)?;
        codec::resolve_timezone(&next.timezone)?;
        *guard = next;
        *self.default_epoch.write().expect("epoch lock poisoned") = default_epoch;
        Ok(())
    }

    /// Explicitly set the epoch. Fails once the cell is initialized, which
    /// also happens implicitly on the first conversion.
    pub fn set_epoch(&self, epoch: &str) -> Result<()> {
        let parsed = parse_epoch(epoch)?;
        self.epoch
            .set(parsed)
            .map_err(|_| TimetickError::EpochAlreadySet)
    }

    /// The epoch instant, initializing from the configuration if unset.
    pub fn epoch(&self) -> DateTime<Utc> {
        *self
            .epoch
            .get_or_init(|| *self.default_epoch.read().expect("epoch lock poisoned"))
    }

    /// Resolve the configured display timezone.
    pub fn timezone(&self) -> Result<FixedOffset> {
        codec::resolve_timezone(&self.config.read().expect("config lock poisoned").timezone)
    }
}

/// Parse an epoch string: an ISO datetime ("1970-01-01T00:00:00") or a bare
/// date, interpreted as UTC.
pub fn parse_epoch(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::from_str(s) {
        return Ok(Utc.from_utc_datetime(&dt));
    }
    if let Ok(d) = NaiveDate::from_str(s) {
        return Ok(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).expect("midnight is valid")));
    }
    Err(TimetickError::InvalidEpoch(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_set_twice_fails() {
        let ctx = AxisContext::with_defaults();
        ctx.set_epoch("2000-01-01").unwrap();
        assert!(matches!(
            ctx.set_epoch("2010-01-01"),
            Err(TimetickError::EpochAlreadySet)
        ));
    }

    #[test]
    fn epoch_lazily_defaults_then_locks() {
        let ctx = AxisContext::with_defaults();
        let e = ctx.epoch();
        assert_eq!(e, Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());
        // first read latched the cell; an explicit set now fails
        assert!(ctx.set_epoch("2000-01-01").is_err());
    }

    #[test]
    fn bad_epoch_string_rejected() {
        assert!(matches!(
            parse_epoch("not-a-date"),
            Err(TimetickError::InvalidEpoch(_))
        ));
    }
}
