// File: crates/timetick-core/src/error.rs
// Summary: Library error type covering range and configuration failures.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimetickError>;

/// Errors surfaced by the codec, locators and formatters.
///
/// Range-class errors (`OutOfRange`, `UnknownTimezone`) are always returned
/// to the caller; configuration-class errors are raised at construction or
/// setter time, never deferred to use time. Degraded-but-recoverable
/// situations (an exhausted interval table, an empty view) are handled with
/// a `log::warn!` or a documented fallback instead of an error.
#[derive(Debug, Error)]
pub enum TimetickError {
    /// An axis number decodes outside the supported calendar range.
    #[error("axis value {value} falls outside years 1-9999 relative to the configured epoch")]
    OutOfRange { value: f64 },

    /// A timezone string could not be resolved to a UTC offset.
    #[error("{0:?} is not a recognized timezone; expected \"UTC\" or a fixed offset like \"+02:00\"")]
    UnknownTimezone(String),

    /// The epoch cell was already initialized, either explicitly or by a
    /// previous conversion.
    #[error("epoch is already initialized; set_epoch must be called before any conversion")]
    EpochAlreadySet,

    /// An epoch string in the configuration could not be parsed.
    #[error("{0:?} is not a valid epoch; expected an ISO date or datetime")]
    InvalidEpoch(String),

    /// A format table had the wrong number of entries.
    #[error("format table must have {expected} entries, got {got}")]
    BadFormatTable { expected: usize, got: usize },

    /// A tick interval was zero or otherwise unusable.
    #[error("interval must be a positive integer")]
    BadInterval,

    /// A frequency makes no sense for the locator it was given to.
    #[error("{0} ticking is not supported by this locator")]
    UnsupportedFrequency(&'static str),

    /// A date or duration format pattern contains an unknown directive.
    #[error("invalid format pattern {0:?}")]
    InvalidPattern(String),
}
