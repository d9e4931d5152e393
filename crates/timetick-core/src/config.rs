// File: crates/timetick-core/src/config.rs
// Summary: Host configuration store: epoch, timezone, converter choice, default formats.

/// Which presentation the switching converters hand to the axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConverterChoice {
    /// Auto locator paired with the threshold-table formatter.
    Auto,
    /// Auto locator paired with the redundancy-eliminating formatter.
    Concise,
}

/// Per-granularity patterns used by the threshold-table date formatter.
#[derive(Clone, Debug)]
pub struct AutoFormats {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
    pub second: String,
    pub microsecond: String,
}

impl Default for AutoFormats {
    fn default() -> Self {
        Self {
            year: "%Y".into(),
            month: "%Y-%m".into(),
            day: "%Y-%m-%d".into(),
            hour: "%m-%d %H".into(),
            minute: "%d %H:%M".into(),
            second: "%H:%M:%S".into(),
            microsecond: "%H:%M:%S%.6f".into(),
        }
    }
}

/// Configuration the surrounding system provides to the engine.
///
/// Read-only from the engine's perspective; the host may replace values
/// through [`crate::AxisContext::update_config`] and the switching
/// converters pick the change up on their next call.
#[derive(Clone, Debug)]
pub struct Config {
    /// Zero point for instant conversions, as an ISO date or datetime.
    pub epoch: String,
    /// Default display timezone: "UTC" or a fixed offset like "+02:00".
    pub timezone: String,
    pub converter: ConverterChoice,
    /// Lock ticks to multiples of the interval ("nice" positions).
    pub interval_multiples: bool,
    pub autoformat: AutoFormats,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epoch: "1970-01-01T00:00:00".into(),
            timezone: "UTC".into(),
            converter: ConverterChoice::Auto,
            interval_multiples: true,
            autoformat: AutoFormats::default(),
        }
    }
}
