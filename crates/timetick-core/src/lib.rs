// File: crates/timetick-core/src/lib.rs
// Summary: Core library entry point; exports the temporal axis codec, locators and formatters.

pub mod codec;
pub mod concise;
pub mod config;
pub mod context;
pub mod convert;
pub mod durfmt;
pub mod error;
pub mod format;
pub mod locate;
pub mod rule;

pub use codec::{
    date_range, date_to_num, duration_to_num, num_to_date, num_to_duration, resolve_timezone,
    seq_to_num, to_num, TemporalValue,
};
pub use concise::{ConciseDateFormatter, ConciseTimedeltaFormatter};
pub use config::{AutoFormats, Config, ConverterChoice};
pub use context::AxisContext;
pub use convert::{
    AxisInfo, ConciseDateConverter, ConciseTimedeltaConverter, ConverterRegistry, DateConverter,
    HostAxis, SwitchableDateConverter, SwitchableTimedeltaConverter, TimedeltaConverter,
    UnitConverter,
};
pub use durfmt::{format_duration, format_duration_num};
pub use error::{Result, TimetickError};
pub use format::{
    AutoDateFormatter, AutoTimedeltaFormatter, DateFormatter, DurationFormatter, ScaledFormat,
    TickFormatter, TickLabels,
};
pub use locate::{
    AutoDateLocator, AutoTimedeltaLocator, MicrosecondLocator, RuleLocator, TickLocator, TickPlan,
    TimedeltaLocator, YearLocator,
};
pub use rule::{ByFields, CalendarRule, Frequency};
