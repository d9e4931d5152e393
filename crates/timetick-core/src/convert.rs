// File: crates/timetick-core/src/convert.rs
// Summary: Axis-unit adapter: converters binding codec + locator + formatter to a host axis.

use std::sync::Arc;

use chrono::FixedOffset;

use crate::codec::{self, TemporalValue};
use crate::concise::{ConciseDateFormatter, ConciseTimedeltaFormatter};
use crate::config::ConverterChoice;
use crate::context::AxisContext;
use crate::error::Result;
use crate::format::{AutoDateFormatter, AutoTimedeltaFormatter, TickFormatter};
use crate::locate::{AutoDateLocator, AutoTimedeltaLocator, TickLocator};

/// The slice of the host's axis object this engine needs to see.
pub trait HostAxis {
    /// Current view bounds, in axis numbers. Not necessarily ordered.
    fn view_interval(&self) -> (f64, f64);
    /// Bounds of the data on the axis, in axis numbers.
    fn data_interval(&self) -> (f64, f64);
    /// Timezone tag attached to the axis data, if any.
    fn units(&self) -> Option<FixedOffset>;
}

/// What a converter hands back when the host asks how to tick an axis.
pub struct AxisInfo {
    pub locator: Box<dyn TickLocator>,
    pub formatter: Box<dyn TickFormatter>,
    /// View range to fall back on when the axis has no data.
    pub default_limits: (f64, f64),
    pub label: String,
}

/// Registered per value kind; the host asks it to convert values and to
/// produce the default locator/formatter pair.
pub trait UnitConverter {
    fn axis_info(&self, unit: Option<FixedOffset>, axis: &dyn HostAxis) -> Result<AxisInfo>;

    fn convert(&self, value: &TemporalValue) -> f64;

    /// Unit tag for a data set: the zone offset of its first instant.
    fn default_units(&self, data: &[TemporalValue], axis: &dyn HostAxis) -> Option<FixedOffset>;
}

fn first_offset(data: &[TemporalValue]) -> Option<FixedOffset> {
    data.iter().find_map(|v| match v {
        TemporalValue::Instant(dt) => Some(*dt.offset()),
        TemporalValue::Duration(_) => None,
    })
}

// ---- dates ------------------------------------------------------------------

/// Auto locator + threshold-table formatter for instant-valued axes.
pub struct DateConverter {
    ctx: Arc<AxisContext>,
    interval_multiples: bool,
}

impl DateConverter {
    pub fn new(ctx: Arc<AxisContext>, interval_multiples: bool) -> Self {
        Self {
            ctx,
            interval_multiples,
        }
    }
}

impl UnitConverter for DateConverter {
    fn axis_info(&self, unit: Option<FixedOffset>, _axis: &dyn HostAxis) -> Result<AxisInfo> {
        let tz = match unit {
            Some(tz) => tz,
            None => self.ctx.timezone()?,
        };
        Ok(AxisInfo {
            locator: Box::new(AutoDateLocator::new(
                self.ctx.clone(),
                tz,
                self.interval_multiples,
            )),
            formatter: Box::new(AutoDateFormatter::new(self.ctx.clone(), tz)),
            default_limits: (0.0, 1.0),
            label: String::new(),
        })
    }

    fn convert(&self, value: &TemporalValue) -> f64 {
        codec::to_num(&self.ctx, value)
    }

    fn default_units(&self, data: &[TemporalValue], _axis: &dyn HostAxis) -> Option<FixedOffset> {
        first_offset(data)
    }
}

/// Like [`DateConverter`] but pairs the locator with the concise
/// formatter, optionally carrying custom format tables.
pub struct ConciseDateConverter {
    ctx: Arc<AxisContext>,
    interval_multiples: bool,
    formats: Option<Vec<String>>,
    zero_formats: Option<Vec<String>>,
    offset_formats: Option<Vec<String>>,
    show_offset: bool,
}

impl ConciseDateConverter {
    pub fn new(ctx: Arc<AxisContext>, interval_multiples: bool) -> Self {
        Self {
            ctx,
            interval_multiples,
            formats: None,
            zero_formats: None,
            offset_formats: None,
            show_offset: true,
        }
    }

    pub fn with_tables(
        mut self,
        formats: Option<Vec<String>>,
        zero_formats: Option<Vec<String>>,
        offset_formats: Option<Vec<String>>,
        show_offset: bool,
    ) -> Self {
        self.formats = formats;
        self.zero_formats = zero_formats;
        self.offset_formats = offset_formats;
        self.show_offset = show_offset;
        self
    }
}

impl UnitConverter for ConciseDateConverter {
    fn axis_info(&self, unit: Option<FixedOffset>, _axis: &dyn HostAxis) -> Result<AxisInfo> {
        let tz = match unit {
            Some(tz) => tz,
            None => self.ctx.timezone()?,
        };
        let formatter = ConciseDateFormatter::with_tables(
            self.ctx.clone(),
            tz,
            self.formats.clone(),
            self.zero_formats.clone(),
            self.offset_formats.clone(),
            self.show_offset,
        )?;
        Ok(AxisInfo {
            locator: Box::new(AutoDateLocator::new(
                self.ctx.clone(),
                tz,
                self.interval_multiples,
            )),
            formatter: Box::new(formatter),
            default_limits: (0.0, 1.0),
            label: String::new(),
        })
    }

    fn convert(&self, value: &TemporalValue) -> f64 {
        codec::to_num(&self.ctx, value)
    }

    fn default_units(&self, data: &[TemporalValue], _axis: &dyn HostAxis) -> Option<FixedOffset> {
        first_offset(data)
    }
}

// ---- durations --------------------------------------------------------------

/// Auto locator + threshold-table formatter for duration-valued axes.
pub struct TimedeltaConverter {
    ctx: Arc<AxisContext>,
}

impl TimedeltaConverter {
    pub fn new(ctx: Arc<AxisContext>) -> Self {
        Self { ctx }
    }
}

impl UnitConverter for TimedeltaConverter {
    fn axis_info(&self, _unit: Option<FixedOffset>, _axis: &dyn HostAxis) -> Result<AxisInfo> {
        Ok(AxisInfo {
            locator: Box::new(AutoTimedeltaLocator::new()),
            formatter: Box::new(AutoTimedeltaFormatter::new()),
            default_limits: (0.0, 1.0),
            label: String::new(),
        })
    }

    fn convert(&self, value: &TemporalValue) -> f64 {
        codec::to_num(&self.ctx, value)
    }

    fn default_units(&self, _data: &[TemporalValue], _axis: &dyn HostAxis) -> Option<FixedOffset> {
        None
    }
}

/// Duration converter paired with the concise formatter.
pub struct ConciseTimedeltaConverter {
    ctx: Arc<AxisContext>,
    formats: Option<Vec<String>>,
    zero_formats: Option<Vec<String>>,
    offset_formats: Option<Vec<String>>,
    show_offset: bool,
}

impl ConciseTimedeltaConverter {
    pub fn new(ctx: Arc<AxisContext>) -> Self {
        Self {
            ctx,
            formats: None,
            zero_formats: None,
            offset_formats: None,
            show_offset: true,
        }
    }

    pub fn with_tables(
        mut self,
        formats: Option<Vec<String>>,
        zero_formats: Option<Vec<String>>,
        offset_formats: Option<Vec<String>>,
        show_offset: bool,
    ) -> Self {
        self.formats = formats;
        self.zero_formats = zero_formats;
        self.offset_formats = offset_formats;
        self.show_offset = show_offset;
        self
    }
}

impl UnitConverter for ConciseTimedeltaConverter {
    fn axis_info(&self, _unit: Option<FixedOffset>, _axis: &dyn HostAxis) -> Result<AxisInfo> {
        let formatter = ConciseTimedeltaFormatter::with_tables(
            self.formats.clone(),
            self.zero_formats.clone(),
            self.offset_formats.clone(),
            self.show_offset,
        )?;
        Ok(AxisInfo {
            locator: Box::new(AutoTimedeltaLocator::new()),
            formatter: Box::new(formatter),
            default_limits: (0.0, 1.0),
            label: String::new(),
        })
    }

    fn convert(&self, value: &TemporalValue) -> f64 {
        codec::to_num(&self.ctx, value)
    }

    fn default_units(&self, _data: &[TemporalValue], _axis: &dyn HostAxis) -> Option<FixedOffset> {
        None
    }
}

// ---- switching wrappers -----------------------------------------------------

/// Builds a fresh date converter on every call from the current
/// configuration, so flipping [`ConverterChoice`] takes effect without
/// rebuilding any axis.
pub struct SwitchableDateConverter {
    ctx: Arc<AxisContext>,
}

impl SwitchableDateConverter {
    pub fn new(ctx: Arc<AxisContext>) -> Self {
        Self { ctx }
    }

    fn current(&self) -> Box<dyn UnitConverter> {
        let cfg = self.ctx.config();
        match cfg.converter {
            ConverterChoice::Auto => Box::new(DateConverter::new(
                self.ctx.clone(),
                cfg.interval_multiples,
            )),
            ConverterChoice::Concise => Box::new(ConciseDateConverter::new(
                self.ctx.clone(),
                cfg.interval_multiples,
            )),
        }
    }
}

impl UnitConverter for SwitchableDateConverter {
    fn axis_info(&self, unit: Option<FixedOffset>, axis: &dyn HostAxis) -> Result<AxisInfo> {
        self.current().axis_info(unit, axis)
    }

    fn convert(&self, value: &TemporalValue) -> f64 {
        self.current().convert(value)
    }

    fn default_units(&self, data: &[TemporalValue], axis: &dyn HostAxis) -> Option<FixedOffset> {
        self.current().default_units(data, axis)
    }
}

/// Duration counterpart of [`SwitchableDateConverter`].
pub struct SwitchableTimedeltaConverter {
    ctx: Arc<AxisContext>,
}

impl SwitchableTimedeltaConverter {
    pub fn new(ctx: Arc<AxisContext>) -> Self {
        Self { ctx }
    }

    fn current(&self) -> Box<dyn UnitConverter> {
        match self.ctx.config().converter {
            ConverterChoice::Auto => Box::new(TimedeltaConverter::new(self.ctx.clone())),
            ConverterChoice::Concise => {
                Box::new(ConciseTimedeltaConverter::new(self.ctx.clone()))
            }
        }
    }
}

impl UnitConverter for SwitchableTimedeltaConverter {
    fn axis_info(&self, unit: Option<FixedOffset>, axis: &dyn HostAxis) -> Result<AxisInfo> {
        self.current().axis_info(unit, axis)
    }

    fn convert(&self, value: &TemporalValue) -> f64 {
        self.current().convert(value)
    }

    fn default_units(&self, data: &[TemporalValue], axis: &dyn HostAxis) -> Option<FixedOffset> {
        self.current().default_units(data, axis)
    }
}

/// Binds each value kind to its converter; the defaults are the switching
/// wrappers above.
pub struct ConverterRegistry {
    date: Box<dyn UnitConverter>,
    duration: Box<dyn UnitConverter>,
}

impl ConverterRegistry {
    pub fn with_defaults(ctx: &Arc<AxisContext>) -> Self {
        Self {
            date: Box::new(SwitchableDateConverter::new(ctx.clone())),
            duration: Box::new(SwitchableTimedeltaConverter::new(ctx.clone())),
        }
    }

    pub fn register_date(&mut self, converter: Box<dyn UnitConverter>) {
        self.date = converter;
    }

    pub fn register_duration(&mut self, converter: Box<dyn UnitConverter>) {
        self.duration = converter;
    }

    pub fn date(&self) -> &dyn UnitConverter {
        &*self.date
    }

    pub fn duration(&self) -> &dyn UnitConverter {
        &*self.duration
    }

    /// Dispatch on the value's kind.
    pub fn converter_for(&self, value: &TemporalValue) -> &dyn UnitConverter {
        match value {
            TemporalValue::Instant(_) => &*self.date,
            TemporalValue::Duration(_) => &*self.duration,
        }
    }
}
