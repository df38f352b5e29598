use std::any::Any;

use chrono::{NaiveDateTime, Timelike};

use super::{
    claim_append_slot, claim_set_slot, parse_bool_literal, ColumnVector, IntegerVector,
    TypeKind, VectorBase,
};
use crate::buffer::AlignedBuffer;
use crate::ColumnarError;

const ALIGNMENT: usize = 64;
const DEFAULT_PRECISION: u8 = 6;
const MAX_PRECISION: u8 = 9;

/// Added to the parsed wall-clock seconds before they are scaled to ticks.
pub const DEFAULT_OFFSET_CORRECTION_SECS: i64 = 8 * 3600;

/// Timestamps stored as ticks since the epoch, `10^precision` ticks per
/// second.
#[derive(Debug)]
pub struct TimestampColumnVector {
    base: VectorBase,
    times: AlignedBuffer<i64>,
    precision: u8,
    offset_correction_secs: i64,
}

impl TimestampColumnVector {
    /// Precision `0` falls back to microseconds.
    pub fn new(len: usize, precision: u8, encoding: bool) -> Result<Self, ColumnarError> {
        let precision = match precision {
            0 => DEFAULT_PRECISION,
            p if p <= MAX_PRECISION => p,
            p => {
                return Err(ColumnarError::UnsupportedPrecision {
                    kind: TypeKind::Timestamp,
                    precision: p,
                })
            }
        };
        Ok(Self {
            base: VectorBase::new(len, std::mem::size_of::<i64>(), encoding),
            times: AlignedBuffer::new(ALIGNMENT, len),
            precision,
            offset_correction_secs: DEFAULT_OFFSET_CORRECTION_SECS,
        })
    }

    pub fn with_offset_correction(mut self, secs: i64) -> Self {
        self.offset_correction_secs = secs;
        self
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn add(&mut self, ticks: i64) {
        let index = claim_append_slot(self);
        self.times[index] = ticks;
    }

    pub fn set(&mut self, index: usize, ticks: i64) {
        claim_set_slot(self, index);
        self.times[index] = ticks;
    }

    pub fn times(&self) -> &[i64] {
        &self.times
    }

    fn parse_ticks(&self, value: &str) -> Result<i64, ColumnarError> {
        let parsed = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
            .map_err(|e| ColumnarError::ParseError(format!("timestamp `{}`: {}", value, e)))?;
        let seconds = parsed.and_utc().timestamp() + self.offset_correction_secs;
        let fraction = i64::from(parsed.nanosecond())
            / 10i64.pow(u32::from(MAX_PRECISION - self.precision));
        seconds
            .checked_mul(10i64.pow(u32::from(self.precision)))
            .and_then(|ticks| ticks.checked_add(fraction))
            .ok_or_else(|| ColumnarError::ValueOutOfRange(format!("timestamp `{}`", value)))
    }
}

impl ColumnVector for TimestampColumnVector {
    fn base(&self) -> &VectorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut VectorBase {
        &mut self.base
    }

    fn type_kind(&self) -> TypeKind {
        TypeKind::Timestamp
    }

    fn value_width(&self) -> usize {
        std::mem::size_of::<i64>()
    }

    fn resize_values(&mut self, size: usize, preserve_data: bool) {
        self.times.grow(size, preserve_data);
    }

    fn release_values(&mut self) {
        self.times.release();
    }

    fn add_str(&mut self, value: &str) -> Result<(), ColumnarError> {
        let value = value.trim();
        if let Some(flag) = parse_bool_literal(value) {
            self.add_bool(flag);
            return Ok(());
        }
        let ticks = self.parse_ticks(value)?;
        self.add(ticks);
        Ok(())
    }

    fn add_bool(&mut self, value: bool) {
        self.add(value as i64);
    }

    fn dump(&self, _row_count: usize) -> Result<String, ColumnarError> {
        Err(ColumnarError::Unsupported(
            "dump of a timestamp column vector".to_string(),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl IntegerVector for TimestampColumnVector {
    type Native = i64;
    const KIND: TypeKind = TypeKind::Timestamp;

    fn values(&self) -> &[i64] {
        &self.times
    }
}
