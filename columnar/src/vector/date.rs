use std::any::Any;

use chrono::{Datelike, NaiveDate};

use super::{
    claim_append_slot, claim_set_slot, parse_bool_literal, ColumnVector, IntegerVector,
    TypeKind, VectorBase,
};
use crate::buffer::AlignedBuffer;
use crate::ColumnarError;

const ALIGNMENT: usize = 32;
/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Dates stored as signed day offsets from 1970-01-01.
#[derive(Debug)]
pub struct DateColumnVector {
    base: VectorBase,
    dates: AlignedBuffer<i32>,
}

impl DateColumnVector {
    pub fn new(len: usize, encoding: bool) -> Self {
        Self {
            base: VectorBase::new(len, std::mem::size_of::<i32>(), encoding),
            dates: AlignedBuffer::new(ALIGNMENT, len),
        }
    }

    pub fn add(&mut self, days: i32) {
        let index = claim_append_slot(self);
        self.dates[index] = days;
    }

    /// Writes the days since 1970-01-01 at `index`.
    pub fn set(&mut self, index: usize, days: i32) {
        claim_set_slot(self, index);
        self.dates[index] = days;
    }

    pub fn dates(&self) -> &[i32] {
        &self.dates
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn date_from_days(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

impl ColumnVector for DateColumnVector {
    fn base(&self) -> &VectorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut VectorBase {
        &mut self.base
    }

    fn type_kind(&self) -> TypeKind {
        TypeKind::Date
    }

    fn value_width(&self) -> usize {
        std::mem::size_of::<i32>()
    }

    fn resize_values(&mut self, size: usize, preserve_data: bool) {
        self.dates.grow(size, preserve_data);
    }

    fn release_values(&mut self) {
        self.dates.release();
    }

    fn add_str(&mut self, value: &str) -> Result<(), ColumnarError> {
        let value = value.trim();
        if let Some(flag) = parse_bool_literal(value) {
            self.add_bool(flag);
            return Ok(());
        }
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|e| ColumnarError::ParseError(format!("date `{}`: {}", value, e)))?;
        self.add(days_since_epoch(date));
        Ok(())
    }

    fn add_bool(&mut self, value: bool) {
        self.add(value as i32);
    }

    fn dump(&self, row_count: usize) -> Result<String, ColumnarError> {
        let rows = row_count.min(self.write_index());
        let mut lines = Vec::with_capacity(rows);
        for (i, &days) in self.dates[..rows].iter().enumerate() {
            if self.is_null(i) {
                lines.push("null".to_string());
                continue;
            }
            match date_from_days(days) {
                Some(date) => lines.push(date.format("%Y-%m-%d").to_string()),
                None => lines.push(days.to_string()),
            }
        }
        Ok(lines.join("\n"))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl IntegerVector for DateColumnVector {
    type Native = i32;
    const KIND: TypeKind = TypeKind::Date;

    fn values(&self) -> &[i32] {
        &self.dates
    }
}
