use std::any::Any;

use super::{
    claim_append_slot, claim_set_slot, parse_bool_literal, ColumnVector, TypeKind, VectorBase,
};
use crate::buffer::AlignedBuffer;
use crate::ColumnarError;

const ALIGNMENT: usize = 32;
const MAX_WIDTH_INT16: u8 = 4;
const MAX_WIDTH_INT32: u8 = 9;
const MAX_WIDTH_INT64: u8 = 18;
const MAX_WIDTH_INT128: u8 = 38;

/// The storage width a decimal vector picks from its precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalType {
    Int16,
    Int32,
    Int64,
    Int128,
}

impl PhysicalType {
    fn for_precision(precision: u8) -> Option<Self> {
        match precision {
            0 => None,
            p if p <= MAX_WIDTH_INT16 => Some(PhysicalType::Int16),
            p if p <= MAX_WIDTH_INT32 => Some(PhysicalType::Int32),
            p if p <= MAX_WIDTH_INT64 => Some(PhysicalType::Int64),
            p if p <= MAX_WIDTH_INT128 => Some(PhysicalType::Int128),
            _ => None,
        }
    }

    pub fn width(self) -> usize {
        match self {
            PhysicalType::Int16 => 2,
            PhysicalType::Int32 => 4,
            PhysicalType::Int64 => 8,
            PhysicalType::Int128 => 16,
        }
    }

    fn fits(self, value: i128) -> bool {
        match self {
            PhysicalType::Int16 => i16::try_from(value).is_ok(),
            PhysicalType::Int32 => i32::try_from(value).is_ok(),
            PhysicalType::Int64 => i64::try_from(value).is_ok(),
            PhysicalType::Int128 => true,
        }
    }
}

#[derive(Debug)]
enum DecimalStorage {
    Int16(AlignedBuffer<i16>),
    Int32(AlignedBuffer<i32>),
    Int64(AlignedBuffer<i64>),
    Int128(AlignedBuffer<i128>),
}

impl DecimalStorage {
    fn new(physical_type: PhysicalType, len: usize) -> Self {
        match physical_type {
            PhysicalType::Int16 => DecimalStorage::Int16(AlignedBuffer::new(ALIGNMENT, len)),
            PhysicalType::Int32 => DecimalStorage::Int32(AlignedBuffer::new(ALIGNMENT, len)),
            PhysicalType::Int64 => DecimalStorage::Int64(AlignedBuffer::new(ALIGNMENT, len)),
            PhysicalType::Int128 => DecimalStorage::Int128(AlignedBuffer::new(ALIGNMENT, len)),
        }
    }

    fn get(&self, index: usize) -> Option<i128> {
        match self {
            DecimalStorage::Int16(buf) => buf.get(index).map(|&v| i128::from(v)),
            DecimalStorage::Int32(buf) => buf.get(index).map(|&v| i128::from(v)),
            DecimalStorage::Int64(buf) => buf.get(index).map(|&v| i128::from(v)),
            DecimalStorage::Int128(buf) => buf.get(index).copied(),
        }
    }

    /// `value` must already be known to fit the storage width.
    fn put(&mut self, index: usize, value: i128) {
        match self {
            DecimalStorage::Int16(buf) => buf[index] = value as i16,
            DecimalStorage::Int32(buf) => buf[index] = value as i32,
            DecimalStorage::Int64(buf) => buf[index] = value as i64,
            DecimalStorage::Int128(buf) => buf[index] = value,
        }
    }

    fn grow(&mut self, size: usize, preserve_data: bool) {
        match self {
            DecimalStorage::Int16(buf) => buf.grow(size, preserve_data),
            DecimalStorage::Int32(buf) => buf.grow(size, preserve_data),
            DecimalStorage::Int64(buf) => buf.grow(size, preserve_data),
            DecimalStorage::Int128(buf) => buf.grow(size, preserve_data),
        }
    }

    fn release(&mut self) {
        match self {
            DecimalStorage::Int16(buf) => buf.release(),
            DecimalStorage::Int32(buf) => buf.release(),
            DecimalStorage::Int64(buf) => buf.release(),
            DecimalStorage::Int128(buf) => buf.release(),
        }
    }
}

/// The decimal column vector with precision and scale.
///
/// The values of this column vector are the unscaled integer value of the
/// decimal. For example, the unscaled value of 3.14, which is of the type
/// decimal(3,2), is 314, while the precision and scale of this decimal are 3
/// and 2, respectively. Precisions up to 38 are supported; the storage width
/// is fixed by the precision for the lifetime of the vector.
#[derive(Debug)]
pub struct DecimalColumnVector {
    base: VectorBase,
    vector: DecimalStorage,
    precision: u8,
    scale: u8,
    physical_type: PhysicalType,
}

impl DecimalColumnVector {
    pub fn new(len: usize, precision: u8, scale: u8, encoding: bool) -> Result<Self, ColumnarError> {
        let physical_type = PhysicalType::for_precision(precision).ok_or(
            ColumnarError::UnsupportedPrecision {
                kind: TypeKind::Decimal,
                precision,
            },
        )?;
        if scale > precision {
            return Err(ColumnarError::ValueOutOfRange(format!(
                "decimal scale {} exceeds precision {}",
                scale, precision
            )));
        }
        Ok(Self {
            base: VectorBase::new(len, physical_type.width(), encoding),
            vector: DecimalStorage::new(physical_type, len),
            precision,
            scale,
            physical_type,
        })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// Appends an unscaled value.
    pub fn add(&mut self, unscaled: i128) -> Result<(), ColumnarError> {
        self.check_width(unscaled)?;
        let index = claim_append_slot(self);
        self.vector.put(index, unscaled);
        Ok(())
    }

    pub fn set(&mut self, index: usize, unscaled: i128) -> Result<(), ColumnarError> {
        self.check_width(unscaled)?;
        claim_set_slot(self, index);
        self.vector.put(index, unscaled);
        Ok(())
    }

    /// The unscaled value stored at `index`.
    pub fn unscaled(&self, index: usize) -> Option<i128> {
        self.vector.get(index)
    }

    /// The value under the read cursor, `None` once the storage is gone.
    pub fn current(&self) -> Option<i128> {
        self.vector.get(self.read_index())
    }

    fn check_width(&self, unscaled: i128) -> Result<(), ColumnarError> {
        if self.physical_type.fits(unscaled) {
            Ok(())
        } else {
            Err(ColumnarError::ValueOutOfRange(format!(
                "{} does not fit a {:?} decimal",
                unscaled, self.physical_type
            )))
        }
    }
}

/// Parses `[+-]digits[.digits]` into an unscaled integer at `scale`.
///
/// Missing fractional digits are filled with zeros; extra ones are rounded
/// half away from zero. The result must have at most `precision` digits.
fn parse_unscaled(literal: &str, precision: u8, scale: u8) -> Result<i128, ColumnarError> {
    let malformed = || ColumnarError::ParseError(format!("decimal `{}`", literal));
    let overflow = || {
        ColumnarError::ValueOutOfRange(format!(
            "decimal `{}` exceeds precision {} scale {}",
            literal, precision, scale
        ))
    };

    let (negative, body) = match literal.as_bytes().first() {
        Some(b'-') => (true, &literal[1..]),
        Some(b'+') => (false, &literal[1..]),
        _ => (false, literal),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !is_digits(int_part) || !is_digits(frac_part)
    {
        return Err(malformed());
    }

    let scale = usize::from(scale);
    let kept = &frac_part[..frac_part.len().min(scale)];
    let push_digit = |acc: i128, digit: u8| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(i128::from(digit)))
    };
    let mut unscaled: i128 = 0;
    for digit in int_part.bytes().chain(kept.bytes()) {
        unscaled = push_digit(unscaled, digit - b'0').ok_or_else(overflow)?;
    }
    for _ in kept.len()..scale {
        unscaled = push_digit(unscaled, 0).ok_or_else(overflow)?;
    }
    if frac_part.len() > scale && frac_part.as_bytes()[scale] >= b'5' {
        unscaled = unscaled.checked_add(1).ok_or_else(overflow)?;
    }
    if unscaled >= 10i128.pow(u32::from(precision)) {
        return Err(overflow());
    }
    Ok(if negative { -unscaled } else { unscaled })
}

impl ColumnVector for DecimalColumnVector {
    fn base(&self) -> &VectorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut VectorBase {
        &mut self.base
    }

    fn type_kind(&self) -> TypeKind {
        TypeKind::Decimal
    }

    fn value_width(&self) -> usize {
        self.physical_type.width()
    }

    fn resize_values(&mut self, size: usize, preserve_data: bool) {
        self.vector.grow(size, preserve_data);
    }

    fn release_values(&mut self) {
        self.vector.release();
    }

    fn add_str(&mut self, value: &str) -> Result<(), ColumnarError> {
        let value = value.trim();
        if let Some(flag) = parse_bool_literal(value) {
            self.add_bool(flag);
            return Ok(());
        }
        let unscaled = parse_unscaled(value, self.precision, self.scale)?;
        self.add(unscaled)
    }

    fn add_bool(&mut self, value: bool) {
        // 0 and 1 fit every storage width.
        let index = claim_append_slot(self);
        self.vector.put(index, i128::from(value));
    }

    fn dump(&self, _row_count: usize) -> Result<String, ColumnarError> {
        Err(ColumnarError::Unsupported(
            "dump of a decimal column vector".to_string(),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
