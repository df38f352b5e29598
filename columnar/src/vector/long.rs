use std::any::Any;

use super::{
    claim_append_slot, claim_set_slot, parse_bool_literal, ColumnVector, IntegerVector,
    TypeKind, VectorBase,
};
use crate::buffer::AlignedBuffer;
use crate::ColumnarError;

const ALIGNMENT: usize = 32;

#[derive(Debug)]
pub struct LongColumnVector {
    base: VectorBase,
    vector: AlignedBuffer<i64>,
}

impl LongColumnVector {
    pub fn new(len: usize, encoding: bool) -> Self {
        Self {
            base: VectorBase::new(len, std::mem::size_of::<i64>(), encoding),
            vector: AlignedBuffer::new(ALIGNMENT, len),
        }
    }

    pub fn add(&mut self, value: i64) {
        let index = claim_append_slot(self);
        self.vector[index] = value;
    }

    pub fn set(&mut self, index: usize, value: i64) {
        claim_set_slot(self, index);
        self.vector[index] = value;
    }
}

impl ColumnVector for LongColumnVector {
    fn base(&self) -> &VectorBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut VectorBase {
        &mut self.base
    }

    fn type_kind(&self) -> TypeKind {
        TypeKind::Long
    }

    fn value_width(&self) -> usize {
        std::mem::size_of::<i64>()
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
        let parsed = value
            .parse::<i64>()
            .map_err(|e| ColumnarError::ParseError(format!("long `{}`: {}", value, e)))?;
        self.add(parsed);
        Ok(())
    }

    fn add_bool(&mut self, value: bool) {
        self.add(value as i64);
    }

    fn dump(&self, row_count: usize) -> Result<String, ColumnarError> {
        let rows = row_count.min(self.write_index());
        let lines: Vec<String> = self.vector[..rows]
            .iter()
            .enumerate()
            .map(|(i, value)| {
                if self.is_null(i) {
                    "null".to_string()
                } else {
                    value.to_string()
                }
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl IntegerVector for LongColumnVector {
    type Native = i64;
    const KIND: TypeKind = TypeKind::Long;

    fn values(&self) -> &[i64] {
        &self.vector
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_integers() {
        let mut vector = LongColumnVector::new(2, false);
        vector.add_str(" -42 ").unwrap();
        vector.add_str("False").unwrap();
        assert!(vector.add_str("4.2").is_err());
        assert_eq!(vector.values(), &[-42, 0]);
        assert!(!vector.is_encoding());
        assert_eq!(vector.dump(1).unwrap(), "-42");
    }
}
