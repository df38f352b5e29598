use super::{ColumnWriter, WriterBase};
use crate::encoding::FixedWidth;
use crate::option::{ColumnChunkEncoding, WriterOption};
use crate::vector::{downcast, ColumnVector, DecimalColumnVector, PhysicalType, TypeKind};
use crate::ColumnarError;

/// Writes decimals row by row straight into the output stream.
///
/// Short decimals (precision up to 18) take 8 bytes per value and long
/// decimals 16, whatever width the vector stores them with. Decimal chunks
/// are never run-length encoded.
pub struct DecimalColumnWriter {
    base: WriterBase,
    scratch: Vec<u8>,
}

impl DecimalColumnWriter {
    pub fn new(option: &WriterOption) -> Result<Self, ColumnarError> {
        let base = WriterBase::new(option, Self::decide_nulls_padding(option))?;
        tracing::debug!(
            kind = %TypeKind::Decimal,
            nulls_padding = option.nulls_padding,
            pixel_stride = option.pixel_stride,
            "created column writer"
        );
        Ok(Self {
            base,
            scratch: Vec::with_capacity(16),
        })
    }

    pub fn decide_nulls_padding(option: &WriterOption) -> bool {
        option.nulls_padding
    }

    fn put_value(&mut self, unscaled: i128, wide: bool) {
        self.scratch.clear();
        let order = self.base.byte_order;
        if wide {
            unscaled.write_to(order, &mut self.scratch);
        } else {
            // short tiers always fit, the vector checks widths on insert
            (unscaled as i64).write_to(order, &mut self.scratch);
        }
        self.base.output.put_bytes(&self.scratch);
    }
}

impl ColumnWriter for DecimalColumnWriter {
    fn base(&self) -> &WriterBase {
        &self.base
    }

    fn write(&mut self, vector: &dyn ColumnVector, size: usize) -> Result<usize, ColumnarError> {
        self.base.check_write(vector, size)?;
        let vector = downcast::<DecimalColumnVector>(vector, TypeKind::Decimal)?;
        let wide = vector.physical_type() == PhysicalType::Int128;

        for i in 0..size {
            let null = vector.is_null(i);
            self.base.cur_pixel_ele_index += 1;
            self.base.record_nulls(&[null]);
            if !null {
                self.put_value(vector.unscaled(i).unwrap_or_default(), wide);
            } else if self.base.nulls_padding {
                self.put_value(0, wide);
            }
            if self.base.cur_pixel_ele_index >= self.base.pixel_stride {
                self.base.new_pixel();
            }
        }

        Ok(self.base.output.write_pos())
    }

    fn flush(&mut self) -> Result<(), ColumnarError> {
        if !self.base.check_flush()? {
            return Ok(());
        }
        if self.base.cur_pixel_ele_index > 0 {
            self.base.new_pixel();
        }
        self.base.finish_chunk();
        Ok(())
    }

    fn column_chunk_encoding(&self) -> ColumnChunkEncoding {
        ColumnChunkEncoding::from_run_length(false)
    }

    fn close(&mut self) {
        if self.base.closed {
            return;
        }
        self.scratch = Vec::new();
        self.base.close();
    }
}
