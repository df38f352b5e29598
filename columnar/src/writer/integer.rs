use std::marker::PhantomData;

use itertools::izip;

use super::{ColumnWriter, WriterBase};
use crate::encoding::write_fixed;
use crate::option::{ColumnChunkEncoding, EncodingLevel, WriterOption};
use crate::strategy::{RunLenIntEncoder, MAX_RLE_COUNT};
use crate::vector::{
    downcast, ColumnVector, DateColumnVector, IntegerVector, LongColumnVector,
    TimestampColumnVector,
};
use crate::ColumnarError;

pub type DateColumnWriter = IntegerColumnWriter<DateColumnVector>;
pub type TimestampColumnWriter = IntegerColumnWriter<TimestampColumnVector>;
pub type LongColumnWriter = IntegerColumnWriter<LongColumnVector>;

/// Writes an integer-backed vector type pixel by pixel.
///
/// Values are staged in a pixel-sized buffer of the vector's native width.
/// When a pixel fills up, the staged values are either run-length encoded or
/// written raw at the native width, depending on the encoding level the
/// writer was built with.
pub struct IntegerColumnWriter<V: IntegerVector> {
    base: WriterBase,
    cur_pixel_vector: Vec<V::Native>,
    encoder: Option<RunLenIntEncoder>,
    run_length: bool,
    _vector: PhantomData<fn(&V)>,
}

impl<V: IntegerVector> IntegerColumnWriter<V> {
    pub fn new(option: &WriterOption) -> Result<Self, ColumnarError> {
        let run_length = option.encoding_level.ge(EncodingLevel::EL2);
        if run_length && option.pixel_stride > MAX_RLE_COUNT {
            return Err(ColumnarError::InvalidOption(format!(
                "pixel_stride {} exceeds the run-length limit of {} rows",
                option.pixel_stride, MAX_RLE_COUNT
            )));
        }
        let nulls_padding = Self::decide_nulls_padding(option);
        let base = WriterBase::new(option, nulls_padding)?;
        tracing::debug!(
            kind = %V::KIND,
            run_length,
            nulls_padding,
            pixel_stride = option.pixel_stride,
            "created column writer"
        );
        Ok(Self {
            cur_pixel_vector: vec![V::Native::default(); option.pixel_stride],
            encoder: run_length.then(RunLenIntEncoder::new),
            run_length,
            base,
            _vector: PhantomData,
        })
    }

    /// Run-length encoding already tracks positions through the null stream,
    /// so padding is only honoured below EL2.
    pub fn decide_nulls_padding(option: &WriterOption) -> bool {
        if option.encoding_level.ge(EncodingLevel::EL2) {
            return false;
        }
        option.nulls_padding
    }

    fn write_cur_part(&mut self, vector: &V, offset: usize, len: usize) {
        let range = offset..offset + len;
        let values = &vector.values()[range.clone()];
        let nulls = &vector.null_flags()[range];
        for (&value, &null) in izip!(values, nulls) {
            if null {
                if self.base.nulls_padding {
                    self.cur_pixel_vector[self.base.cur_pixel_vector_index] = V::Native::default();
                    self.base.cur_pixel_vector_index += 1;
                }
            } else {
                self.cur_pixel_vector[self.base.cur_pixel_vector_index] = value;
                self.base.cur_pixel_vector_index += 1;
            }
        }
        self.base.cur_pixel_ele_index += len;
        self.base.record_nulls(nulls);
    }

    fn new_pixel(&mut self) -> Result<(), ColumnarError> {
        let staged = &self.cur_pixel_vector[..self.base.cur_pixel_vector_index];
        match self.encoder.as_mut() {
            Some(encoder) => {
                let encoded = encoder.encode(staged)?;
                self.base.output.put_bytes(&encoded);
            }
            None => {
                let raw = write_fixed(staged, self.base.byte_order);
                self.base.output.put_bytes(&raw);
            }
        }
        self.base.new_pixel();
        Ok(())
    }
}

impl<V: IntegerVector> ColumnWriter for IntegerColumnWriter<V> {
    fn base(&self) -> &WriterBase {
        &self.base
    }

    fn write(&mut self, vector: &dyn ColumnVector, size: usize) -> Result<usize, ColumnarError> {
        self.base.check_write(vector, size)?;
        let vector = downcast::<V>(vector, V::KIND)?;

        let pixel_stride = self.base.pixel_stride;
        let mut cur_part_offset = 0;
        let mut next_part_length = size;
        // Complete pixels first; the remainder stays staged for the next call.
        while self.base.cur_pixel_is_null_index + next_part_length >= pixel_stride {
            let cur_part_length = pixel_stride - self.base.cur_pixel_is_null_index;
            self.write_cur_part(vector, cur_part_offset, cur_part_length);
            self.new_pixel()?;
            cur_part_offset += cur_part_length;
            next_part_length = size - cur_part_offset;
        }
        self.write_cur_part(vector, cur_part_offset, next_part_length);

        Ok(self.base.output.write_pos())
    }

    fn flush(&mut self) -> Result<(), ColumnarError> {
        if !self.base.check_flush()? {
            return Ok(());
        }
        if self.base.cur_pixel_ele_index > 0 {
            self.new_pixel()?;
        }
        self.base.finish_chunk();
        Ok(())
    }

    fn column_chunk_encoding(&self) -> ColumnChunkEncoding {
        ColumnChunkEncoding::from_run_length(self.run_length)
    }

    fn close(&mut self) {
        if self.base.closed {
            return;
        }
        if let Some(mut encoder) = self.encoder.take() {
            encoder.clear();
        }
        self.cur_pixel_vector = Vec::new();
        self.base.close();
    }
}
