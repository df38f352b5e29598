//! Column writers turn the contents of column vectors into a pixelized
//! column chunk.
//!
//! Rows are grouped into pixels of `pixel_stride` rows. A pixel is flushed
//! to the output stream as soon as it is full, no matter how the rows were
//! split across `write` calls, so the chunk bytes only depend on the row
//! sequence. Each flushed pixel also appends its null flags, bit-packed, to
//! a chunk-level null stream that is written after the last pixel.

mod decimal;
mod integer;

pub use decimal::DecimalColumnWriter;
pub use integer::{DateColumnWriter, IntegerColumnWriter, LongColumnWriter, TimestampColumnWriter};

use serde::{Deserialize, Serialize};

use crate::encoding::bit_wise_compact;
use crate::option::{ByteOrder, ColumnChunkEncoding, WriterOption};
use crate::stream::OutputStream;
use crate::vector::ColumnVector;
use crate::ColumnarError;

/// Where each pixel of a chunk starts, and how many rows it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnChunkIndex {
    pub pixel_positions: Vec<usize>,
    pub pixel_row_counts: Vec<usize>,
    pub pixel_has_null: Vec<bool>,
    /// Offset of the null stream in the chunk, set by `flush`.
    pub is_null_offset: Option<usize>,
}

impl ColumnChunkIndex {
    pub fn pixel_count(&self) -> usize {
        self.pixel_positions.len()
    }
}

/// Pixel and null bookkeeping shared by every column writer.
pub struct WriterBase {
    pub(crate) output: OutputStream,
    is_null_stream: Vec<u8>,
    /// Null flags of the current pixel.
    pub(crate) is_null: Vec<bool>,
    pub(crate) pixel_stride: usize,
    pub(crate) cur_pixel_ele_index: usize,
    pub(crate) cur_pixel_is_null_index: usize,
    pub(crate) cur_pixel_vector_index: usize,
    pub(crate) has_null: bool,
    pub(crate) nulls_padding: bool,
    pub(crate) byte_order: ByteOrder,
    last_pixel_position: usize,
    chunk_index: ColumnChunkIndex,
    flushed: bool,
    closed: bool,
}

impl WriterBase {
    pub(crate) fn new(option: &WriterOption, nulls_padding: bool) -> Result<Self, ColumnarError> {
        option.validate()?;
        Ok(Self {
            output: OutputStream::new(),
            is_null_stream: Vec::new(),
            is_null: vec![false; option.pixel_stride],
            pixel_stride: option.pixel_stride,
            cur_pixel_ele_index: 0,
            cur_pixel_is_null_index: 0,
            cur_pixel_vector_index: 0,
            has_null: false,
            nulls_padding,
            byte_order: option.byte_order,
            last_pixel_position: 0,
            chunk_index: ColumnChunkIndex::default(),
            flushed: false,
            closed: false,
        })
    }

    /// Rejects writes the writer's lifecycle no longer allows, and row counts
    /// the vector cannot back. Runs before any state is touched.
    pub(crate) fn check_write(
        &self,
        vector: &dyn ColumnVector,
        size: usize,
    ) -> Result<(), ColumnarError> {
        if self.closed {
            return Err(ColumnarError::WriterClosed);
        }
        if self.flushed {
            return Err(ColumnarError::ChunkFinished);
        }
        if size > vector.write_index() {
            return Err(ColumnarError::RowCountOutOfRange {
                requested: size,
                available: vector.write_index(),
            });
        }
        Ok(())
    }

    /// Copies a run of null flags into the current pixel's bitmap.
    pub(crate) fn record_nulls(&mut self, nulls: &[bool]) {
        let start = self.cur_pixel_is_null_index;
        self.is_null[start..start + nulls.len()].copy_from_slice(nulls);
        self.cur_pixel_is_null_index += nulls.len();
        if nulls.contains(&true) {
            self.has_null = true;
        }
    }

    /// Closes the current pixel after its values reached the output stream.
    pub(crate) fn new_pixel(&mut self) {
        let nulls = &self.is_null[..self.cur_pixel_is_null_index];
        let pixel_has_null = nulls.contains(&true);
        self.is_null_stream
            .extend(bit_wise_compact(nulls, self.byte_order));

        self.chunk_index.pixel_positions.push(self.last_pixel_position);
        self.chunk_index
            .pixel_row_counts
            .push(self.cur_pixel_ele_index);
        self.chunk_index.pixel_has_null.push(pixel_has_null);
        self.last_pixel_position = self.output.write_pos();
        tracing::trace!(
            pixel = self.chunk_index.pixel_count() - 1,
            rows = self.cur_pixel_ele_index,
            end = self.last_pixel_position,
            "pixel flushed"
        );

        self.cur_pixel_ele_index = 0;
        self.cur_pixel_is_null_index = 0;
        self.cur_pixel_vector_index = 0;
    }

    pub(crate) fn check_flush(&self) -> Result<bool, ColumnarError> {
        if self.closed {
            return Err(ColumnarError::WriterClosed);
        }
        Ok(!self.flushed)
    }

    /// Appends the null stream after the last pixel. The trailing partial
    /// pixel must already have been flushed.
    pub(crate) fn finish_chunk(&mut self) {
        let offset = self.output.write_pos();
        if self.has_null {
            self.output.put_bytes(&self.is_null_stream);
        }
        self.chunk_index.is_null_offset = Some(offset);
        self.flushed = true;
        tracing::debug!(
            pixels = self.chunk_index.pixel_count(),
            bytes = self.output.write_pos(),
            has_null = self.has_null,
            "column chunk flushed"
        );
    }

    pub(crate) fn close(&mut self) {
        self.output.release();
        self.is_null_stream = Vec::new();
        self.is_null = Vec::new();
        self.closed = true;
    }
}

/// The operations every typed column writer exposes.
pub trait ColumnWriter: Send {
    fn base(&self) -> &WriterBase;

    /// Appends the first `size` rows of `vector` to the column chunk and
    /// returns the byte position of the output stream afterwards.
    fn write(&mut self, vector: &dyn ColumnVector, size: usize) -> Result<usize, ColumnarError>;

    /// Flushes the trailing partial pixel and appends the null stream.
    /// Further writes are rejected. Calling it again is a no-op.
    fn flush(&mut self) -> Result<(), ColumnarError>;

    fn column_chunk_encoding(&self) -> ColumnChunkEncoding;

    /// Releases the encoder and buffers. Calling it again is a no-op.
    fn close(&mut self);

    fn column_chunk_content(&self) -> &[u8] {
        self.base().output.as_bytes()
    }

    fn column_chunk_size(&self) -> usize {
        self.base().output.write_pos()
    }

    fn column_chunk_index(&self) -> &ColumnChunkIndex {
        &self.base().chunk_index
    }

    fn has_null(&self) -> bool {
        self.base().has_null
    }

    fn is_nulls_padding(&self) -> bool {
        self.base().nulls_padding
    }

    fn pixel_stride(&self) -> usize {
        self.base().pixel_stride
    }

    fn is_closed(&self) -> bool {
        self.base().closed
    }
}
