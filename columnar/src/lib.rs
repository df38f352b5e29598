//! # pixels_columnar
//!
//! Column vectors and pixelized column writers for a columnar storage
//! format.
//!
//! A [column vector](vector::ColumnVector) is a typed, growable, null-aware
//! batch of rows. A [column writer](writer::ColumnWriter) consumes vectors
//! and produces one column chunk: the rows are cut into pixels of
//! `pixel_stride` rows, each pixel is written either run-length encoded or as
//! raw fixed-width integers, and the null flags of every pixel are collected
//! into a null stream appended when the chunk is flushed.
//!
//! ## Types
//!
//! | Type        | Vector                  | Physical value                           |
//! |-------------|-------------------------|------------------------------------------|
//! | `long`      | [`LongColumnVector`]    | `i64`                                    |
//! | `date`      | [`DateColumnVector`]    | `i32` days since 1970-01-01              |
//! | `timestamp` | [`TimestampColumnVector`] | `i64` ticks, `10^precision` per second |
//! | `decimal`   | [`DecimalColumnVector`] | unscaled `i16`/`i32`/`i64`/`i128`        |
//!
//! ## Encoding
//!
//! - [`EncodingLevel::EL2`] and above: integer writers run-length encode each
//!   pixel and never pad nulls.
//! - Below EL2: values are written raw in the configured [`ByteOrder`], with
//!   a zero slot for every null row when `nulls_padding` is set.
//! - Decimal writers always write raw values, 8 bytes each up to precision
//!   18 and 16 bytes beyond.
//!
//! ```ignore
//! let ty = TypeDescription::Date;
//! let mut vector = ty.create_column_vector(1024)?;
//! vector.add_str("2024-01-01")?;
//! vector.add_null();
//!
//! let mut writer = ty.create_column_writer(&WriterOption::default())?;
//! writer.write(vector.as_ref(), vector.write_index())?;
//! writer.flush()?;
//! let bytes = writer.column_chunk_content();
//! ```

mod buffer;
mod encoding;
mod err;
mod option;
mod stream;
mod strategy;
mod types;
pub mod vector;
pub mod writer;

pub use buffer::AlignedBuffer;
pub use encoding::{bit_wise_compact, write_fixed, FixedWidth};
pub use err::ColumnarError;
pub use option::{
    ByteOrder, ColumnChunkEncoding, EncodingKind, EncodingLevel, WriterOption,
    DEFAULT_PIXEL_STRIDE,
};
pub use stream::OutputStream;
pub use strategy::{decode_run_length, RunLenIntEncoder};
pub use types::TypeDescription;
pub use vector::{
    ColumnVector, DateColumnVector, DecimalColumnVector, IntegerVector, LongColumnVector,
    PhysicalType, TimestampColumnVector, TypeKind,
};
pub use writer::{
    ColumnChunkIndex, ColumnWriter, DateColumnWriter, DecimalColumnWriter, IntegerColumnWriter,
    LongColumnWriter, TimestampColumnWriter,
};

pub use postcard::Error as PostcardError;
