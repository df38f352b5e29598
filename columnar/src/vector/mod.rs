//! Typed, growable, null-aware batches of row values.
//!
//! Every vector wraps a [`VectorBase`] holding the bookkeeping shared by all
//! logical types (null flags, cursors, capacity, memory accounting) and owns
//! exactly one [`AlignedBuffer`](crate::buffer::AlignedBuffer) of its
//! physical width. The null flags are independent of value storage: the
//! value stored at a null row is unspecified.

mod date;
mod decimal;
mod long;
mod timestamp;

use std::any::Any;
use std::fmt::{self, Debug, Display};

pub use date::DateColumnVector;
pub use decimal::{DecimalColumnVector, PhysicalType};
pub use long::LongColumnVector;
pub use timestamp::{TimestampColumnVector, DEFAULT_OFFSET_CORRECTION_SECS};

use crate::encoding::FixedWidth;
use crate::ColumnarError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Long,
    Date,
    Decimal,
    Timestamp,
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Long => "long",
            TypeKind::Date => "date",
            TypeKind::Decimal => "decimal",
            TypeKind::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Bookkeeping shared by every column vector.
#[derive(Debug, Clone)]
pub struct VectorBase {
    length: usize,
    write_index: usize,
    read_index: usize,
    is_null: Vec<bool>,
    no_nulls: bool,
    encoding: bool,
    memory_usage: usize,
    closed: bool,
}

impl VectorBase {
    pub(crate) fn new(length: usize, value_width: usize, encoding: bool) -> Self {
        Self {
            length,
            write_index: 0,
            read_index: 0,
            is_null: vec![false; length],
            no_nulls: true,
            encoding,
            memory_usage: length * (value_width + 1),
            closed: false,
        }
    }

    fn grow(&mut self, size: usize, preserve_data: bool, value_width: usize) {
        if !preserve_data {
            self.is_null.clear();
        }
        self.is_null.resize(size, false);
        self.memory_usage += (size - self.length) * (value_width + 1);
        self.length = size;
        // a closed vector that grows holds memory again
        self.closed = false;
    }

    fn close(&mut self) {
        self.is_null = Vec::new();
        self.length = 0;
        self.write_index = 0;
        self.read_index = 0;
        self.memory_usage = 0;
        self.closed = true;
    }
}

/// The capability set shared by all logical-type vectors.
pub trait ColumnVector: Any + Debug + Send {
    fn base(&self) -> &VectorBase;
    fn base_mut(&mut self) -> &mut VectorBase;
    fn type_kind(&self) -> TypeKind;
    /// Bytes one value occupies in the backing buffer.
    fn value_width(&self) -> usize;
    /// Grows the value buffer to `size` entries.
    fn resize_values(&mut self, size: usize, preserve_data: bool);
    fn release_values(&mut self);
    /// Parses `value` into the native representation and appends it. On error
    /// the vector is left untouched.
    fn add_str(&mut self, value: &str) -> Result<(), ColumnarError>;
    fn add_bool(&mut self, value: bool);
    /// Renders the first `row_count` rows one per line.
    fn dump(&self, row_count: usize) -> Result<String, ColumnarError>;
    fn as_any(&self) -> &dyn Any;

    /// Guarantees a capacity of at least `size` rows, copying the existing
    /// rows into the new buffer when `preserve_data` is set.
    fn ensure_size(&mut self, size: usize, preserve_data: bool) {
        let length = self.base().length;
        if size <= length {
            return;
        }
        tracing::debug!(
            kind = %self.type_kind(),
            from = length,
            to = size,
            preserve_data,
            "growing column vector"
        );
        self.resize_values(size, preserve_data);
        let width = self.value_width();
        self.base_mut().grow(size, preserve_data, width);
    }

    /// Appends a null row. The value slot keeps whatever it held before.
    fn add_null(&mut self) {
        let index = claim_append_slot(self);
        let base = self.base_mut();
        base.is_null[index] = true;
        base.no_nulls = false;
    }

    fn set_null(&mut self, index: usize) {
        claim_set_slot(self, index);
        let base = self.base_mut();
        base.is_null[index] = true;
        base.no_nulls = false;
    }

    /// Releases the backing memory. Calling it again is a no-op.
    fn close(&mut self) {
        if self.base().closed {
            return;
        }
        self.release_values();
        self.base_mut().close();
    }

    /// Rewinds both cursors and clears the null flags; capacity is kept.
    fn reset(&mut self) {
        let base = self.base_mut();
        base.write_index = 0;
        base.read_index = 0;
        base.no_nulls = true;
        base.is_null.iter_mut().for_each(|flag| *flag = false);
    }

    /// Number of rows the vector can hold before it has to grow.
    fn capacity(&self) -> usize {
        self.base().length
    }

    fn write_index(&self) -> usize {
        self.base().write_index
    }

    fn read_index(&self) -> usize {
        self.base().read_index
    }

    fn set_read_index(&mut self, index: usize) {
        self.base_mut().read_index = index;
    }

    fn is_null(&self, index: usize) -> bool {
        self.base().is_null.get(index).copied().unwrap_or(false)
    }

    fn null_flags(&self) -> &[bool] {
        &self.base().is_null
    }

    fn no_nulls(&self) -> bool {
        self.base().no_nulls
    }

    fn is_encoding(&self) -> bool {
        self.base().encoding
    }

    fn memory_usage(&self) -> usize {
        self.base().memory_usage
    }

    fn is_closed(&self) -> bool {
        self.base().closed
    }
}

/// A vector of fixed-width integers that the pixel-buffered writers consume.
pub trait IntegerVector: ColumnVector {
    type Native: FixedWidth + Into<i64>;
    const KIND: TypeKind;

    fn values(&self) -> &[Self::Native];

    /// The value under the read cursor, `None` once the storage is gone.
    fn current(&self) -> Option<&Self::Native> {
        self.values().get(self.base().read_index)
    }
}

/// Reserves the row at the write cursor, doubling the capacity first when
/// the vector is full, and clears its null flag.
pub(crate) fn claim_append_slot<V: ColumnVector + ?Sized>(vector: &mut V) -> usize {
    let base = vector.base();
    if base.write_index >= base.length {
        let size = (base.write_index * 2).max(1);
        vector.ensure_size(size, true);
    }
    let base = vector.base_mut();
    let index = base.write_index;
    base.write_index += 1;
    base.is_null[index] = false;
    index
}

/// Makes `index` addressable for a positional write and moves the write
/// cursor past it if needed.
pub(crate) fn claim_set_slot<V: ColumnVector + ?Sized>(vector: &mut V, index: usize) {
    let length = vector.base().length;
    if index >= length {
        vector.ensure_size((index + 1).max(length * 2), true);
    }
    let base = vector.base_mut();
    if index >= base.write_index {
        base.write_index = index + 1;
    }
    base.is_null[index] = false;
}

/// `"true"`/`"false"` in any case map to `1`/`0` for every vector type.
pub(crate) fn parse_bool_literal(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn downcast<V: ColumnVector>(
    vector: &dyn ColumnVector,
    expected: TypeKind,
) -> Result<&V, ColumnarError> {
    vector
        .as_any()
        .downcast_ref::<V>()
        .ok_or(ColumnarError::TypeMismatch {
            expected,
            found: vector.type_kind(),
        })
}
