use serde::{Deserialize, Serialize};

use crate::ColumnarError;

/// Rows per pixel unless configured otherwise.
pub const DEFAULT_PIXEL_STRIDE: usize = 10000;

/// The negotiated tier that decides which encodings a column chunk may use.
///
/// Levels are ordered, so `level >= EncodingLevel::EL2` reads the same way the
/// writers check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EncodingLevel {
    EL0 = 0,
    EL1 = 1,
    EL2 = 2,
}

impl EncodingLevel {
    pub fn ge(self, other: EncodingLevel) -> bool {
        self >= other
    }
}

impl TryFrom<u8> for EncodingLevel {
    type Error = ColumnarError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EncodingLevel::EL0),
            1 => Ok(EncodingLevel::EL1),
            2 => Ok(EncodingLevel::EL2),
            _ => Err(ColumnarError::InvalidEncodingLevel(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// Which of the two pixel encodings a writer committed to at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingKind {
    None,
    RunLength,
}

/// The descriptor persisted next to the chunk bytes so a reader can pick the
/// matching decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnChunkEncoding {
    pub kind: EncodingKind,
}

impl ColumnChunkEncoding {
    pub(crate) fn from_run_length(run_length: bool) -> Self {
        Self {
            kind: if run_length {
                EncodingKind::RunLength
            } else {
                EncodingKind::None
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOption {
    pub pixel_stride: usize,
    pub encoding_level: EncodingLevel,
    pub nulls_padding: bool,
    pub byte_order: ByteOrder,
}

impl Default for WriterOption {
    fn default() -> Self {
        Self {
            pixel_stride: DEFAULT_PIXEL_STRIDE,
            encoding_level: EncodingLevel::EL2,
            nulls_padding: false,
            byte_order: ByteOrder::LittleEndian,
        }
    }
}

impl WriterOption {
    pub fn with_pixel_stride(mut self, pixel_stride: usize) -> Self {
        self.pixel_stride = pixel_stride;
        self
    }

    pub fn with_encoding_level(mut self, level: EncodingLevel) -> Self {
        self.encoding_level = level;
        self
    }

    pub fn with_nulls_padding(mut self, nulls_padding: bool) -> Self {
        self.nulls_padding = nulls_padding;
        self
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn validate(&self) -> Result<(), ColumnarError> {
        if self.pixel_stride == 0 {
            return Err(ColumnarError::InvalidOption(
                "pixel_stride must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
