use serde::{Deserialize, Serialize};

use crate::option::WriterOption;
use crate::vector::{
    ColumnVector, DateColumnVector, DecimalColumnVector, LongColumnVector, TimestampColumnVector,
    TypeKind,
};
use crate::writer::{
    ColumnWriter, DateColumnWriter, DecimalColumnWriter, LongColumnWriter, TimestampColumnWriter,
};
use crate::ColumnarError;

/// The logical type of a column, with the parameters needed to build its
/// vectors and writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeDescription {
    Long,
    Date,
    Decimal { precision: u8, scale: u8 },
    Timestamp { precision: u8 },
}

impl TypeDescription {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDescription::Long => TypeKind::Long,
            TypeDescription::Date => TypeKind::Date,
            TypeDescription::Decimal { .. } => TypeKind::Decimal,
            TypeDescription::Timestamp { .. } => TypeKind::Timestamp,
        }
    }

    /// Creates an encoding-side vector with room for `len` rows.
    pub fn create_column_vector(&self, len: usize) -> Result<Box<dyn ColumnVector>, ColumnarError> {
        let vector: Box<dyn ColumnVector> = match *self {
            TypeDescription::Long => Box::new(LongColumnVector::new(len, true)),
            TypeDescription::Date => Box::new(DateColumnVector::new(len, true)),
            TypeDescription::Decimal { precision, scale } => {
                Box::new(DecimalColumnVector::new(len, precision, scale, true)?)
            }
            TypeDescription::Timestamp { precision } => {
                Box::new(TimestampColumnVector::new(len, precision, true)?)
            }
        };
        Ok(vector)
    }

    pub fn create_column_writer(
        &self,
        option: &WriterOption,
    ) -> Result<Box<dyn ColumnWriter>, ColumnarError> {
        let writer: Box<dyn ColumnWriter> = match self {
            TypeDescription::Long => Box::new(LongColumnWriter::new(option)?),
            TypeDescription::Date => Box::new(DateColumnWriter::new(option)?),
            TypeDescription::Decimal { .. } => Box::new(DecimalColumnWriter::new(option)?),
            TypeDescription::Timestamp { .. } => Box::new(TimestampColumnWriter::new(option)?),
        };
        Ok(writer)
    }
}
