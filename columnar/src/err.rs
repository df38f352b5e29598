use postcard::Error as PostcardError;
use thiserror::Error;

use crate::vector::TypeKind;

#[derive(Error, Debug)]
pub enum ColumnarError {
    #[error("serialize or deserialize error")]
    SerializeError(#[from] PostcardError),
    #[error("invalid literal: {0}")]
    ParseError(String),
    #[error("value out of range: {0}")]
    ValueOutOfRange(String),
    #[error("expected a {expected} column vector, got {found}")]
    TypeMismatch { expected: TypeKind, found: TypeKind },
    #[error("{kind} precision {precision} is not supported")]
    UnsupportedPrecision { kind: TypeKind, precision: u8 },
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("cannot write {requested} rows, the vector holds {available}")]
    RowCountOutOfRange { requested: usize, available: usize },
    #[error("invalid writer option: {0}")]
    InvalidOption(String),
    #[error("invalid encoding level `{0}`")]
    InvalidEncodingLevel(u8),
    #[error("the column chunk has already been flushed")]
    ChunkFinished,
    #[error("the column writer is closed")]
    WriterClosed,
    #[error("`{0}` during rle encoding")]
    RleEncodeError(String),
    #[error("`{0}` during rle decoding")]
    RleDecodeError(String),
}
