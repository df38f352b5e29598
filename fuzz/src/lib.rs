use arbitrary::Arbitrary;
use pixels_columnar::{
    ByteOrder, ColumnChunkIndex, ColumnVector, ColumnWriter, ColumnarError, EncodingLevel,
    LongColumnVector, LongColumnWriter, TypeDescription, WriterOption,
};

/// A row sequence plus the writer settings and the points where the input
/// is cut into separate `write` calls.
#[derive(Debug, Clone, Arbitrary)]
pub struct WriteCase {
    pub stride: u8,
    pub level: u8,
    pub nulls_padding: bool,
    pub big_endian: bool,
    pub rows: Vec<Option<i64>>,
    pub cuts: Vec<u16>,
}

impl WriteCase {
    pub fn option(&self) -> WriterOption {
        WriterOption::default()
            .with_pixel_stride(usize::from(self.stride % 64) + 1)
            .with_encoding_level(EncodingLevel::try_from(self.level % 3).unwrap())
            .with_nulls_padding(self.nulls_padding)
            .with_byte_order(if self.big_endian {
                ByteOrder::BigEndian
            } else {
                ByteOrder::LittleEndian
            })
    }

    pub fn cut_points(&self) -> Vec<usize> {
        let len = self.rows.len();
        let mut cuts: Vec<usize> = self
            .cuts
            .iter()
            .map(|&c| usize::from(c) % (len + 1))
            .collect();
        cuts.sort_unstable();
        cuts
    }
}

/// Writes `rows` into a fresh long writer, one `write` call per segment
/// between consecutive cut points.
pub fn write_long_chunk(
    option: &WriterOption,
    rows: &[Option<i64>],
    cuts: &[usize],
) -> Result<(Vec<u8>, ColumnChunkIndex), ColumnarError> {
    let mut writer = LongColumnWriter::new(option)?;
    let mut start = 0;
    for &end in cuts.iter().chain(std::iter::once(&rows.len())) {
        let mut vector = LongColumnVector::new(end - start, true);
        for row in &rows[start..end] {
            match row {
                Some(value) => vector.add(*value),
                None => vector.add_null(),
            }
        }
        writer.write(&vector, end - start)?;
        start = end;
    }
    writer.flush()?;
    Ok((
        writer.column_chunk_content().to_vec(),
        writer.column_chunk_index().clone(),
    ))
}

#[derive(Debug, Clone, Arbitrary)]
pub enum LiteralCase {
    Long(String),
    Date(String),
    Decimal { precision: u8, scale: u8, literal: String },
    Timestamp { precision: u8, literal: String },
}

/// Feeds a literal to the matching vector. A rejected literal must leave the
/// vector as it was.
pub fn check_literal(case: &LiteralCase) {
    let (ty, literal) = match case {
        LiteralCase::Long(literal) => (TypeDescription::Long, literal),
        LiteralCase::Date(literal) => (TypeDescription::Date, literal),
        LiteralCase::Decimal {
            precision,
            scale,
            literal,
        } => (
            TypeDescription::Decimal {
                precision: *precision,
                scale: *scale,
            },
            literal,
        ),
        LiteralCase::Timestamp { precision, literal } => (
            TypeDescription::Timestamp {
                precision: *precision,
            },
            literal,
        ),
    };
    let Ok(mut vector) = ty.create_column_vector(1) else {
        return;
    };
    vector.add_null();
    match vector.add_str(literal) {
        Ok(()) => {
            assert_eq!(vector.write_index(), 2);
            assert!(!vector.is_null(1));
        }
        Err(_) => {
            assert_eq!(vector.write_index(), 1);
            assert_eq!(vector.capacity(), 1);
        }
    }
}
