use pixels_columnar::{
    decode_run_length, ByteOrder, ColumnChunkIndex, ColumnVector, ColumnWriter, ColumnarError,
    DateColumnVector, DateColumnWriter, EncodingKind, EncodingLevel, LongColumnVector,
    LongColumnWriter, TimestampColumnVector, TimestampColumnWriter, TypeDescription, WriterOption,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn long_vector(rows: &[Option<i64>]) -> LongColumnVector {
    let mut vector = LongColumnVector::new(rows.len(), true);
    for row in rows {
        match row {
            Some(value) => vector.add(*value),
            None => vector.add_null(),
        }
    }
    vector
}

/// Writes `rows` through one writer, cutting the input at `cuts`.
fn write_in_parts(
    option: &WriterOption,
    rows: &[Option<i64>],
    cuts: &[usize],
) -> (Vec<u8>, ColumnChunkIndex) {
    let mut writer = LongColumnWriter::new(option).unwrap();
    let mut start = 0;
    for &end in cuts.iter().chain(std::iter::once(&rows.len())) {
        let vector = long_vector(&rows[start..end]);
        let pos = writer.write(&vector, end - start).unwrap();
        assert_eq!(pos, writer.column_chunk_size());
        start = end;
    }
    writer.flush().unwrap();
    (
        writer.column_chunk_content().to_vec(),
        writer.column_chunk_index().clone(),
    )
}

fn random_rows(rng: &mut StdRng, len: usize) -> Vec<Option<i64>> {
    (0..len)
        .map(|i| {
            if rng.gen_bool(0.1) {
                None
            } else if rng.gen_bool(0.5) {
                Some((i / 16) as i64)
            } else {
                Some(rng.gen_range(-1000..1000))
            }
        })
        .collect()
}

#[test]
fn split_writes_match_single_write() {
    let rows: Vec<Option<i64>> = (1..=10).map(Some).collect();
    for level in [EncodingLevel::EL0, EncodingLevel::EL2] {
        let option = WriterOption::default()
            .with_pixel_stride(4)
            .with_encoding_level(level);
        let whole = write_in_parts(&option, &rows, &[]);
        let split = write_in_parts(&option, &rows, &[4]);
        assert_eq!(whole, split);
        assert_eq!(whole.1.pixel_row_counts, vec![4, 4, 2]);
    }
}

/// Writes literal rows (`None` for null) through a writer built from `ty`,
/// cutting the input at `cuts`.
fn write_typed_parts(
    ty: TypeDescription,
    option: &WriterOption,
    rows: &[Option<String>],
    cuts: &[usize],
) -> (Vec<u8>, ColumnChunkIndex) {
    let mut writer = ty.create_column_writer(option).unwrap();
    let mut start = 0;
    for &end in cuts.iter().chain(std::iter::once(&rows.len())) {
        let mut vector = ty.create_column_vector(end - start).unwrap();
        for row in &rows[start..end] {
            match row {
                Some(literal) => vector.add_str(literal).unwrap(),
                None => vector.add_null(),
            }
        }
        writer.write(vector.as_ref(), end - start).unwrap();
        start = end;
    }
    writer.flush().unwrap();
    (
        writer.column_chunk_content().to_vec(),
        writer.column_chunk_index().clone(),
    )
}

#[test]
fn split_writes_match_for_every_type() {
    let cases: [(TypeDescription, fn(i64) -> String); 3] = [
        (
            TypeDescription::Decimal {
                precision: 5,
                scale: 2,
            },
            |i| format!("{}.5", i),
        ),
        (TypeDescription::Date, |i| format!("2024-01-{:02}", i)),
        (TypeDescription::Timestamp { precision: 3 }, |i| {
            format!("2024-01-01 00:00:{:02}.250", i)
        }),
    ];
    for (ty, literal) in cases {
        let rows: Vec<Option<String>> = (1..=10).map(|i| Some(literal(i))).collect();
        let mut with_nulls = rows.clone();
        with_nulls[2] = None;
        with_nulls[5] = None;
        for level in [EncodingLevel::EL0, EncodingLevel::EL2] {
            for padding in [false, true] {
                let option = WriterOption::default()
                    .with_pixel_stride(4)
                    .with_encoding_level(level)
                    .with_nulls_padding(padding);
                for rows in [&rows, &with_nulls] {
                    let whole = write_typed_parts(ty, &option, rows, &[]);
                    let split = write_typed_parts(ty, &option, rows, &[4]);
                    assert_eq!(whole, split, "{:?} with {:?}", ty, option);
                    let uneven = write_typed_parts(ty, &option, rows, &[3, 3, 9]);
                    assert_eq!(whole, uneven, "{:?} with {:?}", ty, option);
                    assert_eq!(whole.1.pixel_row_counts, vec![4, 4, 2]);
                }
            }
        }
    }
}

#[test]
fn decimal_split_write_layout() {
    let ty = TypeDescription::Decimal {
        precision: 5,
        scale: 0,
    };
    let rows: Vec<Option<String>> = (1..=10).map(|i| Some(i.to_string())).collect();
    let option = WriterOption::default().with_pixel_stride(4);
    let (content, index) = write_typed_parts(ty, &option, &rows, &[4]);
    let expected: Vec<u8> = (1..=10i64).flat_map(|v| v.to_le_bytes()).collect();
    assert_eq!(content, expected);
    assert_eq!(index.pixel_positions, vec![0, 32, 64]);
    assert_eq!(index.is_null_offset, Some(80));
}

#[test]
fn random_partitions_are_byte_identical() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..20 {
        let len = rng.gen_range(0..600);
        let rows = random_rows(&mut rng, len);
        let option = WriterOption::default()
            .with_pixel_stride(rng.gen_range(1..80))
            .with_encoding_level(if rng.gen_bool(0.5) {
                EncodingLevel::EL2
            } else {
                EncodingLevel::EL1
            })
            .with_nulls_padding(rng.gen_bool(0.5));

        let mut cuts: Vec<usize> = (0..rng.gen_range(0..6))
            .map(|_| rng.gen_range(0..=len))
            .collect();
        cuts.sort_unstable();

        let whole = write_in_parts(&option, &rows, &[]);
        let split = write_in_parts(&option, &rows, &cuts);
        assert_eq!(whole, split, "cuts {:?} with {:?}", cuts, option);
        assert_eq!(whole.1.pixel_row_counts.iter().sum::<usize>(), len);
    }
}

#[test]
fn raw_date_chunk_layout() {
    let mut vector = DateColumnVector::new(3, true);
    vector.add(1);
    vector.add_null();
    vector.add(3);

    let option = WriterOption::default()
        .with_pixel_stride(4)
        .with_encoding_level(EncodingLevel::EL1)
        .with_nulls_padding(true);
    let mut writer = DateColumnWriter::new(&option).unwrap();
    writer.write(&vector, 3).unwrap();
    writer.flush().unwrap();

    insta::assert_snapshot!(
        format!("{:?}", writer.column_chunk_content()),
        @"[1, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 2]"
    );
    assert_eq!(writer.column_chunk_index().is_null_offset, Some(12));
}

#[test]
fn run_length_chunk_layout() {
    let mut vector = DateColumnVector::new(5, true);
    for _ in 0..3 {
        vector.add(5);
    }
    vector.add_null();
    vector.add(7);

    let option = WriterOption::default().with_pixel_stride(4);
    let mut writer = DateColumnWriter::new(&option).unwrap();
    assert_eq!(writer.write(&vector, 5).unwrap(), 2);
    writer.flush().unwrap();

    insta::assert_snapshot!(
        format!("{:?}", writer.column_chunk_content()),
        @"[6, 10, 1, 14, 8, 0]"
    );
    let index = writer.column_chunk_index();
    assert_eq!(index.pixel_positions, vec![0, 2]);
    assert_eq!(index.pixel_row_counts, vec![4, 1]);
    assert_eq!(index.pixel_has_null, vec![true, false]);
    assert_eq!(index.is_null_offset, Some(4));
}

#[test]
fn null_padding_duality() {
    let rows = [Some(9), None, None, Some(8), None];
    let base = WriterOption::default()
        .with_pixel_stride(8)
        .with_encoding_level(EncodingLevel::EL0);
    let (padded, padded_index) = write_in_parts(&base.clone().with_nulls_padding(true), &rows, &[]);
    let (sparse, sparse_index) = write_in_parts(&base, &rows, &[]);

    assert_eq!(padded_index.is_null_offset, Some(5 * 8));
    assert_eq!(sparse_index.is_null_offset, Some(2 * 8));
    // same null stream either way
    assert_eq!(&padded[40..], &[0b1_0110]);
    assert_eq!(&sparse[16..], &[0b1_0110]);
    assert_eq!(&sparse[..8], &9i64.to_le_bytes());
    assert_eq!(&sparse[8..16], &8i64.to_le_bytes());
}

#[test]
fn encoding_level_overrides_padding() {
    let padded = WriterOption::default().with_nulls_padding(true);

    let writer = LongColumnWriter::new(&padded.clone().with_encoding_level(EncodingLevel::EL2)).unwrap();
    assert!(!writer.is_nulls_padding());
    assert_eq!(writer.column_chunk_encoding().kind, EncodingKind::RunLength);

    let writer = LongColumnWriter::new(&padded.with_encoding_level(EncodingLevel::EL1)).unwrap();
    assert!(writer.is_nulls_padding());
    assert_eq!(writer.column_chunk_encoding().kind, EncodingKind::None);
}

#[test]
fn run_length_pixels_decode_to_non_null_values() {
    let mut rng = StdRng::seed_from_u64(7);
    let rows = random_rows(&mut rng, 300);
    let option = WriterOption::default().with_pixel_stride(50);
    let (content, index) = write_in_parts(&option, &rows, &[]);

    let Some(null_offset) = index.is_null_offset else {
        panic!("flushed chunk has no null offset");
    };
    let mut ends = index.pixel_positions[1..].to_vec();
    ends.push(null_offset);
    let decoded: Vec<i64> = index
        .pixel_positions
        .iter()
        .zip(ends)
        .flat_map(|(&start, end)| decode_run_length(&content[start..end]).unwrap())
        .collect();
    let expected: Vec<i64> = rows.iter().flatten().copied().collect();
    assert_eq!(decoded, expected);
}

#[test]
fn big_endian_timestamps() {
    let mut vector = TimestampColumnVector::new(2, 3, true).unwrap();
    vector.add(0x0102);
    vector.add_null();
    let option = WriterOption::default()
        .with_encoding_level(EncodingLevel::EL0)
        .with_byte_order(ByteOrder::BigEndian);
    let mut writer = TimestampColumnWriter::new(&option).unwrap();
    writer.write(&vector, 2).unwrap();
    writer.flush().unwrap();
    insta::assert_snapshot!(
        format!("{:?}", writer.column_chunk_content()),
        @"[0, 0, 0, 0, 0, 0, 1, 2, 64]"
    );
}

#[test]
fn chunk_without_nulls_has_no_null_stream() {
    let rows: Vec<Option<i64>> = (0..10).map(Some).collect();
    let option = WriterOption::default()
        .with_pixel_stride(3)
        .with_encoding_level(EncodingLevel::EL0);
    let (content, index) = write_in_parts(&option, &rows, &[]);
    assert_eq!(content.len(), 80);
    assert_eq!(index.is_null_offset, Some(80));
    assert_eq!(index.pixel_positions, vec![0, 24, 48, 72]);
}

#[test]
fn boxed_writer_lifecycle() {
    let option = WriterOption::default().with_pixel_stride(2);
    let mut writer = TypeDescription::Long.create_column_writer(&option).unwrap();
    let mut vector = TypeDescription::Long.create_column_vector(4).unwrap();
    vector.add_str("1").unwrap();
    vector.add_str("1").unwrap();
    vector.add_str("1").unwrap();

    let wrong = TypeDescription::Date.create_column_vector(4).unwrap();
    assert!(matches!(
        writer.write(wrong.as_ref(), 0),
        Err(ColumnarError::TypeMismatch { .. })
    ));

    writer.write(vector.as_ref(), 3).unwrap();
    writer.flush().unwrap();
    assert_eq!(writer.column_chunk_index().pixel_count(), 2);
    assert!(matches!(
        writer.write(vector.as_ref(), 1),
        Err(ColumnarError::ChunkFinished)
    ));

    writer.close();
    writer.close();
    assert!(writer.is_closed());
    assert_eq!(writer.column_chunk_size(), 0);
}
