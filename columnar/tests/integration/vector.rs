use pixels_columnar::{
    ColumnVector, DateColumnVector, DecimalColumnVector, IntegerVector, LongColumnVector,
    PhysicalType, TimestampColumnVector, TypeDescription, TypeKind,
};

#[test]
fn growth_preserves_prefix() {
    let mut vector = LongColumnVector::new(2, true);
    for i in 0..9 {
        vector.add(i * 10);
    }
    assert_eq!(vector.capacity(), 16);
    assert_eq!(vector.write_index(), 9);
    assert_eq!(&vector.values()[..9], &[0, 10, 20, 30, 40, 50, 60, 70, 80]);
    assert_eq!(vector.memory_usage(), 16 * 9);
}

#[test]
fn set_beyond_capacity_grows() {
    let mut vector = DateColumnVector::new(2, true);
    vector.set(5, 42);
    assert_eq!(vector.capacity(), 6);
    assert_eq!(vector.write_index(), 6);
    assert_eq!(vector.dates()[5], 42);

    vector.set_null(1);
    assert!(vector.is_null(1));
    vector.set(1, 7);
    assert!(!vector.is_null(1));
    assert!(!vector.no_nulls());
}

#[test]
fn current_follows_read_cursor() {
    let mut vector = TimestampColumnVector::new(2, 6, true).unwrap();
    vector.add(11);
    vector.add(22);
    assert_eq!(vector.current(), Some(&11));
    vector.set_read_index(1);
    assert_eq!(vector.current(), Some(&22));
    vector.close();
    assert_eq!(vector.current(), None);
}

#[test]
fn close_releases_everything() {
    let mut vector = DecimalColumnVector::new(8, 20, 2, true).unwrap();
    assert_eq!(vector.physical_type(), PhysicalType::Int128);
    vector.add_str("12345.678").unwrap();
    assert_eq!(vector.unscaled(0), Some(1_234_568));

    vector.close();
    assert!(vector.is_closed());
    assert_eq!(vector.capacity(), 0);
    assert_eq!(vector.memory_usage(), 0);
    assert_eq!(vector.write_index(), 0);
    assert_eq!(vector.current(), None);
    vector.close();
    assert!(vector.is_closed());
}

#[test]
fn boxed_vectors_from_description() {
    let ty = TypeDescription::Timestamp { precision: 3 };
    let mut vector = ty.create_column_vector(1).unwrap();
    vector.add_str("2024-01-01 00:00:00.500").unwrap();
    vector.add_null();
    assert_eq!(vector.type_kind(), TypeKind::Timestamp);
    assert_eq!(vector.write_index(), 2);
    assert_eq!(vector.null_flags(), &[false, true]);

    let timestamps = vector
        .as_any()
        .downcast_ref::<TimestampColumnVector>()
        .unwrap();
    assert_eq!(timestamps.times()[0], (1_704_067_200 + 8 * 3600) * 1000 + 500);
}

#[test]
fn reset_keeps_capacity() {
    let mut vector = LongColumnVector::new(4, true);
    vector.add(1);
    vector.add_null();
    vector.reset();
    assert_eq!(vector.write_index(), 0);
    assert_eq!(vector.capacity(), 4);
    assert!(vector.no_nulls());
    assert!(!vector.is_null(1));
    assert_eq!(vector.dump(4).unwrap(), "");
}
