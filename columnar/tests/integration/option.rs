use pixels_columnar::{ByteOrder, ColumnarError, EncodingLevel, WriterOption};

#[test]
fn option_from_json_config() {
    let option: WriterOption =
        serde_json::from_str(r#"{"pixel_stride": 4, "encoding_level": "EL0", "nulls_padding": true}"#)
            .unwrap();
    assert_eq!(
        option,
        WriterOption::default()
            .with_pixel_stride(4)
            .with_encoding_level(EncodingLevel::EL0)
            .with_nulls_padding(true)
    );
    assert_eq!(option.byte_order, ByteOrder::LittleEndian);

    let json = serde_json::to_string(&option).unwrap();
    let back: WriterOption = serde_json::from_str(&json).unwrap();
    assert_eq!(back, option);
}

#[test]
fn empty_config_is_default() {
    let option: WriterOption = serde_json::from_str("{}").unwrap();
    assert_eq!(option, WriterOption::default());
    assert_eq!(option.pixel_stride, 10000);
    assert_eq!(option.encoding_level, EncodingLevel::EL2);
}

#[test]
fn encoding_level_from_u8() {
    assert_eq!(EncodingLevel::try_from(1).unwrap(), EncodingLevel::EL1);
    assert!(matches!(
        EncodingLevel::try_from(3),
        Err(ColumnarError::InvalidEncodingLevel(3))
    ));
}
