#![no_main]
use libfuzzer_sys::fuzz_target;
use pixels_columnar::{decode_run_length, RunLenIntEncoder};

fuzz_target!(|values: Vec<i64>| {
    let bytes = RunLenIntEncoder::new().encode(&values).unwrap();
    assert_eq!(decode_run_length(&bytes).unwrap(), values);
});
