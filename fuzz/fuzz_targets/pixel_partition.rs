#![no_main]
use libfuzzer_sys::fuzz_target;
use pixels_columnar_fuzz::{write_long_chunk, WriteCase};

fuzz_target!(|case: WriteCase| {
    let option = case.option();
    let whole = write_long_chunk(&option, &case.rows, &[]).unwrap();
    let split = write_long_chunk(&option, &case.rows, &case.cut_points()).unwrap();
    assert_eq!(whole, split);
});
