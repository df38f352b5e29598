#![no_main]
use libfuzzer_sys::fuzz_target;
use pixels_columnar_fuzz::{check_literal, LiteralCase};

fuzz_target!(|case: LiteralCase| {
    check_literal(&case);
});
