mod rle;
pub use rle::{decode_run_length, RunLenIntEncoder};

/// Longest run a run-length pixel may hold.
pub(crate) const MAX_RLE_COUNT: usize = 1e7 as usize;
