//! Fixed-width integer serialization and null-flag bit packing.

use crate::option::ByteOrder;

/// An integer that is laid out on disk at a fixed width in either byte order.
pub trait FixedWidth: Copy + Default + Send + 'static {
    const WIDTH: usize;

    fn write_to(self, order: ByteOrder, out: &mut Vec<u8>);
}

macro_rules! impl_fixed_width {
    ($($ty:ty),*) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn write_to(self, order: ByteOrder, out: &mut Vec<u8>) {
                    match order {
                        ByteOrder::LittleEndian => out.extend_from_slice(&self.to_le_bytes()),
                        ByteOrder::BigEndian => out.extend_from_slice(&self.to_be_bytes()),
                    }
                }
            }
        )*
    };
}

impl_fixed_width!(i16, i32, i64, i128);

/// Serializes `values` back to back at `T::WIDTH` bytes each.
pub fn write_fixed<T: FixedWidth>(values: &[T], order: ByteOrder) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * T::WIDTH);
    for &value in values {
        value.write_to(order, &mut out);
    }
    out
}

/// Packs one flag per bit into `ceil(flags.len() / 8)` bytes.
///
/// Little-endian order puts flag `i` at bit `i % 8` of its byte, big-endian
/// at bit `7 - i % 8`. Trailing bits of the last byte are zero.
pub fn bit_wise_compact(flags: &[bool], order: ByteOrder) -> Vec<u8> {
    flags
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .filter(|(_, &flag)| flag)
                .fold(0u8, |byte, (i, _)| match order {
                    ByteOrder::LittleEndian => byte | (1 << i),
                    ByteOrder::BigEndian => byte | (0x80 >> i),
                })
        })
        .collect()
}
