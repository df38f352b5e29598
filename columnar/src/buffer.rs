use std::ops::{Deref, DerefMut};

use aligned_vec::{AVec, RuntimeAlign};

/// A zero-initialised, fixed-length buffer whose first element sits on an
/// `align`-byte boundary.
///
/// The buffer is the sole owner of its allocation. Growing it allocates a new
/// aligned block and optionally copies the old prefix over; the old block is
/// freed when it is replaced.
#[derive(Debug)]
pub struct AlignedBuffer<T> {
    data: AVec<T, RuntimeAlign>,
    align: usize,
}

impl<T: Copy + Default> AlignedBuffer<T> {
    pub fn new(align: usize, len: usize) -> Self {
        Self {
            data: Self::zeroed(align, len),
            align,
        }
    }

    fn zeroed(align: usize, len: usize) -> AVec<T, RuntimeAlign> {
        AVec::from_iter(align, std::iter::repeat(T::default()).take(len))
    }

    /// Reallocates to `len` elements when the buffer is shorter. Existing
    /// elements are copied into the new block only if `preserve` is set.
    pub fn grow(&mut self, len: usize, preserve: bool) {
        let old_len = self.data.len();
        if len <= old_len {
            return;
        }
        let mut next = Self::zeroed(self.align, len);
        if preserve {
            next[..old_len].copy_from_slice(&self.data);
        }
        self.data = next;
    }

    /// Frees the allocation, leaving an empty buffer behind.
    pub fn release(&mut self) {
        self.data = AVec::new(self.align);
    }

    pub fn alignment(&self) -> usize {
        self.align
    }
}

impl<T> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}
