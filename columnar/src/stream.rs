use std::ops::{Deref, DerefMut};

use postcard::{de_flavors::Flavor as DeFlavor, ser_flavors::Flavor, Deserializer, Serializer};

/// A read position over a borrowed pixel.
#[derive(Debug)]
pub struct Cursor<'de> {
    bytes: &'de [u8],
    pos: usize,
}

impl<'de> Cursor<'de> {
    pub fn new(bytes: &'de [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl<'de> DeFlavor<'de> for Cursor<'de> {
    type Remainder = &'de [u8];
    type Source = &'de [u8];

    fn pop(&mut self) -> postcard::Result<u8> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(postcard::Error::DeserializeUnexpectedEnd)?;
        self.pos += 1;
        Ok(byte)
    }

    fn try_take_n(&mut self, ct: usize) -> postcard::Result<&'de [u8]> {
        let end = self
            .pos
            .checked_add(ct)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(postcard::Error::DeserializeUnexpectedEnd)?;
        let taken = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(taken)
    }

    fn finalize(self) -> postcard::Result<Self::Remainder> {
        Ok(&self.bytes[self.pos..])
    }
}

/// Reads varint-framed values back out of a byte slice.
pub struct InputStream<'de> {
    de: Deserializer<'de, Cursor<'de>>,
}

impl<'de> InputStream<'de> {
    pub fn new(bytes: &'de [u8]) -> Self {
        Self {
            de: Deserializer::from_flavor(Cursor::new(bytes)),
        }
    }
}

impl<'de> Deref for InputStream<'de> {
    type Target = Deserializer<'de, Cursor<'de>>;

    fn deref(&self) -> &Self::Target {
        &self.de
    }
}

impl DerefMut for InputStream<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.de
    }
}

#[derive(Debug, Default, Clone)]
pub struct AllocVec {
    vec: Vec<u8>,
}

impl Flavor for AllocVec {
    type Output = Vec<u8>;

    #[inline(always)]
    fn try_extend(&mut self, data: &[u8]) -> postcard::Result<()> {
        self.vec.extend_from_slice(data);
        Ok(())
    }

    #[inline(always)]
    fn try_push(&mut self, data: u8) -> postcard::Result<()> {
        self.vec.push(data);
        Ok(())
    }

    fn finalize(self) -> postcard::Result<Self::Output> {
        Ok(self.vec)
    }
}

/// The append-only byte sink a column writer fills.
///
/// Raw pixels go in through [`OutputStream::put_bytes`]; varint-framed data
/// can be serialized straight into it through the postcard serializer it
/// derefs to. Nothing already written can be rewritten.
pub struct OutputStream {
    ser: Serializer<AllocVec>,
}

impl OutputStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.ser.output.vec.extend_from_slice(bytes);
    }

    /// Byte offset the next `put_bytes` lands at.
    pub fn write_pos(&self) -> usize {
        self.ser.output.vec.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.ser.output.vec
    }

    /// Hands the written bytes out and leaves the stream empty.
    pub fn take_bytes(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.ser.output.vec)
    }

    pub fn clear(&mut self) {
        self.ser.output.vec.clear();
    }

    pub(crate) fn release(&mut self) {
        self.ser.output.vec = Vec::new();
    }
}

impl Default for OutputStream {
    fn default() -> Self {
        Self {
            ser: Serializer {
                output: AllocVec::default(),
            },
        }
    }
}

impl Deref for OutputStream {
    type Target = Serializer<AllocVec>;

    fn deref(&self) -> &Self::Target {
        &self.ser
    }
}

impl DerefMut for OutputStream {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ser
    }
}
