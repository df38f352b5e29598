/// Reference automerge implementation:
/// https://github.com/automerge/automerge-rs/blob/d7d2916acb17d23d02ae249763aa0cf2f293d880/rust/automerge/src/columnar/encoding/rle.rs
use crate::{
    stream::{InputStream, OutputStream},
    ColumnarError,
};
use serde::{Deserialize, Serialize};

use std::{borrow::Borrow, marker::PhantomData, ops::DerefMut};

use super::MAX_RLE_COUNT;

pub trait Rleable: Clone + PartialEq + Serialize + for<'de> Deserialize<'de> {}
impl<T> Rleable for T where T: Clone + PartialEq + Serialize + for<'de> Deserialize<'de> {}

/// Integer run-length codec used by column writers in run-length mode.
///
/// Every call to [`RunLenIntEncoder::encode`] produces a self-contained run
/// sequence for one pixel: a positive zig-zag varint length followed by the
/// repeated value, or a negative length followed by that many literal values.
#[derive(Default)]
pub struct RunLenIntEncoder {
    scratch: OutputStream,
}

impl RunLenIntEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode<T>(&mut self, values: &[T]) -> Result<Vec<u8>, ColumnarError>
    where
        T: Copy + Into<i64>,
    {
        self.scratch.clear();
        let mut rle = AnyRleEncoder::<i64>::new(&mut self.scratch);
        for &value in values {
            rle.append(value.into())?;
        }
        rle.finish()?;
        Ok(self.scratch.take_bytes())
    }

    /// Drops any buffered bytes.
    pub fn clear(&mut self) {
        self.scratch.clear();
    }
}

pub(crate) struct AnyRleEncoder<'a, T> {
    ser: &'a mut OutputStream,
    state: RleState<T>,
}

impl<'a, T> AnyRleEncoder<'a, T>
where
    T: Rleable,
{
    pub fn new(ser: &'a mut OutputStream) -> Self {
        Self {
            ser,
            state: RleState::Empty,
        }
    }

    pub(crate) fn append<BT: Borrow<T>>(&mut self, value: BT) -> Result<(), ColumnarError> {
        self.state = match self.take_state() {
            RleState::Empty => RleState::LoneVal(value.borrow().clone()),
            RleState::LoneVal(other) => {
                if &other == value.borrow() {
                    RleState::Run(value.borrow().clone(), 2)
                } else {
                    let mut v = Vec::with_capacity(2);
                    v.push(other);
                    RleState::LiteralRun(value.borrow().clone(), v)
                }
            }
            RleState::Run(other, len) => {
                if &other == value.borrow() {
                    RleState::Run(other, len + 1)
                } else {
                    self.flush_run(&other, len)?;
                    RleState::LoneVal(value.borrow().clone())
                }
            }
            RleState::LiteralRun(last, mut run) => {
                if &last == value.borrow() {
                    self.flush_lit_run(run)?;
                    RleState::Run(value.borrow().clone(), 2)
                } else {
                    run.push(last);
                    RleState::LiteralRun(value.borrow().clone(), run)
                }
            }
        };
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<(), ColumnarError> {
        match self.take_state() {
            RleState::LoneVal(value) => self.flush_lit_run(vec![value]),
            RleState::Run(value, len) => self.flush_run(&value, len),
            RleState::LiteralRun(last, mut run) => {
                run.push(last);
                self.flush_lit_run(run)
            }
            RleState::Empty => Ok(()),
        }
    }

    fn take_state(&mut self) -> RleState<T> {
        std::mem::replace(&mut self.state, RleState::Empty)
    }

    fn flush_run(&mut self, val: &T, len: usize) -> Result<(), ColumnarError> {
        check_run_len(len)?;
        (len as isize).serialize(self.ser.deref_mut())?;
        val.serialize(self.ser.deref_mut())?;
        Ok(())
    }

    fn flush_lit_run(&mut self, run: Vec<T>) -> Result<(), ColumnarError> {
        check_run_len(run.len())?;
        (-(run.len() as isize)).serialize(self.ser.deref_mut())?;
        for val in run {
            val.serialize(self.ser.deref_mut())?;
        }
        Ok(())
    }
}

/// Decoders reject runs longer than this, so never produce one.
fn check_run_len(len: usize) -> Result<(), ColumnarError> {
    if len > MAX_RLE_COUNT {
        return Err(ColumnarError::RleEncodeError(format!(
            "run of {} values exceeds the limit",
            len
        )));
    }
    Ok(())
}

enum RleState<T> {
    Empty,
    LiteralRun(T, Vec<T>),
    LoneVal(T),
    Run(T, usize),
}

pub(crate) struct AnyRleDecoder<'a, 'de, T> {
    de: &'a mut InputStream<'de>,
    last_value: Option<T>,
    count: isize,
    literal: bool,
    lifetime: PhantomData<&'de ()>,
}

impl<'a, 'de, T> AnyRleDecoder<'a, 'de, T>
where
    T: Rleable,
{
    pub(crate) fn new(de: &'a mut InputStream<'de>) -> Self {
        Self {
            de,
            last_value: None,
            count: 0,
            literal: false,
            lifetime: PhantomData,
        }
    }

    pub(crate) fn decode(&mut self) -> Result<Vec<T>, ColumnarError> {
        let mut values = Vec::new();
        while let Some(value) = self.try_next()? {
            values.push(value);
        }
        Ok(values)
    }

    fn try_next(&mut self) -> Result<Option<T>, ColumnarError> {
        while self.count == 0 {
            let Ok(count) = isize::deserialize(self.de.deref_mut()) else {
                return Ok(None);
            };
            // Prevent bad data from causing oom loops
            if count.unsigned_abs() > MAX_RLE_COUNT {
                return Err(ColumnarError::RleDecodeError(format!(
                    "decode Rle count is too large : {}",
                    count
                )));
            }
            match count {
                n if n > 0 => {
                    self.count = n;
                    self.last_value = Some(T::deserialize(self.de.deref_mut())?);
                    self.literal = false;
                }
                n if n < 0 => {
                    self.count = -n;
                    self.literal = true;
                }
                _ => return Err(ColumnarError::RleDecodeError("Invalid count".to_string())),
            }
        }
        self.count -= 1;
        if self.literal {
            Ok(Some(T::deserialize(self.de.deref_mut())?))
        } else {
            Ok(self.last_value.clone())
        }
    }
}

/// Expands one pixel's run sequence back into values.
pub fn decode_run_length(bytes: &[u8]) -> Result<Vec<i64>, ColumnarError> {
    let mut input = InputStream::new(bytes);
    AnyRleDecoder::<i64>::new(&mut input).decode()
}
