//! [`ByteCursor`]: an endian-aware, offset-addressed reader over an
//! immutable byte buffer.
//!
//! Unlike a `std::io::Read` based decoder, a `ByteCursor` never owns a
//! read position of its own -- every read takes an explicit `offset`.
//! This matches how the element decoder works: sequences and pixel
//! items are read by recursing with a new starting offset, not by
//! threading a mutable cursor through the call stack.

use crate::error::{Result, TruncatedBufferSnafu};
use safe_transmute::transmute_many_pedantic;
use snafu::ensure;
use std::borrow::Cow;

/// Byte order of multi-byte values read through a [`ByteCursor`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Endianness {
    Little,
    Big,
}

#[cfg(target_endian = "little")]
const NATIVE_ENDIANNESS: Endianness = Endianness::Little;
#[cfg(target_endian = "big")]
const NATIVE_ENDIANNESS: Endianness = Endianness::Big;

/// An endian-aware reader over an immutable byte slice.
///
/// All reads are by explicit offset and never mutate or advance any
/// internal position; the cursor itself is `Copy` and free to pass
/// around by value.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    endianness: Endianness,
}

impl<'a> ByteCursor<'a> {
    /// Wrap `buffer` for reading under the given endianness.
    pub fn new(buffer: &'a [u8], endianness: Endianness) -> Self {
        ByteCursor { buffer, endianness }
    }

    /// The endianness this cursor was constructed with.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// The length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn check_range(&self, offset: usize, n: usize) -> Result<()> {
        let end = offset.checked_add(n).unwrap_or(usize::MAX);
        ensure!(
            end <= self.buffer.len(),
            TruncatedBufferSnafu {
                offset,
                requested: n,
                available: self.buffer.len().saturating_sub(offset.min(self.buffer.len())),
            }
        );
        Ok(())
    }

    fn slice(&self, offset: usize, n: usize) -> Result<&'a [u8]> {
        self.check_range(offset, n)?;
        Ok(&self.buffer[offset..offset + n])
    }

    /// Read an unsigned 16-bit integer at `offset`.
    pub fn read_u16(&self, offset: usize) -> Result<u16> {
        let bytes = self.slice(offset, 2)?;
        let arr = [bytes[0], bytes[1]];
        Ok(match self.endianness {
            Endianness::Little => u16::from_le_bytes(arr),
            Endianness::Big => u16::from_be_bytes(arr),
        })
    }

    /// Read an unsigned 32-bit integer at `offset`.
    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        let bytes = self.slice(offset, 4)?;
        let arr = [bytes[0], bytes[1], bytes[2], bytes[3]];
        Ok(match self.endianness {
            Endianness::Little => u32::from_le_bytes(arr),
            Endianness::Big => u32::from_be_bytes(arr),
        })
    }

    /// Read a signed 32-bit integer at `offset`.
    pub fn read_i32(&self, offset: usize) -> Result<i32> {
        self.read_u32(offset).map(|v| v as i32)
    }

    /// Read a single byte at `offset`. Endianness is irrelevant.
    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.slice(offset, 1)?[0])
    }

    /// Read `n` raw bytes as an unsigned byte array.
    ///
    /// Single-byte reads are endian-irrelevant; this returns a view
    /// into the underlying buffer at no cost.
    pub fn read_u8_array(&self, offset: usize, n: usize) -> Result<&'a [u8]> {
        self.slice(offset, n)
    }

    /// Read `n` raw bytes reinterpreted as signed bytes.
    pub fn read_i8_array(&self, offset: usize, n: usize) -> Result<Vec<i8>> {
        Ok(self.slice(offset, n)?.iter().map(|&b| b as i8).collect())
    }

    /// Read a `u16` formatted as `0xGGGG`, uppercase, zero-padded to 4
    /// hex digits. Used to print a tag's group or element number.
    pub fn read_hex(&self, offset: usize) -> Result<String> {
        Ok(format!("0x{:04X}", self.read_u16(offset)?))
    }

    /// Decode `n` bytes at `offset` as Latin-1 (one byte maps directly
    /// to the Unicode code point of the same value).
    ///
    /// This is an acknowledged gap: DICOM's `SpecificCharacterSet`
    /// (`0008,0005`) may mandate ISO 2022 or UTF-8 decoding for text
    /// VRs, which this cursor does not implement.
    pub fn read_string(&self, offset: usize, n: usize) -> Result<String> {
        Ok(self.slice(offset, n)?.iter().map(|&b| b as char).collect())
    }
}

/// Implements one `read_{ty}_array` method on [`ByteCursor`] following
/// the alignment rule described in its module documentation: a
/// zero-copy [`safe_transmute`] view when the offset is aligned to
/// `size_of::<$ty>()` and this cursor's endianness matches the host's,
/// otherwise a freshly materialized, element-by-element decode.
macro_rules! typed_array_reader {
    ($name:ident, $ty:ty, $from_le:path, $from_be:path) => {
        impl<'a> ByteCursor<'a> {
            #[doc = concat!("Read `byte_length / size_of::<", stringify!($ty), ">()` elements starting at `offset`.")]
            pub fn $name(&self, offset: usize, byte_length: usize) -> Result<Cow<'a, [$ty]>> {
                let width = std::mem::size_of::<$ty>();
                let count = byte_length / width;
                let bytes = self.slice(offset, count * width)?;

                if offset % width == 0 && self.endianness == NATIVE_ENDIANNESS {
                    if let Ok(view) = transmute_many_pedantic::<$ty>(bytes) {
                        return Ok(Cow::Borrowed(view));
                    }
                }

                let mut out = Vec::with_capacity(count);
                let mut arr = [0u8; std::mem::size_of::<$ty>()];
                for chunk in bytes.chunks_exact(width) {
                    arr.copy_from_slice(chunk);
                    out.push(match self.endianness {
                        Endianness::Little => $from_le(arr),
                        Endianness::Big => $from_be(arr),
                    });
                }
                Ok(Cow::Owned(out))
            }
        }
    };
}

typed_array_reader!(read_u16_array, u16, u16::from_le_bytes, u16::from_be_bytes);
typed_array_reader!(read_i16_array, i16, i16::from_le_bytes, i16::from_be_bytes);
typed_array_reader!(read_u32_array, u32, u32::from_le_bytes, u32::from_be_bytes);
typed_array_reader!(read_i32_array, i32, i32::from_le_bytes, i32::from_be_bytes);
typed_array_reader!(read_f32_array, f32, f32::from_le_bytes, f32::from_be_bytes);
typed_array_reader!(read_f64_array, f64, f64::from_le_bytes, f64::from_be_bytes);
