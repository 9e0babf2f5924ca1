//! Fixed-width little-endian numbers and length-prefixed strings.

use byteorder::{ByteOrder, LittleEndian};

#[cfg(feature = "reader")]
use std::io::Read;
#[cfg(feature = "writer")]
use std::io::Write;

#[cfg(feature = "reader")]
use crate::{counting::CountingReader, de::Decode};
#[cfg(feature = "writer")]
use crate::{counting::CountingWriter, ser::Encode};
#[cfg(any(feature = "reader", feature = "writer"))]
use crate::{error::Result, string::ByteString};

mod private {
    pub trait Sealed {}
}

/// A number stored as `WIDTH` little-endian bytes.
pub trait Number: private::Sealed + Copy {
    const WIDTH: usize;

    /// Decode from exactly `WIDTH` bytes.
    fn read_le(buf: &[u8]) -> Self;

    /// Encode into exactly `WIDTH` bytes.
    fn write_le(self, buf: &mut [u8]);
}

impl private::Sealed for u8 {}
impl Number for u8 {
    const WIDTH: usize = 1;

    #[inline]
    fn read_le(buf: &[u8]) -> Self {
        buf[0]
    }

    #[inline]
    fn write_le(self, buf: &mut [u8]) {
        buf[0] = self;
    }
}

impl private::Sealed for i8 {}
impl Number for i8 {
    const WIDTH: usize = 1;

    #[inline]
    fn read_le(buf: &[u8]) -> Self {
        buf[0] as i8
    }

    #[inline]
    fn write_le(self, buf: &mut [u8]) {
        buf[0] = self as u8;
    }
}

macro_rules! impl_number {
    ($($ty:ty => $width:literal, $read:ident, $write:ident;)*) => {
        $(
            impl private::Sealed for $ty {}
            impl Number for $ty {
                const WIDTH: usize = $width;

                #[inline]
                fn read_le(buf: &[u8]) -> Self {
                    LittleEndian::$read(buf)
                }

                #[inline]
                fn write_le(self, buf: &mut [u8]) {
                    LittleEndian::$write(buf, self)
                }
            }
        )*
    };
}

impl_number! {
    u16 => 2, read_u16, write_u16;
    i16 => 2, read_i16, write_i16;
    u32 => 4, read_u32, write_u32;
    i32 => 4, read_i32, write_i32;
    u64 => 8, read_u64, write_u64;
    i64 => 8, read_i64, write_i64;
    f32 => 4, read_f32, write_f32;
    f64 => 8, read_f64, write_f64;
}

macro_rules! impl_codec {
    ($($ty:ty),*) => {
        $(
            #[cfg(feature = "reader")]
            impl Decode for $ty {
                #[inline]
                fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
                    reader.number()
                }
            }

            #[cfg(feature = "writer")]
            impl Encode for $ty {
                #[inline]
                fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
                    writer.number(*self)
                }
            }
        )*
    };
}

impl_codec!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

#[cfg(feature = "reader")]
impl Decode for ByteString {
    #[inline]
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        reader.string()
    }
}

#[cfg(feature = "writer")]
impl Encode for ByteString {
    #[inline]
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        writer.string(self)
    }
}
