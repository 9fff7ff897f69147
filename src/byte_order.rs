//! Endian-aware scalar I/O shared by the WKB codec and the shapefile engine.
//!
//! Every multi-byte read goes through a single fixed-size buffer read followed by
//! `from_be_bytes`/`from_le_bytes`, so each consumer sees the same byte swap
//! regardless of the host's native order.

use std::io::{self, Read, Write};

use crate::errors::{GeokitError, Result};

/// Byte order of a WKB geometry or of a shapefile header field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// XDR, flag byte `0`.
    BigEndian,
    /// NDR, flag byte `1`.
    LittleEndian,
}

impl ByteOrder {
    /// The order of the machine this code is running on.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Decode a WKB byte-order flag.
    pub fn from_wkb_flag(flag: u8) -> Result<Self> {
        match flag {
            0 => Ok(ByteOrder::BigEndian),
            1 => Ok(ByteOrder::LittleEndian),
            other => Err(GeokitError::format(
                "WKB",
                format!("unknown byte order flag {other}"),
            )),
        }
    }

    /// The WKB flag byte for this order.
    pub fn wkb_flag(self) -> u8 {
        match self {
            ByteOrder::BigEndian => 0,
            ByteOrder::LittleEndian => 1,
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::LittleEndian
    }
}

fn read_array<R: Read + ?Sized, const N: usize>(reader: &mut R) -> io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Fixed-width scalar reads over any [`Read`].
pub trait ReadBytesExt: Read {
    fn read_u8(&mut self) -> io::Result<u8> {
        Ok(read_array::<_, 1>(self)?[0])
    }

    fn read_i32_be(&mut self) -> io::Result<i32> {
        Ok(i32::from_be_bytes(read_array(self)?))
    }

    fn read_u32_be(&mut self) -> io::Result<u32> {
        Ok(u32::from_be_bytes(read_array(self)?))
    }

    fn read_i32_le(&mut self) -> io::Result<i32> {
        Ok(i32::from_le_bytes(read_array(self)?))
    }

    fn read_u32_le(&mut self) -> io::Result<u32> {
        Ok(u32::from_le_bytes(read_array(self)?))
    }

    fn read_u16_le(&mut self) -> io::Result<u16> {
        Ok(u16::from_le_bytes(read_array(self)?))
    }

    fn read_f64_le(&mut self) -> io::Result<f64> {
        Ok(f64::from_le_bytes(read_array(self)?))
    }

    fn read_f64_be(&mut self) -> io::Result<f64> {
        Ok(f64::from_be_bytes(read_array(self)?))
    }

    fn read_u32_with(&mut self, order: ByteOrder) -> io::Result<u32> {
        match order {
            ByteOrder::BigEndian => self.read_u32_be(),
            ByteOrder::LittleEndian => self.read_u32_le(),
        }
    }

    fn read_i32_with(&mut self, order: ByteOrder) -> io::Result<i32> {
        match order {
            ByteOrder::BigEndian => self.read_i32_be(),
            ByteOrder::LittleEndian => self.read_i32_le(),
        }
    }

    fn read_f64_with(&mut self, order: ByteOrder) -> io::Result<f64> {
        match order {
            ByteOrder::BigEndian => self.read_f64_be(),
            ByteOrder::LittleEndian => self.read_f64_le(),
        }
    }
}

impl<R: Read + ?Sized> ReadBytesExt for R {}

/// Fixed-width scalar writes over any [`Write`].
pub trait WriteBytesExt: Write {
    fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.write_all(&[value])
    }

    fn write_i32_be(&mut self, value: i32) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_u32_be(&mut self, value: u32) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_i32_le(&mut self, value: i32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_u32_le(&mut self, value: u32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_u16_le(&mut self, value: u16) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_f64_le(&mut self, value: f64) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_f64_be(&mut self, value: f64) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_u32_with(&mut self, value: u32, order: ByteOrder) -> io::Result<()> {
        match order {
            ByteOrder::BigEndian => self.write_u32_be(value),
            ByteOrder::LittleEndian => self.write_u32_le(value),
        }
    }

    fn write_f64_with(&mut self, value: f64, order: ByteOrder) -> io::Result<()> {
        match order {
            ByteOrder::BigEndian => self.write_f64_be(value),
            ByteOrder::LittleEndian => self.write_f64_le(value),
        }
    }
}

impl<W: Write + ?Sized> WriteBytesExt for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_big_endian_shapefile_code() {
        let mut cursor = Cursor::new(vec![0x00, 0x00, 0x27, 0x0a]);
        assert_eq!(cursor.read_i32_be().unwrap(), 9994);
    }

    #[test]
    fn test_mixed_orders_on_one_stream() {
        let mut buf = Vec::new();
        buf.write_i32_be(1000).unwrap();
        buf.write_i32_le(1000).unwrap();
        buf.write_f64_with(-96.5, ByteOrder::BigEndian).unwrap();
        assert_eq!(&buf[..8], &[0, 0, 0x03, 0xe8, 0xe8, 0x03, 0, 0]);

        let mut cursor = Cursor::new(buf);
        assert_eq!(cursor.read_i32_be().unwrap(), 1000);
        assert_eq!(cursor.read_i32_with(ByteOrder::LittleEndian).unwrap(), 1000);
        assert_eq!(cursor.read_f64_be().unwrap(), -96.5);
    }

    #[test]
    fn test_exhausted_stream_is_io_error() {
        let mut cursor = Cursor::new(vec![1, 2]);
        let err = cursor.read_u32_le().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_wkb_flags() {
        assert_eq!(ByteOrder::from_wkb_flag(0).unwrap(), ByteOrder::BigEndian);
        assert_eq!(ByteOrder::from_wkb_flag(1).unwrap(), ByteOrder::LittleEndian);
        assert!(ByteOrder::from_wkb_flag(2).is_err());
        assert_eq!(ByteOrder::BigEndian.wkb_flag(), 0);
    }
}
