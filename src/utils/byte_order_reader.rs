/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// A cursor over an in-memory byte buffer whose byte order can be switched
/// at any point, including in the middle of a record.
///
/// Every read advances the cursor by the width of the value. Bit-level reads
/// (`read_bit8`, `read_bits16`, ...) consume bits of the unit at the current
/// position, least significant bit first, and only move the byte position
/// once the whole unit has been consumed. Any byte-aligned read or seek drops
/// a partially consumed unit.
///
/// A reader is not reentrant: one decode pass owns it for its whole duration.
pub struct ByteOrderReader<'a> {
    byte_order: Endianness,
    buffer: &'a [u8],
    pos: usize,
    bit_pos: u32,
}

impl<'a> ByteOrderReader<'a> {
    pub fn new(buffer: &'a [u8], byte_order: Endianness) -> ByteOrderReader<'a> {
        ByteOrderReader {
            byte_order,
            buffer,
            pos: 0usize,
            bit_pos: 0u32,
        }
    }

    pub fn set_byte_order(&mut self, byte_order: Endianness) {
        self.byte_order = byte_order;
    }

    pub fn byte_order(&self) -> Endianness {
        self.byte_order
    }

    /// Replaces the underlying buffer and returns the cursor to the start.
    pub fn set_buffer(&mut self, buffer: &'a [u8]) {
        self.buffer = buffer;
        self.pos = 0;
        self.bit_pos = 0;
    }

    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.buffer.len() {
            return Err(Error::SeekOutOfBounds {
                offset: position,
                len: self.buffer.len(),
            });
        }
        self.pos = position;
        self.bit_pos = 0;
        Ok(())
    }

    pub fn inc_pos(&mut self, skip: usize) -> Result<()> {
        self.seek(self.pos + skip)
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_end_of_file(&self) -> bool {
        self.pos >= self.buffer.len()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.pos)
    }

    fn take(&mut self, width: usize) -> Result<&'a [u8]> {
        let end = self.pos + width;
        if end > self.buffer.len() {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                wanted: width,
                len: self.buffer.len(),
            });
        }
        let bytes = &self.buffer[self.pos..end];
        self.pos = end;
        self.bit_pos = 0;
        Ok(bytes)
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        self.take(length)
    }

    pub fn read_utf8(&mut self, length: usize) -> Result<String> {
        let bytes = self.take(length)?;
        Ok(String::from_utf8_lossy(bytes).to_string())
    }

    pub fn read_char(&mut self) -> Result<char> {
        Ok(char::from(self.read_u8()?))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        // There's really no need for endian issues when reading single bytes.
        Ok(self.take(1)?[0])
    }

    pub fn peek_u8(&self) -> Result<u8> {
        match self.buffer.get(self.pos) {
            Some(b) => Ok(*b),
            None => Err(Error::UnexpectedEof {
                offset: self.pos,
                wanted: 1,
                len: self.buffer.len(),
            }),
        }
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let buf = self.take(2)?;
        Ok(match self.byte_order {
            Endianness::LittleEndian => LittleEndian::read_u16(buf),
            Endianness::BigEndian => BigEndian::read_u16(buf),
        })
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let buf = self.take(2)?;
        Ok(match self.byte_order {
            Endianness::LittleEndian => LittleEndian::read_i16(buf),
            Endianness::BigEndian => BigEndian::read_i16(buf),
        })
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let buf = self.take(4)?;
        Ok(match self.byte_order {
            Endianness::LittleEndian => LittleEndian::read_u32(buf),
            Endianness::BigEndian => BigEndian::read_u32(buf),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let buf = self.take(4)?;
        Ok(match self.byte_order {
            Endianness::LittleEndian => LittleEndian::read_i32(buf),
            Endianness::BigEndian => BigEndian::read_i32(buf),
        })
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let buf = self.take(8)?;
        Ok(match self.byte_order {
            Endianness::LittleEndian => LittleEndian::read_u64(buf),
            Endianness::BigEndian => BigEndian::read_u64(buf),
        })
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let buf = self.take(8)?;
        Ok(match self.byte_order {
            Endianness::LittleEndian => LittleEndian::read_i64(buf),
            Endianness::BigEndian => BigEndian::read_i64(buf),
        })
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let buf = self.take(4)?;
        Ok(match self.byte_order {
            Endianness::LittleEndian => LittleEndian::read_f32(buf),
            Endianness::BigEndian => BigEndian::read_f32(buf),
        })
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let buf = self.take(8)?;
        Ok(match self.byte_order {
            Endianness::LittleEndian => LittleEndian::read_f64(buf),
            Endianness::BigEndian => BigEndian::read_f64(buf),
        })
    }

    /// Reads `num_bits` bits out of consecutive units of `unit_bytes` bytes.
    fn read_bits(&mut self, unit_bytes: usize, num_bits: u32) -> Result<u32> {
        let unit_bits = unit_bytes as u32 * 8;
        let mut value = 0u32;
        let mut filled = 0u32;
        while filled < num_bits {
            let end = self.pos + unit_bytes;
            if end > self.buffer.len() {
                return Err(Error::UnexpectedEof {
                    offset: self.pos,
                    wanted: unit_bytes,
                    len: self.buffer.len(),
                });
            }
            let raw = &self.buffer[self.pos..end];
            let unit = match (unit_bytes, self.byte_order) {
                (1, _) => raw[0] as u32,
                (_, Endianness::LittleEndian) => LittleEndian::read_u16(raw) as u32,
                (_, Endianness::BigEndian) => BigEndian::read_u16(raw) as u32,
            };
            let take = (unit_bits - self.bit_pos).min(num_bits - filled);
            let mask = (1u32 << take) - 1;
            value |= ((unit >> self.bit_pos) & mask) << filled;
            filled += take;
            self.bit_pos += take;
            if self.bit_pos == unit_bits {
                self.pos = end;
                self.bit_pos = 0;
            }
        }
        Ok(value)
    }

    pub fn read_bit8(&mut self) -> Result<bool> {
        Ok(self.read_bits(1, 1)? == 1)
    }

    pub fn read_bits8(&mut self, num_bits: u32) -> Result<u8> {
        Ok(self.read_bits(1, num_bits.min(8))? as u8)
    }

    pub fn read_bit16(&mut self) -> Result<bool> {
        Ok(self.read_bits(2, 1)? == 1)
    }

    pub fn read_bits16(&mut self, num_bits: u32) -> Result<u16> {
        Ok(self.read_bits(2, num_bits.min(16))? as u16)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Endianness {
    LittleEndian,
    BigEndian,
}

impl Default for Endianness {
    fn default() -> Endianness {
        Endianness::LittleEndian
    }
}

#[cfg(test)]
mod test {
    use super::{ByteOrderReader, Endianness};
    use crate::error::Error;

    #[test]
    fn test_switching_byte_order_mid_stream() {
        let buffer = [0x00u8, 0x00, 0x27, 0x0A, 0x0A, 0x27, 0x00, 0x00];
        let mut bor = ByteOrderReader::new(&buffer, Endianness::BigEndian);
        assert_eq!(bor.read_i32().unwrap(), 9994);
        bor.set_byte_order(Endianness::LittleEndian);
        assert_eq!(bor.read_i32().unwrap(), 9994);
        assert!(bor.is_end_of_file());
    }

    #[test]
    fn test_read_past_end_is_an_error() {
        let buffer = [1u8, 2, 3];
        let mut bor = ByteOrderReader::new(&buffer, Endianness::LittleEndian);
        bor.inc_pos(2).unwrap();
        match bor.read_u16() {
            Err(Error::UnexpectedEof { offset, wanted, len }) => {
                assert_eq!((offset, wanted, len), (2, 2, 3));
            }
            other => panic!("unexpected result {:?}", other),
        }
        // the failed read must not move the cursor
        assert_eq!(bor.pos(), 2);
        assert!(bor.seek(4).is_err());
    }

    #[test]
    fn test_bit_reads_hold_the_byte_position() {
        // 0b1010_1101: bits (lsb first) 1, 0, 1, 1, 0, 1, 0, 1
        let buffer = [0b1010_1101u8, 0xFF];
        let mut bor = ByteOrderReader::new(&buffer, Endianness::LittleEndian);
        assert_eq!(bor.read_bits8(3).unwrap(), 0b101);
        assert_eq!(bor.pos(), 0);
        assert_eq!(bor.read_bits8(3).unwrap(), 0b101);
        assert_eq!(bor.read_bit8().unwrap(), false);
        assert_eq!(bor.pos(), 0);
        assert_eq!(bor.read_bit8().unwrap(), true);
        assert_eq!(bor.pos(), 1);
        assert_eq!(bor.read_u8().unwrap(), 0xFF);
    }

    #[test]
    fn test_bits16_follow_byte_order() {
        let buffer = [0x21u8, 0x43];
        let mut bor = ByteOrderReader::new(&buffer, Endianness::LittleEndian);
        assert_eq!(bor.read_bits16(4).unwrap(), 0x1);
        assert_eq!(bor.read_bits16(4).unwrap(), 0x2);
        assert_eq!(bor.read_bits16(8).unwrap(), 0x43);
        assert_eq!(bor.pos(), 2);

        let mut bor = ByteOrderReader::new(&buffer, Endianness::BigEndian);
        assert_eq!(bor.read_bits16(4).unwrap(), 0x3);
        assert_eq!(bor.read_bit16().unwrap(), false);
    }

    #[test]
    fn test_strings_and_chars() {
        let buffer = b"LASFx";
        let mut bor = ByteOrderReader::new(buffer, Endianness::BigEndian);
        assert_eq!(bor.read_utf8(4).unwrap(), "LASF");
        assert_eq!(bor.peek_u8().unwrap(), b'x');
        assert_eq!(bor.read_char().unwrap(), 'x');
        assert!(bor.peek_u8().is_err());
    }
}
