//! Part 4: wire codec
//! ==================
//!
//! Reads and writes the tagged, variable-length byte representation. The
//! first byte's leading-bit-run selects the tier:
//!
//! ```text
//! 0xxxxxxx  8x - for 15-bit pentas
//! 10xxxxxx 24x - for 30-bit pentas
//! 110xxxxx ??? - reserved (payload TBD)
//! 1110xxxx 16x - for 20-bit pentas
//! 11110xxx 32x - for 35-bit pentas
//! 111110xx ??? - reserved (payload TBD)
//! 11111100 zzz - for UTF-8 string with length in bytes
//! 11111101 zzz - for CESU-8 string with length in characters
//! 11111110     - for 0-bit penta (empty symbol)
//! 11111111     - for void (null)
//! ```
//!
//! `ByteSource`/`ByteSink` are generic over anything implementing
//! `std::io::Read`/`std::io::Write`, since the wire codec's actual byte
//! source is an external, I/O-backed abstraction rather than an in-memory
//! slice.

use std::io::{self, Read, Write};

use crate::cipher;
use crate::compact_long;
use crate::error::CodecError;
use crate::penta;

/// The byte-source contract the wire codec reads through. Callers never
/// need a hand-written impl: a blanket impl over `std::io::Read` gives
/// every caller a working implementation for free.
pub trait ByteSource {
    fn read_u8(&mut self) -> io::Result<u8>;
    fn read_u16_be(&mut self) -> io::Result<u16>;
    fn read_i32_be(&mut self) -> io::Result<i32>;
    fn read_compact_long(&mut self) -> io::Result<i64>;
    fn read_utf_char(&mut self) -> io::Result<u32>;
    fn read_utf_string(&mut self) -> io::Result<String>;
}

pub trait ByteSink {
    fn write_u8(&mut self, v: u8) -> io::Result<()>;
    fn write_u16_be(&mut self, v: u16) -> io::Result<()>;
    fn write_i32_be(&mut self, v: i32) -> io::Result<()>;
    fn write_compact_long(&mut self, v: i64) -> io::Result<()>;
    fn write_utf_char(&mut self, v: u32) -> io::Result<()>;
    fn write_utf_string(&mut self, s: &str) -> io::Result<()>;
}

impl<R: Read + ?Sized> ByteSource for R {
    fn read_u8(&mut self) -> io::Result<u8> {
        let mut b = [0u8; 1];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }

    fn read_u16_be(&mut self) -> io::Result<u16> {
        let mut b = [0u8; 2];
        self.read_exact(&mut b)?;
        Ok(u16::from_be_bytes(b))
    }

    fn read_i32_be(&mut self) -> io::Result<i32> {
        let mut b = [0u8; 4];
        self.read_exact(&mut b)?;
        Ok(i32::from_be_bytes(b))
    }

    fn read_compact_long(&mut self) -> io::Result<i64> {
        compact_long::read_compact_long(self)
    }

    fn read_utf_char(&mut self) -> io::Result<u32> {
        let unit = read_cesu_unit(self)?;
        if (0xD800..=0xDBFF).contains(&unit) {
            let low = read_cesu_unit(self)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "unpaired high surrogate in CESU-8 stream",
                ));
            }
            let cp = 0x10000u32
                + ((u32::from(unit) - 0xD800) << 10)
                + (u32::from(low) - 0xDC00);
            Ok(cp)
        } else {
            Ok(u32::from(unit))
        }
    }

    fn read_utf_string(&mut self) -> io::Result<String> {
        let len = compact_long::read_compact_long(self)?;
        if len < 0 || len > i64::from(i32::MAX) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "illegal UTF-8 string length",
            ));
        }
        let mut buf = vec![0u8; len as usize];
        self.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl<W: Write + ?Sized> ByteSink for W {
    fn write_u8(&mut self, v: u8) -> io::Result<()> {
        self.write_all(&[v])
    }

    fn write_u16_be(&mut self, v: u16) -> io::Result<()> {
        self.write_all(&v.to_be_bytes())
    }

    fn write_i32_be(&mut self, v: i32) -> io::Result<()> {
        self.write_all(&v.to_be_bytes())
    }

    fn write_compact_long(&mut self, v: i64) -> io::Result<()> {
        compact_long::write_compact_long(self, v)
    }

    fn write_utf_char(&mut self, v: u32) -> io::Result<()> {
        if v > 0xFFFF {
            let v = v - 0x10000;
            let high = 0xD800u16 + ((v >> 10) as u16);
            let low = 0xDC00u16 + ((v & 0x3FF) as u16);
            write_cesu_unit(self, high)?;
            write_cesu_unit(self, low)
        } else {
            write_cesu_unit(self, v as u16)
        }
    }

    fn write_utf_string(&mut self, s: &str) -> io::Result<()> {
        self.write_compact_long(s.len() as i64)?;
        self.write_all(s.as_bytes())
    }
}

/// Decodes one CESU-8 code unit (1-3 bytes, the same range UTF-8 uses for
/// values up to 0xFFFF — CESU-8 never uses the 4-byte UTF-8 form, encoding
/// supplementary characters as a surrogate pair of two such sequences
/// instead).
fn read_cesu_unit<R: Read + ?Sized>(r: &mut R) -> io::Result<u16> {
    let b0 = ByteSource::read_u8(r)?;
    if b0 & 0x80 == 0 {
        Ok(u16::from(b0))
    } else if b0 & 0xE0 == 0xC0 {
        let b1 = ByteSource::read_u8(r)?;
        Ok((u16::from(b0 & 0x1F) << 6) | u16::from(b1 & 0x3F))
    } else if b0 & 0xF0 == 0xE0 {
        let b1 = ByteSource::read_u8(r)?;
        let b2 = ByteSource::read_u8(r)?;
        Ok((u16::from(b0 & 0x0F) << 12) | (u16::from(b1 & 0x3F) << 6) | u16::from(b2 & 0x3F))
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "invalid CESU-8 lead byte",
        ))
    }
}

fn write_cesu_unit<W: Write + ?Sized>(w: &mut W, unit: u16) -> io::Result<()> {
    if unit < 0x80 {
        ByteSink::write_u8(w, unit as u8)
    } else if unit < 0x800 {
        let b0 = 0xC0 | ((unit >> 6) as u8);
        let b1 = 0x80 | ((unit & 0x3F) as u8);
        w.write_all(&[b0, b1])
    } else {
        let b0 = 0xE0 | ((unit >> 12) as u8);
        let b1 = 0x80 | (((unit >> 6) & 0x3F) as u8);
        let b2 = 0x80 | ((unit & 0x3F) as u8);
        w.write_all(&[b0, b1, b2])
    }
}

/// First-byte tag ranges, see the module doc's framing table.
mod tag {
    pub const SHORT_HI: u8 = 0x7F;
    pub const TIER30_LO: u8 = 0x80;
    pub const TIER30_HI: u8 = 0xBF;
    pub const RESERVED1_LO: u8 = 0xC0;
    pub const RESERVED1_HI: u8 = 0xDF;
    pub const TIER20_LO: u8 = 0xE0;
    pub const TIER20_HI: u8 = 0xEF;
    pub const TIER35_LO: u8 = 0xF0;
    pub const TIER35_HI: u8 = 0xF7;
    pub const RESERVED2_LO: u8 = 0xF8;
    pub const RESERVED2_HI: u8 = 0xFB;
    pub const UTF8_STRING: u8 = 0xFC;
    pub const CESU8_STRING: u8 = 0xFD;
    pub const EMPTY: u8 = 0xFE;
    pub const NULL: u8 = 0xFF;
}

/// The clean, non-aliasing result of `read_symbol` (see the Design Notes'
/// "prefer the clean variant" recommendation). Wire bytes stay bit-exact
/// with the tag table above regardless of which outcome is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Cipher(u32),
    Null,
    Str(String),
}

pub fn read_symbol<S: ByteSource + ?Sized>(
    source: &mut S,
    scratch: &mut Vec<u16>,
) -> Result<ReadOutcome, CodecError> {
    let i = source.read_u8()?;
    log::trace!("read_symbol: tag byte 0x{:02x}", i);
    let penta: u64 = match i {
        0x00..=tag::SHORT_HI => {
            let lo = source.read_u8()?;
            (u64::from(i) << 8) | u64::from(lo)
        }
        tag::TIER30_LO..=tag::TIER30_HI => {
            let b1 = source.read_u8()?;
            let b23 = source.read_u16_be()?;
            ((u64::from(i & 0x3F)) << 24) | (u64::from(b1) << 16) | u64::from(b23)
        }
        tag::RESERVED1_LO..=tag::RESERVED1_HI => {
            return Err(CodecError::ReservedBitSequence(i));
        }
        tag::TIER20_LO..=tag::TIER20_HI => {
            let b = source.read_u16_be()?;
            (u64::from(i & 0x0F) << 16) | u64::from(b)
        }
        tag::TIER35_LO..=tag::TIER35_HI => {
            let b = source.read_i32_be()? as u32;
            (u64::from(i & 0x07) << 32) | u64::from(b)
        }
        tag::RESERVED2_LO..=tag::RESERVED2_HI => {
            return Err(CodecError::ReservedBitSequence(i));
        }
        tag::UTF8_STRING => {
            return Ok(ReadOutcome::Str(source.read_utf_string()?));
        }
        tag::CESU8_STRING => {
            return read_cesu8_symbol(source, scratch);
        }
        tag::EMPTY => 0u64,
        tag::NULL => return Ok(ReadOutcome::Null),
    };

    let plen = cipher::smallest_plen(penta);
    let cipher_val = cipher::encode_penta(penta, plen);
    if cipher_val == 0 {
        // Defensive fallback: a 35-bit penta tier whose leading character is
        // neither '/' nor '$' can't be represented as a cipher at all; the
        // symbol is still well-formed, it is just reported as a string.
        Ok(ReadOutcome::Str(cipher::penta_to_string(penta, plen)?))
    } else {
        Ok(ReadOutcome::Cipher(cipher_val))
    }
}

fn read_cesu8_symbol<S: ByteSource + ?Sized>(
    source: &mut S,
    scratch: &mut Vec<u16>,
) -> Result<ReadOutcome, CodecError> {
    let length = source.read_compact_long()?;
    if length < -1 || length > i64::from(i32::MAX) {
        return Err(CodecError::IllegalLength(length));
    }
    if length == -1 {
        return Ok(ReadOutcome::Null);
    }
    if length == 0 {
        return Ok(ReadOutcome::Str(String::new()));
    }
    scratch.clear();
    scratch.reserve(length as usize);
    for _ in 0..length {
        let cp = source.read_utf_char()?;
        if cp > 0xFFFF {
            return Err(CodecError::CodePointBeyondBmp(cp));
        }
        scratch.push(cp as u16);
    }
    let s = String::from_utf16(scratch)
        .map_err(|_| CodecError::Internal("lone surrogate in CESU-8 payload".into()))?;
    Ok(ReadOutcome::Str(s))
}

pub fn write_symbol<S: ByteSink + ?Sized>(sink: &mut S, symbol: Option<&str>) -> Result<(), CodecError> {
    match symbol {
        None => {
            sink.write_u8(tag::NULL)?;
            Ok(())
        }
        Some("") => {
            sink.write_u8(tag::EMPTY)?;
            Ok(())
        }
        Some(s) => {
            // Only symbols that are actually cipherable get the compact
            // penta framing; a packable-but-not-cipherable run (e.g. seven
            // 5-bit characters not prefixed by '/' or '$') falls back to
            // CESU-8 just like an ineligible-character symbol would.
            match penta::pack_string(Some(s)) {
                Some((p, plen)) if cipher::encode_penta(p, plen) != 0 => {
                    write_penta_tier(sink, p, plen)
                }
                _ => write_cesu8_symbol(sink, s),
            }
        }
    }
}

fn write_penta_tier<S: ByteSink + ?Sized>(sink: &mut S, penta: u64, plen: u8) -> Result<(), CodecError> {
    log::trace!("write_symbol: penta=0x{:x} plen={}", penta, plen);
    if plen <= 15 {
        let i = ((penta >> 8) & 0x7F) as u8;
        let lo = (penta & 0xFF) as u8;
        sink.write_u8(i)?;
        sink.write_u8(lo)?;
    } else if plen <= 20 {
        let i = tag::TIER20_LO | (((penta >> 16) & 0x0F) as u8);
        sink.write_u8(i)?;
        sink.write_u16_be((penta & 0xFFFF) as u16)?;
    } else if plen <= 30 {
        let i = tag::TIER30_LO | (((penta >> 24) & 0x3F) as u8);
        sink.write_u8(i)?;
        sink.write_u8(((penta >> 16) & 0xFF) as u8)?;
        sink.write_u16_be((penta & 0xFFFF) as u16)?;
    } else {
        let i = tag::TIER35_LO | (((penta >> 32) & 0x07) as u8);
        sink.write_u8(i)?;
        sink.write_i32_be((penta & 0xFFFF_FFFF) as u32 as i32)?;
    }
    Ok(())
}

fn write_cesu8_symbol<S: ByteSink + ?Sized>(sink: &mut S, s: &str) -> Result<(), CodecError> {
    sink.write_u8(tag::CESU8_STRING)?;
    let char_count = s.chars().count() as i64;
    sink.write_compact_long(char_count)?;
    for c in s.chars() {
        sink.write_utf_char(c as u32)?;
    }
    Ok(())
}
