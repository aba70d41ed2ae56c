//! PentaCodec: extensible 5-bit symbol coding
//! ===========================================
//!
//! Compresses short ASCII-like financial ticker symbols (`IBM`, `AAPL`,
//! `/ESZ24`, `$INDEX.X`) into compact fixed-width 32-bit ciphers, or into a
//! tagged variable-length byte representation on the wire, and decodes them
//! back. Eligible characters are assigned "penta" codes — either a single
//! 5-bit code or a double 10-bit code:
//!
//! ```text
//! 'A' to 'Z'                 - 5-bit pentas from 1 to 26
//! '.'                        - 5-bit penta 27
//! '/'                        - 5-bit penta 28
//! '$'                        - 5-bit penta 29
//! ''' and '`'                - none (ineligible characters)
//! ' ' to '~' except above    - 10-bit pentas from 960 to 1023
//! all other                  - none (ineligible characters)
//! ```
//!
//! Penta codes for a symbol are packed into a 64-bit value from high bits
//! to low bits, representing up to 35 bits of penta-coded characters. If a
//! symbol contains an ineligible character or doesn't fit in 35 penta bits,
//! it is not subject to penta-coding and is carried as a string instead.
//! The resulting penta run can be serialized on the wire (`read_symbol`/
//! `write_symbol`) or folded into a 32-bit cipher when representable
//! (`encode`/`decode_cipher`). Cipher `0` always means "not cipherable" or
//! "null" — never confuse it with penta `0`, which represents the empty
//! symbol and is itself a valid, cipherable value (`0x40000000`).
//!
//! Four components, leaves first: [`table`] (character tables), [`penta`]
//! (the string-to-penta packer), [`cipher`] (the penta/cipher bijection),
//! and [`wire`] (the tagged wire format). [`compact_long`] is a leaf
//! utility the wire codec's byte source needs but which is treated
//! elsewhere as an external, pre-existing dependency.

pub mod cipher;
pub mod compact_long;
pub mod error;
pub mod penta;
pub mod table;
pub mod wire;

pub use error::CodecError;
pub use wire::{read_symbol, write_symbol, ByteSink, ByteSource, ReadOutcome};

use once_cell::sync::Lazy;

/// Re-validates the character table's invariants. Idempotent; safe to call
/// from multiple threads or multiple times — the table is immutable data
/// computed at compile time, so this can only ever fail if that compile-time
/// proof itself regressed (see `table::validate`).
pub fn init() -> Result<(), CodecError> {
    table::validate()
}

/// Encodes `symbol` as a cipher. Never fails: returns `0` when the symbol
/// is absent, contains an ineligible character, or doesn't fit in 35 penta
/// bits — callers fall back to the string wire form in that case.
pub fn encode(symbol: Option<&str>) -> u32 {
    match penta::pack_string(symbol) {
        Some((p, plen)) => cipher::encode_penta(p, plen),
        None => 0,
    }
}

/// Decodes a non-zero cipher back to its symbol string. Fails with
/// [`CodecError::IllegalArgument`] on cipher `0` or any cipher whose top
/// two bits are `00`.
pub fn decode_cipher(c: u32) -> Result<String, CodecError> {
    let (p, plen) = cipher::decode_cipher(c)?;
    cipher::penta_to_string(p, plen)
}

/// `encode(Some("*"))`, a distinguished constant subscribers use to denote
/// "all symbols". `'*'` is not in the 5-bit set; it packs to a 10-bit
/// penta, so it is cipherable like any other eligible single character.
pub static WILDCARD_CIPHER: Lazy<u32> = Lazy::new(|| encode(Some("*")));
