//! Part 3: cipher codec
//! ====================
//!
//! A bijection between a packed `(penta, plen)` pair and a 32-bit cipher,
//! when one exists. The top two bits of the cipher are a tag selecting one
//! of three representable shapes, picked purely from the magnitude and
//! shape of the packed run:
//!
//! - tag `01`: any run of at most 30 penta bits, carried verbatim in the
//!   low 30 bits.
//! - tag `10`: a 35-bit run whose first character is `/` (penta 28).
//! - tag `11`: a 35-bit run whose first character is `$` (penta 29).
//!
//! Tag `00` (cipher `0`) is reserved to mean "void / not cipherable" and is
//! never produced by `encode_penta`.

use crate::error::CodecError;
use crate::table;

const TAG_SHIFT: u32 = 30;
const TAG_MASK: u32 = 0x3 << TAG_SHIFT;
const PAYLOAD_MASK_30: u32 = 0x3FFF_FFFF;

const TAG_SHORT: u32 = 0x1 << TAG_SHIFT; // 01
const TAG_SLASH: u32 = 0x2 << TAG_SHIFT; // 10
const TAG_DOLLAR: u32 = 0x3 << TAG_SHIFT; // 11

const SLASH_PENTA: u64 = 28;
const DOLLAR_PENTA: u64 = 29;

/// Encodes a packed penta run as a cipher, or returns `0` if the run does
/// not fit any of the three representable shapes.
///
/// Precondition: `plen <= 35` and `penta` occupies only its low `plen`
/// bits (violating this is a caller bug, not a codec error, since every
/// call site in this crate builds `(penta, plen)` through `pack_string` or
/// the wire codec's own tier arithmetic, both of which uphold it).
pub fn encode_penta(penta: u64, plen: u8) -> u32 {
    log::trace!("encode_penta(penta=0x{:x}, plen={})", penta, plen);
    if plen <= 30 {
        return (penta as u32 & PAYLOAD_MASK_30) | TAG_SHORT;
    }
    let hi = penta >> 30;
    if hi == SLASH_PENTA && plen == 35 {
        (penta as u32 & PAYLOAD_MASK_30) | TAG_SLASH
    } else if hi == DOLLAR_PENTA && plen == 35 {
        (penta as u32 & PAYLOAD_MASK_30) | TAG_DOLLAR
    } else {
        0
    }
}

/// Inverse of `encode_penta`. Fails with `IllegalArgument` on a reserved
/// tag (`00`, which includes cipher `0`).
pub fn decode_cipher(cipher: u32) -> Result<(u64, u8), CodecError> {
    if cipher & TAG_MASK == 0 {
        return Err(CodecError::IllegalArgument);
    }
    let payload = cipher & PAYLOAD_MASK_30;
    let (penta, plen) = match cipher & TAG_MASK {
        TAG_SHORT => (u64::from(payload), smallest_plen(u64::from(payload))),
        TAG_SLASH => ((SLASH_PENTA << 30) | u64::from(payload), 35),
        TAG_DOLLAR => ((DOLLAR_PENTA << 30) | u64::from(payload), 35),
        _ => unreachable!("only two tag bits exist"),
    };
    log::trace!(
        "decode_cipher(0x{:08x}) -> penta=0x{:x} plen={}",
        cipher,
        penta,
        plen
    );
    Ok((penta, plen))
}

/// The smallest multiple of 5 such that `penta >> plen == 0`.
pub fn smallest_plen(penta: u64) -> u8 {
    let mut plen: u8 = 0;
    while (penta >> plen) != 0 {
        plen += 5;
    }
    plen
}

/// Peels 5- or 10-bit groups from the top of a packed penta run and maps
/// each through the character table, handling the `30`/`31` escape marks
/// that promote the next 5-bit group into a 10-bit one.
pub fn penta_to_string(penta: u64, plen: u8) -> Result<String, CodecError> {
    let mut out = String::with_capacity((plen / 5) as usize);
    let mut remaining = plen;
    while remaining > 0 {
        remaining -= 5;
        let group5 = ((penta >> remaining) & 0x1F) as u16;
        if table::is_escape(group5) {
            if remaining < 5 {
                return Err(CodecError::Internal(format!(
                    "escape mark with no following 5-bit group (plen={})",
                    plen
                )));
            }
            remaining -= 5;
            let low5 = (penta >> remaining) & 0x1F;
            let ten_bit = group5 * 32 + low5;
            let c = table::char_of_penta10(ten_bit).ok_or_else(|| {
                CodecError::Internal(format!("unassigned 10-bit penta 0x{:x}", ten_bit))
            })?;
            out.push(c as char);
        } else {
            let c = table::char_of_penta5(group5).ok_or_else(|| {
                CodecError::Internal(format!("unassigned 5-bit penta {}", group5))
            })?;
            out.push(c as char);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::penta::pack_string;

    #[test]
    fn short_tier_sets_tag_bits() {
        let (penta, plen) = pack_string(Some("A")).unwrap();
        assert_eq!(encode_penta(penta, plen), 0x4000_0001);
    }

    #[test]
    fn ibm_cipher() {
        // I=9, B=2, M=13, all 5-bit: penta = (9<<10)|(2<<5)|13 = 0x244d.
        let (penta, plen) = pack_string(Some("IBM")).unwrap();
        assert_eq!(penta, 0x244d);
        assert_eq!(encode_penta(penta, plen), 0x4000_244D);
    }

    #[test]
    fn dot_cipher() {
        let (penta, plen) = pack_string(Some(".")).unwrap();
        assert_eq!(encode_penta(penta, plen), 0x4000_001B);
    }

    #[test]
    fn lowercase_a_cipher() {
        // 'a' is the 34th character assigned a 10-bit code (0-indexed from
        // 0x3c0, walking printable ASCII from SP and skipping the 5-bit set
        // plus the two excluded quote characters): 0x3c0 + 0x22 = 0x3e2.
        let (penta, plen) = pack_string(Some("a")).unwrap();
        assert_eq!(penta, 0x3e2);
        assert_eq!(encode_penta(penta, plen), 0x4000_03E2);
    }

    #[test]
    fn slash_prefixed_35_bit_run_is_cipherable() {
        let (penta, plen) = pack_string(Some("/AAAAAA")).unwrap();
        assert_eq!(plen, 35);
        let cipher = encode_penta(penta, plen);
        assert_eq!(cipher & 0xC000_0000, 0x8000_0000);
    }

    #[test]
    fn dollar_prefixed_35_bit_run_is_cipherable() {
        let (penta, plen) = pack_string(Some("$AAAAAA")).unwrap();
        assert_eq!(plen, 35);
        let cipher = encode_penta(penta, plen);
        assert_eq!(cipher & 0xC000_0000, 0xC000_0000);
    }

    #[test]
    fn non_slash_dollar_35_bit_run_is_not_cipherable() {
        let (penta, plen) = pack_string(Some("AAAAAAA")).unwrap();
        assert_eq!(plen, 35);
        assert_eq!(encode_penta(penta, plen), 0);
    }

    #[test]
    fn empty_penta_is_cipherable() {
        assert_eq!(encode_penta(0, 0), 0x4000_0000);
    }

    #[test]
    fn decode_cipher_zero_is_illegal() {
        assert!(matches!(
            decode_cipher(0),
            Err(CodecError::IllegalArgument)
        ));
    }

    #[test]
    fn decode_is_inverse_of_encode() {
        for s in ["A", "IBM", ".", "a", "/AAAAAA", "$AAAAAA", ""] {
            let (penta, plen) = pack_string(Some(s)).unwrap();
            let cipher = encode_penta(penta, plen);
            assert_ne!(cipher, 0);
            let (back_penta, back_plen) = decode_cipher(cipher).unwrap();
            assert_eq!(encode_penta(back_penta, back_plen), cipher);
            assert_eq!(penta_to_string(back_penta, back_plen).unwrap(), s);
        }
    }
}
