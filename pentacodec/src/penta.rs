//! Part 2: penta packer
//! ====================
//!
//! Packs an ASCII string into a single 64-bit accumulator: each eligible
//! character contributes its 5- or 10-bit penta code, shifted in from the
//! low end so the first character of the string ends up in the high bits
//! of the occupied range — a left-aligned, shift-then-OR packing of
//! variable 5-/10-bit penta lanes into a single scalar register.

use crate::table;

/// Maximum total bit width a packed penta run may occupy.
pub const MAX_PLEN: u8 = 35;

/// Packs `s` into `(penta, plen)`. Returns `None` when `s` is absent, too
/// long to fit in 35 penta bits, or contains a character with no assigned
/// penta code (the `ineligible-symbol` condition — silent by design, see
/// `encode`).
pub fn pack_string(s: Option<&str>) -> Option<(u64, u8)> {
    let s = s?;

    // A cheap upper bound before touching individual characters: even an
    // all-5-bit string can't exceed 7 characters (7 * 5 == 35).
    if s.len() > 7 {
        return None;
    }

    let mut penta: u64 = 0;
    let mut plen: u8 = 0;
    for ch in s.chars() {
        if !ch.is_ascii() {
            return None;
        }
        let (p, l) = table::penta_of(ch as u8)?;
        penta = (penta << l) | u64::from(p);
        plen += l;
        if plen > MAX_PLEN {
            return None;
        }
    }
    log::trace!("pack_string({:?}) -> penta=0x{:x} plen={}", s, penta, plen);
    Some((penta, plen))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_packs_to_zero() {
        assert_eq!(pack_string(Some("")), Some((0, 0)));
    }

    #[test]
    fn null_does_not_pack() {
        assert_eq!(pack_string(None), None);
    }

    #[test]
    fn single_letter() {
        assert_eq!(pack_string(Some("A")), Some((1, 5)));
    }

    #[test]
    fn ibm_packs_high_bits_first() {
        // I=9, B=2, M=13 -> (9<<10)|(2<<5)|13
        let expected = (9u64 << 10) | (2u64 << 5) | 13u64;
        assert_eq!(pack_string(Some("IBM")), Some((expected, 15)));
    }

    #[test]
    fn lowercase_uses_10_bit_code() {
        let (penta, plen) = pack_string(Some("a")).unwrap();
        assert_eq!(plen, 10);
        assert!(penta >= 0x3C0);
    }

    #[test]
    fn eight_char_string_overflows() {
        assert_eq!(pack_string(Some("AAAAAAAA")), None);
    }

    #[test]
    fn seven_five_bit_chars_fit_exactly() {
        assert!(pack_string(Some("AAAAAAA")).is_some());
    }

    #[test]
    fn quote_character_is_ineligible() {
        assert_eq!(pack_string(Some("'")), None);
    }

    #[test]
    fn non_ascii_is_ineligible() {
        assert_eq!(pack_string(Some("é")), None);
    }
}
