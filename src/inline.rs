//! Inline value codec: small token values packed into a single 64-bit word.
//!
//! Values that fit are stored directly in the owning row's offset slot,
//! avoiding any out-of-line heap storage. A word holds exactly one of three
//! forms, discriminated by the [`STRING`] and [`COMPRESS`] flag bits:
//!
//! ```text
//! bit 39  INLINE    word is an inline value (never set on real offsets)
//! bit 38  COMPRESS  with STRING: payload is a 2-bit whitespace run
//! bit 37  STRING    payload is packed bytes, not a plain integer
//! bits 35..=32      token length (string forms)
//! bits 31..=0       payload
//! ```
//!
//! Forms, in the order [`pack`] tries them:
//! 1. plain integer: ASCII decimal token, no redundant leading zero,
//!    value `<= i32::MAX`; payload is the value itself;
//! 2. short string: up to 4 raw bytes, packed most-significant-first;
//! 3. whitespace run: 5 to 15 bytes drawn from `\n \t space \r`, each
//!    mapped to a 2-bit code and packed most-significant-first.
//!
//! Anything else is not inlinable and must be stored out of line.

use crate::compress::COMPRESS;

/// Word is an inline value rather than a heap offset.
pub const INLINE: u64 = 1 << 39;

/// Payload holds packed bytes (short-string or whitespace form).
pub const STRING: u64 = 1 << 37;

/// Whitespace bytes in 2-bit code order.
const WHITESPACE: [u8; 4] = [b'\n', b'\t', b' ', b'\r'];

/// Try to pack `token` into an inline word.
///
/// Returns `None` when the token fits no inline form; the caller then
/// stores the value out of line (possibly compressed).
pub fn pack(token: &[u8]) -> Option<u64> {
    if let Some(num) = pack_int(token) {
        return Some(INLINE | num as u64);
    }
    let tl = token.len();
    if tl <= 4 {
        let mut payload = 0u64;
        for &b in token {
            payload = payload << 8 | b as u64;
        }
        return Some(INLINE | STRING | (tl as u64) << 32 | payload);
    }
    if tl < 16 {
        let mut payload = 0u64;
        for &b in token {
            let code = match b {
                b'\n' => 0,
                b'\t' => 1,
                b' ' => 2,
                b'\r' => 3,
                _ => return None,
            };
            payload = payload << 2 | code;
        }
        return Some(INLINE | STRING | COMPRESS | (tl as u64) << 32 | payload);
    }
    None
}

/// Reconstruct the original token bytes from an inline word.
pub fn unpack(word: u64) -> Vec<u8> {
    debug_assert!(word & INLINE != 0);
    if word & STRING == 0 {
        return (word as u32).to_string().into_bytes();
    }
    let len = ((word >> 32) & 0xF) as usize;
    let mut token = Vec::with_capacity(len);
    if word & COMPRESS == 0 {
        for i in 0..len {
            token.push((word >> (8 * (len - 1 - i))) as u8);
        }
    } else {
        for i in 0..len {
            token.push(WHITESPACE[(word >> (2 * (len - 1 - i)) & 3) as usize]);
        }
    }
    token
}

/// Integer payload of a plain-integer word.
pub fn unpack_long(word: u64) -> i64 {
    debug_assert!(word & STRING == 0);
    (word & 0xFFFF_FFFF) as i64
}

/// Integer payload of a plain-integer word as a double.
pub fn unpack_double(word: u64) -> f64 {
    debug_assert!(word & STRING == 0);
    (word as u32) as f64
}

/// Length in bytes of the token a word unpacks to, without materializing it.
pub fn unpack_len(word: u64) -> usize {
    if word & STRING != 0 {
        ((word >> 32) & 0xF) as usize
    } else {
        let v = word as u32;
        if v == 0 {
            1
        } else {
            (v.ilog10() + 1) as usize
        }
    }
}

/// Parse an ASCII decimal token. Rejects empty tokens, non-digits,
/// redundant leading zeros, and values above `i32::MAX`, so that the
/// decimal rendering in [`unpack`] reproduces the token byte-for-byte.
fn pack_int(token: &[u8]) -> Option<u32> {
    if token.is_empty() || token.len() > 10 {
        return None;
    }
    if token[0] == b'0' && token.len() > 1 {
        return None;
    }
    let mut value = 0u64;
    for &b in token {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + (b - b'0') as u64;
    }
    if value > i32::MAX as u64 {
        return None;
    }
    Some(value as u32)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(token: &[u8]) -> u64 {
        let word = pack(token).unwrap_or_else(|| panic!("{token:?} should inline"));
        assert_eq!(unpack(word), token);
        assert_eq!(unpack_len(word), token.len());
        word
    }

    #[test]
    fn test_integer_form() {
        for token in ["0", "7", "42", "999", "12345", "2147483647"] {
            let word = round_trip(token.as_bytes());
            assert_eq!(word & STRING, 0);
            assert_eq!(unpack_long(word), token.parse::<i64>().unwrap());
            assert_eq!(unpack_double(word), token.parse::<f64>().unwrap());
        }
    }

    #[test]
    fn test_integer_form_rejections() {
        // leading zero packs as a string, not a number
        let word = pack(b"007").unwrap();
        assert_ne!(word & STRING, 0);
        assert_eq!(unpack(word), b"007");

        // beyond i32::MAX: too long for a short string, not inlinable
        assert_eq!(pack(b"2147483648"), None);
        assert_eq!(pack(b"99999999999"), None);
    }

    #[test]
    fn test_short_string_form() {
        for token in [&b""[..], b"a", b"ab", b"xyz", b"abcd", b"1a2b", b"\x00\xFF"] {
            let word = round_trip(token);
            assert_ne!(word & STRING, 0);
            assert_eq!(word & COMPRESS, 0);
        }
    }

    #[test]
    fn test_whitespace_form() {
        let word = round_trip(b"\n\t  \r");
        assert_ne!(word & COMPRESS, 0);

        round_trip(b"     ");
        round_trip(b"\n\n\n\n\n\n\n");
        round_trip(b" \t \t \t \t \t \t \t "); // 15 bytes, the longest run
    }

    #[test]
    fn test_whitespace_rejections() {
        // 16 bytes: length field is only 4 bits
        assert_eq!(pack(b"                "), None);
        // non-whitespace byte in a 5..16 byte token
        assert_eq!(pack(b"  a  "), None);
    }

    #[test]
    fn test_mixed_token_not_inlinable() {
        assert_eq!(pack(b"a mixed content tok!"), None);
    }

    #[test]
    fn test_flag_bits_are_distinct() {
        assert_eq!(INLINE, 0x80_0000_0000);
        assert_eq!(COMPRESS, 0x40_0000_0000);
        assert_eq!(STRING, 0x20_0000_0000);
    }

    #[test]
    fn test_byte_packing_is_msb_first() {
        let word = pack(b"ab").unwrap();
        // 'a' lands above 'b' in the payload
        assert_eq!(word & 0xFFFF, u64::from(u16::from_be_bytes(*b"ab")));
        assert_eq!((word >> 32) & 0xF, 2);
    }
}
