// encodings/utf8.rs - 8-bit code units.
// Raw bytes (Latin-1 values) or UTF-8 (RFC 3629 range: U+0000 - U+10FFFF).

use crate::regenc::*;

// === UTF-8 Helpers ===

#[inline]
fn utf8_islead(c: u8) -> bool {
    (c & 0xc0) != 0x80
}

#[inline]
fn utf8_istail(c: u8) -> bool {
    (c & 0xc0) == 0x80
}

// === EncLen_UTF8 Table ===
// Maps first byte to sequence length (RFC 3629: max 4 bytes).

static ENC_LEN_UTF8: [u8; 256] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

/// Length of a well-formed sequence starting at `pos`, or `None`.
fn sequence_len(s: &[u8], pos: usize) -> Option<usize> {
    let lead = s[pos];
    let len = ENC_LEN_UTF8[lead as usize] as usize;
    if len == 1 {
        return if lead < 0x80 { Some(1) } else { None };
    }
    if pos + len > s.len() {
        return None;
    }
    if !s[pos + 1..pos + len].iter().all(|&b| utf8_istail(b)) {
        return None;
    }
    // Overlong forms, surrogates and values above U+10FFFF.
    let second = s[pos + 1];
    let ok = match lead {
        0xe0 => second >= 0xa0,
        0xed => second < 0xa0,
        0xf0 => second >= 0x90,
        0xf4 => second < 0x90,
        _ => true,
    };
    if ok {
        Some(len)
    } else {
        None
    }
}

impl CodeUnit for u8 {
    const WIDTH: Width = Width::Eight;
    const MAX_RAW: u32 = 0xff;

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        v as u8
    }

    fn decode(s: &[u8], pos: usize, utf: bool) -> (u32, usize) {
        let c = s[pos];
        if !utf || c < 0x80 {
            return (c as u32, 1);
        }
        match sequence_len(s, pos) {
            Some(len) => {
                let mut n = (c as u32) & ((1u32 << (7 - len)) - 1);
                for &b in &s[pos + 1..pos + len] {
                    n = (n << 6) | (b as u32 & 0x3f);
                }
                (n, len)
            }
            None => (c as u32, 1),
        }
    }

    fn decode_before(s: &[u8], pos: usize, utf: bool) -> (u32, usize) {
        if !utf || s[pos - 1] < 0x80 {
            return (s[pos - 1] as u32, 1);
        }
        let floor = pos.saturating_sub(4);
        let mut p = pos - 1;
        while p > floor && !utf8_islead(s[p]) {
            p -= 1;
        }
        let (cp, len) = Self::decode(s, p, true);
        if p + len == pos {
            (cp, len)
        } else {
            (s[pos - 1] as u32, 1)
        }
    }

    fn encode(cp: u32, utf: bool, out: &mut Vec<u8>) {
        if !utf || cp < 0x80 {
            out.push(cp as u8);
        } else if cp < 0x800 {
            out.push(((cp >> 6) & 0x1f) as u8 | 0xc0);
            out.push((cp & 0x3f) as u8 | 0x80);
        } else if cp < 0x10000 {
            out.push(((cp >> 12) & 0x0f) as u8 | 0xe0);
            out.push(((cp >> 6) & 0x3f) as u8 | 0x80);
            out.push((cp & 0x3f) as u8 | 0x80);
        } else {
            out.push(((cp >> 18) & 0x07) as u8 | 0xf0);
            out.push(((cp >> 12) & 0x3f) as u8 | 0x80);
            out.push(((cp >> 6) & 0x3f) as u8 | 0x80);
            out.push((cp & 0x3f) as u8 | 0x80);
        }
    }

    fn char_len(cp: u32, utf: bool) -> usize {
        units_for(Width::Eight, cp, utf)
    }

    fn validate(s: &[u8]) -> Result<(), usize> {
        let mut p = 0;
        while p < s.len() {
            match sequence_len(s, p) {
                Some(len) => p += len,
                None => return Err(p),
            }
        }
        Ok(())
    }

    fn is_boundary(s: &[u8], pos: usize, utf: bool) -> bool {
        !utf || pos >= s.len() || utf8_islead(s[pos])
    }

    fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
        if from > haystack.len() {
            return None;
        }
        match needle.len() {
            0 => Some(from),
            1 => memchr::memchr(needle[0], &haystack[from..]).map(|i| i + from),
            _ => memchr::memmem::find(&haystack[from..], needle).map(|i| i + from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_multibyte() {
        let s = "a\u{e9}\u{20ac}\u{1f600}".as_bytes();
        assert_eq!(u8::decode(s, 0, true), (0x61, 1));
        assert_eq!(u8::decode(s, 1, true), (0xe9, 2));
        assert_eq!(u8::decode(s, 3, true), (0x20ac, 3));
        assert_eq!(u8::decode(s, 6, true), (0x1f600, 4));
        assert_eq!(u8::decode_before(s, 10, true), (0x1f600, 4));
        assert_eq!(u8::decode_before(s, 3, true), (0xe9, 2));
    }

    #[test]
    fn raw_mode_is_bytewise() {
        let s = "\u{e9}".as_bytes();
        assert_eq!(u8::decode(s, 0, false), (0xc3, 1));
        assert_eq!(u8::decode_before(s, 2, false), (0xa9, 1));
    }

    #[test]
    fn validation_offsets() {
        assert_eq!(u8::validate("h\u{e9}llo".as_bytes()), Ok(()));
        assert_eq!(u8::validate(b"ab\xffcd"), Err(2));
        assert_eq!(u8::validate(b"ab\xe2\x82"), Err(2));
        // overlong encoding of '/'
        assert_eq!(u8::validate(b"\xc0\xaf"), Err(0));
        // surrogate
        assert_eq!(u8::validate(b"\xed\xa0\x80"), Err(0));
    }

    #[test]
    fn malformed_decodes_as_raw() {
        assert_eq!(u8::decode(b"\xff", 0, true), (0xff, 1));
        assert_eq!(u8::decode(b"\xe2\x82", 0, true), (0xe2, 1));
    }

    #[test]
    fn encode_round() {
        let mut out = Vec::new();
        u8::encode(0x20ac, true, &mut out);
        assert_eq!(out, "\u{20ac}".as_bytes());
    }

    #[test]
    fn memchr_find() {
        assert_eq!(u8::find(b"hello world", b"o", 5), Some(7));
        assert_eq!(u8::find(b"hello world", b"wor", 0), Some(6));
        assert_eq!(u8::find(b"hello", b"xyz", 0), None);
    }
}
