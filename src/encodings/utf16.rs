// encodings/utf16.rs - 16-bit code units.
// Raw units (0..=0xffff) or UTF-16 with surrogate pairs.

use crate::regenc::*;

#[inline]
fn is_high(u: u16) -> bool {
    (0xd800..=0xdbff).contains(&u)
}

#[inline]
fn is_low(u: u16) -> bool {
    (0xdc00..=0xdfff).contains(&u)
}

impl CodeUnit for u16 {
    const WIDTH: Width = Width::Sixteen;
    const MAX_RAW: u32 = 0xffff;

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        v as u16
    }

    fn decode(s: &[u16], pos: usize, utf: bool) -> (u32, usize) {
        let c = s[pos];
        if utf && is_high(c) && pos + 1 < s.len() && is_low(s[pos + 1]) {
            let cp = 0x10000 + (((c as u32) & 0x3ff) << 10) + ((s[pos + 1] as u32) & 0x3ff);
            return (cp, 2);
        }
        (c as u32, 1)
    }

    fn decode_before(s: &[u16], pos: usize, utf: bool) -> (u32, usize) {
        let c = s[pos - 1];
        if utf && is_low(c) && pos >= 2 && is_high(s[pos - 2]) {
            return Self::decode(s, pos - 2, true);
        }
        (c as u32, 1)
    }

    fn encode(cp: u32, utf: bool, out: &mut Vec<u16>) {
        if utf && cp > 0xffff {
            let v = cp - 0x10000;
            out.push(0xd800 | (v >> 10) as u16);
            out.push(0xdc00 | (v & 0x3ff) as u16);
        } else {
            out.push(cp as u16);
        }
    }

    fn char_len(cp: u32, utf: bool) -> usize {
        units_for(Width::Sixteen, cp, utf)
    }

    fn validate(s: &[u16]) -> Result<(), usize> {
        let mut p = 0;
        while p < s.len() {
            let c = s[p];
            if is_high(c) {
                if p + 1 >= s.len() || !is_low(s[p + 1]) {
                    return Err(p);
                }
                p += 2;
            } else if is_low(c) {
                return Err(p);
            } else {
                p += 1;
            }
        }
        Ok(())
    }

    fn is_boundary(s: &[u16], pos: usize, utf: bool) -> bool {
        !utf || pos == 0 || pos >= s.len() || !(is_low(s[pos]) && is_high(s[pos - 1]))
    }
}
