// encodings/utf32.rs - 32-bit code units.
// One unit per character; UTF mode only adds range validation.

use crate::regenc::*;

impl CodeUnit for u32 {
    const WIDTH: Width = Width::ThirtyTwo;
    const MAX_RAW: u32 = u32::MAX;

    #[inline]
    fn to_u32(self) -> u32 {
        self
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        v
    }

    fn decode(s: &[u32], pos: usize, _utf: bool) -> (u32, usize) {
        (s[pos], 1)
    }

    fn decode_before(s: &[u32], pos: usize, _utf: bool) -> (u32, usize) {
        (s[pos - 1], 1)
    }

    fn encode(cp: u32, _utf: bool, out: &mut Vec<u32>) {
        out.push(cp);
    }

    fn char_len(_cp: u32, _utf: bool) -> usize {
        1
    }

    fn validate(s: &[u32]) -> Result<(), usize> {
        match s
            .iter()
            .position(|&c| c > MAX_UNICODE || (0xd800..=0xdfff).contains(&c))
        {
            Some(p) => Err(p),
            None => Ok(()),
        }
    }

    fn is_boundary(_s: &[u32], _pos: usize, _utf: bool) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_range() {
        assert_eq!(u32::validate(&[0x41, 0x10ffff]), Ok(()));
        assert_eq!(u32::validate(&[0x41, 0x110000]), Err(1));
        assert_eq!(u32::validate(&[0xdfff]), Err(0));
    }
}
