// regenc.rs - Code-unit abstraction.
// The `CodeUnit` trait is the width parameter of the whole engine: patterns and
// subjects are slices of `u8`, `u16` or `u32`, decoded as UTF or as raw units.

use std::fmt;

// === Constants ===
pub const MAX_UNICODE: u32 = 0x10ffff;
pub const NEWLINE_CODE: u32 = 0x0a;

/// Code-unit width selected for a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    Eight,
    Sixteen,
    ThirtyTwo,
}

impl Width {
    /// Size of one code unit in bytes.
    pub fn bytes(self) -> usize {
        match self {
            Width::Eight => 1,
            Width::Sixteen => 2,
            Width::ThirtyTwo => 4,
        }
    }

    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

// === CodeUnit Trait ===

/// One element of pattern or subject text.
///
/// Decoding never panics: in UTF mode a malformed sequence decodes as the
/// single raw unit, so matching against unchecked input stays memory safe.
pub trait CodeUnit: Copy + Eq + Ord + Default + fmt::Debug + Send + Sync + 'static {
    const WIDTH: Width;
    /// Largest character value representable without UTF.
    const MAX_RAW: u32;

    fn to_u32(self) -> u32;

    /// Truncating conversion; callers check ranges first.
    fn from_u32(v: u32) -> Self;

    /// Decode the character starting at `pos`. Returns (code point, units).
    fn decode(s: &[Self], pos: usize, utf: bool) -> (u32, usize);

    /// Decode the character that ends at `pos`.
    fn decode_before(s: &[Self], pos: usize, utf: bool) -> (u32, usize);

    /// Append the encoding of `cp` to `out`.
    fn encode(cp: u32, utf: bool, out: &mut Vec<Self>);

    /// Number of units `cp` occupies.
    fn char_len(cp: u32, utf: bool) -> usize;

    /// Check UTF validity; on failure return the offset of the bad unit.
    fn validate(s: &[Self]) -> Result<(), usize>;

    /// Is `pos` the start of a character (or the end of `s`)?
    fn is_boundary(s: &[Self], pos: usize, utf: bool) -> bool;

    /// Find `needle` in `haystack` at or after `from`.
    fn find(haystack: &[Self], needle: &[Self], from: usize) -> Option<usize> {
        naive_find(haystack, needle, from)
    }

    /// Can `cp` be expressed as a single character in this width and mode?
    fn is_representable(cp: u32, utf: bool) -> bool {
        if utf {
            cp <= MAX_UNICODE && !(0xd800..=0xdfff).contains(&cp)
        } else {
            cp <= Self::MAX_RAW
        }
    }
}

pub(crate) fn naive_find<C: PartialEq>(haystack: &[C], needle: &[C], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return if from <= haystack.len() { Some(from) } else { None };
    }
    if from >= haystack.len() || haystack.len() - from < needle.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

// === Slice helpers ===

/// Decode a whole slice into code points with their unit offsets.
pub fn decode_all<C: CodeUnit>(s: &[C], utf: bool) -> (Vec<u32>, Vec<usize>) {
    let mut cps = Vec::with_capacity(s.len());
    let mut offs = Vec::with_capacity(s.len() + 1);
    let mut pos = 0;
    while pos < s.len() {
        let (cp, len) = C::decode(s, pos, utf);
        cps.push(cp);
        offs.push(pos);
        pos += len;
    }
    offs.push(s.len());
    (cps, offs)
}

/// Encode a string into units of width `C`, always as UTF.
pub fn encode_str<C: CodeUnit>(s: &str) -> Vec<C> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        C::encode(ch as u32, true, &mut out);
    }
    out
}

/// Number of units `cp` needs in width `w` (used for encoded-size accounting).
pub fn units_for(w: Width, cp: u32, utf: bool) -> usize {
    if !utf {
        return 1;
    }
    match w {
        Width::Eight => match cp {
            0..=0x7f => 1,
            0x80..=0x7ff => 2,
            0x800..=0xffff => 3,
            _ => 4,
        },
        Width::Sixteen => {
            if cp > 0xffff {
                2
            } else {
                1
            }
        }
        Width::ThirtyTwo => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_find_basics() {
        assert_eq!(naive_find(&[1u16, 2, 3, 2, 3], &[2, 3], 0), Some(1));
        assert_eq!(naive_find(&[1u16, 2, 3, 2, 3], &[2, 3], 2), Some(3));
        assert_eq!(naive_find(&[1u16, 2, 3], &[4], 0), None);
        assert_eq!(naive_find::<u16>(&[1, 2], &[], 2), Some(2));
    }

    #[test]
    fn decode_all_offsets() {
        let (cps, offs) = decode_all("aé€".as_bytes(), true);
        assert_eq!(cps, vec!['a' as u32, 'é' as u32, '€' as u32]);
        assert_eq!(offs, vec![0, 1, 3, 6]);
    }

    #[test]
    fn unit_counts() {
        assert_eq!(units_for(Width::Eight, 0x20ac, true), 3);
        assert_eq!(units_for(Width::Sixteen, 0x1f600, true), 2);
        assert_eq!(units_for(Width::ThirtyTwo, 0x1f600, true), 1);
        assert_eq!(units_for(Width::Eight, 0xff, false), 1);
    }
}
