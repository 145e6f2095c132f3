// unicode/tables.rs - Compact code point range tables.
//
// The general-category and script data here covers the blocks in common use;
// it is not a complete UCD import. Letters, numbers and white space come from
// the standard library's character predicates, and these tables refine them.

use super::Script;

pub type Range = (u32, u32);

/// Linear membership test; tables are small and unordered.
pub fn in_ranges(table: &[Range], cp: u32) -> bool {
    table.iter().any(|&(lo, hi)| lo <= cp && cp <= hi)
}

// === Latin-1 Ctype Table ===
// Bit layout: 0 NEWLINE, 1 ALPHA, 2 BLANK, 3 CNTRL, 4 DIGIT, 5 GRAPH,
// 6 LOWER, 7 PRINT, 8 PUNCT, 9 SPACE, 10 UPPER, 11 XDIGIT, 12 WORD,
// 13 ALNUM, 14 ASCII.

pub const CTYPE_ALPHA: u16 = 1 << 1;
pub const CTYPE_BLANK: u16 = 1 << 2;
pub const CTYPE_CNTRL: u16 = 1 << 3;
pub const CTYPE_DIGIT: u16 = 1 << 4;
pub const CTYPE_GRAPH: u16 = 1 << 5;
pub const CTYPE_LOWER: u16 = 1 << 6;
pub const CTYPE_PRINT: u16 = 1 << 7;
pub const CTYPE_PUNCT: u16 = 1 << 8;
pub const CTYPE_SPACE: u16 = 1 << 9;
pub const CTYPE_UPPER: u16 = 1 << 10;
pub const CTYPE_XDIGIT: u16 = 1 << 11;
pub const CTYPE_WORD: u16 = 1 << 12;
pub const CTYPE_ALNUM: u16 = 1 << 13;
pub const CTYPE_ASCII: u16 = 1 << 14;

pub static ASCII_CTYPE_TABLE: [u16; 128] = [
    0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008,
    0x4008, 0x428c, 0x4289, 0x4288, 0x4288, 0x4288, 0x4008, 0x4008,
    0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008,
    0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008, 0x4008,
    0x4284, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0,
    0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0,
    0x78b0, 0x78b0, 0x78b0, 0x78b0, 0x78b0, 0x78b0, 0x78b0, 0x78b0,
    0x78b0, 0x78b0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x41a0,
    0x41a0, 0x7ca2, 0x7ca2, 0x7ca2, 0x7ca2, 0x7ca2, 0x7ca2, 0x74a2,
    0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2,
    0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2, 0x74a2,
    0x74a2, 0x74a2, 0x74a2, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x51a0,
    0x41a0, 0x78e2, 0x78e2, 0x78e2, 0x78e2, 0x78e2, 0x78e2, 0x70e2,
    0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2,
    0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2, 0x70e2,
    0x70e2, 0x70e2, 0x70e2, 0x41a0, 0x41a0, 0x41a0, 0x41a0, 0x4008,
];

// === Decimal digits ===
// First code point of each run of ten Nd characters.

pub static DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06f0, 0x07c0, 0x0966, 0x09e6, 0x0a66, 0x0ae6, 0x0b66, 0x0be6, 0x0c66,
    0x0ce6, 0x0d66, 0x0de6, 0x0e50, 0x0ed0, 0x0f20, 0x1040, 0x1090, 0x17e0, 0x1810, 0x1946,
    0x19d0, 0x1a80, 0x1a90, 0x1b50, 0x1bb0, 0x1c40, 0x1c50, 0xa620, 0xa8d0, 0xa900, 0xa9d0,
    0xa9f0, 0xaa50, 0xabf0, 0xff10, 0x104a0, 0x10d30, 0x11066, 0x110f0, 0x11136, 0x111d0,
    0x112f0, 0x11450, 0x114d0, 0x11650, 0x116c0, 0x11730, 0x118e0, 0x11950, 0x11c50, 0x11d50,
    0x11da0, 0x11f50, 0x16a60, 0x16ac0, 0x16b50, 0x1d7ce, 0x1d7d8, 0x1d7e2, 0x1d7ec, 0x1d7f6,
    0x1e140, 0x1e2f0, 0x1e4f0, 0x1e950, 0x1fbf0,
];

pub static NL: &[Range] = &[
    (0x16ee, 0x16f0), (0x2160, 0x2182), (0x2185, 0x2188), (0x3007, 0x3007),
    (0x3021, 0x3029), (0x3038, 0x303a), (0xa6e6, 0xa6ef), (0x10140, 0x10174),
    (0x10341, 0x10341), (0x1034a, 0x1034a), (0x103d1, 0x103d5), (0x12400, 0x1246e),
];

// === Letters ===

pub static LT: &[Range] = &[
    (0x01c5, 0x01c5), (0x01c8, 0x01c8), (0x01cb, 0x01cb), (0x01f2, 0x01f2),
    (0x1f88, 0x1f8f), (0x1f98, 0x1f9f), (0x1fa8, 0x1faf), (0x1fbc, 0x1fbc),
    (0x1fcc, 0x1fcc), (0x1ffc, 0x1ffc),
];

pub static LM: &[Range] = &[
    (0x02b0, 0x02c1), (0x02c6, 0x02d1), (0x02e0, 0x02e4), (0x02ec, 0x02ec),
    (0x02ee, 0x02ee), (0x0374, 0x0374), (0x037a, 0x037a), (0x0559, 0x0559),
    (0x0640, 0x0640), (0x06e5, 0x06e6), (0x07f4, 0x07f5), (0x0e46, 0x0e46),
    (0x0ec6, 0x0ec6), (0x1d2c, 0x1d6a), (0x1d78, 0x1d78), (0x1d9b, 0x1dbf),
    (0x2071, 0x2071), (0x207f, 0x207f), (0x2090, 0x209c), (0x2c7c, 0x2c7d),
    (0x2d6f, 0x2d6f), (0x3005, 0x3005), (0x3031, 0x3035), (0x303b, 0x303b),
    (0x309d, 0x309e), (0x30fc, 0x30fe), (0xa015, 0xa015), (0xa4f8, 0xa4fd),
    (0xa60c, 0xa60c), (0xa67f, 0xa67f), (0xa69c, 0xa69d), (0xa717, 0xa71f),
    (0xa770, 0xa770), (0xa788, 0xa788), (0xa7f8, 0xa7f9), (0xff70, 0xff70),
    (0xff9e, 0xff9f),
];

// === Marks ===

pub static MN: &[Range] = &[
    (0x0300, 0x036f), (0x0483, 0x0487), (0x0591, 0x05bd), (0x05bf, 0x05bf),
    (0x05c1, 0x05c2), (0x05c4, 0x05c5), (0x05c7, 0x05c7), (0x0610, 0x061a),
    (0x064b, 0x065f), (0x0670, 0x0670), (0x06d6, 0x06dc), (0x06df, 0x06e4),
    (0x06e7, 0x06e8), (0x06ea, 0x06ed), (0x0711, 0x0711), (0x0730, 0x074a),
    (0x07a6, 0x07b0), (0x07eb, 0x07f3), (0x0816, 0x0819), (0x081b, 0x0823),
    (0x0825, 0x0827), (0x0829, 0x082d), (0x0859, 0x085b), (0x0898, 0x089f),
    (0x08ca, 0x08e1), (0x08e3, 0x0902), (0x093a, 0x093a), (0x093c, 0x093c),
    (0x0941, 0x0948), (0x094d, 0x094d), (0x0951, 0x0957), (0x0962, 0x0963),
    (0x0981, 0x0981), (0x09bc, 0x09bc), (0x09c1, 0x09c4), (0x09cd, 0x09cd),
    (0x09e2, 0x09e3), (0x0a01, 0x0a02), (0x0a3c, 0x0a3c), (0x0a41, 0x0a42),
    (0x0a47, 0x0a48), (0x0a4b, 0x0a4d), (0x0a70, 0x0a71), (0x0a81, 0x0a82),
    (0x0abc, 0x0abc), (0x0ac1, 0x0ac5), (0x0ac7, 0x0ac8), (0x0acd, 0x0acd),
    (0x0b01, 0x0b01), (0x0b3c, 0x0b3c), (0x0b3f, 0x0b3f), (0x0b41, 0x0b44),
    (0x0b4d, 0x0b4d), (0x0b82, 0x0b82), (0x0bc0, 0x0bc0), (0x0bcd, 0x0bcd),
    (0x0c00, 0x0c00), (0x0c3e, 0x0c40), (0x0c46, 0x0c48), (0x0c4a, 0x0c4d),
    (0x0cbc, 0x0cbc), (0x0ccc, 0x0ccd), (0x0d00, 0x0d01), (0x0d41, 0x0d44),
    (0x0d4d, 0x0d4d), (0x0dca, 0x0dca), (0x0dd2, 0x0dd4), (0x0e31, 0x0e31),
    (0x0e34, 0x0e3a), (0x0e47, 0x0e4e), (0x0eb1, 0x0eb1), (0x0eb4, 0x0ebc),
    (0x0ec8, 0x0ece), (0x0f18, 0x0f19), (0x0f35, 0x0f35), (0x0f37, 0x0f37),
    (0x0f39, 0x0f39), (0x0f71, 0x0f7e), (0x0f80, 0x0f84), (0x0f86, 0x0f87),
    (0x0f8d, 0x0fbc), (0x102d, 0x1030), (0x1032, 0x1037), (0x1039, 0x103a),
    (0x1712, 0x1714), (0x17b4, 0x17b5), (0x17b7, 0x17bd), (0x17c6, 0x17c6),
    (0x17c9, 0x17d3), (0x17dd, 0x17dd), (0x180b, 0x180d), (0x18a9, 0x18a9),
    (0x1ab0, 0x1abd), (0x1abf, 0x1ace), (0x1dc0, 0x1dff), (0x20d0, 0x20dc),
    (0x20e1, 0x20e1), (0x20e5, 0x20f0), (0x2cef, 0x2cf1), (0x2de0, 0x2dff),
    (0x302a, 0x302d), (0x3099, 0x309a), (0xa66f, 0xa66f), (0xa674, 0xa67d),
    (0xa69e, 0xa69f), (0xa6f0, 0xa6f1), (0xa802, 0xa802), (0xa806, 0xa806),
    (0xa80b, 0xa80b), (0xa825, 0xa826), (0xfb1e, 0xfb1e), (0xfe00, 0xfe0f),
    (0xfe20, 0xfe2f), (0x101fd, 0x101fd), (0x1d167, 0x1d169), (0x1d17b, 0x1d182),
    (0xe0100, 0xe01ef),
];

pub static MC: &[Range] = &[
    (0x0903, 0x0903), (0x093b, 0x093b), (0x093e, 0x0940), (0x0949, 0x094c),
    (0x094e, 0x094f), (0x0982, 0x0983), (0x09be, 0x09c0), (0x09c7, 0x09c8),
    (0x09cb, 0x09cc), (0x09d7, 0x09d7), (0x0a03, 0x0a03), (0x0a3e, 0x0a40),
    (0x0a83, 0x0a83), (0x0abe, 0x0ac0), (0x0ac9, 0x0ac9), (0x0acb, 0x0acc),
    (0x0b02, 0x0b03), (0x0b3e, 0x0b3e), (0x0b40, 0x0b40), (0x0b47, 0x0b48),
    (0x0b4b, 0x0b4c), (0x0b57, 0x0b57), (0x0bbe, 0x0bbf), (0x0bc1, 0x0bc2),
    (0x0bc6, 0x0bc8), (0x0bca, 0x0bcc), (0x0bd7, 0x0bd7), (0x0c01, 0x0c03),
    (0x0c41, 0x0c44), (0x0c82, 0x0c83), (0x0cbe, 0x0cbe), (0x0cc0, 0x0cc4),
    (0x0cc7, 0x0cc8), (0x0cca, 0x0ccb), (0x0cd5, 0x0cd6), (0x0d02, 0x0d03),
    (0x0d3e, 0x0d40), (0x0d46, 0x0d48), (0x0d4a, 0x0d4c), (0x0d57, 0x0d57),
    (0x0d82, 0x0d83), (0x0dcf, 0x0dd1), (0x0dd8, 0x0ddf), (0x0df2, 0x0df3),
    (0x0f3e, 0x0f3f), (0x0f7f, 0x0f7f), (0x102b, 0x102c), (0x1031, 0x1031),
    (0x1038, 0x1038), (0x103b, 0x103c), (0x17b6, 0x17b6), (0x17be, 0x17c5),
    (0x17c7, 0x17c8), (0x302e, 0x302f), (0xa823, 0xa824), (0xa827, 0xa827),
    (0x1d165, 0x1d166), (0x1d16d, 0x1d172),
];

pub static ME: &[Range] = &[
    (0x0488, 0x0489), (0x1abe, 0x1abe), (0x20dd, 0x20e0), (0x20e2, 0x20e4),
    (0xa670, 0xa672),
];

// === Other ===

pub static CF: &[Range] = &[
    (0x00ad, 0x00ad), (0x0600, 0x0605), (0x061c, 0x061c), (0x06dd, 0x06dd),
    (0x070f, 0x070f), (0x0890, 0x0891), (0x08e2, 0x08e2), (0x180e, 0x180e),
    (0x200b, 0x200f), (0x202a, 0x202e), (0x2060, 0x2064), (0x2066, 0x206f),
    (0xfeff, 0xfeff), (0xfff9, 0xfffb), (0x110bd, 0x110bd), (0x1bca0, 0x1bca3),
    (0x1d173, 0x1d17a), (0xe0001, 0xe0001), (0xe0020, 0xe007f),
];

pub static CO: &[Range] = &[(0xe000, 0xf8ff), (0xf0000, 0xffffd), (0x100000, 0x10fffd)];

// === Symbols ===

pub static SC: &[Range] = &[
    (0x0024, 0x0024), (0x00a2, 0x00a5), (0x058f, 0x058f), (0x060b, 0x060b),
    (0x07fe, 0x07ff), (0x09f2, 0x09f3), (0x09fb, 0x09fb), (0x0af1, 0x0af1),
    (0x0bf9, 0x0bf9), (0x0e3f, 0x0e3f), (0x17db, 0x17db), (0x20a0, 0x20c0),
    (0xa838, 0xa838), (0xfdfc, 0xfdfc), (0xfe69, 0xfe69), (0xff04, 0xff04),
    (0xffe0, 0xffe1), (0xffe5, 0xffe6), (0x11fdd, 0x11fe0), (0x1e2ff, 0x1e2ff),
    (0x1ecb0, 0x1ecb0),
];

pub static SM: &[Range] = &[
    (0x002b, 0x002b), (0x003c, 0x003e), (0x007c, 0x007c), (0x007e, 0x007e),
    (0x00ac, 0x00ac), (0x00b1, 0x00b1), (0x00d7, 0x00d7), (0x00f7, 0x00f7),
    (0x03f6, 0x03f6), (0x0606, 0x0608), (0x2044, 0x2044), (0x2052, 0x2052),
    (0x207a, 0x207c), (0x208a, 0x208c), (0x2118, 0x2118), (0x2140, 0x2144),
    (0x214b, 0x214b), (0x2190, 0x2194), (0x219a, 0x219b), (0x21a0, 0x21a0),
    (0x21a3, 0x21a3), (0x21a6, 0x21a6), (0x21ae, 0x21ae), (0x21ce, 0x21cf),
    (0x21d2, 0x21d2), (0x21d4, 0x21d4), (0x21f4, 0x22ff), (0x2320, 0x2321),
    (0x237c, 0x237c), (0x239b, 0x23b3), (0x23dc, 0x23e1), (0x25b7, 0x25b7),
    (0x25c1, 0x25c1), (0x25f8, 0x25ff), (0x266f, 0x266f), (0x27c0, 0x27c4),
    (0x27c7, 0x27e5), (0x27f0, 0x27ff), (0x2900, 0x2982), (0x2999, 0x29d7),
    (0x29dc, 0x29fb), (0x29fe, 0x2aff), (0x2b30, 0x2b44), (0x2b47, 0x2b4c),
    (0xfb29, 0xfb29), (0xfe62, 0xfe62), (0xfe64, 0xfe66), (0xff0b, 0xff0b),
    (0xff1c, 0xff1e), (0xff5c, 0xff5c), (0xff5e, 0xff5e), (0xffe2, 0xffe2),
    (0xffe9, 0xffec), (0x1d6c1, 0x1d6c1), (0x1d6db, 0x1d6db), (0x1d6fb, 0x1d6fb),
    (0x1d715, 0x1d715), (0x1d735, 0x1d735), (0x1d74f, 0x1d74f), (0x1d76f, 0x1d76f),
    (0x1d789, 0x1d789), (0x1d7a9, 0x1d7a9), (0x1d7c3, 0x1d7c3), (0x1eef0, 0x1eef1),
];

pub static SK: &[Range] = &[
    (0x005e, 0x005e), (0x0060, 0x0060), (0x00a8, 0x00a8), (0x00af, 0x00af),
    (0x00b4, 0x00b4), (0x00b8, 0x00b8), (0x02c2, 0x02c5), (0x02d2, 0x02df),
    (0x02e5, 0x02eb), (0x02ed, 0x02ed), (0x02ef, 0x02ff), (0x0375, 0x0375),
    (0x0384, 0x0385), (0x0888, 0x0888), (0x1fbd, 0x1fbd), (0x1fbf, 0x1fc1),
    (0x1fcd, 0x1fcf), (0x1fdd, 0x1fdf), (0x1fed, 0x1fef), (0x1ffd, 0x1ffe),
    (0x309b, 0x309c), (0xa700, 0xa716), (0xa720, 0xa721), (0xa789, 0xa78a),
    (0xab5b, 0xab5b), (0xab6a, 0xab6b), (0xfbb2, 0xfbc2), (0xff3e, 0xff3e),
    (0xff40, 0xff40), (0xffe3, 0xffe3), (0x1f3fb, 0x1f3ff),
];

// === Punctuation ===

pub static PD: &[Range] = &[
    (0x002d, 0x002d), (0x058a, 0x058a), (0x05be, 0x05be), (0x1400, 0x1400),
    (0x1806, 0x1806), (0x2010, 0x2015), (0x2e17, 0x2e17), (0x2e1a, 0x2e1a),
    (0x2e3a, 0x2e3b), (0x2e40, 0x2e40), (0x2e5d, 0x2e5d), (0x301c, 0x301c),
    (0x3030, 0x3030), (0x30a0, 0x30a0), (0xfe31, 0xfe32), (0xfe58, 0xfe58),
    (0xfe63, 0xfe63), (0xff0d, 0xff0d), (0x10ead, 0x10ead),
];

/// Runs of alternating open/close brackets, starting with an opener.
pub static BRACKET_PAIRS: &[Range] = &[
    (0x2768, 0x2775), (0x27e6, 0x27ef), (0x2983, 0x2998), (0x2e22, 0x2e29),
    (0x3008, 0x3011), (0x3014, 0x301b), (0xfe35, 0xfe44), (0xfe59, 0xfe5e),
];

pub static PS: &[u32] = &[
    0x0028, 0x005b, 0x007b, 0x0f3a, 0x0f3c, 0x169b, 0x201a, 0x201e, 0x2045, 0x207d, 0x208d,
    0x2308, 0x230a, 0x2329, 0x27c5, 0x29d8, 0x29da, 0x29fc, 0x301d, 0xfd3f, 0xfe17, 0xfe47,
    0xff08, 0xff3b, 0xff5b, 0xff5f, 0xff62,
];

pub static PE: &[u32] = &[
    0x0029, 0x005d, 0x007d, 0x0f3b, 0x0f3d, 0x169c, 0x2046, 0x207e, 0x208e, 0x2309, 0x230b,
    0x232a, 0x27c6, 0x29d9, 0x29db, 0x29fd, 0x301e, 0x301f, 0xfd3e, 0xfe18, 0xfe48, 0xff09,
    0xff3d, 0xff5d, 0xff60, 0xff63,
];

pub static PI: &[u32] = &[
    0x00ab, 0x2018, 0x201b, 0x201c, 0x201f, 0x2039, 0x2e02, 0x2e04, 0x2e09, 0x2e0c, 0x2e1c,
    0x2e20,
];

pub static PF: &[u32] = &[
    0x00bb, 0x2019, 0x201d, 0x203a, 0x2e03, 0x2e05, 0x2e0a, 0x2e0d, 0x2e1d, 0x2e21,
];

pub static PC: &[Range] = &[
    (0x005f, 0x005f), (0x203f, 0x2040), (0x2054, 0x2054), (0xfe33, 0xfe34),
    (0xfe4d, 0xfe4f), (0xff3f, 0xff3f),
];

pub static PO: &[Range] = &[
    (0x0021, 0x0023), (0x0025, 0x0027), (0x002a, 0x002a), (0x002c, 0x002c),
    (0x002e, 0x002f), (0x003a, 0x003b), (0x003f, 0x0040), (0x005c, 0x005c),
    (0x00a1, 0x00a1), (0x00a7, 0x00a7), (0x00b6, 0x00b7), (0x00bf, 0x00bf),
    (0x037e, 0x037e), (0x0387, 0x0387), (0x055a, 0x055f), (0x0589, 0x0589),
    (0x05c0, 0x05c0), (0x05c3, 0x05c3), (0x05c6, 0x05c6), (0x05f3, 0x05f4),
    (0x0609, 0x060a), (0x060c, 0x060d), (0x061b, 0x061b), (0x061d, 0x061f),
    (0x066a, 0x066d), (0x06d4, 0x06d4), (0x0964, 0x0965), (0x0970, 0x0970),
    (0x0e4f, 0x0e4f), (0x0e5a, 0x0e5b), (0x10fb, 0x10fb), (0x166e, 0x166e),
    (0x1800, 0x1805), (0x1807, 0x180a), (0x2016, 0x2017), (0x2020, 0x2027),
    (0x2030, 0x2038), (0x203b, 0x203e), (0x2041, 0x2043), (0x2047, 0x2051),
    (0x2053, 0x2053), (0x2055, 0x205e), (0x2e00, 0x2e01), (0x2e06, 0x2e08),
    (0x2e0b, 0x2e0b), (0x2e0e, 0x2e16), (0x3001, 0x3003), (0x303d, 0x303d),
    (0x30fb, 0x30fb), (0xfe10, 0xfe16), (0xfe19, 0xfe19), (0xfe30, 0xfe30),
    (0xfe45, 0xfe46), (0xfe49, 0xfe4c), (0xfe50, 0xfe57), (0xfe5f, 0xfe61),
    (0xfe68, 0xfe68), (0xfe6a, 0xfe6b), (0xff01, 0xff03), (0xff05, 0xff07),
    (0xff0a, 0xff0a), (0xff0c, 0xff0c), (0xff0e, 0xff0f), (0xff1a, 0xff1b),
    (0xff1f, 0xff20), (0xff3c, 0xff3c), (0xff61, 0xff61), (0xff64, 0xff65),
];

// === Unassigned ===

/// Gaps inside the blocks covered above, plus the unallocated planes.
/// Consulted only after the letter, number, mark and space checks.
pub static UNASSIGNED: &[Range] = &[
    (0x0378, 0x0379), (0x0380, 0x0383), (0x038b, 0x038b), (0x038d, 0x038d),
    (0x03a2, 0x03a2), (0x0530, 0x0530), (0x0557, 0x0558), (0x058b, 0x058c),
    (0x0590, 0x0590), (0x05c8, 0x05cf), (0x05eb, 0x05ee), (0x05f5, 0x05ff),
    (0x070e, 0x070e), (0x074b, 0x074c), (0x07b2, 0x07bf), (0x07fb, 0x07fc),
    (0x082e, 0x082f), (0x083f, 0x083f), (0x085c, 0x085d), (0x085f, 0x085f),
    (0x086b, 0x086f), (0x0e3b, 0x0e3e), (0x0e5c, 0x0e80), (0x10c6, 0x10c6),
    (0x10c8, 0x10cc), (0x10ce, 0x10cf), (0x2065, 0x2065), (0x2072, 0x2073),
    (0x208f, 0x208f), (0x209d, 0x209f), (0x20c1, 0x20cf), (0x20f1, 0x20ff),
    (0x218c, 0x218f), (0x2427, 0x243f), (0x244b, 0x245f), (0x2b74, 0x2b75),
    (0x2b96, 0x2b96), (0x2e5e, 0x2e7f), (0x2e9a, 0x2e9a), (0x2ef4, 0x2eff),
    (0x2fd6, 0x2fef), (0x3040, 0x3040), (0x3097, 0x3098), (0x3100, 0x3104),
    (0x3130, 0x3130), (0x318f, 0x318f), (0xa48d, 0xa48f), (0xa4c7, 0xa4cf),
    (0xd7a4, 0xd7af), (0xd7c7, 0xd7ca), (0xd7fc, 0xd7ff), (0xfa6e, 0xfa6f),
    (0xfada, 0xfaff), (0xfb07, 0xfb12), (0xfb18, 0xfb1c), (0xfe1a, 0xfe1f),
    (0xfe53, 0xfe53), (0xfe67, 0xfe67), (0xfe6c, 0xfe6f), (0xfe75, 0xfe75),
    (0xfefd, 0xfefe), (0xff00, 0xff00), (0xffbf, 0xffc1), (0xffef, 0xfff8),
    (0x2fa1e, 0x2fffd), (0x323b0, 0x3fffd), (0x40000, 0xdfffd), (0xe0000, 0xe0000),
    (0xe0002, 0xe001f), (0xe0080, 0xe00ff), (0xe01f0, 0xefffd),
];

// === Grapheme breaks ===

pub static PREPEND: &[Range] = &[
    (0x0600, 0x0605), (0x06dd, 0x06dd), (0x070f, 0x070f), (0x0890, 0x0891),
    (0x08e2, 0x08e2), (0x0d4e, 0x0d4e), (0x110bd, 0x110bd), (0x110cd, 0x110cd),
    (0x111c2, 0x111c3), (0x1193f, 0x1193f), (0x11941, 0x11941), (0x11a3a, 0x11a3a),
    (0x11a84, 0x11a89), (0x11d46, 0x11d46), (0x11f02, 0x11f02),
];

// === White space ===

pub static HSPACE: &[u32] = &[
    0x09, 0x20, 0xa0, 0x1680, 0x180e, 0x2000, 0x2001, 0x2002, 0x2003, 0x2004, 0x2005, 0x2006,
    0x2007, 0x2008, 0x2009, 0x200a, 0x202f, 0x205f, 0x3000,
];

pub static VSPACE: &[u32] = &[0x0a, 0x0b, 0x0c, 0x0d, 0x85, 0x2028, 0x2029];

// === Case folding exceptions ===

/// Characters that share a fold with a more common character.
pub static EXTRA_CASE: &[(u32, u32)] = &[
    (0x006b, 0x212a), // k, KELVIN SIGN
    (0x0073, 0x017f), // s, LONG S
    (0x00e5, 0x212b), // a-ring, ANGSTROM SIGN
    (0x03c9, 0x2126), // omega, OHM SIGN
    (0x03bc, 0x00b5), // mu, MICRO SIGN
    (0x00df, 0x1e9e), // sharp s, CAPITAL SHARP S
    (0x03b8, 0x03d1), // theta, theta symbol
    (0x03b2, 0x03d0), // beta, beta symbol
    (0x03c0, 0x03d6), // pi, pi symbol
    (0x03c3, 0x03c2), // sigma, final sigma
    (0x03ba, 0x03f0), // kappa, kappa symbol
    (0x03c1, 0x03f1), // rho, rho symbol
    (0x03b5, 0x03f5), // epsilon, lunate epsilon
    (0x1e61, 0x1e9b), // s with dot above, long s with dot above
];

// === Scripts ===
// Inherited ranges come first: the first matching range wins.

pub static SCRIPTS: &[(u32, u32, Script)] = &[
    (0x0300, 0x036f, Script::Inherited),
    (0x0485, 0x0486, Script::Inherited),
    (0x064b, 0x0655, Script::Inherited),
    (0x0670, 0x0670, Script::Inherited),
    (0x1ab0, 0x1ace, Script::Inherited),
    (0x1dc0, 0x1dff, Script::Inherited),
    (0x200c, 0x200d, Script::Inherited),
    (0x20d0, 0x20f0, Script::Inherited),
    (0x302a, 0x302d, Script::Inherited),
    (0x3099, 0x309a, Script::Inherited),
    (0xfe00, 0xfe0f, Script::Inherited),
    (0xfe20, 0xfe2d, Script::Inherited),
    (0xe0100, 0xe01ef, Script::Inherited),
    (0x0041, 0x005a, Script::Latin),
    (0x0061, 0x007a, Script::Latin),
    (0x00aa, 0x00aa, Script::Latin),
    (0x00ba, 0x00ba, Script::Latin),
    (0x00c0, 0x00d6, Script::Latin),
    (0x00d8, 0x00f6, Script::Latin),
    (0x00f8, 0x02b8, Script::Latin),
    (0x02e0, 0x02e4, Script::Latin),
    (0x1d00, 0x1d25, Script::Latin),
    (0x1d2c, 0x1d5c, Script::Latin),
    (0x1d62, 0x1d65, Script::Latin),
    (0x1d6b, 0x1d77, Script::Latin),
    (0x1d79, 0x1dbe, Script::Latin),
    (0x1e00, 0x1eff, Script::Latin),
    (0x2071, 0x2071, Script::Latin),
    (0x207f, 0x207f, Script::Latin),
    (0x2090, 0x209c, Script::Latin),
    (0x212a, 0x212b, Script::Latin),
    (0x2132, 0x2132, Script::Latin),
    (0x214e, 0x214e, Script::Latin),
    (0x2160, 0x2188, Script::Latin),
    (0x2c60, 0x2c7f, Script::Latin),
    (0xa722, 0xa787, Script::Latin),
    (0xa78b, 0xa7ff, Script::Latin),
    (0xab30, 0xab5a, Script::Latin),
    (0xab5c, 0xab64, Script::Latin),
    (0xfb00, 0xfb06, Script::Latin),
    (0xff21, 0xff3a, Script::Latin),
    (0xff41, 0xff5a, Script::Latin),
    (0x0370, 0x0373, Script::Greek),
    (0x0375, 0x0377, Script::Greek),
    (0x037a, 0x037d, Script::Greek),
    (0x037f, 0x037f, Script::Greek),
    (0x0384, 0x0384, Script::Greek),
    (0x0386, 0x0386, Script::Greek),
    (0x0388, 0x03e1, Script::Greek),
    (0x03f0, 0x03ff, Script::Greek),
    (0x1d26, 0x1d2a, Script::Greek),
    (0x1f00, 0x1ffe, Script::Greek),
    (0x2126, 0x2126, Script::Greek),
    (0xab65, 0xab65, Script::Greek),
    (0x03e2, 0x03ef, Script::Coptic),
    (0x2c80, 0x2cff, Script::Coptic),
    (0x0400, 0x0484, Script::Cyrillic),
    (0x0487, 0x052f, Script::Cyrillic),
    (0x1c80, 0x1c88, Script::Cyrillic),
    (0x1d2b, 0x1d2b, Script::Cyrillic),
    (0x2de0, 0x2dff, Script::Cyrillic),
    (0xa640, 0xa69f, Script::Cyrillic),
    (0x0531, 0x0556, Script::Armenian),
    (0x0559, 0x058a, Script::Armenian),
    (0x058d, 0x058f, Script::Armenian),
    (0xfb13, 0xfb17, Script::Armenian),
    (0x0591, 0x05c7, Script::Hebrew),
    (0x05d0, 0x05ea, Script::Hebrew),
    (0x05ef, 0x05f4, Script::Hebrew),
    (0xfb1d, 0xfb4f, Script::Hebrew),
    (0x0600, 0x0604, Script::Arabic),
    (0x0606, 0x060b, Script::Arabic),
    (0x060d, 0x061a, Script::Arabic),
    (0x061c, 0x061e, Script::Arabic),
    (0x0620, 0x063f, Script::Arabic),
    (0x0641, 0x064a, Script::Arabic),
    (0x0656, 0x066f, Script::Arabic),
    (0x0671, 0x06dc, Script::Arabic),
    (0x06de, 0x06ff, Script::Arabic),
    (0x0750, 0x077f, Script::Arabic),
    (0x0870, 0x08ff, Script::Arabic),
    (0xfb50, 0xfd3d, Script::Arabic),
    (0xfd40, 0xfdff, Script::Arabic),
    (0xfe70, 0xfefc, Script::Arabic),
    (0x0700, 0x074f, Script::Syriac),
    (0x0780, 0x07b1, Script::Thaana),
    (0x0900, 0x0950, Script::Devanagari),
    (0x0955, 0x0963, Script::Devanagari),
    (0x0966, 0x097f, Script::Devanagari),
    (0xa8e0, 0xa8ff, Script::Devanagari),
    (0x0980, 0x09fe, Script::Bengali),
    (0x0a01, 0x0a76, Script::Gurmukhi),
    (0x0a81, 0x0aff, Script::Gujarati),
    (0x0b01, 0x0b77, Script::Oriya),
    (0x0b82, 0x0bfa, Script::Tamil),
    (0x0c00, 0x0c7f, Script::Telugu),
    (0x0c80, 0x0cf3, Script::Kannada),
    (0x0d00, 0x0d7f, Script::Malayalam),
    (0x0d81, 0x0df4, Script::Sinhala),
    (0x0e01, 0x0e3a, Script::Thai),
    (0x0e40, 0x0e5b, Script::Thai),
    (0x0e81, 0x0edf, Script::Lao),
    (0x0f00, 0x0fd4, Script::Tibetan),
    (0x0fd9, 0x0fda, Script::Tibetan),
    (0x1000, 0x109f, Script::Myanmar),
    (0x10a0, 0x10fa, Script::Georgian),
    (0x10fc, 0x10ff, Script::Georgian),
    (0x1c90, 0x1cbf, Script::Georgian),
    (0x2d00, 0x2d2d, Script::Georgian),
    (0x1100, 0x11ff, Script::Hangul),
    (0x3131, 0x318e, Script::Hangul),
    (0xa960, 0xa97c, Script::Hangul),
    (0xac00, 0xd7a3, Script::Hangul),
    (0xd7b0, 0xd7fb, Script::Hangul),
    (0xffa0, 0xffdc, Script::Hangul),
    (0x1200, 0x139f, Script::Ethiopic),
    (0x13a0, 0x13fd, Script::Cherokee),
    (0xab70, 0xabbf, Script::Cherokee),
    (0x1780, 0x17ff, Script::Khmer),
    (0x19e0, 0x19ff, Script::Khmer),
    (0x1800, 0x1801, Script::Mongolian),
    (0x1804, 0x1804, Script::Mongolian),
    (0x1806, 0x18aa, Script::Mongolian),
    (0x3041, 0x3096, Script::Hiragana),
    (0x309d, 0x309f, Script::Hiragana),
    (0x30a1, 0x30fa, Script::Katakana),
    (0x30fd, 0x30ff, Script::Katakana),
    (0x31f0, 0x31ff, Script::Katakana),
    (0x32d0, 0x32fe, Script::Katakana),
    (0x3300, 0x3357, Script::Katakana),
    (0xff66, 0xff6f, Script::Katakana),
    (0xff71, 0xff9d, Script::Katakana),
    (0x02ea, 0x02eb, Script::Bopomofo),
    (0x3105, 0x312f, Script::Bopomofo),
    (0x31a0, 0x31bf, Script::Bopomofo),
    (0x2e80, 0x2fd5, Script::Han),
    (0x3005, 0x3005, Script::Han),
    (0x3007, 0x3007, Script::Han),
    (0x3021, 0x3029, Script::Han),
    (0x3038, 0x303b, Script::Han),
    (0x3400, 0x4dbf, Script::Han),
    (0x4e00, 0x9fff, Script::Han),
    (0xf900, 0xfad9, Script::Han),
    (0x20000, 0x2a6df, Script::Han),
    (0x2a700, 0x2ebe0, Script::Han),
    (0x2f800, 0x2fa1f, Script::Han),
    (0x30000, 0x3134a, Script::Han),
    (0xa000, 0xa4c6, Script::Yi),
];
