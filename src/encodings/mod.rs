// encodings/mod.rs - CodeUnit implementations, one module per width.
// 8-bit is always built; 16- and 32-bit follow the `unit16`/`unit32` features.

pub mod utf8;
#[cfg(feature = "unit16")]
pub mod utf16;
#[cfg(feature = "unit32")]
pub mod utf32;
