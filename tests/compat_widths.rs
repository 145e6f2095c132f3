// compat_widths.rs - Integration tests for 8-, 16- and 32-bit code units.
//
// Offsets are always in code units of the subject's width.

use pcrs::error::{ParseErrorKind, RegexError};
use pcrs::options::{CompileFlags, MatchOptions};
use pcrs::regenc::{encode_str, CodeUnit, Width};
use pcrs::regexec::{exec, MatchContext};
use pcrs::regint::Pattern;

fn span<C: CodeUnit>(flags: CompileFlags, pattern: &str, subject: &[C]) -> Option<(usize, usize)> {
    let units: Vec<C> = encode_str(pattern);
    let p = Pattern::<C>::compile(&units, flags)
        .unwrap_or_else(|e| panic!("compile failed for {:?} at {}: {}", pattern, C::WIDTH, e));
    exec(&p, subject, 0, MatchOptions::empty(), &mut MatchContext::new())
        .unwrap_or_else(|e| panic!("match error for {:?}: {}", pattern, e))
        .map(|m| (m.start(), m.end()))
}

fn parse_error<C: CodeUnit>(flags: CompileFlags, pattern: &str) -> ParseErrorKind {
    let units: Vec<C> = encode_str(pattern);
    match Pattern::<C>::compile(&units, flags) {
        Err(RegexError::Parse(e)) => e.kind,
        other => panic!("expected parse error for {:?}, got {:?}", pattern, other.map(|_| ())),
    }
}

// === 8-bit ===

#[test]
fn bytes_without_utf() {
    let p = Pattern::<u8>::compile(b"\\x{ff}", CompileFlags::empty()).unwrap();
    assert_eq!(p.info().width, Width::Eight);
    assert_eq!(span::<u8>(CompileFlags::empty(), "\\xff", b"a\xff"), Some((1, 2)));
    assert_eq!(parse_error::<u8>(CompileFlags::empty(), "\\x{100}"), ParseErrorKind::CodePointTooLarge);
}

#[cfg(feature = "unicode")]
#[test]
fn utf8_characters() {
    let utf = CompileFlags::UTF;
    assert_eq!(span::<u8>(utf, "\\x{100}", "aĀ".as_bytes()), Some((1, 3)));
    assert_eq!(span::<u8>(utf, "..", "é😀".as_bytes()), Some((0, 6)));
    assert_eq!(span::<u8>(utf, "(?<=é)x", "éx".as_bytes()), Some((2, 3)));
    assert_eq!(parse_error::<u8>(utf, "\\x{d800}"), ParseErrorKind::CodePointTooLarge);
}

// === 16-bit ===

#[cfg(feature = "unit16")]
mod sixteen {
    use super::*;

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn raw_units() {
        let p = Pattern::<u16>::compile(&utf16("a"), CompileFlags::empty()).unwrap();
        assert_eq!(p.info().width, Width::Sixteen);
        assert_eq!(span::<u16>(CompileFlags::empty(), "\\x{ffff}", &[0x61, 0xffff]), Some((1, 2)));
        assert_eq!(span::<u16>(CompileFlags::empty(), ".", &[0xd83d, 0xde00]), Some((0, 1)));
        assert_eq!(parse_error::<u16>(CompileFlags::empty(), "\\x{10000}"), ParseErrorKind::CodePointTooLarge);
    }

    #[cfg(feature = "unicode")]
    #[test]
    fn surrogate_pairs() {
        let utf = CompileFlags::UTF;
        assert_eq!(span::<u16>(utf, ".", &utf16("😀")), Some((0, 2)));
        assert_eq!(span::<u16>(utf, "\\x{1f600}+", &utf16("a😀😀b")), Some((1, 5)));
        assert_eq!(span::<u16>(utf, "(?<=😀)b", &utf16("a😀b")), Some((3, 4)));
        assert_eq!(span::<u16>(utf, "[😀-😂]", &utf16("x😁")), Some((1, 3)));
    }

    #[cfg(feature = "unicode")]
    #[test]
    fn invalid_utf16_subject() {
        let p = Pattern::<u16>::compile(&utf16("a"), CompileFlags::UTF).unwrap();
        let r = exec(&p, &[0x61, 0xdc00], 0, MatchOptions::empty(), &mut MatchContext::new());
        assert_eq!(r, Err(pcrs::MatchError::InvalidUtf { offset: 1 }));
        let subject = utf16("😀a");
        let r = exec(&p, &subject, 1, MatchOptions::empty(), &mut MatchContext::new());
        assert_eq!(r, Err(pcrs::MatchError::BadUtfOffset));
    }

    #[cfg(feature = "unicode")]
    #[test]
    fn caseless_wide() {
        let flags = CompileFlags::UTF | CompileFlags::CASELESS;
        assert_eq!(span::<u16>(flags, "σ", &utf16("ΑΣ")), Some((1, 2)));
    }
}

// === 32-bit ===

#[cfg(feature = "unit32")]
mod thirty_two {
    use super::*;

    fn utf32(s: &str) -> Vec<u32> {
        s.chars().map(u32::from).collect()
    }

    #[test]
    fn raw_units() {
        let p = Pattern::<u32>::compile(&utf32("a"), CompileFlags::empty()).unwrap();
        assert_eq!(p.info().width, Width::ThirtyTwo);
        assert_eq!(span::<u32>(CompileFlags::empty(), "\\x{110000}", &[0x61, 0x110000]), Some((1, 2)));
        assert_eq!(span::<u32>(CompileFlags::empty(), ".", &[0xd800]), Some((0, 1)));
    }

    #[cfg(feature = "unicode")]
    #[test]
    fn one_unit_per_character() {
        let utf = CompileFlags::UTF;
        assert_eq!(span::<u32>(utf, ".+", &utf32("é😀x")), Some((0, 3)));
        assert_eq!(span::<u32>(utf, "\\p{Greek}+", &utf32("abγδ")), Some((2, 4)));
        assert_eq!(parse_error::<u32>(utf, "\\x{110000}"), ParseErrorKind::CodePointTooLarge);
        let p = Pattern::<u32>::compile(&utf32("a"), utf).unwrap();
        let r = exec(&p, &[0x61, 0x110000], 0, MatchOptions::empty(), &mut MatchContext::new());
        assert_eq!(r, Err(pcrs::MatchError::InvalidUtf { offset: 1 }));
    }
}
