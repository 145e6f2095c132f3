// api_test.rs - Integration tests for the idiomatic Rust API.

use pcrs::api::{Regex, RegexBuilder};
use pcrs::error::{Limit, MatchError, ParseErrorKind, RegexError};
use pcrs::prelude::*;

// === Regex::new ===

#[test]
fn simple_pattern() {
    let re = Regex::new(r"\d+").unwrap();
    let m = re.find("abc 123 def").unwrap();
    assert_eq!(m.as_str(), Some("123"));
}

#[cfg(feature = "unicode")]
#[test]
fn unicode_pattern() {
    let re = Regex::new(r"\p{Hiragana}+").unwrap();
    let m = re.find("hello せかい world").unwrap();
    assert_eq!(m.as_str(), Some("せかい"));
    assert_eq!(m.start(), 6);
}

#[test]
fn no_match_returns_none() {
    let re = Regex::new(r"xyz").unwrap();
    assert!(re.find("abc").is_none());
}

#[test]
fn empty_pattern() {
    let re = Regex::new(r"").unwrap();
    let m = re.find("hello").unwrap();
    assert_eq!(m.start(), 0);
    assert_eq!(m.end(), 0);
    assert!(m.is_empty());
}

#[test]
fn invalid_pattern_parse_error() {
    match Regex::new(r"(unclosed").unwrap_err() {
        RegexError::Parse(e) => {
            assert_eq!(e.kind, ParseErrorKind::MissingClosingParenthesis);
            assert!(e.code() > 0);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn error_display_has_offset() {
    let err = Regex::new(r"ab)").unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("parse error"), "{}", text);
    assert!(text.contains('2'), "{}", text);
}

// === Regex::is_match ===

#[test]
fn is_match_true() {
    let re = Regex::new(r"world").unwrap();
    assert!(re.is_match("hello world"));
}

#[test]
fn is_match_false() {
    let re = Regex::new(r"^world").unwrap();
    assert!(!re.is_match("hello world"));
}

// === Regex::captures ===

#[test]
fn captures_groups() {
    let re = Regex::new(r"(\w+)@(\w+)\.com").unwrap();
    let caps = re.captures("mail bob@example.com now").unwrap();
    assert_eq!(caps.len(), 3);
    assert_eq!(caps.get(0).unwrap().as_str(), Some("bob@example.com"));
    assert_eq!(caps.get(1).unwrap().as_str(), Some("bob"));
    assert_eq!(caps.get(2).unwrap().as_str(), Some("example"));
    assert!(caps.get(3).is_none());
}

#[test]
fn captures_optional_group() {
    let re = Regex::new(r"(a)(b)?(c)").unwrap();
    let caps = re.captures("ac").unwrap();
    assert!(caps.get(2).is_none());
    assert_eq!(caps.get(3).unwrap().range(), 1..2);
    let spans: Vec<_> = caps.iter().map(|m| m.map(|m| m.range())).collect();
    assert_eq!(spans, vec![Some(0..2), Some(0..1), None, Some(1..2)]);
}

#[test]
fn captures_by_name() {
    let re = Regex::new(r"(?<year>\d{4})-(?<month>\d{2})").unwrap();
    let caps = re.captures("on 2026-10").unwrap();
    assert_eq!(caps.name("year").unwrap().as_str(), Some("2026"));
    assert_eq!(caps.name("month").unwrap().as_str(), Some("10"));
    assert!(caps.name("day").is_none());
}

#[test]
fn captures_keep_moves_start() {
    let re = Regex::new(r"price: \K\d+").unwrap();
    let caps = re.captures("price: 42").unwrap();
    assert_eq!(caps.get(0).unwrap().as_str(), Some("42"));
    assert_eq!(caps.attempt_start(), 0);
}

#[test]
fn captures_len() {
    assert_eq!(Regex::new(r"(a)(?:b)(c)").unwrap().captures_len(), 2);
    assert_eq!(Regex::new(r"abc").unwrap().captures_len(), 0);
}

// === Iteration ===

#[test]
fn find_iter_words() {
    let re = Regex::new(r"\w+").unwrap();
    let words: Vec<_> = re.find_iter("one two  three").filter_map(|m| m.as_str()).collect();
    assert_eq!(words, vec!["one", "two", "three"]);
}

#[test]
fn find_iter_empty_matches() {
    let re = Regex::new(r"x*").unwrap();
    let spans: Vec<_> = re.find_iter("axxb").map(|m| m.range()).collect();
    assert_eq!(spans, vec![0..0, 1..3, 3..3, 4..4]);
}

#[test]
fn captures_iter_pairs() {
    let re = Regex::new(r"(\w)=(\d)").unwrap();
    let pairs: Vec<_> = re
        .captures_iter("a=1, b=2, c=x")
        .map(|c| (c.get(1).unwrap().as_bytes()[0], c.get(2).unwrap().as_bytes()[0]))
        .collect();
    assert_eq!(pairs, vec![(b'a', b'1'), (b'b', b'2')]);
}

#[test]
fn find_at_uses_lookbehind_context() {
    let re = Regex::new(r"(?<=a)b").unwrap();
    assert_eq!(re.find_at("abab", 2).unwrap().range(), 3..4);
    assert!(re.find_at("abab", 4).is_none());
}

// === RegexBuilder ===

#[test]
fn builder_case_insensitive() {
    let re = Regex::builder("hello").case_insensitive(true).build().unwrap();
    assert!(re.is_match("HeLLo"));
}

#[test]
fn builder_multi_line_and_dotall() {
    let re = RegexBuilder::new("^b.c$").multi_line(true).dot_matches_newline(true).build().unwrap();
    assert_eq!(re.find("a\nb\nc").unwrap().range(), 2..5);
    let re = RegexBuilder::new("^b.c$").multi_line(true).build().unwrap();
    assert!(re.find("a\nb\nc").is_none());
}

#[test]
fn builder_extended_and_literal() {
    let re = RegexBuilder::new(r"\d+ # digits").extended(true).build().unwrap();
    assert_eq!(re.find("ab12").unwrap().as_str(), Some("12"));
    let re = RegexBuilder::new("a+b").literal(true).build().unwrap();
    assert!(re.is_match("xa+b"));
    assert!(!re.is_match("aab"));
}

#[test]
fn builder_newline_convention() {
    let re = RegexBuilder::new("^b").multi_line(true).newline(Newline::Cr).build().unwrap();
    assert!(re.is_match("a\rb"));
    assert!(!re.is_match("a\nb"));
}

#[test]
fn builder_anchored() {
    let re = RegexBuilder::new("b").anchored(true).build().unwrap();
    assert!(!re.is_match("ab"));
    assert!(re.is_match("ba"));
}

#[test]
fn builder_match_options() {
    let re = RegexBuilder::new("a*").match_options(MatchOptions::NOTEMPTY).build().unwrap();
    assert_eq!(re.find("baa").unwrap().range(), 1..3);
}

#[test]
fn builder_offset_limit() {
    let re = RegexBuilder::new("b").offset_limit(1).build().unwrap();
    assert!(re.is_match("ab"));
    assert!(!re.is_match("aab"));
}

#[test]
fn builder_depth_limit() {
    let re = RegexBuilder::new(r"^(a(?1)?)$").depth_limit(5).build().unwrap();
    assert!(re.is_match("aaa"));
    match re.try_find("a".repeat(50).as_str()) {
        Err(RegexError::Match(MatchError::ResourceExhausted(Limit::Depth))) => {}
        other => panic!("expected depth limit, got {:?}", other.map(|m| m.map(|m| m.range()))),
    }
}

#[test]
fn builder_parse_depth() {
    let err = RegexBuilder::new("((((a))))").parse_depth(2).build().unwrap_err();
    match err {
        RegexError::Parse(e) => assert_eq!(e.kind, ParseErrorKind::NestingTooDeep),
        other => panic!("expected nesting error, got {:?}", other),
    }
}

#[test]
fn builder_without_jit() {
    let re = RegexBuilder::new(r"\d+").jit(false).build().unwrap();
    assert!(!re.is_jit());
    assert_eq!(re.find("x12").unwrap().range(), 1..3);
}

// === Code units ===

#[test]
fn byte_subjects() {
    let re = Regex::new_bytes(b"\\xff+").unwrap();
    let m = re.find(&b"a\xff\xffb"[..]).unwrap();
    assert_eq!(m.range(), 1..3);
    assert_eq!(m.as_str(), None);
}

#[cfg(all(feature = "unit16", feature = "unicode"))]
#[test]
fn utf16_subjects() {
    let re = RegexBuilder::new("b.").build_for::<u16>().unwrap();
    let text: Vec<u16> = "ab😀".encode_utf16().collect();
    let m = re.find(&text[..]).unwrap();
    assert_eq!(m.range(), 1..4);
    assert_eq!(m.as_units(), &text[1..4]);
}

#[cfg(feature = "unit32")]
#[test]
fn utf32_subjects() {
    let re = RegexBuilder::new("b.").build_for::<u32>().unwrap();
    let text: Vec<u32> = "ab😀".chars().map(u32::from).collect();
    assert_eq!(re.find(&text[..]).unwrap().range(), 1..3);
}

#[test]
fn clone_and_debug() {
    let re = Regex::new(r"a(b)").unwrap();
    let copy = re.clone();
    assert_eq!(copy.find("xab").unwrap().range(), 1..3);
    let caps = copy.captures("xab").unwrap();
    assert_eq!(format!("{:?}", caps), "[Some(1..3), Some(2..3)]");
}
