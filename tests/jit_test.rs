// jit_test.rs - Integration tests for the native back end.
//
// Native code must give the same results, errors and step counts as the
// interpreter. Without the `jit` feature every compile reports NotBuilt and
// the API falls back silently.

use pcrs::api::{Regex, RegexBuilder};
use pcrs::error::Unsupported;
use pcrs::options::{CompileFlags, MatchOptions};
use pcrs::regexec::{exec, MatchContext, Matcher};
use pcrs::regint::Pattern;
use pcrs::regjit::{is_available, jit_compile};

#[cfg(not(feature = "jit"))]
#[test]
fn reports_not_built() {
    assert!(!is_available());
    let p = Pattern::<u8>::compile(b"a+", CompileFlags::empty()).unwrap();
    assert_eq!(jit_compile(&p).unwrap_err(), Unsupported::NotBuilt);
    let re = Regex::new("a+").unwrap();
    assert!(!re.is_jit());
    assert_eq!(re.find("baa").unwrap().range(), 1..3);
}

#[test]
fn api_falls_back_for_recursion() {
    let re = Regex::new(r"^(\((?1)*\))$").unwrap();
    assert!(!re.is_jit());
    assert!(re.is_match("(()())"));
    assert!(!re.is_match("(()"));
}

#[test]
fn no_jit_option_uses_interpreter() {
    let re = RegexBuilder::new(r"\w+").match_options(MatchOptions::NO_JIT).build().unwrap();
    assert!(!re.is_jit());
    assert_eq!(re.find("  ab ").unwrap().range(), 2..4);
}

#[cfg(feature = "jit")]
mod native {
    use super::*;
    use pcrs::error::{Limit, MatchError};

    fn compile_native(pattern: &str, flags: CompileFlags) -> Option<(Pattern<u8>, pcrs::CompiledNative<u8>)> {
        let p = Pattern::<u8>::compile(pattern.as_bytes(), flags)
            .unwrap_or_else(|e| panic!("compile failed for {:?}: {}", pattern, e));
        match jit_compile(&p) {
            Ok(n) => Some((p, n)),
            Err(Unsupported::Host(_)) => None,
            Err(e) => panic!("native compile failed for {:?}: {}", pattern, e),
        }
    }

    fn agree(pattern: &str, flags: CompileFlags, subject: &str, start: usize, opts: MatchOptions) {
        let Some((p, native)) = compile_native(pattern, flags) else { return };
        let mut a = MatchContext::new();
        let mut b = MatchContext::new();
        let want = exec(&p, subject.as_bytes(), start, opts, &mut a);
        let got = native.exec(subject.as_bytes(), start, opts, &mut b);
        assert_eq!(got, want, "{:?} against {:?}", pattern, subject);
        assert_eq!(a.last_steps(), b.last_steps(), "steps for {:?}", pattern);
        assert_eq!(a.last_attempts(), b.last_attempts(), "attempts for {:?}", pattern);
    }

    #[test]
    fn agrees_on_syntax() {
        let cases: &[(&str, &str)] = &[
            ("", "abc"),
            ("a.c", "xxabcx"),
            ("[a-f]+\\d", "zzcafe1"),
            ("[^\\s]+", "  word  "),
            ("a{2,4}?b", "aaaab"),
            ("(?:ab|a)(?:bc|c)", "abc"),
            ("(a)|b", "b"),
            ("((a)|b)+", "abab"),
            ("(?i)straße", "STRASSE straße"),
            ("\\bcat\\b", "concat cat"),
            ("(?<=\\d)px", "10px"),
            ("(?<!-)\\d+", "-1 22"),
            ("(?=.*\\d)\\w+", "abc1"),
            ("a++b|a", "aaa"),
            ("(?>x+|y)z", "xxyz"),
            ("(\\w)\\1", "abccd"),
            ("(?<n>.)\\k<n>", "xyy"),
            ("ab\\Kc", "abc"),
            ("a\\Rb", "a\r\nb"),
            ("(?m)^\\w+$", "one\ntwo"),
            ("\\Aa|b\\z", "cab"),
            ("(*COMMIT)a|b", "b"),
            ("a+(*PRUNE)b|a+c", "aaac"),
            ("a(*ACCEPT)b", "ac"),
            ("(?(?=a)a|b)+", "abba"),
        ];
        for &(pattern, subject) in cases {
            agree(pattern, CompileFlags::empty(), subject, 0, MatchOptions::empty());
        }
    }

    #[test]
    fn agrees_on_options() {
        agree("a*", CompileFlags::empty(), "baa", 0, MatchOptions::NOTEMPTY);
        agree("a*", CompileFlags::empty(), "baa", 0, MatchOptions::NOTEMPTY_ATSTART);
        agree("^a", CompileFlags::empty(), "a", 0, MatchOptions::NOTBOL);
        agree("b", CompileFlags::empty(), "ab", 0, MatchOptions::ANCHORED);
        agree("a|b", CompileFlags::empty(), "ab", 0, MatchOptions::ENDANCHORED);
        agree("\\Gb", CompileFlags::empty(), "abb", 1, MatchOptions::empty());
        agree("é.", CompileFlags::UTF, "aéz", 0, MatchOptions::empty());
        agree("A.B", CompileFlags::CASELESS | CompileFlags::DOTALL, "xa\nb", 0, MatchOptions::empty());
    }

    #[test]
    fn same_limit_errors() {
        let Some((p, native)) = compile_native("(a+)+b", CompileFlags::empty()) else { return };
        let subject = "a".repeat(26);
        let mut a = MatchContext::new();
        a.match_limit = 2000;
        let mut b = a.clone();
        let want = exec(&p, subject.as_bytes(), 0, MatchOptions::empty(), &mut a);
        let got = native.exec(subject.as_bytes(), 0, MatchOptions::empty(), &mut b);
        assert_eq!(want, Err(MatchError::ResourceExhausted(Limit::Match)));
        assert_eq!(got, want);
    }

    #[test]
    fn unsupported_constructs() {
        for pattern in ["(a(?1)?b)", "(?R)?x", "(?(R)a|b)"] {
            let p = Pattern::<u8>::compile(pattern.as_bytes(), CompileFlags::empty()).unwrap();
            match jit_compile(&p) {
                Err(Unsupported::Construct(_)) | Err(Unsupported::Host(_)) => {}
                other => panic!("{:?}: expected unsupported, got {:?}", pattern, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn regex_prefers_native() {
        if !is_available() {
            return;
        }
        let re = Regex::new(r"(\d+)-(\d+)").unwrap();
        assert!(re.is_jit());
        let caps = re.captures("range 10-20").unwrap();
        assert_eq!(caps.get(2).unwrap().as_str(), Some("20"));
        let copy = re.clone();
        assert!(copy.is_jit());
        assert!(!RegexBuilder::new("x").jit(false).build().unwrap().is_jit());
    }
}
