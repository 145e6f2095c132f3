// regposix.rs - POSIX regcomp/regexec wrapper.
// Maps POSIX flags onto compile and match options; errors become `REG_*`
// codes. Offsets are byte offsets from the start of the subject, even with
// REG_STARTEND.

use std::fmt;

use crate::error::{CompileError, MatchError, ParseErrorKind, RegexError};
use crate::options::{CompileFlags, MatchOptions};
use crate::regerror::posix_error_message;
use crate::regexec::{exec, MatchContext};
use crate::regint::Pattern;

// === Flags ===

pub const REG_ICASE: i32 = 0x0001;
pub const REG_NEWLINE: i32 = 0x0002;
pub const REG_NOTBOL: i32 = 0x0004;
pub const REG_NOTEOL: i32 = 0x0008;
pub const REG_DOTALL: i32 = 0x0010;
pub const REG_NOSUB: i32 = 0x0020;
pub const REG_UTF: i32 = 0x0040;
pub const REG_STARTEND: i32 = 0x0080;
pub const REG_NOTEMPTY: i32 = 0x0100;
pub const REG_UNGREEDY: i32 = 0x0200;
pub const REG_UCP: i32 = 0x0400;
pub const REG_NOSPEC: i32 = 0x1000;
/// Accepted and ignored; patterns are always Perl syntax.
pub const REG_EXTENDED: i32 = 0;

// === Error codes ===

pub const REG_ASSERT: i32 = 1;
pub const REG_BADBR: i32 = 2;
pub const REG_BADPAT: i32 = 3;
pub const REG_BADRPT: i32 = 4;
pub const REG_EBRACE: i32 = 5;
pub const REG_EBRACK: i32 = 6;
pub const REG_ECOLLATE: i32 = 7;
pub const REG_ECTYPE: i32 = 8;
pub const REG_EESCAPE: i32 = 9;
pub const REG_EMPTY: i32 = 10;
pub const REG_EPAREN: i32 = 11;
pub const REG_ERANGE: i32 = 12;
pub const REG_ESIZE: i32 = 13;
pub const REG_ESPACE: i32 = 14;
pub const REG_ESUBREG: i32 = 15;
pub const REG_INVARG: i32 = 16;
pub const REG_NOMATCH: i32 = 17;

/// A failed `regcomp` or `regexec`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixError {
    pub code: i32,
    /// Pattern offset of a compile error.
    pub offset: Option<usize>,
}

impl PosixError {
    fn new(code: i32) -> PosixError {
        PosixError { code, offset: None }
    }

    /// The `regerror` text for this code.
    pub fn message(&self) -> &'static str {
        posix_error_message(self.code)
    }
}

impl fmt::Display for PosixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} at offset {}", self.message(), offset),
            None => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for PosixError {}

fn compile_error_code(err: &RegexError) -> PosixError {
    use ParseErrorKind::*;
    match err {
        RegexError::Parse(e) => {
            let code = match e.kind {
                EndsWithBackslash | MissingControlChar | UnrecognizedEscape | UnsupportedEscape => REG_EESCAPE,
                QuantifierOutOfOrder | QuantifierRange => REG_BADBR,
                MissingTerminatingBracket => REG_EBRACK,
                InvalidEscapeInClass | UnknownPosixClass | PosixOutsideClass => REG_ECTYPE,
                InvalidRange | ClassItemInRange => REG_ERANGE,
                NothingToRepeat => REG_BADRPT,
                MissingClosingParenthesis | UnmatchedClosingParenthesis => REG_EPAREN,
                UnknownGroup | GroupNumberTooBig => REG_ESUBREG,
                NestingTooDeep | TooManyGroups => REG_ESIZE,
                _ => REG_BADPAT,
            };
            PosixError { code, offset: Some(e.offset) }
        }
        RegexError::Compile(CompileError::PatternTooLarge { .. }) => PosixError::new(REG_ESIZE),
        RegexError::Compile(CompileError::NonexistentGroup(_))
        | RegexError::Compile(CompileError::ReferenceBeforeDefinition(_)) => PosixError::new(REG_ESUBREG),
        RegexError::Compile(_) => PosixError::new(REG_BADPAT),
        RegexError::Match(_) => PosixError::new(REG_ASSERT),
    }
}

fn match_error_code(err: &MatchError) -> PosixError {
    match err {
        MatchError::ResourceExhausted(_) | MatchError::RecursionLoop => PosixError::new(REG_ESPACE),
        MatchError::BadOffset | MatchError::BadUtfOffset | MatchError::InvalidUtf { .. } => {
            PosixError::new(REG_INVARG)
        }
    }
}

// === Match slots ===

/// One `regmatch_t`; both offsets are -1 for an unset group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegMatch {
    pub rm_so: isize,
    pub rm_eo: isize,
}

impl RegMatch {
    pub const UNSET: RegMatch = RegMatch { rm_so: -1, rm_eo: -1 };

    pub fn new(start: usize, end: usize) -> RegMatch {
        RegMatch { rm_so: start as isize, rm_eo: end as isize }
    }
}

impl Default for RegMatch {
    fn default() -> Self {
        RegMatch::UNSET
    }
}

// === Regex ===

/// A pattern compiled through the POSIX interface.
#[derive(Debug, Clone)]
pub struct PosixRegex {
    pattern: Pattern<u8>,
    cflags: i32,
    /// Number of capturing groups.
    pub re_nsub: usize,
}

impl PosixRegex {
    /// `regcomp`.
    pub fn new(pattern: &str, cflags: i32) -> Result<PosixRegex, PosixError> {
        PosixRegex::from_bytes(pattern.as_bytes(), cflags)
    }

    pub fn from_bytes(pattern: &[u8], cflags: i32) -> Result<PosixRegex, PosixError> {
        let mut flags = CompileFlags::empty();
        flags.set(CompileFlags::CASELESS, cflags & REG_ICASE != 0);
        flags.set(CompileFlags::MULTILINE, cflags & REG_NEWLINE != 0);
        flags.set(CompileFlags::DOTALL, cflags & REG_DOTALL != 0);
        flags.set(CompileFlags::LITERAL, cflags & REG_NOSPEC != 0);
        flags.set(CompileFlags::UTF, cflags & REG_UTF != 0);
        flags.set(CompileFlags::UCP, cflags & REG_UCP != 0);
        flags.set(CompileFlags::UNGREEDY, cflags & REG_UNGREEDY != 0);
        let pattern = Pattern::compile(pattern, flags).map_err(|e| compile_error_code(&e))?;
        let re_nsub = pattern.capture_count() as usize;
        Ok(PosixRegex { pattern, cflags, re_nsub })
    }

    /// `regexec`. Fills `pmatch` with group offsets; slots past the last
    /// group are set unset. With `REG_STARTEND`, `pmatch[0]` on entry gives
    /// the range of `subject` to search.
    pub fn exec(&self, subject: &[u8], pmatch: &mut [RegMatch], eflags: i32) -> Result<(), PosixError> {
        let mut opts = MatchOptions::empty();
        opts.set(MatchOptions::NOTBOL, eflags & REG_NOTBOL != 0);
        opts.set(MatchOptions::NOTEOL, eflags & REG_NOTEOL != 0);
        opts.set(MatchOptions::NOTEMPTY, eflags & REG_NOTEMPTY != 0);

        let (start, end) = if eflags & REG_STARTEND != 0 {
            let range = pmatch.first().copied().ok_or_else(|| PosixError::new(REG_INVARG))?;
            let start = usize::try_from(range.rm_so).map_err(|_| PosixError::new(REG_INVARG))?;
            let end = usize::try_from(range.rm_eo).map_err(|_| PosixError::new(REG_INVARG))?;
            if start > end || end > subject.len() {
                return Err(PosixError::new(REG_INVARG));
            }
            (start, end)
        } else {
            (0, subject.len())
        };

        let mut ctx = MatchContext::new();
        let found = exec(&self.pattern, &subject[..end], start, opts, &mut ctx).map_err(|e| match_error_code(&e))?;
        let result = found.ok_or_else(|| PosixError::new(REG_NOMATCH))?;

        if self.cflags & REG_NOSUB != 0 {
            return Ok(());
        }
        for (i, slot) in pmatch.iter_mut().enumerate() {
            *slot = match result.get(i) {
                Some(r) => RegMatch::new(r.start, r.end),
                None => RegMatch::UNSET,
            };
        }
        Ok(())
    }

    /// `regexec` with no submatch slots.
    pub fn is_match(&self, subject: &[u8]) -> bool {
        self.exec(subject, &mut [], 0).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submatches() {
        let re = PosixRegex::new("(a+)(x)?b", 0).unwrap();
        assert_eq!(re.re_nsub, 2);
        let mut m = [RegMatch::default(); 4];
        re.exec(b"ccaab", &mut m, 0).unwrap();
        assert_eq!(m[0], RegMatch::new(2, 5));
        assert_eq!(m[1], RegMatch::new(2, 4));
        assert_eq!(m[2], RegMatch::UNSET);
        assert_eq!(m[3], RegMatch::UNSET);
    }

    #[test]
    fn no_match_code() {
        let re = PosixRegex::new("abc", 0).unwrap();
        let err = re.exec(b"xyz", &mut [], 0).unwrap_err();
        assert_eq!(err.code, REG_NOMATCH);
        assert_eq!(err.message(), "match failed");
    }

    #[test]
    fn compile_codes() {
        assert_eq!(PosixRegex::new("a(b", 0).unwrap_err().code, REG_EPAREN);
        assert_eq!(PosixRegex::new("[a", 0).unwrap_err().code, REG_EBRACK);
        assert_eq!(PosixRegex::new("*a", 0).unwrap_err().code, REG_BADRPT);
        assert_eq!(PosixRegex::new("[z-a]", 0).unwrap_err().code, REG_ERANGE);
        let err = PosixRegex::new("ab)", 0).unwrap_err();
        assert_eq!(err.offset, Some(2));
    }

    #[test]
    fn flags() {
        assert!(PosixRegex::new("ABC", REG_ICASE).unwrap().is_match(b"xabc"));
        assert!(!PosixRegex::new("^b", 0).unwrap().is_match(b"a\nb"));
        assert!(PosixRegex::new("^b", REG_NEWLINE | REG_EXTENDED).unwrap().is_match(b"a\nb"));
        assert!(!PosixRegex::new("^a", 0).unwrap().exec(b"a", &mut [], REG_NOTBOL).is_ok());
        assert!(PosixRegex::new("a.b", REG_DOTALL).unwrap().is_match(b"a\nb"));
    }

    #[test]
    fn nosub_leaves_slots() {
        let re = PosixRegex::new("(b)", REG_NOSUB).unwrap();
        assert_eq!(re.re_nsub, 1);
        let mut m = [RegMatch::new(7, 7)];
        re.exec(b"abc", &mut m, 0).unwrap();
        assert_eq!(m[0], RegMatch::new(7, 7));
    }

    #[test]
    fn startend_range() {
        let re = PosixRegex::new("b+", 0).unwrap();
        let mut m = [RegMatch::new(3, 5)];
        re.exec(b"bbabbbb", &mut m, REG_STARTEND).unwrap();
        assert_eq!(m[0], RegMatch::new(3, 5));
        let mut m = [RegMatch::new(5, 3)];
        assert_eq!(re.exec(b"bbb", &mut m, REG_STARTEND).unwrap_err().code, REG_INVARG);
    }
}
