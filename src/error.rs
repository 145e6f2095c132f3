// error.rs - Error types.
//
// Parse, compile and match failures are separate types so callers can tell a
// bad pattern from an exhausted budget; `RegexError` wraps all three.

use std::fmt;

use crate::regerror::{compile_error_info, match_error_info, parse_error_info};

// === Parse errors ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    EndsWithBackslash,
    MissingControlChar,
    UnrecognizedEscape,
    QuantifierOutOfOrder,
    QuantifierRange,
    MissingTerminatingBracket,
    InvalidEscapeInClass,
    InvalidRange,
    /// A class escape or POSIX class used as a range endpoint.
    ClassItemInRange,
    NothingToRepeat,
    UnrecognizedGroupSyntax,
    PosixOutsideClass,
    MissingClosingParenthesis,
    UnknownGroup,
    MissingCommentEnd,
    NestingTooDeep,
    UnmatchedClosingParenthesis,
    LookbehindNotFixedLength,
    TooManyConditionBranches,
    AssertionExpected,
    UnknownPosixClass,
    UnicodeNotSupported,
    CodePointTooLarge,
    UnsupportedEscape,
    DuplicateGroupName,
    MalformedProperty,
    UnknownProperty,
    GroupNameTooLong,
    DefineWithBranches,
    MalformedReference,
    UnknownVerb,
    GroupNumberTooBig,
    MissingGroupName,
    InvalidControlChar,
    UtfDisallowed,
    MissingDigits,
    TooManyGroups,
    KeepInLookaround,
    InvalidUtf,
    VerbArgument,
}

/// Malformed pattern text. `offset` is in code units of the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError { kind, offset }
    }

    pub fn code(&self) -> i32 {
        parse_error_info(&self.kind).0
    }

    pub fn message(&self) -> &'static str {
        parse_error_info(&self.kind).1
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message(), self.offset)
    }
}

impl std::error::Error for ParseError {}

// === Compile errors ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Encoded program size exceeds what the link size can address.
    PatternTooLarge { size: usize, limit: usize },
    UnsupportedConstruct(&'static str),
    NonexistentGroup(u32),
    /// Back-reference to a later group in a pattern without recursion.
    ReferenceBeforeDefinition(u32),
}

impl CompileError {
    pub fn code(&self) -> i32 {
        compile_error_info(self).0
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = compile_error_info(self).1;
        match self {
            CompileError::PatternTooLarge { size, limit } => {
                write!(f, "{} ({} code units, limit {})", msg, size, limit)
            }
            CompileError::UnsupportedConstruct(what) => write!(f, "{}: {}", msg, what),
            CompileError::NonexistentGroup(g) | CompileError::ReferenceBeforeDefinition(g) => {
                write!(f, "{} (group {})", msg, g)
            }
        }
    }
}

impl std::error::Error for CompileError {}

// === Match errors ===

/// Which budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    /// Backtracking steps.
    Match,
    /// Nested subroutine calls.
    Depth,
    /// Backtracking stack memory.
    Heap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    ResourceExhausted(Limit),
    /// Start offset past the end of the subject.
    BadOffset,
    /// Start offset inside a UTF sequence.
    BadUtfOffset,
    InvalidUtf { offset: usize },
    RecursionLoop,
}

impl MatchError {
    pub fn code(&self) -> i32 {
        match_error_info(self).0
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match_error_info(self).1;
        match self {
            MatchError::InvalidUtf { offset } => write!(f, "{} at offset {}", msg, offset),
            _ => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MatchError {}

// === JIT fallback signal ===

/// Native compilation is not available for this pattern or host.
///
/// Never an error for matching: callers fall back to the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unsupported {
    /// Built without the `jit` feature.
    NotBuilt,
    /// `cranelift-native` does not support the host.
    Host(String),
    /// The pattern uses an op the native back end does not translate.
    Construct(&'static str),
    /// Cranelift rejected the generated function.
    Codegen(String),
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::NotBuilt => write!(f, "JIT support not built"),
            Unsupported::Host(msg) => write!(f, "JIT not supported on this host: {}", msg),
            Unsupported::Construct(what) => write!(f, "JIT does not support {}", what),
            Unsupported::Codegen(msg) => write!(f, "JIT code generation failed: {}", msg),
        }
    }
}

impl std::error::Error for Unsupported {}

// === Umbrella ===

/// Error type for the high-level API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    Parse(ParseError),
    Compile(CompileError),
    Match(MatchError),
}

impl RegexError {
    /// PCRE2-style numeric code: positive for pattern errors, negative for
    /// match errors.
    pub fn code(&self) -> i32 {
        match self {
            RegexError::Parse(e) => e.code(),
            RegexError::Compile(e) => e.code(),
            RegexError::Match(e) => e.code(),
        }
    }
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexError::Parse(e) => write!(f, "parse error: {}", e),
            RegexError::Compile(e) => write!(f, "compile error: {}", e),
            RegexError::Match(e) => write!(f, "match error: {}", e),
        }
    }
}

impl std::error::Error for RegexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegexError::Parse(e) => Some(e),
            RegexError::Compile(e) => Some(e),
            RegexError::Match(e) => Some(e),
        }
    }
}

impl From<ParseError> for RegexError {
    fn from(e: ParseError) -> Self {
        RegexError::Parse(e)
    }
}

impl From<CompileError> for RegexError {
    fn from(e: CompileError) -> Self {
        RegexError::Compile(e)
    }
}

impl From<MatchError> for RegexError {
    fn from(e: MatchError) -> Self {
        RegexError::Match(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse_error() {
        let e = ParseError::new(ParseErrorKind::MissingClosingParenthesis, 4);
        assert_eq!(e.to_string(), "missing closing parenthesis at offset 4");
        assert_eq!(e.code(), 114);
    }

    #[test]
    fn umbrella_conversions() {
        let e: RegexError = MatchError::ResourceExhausted(Limit::Match).into();
        assert!(matches!(e, RegexError::Match(MatchError::ResourceExhausted(Limit::Match))));
        assert!(e.code() < 0);
        let e: RegexError = CompileError::PatternTooLarge { size: 70000, limit: 65535 }.into();
        assert_eq!(e.code(), 120);
        assert!(e.to_string().contains("70000"));
    }

    #[test]
    fn source_chain() {
        use std::error::Error;
        let e = RegexError::Parse(ParseError::new(ParseErrorKind::InvalidRange, 2));
        assert!(e.source().is_some());
    }
}
