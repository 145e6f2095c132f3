// regerror.rs - Error codes and messages.
// Numeric codes follow PCRE2's numbering where a counterpart exists:
// compile errors are positive (100+), match errors negative.

use crate::error::{CompileError, Limit, MatchError, ParseErrorKind};

/// Message and code for a parse error kind.
pub fn parse_error_info(kind: &ParseErrorKind) -> (i32, &'static str) {
    use ParseErrorKind::*;
    match kind {
        EndsWithBackslash => (101, "\\ at end of pattern"),
        MissingControlChar => (102, "\\c at end of pattern"),
        UnrecognizedEscape => (103, "unrecognized character follows \\"),
        QuantifierOutOfOrder => (104, "numbers out of order in {} quantifier"),
        QuantifierRange => (105, "number too big in {} quantifier"),
        MissingTerminatingBracket => (106, "missing terminating ] for character class"),
        InvalidEscapeInClass => (107, "escape sequence is invalid in character class"),
        InvalidRange => (108, "range out of order in character class"),
        ClassItemInRange => (150, "invalid range in character class"),
        NothingToRepeat => (109, "quantifier does not follow a repeatable item"),
        UnrecognizedGroupSyntax => (111, "unrecognized character after (? or (?-"),
        PosixOutsideClass => (112, "POSIX named classes are supported only within a class"),
        MissingClosingParenthesis => (114, "missing closing parenthesis"),
        UnknownGroup => (115, "reference to non-existent subpattern"),
        MissingCommentEnd => (118, "missing ) after (?# comment"),
        NestingTooDeep => (119, "parentheses are too deeply nested"),
        UnmatchedClosingParenthesis => (122, "unmatched closing parenthesis"),
        LookbehindNotFixedLength => (125, "lookbehind assertion is not fixed length"),
        TooManyConditionBranches => {
            (127, "conditional subpattern contains more than two branches")
        }
        AssertionExpected => (128, "assertion expected after (?( or (?(?C)"),
        UnknownPosixClass => (130, "unknown POSIX class name"),
        UnicodeNotSupported => (132, "this version does not have Unicode support"),
        CodePointTooLarge => (134, "character code point value in \\x{} or \\o{} is too large"),
        UnsupportedEscape => (137, "\\F, \\L, \\l, \\N{name}, \\U, and \\u are not supported"),
        DuplicateGroupName => (143, "two named subpatterns have the same name (DUPNAMES not set)"),
        MalformedProperty => (146, "malformed \\P or \\p sequence"),
        UnknownProperty => (147, "unknown property name after \\P or \\p"),
        GroupNameTooLong => (148, "subpattern name is too long (maximum 32 code units)"),
        DefineWithBranches => (154, "DEFINE subpattern contains more than one branch"),
        MalformedReference => (157, "\\g is not followed by a braced, angle-bracketed, or quoted name/number or by a plain number"),
        UnknownVerb => (160, "(*VERB) not recognized or malformed"),
        GroupNumberTooBig => (161, "subpattern number is too big"),
        MissingGroupName => (162, "subpattern name expected"),
        InvalidControlChar => (168, "\\c must be followed by a printable ASCII character"),
        UtfDisallowed => (174, "using UTF is disabled by the application"),
        MissingDigits => (178, "digits missing in \\x{} or \\o{}"),
        TooManyGroups => (197, "too many capturing groups (maximum 65535)"),
        KeepInLookaround => (199, "\\K is not allowed in lookarounds"),
        InvalidUtf => (200, "pattern is not valid UTF"),
        VerbArgument => (166, "(*MARK) must have an argument"),
    }
}

pub fn compile_error_info(err: &CompileError) -> (i32, &'static str) {
    match err {
        CompileError::PatternTooLarge { .. } => (120, "regular expression is too large"),
        CompileError::UnsupportedConstruct(_) => (145, "construct not supported by this compiler"),
        CompileError::NonexistentGroup(_) => (115, "reference to non-existent subpattern"),
        CompileError::ReferenceBeforeDefinition(_) => {
            (115, "back reference to a group that is not yet defined")
        }
    }
}

pub fn match_error_info(err: &MatchError) -> (i32, &'static str) {
    match err {
        MatchError::ResourceExhausted(Limit::Match) => (-47, "match limit exceeded"),
        MatchError::ResourceExhausted(Limit::Depth) => (-53, "depth limit exceeded"),
        MatchError::ResourceExhausted(Limit::Heap) => (-63, "heap limit exceeded"),
        MatchError::RecursionLoop => (-52, "recursion nested at the same subject position"),
        MatchError::BadOffset => (-33, "bad offset value"),
        MatchError::BadUtfOffset => (-36, "offset is not the start of a character"),
        MatchError::InvalidUtf { .. } => (-3, "subject is not valid UTF"),
    }
}

/// `regerror` text for a POSIX error code.
pub fn posix_error_message(code: i32) -> &'static str {
    const MESSAGES: [&str; 18] = [
        "",
        "internal error",
        "invalid repeat counts in {}",
        "pattern error",
        "? * + invalid",
        "unbalanced {}",
        "unbalanced []",
        "collation error - not relevant",
        "bad class",
        "bad escape sequence",
        "empty expression",
        "unbalanced ()",
        "bad range inside []",
        "expression too big",
        "failed to get memory",
        "bad back reference",
        "bad argument",
        "match failed",
    ];
    usize::try_from(code)
        .ok()
        .and_then(|i| MESSAGES.get(i).copied())
        .unwrap_or("unknown error code")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(parse_error_info(&ParseErrorKind::MissingClosingParenthesis).0, 114);
        assert_eq!(
            compile_error_info(&CompileError::PatternTooLarge { size: 1, limit: 0 }).0,
            120
        );
        assert_eq!(match_error_info(&MatchError::ResourceExhausted(Limit::Match)).0, -47);
    }

    #[test]
    fn posix_messages() {
        assert_eq!(posix_error_message(17), "match failed");
        assert_eq!(posix_error_message(11), "unbalanced ()");
        assert_eq!(posix_error_message(-1), "unknown error code");
        assert_eq!(posix_error_message(99), "unknown error code");
    }
}
