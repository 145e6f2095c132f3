// options.rs - Public option types.
// Compile flags, match options, newline conventions and link sizes.

use bitflags::bitflags;

bitflags! {
    /// Options fixed when a pattern is compiled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompileFlags: u32 {
        const CASELESS            = 1 << 0;
        /// `^` and `$` also match at internal line boundaries.
        const MULTILINE           = 1 << 1;
        /// `.` matches newlines too.
        const DOTALL              = 1 << 2;
        /// Ignore white space and `#` comments outside classes.
        const EXTENDED            = 1 << 3;
        /// As EXTENDED, and also ignore space and tab inside classes.
        const EXTENDED_MORE       = 1 << 4;
        const UTF                 = 1 << 5;
        /// Use Unicode properties for `\d`, `\w`, `\s` and POSIX classes.
        const UCP                 = 1 << 6;
        /// Plain `(..)` does not capture; named groups still do.
        const NO_AUTO_CAPTURE     = 1 << 7;
        /// The whole pattern is a literal string.
        const LITERAL             = 1 << 8;
        const DUPNAMES            = 1 << 9;
        /// Invert quantifier greediness.
        const UNGREEDY            = 1 << 10;
        /// `$` matches only at the very end of the subject.
        const DOLLAR_ENDONLY      = 1 << 11;
        const ANCHORED            = 1 << 12;
        const ENDANCHORED         = 1 << 13;
        const NO_START_OPTIMIZE   = 1 << 14;
        /// A back-reference to an unset group matches the empty string.
        const MATCH_UNSET_BACKREF = 1 << 15;
        /// `[]` never matches and `[^]` matches any character.
        const ALLOW_EMPTY_CLASS   = 1 << 16;
        /// Reject `(*UTF)` at the start of the pattern.
        const NEVER_UTF           = 1 << 17;
        /// Skip UTF validation of the pattern.
        const NO_UTF_CHECK        = 1 << 18;
    }
}

bitflags! {
    /// Options for one match call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MatchOptions: u32 {
        /// Match only at the start offset.
        const ANCHORED         = 1 << 0;
        /// The match must end at the end of the subject.
        const ENDANCHORED      = 1 << 1;
        /// The start of the subject is not the start of a line.
        const NOTBOL           = 1 << 2;
        /// The end of the subject is not the end of a line.
        const NOTEOL           = 1 << 3;
        /// An empty string is not a valid match.
        const NOTEMPTY         = 1 << 4;
        /// An empty string at the start offset is not a valid match.
        const NOTEMPTY_ATSTART = 1 << 5;
        /// Use the interpreter even if native code exists.
        const NO_JIT           = 1 << 6;
        /// The subject is known to be valid UTF.
        const NO_UTF_CHECK     = 1 << 7;
    }
}

/// Which character sequences count as a newline for `^`, `$` and `.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Newline {
    Cr,
    #[default]
    Lf,
    CrLf,
    /// Any Unicode newline: CR, LF, CRLF, VT, FF, NEL, LS, PS.
    Any,
    /// CR, LF or CRLF.
    AnyCrLf,
    Nul,
}

/// Width, in bytes, of jump offsets in the encoded program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkSize {
    Two,
    Three,
    Four,
}

impl LinkSize {
    /// The link size selected by the `link-size-*` features.
    pub const fn build_default() -> LinkSize {
        if cfg!(feature = "link-size-4") {
            LinkSize::Four
        } else if cfg!(feature = "link-size-3") {
            LinkSize::Three
        } else {
            LinkSize::Two
        }
    }

    pub fn bytes(self) -> u32 {
        match self {
            LinkSize::Two => 2,
            LinkSize::Three => 3,
            LinkSize::Four => 4,
        }
    }

    pub fn from_bytes(n: u32) -> Option<LinkSize> {
        match n {
            2 => Some(LinkSize::Two),
            3 => Some(LinkSize::Three),
            4 => Some(LinkSize::Four),
            _ => None,
        }
    }
}

impl Default for LinkSize {
    fn default() -> Self {
        LinkSize::build_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_size_bytes() {
        assert_eq!(LinkSize::from_bytes(3), Some(LinkSize::Three));
        assert_eq!(LinkSize::from_bytes(5), None);
        assert_eq!(LinkSize::Four.bytes(), 4);
    }

    #[test]
    fn flags_compose() {
        let f = CompileFlags::CASELESS | CompileFlags::UTF;
        assert!(f.contains(CompileFlags::UTF));
        assert!(!f.contains(CompileFlags::DOTALL));
        assert_eq!(Newline::default(), Newline::Lf);
    }
}
