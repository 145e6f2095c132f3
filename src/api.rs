// api.rs - Idiomatic Rust API for pcrs.
//
// Wraps `Pattern`, the interpreter and the native back end with owned,
// borrow-friendly types: Regex, RegexBuilder, Match, Captures, FindIter.

use std::fmt;
use std::ops::Range;

use crate::error::{MatchError, RegexError};
use crate::options::{CompileFlags, LinkSize, MatchOptions, Newline};
use crate::regcomp::{compile_pattern, CompileOptions};
use crate::regenc::{encode_str, CodeUnit};
use crate::regexec::{CaptureResult, MatchContext, Matcher};
use crate::regint::Pattern;
use crate::regjit::{jit_compile, CompiledNative};

/// A compiled regular expression over code units `C`.
///
/// # Examples
///
/// ```
/// use pcrs::api::Regex;
///
/// let re = Regex::new(r"\d+").unwrap();
/// assert!(re.is_match("hello 42"));
///
/// let m = re.find("hello 42").unwrap();
/// assert_eq!(m.as_str(), Some("42"));
/// assert_eq!(m.start(), 6);
/// assert_eq!(m.end(), 8);
/// ```
pub struct Regex<C: CodeUnit = u8> {
    pattern: Pattern<C>,
    native: Option<CompiledNative<C>>,
    context: MatchContext,
    options: MatchOptions,
}

impl Regex<u8> {
    /// Compile a pattern with default options. UTF mode is on when the
    /// `unicode` feature is built.
    pub fn new(pattern: &str) -> Result<Regex, RegexError> {
        RegexBuilder::new(pattern).build()
    }

    /// Compile a byte pattern; each byte is one character.
    pub fn new_bytes(pattern: &[u8]) -> Result<Regex, RegexError> {
        RegexBuilder::from_bytes(pattern).build()
    }

    /// Create a [`RegexBuilder`] for fine-grained control over compilation.
    pub fn builder(pattern: &str) -> RegexBuilder {
        RegexBuilder::new(pattern)
    }
}

impl<C: CodeUnit> Regex<C> {
    /// Wrap an already compiled pattern, attaching native code if possible.
    pub fn from_pattern(pattern: Pattern<C>) -> Self {
        let native = jit_compile(&pattern).ok();
        Regex { pattern, native, context: MatchContext::new(), options: MatchOptions::empty() }
    }

    /// Return the first match in `text`, or `None`.
    ///
    /// Match errors such as an exhausted step budget read as no match; use
    /// [`Regex::try_find`] to see them.
    pub fn find<'t, T: AsRef<[C]> + ?Sized>(&self, text: &'t T) -> Option<Match<'t, C>> {
        self.find_at(text, 0)
    }

    /// Return the first match starting the search at unit offset `start`.
    ///
    /// Lookbehinds and `\b` still see the text before `start`.
    pub fn find_at<'t, T: AsRef<[C]> + ?Sized>(&self, text: &'t T, start: usize) -> Option<Match<'t, C>> {
        self.try_find_at(text, start).ok().flatten()
    }

    pub fn try_find<'t, T: AsRef<[C]> + ?Sized>(&self, text: &'t T) -> Result<Option<Match<'t, C>>, RegexError> {
        self.try_find_at(text, 0)
    }

    pub fn try_find_at<'t, T: AsRef<[C]> + ?Sized>(
        &self,
        text: &'t T,
        start: usize,
    ) -> Result<Option<Match<'t, C>>, RegexError> {
        let text = text.as_ref();
        let found = self.exec(text, start, MatchOptions::empty())?;
        Ok(found.map(|r| Match { text, start: r.start(), end: r.end() }))
    }

    /// Check whether `text` matches anywhere.
    pub fn is_match<T: AsRef<[C]> + ?Sized>(&self, text: &T) -> bool {
        matches!(self.exec(text.as_ref(), 0, MatchOptions::empty()), Ok(Some(_)))
    }

    /// Return the first match with all capture groups, or `None`.
    pub fn captures<'t, T: AsRef<[C]> + ?Sized>(&self, text: &'t T) -> Option<Captures<'t, C>> {
        self.try_captures(text).ok().flatten()
    }

    pub fn try_captures<'t, T: AsRef<[C]> + ?Sized>(&self, text: &'t T) -> Result<Option<Captures<'t, C>>, RegexError> {
        let text = text.as_ref();
        let found = self.exec(text, 0, MatchOptions::empty())?;
        Ok(found.map(|result| Captures { text, result, pattern: self.pattern.clone() }))
    }

    /// Iterate over all non-overlapping matches in `text`.
    ///
    /// The iteration stops at the first match error.
    pub fn find_iter<'r, 't, T: AsRef<[C]> + ?Sized>(&'r self, text: &'t T) -> FindIter<'r, 't, C> {
        FindIter { searcher: Searcher::new(self, text.as_ref()) }
    }

    /// Iterate over the captures of all non-overlapping matches in `text`.
    pub fn captures_iter<'r, 't, T: AsRef<[C]> + ?Sized>(&'r self, text: &'t T) -> CaptureMatches<'r, 't, C> {
        CaptureMatches { searcher: Searcher::new(self, text.as_ref()) }
    }

    /// Number of capture groups in the pattern, excluding group 0.
    pub fn captures_len(&self) -> usize {
        self.pattern.capture_count() as usize
    }

    /// Whether matching runs native code.
    pub fn is_jit(&self) -> bool {
        self.native.is_some() && !self.options.contains(MatchOptions::NO_JIT)
    }

    pub fn pattern(&self) -> &Pattern<C> {
        &self.pattern
    }

    /// One search with a fresh copy of the configured context.
    fn exec(&self, text: &[C], start: usize, extra: MatchOptions) -> Result<Option<CaptureResult>, MatchError> {
        let opts = self.options | extra;
        let mut ctx = self.context.clone();
        match &self.native {
            Some(native) if !opts.contains(MatchOptions::NO_JIT) => native.exec(text, start, opts, &mut ctx),
            _ => self.pattern.exec(text, start, opts, &mut ctx),
        }
    }

    /// Units to step over when an empty match cannot be extended.
    fn advance(&self, text: &[C], pos: usize) -> usize {
        let inner = &self.pattern.inner;
        let crlf_newline = matches!(inner.newline, Newline::CrLf | Newline::Any | Newline::AnyCrLf);
        if crlf_newline
            && pos + 1 < text.len()
            && text[pos].to_u32() == u32::from(b'\r')
            && text[pos + 1].to_u32() == u32::from(b'\n')
        {
            return 2;
        }
        C::decode(text, pos, self.pattern.is_utf()).1.max(1)
    }
}

impl<C: CodeUnit> Clone for Regex<C> {
    fn clone(&self) -> Self {
        let native = if self.native.is_some() { jit_compile(&self.pattern).ok() } else { None };
        Regex { pattern: self.pattern.clone(), native, context: self.context.clone(), options: self.options }
    }
}

impl<C: CodeUnit> fmt::Debug for Regex<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Regex")
            .field("pattern", &self.pattern)
            .field("jit", &self.is_jit())
            .finish_non_exhaustive()
    }
}

// === RegexBuilder ===

#[derive(Debug, Clone)]
enum Source {
    Text(String),
    Bytes(Vec<u8>),
}

/// Builder for compiling a [`Regex`] with custom options.
///
/// # Examples
///
/// ```
/// use pcrs::api::Regex;
///
/// let re = Regex::builder(r"hello world")
///     .case_insensitive(true)
///     .build()
///     .unwrap();
/// assert!(re.is_match("Hello World"));
/// ```
#[derive(Debug, Clone)]
pub struct RegexBuilder {
    source: Source,
    compile: CompileOptions,
    jit: bool,
    context: MatchContext,
    options: MatchOptions,
}

impl RegexBuilder {
    /// Create a builder for a text pattern, in UTF mode when built with
    /// `unicode`.
    pub fn new(pattern: &str) -> Self {
        let mut flags = CompileFlags::empty();
        if cfg!(feature = "unicode") {
            flags |= CompileFlags::UTF;
        }
        RegexBuilder::with_source(Source::Text(pattern.to_owned()), flags)
    }

    /// Create a builder for a byte pattern, one character per byte.
    pub fn from_bytes(pattern: &[u8]) -> Self {
        RegexBuilder::with_source(Source::Bytes(pattern.to_vec()), CompileFlags::empty())
    }

    fn with_source(source: Source, flags: CompileFlags) -> Self {
        RegexBuilder {
            source,
            compile: CompileOptions::new(flags),
            jit: true,
            context: MatchContext::new(),
            options: MatchOptions::empty(),
        }
    }

    /// Set or clear any compile flag.
    pub fn flag(mut self, flag: CompileFlags, yes: bool) -> Self {
        self.compile.flags.set(flag, yes);
        self
    }

    /// Enable or disable case-insensitive matching.
    pub fn case_insensitive(self, yes: bool) -> Self {
        self.flag(CompileFlags::CASELESS, yes)
    }

    /// Enable or disable `^`/`$` matching at every line boundary.
    pub fn multi_line(self, yes: bool) -> Self {
        self.flag(CompileFlags::MULTILINE, yes)
    }

    /// Enable or disable `.` matching newlines.
    pub fn dot_matches_newline(self, yes: bool) -> Self {
        self.flag(CompileFlags::DOTALL, yes)
    }

    /// Enable or disable extended mode (whitespace and `#` comments ignored).
    pub fn extended(self, yes: bool) -> Self {
        self.flag(CompileFlags::EXTENDED, yes)
    }

    pub fn extended_more(self, yes: bool) -> Self {
        self.flag(CompileFlags::EXTENDED_MORE, yes)
    }

    pub fn utf(self, yes: bool) -> Self {
        self.flag(CompileFlags::UTF, yes)
    }

    pub fn ucp(self, yes: bool) -> Self {
        self.flag(CompileFlags::UCP, yes)
    }

    pub fn ungreedy(self, yes: bool) -> Self {
        self.flag(CompileFlags::UNGREEDY, yes)
    }

    pub fn no_auto_capture(self, yes: bool) -> Self {
        self.flag(CompileFlags::NO_AUTO_CAPTURE, yes)
    }

    pub fn literal(self, yes: bool) -> Self {
        self.flag(CompileFlags::LITERAL, yes)
    }

    pub fn dupnames(self, yes: bool) -> Self {
        self.flag(CompileFlags::DUPNAMES, yes)
    }

    pub fn anchored(self, yes: bool) -> Self {
        self.flag(CompileFlags::ANCHORED, yes)
    }

    pub fn newline(mut self, newline: Newline) -> Self {
        self.compile.newline = Some(newline);
        self
    }

    pub fn link_size(mut self, link_size: LinkSize) -> Self {
        self.compile.link_size = link_size;
        self
    }

    /// Maximum parenthesis nesting for this pattern.
    pub fn parse_depth(mut self, depth: u32) -> Self {
        self.compile.parse_depth = Some(depth);
        self
    }

    /// Use native code when it can be generated (default: yes).
    pub fn jit(mut self, yes: bool) -> Self {
        self.jit = yes;
        self
    }

    pub fn match_limit(mut self, n: u32) -> Self {
        self.context.match_limit = n;
        self
    }

    pub fn depth_limit(mut self, n: u32) -> Self {
        self.context.depth_limit = n;
        self
    }

    /// Backtracking memory limit in KiB.
    pub fn heap_limit(mut self, kib: u32) -> Self {
        self.context.heap_limit = kib;
        self
    }

    pub fn offset_limit(mut self, offset: usize) -> Self {
        self.context.offset_limit = Some(offset);
        self
    }

    /// Options added to every search, e.g. `NOTBOL` or `NO_JIT`.
    pub fn match_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Compile the pattern into a [`Regex`] over bytes.
    pub fn build(&self) -> Result<Regex, RegexError> {
        self.build_for::<u8>()
    }

    /// Compile the pattern for code units of type `C`.
    pub fn build_for<C: CodeUnit>(&self) -> Result<Regex<C>, RegexError> {
        let units: Vec<C> = match &self.source {
            Source::Text(s) => encode_str(s),
            Source::Bytes(b) => b.iter().map(|&b| C::from_u32(u32::from(b))).collect(),
        };
        let pattern = compile_pattern(&units, &self.compile)?;
        let native = if self.jit { jit_compile(&pattern).ok() } else { None };
        Ok(Regex { pattern, native, context: self.context.clone(), options: self.options })
    }
}

// === Match ===

/// A single match, referencing the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t, C: CodeUnit = u8> {
    text: &'t [C],
    start: usize,
    end: usize,
}

impl<'t, C: CodeUnit> Match<'t, C> {
    /// Unit offset of the start of the match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Unit offset of the end of the match (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The matched units.
    pub fn as_units(&self) -> &'t [C] {
        &self.text[self.start..self.end]
    }

    /// Length of the match in code units.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl<'t> Match<'t, u8> {
    pub fn as_bytes(&self) -> &'t [u8] {
        self.as_units()
    }

    /// The matched text, or `None` if it is not valid UTF-8 (possible only
    /// for patterns compiled without UTF mode).
    pub fn as_str(&self) -> Option<&'t str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }
}

// === Captures ===

/// All capture groups from a single match.
///
/// Group 0 is the entire match. Groups 1..N correspond to `(...)` in the pattern.
pub struct Captures<'t, C: CodeUnit = u8> {
    text: &'t [C],
    result: CaptureResult,
    pattern: Pattern<C>,
}

impl<'t, C: CodeUnit> Captures<'t, C> {
    /// Get capture group `i`, or `None` if the group did not participate.
    pub fn get(&self, i: usize) -> Option<Match<'t, C>> {
        let r = self.result.get(i)?;
        Some(Match { text: self.text, start: r.start, end: r.end })
    }

    /// Get the first set group with the given name, or `None`.
    pub fn name(&self, name: &str) -> Option<Match<'t, C>> {
        self.pattern
            .group_numbers(name)
            .into_iter()
            .find_map(|g| self.get(g as usize))
    }

    /// Number of groups, including group 0.
    pub fn len(&self) -> usize {
        self.result.group_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Where the successful attempt started; differs from `get(0)` after `\K`.
    pub fn attempt_start(&self) -> usize {
        self.result.attempt_start()
    }

    /// Name of the last `(*MARK)` on the matching path.
    pub fn mark(&self) -> Option<&str> {
        self.result.mark()
    }

    pub fn iter(&self) -> CapturesIter<'_, 't, C> {
        CapturesIter { captures: self, index: 0 }
    }

    /// The raw offset vector.
    pub fn result(&self) -> &CaptureResult {
        &self.result
    }
}

impl<C: CodeUnit> fmt::Debug for Captures<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for i in 0..self.len() {
            list.entry(&self.get(i).map(|m| m.range()));
        }
        list.finish()
    }
}

// === CapturesIter ===

/// Iterator over the groups of one [`Captures`].
pub struct CapturesIter<'c, 't, C: CodeUnit> {
    captures: &'c Captures<'t, C>,
    index: usize,
}

impl<'t, C: CodeUnit> Iterator for CapturesIter<'_, 't, C> {
    type Item = Option<Match<'t, C>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.captures.len() {
            return None;
        }
        let m = self.captures.get(self.index);
        self.index += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.captures.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<C: CodeUnit> ExactSizeIterator for CapturesIter<'_, '_, C> {}

// === Iteration ===

/// Successive searches over one text.
///
/// After an empty match the next search is tried at the same offset with
/// `NOTEMPTY_ATSTART | ANCHORED`; only if that fails does it advance one
/// character (two for CRLF under a CRLF-aware newline convention).
struct Searcher<'r, 't, C: CodeUnit> {
    regex: &'r Regex<C>,
    text: &'t [C],
    pos: usize,
    after_empty: bool,
    checked: bool,
    done: bool,
}

impl<'r, 't, C: CodeUnit> Searcher<'r, 't, C> {
    fn new(regex: &'r Regex<C>, text: &'t [C]) -> Self {
        Searcher { regex, text, pos: 0, after_empty: false, checked: false, done: false }
    }

    fn next_result(&mut self) -> Option<CaptureResult> {
        while !self.done {
            let mut extra = MatchOptions::empty();
            if self.after_empty {
                extra |= MatchOptions::NOTEMPTY_ATSTART | MatchOptions::ANCHORED;
            }
            if self.checked {
                extra |= MatchOptions::NO_UTF_CHECK;
            }
            match self.regex.exec(self.text, self.pos, extra) {
                Ok(Some(result)) => {
                    self.checked = true;
                    self.after_empty = result.start() == result.end();
                    self.pos = result.end().max(self.pos);
                    return Some(result);
                }
                Ok(None) if self.after_empty && self.pos < self.text.len() => {
                    self.checked = true;
                    self.after_empty = false;
                    self.pos += self.regex.advance(self.text, self.pos);
                }
                _ => self.done = true,
            }
        }
        None
    }
}

/// Iterator over all non-overlapping matches in a text.
pub struct FindIter<'r, 't, C: CodeUnit = u8> {
    searcher: Searcher<'r, 't, C>,
}

impl<'t, C: CodeUnit> Iterator for FindIter<'_, 't, C> {
    type Item = Match<'t, C>;

    fn next(&mut self) -> Option<Match<'t, C>> {
        let r = self.searcher.next_result()?;
        Some(Match { text: self.searcher.text, start: r.start(), end: r.end() })
    }
}

/// Iterator over the captures of all non-overlapping matches.
pub struct CaptureMatches<'r, 't, C: CodeUnit = u8> {
    searcher: Searcher<'r, 't, C>,
}

impl<'t, C: CodeUnit> Iterator for CaptureMatches<'_, 't, C> {
    type Item = Captures<'t, C>;

    fn next(&mut self) -> Option<Captures<'t, C>> {
        let result = self.searcher.next_result()?;
        Some(Captures { text: self.searcher.text, result, pattern: self.searcher.regex.pattern.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Limit;

    #[test]
    fn regex_new_and_find() {
        let re = Regex::new(r"\d+").unwrap();
        let m = re.find("hello 42 world").unwrap();
        assert_eq!(m.as_str(), Some("42"));
        assert_eq!(m.start(), 6);
        assert_eq!(m.end(), 8);
        assert_eq!(m.range(), 6..8);
        assert_eq!(m.len(), 2);
        assert!(!m.is_empty());
    }

    #[test]
    fn regex_no_match() {
        let re = Regex::new(r"\d+").unwrap();
        assert!(re.find("no digits here").is_none());
        assert_eq!(re.try_find("no digits").unwrap(), None);
    }

    #[test]
    fn regex_captures() {
        let re = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
        let caps = re.captures("date: 2026-02-14").unwrap();
        assert_eq!(caps.get(0).unwrap().as_str(), Some("2026-02-14"));
        assert_eq!(caps.get(1).unwrap().as_str(), Some("2026"));
        assert_eq!(caps.get(3).unwrap().as_str(), Some("14"));
        assert!(caps.get(4).is_none());
        assert_eq!(caps.len(), 4);
        assert_eq!(re.captures_len(), 3);
    }

    #[test]
    fn captures_iter_groups() {
        let re = Regex::new(r"(a)(b)?").unwrap();
        let caps = re.captures("a").unwrap();
        let items: Vec<_> = caps.iter().collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_some());
        assert!(items[1].is_some());
        assert!(items[2].is_none());
    }

    #[test]
    fn named_captures() {
        let re = Regex::new(r"(?<year>\d{4})-(?<month>\d{2})").unwrap();
        let caps = re.captures("2026-02").unwrap();
        assert_eq!(caps.name("year").unwrap().as_str(), Some("2026"));
        assert_eq!(caps.name("month").unwrap().as_str(), Some("02"));
        assert!(caps.name("day").is_none());
        assert_eq!(re.pattern().group_number("year"), Some(1));
    }

    #[test]
    fn find_iter_and_empty_matches() {
        let re = Regex::new(r"\d+").unwrap();
        let all: Vec<_> = re.find_iter("1 + 22 = 333").filter_map(|m| m.as_str()).collect();
        assert_eq!(all, vec!["1", "22", "333"]);

        let re = Regex::new("").unwrap();
        let starts: Vec<_> = re.find_iter("ab").map(|m| m.start()).collect();
        assert_eq!(starts, vec![0, 1, 2]);

        let re = Regex::new("a*").unwrap();
        let spans: Vec<_> = re.find_iter("baaa").map(|m| m.range()).collect();
        assert_eq!(spans, vec![0..0, 1..4, 4..4]);
    }

    #[test]
    fn empty_match_steps_over_characters() {
        let re = Regex::new("x*").unwrap();
        let starts: Vec<_> = re.find_iter("é.").map(|m| m.start()).collect();
        assert_eq!(starts, vec![0, 2, 3]);

        let re = Regex::builder("").newline(Newline::CrLf).build().unwrap();
        let starts: Vec<_> = re.find_iter("a\r\nb").map(|m| m.start()).collect();
        assert_eq!(starts, vec![0, 1, 3, 4]);
    }

    #[test]
    fn captures_iter_matches() {
        let re = Regex::new(r"(\w)=(\d)").unwrap();
        let pairs: Vec<(String, String)> = re
            .captures_iter("a=1, b=2")
            .map(|c| {
                let k = c.get(1).and_then(|m| m.as_str()).unwrap_or("").to_owned();
                let v = c.get(2).and_then(|m| m.as_str()).unwrap_or("").to_owned();
                (k, v)
            })
            .collect();
        assert_eq!(pairs, vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
    }

    #[test]
    fn find_at_sees_context() {
        let re = Regex::new(r"\bcat").unwrap();
        assert_eq!(re.find_at("concat cat", 3).map(|m| m.start()), Some(7));
        let re = Regex::new(r"(?<=a)b").unwrap();
        assert_eq!(re.find_at("ab", 1).map(|m| m.range()), Some(1..2));
    }

    #[test]
    fn builder_options() {
        let re = Regex::builder("hello").case_insensitive(true).build().unwrap();
        assert!(re.is_match("HELLO"));
        let re = Regex::builder("^b$").multi_line(true).build().unwrap();
        assert!(re.is_match("a\nb\nc"));
        let re = Regex::builder("a.c").dot_matches_newline(true).build().unwrap();
        assert!(re.is_match("a\nc"));
        let re = Regex::builder("a+").ungreedy(true).build().unwrap();
        assert_eq!(re.find("aaa").map(|m| m.len()), Some(1));
        let re = Regex::builder("a.b").literal(true).build().unwrap();
        assert!(!re.is_match("axb"));
        assert!(re.is_match("a.b"));
        let re = Regex::builder("a b # comment").extended(true).build().unwrap();
        assert!(re.is_match("ab"));
    }

    #[test]
    fn builder_limits() {
        let re = Regex::builder("(a+)+b").match_limit(1000).build().unwrap();
        let subject = "a".repeat(30);
        let err = re.try_find(subject.as_str()).unwrap_err();
        assert_eq!(err, RegexError::Match(MatchError::ResourceExhausted(Limit::Match)));
        assert!(re.find(subject.as_str()).is_none());
    }

    #[test]
    fn byte_patterns() {
        let re = Regex::new_bytes(b"\xff+").unwrap();
        let m = re.find(&b"a\xff\xffb"[..]).unwrap();
        assert_eq!(m.range(), 1..3);
        assert_eq!(m.as_str(), None);
    }

    #[cfg(feature = "unit16")]
    #[test]
    fn wide_regex() {
        let re = RegexBuilder::new(r"(\w+)@").build_for::<u16>().unwrap();
        let text: Vec<u16> = "mail: bob@example".encode_utf16().collect();
        let caps = re.captures(&text).unwrap();
        assert_eq!(caps.get(1).map(|m| m.range()), Some(6..9));
    }

    #[test]
    fn jit_preference() {
        let re = Regex::builder("abc").jit(false).build().unwrap();
        assert!(!re.is_jit());
        let re = Regex::builder("abc").match_options(MatchOptions::NO_JIT).build().unwrap();
        assert!(!re.is_jit());
        assert!(re.is_match("xabc"));
        if !cfg!(feature = "jit") {
            assert!(!Regex::new("abc").unwrap().is_jit());
        }
    }

    #[test]
    fn invalid_pattern() {
        let err = Regex::new(r"(unclosed").unwrap_err();
        assert!(matches!(err, RegexError::Parse(_)));
    }
}
