// regparse.rs - Pattern parser.
// Recursive descent over decoded code points: alternation, concatenation,
// quantified atom. Produces a `Node` tree plus `ParseInfo`; names are
// resolved after the whole pattern has been read.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{ParseError, ParseErrorKind as K};
use crate::options::{CompileFlags, Newline};
use crate::regenc::{decode_all, CodeUnit, MAX_UNICODE};
use crate::regparse_types::*;
use crate::unicode::{self, PosixClass};

// === Limits ===

const DEFAULT_PARSE_DEPTH_LIMIT: u32 = 250;
const MAX_REPEAT: u32 = 65535;
const MAX_GROUPS: u32 = 65535;
const MAX_NAME_LEN: usize = 32;

static PARSE_DEPTH_LIMIT: AtomicU32 = AtomicU32::new(DEFAULT_PARSE_DEPTH_LIMIT);

/// Maximum parenthesis nesting accepted by the parser.
pub fn get_parse_depth_limit() -> u32 {
    PARSE_DEPTH_LIMIT.load(Ordering::Relaxed)
}

/// Set the process-wide nesting limit. Zero restores the default.
pub fn set_parse_depth_limit(depth: u32) {
    let depth = if depth == 0 { DEFAULT_PARSE_DEPTH_LIMIT } else { depth };
    PARSE_DEPTH_LIMIT.store(depth, Ordering::Relaxed);
}

// === Entry point ===

/// Parse `pattern` into a tree.
///
/// `depth_limit` overrides the global nesting limit for this call.
pub fn parse<C: CodeUnit>(
    pattern: &[C],
    flags: CompileFlags,
    depth_limit: Option<u32>,
) -> Result<(Node, ParseInfo), ParseError> {
    let mut info = ParseInfo {
        flags,
        ..ParseInfo::default()
    };

    let start = if flags.contains(CompileFlags::LITERAL) {
        0
    } else {
        let raw: Vec<u32> = pattern.iter().map(|u| u.to_u32()).collect();
        leading_verbs(&raw, &mut info)?
    };

    let flags = info.flags;
    let utf = flags.contains(CompileFlags::UTF);
    if utf && flags.contains(CompileFlags::NEVER_UTF) {
        return Err(ParseError::new(K::UtfDisallowed, 0));
    }
    if (utf || flags.contains(CompileFlags::UCP)) && !cfg!(feature = "unicode") {
        return Err(ParseError::new(K::UnicodeNotSupported, 0));
    }
    if utf && !flags.contains(CompileFlags::NO_UTF_CHECK) {
        C::validate(pattern).map_err(|off| ParseError::new(K::InvalidUtf, off))?;
    }

    let (cps, offs) = decode_all(&pattern[start..], utf);
    let offs: Vec<usize> = offs.into_iter().map(|o| o + start).collect();

    if flags.contains(CompileFlags::LITERAL) {
        let caseless = flags.contains(CompileFlags::CASELESS);
        let node = Node::concat(
            cps.iter()
                .map(|&cp| Node::Char { cp, caseless })
                .collect(),
        );
        return Ok((node, info));
    }

    let mut p = Parser {
        total_groups: count_groups(&cps, flags),
        cps,
        offs,
        pos: 0,
        flags,
        utf,
        ucp: flags.contains(CompileFlags::UCP),
        max_cp: if utf { MAX_UNICODE } else { C::MAX_RAW },
        capture_count: 0,
        names: Vec::new(),
        depth: 0,
        depth_limit: depth_limit.unwrap_or_else(get_parse_depth_limit),
        look_depth: 0,
        in_quote: false,
        has_recursion: false,
        forward_refs: Vec::new(),
        named_backrefs: Vec::new(),
        marks: Vec::new(),
    };
    let node = p.parse_alternation(false)?;
    if p.pos < p.cps.len() {
        // Only an unbalanced ')' stops the top level early.
        return Err(p.err(K::UnmatchedClosingParenthesis));
    }
    p.finish(node, info)
}

/// Consume `(*UTF)`, `(*LIMIT_MATCH=n)` and friends at the start of the
/// pattern. Returns the unit offset where the pattern proper begins.
fn leading_verbs(raw: &[u32], info: &mut ParseInfo) -> Result<usize, ParseError> {
    let mut pos = 0;
    while raw.get(pos) == Some(&('(' as u32)) && raw.get(pos + 1) == Some(&('*' as u32)) {
        let close = match raw[pos + 2..].iter().position(|&c| c == ')' as u32) {
            Some(i) => pos + 2 + i,
            None => break,
        };
        let text: String = raw[pos + 2..close]
            .iter()
            .map(|&c| char::from_u32(c).unwrap_or('\u{fffd}'))
            .collect();
        let (name, value) = match text.split_once('=') {
            Some((n, v)) => (n, Some(v)),
            None => (text.as_str(), None),
        };

        match (name, value) {
            ("UTF", None) => {
                if info.flags.contains(CompileFlags::NEVER_UTF) {
                    return Err(ParseError::new(K::UtfDisallowed, pos));
                }
                info.flags |= CompileFlags::UTF;
            }
            ("UCP", None) => info.flags |= CompileFlags::UCP,
            ("NO_START_OPT", None) => info.flags |= CompileFlags::NO_START_OPTIMIZE,
            ("NO_AUTO_POSSESS" | "NO_DOTSTAR_ANCHOR", None) => {}
            ("CR", None) => info.newline = Some(Newline::Cr),
            ("LF", None) => info.newline = Some(Newline::Lf),
            ("CRLF", None) => info.newline = Some(Newline::CrLf),
            ("ANY", None) => info.newline = Some(Newline::Any),
            ("ANYCRLF", None) => info.newline = Some(Newline::AnyCrLf),
            ("NUL", None) => info.newline = Some(Newline::Nul),
            ("BSR_ANYCRLF", None) => info.bsr_anycrlf = true,
            ("BSR_UNICODE", None) => info.bsr_anycrlf = false,
            ("LIMIT_MATCH" | "LIMIT_DEPTH" | "LIMIT_RECURSION" | "LIMIT_HEAP", Some(v)) => {
                let n = parse_limit(v).ok_or_else(|| ParseError::new(K::UnknownVerb, pos))?;
                let slot = match name {
                    "LIMIT_MATCH" => &mut info.match_limit,
                    "LIMIT_HEAP" => &mut info.heap_limit,
                    _ => &mut info.depth_limit,
                };
                *slot = Some(slot.map_or(n, |old| old.min(n)));
            }
            _ => break,
        }
        pos = close + 1;
    }
    Ok(pos)
}

fn parse_limit(v: &str) -> Option<u32> {
    if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    v.parse().ok()
}

/// Count capturing groups ahead of time, so `\10` can be told apart from an
/// octal escape before group 10 has been seen.
fn count_groups(cps: &[u32], flags: CompileFlags) -> u32 {
    let at = |i: usize| cps.get(i).copied().unwrap_or(0);
    let no_auto = flags.contains(CompileFlags::NO_AUTO_CAPTURE);
    let mut count = 0;
    let mut i = 0;
    let mut in_class = false;
    while i < cps.len() {
        let c = cps[i];
        if c == '\\' as u32 {
            i += 2;
            continue;
        }
        if in_class {
            if c == ']' as u32 {
                in_class = false;
            }
        } else if c == '[' as u32 {
            in_class = true;
            if at(i + 1) == '^' as u32 {
                i += 1;
            }
            if at(i + 1) == ']' as u32 {
                i += 1;
            }
        } else if c == '(' as u32 {
            let n1 = at(i + 1);
            if n1 == '?' as u32 {
                let n2 = at(i + 2);
                let named = n2 == '\'' as u32
                    || (n2 == '<' as u32 && at(i + 3) != '=' as u32 && at(i + 3) != '!' as u32)
                    || (n2 == 'P' as u32 && at(i + 3) == '<' as u32);
                if named {
                    count += 1;
                }
            } else if n1 != '*' as u32 && !no_auto {
                count += 1;
            }
        }
        i += 1;
    }
    count
}

fn ch(cp: u32) -> char {
    char::from_u32(cp).unwrap_or('\u{fffd}')
}

fn is_pattern_space(cp: u32, utf: bool) -> bool {
    matches!(cp, 0x09..=0x0d | 0x20)
        || (utf && matches!(cp, 0x85 | 0x200e | 0x200f | 0x2028 | 0x2029))
}

fn hex_value(cp: u32) -> Option<u32> {
    ch(cp).to_digit(16)
}

fn octal_value(cp: u32) -> Option<u32> {
    ch(cp).to_digit(8)
}

enum RefSpec {
    Abs(u32),
    Rel(i64),
    Name(String),
}

enum ClassAtom {
    Char(u32),
    Item(ClassItem),
    /// `\Q` or `\E`: nothing to add.
    Skip,
}

// === Parser state ===

struct Parser {
    cps: Vec<u32>,
    /// Unit offset of each code point, plus the pattern length.
    offs: Vec<usize>,
    pos: usize,
    /// Current option set, changed by `(?i)` and friends.
    flags: CompileFlags,
    utf: bool,
    ucp: bool,
    max_cp: u32,
    capture_count: u32,
    total_groups: u32,
    names: Vec<NameEntry>,
    depth: u32,
    depth_limit: u32,
    look_depth: u32,
    in_quote: bool,
    has_recursion: bool,
    forward_refs: Vec<(u32, usize)>,
    /// Named back-references: (name, offset, groups opened at that point).
    named_backrefs: Vec<(String, usize, u32)>,
    marks: Vec<String>,
}

impl Parser {
    // --- cursor ---

    fn peek(&self) -> Option<u32> {
        self.cps.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u32> {
        self.cps.get(self.pos + n).copied()
    }

    fn is(&self, c: char) -> bool {
        self.peek() == Some(c as u32)
    }

    fn is_at(&self, n: usize, c: char) -> bool {
        self.peek_at(n) == Some(c as u32)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.is(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn next(&mut self) -> Option<u32> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn err(&self, kind: K) -> ParseError {
        self.err_at(kind, self.pos)
    }

    fn err_at(&self, kind: K, idx: usize) -> ParseError {
        let idx = idx.min(self.cps.len());
        ParseError::new(kind, self.offs[idx])
    }

    fn caseless(&self) -> bool {
        self.flags.contains(CompileFlags::CASELESS)
    }

    fn skip_extended(&mut self) {
        if !self.flags.contains(CompileFlags::EXTENDED) || self.in_quote {
            return;
        }
        while let Some(c) = self.peek() {
            if is_pattern_space(c, self.utf) {
                self.pos += 1;
            } else if c == '#' as u32 {
                while let Some(c) = self.next() {
                    if c == '\n' as u32 || c == '\r' as u32 {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_decimal(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut v: u32 = 0;
        while let Some(d) = self.peek().and_then(|c| ch(c).to_digit(10)) {
            v = v.saturating_mul(10).saturating_add(d);
            self.pos += 1;
        }
        (self.pos > start).then_some(v)
    }

    fn check_cp(&self, cp: u32, start: usize) -> Result<u32, ParseError> {
        if cp > self.max_cp || (self.utf && (0xd800..=0xdfff).contains(&cp)) {
            return Err(self.err_at(K::CodePointTooLarge, start));
        }
        Ok(cp)
    }

    // --- structure ---

    fn parse_alternation(&mut self, branch_reset: bool) -> Result<Node, ParseError> {
        let saved = self.flags;
        let base = self.capture_count;
        let mut high = base;
        let mut branches = Vec::new();
        loop {
            if branch_reset {
                self.capture_count = base;
            }
            branches.push(self.parse_concat()?);
            high = high.max(self.capture_count);
            if !self.eat('|') {
                break;
            }
        }
        if branch_reset {
            self.capture_count = high;
        }
        self.flags = saved;
        Ok(Node::alternation(branches))
    }

    fn parse_concat(&mut self) -> Result<Node, ParseError> {
        let mut items: Vec<Node> = Vec::new();
        let mut repeatable = false;
        loop {
            if self.in_quote {
                if self.is('\\') && self.is_at(1, 'E') {
                    self.pos += 2;
                    self.in_quote = false;
                    continue;
                }
                match self.next() {
                    Some(cp) => {
                        items.push(Node::Char { cp, caseless: self.caseless() });
                        repeatable = true;
                        continue;
                    }
                    None => break,
                }
            }

            self.skip_extended();
            let c = match self.peek() {
                Some(c) => c,
                None => break,
            };
            if c == '|' as u32 || c == ')' as u32 {
                break;
            }

            let qstart = self.pos;
            if let Some((min, max, kind)) = self.try_quantifier()? {
                let body = match items.pop() {
                    Some(body) if repeatable => body,
                    _ => return Err(self.err_at(K::NothingToRepeat, qstart)),
                };
                items.push(Node::Repeat { min, max, kind, body: Box::new(body) });
                repeatable = false;
                continue;
            }

            if c == '\\' as u32 && self.is_at(1, 'Q') {
                self.pos += 2;
                self.in_quote = true;
                continue;
            }
            if c == '\\' as u32 && self.is_at(1, 'E') {
                self.pos += 2;
                continue;
            }
            if c == '(' as u32 && self.is_at(1, '?') && self.is_at(2, '#') {
                self.skip_comment()?;
                continue;
            }

            match self.parse_atom()? {
                Some(node) => {
                    repeatable = node.is_repeatable();
                    items.push(node);
                }
                None => repeatable = false,
            }
        }
        Ok(Node::concat(items))
    }

    fn skip_comment(&mut self) -> Result<(), ParseError> {
        let open = self.pos;
        self.pos += 3;
        loop {
            match self.next() {
                Some(c) if c == ')' as u32 => return Ok(()),
                Some(_) => {}
                None => return Err(self.err_at(K::MissingCommentEnd, open)),
            }
        }
    }

    /// Quantifier at the cursor, if any. `{` that does not start a valid
    /// quantifier is left for the atom parser as a literal.
    fn try_quantifier(&mut self) -> Result<Option<(u32, Option<u32>, RepeatKind)>, ParseError> {
        let (min, max) = match self.peek().map(ch) {
            Some('*') => {
                self.pos += 1;
                (0, None)
            }
            Some('+') => {
                self.pos += 1;
                (1, None)
            }
            Some('?') => {
                self.pos += 1;
                (0, Some(1))
            }
            Some('{') => match self.scan_braces()? {
                Some(mm) => mm,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        let greedy = !self.flags.contains(CompileFlags::UNGREEDY);
        let kind = if self.eat('+') {
            RepeatKind::Possessive
        } else if self.eat('?') {
            if greedy {
                RepeatKind::Lazy
            } else {
                RepeatKind::Greedy
            }
        } else if greedy {
            RepeatKind::Greedy
        } else {
            RepeatKind::Lazy
        };
        Ok(Some((min, max, kind)))
    }

    fn scan_braces(&mut self) -> Result<Option<(u32, Option<u32>)>, ParseError> {
        let start = self.pos;
        let digits = |p: &Parser, mut i: usize| {
            while p.cps.get(i).map_or(false, |&c| ch(c).is_ascii_digit()) {
                i += 1;
            }
            i
        };
        let mut i = start + 1;
        let min_end = digits(self, i);
        // `{,n}` means `{0,n}`; `{,}` stays literal.
        let bare_comma = self.cps.get(i) == Some(&(',' as u32)) && digits(self, i + 1) > i + 1;
        if min_end == i && !bare_comma {
            return Ok(None);
        }
        let (max_range, end) = match self.cps.get(min_end).map(|&c| ch(c)) {
            Some('}') => (None, min_end),
            Some(',') => {
                i = min_end + 1;
                let max_end = digits(self, i);
                if self.cps.get(max_end) != Some(&('}' as u32)) {
                    return Ok(None);
                }
                (Some((i, max_end)), max_end)
            }
            _ => return Ok(None),
        };

        let number = |p: &Parser, from: usize, to: usize| -> Result<u32, ParseError> {
            let mut v: u32 = 0;
            for &c in &p.cps[from..to] {
                v = v.saturating_mul(10).saturating_add(ch(c).to_digit(10).unwrap_or(0));
            }
            if v > MAX_REPEAT {
                return Err(p.err_at(K::QuantifierRange, from));
            }
            Ok(v)
        };
        let min = number(self, start + 1, min_end)?;
        let max = match max_range {
            None => Some(min),
            Some((from, to)) if from == to => None,
            Some((from, to)) => {
                let max = number(self, from, to)?;
                if max < min {
                    return Err(self.err_at(K::QuantifierOutOfOrder, from));
                }
                Some(max)
            }
        };
        self.pos = end + 1;
        Ok(Some((min, max)))
    }

    fn parse_atom(&mut self) -> Result<Option<Node>, ParseError> {
        let start = self.pos;
        let c = match self.next() {
            Some(c) => c,
            None => return Ok(None),
        };
        let node = match ch(c) {
            '(' => {
                self.pos = start;
                return self.parse_group();
            }
            '[' => {
                self.check_posix_outside(start)?;
                self.parse_class()?
            }
            '.' => Node::Any { dotall: self.flags.contains(CompileFlags::DOTALL) },
            '^' => Node::Assertion(AssertKind::StartLine {
                multiline: self.flags.contains(CompileFlags::MULTILINE),
            }),
            '$' => {
                let multiline = self.flags.contains(CompileFlags::MULTILINE);
                if !multiline && self.flags.contains(CompileFlags::DOLLAR_ENDONLY) {
                    Node::Assertion(AssertKind::EndSubject)
                } else {
                    Node::Assertion(AssertKind::EndLine { multiline })
                }
            }
            '\\' => {
                self.pos = start;
                return self.parse_escape().map(Some);
            }
            _ => Node::Char { cp: c, caseless: self.caseless() },
        };
        Ok(Some(node))
    }

    // --- groups ---

    fn enter(&mut self, open: usize) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.depth_limit {
            return Err(self.err_at(K::NestingTooDeep, open));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), ParseError> {
        if !self.eat(')') {
            return Err(self.err(K::MissingClosingParenthesis));
        }
        self.depth -= 1;
        Ok(())
    }

    fn group_body(&mut self, open: usize, branch_reset: bool) -> Result<Node, ParseError> {
        self.enter(open)?;
        let body = self.parse_alternation(branch_reset)?;
        self.close()?;
        Ok(body)
    }

    fn new_group(&mut self, open: usize) -> Result<u32, ParseError> {
        if self.capture_count >= MAX_GROUPS {
            return Err(self.err_at(K::TooManyGroups, open));
        }
        self.capture_count += 1;
        Ok(self.capture_count)
    }

    fn capture(&mut self, open: usize, name: Option<(String, usize)>) -> Result<Node, ParseError> {
        let group = self.new_group(open)?;
        if let Some((name, offset)) = name {
            self.add_name(name, group, offset)?;
        }
        let body = self.group_body(open, false)?;
        Ok(Node::Group { kind: GroupKind::Capture(group), body: Box::new(body) })
    }

    fn add_name(&mut self, name: String, group: u32, at: usize) -> Result<(), ParseError> {
        let clash = self.names.iter().any(|e| e.name == name && e.group != group);
        if clash && !self.flags.contains(CompileFlags::DUPNAMES) {
            return Err(self.err_at(K::DuplicateGroupName, at));
        }
        if !self.names.iter().any(|e| e.name == name && e.group == group) {
            self.names.push(NameEntry { name, group });
        }
        Ok(())
    }

    fn lookaround(&mut self, open: usize, ahead: bool, negate: bool) -> Result<Node, ParseError> {
        self.look_depth += 1;
        let body = self.group_body(open, false)?;
        self.look_depth -= 1;
        if !ahead {
            self.check_lookbehind(&body, open)?;
        }
        Ok(Node::Group { kind: GroupKind::Look { ahead, negate }, body: Box::new(body) })
    }

    fn check_lookbehind(&self, body: &Node, open: usize) -> Result<(), ParseError> {
        let branches: Vec<&Node> = match body {
            Node::Alternation(v) => v.iter().collect(),
            other => vec![other],
        };
        for b in branches {
            if b.fixed_length() == FixedLen::Variable {
                return Err(self.err_at(K::LookbehindNotFixedLength, open));
            }
        }
        Ok(())
    }

    fn parse_group(&mut self) -> Result<Option<Node>, ParseError> {
        let open = self.pos;
        self.pos += 1;
        if self.eat('*') {
            return self.parse_verb(open).map(Some);
        }
        if !self.eat('?') {
            if self.flags.contains(CompileFlags::NO_AUTO_CAPTURE) {
                let body = self.group_body(open, false)?;
                return Ok(Some(Node::Group { kind: GroupKind::NonCapture, body: Box::new(body) }));
            }
            return self.capture(open, None).map(Some);
        }

        let c = match self.peek() {
            Some(c) => ch(c),
            None => return Err(self.err(K::UnrecognizedGroupSyntax)),
        };
        let node = match c {
            ':' => {
                self.pos += 1;
                let body = self.group_body(open, false)?;
                Node::Group { kind: GroupKind::NonCapture, body: Box::new(body) }
            }
            '|' => {
                self.pos += 1;
                let body = self.group_body(open, true)?;
                Node::Group { kind: GroupKind::NonCapture, body: Box::new(body) }
            }
            '>' => {
                self.pos += 1;
                let body = self.group_body(open, false)?;
                Node::Group { kind: GroupKind::Atomic, body: Box::new(body) }
            }
            '=' | '!' => {
                self.pos += 1;
                self.lookaround(open, true, c == '!')?
            }
            '<' if self.is_at(1, '=') || self.is_at(1, '!') => {
                let negate = self.is_at(1, '!');
                self.pos += 2;
                self.lookaround(open, false, negate)?
            }
            '<' | '\'' => {
                self.pos += 1;
                let at = self.pos;
                let name = self.read_name(if c == '<' { '>' } else { '\'' })?;
                self.capture(open, Some((name, at)))?
            }
            'P' => {
                self.pos += 1;
                match self.next().map(ch) {
                    Some('<') => {
                        let at = self.pos;
                        let name = self.read_name('>')?;
                        self.capture(open, Some((name, at)))?
                    }
                    Some('=') => {
                        let at = self.pos;
                        let name = self.read_name(')')?;
                        self.named_backref(name, at)
                    }
                    Some('>') => {
                        let at = self.pos;
                        let name = self.read_name(')')?;
                        self.call(GroupRef::Name { name, offset: self.offs[at], numbers: Vec::new() })
                    }
                    _ => return Err(self.err_at(K::UnrecognizedGroupSyntax, open + 2)),
                }
            }
            '&' => {
                self.pos += 1;
                let at = self.pos;
                let name = self.read_name(')')?;
                self.call(GroupRef::Name { name, offset: self.offs[at], numbers: Vec::new() })
            }
            'R' if self.is_at(1, ')') => {
                self.pos += 2;
                self.call(GroupRef::Number(0))
            }
            '0'..='9' | '+' => self.numbered_call()?,
            '-' if self.peek_at(1).map_or(false, |d| ch(d).is_ascii_digit()) => {
                self.numbered_call()?
            }
            '(' => {
                self.pos += 1;
                self.parse_conditional(open)?
            }
            _ => return self.parse_options(open),
        };
        Ok(Some(node))
    }

    fn numbered_call(&mut self) -> Result<Node, ParseError> {
        let at = self.pos;
        let spec = self.read_number_spec()?;
        if !self.eat(')') {
            return Err(self.err(K::MissingClosingParenthesis));
        }
        let group = self.resolve_number(spec, at, true)?;
        Ok(self.call(GroupRef::Number(group)))
    }

    /// `123`, `+2` or `-1` at the cursor.
    fn read_number_spec(&mut self) -> Result<RefSpec, ParseError> {
        let at = self.pos;
        let sign = if self.eat('+') {
            1
        } else if self.eat('-') {
            -1
        } else {
            0
        };
        let n = self.read_decimal().ok_or_else(|| self.err_at(K::MalformedReference, at))?;
        if n > MAX_GROUPS {
            return Err(self.err_at(K::GroupNumberTooBig, at));
        }
        Ok(if sign == 0 { RefSpec::Abs(n) } else { RefSpec::Rel(sign * n as i64) })
    }

    /// Turn a number spec into an absolute group number. Relative numbers
    /// count from the most recently opened group (`-1`) or the next one (`+1`).
    fn resolve_number(&self, spec: RefSpec, at: usize, allow_zero: bool) -> Result<u32, ParseError> {
        let group = match spec {
            RefSpec::Abs(n) => n as i64,
            RefSpec::Rel(0) => return Err(self.err_at(K::UnknownGroup, at)),
            RefSpec::Rel(n) if n < 0 => self.capture_count as i64 + n + 1,
            RefSpec::Rel(n) => self.capture_count as i64 + n,
            RefSpec::Name(_) => return Err(self.err_at(K::MalformedReference, at)),
        };
        if group < 0 || (group == 0 && !allow_zero) {
            return Err(self.err_at(K::UnknownGroup, at));
        }
        if group > MAX_GROUPS as i64 {
            return Err(self.err_at(K::GroupNumberTooBig, at));
        }
        Ok(group as u32)
    }

    fn call(&mut self, target: GroupRef) -> Node {
        self.has_recursion = true;
        Node::Recurse { target }
    }

    fn parse_options(&mut self, open: usize) -> Result<Option<Node>, ParseError> {
        const RESETTABLE: CompileFlags = CompileFlags::CASELESS
            .union(CompileFlags::MULTILINE)
            .union(CompileFlags::NO_AUTO_CAPTURE)
            .union(CompileFlags::DOTALL)
            .union(CompileFlags::EXTENDED)
            .union(CompileFlags::EXTENDED_MORE);

        let mut flags = self.flags;
        let mut on = true;
        let mut caret = false;
        let mut x_run = 0;
        if self.eat('^') {
            flags.remove(RESETTABLE);
            caret = true;
        }
        loop {
            let at = self.pos;
            let c = match self.next() {
                Some(c) => ch(c),
                None => return Err(self.err(K::MissingClosingParenthesis)),
            };
            let bit = match c {
                ')' | ':' => {
                    self.pos = at;
                    break;
                }
                '-' if on && !caret => {
                    on = false;
                    x_run = 0;
                    continue;
                }
                'i' => CompileFlags::CASELESS,
                'm' => CompileFlags::MULTILINE,
                'n' => CompileFlags::NO_AUTO_CAPTURE,
                's' => CompileFlags::DOTALL,
                'J' => CompileFlags::DUPNAMES,
                'U' => CompileFlags::UNGREEDY,
                'x' => {
                    x_run += 1;
                    if !on {
                        CompileFlags::EXTENDED | CompileFlags::EXTENDED_MORE
                    } else if x_run >= 2 {
                        CompileFlags::EXTENDED | CompileFlags::EXTENDED_MORE
                    } else {
                        CompileFlags::EXTENDED
                    }
                }
                _ => return Err(self.err_at(K::UnrecognizedGroupSyntax, at)),
            };
            if c != 'x' {
                x_run = 0;
            }
            flags.set(bit, on);
        }

        if self.eat(')') {
            self.flags = flags;
            return Ok(None);
        }
        // ':'
        self.pos += 1;
        let saved = self.flags;
        self.flags = flags;
        let body = self.group_body(open, false);
        self.flags = saved;
        Ok(Some(Node::Group { kind: GroupKind::NonCapture, body: Box::new(body?) }))
    }

    fn parse_verb(&mut self, open: usize) -> Result<Node, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .map_or(false, |c| ch(c).is_ascii_alphanumeric() || c == '_' as u32)
        {
            self.pos += 1;
        }
        let name: String = self.cps[start..self.pos].iter().map(|&c| ch(c)).collect();
        let arg = if self.eat(':') {
            let arg_start = self.pos;
            while self.peek().map_or(false, |c| c != ')' as u32) {
                self.pos += 1;
            }
            let text: String = self.cps[arg_start..self.pos].iter().map(|&c| ch(c)).collect();
            // An empty name is the same as none.
            Some(text).filter(|t| !t.is_empty())
        } else {
            None
        };
        if !self.eat(')') {
            return Err(self.err_at(K::UnknownVerb, open));
        }
        let verb = match (name.as_str(), arg) {
            ("MARK" | "", Some(arg)) => return Ok(Node::Verb(Verb::Mark(self.intern_mark(arg)))),
            ("MARK", None) => return Err(self.err_at(K::VerbArgument, open)),
            ("SKIP", Some(arg)) => return Ok(Node::Verb(Verb::SkipTo(self.intern_mark(arg)))),
            (name, arg) => {
                let verb = match name {
                    "ACCEPT" => Verb::Accept,
                    "FAIL" | "F" => Verb::Fail,
                    "COMMIT" => Verb::Commit,
                    "PRUNE" => Verb::Prune,
                    "SKIP" => Verb::Skip,
                    "THEN" => Verb::Then,
                    _ => return Err(self.err_at(K::UnknownVerb, open)),
                };
                match arg {
                    Some(arg) => (Some(self.intern_mark(arg)), verb),
                    None => (None, verb),
                }
            }
        };
        // `(*PRUNE:NAME)` and friends set the mark, then act.
        Ok(match verb {
            (Some(mark), verb) => Node::Concat(vec![Node::Verb(Verb::Mark(mark)), Node::Verb(verb)]),
            (None, verb) => Node::Verb(verb),
        })
    }

    fn intern_mark(&mut self, name: String) -> u32 {
        match self.marks.iter().position(|m| *m == name) {
            Some(i) => i as u32,
            None => {
                self.marks.push(name);
                (self.marks.len() - 1) as u32
            }
        }
    }

    fn parse_conditional(&mut self, open: usize) -> Result<Node, ParseError> {
        self.enter(open)?;
        let at = self.pos;
        let cond = match self.peek().map(ch) {
            Some('?') => {
                self.pos += 1;
                let (ahead, negate) = match (self.next().map(ch), self.peek().map(ch)) {
                    (Some('='), _) => (true, false),
                    (Some('!'), _) => (true, true),
                    (Some('<'), Some('=')) => {
                        self.pos += 1;
                        (false, false)
                    }
                    (Some('<'), Some('!')) => {
                        self.pos += 1;
                        (false, true)
                    }
                    _ => return Err(self.err_at(K::AssertionExpected, at)),
                };
                self.look_depth += 1;
                let body = self.group_body(at - 1, false)?;
                self.look_depth -= 1;
                if !ahead {
                    self.check_lookbehind(&body, at - 1)?;
                }
                Condition::Assert { ahead, negate, body: Box::new(body) }
            }
            Some('0'..='9' | '+' | '-') => {
                let spec = self.read_number_spec()?;
                let group = self.resolve_number(spec, at, false)?;
                self.cond_close()?;
                Condition::Group(GroupRef::Number(group))
            }
            Some('<') | Some('\'') => {
                let term = if self.is('<') { '>' } else { '\'' };
                self.pos += 1;
                let name_at = self.pos;
                let name = self.read_name(term)?;
                self.cond_close()?;
                Condition::Group(GroupRef::Name { name, offset: self.offs[name_at], numbers: Vec::new() })
            }
            Some('R') => {
                self.pos += 1;
                if self.eat('&') {
                    let name_at = self.pos;
                    let name = self.read_name(')')?;
                    self.has_recursion = true;
                    Condition::Recursion(Some(GroupRef::Name {
                        name,
                        offset: self.offs[name_at],
                        numbers: Vec::new(),
                    }))
                } else if let Some(n) = self.read_decimal() {
                    self.cond_close()?;
                    self.has_recursion = true;
                    Condition::Recursion(Some(GroupRef::Number(n)))
                } else {
                    self.cond_close()?;
                    self.has_recursion = true;
                    Condition::Recursion(None)
                }
            }
            Some(_) if self.looking_at("DEFINE)") => {
                self.pos += "DEFINE)".len();
                Condition::Define
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let name_at = self.pos;
                let name = self.read_name(')')?;
                Condition::Group(GroupRef::Name { name, offset: self.offs[name_at], numbers: Vec::new() })
            }
            _ => return Err(self.err_at(K::AssertionExpected, at)),
        };

        let body = self.parse_alternation(false)?;
        self.close()?;
        let mut branches = match body {
            Node::Alternation(v) => v,
            other => vec![other],
        };
        if branches.len() > 2 {
            return Err(self.err_at(K::TooManyConditionBranches, open));
        }
        if branches.len() == 2 && cond == Condition::Define {
            return Err(self.err_at(K::DefineWithBranches, open));
        }
        let no = if branches.len() == 2 { branches.pop().map(Box::new) } else { None };
        let yes = branches.pop().unwrap_or(Node::Empty);
        Ok(Node::Conditional { cond, yes: Box::new(yes), no })
    }

    fn cond_close(&mut self) -> Result<(), ParseError> {
        if self.eat(')') {
            Ok(())
        } else {
            Err(self.err(K::MissingClosingParenthesis))
        }
    }

    fn looking_at(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.is_at(i, c))
    }

    fn read_name(&mut self, term: char) -> Result<String, ParseError> {
        let start = self.pos;
        let first_ok = self.peek().map_or(false, |c| {
            c == '_' as u32
                || ch(c).is_ascii_alphabetic()
                || (self.utf && c >= 0x80 && unicode::is_word(c, true) && !unicode::is_digit(c, true))
        });
        if !first_ok {
            return Err(self.err(K::MissingGroupName));
        }
        let mut name = String::new();
        while let Some(c) = self.peek() {
            let word = c == '_' as u32
                || ch(c).is_ascii_alphanumeric()
                || (self.utf && c >= 0x80 && unicode::is_word(c, true));
            if !word {
                break;
            }
            name.push(ch(c));
            self.pos += 1;
        }
        if self.pos - start > MAX_NAME_LEN {
            return Err(self.err_at(K::GroupNameTooLong, start));
        }
        if !self.eat(term) {
            return Err(self.err(K::MissingGroupName));
        }
        Ok(name)
    }

    // --- references ---

    fn backref(&mut self, group: u32, at: usize) -> Node {
        if group > self.capture_count {
            self.forward_refs.push((group, self.offs[at]));
        }
        Node::BackRef { target: GroupRef::Number(group), caseless: self.caseless() }
    }

    fn named_backref(&mut self, name: String, at: usize) -> Node {
        let offset = self.offs[at];
        self.named_backrefs.push((name.clone(), offset, self.capture_count));
        Node::BackRef {
            target: GroupRef::Name { name, offset, numbers: Vec::new() },
            caseless: self.caseless(),
        }
    }

    /// Contents of `\g{..}`, `\g<..>`, `\k<..>` and the like up to `term`.
    fn read_ref(&mut self, term: char) -> Result<RefSpec, ParseError> {
        match self.peek().map(ch) {
            Some('0'..='9' | '+' | '-') => {
                let spec = self.read_number_spec()?;
                if !self.eat(term) {
                    return Err(self.err(K::MalformedReference));
                }
                Ok(spec)
            }
            _ => self.read_name(term).map(RefSpec::Name),
        }
    }

    fn parse_g(&mut self, start: usize) -> Result<Node, ParseError> {
        let at = self.pos;
        let term = match self.peek().map(ch) {
            Some('{') => Some('}'),
            Some('<') => Some('>'),
            Some('\'') => Some('\''),
            _ => None,
        };
        match term {
            Some('}') => {
                self.pos += 1;
                match self.read_ref('}')? {
                    RefSpec::Name(name) => Ok(self.named_backref(name, at + 1)),
                    spec => {
                        let g = self.resolve_number(spec, at, false)?;
                        Ok(self.backref(g, start))
                    }
                }
            }
            Some(t) => {
                self.pos += 1;
                match self.read_ref(t)? {
                    RefSpec::Name(name) => {
                        Ok(self.call(GroupRef::Name { name, offset: self.offs[at + 1], numbers: Vec::new() }))
                    }
                    spec => {
                        let g = self.resolve_number(spec, at, true)?;
                        Ok(self.call(GroupRef::Number(g)))
                    }
                }
            }
            None => {
                if !self.peek().map_or(false, |c| ch(c).is_ascii_digit() || c == '-' as u32 || c == '+' as u32) {
                    return Err(self.err_at(K::MalformedReference, start));
                }
                let spec = self.read_number_spec()?;
                let g = self.resolve_number(spec, at, false)?;
                Ok(self.backref(g, start))
            }
        }
    }

    fn parse_k(&mut self, start: usize) -> Result<Node, ParseError> {
        let term = match self.next().map(ch) {
            Some('<') => '>',
            Some('\'') => '\'',
            Some('{') => '}',
            _ => return Err(self.err_at(K::MalformedReference, start)),
        };
        let at = self.pos;
        let name = self.read_name(term)?;
        Ok(self.named_backref(name, at))
    }

    // --- escapes ---

    fn parse_escape(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let c = self.next().ok_or_else(|| self.err_at(K::EndsWithBackslash, start))?;
        let ucp = self.ucp;
        let class = |item| Node::Class(Box::new(CharClass::single(item, ucp)));
        let node = match ch(c) {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'h' | 'H' | 'v' | 'V' => {
                class(self.class_escape(c).ok_or_else(|| self.err_at(K::UnrecognizedEscape, start))?)
            }
            'p' | 'P' => class(self.parse_property(c, start)?),
            'N' => {
                if self.is('{') {
                    return Err(self.err_at(K::UnsupportedEscape, start));
                }
                Node::Any { dotall: false }
            }
            'R' => Node::AnyNewline,
            'X' => {
                if !cfg!(feature = "unicode") {
                    return Err(self.err_at(K::UnicodeNotSupported, start));
                }
                Node::Grapheme
            }
            'b' | 'B' => Node::Assertion(AssertKind::WordBoundary { negate: c == 'B' as u32, ucp }),
            'A' => Node::Assertion(AssertKind::StartSubject),
            'Z' => Node::Assertion(AssertKind::EndSubjectOptNl),
            'z' => Node::Assertion(AssertKind::EndSubject),
            'G' => Node::Assertion(AssertKind::StartOffset),
            'K' => {
                if self.look_depth > 0 {
                    return Err(self.err_at(K::KeepInLookaround, start));
                }
                Node::Keep
            }
            'g' => self.parse_g(start)?,
            'k' => self.parse_k(start)?,
            '1'..='9' => {
                let digits_at = self.pos - 1;
                self.pos = digits_at;
                let n = self.read_decimal().unwrap_or(0);
                if n < 10 || n <= self.total_groups {
                    if n > MAX_GROUPS {
                        return Err(self.err_at(K::GroupNumberTooBig, start));
                    }
                    self.backref(n, start)
                } else if c >= '8' as u32 {
                    self.pos = digits_at + 1;
                    Node::Char { cp: c, caseless: self.caseless() }
                } else {
                    self.pos = digits_at;
                    let cp = self.read_octal(3);
                    let cp = self.check_cp(cp, start)?;
                    Node::Char { cp, caseless: self.caseless() }
                }
            }
            _ => {
                let cp = self.char_escape(c, start, false)?;
                Node::Char { cp, caseless: self.caseless() }
            }
        };
        Ok(node)
    }

    fn class_escape(&self, c: u32) -> Option<ClassItem> {
        let negate = ch(c).is_ascii_uppercase();
        Some(match ch(c).to_ascii_lowercase() {
            'd' => ClassItem::Digit { negate },
            'w' => ClassItem::Word { negate },
            's' => ClassItem::Space { negate },
            'h' => ClassItem::HSpace { negate },
            'v' => ClassItem::VSpace { negate },
            _ => return None,
        })
    }

    fn parse_property(&mut self, c: u32, start: usize) -> Result<ClassItem, ParseError> {
        if !cfg!(feature = "unicode") {
            return Err(self.err_at(K::UnicodeNotSupported, start));
        }
        let mut negate = c == 'P' as u32;
        let name: String = if self.eat('{') {
            if self.eat('^') {
                negate = !negate;
            }
            let from = self.pos;
            while self.peek().map_or(false, |c| c != '}' as u32) {
                self.pos += 1;
            }
            if !self.eat('}') {
                return Err(self.err_at(K::MalformedProperty, start));
            }
            self.cps[from..self.pos - 1].iter().map(|&c| ch(c)).collect()
        } else {
            match self.next() {
                Some(l) if ch(l).is_ascii_alphabetic() => ch(l).to_string(),
                _ => return Err(self.err_at(K::MalformedProperty, start)),
            }
        };
        let prop = unicode::property_by_name(&name).ok_or_else(|| self.err_at(K::UnknownProperty, start))?;
        Ok(ClassItem::Prop { prop, negate })
    }

    fn read_octal(&mut self, max_digits: usize) -> u32 {
        let mut v = 0;
        for _ in 0..max_digits {
            match self.peek().and_then(octal_value) {
                Some(d) => {
                    v = v * 8 + d;
                    self.pos += 1;
                }
                None => break,
            }
        }
        v
    }

    fn read_braced(&mut self, start: usize, radix: u32) -> Result<u32, ParseError> {
        let from = self.pos;
        let mut v: u64 = 0;
        while let Some(d) = self.peek().and_then(|c| ch(c).to_digit(radix)) {
            v = (v * radix as u64 + d as u64).min(u64::from(u32::MAX));
            self.pos += 1;
        }
        if self.pos == from || !self.eat('}') {
            return Err(self.err_at(K::MissingDigits, start));
        }
        Ok(v as u32)
    }

    /// Escapes that denote one character; shared by classes and atoms.
    fn char_escape(&mut self, c: u32, start: usize, in_class: bool) -> Result<u32, ParseError> {
        let cp = match ch(c) {
            'a' => 0x07,
            'e' => 0x1b,
            'f' => 0x0c,
            'n' => 0x0a,
            'r' => 0x0d,
            't' => 0x09,
            'b' if in_class => 0x08,
            '0' => self.read_octal(2),
            '1'..='7' if in_class => {
                self.pos -= 1;
                self.read_octal(3)
            }
            'o' => {
                if !self.eat('{') {
                    return Err(self.err_at(K::MissingDigits, start));
                }
                self.read_braced(start, 8)?
            }
            'x' => {
                if self.eat('{') {
                    self.read_braced(start, 16)?
                } else {
                    let mut v = 0;
                    let mut n = 0;
                    while n < 2 {
                        match self.peek().and_then(hex_value) {
                            Some(d) => {
                                v = v * 16 + d;
                                self.pos += 1;
                                n += 1;
                            }
                            None => break,
                        }
                    }
                    if n == 0 {
                        return Err(self.err_at(K::MissingDigits, start));
                    }
                    v
                }
            }
            'c' => {
                let x = self.next().ok_or_else(|| self.err_at(K::MissingControlChar, start))?;
                if !(0x20..=0x7e).contains(&x) {
                    return Err(self.err_at(K::InvalidControlChar, start));
                }
                ch(x).to_ascii_uppercase() as u32 ^ 0x40
            }
            'F' | 'L' | 'l' | 'U' | 'u' => return Err(self.err_at(K::UnsupportedEscape, start)),
            _ if ch(c).is_ascii_alphanumeric() => {
                let kind = if in_class { K::InvalidEscapeInClass } else { K::UnrecognizedEscape };
                return Err(self.err_at(kind, start));
            }
            _ => c,
        };
        self.check_cp(cp, start)
    }

    // --- classes ---

    /// `[:alpha:]` written without the enclosing brackets.
    fn check_posix_outside(&self, open: usize) -> Result<(), ParseError> {
        let delim = match self.cps.get(open + 1).map(|&c| ch(c)) {
            Some(d @ (':' | '.' | '=')) => d,
            _ => return Ok(()),
        };
        let mut i = open + 2;
        while self.cps.get(i).map_or(false, |&c| ch(c).is_ascii_alphabetic() || c == '^' as u32) {
            i += 1;
        }
        if self.cps.get(i) == Some(&(delim as u32)) && self.cps.get(i + 1) == Some(&(']' as u32)) {
            return Err(self.err_at(K::PosixOutsideClass, open));
        }
        Ok(())
    }

    fn parse_class(&mut self) -> Result<Node, ParseError> {
        let negated = self.eat('^');
        let mut cc = CharClass::new(negated, self.caseless(), self.utf || self.ucp, self.ucp);
        let extended_more = self.flags.contains(CompileFlags::EXTENDED_MORE);

        if self.is(']') {
            self.pos += 1;
            if self.flags.contains(CompileFlags::ALLOW_EMPTY_CLASS) {
                cc.finish();
                return Ok(Node::Class(Box::new(cc)));
            }
            cc.push(ClassItem::Range(']' as u32, ']' as u32));
        }

        loop {
            if extended_more && !self.in_quote {
                while self.is(' ') || self.is('\t') {
                    self.pos += 1;
                }
            }
            let c = self
                .peek()
                .ok_or_else(|| self.err_at(K::MissingTerminatingBracket, self.cps.len()))?;
            if !self.in_quote {
                if c == ']' as u32 {
                    self.pos += 1;
                    break;
                }
                if c == '[' as u32 {
                    let at = self.pos;
                    if let Some(item) = self.posix_class()? {
                        self.no_range_after_set(at)?;
                        cc.push(item);
                        continue;
                    }
                }
            }

            let item_at = self.pos;
            let lo = match self.class_atom()? {
                ClassAtom::Char(c) => c,
                ClassAtom::Item(item) => {
                    self.no_range_after_set(item_at)?;
                    cc.push(item);
                    continue;
                }
                ClassAtom::Skip => continue,
            };

            let range = self.is('-') && self.peek_at(1).map_or(false, |c| c != ']' as u32 || self.in_quote);
            if !range {
                cc.push(ClassItem::Range(lo, lo));
                continue;
            }
            self.pos += 1;
            let hi = loop {
                match self.class_atom()? {
                    ClassAtom::Char(c) => break c,
                    ClassAtom::Item(_) => return Err(self.err_at(K::ClassItemInRange, item_at)),
                    ClassAtom::Skip => {
                        if self.peek().is_none() {
                            return Err(self.err_at(K::MissingTerminatingBracket, self.cps.len()));
                        }
                    }
                }
            };
            if hi < lo {
                return Err(self.err_at(K::InvalidRange, item_at));
            }
            cc.push(ClassItem::Range(lo, hi));
        }

        cc.finish();
        Ok(Node::Class(Box::new(cc)))
    }

    /// A set such as `\d` or `[:alpha:]` cannot start a range; a trailing
    /// `-` before `]` stays literal.
    fn no_range_after_set(&self, at: usize) -> Result<(), ParseError> {
        if !self.in_quote && self.is('-') && self.peek_at(1).map_or(false, |c| c != ']' as u32) {
            return Err(self.err_at(K::ClassItemInRange, at));
        }
        Ok(())
    }

    fn posix_class(&mut self) -> Result<Option<ClassItem>, ParseError> {
        let open = self.pos;
        let delim = match self.peek_at(1).map(ch) {
            Some(d @ (':' | '.' | '=')) => d,
            _ => return Ok(None),
        };
        let mut i = open + 2;
        let negate = self.cps.get(i) == Some(&('^' as u32));
        if negate {
            i += 1;
        }
        let name_start = i;
        while self.cps.get(i).map_or(false, |&c| ch(c).is_ascii_alphabetic()) {
            i += 1;
        }
        if self.cps.get(i) != Some(&(delim as u32)) || self.cps.get(i + 1) != Some(&(']' as u32)) {
            return Ok(None);
        }
        if delim != ':' {
            return Err(self.err_at(K::UnknownPosixClass, open));
        }
        let name: String = self.cps[name_start..i].iter().map(|&c| ch(c)).collect();
        let class = PosixClass::from_name(&name).ok_or_else(|| self.err_at(K::UnknownPosixClass, open))?;
        self.pos = i + 2;
        Ok(Some(ClassItem::Posix { class, negate }))
    }

    fn class_atom(&mut self) -> Result<ClassAtom, ParseError> {
        let start = self.pos;
        let c = self
            .next()
            .ok_or_else(|| self.err_at(K::MissingTerminatingBracket, self.cps.len()))?;
        if self.in_quote {
            if c == '\\' as u32 && self.eat('E') {
                self.in_quote = false;
                return Ok(ClassAtom::Skip);
            }
            return Ok(ClassAtom::Char(c));
        }
        if c != '\\' as u32 {
            return Ok(ClassAtom::Char(c));
        }
        let e = self.next().ok_or_else(|| self.err_at(K::EndsWithBackslash, start))?;
        let atom = match ch(e) {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'h' | 'H' | 'v' | 'V' => match self.class_escape(e) {
                Some(item) => ClassAtom::Item(item),
                None => return Err(self.err_at(K::InvalidEscapeInClass, start)),
            },
            'p' | 'P' => ClassAtom::Item(self.parse_property(e, start)?),
            'Q' => {
                self.in_quote = true;
                ClassAtom::Skip
            }
            'E' => ClassAtom::Skip,
            'B' | 'R' | 'X' | 'A' | 'Z' | 'z' | 'G' | 'K' | 'N' | 'g' | 'k' => {
                return Err(self.err_at(K::InvalidEscapeInClass, start));
            }
            '8' | '9' => ClassAtom::Char(e),
            _ => ClassAtom::Char(self.char_escape(e, start, true)?),
        };
        Ok(atom)
    }

    // --- wrap-up ---

    fn finish(mut self, mut node: Node, mut info: ParseInfo) -> Result<(Node, ParseInfo), ParseError> {
        self.names.sort_by(|a, b| a.name.cmp(&b.name).then(a.group.cmp(&b.group)));
        let names = &self.names;
        let lookup = |name: &str| -> Vec<u32> {
            names.iter().filter(|e| e.name == name).map(|e| e.group).collect()
        };

        let mut failure: Option<ParseError> = None;
        node.walk_mut(&mut |n| {
            let target = match n {
                Node::BackRef { target, .. } | Node::Recurse { target } => Some(target),
                Node::Conditional { cond: Condition::Group(t), .. } => Some(t),
                Node::Conditional { cond: Condition::Recursion(Some(t)), .. } => Some(t),
                _ => None,
            };
            if let Some(GroupRef::Name { name, offset, numbers }) = target {
                if numbers.is_empty() {
                    *numbers = lookup(name);
                    if numbers.is_empty() && failure.is_none() {
                        failure = Some(ParseError::new(K::UnknownGroup, *offset));
                    }
                }
            }
        });
        if let Some(e) = failure {
            return Err(e);
        }

        for (name, offset, opened) in &self.named_backrefs {
            let groups = lookup(name);
            if let Some(&first) = groups.first() {
                if groups.iter().all(|&g| g > *opened) {
                    self.forward_refs.push((first, *offset));
                }
            }
        }

        info.capture_count = self.capture_count;
        info.names = self.names;
        info.has_recursion = self.has_recursion;
        info.forward_refs = self.forward_refs;
        info.mark_names = self.marks;
        Ok((node, info))
    }
}
