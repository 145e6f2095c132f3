// regparse_types.rs - AST node types and parse results.
// The parser produces a `Node` tree plus `ParseInfo`; the compiler consumes
// both and drops them.

use crate::options::{CompileFlags, Newline};
use crate::unicode::{self, PosixClass, Property};

// === Character classes ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassItem {
    Range(u32, u32),
    Digit { negate: bool },
    Word { negate: bool },
    Space { negate: bool },
    HSpace { negate: bool },
    VSpace { negate: bool },
    Posix { class: PosixClass, negate: bool },
    Prop { prop: Property, negate: bool },
}

impl ClassItem {
    fn contains(&self, cp: u32, ucp: bool) -> bool {
        match *self {
            ClassItem::Range(lo, hi) => lo <= cp && cp <= hi,
            ClassItem::Digit { negate } => unicode::is_digit(cp, ucp) != negate,
            ClassItem::Word { negate } => unicode::is_word(cp, ucp) != negate,
            ClassItem::Space { negate } => unicode::is_space(cp, ucp) != negate,
            ClassItem::HSpace { negate } => unicode::is_hspace(cp) != negate,
            ClassItem::VSpace { negate } => unicode::is_vspace(cp) != negate,
            ClassItem::Posix { class, negate } => class.matches(cp, ucp) != negate,
            ClassItem::Prop { prop, negate } => unicode::has_property(cp, prop) != negate,
        }
    }
}

/// A bracketed class, or a single class escape such as `\d` or `\p{L}`.
///
/// `low_map` caches the answer for code points below 256 once `finish` has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    pub items: Vec<ClassItem>,
    pub negated: bool,
    pub caseless: bool,
    /// Unicode case folding (UTF or UCP mode).
    pub unicode_case: bool,
    pub ucp: bool,
    low_map: [u64; 4],
}

impl CharClass {
    pub fn new(negated: bool, caseless: bool, unicode_case: bool, ucp: bool) -> CharClass {
        CharClass {
            items: Vec::new(),
            negated,
            caseless,
            unicode_case,
            ucp,
            low_map: [0; 4],
        }
    }

    pub fn single(item: ClassItem, ucp: bool) -> CharClass {
        let mut cc = CharClass::new(false, false, ucp, ucp);
        cc.items.push(item);
        cc.finish();
        cc
    }

    pub fn push(&mut self, item: ClassItem) {
        self.items.push(item);
    }

    /// Fill the low-code-point cache. Must be called once all items are in.
    pub fn finish(&mut self) {
        self.low_map = [0; 4];
        for cp in 0..256u32 {
            if self.matches_slow(cp) {
                self.low_map[(cp >> 6) as usize] |= 1 << (cp & 63);
            }
        }
    }

    fn contains(&self, cp: u32) -> bool {
        self.items.iter().any(|it| it.contains(cp, self.ucp))
    }

    fn matches_slow(&self, cp: u32) -> bool {
        let hit = if self.caseless {
            unicode::case_variants(cp, self.unicode_case)
                .iter()
                .any(|&c| self.contains(c))
        } else {
            self.contains(cp)
        };
        hit != self.negated
    }

    #[inline]
    pub fn matches(&self, cp: u32) -> bool {
        if cp < 256 {
            return self.low_map[(cp >> 6) as usize] & (1 << (cp & 63)) != 0;
        }
        self.matches_slow(cp)
    }

    /// Number of explicit ranges above 255 (encoded-size accounting).
    pub fn wide_ranges(&self) -> usize {
        self.items
            .iter()
            .filter(|it| match it {
                ClassItem::Range(_, hi) => *hi > 255,
                _ => true,
            })
            .count()
    }
}

// === AST ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatKind {
    Greedy,
    Lazy,
    Possessive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    Capture(u32),
    NonCapture,
    Atomic,
    Look { ahead: bool, negate: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertKind {
    /// `^`
    StartLine { multiline: bool },
    /// `$`
    EndLine { multiline: bool },
    /// `\A`
    StartSubject,
    /// `\z`, or `$` under DOLLAR_ENDONLY
    EndSubject,
    /// `\Z`
    EndSubjectOptNl,
    /// `\b` / `\B`
    WordBoundary { negate: bool, ucp: bool },
    /// `\G`
    StartOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Accept,
    Fail,
    Commit,
    Prune,
    Skip,
    Then,
    /// `(*MARK:NAME)`; index into `ParseInfo::mark_names`.
    Mark(u32),
    /// `(*SKIP:NAME)`: skip to the newest mark with that name.
    SkipTo(u32),
}

/// A reference to one group, by number or by (not yet resolved) name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    Number(u32),
    /// Filled in with the numbers that carry the name once parsing ends.
    Name { name: String, offset: usize, numbers: Vec<u32> },
}

impl GroupRef {
    /// All group numbers this reference may denote.
    pub fn numbers(&self) -> Vec<u32> {
        match self {
            GroupRef::Number(n) => vec![*n],
            GroupRef::Name { numbers, .. } => numbers.clone(),
        }
    }

    pub fn first(&self) -> u32 {
        match self {
            GroupRef::Number(n) => *n,
            GroupRef::Name { numbers, .. } => numbers.first().copied().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `(?(1)..)`, `(?(<name>)..)`: true when the group is set.
    Group(GroupRef),
    /// `(?(R)..)` (None) or `(?(R2)..)`, `(?(R&name)..)`.
    Recursion(Option<GroupRef>),
    /// `(?(DEFINE)..)`: never true, no "no" branch.
    Define,
    /// `(?(?=..)..)` and friends.
    Assert { ahead: bool, negate: bool, body: Box<Node> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Empty,
    Char { cp: u32, caseless: bool },
    Any { dotall: bool },
    Class(Box<CharClass>),
    Concat(Vec<Node>),
    Alternation(Vec<Node>),
    Group { kind: GroupKind, body: Box<Node> },
    Repeat { min: u32, max: Option<u32>, kind: RepeatKind, body: Box<Node> },
    BackRef { target: GroupRef, caseless: bool },
    Assertion(AssertKind),
    /// Subroutine call; group 0 is the whole pattern.
    Recurse { target: GroupRef },
    Conditional { cond: Condition, yes: Box<Node>, no: Option<Box<Node>> },
    /// `\K`
    Keep,
    Verb(Verb),
    /// `\R`
    AnyNewline,
    /// `\X`
    Grapheme,
}

impl Node {
    pub fn concat(mut nodes: Vec<Node>) -> Node {
        match nodes.len() {
            0 => Node::Empty,
            1 => nodes.pop().unwrap_or(Node::Empty),
            _ => Node::Concat(nodes),
        }
    }

    pub fn alternation(mut nodes: Vec<Node>) -> Node {
        if nodes.len() == 1 {
            nodes.pop().unwrap_or(Node::Empty)
        } else {
            Node::Alternation(nodes)
        }
    }

    /// Visit every node, children after parents.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        f(self);
        match self {
            Node::Concat(v) | Node::Alternation(v) => v.iter().for_each(|n| n.walk(f)),
            Node::Group { body, .. } | Node::Repeat { body, .. } => body.walk(f),
            Node::Conditional { cond, yes, no } => {
                if let Condition::Assert { body, .. } = cond {
                    body.walk(f);
                }
                yes.walk(f);
                if let Some(no) = no {
                    no.walk(f);
                }
            }
            _ => {}
        }
    }

    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        f(self);
        match self {
            Node::Concat(v) | Node::Alternation(v) => v.iter_mut().for_each(|n| n.walk_mut(f)),
            Node::Group { body, .. } | Node::Repeat { body, .. } => body.walk_mut(f),
            Node::Conditional { cond, yes, no } => {
                if let Condition::Assert { body, .. } = cond {
                    body.walk_mut(f);
                }
                yes.walk_mut(f);
                if let Some(no) = no {
                    no.walk_mut(f);
                }
            }
            _ => {}
        }
    }

    /// Whether a quantifier may follow this node.
    pub fn is_repeatable(&self) -> bool {
        !matches!(self, Node::Empty | Node::Assertion(_) | Node::Keep | Node::Verb(_))
    }

    /// Length in characters shared by every path through the node.
    pub fn fixed_length(&self) -> FixedLen {
        match self {
            Node::Empty | Node::Assertion(_) | Node::Keep | Node::Verb(_) => FixedLen::Known(0),
            Node::Char { .. } | Node::Any { .. } | Node::Class(_) => FixedLen::Known(1),
            Node::AnyNewline | Node::Grapheme | Node::BackRef { .. } => FixedLen::Variable,
            Node::Recurse { .. } => FixedLen::Recursive,
            Node::Concat(v) => v.iter().fold(FixedLen::Known(0), |acc, n| {
                match (acc, n.fixed_length()) {
                    (FixedLen::Known(a), FixedLen::Known(b)) => FixedLen::Known(a.saturating_add(b)),
                    (FixedLen::Known(_), other) | (other, _) => other,
                }
            }),
            Node::Alternation(v) => same_length(v.iter().map(|n| n.fixed_length())),
            Node::Group { kind: GroupKind::Look { .. }, .. } => FixedLen::Known(0),
            Node::Group { body, .. } => body.fixed_length(),
            Node::Repeat { min, max, body, .. } => match body.fixed_length() {
                FixedLen::Known(0) => FixedLen::Known(0),
                FixedLen::Known(n) if *max == Some(*min) => FixedLen::Known(n.saturating_mul(*min)),
                FixedLen::Known(_) => FixedLen::Variable,
                other => other,
            },
            Node::Conditional { cond: Condition::Define, .. } => FixedLen::Known(0),
            Node::Conditional { yes, no, .. } => {
                let no = no.as_ref().map_or(FixedLen::Known(0), |n| n.fixed_length());
                same_length([yes.fixed_length(), no].into_iter())
            }
        }
    }

    /// Find the capture group with the given number.
    pub fn find_group(&self, group: u32) -> Option<&Node> {
        let mut found = None;
        self.walk(&mut |n| {
            if found.is_none() {
                if let Node::Group { kind: GroupKind::Capture(g), .. } = n {
                    if *g == group {
                        found = Some(n);
                    }
                }
            }
        });
        found
    }
}

/// Result of `Node::fixed_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedLen {
    Known(u32),
    Variable,
    /// Contains a subroutine call; the length is not known until lowering.
    Recursive,
}

fn same_length(mut it: impl Iterator<Item = FixedLen>) -> FixedLen {
    let first = match it.next() {
        Some(f) => f,
        None => return FixedLen::Known(0),
    };
    for next in it {
        match (first, next) {
            (_, FixedLen::Recursive) | (FixedLen::Recursive, _) => return FixedLen::Recursive,
            (FixedLen::Known(a), FixedLen::Known(b)) if a == b => {}
            _ => return FixedLen::Variable,
        }
    }
    first
}

// === Parse results ===

/// Name table entry. Several entries may share a name under DUPNAMES.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub name: String,
    pub group: u32,
}

/// Everything besides the tree that compilation needs.
#[derive(Debug, Clone, Default)]
pub struct ParseInfo {
    pub capture_count: u32,
    /// Sorted by name, then by group number.
    pub names: Vec<NameEntry>,
    /// Flags after leading `(*UTF)`/`(*UCP)` verbs are applied.
    pub flags: CompileFlags,
    /// Set by a leading newline verb such as `(*CRLF)`.
    pub newline: Option<Newline>,
    pub match_limit: Option<u32>,
    pub depth_limit: Option<u32>,
    pub heap_limit: Option<u32>,
    pub has_recursion: bool,
    /// `\R` matches only CR, LF or CRLF (`(*BSR_ANYCRLF)`).
    pub bsr_anycrlf: bool,
    /// Back-references to groups that had not been opened yet: (group, offset).
    pub forward_refs: Vec<(u32, usize)>,
    /// Distinct `(*MARK)` names in order of appearance.
    pub mark_names: Vec<String>,
}

impl ParseInfo {
    pub fn group_numbers(&self, name: &str) -> Vec<u32> {
        self.names
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.group)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_bitmap_and_slow_path_agree() {
        let mut cc = CharClass::new(false, true, true, false);
        cc.push(ClassItem::Range('a' as u32, 'c' as u32));
        cc.push(ClassItem::Range(0x3b1, 0x3b3));
        cc.finish();
        assert!(cc.matches('B' as u32));
        assert!(!cc.matches('d' as u32));
        assert!(cc.matches(0x391));
        assert!(!cc.matches(0x394));
    }

    #[test]
    fn negated_class() {
        let mut cc = CharClass::new(true, false, false, false);
        cc.push(ClassItem::Digit { negate: false });
        cc.finish();
        assert!(!cc.matches('5' as u32));
        assert!(cc.matches('x' as u32));
        assert!(cc.matches(0x4e00));
    }

    #[test]
    fn fixed_lengths() {
        let a = || Node::Char { cp: 'a' as u32, caseless: false };
        assert_eq!(Node::Concat(vec![a(), a()]).fixed_length(), FixedLen::Known(2));
        assert_eq!(
            Node::Alternation(vec![a(), Node::Concat(vec![a(), a()])]).fixed_length(),
            FixedLen::Variable
        );
        let rep = Node::Repeat { min: 3, max: Some(3), kind: RepeatKind::Greedy, body: Box::new(a()) };
        assert_eq!(rep.fixed_length(), FixedLen::Known(3));
        let star = Node::Repeat { min: 0, max: None, kind: RepeatKind::Greedy, body: Box::new(a()) };
        assert_eq!(star.fixed_length(), FixedLen::Variable);
        assert_eq!(Node::Recurse { target: GroupRef::Number(1) }.fixed_length(), FixedLen::Recursive);
    }

    #[test]
    fn find_group_in_tree() {
        let tree = Node::Concat(vec![
            Node::Char { cp: 'a' as u32, caseless: false },
            Node::Group {
                kind: GroupKind::Capture(1),
                body: Box::new(Node::Char { cp: 'b' as u32, caseless: false }),
            },
        ]);
        assert!(tree.find_group(1).is_some());
        assert!(tree.find_group(2).is_none());
    }
}
