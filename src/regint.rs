// regint.rs - Internal program representation.
// Op set, compiled program, the shared `Pattern` artifact and encoded-size
// accounting against the configured link size.

use std::fmt::{self, Write as _};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::options::{CompileFlags, LinkSize, Newline};
use crate::regenc::{units_for, CodeUnit, Width};
use crate::regparse_types::{AssertKind, CharClass, NameEntry};

// === Config Constants ===

/// Default cap on encoded program size, in code units.
pub const DEFAULT_MAX_PROGRAM_UNITS: usize = 1 << 24;

static MAX_PROGRAM_UNITS: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_PROGRAM_UNITS);

pub fn get_max_program_size() -> usize {
    MAX_PROGRAM_UNITS.load(Ordering::Relaxed)
}

/// Set the process-wide program size cap. Zero restores the default.
pub fn set_max_program_size(units: usize) {
    let units = if units == 0 { DEFAULT_MAX_PROGRAM_UNITS } else { units };
    MAX_PROGRAM_UNITS.store(units, Ordering::Relaxed);
}

// === Ops ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    /// Atomic group or possessive quantifier.
    Atomic,
    /// Lookaround. When the body fails, a negative assertion resumes at
    /// `on_fail` (relative to the mark).
    Assert { on_fail: Option<i32> },
    /// Start of an alternation that contains `(*THEN)`.
    Then,
}

/// One instruction. Jump operands are relative to the op's own index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Char(u32),
    /// Case-folded code point; matches any case variant.
    CharNoCase(u32),
    Str(Box<[u32]>),
    /// Case-folded code points.
    StrNoCase(Box<[u32]>),
    /// Any character, newlines included.
    Any,
    /// Any character that does not start a newline.
    AnyNotNl,
    /// Index into `Program::classes`.
    Class(u32),
    AnyNewline,
    Grapheme,
    Assert(AssertKind),
    GroupStart(u32),
    GroupEnd(u32),
    /// Record a choice point at `rel` and fall through. `then` tags the
    /// alternation for `(*THEN)`; zero means none.
    Push { rel: i32, then: u32 },
    Jump(i32),
    Fail,
    NullStart(u32),
    /// Leave the loop at `exit` if the iteration consumed nothing.
    NullEnd { id: u32, exit: i32 },
    Mark { id: u32, kind: MarkKind },
    /// Drop choice points back to mark `id`.
    Cut { id: u32, restore_pos: bool },
    /// Move back a fixed number of characters (lookbehind).
    StepBack(u32),
    /// Several groups when a duplicate name is referenced; the first set
    /// one is used.
    BackRef { groups: Box<[u32]>, caseless: bool },
    Call { rel: i32, group: u32 },
    Return,
    CondGroup { groups: Box<[u32]>, no: i32 },
    CondRecursion { group: Option<u32>, no: i32 },
    Keep,
    Commit,
    Prune,
    Skip,
    Then(u32),
    /// Record mark name `n` (index into `Program::mark_names`).
    SetMark(u32),
    SkipTo(u32),
    End,
}

impl Op {
    /// Static branch target of a jump-type op, relative to the op.
    pub fn branch(&self) -> Option<i32> {
        match *self {
            Op::Push { rel, .. } | Op::Jump(rel) | Op::Call { rel, .. } => Some(rel),
            Op::NullEnd { exit, .. } => Some(exit),
            Op::CondGroup { no, .. } | Op::CondRecursion { no, .. } => Some(no),
            Op::Mark { kind: MarkKind::Assert { on_fail: Some(rel) }, .. } => Some(rel),
            _ => None,
        }
    }

    fn branch_mut(&mut self) -> Option<&mut i32> {
        match self {
            Op::Push { rel, .. } | Op::Jump(rel) | Op::Call { rel, .. } => Some(rel),
            Op::NullEnd { exit, .. } => Some(exit),
            Op::CondGroup { no, .. } | Op::CondRecursion { no, .. } => Some(no),
            Op::Mark { kind: MarkKind::Assert { on_fail: Some(rel) }, .. } => Some(rel),
            _ => None,
        }
    }

    pub fn set_branch(&mut self, rel: i32) {
        if let Some(r) = self.branch_mut() {
            *r = rel;
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Op::Char(_) => "char",
            Op::CharNoCase(_) => "char-ic",
            Op::Str(_) => "str",
            Op::StrNoCase(_) => "str-ic",
            Op::Any => "any",
            Op::AnyNotNl => "any-not-nl",
            Op::Class(_) => "class",
            Op::AnyNewline => "any-newline",
            Op::Grapheme => "grapheme",
            Op::Assert(_) => "assert",
            Op::GroupStart(_) => "group-start",
            Op::GroupEnd(_) => "group-end",
            Op::Push { .. } => "push",
            Op::Jump(_) => "jump",
            Op::Fail => "fail",
            Op::NullStart(_) => "null-start",
            Op::NullEnd { .. } => "null-end",
            Op::Mark { .. } => "mark",
            Op::Cut { .. } => "cut",
            Op::StepBack(_) => "step-back",
            Op::BackRef { .. } => "backref",
            Op::Call { .. } => "call",
            Op::Return => "return",
            Op::CondGroup { .. } => "cond-group",
            Op::CondRecursion { .. } => "cond-recursion",
            Op::Keep => "keep",
            Op::Commit => "commit",
            Op::Prune => "prune",
            Op::Skip => "skip",
            Op::Then(_) => "then",
            Op::SetMark(_) => "set-mark",
            Op::SkipTo(_) => "skip-to",
            Op::End => "end",
        }
    }
}

// === Encoded size ===

/// Code units taken by one link (jump offset) field.
pub fn link_units(width: Width, link: LinkSize) -> usize {
    match width {
        Width::Eight => link.bytes() as usize,
        Width::Sixteen => {
            if link == LinkSize::Two {
                1
            } else {
                2
            }
        }
        Width::ThirtyTwo => 1,
    }
}

/// Largest encoded program a link field can address. 16-bit rounds link
/// size 3 up to 4; 32-bit always behaves as 4.
pub fn max_encoded_units(width: Width, link: LinkSize) -> usize {
    let effective = match (width, link) {
        (Width::ThirtyTwo, _) => LinkSize::Four,
        (Width::Sixteen, LinkSize::Three) => LinkSize::Four,
        (_, l) => l,
    };
    match effective {
        LinkSize::Two => 0xffff,
        LinkSize::Three => (1 << 24) - 1,
        LinkSize::Four => (1 << 31) - 1,
    }
}

fn imm2_units(width: Width) -> usize {
    if width == Width::Eight {
        2
    } else {
        1
    }
}

/// Size of `op` in code units once serialized.
pub fn encoded_len(op: &Op, width: Width, link: LinkSize, utf: bool, classes: &[CharClass]) -> usize {
    let link = link_units(width, link);
    let imm2 = imm2_units(width);
    match op {
        Op::Char(cp) | Op::CharNoCase(cp) => 1 + units_for(width, *cp, utf),
        Op::Str(s) | Op::StrNoCase(s) => 2 + s.iter().map(|&cp| units_for(width, cp, utf)).sum::<usize>(),
        Op::Class(idx) => {
            let wide = classes.get(*idx as usize).map_or(0, |c| c.wide_ranges());
            1 + 32 / width.bytes() + wide * 2 * units_for(width, 0x10ffff, utf)
        }
        Op::Push { .. } | Op::Jump(_) | Op::Call { .. } | Op::NullEnd { .. } => 1 + link,
        Op::CondGroup { groups, .. } => 1 + link + imm2 * groups.len(),
        Op::CondRecursion { .. } => 1 + link + imm2,
        Op::Mark { kind: MarkKind::Assert { on_fail: Some(_) }, .. } => 1 + link + imm2,
        Op::GroupStart(_) | Op::GroupEnd(_) | Op::NullStart(_) | Op::Mark { .. } | Op::Cut { .. } => 1 + imm2,
        Op::StepBack(_) | Op::Then(_) | Op::SetMark(_) | Op::SkipTo(_) => 1 + imm2,
        Op::BackRef { groups, .. } => 1 + imm2 * groups.len(),
        _ => 1,
    }
}

// === Program ===

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub ops: Vec<Op>,
    pub classes: Vec<CharClass>,
    /// Number of distinct mark ids (atomic groups, assertions, THEN scopes).
    pub mark_count: u32,
    /// Number of null-check registers.
    pub null_count: u32,
    /// Serialized size in code units.
    pub encoded_size: usize,
    pub mark_names: Vec<Arc<str>>,
}

impl Program {
    /// Human-readable listing, one op per line with absolute targets.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for (pc, op) in self.ops.iter().enumerate() {
            let _ = write!(out, "{:5}: {}", pc, op.name());
            let target = |rel: i32| pc as i64 + rel as i64;
            let _ = match op {
                Op::Char(cp) | Op::CharNoCase(cp) => write!(out, " {}", show_cp(*cp)),
                Op::Str(s) | Op::StrNoCase(s) => {
                    let text: String = s.iter().map(|&c| show_cp(c)).collect();
                    write!(out, " \"{}\"", text)
                }
                Op::Class(idx) => write!(out, " #{}", idx),
                Op::Assert(kind) => write!(out, " {:?}", kind),
                Op::GroupStart(g) | Op::GroupEnd(g) => write!(out, " {}", g),
                Op::Push { rel, then } if *then != 0 => write!(out, " -> {} then={}", target(*rel), then),
                Op::Push { rel, .. } | Op::Jump(rel) => write!(out, " -> {}", target(*rel)),
                Op::NullStart(id) => write!(out, " {}", id),
                Op::NullEnd { id, exit } => write!(out, " {} exit -> {}", id, target(*exit)),
                Op::Mark { id, kind } => match kind {
                    MarkKind::Assert { on_fail: Some(rel) } => {
                        write!(out, " {} assert on-fail -> {}", id, target(*rel))
                    }
                    MarkKind::Assert { on_fail: None } => write!(out, " {} assert", id),
                    MarkKind::Atomic => write!(out, " {} atomic", id),
                    MarkKind::Then => write!(out, " {} then", id),
                },
                Op::Cut { id, restore_pos } => {
                    write!(out, " {}{}", id, if *restore_pos { " restore-pos" } else { "" })
                }
                Op::StepBack(n) => write!(out, " {}", n),
                Op::BackRef { groups, caseless } => {
                    write!(out, " {:?}{}", groups, if *caseless { " /i" } else { "" })
                }
                Op::Call { rel, group } => write!(out, " ({}) -> {}", group, target(*rel)),
                Op::CondGroup { groups, no } => write!(out, " {:?} else -> {}", groups, target(*no)),
                Op::CondRecursion { group, no } => write!(out, " {:?} else -> {}", group, target(*no)),
                Op::Then(id) => write!(out, " {}", id),
                Op::SetMark(n) | Op::SkipTo(n) => match self.mark_names.get(*n as usize) {
                    Some(name) => write!(out, " {}", name),
                    None => write!(out, " #{}", n),
                },
                _ => Ok(()),
            };
            out.push('\n');
        }
        out
    }
}

fn show_cp(cp: u32) -> String {
    match char::from_u32(cp) {
        Some(c) if (' '..='~').contains(&c) => c.to_string(),
        _ => format!("\\x{{{:x}}}", cp),
    }
}

// === Compiled pattern ===

pub(crate) struct PatternInner<C> {
    pub program: Program,
    pub capture_count: u32,
    pub names: Vec<NameEntry>,
    pub flags: CompileFlags,
    pub newline: Newline,
    pub bsr_anycrlf: bool,
    pub link_size: LinkSize,
    /// Minimum subject length of a match, in characters.
    pub min_length: usize,
    /// Literal every match starts with, in code units.
    pub prefix: Vec<C>,
    pub anchored: bool,
    pub has_recursion: bool,
    pub match_limit: Option<u32>,
    pub depth_limit: Option<u32>,
    pub heap_limit: Option<u32>,
}

/// Compiled, immutable regular expression over code units `C`.
///
/// Cloning is cheap; clones share the program.
pub struct Pattern<C: CodeUnit = u8> {
    pub(crate) inner: Arc<PatternInner<C>>,
    _unit: PhantomData<fn() -> C>,
}

impl<C: CodeUnit> Clone for Pattern<C> {
    fn clone(&self) -> Self {
        Pattern { inner: Arc::clone(&self.inner), _unit: PhantomData }
    }
}

impl<C: CodeUnit> fmt::Debug for Pattern<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("width", &C::WIDTH)
            .field("captures", &self.inner.capture_count)
            .field("ops", &self.inner.program.ops.len())
            .field("encoded_size", &self.inner.program.encoded_size)
            .finish()
    }
}

/// Summary returned by `Pattern::info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternInfo {
    pub width: Width,
    pub capture_count: u32,
    pub name_count: usize,
    pub flags: CompileFlags,
    pub newline: Newline,
    pub link_size: LinkSize,
    pub encoded_size: usize,
    pub min_length: usize,
    pub anchored: bool,
    pub has_recursion: bool,
    pub match_limit: Option<u32>,
    pub depth_limit: Option<u32>,
    pub heap_limit: Option<u32>,
}

impl<C: CodeUnit> Pattern<C> {
    pub(crate) fn from_inner(inner: PatternInner<C>) -> Self {
        Pattern { inner: Arc::new(inner), _unit: PhantomData }
    }

    /// Number of capturing groups, not counting group 0.
    pub fn capture_count(&self) -> u32 {
        self.inner.capture_count
    }

    /// The lowest group number carrying `name`.
    pub fn group_number(&self, name: &str) -> Option<u32> {
        self.group_numbers(name).first().copied()
    }

    /// Every group carrying `name` (several under DUPNAMES), ascending.
    pub fn group_numbers(&self, name: &str) -> Vec<u32> {
        self.inner
            .names
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.group)
            .collect()
    }

    /// Name table, sorted by name then group.
    pub fn names(&self) -> impl Iterator<Item = (&str, u32)> {
        self.inner.names.iter().map(|e| (e.name.as_str(), e.group))
    }

    pub fn flags(&self) -> CompileFlags {
        self.inner.flags
    }

    pub fn is_utf(&self) -> bool {
        self.inner.flags.contains(CompileFlags::UTF)
    }

    pub fn program(&self) -> &Program {
        &self.inner.program
    }

    pub fn info(&self) -> PatternInfo {
        let i = &self.inner;
        PatternInfo {
            width: C::WIDTH,
            capture_count: i.capture_count,
            name_count: i.names.len(),
            flags: i.flags,
            newline: i.newline,
            link_size: i.link_size,
            encoded_size: i.program.encoded_size,
            min_length: i.min_length,
            anchored: i.anchored,
            has_recursion: i.has_recursion,
            match_limit: i.match_limit,
            depth_limit: i.depth_limit,
            heap_limit: i.heap_limit,
        }
    }

    pub fn disassemble(&self) -> String {
        self.inner.program.disassemble()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_limits() {
        assert_eq!(max_encoded_units(Width::Eight, LinkSize::Two), 65535);
        assert_eq!(max_encoded_units(Width::Eight, LinkSize::Three), (1 << 24) - 1);
        assert_eq!(max_encoded_units(Width::Sixteen, LinkSize::Three), (1 << 31) - 1);
        assert_eq!(max_encoded_units(Width::ThirtyTwo, LinkSize::Two), (1 << 31) - 1);
        assert_eq!(link_units(Width::Eight, LinkSize::Three), 3);
        assert_eq!(link_units(Width::Sixteen, LinkSize::Four), 2);
        assert_eq!(link_units(Width::ThirtyTwo, LinkSize::Four), 1);
    }

    #[test]
    fn op_sizes() {
        let s = Op::Str(vec!['a' as u32; 10].into_boxed_slice());
        assert_eq!(encoded_len(&s, Width::Eight, LinkSize::Two, false, &[]), 12);
        let j = Op::Jump(3);
        assert_eq!(encoded_len(&j, Width::Eight, LinkSize::Four, false, &[]), 5);
        assert_eq!(encoded_len(&j, Width::Sixteen, LinkSize::Two, false, &[]), 2);
        let c = Op::Char(0x20ac);
        assert_eq!(encoded_len(&c, Width::Eight, LinkSize::Two, true, &[]), 4);
    }

    #[test]
    fn branch_patching() {
        let mut op = Op::Push { rel: 0, then: 0 };
        op.set_branch(7);
        assert_eq!(op.branch(), Some(7));
        let mut op = Op::Char('a' as u32);
        op.set_branch(7);
        assert_eq!(op.branch(), None);
    }

    #[test]
    fn disassembly_shows_targets() {
        let prog = Program {
            ops: vec![Op::Push { rel: 3, then: 0 }, Op::Char('a' as u32), Op::Jump(-2), Op::End],
            ..Program::default()
        };
        let text = prog.disassemble();
        assert!(text.contains("0: push -> 3"));
        assert!(text.contains("2: jump -> 0"));
    }
}
