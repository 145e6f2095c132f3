// regcomp.rs - Compiler.
// Lowers the parse tree into `Op`s in one forward pass with backpatched
// labels, then computes start-of-match hints and checks the encoded size
// against the link size.
//
// Order: options → entry point → reference checks → tree lowering →
// subroutine bodies → analysis.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::error::{CompileError, RegexError};
use crate::options::{CompileFlags, LinkSize, Newline};
use crate::regenc::{CodeUnit, Width};
use crate::regint::*;
use crate::regparse::parse;
use crate::regparse_types::*;
use crate::unicode;

// === Options ===

/// Everything that shapes a compiled pattern besides its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    pub flags: CompileFlags,
    /// Newline convention; a leading verb such as `(*CRLF)` wins over it.
    pub newline: Option<Newline>,
    pub link_size: LinkSize,
    /// Overrides the global parse depth limit.
    pub parse_depth: Option<u32>,
}

impl CompileOptions {
    pub fn new(flags: CompileFlags) -> Self {
        CompileOptions { flags, ..CompileOptions::default() }
    }
}

// === Entry point ===

impl<C: CodeUnit> Pattern<C> {
    /// Compile `pattern` with default options besides `flags`.
    pub fn compile(pattern: &[C], flags: CompileFlags) -> Result<Self, RegexError> {
        compile_pattern(pattern, &CompileOptions::new(flags))
    }

    pub fn compile_with(pattern: &[C], opts: &CompileOptions) -> Result<Self, RegexError> {
        compile_pattern(pattern, opts)
    }
}

/// Parse and compile `pattern`.
pub fn compile_pattern<C: CodeUnit>(pattern: &[C], opts: &CompileOptions) -> Result<Pattern<C>, RegexError> {
    let (tree, info) = parse(pattern, opts.flags, opts.parse_depth)?;
    let flags = info.flags;
    let utf = flags.contains(CompileFlags::UTF);

    check_references(&tree, &info)?;

    let mut comp = Compiler::new(&tree, &info, C::WIDTH, opts.link_size);
    comp.compile_root()?;

    let mut program = Program {
        ops: comp.ops,
        classes: comp.classes,
        mark_count: comp.next_mark,
        null_count: comp.next_null,
        encoded_size: 0,
        mark_names: info.mark_names.iter().map(|m| Arc::from(m.as_str())).collect(),
    };
    program.encoded_size = program
        .ops
        .iter()
        .map(|op| encoded_len(op, C::WIDTH, opts.link_size, utf, &program.classes))
        .sum();

    let limit = max_encoded_units(C::WIDTH, opts.link_size);
    if program.encoded_size > limit {
        return Err(CompileError::PatternTooLarge { size: program.encoded_size, limit }.into());
    }
    let cap = get_max_program_size();
    if program.encoded_size > cap {
        return Err(CompileError::PatternTooLarge { size: program.encoded_size, limit: cap }.into());
    }

    let optimize = !flags.contains(CompileFlags::NO_START_OPTIMIZE);
    let has_accept = contains(&tree, &|n| matches!(n, Node::Verb(Verb::Accept)));
    let min_length = if optimize && !has_accept { min_len(&tree) } else { 0 };
    let mut prefix = Vec::new();
    if optimize {
        let mut cps = Vec::new();
        literal_prefix(&tree, &mut cps);
        for cp in cps {
            C::encode(cp, utf, &mut prefix);
        }
    }
    let anchored = flags.contains(CompileFlags::ANCHORED) || is_anchored(&tree);

    debug!(
        "compiled {} pattern: {} ops, {} code units, {} groups, min length {}",
        C::WIDTH,
        program.ops.len(),
        program.encoded_size,
        info.capture_count,
        min_length
    );

    Ok(Pattern::from_inner(PatternInner {
        program,
        capture_count: info.capture_count,
        names: info.names,
        flags,
        newline: info.newline.or(opts.newline).unwrap_or_default(),
        bsr_anycrlf: info.bsr_anycrlf,
        link_size: opts.link_size,
        min_length,
        prefix,
        anchored,
        has_recursion: info.has_recursion,
        match_limit: info.match_limit,
        depth_limit: info.depth_limit,
        heap_limit: info.heap_limit,
    }))
}

// === Reference checks ===

fn check_references(tree: &Node, info: &ParseInfo) -> Result<(), CompileError> {
    let mut missing = None;
    tree.walk(&mut |n| {
        let groups = match n {
            Node::BackRef { target, .. } | Node::Recurse { target } => target.numbers(),
            Node::Conditional { cond: Condition::Group(t), .. } => t.numbers(),
            Node::Conditional { cond: Condition::Recursion(Some(t)), .. } => t.numbers(),
            _ => return,
        };
        if let Some(&g) = groups.iter().find(|&&g| g > info.capture_count) {
            missing.get_or_insert(g);
        }
    });
    if let Some(g) = missing {
        return Err(CompileError::NonexistentGroup(g));
    }
    if !info.has_recursion {
        if let Some(&(g, _)) = info.forward_refs.first() {
            return Err(CompileError::ReferenceBeforeDefinition(g));
        }
    }
    Ok(())
}

// === Lowering ===

/// Pending `(*ACCEPT)` jumps of the innermost assertion, subroutine or
/// top level, and the captures open when it began.
struct AcceptCtx {
    captures_base: usize,
    jumps: Vec<usize>,
}

struct Compiler<'a> {
    root: &'a Node,
    ops: Vec<Op>,
    classes: Vec<CharClass>,
    next_mark: u32,
    next_null: u32,
    unicode_case: bool,
    uses_then: bool,
    then_scopes: Vec<u32>,
    accept: Vec<AcceptCtx>,
    open_captures: Vec<u32>,
    calls: Vec<(usize, u32)>,
    entries: HashMap<u32, usize>,
    width: Width,
    link_size: LinkSize,
    utf: bool,
    /// Running encoded size of `ops`, in code units.
    encoded: usize,
}

impl<'a> Compiler<'a> {
    fn new(root: &'a Node, info: &ParseInfo, width: Width, link_size: LinkSize) -> Self {
        let flags = info.flags;
        Compiler {
            root,
            width,
            link_size,
            utf: flags.contains(CompileFlags::UTF),
            encoded: 0,
            ops: Vec::new(),
            classes: Vec::new(),
            // Mark id 0 is reserved: a THEN tag of 0 means "no alternation".
            next_mark: 1,
            next_null: 0,
            unicode_case: flags.intersects(CompileFlags::UTF | CompileFlags::UCP),
            uses_then: contains(root, &|n| matches!(n, Node::Verb(Verb::Then))),
            then_scopes: Vec::new(),
            accept: Vec::new(),
            open_captures: Vec::new(),
            calls: Vec::new(),
            entries: HashMap::new(),
        }
    }

    fn emit(&mut self, op: Op) -> usize {
        self.encoded += encoded_len(&op, self.width, self.link_size, self.utf, &self.classes);
        self.ops.push(op);
        self.ops.len() - 1
    }

    fn here(&self) -> usize {
        self.ops.len()
    }

    /// Point the branch of the op at `at` to `target`.
    fn patch(&mut self, at: usize, target: usize) {
        debug_assert!(target <= self.ops.len());
        let rel = target as i64 - at as i64;
        self.ops[at].set_branch(rel as i32);
    }

    fn new_mark(&mut self) -> u32 {
        self.next_mark += 1;
        self.next_mark - 1
    }

    fn new_null(&mut self) -> u32 {
        self.next_null += 1;
        self.next_null - 1
    }

    /// Fail early while repeats expand, against the tighter of the link-size
    /// bound and the program size cap.
    fn check_growth(&self) -> Result<(), CompileError> {
        let limit = max_encoded_units(self.width, self.link_size).min(get_max_program_size());
        if self.encoded > limit {
            return Err(CompileError::PatternTooLarge { size: self.encoded, limit });
        }
        Ok(())
    }

    fn push_accept(&mut self) {
        self.accept.push(AcceptCtx {
            captures_base: self.open_captures.len(),
            jumps: Vec::new(),
        });
    }

    fn pop_accept(&mut self, target: usize) {
        if let Some(ctx) = self.accept.pop() {
            for j in ctx.jumps {
                self.patch(j, target);
            }
        }
    }

    fn compile_root(&mut self) -> Result<(), CompileError> {
        let root = self.root;
        self.push_accept();
        self.compile_node(root)?;
        let end = self.emit(Op::End);
        self.pop_accept(end);

        // Subroutine bodies, reached only through Call.
        let mut next = 0;
        while next < self.calls.len() {
            let (_, group) = self.calls[next];
            next += 1;
            if self.entries.contains_key(&group) {
                continue;
            }
            let entry = self.here();
            self.entries.insert(group, entry);
            let saved = std::mem::take(&mut self.open_captures);
            self.push_accept();
            self.then_scopes.push(0);
            if group == 0 {
                self.compile_node(root)?;
            } else {
                let node = root.find_group(group).ok_or(CompileError::NonexistentGroup(group))?;
                self.compile_node(node)?;
            }
            self.then_scopes.pop();
            let ret = self.emit(Op::Return);
            self.pop_accept(ret);
            self.open_captures = saved;
        }
        let calls = std::mem::take(&mut self.calls);
        for (at, group) in calls {
            let entry = self.entries[&group];
            self.patch(at, entry);
        }
        Ok(())
    }

    fn compile_node(&mut self, node: &Node) -> Result<(), CompileError> {
        match node {
            Node::Empty => {}
            Node::Char { cp, caseless } => {
                let op = self.char_op(*cp, *caseless);
                self.emit(op);
            }
            Node::Any { dotall } => {
                self.emit(if *dotall { Op::Any } else { Op::AnyNotNl });
            }
            Node::Class(cc) => {
                self.classes.push((**cc).clone());
                let idx = (self.classes.len() - 1) as u32;
                self.emit(Op::Class(idx));
            }
            Node::Concat(items) => self.compile_concat(items)?,
            Node::Alternation(branches) => self.compile_alternation(branches)?,
            Node::Group { kind, body } => self.compile_group(kind, body)?,
            Node::Repeat { min, max, kind, body } => self.compile_repeat(*min, *max, *kind, body)?,
            Node::BackRef { target, caseless } => {
                self.emit(Op::BackRef { groups: target.numbers().into_boxed_slice(), caseless: *caseless });
            }
            Node::Assertion(kind) => {
                self.emit(Op::Assert(*kind));
            }
            Node::Recurse { target } => {
                let group = target.first();
                let at = self.emit(Op::Call { rel: 0, group });
                self.calls.push((at, group));
            }
            Node::Conditional { cond, yes, no } => self.compile_conditional(cond, yes, no.as_deref())?,
            Node::Keep => {
                self.emit(Op::Keep);
            }
            Node::Verb(verb) => self.compile_verb(*verb),
            Node::AnyNewline => {
                self.emit(Op::AnyNewline);
            }
            Node::Grapheme => {
                self.emit(Op::Grapheme);
            }
        }
        Ok(())
    }

    fn char_op(&self, cp: u32, caseless: bool) -> Op {
        if caseless && unicode::case_variants(cp, self.unicode_case).len() > 1 {
            Op::CharNoCase(unicode::fold(cp, self.unicode_case))
        } else {
            Op::Char(cp)
        }
    }

    /// Runs of literals become `Str`/`StrNoCase`.
    fn compile_concat(&mut self, items: &[Node]) -> Result<(), CompileError> {
        let mut i = 0;
        while i < items.len() {
            if !matches!(items[i], Node::Char { .. }) {
                self.compile_node(&items[i])?;
                i += 1;
                continue;
            }
            let mut run: Vec<Op> = Vec::new();
            while let Some(Node::Char { cp, caseless }) = items.get(i) {
                run.push(self.char_op(*cp, *caseless));
                i += 1;
            }
            self.emit_literals(run);
        }
        Ok(())
    }

    fn emit_literals(&mut self, run: Vec<Op>) {
        let mut plain: Vec<u32> = Vec::new();
        let mut folded: Vec<u32> = Vec::new();
        for op in run {
            match op {
                Op::Char(cp) => {
                    self.flush_literals(&mut folded, true);
                    plain.push(cp);
                }
                Op::CharNoCase(cp) => {
                    self.flush_literals(&mut plain, false);
                    folded.push(cp);
                }
                _ => {}
            }
        }
        self.flush_literals(&mut plain, false);
        self.flush_literals(&mut folded, true);
    }

    fn flush_literals(&mut self, buf: &mut Vec<u32>, nocase: bool) {
        match (buf.len(), nocase) {
            (0, _) => return,
            (1, false) => self.emit(Op::Char(buf[0])),
            (1, true) => self.emit(Op::CharNoCase(buf[0])),
            (_, false) => self.emit(Op::Str(buf.clone().into_boxed_slice())),
            (_, true) => self.emit(Op::StrNoCase(buf.clone().into_boxed_slice())),
        };
        buf.clear();
    }

    fn compile_alternation(&mut self, branches: &[Node]) -> Result<(), CompileError> {
        let then = if self.uses_then {
            let id = self.new_mark();
            self.emit(Op::Mark { id, kind: MarkKind::Then });
            id
        } else {
            0
        };
        self.then_scopes.push(then);
        let mut exits = Vec::new();
        for (i, branch) in branches.iter().enumerate() {
            if i + 1 < branches.len() {
                let push = self.emit(Op::Push { rel: 0, then });
                self.compile_node(branch)?;
                exits.push(self.emit(Op::Jump(0)));
                let next = self.here();
                self.patch(push, next);
            } else {
                self.compile_node(branch)?;
            }
        }
        let end = self.here();
        for j in exits {
            self.patch(j, end);
        }
        self.then_scopes.pop();
        Ok(())
    }

    fn compile_group(&mut self, kind: &GroupKind, body: &Node) -> Result<(), CompileError> {
        match *kind {
            GroupKind::Capture(g) => {
                self.emit(Op::GroupStart(g));
                self.open_captures.push(g);
                self.compile_node(body)?;
                self.open_captures.pop();
                self.emit(Op::GroupEnd(g));
            }
            GroupKind::NonCapture => self.compile_node(body)?,
            GroupKind::Atomic => {
                let id = self.new_mark();
                self.emit(Op::Mark { id, kind: MarkKind::Atomic });
                self.compile_node(body)?;
                self.emit(Op::Cut { id, restore_pos: false });
            }
            GroupKind::Look { ahead, negate } => {
                let id = self.new_mark();
                let on_fail = if negate { Some(0) } else { None };
                let mark = self.emit(Op::Mark { id, kind: MarkKind::Assert { on_fail } });
                self.assertion_body(id, ahead, body)?;
                if negate {
                    self.emit(Op::Fail);
                    let ok = self.here();
                    self.patch(mark, ok);
                }
            }
        }
        Ok(())
    }

    /// Body of a lookaround up to and including its `Cut`.
    fn assertion_body(&mut self, id: u32, ahead: bool, body: &Node) -> Result<(), CompileError> {
        self.push_accept();
        self.then_scopes.push(0);
        if ahead {
            self.compile_node(body)?;
        } else {
            let branches: Vec<&Node> = match body {
                Node::Alternation(v) => v.iter().collect(),
                other => vec![other],
            };
            let mut exits = Vec::new();
            for (i, branch) in branches.iter().enumerate() {
                let len = match branch.fixed_length() {
                    FixedLen::Known(n) => n,
                    FixedLen::Recursive => {
                        return Err(CompileError::UnsupportedConstruct("subroutine call in lookbehind"));
                    }
                    FixedLen::Variable => {
                        return Err(CompileError::UnsupportedConstruct("variable-length lookbehind"));
                    }
                };
                let push = (i + 1 < branches.len()).then(|| self.emit(Op::Push { rel: 0, then: 0 }));
                if len > 0 {
                    self.emit(Op::StepBack(len));
                }
                self.compile_node(branch)?;
                if let Some(push) = push {
                    exits.push(self.emit(Op::Jump(0)));
                    let next = self.here();
                    self.patch(push, next);
                }
            }
            let end = self.here();
            for j in exits {
                self.patch(j, end);
            }
        }
        self.then_scopes.pop();
        let cut = self.emit(Op::Cut { id, restore_pos: true });
        self.pop_accept(cut);
        Ok(())
    }

    fn compile_repeat(
        &mut self,
        min: u32,
        max: Option<u32>,
        kind: RepeatKind,
        body: &Node,
    ) -> Result<(), CompileError> {
        if kind == RepeatKind::Possessive {
            let id = self.new_mark();
            self.emit(Op::Mark { id, kind: MarkKind::Atomic });
            self.compile_repeat(min, max, RepeatKind::Greedy, body)?;
            self.emit(Op::Cut { id, restore_pos: false });
            return Ok(());
        }
        let lazy = kind == RepeatKind::Lazy;

        for _ in 0..min {
            self.compile_node(body)?;
            self.check_growth()?;
        }

        match max {
            None => {
                let null = (min_len(body) == 0).then(|| self.new_null());
                let top = self.here();
                let push = self.emit(Op::Push { rel: 0, then: 0 });
                let skip = lazy.then(|| self.emit(Op::Jump(0)));
                if lazy {
                    let body_start = self.here();
                    self.patch(push, body_start);
                }
                if let Some(id) = null {
                    self.emit(Op::NullStart(id));
                }
                self.compile_node(body)?;
                let null_end = null.map(|id| self.emit(Op::NullEnd { id, exit: 0 }));
                let back = self.emit(Op::Jump(0));
                self.patch(back, top);
                let exit = self.here();
                match skip {
                    Some(j) => self.patch(j, exit),
                    None => self.patch(push, exit),
                }
                if let Some(ne) = null_end {
                    self.patch(ne, exit);
                }
            }
            Some(max) => {
                let mut exits = Vec::new();
                for _ in min..max {
                    let push = self.emit(Op::Push { rel: 0, then: 0 });
                    if lazy {
                        exits.push(self.emit(Op::Jump(0)));
                        let body_start = self.here();
                        self.patch(push, body_start);
                    } else {
                        exits.push(push);
                    }
                    self.compile_node(body)?;
                    self.check_growth()?;
                }
                let exit = self.here();
                for j in exits {
                    self.patch(j, exit);
                }
            }
        }
        Ok(())
    }

    fn compile_conditional(&mut self, cond: &Condition, yes: &Node, no: Option<&Node>) -> Result<(), CompileError> {
        match cond {
            Condition::Define => return Ok(()),
            Condition::Assert { ahead, negate, body } => {
                let id = self.new_mark();
                let mark = self.emit(Op::Mark { id, kind: MarkKind::Assert { on_fail: Some(0) } });
                self.assertion_body(id, *ahead, body)?;
                // A negative assertion that matched takes the "no" arm.
                let (first, second) = if *negate { (no, Some(yes)) } else { (Some(yes), no) };
                if let Some(n) = first {
                    self.compile_node(n)?;
                }
                let done = self.emit(Op::Jump(0));
                let other = self.here();
                self.patch(mark, other);
                if let Some(n) = second {
                    self.compile_node(n)?;
                }
                let end = self.here();
                self.patch(done, end);
                return Ok(());
            }
            Condition::Group(target) => {
                self.emit(Op::CondGroup { groups: target.numbers().into_boxed_slice(), no: 0 });
            }
            Condition::Recursion(target) => {
                self.emit(Op::CondRecursion { group: target.as_ref().map(|t| t.first()), no: 0 });
            }
        }
        let test = self.here() - 1;
        self.compile_node(yes)?;
        match no {
            Some(no) => {
                let done = self.emit(Op::Jump(0));
                let other = self.here();
                self.patch(test, other);
                self.compile_node(no)?;
                let end = self.here();
                self.patch(done, end);
            }
            None => {
                let end = self.here();
                self.patch(test, end);
            }
        }
        Ok(())
    }

    fn compile_verb(&mut self, verb: Verb) {
        match verb {
            Verb::Fail => {
                self.emit(Op::Fail);
            }
            Verb::Commit => {
                self.emit(Op::Commit);
            }
            Verb::Prune => {
                self.emit(Op::Prune);
            }
            Verb::Skip => {
                self.emit(Op::Skip);
            }
            Verb::Then => {
                let id = self.then_scopes.last().copied().unwrap_or(0);
                self.emit(Op::Then(id));
            }
            Verb::Mark(name) => {
                self.emit(Op::SetMark(name));
            }
            Verb::SkipTo(name) => {
                self.emit(Op::SkipTo(name));
            }
            Verb::Accept => {
                let base = self.accept.last().map_or(0, |c| c.captures_base);
                let closing: Vec<u32> = self.open_captures[base..].iter().rev().copied().collect();
                for g in closing {
                    self.emit(Op::GroupEnd(g));
                }
                let j = self.emit(Op::Jump(0));
                if let Some(ctx) = self.accept.last_mut() {
                    ctx.jumps.push(j);
                }
            }
        }
    }
}

// === Analysis ===

fn contains(node: &Node, pred: &dyn Fn(&Node) -> bool) -> bool {
    let mut found = false;
    node.walk(&mut |n| found |= pred(n));
    found
}

/// Minimum number of characters any match must consume.
pub(crate) fn min_len(node: &Node) -> usize {
    match node {
        Node::Empty
        | Node::Assertion(_)
        | Node::Keep
        | Node::Verb(_)
        | Node::BackRef { .. }
        | Node::Recurse { .. } => 0,
        Node::Char { .. } | Node::Any { .. } | Node::Class(_) | Node::AnyNewline | Node::Grapheme => 1,
        Node::Concat(v) => v.iter().map(min_len).fold(0, usize::saturating_add),
        Node::Alternation(v) => v.iter().map(min_len).min().unwrap_or(0),
        Node::Group { kind: GroupKind::Look { .. }, .. } => 0,
        Node::Group { body, .. } => min_len(body),
        Node::Repeat { min, body, .. } => min_len(body).saturating_mul(*min as usize),
        Node::Conditional { cond: Condition::Define, .. } => 0,
        Node::Conditional { yes, no, .. } => {
            min_len(yes).min(no.as_ref().map_or(0, |n| min_len(n)))
        }
    }
}

/// Collect the literal every match starts with. Returns whether `node` was
/// consumed entirely, so the caller may continue past it.
fn literal_prefix(node: &Node, out: &mut Vec<u32>) -> bool {
    match node {
        Node::Char { cp, caseless: false } => {
            out.push(*cp);
            true
        }
        Node::Empty | Node::Assertion(_) | Node::Group { kind: GroupKind::Look { .. }, .. } => true,
        Node::Concat(v) => v.iter().all(|n| literal_prefix(n, out)),
        Node::Group { kind: GroupKind::Capture(_) | GroupKind::NonCapture | GroupKind::Atomic, body } => {
            literal_prefix(body, out)
        }
        Node::Repeat { min, body, .. } if *min > 0 => {
            literal_prefix(body, out);
            false
        }
        _ => false,
    }
}

/// Can a match only start at the start offset (or at the subject start)?
fn is_anchored(node: &Node) -> bool {
    match node {
        Node::Assertion(AssertKind::StartSubject)
        | Node::Assertion(AssertKind::StartOffset)
        | Node::Assertion(AssertKind::StartLine { multiline: false }) => true,
        Node::Concat(v) => v.first().map_or(false, is_anchored),
        Node::Alternation(v) => v.iter().all(is_anchored),
        Node::Group { kind: GroupKind::Capture(_) | GroupKind::NonCapture | GroupKind::Atomic, body } => {
            is_anchored(body)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str) -> Pattern<u8> {
        Pattern::compile(pattern.as_bytes(), CompileFlags::empty()).unwrap()
    }

    #[test]
    fn literals_are_folded() {
        let p = compile("abc");
        assert_eq!(p.program().ops[0], Op::Str(vec!['a' as u32, 'b' as u32, 'c' as u32].into_boxed_slice()));
        assert_eq!(p.program().ops[1], Op::End);
    }

    #[test]
    fn caseless_literals() {
        let p = Pattern::compile(b"(?i)a1", CompileFlags::empty()).unwrap();
        assert_eq!(p.program().ops[0], Op::CharNoCase('a' as u32));
        assert_eq!(p.program().ops[1], Op::Char('1' as u32));
    }

    #[test]
    fn greedy_star_shape() {
        let p = compile("a*");
        let ops = &p.program().ops;
        assert_eq!(ops[0], Op::Push { rel: 3, then: 0 });
        assert_eq!(ops[1], Op::Char('a' as u32));
        assert_eq!(ops[2], Op::Jump(-2));
        assert_eq!(ops[3], Op::End);
    }

    #[test]
    fn nullable_loop_gets_check() {
        let p = compile("(a?)*");
        assert!(p.program().ops.iter().any(|op| matches!(op, Op::NullEnd { .. })));
        assert_eq!(p.program().null_count, 1);
    }

    #[test]
    fn branch_targets_stay_inside() {
        for pat in ["a|b|c", "(?:ab)+?c", "(?=x)(?!y)z", "(?<=ab|c)d", "(a)(?(1)b|c)", "(a(?1)?b)"] {
            let p = compile(pat);
            let n = p.program().ops.len() as i64;
            for (pc, op) in p.program().ops.iter().enumerate() {
                if let Some(rel) = op.branch() {
                    let t = pc as i64 + rel as i64;
                    assert!(t >= 0 && t < n, "{} op {} -> {}", pat, pc, t);
                }
            }
        }
    }

    #[test]
    fn link_size_limits_program() {
        let pat = b"(?:abcdefghij){7000}";
        let small = CompileOptions { link_size: LinkSize::Two, ..CompileOptions::default() };
        let err = compile_pattern::<u8>(pat, &small).unwrap_err();
        assert!(matches!(err, RegexError::Compile(CompileError::PatternTooLarge { .. })));
        let large = CompileOptions { link_size: LinkSize::Four, ..CompileOptions::default() };
        assert!(compile_pattern::<u8>(pat, &large).is_ok());
    }

    #[test]
    fn reference_checks() {
        let err = Pattern::<u8>::compile(b"(a)\\2", CompileFlags::empty()).unwrap_err();
        assert_eq!(err, RegexError::Compile(CompileError::NonexistentGroup(2)));
        let err = Pattern::<u8>::compile(b"\\1(a)", CompileFlags::empty()).unwrap_err();
        assert_eq!(err, RegexError::Compile(CompileError::ReferenceBeforeDefinition(1)));
        assert!(Pattern::<u8>::compile(b"(?1)\\1(a)", CompileFlags::empty()).is_ok());
        let err = Pattern::<u8>::compile(b"(?2)(a)", CompileFlags::empty()).unwrap_err();
        assert_eq!(err, RegexError::Compile(CompileError::NonexistentGroup(2)));
    }

    #[test]
    fn start_hints() {
        let p = compile("abc+d");
        assert_eq!(p.inner.prefix, b"abc".to_vec());
        assert_eq!(p.info().min_length, 4);
        assert!(!p.info().anchored);
        assert!(compile("^ab|\\Acd").info().anchored);
        assert!(!compile("(?m)^ab").info().anchored);
        let p = Pattern::<u8>::compile(b"abc", CompileFlags::NO_START_OPTIMIZE).unwrap();
        assert!(p.inner.prefix.is_empty());
    }

    #[test]
    fn compiling_is_deterministic() {
        let a = compile("(?<y>\\d{4})-(a|b)*?(?>c+)");
        let b = compile("(?<y>\\d{4})-(a|b)*?(?>c+)");
        assert_eq!(a.program(), b.program());
        assert_eq!(a.disassemble(), b.disassemble());
    }

    #[test]
    fn subroutine_bodies_follow_end() {
        let p = compile("(a)(?1)");
        let ops = &p.program().ops;
        let end = ops.iter().position(|op| *op == Op::End).unwrap();
        assert!(matches!(ops.last(), Some(Op::Return)));
        let call = ops.iter().position(|op| matches!(op, Op::Call { .. })).unwrap();
        let target = call as i64 + ops[call].branch().unwrap() as i64;
        assert!(target as usize > end);
    }

    #[test]
    fn accept_closes_groups() {
        let p = compile("(a(*ACCEPT)b)c");
        let ops = &p.program().ops;
        let accept_end = ops.iter().filter(|op| **op == Op::GroupEnd(1)).count();
        assert_eq!(accept_end, 2);
    }

    #[cfg(feature = "unit16")]
    #[test]
    fn utf16_prefix_units() {
        let pat: Vec<u16> = "\u{1f600}x".encode_utf16().collect();
        let p = Pattern::<u16>::compile(&pat, CompileFlags::UTF).unwrap();
        assert_eq!(p.inner.prefix, pat);
    }
}
