// regexec.rs - Interpreter.
// Backtracking VM over `Op`s with an explicit frame stack, plus the search
// loop that picks start positions. The native back end drives the same `Vm`.
//
// Structure: limits → match context and results → frames → VM (step,
// backtrack, cut) → search loop → `Matcher`.

use std::mem;
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use log::{trace, warn};
use smallvec::SmallVec;

use crate::error::{Limit, MatchError};
use crate::options::{CompileFlags, MatchOptions, Newline};
use crate::regenc::CodeUnit;
use crate::regint::{MarkKind, Op, Pattern, PatternInner};
use crate::regparse_types::AssertKind;
use crate::unicode;

// === Global Limits ===

pub const DEFAULT_MATCH_LIMIT: u32 = 10_000_000;
pub const DEFAULT_DEPTH_LIMIT: u32 = 10_000_000;
/// In KiB.
pub const DEFAULT_HEAP_LIMIT: u32 = 20_000_000;

static MATCH_LIMIT: AtomicU32 = AtomicU32::new(DEFAULT_MATCH_LIMIT);
static DEPTH_LIMIT: AtomicU32 = AtomicU32::new(DEFAULT_DEPTH_LIMIT);
static HEAP_LIMIT: AtomicU32 = AtomicU32::new(DEFAULT_HEAP_LIMIT);

fn or_default(n: u32, default: u32) -> u32 {
    if n == 0 {
        default
    } else {
        n
    }
}

pub fn set_match_limit(n: u32) { MATCH_LIMIT.store(or_default(n, DEFAULT_MATCH_LIMIT), Ordering::Relaxed); }
pub fn get_match_limit() -> u32 { MATCH_LIMIT.load(Ordering::Relaxed) }
pub fn set_depth_limit(n: u32) { DEPTH_LIMIT.store(or_default(n, DEFAULT_DEPTH_LIMIT), Ordering::Relaxed); }
pub fn get_depth_limit() -> u32 { DEPTH_LIMIT.load(Ordering::Relaxed) }
pub fn set_heap_limit(kib: u32) { HEAP_LIMIT.store(or_default(kib, DEFAULT_HEAP_LIMIT), Ordering::Relaxed); }
pub fn get_heap_limit() -> u32 { HEAP_LIMIT.load(Ordering::Relaxed) }

// === Match context ===

/// Caller-owned per-call settings and counters.
///
/// Defaults come from the global limits at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchContext {
    /// Backtracking steps per search.
    pub match_limit: u32,
    /// Nested subroutine calls.
    pub depth_limit: u32,
    /// Backtracking frame memory, in KiB.
    pub heap_limit: u32,
    /// No match may start after this offset.
    pub offset_limit: Option<usize>,
    steps: u64,
    attempts: u64,
}

impl Default for MatchContext {
    fn default() -> Self {
        MatchContext {
            match_limit: get_match_limit(),
            depth_limit: get_depth_limit(),
            heap_limit: get_heap_limit(),
            offset_limit: None,
            steps: 0,
            attempts: 0,
        }
    }
}

impl MatchContext {
    pub fn new() -> Self {
        MatchContext::default()
    }

    /// Backtracking steps taken by the last search.
    pub fn last_steps(&self) -> u64 {
        self.steps
    }

    /// Start positions tried by the last search.
    pub fn last_attempts(&self) -> u64 {
        self.attempts
    }
}

/// A pattern's `(*LIMIT_..)` value applies only when it is lower.
fn effective_limit(ctx: u32, pattern: Option<u32>, what: &str) -> u32 {
    match pattern {
        Some(p) if p <= ctx => p,
        Some(p) => {
            warn!("pattern {} limit {} exceeds the context limit {}; ignored", what, p, ctx);
            ctx
        }
        None => ctx,
    }
}

// === Results ===

/// Marks an unset capture slot.
pub const UNSET: usize = usize::MAX;

/// Capture offsets of one match: `2 * (groups + 1)` slots in code units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    slots: SmallVec<[usize; 20]>,
    attempt_start: usize,
    mark: Option<Arc<str>>,
}

impl CaptureResult {
    /// Start of the match, after any `\K`.
    pub fn start(&self) -> usize {
        self.slots[0]
    }

    pub fn end(&self) -> usize {
        self.slots[1]
    }

    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Position where the successful attempt began; differs from `start`
    /// when `\K` was passed.
    pub fn attempt_start(&self) -> usize {
        self.attempt_start
    }

    /// Number of groups including group 0.
    pub fn group_count(&self) -> usize {
        self.slots.len() / 2
    }

    pub fn get(&self, group: usize) -> Option<Range<usize>> {
        let s = *self.slots.get(2 * group)?;
        let e = *self.slots.get(2 * group + 1)?;
        if s == UNSET || e == UNSET {
            None
        } else {
            Some(s..e)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Range<usize>>> + '_ {
        (0..self.group_count()).map(move |g| self.get(g))
    }

    /// Raw slots, `UNSET` for unmatched groups.
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Name of the last `(*MARK)` passed on the matching path.
    pub fn mark(&self) -> Option<&str> {
        self.mark.as_deref()
    }
}

// === Frames ===

#[derive(Debug, Clone, Copy)]
enum MarkFrame {
    Atomic,
    /// Absolute resume pc for a negative assertion whose body failed.
    Assert { on_fail: Option<usize> },
    Then,
}

#[derive(Debug, Clone, Copy)]
enum VerbKind {
    Commit,
    Prune,
    Skip,
    Then(u32),
    SkipTo(u32),
}

#[derive(Debug)]
struct CallRec {
    ret: usize,
    group: u32,
    entry_pos: usize,
    slots: Box<[usize]>,
    open: Box<[usize]>,
}

/// State replaced by `Return`, kept so backtracking can re-enter the call.
#[derive(Debug)]
struct Returned {
    rec: CallRec,
    slots: Box<[usize]>,
    open: Box<[usize]>,
}

#[derive(Debug)]
enum Frame {
    Alt { pc: usize, pos: usize, then: u32 },
    Mark { id: u32, pos: usize, kind: MarkFrame },
    Verb { verb: VerbKind, pos: usize },
    // Undo records below survive cuts.
    Capture { group: usize, old: (usize, usize) },
    Open { group: usize, old: usize },
    Null { id: usize, old: usize },
    Keep { old: usize },
    /// A `(*MARK)` that was passed at `pos`.
    Label { name: u32, old: Option<u32>, pos: usize },
    CallPush,
    CallPop(Box<Returned>),
}

impl Frame {
    fn is_undo(&self) -> bool {
        !matches!(self, Frame::Alt { .. } | Frame::Mark { .. } | Frame::Verb { .. })
    }
}

/// A verb unwinding the stack after being backtracked past.
#[derive(Debug, Clone, Copy)]
struct Firing {
    code: i32,
    pos: usize,
    then: u32,
}

// === VM ===

// Outcome of one attempt.
pub(crate) const RUN_MATCHED: i32 = 1;
pub(crate) const RUN_NOMATCH: i32 = -1;
pub(crate) const RUN_COMMIT: i32 = -2;
pub(crate) const RUN_PRUNE: i32 = -3;
pub(crate) const RUN_SKIP: i32 = -4;
pub(crate) const RUN_ERROR: i32 = -5;

// Outcome of one op; negative values are `RUN_*` codes.
pub(crate) const STEP_FAIL: i32 = 0;
pub(crate) const STEP_NEXT: i32 = 1;
pub(crate) const STEP_JUMP: i32 = 2;
pub(crate) const STEP_MATCH: i32 = 3;

const CR: u32 = 0x0d;
const LF: u32 = 0x0a;

fn is_any_newline(c: u32) -> bool {
    matches!(c, 0x0a..=0x0d | 0x85 | 0x2028 | 0x2029)
}

/// Controls always stand alone in a grapheme cluster.
fn is_grapheme_control(c: u32) -> bool {
    c < 0x20 || (0x7f..=0x9f).contains(&c) || c == 0x2028 || c == 0x2029
}

fn target(pc: usize, rel: i32) -> usize {
    (pc as i64 + rel as i64) as usize
}

/// Registers read and written by native code. Must stay the first field of
/// `Vm`.
#[repr(C)]
#[derive(Debug)]
pub(crate) struct JitRegs {
    pub pos: usize,
    pub subject: *const u8,
    pub len: usize,
}

#[repr(C)]
pub(crate) struct Vm<'s, C: CodeUnit> {
    pub regs: JitRegs,
    /// Branch target after `STEP_JUMP`.
    pub pc: usize,
    pub skip_to: usize,
    pub error: Option<MatchError>,
    subject: &'s [C],
    pat: &'s PatternInner<C>,
    opts: MatchOptions,
    utf: bool,
    unicode_case: bool,
    end_anchored: bool,
    start_offset: usize,
    attempt_start: usize,
    keep: usize,
    mark: Option<u32>,
    slots: Vec<usize>,
    open: Vec<usize>,
    nulls: Vec<usize>,
    calls: Vec<CallRec>,
    frames: Vec<Frame>,
    steps: u64,
    match_limit: u64,
    depth_limit: usize,
    max_frames: usize,
}

impl<'s, C: CodeUnit> Vm<'s, C> {
    fn new(
        pat: &'s PatternInner<C>,
        subject: &'s [C],
        start_offset: usize,
        opts: MatchOptions,
        ctx: &MatchContext,
    ) -> Self {
        let groups = pat.capture_count as usize + 1;
        let heap = effective_limit(ctx.heap_limit, pat.heap_limit, "heap");
        Vm {
            regs: JitRegs { pos: start_offset, subject: subject.as_ptr() as *const u8, len: subject.len() },
            pc: 0,
            skip_to: 0,
            error: None,
            subject,
            pat,
            opts,
            utf: pat.flags.contains(CompileFlags::UTF),
            unicode_case: pat.flags.intersects(CompileFlags::UTF | CompileFlags::UCP),
            end_anchored: pat.flags.contains(CompileFlags::ENDANCHORED)
                || opts.contains(MatchOptions::ENDANCHORED),
            start_offset,
            attempt_start: start_offset,
            keep: start_offset,
            mark: None,
            slots: vec![UNSET; 2 * groups],
            open: vec![UNSET; groups],
            nulls: vec![UNSET; pat.program.null_count as usize],
            calls: Vec::new(),
            frames: Vec::new(),
            steps: 0,
            match_limit: effective_limit(ctx.match_limit, pat.match_limit, "match") as u64,
            depth_limit: effective_limit(ctx.depth_limit, pat.depth_limit, "depth") as usize,
            max_frames: (heap as usize).saturating_mul(1024) / mem::size_of::<Frame>(),
        }
    }

    fn reset(&mut self, at: usize) {
        self.frames.clear();
        self.calls.clear();
        self.slots.fill(UNSET);
        self.open.fill(UNSET);
        self.nulls.fill(UNSET);
        self.regs.pos = at;
        self.attempt_start = at;
        self.keep = at;
        self.mark = None;
        self.pc = 0;
        self.skip_to = 0;
        self.error = None;
    }

    fn result(&self) -> CaptureResult {
        let mut slots: SmallVec<[usize; 20]> = SmallVec::from_slice(&self.slots);
        slots[0] = self.keep;
        slots[1] = self.regs.pos;
        let mark = self.mark.and_then(|n| self.pat.program.mark_names.get(n as usize).cloned());
        CaptureResult { slots, attempt_start: self.attempt_start, mark }
    }

    /// Run one attempt from the current position.
    pub(crate) fn run(&mut self) -> i32 {
        let mut pc = 0;
        loop {
            match self.step(pc) {
                STEP_NEXT => pc += 1,
                STEP_JUMP => pc = self.pc,
                STEP_MATCH => return RUN_MATCHED,
                STEP_FAIL => {
                    let resume = self.backtrack();
                    if resume < 0 {
                        return resume;
                    }
                    pc = resume as usize;
                }
                code => return code,
            }
        }
    }

    // --- frames ---

    fn push(&mut self, frame: Frame) -> bool {
        if self.frames.len() >= self.max_frames {
            self.error = Some(MatchError::ResourceExhausted(Limit::Heap));
            return false;
        }
        self.frames.push(frame);
        true
    }

    /// Push a choice point resuming at `pc`. Negative on error.
    pub(crate) fn push_alt(&mut self, pc: usize, then: u32) -> i32 {
        let pos = self.regs.pos;
        if self.push(Frame::Alt { pc, pos, then }) {
            0
        } else {
            RUN_ERROR
        }
    }

    fn count_step(&mut self) -> bool {
        self.steps += 1;
        if self.steps > self.match_limit {
            self.error = Some(MatchError::ResourceExhausted(Limit::Match));
            return false;
        }
        true
    }

    fn undo(&mut self, frame: Frame) {
        match frame {
            Frame::Capture { group, old } => {
                self.slots[2 * group] = old.0;
                self.slots[2 * group + 1] = old.1;
            }
            Frame::Open { group, old } => self.open[group] = old,
            Frame::Null { id, old } => self.nulls[id] = old,
            Frame::Keep { old } => self.keep = old,
            Frame::Label { old, .. } => self.mark = old,
            Frame::CallPush => {
                self.calls.pop();
            }
            Frame::CallPop(ret) => {
                let Returned { rec, slots, open } = *ret;
                self.slots.copy_from_slice(&slots);
                self.open.copy_from_slice(&open);
                self.calls.push(rec);
            }
            Frame::Alt { .. } | Frame::Mark { .. } | Frame::Verb { .. } => {}
        }
    }

    /// Unwind to the next choice point. Returns the pc to resume at, or a
    /// negative `RUN_*` code.
    pub(crate) fn backtrack(&mut self) -> i32 {
        let mut firing: Option<Firing> = None;
        loop {
            let frame = match self.frames.pop() {
                Some(f) => f,
                None => {
                    return match firing {
                        Some(f) => {
                            if f.code == RUN_SKIP {
                                self.skip_to = f.pos;
                            }
                            f.code
                        }
                        None => RUN_NOMATCH,
                    };
                }
            };
            match frame {
                Frame::Alt { pc, pos, then } => {
                    if let Some(f) = firing {
                        if f.then == 0 || f.then != then {
                            continue;
                        }
                    }
                    self.regs.pos = pos;
                    if !self.count_step() {
                        return RUN_ERROR;
                    }
                    return pc as i32;
                }
                Frame::Mark { id, pos, kind } => match kind {
                    // Negative assertions and conditions confine verbs; a
                    // verb in a positive assertion ends the attempt.
                    MarkFrame::Assert { on_fail } => {
                        if let Some(pc) = on_fail {
                            firing = None;
                            self.regs.pos = pos;
                            if !self.count_step() {
                                return RUN_ERROR;
                            }
                            return pc as i32;
                        }
                    }
                    MarkFrame::Then => {
                        if firing.map_or(false, |f| f.then == id) {
                            firing = None;
                        }
                    }
                    MarkFrame::Atomic => {}
                },
                Frame::Verb { verb, pos } => {
                    if firing.is_none() {
                        firing = Some(match verb {
                            VerbKind::Commit => Firing { code: RUN_COMMIT, pos, then: 0 },
                            VerbKind::Prune => Firing { code: RUN_PRUNE, pos, then: 0 },
                            VerbKind::Skip => Firing { code: RUN_SKIP, pos, then: 0 },
                            VerbKind::Then(id) => Firing { code: RUN_PRUNE, pos, then: id },
                            // Without a matching mark the verb is ignored.
                            VerbKind::SkipTo(name) => match self.label_pos(name) {
                                Some(at) => Firing { code: RUN_SKIP, pos: at, then: 0 },
                                None => continue,
                            },
                        });
                    }
                }
                Frame::CallPush => {
                    // A verb inside a subroutine only fails the call.
                    firing = None;
                    self.calls.pop();
                }
                undo => self.undo(undo),
            }
        }
    }

    /// Position of the newest `(*MARK)` called `name` still on the stack.
    fn label_pos(&self, name: u32) -> Option<usize> {
        self.frames.iter().rev().find_map(|f| match *f {
            Frame::Label { name: n, pos, .. } if n == name => Some(pos),
            _ => None,
        })
    }

    /// Drop choice points back to the newest mark `id`, keeping undo records.
    fn cut(&mut self, id: u32, restore_pos: bool) {
        let at = match self
            .frames
            .iter()
            .rposition(|f| matches!(f, Frame::Mark { id: m, .. } if *m == id))
        {
            Some(i) => i,
            None => return,
        };
        if restore_pos {
            if let Frame::Mark { pos, .. } = self.frames[at] {
                self.regs.pos = pos;
            }
        }
        let mut w = at;
        for r in at + 1..self.frames.len() {
            if self.frames[r].is_undo() {
                self.frames.swap(w, r);
                w += 1;
            }
        }
        self.frames.truncate(w);
    }

    // --- subject access ---

    #[inline]
    fn char_at(&self, pos: usize) -> Option<(u32, usize)> {
        if pos < self.subject.len() {
            Some(C::decode(self.subject, pos, self.utf))
        } else {
            None
        }
    }

    #[inline]
    fn char_before(&self, pos: usize) -> Option<(u32, usize)> {
        if pos > 0 {
            Some(C::decode_before(self.subject, pos, self.utf))
        } else {
            None
        }
    }

    fn unit_is(&self, pos: usize, c: u32) -> bool {
        self.subject.get(pos).map_or(false, |u| u.to_u32() == c)
    }

    /// Length of the newline sequence starting at `pos`.
    fn newline_at(&self, pos: usize) -> Option<usize> {
        let (c, n) = self.char_at(pos)?;
        let crlf = c == CR && self.unit_is(pos + 1, LF);
        match self.pat.newline {
            Newline::Lf => (c == LF).then_some(n),
            Newline::Cr => (c == CR).then_some(n),
            Newline::Nul => (c == 0).then_some(n),
            Newline::CrLf => crlf.then_some(2),
            Newline::AnyCrLf if crlf => Some(2),
            Newline::AnyCrLf => (c == CR || c == LF).then_some(n),
            Newline::Any if crlf => Some(2),
            Newline::Any => is_any_newline(c).then_some(n),
        }
    }

    /// Whether a newline sequence ends exactly at `pos`.
    fn newline_before(&self, pos: usize) -> bool {
        let (c, _) = match self.char_before(pos) {
            Some(x) => x,
            None => return false,
        };
        let inside_crlf = c == CR && self.unit_is(pos, LF);
        match self.pat.newline {
            Newline::Lf => c == LF,
            Newline::Cr => c == CR,
            Newline::Nul => c == 0,
            Newline::CrLf => c == LF && pos >= 2 && self.unit_is(pos - 2, CR),
            Newline::AnyCrLf => (c == CR || c == LF) && !inside_crlf,
            Newline::Any => is_any_newline(c) && !inside_crlf,
        }
    }

    fn final_newline_at(&self, pos: usize) -> bool {
        self.newline_at(pos).map_or(false, |n| pos + n == self.subject.len())
    }

    fn assert(&self, kind: AssertKind, pos: usize) -> bool {
        let len = self.subject.len();
        let notbol = self.opts.contains(MatchOptions::NOTBOL);
        let noteol = self.opts.contains(MatchOptions::NOTEOL);
        match kind {
            AssertKind::StartLine { multiline: false } => pos == 0 && !notbol,
            AssertKind::StartLine { multiline: true } => {
                (pos == 0 && !notbol) || (pos > 0 && pos < len && self.newline_before(pos))
            }
            AssertKind::EndLine { multiline: false } => !noteol && (pos == len || self.final_newline_at(pos)),
            AssertKind::EndLine { multiline: true } => {
                (pos == len && !noteol) || (pos < len && self.newline_at(pos).is_some())
            }
            AssertKind::StartSubject => pos == 0,
            AssertKind::EndSubject => pos == len,
            AssertKind::EndSubjectOptNl => pos == len || self.final_newline_at(pos),
            AssertKind::WordBoundary { negate, ucp } => {
                let before = self.char_before(pos).map_or(false, |(c, _)| unicode::is_word(c, ucp));
                let after = self.char_at(pos).map_or(false, |(c, _)| unicode::is_word(c, ucp));
                (before != after) != negate
            }
            AssertKind::StartOffset => pos == self.start_offset,
        }
    }

    /// `\R`: end of the line break at `pos`.
    fn any_newline(&self, pos: usize) -> Option<usize> {
        let (c, n) = self.char_at(pos)?;
        if c == CR {
            return Some(pos + if self.unit_is(pos + 1, LF) { 2 } else { 1 });
        }
        let extra = !self.pat.bsr_anycrlf && matches!(c, 0x0b | 0x0c | 0x85 | 0x2028 | 0x2029);
        (c == LF || extra).then_some(pos + n)
    }

    /// `\X`: end of the extended grapheme cluster at `pos`. Covers CRLF,
    /// combining marks, ZWJ sequences and regional-indicator pairs.
    fn grapheme(&self, pos: usize) -> Option<usize> {
        let (c, n) = self.char_at(pos)?;
        let mut p = pos + n;
        if c == CR {
            return Some(if self.unit_is(p, LF) { p + 1 } else { p });
        }
        if is_grapheme_control(c) {
            return Some(p);
        }
        let mut base = c;
        while unicode::is_prepend(base) {
            match self.char_at(p) {
                Some((c2, n2)) if !is_grapheme_control(c2) => {
                    base = c2;
                    p += n2;
                }
                _ => return Some(p),
            }
        }
        if unicode::is_regional_indicator(base) {
            if let Some((c2, n2)) = self.char_at(p) {
                if unicode::is_regional_indicator(c2) {
                    p += n2;
                }
            }
        }
        let mut prev = base;
        let mut jamo = unicode::hangul_type(base);
        while let (Some(a), Some((c2, n2))) = (jamo, self.char_at(p)) {
            match unicode::hangul_type(c2) {
                Some(b) if unicode::hangul_joins(a, b) => {
                    jamo = Some(b);
                    prev = c2;
                    p += n2;
                }
                _ => break,
            }
        }
        while let Some((c2, n2)) = self.char_at(p) {
            let joins = unicode::is_grapheme_extend(c2)
                || c2 == 0x200d
                || (prev == 0x200d && unicode::is_extended_pictographic(c2));
            if !joins {
                break;
            }
            prev = c2;
            p += n2;
        }
        Some(p)
    }

    fn match_backref(&self, s: usize, e: usize, pos: usize, caseless: bool) -> Option<usize> {
        if !caseless {
            let len = e - s;
            let end = pos.checked_add(len)?;
            return (end <= self.subject.len() && self.subject[s..e] == self.subject[pos..end]).then_some(end);
        }
        let (mut i, mut p) = (s, pos);
        while i < e {
            let (a, an) = C::decode(self.subject, i, self.utf);
            let (b, bn) = self.char_at(p)?;
            if unicode::fold(a, self.unicode_case) != unicode::fold(b, self.unicode_case) {
                return None;
            }
            i += an;
            p += bn;
        }
        Some(p)
    }

    fn accept_here(&self, pos: usize) -> bool {
        if self.end_anchored && pos != self.subject.len() {
            return false;
        }
        if pos == self.keep {
            if self.opts.contains(MatchOptions::NOTEMPTY) {
                return false;
            }
            if self.opts.contains(MatchOptions::NOTEMPTY_ATSTART) && self.keep == self.start_offset {
                return false;
            }
        }
        true
    }

    fn record(&mut self, frame: Frame) -> i32 {
        if self.push(frame) {
            STEP_NEXT
        } else {
            RUN_ERROR
        }
    }

    // --- dispatch ---

    /// Execute the op at `pc`.
    pub(crate) fn step(&mut self, pc: usize) -> i32 {
        let pat = self.pat;
        let pos = self.regs.pos;
        let advance = |vm: &mut Self, to: Option<usize>| match to {
            Some(p) => {
                vm.regs.pos = p;
                STEP_NEXT
            }
            None => STEP_FAIL,
        };
        match &pat.program.ops[pc] {
            Op::Char(c) => {
                let to = self.char_at(pos).and_then(|(cp, n)| (cp == *c).then_some(pos + n));
                advance(self, to)
            }
            Op::CharNoCase(f) => {
                let to = self
                    .char_at(pos)
                    .and_then(|(cp, n)| (unicode::fold(cp, self.unicode_case) == *f).then_some(pos + n));
                advance(self, to)
            }
            Op::Str(s) => {
                let mut p = pos;
                for &c in s.iter() {
                    match self.char_at(p) {
                        Some((cp, n)) if cp == c => p += n,
                        _ => return STEP_FAIL,
                    }
                }
                advance(self, Some(p))
            }
            Op::StrNoCase(s) => {
                let mut p = pos;
                for &c in s.iter() {
                    match self.char_at(p) {
                        Some((cp, n)) if unicode::fold(cp, self.unicode_case) == c => p += n,
                        _ => return STEP_FAIL,
                    }
                }
                advance(self, Some(p))
            }
            Op::Any => {
                let to = self.char_at(pos).map(|(_, n)| pos + n);
                advance(self, to)
            }
            Op::AnyNotNl => {
                let to = match self.char_at(pos) {
                    Some((_, n)) if self.newline_at(pos).is_none() => Some(pos + n),
                    _ => None,
                };
                advance(self, to)
            }
            Op::Class(idx) => {
                let class = &pat.program.classes[*idx as usize];
                let to = self.char_at(pos).and_then(|(cp, n)| class.matches(cp).then_some(pos + n));
                advance(self, to)
            }
            Op::AnyNewline => {
                let to = self.any_newline(pos);
                advance(self, to)
            }
            Op::Grapheme => {
                let to = self.grapheme(pos);
                advance(self, to)
            }
            Op::Assert(kind) => {
                if self.assert(*kind, pos) {
                    STEP_NEXT
                } else {
                    STEP_FAIL
                }
            }
            Op::GroupStart(g) => {
                let group = *g as usize;
                let old = self.open[group];
                let code = self.record(Frame::Open { group, old });
                self.open[group] = pos;
                code
            }
            Op::GroupEnd(g) => {
                let group = *g as usize;
                let old = (self.slots[2 * group], self.slots[2 * group + 1]);
                let code = self.record(Frame::Capture { group, old });
                self.slots[2 * group] = self.open[group];
                self.slots[2 * group + 1] = pos;
                code
            }
            Op::Push { rel, then } => {
                let code = self.push_alt(target(pc, *rel), *then);
                if code < 0 {
                    code
                } else {
                    STEP_NEXT
                }
            }
            Op::Jump(rel) => {
                self.pc = target(pc, *rel);
                STEP_JUMP
            }
            Op::Fail => STEP_FAIL,
            Op::NullStart(id) => {
                let id = *id as usize;
                let old = self.nulls[id];
                let code = self.record(Frame::Null { id, old });
                self.nulls[id] = pos;
                code
            }
            Op::NullEnd { id, exit } => {
                if self.nulls[*id as usize] == pos {
                    self.pc = target(pc, *exit);
                    STEP_JUMP
                } else {
                    STEP_NEXT
                }
            }
            Op::Mark { id, kind } => {
                let kind = match kind {
                    MarkKind::Atomic => MarkFrame::Atomic,
                    MarkKind::Then => MarkFrame::Then,
                    MarkKind::Assert { on_fail } => {
                        MarkFrame::Assert { on_fail: on_fail.map(|rel| target(pc, rel)) }
                    }
                };
                self.record(Frame::Mark { id: *id, pos, kind })
            }
            Op::Cut { id, restore_pos } => {
                self.cut(*id, *restore_pos);
                STEP_NEXT
            }
            Op::StepBack(n) => {
                let mut p = pos;
                for _ in 0..*n {
                    match self.char_before(p) {
                        Some((_, len)) => p -= len,
                        None => return STEP_FAIL,
                    }
                }
                advance(self, Some(p))
            }
            Op::BackRef { groups, caseless } => {
                let set = groups.iter().map(|&g| g as usize).find(|&g| self.slots[2 * g + 1] != UNSET);
                match set {
                    Some(g) => {
                        let to = self.match_backref(self.slots[2 * g], self.slots[2 * g + 1], pos, *caseless);
                        advance(self, to)
                    }
                    None if pat.flags.contains(CompileFlags::MATCH_UNSET_BACKREF) => STEP_NEXT,
                    None => STEP_FAIL,
                }
            }
            Op::Call { rel, group } => {
                if self.calls.iter().any(|c| c.group == *group && c.entry_pos == pos) {
                    self.error = Some(MatchError::RecursionLoop);
                    return RUN_ERROR;
                }
                if self.calls.len() >= self.depth_limit {
                    self.error = Some(MatchError::ResourceExhausted(Limit::Depth));
                    return RUN_ERROR;
                }
                if !self.push(Frame::CallPush) {
                    return RUN_ERROR;
                }
                self.calls.push(CallRec {
                    ret: pc + 1,
                    group: *group,
                    entry_pos: pos,
                    slots: self.slots.clone().into_boxed_slice(),
                    open: self.open.clone().into_boxed_slice(),
                });
                self.pc = target(pc, *rel);
                STEP_JUMP
            }
            Op::Return => {
                let rec = match self.calls.pop() {
                    Some(rec) => rec,
                    None => return STEP_FAIL,
                };
                let ret = rec.ret;
                let inner_slots = self.slots.clone().into_boxed_slice();
                let inner_open = self.open.clone().into_boxed_slice();
                self.slots.copy_from_slice(&rec.slots);
                self.open.copy_from_slice(&rec.open);
                let returned = Returned { rec, slots: inner_slots, open: inner_open };
                if !self.push(Frame::CallPop(Box::new(returned))) {
                    return RUN_ERROR;
                }
                self.pc = ret;
                STEP_JUMP
            }
            Op::CondGroup { groups, no } => {
                if groups.iter().any(|&g| self.slots[2 * g as usize + 1] != UNSET) {
                    STEP_NEXT
                } else {
                    self.pc = target(pc, *no);
                    STEP_JUMP
                }
            }
            Op::CondRecursion { group, no } => {
                let hit = match (group, self.calls.last()) {
                    (_, None) => false,
                    (None, Some(_)) => true,
                    (Some(g), Some(c)) => c.group == *g,
                };
                if hit {
                    STEP_NEXT
                } else {
                    self.pc = target(pc, *no);
                    STEP_JUMP
                }
            }
            Op::Keep => {
                let old = self.keep;
                let code = self.record(Frame::Keep { old });
                self.keep = pos;
                code
            }
            Op::Commit => self.record(Frame::Verb { verb: VerbKind::Commit, pos }),
            Op::Prune => self.record(Frame::Verb { verb: VerbKind::Prune, pos }),
            Op::Skip => self.record(Frame::Verb { verb: VerbKind::Skip, pos }),
            Op::Then(id) => self.record(Frame::Verb { verb: VerbKind::Then(*id), pos }),
            Op::SetMark(name) => {
                let old = self.mark;
                let code = self.record(Frame::Label { name: *name, old, pos });
                self.mark = Some(*name);
                code
            }
            Op::SkipTo(name) => self.record(Frame::Verb { verb: VerbKind::SkipTo(*name), pos }),
            Op::End => {
                if self.accept_here(pos) {
                    STEP_MATCH
                } else {
                    STEP_FAIL
                }
            }
        }
    }
}

// === Search ===

/// Try start positions from `start_offset` until an attempt matches,
/// running each attempt with `run`.
pub(crate) fn search<C, F>(
    pattern: &Pattern<C>,
    subject: &[C],
    start_offset: usize,
    opts: MatchOptions,
    ctx: &mut MatchContext,
    mut run: F,
) -> Result<Option<CaptureResult>, MatchError>
where
    C: CodeUnit,
    F: FnMut(&mut Vm<'_, C>) -> i32,
{
    let inner = &*pattern.inner;
    let len = subject.len();
    if start_offset > len {
        return Err(MatchError::BadOffset);
    }
    let utf = inner.flags.contains(CompileFlags::UTF);
    if utf {
        if !opts.contains(MatchOptions::NO_UTF_CHECK) {
            C::validate(subject).map_err(|offset| MatchError::InvalidUtf { offset })?;
        }
        if !C::is_boundary(subject, start_offset, true) {
            return Err(MatchError::BadUtfOffset);
        }
    }
    let anchored = inner.anchored || opts.contains(MatchOptions::ANCHORED);
    let last_start = ctx.offset_limit.map_or(len, |l| l.min(len));

    let mut vm = Vm::new(inner, subject, start_offset, opts, ctx);
    let mut attempts = 0u64;
    let mut at = start_offset;
    let outcome = loop {
        if !anchored && !inner.prefix.is_empty() {
            match C::find(subject, &inner.prefix, at) {
                Some(p) => {
                    if p != at {
                        trace!("prefilter skipped {} -> {}", at, p);
                    }
                    at = p;
                }
                None => break Ok(None),
            }
        }
        if at > last_start || len - at < inner.min_length {
            break Ok(None);
        }
        trace!("attempt at {}", at);
        attempts += 1;
        vm.reset(at);
        match run(&mut vm) {
            RUN_MATCHED => break Ok(Some(vm.result())),
            RUN_COMMIT => break Ok(None),
            RUN_ERROR => break Err(vm.error.take().unwrap_or(MatchError::ResourceExhausted(Limit::Match))),
            RUN_SKIP if vm.skip_to > at && !anchored => {
                at = vm.skip_to;
                continue;
            }
            _ => {}
        }
        if anchored || at >= len {
            break Ok(None);
        }
        at += if utf { C::decode(subject, at, true).1 } else { 1 };
    };
    ctx.steps = vm.steps;
    ctx.attempts = attempts;
    outcome
}

// === Matcher ===

/// Execute a compiled pattern against a subject.
pub trait Matcher<C: CodeUnit> {
    fn exec(
        &self,
        subject: &[C],
        start_offset: usize,
        opts: MatchOptions,
        ctx: &mut MatchContext,
    ) -> Result<Option<CaptureResult>, MatchError>;
}

impl<C: CodeUnit> Matcher<C> for Pattern<C> {
    fn exec(
        &self,
        subject: &[C],
        start_offset: usize,
        opts: MatchOptions,
        ctx: &mut MatchContext,
    ) -> Result<Option<CaptureResult>, MatchError> {
        search(self, subject, start_offset, opts, ctx, |vm| vm.run())
    }
}

/// Run the interpreter. `Ok(None)` means no match.
pub fn exec<C: CodeUnit>(
    pattern: &Pattern<C>,
    subject: &[C],
    start_offset: usize,
    opts: MatchOptions,
    ctx: &mut MatchContext,
) -> Result<Option<CaptureResult>, MatchError> {
    Matcher::exec(pattern, subject, start_offset, opts, ctx)
}
