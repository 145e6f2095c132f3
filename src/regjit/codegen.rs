// codegen.rs - Cranelift IR generation.
// One native function per program: `fn(*mut Vm) -> i32`, one block per op.
// Raw-unit literal compares and jumps are inline; everything else calls
// back into the runtime shims.

use std::mem::offset_of;

use cranelift_codegen::ir::condcodes::IntCC;
use cranelift_codegen::ir::{types, AbiParam, Block, InstBuilder, MemFlags, SigRef, Type, UserFuncName, Value};
use cranelift_codegen::settings::{self, Configurable};
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext, Switch};
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{default_libcall_names, Linkage, Module};
use log::warn;

use super::runtime;
use crate::error::Unsupported;
use crate::options::CompileFlags;
use crate::regenc::{CodeUnit, Width};
use crate::regexec::{JitRegs, RUN_ERROR, RUN_MATCHED, STEP_FAIL, STEP_JUMP, STEP_MATCH, STEP_NEXT};
use crate::regint::{MarkKind, Op, Pattern};

/// Finalized code and the module that owns it.
pub(super) struct Emitted {
    pub module: JITModule,
    pub entry: *const u8,
}

fn codegen_err(e: impl std::fmt::Display) -> Unsupported {
    Unsupported::Codegen(e.to_string())
}

fn target(pc: usize, rel: i32) -> usize {
    (pc as i64 + rel as i64) as usize
}

/// Reject programs the native back end does not translate.
fn check_supported(ops: &[Op]) -> Result<(), Unsupported> {
    for op in ops {
        match op {
            Op::Call { .. } | Op::Return => return Err(Unsupported::Construct("subroutine calls")),
            Op::CondRecursion { .. } => return Err(Unsupported::Construct("recursion conditions")),
            _ => {}
        }
    }
    Ok(())
}

pub(super) fn new_module() -> Result<JITModule, Unsupported> {
    let mut flags = settings::builder();
    flags.set("use_colocated_libcalls", "false").map_err(codegen_err)?;
    flags.set("is_pic", "false").map_err(codegen_err)?;
    flags.set("opt_level", "speed").map_err(codegen_err)?;
    let isa_builder = cranelift_native::builder().map_err(|msg| {
        warn!("native code generation unavailable: {}", msg);
        Unsupported::Host(msg.to_string())
    })?;
    let isa = isa_builder.finish(settings::Flags::new(flags)).map_err(codegen_err)?;
    Ok(JITModule::new(JITBuilder::with_isa(isa, default_libcall_names())))
}

pub(super) fn emit<C: CodeUnit>(pattern: &Pattern<C>) -> Result<Emitted, Unsupported> {
    let program = pattern.program();
    check_supported(&program.ops)?;

    let mut module = new_module()?;
    let ptr = module.target_config().pointer_type();

    let mut sig = module.make_signature();
    sig.params.push(AbiParam::new(ptr));
    sig.returns.push(AbiParam::new(types::I32));
    let id = module
        .declare_function("pcrs_match", Linkage::Local, &sig)
        .map_err(codegen_err)?;

    let mut step_sig = module.make_signature();
    step_sig.params.push(AbiParam::new(ptr));
    step_sig.params.push(AbiParam::new(ptr));
    step_sig.returns.push(AbiParam::new(types::I32));

    let mut push_sig = module.make_signature();
    push_sig.params.push(AbiParam::new(ptr));
    push_sig.params.push(AbiParam::new(ptr));
    push_sig.params.push(AbiParam::new(types::I32));
    push_sig.returns.push(AbiParam::new(types::I32));

    let mut bt_sig = module.make_signature();
    bt_sig.params.push(AbiParam::new(ptr));
    bt_sig.returns.push(AbiParam::new(types::I32));

    let mut ctx = module.make_context();
    ctx.func.signature = sig;
    ctx.func.name = UserFuncName::user(0, id.as_u32());
    let mut fbc = FunctionBuilderContext::new();
    {
        let mut b = FunctionBuilder::new(&mut ctx.func, &mut fbc);
        let entry = b.create_block();
        b.append_block_params_for_function_params(entry);
        let blocks: Vec<Block> = program.ops.iter().map(|_| b.create_block()).collect();
        let fail = b.create_block();

        b.switch_to_block(entry);
        let vm = b.block_params(entry)[0];
        let sigs = Sigs {
            step: b.import_signature(step_sig),
            push: b.import_signature(push_sig),
            backtrack: b.import_signature(bt_sig),
        };
        b.ins().jump(blocks[0], &[]);

        let raw = !pattern.flags().contains(CompileFlags::UTF);
        let mut g = Gen { b, ptr, vm, blocks, fail, sigs, _unit: std::marker::PhantomData::<C> };
        for (pc, op) in program.ops.iter().enumerate() {
            g.op(pc, op, raw);
        }
        g.fail_block(&resume_targets(&program.ops));
        g.b.seal_all_blocks();
        g.b.finalize();
    }

    module.define_function(id, &mut ctx).map_err(codegen_err)?;
    module.clear_context(&mut ctx);
    module.finalize_definitions().map_err(codegen_err)?;
    let entry = module.get_finalized_function(id);
    Ok(Emitted { module, entry })
}

/// Every pc a backtrack can resume at.
fn resume_targets(ops: &[Op]) -> Vec<usize> {
    let mut out: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter_map(|(pc, op)| match op {
            Op::Push { rel, .. } => Some(target(pc, *rel)),
            Op::Mark { kind: MarkKind::Assert { on_fail: Some(rel) }, .. } => Some(target(pc, *rel)),
            _ => None,
        })
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

struct Sigs {
    step: SigRef,
    push: SigRef,
    backtrack: SigRef,
}

struct Gen<'f, C> {
    b: FunctionBuilder<'f>,
    ptr: Type,
    vm: Value,
    blocks: Vec<Block>,
    fail: Block,
    sigs: Sigs,
    _unit: std::marker::PhantomData<C>,
}

// `JitRegs` is the first field of the `repr(C)` VM.
const OFF_POS: i32 = offset_of!(JitRegs, pos) as i32;
const OFF_SUBJECT: i32 = offset_of!(JitRegs, subject) as i32;
const OFF_LEN: i32 = offset_of!(JitRegs, len) as i32;

impl<'f, C: CodeUnit> Gen<'f, C> {
    fn next(&self, pc: usize) -> Block {
        self.blocks.get(pc + 1).copied().unwrap_or(self.fail)
    }

    fn reg(&mut self, off: i32) -> Value {
        self.b.ins().load(self.ptr, MemFlags::trusted(), self.vm, off)
    }

    fn set_pos(&mut self, v: Value) {
        self.b.ins().store(MemFlags::trusted(), v, self.vm, OFF_POS);
    }

    /// Load the unit at `pos + k`, zero-extended to 32 bits.
    fn unit(&mut self, pos: Value, k: usize) -> Value {
        let subject = self.reg(OFF_SUBJECT);
        let bytes = C::WIDTH.bytes();
        let scaled = self.b.ins().imul_imm(pos, bytes as i64);
        let addr = self.b.ins().iadd(subject, scaled);
        let off = (k * bytes) as i32;
        let flags = MemFlags::trusted();
        match C::WIDTH {
            Width::Eight => self.b.ins().uload8(types::I32, flags, addr, off),
            Width::Sixteen => self.b.ins().uload16(types::I32, flags, addr, off),
            Width::ThirtyTwo => self.b.ins().load(types::I32, flags, addr, off),
        }
    }

    fn call(&mut self, sig: SigRef, addr: usize, args: &[Value]) -> Value {
        let callee = self.b.ins().iconst(self.ptr, addr as i64);
        let inst = self.b.ins().call_indirect(sig, callee, args);
        self.b.inst_results(inst)[0]
    }

    /// Inline compare of raw units starting at the current position.
    fn literal(&mut self, pc: usize, units: &[u32]) {
        let pos = self.reg(OFF_POS);
        let len = self.reg(OFF_LEN);
        let end = self.b.ins().iadd_imm(pos, units.len() as i64);
        let fits = self.b.ins().icmp(IntCC::UnsignedLessThanOrEqual, end, len);
        let mut check = self.b.create_block();
        self.b.ins().brif(fits, check, &[], self.fail, &[]);
        for (k, &c) in units.iter().enumerate() {
            self.b.switch_to_block(check);
            let u = self.unit(pos, k);
            let eq = self.b.ins().icmp_imm(IntCC::Equal, u, c as i32 as i64);
            check = self.b.create_block();
            self.b.ins().brif(eq, check, &[], self.fail, &[]);
        }
        self.b.switch_to_block(check);
        self.set_pos(end);
        let next = self.next(pc);
        self.b.ins().jump(next, &[]);
    }

    /// Branch on a `STEP_*` result from the runtime.
    fn dispatch(&mut self, r: Value, pc: usize, jump: Option<Block>) {
        let next = self.next(pc);
        let not_next = self.b.create_block();
        let is_next = self.b.ins().icmp_imm(IntCC::Equal, r, STEP_NEXT as i64);
        self.b.ins().brif(is_next, next, &[], not_next, &[]);

        self.b.switch_to_block(not_next);
        let rest = self.b.create_block();
        let is_fail = self.b.ins().icmp_imm(IntCC::Equal, r, STEP_FAIL as i64);
        self.b.ins().brif(is_fail, self.fail, &[], rest, &[]);

        self.b.switch_to_block(rest);
        if let Some(j) = jump {
            let ret = self.b.create_block();
            let is_jump = self.b.ins().icmp_imm(IntCC::Equal, r, STEP_JUMP as i64);
            self.b.ins().brif(is_jump, j, &[], ret, &[]);
            self.b.switch_to_block(ret);
        }
        self.b.ins().return_(&[r]);
    }

    fn op(&mut self, pc: usize, op: &Op, raw: bool) {
        self.b.switch_to_block(self.blocks[pc]);
        match op {
            Op::Char(c) if raw && *c <= C::MAX_RAW => self.literal(pc, &[*c]),
            Op::Str(s) if raw && s.iter().all(|&c| c <= C::MAX_RAW) => self.literal(pc, s),
            Op::Jump(rel) => {
                let t = self.blocks[target(pc, *rel)];
                self.b.ins().jump(t, &[]);
            }
            Op::Fail => {
                self.b.ins().jump(self.fail, &[]);
            }
            Op::Push { rel, then } => {
                let t = self.b.ins().iconst(self.ptr, target(pc, *rel) as i64);
                let then = self.b.ins().iconst(types::I32, *then as i64);
                let r = self.call(self.sigs.push, runtime::push_addr::<C>(), &[self.vm, t, then]);
                let ok = self.b.ins().icmp_imm(IntCC::Equal, r, 0);
                let ret = self.b.create_block();
                let next = self.next(pc);
                self.b.ins().brif(ok, next, &[], ret, &[]);
                self.b.switch_to_block(ret);
                self.b.ins().return_(&[r]);
            }
            Op::End => {
                let at = self.b.ins().iconst(self.ptr, pc as i64);
                let r = self.call(self.sigs.step, runtime::step_addr::<C>(), &[self.vm, at]);
                let matched = self.b.ins().icmp_imm(IntCC::Equal, r, STEP_MATCH as i64);
                let ret = self.b.create_block();
                self.b.ins().brif(matched, ret, &[], self.fail, &[]);
                self.b.switch_to_block(ret);
                let code = self.b.ins().iconst(types::I32, RUN_MATCHED as i64);
                self.b.ins().return_(&[code]);
            }
            _ => {
                let jump = match op {
                    Op::NullEnd { exit, .. } => Some(self.blocks[target(pc, *exit)]),
                    Op::CondGroup { no, .. } => Some(self.blocks[target(pc, *no)]),
                    _ => None,
                };
                let at = self.b.ins().iconst(self.ptr, pc as i64);
                let r = self.call(self.sigs.step, runtime::step_addr::<C>(), &[self.vm, at]);
                self.dispatch(r, pc, jump);
            }
        }
    }

    /// Shared failure path: backtrack, then resume through a jump table.
    fn fail_block(&mut self, targets: &[usize]) {
        self.b.switch_to_block(self.fail);
        let r = self.call(self.sigs.backtrack, runtime::backtrack_addr::<C>(), &[self.vm]);
        let negative = self.b.ins().icmp_imm(IntCC::SignedLessThan, r, 0);
        let ret = self.b.create_block();
        let resume = self.b.create_block();
        self.b.ins().brif(negative, ret, &[], resume, &[]);

        self.b.switch_to_block(ret);
        self.b.ins().return_(&[r]);

        self.b.switch_to_block(resume);
        let mut switch = Switch::new();
        for &t in targets {
            switch.set_entry(t as u128, self.blocks[t]);
        }
        let bad = self.b.create_block();
        switch.emit(&mut self.b, r, bad);
        self.b.switch_to_block(bad);
        let code = self.b.ins().iconst(types::I32, RUN_ERROR as i64);
        self.b.ins().return_(&[code]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_targets_cover_pushes_and_assertions() {
        let p = Pattern::<u8>::compile(b"a|(?!b)c", CompileFlags::empty()).unwrap();
        let targets = resume_targets(&p.program().ops);
        assert_eq!(targets.len(), 2);
        for t in targets {
            assert!(t < p.program().ops.len());
        }
    }

    #[test]
    fn subroutines_are_rejected() {
        let p = Pattern::<u8>::compile(b"(a)(?1)", CompileFlags::empty()).unwrap();
        assert!(matches!(check_supported(&p.program().ops), Err(Unsupported::Construct(_))));
    }
}
