// runtime.rs - Entry points called from native code.
// Thin `extern "C"` shims over the interpreter's `Vm`, so native and
// interpreted matching share one implementation of every non-inline op.

#![allow(improper_ctypes_definitions)]

use crate::regenc::CodeUnit;
use crate::regexec::Vm;

/// Execute the op at `pc`; returns a `STEP_*` or negative `RUN_*` code.
pub(super) extern "C" fn rt_step<C: CodeUnit>(vm: *mut Vm<'_, C>, pc: usize) -> i32 {
    // SAFETY: native code only passes the VM pointer it was entered with,
    // which is live and exclusively borrowed for the whole call.
    let vm = unsafe { &mut *vm };
    vm.step(pc)
}

/// Record a choice point resuming at `target`. Zero, or `RUN_ERROR`.
pub(super) extern "C" fn rt_push<C: CodeUnit>(vm: *mut Vm<'_, C>, target: usize, then: u32) -> i32 {
    // SAFETY: as in `rt_step`.
    let vm = unsafe { &mut *vm };
    vm.push_alt(target, then)
}

/// Resume pc after a failure, or a negative `RUN_*` code.
pub(super) extern "C" fn rt_backtrack<C: CodeUnit>(vm: *mut Vm<'_, C>) -> i32 {
    // SAFETY: as in `rt_step`.
    let vm = unsafe { &mut *vm };
    vm.backtrack()
}

pub(super) fn step_addr<C: CodeUnit>() -> usize {
    rt_step::<C> as usize
}

pub(super) fn push_addr<C: CodeUnit>() -> usize {
    rt_push::<C> as usize
}

pub(super) fn backtrack_addr<C: CodeUnit>() -> usize {
    rt_backtrack::<C> as usize
}
