// mod.rs - Native back end.
// Compiles a program to machine code with Cranelift. The generated code
// drives the interpreter's `Vm`, so results, errors and step counts match
// the interpreter exactly.

#[cfg(feature = "jit")]
mod codegen;
#[cfg(feature = "jit")]
mod runtime;

use std::fmt;

#[cfg(feature = "jit")]
use log::debug;

use crate::error::{MatchError, Unsupported};
use crate::options::MatchOptions;
use crate::regenc::CodeUnit;
use crate::regexec::{CaptureResult, MatchContext, Matcher};
use crate::regint::Pattern;

#[cfg(feature = "jit")]
type NativeFn = unsafe extern "C" fn(*mut u8) -> i32;

/// Native code for one pattern.
///
/// Owns the code memory; it is released on drop.
pub struct CompiledNative<C: CodeUnit> {
    pattern: Pattern<C>,
    #[cfg(feature = "jit")]
    func: NativeFn,
    #[cfg(feature = "jit")]
    module: Option<cranelift_jit::JITModule>,
}

// SAFETY: the module is only touched again on drop, and the finalized code
// is immutable and reentrant; all per-call state lives in the caller's `Vm`.
#[cfg(feature = "jit")]
unsafe impl<C: CodeUnit> Send for CompiledNative<C> {}
#[cfg(feature = "jit")]
unsafe impl<C: CodeUnit> Sync for CompiledNative<C> {}

impl<C: CodeUnit> CompiledNative<C> {
    pub fn pattern(&self) -> &Pattern<C> {
        &self.pattern
    }
}

impl<C: CodeUnit> fmt::Debug for CompiledNative<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledNative").field("pattern", &self.pattern).finish()
    }
}

#[cfg(feature = "jit")]
impl<C: CodeUnit> Drop for CompiledNative<C> {
    fn drop(&mut self) {
        if let Some(module) = self.module.take() {
            // SAFETY: `func` is never called after this point.
            unsafe { module.free_memory() };
        }
    }
}

/// Translate `pattern` to native code.
///
/// `Err` is a fallback signal, never a match failure: run the interpreter.
pub fn jit_compile<C: CodeUnit>(pattern: &Pattern<C>) -> Result<CompiledNative<C>, Unsupported> {
    #[cfg(feature = "jit")]
    {
        let emitted = codegen::emit(pattern).map_err(|e| {
            debug!("JIT fallback to interpreter: {}", e);
            e
        })?;
        debug!("JIT compiled {} ops", pattern.program().ops.len());
        // SAFETY: the entry was built with the signature `fn(*mut Vm) -> i32`.
        let func = unsafe { std::mem::transmute::<*const u8, NativeFn>(emitted.entry) };
        Ok(CompiledNative { pattern: pattern.clone(), func, module: Some(emitted.module) })
    }
    #[cfg(not(feature = "jit"))]
    {
        let _ = pattern;
        Err(Unsupported::NotBuilt)
    }
}

/// Whether native compilation can work on this build and host.
pub fn is_available() -> bool {
    #[cfg(feature = "jit")]
    {
        cranelift_native::builder().is_ok()
    }
    #[cfg(not(feature = "jit"))]
    {
        false
    }
}

impl<C: CodeUnit> Matcher<C> for CompiledNative<C> {
    fn exec(
        &self,
        subject: &[C],
        start_offset: usize,
        opts: MatchOptions,
        ctx: &mut MatchContext,
    ) -> Result<Option<CaptureResult>, MatchError> {
        #[cfg(feature = "jit")]
        {
            let func = self.func;
            crate::regexec::search(&self.pattern, subject, start_offset, opts, ctx, |vm| {
                // SAFETY: `vm` is a live `repr(C)` VM for this pattern, which
                // is what the generated code was built against.
                unsafe { func(vm as *mut _ as *mut u8) }
            })
        }
        #[cfg(not(feature = "jit"))]
        {
            self.pattern.exec(subject, start_offset, opts, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileFlags;
    use crate::regexec::exec;

    #[cfg(not(feature = "jit"))]
    #[test]
    fn not_built() {
        let p = Pattern::<u8>::compile(b"abc", CompileFlags::empty()).unwrap();
        assert_eq!(jit_compile(&p).unwrap_err(), Unsupported::NotBuilt);
        assert!(!is_available());
    }

    #[cfg(feature = "jit")]
    #[test]
    fn native_agrees_with_interpreter() {
        let cases: &[(&str, &str)] = &[
            ("abc", "xxabcxx"),
            ("a+b", "caaab"),
            ("(a|ab)(c|bcd)(d*)", "abcd"),
            ("(?>a+)b", "aaab"),
            ("a(?=b)", "acab"),
            ("(?<!x)y", "xyzy"),
            ("(\\w+)\\s+\\1", "hello hello"),
            ("a(*THEN)b|ac", "ac"),
            ("aa(*SKIP)b|a", "aac"),
            ("^$", ""),
            ("(?m)^b$", "a\nb\nc"),
            ("x*", "yyy"),
        ];
        for &(pat, subject) in cases {
            let p = Pattern::<u8>::compile(pat.as_bytes(), CompileFlags::empty()).unwrap();
            let native = match jit_compile(&p) {
                Ok(n) => n,
                Err(Unsupported::Host(_)) => return,
                Err(e) => panic!("{}: {}", pat, e),
            };
            let mut a = MatchContext::new();
            let mut b = MatchContext::new();
            let want = exec(&p, subject.as_bytes(), 0, MatchOptions::empty(), &mut a);
            let got = native.exec(subject.as_bytes(), 0, MatchOptions::empty(), &mut b);
            assert_eq!(got, want, "{}", pat);
            assert_eq!(a.last_steps(), b.last_steps(), "{}", pat);
        }
    }

    #[cfg(feature = "jit")]
    #[test]
    fn recursion_is_unsupported() {
        let p = Pattern::<u8>::compile(b"(a(?1)?b)", CompileFlags::empty()).unwrap();
        assert!(matches!(jit_compile(&p), Err(Unsupported::Construct(_)) | Err(Unsupported::Host(_))));
    }
}
