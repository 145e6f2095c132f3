//! # pcrs
//!
//! Perl-compatible regular expressions in Rust: a pattern parser, a bytecode
//! compiler with a configurable link size, a backtracking interpreter and an
//! optional Cranelift JIT. Subjects may be 8-, 16- or 32-bit code units.
//! Literal prefixes are found with [`memchr`](https://crates.io/crates/memchr).
//!
//! ## Quick Start
//!
//! ```rust
//! use pcrs::prelude::*;
//!
//! let re = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
//! let m = re.find("Date: 2026-02-12").unwrap();
//! assert_eq!(m.as_str(), Some("2026-02-12"));
//! assert_eq!(m.start(), 6);
//! ```
//!
//! For fine-grained control, use [`RegexBuilder`](api::RegexBuilder):
//!
//! ```rust
//! use pcrs::prelude::*;
//!
//! let re = Regex::builder(r"hello")
//!     .case_insensitive(true)
//!     .build()
//!     .unwrap();
//! assert!(re.is_match("Hello World"));
//! ```
//!
//! ## Low-Level API
//!
//! Compile once, then match with a caller-owned context:
//!
//! ```rust
//! use pcrs::options::{CompileFlags, MatchOptions};
//! use pcrs::regexec::{exec, MatchContext};
//! use pcrs::regint::Pattern;
//!
//! let pattern = Pattern::<u8>::compile(br"(?<year>\d{4})", CompileFlags::empty()).unwrap();
//! assert_eq!(pattern.group_number("year"), Some(1));
//!
//! let mut ctx = MatchContext::new();
//! let m = exec(&pattern, b"in 2024", 0, MatchOptions::empty(), &mut ctx).unwrap().unwrap();
//! assert_eq!(m.get(1), Some(3..7));
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`regparse`] | Pattern parser |
//! | [`regcomp`] | Tree-to-bytecode compiler |
//! | [`regexec`] | Backtracking VM, match context and results |
//! | [`regjit`] | Cranelift back end (feature `jit`) |
//! | [`regint`] | Ops, programs and compiled patterns |
//! | [`regenc`] | Code-unit trait |
//! | [`unicode`] | Character properties and case folding |
//! | [`regerror`] | Error codes and messages |
//! | [`regposix`] | POSIX `regcomp`/`regexec` wrapper |
//! | [`grep`] | The `pcrs-grep` tool |
//! | [`config`] | Build introspection |

pub mod api;
pub mod config;
pub mod encodings;
pub mod error;
pub mod grep;
pub mod options;
pub mod prelude;
pub mod regcomp;
pub mod regenc;
pub mod regerror;
pub mod regexec;
pub mod regint;
pub mod regjit;
pub mod regparse;
pub mod regparse_types;
pub mod regposix;
pub mod unicode;

pub use config::BuildConfig;
pub use error::{CompileError, MatchError, ParseError, RegexError, Unsupported};
pub use options::{CompileFlags, LinkSize, MatchOptions, Newline};
pub use regcomp::{compile_pattern, CompileOptions};
pub use regexec::{exec, CaptureResult, MatchContext, Matcher};
pub use regint::Pattern;
pub use regjit::{jit_compile, CompiledNative};
