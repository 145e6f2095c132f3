// config.rs - Build introspection.
// Reports the Cargo features this crate was built with and the current
// process-wide defaults.

use std::fmt;

use crate::options::{LinkSize, Newline};
use crate::regenc::Width;
use crate::regexec::{get_depth_limit, get_heap_limit, get_match_limit};
use crate::regint::get_max_program_size;
use crate::regjit;
use crate::regparse::get_parse_depth_limit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub version: &'static str,
    /// Unicode properties, UTF and UCP support.
    pub unicode: bool,
    /// Code-unit widths compiled in.
    pub widths: Vec<Width>,
    pub link_size: LinkSize,
    /// Built with the `jit` feature.
    pub jit: bool,
    /// Native code can be generated on this host.
    pub jit_available: bool,
    pub newline: Newline,
    /// `\R` matches only CR, LF and CRLF by default.
    pub bsr_anycrlf: bool,
    pub match_limit: u32,
    pub depth_limit: u32,
    pub heap_limit: u32,
    pub parse_depth_limit: u32,
    pub max_program_size: usize,
}

impl BuildConfig {
    pub fn current() -> BuildConfig {
        let mut widths = vec![Width::Eight];
        if cfg!(feature = "unit16") {
            widths.push(Width::Sixteen);
        }
        if cfg!(feature = "unit32") {
            widths.push(Width::ThirtyTwo);
        }
        BuildConfig {
            version: env!("CARGO_PKG_VERSION"),
            unicode: cfg!(feature = "unicode"),
            widths,
            link_size: LinkSize::build_default(),
            jit: cfg!(feature = "jit"),
            jit_available: regjit::is_available(),
            newline: Newline::default(),
            bsr_anycrlf: false,
            match_limit: get_match_limit(),
            depth_limit: get_depth_limit(),
            heap_limit: get_heap_limit(),
            parse_depth_limit: get_parse_depth_limit(),
            max_program_size: get_max_program_size(),
        }
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pcrs version {}", self.version)?;
        let widths: Vec<String> = self.widths.iter().map(|w| w.to_string()).collect();
        writeln!(f, "  Code-unit widths: {}", widths.join(", "))?;
        writeln!(f, "  Unicode support: {}", yes_no(self.unicode))?;
        writeln!(f, "  JIT support: {} (usable: {})", yes_no(self.jit), yes_no(self.jit_available))?;
        writeln!(f, "  Default newline: {:?}", self.newline)?;
        writeln!(f, "  \\R matches {}", if self.bsr_anycrlf { "CR, LF, or CRLF only" } else { "all Unicode newlines" })?;
        writeln!(f, "  Internal link size: {}", self.link_size.bytes())?;
        writeln!(f, "  Parentheses nest limit: {}", self.parse_depth_limit)?;
        writeln!(f, "  Default match limit: {}", self.match_limit)?;
        writeln!(f, "  Default depth limit: {}", self.depth_limit)?;
        writeln!(f, "  Default heap limit: {} KiB", self.heap_limit)?;
        write!(f, "  Program size cap: {} code units", self.max_program_size)
    }
}
