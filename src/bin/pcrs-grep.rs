// pcrs-grep.rs - Command-line entry point for the grep tool.

use std::env;
use std::io::{self, Write};
use std::process;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut err = io::stderr().lock();
    let code = pcrs::grep::run(args, io::stdin().lock(), &mut out, &mut err);
    let code = if out.flush().is_err() { 2 } else { code };
    process::exit(code);
}
