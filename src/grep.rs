// grep.rs - Line-oriented search tool behind the `pcrs-grep` binary.
//
// Argument parsing, pattern setup and per-file search write to caller
// supplied streams, so the whole tool runs in tests without a process.
// Exit status: 0 when something was selected, 1 when nothing was, 2 on error.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::ops::Range;

use log::debug;
use memchr::{memchr, memchr_iter};

use crate::api::{Regex, RegexBuilder};
use crate::error::RegexError;

pub const USAGE: &str = "\
Usage: pcrs-grep [OPTION]... [PATTERN] [FILE]...
Search for PATTERN in each FILE or standard input.

  -c, --count                print only a count of selected lines per file
  -e, --regexp=PATTERN       use PATTERN (may be given more than once)
  -F, --fixed-strings        patterns are literal strings
  -f, --file=FILE            read patterns from FILE, one per line
  -H, --with-filename        print the file name for each match
  -h, --no-filename          suppress file names
  -i, --ignore-case          ignore case distinctions
  -L, --files-without-match  print only names of files with no selected lines
  -l, --files-with-matches   print only names of files with selected lines
  -M, --multiline            patterns may match across lines
  -m, --max-count=N          stop after N selected lines
  -n, --line-number          print line numbers
  -o, --only-matching        show only the matched part of each line
  -q, --quiet                print nothing; exit status only
  -s, --no-messages          suppress messages about unreadable files
  -u, --utf                  patterns and subjects are UTF-8
  -V, --version              print the version and exit
  -v, --invert-match         select non-matching lines
  -w, --word-regexp          match whole words only
  -x, --line-regexp          match whole lines only
      --no-jit               do not use native code
      --help                 show this help
";

const STDIN_NAME: &str = "(standard input)";

// === Options ===

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrepOptions {
    pub patterns: Vec<String>,
    pub pattern_files: Vec<String>,
    pub files: Vec<String>,
    pub ignore_case: bool,
    pub invert: bool,
    pub count: bool,
    pub line_numbers: bool,
    pub only_matching: bool,
    pub line_regexp: bool,
    pub word_regexp: bool,
    pub files_with_matches: bool,
    pub files_without_match: bool,
    pub max_count: Option<u64>,
    pub fixed_strings: bool,
    pub quiet: bool,
    /// `-H` or `-h`; otherwise names are shown for more than one file.
    pub with_filename: Option<bool>,
    pub no_messages: bool,
    pub multiline: bool,
    pub utf: bool,
    pub no_jit: bool,
    pub help: bool,
    pub version: bool,
}

#[derive(Debug)]
pub enum GrepError {
    Usage(String),
    Pattern { pattern: String, error: RegexError },
    Io { path: String, error: io::Error },
}

impl fmt::Display for GrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrepError::Usage(msg) => write!(f, "{}", msg),
            GrepError::Pattern { pattern, error } => write!(f, "error in pattern '{}': {}", pattern, error),
            GrepError::Io { path, error } => write!(f, "failed to read {}: {}", path, error),
        }
    }
}

impl std::error::Error for GrepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrepError::Usage(_) => None,
            GrepError::Pattern { error, .. } => Some(error),
            GrepError::Io { error, .. } => Some(error),
        }
    }
}

fn usage(msg: impl Into<String>) -> GrepError {
    GrepError::Usage(msg.into())
}

fn parse_count(value: &str) -> Result<u64, GrepError> {
    value
        .parse()
        .map_err(|_| usage(format!("invalid number '{}' for --max-count", value)))
}

/// Parse command-line arguments, program name excluded.
///
/// Options may appear anywhere before `--`. Without `-e` or `-f` the first
/// operand is the pattern.
pub fn parse_args<I, S>(args: I) -> Result<GrepOptions, GrepError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut opts = GrepOptions::default();
    let mut operands = Vec::new();
    let mut i = 0;
    let mut stop_options = false;

    while i < args.len() {
        let arg = &args[i];
        i += 1;
        if stop_options || arg == "-" || !arg.starts_with('-') {
            operands.push(arg.clone());
            continue;
        }
        if arg == "--" {
            stop_options = true;
            continue;
        }
        if let Some(long) = arg.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((n, v)) => (n, Some(v.to_owned())),
                None => (long, None),
            };
            let mut value = |what: &str| -> Result<String, GrepError> {
                if let Some(v) = inline.clone() {
                    return Ok(v);
                }
                let v = args.get(i).cloned().ok_or_else(|| usage(format!("'--{}' needs {}", name, what)))?;
                i += 1;
                Ok(v)
            };
            match name {
                "regexp" => opts.patterns.push(value("a pattern")?),
                "file" => opts.pattern_files.push(value("a file name")?),
                "max-count" => opts.max_count = Some(parse_count(&value("a number")?)?),
                "count" => opts.count = true,
                "fixed-strings" => opts.fixed_strings = true,
                "with-filename" => opts.with_filename = Some(true),
                "no-filename" => opts.with_filename = Some(false),
                "ignore-case" => opts.ignore_case = true,
                "files-without-match" => opts.files_without_match = true,
                "files-with-matches" => opts.files_with_matches = true,
                "multiline" => opts.multiline = true,
                "line-number" => opts.line_numbers = true,
                "only-matching" => opts.only_matching = true,
                "quiet" | "silent" => opts.quiet = true,
                "no-messages" => opts.no_messages = true,
                "utf" => opts.utf = true,
                "invert-match" => opts.invert = true,
                "word-regexp" => opts.word_regexp = true,
                "line-regexp" => opts.line_regexp = true,
                "no-jit" => opts.no_jit = true,
                "help" => opts.help = true,
                "version" => opts.version = true,
                _ => return Err(usage(format!("unrecognized option '{}'", arg))),
            }
            continue;
        }

        // Bundled short options; -e, -f and -m take the rest of the word
        // or the next argument.
        let flags = &arg[1..];
        for (at, ch) in flags.char_indices() {
            let rest = &flags[at + ch.len_utf8()..];
            let takes_value = matches!(ch, 'e' | 'f' | 'm');
            if takes_value {
                let v = if !rest.is_empty() {
                    rest.to_owned()
                } else {
                    let v = args.get(i).cloned().ok_or_else(|| usage(format!("'-{}' needs an argument", ch)))?;
                    i += 1;
                    v
                };
                match ch {
                    'e' => opts.patterns.push(v),
                    'f' => opts.pattern_files.push(v),
                    _ => opts.max_count = Some(parse_count(&v)?),
                }
                break;
            }
            match ch {
                'c' => opts.count = true,
                'F' => opts.fixed_strings = true,
                'H' => opts.with_filename = Some(true),
                'h' => opts.with_filename = Some(false),
                'i' => opts.ignore_case = true,
                'L' => opts.files_without_match = true,
                'l' => opts.files_with_matches = true,
                'M' => opts.multiline = true,
                'n' => opts.line_numbers = true,
                'o' => opts.only_matching = true,
                'q' => opts.quiet = true,
                's' => opts.no_messages = true,
                'u' => opts.utf = true,
                'V' => opts.version = true,
                'v' => opts.invert = true,
                'w' => opts.word_regexp = true,
                'x' => opts.line_regexp = true,
                _ => return Err(usage(format!("unrecognized option '-{}'", ch))),
            }
        }
    }

    let mut operands = operands.into_iter();
    if opts.patterns.is_empty() && opts.pattern_files.is_empty() && !opts.help && !opts.version {
        let pattern = operands.next().ok_or_else(|| usage("no pattern given"))?;
        opts.patterns.push(pattern);
    }
    opts.files = operands.collect();
    Ok(opts)
}

// === Pattern setup ===

/// Escape every ASCII punctuation character.
fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch.is_ascii() && !ch.is_ascii_alphanumeric() && ch != ' ' && ch != '\n' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn wrap_pattern(pattern: &str, opts: &GrepOptions) -> String {
    let body = if opts.fixed_strings { escape_literal(pattern) } else { pattern.to_owned() };
    if opts.line_regexp {
        format!("^(?:{})$", body)
    } else if opts.word_regexp {
        format!("(?<!\\w)(?:{})(?!\\w)", body)
    } else {
        body
    }
}

/// Compiled patterns plus output settings.
#[derive(Debug)]
pub struct Grep {
    regexes: Vec<Regex>,
    opts: GrepOptions,
}

/// What one input produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub selected: u64,
    /// The first match error seen; the affected lines count as non-matching.
    pub error: Option<RegexError>,
}

impl Grep {
    /// Compile every `-e` pattern and every line of every `-f` file.
    pub fn new(opts: GrepOptions) -> Result<Grep, GrepError> {
        let mut sources = opts.patterns.clone();
        for path in &opts.pattern_files {
            let text = fs::read_to_string(path).map_err(|error| GrepError::Io { path: path.clone(), error })?;
            sources.extend(text.lines().map(str::to_owned));
        }
        let mut regexes = Vec::with_capacity(sources.len());
        for source in &sources {
            let wrapped = wrap_pattern(source, &opts);
            let builder = if opts.utf { RegexBuilder::new(&wrapped) } else { RegexBuilder::from_bytes(wrapped.as_bytes()) };
            let regex = builder
                .case_insensitive(opts.ignore_case)
                .multi_line(opts.multiline)
                .jit(!opts.no_jit)
                .build()
                .map_err(|error| GrepError::Pattern { pattern: source.clone(), error })?;
            regexes.push(regex);
        }
        debug!("grep: {} patterns, jit {}", regexes.len(), regexes.iter().any(|r| r.is_jit()));
        Ok(Grep { regexes, opts })
    }

    pub fn options(&self) -> &GrepOptions {
        &self.opts
    }

    /// Earliest match of any pattern at or after `from`; ties go to the longer.
    fn first_match(&self, text: &[u8], from: usize) -> Result<Option<Range<usize>>, RegexError> {
        let mut best: Option<Range<usize>> = None;
        for re in &self.regexes {
            if let Some(m) = re.try_find_at(text, from)? {
                let better = match &best {
                    None => true,
                    Some(b) => m.start() < b.start || (m.start() == b.start && m.end() > b.end),
                };
                if better {
                    best = Some(m.range());
                }
            }
        }
        Ok(best)
    }

    fn write_prefix<W: Write>(&self, out: &mut W, name: Option<&str>, line_no: usize) -> io::Result<()> {
        if let Some(name) = name {
            write!(out, "{}:", name)?;
        }
        if self.opts.line_numbers {
            write!(out, "{}:", line_no)?;
        }
        Ok(())
    }

    /// Search one input. `name` is printed before each output line when set.
    pub fn search<W: Write>(&self, label: &str, name: Option<&str>, data: &[u8], out: &mut W) -> io::Result<Outcome> {
        let o = &self.opts;
        let binary = memchr(0, data).is_some();
        let listing = o.count || o.files_with_matches || o.files_without_match || o.quiet;
        let mut outcome = Outcome::default();

        if o.multiline && !o.invert {
            self.search_multiline(label, name, data, binary, listing, out, &mut outcome)?;
        } else {
            let mut line_no = 0;
            for line in lines(data) {
                line_no += 1;
                let line = &data[line];
                let hit = match self.first_match(line, 0) {
                    Ok(m) => m.is_some(),
                    Err(e) => {
                        outcome.error.get_or_insert(e);
                        false
                    }
                };
                if hit == o.invert {
                    continue;
                }
                outcome.selected += 1;
                if !listing {
                    if binary {
                        writeln!(out, "Binary file {} matches", label)?;
                        break;
                    }
                    self.print_line(out, name, line_no, line)?;
                }
                if (listing && !o.count) || o.max_count == Some(outcome.selected) {
                    break;
                }
            }
        }

        if o.quiet {
            return Ok(outcome);
        }
        if o.count {
            match name {
                Some(name) => writeln!(out, "{}:{}", name, outcome.selected)?,
                None => writeln!(out, "{}", outcome.selected)?,
            }
        }
        if (o.files_with_matches && outcome.selected > 0) || (o.files_without_match && outcome.selected == 0) {
            writeln!(out, "{}", label)?;
        }
        Ok(outcome)
    }

    fn print_line<W: Write>(&self, out: &mut W, name: Option<&str>, line_no: usize, line: &[u8]) -> io::Result<()> {
        if !self.opts.only_matching || self.opts.invert {
            self.write_prefix(out, name, line_no)?;
            out.write_all(line)?;
            return out.write_all(b"\n");
        }
        let mut pos = 0;
        while pos <= line.len() {
            let Ok(Some(m)) = self.first_match(line, pos) else { break };
            if m.is_empty() {
                pos = m.end + 1;
                continue;
            }
            self.write_prefix(out, name, line_no)?;
            out.write_all(&line[m.clone()])?;
            out.write_all(b"\n")?;
            pos = m.end;
        }
        Ok(())
    }

    /// Matches may span lines; each match selects the whole lines it touches.
    #[allow(clippy::too_many_arguments)]
    fn search_multiline<W: Write>(
        &self,
        label: &str,
        name: Option<&str>,
        data: &[u8],
        binary: bool,
        listing: bool,
        out: &mut W,
        outcome: &mut Outcome,
    ) -> io::Result<()> {
        let o = &self.opts;
        let mut pos = 0;
        while pos <= data.len() {
            let m = match self.first_match(data, pos) {
                Ok(Some(m)) => m,
                Ok(None) => break,
                Err(e) => {
                    outcome.error.get_or_insert(e);
                    break;
                }
            };
            let first = data[..m.start].iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
            let last = if m.end > m.start { m.end - 1 } else { m.start };
            let block_end = memchr(b'\n', &data[last..]).map_or(data.len(), |p| last + p);
            outcome.selected += 1;
            if !listing {
                if binary {
                    writeln!(out, "Binary file {} matches", label)?;
                    return Ok(());
                }
                let line_no = memchr_iter(b'\n', &data[..first]).count() + 1;
                if o.only_matching {
                    self.write_prefix(out, name, line_no)?;
                    out.write_all(&data[m.clone()])?;
                    out.write_all(b"\n")?;
                } else {
                    // One prefix for the whole block, as a single output record.
                    self.write_prefix(out, name, line_no)?;
                    out.write_all(&data[first..block_end])?;
                    out.write_all(b"\n")?;
                }
            }
            if (listing && !o.count) || o.max_count == Some(outcome.selected) {
                break;
            }
            pos = block_end + 1;
        }
        Ok(())
    }
}

/// Line ranges, newline excluded; a final newline does not start a line.
fn lines(data: &[u8]) -> impl Iterator<Item = Range<usize>> + '_ {
    let mut start = 0;
    std::iter::from_fn(move || {
        if start >= data.len() {
            return None;
        }
        let end = memchr(b'\n', &data[start..]).map_or(data.len(), |p| start + p);
        let line = start..end;
        start = end + 1;
        Some(line)
    })
}

// === Driver ===

/// Run the tool; returns the exit status.
pub fn run<I, S, R, W, E>(args: I, mut stdin: R, out: &mut W, err: &mut E) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    R: Read,
    W: Write,
    E: Write,
{
    let opts = match parse_args(args) {
        Ok(o) => o,
        Err(e) => {
            let _ = writeln!(err, "pcrs-grep: {}", e);
            let _ = writeln!(err, "Usage: pcrs-grep [OPTION]... [PATTERN] [FILE]...");
            return 2;
        }
    };
    if opts.help {
        return if out.write_all(USAGE.as_bytes()).is_ok() { 0 } else { 2 };
    }
    if opts.version {
        return if writeln!(out, "pcrs-grep version {}", env!("CARGO_PKG_VERSION")).is_ok() { 0 } else { 2 };
    }
    let grep = match Grep::new(opts) {
        Ok(g) => g,
        Err(e) => {
            let _ = writeln!(err, "pcrs-grep: {}", e);
            return 2;
        }
    };
    let o = grep.options();
    let show_names = o.with_filename.unwrap_or(o.files.len() > 1);

    let mut inputs: Vec<(String, io::Result<Vec<u8>>)> = Vec::new();
    if o.files.is_empty() {
        let mut data = Vec::new();
        let read = stdin.read_to_end(&mut data).map(|_| data);
        inputs.push((STDIN_NAME.to_owned(), read));
    } else {
        for path in &o.files {
            let read = if path == "-" {
                let mut data = Vec::new();
                stdin.read_to_end(&mut data).map(|_| data)
            } else {
                fs::read(path)
            };
            let label = if path == "-" { STDIN_NAME.to_owned() } else { path.clone() };
            inputs.push((label, read));
        }
    }

    let mut any_selected = false;
    let mut failed = false;
    for (label, read) in inputs {
        let data = match read {
            Ok(d) => d,
            Err(e) => {
                if !o.no_messages {
                    let _ = writeln!(err, "pcrs-grep: failed to open {}: {}", label, e);
                }
                failed = true;
                continue;
            }
        };
        let name = if show_names { Some(label.as_str()) } else { None };
        let outcome = match grep.search(&label, name, &data, out) {
            Ok(r) => r,
            Err(_) => return 2,
        };
        if let Some(e) = &outcome.error {
            if !o.no_messages {
                let _ = writeln!(err, "pcrs-grep: error while matching in {}: {}", label, e);
            }
            failed = true;
        }
        let success = if o.files_without_match { outcome.selected == 0 } else { outcome.selected > 0 };
        any_selected |= success;
        if o.quiet && any_selected {
            return 0;
        }
    }

    if failed {
        2
    } else if any_selected {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grep(args: &[&str], input: &str) -> (i32, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(args.iter().copied(), input.as_bytes(), &mut out, &mut err);
        (code, String::from_utf8_lossy(&out).into_owned())
    }

    #[test]
    fn parse_bundled_flags() {
        let o = parse_args(["-inm2", "foo", "a.txt", "b.txt"]).unwrap();
        assert!(o.ignore_case && o.line_numbers);
        assert_eq!(o.max_count, Some(2));
        assert_eq!(o.patterns, vec!["foo"]);
        assert_eq!(o.files, vec!["a.txt", "b.txt"]);

        let o = parse_args(["-e", "x", "--regexp=y", "--", "-file"]).unwrap();
        assert_eq!(o.patterns, vec!["x", "y"]);
        assert_eq!(o.files, vec!["-file"]);

        assert!(matches!(parse_args(["-Z", "x"]), Err(GrepError::Usage(_))));
        assert!(matches!(parse_args(Vec::<String>::new()), Err(GrepError::Usage(_))));
        assert!(matches!(parse_args(["-m", "lots", "x"]), Err(GrepError::Usage(_))));
    }

    #[test]
    fn selects_lines() {
        assert_eq!(grep(&["b+"], "abc\nxyz\nbb\n"), (0, "abc\nbb\n".into()));
        assert_eq!(grep(&["-v", "b"], "abc\nxyz\nbb\n"), (0, "xyz\n".into()));
        assert_eq!(grep(&["-n", "z"], "abc\nxyz"), (0, "2:xyz\n".into()));
        assert_eq!(grep(&["q"], "abc\n"), (1, String::new()));
    }

    #[test]
    fn counting_and_listing() {
        assert_eq!(grep(&["-c", "a"], "a\nb\na\n"), (0, "2\n".into()));
        assert_eq!(grep(&["-c", "z"], "a\n"), (1, "0\n".into()));
        assert_eq!(grep(&["-l", "a"], "a\n"), (0, "(standard input)\n".into()));
        assert_eq!(grep(&["-L", "z"], "a\n"), (0, "(standard input)\n".into()));
        assert_eq!(grep(&["-q", "a"], "a\n"), (0, String::new()));
        assert_eq!(grep(&["-m", "1", "a"], "a1\na2\n"), (0, "a1\n".into()));
    }

    #[test]
    fn match_shapes() {
        assert_eq!(grep(&["-o", "[0-9]+"], "a1b22\n"), (0, "1\n22\n".into()));
        assert_eq!(grep(&["-x", "ab"], "ab\nabc\n"), (0, "ab\n".into()));
        assert_eq!(grep(&["-w", "cat"], "concat\nthe cat\n"), (0, "the cat\n".into()));
        assert_eq!(grep(&["-F", "a.b"], "axb\na.b\n"), (0, "a.b\n".into()));
        assert_eq!(grep(&["-i", "ABC"], "xabcx\n"), (0, "xabcx\n".into()));
        assert_eq!(grep(&["-e", "one", "-e", "two"], "one\nthree\ntwo\n"), (0, "one\ntwo\n".into()));
    }

    #[test]
    fn multiline_blocks() {
        let (code, out) = grep(&["-M", "-n", "b\\nc"], "a\nb\nc\nd\n");
        assert_eq!(code, 0);
        assert_eq!(out, "2:b\nc\n");
        let (_, out) = grep(&["-M", "-n", "bar\\nbaz"], "foo\nbar\nbaz\nqux\nbar\nbaz\n");
        assert_eq!(out, "2:bar\nbaz\n5:bar\nbaz\n");
    }

    #[test]
    fn binary_input() {
        assert_eq!(grep(&["a"], "a\0b\n"), (0, "Binary file (standard input) matches\n".into()));
        assert_eq!(grep(&["-c", "a"], "a\0b\n"), (0, "1\n".into()));
    }

    #[test]
    fn errors_exit_two() {
        assert_eq!(grep(&["a("], "a\n").0, 2);
        assert_eq!(grep(&["a", "/nonexistent/pcrs-grep-input"], "").0, 2);
        assert_eq!(grep(&["-s", "a", "/nonexistent/pcrs-grep-input"], "").0, 2);
    }
}
