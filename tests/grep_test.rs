// grep_test.rs - Integration tests for the pcrs-grep tool.
//
// Most cases drive `grep::run` in-process; a few run the built binary to
// check stdin handling and the exit status.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use pcrs::grep::{parse_args, run};

struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    fn new(tag: &str) -> Scratch {
        let dir = std::env::temp_dir().join(format!("pcrs-grep-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        Scratch { dir }
    }

    fn file(&self, name: &str, body: &str) -> String {
        let path = self.dir.join(name);
        fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn grep(args: &[&str], stdin: &str) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(args.iter().copied(), stdin.as_bytes(), &mut out, &mut err);
    (code, String::from_utf8_lossy(&out).into_owned(), String::from_utf8_lossy(&err).into_owned())
}

// === In-process ===

#[test]
fn filters_stdin() {
    let (code, out, _) = grep(&["b+"], "abc\nxyz\nbbb\n");
    assert_eq!(code, 0);
    assert_eq!(out, "abc\nbbb\n");
    let (code, out, _) = grep(&["nothing"], "abc\n");
    assert_eq!(code, 1);
    assert_eq!(out, "");
}

#[test]
fn several_files_get_names() {
    let s = Scratch::new("names");
    let a = s.file("a.txt", "apple\nbanana\n");
    let b = s.file("b.txt", "cherry\napricot\n");
    let (code, out, _) = grep(&["-n", "^a", &a, &b], "");
    assert_eq!(code, 0);
    assert_eq!(out, format!("{a}:1:apple\n{b}:2:apricot\n"));
    let (_, out, _) = grep(&["-h", "^a", &a, &b], "");
    assert_eq!(out, "apple\napricot\n");
    let (_, out, _) = grep(&["-H", "cherry", &b], "");
    assert_eq!(out, format!("{b}:cherry\n"));
}

#[test]
fn listing_modes() {
    let s = Scratch::new("listing");
    let a = s.file("a.txt", "one\ntwo\n");
    let b = s.file("b.txt", "three\n");
    let (code, out, _) = grep(&["-l", "o", &a, &b], "");
    assert_eq!((code, out), (0, format!("{a}\n")));
    let (code, out, _) = grep(&["-L", "o", &a, &b], "");
    assert_eq!((code, out), (0, format!("{b}\n")));
    let (code, out, _) = grep(&["-c", "e", &a, &b], "");
    assert_eq!((code, out), (0, format!("{a}:1\n{b}:1\n")));
}

#[test]
fn pattern_options() {
    let (_, out, _) = grep(&["-i", "ABC"], "xabcx\nxyz\n");
    assert_eq!(out, "xabcx\n");
    let (_, out, _) = grep(&["-v", "a"], "a\nb\nc\n");
    assert_eq!(out, "b\nc\n");
    let (_, out, _) = grep(&["-x", "ab"], "ab\nabc\n");
    assert_eq!(out, "ab\n");
    let (_, out, _) = grep(&["-w", "cat"], "concat\nthe cat sat\n");
    assert_eq!(out, "the cat sat\n");
    let (_, out, _) = grep(&["-F", "a.c"], "abc\na.c\n");
    assert_eq!(out, "a.c\n");
    let (_, out, _) = grep(&["-o", "\\d+"], "a1b22\nnone\n");
    assert_eq!(out, "1\n22\n");
    let (_, out, _) = grep(&["-m1", "a"], "a1\na2\n");
    assert_eq!(out, "a1\n");
    let (_, out, _) = grep(&["-e", "x", "-e", "y"], "x\nz\ny\n");
    assert_eq!(out, "x\ny\n");
}

#[test]
fn patterns_from_file() {
    let s = Scratch::new("patfile");
    let pats = s.file("pats", "^b\nz$\n");
    let (code, out, _) = grep(&["-f", &pats], "abc\nbcd\nxyz\n");
    assert_eq!(code, 0);
    assert_eq!(out, "bcd\nxyz\n");
}

#[test]
fn multiline_matches() {
    let (code, out, _) = grep(&["-M", "b\\nc"], "a\nb\nc\nd\n");
    assert_eq!(code, 0);
    assert_eq!(out, "b\nc\n");
    let (_, out, _) = grep(&["-n", "-M", "bar\\nbaz"], "foo\nbar\nbaz\n");
    assert_eq!(out, "2:bar\nbaz\n");
}

#[test]
fn quiet_and_errors() {
    let (code, out, _) = grep(&["-q", "a"], "a\n");
    assert_eq!((code, out.as_str()), (0, ""));
    let (code, _, err) = grep(&["a("], "a\n");
    assert_eq!(code, 2);
    assert!(err.contains("error in pattern 'a('"), "{}", err);
    let (code, _, err) = grep(&["a", "/nonexistent/pcrs-grep-input"], "");
    assert_eq!(code, 2);
    assert!(err.contains("failed to open"), "{}", err);
    let (code, _, err) = grep(&["-s", "a", "/nonexistent/pcrs-grep-input"], "");
    assert_eq!(code, 2);
    assert_eq!(err, "");
    let (code, _, err) = grep(&["--bogus", "a"], "");
    assert_eq!(code, 2);
    assert!(err.contains("unrecognized option"), "{}", err);
}

#[test]
fn help_and_version() {
    let (code, out, _) = grep(&["--help"], "");
    assert_eq!(code, 0);
    assert!(out.starts_with("Usage: pcrs-grep"));
    let (code, out, _) = grep(&["-V"], "");
    assert_eq!(code, 0);
    assert!(out.starts_with("pcrs-grep version "));
}

#[test]
fn argument_forms() {
    let opts = parse_args(["--regexp=a", "--max-count", "3", "--", "-file"]).unwrap();
    assert_eq!(opts.patterns, vec!["a".to_string()]);
    assert_eq!(opts.max_count, Some(3));
    assert_eq!(opts.files, vec!["-file".to_string()]);
    assert!(parse_args(["-m"]).is_err());
    assert!(parse_args(Vec::<String>::new()).is_err());
}

// === Binary ===

#[test]
fn binary_reads_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pcrs-grep"))
        .args(["-n", "o"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"one\ntwo\nsix\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1:one\n2:two\n");
}

#[test]
fn binary_exit_codes() {
    let s = Scratch::new("binary");
    let f = s.file("in.txt", "alpha\n");
    let status = Command::new(env!("CARGO_BIN_EXE_pcrs-grep")).args(["-q", "beta", f.as_str()]).status().unwrap();
    assert_eq!(status.code(), Some(1));
    let status = Command::new(env!("CARGO_BIN_EXE_pcrs-grep"))
        .args(["(", f.as_str()])
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(2));
}
