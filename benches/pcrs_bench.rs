// Criterion benchmark suite: interpreter vs native code
//
// Run: cargo bench --features jit
// Specific group: cargo bench --features jit -- compile
// HTML report: target/criterion/report/index.html
//
// Without `jit` the "native" rows are skipped.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pcrs::api::Regex;
use pcrs::options::{CompileFlags, LinkSize, MatchOptions};
use pcrs::regcomp::{compile_pattern, CompileOptions};
use pcrs::regexec::{exec, MatchContext, Matcher};
use pcrs::regint::Pattern;
use pcrs::regjit::{jit_compile, CompiledNative};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn compile(pattern: &[u8]) -> Pattern<u8> {
    Pattern::compile(pattern, CompileFlags::empty()).expect("compile failed")
}

fn search(p: &Pattern<u8>, text: &[u8], ctx: &mut MatchContext) -> Option<usize> {
    exec(p, text, 0, MatchOptions::empty(), ctx).expect("match error").map(|m| m.start())
}

fn native_search(n: &CompiledNative<u8>, text: &[u8], ctx: &mut MatchContext) -> Option<usize> {
    n.exec(text, 0, MatchOptions::empty(), ctx).expect("match error").map(|m| m.start())
}

/// Interpreter and, when available, native rows for one pattern.
fn bench_both(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>, name: &str, pat: &[u8], text: &[u8]) {
    let p = compile(pat);
    let native = jit_compile(&p).ok();
    if let Some(n) = &native {
        debug_assert_eq!(
            search(&p, text, &mut MatchContext::new()),
            native_search(n, text, &mut MatchContext::new()),
            "{name}: engines disagree"
        );
    }

    group.bench_with_input(BenchmarkId::new("interp", name), text, |b, text| {
        let mut ctx = MatchContext::new();
        b.iter(|| black_box(search(&p, black_box(text), &mut ctx)));
    });
    if let Some(n) = &native {
        group.bench_with_input(BenchmarkId::new("native", name), text, |b, text| {
            let mut ctx = MatchContext::new();
            b.iter(|| black_box(native_search(n, black_box(text), &mut ctx)));
        });
    }
}

// ---------------------------------------------------------------------------
// 1. compile
// ---------------------------------------------------------------------------

fn bench_compile(c: &mut Criterion) {
    let patterns: &[(&str, &[u8])] = &[
        ("literal", b"hello world"),
        ("dot_star", b"foo.*bar"),
        ("alternation", b"alpha|beta|gamma|delta"),
        ("char_class", b"[a-zA-Z0-9_]+"),
        ("quantifier", b"a{2,5}b+c?d*"),
        ("backref", b"(\\w+)\\s+\\1"),
        ("lookbehind", b"(?<=@)\\w+"),
        ("named_capture", b"(?<year>\\d{4})-(?<month>\\d{2})-(?<day>\\d{2})"),
        ("recursion", b"\\((?:[^()]|(?R))*\\)"),
    ];

    let mut group = c.benchmark_group("compile");
    for (name, pat) in patterns {
        group.bench_with_input(BenchmarkId::new("bytecode", name), pat, |b, pat| {
            b.iter(|| black_box(compile(black_box(pat))));
        });
        let p = compile(pat);
        if jit_compile(&p).is_ok() {
            group.bench_with_input(BenchmarkId::new("native", name), &p, |b, p| {
                b.iter(|| black_box(jit_compile(black_box(p)).ok()));
            });
        }
    }
    group.finish();
}

fn bench_link_size(c: &mut Criterion) {
    let pat = b"(?:abcdefghij|klmnopqrst){500}";
    let mut group = c.benchmark_group("link_size");
    for (name, link_size) in [("2", LinkSize::Two), ("3", LinkSize::Three), ("4", LinkSize::Four)] {
        let opts = CompileOptions { link_size, ..CompileOptions::default() };
        group.bench_function(name, |b| {
            b.iter(|| black_box(compile_pattern::<u8>(black_box(pat), &opts).ok()));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. matching
// ---------------------------------------------------------------------------

fn bench_literal(c: &mut Criterion) {
    let text = b"The quick brown fox jumps over the lazy dog near the riverbank";
    let mut group = c.benchmark_group("literal");
    bench_both(&mut group, "exact", b"lazy dog", text);
    bench_both(&mut group, "anchored_start", b"^The quick", text);
    bench_both(&mut group, "anchored_end", b"riverbank$", text);
    bench_both(&mut group, "word_boundary", b"\\bfox\\b", text);
    group.finish();
}

fn bench_backtracking(c: &mut Criterion) {
    let text = b"aaaaabbbbbccccc12345";
    let mut group = c.benchmark_group("backtracking");
    bench_both(&mut group, "greedy", b"a+b+c+\\d", text);
    bench_both(&mut group, "lazy", b"a+?b+?c+?\\d", text);
    bench_both(&mut group, "possessive", b"a++b++c++\\d", text);
    bench_both(&mut group, "nested", b"(a+b+)+c", text);
    bench_both(&mut group, "alternation", b"(?:ab|a|b)+c", text);
    group.finish();
}

fn make_log_text(num_lines: usize) -> Vec<u8> {
    let mut text = String::new();
    for i in 0..num_lines {
        text.push_str(&format!(
            "2026-06-{:02} {:02}:{:02}:{:02} INFO server[{}] request path=/api/v1/users/{} status=200 duration={}ms\n",
            (i % 28) + 1,
            i % 24,
            i % 60,
            (i * 7) % 60,
            1000 + i,
            i * 13,
            i % 500
        ));
    }
    text.push_str("2026-06-30 23:59:59 ERROR server[9999] request failed\n");
    text.into_bytes()
}

fn bench_large_text(c: &mut Criterion) {
    let text = make_log_text(500);
    let mut group = c.benchmark_group("large_text");
    bench_both(&mut group, "literal_at_end", b"ERROR", &text);
    bench_both(&mut group, "class_at_end", b"E[A-Z]{4} server", &text);
    bench_both(&mut group, "multiline_anchor", b"(?m)^2026-06-30", &text);
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. iteration
// ---------------------------------------------------------------------------

fn bench_find_iter(c: &mut Criterion) {
    let text = String::from_utf8(make_log_text(100)).expect("ascii");
    let mut group = c.benchmark_group("find_iter");
    for (name, pat) in [("numbers", r"\d+"), ("paths", r"path=(\S+)"), ("empty", r"x*")] {
        let re = Regex::new(pat).expect("compile failed");
        group.bench_with_input(BenchmarkId::new("count", name), &text, |b, text| {
            b.iter(|| black_box(re.find_iter(black_box(text.as_str())).count()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compile,
    bench_link_size,
    bench_literal,
    bench_backtracking,
    bench_large_text,
    bench_find_iter
);
criterion_main!(benches);
