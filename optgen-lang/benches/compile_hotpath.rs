use criterion::{criterion_group, criterion_main, Criterion};
use optgen_lang::{compile, format, parse_file, FormatOptions, Lexer};
use std::hint::black_box;

const LANG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/lang.opt"));

fn bench_lex(c: &mut Criterion) {
    c.bench_function("lexer/lang_opt", |b| {
        b.iter(|| {
            let tokens = Lexer::new(black_box(LANG)).tokenize();
            black_box(tokens.len());
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parser/lang_opt", |b| {
        b.iter(|| {
            let parsed = parse_file("lang.opt", black_box(LANG));
            black_box(parsed.statements.len());
        });
    });
}

fn bench_compile_format(c: &mut Criterion) {
    c.bench_function("compiler/lang_opt", |b| {
        b.iter(|| {
            let root = compile("lang.opt", black_box(LANG)).expect("compile lang.opt");
            black_box(root.rules.0.len());
        });
    });

    let root = compile("lang.opt", LANG).expect("compile lang.opt");
    let options = FormatOptions::with_positions();
    c.bench_function("printer/lang_opt", |b| {
        b.iter(|| black_box(format(black_box(&root), &options).len()));
    });
}

criterion_group!(benches, bench_lex, bench_parse, bench_compile_format);
criterion_main!(benches);
