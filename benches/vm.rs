//! Benchmarks for compilation and execution.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use seltzer::bytecode::{Chunk, Compiler};
use seltzer::lexer::Scanner;
use seltzer::parser::Parser;
use seltzer::vm::Vm;
use std::fs;
use std::io;

/// Parse source into an AST.
fn parse(source: &str) -> seltzer::ast::Program {
    let tokens = Scanner::new(source, "bench")
        .scan_tokens()
        .expect("lexer error");
    Parser::new(tokens).parse().expect("parser error")
}

/// Lower source all the way to a chunk.
fn compile(source: &str) -> Chunk {
    let program = parse(source);
    let mut compiler = Compiler::new();
    program.compile(&mut compiler);
    compiler.finish()
}

/// Execute a chunk, discarding output.
fn run(chunk: &Chunk) {
    let mut vm = Vm::with_output(io::sink());
    vm.interpret(chunk).expect("runtime error");
}

fn load_program(name: &str) -> String {
    let path = format!("benches/programs/{}.sz", name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("failed to read {}", path))
}

fn arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");
    let source = load_program("arith");
    let chunk = compile(&source);

    group.bench_function("compile", |b| b.iter(|| compile(black_box(&source))));
    group.bench_function("run", |b| b.iter(|| run(black_box(&chunk))));

    group.finish();
}

fn calls(c: &mut Criterion) {
    let mut group = c.benchmark_group("calls");
    let source = load_program("calls");
    let chunk = compile(&source);

    group.bench_function("compile", |b| b.iter(|| compile(black_box(&source))));
    group.bench_function("run", |b| b.iter(|| run(black_box(&chunk))));

    group.finish();
}

fn strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");
    let source = load_program("strings");
    let chunk = compile(&source);

    group.bench_function("compile", |b| b.iter(|| compile(black_box(&source))));
    group.bench_function("run", |b| b.iter(|| run(black_box(&chunk))));

    group.finish();
}

/// Straight-line programs of growing length.
fn statement_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_scaling");

    for n in [64, 256, 1024].iter() {
        let mut source = String::from("x = 1;\n");
        for _ in 0..*n {
            source.push_str("x = x * 3 + 1;\n");
        }
        let chunk = compile(&source);

        group.bench_with_input(BenchmarkId::new("compile", n), &source, |b, src| {
            b.iter(|| compile(black_box(src)))
        });
        group.bench_with_input(BenchmarkId::new("run", n), &chunk, |b, chunk| {
            b.iter(|| run(black_box(chunk)))
        });
    }

    group.finish();
}

criterion_group!(benches, arithmetic, calls, strings, statement_scaling);

criterion_main!(benches);
