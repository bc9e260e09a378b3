//! Seltzer: a small dynamically typed language compiled to flat bytecode
//! and executed on a stack-based virtual machine.
//!
//! Values are integers and strings, coerced per operator. Functions are
//! lowered to their own chunks and resolved at their call sites during
//! compilation; nothing is looked up by name at runtime.
//!
//! The pipeline is `parse` -> `compile` -> `Vm::interpret`, with `run`
//! and friends wiring the phases together.

#![allow(clippy::module_inception)]
#![allow(clippy::result_large_err)]

pub mod ast;
pub mod bytecode;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod vm;

use std::io::Write;
use std::path::Path;

use error::SeltzerError;

/// Parse source code into an AST without compiling.
pub fn parse(source: &str, package: &str) -> Result<ast::Program, SeltzerError> {
    let tokens = lexer::Scanner::new(source, package).scan_tokens()?;
    let program = parser::Parser::new(tokens).parse()?;
    Ok(program)
}

/// Compile source code to a chunk without executing.
pub fn compile(source: &str, package: &str) -> Result<bytecode::Chunk, SeltzerError> {
    let program = parse(source, package)?;
    let mut compiler = bytecode::Compiler::new();
    program.compile(&mut compiler);
    Ok(compiler.finish())
}

/// Run a program, writing `put` output to standard output.
pub fn run(source: &str, package: &str) -> Result<(), SeltzerError> {
    let chunk = compile(source, package)?;
    let mut vm = vm::Vm::new();
    let result = vm.interpret(&chunk);
    // Flush whatever was written even when execution failed partway
    vm.into_output().flush()?;
    result?;
    Ok(())
}

/// Run a program and capture its output as a string.
pub fn run_with_output(source: &str, package: &str) -> Result<String, SeltzerError> {
    let chunk = compile(source, package)?;
    let mut vm = vm::Vm::with_output(Vec::new());
    vm.interpret(&chunk)?;
    let bytes = vm.into_output();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run a program from a file. The package name in reported positions is
/// the file stem.
pub fn run_file(path: &Path) -> Result<(), SeltzerError> {
    let source = std::fs::read_to_string(path)?;
    run(&source, &package_name(path))
}

/// Compile a file and return its disassembly listing.
pub fn disassemble_file(path: &Path) -> Result<String, SeltzerError> {
    let source = std::fs::read_to_string(path)?;
    let package = package_name(path);
    let chunk = compile(&source, &package)?;
    Ok(bytecode::disassemble(&chunk, &package))
}

/// Compile source and return its disassembly listing.
pub fn disassemble_source(source: &str, package: &str) -> Result<String, SeltzerError> {
    let chunk = compile(source, package)?;
    Ok(bytecode::disassemble(&chunk, package))
}

fn package_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("main")
        .to_string()
}
