//! Bytecode representation and lowering.
//!
//! # Architecture
//!
//! - `instruction`: OpCode definitions and operand encodings
//! - `value`: runtime values and their coercion rules
//! - `chunk`: flat instruction stream, constant pool, source positions
//! - `compiler`: emission context the AST lowers itself through
//! - `disassembler`: debug output for bytecode inspection

pub mod chunk;
pub mod compiler;
pub mod disassembler;
pub mod instruction;
pub mod value;

pub use chunk::Chunk;
pub use compiler::Compiler;
pub use disassembler::disassemble;
pub use instruction::{CallTarget, OpCode, VarSlot};
pub use value::{FunctionValue, Value};
