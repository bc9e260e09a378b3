//! Compilation context: emission, constant pool, variable and function tables.
//!
//! One `Compiler` exists per function body plus one for the top level. AST
//! nodes drive compilation by calling back into the context they are handed;
//! lowering never fails, because unresolved variable and call references are
//! encoded into the instruction stream and surface at dispatch.

use indexmap::IndexMap;
use std::rc::Rc;

use crate::bytecode::chunk::Chunk;
use crate::bytecode::instruction::{CallTarget, OpCode, VarSlot};
use crate::bytecode::value::{FunctionValue, Value};
use crate::span::Span;

/// Insertion order is load-bearing in both tables: it fixes slot numbering
/// and the seeding order of nested compilers.
type Table = IndexMap<String, usize, ahash::RandomState>;

pub struct Compiler {
    chunk: Chunk,
    /// Variable name to slot; the first assignment wins the index.
    variables: Table,
    /// Function name to the pool index of its compiled value.
    functions: Table,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            chunk: Chunk::new(),
            variables: Table::default(),
            functions: Table::default(),
        }
    }

    /// Append one instruction.
    pub fn emit(&mut self, op: OpCode, operand: i32, span: Span) {
        self.chunk.write(op, operand, span);
    }

    /// Register a constant; every call appends a fresh pool entry.
    pub fn register_constant(&mut self, value: Value) -> usize {
        self.chunk.add_constant(value)
    }

    /// Slot for a variable write, allocating on first use of the name.
    pub fn register_variable(&mut self, name: &str) -> usize {
        if let Some(&slot) = self.variables.get(name) {
            return slot;
        }
        let slot = self.variables.len();
        self.variables.insert(name.to_string(), slot);
        slot
    }

    /// Slot for a variable read. Unknown names compile to the unresolved
    /// encoding and fail at the corresponding `LoadVar` dispatch.
    pub fn lookup_variable(&self, name: &str) -> VarSlot {
        match self.variables.get(name) {
            Some(&slot) => VarSlot::Slot(slot),
            None => VarSlot::Unresolved,
        }
    }

    /// Register a finished function into the pool and the name table.
    /// Redeclaring a name rebinds it for call sites compiled afterwards.
    pub fn register_function(&mut self, function: FunctionValue) -> usize {
        let name = function.name.clone();
        let index = self.register_constant(Value::Function(Rc::new(function)));
        self.functions.insert(name, index);
        index
    }

    /// Resolve a call site against the functions known so far.
    pub fn resolve_call(&self, name: &str, argc: usize) -> CallTarget {
        match self.functions.get(name) {
            None => CallTarget::Unknown,
            Some(&index) => match &self.chunk.constants[index] {
                Value::Function(func) if func.arity == argc => CallTarget::Function(index),
                Value::Function(_) => CallTarget::ArityMismatch,
                _ => CallTarget::Unknown,
            },
        }
    }

    /// Copy every function the enclosing compiler knows into this one,
    /// preserving declaration order. Each value is re-registered in this
    /// pool so call sites in the new body resolve against local indices.
    pub fn inherit_functions(&mut self, enclosing: &Compiler) {
        for (name, &index) in &enclosing.functions {
            if let Value::Function(func) = &enclosing.chunk.constants[index] {
                let local = self.register_constant(Value::Function(Rc::clone(func)));
                self.functions.insert(name.clone(), local);
            }
        }
    }

    /// Finish compilation and take the chunk.
    pub fn finish(self) -> Chunk {
        self.chunk
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::instruction::OpCode;
    use pretty_assertions::assert_eq;

    fn compile_source(source: &str) -> Chunk {
        let tokens = crate::lexer::Scanner::new(source, "test")
            .scan_tokens()
            .unwrap();
        let program = crate::parser::Parser::new(tokens).parse().unwrap();
        let mut compiler = Compiler::new();
        program.compile(&mut compiler);
        compiler.finish()
    }

    /// The `(opcode, operand)` pairs of a chunk, decoded for assertions.
    fn pairs(chunk: &Chunk) -> Vec<(OpCode, i32)> {
        chunk
            .code
            .chunks(2)
            .map(|pair| (OpCode::from_i32(pair[0]).unwrap(), pair[1]))
            .collect()
    }

    fn function_at(chunk: &Chunk, index: usize) -> Rc<FunctionValue> {
        match &chunk.constants[index] {
            Value::Function(func) => Rc::clone(func),
            other => panic!("expected function constant, got {:?}", other),
        }
    }

    #[test]
    fn test_variable_slots_first_assignment_wins() {
        let chunk = compile_source("x = 1; y = 2; x = 3; put x;");
        let stores: Vec<i32> = pairs(&chunk)
            .into_iter()
            .filter(|(op, _)| *op == OpCode::StoreVar)
            .map(|(_, operand)| operand)
            .collect();
        assert_eq!(stores, vec![0, 1, 0]);

        let loads: Vec<i32> = pairs(&chunk)
            .into_iter()
            .filter(|(op, _)| *op == OpCode::LoadVar)
            .map(|(_, operand)| operand)
            .collect();
        assert_eq!(loads, vec![0]);
    }

    #[test]
    fn test_unresolved_read_compiles() {
        let chunk = compile_source("put ghost;");
        assert_eq!(
            pairs(&chunk),
            vec![
                (OpCode::LoadVar, VarSlot::Unresolved.encode()),
                (OpCode::Put, 0)
            ]
        );
    }

    #[test]
    fn test_binary_pushes_right_then_left() {
        let chunk = compile_source("put 10 - 3;");
        // Right operand compiles first, so 3 takes pool index 0.
        assert_eq!(chunk.constants, vec![Value::Int(3), Value::Int(10)]);
        assert_eq!(
            pairs(&chunk),
            vec![
                (OpCode::LoadConst, 0),
                (OpCode::LoadConst, 1),
                (OpCode::Sub, 0),
                (OpCode::Put, 0),
            ]
        );
    }

    #[test]
    fn test_assignment_compiles_sources_reversed_targets_forward() {
        let chunk = compile_source("a, b = 1, 2;");
        assert_eq!(chunk.constants, vec![Value::Int(2), Value::Int(1)]);
        assert_eq!(
            pairs(&chunk),
            vec![
                (OpCode::LoadConst, 0),
                (OpCode::LoadConst, 1),
                (OpCode::StoreVar, 0),
                (OpCode::StoreVar, 1),
            ]
        );
    }

    #[test]
    fn test_function_prologue_binds_parameters_in_order() {
        let chunk = compile_source("fn second(a, b) { return b; }");
        let func = function_at(&chunk, 0);
        assert_eq!(func.name, "second");
        assert_eq!(func.arity, 2);
        assert_eq!(func.chunk.constants[0], Value::Dummy);
        assert_eq!(func.chunk.constants[1], Value::Dummy);
        assert_eq!(
            pairs(&func.chunk),
            vec![
                (OpCode::LoadConst, 0),
                (OpCode::StoreVar, 0),
                (OpCode::LoadConst, 1),
                (OpCode::StoreVar, 1),
                (OpCode::LoadVar, 1),
                (OpCode::Return, 0),
            ]
        );
    }

    #[test]
    fn test_call_resolves_to_pool_index() {
        let chunk = compile_source("fn one() { return 1; } put one();");
        assert_eq!(
            pairs(&chunk),
            vec![(OpCode::Call, 0), (OpCode::Put, 0)]
        );
        assert_eq!(function_at(&chunk, 0).name, "one");
    }

    #[test]
    fn test_unknown_call_compiles_to_unknown_target() {
        let chunk = compile_source("put ghost();");
        assert_eq!(
            pairs(&chunk),
            vec![
                (OpCode::Call, CallTarget::Unknown.encode()),
                (OpCode::Put, 0)
            ]
        );
    }

    #[test]
    fn test_arity_mismatch_detected_at_compile_time() {
        let chunk = compile_source("fn zero() { return 1; } put zero(5);");
        let call = pairs(&chunk)
            .into_iter()
            .find(|(op, _)| *op == OpCode::Call)
            .unwrap();
        assert_eq!(call.1, CallTarget::ArityMismatch.encode());
    }

    #[test]
    fn test_sibling_functions_are_seeded() {
        let chunk = compile_source("fn a() { return 1; } fn b() { return a(); }");
        let b = function_at(&chunk, 1);
        assert_eq!(b.name, "b");
        // a's value was copied into b's pool at index 0
        assert_eq!(function_at(&b.chunk, 0).name, "a");
        assert_eq!(
            pairs(&b.chunk),
            vec![(OpCode::Call, 0), (OpCode::Return, 0)]
        );
    }

    #[test]
    fn test_self_call_is_unknown() {
        let chunk = compile_source("fn f() { return f(); }");
        let f = function_at(&chunk, 0);
        assert_eq!(
            pairs(&f.chunk),
            vec![
                (OpCode::Call, CallTarget::Unknown.encode()),
                (OpCode::Return, 0)
            ]
        );
    }

    #[test]
    fn test_compilation_is_idempotent() {
        let source = "fn twice(n) { return n * 2; } x = 4; put twice(x) + 1;";
        assert_eq!(compile_source(source), compile_source(source));
    }
}
