//! Bytecode chunk: instruction stream, constant pool, position table.

use crate::bytecode::instruction::OpCode;
use crate::bytecode::value::Value;
use crate::span::Span;

/// One compiled program or function body.
///
/// Instructions are flat `(opcode, operand)` pairs in `code`: even indices
/// hold opcodes, odd indices their operands. The pool and position table
/// grow monotonically while compiling; once compilation completes a chunk
/// is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub code: Vec<i32>,
    /// Appended per literal occurrence, never deduplicated.
    pub constants: Vec<Value>,
    /// Exactly one span per instruction pair, indexed by `pc / 2`.
    pub positions: Vec<Span>,
}

impl Chunk {
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            constants: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Append one instruction with its source position.
    pub fn write(&mut self, op: OpCode, operand: i32, span: Span) {
        self.code.push(op.into());
        self.code.push(operand);
        self.positions.push(span);
    }

    /// Append a constant and return its pool index.
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    /// Number of `(opcode, operand)` pairs.
    pub fn instruction_count(&self) -> usize {
        self.code.len() / 2
    }

    /// Source position of the instruction at `pc`.
    pub fn position_at(&self, pc: usize) -> Option<&Span> {
        self.positions.get(pc / 2)
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn at(line: u32, col: u32) -> Span {
        Span::new(Rc::from("test"), line, col)
    }

    #[test]
    fn test_write_keeps_pairs_and_positions_aligned() {
        let mut chunk = Chunk::new();
        chunk.write(OpCode::LoadConst, 0, at(1, 5));
        chunk.write(OpCode::Put, 0, at(1, 1));

        assert_eq!(chunk.code, vec![OpCode::LoadConst as i32, 0, OpCode::Put as i32, 0]);
        assert_eq!(chunk.instruction_count(), 2);
        assert_eq!(chunk.position_at(0), Some(&at(1, 5)));
        assert_eq!(chunk.position_at(2), Some(&at(1, 1)));
        assert_eq!(chunk.position_at(4), None);
    }

    #[test]
    fn test_constants_are_never_deduplicated() {
        let mut chunk = Chunk::new();
        assert_eq!(chunk.add_constant(Value::Int(1)), 0);
        assert_eq!(chunk.add_constant(Value::Int(1)), 1);
        assert_eq!(chunk.add_constant(Value::str("a")), 2);
        assert_eq!(chunk.constants.len(), 3);
    }

    #[test]
    fn test_structural_equality() {
        let build = || {
            let mut chunk = Chunk::new();
            let idx = chunk.add_constant(Value::Int(7)) as i32;
            chunk.write(OpCode::LoadConst, idx, at(1, 1));
            chunk
        };
        assert_eq!(build(), build());
    }
}
