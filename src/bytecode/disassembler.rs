//! Bytecode disassembler for debugging.

use crate::bytecode::chunk::Chunk;
use crate::bytecode::instruction::{CallTarget, OpCode, VarSlot};
use crate::bytecode::value::Value;
use std::fmt::Write;

/// Disassemble a chunk into human-readable output, followed by every
/// function stored in its constant pool.
pub fn disassemble(chunk: &Chunk, name: &str) -> String {
    let mut output = String::new();
    writeln!(&mut output, "== {} ==", name).unwrap();
    disassemble_code(chunk, &mut output);

    for constant in &chunk.constants {
        if let Value::Function(func) = constant {
            writeln!(&mut output).unwrap();
            let header = format!("fn {} (arity: {})", func.name, func.arity);
            output.push_str(&disassemble(&func.chunk, &header));
        }
    }

    output
}

fn disassemble_code(chunk: &Chunk, output: &mut String) {
    let mut offset = 0;
    while offset < chunk.code.len() {
        disassemble_instruction(chunk, offset, output);
        offset += 2;
    }
}

/// Disassemble the instruction pair starting at `offset`.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, output: &mut String) {
    write!(output, "{:04} ", offset).unwrap();

    // Line number, or | when unchanged from the previous instruction
    let line = chunk.position_at(offset).map(|span| span.line);
    if offset > 0 && line == chunk.position_at(offset - 2).map(|span| span.line) {
        write!(output, "   | ").unwrap();
    } else {
        match line {
            Some(line) => write!(output, "{:4} ", line).unwrap(),
            None => write!(output, "   ? ").unwrap(),
        }
    }

    let raw = chunk.code[offset];
    let opcode = match OpCode::from_i32(raw) {
        Some(op) => op,
        None => {
            writeln!(output, "Unknown opcode {}", raw).unwrap();
            return;
        }
    };
    let operand = chunk.code[offset + 1];

    match opcode {
        OpCode::LoadConst => {
            let annotation = match chunk.constants.get(operand as usize) {
                Some(constant) => constant_str(constant),
                None => format!("?{}", operand),
            };
            writeln!(output, "{:?} {} ({})", opcode, operand, annotation).unwrap();
        }

        OpCode::LoadVar | OpCode::StoreVar => match VarSlot::decode(operand) {
            VarSlot::Slot(slot) => writeln!(output, "{:?} {}", opcode, slot).unwrap(),
            VarSlot::Unresolved => {
                writeln!(output, "{:?} {} (unresolved)", opcode, operand).unwrap()
            }
        },

        OpCode::Call => match CallTarget::decode(operand) {
            CallTarget::Function(index) => {
                let annotation = match chunk.constants.get(index) {
                    Some(constant) => constant_str(constant),
                    None => format!("?{}", index),
                };
                writeln!(output, "{:?} {} ({})", opcode, index, annotation).unwrap();
            }
            CallTarget::Unknown => {
                writeln!(output, "{:?} {} (unknown)", opcode, operand).unwrap()
            }
            CallTarget::ArityMismatch => {
                writeln!(output, "{:?} {} (arity mismatch)", opcode, operand).unwrap()
            }
        },

        // Operand is unused for the rest
        _ => writeln!(output, "{:?}", opcode).unwrap(),
    }
}

/// Convert a constant to a display string.
fn constant_str(constant: &Value) -> String {
    match constant {
        Value::Int(n) => format!("{}", n),
        Value::Str(s) => {
            if s.chars().count() > 20 {
                format!("\"{}...\"", s.chars().take(20).collect::<String>())
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Function(f) => format!("<fn {}>", f.name),
        Value::Dummy => "<dummy>".to_string(),
    }
}
