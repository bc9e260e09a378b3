//! Stack-based execution of compiled chunks.

use std::io::{self, Write};
use std::rc::Rc;

use crate::bytecode::{CallTarget, Chunk, OpCode, Value, VarSlot};
use crate::error::{RuntimeError, ValueError};
use crate::span::Span;

use super::frame::Frame;

/// Result type for VM operations.
pub type VmResult<T> = Result<T, RuntimeError>;

/// The bytecode VM. Output from `put` instructions goes to the writer.
pub struct Vm<W: Write> {
    out: W,
}

impl Vm<io::Stdout> {
    /// VM writing to standard output.
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for Vm<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Vm<W> {
    pub fn with_output(out: W) -> Self {
        Self { out }
    }

    /// Consume the VM and hand back its writer.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run a chunk to completion in a fresh top-level frame.
    pub fn interpret(&mut self, chunk: &Chunk) -> VmResult<()> {
        let mut frame = Frame::new(chunk.instruction_count());
        self.execute(chunk, &mut frame)
    }

    /// Main execution loop. Calls recurse: each callee runs its own
    /// chunk in its own frame, and its result lands on the caller's
    /// stack when this returns.
    fn execute(&mut self, chunk: &Chunk, frame: &mut Frame) -> VmResult<()> {
        let mut pc = 0;

        while pc < chunk.code.len() {
            let span = chunk.position_at(pc).cloned().unwrap_or_default();
            let raw = chunk.code[pc];
            let opcode = OpCode::from_i32(raw)
                .ok_or_else(|| RuntimeError::unrecognized_opcode(raw, span.clone()))?;
            let operand = *chunk
                .code
                .get(pc + 1)
                .ok_or_else(|| RuntimeError::corrupt("truncated instruction", span.clone()))?;

            match opcode {
                OpCode::LoadConst => {
                    let value = chunk.constants.get(operand as usize).ok_or_else(|| {
                        RuntimeError::corrupt(format!("no constant at index {}", operand), span)
                    })?;
                    // A dummy constant marks a parameter binding site and
                    // loads the next queued argument instead of itself
                    match value {
                        Value::Dummy => match frame.next_pending() {
                            Some(argument) => frame.push(argument),
                            None => frame.push(Value::Dummy),
                        },
                        other => frame.push(other.clone()),
                    }
                }

                OpCode::LoadVar => match VarSlot::decode(operand) {
                    VarSlot::Slot(slot) => {
                        let value = frame.load(slot).ok_or_else(|| {
                            RuntimeError::corrupt(format!("unset variable slot {}", slot), span)
                        })?;
                        frame.push(value);
                    }
                    VarSlot::Unresolved => return Err(RuntimeError::UndefinedVariable(span)),
                },

                OpCode::StoreVar => {
                    let slot = usize::try_from(operand).map_err(|_| {
                        RuntimeError::corrupt(
                            format!("bad variable slot {}", operand),
                            span.clone(),
                        )
                    })?;
                    let value = pop(frame, &span)?;
                    frame.store(slot, value);
                }

                OpCode::Add => binary(frame, &span, Value::add)?,
                OpCode::Sub => binary(frame, &span, Value::sub)?,
                OpCode::Mul => binary(frame, &span, Value::mul)?,
                OpCode::Div => binary(frame, &span, Value::div)?,
                OpCode::Mod => binary(frame, &span, Value::modulo)?,
                OpCode::Pow => binary(frame, &span, Value::pow)?,

                OpCode::Negate => {
                    let value = pop(frame, &span)?;
                    let result = value
                        .negate()
                        .map_err(|kind| RuntimeError::value(kind, span))?;
                    frame.push(result);
                }

                OpCode::Concat => binary_total(frame, &span, Value::concat)?,
                OpCode::Diff => binary_total(frame, &span, Value::diff)?,

                OpCode::Eq => binary_total(frame, &span, Value::eq)?,
                OpCode::Ne => binary_total(frame, &span, Value::ne)?,
                OpCode::Gt => binary_total(frame, &span, Value::gt)?,
                OpCode::Lt => binary_total(frame, &span, Value::lt)?,
                OpCode::Ge => binary_total(frame, &span, Value::ge)?,
                OpCode::Le => binary_total(frame, &span, Value::le)?,

                OpCode::And => binary_total(frame, &span, Value::logical_and)?,
                OpCode::Or => binary_total(frame, &span, Value::logical_or)?,

                OpCode::Not => {
                    let value = pop(frame, &span)?;
                    frame.push(value.logical_not());
                }

                OpCode::Call => match CallTarget::decode(operand) {
                    CallTarget::Unknown => return Err(RuntimeError::UnknownFunction(span)),
                    CallTarget::ArityMismatch => return Err(RuntimeError::ArityMismatch(span)),
                    CallTarget::Function(index) => {
                        let func = match chunk.constants.get(index) {
                            Some(Value::Function(func)) => Rc::clone(func),
                            _ => {
                                return Err(RuntimeError::corrupt(
                                    format!("no function at index {}", index),
                                    span,
                                ))
                            }
                        };
                        // Arguments come off in reverse push order
                        let mut arguments = Vec::with_capacity(func.arity);
                        for _ in 0..func.arity {
                            arguments.push(pop(frame, &span)?);
                        }
                        arguments.reverse();

                        let mut callee =
                            Frame::with_arguments(func.chunk.instruction_count(), arguments);
                        self.execute(&func.chunk, &mut callee)?;
                        let result = callee.pop().ok_or_else(|| {
                            RuntimeError::corrupt("function returned no value", span)
                        })?;
                        frame.push(result);
                    }
                },

                // The return value stays on top of the frame's stack
                OpCode::Return => break,

                OpCode::Put => {
                    let value = pop(frame, &span)?;
                    let text = value.stringify();
                    self.out
                        .write_all(text.as_bytes())
                        .map_err(|err| RuntimeError::io(err, span))?;
                }
            }

            pc += 2;
        }

        Ok(())
    }
}

fn pop(frame: &mut Frame, span: &Span) -> VmResult<Value> {
    frame
        .pop()
        .ok_or_else(|| RuntimeError::corrupt("stack underflow", span.clone()))
}

/// Pop both operands and apply a fallible operation. The value compiled
/// last is on top, so the first pop is the left operand.
fn binary(
    frame: &mut Frame,
    span: &Span,
    op: fn(&Value, &Value) -> Result<Value, ValueError>,
) -> VmResult<()> {
    let left = pop(frame, span)?;
    let right = pop(frame, span)?;
    let result = op(&left, &right).map_err(|kind| RuntimeError::value(kind, span.clone()))?;
    frame.push(result);
    Ok(())
}

/// Pop both operands and apply a total operation.
fn binary_total(frame: &mut Frame, span: &Span, op: fn(&Value, &Value) -> Value) -> VmResult<()> {
    let left = pop(frame, span)?;
    let right = pop(frame, span)?;
    frame.push(op(&left, &right));
    Ok(())
}
