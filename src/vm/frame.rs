//! Per-invocation execution state.

use std::collections::VecDeque;

use crate::bytecode::Value;

/// One function invocation: its value stack, variable slots, and the
/// queue of call arguments waiting to be bound by the prologue.
pub struct Frame {
    stack: Vec<Value>,
    vars: Vec<Value>,
    pending: VecDeque<Value>,
}

impl Frame {
    /// Frame for a chunk with the given instruction count. Every
    /// instruction pushes at most one value, so the stack never grows
    /// past that count.
    pub fn new(instruction_count: usize) -> Self {
        Self {
            stack: Vec::with_capacity(instruction_count),
            vars: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Frame for a callee, with its arguments queued in declaration order.
    pub fn with_arguments(instruction_count: usize, arguments: Vec<Value>) -> Self {
        let mut frame = Frame::new(instruction_count);
        frame.pending = arguments.into();
        frame
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.stack.pop()
    }

    /// Write a variable slot, growing the table on first use.
    pub fn store(&mut self, slot: usize, value: Value) {
        if slot >= self.vars.len() {
            self.vars.resize(slot + 1, Value::Dummy);
        }
        self.vars[slot] = value;
    }

    /// Read a variable slot. `None` means the slot was never written,
    /// which straight-line code cannot produce.
    pub fn load(&self, slot: usize) -> Option<Value> {
        self.vars.get(slot).cloned()
    }

    /// Take the next argument waiting to be bound.
    pub fn next_pending(&mut self) -> Option<Value> {
        self.pending.pop_front()
    }
}
