//! Bytecode instruction definitions for the seltzer VM.
//!
//! Instructions are flat `(opcode, operand)` pairs in a single `i32` stream;
//! the operand slot is always present and holds 0 when an opcode takes none.
//! Call-site and variable-slot resolution results travel through compilation
//! as [`CallTarget`] and [`VarSlot`] and collapse to their integer encodings
//! only when the instruction is emitted.

/// Opcodes for the bytecode virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    // ============ Constants & Variables ============
    /// Push a constant: LOAD_CONST <pool index>
    LoadConst = 0,
    /// Push a variable's value: LOAD_VAR <slot, or the unresolved encoding>
    LoadVar,
    /// Pop into a variable: STORE_VAR <slot>
    StoreVar,

    // ============ Arithmetic ============
    /// a + b, integer coercion
    Add,
    /// a - b
    Sub,
    /// a * b
    Mul,
    /// a / b, truncating
    Div,
    /// a % b
    Mod,
    /// a ^ b, non-negative exponent
    Pow,
    /// -a
    Negate,

    // ============ Strings ============
    /// String concatenation: a & b
    Concat,
    /// Symmetric character difference: a ~ b
    Diff,

    // ============ Comparison ============
    /// a == b
    Eq,
    /// a != b
    Ne,
    /// a > b
    Gt,
    /// a < b
    Lt,
    /// a >= b
    Ge,
    /// a <= b
    Le,

    // ============ Logic ============
    /// Truthiness of both operands: a && b
    And,
    /// a || b
    Or,
    /// !a
    Not,

    // ============ Functions & Output ============
    /// Call a function: CALL <encoded CallTarget>
    Call,
    /// End the current body; top of stack is the return value
    Return,
    /// Pop and write the stringified value to output
    Put,
}

impl OpCode {
    /// Convert a raw byte into an opcode, if valid.
    pub fn from_u8(byte: u8) -> Option<OpCode> {
        if byte <= OpCode::Put as u8 {
            // Safety: OpCode is repr(u8) with contiguous discriminants from
            // 0 through Put.
            Some(unsafe { std::mem::transmute::<u8, OpCode>(byte) })
        } else {
            None
        }
    }

    /// Convert an opcode slot read from the instruction stream.
    pub fn from_i32(raw: i32) -> Option<OpCode> {
        u8::try_from(raw).ok().and_then(OpCode::from_u8)
    }
}

impl From<OpCode> for i32 {
    fn from(op: OpCode) -> i32 {
        op as i32
    }
}

/// Compile-time resolution of a call site. Resolution happens while the
/// call expression compiles; the result is encoded into the `Call`
/// instruction's operand and surfaces failures only at dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTarget {
    /// Constant-pool index of the callee's function value.
    Function(usize),
    /// No function with the called name is in scope.
    Unknown,
    /// The name resolved but the argument count does not match its arity.
    ArityMismatch,
}

impl CallTarget {
    pub fn encode(self) -> i32 {
        match self {
            CallTarget::Function(index) => index as i32,
            CallTarget::Unknown => -1,
            CallTarget::ArityMismatch => -2,
        }
    }

    pub fn decode(operand: i32) -> CallTarget {
        match operand {
            -1 => CallTarget::Unknown,
            -2 => CallTarget::ArityMismatch,
            index => CallTarget::Function(index as usize),
        }
    }
}

/// Compile-time resolution of a variable read. Unknown names still compile;
/// the error is deferred to the `LoadVar` dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarSlot {
    Slot(usize),
    Unresolved,
}

impl VarSlot {
    pub fn encode(self) -> i32 {
        match self {
            VarSlot::Slot(index) => index as i32,
            VarSlot::Unresolved => -1,
        }
    }

    pub fn decode(operand: i32) -> VarSlot {
        match operand {
            -1 => VarSlot::Unresolved,
            index => VarSlot::Slot(index as usize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        let opcodes = [
            OpCode::LoadConst,
            OpCode::LoadVar,
            OpCode::StoreVar,
            OpCode::Add,
            OpCode::Sub,
            OpCode::Mul,
            OpCode::Div,
            OpCode::Mod,
            OpCode::Pow,
            OpCode::Negate,
            OpCode::Concat,
            OpCode::Diff,
            OpCode::Eq,
            OpCode::Ne,
            OpCode::Gt,
            OpCode::Lt,
            OpCode::Ge,
            OpCode::Le,
            OpCode::And,
            OpCode::Or,
            OpCode::Not,
            OpCode::Call,
            OpCode::Return,
            OpCode::Put,
        ];

        for op in opcodes {
            assert_eq!(OpCode::from_u8(op as u8), Some(op));
            assert_eq!(OpCode::from_i32(op as i32), Some(op));
        }
    }

    #[test]
    fn test_invalid_opcode() {
        assert_eq!(OpCode::from_u8(255), None);
        assert_eq!(OpCode::from_i32(OpCode::Put as i32 + 1), None);
        assert_eq!(OpCode::from_i32(-1), None);
    }

    #[test]
    fn test_call_target_encoding() {
        assert_eq!(CallTarget::Function(3).encode(), 3);
        assert_eq!(CallTarget::Unknown.encode(), -1);
        assert_eq!(CallTarget::ArityMismatch.encode(), -2);

        assert_eq!(CallTarget::decode(0), CallTarget::Function(0));
        assert_eq!(CallTarget::decode(-1), CallTarget::Unknown);
        assert_eq!(CallTarget::decode(-2), CallTarget::ArityMismatch);
    }

    #[test]
    fn test_var_slot_encoding() {
        assert_eq!(VarSlot::Slot(7).encode(), 7);
        assert_eq!(VarSlot::Unresolved.encode(), -1);
        assert_eq!(VarSlot::decode(7), VarSlot::Slot(7));
        assert_eq!(VarSlot::decode(-1), VarSlot::Unresolved);
    }
}
