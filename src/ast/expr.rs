//! Expression AST nodes and their lowering.

use crate::bytecode::{Compiler, OpCode, Value};
use crate::span::Span;

/// An expression in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Lower this expression. Exactly one value is left on the stack.
    pub fn compile(&self, compiler: &mut Compiler) {
        match &self.kind {
            ExprKind::IntLiteral(n) => {
                let index = compiler.register_constant(Value::Int(*n));
                compiler.emit(OpCode::LoadConst, index as i32, self.span.clone());
            }
            ExprKind::StringLiteral(s) => {
                let index = compiler.register_constant(Value::str(s.clone()));
                compiler.emit(OpCode::LoadConst, index as i32, self.span.clone());
            }
            ExprKind::Variable(name) => {
                let slot = compiler.lookup_variable(name);
                compiler.emit(OpCode::LoadVar, slot.encode(), self.span.clone());
            }
            // Right first: the operation pops its left operand on top
            ExprKind::Binary {
                left,
                operator,
                right,
            } => {
                right.compile(compiler);
                left.compile(compiler);
                compiler.emit(operator.opcode(), 0, self.span.clone());
            }
            ExprKind::Unary { operator, operand } => {
                operand.compile(compiler);
                let opcode = match operator {
                    UnaryOp::Negate => OpCode::Negate,
                    UnaryOp::Not => OpCode::Not,
                };
                compiler.emit(opcode, 0, self.span.clone());
            }
            ExprKind::Call { name, arguments } => {
                for argument in arguments {
                    argument.compile(compiler);
                }
                let target = compiler.resolve_call(name, arguments.len());
                compiler.emit(OpCode::Call, target.encode(), self.span.clone());
            }
        }
    }
}

/// All expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal: 42
    IntLiteral(i64),
    /// String literal: "hello"
    StringLiteral(String),

    /// Variable reference: foo
    Variable(String),

    /// Binary operation: a + b
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },

    /// Unary operation: -x, !x
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },

    /// Function call: foo(a, b)
    Call {
        name: String,
        arguments: Vec<Expr>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Concat,
    Diff,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOp {
    /// The instruction this operator lowers to.
    pub fn opcode(self) -> OpCode {
        match self {
            BinaryOp::Add => OpCode::Add,
            BinaryOp::Subtract => OpCode::Sub,
            BinaryOp::Multiply => OpCode::Mul,
            BinaryOp::Divide => OpCode::Div,
            BinaryOp::Modulo => OpCode::Mod,
            BinaryOp::Power => OpCode::Pow,
            BinaryOp::Concat => OpCode::Concat,
            BinaryOp::Diff => OpCode::Diff,
            BinaryOp::Equal => OpCode::Eq,
            BinaryOp::NotEqual => OpCode::Ne,
            BinaryOp::Less => OpCode::Lt,
            BinaryOp::LessEqual => OpCode::Le,
            BinaryOp::Greater => OpCode::Gt,
            BinaryOp::GreaterEqual => OpCode::Ge,
            BinaryOp::And => OpCode::And,
            BinaryOp::Or => OpCode::Or,
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Subtract => write!(f, "-"),
            BinaryOp::Multiply => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
            BinaryOp::Modulo => write!(f, "%"),
            BinaryOp::Power => write!(f, "^"),
            BinaryOp::Concat => write!(f, "&"),
            BinaryOp::Diff => write!(f, "~"),
            BinaryOp::Equal => write!(f, "=="),
            BinaryOp::NotEqual => write!(f, "!="),
            BinaryOp::Less => write!(f, "<"),
            BinaryOp::LessEqual => write!(f, "<="),
            BinaryOp::Greater => write!(f, ">"),
            BinaryOp::GreaterEqual => write!(f, ">="),
            BinaryOp::And => write!(f, "&&"),
            BinaryOp::Or => write!(f, "||"),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Negate => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}
