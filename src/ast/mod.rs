//! Abstract Syntax Tree.

pub mod expr;
pub mod stmt;

pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use stmt::{FunctionDecl, Ident, Program, Stmt, StmtKind};
