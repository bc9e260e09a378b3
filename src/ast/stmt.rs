//! Statement AST nodes and their lowering.

use crate::ast::expr::Expr;
use crate::bytecode::{Compiler, FunctionValue, OpCode, Value};
use crate::span::Span;

/// A statement in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Lower this statement. The stack is left as it was found.
    pub fn compile(&self, compiler: &mut Compiler) {
        match &self.kind {
            StmtKind::Put(expr) => {
                expr.compile(compiler);
                compiler.emit(OpCode::Put, 0, self.span.clone());
            }
            // Sources go on the stack in reverse declaration order, so the
            // forward walk over targets pops each one's own value
            StmtKind::Assign { targets, values } => {
                for value in values.iter().rev() {
                    value.compile(compiler);
                }
                for target in targets {
                    let slot = compiler.register_variable(&target.name);
                    compiler.emit(OpCode::StoreVar, slot as i32, target.span.clone());
                }
            }
            StmtKind::Function(decl) => decl.compile(compiler),
        }
    }
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Output statement: put expr;
    Put(Expr),

    /// Assignment: a, b = 1, 2; (target and value counts match)
    Assign {
        targets: Vec<Ident>,
        values: Vec<Expr>,
    },

    /// Function declaration
    Function(FunctionDecl),
}

/// An identifier with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// A function declaration. The trailing return expression is kept apart
/// from the body statements; every function ends by producing a value.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Ident>,
    pub body: Vec<Stmt>,
    pub ret: Expr,
    pub span: Span,
}

impl FunctionDecl {
    /// Compile the body in a fresh context and register the finished
    /// function with the enclosing compiler.
    ///
    /// The prologue interleaves one dummy load with one store per
    /// parameter. At call time each dummy load hands over the next
    /// pending argument, binding parameters in declaration order.
    fn compile(&self, compiler: &mut Compiler) {
        let mut inner = Compiler::new();
        for param in &self.params {
            let index = inner.register_constant(Value::Dummy);
            inner.emit(OpCode::LoadConst, index as i32, param.span.clone());
            let slot = inner.register_variable(&param.name);
            inner.emit(OpCode::StoreVar, slot as i32, param.span.clone());
        }
        inner.inherit_functions(compiler);
        for stmt in &self.body {
            stmt.compile(&mut inner);
        }
        self.ret.compile(&mut inner);
        inner.emit(OpCode::Return, 0, self.span.clone());

        compiler.register_function(FunctionValue {
            name: self.name.clone(),
            arity: self.params.len(),
            chunk: inner.finish(),
        });
    }
}

/// A whole parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    /// Lower every top-level statement into the given compiler.
    pub fn compile(&self, compiler: &mut Compiler) {
        for stmt in &self.statements {
            stmt.compile(compiler);
        }
    }
}
