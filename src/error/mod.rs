//! Error types for all phases: lexing, parsing, and execution.
//!
//! Compilation itself has no error type: unresolved variable and call
//! references are encoded into the instruction stream and surface at run
//! time, so lowering an AST never fails. Value operations raise span-free
//! [`ValueError`]s; the VM
//! wraps them into [`RuntimeError`]s carrying the faulting instruction's
//! position.

use crate::span::Span;
use thiserror::Error;

/// Errors from the scanner.
#[derive(Debug, Error)]
pub enum LexerError {
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Span),

    #[error("Unterminated string starting at {0}")]
    UnterminatedString(Span),

    #[error("Invalid escape sequence '\\{0}' at {1}")]
    InvalidEscape(char, Span),

    #[error("Invalid integer literal '{0}' at {1}")]
    InvalidNumber(String, Span),
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnexpectedChar(_, span)
            | LexerError::UnterminatedString(span)
            | LexerError::InvalidEscape(_, span)
            | LexerError::InvalidNumber(_, span) => span.clone(),
        }
    }
}

/// Errors from the parser.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Unexpected token: expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of input at {0}")]
    UnexpectedEof(Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl ParserError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        ParserError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn general(message: impl Into<String>, span: Span) -> Self {
        ParserError::General {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ParserError::UnexpectedToken { span, .. } | ParserError::General { span, .. } => {
                span.clone()
            }
            ParserError::UnexpectedEof(span) => span.clone(),
        }
    }
}

/// Errors raised by value operator methods, before the VM attaches the
/// faulting instruction's position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// A string operand could not be coerced to an integer.
    #[error("cannot {0} non-integer string")]
    NonNumeric(&'static str),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Negative exponent")]
    NegativeExponent,

    /// `to_str` on a function or dummy value. Never reachable from user
    /// programs; a raised instance means a VM invariant was broken.
    #[error("No string form for {0} value")]
    NoStringForm(&'static str),
}

/// Errors raised during execution. Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{kind} at {span}")]
    Value { kind: ValueError, span: Span },

    #[error("Undefined variable at {0}")]
    UndefinedVariable(Span),

    #[error("Unknown function at {0}")]
    UnknownFunction(Span),

    #[error("Wrong number of arguments at {0}")]
    ArityMismatch(Span),

    #[error("Unrecognized opcode {code} at {span}")]
    UnrecognizedOpcode { code: i32, span: Span },

    #[error("Corrupt bytecode: {message} at {span}")]
    Corrupt { message: String, span: Span },

    #[error("Output write failed: {message} at {span}")]
    Io { message: String, span: Span },
}

impl RuntimeError {
    pub fn value(kind: ValueError, span: Span) -> Self {
        RuntimeError::Value { kind, span }
    }

    pub fn unrecognized_opcode(code: i32, span: Span) -> Self {
        RuntimeError::UnrecognizedOpcode { code, span }
    }

    pub fn corrupt(message: impl Into<String>, span: Span) -> Self {
        RuntimeError::Corrupt {
            message: message.into(),
            span,
        }
    }

    pub fn io(err: std::io::Error, span: Span) -> Self {
        RuntimeError::Io {
            message: err.to_string(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            RuntimeError::Value { span, .. }
            | RuntimeError::UnrecognizedOpcode { span, .. }
            | RuntimeError::Corrupt { span, .. }
            | RuntimeError::Io { span, .. } => span.clone(),
            RuntimeError::UndefinedVariable(span)
            | RuntimeError::UnknownFunction(span)
            | RuntimeError::ArityMismatch(span) => span.clone(),
        }
    }
}

/// Top-level error type unifying all phases.
#[derive(Debug, Error)]
pub enum SeltzerError {
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("Parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
