//! Source positions for diagnostics.
//!
//! Every token, AST node, and emitted instruction carries a [`Span`]: the
//! package (compilation unit) name plus a 1-based line and column. The
//! package name is reference-counted so the thousands of spans produced for
//! a program share one allocation.

use std::fmt;
use std::rc::Rc;

/// A single source position: package name, line, and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub package: Rc<str>,
    pub line: u32,
    pub col: u32,
}

impl Span {
    pub fn new(package: Rc<str>, line: u32, col: u32) -> Self {
        Self { package, line, col }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self {
            package: Rc::from(""),
            line: 0,
            col: 0,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.package, self.line, self.col)
    }
}
