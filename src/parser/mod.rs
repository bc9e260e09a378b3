//! Recursive descent parser producing the AST.

mod core;
mod expressions;
mod precedence;
mod statements;


pub use self::core::{ParseResult, Parser};
