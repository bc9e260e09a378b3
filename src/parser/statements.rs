//! Statement parsing: put, assignment, function declarations.

use crate::ast::{FunctionDecl, Stmt, StmtKind};
use crate::error::ParserError;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};

impl Parser {
    pub(crate) fn declaration(&mut self) -> ParseResult<Stmt> {
        if self.check(&TokenKind::Fn) {
            self.function_declaration()
        } else {
            self.statement()
        }
    }

    pub(crate) fn statement(&mut self) -> ParseResult<Stmt> {
        if self.check(&TokenKind::Put) {
            self.put_statement()
        } else if self.check(&TokenKind::Identifier(String::new())) {
            self.assignment_statement()
        } else if self.check(&TokenKind::Return) {
            Err(ParserError::general(
                "'return' outside a function body",
                self.current_span(),
            ))
        } else {
            Err(ParserError::unexpected_token(
                "statement",
                format!("{}", self.peek().kind),
                self.current_span(),
            ))
        }
    }

    fn put_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Put)?;

        let expr = self.expression()?;
        self.expect(&TokenKind::Semicolon)?;

        Ok(Stmt::new(StmtKind::Put(expr), start_span))
    }

    /// One or more comma separated targets, `=`, a matching count of
    /// comma separated value expressions.
    fn assignment_statement(&mut self) -> ParseResult<Stmt> {
        let mut targets = vec![self.expect_identifier()?];
        while self.match_token(&TokenKind::Comma) {
            targets.push(self.expect_identifier()?);
        }

        let equal = self.expect(&TokenKind::Equal)?;

        let mut values = vec![self.expression()?];
        while self.match_token(&TokenKind::Comma) {
            values.push(self.expression()?);
        }
        self.expect(&TokenKind::Semicolon)?;

        if targets.len() != values.len() {
            return Err(ParserError::general(
                format!(
                    "assignment of {} values to {} targets",
                    values.len(),
                    targets.len()
                ),
                equal.span,
            ));
        }

        Ok(Stmt::new(StmtKind::Assign { targets, values }, equal.span))
    }

    /// fn name(params) { declarations... return expr; }
    fn function_declaration(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Fn)?;

        let name = self.expect_identifier()?;

        self.expect(&TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            params.push(self.expect_identifier()?);
            while self.match_token(&TokenKind::Comma) {
                params.push(self.expect_identifier()?);
            }
        }
        self.expect(&TokenKind::RightParen)?;

        self.expect(&TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::Return) {
            if self.is_at_end() {
                return Err(ParserError::UnexpectedEof(self.current_span()));
            }
            body.push(self.declaration()?);
        }
        self.expect(&TokenKind::Return)?;
        let ret = self.expression()?;
        self.expect(&TokenKind::Semicolon)?;
        self.expect(&TokenKind::RightBrace)?;

        Ok(Stmt::new(
            StmtKind::Function(FunctionDecl {
                name: name.name,
                params,
                body,
                ret,
                span: start_span.clone(),
            }),
            start_span,
        ))
    }
}
