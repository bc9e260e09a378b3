//! Expression parsing using Pratt precedence.

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::error::ParserError;
use crate::lexer::TokenKind;
use crate::span::Span;

use super::core::{ParseResult, Parser};
use super::precedence::{get_precedence, Precedence};

impl Parser {
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.parse_precedence(Precedence::Or)
    }

    pub(crate) fn parse_precedence(&mut self, min_precedence: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.is_at_end() {
            let precedence = get_precedence(&self.peek().kind);
            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let start_span = token.span.clone();

        match &token.kind {
            TokenKind::IntLiteral(n) => Ok(Expr::new(ExprKind::IntLiteral(*n), start_span)),
            TokenKind::StringLiteral(s) => {
                Ok(Expr::new(ExprKind::StringLiteral(s.clone()), start_span))
            }

            // A name followed by ( is a call, otherwise a variable read
            TokenKind::Identifier(name) => {
                if self.match_token(&TokenKind::LeftParen) {
                    let arguments = self.parse_arguments()?;
                    self.expect(&TokenKind::RightParen)?;
                    Ok(Expr::new(
                        ExprKind::Call {
                            name: name.clone(),
                            arguments,
                        },
                        start_span,
                    ))
                } else {
                    Ok(Expr::new(ExprKind::Variable(name.clone()), start_span))
                }
            }

            TokenKind::LeftParen => {
                let expr = self.expression()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(expr)
            }

            TokenKind::Minus => {
                let operand = self.parse_precedence(Precedence::Unary)?;
                Ok(Expr::new(
                    ExprKind::Unary {
                        operator: UnaryOp::Negate,
                        operand: Box::new(operand),
                    },
                    start_span,
                ))
            }

            TokenKind::Bang => {
                let operand = self.parse_precedence(Precedence::Unary)?;
                Ok(Expr::new(
                    ExprKind::Unary {
                        operator: UnaryOp::Not,
                        operand: Box::new(operand),
                    },
                    start_span,
                ))
            }

            _ => Err(ParserError::unexpected_token(
                "expression",
                format!("{}", token.kind),
                token.span,
            )),
        }
    }

    fn parse_infix(&mut self, left: Expr, precedence: Precedence) -> ParseResult<Expr> {
        let token = self.advance();
        let span = token.span.clone();

        match &token.kind {
            TokenKind::Plus => self.binary_expr(left, BinaryOp::Add, span, precedence),
            TokenKind::Minus => self.binary_expr(left, BinaryOp::Subtract, span, precedence),
            TokenKind::Star => self.binary_expr(left, BinaryOp::Multiply, span, precedence),
            TokenKind::Slash => self.binary_expr(left, BinaryOp::Divide, span, precedence),
            TokenKind::Percent => self.binary_expr(left, BinaryOp::Modulo, span, precedence),
            TokenKind::Ampersand => self.binary_expr(left, BinaryOp::Concat, span, precedence),
            TokenKind::Tilde => self.binary_expr(left, BinaryOp::Diff, span, precedence),
            TokenKind::EqualEqual => self.binary_expr(left, BinaryOp::Equal, span, precedence),
            TokenKind::BangEqual => self.binary_expr(left, BinaryOp::NotEqual, span, precedence),
            TokenKind::Less => self.binary_expr(left, BinaryOp::Less, span, precedence),
            TokenKind::LessEqual => self.binary_expr(left, BinaryOp::LessEqual, span, precedence),
            TokenKind::Greater => self.binary_expr(left, BinaryOp::Greater, span, precedence),
            TokenKind::GreaterEqual => {
                self.binary_expr(left, BinaryOp::GreaterEqual, span, precedence)
            }
            TokenKind::And => self.binary_expr(left, BinaryOp::And, span, precedence),
            TokenKind::Or => self.binary_expr(left, BinaryOp::Or, span, precedence),

            // Right associative: the right side parses at the same level
            TokenKind::Caret => {
                let right = self.parse_precedence(precedence)?;
                Ok(Expr::new(
                    ExprKind::Binary {
                        left: Box::new(left),
                        operator: BinaryOp::Power,
                        right: Box::new(right),
                    },
                    span,
                ))
            }

            _ => Err(ParserError::unexpected_token(
                "infix operator",
                format!("{}", token.kind),
                token.span,
            )),
        }
    }

    fn binary_expr(
        &mut self,
        left: Expr,
        operator: BinaryOp,
        span: Span,
        precedence: Precedence,
    ) -> ParseResult<Expr> {
        let right = self.parse_precedence(precedence.next())?;
        Ok(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            span,
        ))
    }

    pub(crate) fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        let mut arguments = Vec::new();

        if !self.check(&TokenKind::RightParen) {
            arguments.push(self.expression()?);
            while self.match_token(&TokenKind::Comma) {
                arguments.push(self.expression()?);
            }
        }

        Ok(arguments)
    }
}
