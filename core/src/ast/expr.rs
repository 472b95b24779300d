//! Expression parsing: one left-associative function per precedence level,
//! loosest first.
//!
//! ```text
//! or  <  and  <  == !=  <  >= <=  <  > <  <  + -  <  * / %  <  ^  <  primary
//! ```

use crate::lexer::{TokenKind, TokenSource};

use super::err::SyntaxError;
use super::kind::{BinaryOperator, Factor};
use super::node::ExprId;
use super::parser::{ParseResult, Parser};

type Level<S> = fn(&mut Parser<S>) -> ParseResult<ExprId>;

impl<S: TokenSource> Parser<S> {
    pub(crate) fn parse_expr(&mut self) -> ParseResult<ExprId> {
        self.parse_left_assoc(&[(TokenKind::KwOr, BinaryOperator::Or)], Self::parse_and)
    }

    fn parse_and(&mut self) -> ParseResult<ExprId> {
        self.parse_left_assoc(&[(TokenKind::KwAnd, BinaryOperator::And)], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> ParseResult<ExprId> {
        self.parse_left_assoc(
            &[
                (TokenKind::EqualEqual, BinaryOperator::Eq),
                (TokenKind::NotEqual, BinaryOperator::Ne),
            ],
            Self::parse_inclusive_ordering,
        )
    }

    fn parse_inclusive_ordering(&mut self) -> ParseResult<ExprId> {
        self.parse_left_assoc(
            &[
                (TokenKind::GreaterEqual, BinaryOperator::Ge),
                (TokenKind::LessEqual, BinaryOperator::Le),
            ],
            Self::parse_strict_ordering,
        )
    }

    fn parse_strict_ordering(&mut self) -> ParseResult<ExprId> {
        self.parse_left_assoc(
            &[
                (TokenKind::Greater, BinaryOperator::Gt),
                (TokenKind::Less, BinaryOperator::Lt),
            ],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> ParseResult<ExprId> {
        self.parse_left_assoc(
            &[
                (TokenKind::Plus, BinaryOperator::Add),
                (TokenKind::Minus, BinaryOperator::Sub),
            ],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> ParseResult<ExprId> {
        self.parse_left_assoc(
            &[
                (TokenKind::Star, BinaryOperator::Mul),
                (TokenKind::Slash, BinaryOperator::Div),
                (TokenKind::Percent, BinaryOperator::Mod),
            ],
            Self::parse_power,
        )
    }

    fn parse_power(&mut self) -> ParseResult<ExprId> {
        self.parse_left_assoc(&[(TokenKind::Caret, BinaryOperator::Pow)], Self::parse_primary)
    }

    fn parse_primary(&mut self) -> ParseResult<ExprId> {
        const ISSUER: &str = "gsm.ast.expr.parse_primary";
        let tok = self.tok.clone();
        match tok.kind {
            TokenKind::Number => {
                self.advance();
                Ok(self.ast.factor(Factor::number(tok.text.clone()), tok.location()))
            }
            TokenKind::Ident => {
                self.advance();
                Ok(self.ast.factor(Factor::identifier(tok.text.clone()), tok.location()))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.consume(TokenKind::RParen, ISSUER)?;
                Ok(inner)
            }
            _ => Err(self.unexpected(ISSUER).with_note("expected a number, identifier or '('")),
        }
    }

    /// Parse `next (op next)*` for the operators of one level and fold the
    /// chain into a left-leaning tree.
    fn parse_left_assoc(
        &mut self,
        ops: &[(TokenKind, BinaryOperator)],
        next: Level<S>,
    ) -> ParseResult<ExprId> {
        let mut left = next(self)?;
        loop {
            let current = self.tok.kind;
            let Some(&(_, op)) = ops.iter().find(|(kind, _)| *kind == current) else {
                break;
            };
            let op_tok = self.tok.clone();
            self.advance();
            let right = next(self)?;
            left = self
                .ast
                .binary(op, left, right, op_tok.location())
                .map_err(|e| {
                    SyntaxError::unexpected(&op_tok, "gsm.ast.expr.parse_left_assoc").with_note(e.to_string())
                })?;
        }
        Ok(left)
    }
}
