//! Statement-level productions:
//!
//! ```text
//! Goal        := (Declaration | Assignment ';' | Condition | Loop)* EOI
//! Declaration := 'int' Ident (',' Ident)* ('=' Expr (',' Expr)*)? ';'
//! Assignment  := Factor AssignOp Expr
//! Condition   := 'if' Expr ':' Block ('elif' Expr ':' Block)* ('else' ':' Block)?
//! Loop        := 'loop' Expr ':' Block
//! Block       := 'begin' Assignment* 'end'
//! ```

use crate::lexer::{TokenKind, TokenSource};

use super::err::SyntaxError;
use super::kind::{BinaryOperator, Factor};
use super::node::{Assignment, Block, Condition, Declaration, Loop, Stmt};
use super::parser::{ParseResult, Parser};

impl<S: TokenSource> Parser<S> {
    pub(crate) fn parse_goal(&mut self) {
        while !self.tok.is(TokenKind::Eoi) {
            match self.parse_statement() {
                Ok(stmt) => self.ast.push_statement(stmt),
                Err(e) => {
                    self.report(e);
                    self.skip_to_end();
                }
            }
        }
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.tok.kind {
            TokenKind::KwInt => Ok(Stmt::Declaration(self.parse_declaration()?)),
            TokenKind::Ident => {
                let assignment = self.parse_assignment()?;
                self.consume(TokenKind::Semicolon, "gsm.ast.stmt.parse_assignment")?;
                Ok(Stmt::Assignment(assignment))
            }
            TokenKind::KwIf => Ok(Stmt::Condition(self.parse_condition()?)),
            TokenKind::KwLoop => Ok(Stmt::Loop(self.parse_loop()?)),
            _ => Err(self.unexpected("gsm.ast.stmt.parse_goal")),
        }
    }

    fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        const ISSUER: &str = "gsm.ast.stmt.parse_declaration";
        let start = self.tok.clone();
        self.consume(TokenKind::KwInt, ISSUER)?;

        let mut names = vec![self.consume_ident(ISSUER)?.text];
        while self.tok.is(TokenKind::Comma) {
            self.advance();
            names.push(self.consume_ident(ISSUER)?.text);
        }

        let mut initializers = Vec::new();
        if self.tok.is(TokenKind::Equal) {
            self.advance();
            initializers.push(self.parse_expr()?);
            while self.tok.is(TokenKind::Comma) {
                if initializers.len() == names.len() {
                    return Err(self.unexpected(ISSUER).with_note(format!(
                        "more initializers than the {} declared name(s)",
                        names.len()
                    )));
                }
                self.advance();
                initializers.push(self.parse_expr()?);
            }
        }

        self.consume(TokenKind::Semicolon, ISSUER)?;
        Declaration::new(names, initializers, start.location())
            .map_err(|e| SyntaxError::unexpected(&start, ISSUER).with_note(e.to_string()))
    }

    /// Parse `name op= expr`. Compound operators are desugared here into
    /// `name = name op expr`, so the tree only ever holds plain stores.
    pub(crate) fn parse_assignment(&mut self) -> ParseResult<Assignment> {
        const ISSUER: &str = "gsm.ast.stmt.parse_assignment";
        let target_tok = self.consume_ident(ISSUER)?;
        let target = Factor::identifier(target_tok.text.clone());

        if !self.tok.kind.is_assign_op() {
            return Err(self.unexpected(ISSUER).with_note("expected an assignment operator"));
        }
        let op_tok = self.tok.clone();
        self.advance();

        let rhs = self.parse_expr()?;
        let compound = match op_tok.kind {
            TokenKind::PlusEqual => Some(BinaryOperator::Add),
            TokenKind::MinusEqual => Some(BinaryOperator::Sub),
            TokenKind::StarEqual => Some(BinaryOperator::Mul),
            TokenKind::SlashEqual => Some(BinaryOperator::Div),
            TokenKind::PercentEqual => Some(BinaryOperator::Mod),
            _ => None,
        };
        let value = match compound {
            Some(op) => {
                let current = self.ast.factor(target.clone(), target_tok.location());
                self.ast
                    .binary(op, current, rhs, op_tok.location())
                    .map_err(|e| SyntaxError::unexpected(&op_tok, ISSUER).with_note(e.to_string()))?
            }
            None => rhs,
        };

        Assignment::new(target, value, target_tok.location())
            .map_err(|e| SyntaxError::unexpected(&target_tok, ISSUER).with_note(e.to_string()))
    }

    fn parse_condition(&mut self) -> ParseResult<Condition> {
        const ISSUER: &str = "gsm.ast.stmt.parse_condition";
        let start = self.tok.clone();
        let mut guards = Vec::new();
        let mut bodies = Vec::new();

        self.consume(TokenKind::KwIf, ISSUER)?;
        guards.push(self.parse_expr()?);
        self.consume(TokenKind::Colon, ISSUER)?;
        bodies.push(self.parse_block()?);

        while self.tok.is(TokenKind::KwElif) {
            self.advance();
            guards.push(self.parse_expr()?);
            self.consume(TokenKind::Colon, ISSUER)?;
            bodies.push(self.parse_block()?);
        }

        if self.tok.is(TokenKind::KwElse) {
            self.advance();
            self.consume(TokenKind::Colon, ISSUER)?;
            bodies.push(self.parse_block()?);
        }

        Condition::new(guards, bodies, start.location())
            .map_err(|e| SyntaxError::unexpected(&start, ISSUER).with_note(e.to_string()))
    }

    fn parse_loop(&mut self) -> ParseResult<Loop> {
        const ISSUER: &str = "gsm.ast.stmt.parse_loop";
        let start = self.tok.clone();
        self.consume(TokenKind::KwLoop, ISSUER)?;
        let condition = self.parse_expr()?;
        self.consume(TokenKind::Colon, ISSUER)?;
        let body = self.parse_block()?;
        Ok(Loop::new(condition, body, start.location()))
    }

    fn parse_block(&mut self) -> ParseResult<Block> {
        const ISSUER: &str = "gsm.ast.stmt.parse_block";
        self.consume(TokenKind::KwBegin, ISSUER)?;
        let mut assignments = Vec::new();
        while self.tok.is(TokenKind::Ident) {
            assignments.push(self.parse_assignment()?);
        }
        self.consume(TokenKind::KwEnd, ISSUER)?;
        Ok(Block::new(assignments))
    }
}
