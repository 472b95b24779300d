//! Token cursor and error policy shared by statement and expression parsing.
//!
//! The parser keeps exactly one token of lookahead. Any unexpected token is
//! reported once, the sticky error flag is raised and the rest of the input is
//! skipped: nothing after the first bad statement is parsed.

use log::debug;

use crate::lexer::{Token, TokenKind, TokenSource};

use super::err::{ParseError, SyntaxError};
use super::node::Ast;

pub(crate) type ParseResult<T> = Result<T, SyntaxError>;

pub struct Parser<S: TokenSource> {
    source: S,
    pub(crate) tok: Token,
    has_error: bool,
    diagnostics: Vec<SyntaxError>,
    pub(crate) ast: Ast,
}

impl<S: TokenSource> Parser<S> {
    /// Create a parser and pull the first lookahead token.
    pub fn new(source: S) -> Self {
        let mut parser = Parser {
            source,
            tok: Token::eoi(None),
            has_error: false,
            diagnostics: Vec::new(),
            ast: Ast::new(),
        };
        parser.advance();
        parser
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn diagnostics(&self) -> &[SyntaxError] {
        &self.diagnostics
    }

    /// Parse a whole program. On failure every diagnostic gathered is
    /// returned and no tree is handed out.
    pub fn parse(&mut self) -> Result<Ast, ParseError> {
        self.parse_goal();
        if self.has_error {
            return Err(ParseError { diagnostics: self.diagnostics.clone() });
        }
        let ast = std::mem::take(&mut self.ast);
        debug!(
            "parsed {} statement(s), {} expression node(s)",
            ast.statements().len(),
            ast.expr_count()
        );
        Ok(ast)
    }

    pub(crate) fn advance(&mut self) {
        self.tok = self.source.next_token();
    }

    pub(crate) fn unexpected(&self, issuer: &str) -> SyntaxError {
        SyntaxError::unexpected(&self.tok, issuer)
    }

    /// Check the lookahead without consuming it.
    pub(crate) fn expect(&self, kind: TokenKind, issuer: &str) -> ParseResult<()> {
        if self.tok.is(kind) {
            Ok(())
        } else {
            Err(self.unexpected(issuer).with_note(format!("expected {}", kind)))
        }
    }

    /// Check the lookahead and move past it.
    pub(crate) fn consume(&mut self, kind: TokenKind, issuer: &str) -> ParseResult<()> {
        self.expect(kind, issuer)?;
        self.advance();
        Ok(())
    }

    /// Consume an identifier and return its text.
    pub(crate) fn consume_ident(&mut self, issuer: &str) -> ParseResult<Token> {
        self.expect(TokenKind::Ident, issuer)?;
        let tok = self.tok.clone();
        self.advance();
        Ok(tok)
    }

    pub(crate) fn report(&mut self, error: SyntaxError) {
        debug!("syntax error: {}", error);
        self.diagnostics.push(error);
        self.has_error = true;
    }

    /// Panic-mode recovery: drop everything up to the end of input.
    pub(crate) fn skip_to_end(&mut self) {
        while !self.tok.is(TokenKind::Eoi) {
            self.advance();
        }
    }
}
