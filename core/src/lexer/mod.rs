//! Tokenizer for GSM source text.
//!
//! The scanner itself is generated by pest from `grammar.pest`; this module
//! turns the resulting pairs into [`Token`]s and exposes them one at a time
//! through the [`TokenSource`] trait the parser consumes.

pub mod token;

use std::collections::VecDeque;

use log::debug;
use pest::Parser;
use pest_derive::Parser;

use crate::error::{GsmErrorExt, Level};
use crate::location::{Location, Span};
use crate::script::Script;

pub use token::{Token, TokenKind};

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct TokenGrammar;

/// Anything that can hand the parser one token at a time.
///
/// Once the input is exhausted implementations must keep returning an
/// [`TokenKind::Eoi`] token.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

pub struct Lexer {
    tokens: VecDeque<Token>,
    eoi: Token,
}

impl Lexer {
    pub fn new(script: &Script) -> Result<Self, LexError> {
        let mut pairs = TokenGrammar::parse(Rule::tokens, &script.content).map_err(|e| {
            LexError {
                message: e.to_string(),
                location: Some(Location::new(script.name.clone(), 1, 1)),
            }
        })?;

        let mut tokens = VecDeque::new();
        let mut eoi_span = None;
        let mut cursor = LineCursor::new(&script.content);
        if let Some(root) = pairs.next() {
            for pair in root.into_inner() {
                let span = Some(cursor.span_of(&pair, &script.name));
                let text = pair.as_str();
                let kind = match pair.as_rule() {
                    Rule::number => TokenKind::Number,
                    Rule::word => TokenKind::from_word(text),
                    Rule::punct => TokenKind::from_punct(text),
                    Rule::unknown => TokenKind::Unknown,
                    Rule::EOI => {
                        eoi_span = span;
                        continue;
                    }
                    _ => continue,
                };
                tokens.push_back(Token::new(kind, text, span));
            }
        }

        debug!("lexed {} tokens from {}", tokens.len(), script.name);
        Ok(Lexer {
            tokens,
            eoi: Token::eoi(eoi_span),
        })
    }

    /// Token source over an already-built token list, mostly for tests and
    /// for drivers that bring their own scanner.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Lexer {
            tokens: tokens.into_iter().filter(|t| t.kind != TokenKind::Eoi).collect(),
            eoi: Token::eoi(None),
        }
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Token {
        self.tokens.pop_front().unwrap_or_else(|| self.eoi.clone())
    }
}

/// Running line/column position over the source.
///
/// Pairs arrive in source order, so each token only scans the bytes between
/// the previous position and its own end. Columns count characters, starting
/// at 1, matching pest's `line_col`.
struct LineCursor<'s> {
    src: &'s str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'s> LineCursor<'s> {
    fn new(src: &'s str) -> Self {
        LineCursor { src, offset: 0, line: 1, column: 1 }
    }

    fn advance_to(&mut self, target: usize) -> (usize, usize) {
        if target > self.offset {
            for c in self.src[self.offset..target].chars() {
                if c == '\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
            }
            self.offset = target;
        }
        (self.line, self.column)
    }

    fn span_of(&mut self, pair: &pest::iterators::Pair<Rule>, file: &str) -> Span {
        let span = pair.as_span();
        let (start_line, start_col) = self.advance_to(span.start());
        let (end_line, end_col) = self.advance_to(span.end());
        Span::new(
            Location::new(file.to_string(), start_line, start_col),
            Location::new(file.to_string(), end_line, end_col),
        )
    }
}

#[derive(Debug, Clone)]
pub struct LexError {
    message: String,
    location: Option<Location>,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

impl GsmErrorExt for LexError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "gsm.lexer".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let script = Script::from_source("t.gsm", src);
        let mut lexer = Lexer::new(&script).expect("lexing should not fail");
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            if tok.is(TokenKind::Eoi) {
                break;
            }
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("int intx elif loop begin end"),
            vec![
                TokenKind::KwInt,
                TokenKind::Ident,
                TokenKind::KwElif,
                TokenKind::KwLoop,
                TokenKind::KwBegin,
                TokenKind::KwEnd,
            ]
        );
    }

    #[test]
    fn compound_operators_are_single_tokens() {
        assert_eq!(
            kinds("x += 1 >= <= == != %= ^"),
            vec![
                TokenKind::Ident,
                TokenKind::PlusEqual,
                TokenKind::Number,
                TokenKind::GreaterEqual,
                TokenKind::LessEqual,
                TokenKind::EqualEqual,
                TokenKind::NotEqual,
                TokenKind::PercentEqual,
                TokenKind::Caret,
            ]
        );
    }

    #[test]
    fn stray_characters_become_unknown_tokens() {
        assert_eq!(
            kinds("x $ 1"),
            vec![TokenKind::Ident, TokenKind::Unknown, TokenKind::Number]
        );
    }

    #[test]
    fn tokens_carry_positions() {
        let script = Script::from_source("pos.gsm", "int x;\n  x = 1;");
        let mut lexer = Lexer::new(&script).unwrap();
        for _ in 0..3 {
            lexer.next_token();
        }
        let x = lexer.next_token();
        let loc = x.location().unwrap();
        assert_eq!((loc.line, loc.column), (2, 3));
        assert_eq!(loc.file, "pos.gsm");
    }

    #[test]
    fn positions_track_across_lines_and_wide_characters() {
        let script = Script::from_source("wide.gsm", "x\n\n  é = 10;\ny");
        let mut lexer = Lexer::new(&script).expect("lex");
        let mut spans = Vec::new();
        loop {
            let tok = lexer.next_token();
            if tok.is(TokenKind::Eoi) {
                break;
            }
            let span = tok.span.clone().expect("span");
            spans.push((span.start.line, span.start.column, span.end.line, span.end.column));
        }
        assert_eq!(
            spans,
            vec![
                (1, 1, 1, 2),
                (3, 3, 3, 4),
                (3, 5, 3, 6),
                (3, 7, 3, 9),
                (3, 9, 3, 10),
                (4, 1, 4, 2),
            ]
        );
    }

    #[test]
    fn large_inputs_lex_in_linear_time() {
        let terms = 60_000;
        let mut src = String::from("x = 1");
        for i in 0..terms {
            src.push_str(if i % 50 == 0 { "\n + 1" } else { " + 1" });
        }
        src.push(';');

        let started = std::time::Instant::now();
        let script = Script::from_source("big.gsm", &src);
        let mut lexer = Lexer::new(&script).expect("lex");
        assert!(started.elapsed() < std::time::Duration::from_secs(10));

        let mut last = None;
        let mut count = 0;
        loop {
            let tok = lexer.next_token();
            if tok.is(TokenKind::Eoi) {
                break;
            }
            count += 1;
            last = Some(tok);
        }
        assert_eq!(count, 3 + 2 * terms + 1);
        let semi = last.expect("last token");
        assert!(semi.is(TokenKind::Semicolon));
        assert_eq!(semi.location().expect("location").line, 1 + terms / 50);
    }

    #[test]
    fn keeps_returning_eoi() {
        let mut lexer = Lexer::from_tokens(vec![]);
        assert!(lexer.next_token().is(TokenKind::Eoi));
        assert!(lexer.next_token().is(TokenKind::Eoi));
    }
}
