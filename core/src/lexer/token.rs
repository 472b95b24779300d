use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::location::{Location, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Eoi,
    Unknown,

    Ident,
    Number,

    KwInt,
    KwIf,
    KwElif,
    KwElse,
    KwLoop,
    KwBegin,
    KwEnd,
    KwAnd,
    KwOr,

    Equal,        // =
    PlusEqual,    // +=
    MinusEqual,   // -=
    StarEqual,    // *=
    SlashEqual,   // /=
    PercentEqual, // %=
    EqualEqual,   // ==
    NotEqual,     // !=
    GreaterEqual, // >=
    LessEqual,    // <=
    Greater,      // >
    Less,         // <
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Colon,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut m = HashMap::new();
        m.insert("int", TokenKind::KwInt);
        m.insert("if", TokenKind::KwIf);
        m.insert("elif", TokenKind::KwElif);
        m.insert("else", TokenKind::KwElse);
        m.insert("loop", TokenKind::KwLoop);
        m.insert("begin", TokenKind::KwBegin);
        m.insert("end", TokenKind::KwEnd);
        m.insert("and", TokenKind::KwAnd);
        m.insert("or", TokenKind::KwOr);
        m
    };
}

impl TokenKind {
    /// Classify an identifier-shaped word, promoting reserved words to keywords.
    pub fn from_word(word: &str) -> TokenKind {
        KEYWORDS.get(word).copied().unwrap_or(TokenKind::Ident)
    }

    pub fn from_punct(text: &str) -> TokenKind {
        match text {
            "=" => TokenKind::Equal,
            "+=" => TokenKind::PlusEqual,
            "-=" => TokenKind::MinusEqual,
            "*=" => TokenKind::StarEqual,
            "/=" => TokenKind::SlashEqual,
            "%=" => TokenKind::PercentEqual,
            "==" => TokenKind::EqualEqual,
            "!=" => TokenKind::NotEqual,
            ">=" => TokenKind::GreaterEqual,
            "<=" => TokenKind::LessEqual,
            ">" => TokenKind::Greater,
            "<" => TokenKind::Less,
            "+" => TokenKind::Plus,
            "-" => TokenKind::Minus,
            "*" => TokenKind::Star,
            "/" => TokenKind::Slash,
            "%" => TokenKind::Percent,
            "^" => TokenKind::Caret,
            "(" => TokenKind::LParen,
            ")" => TokenKind::RParen,
            "," => TokenKind::Comma,
            ";" => TokenKind::Semicolon,
            ":" => TokenKind::Colon,
            _ => TokenKind::Unknown,
        }
    }

    pub fn is_assign_op(self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::PlusEqual
                | TokenKind::MinusEqual
                | TokenKind::StarEqual
                | TokenKind::SlashEqual
                | TokenKind::PercentEqual
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single token: its kind, the exact source text and where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Option<Span>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Option<Span>) -> Self {
        Token { kind, text: text.into(), span }
    }

    pub fn eoi(span: Option<Span>) -> Self {
        Token::new(TokenKind::Eoi, "", span)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn location(&self) -> Option<Location> {
        self.span.as_ref().map(|s| s.start.clone())
    }

    /// Text used in `Unexpected: ...` diagnostics.
    pub fn display_text(&self) -> &str {
        if self.kind == TokenKind::Eoi {
            "<end of input>"
        } else {
            &self.text
        }
    }
}
