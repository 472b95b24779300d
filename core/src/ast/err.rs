use crate::error::{GsmErrorExt, Level};
use crate::lexer::Token;
use crate::location::{Location, Span};

/// Shape violations caught while constructing AST nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    EmptyDeclaration,
    TooManyInitializers { names: usize, initializers: usize },
    BodyCountMismatch { guards: usize, bodies: usize },
    NonIdentifierTarget { text: String },
    UnknownExpression { index: usize },
    SharedExpression { index: usize },
}

impl std::fmt::Display for AstError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AstError::EmptyDeclaration => write!(f, "declaration introduces no names"),
            AstError::TooManyInitializers { names, initializers } => write!(
                f,
                "declaration has {} initializer(s) for {} name(s)",
                initializers, names
            ),
            AstError::BodyCountMismatch { guards, bodies } => write!(
                f,
                "condition has {} guard(s) but {} bod(ies); expected {} or {}",
                guards,
                bodies,
                guards,
                guards + 1
            ),
            AstError::NonIdentifierTarget { text } => {
                write!(f, "cannot assign to '{}', target must be an identifier", text)
            }
            AstError::UnknownExpression { index } => {
                write!(f, "expression #{} does not belong to this tree", index)
            }
            AstError::SharedExpression { index } => {
                write!(f, "expression #{} already has a parent", index)
            }
        }
    }
}

impl std::error::Error for AstError {}

impl GsmErrorExt for AstError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "gsm.ast.node".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}

/// One parser diagnostic. The message always names the offending token's
/// source text (`Unexpected: <text>`).
#[derive(Debug, Clone)]
pub struct SyntaxError {
    level: Level,
    token: String,
    note: Option<String>,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl SyntaxError {
    pub fn unexpected(token: &Token, issuer: &str) -> Self {
        SyntaxError {
            level: Level::Error,
            token: token.display_text().to_string(),
            note: None,
            issuer: issuer.to_string(),
            location: token.location(),
            span: token.span.clone(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Text of the token the parser tripped over.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unexpected: {}", self.token)?;
        if let Some(note) = &self.note {
            write!(f, " ({})", note)?;
        }
        if let Some(loc) = &self.location {
            write!(f, " (at {})", loc)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

impl GsmErrorExt for SyntaxError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        match &self.note {
            Some(note) => format!("Unexpected: {} ({})", self.token, note),
            None => format!("Unexpected: {}", self.token),
        }
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

/// Returned by [`crate::ast::Parser::parse`] when any diagnostic was raised.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub diagnostics: Vec<SyntaxError>,
}

impl ParseError {
    pub fn first(&self) -> Option<&SyntaxError> {
        self.diagnostics.first()
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diag)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl GsmErrorExt for ParseError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.diagnostics
            .iter()
            .map(|d| d.message())
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn issuer(&self) -> String {
        "gsm.ast.parser".to_string()
    }

    fn span(&self) -> Option<Span> {
        self.first().and_then(|d| d.span())
    }

    fn location(&self) -> Option<Location> {
        self.first().and_then(|d| d.location())
    }
}
