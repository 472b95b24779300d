//! Crate-wide error plumbing.
//!
//! Every error produced by the pipeline (syntax, structural, lowering and
//! interpreter errors) implements [`GsmErrorExt`], so drivers can render them
//! uniformly without knowing which stage failed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_str = match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        };
        write!(f, "{}", level_str)
    }
}

pub trait GsmErrorExt {
    fn level(&self) -> Level;
    fn message(&self) -> String;
    /// Dotted path of the component that raised the error, e.g. `gsm.ast.parser`.
    fn issuer(&self) -> String;
    fn span(&self) -> Option<crate::location::Span>;
    fn location(&self) -> Option<crate::location::Location>;
}

impl fmt::Debug for dyn GsmErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc_str = match self.location() {
            Some(loc) => loc.to_string(),
            None => "unknown".to_string(),
        };
        let span_str = match self.span() {
            Some(span) => span.to_string(),
            None => "span:none".to_string(),
        };

        write!(
            f,
            "GSM | {} | {} | {} | {} | {}",
            self.level(),
            loc_str,
            self.issuer(),
            span_str,
            self.message()
        )
    }
}

impl fmt::Display for dyn GsmErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One-line report used by the driver: `GSM | LEVEL | location | message`.
pub fn generate_error_report<E: GsmErrorExt + ?Sized>(error: &E) -> String {
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    format!("GSM | {} | {} | {}", error.level(), location, error.message())
}
