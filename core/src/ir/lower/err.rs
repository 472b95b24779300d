use crate::error::{GsmErrorExt, Level};
use crate::location::{Location, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoweringErrorKind {
    /// A name was read or assigned before any declaration introduced it.
    UndeclaredName { name: String },
    /// `^` whose right operand is not a non-negative decimal literal.
    UnsupportedExponent { reason: String },
    BodyCountMismatch { guards: usize, bodies: usize },
    /// Number literal that does not fit the 32-bit integer type.
    InvalidLiteral { text: String },
    /// An `ExprId` that does not resolve in the tree being lowered.
    UnknownExpression { index: usize },
    /// Internal block-builder invariant broken (emitting after a terminator,
    /// no insertion point, unterminated block at the end).
    MalformedBlock { reason: String },
}

impl std::fmt::Display for LoweringErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoweringErrorKind::UndeclaredName { name } => {
                write!(f, "use of undeclared name '{}'", name)
            }
            LoweringErrorKind::UnsupportedExponent { reason } => {
                write!(f, "unsupported exponent: {}", reason)
            }
            LoweringErrorKind::BodyCountMismatch { guards, bodies } => write!(
                f,
                "condition with {} guard(s) cannot have {} bod(ies)",
                guards, bodies
            ),
            LoweringErrorKind::InvalidLiteral { text } => {
                write!(f, "integer literal '{}' is out of range", text)
            }
            LoweringErrorKind::UnknownExpression { index } => {
                write!(f, "expression #{} is not part of this tree", index)
            }
            LoweringErrorKind::MalformedBlock { reason } => write!(f, "malformed block: {}", reason),
        }
    }
}

/// Fatal lowering failure; no partial module accompanies it.
#[derive(Debug, Clone)]
pub struct LoweringError {
    kind: LoweringErrorKind,
    issuer: String,
    location: Option<Location>,
}

impl LoweringError {
    pub fn new(kind: LoweringErrorKind, issuer: &str, location: Option<Location>) -> Self {
        LoweringError { kind, issuer: issuer.to_string(), location }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        LoweringError::new(
            LoweringErrorKind::MalformedBlock { reason: reason.into() },
            "gsm.ir.lower.builder",
            None,
        )
    }

    pub fn kind(&self) -> &LoweringErrorKind {
        &self.kind
    }
}

impl std::fmt::Display for LoweringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} at {}", self.kind, loc)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl std::error::Error for LoweringError {}

impl GsmErrorExt for LoweringError {
    fn level(&self) -> Level {
        match self.kind {
            LoweringErrorKind::MalformedBlock { .. } => Level::Critical,
            _ => Level::Error,
        }
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
