use crate::error::{GsmErrorExt, Level};
use crate::location::{Location, Span};

/// Failure while interpreting a lowered module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// `sdiv`/`srem` with a zero divisor.
    DivisionByZero { block: String },
    /// `i32::MIN / -1` and its remainder counterpart.
    DivisionOverflow { block: String },
    UninitialisedSlot { slot: String },
    UninitialisedRegister { reg: usize },
    UnknownSlot { slot: usize },
    UnknownBlock { block: usize },
    UnknownCallee { name: String },
    BadArity { name: String, expected: usize, found: usize },
    MissingTerminator { block: String },
    EmptyRoutine,
    StepLimitExceeded { limit: usize },
}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VmError::DivisionByZero { block } => write!(f, "division by zero in block '{}'", block),
            VmError::DivisionOverflow { block } => {
                write!(f, "signed division overflow in block '{}'", block)
            }
            VmError::UninitialisedSlot { slot } => {
                write!(f, "slot '{}' read before any store", slot)
            }
            VmError::UninitialisedRegister { reg } => write!(f, "register %{} used before definition", reg),
            VmError::UnknownSlot { slot } => write!(f, "slot %slot{} was never allocated", slot),
            VmError::UnknownBlock { block } => write!(f, "branch to unknown block #{}", block),
            VmError::UnknownCallee { name } => write!(f, "call to undeclared routine '{}'", name),
            VmError::BadArity { name, expected, found } => write!(
                f,
                "'{}' takes {} argument(s) but was called with {}",
                name, expected, found
            ),
            VmError::MissingTerminator { block } => write!(f, "block '{}' has no terminator", block),
            VmError::EmptyRoutine => write!(f, "routine has no entry block"),
            VmError::StepLimitExceeded { limit } => {
                write!(f, "execution exceeded the step limit of {}", limit)
            }
        }
    }
}

impl std::error::Error for VmError {}

impl GsmErrorExt for VmError {
    fn level(&self) -> Level {
        match self {
            VmError::StepLimitExceeded { .. } | VmError::DivisionByZero { .. } | VmError::DivisionOverflow { .. } => {
                Level::Error
            }
            _ => Level::Critical,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "gsm.vm.exec".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
