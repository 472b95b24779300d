//! Operator and leaf kinds shared by the parser, the pretty-printer and
//! lowering.

use serde::Serialize;

use super::node::ExprId;

/// Binary operators, in the order the precedence table lists them
/// (loosest first within each family).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Or,  // or
    And, // and
    Eq,  // ==
    Ne,  // !=
    Ge,  // >=
    Le,  // <=
    Gt,  // >
    Lt,  // <
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
    Pow, // ^
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Or => "or",
            BinaryOperator::And => "and",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lt => "<",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Pow => "^",
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FactorKind {
    Identifier,
    Number,
}

/// A leaf: a named storage reference or a decimal literal, kept as source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Factor {
    pub kind: FactorKind,
    pub text: String,
}

impl Factor {
    pub fn identifier(name: impl Into<String>) -> Self {
        Factor { kind: FactorKind::Identifier, text: name.into() }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Factor { kind: FactorKind::Number, text: text.into() }
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == FactorKind::Identifier
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExprKind {
    Factor(Factor),
    BinaryOp {
        op: BinaryOperator,
        left: ExprId,
        right: ExprId,
    },
}

impl std::fmt::Display for ExprKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprKind::Factor(factor) => match factor.kind {
                FactorKind::Identifier => write!(f, "Identifier"),
                FactorKind::Number => write!(f, "Number"),
            },
            ExprKind::BinaryOp { .. } => write!(f, "BinaryOp"),
        }
    }
}
