//! GSM syntax tree and the parser that builds it.

pub mod err;
pub mod expr;
pub mod kind;
pub mod node;
pub mod parser;
pub mod print;
pub mod stmt;

pub use err::{AstError, ParseError, SyntaxError};
pub use kind::{BinaryOperator, ExprKind, Factor, FactorKind};
pub use node::{Assignment, Ast, Block, Condition, Declaration, ExprId, ExprNode, Goal, Loop, Stmt};
pub use parser::Parser;

use crate::error::GsmErrorExt;
use crate::lexer::Lexer;
use crate::script::Script;

/// Lex and parse a whole script.
pub fn generate_ast_from_source(script: &Script) -> Result<Ast, Box<dyn GsmErrorExt>> {
    let lexer = Lexer::new(script).map_err(|e| Box::new(e) as Box<dyn GsmErrorExt>)?;
    let mut parser = Parser::new(lexer);
    parser.parse().map_err(|e| Box::new(e) as Box<dyn GsmErrorExt>)
}
