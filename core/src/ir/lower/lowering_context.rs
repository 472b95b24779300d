//! State threaded through one lowering run.
//!
//! A `LoweringContext` lives exactly as long as the lowering of one [`Ast`];
//! it reads the tree, never mutates it, and owns everything it produces.

use crate::ast::{Ast, ExprId, ExprNode};
use crate::ir::value::{Operand, SlotId};
use crate::location::Location;

use super::err::{LoweringError, LoweringErrorKind};
use super::routine_builder::RoutineBuilder;
use super::symbol_table::SymbolTable;

pub struct LoweringContext<'a> {
    pub ast: &'a Ast,
    pub symbols: SymbolTable,
    pub builder: RoutineBuilder,
    /// Name of the external routine every assignment reports its value to.
    pub sink: String,
    /// Largest literal exponent `^` may unroll; `None` accepts any `u32`.
    pub max_exponent: Option<u32>,
    current: Option<Operand>,
}

impl<'a> LoweringContext<'a> {
    pub fn new(ast: &'a Ast, sink: &str) -> Self {
        LoweringContext {
            ast,
            symbols: SymbolTable::new(),
            builder: RoutineBuilder::new(),
            sink: sink.to_string(),
            max_exponent: None,
            current: None,
        }
    }

    pub fn into_parts(self) -> (SymbolTable, RoutineBuilder) {
        (self.symbols, self.builder)
    }

    /// The operand produced by the most recently lowered expression.
    pub fn current_value(&self) -> Option<Operand> {
        self.current
    }

    pub fn set_current(&mut self, value: Operand) {
        self.current = Some(value);
    }

    pub fn expr(&self, id: ExprId) -> Result<&'a ExprNode, LoweringError> {
        self.ast.expr(id).ok_or_else(|| {
            LoweringError::new(
                LoweringErrorKind::UnknownExpression { index: id.index() },
                "gsm.ir.lower.expr",
                None,
            )
        })
    }

    pub fn resolve(&self, name: &str, location: Option<&Location>, issuer: &str) -> Result<SlotId, LoweringError> {
        self.symbols.lookup(name).ok_or_else(|| {
            LoweringError::new(
                LoweringErrorKind::UndeclaredName { name: name.to_string() },
                issuer,
                location.cloned(),
            )
        })
    }
}
