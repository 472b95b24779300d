pub mod lower;
pub mod module;
pub mod op;
pub mod value;

pub use self::lower::{LowerOptions, LoweringError, LoweringErrorKind, SymbolTable};
pub use self::module::{BasicBlock, ExternDecl, IrModule, Routine, SlotInfo};
pub use self::op::{BinOp, CmpPredicate, IROp, Terminator};
pub use self::value::{BlockId, IrType, Operand, Reg, SlotId};

use crate::ast::Ast;

pub fn lower_ast_to_ir(ast: &Ast, opts: &LowerOptions) -> Result<IrModule, LoweringError> {
    lower::lower_with_context(ast, opts).map(|(module, _)| module)
}
