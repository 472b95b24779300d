//! AST to IR lowering.
//!
//! One depth-first walk over the tree emits a single routine
//! `i32 main(i32 argc, ptr argv)` whose blocks are created by the control
//! constructs. Lowering either yields a complete module or an error; there
//! is no partial output.

pub mod err;
pub mod lower_expr;
pub mod lower_stmt;
pub mod lowering_context;
pub mod routine_builder;
pub mod symbol_table;

pub use err::{LoweringError, LoweringErrorKind};
pub use lowering_context::LoweringContext;
pub use routine_builder::RoutineBuilder;
pub use symbol_table::SymbolTable;

use log::debug;

use crate::ast::Ast;
use crate::ir::module::{ExternDecl, IrModule};
use crate::ir::value::{IrType, Operand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowerOptions {
    pub module_name: String,
    pub entry_name: String,
    /// External `void (i32)` routine called after every assignment.
    pub sink_name: String,
    /// Optional cap on `x ^ n`; larger literal exponents fail with
    /// `UnsupportedExponent` instead of being unrolled.
    pub max_exponent: Option<u32>,
}

impl Default for LowerOptions {
    fn default() -> Self {
        LowerOptions {
            module_name: "gsm.expr".to_string(),
            entry_name: "main".to_string(),
            sink_name: "gsm_write".to_string(),
            max_exponent: None,
        }
    }
}

/// Lower `ast` and also return the final symbol table.
pub fn lower_with_context(ast: &Ast, opts: &LowerOptions) -> Result<(IrModule, SymbolTable), LoweringError> {
    let mut ctx = LoweringContext::new(ast, &opts.sink_name);
    ctx.max_exponent = opts.max_exponent;

    let entry = ctx.builder.create_block("entry");
    ctx.builder.set_insert_point(entry);

    lower_stmt::lower_goal(ast.goal(), &mut ctx)?;
    ctx.builder.ret(Operand::Imm(0))?;

    let (symbols, builder) = ctx.into_parts();
    let routine = builder.finish(
        &opts.entry_name,
        vec![("argc".to_string(), IrType::I32), ("argv".to_string(), IrType::Ptr)],
        IrType::I32,
    )?;
    debug!(
        "lowered {} statement(s) into {} block(s), {} slot(s)",
        ast.statements().len(),
        routine.blocks.len(),
        routine.slots.len()
    );

    let module = IrModule {
        name: opts.module_name.clone(),
        externs: vec![ExternDecl {
            name: opts.sink_name.clone(),
            params: vec![IrType::I32],
            ret: IrType::Void,
        }],
        routine,
    };
    Ok((module, symbols))
}
