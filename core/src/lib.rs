pub mod ast;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod location;
pub mod script;
pub mod vm;

pub use ast::{Ast, generate_ast_from_source};
pub use error::{GsmErrorExt, Level, generate_error_report};
pub use ir::{IrModule, LowerOptions, SymbolTable, lower_ast_to_ir};
pub use location::{Location, Span};
pub use script::Script;
pub use vm::{StdoutSink, ValueSink, VmError, VmOptions, run_module};

/// Everything one compilation of a script produces.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub ast: Ast,
    pub module: IrModule,
    pub symbols: SymbolTable,
}

/// Lex, parse and lower `source`.
pub fn compile_source(source: &Script, opts: &LowerOptions) -> Result<Compilation, Box<dyn GsmErrorExt>> {
    let ast = ast::generate_ast_from_source(source)?;
    let (module, symbols) =
        ir::lower::lower_with_context(&ast, opts).map_err(|e| Box::new(e) as Box<dyn GsmErrorExt>)?;
    Ok(Compilation { ast, module, symbols })
}
