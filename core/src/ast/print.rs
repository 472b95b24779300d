//! Pretty-printer: renders an [`Ast`] back to GSM source.
//!
//! Nested binary operations are fully parenthesised so the output reparses to
//! the same tree regardless of precedence.

use std::fmt;

use super::kind::ExprKind;
use super::node::{Assignment, Ast, Block, ExprId, Stmt};

const INDENT: &str = "    ";

impl Ast {
    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>, id: ExprId, nested: bool) -> fmt::Result {
        let Some(node) = self.expr(id) else {
            return write!(f, "<expr #{}>", id.index());
        };
        match &node.kind {
            ExprKind::Factor(factor) => write!(f, "{}", factor.text),
            ExprKind::BinaryOp { op, left, right } => {
                if nested {
                    write!(f, "(")?;
                }
                self.fmt_expr(f, *left, true)?;
                write!(f, " {} ", op)?;
                self.fmt_expr(f, *right, true)?;
                if nested {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }

    fn fmt_assignment(&self, f: &mut fmt::Formatter<'_>, assignment: &Assignment) -> fmt::Result {
        write!(f, "{} = ", assignment.name())?;
        self.fmt_expr(f, assignment.value(), false)
    }

    fn fmt_block(&self, f: &mut fmt::Formatter<'_>, block: &Block) -> fmt::Result {
        writeln!(f, "begin")?;
        for assignment in block.assignments() {
            write!(f, "{}", INDENT)?;
            self.fmt_assignment(f, assignment)?;
            writeln!(f)?;
        }
        write!(f, "end")
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in self.statements() {
            match stmt {
                Stmt::Declaration(decl) => {
                    write!(f, "int {}", decl.names().join(", "))?;
                    for (i, init) in decl.initializers().iter().enumerate() {
                        write!(f, "{}", if i == 0 { " = " } else { ", " })?;
                        self.fmt_expr(f, *init, false)?;
                    }
                    writeln!(f, ";")?;
                }
                Stmt::Assignment(assignment) => {
                    self.fmt_assignment(f, assignment)?;
                    writeln!(f, ";")?;
                }
                Stmt::Condition(cond) => {
                    for (i, (guard, body)) in cond.guards().iter().zip(cond.bodies()).enumerate() {
                        write!(f, "{} ", if i == 0 { "if" } else { "elif" })?;
                        self.fmt_expr(f, *guard, false)?;
                        write!(f, ": ")?;
                        self.fmt_block(f, body)?;
                        writeln!(f)?;
                    }
                    if let Some(body) = cond.else_body() {
                        write!(f, "else: ")?;
                        self.fmt_block(f, body)?;
                        writeln!(f)?;
                    }
                }
                Stmt::Loop(lp) => {
                    write!(f, "loop ")?;
                    self.fmt_expr(f, lp.condition(), false)?;
                    write!(f, ": ")?;
                    self.fmt_block(f, lp.body())?;
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}
