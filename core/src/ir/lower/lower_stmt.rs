//! Statement lowering: declarations, assignments and the two control
//! constructs, which are the only places new basic blocks are created.

use log::{debug, warn};

use crate::ast::{Assignment, Block, Condition, Declaration, Goal, Loop, Stmt};
use crate::ir::value::Operand;

use super::err::{LoweringError, LoweringErrorKind};
use super::lower_expr::lower_expr;
use super::lowering_context::LoweringContext;

pub fn lower_goal(goal: &Goal, ctx: &mut LoweringContext<'_>) -> Result<(), LoweringError> {
    for stmt in goal.statements() {
        lower_statement(stmt, ctx)?;
    }
    Ok(())
}

pub fn lower_statement(stmt: &Stmt, ctx: &mut LoweringContext<'_>) -> Result<(), LoweringError> {
    match stmt {
        Stmt::Declaration(decl) => lower_declaration(decl, ctx),
        Stmt::Assignment(assign) => lower_assignment(assign, ctx),
        Stmt::Condition(cond) => lower_condition(cond, ctx),
        Stmt::Loop(lp) => lower_loop(lp, ctx),
    }
}

/// Store the value, then hand it to the sink.
pub fn lower_assignment(assign: &Assignment, ctx: &mut LoweringContext<'_>) -> Result<(), LoweringError> {
    let slot = ctx.resolve(assign.name(), assign.location(), "gsm.ir.lower.stmt.assignment")?;
    let value = lower_expr(assign.value(), ctx)?;
    ctx.builder.store(value, slot)?;
    let sink = ctx.sink.clone();
    ctx.builder.call(&sink, vec![value])
}

pub fn lower_declaration(decl: &Declaration, ctx: &mut LoweringContext<'_>) -> Result<(), LoweringError> {
    for (index, name) in decl.names().iter().enumerate() {
        let value = match decl.initializer_for(index) {
            Some(init) => lower_expr(init, ctx)?,
            None => Operand::Imm(0),
        };
        let slot = ctx.builder.alloca(name)?;
        if let Some(previous) = ctx.symbols.declare(name, slot) {
            warn!("'{}' redeclared; {} replaces {}", name, slot, previous);
        }
        ctx.builder.store(value, slot)?;
    }
    Ok(())
}

pub fn lower_block(block: &Block, ctx: &mut LoweringContext<'_>) -> Result<(), LoweringError> {
    for assign in block.assignments() {
        lower_assignment(assign, ctx)?;
    }
    Ok(())
}

/// ```text
///   br cond
/// cond:  br_if guard, body, after
/// body:  ...; br cond
/// after: (cursor continues here)
/// ```
pub fn lower_loop(lp: &Loop, ctx: &mut LoweringContext<'_>) -> Result<(), LoweringError> {
    let cond = ctx.builder.create_block("loop.cond");
    let body = ctx.builder.create_block("loop.body");
    let after = ctx.builder.create_block("loop.after");

    ctx.builder.br(cond)?;

    ctx.builder.set_insert_point(cond);
    let guard = lower_expr(lp.condition(), ctx)?;
    ctx.builder.cond_br(guard, body, after)?;

    ctx.builder.set_insert_point(body);
    lower_block(lp.body(), ctx)?;
    ctx.builder.br(cond)?;

    ctx.builder.set_insert_point(after);
    Ok(())
}

/// Guards are tested in order; a false guard falls through to the next
/// guard's block, then to the else body, then to the shared exit block.
pub fn lower_condition(cond: &Condition, ctx: &mut LoweringContext<'_>) -> Result<(), LoweringError> {
    let guards = cond.guards();
    let bodies = cond.bodies();
    if guards.is_empty() || (bodies.len() != guards.len() && bodies.len() != guards.len() + 1) {
        return Err(LoweringError::new(
            LoweringErrorKind::BodyCountMismatch { guards: guards.len(), bodies: bodies.len() },
            "gsm.ir.lower.stmt.condition",
            cond.location().cloned(),
        ));
    }

    let mut arms = Vec::with_capacity(guards.len());
    for _ in guards {
        let test = ctx.builder.create_block("if.cond");
        let body = ctx.builder.create_block("if.body");
        arms.push((test, body));
    }
    let else_block = cond.else_body().map(|_| ctx.builder.create_block("if.else"));
    let after = ctx.builder.create_block("if.after");

    ctx.builder.br(arms[0].0)?;

    for (i, (guard, &(test, body))) in guards.iter().zip(arms.iter()).enumerate() {
        let on_false = match arms.get(i + 1) {
            Some(&(next_test, _)) => next_test,
            None => else_block.unwrap_or(after),
        };

        ctx.builder.set_insert_point(test);
        let value = lower_expr(*guard, ctx)?;
        ctx.builder.cond_br(value, body, on_false)?;

        ctx.builder.set_insert_point(body);
        lower_block(&bodies[i], ctx)?;
        ctx.builder.br(after)?;
    }

    if let (Some(block), Some(body)) = (else_block, cond.else_body()) {
        ctx.builder.set_insert_point(block);
        lower_block(body, ctx)?;
        ctx.builder.br(after)?;
    }

    ctx.builder.set_insert_point(after);
    debug!("lowered condition with {} guard(s)", guards.len());
    Ok(())
}
