//! Expression lowering.
//!
//! Every expression lowers to exactly one [`Operand`]: literals become
//! immediates, identifiers a `load`, binary operators one instruction over
//! their already-lowered operands (left first). The result is also recorded
//! as the context's current value.

use crate::ast::{BinaryOperator, ExprId, ExprKind, Factor, FactorKind};
use crate::ir::op::{BinOp, CmpPredicate};
use crate::ir::value::Operand;
use crate::location::Location;

use super::err::{LoweringError, LoweringErrorKind};
use super::lowering_context::LoweringContext;

pub fn lower_expr(id: ExprId, ctx: &mut LoweringContext<'_>) -> Result<Operand, LoweringError> {
    let node = ctx.expr(id)?;
    let location = node.get_location();

    let value = match node.get_kind() {
        ExprKind::Factor(factor) => lower_factor(factor, location, ctx)?,
        ExprKind::BinaryOp { op: BinaryOperator::Pow, left, right } => {
            lower_power(*left, *right, location, ctx)?
        }
        ExprKind::BinaryOp { op, left, right } => {
            let lhs = lower_expr(*left, ctx)?;
            let rhs = lower_expr(*right, ctx)?;
            match arithmetic(*op) {
                Some(bin) => ctx.builder.binary(bin, lhs, rhs)?,
                None => match comparison(*op) {
                    Some(pred) => ctx.builder.icmp(pred, lhs, rhs)?,
                    None => unreachable_operator(*op)?,
                },
            }
        }
    };

    ctx.set_current(value);
    Ok(value)
}

fn lower_factor(
    factor: &Factor,
    location: Option<&Location>,
    ctx: &mut LoweringContext<'_>,
) -> Result<Operand, LoweringError> {
    match factor.kind {
        FactorKind::Identifier => {
            let slot = ctx.resolve(&factor.text, location, "gsm.ir.lower.expr.factor")?;
            ctx.builder.load(slot)
        }
        FactorKind::Number => parse_literal(&factor.text, location).map(Operand::Imm),
    }
}

fn parse_literal(text: &str, location: Option<&Location>) -> Result<i32, LoweringError> {
    text.parse::<i32>().map_err(|_| {
        LoweringError::new(
            LoweringErrorKind::InvalidLiteral { text: text.to_string() },
            "gsm.ir.lower.expr.factor",
            location.cloned(),
        )
    })
}

/// `x ^ n` unrolls into `n - 1` multiplications of the base; `x ^ 0` is 1.
fn lower_power(
    base: ExprId,
    exponent: ExprId,
    location: Option<&Location>,
    ctx: &mut LoweringContext<'_>,
) -> Result<Operand, LoweringError> {
    let lhs = lower_expr(base, ctx)?;
    let n = exponent_of(exponent, location, ctx)?;
    if n == 0 {
        return Ok(Operand::Imm(1));
    }

    let mut acc = lhs;
    for _ in 1..n {
        acc = ctx.builder.binary(BinOp::Mul, acc, lhs)?;
    }
    Ok(acc)
}

fn exponent_of(
    exponent: ExprId,
    location: Option<&Location>,
    ctx: &LoweringContext<'_>,
) -> Result<u32, LoweringError> {
    let unsupported = |reason: String| {
        LoweringError::new(
            LoweringErrorKind::UnsupportedExponent { reason },
            "gsm.ir.lower.expr.pow",
            location.cloned(),
        )
    };

    let node = ctx.expr(exponent)?;
    let text = match node.get_kind() {
        ExprKind::Factor(Factor { kind: FactorKind::Number, text }) => text,
        ExprKind::Factor(Factor { text, .. }) => {
            return Err(unsupported(format!("exponent '{}' is not a literal", text)));
        }
        ExprKind::BinaryOp { op, .. } => {
            return Err(unsupported(format!("exponent is a '{}' expression, not a literal", op)));
        }
    };

    let n = text
        .parse::<u32>()
        .map_err(|_| unsupported(format!("'{}' is not a valid exponent", text)))?;
    match ctx.max_exponent {
        Some(limit) if n > limit => Err(unsupported(format!(
            "exponent {} exceeds the configured limit of {}",
            n, limit
        ))),
        _ => Ok(n),
    }
}

fn arithmetic(op: BinaryOperator) -> Option<BinOp> {
    match op {
        BinaryOperator::Add => Some(BinOp::Add),
        BinaryOperator::Sub => Some(BinOp::Sub),
        BinaryOperator::Mul => Some(BinOp::Mul),
        BinaryOperator::Div => Some(BinOp::SDiv),
        BinaryOperator::Mod => Some(BinOp::SRem),
        BinaryOperator::Or => Some(BinOp::Or),
        BinaryOperator::And => Some(BinOp::And),
        _ => None,
    }
}

fn comparison(op: BinaryOperator) -> Option<CmpPredicate> {
    match op {
        BinaryOperator::Eq => Some(CmpPredicate::Eq),
        BinaryOperator::Ne => Some(CmpPredicate::Ne),
        BinaryOperator::Ge => Some(CmpPredicate::Sge),
        BinaryOperator::Le => Some(CmpPredicate::Sle),
        BinaryOperator::Gt => Some(CmpPredicate::Sgt),
        BinaryOperator::Lt => Some(CmpPredicate::Slt),
        _ => None,
    }
}

// Only `Pow` reaches here and it is matched before the generic arm.
fn unreachable_operator(op: BinaryOperator) -> Result<Operand, LoweringError> {
    Err(LoweringError::malformed(format!("operator '{}' has no direct lowering", op)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ast;
    use crate::ir::value::Reg;

    #[test]
    fn result_becomes_the_current_value() {
        let mut ast = Ast::new();
        let one = ast.factor(Factor::number("1"), None);
        let two = ast.factor(Factor::number("2"), None);
        let sum = ast.binary(BinaryOperator::Add, one, two, None).unwrap();

        let mut ctx = LoweringContext::new(&ast, "gsm_write");
        let entry = ctx.builder.create_block("entry");
        ctx.builder.set_insert_point(entry);

        assert_eq!(lower_expr(one, &mut ctx).unwrap(), Operand::Imm(1));
        assert_eq!(ctx.current_value(), Some(Operand::Imm(1)));
        assert_eq!(lower_expr(sum, &mut ctx).unwrap(), Operand::Reg(Reg(0)));
        assert_eq!(ctx.current_value(), Some(Operand::Reg(Reg(0))));
    }

    #[test]
    fn identifiers_must_be_declared() {
        let mut ast = Ast::new();
        let ghost = ast.factor(Factor::identifier("ghost"), None);
        let mut ctx = LoweringContext::new(&ast, "gsm_write");
        let err = lower_expr(ghost, &mut ctx).unwrap_err();
        assert_eq!(err.kind(), &LoweringErrorKind::UndeclaredName { name: "ghost".to_string() });
        assert_eq!(ctx.current_value(), None);
    }
}
