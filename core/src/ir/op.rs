use serde::Serialize;

use super::value::{BlockId, Operand, Reg, SlotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
    Or,
    And,
}

impl BinOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
            BinOp::SRem => "srem",
            BinOp::Or => "or",
            BinOp::And => "and",
        }
    }
}

/// Signed integer comparison predicates; results are 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CmpPredicate {
    Eq,
    Ne,
    Sge,
    Sle,
    Sgt,
    Slt,
}

impl CmpPredicate {
    pub fn mnemonic(self) -> &'static str {
        match self {
            CmpPredicate::Eq => "eq",
            CmpPredicate::Ne => "ne",
            CmpPredicate::Sge => "sge",
            CmpPredicate::Sle => "sle",
            CmpPredicate::Sgt => "sgt",
            CmpPredicate::Slt => "slt",
        }
    }

    pub fn holds(self, lhs: i32, rhs: i32) -> bool {
        match self {
            CmpPredicate::Eq => lhs == rhs,
            CmpPredicate::Ne => lhs != rhs,
            CmpPredicate::Sge => lhs >= rhs,
            CmpPredicate::Sle => lhs <= rhs,
            CmpPredicate::Sgt => lhs > rhs,
            CmpPredicate::Slt => lhs < rhs,
        }
    }
}

/// Non-terminating instruction inside a basic block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IROp {
    Alloca { slot: SlotId },
    Load { dest: Reg, slot: SlotId },
    Store { src: Operand, slot: SlotId },
    Binary { dest: Reg, op: BinOp, lhs: Operand, rhs: Operand },
    ICmp { dest: Reg, pred: CmpPredicate, lhs: Operand, rhs: Operand },
    /// Call to an external routine that returns nothing.
    Call { callee: String, args: Vec<Operand> },
}

/// The single control-transfer instruction that ends every basic block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Terminator {
    Br { target: BlockId },
    /// Branch to `then_block` when `cond` is non-zero, else to `else_block`.
    CondBr { cond: Operand, then_block: BlockId, else_block: BlockId },
    Ret { value: Operand },
}

impl Terminator {
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Br { target } => vec![*target],
            Terminator::CondBr { then_block, else_block, .. } => vec![*then_block, *else_block],
            Terminator::Ret { .. } => Vec::new(),
        }
    }
}

impl std::fmt::Display for IROp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IROp::Alloca { slot } => write!(f, "{} = alloca i32", slot),
            IROp::Load { dest, slot } => write!(f, "{} = load i32, {}", dest, slot),
            IROp::Store { src, slot } => write!(f, "store i32 {}, {}", src, slot),
            IROp::Binary { dest, op, lhs, rhs } => {
                write!(f, "{} = {} i32 {}, {}", dest, op.mnemonic(), lhs, rhs)
            }
            IROp::ICmp { dest, pred, lhs, rhs } => {
                write!(f, "{} = icmp {} i32 {}, {}", dest, pred.mnemonic(), lhs, rhs)
            }
            IROp::Call { callee, args } => {
                write!(f, "call void @{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "i32 {}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
