//! Interpreter loop over a lowered [`IrModule`].
//!
//! Registers and slots live in flat tables indexed by their ids. Execution
//! starts at the entry block, runs its instructions, then follows the
//! terminator; a `ret` ends the run with its value.

use std::collections::HashMap;

use log::trace;

use crate::ir::module::{BasicBlock, IrModule};
use crate::ir::op::{BinOp, IROp, Terminator};
use crate::ir::value::{BlockId, Operand, Reg, SlotId};

use super::err::VmError;
use super::sink::ValueSink;
use super::VmOptions;

pub struct ExecState<'m> {
    pub module: &'m IrModule,
    pub regs: HashMap<Reg, i32>,
    /// `None` until the slot's first store.
    pub slots: HashMap<SlotId, Option<i32>>,
    pub steps: usize,
    pub step_limit: Option<usize>,
    pub trace: bool,
}

impl<'m> ExecState<'m> {
    pub fn new(module: &'m IrModule, opts: &VmOptions) -> Self {
        ExecState {
            module,
            regs: HashMap::new(),
            slots: HashMap::new(),
            steps: 0,
            step_limit: opts.step_limit,
            trace: opts.trace,
        }
    }

    fn tick(&mut self) -> Result<(), VmError> {
        self.steps += 1;
        match self.step_limit {
            Some(limit) if self.steps > limit => Err(VmError::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn value(&self, operand: Operand) -> Result<i32, VmError> {
        match operand {
            Operand::Imm(v) => Ok(v),
            Operand::Reg(r) => self
                .regs
                .get(&r)
                .copied()
                .ok_or(VmError::UninitialisedRegister { reg: r.0 }),
        }
    }

    fn slot_label(&self, slot: SlotId) -> String {
        self.module
            .routine
            .slot_name(slot)
            .map(str::to_string)
            .unwrap_or_else(|| slot.to_string())
    }

    fn block(&self, id: BlockId) -> Result<&'m BasicBlock, VmError> {
        let module = self.module;
        module.routine.block(id).ok_or(VmError::UnknownBlock { block: id.0 })
    }

    pub fn run(&mut self, sink: &mut dyn ValueSink) -> Result<i32, VmError> {
        let module = self.module;
        let mut block = module.routine.entry().ok_or(VmError::EmptyRoutine)?;
        loop {
            for op in &block.ops {
                self.tick()?;
                if self.trace {
                    trace!("{}: {}", block.name, op);
                }
                self.step(op, block, sink)?;
            }

            self.tick()?;
            let terminator = block
                .terminator
                .as_ref()
                .ok_or_else(|| VmError::MissingTerminator { block: block.name.clone() })?;
            let next = match terminator {
                Terminator::Br { target } => *target,
                Terminator::CondBr { cond, then_block, else_block } => {
                    if self.value(*cond)? != 0 {
                        *then_block
                    } else {
                        *else_block
                    }
                }
                Terminator::Ret { value } => {
                    let v = self.value(*value)?;
                    if self.trace {
                        trace!("{}: ret {}", block.name, v);
                    }
                    return Ok(v);
                }
            };
            if self.trace {
                trace!("{}: -> {}", block.name, module.routine.block_name(next));
            }
            block = self.block(next)?;
        }
    }

    fn step(&mut self, op: &IROp, block: &BasicBlock, sink: &mut dyn ValueSink) -> Result<(), VmError> {
        match op {
            IROp::Alloca { slot } => {
                self.slots.insert(*slot, None);
            }
            IROp::Load { dest, slot } => {
                let value = match self.slots.get(slot) {
                    Some(Some(v)) => *v,
                    Some(None) => return Err(VmError::UninitialisedSlot { slot: self.slot_label(*slot) }),
                    None => return Err(VmError::UnknownSlot { slot: slot.0 }),
                };
                self.regs.insert(*dest, value);
            }
            IROp::Store { src, slot } => {
                let value = self.value(*src)?;
                match self.slots.get_mut(slot) {
                    Some(cell) => *cell = Some(value),
                    None => return Err(VmError::UnknownSlot { slot: slot.0 }),
                }
            }
            IROp::Binary { dest, op, lhs, rhs } => {
                let l = self.value(*lhs)?;
                let r = self.value(*rhs)?;
                let value = apply(*op, l, r, &block.name)?;
                self.regs.insert(*dest, value);
            }
            IROp::ICmp { dest, pred, lhs, rhs } => {
                let l = self.value(*lhs)?;
                let r = self.value(*rhs)?;
                self.regs.insert(*dest, i32::from(pred.holds(l, r)));
            }
            IROp::Call { callee, args } => {
                let module = self.module;
                let decl = module
                    .get_extern(callee)
                    .ok_or_else(|| VmError::UnknownCallee { name: callee.clone() })?;
                if decl.params.len() != args.len() {
                    return Err(VmError::BadArity {
                        name: callee.clone(),
                        expected: decl.params.len(),
                        found: args.len(),
                    });
                }
                for arg in args {
                    let v = self.value(*arg)?;
                    sink.write(v);
                }
            }
        }
        Ok(())
    }
}

/// Two's-complement arithmetic; only division can fail.
pub fn apply(op: BinOp, l: i32, r: i32, block: &str) -> Result<i32, VmError> {
    let checked = |f: fn(i32, i32) -> Option<i32>| {
        if r == 0 {
            Err(VmError::DivisionByZero { block: block.to_string() })
        } else {
            f(l, r).ok_or_else(|| VmError::DivisionOverflow { block: block.to_string() })
        }
    };
    match op {
        BinOp::Add => Ok(l.wrapping_add(r)),
        BinOp::Sub => Ok(l.wrapping_sub(r)),
        BinOp::Mul => Ok(l.wrapping_mul(r)),
        BinOp::SDiv => checked(i32::checked_div),
        BinOp::SRem => checked(i32::checked_rem),
        BinOp::Or => Ok(l | r),
        BinOp::And => Ok(l & r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(apply(BinOp::Add, i32::MAX, 1, "entry"), Ok(i32::MIN));
        assert_eq!(apply(BinOp::Mul, 1 << 16, 1 << 16, "entry"), Ok(0));
    }

    #[test]
    fn division_edges_are_errors() {
        assert!(matches!(apply(BinOp::SDiv, 1, 0, "b"), Err(VmError::DivisionByZero { .. })));
        assert!(matches!(apply(BinOp::SRem, 1, 0, "b"), Err(VmError::DivisionByZero { .. })));
        assert!(matches!(apply(BinOp::SDiv, i32::MIN, -1, "b"), Err(VmError::DivisionOverflow { .. })));
        assert_eq!(apply(BinOp::SRem, -7, 2, "b"), Ok(-1));
        assert_eq!(apply(BinOp::SDiv, -7, 2, "b"), Ok(-3));
    }

    #[test]
    fn logical_operators_are_bitwise() {
        assert_eq!(apply(BinOp::Or, 0b1010, 0b0101, "b"), Ok(0b1111));
        assert_eq!(apply(BinOp::And, 6, 3, "b"), Ok(2));
    }
}
