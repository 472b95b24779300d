//! Block registry plus insertion cursor for the routine being lowered.
//!
//! Instructions are always appended to the block under the cursor. A block
//! accepts no further instructions once it has a terminator; attempting to
//! emit into one is reported as [`LoweringErrorKind::MalformedBlock`].
//!
//! [`LoweringErrorKind::MalformedBlock`]: super::err::LoweringErrorKind::MalformedBlock

use std::collections::HashMap;

use log::debug;

use crate::ir::module::{BasicBlock, Routine, SlotInfo};
use crate::ir::op::{BinOp, CmpPredicate, IROp, Terminator};
use crate::ir::value::{BlockId, IrType, Operand, Reg, SlotId};

use super::err::LoweringError;

#[derive(Debug, Default)]
pub struct RoutineBuilder {
    blocks: Vec<BasicBlock>,
    cursor: Option<BlockId>,
    slots: Vec<SlotInfo>,
    next_reg: usize,
    name_counts: HashMap<String, usize>,
}

impl RoutineBuilder {
    pub fn new() -> Self {
        RoutineBuilder::default()
    }

    /// Append a new, empty block. Repeated names get a numeric suffix
    /// (`loop.cond`, `loop.cond1`, ...).
    pub fn create_block(&mut self, name: &str) -> BlockId {
        let count = self.name_counts.entry(name.to_string()).or_insert(0);
        let unique = if *count == 0 { name.to_string() } else { format!("{}{}", name, count) };
        *count += 1;

        let id = BlockId(self.blocks.len());
        self.blocks.push(BasicBlock::new(id, unique));
        id
    }

    pub fn set_insert_point(&mut self, block: BlockId) {
        self.cursor = Some(block);
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.0)
    }

    pub fn alloc_reg(&mut self) -> Reg {
        let r = Reg(self.next_reg);
        self.next_reg += 1;
        r
    }

    fn current_mut(&mut self) -> Result<&mut BasicBlock, LoweringError> {
        let id = self
            .cursor
            .ok_or_else(|| LoweringError::malformed("no insertion point set"))?;
        let block = self
            .blocks
            .get_mut(id.0)
            .ok_or_else(|| LoweringError::malformed(format!("insertion point {} does not exist", id.0)))?;
        if block.is_terminated() {
            return Err(LoweringError::malformed(format!(
                "block '{}' already has a terminator",
                block.name
            )));
        }
        Ok(block)
    }

    pub fn emit_op(&mut self, op: IROp) -> Result<(), LoweringError> {
        self.current_mut()?.ops.push(op);
        Ok(())
    }

    pub fn terminate(&mut self, terminator: Terminator) -> Result<(), LoweringError> {
        if let Some(target) = terminator.successors().into_iter().find(|t| t.0 >= self.blocks.len()) {
            return Err(LoweringError::malformed(format!("branch to missing block {}", target.0)));
        }
        self.current_mut()?.terminator = Some(terminator);
        Ok(())
    }

    pub fn alloca(&mut self, name: &str) -> Result<SlotId, LoweringError> {
        let slot = SlotId(self.slots.len());
        self.emit_op(IROp::Alloca { slot })?;
        self.slots.push(SlotInfo { id: slot, name: name.to_string() });
        Ok(slot)
    }

    pub fn load(&mut self, slot: SlotId) -> Result<Operand, LoweringError> {
        let dest = self.alloc_reg();
        self.emit_op(IROp::Load { dest, slot })?;
        Ok(Operand::Reg(dest))
    }

    pub fn store(&mut self, src: Operand, slot: SlotId) -> Result<(), LoweringError> {
        self.emit_op(IROp::Store { src, slot })
    }

    pub fn binary(&mut self, op: BinOp, lhs: Operand, rhs: Operand) -> Result<Operand, LoweringError> {
        let dest = self.alloc_reg();
        self.emit_op(IROp::Binary { dest, op, lhs, rhs })?;
        Ok(Operand::Reg(dest))
    }

    pub fn icmp(&mut self, pred: CmpPredicate, lhs: Operand, rhs: Operand) -> Result<Operand, LoweringError> {
        let dest = self.alloc_reg();
        self.emit_op(IROp::ICmp { dest, pred, lhs, rhs })?;
        Ok(Operand::Reg(dest))
    }

    pub fn call(&mut self, callee: &str, args: Vec<Operand>) -> Result<(), LoweringError> {
        self.emit_op(IROp::Call { callee: callee.to_string(), args })
    }

    pub fn br(&mut self, target: BlockId) -> Result<(), LoweringError> {
        self.terminate(Terminator::Br { target })
    }

    pub fn cond_br(&mut self, cond: Operand, then_block: BlockId, else_block: BlockId) -> Result<(), LoweringError> {
        self.terminate(Terminator::CondBr { cond, then_block, else_block })
    }

    pub fn ret(&mut self, value: Operand) -> Result<(), LoweringError> {
        self.terminate(Terminator::Ret { value })
    }

    /// Seal the routine. Every block must end in a terminator.
    pub fn finish(
        self,
        name: &str,
        params: Vec<(String, IrType)>,
        ret: IrType,
    ) -> Result<Routine, LoweringError> {
        if let Some(open) = self.blocks.iter().find(|b| !b.is_terminated()) {
            return Err(LoweringError::malformed(format!(
                "block '{}' has no terminator",
                open.name
            )));
        }
        debug!(
            "finished routine {} with {} block(s), {} slot(s), {} register(s)",
            name,
            self.blocks.len(),
            self.slots.len(),
            self.next_reg
        );
        Ok(Routine {
            name: name.to_string(),
            params,
            ret,
            slots: self.slots,
            blocks: self.blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::lower::err::LoweringErrorKind;

    #[test]
    fn duplicate_block_names_get_suffixes() {
        let mut b = RoutineBuilder::new();
        let first = b.create_block("loop.cond");
        let second = b.create_block("loop.cond");
        let third = b.create_block("loop.cond");
        assert_eq!(b.block(first).unwrap().name, "loop.cond");
        assert_eq!(b.block(second).unwrap().name, "loop.cond1");
        assert_eq!(b.block(third).unwrap().name, "loop.cond2");
    }

    #[test]
    fn emitting_after_terminator_is_rejected() {
        let mut b = RoutineBuilder::new();
        let entry = b.create_block("entry");
        b.set_insert_point(entry);
        b.ret(Operand::Imm(0)).unwrap();
        let err = b.store(Operand::Imm(1), SlotId(0)).unwrap_err();
        assert!(matches!(err.kind(), LoweringErrorKind::MalformedBlock { .. }));
    }

    #[test]
    fn finish_requires_every_block_terminated() {
        let mut b = RoutineBuilder::new();
        let entry = b.create_block("entry");
        b.create_block("dangling");
        b.set_insert_point(entry);
        b.ret(Operand::Imm(0)).unwrap();
        assert!(b.finish("main", Vec::new(), IrType::I32).is_err());
    }

    #[test]
    fn branch_to_missing_block_is_rejected() {
        let mut b = RoutineBuilder::new();
        let entry = b.create_block("entry");
        b.set_insert_point(entry);
        assert!(b.br(BlockId(7)).is_err());
    }
}
