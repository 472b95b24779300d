//! Lowered program: one module, one routine, a list of basic blocks.

use serde::Serialize;

use super::op::{IROp, Terminator};
use super::value::{BlockId, IrType, SlotId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotInfo {
    pub id: SlotId,
    /// Name of the declared variable the slot was allocated for.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub name: String,
    pub ops: Vec<IROp>,
    pub terminator: Option<Terminator>,
}

impl BasicBlock {
    pub fn new(id: BlockId, name: String) -> Self {
        BasicBlock { id, name, ops: Vec::new(), terminator: None }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }

    pub fn successors(&self) -> Vec<BlockId> {
        self.terminator.as_ref().map(Terminator::successors).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternDecl {
    pub name: String,
    pub params: Vec<IrType>,
    pub ret: IrType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Routine {
    pub name: String,
    pub params: Vec<(String, IrType)>,
    pub ret: IrType,
    pub slots: Vec<SlotInfo>,
    pub blocks: Vec<BasicBlock>,
}

impl Routine {
    /// The first block; execution starts here.
    pub fn entry(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.0)
    }

    pub fn block_by_name(&self, name: &str) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn block_name(&self, id: BlockId) -> &str {
        self.block(id).map(|b| b.name.as_str()).unwrap_or("<unknown>")
    }

    /// All control-flow edges as `(from, to)` pairs, in block order.
    pub fn edges(&self) -> Vec<(BlockId, BlockId)> {
        self.blocks
            .iter()
            .flat_map(|b| b.successors().into_iter().map(move |s| (b.id, s)))
            .collect()
    }

    /// Every instruction of the routine in block order.
    pub fn ops(&self) -> impl Iterator<Item = &IROp> {
        self.blocks.iter().flat_map(|b| b.ops.iter())
    }

    pub fn slot_name(&self, slot: SlotId) -> Option<&str> {
        self.slots.get(slot.0).map(|s| s.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrModule {
    pub name: String,
    pub externs: Vec<ExternDecl>,
    pub routine: Routine,
}

impl IrModule {
    pub fn get_extern(&self, name: &str) -> Option<&ExternDecl> {
        self.externs.iter().find(|e| e.name == name)
    }

    /// Number of basic blocks in the routine.
    pub fn len(&self) -> usize {
        self.routine.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routine.blocks.is_empty()
    }

    /// Successors of the named block, by name.
    pub fn successors(&self, block: &str) -> Vec<&str> {
        self.routine
            .block_by_name(block)
            .map(|b| b.successors().into_iter().map(|s| self.routine.block_name(s)).collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for IrModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        for ext in &self.externs {
            let params = ext.params.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ");
            writeln!(f, "declare {} @{}({})", ext.ret, ext.name, params)?;
        }
        writeln!(f)?;

        let routine = &self.routine;
        let params = routine
            .params
            .iter()
            .map(|(name, ty)| format!("{} %{}", ty, name))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "define {} @{}({}) {{", routine.ret, routine.name, params)?;
        for (i, block) in routine.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", block.name)?;
            for op in &block.ops {
                match op {
                    IROp::Alloca { slot } => match routine.slot_name(*slot) {
                        Some(name) => writeln!(f, "  {}    ; {}", op, name)?,
                        None => writeln!(f, "  {}", op)?,
                    },
                    _ => writeln!(f, "  {}", op)?,
                }
            }
            match &block.terminator {
                Some(Terminator::Br { target }) => {
                    writeln!(f, "  br label %{}", routine.block_name(*target))?
                }
                Some(Terminator::CondBr { cond, then_block, else_block }) => writeln!(
                    f,
                    "  br i32 {}, label %{}, label %{}",
                    cond,
                    routine.block_name(*then_block),
                    routine.block_name(*else_block)
                )?,
                Some(Terminator::Ret { value }) => writeln!(f, "  ret i32 {}", value)?,
                None => writeln!(f, "  ; <unterminated>")?,
            }
        }
        writeln!(f, "}}")
    }
}
