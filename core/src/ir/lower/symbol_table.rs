use std::collections::HashMap;

use crate::ir::value::SlotId;

/// Flat name → storage slot map for one lowering run.
///
/// There is a single namespace for the whole program: entries are never
/// removed and there are no nested scopes.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    slots: HashMap<String, SlotId>,
    order: Vec<(String, SlotId)>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Bind `name` to `slot`, returning the slot it was previously bound to.
    pub fn declare(&mut self, name: &str, slot: SlotId) -> Option<SlotId> {
        self.order.push((name.to_string(), slot));
        self.slots.insert(name.to_string(), slot)
    }

    pub fn lookup(&self, name: &str) -> Option<SlotId> {
        self.slots.get(name).copied()
    }

    /// Number of distinct names currently bound.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every declaration in program order, including rebinds.
    pub fn declarations(&self) -> &[(String, SlotId)] {
        &self.order
    }
}
