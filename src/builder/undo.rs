//! Per-actor undo history

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::core::IVec3;
use crate::voxel::{BlockState, GridAccessor};

/// Prior state of one mutated cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoRecord {
    pub position: IVec3,
    pub prior: BlockState,
}

/// Everything one build changed, in mutation order
#[derive(Clone, Debug)]
pub struct UndoEntry {
    records: Vec<UndoRecord>,
    created_at: DateTime<Utc>,
}

impl UndoEntry {
    pub fn new() -> Self {
        Self { records: Vec::new(), created_at: Utc::now() }
    }

    pub fn record(&mut self, position: IVec3, prior: BlockState) {
        self.records.push(UndoRecord { position, prior });
    }

    pub fn records(&self) -> &[UndoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Write every prior state back, newest first. Returns cells restored.
    pub fn restore<G: GridAccessor + ?Sized>(&self, grid: &mut G) -> usize {
        let mut restored = 0;
        for record in self.records.iter().rev() {
            match grid.set_block(record.position, &record.prior) {
                Ok(()) => restored += 1,
                Err(e) => debug!("Could not restore {}: {e}", record.position),
            }
        }
        restored
    }
}

impl Default for UndoEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded undo stacks keyed by actor. The oldest entry is dropped when a
/// stack is full.
#[derive(Debug)]
pub struct UndoStore {
    max_depth: usize,
    stacks: HashMap<String, VecDeque<UndoEntry>>,
}

impl UndoStore {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth, stacks: HashMap::new() }
    }

    pub fn push(&mut self, actor: &str, entry: UndoEntry) {
        if self.max_depth == 0 {
            return;
        }
        let stack = self.stacks.entry(actor.to_string()).or_default();
        if stack.len() == self.max_depth {
            stack.pop_front();
        }
        stack.push_back(entry);
    }

    /// Revert the actor's most recent build. Returns cells restored, zero if
    /// there was nothing to undo.
    pub fn undo<G: GridAccessor + ?Sized>(&mut self, actor: &str, grid: &mut G) -> usize {
        let Some(entry) = self.stacks.get_mut(actor).and_then(VecDeque::pop_back) else {
            return 0;
        };
        let restored = entry.restore(grid);
        info!("Undid build by {actor}: {restored}/{} cells restored", entry.len());
        restored
    }

    pub fn has_undo(&self, actor: &str) -> bool {
        self.depth(actor) > 0
    }

    pub fn depth(&self, actor: &str) -> usize {
        self.stacks.get(actor).map_or(0, VecDeque::len)
    }

    pub fn clear(&mut self, actor: &str) {
        self.stacks.remove(actor);
    }
}

impl Default for UndoStore {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::World;

    fn entry_at(pos: IVec3) -> UndoEntry {
        let mut entry = UndoEntry::new();
        entry.record(pos, BlockState::air());
        entry
    }

    #[test]
    fn test_depth_bounded() {
        let mut store = UndoStore::new(3);
        for i in 0..5 {
            store.push("alex", entry_at(IVec3::new(i, 0, 0)));
        }
        assert_eq!(store.depth("alex"), 3);
        assert_eq!(store.depth("sam"), 0);
        assert!(!store.has_undo("sam"));
    }

    #[test]
    fn test_undo_newest_first() {
        let mut world = World::new("w", 0..16);
        let stone = BlockState::new("stone").unwrap();
        world.set_block(IVec3::ZERO, &stone).unwrap();

        let mut store = UndoStore::new(10);
        let mut entry = UndoEntry::new();
        entry.record(IVec3::ZERO, stone.clone());
        store.push("alex", entry);

        world.set_block(IVec3::ZERO, &BlockState::new("glass").unwrap()).unwrap();
        assert_eq!(store.undo("alex", &mut world), 1);
        assert_eq!(world.block(IVec3::ZERO).unwrap(), stone);
        assert_eq!(store.undo("alex", &mut world), 0);
    }

    #[test]
    fn test_oldest_dropped() {
        let mut world = World::new("w", 0..16);
        let mut store = UndoStore::new(2);
        for x in 0..3 {
            store.push("alex", entry_at(IVec3::new(x, 0, 0)));
        }
        // entries for x=2 and x=1 remain
        assert_eq!(store.undo("alex", &mut world), 1);
        assert_eq!(store.undo("alex", &mut world), 1);
        assert!(!store.has_undo("alex"));
    }

    #[test]
    fn test_clear() {
        let mut store = UndoStore::default();
        store.push("alex", UndoEntry::new());
        assert!(store.has_undo("alex"));
        store.clear("alex");
        assert!(!store.has_undo("alex"));
    }
}
