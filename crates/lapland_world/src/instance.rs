//! # Visible Instances
//!
//! A chunk does not draw anything. For every non-air cell with at least one
//! exposed face it keeps a [`BlockInstance`] (world position + kind) in an
//! [`InstanceTable`], and records every spawn/release in an ordered
//! [`InstanceChange`] log the renderer drains once per frame.
//!
//! ## Pending changes
//!
//! A [`ChangeLog`] keeps at most one net change per world position. A spawn
//! released before anyone drained it cancels out, so an undrained log never
//! outgrows the live instances plus the releases the renderer still owes.
//!
//! ## Table layout
//!
//! The table is a small arena: a dense `Vec` of live entries plus a
//! per-cell slot index. Insert, remove and lookup are O(1); iteration only
//! touches live instances.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::block::{properties_of, BlockKind, BlockProperties};

/// One visible block, as handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockInstance {
    /// World block position `[x, y, z]`.
    pub position: [i32; 3],
    /// Block kind at that position.
    pub kind: BlockKind,
}

impl BlockInstance {
    /// Creates an instance.
    #[inline]
    #[must_use]
    pub const fn new(position: [i32; 3], kind: BlockKind) -> Self {
        Self { position, kind }
    }

    /// Catalog entry for this instance's kind.
    #[inline]
    #[must_use]
    pub fn properties(&self) -> &'static BlockProperties {
        properties_of(self.kind)
    }

    /// Whether the renderer should attach a collider.
    #[inline]
    #[must_use]
    pub fn is_solid(&self) -> bool {
        self.properties().solid
    }

    /// Whether the renderer should draw it in the transparent pass.
    #[inline]
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.properties().transparent
    }

    /// Packs the instance for a GPU instance buffer.
    #[must_use]
    pub fn to_raw(&self) -> InstanceRaw {
        let [x, y, z] = self.position;
        InstanceRaw {
            position: [x as f32, y as f32, z as f32],
            kind: u32::from(self.kind.code()),
            color: self.properties().color,
        }
    }
}

/// GPU layout of one instance (32 bytes, no padding).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    /// World position of the block's origin corner.
    pub position: [f32; 3],
    /// Block code.
    pub kind: u32,
    /// RGBA tint.
    pub color: [f32; 4],
}

/// A renderer-visible change to a chunk's instance set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceChange {
    /// A drawable must be created.
    Spawned(BlockInstance),
    /// The drawable at this world position must be released.
    Released {
        /// World block position.
        position: [i32; 3],
    },
}

/// Net effect of the changes at one position since the last drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    /// Nothing was drawn there; now this is.
    Spawned(BlockInstance),
    /// Something was drawn there; now nothing is.
    Released,
    /// Something was drawn there; now this is.
    Replaced(BlockInstance),
}

/// Coalescing buffer of instance changes, drained by the renderer.
#[derive(Debug, Default)]
pub struct ChangeLog {
    pending: HashMap<[i32; 3], (u64, Pending)>,
    next_seq: u64,
}

impl ChangeLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positions with a pending change.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Folds one change into the pending set.
    pub fn record(&mut self, change: InstanceChange) {
        let position = match change {
            InstanceChange::Spawned(instance) => instance.position,
            InstanceChange::Released { position } => position,
        };
        let current = self.pending.get(&position).map(|&(_, pending)| pending);

        let next = match (current, change) {
            (None | Some(Pending::Spawned(_)), InstanceChange::Spawned(instance)) => Some(Pending::Spawned(instance)),
            (Some(Pending::Released | Pending::Replaced(_)), InstanceChange::Spawned(instance)) => {
                Some(Pending::Replaced(instance))
            }
            (None | Some(Pending::Released | Pending::Replaced(_)), InstanceChange::Released { .. }) => {
                Some(Pending::Released)
            }
            (Some(Pending::Spawned(_)), InstanceChange::Released { .. }) => None,
        };

        match next {
            Some(pending) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let entry = self.pending.entry(position).or_insert((seq, pending));
                entry.1 = pending;
            }
            None => {
                self.pending.remove(&position);
            }
        }
    }

    /// Folds a batch of changes in order.
    pub fn extend(&mut self, changes: impl IntoIterator<Item = InstanceChange>) {
        for change in changes {
            self.record(change);
        }
    }

    /// Returns the net changes in first-touched order and clears the log.
    ///
    /// A replaced position yields its release before the new spawn.
    pub fn drain(&mut self) -> Vec<InstanceChange> {
        let mut entries: Vec<([i32; 3], (u64, Pending))> = self.pending.drain().collect();
        entries.sort_unstable_by_key(|&(_, (seq, _))| seq);

        let mut changes = Vec::with_capacity(entries.len());
        for (position, (_, pending)) in entries {
            match pending {
                Pending::Spawned(instance) => changes.push(InstanceChange::Spawned(instance)),
                Pending::Released => changes.push(InstanceChange::Released { position }),
                Pending::Replaced(instance) => {
                    changes.push(InstanceChange::Released { position });
                    changes.push(InstanceChange::Spawned(instance));
                }
            }
        }
        self.next_seq = 0;
        changes
    }
}

/// Marks a cell with no live instance.
const EMPTY_SLOT: u32 = u32::MAX;

/// Arena of live instances, indexed by a cell index chosen by the owner.
pub struct InstanceTable {
    /// Cell index -> position in `entries`, or `EMPTY_SLOT`.
    slots: Box<[u32]>,
    /// Live entries with the cell that owns them.
    entries: Vec<(u32, BlockInstance)>,
}

impl InstanceTable {
    /// Creates a table covering `cells` cells.
    #[must_use]
    pub fn new(cells: usize) -> Self {
        Self {
            slots: vec![EMPTY_SLOT; cells].into_boxed_slice(),
            entries: Vec::new(),
        }
    }

    /// Number of live instances.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no instance is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if the cell holds an instance.
    #[inline]
    #[must_use]
    pub fn contains(&self, cell: usize) -> bool {
        self.slots.get(cell).is_some_and(|&slot| slot != EMPTY_SLOT)
    }

    /// Returns the instance at a cell.
    #[must_use]
    pub fn get(&self, cell: usize) -> Option<&BlockInstance> {
        let slot = *self.slots.get(cell)?;
        if slot == EMPTY_SLOT {
            return None;
        }
        self.entries.get(slot as usize).map(|(_, instance)| instance)
    }

    /// Stores an instance at a cell, returning the one it replaced.
    ///
    /// Cells outside the table are ignored.
    pub fn insert(&mut self, cell: usize, instance: BlockInstance) -> Option<BlockInstance> {
        let slot = self.slots.get_mut(cell)?;
        if *slot != EMPTY_SLOT {
            let entry = &mut self.entries[*slot as usize];
            return Some(std::mem::replace(&mut entry.1, instance));
        }
        *slot = self.entries.len() as u32;
        self.entries.push((cell as u32, instance));
        None
    }

    /// Removes and returns the instance at a cell.
    pub fn remove(&mut self, cell: usize) -> Option<BlockInstance> {
        let slot = self.slots.get_mut(cell)?;
        if *slot == EMPTY_SLOT {
            return None;
        }
        let index = *slot as usize;
        *slot = EMPTY_SLOT;

        let (_, removed) = self.entries.swap_remove(index);
        if let Some(&(moved_cell, _)) = self.entries.get(index) {
            self.slots[moved_cell as usize] = index as u32;
        }
        Some(removed)
    }

    /// Removes every instance, returning them.
    pub fn drain(&mut self) -> Vec<BlockInstance> {
        for &(cell, _) in &self.entries {
            self.slots[cell as usize] = EMPTY_SLOT;
        }
        self.entries.drain(..).map(|(_, instance)| instance).collect()
    }

    /// Iterates live instances.
    pub fn iter(&self) -> impl Iterator<Item = &BlockInstance> {
        self.entries.iter().map(|(_, instance)| instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snow(x: i32) -> BlockInstance {
        BlockInstance::new([x, 0, 0], BlockKind::Snow)
    }

    #[test]
    fn test_insert_get_remove() {
        let mut table = InstanceTable::new(8);
        assert!(table.insert(3, snow(3)).is_none());
        assert!(table.contains(3));
        assert_eq!(table.get(3), Some(&snow(3)));
        assert_eq!(table.remove(3), Some(snow(3)));
        assert!(!table.contains(3));
        assert!(table.is_empty());
    }

    #[test]
    fn test_remove_keeps_moved_entry_reachable() {
        let mut table = InstanceTable::new(8);
        table.insert(1, snow(1));
        table.insert(5, snow(5));
        table.insert(7, snow(7));

        assert_eq!(table.remove(1), Some(snow(1)));
        assert_eq!(table.get(7), Some(&snow(7)));
        assert_eq!(table.get(5), Some(&snow(5)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut table = InstanceTable::new(4);
        table.insert(2, snow(2));
        let stone = BlockInstance::new([2, 0, 0], BlockKind::Stone);
        assert_eq!(table.insert(2, stone), Some(snow(2)));
        assert_eq!(table.get(2), Some(&stone));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_out_of_range_cells_are_ignored() {
        let mut table = InstanceTable::new(4);
        assert!(table.insert(4, snow(4)).is_none());
        assert!(table.remove(99).is_none());
        assert!(table.get(99).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_drain_resets_slots() {
        let mut table = InstanceTable::new(4);
        table.insert(0, snow(0));
        table.insert(3, snow(3));
        assert_eq!(table.drain().len(), 2);
        assert!(!table.contains(0));
        assert!(!table.contains(3));
        assert!(table.insert(3, snow(3)).is_none());
    }

    #[test]
    fn test_log_cancels_undrained_spawns() {
        let mut log = ChangeLog::new();
        log.record(InstanceChange::Spawned(snow(1)));
        log.record(InstanceChange::Spawned(snow(2)));
        log.record(InstanceChange::Released { position: [1, 0, 0] });

        assert_eq!(log.len(), 1);
        assert_eq!(log.drain(), vec![InstanceChange::Spawned(snow(2))]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_log_keeps_release_of_drained_instance() {
        let mut log = ChangeLog::new();
        log.record(InstanceChange::Spawned(snow(1)));
        log.drain();

        let stone = BlockInstance::new([1, 0, 0], BlockKind::Stone);
        log.extend([
            InstanceChange::Released { position: [1, 0, 0] },
            InstanceChange::Spawned(stone),
        ]);
        assert_eq!(
            log.drain(),
            vec![InstanceChange::Released { position: [1, 0, 0] }, InstanceChange::Spawned(stone)]
        );

        log.extend([
            InstanceChange::Released { position: [1, 0, 0] },
            InstanceChange::Spawned(snow(1)),
            InstanceChange::Released { position: [1, 0, 0] },
        ]);
        assert_eq!(log.drain(), vec![InstanceChange::Released { position: [1, 0, 0] }]);
    }

    #[test]
    fn test_log_drains_in_first_touched_order() {
        let mut log = ChangeLog::new();
        log.extend([
            InstanceChange::Spawned(snow(5)),
            InstanceChange::Released { position: [9, 0, 0] },
            InstanceChange::Spawned(snow(2)),
        ]);
        assert_eq!(
            log.drain(),
            vec![
                InstanceChange::Spawned(snow(5)),
                InstanceChange::Released { position: [9, 0, 0] },
                InstanceChange::Spawned(snow(2)),
            ]
        );
    }

    #[test]
    fn test_raw_layout() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 32);
        let raws = [snow(1).to_raw(), BlockInstance::new([-4, 9, 2], BlockKind::Ice).to_raw()];
        let bytes: &[u8] = bytemuck::cast_slice(&raws);
        assert_eq!(bytes.len(), 64);
        assert_eq!(raws[1].position, [-4.0, 9.0, 2.0]);
        assert_eq!(raws[1].kind, u32::from(BlockKind::Ice.code()));
        assert_eq!(raws[1].color, BlockKind::Ice.properties().color);
    }
}
