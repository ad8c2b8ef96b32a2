//! # Block Interaction
//!
//! Breaking and placing from a raycast hit. The raycast itself lives outside
//! the world; it hands over the block it hit and the face normal it entered
//! through.

use tracing::debug;

use crate::block::BlockKind;
use crate::chunk::{CHUNK_HEIGHT, FACE_OFFSETS};
use crate::chunk_store::ChunkStore;

/// A block the observer is looking at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockHit {
    /// World position of the hit block.
    pub position: [i32; 3],
    /// Unit axis normal of the face that was hit.
    pub normal: [i32; 3],
}

impl BlockHit {
    /// Creates a hit.
    #[inline]
    #[must_use]
    pub const fn new(position: [i32; 3], normal: [i32; 3]) -> Self {
        Self { position, normal }
    }

    /// The cell in front of the hit face, where a placed block goes.
    #[inline]
    #[must_use]
    pub const fn adjacent(&self) -> [i32; 3] {
        [
            self.position[0] + self.normal[0],
            self.position[1] + self.normal[1],
            self.position[2] + self.normal[2],
        ]
    }

    /// True if the normal is one of the six face directions.
    #[must_use]
    pub fn has_face_normal(&self) -> bool {
        FACE_OFFSETS.contains(&self.normal)
    }
}

impl ChunkStore {
    /// Breaks the hit block, returning what was there.
    ///
    /// Does nothing for AIR, unbreakable kinds and unloaded chunks.
    pub fn break_block(&mut self, hit: BlockHit) -> Option<BlockKind> {
        let [x, y, z] = hit.position;
        let kind = self.block_at(x, y, z);
        if !kind.properties().breakable || !self.set_block_at(x, y, z, BlockKind::Air) {
            return None;
        }
        debug!(x, y, z, ?kind, "block broken");
        Some(kind)
    }

    /// Places `kind` against the hit face.
    ///
    /// The target cell must be AIR inside the world height. Placing AIR is
    /// ignored; use [`ChunkStore::break_block`] instead.
    pub fn place_block(&mut self, hit: BlockHit, kind: BlockKind) -> bool {
        if kind.is_air() || !hit.has_face_normal() {
            return false;
        }
        let [x, y, z] = hit.adjacent();
        if !(0..CHUNK_HEIGHT).contains(&y) || !self.block_at(x, y, z).is_air() {
            return false;
        }
        if !self.set_block_at(x, y, z, kind) {
            return false;
        }
        debug!(x, y, z, ?kind, "block placed");
        true
    }
}
