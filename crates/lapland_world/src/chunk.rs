//! # Chunk System
//!
//! The world is split horizontally into 16x16 columns of blocks; each chunk
//! spans the full 64-block height, so chunks are keyed by `(x, z)` only.
//!
//! ## Storage
//!
//! Blocks live in one flat boxed slice of one-byte kinds, indexed
//! `x + z * CHUNK_SIZE + y * CHUNK_SIZE * CHUNK_SIZE` so a horizontal layer is
//! contiguous.
//!
//! ## Meshing
//!
//! A non-air cell is visible when any of its six neighbors is air,
//! transparent, above/below the world, or across the chunk border. Border
//! faces are always treated as visible: neighbor chunks are never consulted,
//! so meshing one chunk does not depend on which others are loaded.

use crate::block::{is_transparent, BlockKind};
use crate::instance::{BlockInstance, InstanceChange, InstanceRaw, InstanceTable};

/// Chunk width/depth in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Chunk height in blocks.
pub const CHUNK_HEIGHT: i32 = 64;

/// Blocks per chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_HEIGHT) as usize;

/// The six face directions.
pub const FACE_OFFSETS: [[i32; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world block column. Floors toward negative infinity.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE),
            z: block_z.div_euclid(CHUNK_SIZE),
        }
    }

    /// World X of the chunk's origin corner.
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x * CHUNK_SIZE
    }

    /// World Z of the chunk's origin corner.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i32 {
        self.z * CHUNK_SIZE
    }

    /// Chebyshev distance in chunks.
    #[inline]
    #[must_use]
    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }
}

/// A 16x64x16 column of blocks and its visible instances.
pub struct Chunk {
    coord: ChunkCoord,
    blocks: Box<[BlockKind]>,
    instances: InstanceTable,
    changes: Vec<InstanceChange>,
    generated: bool,
    meshed: bool,
}

impl Chunk {
    /// Creates an all-air chunk.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![BlockKind::Air; CHUNK_VOLUME].into_boxed_slice(),
            instances: InstanceTable::new(CHUNK_VOLUME),
            changes: Vec::new(),
            generated: false,
            meshed: false,
        }
    }

    /// Returns the chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// True once terrain has been written.
    #[inline]
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.generated
    }

    /// True while the instance list is built.
    #[inline]
    #[must_use]
    pub const fn is_meshed(&self) -> bool {
        self.meshed
    }

    /// Marks terrain generation as complete.
    #[inline]
    pub fn mark_generated(&mut self) {
        self.generated = true;
    }

    /// True if the local coordinate lies inside the chunk.
    #[inline]
    #[must_use]
    pub const fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < CHUNK_SIZE && y >= 0 && y < CHUNK_HEIGHT && z >= 0 && z < CHUNK_SIZE
    }

    #[inline]
    fn index(x: i32, y: i32, z: i32) -> Option<usize> {
        if Self::in_bounds(x, y, z) {
            Some((x + z * CHUNK_SIZE + y * CHUNK_SIZE * CHUNK_SIZE) as usize)
        } else {
            None
        }
    }

    /// Writes a block at local coordinates. Out-of-bounds writes are ignored.
    ///
    /// Does not touch the instance list.
    #[inline]
    pub fn set_block_local(&mut self, x: i32, y: i32, z: i32, kind: BlockKind) {
        if let Some(index) = Self::index(x, y, z) {
            self.blocks[index] = kind;
        }
    }

    /// Reads a block at local coordinates. Out of bounds reads as AIR.
    #[inline]
    #[must_use]
    pub fn get_block_local(&self, x: i32, y: i32, z: i32) -> BlockKind {
        Self::index(x, y, z).map_or(BlockKind::Air, |index| self.blocks[index])
    }

    /// Converts world coordinates to this chunk's local frame.
    #[inline]
    #[must_use]
    pub const fn world_to_local(&self, world_x: i32, world_y: i32, world_z: i32) -> [i32; 3] {
        [world_x - self.coord.world_x(), world_y, world_z - self.coord.world_z()]
    }

    /// Converts local coordinates to world coordinates.
    #[inline]
    #[must_use]
    pub const fn local_to_world(&self, x: i32, y: i32, z: i32) -> [i32; 3] {
        [x + self.coord.world_x(), y, z + self.coord.world_z()]
    }

    /// True if the face of `(x, y, z)` pointing along `(dx, dy, dz)` is exposed.
    #[must_use]
    pub fn is_face_visible(&self, x: i32, y: i32, z: i32, dx: i32, dy: i32, dz: i32) -> bool {
        let (nx, ny, nz) = (x + dx, y + dy, z + dz);
        if !(0..CHUNK_HEIGHT).contains(&ny) {
            return true;
        }
        if !(0..CHUNK_SIZE).contains(&nx) || !(0..CHUNK_SIZE).contains(&nz) {
            return true;
        }
        let neighbor = self.get_block_local(nx, ny, nz);
        neighbor.is_air() || is_transparent(neighbor)
    }

    /// True if any of the six faces is exposed.
    #[must_use]
    pub fn has_visible_face(&self, x: i32, y: i32, z: i32) -> bool {
        FACE_OFFSETS
            .iter()
            .any(|&[dx, dy, dz]| self.is_face_visible(x, y, z, dx, dy, dz))
    }

    /// Rebuilds the instance list from the block grid.
    pub fn build_instances(&mut self) {
        self.clear_instances();

        for y in 0..CHUNK_HEIGHT {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let kind = self.get_block_local(x, y, z);
                    if !kind.is_air() && self.has_visible_face(x, y, z) {
                        self.spawn(x, y, z, kind);
                    }
                }
            }
        }

        self.meshed = true;
    }

    /// Releases every instance.
    pub fn clear_instances(&mut self) {
        for instance in self.instances.drain() {
            self.changes.push(InstanceChange::Released {
                position: instance.position,
            });
        }
        self.meshed = false;
    }

    /// Writes a block and refreshes the instances it can affect.
    ///
    /// The touched cell's instance is always replaced. Its six neighbors are
    /// re-evaluated as well, since removing a block can expose their faces and
    /// placing one can bury them. An unmeshed chunk only takes the block;
    /// [`Chunk::build_instances`] picks it up later.
    pub fn update_block(&mut self, x: i32, y: i32, z: i32, kind: BlockKind) {
        let Some(index) = Self::index(x, y, z) else {
            return;
        };
        self.blocks[index] = kind;
        if !self.meshed {
            return;
        }

        if let Some(old) = self.instances.remove(index) {
            self.changes.push(InstanceChange::Released {
                position: old.position,
            });
        }
        if !kind.is_air() && self.has_visible_face(x, y, z) {
            self.spawn(x, y, z, kind);
        }

        for [dx, dy, dz] in FACE_OFFSETS {
            self.refresh_cell(x + dx, y + dy, z + dz);
        }
    }

    fn refresh_cell(&mut self, x: i32, y: i32, z: i32) {
        let Some(index) = Self::index(x, y, z) else {
            return;
        };
        let kind = self.blocks[index];
        let wanted = !kind.is_air() && self.has_visible_face(x, y, z);

        match (wanted, self.instances.contains(index)) {
            (true, false) => self.spawn(x, y, z, kind),
            (false, true) => {
                if let Some(old) = self.instances.remove(index) {
                    self.changes.push(InstanceChange::Released {
                        position: old.position,
                    });
                }
            }
            _ => {}
        }
    }

    fn spawn(&mut self, x: i32, y: i32, z: i32, kind: BlockKind) {
        let Some(index) = Self::index(x, y, z) else {
            return;
        };
        let instance = BlockInstance::new(self.local_to_world(x, y, z), kind);
        if let Some(old) = self.instances.insert(index, instance) {
            self.changes.push(InstanceChange::Released {
                position: old.position,
            });
        }
        self.changes.push(InstanceChange::Spawned(instance));
    }

    /// Returns the instance at a local cell.
    #[must_use]
    pub fn instance_at(&self, x: i32, y: i32, z: i32) -> Option<&BlockInstance> {
        Self::index(x, y, z).and_then(|index| self.instances.get(index))
    }

    /// Iterates the visible instances.
    pub fn instances(&self) -> impl Iterator<Item = &BlockInstance> {
        self.instances.iter()
    }

    /// Number of visible instances.
    #[inline]
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Packs all instances for GPU upload.
    #[must_use]
    pub fn raw_instances(&self) -> Vec<InstanceRaw> {
        self.instances.iter().map(BlockInstance::to_raw).collect()
    }

    /// Returns and clears the pending instance changes.
    pub fn take_changes(&mut self) -> Vec<InstanceChange> {
        std::mem::take(&mut self.changes)
    }
}
