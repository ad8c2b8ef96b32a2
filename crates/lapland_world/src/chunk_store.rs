//! # Chunk Store
//!
//! Owns every loaded chunk and streams them around the observer.
//!
//! The loaded set is always exactly the square of side
//! `2 * render_distance + 1` centered on the observer's chunk after the last
//! [`ChunkStore::update_chunks`]. Nothing else loads or unloads chunks.
//!
//! All block access from outside goes through [`ChunkStore::block_at`] and
//! [`ChunkStore::set_block_at`]. Neither can fail: unloaded chunks read as AIR
//! and drop writes.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, trace};

use crate::block::BlockKind;
use crate::chunk::{Chunk, ChunkCoord, CHUNK_SIZE};
use crate::config::{WorldConfig, MAX_RENDER_DISTANCE};
use crate::instance::{BlockInstance, ChangeLog, InstanceChange};
use crate::terrain::TerrainGenerator;

/// Farthest chunk a loaded square may be centered on; every block of the
/// square stays addressable in `i32` world coordinates.
const CENTER_LIMIT: i32 = i32::MAX / CHUNK_SIZE - MAX_RENDER_DISTANCE as i32 - 1;

/// Outcome of one streaming pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// Chunk the loaded square is centered on.
    pub center: ChunkCoord,
    /// Chunks generated and inserted by this pass.
    pub loaded: usize,
    /// Chunks dropped by this pass.
    pub unloaded: usize,
}

impl StreamingReport {
    /// True if the pass did not touch the loaded set.
    #[inline]
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.loaded == 0 && self.unloaded == 0
    }
}

/// Snapshot of the store for debug overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks currently loaded.
    pub loaded_chunks: usize,
    /// Visible instances across all loaded chunks.
    pub visible_instances: usize,
    /// Chunks generated since the store was created.
    pub generated_this_session: u64,
    /// Chunks dropped since the store was created.
    pub unloaded_this_session: u64,
}

/// Streaming owner of all loaded chunks.
pub struct ChunkStore {
    chunks: HashMap<ChunkCoord, Chunk>,
    generator: TerrainGenerator,
    render_distance: u32,
    center: Option<ChunkCoord>,
    changes: ChangeLog,
    generated_total: u64,
    unloaded_total: u64,
}

impl ChunkStore {
    /// Creates an empty store. The radius is capped at [`MAX_RENDER_DISTANCE`].
    #[must_use]
    pub fn new(generator: TerrainGenerator, render_distance: u32) -> Self {
        let render_distance = render_distance.min(MAX_RENDER_DISTANCE);
        let side = (2 * render_distance + 1) as usize;
        Self {
            chunks: HashMap::with_capacity(side * side),
            generator,
            render_distance,
            center: None,
            changes: ChangeLog::new(),
            generated_total: 0,
            unloaded_total: 0,
        }
    }

    /// Creates an empty store from a configuration.
    ///
    /// The configuration is not validated here; an oversized render distance
    /// is capped like in [`ChunkStore::new`]. Use [`WorldConfig::load`] or
    /// [`WorldConfig::validate`] to reject bad input.
    #[must_use]
    pub fn from_config(config: &WorldConfig) -> Self {
        let generator = TerrainGenerator::new(config.world_seed(), config.terrain);
        Self::new(generator, config.render_distance)
    }

    /// The terrain generator.
    #[inline]
    #[must_use]
    pub const fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Chebyshev radius of the loaded square, in chunks.
    #[inline]
    #[must_use]
    pub const fn render_distance(&self) -> u32 {
        self.render_distance
    }

    /// Chunk the loaded square was last centered on.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Chunk owning a world column.
    #[inline]
    #[must_use]
    pub const fn chunk_coord_of(world_x: i32, world_z: i32) -> ChunkCoord {
        ChunkCoord::from_block_pos(world_x, world_z)
    }

    /// Chunk containing a floating-point observer position.
    #[inline]
    #[must_use]
    pub fn observer_chunk(observer_x: f64, observer_z: f64) -> ChunkCoord {
        Self::chunk_coord_of(observer_x.floor() as i32, observer_z.floor() as i32)
    }

    /// Pulls a center back from the edge of the coordinate space.
    #[inline]
    #[must_use]
    pub fn clamp_center(center: ChunkCoord) -> ChunkCoord {
        ChunkCoord::new(
            center.x.clamp(-CENTER_LIMIT, CENTER_LIMIT),
            center.z.clamp(-CENTER_LIMIT, CENTER_LIMIT),
        )
    }

    /// Every chunk within the render distance of `center`, nearest first.
    ///
    /// Centers near the `i32` edge are clamped first.
    #[must_use]
    pub fn needed_chunks(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let center = Self::clamp_center(center);
        let radius = self.render_distance as i32;
        let mut needed = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                needed.push(ChunkCoord::new(center.x + dx, center.z + dz));
            }
        }
        needed.sort_by_key(|coord| (coord.chebyshev(center), coord.z, coord.x));
        needed
    }

    /// Streams chunks around an observer position.
    ///
    /// Unloads every chunk outside the square, then generates, meshes and
    /// inserts every missing one, nearest first. Calling it again with the
    /// same observer chunk does nothing.
    pub fn update_chunks(&mut self, observer_x: f64, observer_z: f64) -> StreamingReport {
        self.update_around(Self::observer_chunk(observer_x, observer_z))
    }

    /// Streams chunks around a chunk coordinate.
    pub fn update_around(&mut self, center: ChunkCoord) -> StreamingReport {
        let center = Self::clamp_center(center);
        let needed = self.needed_chunks(center);
        let wanted: HashSet<ChunkCoord> = needed.iter().copied().collect();

        let stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| !wanted.contains(*coord))
            .copied()
            .collect();
        for coord in &stale {
            self.unload_chunk(*coord);
        }

        let mut loaded = 0;
        for coord in needed {
            if !self.chunks.contains_key(&coord) {
                self.load_chunk(coord);
                loaded += 1;
            }
        }

        self.center = Some(center);
        let report = StreamingReport {
            center,
            loaded,
            unloaded: stale.len(),
        };
        if !report.is_noop() {
            info!(
                x = center.x,
                z = center.z,
                loaded,
                unloaded = report.unloaded,
                total = self.chunks.len(),
                "streaming pass"
            );
        }
        report
    }

    fn load_chunk(&mut self, coord: ChunkCoord) {
        let mut chunk = Chunk::new(coord);
        self.generator.generate_chunk(&mut chunk);
        chunk.build_instances();
        self.changes.extend(chunk.take_changes());

        debug!(x = coord.x, z = coord.z, instances = chunk.instance_count(), "chunk loaded");
        self.chunks.insert(coord, chunk);
        self.generated_total += 1;
    }

    fn unload_chunk(&mut self, coord: ChunkCoord) {
        let Some(mut chunk) = self.chunks.remove(&coord) else {
            return;
        };

        let instances = chunk.instance_count();
        chunk.clear_instances();
        self.changes.extend(chunk.take_changes());

        debug!(x = coord.x, z = coord.z, instances, "chunk unloaded");
        self.unloaded_total += 1;
    }

    /// Block at world coordinates. AIR if the owning chunk is not loaded.
    #[must_use]
    pub fn block_at(&self, world_x: i32, world_y: i32, world_z: i32) -> BlockKind {
        self.chunks
            .get(&Self::chunk_coord_of(world_x, world_z))
            .map_or(BlockKind::Air, |chunk| {
                let [x, y, z] = chunk.world_to_local(world_x, world_y, world_z);
                chunk.get_block_local(x, y, z)
            })
    }

    /// Writes a block at world coordinates and refreshes affected instances.
    ///
    /// Returns false, and drops the write, if the owning chunk is not loaded.
    pub fn set_block_at(&mut self, world_x: i32, world_y: i32, world_z: i32, kind: BlockKind) -> bool {
        let Some(chunk) = self.chunks.get_mut(&Self::chunk_coord_of(world_x, world_z)) else {
            trace!(world_x, world_y, world_z, "write to unloaded chunk dropped");
            return false;
        };

        let [x, y, z] = chunk.world_to_local(world_x, world_y, world_z);
        chunk.update_block(x, y, z, kind);
        self.changes.extend(chunk.take_changes());

        trace!(world_x, world_y, world_z, ?kind, "block set");
        true
    }

    /// True if the chunk is loaded.
    #[inline]
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Read access to a loaded chunk.
    #[must_use]
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Coordinates of every loaded chunk, sorted.
    #[must_use]
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Number of loaded chunks.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates the visible instances of every loaded chunk.
    pub fn visible_instances(&self) -> impl Iterator<Item = &BlockInstance> {
        self.chunks.values().flat_map(Chunk::instances)
    }

    /// Returns and clears the net instance changes since the last call.
    ///
    /// The renderer drains this once per frame. Callers that never drain
    /// still hold at most one pending change per touched position.
    pub fn take_instance_changes(&mut self) -> Vec<InstanceChange> {
        self.changes.drain()
    }

    /// Positions with an undrained change.
    #[inline]
    #[must_use]
    pub fn pending_change_count(&self) -> usize {
        self.changes.len()
    }

    /// Counters for the debug overlay.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            loaded_chunks: self.chunks.len(),
            visible_instances: self.chunks.values().map(Chunk::instance_count).sum(),
            generated_this_session: self.generated_total,
            unloaded_this_session: self.unloaded_total,
        }
    }

    /// Where a new observer starts: five blocks above the terrain at the origin.
    #[must_use]
    pub fn spawn_point(&self) -> [i32; 3] {
        [0, self.generator.height_at(0, 0) + 5, 0]
    }
}
