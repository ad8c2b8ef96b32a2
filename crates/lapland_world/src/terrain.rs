//! # Lapland Terrain Generation
//!
//! Rolling snowy hills, frozen lakes, rocky outcrops and pine forest.
//!
//! ## Passes
//!
//! 1. **Columns**: every column is filled bottom to top from its height,
//!    lake and rock samples.
//! 2. **Features**: pines or ground vegetation on dry, snowy columns. Runs
//!    only after the whole chunk finished pass 1, so trees never get buried
//!    by a later column.
//!
//! ## Determinism
//!
//! Every output is a pure function of world coordinates and the seed. Noise
//! channels are seeded once at construction; per-column draws come from
//! [`cell_rng`], never from shared RNG state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::block::BlockKind;
use crate::chunk::{Chunk, CHUNK_HEIGHT, CHUNK_SIZE};
use crate::noise::{cell_rng, NoiseLayer, WorldSeed};

/// Terrain and feature shaping parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Average surface elevation.
    pub base_height: i32,
    /// Elevation swing of the blended noise.
    pub height_scale: f64,
    /// Frequency of the large-scale hills.
    pub terrain_frequency: f64,
    /// Frequency of the small bumps.
    pub detail_frequency: f64,
    /// Chance of a pine on a forested column.
    pub tree_density: f64,
    /// Columns with a lake value below this are frozen lakes.
    pub lake_threshold: f64,
    /// Columns with a rock value above this are rocky outcrops.
    pub rock_threshold: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            base_height: 20,
            height_scale: 15.0,
            terrain_frequency: 0.02,
            detail_frequency: 0.08,
            tree_density: 0.15,
            lake_threshold: -0.3,
            rock_threshold: 0.7,
        }
    }
}

/// Noise channel ids, used to derive one sub-seed each.
mod channel {
    pub const BASE: u64 = 0;
    pub const DETAIL: u64 = 1000;
    pub const LAKE: u64 = 2000;
    pub const ROCK: u64 = 3000;
    pub const FOREST: u64 = 4000;
}

/// Salts for per-column random draws.
mod salt {
    pub const TREE: u64 = 1;
    pub const TRUNK: u64 = 2;
    pub const VEGETATION: u64 = 3;
}

/// Everything pass 1 decides about a column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnSample {
    /// Terrain height before lake lowering.
    pub height: i32,
    /// Column is a frozen lake.
    pub lake: bool,
    /// Column surface is bare rock.
    pub rocky: bool,
}

/// Seeded generator for the taiga biome.
pub struct TerrainGenerator {
    seed: WorldSeed,
    params: TerrainParams,
    base: NoiseLayer,
    detail: NoiseLayer,
    lake: NoiseLayer,
    rock: NoiseLayer,
    forest: NoiseLayer,
}

impl TerrainGenerator {
    /// Forest density threshold for tree placement.
    const FOREST_THRESHOLD: f64 = 0.2;
    /// Lake mask frequency.
    const LAKE_FREQUENCY: f64 = 0.01;
    /// Rock mask frequency.
    const ROCK_FREQUENCY: f64 = 0.03;
    /// Forest density frequency.
    const FOREST_FREQUENCY: f64 = 0.1;
    /// Shortest pine trunk.
    const TRUNK_MIN: i32 = 5;
    /// Tallest pine trunk.
    const TRUNK_MAX: i32 = 9;
    /// Crown radius at its base.
    const CROWN_RADIUS: f64 = 3.0;
    /// Fraction of the crown radius lost by the top layer.
    const CROWN_TAPER: f64 = 0.8;
    /// Depth of the frozen dirt layer.
    const DIRT_DEPTH: i32 = 4;
    /// Distance of the lake ice below the base height.
    const LAKE_DEPTH: i32 = 3;

    /// Creates a generator.
    #[must_use]
    pub fn new(seed: WorldSeed, params: TerrainParams) -> Self {
        Self {
            seed,
            params,
            base: NoiseLayer::new(seed, channel::BASE, params.terrain_frequency, 4, 0.5),
            detail: NoiseLayer::new(seed, channel::DETAIL, params.detail_frequency, 2, 0.3),
            lake: NoiseLayer::new(seed, channel::LAKE, Self::LAKE_FREQUENCY, 2, 0.5),
            rock: NoiseLayer::new(seed, channel::ROCK, Self::ROCK_FREQUENCY, 3, 0.6),
            forest: NoiseLayer::new(seed, channel::FOREST, Self::FOREST_FREQUENCY, 2, 0.5),
        }
    }

    /// Creates a generator with default parameters.
    #[must_use]
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self::new(seed, TerrainParams::default())
    }

    /// Returns the world seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Returns the shaping parameters.
    #[inline]
    #[must_use]
    pub const fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Terrain surface height at a world column, in `[1, CHUNK_HEIGHT - 10]`.
    #[must_use]
    pub fn height_at(&self, world_x: i32, world_z: i32) -> i32 {
        let base = self.base.at(world_x, world_z);
        let detail = self.detail.at(world_x, world_z);
        let offset = ((base * 0.7 + detail * 0.3) * self.params.height_scale) as i32;
        (self.params.base_height + offset).clamp(1, CHUNK_HEIGHT - 10)
    }

    /// Lake mask value at a world column.
    #[must_use]
    pub fn lake_value_at(&self, world_x: i32, world_z: i32) -> f64 {
        self.lake.at(world_x, world_z)
    }

    /// Rock mask value at a world column.
    #[must_use]
    pub fn rock_value_at(&self, world_x: i32, world_z: i32) -> f64 {
        self.rock.at(world_x, world_z)
    }

    /// True if the column is a frozen lake.
    #[must_use]
    pub fn is_lake(&self, world_x: i32, world_z: i32) -> bool {
        self.lake_value_at(world_x, world_z) < self.params.lake_threshold
    }

    /// True if the column's surface is bare rock.
    #[must_use]
    pub fn is_rocky(&self, world_x: i32, world_z: i32) -> bool {
        self.rock_value_at(world_x, world_z) > self.params.rock_threshold
    }

    /// Y of the ice cap on every lake.
    #[inline]
    #[must_use]
    pub const fn lake_surface(&self) -> i32 {
        self.params.base_height - Self::LAKE_DEPTH
    }

    /// Samples everything pass 1 needs for a column.
    #[must_use]
    pub fn sample_column(&self, world_x: i32, world_z: i32) -> ColumnSample {
        ColumnSample {
            height: self.height_at(world_x, world_z),
            lake: self.is_lake(world_x, world_z),
            rocky: self.is_rocky(world_x, world_z),
        }
    }

    /// Decides whether a pine grows on a column whose surface is at `height`.
    #[must_use]
    pub fn should_place_tree(&self, world_x: i32, world_z: i32, height: i32) -> bool {
        if height + 1 >= CHUNK_HEIGHT || self.is_lake(world_x, world_z) {
            return false;
        }
        let roll: f64 = cell_rng(world_x, world_z, self.seed, salt::TREE).gen();
        self.forest.at(world_x, world_z) > Self::FOREST_THRESHOLD && roll < self.params.tree_density
    }

    /// Ground cover for a dry column without a tree, if any.
    #[must_use]
    pub fn vegetation_at(&self, world_x: i32, world_z: i32) -> Option<BlockKind> {
        let roll: f64 = cell_rng(world_x, world_z, self.seed, salt::VEGETATION).gen();
        if roll < 0.05 {
            Some(BlockKind::BerryBush)
        } else if roll < 0.15 {
            Some(BlockKind::ReindeerLichen)
        } else if roll < 0.25 {
            Some(BlockKind::Moss)
        } else {
            None
        }
    }

    /// Block kind at height `y` of a column.
    #[must_use]
    pub fn column_kind(&self, column: ColumnSample, y: i32) -> BlockKind {
        let lake_surface = self.lake_surface();
        let height = if column.lake {
            column.height.min(lake_surface - 1)
        } else {
            column.height
        };

        if y == 0 {
            BlockKind::Stone
        } else if column.lake && y == lake_surface {
            BlockKind::Ice
        } else if column.lake && y < lake_surface && y > height {
            BlockKind::FrozenWater
        } else if y < height - Self::DIRT_DEPTH {
            BlockKind::Stone
        } else if y < height {
            BlockKind::FrozenDirt
        } else if y == height && !column.lake {
            if column.rocky {
                BlockKind::Stone
            } else {
                BlockKind::Snow
            }
        } else {
            BlockKind::Air
        }
    }

    /// Grows a pine with its trunk base at local `(local_x, base_y, local_z)`.
    ///
    /// Writes are clipped to the chunk; crown cells falling into a
    /// neighboring chunk are dropped. Leaves overwrite whatever is there
    /// except this tree's own trunk.
    pub fn generate_tree(&self, chunk: &mut Chunk, local_x: i32, base_y: i32, local_z: i32) {
        let [world_x, _, world_z] = chunk.local_to_world(local_x, 0, local_z);
        let trunk_height =
            cell_rng(world_x, world_z, self.seed, salt::TRUNK).gen_range(Self::TRUNK_MIN..=Self::TRUNK_MAX);
        let trunk_top = base_y + trunk_height;

        for y in base_y..trunk_top.min(CHUNK_HEIGHT) {
            chunk.set_block_local(local_x, y, local_z, BlockKind::PineLog);
        }

        let leaf_start = base_y + 2;
        let leaf_end = trunk_top + 2;
        let layers = f64::from(leaf_end - leaf_start);

        for y in leaf_start..leaf_end.min(CHUNK_HEIGHT) {
            let progress = f64::from(y - leaf_start) / layers;
            let radius = (Self::CROWN_RADIUS * (1.0 - progress * Self::CROWN_TAPER)) as i32;

            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    if dx * dx + dz * dz > radius * radius + 1 {
                        continue;
                    }
                    if dx == 0 && dz == 0 && y < trunk_top {
                        continue;
                    }
                    chunk.set_block_local(local_x + dx, y, local_z + dz, BlockKind::PineLeaves);
                }
            }
        }

        chunk.set_block_local(local_x, leaf_end, local_z, BlockKind::PineLeaves);
    }

    /// Fills a fresh chunk with terrain and features and marks it generated.
    pub fn generate_chunk(&self, chunk: &mut Chunk) {
        let coord = chunk.coord();
        let (origin_x, origin_z) = (coord.world_x(), coord.world_z());
        let mut columns = [[ColumnSample::default(); CHUNK_SIZE as usize]; CHUNK_SIZE as usize];

        // Pass 1: columns
        for local_z in 0..CHUNK_SIZE {
            for local_x in 0..CHUNK_SIZE {
                let column = self.sample_column(origin_x + local_x, origin_z + local_z);
                columns[local_z as usize][local_x as usize] = column;

                for y in 0..CHUNK_HEIGHT {
                    chunk.set_block_local(local_x, y, local_z, self.column_kind(column, y));
                }
            }
        }

        // Pass 2: features on dry, snowy columns
        let mut trees = 0u32;
        for local_z in 0..CHUNK_SIZE {
            for local_x in 0..CHUNK_SIZE {
                let column = columns[local_z as usize][local_x as usize];
                if column.lake || column.rocky {
                    continue;
                }
                let (world_x, world_z) = (origin_x + local_x, origin_z + local_z);

                if self.should_place_tree(world_x, world_z, column.height) {
                    self.generate_tree(chunk, local_x, column.height + 1, local_z);
                    trees += 1;
                } else if let Some(kind) = self.vegetation_at(world_x, world_z) {
                    chunk.set_block_local(local_x, column.height + 1, local_z, kind);
                }
            }
        }

        chunk.mark_generated();
        trace!(x = coord.x, z = coord.z, trees, "chunk generated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkCoord;

    fn generator() -> TerrainGenerator {
        TerrainGenerator::with_seed(WorldSeed::new(12345))
    }

    fn dry_column(height: i32) -> ColumnSample {
        ColumnSample { height, lake: false, rocky: false }
    }

    #[test]
    fn test_height_is_clamped_and_deterministic() {
        let gen = generator();
        for z in (-300..300).step_by(7) {
            for x in (-300..300).step_by(11) {
                let h = gen.height_at(x, z);
                assert!((1..=CHUNK_HEIGHT - 10).contains(&h), "Height {h} out of range");
                assert_eq!(h, gen.height_at(x, z));
            }
        }
    }

    #[test]
    fn test_extreme_params_still_clamp() {
        let params = TerrainParams { base_height: 1000, ..TerrainParams::default() };
        let gen = TerrainGenerator::new(WorldSeed::new(1), params);
        assert_eq!(gen.height_at(10, 10), CHUNK_HEIGHT - 10);

        let params = TerrainParams { base_height: -1000, ..TerrainParams::default() };
        let gen = TerrainGenerator::new(WorldSeed::new(1), params);
        assert_eq!(gen.height_at(10, 10), 1);
    }

    #[test]
    fn test_dry_column_layers() {
        let gen = generator();
        let column = dry_column(20);
        assert_eq!(gen.column_kind(column, 0), BlockKind::Stone);
        assert_eq!(gen.column_kind(column, 15), BlockKind::Stone);
        assert_eq!(gen.column_kind(column, 16), BlockKind::FrozenDirt);
        assert_eq!(gen.column_kind(column, 19), BlockKind::FrozenDirt);
        assert_eq!(gen.column_kind(column, 20), BlockKind::Snow);
        assert_eq!(gen.column_kind(column, 21), BlockKind::Air);

        let rocky = ColumnSample { rocky: true, ..column };
        assert_eq!(gen.column_kind(rocky, 20), BlockKind::Stone);
    }

    #[test]
    fn test_lake_column_layers() {
        let gen = generator();
        let surface = gen.lake_surface();
        assert_eq!(surface, 17);

        let lake = ColumnSample { height: 25, lake: true, rocky: false };
        // Lake floor is lowered below the ice
        assert_eq!(gen.column_kind(lake, 15), BlockKind::FrozenDirt);
        assert_eq!(gen.column_kind(lake, 16), BlockKind::Air);
        assert_eq!(gen.column_kind(lake, surface), BlockKind::Ice);
        assert_eq!(gen.column_kind(lake, surface + 1), BlockKind::Air);

        let deep = ColumnSample { height: 8, lake: true, rocky: false };
        for y in 9..surface {
            assert_eq!(gen.column_kind(deep, y), BlockKind::FrozenWater);
        }
        assert_eq!(gen.column_kind(deep, surface), BlockKind::Ice);
    }

    #[test]
    fn test_tree_shape() {
        let gen = generator();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        gen.generate_tree(&mut chunk, 8, 10, 8);

        let trunk = (10..CHUNK_HEIGHT)
            .take_while(|&y| chunk.get_block_local(8, y, 8) == BlockKind::PineLog)
            .count() as i32;
        assert!((5..=9).contains(&trunk), "Trunk height {trunk}");

        // Widest crown layer
        assert_eq!(chunk.get_block_local(11, 12, 8), BlockKind::PineLeaves);
        assert_eq!(chunk.get_block_local(8, 12, 11), BlockKind::PineLeaves);
        assert_eq!(chunk.get_block_local(11, 12, 11), BlockKind::Air);
        // Apex cap
        assert_eq!(chunk.get_block_local(8, 10 + trunk + 2, 8), BlockKind::PineLeaves);
        assert_eq!(chunk.get_block_local(8, 10 + trunk + 3, 8), BlockKind::Air);
    }

    #[test]
    fn test_crown_overwrites_terrain_but_not_trunk() {
        let gen = generator();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set_block_local(9, 12, 8, BlockKind::Snow);
        chunk.set_block_local(7, 12, 8, BlockKind::BerryBush);
        chunk.set_block_local(8, 13, 10, BlockKind::PineLog);
        gen.generate_tree(&mut chunk, 8, 10, 8);

        assert_eq!(chunk.get_block_local(9, 12, 8), BlockKind::PineLeaves);
        assert_eq!(chunk.get_block_local(7, 12, 8), BlockKind::PineLeaves);
        assert_eq!(chunk.get_block_local(8, 13, 10), BlockKind::PineLeaves);
        assert_eq!(chunk.get_block_local(8, 12, 8), BlockKind::PineLog);
        assert_eq!(chunk.get_block_local(8, 14, 8), BlockKind::PineLog);
    }

    #[test]
    fn test_tree_same_column_same_trunk() {
        let gen = generator();
        let mut a = Chunk::new(ChunkCoord::new(2, -1));
        let mut b = Chunk::new(ChunkCoord::new(2, -1));
        gen.generate_tree(&mut a, 4, 20, 4);
        gen.generate_tree(&mut b, 4, 20, 4);
        for y in 0..CHUNK_HEIGHT {
            assert_eq!(a.get_block_local(4, y, 4), b.get_block_local(4, y, 4));
        }
    }

    #[test]
    fn test_tree_at_edges_stays_in_bounds() {
        let gen = generator();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        gen.generate_tree(&mut chunk, 0, 55, 15);
        assert_eq!(chunk.get_block_local(0, 59, 15), BlockKind::PineLog);
        assert_eq!(chunk.get_block_local(1, 57, 15), BlockKind::PineLeaves);
        assert_eq!(chunk.get_block_local(0, 57, 14), BlockKind::PineLeaves);
    }

    #[test]
    fn test_vegetation_distribution() {
        let gen = generator();
        let mut covered = 0;
        for x in 0..2000 {
            if gen.vegetation_at(x, 7).is_some() {
                covered += 1;
            }
        }
        // 25% expected
        assert!((350..650).contains(&covered), "Vegetation count {covered}");
    }

    #[test]
    fn test_generate_chunk_marks_generated() {
        let gen = generator();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        gen.generate_chunk(&mut chunk);

        assert!(chunk.is_generated());
        assert!(!chunk.is_meshed());
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                assert_eq!(chunk.get_block_local(x, 0, z), BlockKind::Stone, "Bedrock at ({x}, {z})");
            }
        }
    }

    #[test]
    fn test_generate_chunk_surface_matches_columns() {
        let gen = generator();
        let coord = ChunkCoord::new(3, -2);
        let mut chunk = Chunk::new(coord);
        gen.generate_chunk(&mut chunk);

        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let column = gen.sample_column(coord.world_x() + x, coord.world_z() + z);
                let (y, expected) = if column.lake {
                    (gen.lake_surface(), BlockKind::Ice)
                } else if column.rocky {
                    (column.height, BlockKind::Stone)
                } else {
                    (column.height, BlockKind::Snow)
                };
                // A neighbor's crown may cover the surface
                let found = chunk.get_block_local(x, y, z);
                assert!(found == expected || found == BlockKind::PineLeaves, "{found:?} at ({x}, {z})");
            }
        }
    }

    #[test]
    fn test_no_trees_on_lakes() {
        let gen = generator();
        for z in (-400..400).step_by(3) {
            for x in (-400..400).step_by(5) {
                if gen.is_lake(x, z) {
                    assert!(!gen.should_place_tree(x, z, gen.height_at(x, z)));
                }
            }
        }
    }
}
