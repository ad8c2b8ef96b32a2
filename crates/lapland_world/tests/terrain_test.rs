//! # Terrain Integration Test
//!
//! Generation is a pure function of seed and coordinates, and the generated
//! surface looks like a taiga.

use lapland_world::{
    BlockKind, Chunk, ChunkCoord, ChunkStore, TerrainGenerator, WorldSeed, CHUNK_HEIGHT, CHUNK_SIZE,
};

fn generate(gen: &TerrainGenerator, coord: ChunkCoord) -> Chunk {
    let mut chunk = Chunk::new(coord);
    gen.generate_chunk(&mut chunk);
    chunk
}

fn same_blocks(a: &Chunk, b: &Chunk) -> bool {
    (0..CHUNK_HEIGHT).all(|y| {
        (0..CHUNK_SIZE).all(|z| (0..CHUNK_SIZE).all(|x| a.get_block_local(x, y, z) == b.get_block_local(x, y, z)))
    })
}

/// Test: Queries repeat exactly across generator instances.
#[test]
fn test_queries_are_deterministic() {
    let a = TerrainGenerator::with_seed(WorldSeed::new(12345));
    let b = TerrainGenerator::with_seed(WorldSeed::new(12345));

    for i in -50..50 {
        let (x, z) = (i * 37, i * -11);
        assert_eq!(a.height_at(x, z), b.height_at(x, z));
        assert_eq!(a.lake_value_at(x, z), b.lake_value_at(x, z));
        assert_eq!(a.rock_value_at(x, z), b.rock_value_at(x, z));
    }
}

/// Test: A chunk's blocks do not depend on what was generated before it.
#[test]
fn test_generation_is_order_independent() {
    let target = ChunkCoord::new(3, -2);

    let fresh = TerrainGenerator::with_seed(WorldSeed::new(12345));
    let first = generate(&fresh, target);

    let busy = TerrainGenerator::with_seed(WorldSeed::new(12345));
    for coord in [ChunkCoord::new(4, -2), ChunkCoord::new(-9, 7), ChunkCoord::new(3, -1)] {
        generate(&busy, coord);
    }
    let second = generate(&busy, target);

    assert!(same_blocks(&first, &second));
}

/// Test: Streaming in different orders yields the same blocks.
#[test]
fn test_store_load_order_independent() {
    let mut direct = ChunkStore::new(TerrainGenerator::with_seed(WorldSeed::new(12345)), 1);
    direct.update_chunks(40.0, 40.0);

    let mut wandering = ChunkStore::new(TerrainGenerator::with_seed(WorldSeed::new(12345)), 1);
    wandering.update_chunks(-100.0, 300.0);
    wandering.update_chunks(20.0, 60.0);
    wandering.update_chunks(40.0, 40.0);

    for x in 16..48 {
        for z in 16..48 {
            for y in 0..CHUNK_HEIGHT {
                assert_eq!(direct.block_at(x, y, z), wandering.block_at(x, y, z), "At ({x}, {y}, {z})");
            }
        }
    }
}

/// Test: Different seeds produce different landscapes.
#[test]
fn test_seeds_differ() {
    let a = TerrainGenerator::with_seed(WorldSeed::new(12345));
    let b = TerrainGenerator::with_seed(WorldSeed::new(54321));
    let differs = (0..200).any(|i| a.height_at(i * 7, i * 3) != b.height_at(i * 7, i * 3));
    assert!(differs);
}

/// Test: Every column has bedrock and a taiga surface, possibly under a crown.
#[test]
fn test_surface_materials() {
    let gen = TerrainGenerator::with_seed(WorldSeed::new(12345));

    for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-5, 2), ChunkCoord::new(12, -12)] {
        let chunk = generate(&gen, coord);
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                assert_eq!(chunk.get_block_local(x, 0, z), BlockKind::Stone);

                let [wx, _, wz] = chunk.local_to_world(x, 0, z);
                let surface = if gen.is_lake(wx, wz) {
                    chunk.get_block_local(x, gen.lake_surface(), z)
                } else {
                    chunk.get_block_local(x, gen.height_at(wx, wz), z)
                };
                assert!(
                    matches!(surface, BlockKind::Snow | BlockKind::Stone | BlockKind::Ice | BlockKind::PineLeaves),
                    "Surface {surface:?} at ({wx}, {wz})"
                );
            }
        }
    }
}

/// Test: Spawn is above the terrain at the origin.
#[test]
fn test_spawn_above_surface() {
    let store = ChunkStore::new(TerrainGenerator::with_seed(WorldSeed::new(12345)), 0);
    let height = store.generator().height_at(0, 0);
    let [x, y, z] = store.spawn_point();

    assert_eq!([x, y, z], [0, height + 5, 0]);
    let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
    store.generator().generate_chunk(&mut chunk);
    for above in height + 1..CHUNK_HEIGHT {
        let kind = chunk.get_block_local(0, above, 0);
        assert!(
            !matches!(kind, BlockKind::Snow | BlockKind::FrozenDirt | BlockKind::Stone),
            "Terrain {kind:?} above surface at y={above}"
        );
    }
    assert!(y > height);
}
