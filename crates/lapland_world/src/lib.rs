//! # Lapland World
//!
//! Procedural voxel world of the Lapland taiga: snowy hills, frozen lakes,
//! rocky outcrops and pine forest, streamed in chunks around an observer.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world, in any
//!    chunk load order
//! 2. **Chunked**: 16x64x16 vertical slabs, generated and dropped independently
//! 3. **Renderer-agnostic**: Chunks publish visible instances and a change log;
//!    drawing them is someone else's job
//! 4. **Infallible queries**: Out-of-range reads are AIR, writes are dropped
//!
//! ## Core Components
//!
//! - `BlockKind` / `BlockProperties`: the static block catalog
//! - `TerrainGenerator`: noise-driven terrain, lakes, rocks, trees, vegetation
//! - `Chunk`: flat block grid plus face-culled instances
//! - `ChunkStore`: render-distance streaming and world-coordinate routing
//!
//! ## Example
//!
//! ```rust
//! use lapland_world::{BlockKind, ChunkStore, WorldConfig};
//!
//! let config = WorldConfig { render_distance: 1, ..WorldConfig::default() };
//! let mut store = ChunkStore::from_config(&config);
//!
//! store.update_chunks(0.0, 0.0);
//! assert_eq!(store.chunk_count(), 9);
//! assert_eq!(store.block_at(0, 0, 0), BlockKind::Stone);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod chunk;
pub mod chunk_store;
pub mod config;
pub mod error;
pub mod instance;
pub mod interaction;
pub mod noise;
pub mod terrain;

pub use block::{BlockKind, BlockProperties};
pub use chunk::{Chunk, ChunkCoord, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME};
pub use chunk_store::{ChunkStore, StreamingReport, WorldStats};
pub use config::{WorldConfig, MAX_RENDER_DISTANCE};
pub use error::{WorldError, WorldResult};
pub use instance::{BlockInstance, ChangeLog, InstanceChange, InstanceRaw};
pub use interaction::BlockHit;
pub use noise::{SimplexNoise, WorldSeed};
pub use terrain::{TerrainGenerator, TerrainParams};
