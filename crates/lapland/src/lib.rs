//! # Lapland
//!
//! Frame driver for the Lapland taiga world.
//!
//! ```text
//! Frame N:
//! ┌──────────────────────────────────────────────────────────┐
//! │ 1. OBSERVER    movement controller hands in (x, y, z)    │
//! │ 2. STREAMING   ChunkStore::update_chunks around (x, z)   │
//! │ 3. EDITS       zero or more break/place from raycasts    │
//! │ 4. RENDER FEED drain the instance change log             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on one thread; a frame is one [`Session::tick`] followed
//! by any number of edits.

use std::time::{Duration, Instant};

use lapland_world::{
    BlockHit, BlockKind, ChunkStore, InstanceChange, StreamingReport, WorldConfig, WorldStats,
};
use tracing::{debug, warn};

/// Frame budget at 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// What one frame produced.
#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Streaming outcome.
    pub streaming: StreamingReport,
    /// Instance changes for the renderer, in order.
    pub changes: Vec<InstanceChange>,
    /// Time spent in the tick.
    pub elapsed: Duration,
}

/// One observer walking one world.
pub struct Session {
    store: ChunkStore,
    position: [f64; 3],
    selected: BlockKind,
    frame: u64,
}

impl Session {
    /// Creates a session with the observer at the world's spawn point.
    ///
    /// No chunk is loaded until the first [`Session::tick`].
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        let store = ChunkStore::from_config(config);
        let [x, y, z] = store.spawn_point();
        Self {
            store,
            position: [f64::from(x), f64::from(y), f64::from(z)],
            selected: BlockKind::Snow,
            frame: 0,
        }
    }

    /// Observer position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> [f64; 3] {
        self.position
    }

    /// Kind placed by [`Session::place_block`].
    #[inline]
    #[must_use]
    pub const fn selected(&self) -> BlockKind {
        self.selected
    }

    /// Read access to the world.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Advances one frame with the observer at `(x, y, z)`.
    pub fn tick(&mut self, x: f64, y: f64, z: f64) -> FrameReport {
        let start = Instant::now();
        self.frame += 1;
        self.position = [x, y, z];

        let streaming = self.store.update_chunks(x, z);
        let changes = self.store.take_instance_changes();
        let elapsed = start.elapsed();

        if elapsed > TARGET_FRAME_TIME && !streaming.is_noop() {
            warn!(
                frame = self.frame,
                loaded = streaming.loaded,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "streaming exceeded frame budget"
            );
        }

        FrameReport {
            frame: self.frame,
            streaming,
            changes,
            elapsed,
        }
    }

    /// Selects a hotbar slot (1-9). Returns false and keeps the current kind
    /// for any other slot.
    pub fn select_slot(&mut self, slot: u8) -> bool {
        match BlockKind::from_hotbar_slot(slot) {
            Some(kind) => {
                self.selected = kind;
                debug!(slot, ?kind, "hotbar slot selected");
                true
            }
            None => false,
        }
    }

    /// Breaks the block under a raycast hit.
    pub fn break_block(&mut self, hit: BlockHit) -> Option<BlockKind> {
        self.store.break_block(hit)
    }

    /// Places the selected kind against a raycast hit.
    pub fn place_block(&mut self, hit: BlockHit) -> bool {
        self.store.place_block(hit, self.selected)
    }

    /// Drains instance changes made by edits since the last tick.
    pub fn take_instance_changes(&mut self) -> Vec<InstanceChange> {
        self.store.take_instance_changes()
    }

    /// World counters.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        self.store.stats()
    }

    /// One-line debug overlay.
    #[must_use]
    pub fn debug_line(&self) -> String {
        let [x, y, z] = self.position;
        let stats = self.store.stats();
        format!(
            "Pos: ({x:.1}, {y:.1}, {z:.1}) | Chunks: {} | Instances: {} | Block: {}",
            stats.loaded_chunks,
            stats.visible_instances,
            self.selected.properties().display_name
        )
    }
}
