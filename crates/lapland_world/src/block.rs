//! # Block Catalog
//!
//! Static table of every block kind in the Lapland taiga and its physical
//! properties.
//!
//! Block kinds are stored in chunks as their `u8` code. Decoding a code is
//! total: anything unknown reads back as [`BlockKind::Air`], and looking up
//! properties for it yields AIR's properties. No lookup can fail.

/// All block kinds in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BlockKind {
    /// Empty space.
    #[default]
    Air = 0,
    /// Surface snow layer.
    Snow = 1,
    /// Permafrost below the surface.
    FrozenDirt = 2,
    /// Bedrock, deep stone and rocky outcrops.
    Stone = 3,
    /// Pine trunk.
    PineLog = 4,
    /// Pine needles.
    PineLeaves = 5,
    /// Frozen lake cap.
    Ice = 6,
    /// Water trapped under lake ice.
    FrozenWater = 7,
    /// Moss patch.
    Moss = 8,
    /// Lingonberry bush.
    BerryBush = 9,
    /// Reindeer lichen tuft.
    ReindeerLichen = 10,
}

impl BlockKind {
    /// Number of block kinds.
    pub const COUNT: usize = 11;

    /// Every kind in code order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Air,
        Self::Snow,
        Self::FrozenDirt,
        Self::Stone,
        Self::PineLog,
        Self::PineLeaves,
        Self::Ice,
        Self::FrozenWater,
        Self::Moss,
        Self::BerryBush,
        Self::ReindeerLichen,
    ];

    /// Placeable kinds in hotbar order (slot 1 first).
    pub const HOTBAR: [Self; 9] = [
        Self::Snow,
        Self::FrozenDirt,
        Self::Stone,
        Self::PineLog,
        Self::PineLeaves,
        Self::Ice,
        Self::Moss,
        Self::BerryBush,
        Self::ReindeerLichen,
    ];

    /// Decodes a stored block code. Unknown codes decode to AIR.
    #[inline]
    #[must_use]
    pub const fn from_u8(code: u8) -> Self {
        match code {
            1 => Self::Snow,
            2 => Self::FrozenDirt,
            3 => Self::Stone,
            4 => Self::PineLog,
            5 => Self::PineLeaves,
            6 => Self::Ice,
            7 => Self::FrozenWater,
            8 => Self::Moss,
            9 => Self::BerryBush,
            10 => Self::ReindeerLichen,
            _ => Self::Air,
        }
    }

    /// Returns the storage code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true for AIR.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Returns the kind bound to a hotbar slot (1-9).
    #[must_use]
    pub const fn from_hotbar_slot(slot: u8) -> Option<Self> {
        if matches!(slot, 1..=9) {
            Some(Self::HOTBAR[(slot - 1) as usize])
        } else {
            None
        }
    }

    /// Returns this kind's catalog entry.
    #[inline]
    #[must_use]
    pub fn properties(self) -> &'static BlockProperties {
        properties_of(self)
    }
}

/// Physical and visual properties of a block kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockProperties {
    /// Human readable name.
    pub display_name: &'static str,
    /// Participates in collision.
    pub solid: bool,
    /// Does not hide the faces of neighboring blocks.
    pub transparent: bool,
    /// Can be broken by the player.
    pub breakable: bool,
    /// RGBA tint handed to the renderer.
    pub color: [f32; 4],
}

/// The catalog, indexed by block code.
static CATALOG: [BlockProperties; BlockKind::COUNT] = [
    BlockProperties {
        display_name: "Air",
        solid: false,
        transparent: true,
        breakable: false,
        color: [0.0, 0.0, 0.0, 0.0],
    },
    BlockProperties {
        display_name: "Snow",
        solid: true,
        transparent: false,
        breakable: true,
        color: [0.95, 0.95, 1.0, 1.0],
    },
    BlockProperties {
        display_name: "Frozen Dirt",
        solid: true,
        transparent: false,
        breakable: true,
        color: [0.35, 0.25, 0.2, 1.0],
    },
    BlockProperties {
        display_name: "Stone",
        solid: true,
        transparent: false,
        breakable: true,
        color: [0.5, 0.5, 0.55, 1.0],
    },
    BlockProperties {
        display_name: "Pine Log",
        solid: true,
        transparent: false,
        breakable: true,
        color: [0.4, 0.25, 0.15, 1.0],
    },
    BlockProperties {
        display_name: "Pine Leaves",
        solid: true,
        transparent: true,
        breakable: true,
        color: [0.1, 0.35, 0.15, 0.9],
    },
    BlockProperties {
        display_name: "Ice",
        solid: true,
        transparent: true,
        breakable: true,
        color: [0.7, 0.85, 1.0, 0.7],
    },
    BlockProperties {
        display_name: "Frozen Water",
        solid: false,
        transparent: true,
        breakable: true,
        color: [0.4, 0.6, 0.9, 0.6],
    },
    BlockProperties {
        display_name: "Moss",
        solid: true,
        transparent: false,
        breakable: true,
        color: [0.3, 0.45, 0.25, 1.0],
    },
    BlockProperties {
        display_name: "Berry Bush",
        solid: false,
        transparent: true,
        breakable: true,
        color: [0.2, 0.4, 0.2, 0.8],
    },
    BlockProperties {
        display_name: "Reindeer Lichen",
        solid: false,
        transparent: true,
        breakable: true,
        color: [0.8, 0.85, 0.75, 0.9],
    },
];

/// Returns the catalog entry for a kind.
#[inline]
#[must_use]
pub fn properties_of(kind: BlockKind) -> &'static BlockProperties {
    &CATALOG[kind as usize]
}

/// Returns the catalog entry for a raw block code, falling back to AIR.
#[inline]
#[must_use]
pub fn properties_of_code(code: u8) -> &'static BlockProperties {
    properties_of(BlockKind::from_u8(code))
}

/// Returns true if the kind participates in collision.
#[inline]
#[must_use]
pub fn is_solid(kind: BlockKind) -> bool {
    properties_of(kind).solid
}

/// Returns true if the kind does not occlude neighboring faces.
#[inline]
#[must_use]
pub fn is_transparent(kind: BlockKind) -> bool {
    properties_of(kind).transparent
}
