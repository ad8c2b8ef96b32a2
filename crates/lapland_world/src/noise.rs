//! # Noise and Per-Cell Randomness
//!
//! Two sources of procedural variation, both pure functions of the world seed:
//!
//! - [`SimplexNoise`] / [`NoiseLayer`]: smooth coherent fields for terrain
//!   height, lakes, rocks and forest density.
//! - [`cell_rng`]: an independent pseudo-random stream per world column,
//!   seeded only from `(world_x, world_z, seed, salt)`.
//!
//! Nothing here keeps ambient RNG state, so a chunk generates the same blocks
//! no matter which chunks were generated before it.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// World seed for deterministic generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Seed used when none is configured.
    pub const DEFAULT: u64 = 12_345;

    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for one noise channel.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// 12 gradient directions for 2D simplex.
const GRADIENTS: [[i8; 2]; 12] = [
    [1, 0], [1, 1], [0, 1], [-1, 1],
    [-1, 0], [-1, -1], [0, -1], [1, -1],
    [1, 0], [0, 1], [-1, 0], [0, -1],
];

/// Seeded permutation, doubled to 512 entries so lookups never wrap.
struct PermutationTable {
    perm: [u8; 512],
}

impl PermutationTable {
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates driven by xorshift64
        let mut state = seed.value() | 1;
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        let (low, high) = perm.split_at_mut(256);
        high.copy_from_slice(low);

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> usize {
        self.perm[index & 511] as usize
    }
}

/// 2D simplex noise with values in `[-1, 1]`.
pub struct SimplexNoise {
    table: PermutationTable,
}

impl SimplexNoise {
    /// Skew factor, (sqrt(3) - 1) / 2.
    const F2: f64 = 0.366_025_403_784_439;
    /// Unskew factor, (3 - sqrt(3)) / 6.
    const G2: f64 = 0.211_324_865_405_187;

    /// Creates a generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            table: PermutationTable::new(seed),
        }
    }

    /// Samples the field at `(x, y)`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = (i + j) as f64 * Self::G2;
        let x0 = x - (i as f64 - unskew);
        let y0 = y - (j as f64 - unskew);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1 as u8) + Self::G2;
        let y1 = y0 - f64::from(j1 as u8) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let g0 = self.table.get(ii + self.table.get(jj));
        let g1 = self.table.get(ii + i1 + self.table.get(jj + j1));
        let g2 = self.table.get(ii + 1 + self.table.get(jj + 1));

        70.0 * (corner(x0, y0, g0) + corner(x1, y1, g1) + corner(x2, y2, g2))
    }

    /// Fractal sum of `octaves` layers, normalized back to roughly `[-1, 1]`.
    #[must_use]
    pub fn octaved(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves.max(1) {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_amplitude
    }
}

#[inline]
fn corner(x: f64, y: f64, hash: usize) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        return 0.0;
    }
    let grad = GRADIENTS[hash % 12];
    let t2 = t * t;
    t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
}

#[inline]
fn fast_floor(x: f64) -> i64 {
    let xi = x as i64;
    if x < xi as f64 { xi - 1 } else { xi }
}

/// One octaved noise channel sampled at world block coordinates.
pub struct NoiseLayer {
    noise: SimplexNoise,
    frequency: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
}

impl NoiseLayer {
    /// Creates a channel with its own sub-seed.
    #[must_use]
    pub fn new(seed: WorldSeed, channel: u64, frequency: f64, octaves: u32, persistence: f64) -> Self {
        Self {
            noise: SimplexNoise::new(seed.derive(channel)),
            frequency,
            octaves,
            persistence,
            lacunarity: 2.0,
        }
    }

    /// Samples the channel at a world column.
    #[inline]
    #[must_use]
    pub fn at(&self, world_x: i32, world_z: i32) -> f64 {
        self.noise.octaved(
            f64::from(world_x) * self.frequency,
            f64::from(world_z) * self.frequency,
            self.octaves,
            self.persistence,
            self.lacunarity,
        )
    }
}

/// Mixes a world column, the world seed and a purpose salt into one seed.
///
/// The column hash matches the classic spatial-hash primes so neighbouring
/// columns land far apart before the splitmix finalizer.
#[inline]
#[must_use]
pub const fn cell_seed(world_x: i32, world_z: i32, seed: WorldSeed, salt: u64) -> u64 {
    let column = (world_x as i64).wrapping_mul(73_856_093) ^ (world_z as i64).wrapping_mul(19_349_663);
    splitmix64(column as u64 ^ seed.value() ^ salt.wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

/// Returns a fresh RNG for one world column and purpose.
#[inline]
#[must_use]
pub fn cell_rng(world_x: i32, world_z: i32, seed: WorldSeed, salt: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(cell_seed(world_x, world_z, seed, salt))
}

#[inline]
const fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
