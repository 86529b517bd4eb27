use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::chunk::Chunk;
use super::coord::{ChunkCoord, ChunkLayout};
use super::gradient::GradientNoise;
use crate::blocks::BlockType;
use crate::config::{GenerationMode, TerrainConfig, WorldConfig};

/// Horizontal reach of a tree's leaf cap from its trunk
const LEAF_RADIUS: i32 = 2;

/// Blocks per unit of noise input
const HILL_SCALE: f64 = 64.0;

/// Fills chunks with terrain. Output depends only on the seed, the mode and
/// the chunk coordinate, so chunks can be generated in any order and peers
/// sharing a seed agree without exchanging terrain.
#[derive(Clone)]
pub struct TerrainGenerator {
    mode: GenerationMode,
    seed: u32,
    noise: GradientNoise,
    config: TerrainConfig,
    layout: ChunkLayout,
}

impl TerrainGenerator {
    pub fn new(mode: GenerationMode, seed: u32, config: TerrainConfig, layout: ChunkLayout) -> Self {
        Self {
            mode,
            seed,
            noise: GradientNoise::new(seed),
            config,
            layout,
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(
            config.generation,
            config.seed,
            config.terrain.clone(),
            ChunkLayout::from_config(config),
        )
    }

    /// Y of the top terrain block in a world column (trees excluded)
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        match self.mode {
            GenerationMode::Flat => self.config.flat_height,
            GenerationMode::Natural => self.natural_height(world_x, world_z),
        }
    }

    /// Broad hills with finer octaves layered on by the fractal noise
    fn natural_height(&self, world_x: i32, world_z: i32) -> i32 {
        let x = world_x as f64 / HILL_SCALE;
        let z = world_z as f64 / HILL_SCALE;

        let offset = self.noise.sample(x, 0.5, z) * self.config.amplitude;
        let height = self.config.base_height as f64 + offset;
        (height.round() as i32).clamp(self.config.min_height, self.config.max_height)
    }

    pub fn generate(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);

        for lz in 0..self.layout.depth {
            for lx in 0..self.layout.width {
                let world = self.layout.to_world_block(coord, IVec3::new(lx, 0, lz));
                let height = self.surface_height(world.x, world.z);
                self.fill_column(&mut chunk, lx, lz, height);
            }
        }

        if self.mode == GenerationMode::Natural {
            self.plant_trees(&mut chunk);
        }

        chunk
    }

    fn fill_column(&self, chunk: &mut Chunk, lx: i32, lz: i32, height: i32) {
        let sea_level = self.config.sea_level;
        let underwater = self.mode == GenerationMode::Natural && height < sea_level;

        for y in 0..=height {
            let depth = height - y;
            let block = if y == 0 {
                // Hard floor under everything
                BlockType::Obsidian
            } else if underwater {
                if depth <= 3 { BlockType::Sand } else { BlockType::Stone }
            } else if depth == 0 {
                BlockType::Grass
            } else if depth <= 3 || self.mode == GenerationMode::Flat {
                BlockType::Dirt
            } else {
                BlockType::Stone
            };
            chunk.set_block(IVec3::new(lx, y, lz), block);
        }

        if underwater {
            for y in (height + 1)..=sea_level {
                chunk.set_block(IVec3::new(lx, y, lz), BlockType::Water);
            }
        }
    }

    /// Per-chunk RNG derived from the seed and coordinate only
    fn chunk_rng(&self, coord: ChunkCoord) -> StdRng {
        let mixed = (self.seed as u64)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (coord.x as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
            ^ (coord.z as i64 as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
        StdRng::seed_from_u64(mixed)
    }

    fn plant_trees(&self, chunk: &mut Chunk) {
        let mut rng = self.chunk_rng(chunk.coord);
        let mut trees = Vec::new();

        for lz in 0..self.layout.depth {
            for lx in 0..self.layout.width {
                // Roll for every column so the sequence never depends on terrain
                let roll: f64 = rng.gen();
                let trunk_height: i32 = rng.gen_range(4..=5);

                let interior = lx >= LEAF_RADIUS
                    && lx < self.layout.width - LEAF_RADIUS
                    && lz >= LEAF_RADIUS
                    && lz < self.layout.depth - LEAF_RADIUS;
                if !interior || roll >= self.config.tree_chance {
                    continue;
                }

                let Some(ground) = chunk.get_height_at(lx, lz) else {
                    continue;
                };
                if chunk.get_block(IVec3::new(lx, ground, lz)) != BlockType::Grass {
                    continue;
                }
                trees.push((IVec3::new(lx, ground + 1, lz), trunk_height));
            }
        }

        for &(base, trunk_height) in &trees {
            for dy in 0..trunk_height {
                chunk.set_block(base + IVec3::Y * dy, BlockType::Wood);
            }
        }

        // Leaves fill air only, so trunks stay intact where caps overlap
        for &(base, trunk_height) in &trees {
            let top = base.y + trunk_height - 1;
            for y in (top - 1)..=(top + 1) {
                let radius = if y > top { 1 } else { LEAF_RADIUS };
                for dz in -radius..=radius {
                    for dx in -radius..=radius {
                        if radius == LEAF_RADIUS && dx.abs() == radius && dz.abs() == radius {
                            continue;
                        }
                        let pos = IVec3::new(base.x + dx, y, base.z + dz);
                        if chunk.get_block(pos).is_air() {
                            chunk.set_block(pos, BlockType::Leaves);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(mode: GenerationMode, seed: u32) -> TerrainGenerator {
        let config = TerrainConfig {
            tree_chance: 0.05,
            ..TerrainConfig::default()
        };
        TerrainGenerator::new(mode, seed, config, ChunkLayout::new(16, 16, 1.0))
    }

    #[test]
    fn test_same_coordinate_same_blocks() {
        let generator = generator(GenerationMode::Natural, 42);
        let coord = ChunkCoord::new(3, -2);

        // Generate other chunks in between to prove order independence
        let first = generator.generate(coord).sorted_blocks();
        generator.generate(ChunkCoord::new(0, 0));
        generator.generate(ChunkCoord::new(-7, 9));
        let second = generator.generate(coord).sorted_blocks();

        assert!(!first.is_empty());
        assert_eq!(first, second);

        let clone = generator.clone().generate(coord).sorted_blocks();
        assert_eq!(first, clone);
    }

    #[test]
    fn test_seed_changes_terrain() {
        let a = generator(GenerationMode::Natural, 1).generate(ChunkCoord::new(0, 0));
        let b = generator(GenerationMode::Natural, 2).generate(ChunkCoord::new(0, 0));
        assert_ne!(a.sorted_blocks(), b.sorted_blocks());
    }

    #[test]
    fn test_column_layers() {
        let generator = generator(GenerationMode::Natural, 42);
        let chunk = generator.generate(ChunkCoord::new(0, 0));
        let config = TerrainConfig::default();

        for lz in 0..16 {
            for lx in 0..16 {
                let height = generator.surface_height(lx, lz);
                assert!((config.min_height..=config.max_height).contains(&height));
                assert_eq!(chunk.get_block(IVec3::new(lx, 0, lz)), BlockType::Obsidian);

                let top = chunk.get_block(IVec3::new(lx, height, lz));
                if height < config.sea_level {
                    assert_eq!(top, BlockType::Sand);
                    assert_eq!(
                        chunk.get_block(IVec3::new(lx, config.sea_level, lz)),
                        BlockType::Water
                    );
                } else {
                    assert_eq!(top, BlockType::Grass);
                    assert_eq!(chunk.get_block(IVec3::new(lx, height - 1, lz)), BlockType::Dirt);
                    assert_eq!(chunk.get_block(IVec3::new(lx, height - 4, lz)), BlockType::Stone);
                }
            }
        }
    }

    #[test]
    fn test_trees_stay_inside_chunk() {
        let generator = generator(GenerationMode::Natural, 42);
        let mut found_tree = false;

        for cx in -3..3 {
            for cz in -3..3 {
                let chunk = generator.generate(ChunkCoord::new(cx, cz));
                for (pos, block) in chunk.iter_blocks() {
                    assert!((0..16).contains(&pos.x) && (0..16).contains(&pos.z));
                    if block == BlockType::Wood {
                        found_tree = true;
                        assert!((LEAF_RADIUS..16 - LEAF_RADIUS).contains(&pos.x));
                        assert!((LEAF_RADIUS..16 - LEAF_RADIUS).contains(&pos.z));
                    }
                }
            }
        }
        assert!(found_tree);
    }

    #[test]
    fn test_flat_preset_identical_everywhere() {
        let generator = generator(GenerationMode::Flat, 42);
        let a = generator.generate(ChunkCoord::new(0, 0)).sorted_blocks();
        let b = generator.generate(ChunkCoord::new(-5, 12)).sorted_blocks();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16 * 16 * 4);

        let chunk = generator.generate(ChunkCoord::new(1, 1));
        assert_eq!(chunk.get_block(IVec3::new(4, 0, 4)), BlockType::Obsidian);
        assert_eq!(chunk.get_block(IVec3::new(4, 1, 4)), BlockType::Dirt);
        assert_eq!(chunk.get_block(IVec3::new(4, 2, 4)), BlockType::Dirt);
        assert_eq!(chunk.get_block(IVec3::new(4, 3, 4)), BlockType::Grass);
        assert_eq!(chunk.get_block(IVec3::new(4, 4, 4)), BlockType::Air);
    }
}
