use bevy::prelude::*;

use crate::config::WorldConfig;

/// Column coordinate of a chunk. Chunks have unbounded height, so only X/Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn distance_squared(&self, other: &ChunkCoord) -> i32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// The four chunks sharing a face with this one
    pub fn neighbors(&self) -> [ChunkCoord; 4] {
        [
            ChunkCoord::new(self.x - 1, self.z),
            ChunkCoord::new(self.x + 1, self.z),
            ChunkCoord::new(self.x, self.z - 1),
            ChunkCoord::new(self.x, self.z + 1),
        ]
    }
}

/// Maps between world units, world block positions and (chunk, local) pairs.
///
/// A world block position is an integer cell index; its world-space origin is
/// `block * block_size`. Local positions keep `y` unchanged because chunks
/// are columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkLayout {
    pub width: i32,
    pub depth: i32,
    pub block_size: f32,
}

impl ChunkLayout {
    pub fn new(width: i32, depth: i32, block_size: f32) -> Self {
        Self { width, depth, block_size }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.chunk_width, config.chunk_depth, config.block_size)
    }

    /// Chunk owning a world block position
    pub fn chunk_of(&self, block: IVec3) -> ChunkCoord {
        ChunkCoord::new(block.x.div_euclid(self.width), block.z.div_euclid(self.depth))
    }

    /// Position of a world block inside its owning chunk
    pub fn local_of(&self, block: IVec3) -> IVec3 {
        IVec3::new(block.x.rem_euclid(self.width), block.y, block.z.rem_euclid(self.depth))
    }

    pub fn to_world_block(&self, coord: ChunkCoord, local: IVec3) -> IVec3 {
        IVec3::new(coord.x * self.width + local.x, local.y, coord.z * self.depth + local.z)
    }

    /// Block cell containing a point in world units
    pub fn block_at(&self, world: Vec3) -> IVec3 {
        (world / self.block_size).floor().as_ivec3()
    }

    /// Minimum corner of a block in world units
    pub fn block_origin(&self, block: IVec3) -> Vec3 {
        block.as_vec3() * self.block_size
    }

    pub fn chunk_origin(&self, coord: ChunkCoord) -> Vec3 {
        Vec3::new(
            (coord.x * self.width) as f32 * self.block_size,
            0.0,
            (coord.z * self.depth) as f32 * self.block_size,
        )
    }

    pub fn chunk_at(&self, world: Vec3) -> ChunkCoord {
        self.chunk_of(self.block_at(world))
    }

    /// Whether a local position lies on the chunk's horizontal footprint
    pub fn contains_local(&self, local: IVec3) -> bool {
        (0..self.width).contains(&local.x) && (0..self.depth).contains(&local.z)
    }
}
