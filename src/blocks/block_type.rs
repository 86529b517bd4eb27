use serde::{Deserialize, Serialize};

/// Every block the world knows about. Air is the absence of a block and is
/// never stored in a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Air,
    Grass,
    Dirt,
    Stone,
    Wood,
    Leaves,
    Sand,
    Water,
    Obsidian,
}

impl BlockType {
    pub const ALL: [BlockType; 9] = [
        BlockType::Air,
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::Wood,
        BlockType::Leaves,
        BlockType::Sand,
        BlockType::Water,
        BlockType::Obsidian,
    ];

    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }
}

/// Which face of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFace {
    Top,
    Bottom,
    North,
    South,
    East,
    West,
}

impl BlockFace {
    pub const ALL: [BlockFace; 6] = [
        BlockFace::Top,
        BlockFace::Bottom,
        BlockFace::North,
        BlockFace::South,
        BlockFace::East,
        BlockFace::West,
    ];

    /// Outward unit normal in block-grid space (north is -Z, east is +X)
    pub fn normal(self) -> [i32; 3] {
        match self {
            BlockFace::Top => [0, 1, 0],
            BlockFace::Bottom => [0, -1, 0],
            BlockFace::North => [0, 0, -1],
            BlockFace::South => [0, 0, 1],
            BlockFace::East => [1, 0, 0],
            BlockFace::West => [-1, 0, 0],
        }
    }
}

/// Properties of a block type
#[derive(Debug, Clone)]
pub struct BlockProperties {
    /// Unique identifier (e.g. "core:stone")
    pub id: String,
    pub name: String,
    /// Whether the observer collides with this block
    pub is_solid: bool,
    /// Whether this block fully hides the faces of its neighbors
    pub is_opaque: bool,
    /// Linear RGBA base color, shaded per face by the mesh builder
    pub color: [f32; 4],
}

/// A registered block: its enum tag plus rendering and collision properties
#[derive(Debug, Clone)]
pub struct BlockDefinition {
    pub block: BlockType,
    pub properties: BlockProperties,
}

impl BlockDefinition {
    /// Builder pattern for creating block definitions
    pub fn builder(block: BlockType, id: &str, name: &str) -> BlockDefinitionBuilder {
        BlockDefinitionBuilder {
            block,
            id: id.to_string(),
            name: name.to_string(),
            is_solid: true,
            is_opaque: true,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

pub struct BlockDefinitionBuilder {
    block: BlockType,
    id: String,
    name: String,
    is_solid: bool,
    is_opaque: bool,
    color: [f32; 4],
}

impl BlockDefinitionBuilder {
    pub fn solid(mut self, is_solid: bool) -> Self {
        self.is_solid = is_solid;
        self
    }

    pub fn opaque(mut self, is_opaque: bool) -> Self {
        self.is_opaque = is_opaque;
        self
    }

    pub fn color(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.color = [r, g, b, a];
        self
    }

    pub fn build(self) -> BlockDefinition {
        BlockDefinition {
            block: self.block,
            properties: BlockProperties {
                id: self.id,
                name: self.name,
                is_solid: self.is_solid,
                is_opaque: self.is_opaque,
                color: self.color,
            },
        }
    }
}
