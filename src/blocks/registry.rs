use bevy::prelude::*;
use std::collections::HashMap;

use super::block_type::{BlockDefinition, BlockType};
use crate::error::RegistryError;

/// Block properties for every [`BlockType`], built once when the world is
/// created and handed by reference to terrain, meshing and collision.
#[derive(Resource, Clone)]
pub struct BlockRegistry {
    /// Indexed by the `BlockType` discriminant
    blocks: Vec<Option<BlockDefinition>>,
    /// Map from string ID to block type for lookups
    id_map: HashMap<String, BlockType>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        let mut registry = Self {
            blocks: vec![None; BlockType::ALL.len()],
            id_map: HashMap::new(),
        };

        // Air always exists and never collides or occludes
        let air = BlockDefinition::builder(BlockType::Air, "core:air", "Air")
            .solid(false)
            .opaque(false)
            .color(0.0, 0.0, 0.0, 0.0)
            .build();
        registry.blocks[BlockType::Air as usize] = Some(air);
        registry.id_map.insert("core:air".to_string(), BlockType::Air);

        registry
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in block
    pub fn vanilla() -> Self {
        let mut registry = Self::new();
        let definitions = [
            BlockDefinition::builder(BlockType::Grass, "core:grass", "Grass Block")
                .color(0.486, 0.741, 0.420, 1.0)
                .build(),
            BlockDefinition::builder(BlockType::Dirt, "core:dirt", "Dirt")
                .color(0.525, 0.376, 0.263, 1.0)
                .build(),
            BlockDefinition::builder(BlockType::Stone, "core:stone", "Stone")
                .color(0.5, 0.5, 0.5, 1.0)
                .build(),
            BlockDefinition::builder(BlockType::Wood, "core:wood", "Oak Log")
                .color(0.400, 0.310, 0.190, 1.0)
                .build(),
            // Leaves and water render but never block movement or hide neighbors
            BlockDefinition::builder(BlockType::Leaves, "core:leaves", "Leaves")
                .solid(false)
                .opaque(false)
                .color(0.235, 0.545, 0.180, 0.9)
                .build(),
            BlockDefinition::builder(BlockType::Sand, "core:sand", "Sand")
                .color(0.859, 0.827, 0.627, 1.0)
                .build(),
            BlockDefinition::builder(BlockType::Water, "core:water", "Water")
                .solid(false)
                .opaque(false)
                .color(0.247, 0.463, 0.894, 0.6)
                .build(),
            BlockDefinition::builder(BlockType::Obsidian, "core:obsidian", "Obsidian")
                .color(0.078, 0.059, 0.122, 1.0)
                .build(),
        ];

        for definition in definitions {
            if let Err(err) = registry.register_block(definition) {
                warn!("Skipping built-in block: {}", err);
            }
        }

        registry
    }

    /// Register the definition for a block type.
    /// Fails if the type or its string ID is already registered.
    pub fn register_block(&mut self, definition: BlockDefinition) -> Result<(), RegistryError> {
        let string_id = definition.properties.id.clone();

        if self.id_map.contains_key(&string_id) {
            return Err(RegistryError::AlreadyRegistered(string_id));
        }
        let slot = &mut self.blocks[definition.block as usize];
        if slot.is_some() {
            return Err(RegistryError::DuplicateType(definition.block));
        }

        debug!("Registered block '{}' as {:?}", string_id, definition.block);
        self.id_map.insert(string_id, definition.block);
        *slot = Some(definition);

        Ok(())
    }

    pub fn get_block(&self, block: BlockType) -> Option<&BlockDefinition> {
        self.blocks.get(block as usize)?.as_ref()
    }

    /// Look up a block type by its string ID
    pub fn get_id(&self, string_id: &str) -> Option<BlockType> {
        self.id_map.get(string_id).copied()
    }

    /// Whether the observer collides with this block. Unregistered types never collide.
    pub fn is_solid(&self, block: BlockType) -> bool {
        self.get_block(block).is_some_and(|b| b.properties.is_solid)
    }

    pub fn is_opaque(&self, block: BlockType) -> bool {
        self.get_block(block).is_some_and(|b| b.properties.is_opaque)
    }

    pub fn color(&self, block: BlockType) -> [f32; 4] {
        self.get_block(block)
            .map(|b| b.properties.color)
            .unwrap_or([1.0, 0.0, 1.0, 1.0])
    }

    /// Human-readable name, for logs
    pub fn display_name(&self, block: BlockType) -> &str {
        self.get_block(block)
            .map_or("Unknown", |b| b.properties.name.as_str())
    }

    pub fn block_count(&self) -> usize {
        self.id_map.len()
    }
}
