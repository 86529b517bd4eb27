use bevy::prelude::*;

use super::record::{parse_record_key, RemoteBlockRecord};
use super::store::RemoteChange;
use crate::error::RemoteError;
use crate::world::ChunkStore;

/// What applying a remote change did to the local world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A resident chunk changed and is now dirty
    Changed,
    /// Remembered, but nothing resident changed (duplicate or unloaded chunk)
    Unchanged,
    /// Delete for a cell that isn't remote-sourced
    Ignored,
}

/// Fold one remote change into the chunk store. Never writes back to the
/// remote store, and applying the same change twice equals applying it once.
pub fn apply_remote_change(store: &mut ChunkStore, change: &RemoteChange) -> Result<ApplyOutcome, RemoteError> {
    match change {
        RemoteChange::Added { key, document } | RemoteChange::Modified { key, document } => {
            let record = RemoteBlockRecord::from_document(key, document)?;
            let cell = record.block_position(store.layout());

            // Air overwrites too, generated terrain included
            let changed = store.upsert_remote(cell, record.block_type);
            Ok(if changed { ApplyOutcome::Changed } else { ApplyOutcome::Unchanged })
        }
        RemoteChange::Removed { key } => {
            let Some(position) = parse_record_key(key) else {
                return Ok(ApplyOutcome::Ignored);
            };
            let layout = store.layout();
            let cell = layout.block_at(position + Vec3::splat(layout.block_size / 2.0));

            if !store.is_remote_sourced(cell) {
                return Ok(ApplyOutcome::Ignored);
            }
            Ok(if store.remove_remote(cell) {
                ApplyOutcome::Changed
            } else {
                ApplyOutcome::Unchanged
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockRegistry, BlockType};
    use crate::config::{GenerationMode, TerrainConfig};
    use crate::world::{drain_dirty_meshes, update_streaming, ChunkCoord, ChunkLayout, TerrainGenerator};
    use serde_json::json;

    fn settled_store() -> (ChunkStore, BlockRegistry) {
        let registry = BlockRegistry::vanilla();
        let layout = ChunkLayout::new(16, 16, 1.0);
        let generator = TerrainGenerator::new(GenerationMode::Flat, 3, TerrainConfig::default(), layout);
        let mut store = ChunkStore::new(layout, generator);
        update_streaming(&mut store, ChunkCoord::new(0, 0), 1);
        while !drain_dirty_meshes(&mut store, &registry, ChunkCoord::new(0, 0), 8).is_empty() {}
        (store, registry)
    }

    fn added(x: i32, y: i32, z: i32, block_type: &str) -> RemoteChange {
        RemoteChange::Added {
            key: format!("{x}_{y}_{z}"),
            document: json!({ "x": x, "y": y, "z": z, "block_type": block_type }),
        }
    }

    #[test]
    fn test_upsert_twice_is_idempotent() {
        let (mut store, registry) = settled_store();
        let change = added(5, 6, 7, "wood");

        assert_eq!(apply_remote_change(&mut store, &change).unwrap(), ApplyOutcome::Changed);
        let after_once = store.get(ChunkCoord::new(0, 0)).unwrap().sorted_blocks();
        assert_eq!(store.dirty_chunks(), vec![ChunkCoord::new(0, 0)]);
        drain_dirty_meshes(&mut store, &registry, ChunkCoord::new(0, 0), 8);

        assert_eq!(apply_remote_change(&mut store, &change).unwrap(), ApplyOutcome::Unchanged);
        assert_eq!(store.get(ChunkCoord::new(0, 0)).unwrap().sorted_blocks(), after_once);
        assert!(store.dirty_chunks().is_empty());
        assert_eq!(store.get(ChunkCoord::new(0, 0)).unwrap().mesh_revision(), 2);
    }

    #[test]
    fn test_upsert_overwrites_generated_terrain() {
        let (mut store, _) = settled_store();
        let modified = RemoteChange::Modified {
            key: "2_3_2".to_string(),
            document: json!({ "x": 2, "y": 3, "z": 2, "block_type": "obsidian" }),
        };
        assert_eq!(apply_remote_change(&mut store, &modified).unwrap(), ApplyOutcome::Changed);
        assert_eq!(store.get_block(IVec3::new(2, 3, 2)), Some(BlockType::Obsidian));
    }

    #[test]
    fn test_air_upsert_clears_generated_terrain() {
        let (mut store, _) = settled_store();
        assert_eq!(store.get_block(IVec3::new(2, 3, 2)), Some(BlockType::Grass));

        let cleared = added(2, 3, 2, "air");
        assert_eq!(apply_remote_change(&mut store, &cleared).unwrap(), ApplyOutcome::Changed);
        assert_eq!(store.get_block(IVec3::new(2, 3, 2)), Some(BlockType::Air));
        assert_eq!(apply_remote_change(&mut store, &cleared).unwrap(), ApplyOutcome::Unchanged);

        // Stays empty after the chunk is regenerated
        store.destroy(ChunkCoord::new(0, 0));
        store.create(ChunkCoord::new(0, 0));
        assert_eq!(store.get_block(IVec3::new(2, 3, 2)), Some(BlockType::Air));
    }

    #[test]
    fn test_remove_only_touches_remote_blocks() {
        let (mut store, _) = settled_store();

        // Generated grass: not ours to delete
        let removed = RemoteChange::Removed { key: "2_3_2".to_string() };
        assert_eq!(apply_remote_change(&mut store, &removed).unwrap(), ApplyOutcome::Ignored);
        assert_eq!(store.get_block(IVec3::new(2, 3, 2)), Some(BlockType::Grass));

        apply_remote_change(&mut store, &added(2, 4, 2, "stone")).unwrap();
        let removed = RemoteChange::Removed { key: "2_4_2".to_string() };
        assert_eq!(apply_remote_change(&mut store, &removed).unwrap(), ApplyOutcome::Changed);
        assert_eq!(store.get_block(IVec3::new(2, 4, 2)), Some(BlockType::Air));

        // Echo of the same delete
        assert_eq!(apply_remote_change(&mut store, &removed).unwrap(), ApplyOutcome::Ignored);
    }

    #[test]
    fn test_unloaded_chunk_gets_edit_on_load() {
        let (mut store, _) = settled_store();
        let far = added(100, 8, 100, "sand");
        assert_eq!(apply_remote_change(&mut store, &far).unwrap(), ApplyOutcome::Unchanged);

        store.create(ChunkCoord::new(6, 6));
        assert_eq!(store.get_block(IVec3::new(100, 8, 100)), Some(BlockType::Sand));
    }

    #[test]
    fn test_malformed_document() {
        let (mut store, _) = settled_store();
        let bad = RemoteChange::Added { key: "1_1_1".to_string(), document: json!("not a record") };
        assert!(matches!(
            apply_remote_change(&mut store, &bad),
            Err(RemoteError::Decode { .. })
        ));
        assert!(store.dirty_chunks().is_empty());
    }
}
