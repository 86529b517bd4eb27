use bevy::prelude::*;
use std::collections::HashMap;

use super::chunk::Chunk;
use super::coord::{ChunkCoord, ChunkLayout};
use super::mesh_gen::create_chunk_mesh;
use super::terrain::TerrainGenerator;
use crate::blocks::{BlockRegistry, BlockType};
use crate::config::WorldConfig;
use crate::error::WorldError;

/// A cell whose content no longer comes from the terrain generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditedCell {
    /// Block that exists because of a synchronized edit
    Remote(BlockType),
    /// Cell emptied by an edit; generated terrain must not come back here
    Cleared,
}

/// Resident chunks plus the edits that outlive them.
///
/// Block positions are world block coordinates (integer cells). Lookups
/// against chunks that aren't resident return `None` ("unknown"), which is
/// distinct from `Some(BlockType::Air)`.
#[derive(Resource)]
pub struct ChunkStore {
    layout: ChunkLayout,
    generator: TerrainGenerator,
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Keyed by chunk, then by local position
    edits: HashMap<ChunkCoord, HashMap<IVec3, EditedCell>>,
}

impl ChunkStore {
    pub fn new(layout: ChunkLayout, generator: TerrainGenerator) -> Self {
        Self {
            layout,
            generator,
            chunks: HashMap::new(),
            edits: HashMap::new(),
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(ChunkLayout::from_config(config), TerrainGenerator::from_config(config))
    }

    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn loaded_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Generate a chunk, replay its edits and make it resident.
    /// Returns false if it was already resident.
    pub fn create(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }

        let mut chunk = self.generator.generate(coord);
        if let Some(edits) = self.edits.get(&coord) {
            for (&local, &cell) in edits {
                let block = match cell {
                    EditedCell::Remote(block) => block,
                    EditedCell::Cleared => BlockType::Air,
                };
                chunk.set_block(local, block);
            }
        }
        self.chunks.insert(coord, chunk);

        // Neighbors drew their shared edge as exposed; let them cull it now
        for neighbor in coord.neighbors() {
            if let Some(neighbor) = self.chunks.get_mut(&neighbor) {
                neighbor.mark_dirty();
            }
        }
        true
    }

    /// Drop a chunk and its mesh. Edits are kept for when it comes back.
    pub fn destroy(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    /// `None` when the owning chunk isn't resident
    pub fn get_block(&self, block: IVec3) -> Option<BlockType> {
        let chunk = self.chunks.get(&self.layout.chunk_of(block))?;
        Some(chunk.get_block(self.layout.local_of(block)))
    }

    /// Write one cell of a resident chunk. Returns whether the cell changed;
    /// changes on a chunk edge also dirty the adjacent chunk.
    pub fn set_block(&mut self, block: IVec3, block_type: BlockType) -> Result<bool, WorldError> {
        let coord = self.layout.chunk_of(block);
        let local = self.layout.local_of(block);
        let chunk = self
            .chunks
            .get_mut(&coord)
            .ok_or(WorldError::ChunkNotLoaded { cx: coord.x, cz: coord.z })?;

        let changed = chunk.set_block(local, block_type);
        if changed {
            self.mark_edge_neighbors(coord, local);
        }
        Ok(changed)
    }

    fn mark_edge_neighbors(&mut self, coord: ChunkCoord, local: IVec3) {
        // One-wide chunks put a cell on both edges of an axis
        let mut touched = Vec::with_capacity(4);
        if local.x == 0 {
            touched.push(ChunkCoord::new(coord.x - 1, coord.z));
        }
        if local.x == self.layout.width - 1 {
            touched.push(ChunkCoord::new(coord.x + 1, coord.z));
        }
        if local.z == 0 {
            touched.push(ChunkCoord::new(coord.x, coord.z - 1));
        }
        if local.z == self.layout.depth - 1 {
            touched.push(ChunkCoord::new(coord.x, coord.z + 1));
        }

        for neighbor in touched {
            if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                chunk.mark_dirty();
            }
        }
    }

    pub fn edited_cell(&self, block: IVec3) -> Option<EditedCell> {
        let coord = self.layout.chunk_of(block);
        self.edits.get(&coord)?.get(&self.layout.local_of(block)).copied()
    }

    /// Whether the block at this position came from a synchronized edit
    pub fn is_remote_sourced(&self, block: IVec3) -> bool {
        matches!(self.edited_cell(block), Some(EditedCell::Remote(_)))
    }

    fn record_edit(&mut self, block: IVec3, cell: EditedCell) {
        let coord = self.layout.chunk_of(block);
        self.edits
            .entry(coord)
            .or_default()
            .insert(self.layout.local_of(block), cell);
    }

    /// Place a synchronized block, overwriting whatever is there (generated or not).
    /// Works for non-resident chunks too: the block shows up when the chunk loads.
    /// Returns whether a resident chunk changed.
    pub fn upsert_remote(&mut self, block: IVec3, block_type: BlockType) -> bool {
        if block_type.is_air() {
            self.record_edit(block, EditedCell::Cleared);
        } else {
            self.record_edit(block, EditedCell::Remote(block_type));
        }
        self.set_block(block, block_type).unwrap_or(false)
    }

    /// Remove a synchronized block. No-op unless the cell is remote-sourced;
    /// the cell becomes empty rather than reverting to generated terrain.
    pub fn remove_remote(&mut self, block: IVec3) -> bool {
        if !self.is_remote_sourced(block) {
            return false;
        }
        self.record_edit(block, EditedCell::Cleared);
        self.set_block(block, BlockType::Air).unwrap_or(false)
    }

    /// Empty a cell because the local observer broke it
    pub fn clear_block(&mut self, block: IVec3) -> Result<bool, WorldError> {
        let changed = self.set_block(block, BlockType::Air)?;
        self.record_edit(block, EditedCell::Cleared);
        Ok(changed)
    }

    /// Coordinates of chunks waiting for a mesh rebuild
    pub fn dirty_chunks(&self) -> Vec<ChunkCoord> {
        self.chunks
            .iter()
            .filter(|(_, chunk)| chunk.is_dirty())
            .map(|(coord, _)| *coord)
            .collect()
    }

    /// Rebuild one chunk's mesh against the current neighbors and clear its
    /// dirty flag. Returns false if the chunk isn't resident.
    pub fn rebuild_mesh(&mut self, coord: ChunkCoord, block_registry: &BlockRegistry) -> bool {
        let Some(chunk) = self.chunks.get(&coord) else {
            return false;
        };
        let mesh = create_chunk_mesh(chunk, &self.layout, block_registry, |pos| self.get_block(pos));

        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.finish_mesh(mesh);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationMode, TerrainConfig};

    fn flat_store() -> ChunkStore {
        let layout = ChunkLayout::new(4, 4, 1.0);
        let generator = TerrainGenerator::new(GenerationMode::Flat, 1, TerrainConfig::default(), layout);
        ChunkStore::new(layout, generator)
    }

    #[test]
    fn test_unknown_is_not_air() {
        let mut store = flat_store();
        assert_eq!(store.get_block(IVec3::new(0, 10, 0)), None);

        store.create(ChunkCoord::new(0, 0));
        assert_eq!(store.get_block(IVec3::new(0, 10, 0)), Some(BlockType::Air));
        assert_eq!(store.get_block(IVec3::new(1, 3, 2)), Some(BlockType::Grass));
        assert_eq!(store.get_block(IVec3::new(-1, 3, 2)), None);
    }

    #[test]
    fn test_set_block_on_missing_chunk_is_an_error() {
        let mut store = flat_store();
        let err = store.set_block(IVec3::new(-5, 3, 9), BlockType::Stone).unwrap_err();
        assert_eq!(err, WorldError::ChunkNotLoaded { cx: -2, cz: 2 });
    }

    #[test]
    fn test_set_block_routes_to_owning_chunk() {
        let mut store = flat_store();
        store.create(ChunkCoord::new(-1, 0));
        for coord in store.dirty_chunks() {
            store.rebuild_mesh(coord, &BlockRegistry::vanilla());
        }

        assert_eq!(store.set_block(IVec3::new(-2, 5, 1), BlockType::Wood), Ok(true));
        let chunk = store.get(ChunkCoord::new(-1, 0)).unwrap();
        assert_eq!(chunk.get_block(IVec3::new(2, 5, 1)), BlockType::Wood);
        assert!(chunk.is_dirty());
    }

    #[test]
    fn test_create_and_edge_edits_dirty_neighbors() {
        let registry = BlockRegistry::vanilla();
        let mut store = flat_store();
        store.create(ChunkCoord::new(0, 0));
        store.rebuild_mesh(ChunkCoord::new(0, 0), &registry);
        assert!(!store.get(ChunkCoord::new(0, 0)).unwrap().is_dirty());

        store.create(ChunkCoord::new(1, 0));
        assert!(store.get(ChunkCoord::new(0, 0)).unwrap().is_dirty());
        store.rebuild_mesh(ChunkCoord::new(0, 0), &registry);
        store.rebuild_mesh(ChunkCoord::new(1, 0), &registry);

        // Interior edit leaves the neighbor alone
        store.set_block(IVec3::new(5, 4, 1), BlockType::Stone).unwrap();
        assert!(!store.get(ChunkCoord::new(0, 0)).unwrap().is_dirty());

        // Edge edit (local x == 0 of chunk 1) dirties chunk 0
        store.set_block(IVec3::new(4, 4, 1), BlockType::Stone).unwrap();
        assert!(store.get(ChunkCoord::new(0, 0)).unwrap().is_dirty());
    }

    #[test]
    fn test_single_cell_chunk_dirties_all_neighbors() {
        let registry = BlockRegistry::vanilla();
        let layout = ChunkLayout::new(1, 1, 1.0);
        let generator = TerrainGenerator::new(GenerationMode::Flat, 1, TerrainConfig::default(), layout);
        let mut store = ChunkStore::new(layout, generator);

        let center = ChunkCoord::new(0, 0);
        store.create(center);
        for neighbor in center.neighbors() {
            store.create(neighbor);
        }
        for coord in store.loaded_coords().collect::<Vec<_>>() {
            store.rebuild_mesh(coord, &registry);
        }
        assert!(store.dirty_chunks().is_empty());

        assert!(store.set_block(IVec3::new(0, 3, 0), BlockType::Air).unwrap());
        for neighbor in center.neighbors() {
            assert!(store.get(neighbor).unwrap().is_dirty(), "{:?} not dirty", neighbor);
        }
    }

    #[test]
    fn test_neighbor_load_culls_shared_edge() {
        let registry = BlockRegistry::vanilla();
        let mut store = flat_store();
        store.create(ChunkCoord::new(0, 0));
        store.rebuild_mesh(ChunkCoord::new(0, 0), &registry);
        let alone = store.get(ChunkCoord::new(0, 0)).unwrap().mesh().unwrap().quad_count();

        store.create(ChunkCoord::new(1, 0));
        store.rebuild_mesh(ChunkCoord::new(0, 0), &registry);
        let joined = store.get(ChunkCoord::new(0, 0)).unwrap().mesh().unwrap().quad_count();

        // One 4-block-high, 4-wide wall of faces disappears
        assert_eq!(alone - joined, 16);
    }

    #[test]
    fn test_reload_regenerates_identically() {
        let mut store = flat_store();
        let coord = ChunkCoord::new(2, -3);
        store.create(coord);
        let before = store.get(coord).unwrap().sorted_blocks();

        assert!(store.destroy(coord).is_some());
        assert!(!store.is_loaded(coord));
        store.create(coord);
        assert_eq!(store.get(coord).unwrap().sorted_blocks(), before);
    }

    #[test]
    fn test_edits_survive_reload() {
        let mut store = flat_store();
        let coord = ChunkCoord::new(0, 0);
        store.create(coord);

        store.upsert_remote(IVec3::new(1, 6, 1), BlockType::Sand);
        store.clear_block(IVec3::new(2, 3, 2)).unwrap();
        store.destroy(coord);
        store.create(coord);

        assert_eq!(store.get_block(IVec3::new(1, 6, 1)), Some(BlockType::Sand));
        assert_eq!(store.get_block(IVec3::new(2, 3, 2)), Some(BlockType::Air));
    }

    #[test]
    fn test_remote_upsert_into_unloaded_chunk_applies_on_load() {
        let mut store = flat_store();
        assert!(!store.upsert_remote(IVec3::new(9, 7, 9), BlockType::Wood));
        store.create(ChunkCoord::new(2, 2));
        assert_eq!(store.get_block(IVec3::new(9, 7, 9)), Some(BlockType::Wood));
    }

    #[test]
    fn test_remote_remove_only_affects_remote_blocks() {
        let mut store = flat_store();
        store.create(ChunkCoord::new(0, 0));

        // Generated grass is not remote-sourced: delete is a no-op
        assert!(!store.remove_remote(IVec3::new(1, 3, 1)));
        assert_eq!(store.get_block(IVec3::new(1, 3, 1)), Some(BlockType::Grass));

        // Remote block over generated grass, then removed: no grass underneath
        assert!(store.upsert_remote(IVec3::new(1, 3, 1), BlockType::Obsidian));
        assert!(store.remove_remote(IVec3::new(1, 3, 1)));
        assert_eq!(store.get_block(IVec3::new(1, 3, 1)), Some(BlockType::Air));
        assert!(!store.remove_remote(IVec3::new(1, 3, 1)));

        store.destroy(ChunkCoord::new(0, 0));
        store.create(ChunkCoord::new(0, 0));
        assert_eq!(store.get_block(IVec3::new(1, 3, 1)), Some(BlockType::Air));
    }
}
