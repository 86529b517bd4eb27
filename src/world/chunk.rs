use bevy::prelude::*;
use std::collections::HashMap;

use super::coord::ChunkCoord;
use super::mesh_gen::ChunkMesh;
use crate::blocks::BlockType;

/// A column of blocks. Only non-air cells are stored; a missing entry is air.
pub struct Chunk {
    pub coord: ChunkCoord,
    blocks: HashMap<IVec3, BlockType>,
    dirty: bool,
    mesh: Option<ChunkMesh>,
    mesh_revision: u32,
}

impl Chunk {
    /// Fresh chunk, dirty until its first mesh is built
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: HashMap::new(),
            dirty: true,
            mesh: None,
            mesh_revision: 0,
        }
    }

    pub fn get_block(&self, local: IVec3) -> BlockType {
        self.blocks.get(&local).copied().unwrap_or(BlockType::Air)
    }

    /// Set a local cell. Air removes the entry. Returns whether the cell changed;
    /// a change marks the chunk dirty.
    pub fn set_block(&mut self, local: IVec3, block: BlockType) -> bool {
        let previous = if block.is_air() {
            self.blocks.remove(&local)
        } else {
            self.blocks.insert(local, block)
        };

        let changed = previous.unwrap_or(BlockType::Air) != block;
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Iterate stored (non-air) cells
    pub fn iter_blocks(&self) -> impl Iterator<Item = (IVec3, BlockType)> + '_ {
        self.blocks.iter().map(|(pos, block)| (*pos, *block))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Stored cells sorted by position, for comparing chunk contents
    pub fn sorted_blocks(&self) -> Vec<(IVec3, BlockType)> {
        let mut blocks: Vec<_> = self.iter_blocks().collect();
        blocks.sort_by_key(|(pos, _)| (pos.x, pos.y, pos.z));
        blocks
    }

    /// Height of the top non-air block in a local column, if any
    pub fn get_height_at(&self, x: i32, z: i32) -> Option<i32> {
        self.blocks
            .keys()
            .filter(|pos| pos.x == x && pos.z == z)
            .map(|pos| pos.y)
            .max()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Request a rebuild without changing any block (e.g. a neighbor appeared)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Number of completed mesh rebuilds
    pub fn mesh_revision(&self) -> u32 {
        self.mesh_revision
    }

    /// Store a completed rebuild. This is the only place the dirty flag clears.
    pub fn finish_mesh(&mut self, mesh: Option<ChunkMesh>) {
        self.mesh = mesh;
        self.dirty = false;
        self.mesh_revision += 1;
    }
}
