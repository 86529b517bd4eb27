use bevy::prelude::*;

use super::chunk::Chunk;
use super::coord::ChunkLayout;
use crate::blocks::{BlockFace, BlockRegistry, BlockType};

/// Face brightness values for baked directional shading
const BRIGHTNESS_UP: f32 = 1.0;        // Top faces get full light
const BRIGHTNESS_DOWN: f32 = 0.5;      // Bottom faces are darkest
const BRIGHTNESS_NORTH: f32 = 0.8;     // North (-Z)
const BRIGHTNESS_SOUTH: f32 = 0.8;     // South (+Z)
const BRIGHTNESS_EAST: f32 = 0.6;      // East (+X)
const BRIGHTNESS_WEST: f32 = 0.6;      // West (-X)

/// Renderer-agnostic surface of one chunk. Positions are relative to the
/// chunk origin and scaled to world units; every four vertices form one quad.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    pub fn quad_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn push_quad(&mut self, origin: Vec3, size: f32, face: BlockFace, color: [f32; 4]) {
        let base_index = self.positions.len() as u32;
        let normal = face.normal();
        let normal = [normal[0] as f32, normal[1] as f32, normal[2] as f32];

        for corner in face_corners(face) {
            let p = origin + Vec3::from_array(corner) * size;
            self.positions.push(p.to_array());
            self.normals.push(normal);
            self.colors.push(color);
        }

        // Corners are counter-clockwise seen from outside, so both triangles face out
        self.indices.extend_from_slice(&[
            base_index, base_index + 1, base_index + 2,
            base_index, base_index + 2, base_index + 3,
        ]);
    }
}

/// Unit-cube corners of a face, counter-clockwise when viewed along -normal
fn face_corners(face: BlockFace) -> [[f32; 3]; 4] {
    match face {
        BlockFace::Top => [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
        BlockFace::Bottom => [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        BlockFace::South => [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
        BlockFace::North => [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
        BlockFace::East => [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
        BlockFace::West => [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    }
}

fn face_brightness(face: BlockFace) -> f32 {
    match face {
        BlockFace::Top => BRIGHTNESS_UP,
        BlockFace::Bottom => BRIGHTNESS_DOWN,
        BlockFace::North => BRIGHTNESS_NORTH,
        BlockFace::South => BRIGHTNESS_SOUTH,
        BlockFace::East => BRIGHTNESS_EAST,
        BlockFace::West => BRIGHTNESS_WEST,
    }
}

/// Whether `neighbor` hides the face of `block` that touches it.
/// `None` is a cell in a chunk that isn't loaded: never hides anything.
fn is_face_hidden(registry: &BlockRegistry, block: BlockType, neighbor: Option<BlockType>) -> bool {
    match neighbor {
        None | Some(BlockType::Air) => false,
        Some(neighbor) if registry.is_opaque(neighbor) => true,
        // Translucent blocks merge with their own kind (no walls inside water)
        Some(neighbor) => neighbor == block,
    }
}

/// Build the visible surface of a chunk, one quad per exposed face.
///
/// Only stored cells are visited, so cost follows the number of filled
/// blocks rather than the chunk volume. Cells outside the chunk footprint
/// are resolved through `neighbor_block` (world block position in, `None`
/// when that chunk isn't resident). Returns `None` when nothing is visible.
pub fn create_chunk_mesh(
    chunk: &Chunk,
    layout: &ChunkLayout,
    block_registry: &BlockRegistry,
    neighbor_block: impl Fn(IVec3) -> Option<BlockType>,
) -> Option<ChunkMesh> {
    let mut mesh = ChunkMesh::default();

    for (local, block) in chunk.iter_blocks() {
        let base_color = block_registry.color(block);
        let origin = local.as_vec3() * layout.block_size;

        for face in BlockFace::ALL {
            let [dx, dy, dz] = face.normal();
            let adjacent = local + IVec3::new(dx, dy, dz);

            let neighbor = if layout.contains_local(adjacent) {
                Some(chunk.get_block(adjacent))
            } else {
                neighbor_block(layout.to_world_block(chunk.coord, adjacent))
            };

            if is_face_hidden(block_registry, block, neighbor) {
                continue;
            }

            let shade = face_brightness(face);
            let color = [base_color[0] * shade, base_color[1] * shade, base_color[2] * shade, base_color[3]];
            mesh.push_quad(origin, layout.block_size, face, color);
        }
    }

    if mesh.is_empty() {
        None
    } else {
        Some(mesh)
    }
}
