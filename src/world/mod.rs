mod chunk;
mod coord;
mod gradient;
mod store;
mod terrain;
pub mod mesh_gen;
pub mod raycast;
pub mod streaming;

pub use chunk::Chunk;
pub use coord::{ChunkCoord, ChunkLayout};
pub use gradient::GradientNoise;
pub use mesh_gen::{create_chunk_mesh, ChunkMesh};
pub use raycast::{raycast, RaycastHit};
pub use store::{ChunkStore, EditedCell};
pub use streaming::{desired_chunks, drain_dirty_meshes, update_streaming, StreamingReport};
pub use terrain::TerrainGenerator;
