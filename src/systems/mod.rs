mod block_interaction;
mod observer;
mod input;
mod sync;
mod world;

pub use block_interaction::block_interaction;
pub use observer::{observer_movement, spawn_observer};
pub use input::clear_input_triggers;
pub use sync::{connect_remote_feed, sync_remote_blocks};
pub use world::{stream_chunks, ChunkMeshReady, ChunkUnloaded};
