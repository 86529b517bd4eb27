//! Chunked voxel world for Bevy: procedural terrain, streaming around one
//! observer, culled-face chunk meshes, per-axis collision, and block edits
//! shared through a remote store.
//!
//! The crate draws nothing. Meshes leave through [`ChunkMeshReady`] and
//! [`ChunkUnloaded`] events, and input arrives through [`InputState`].

pub mod blocks;
pub mod components;
pub mod config;
pub mod error;
pub mod physics;
pub mod resources;
pub mod sync;
pub mod systems;
pub mod world;

use std::sync::Arc;

use bevy::prelude::*;

use error::ConfigError;

pub use blocks::{BlockRegistry, BlockType};
pub use components::Observer;
pub use config::{GenerationMode, WorldConfig};
pub use resources::{InputState, RemoteSync};
pub use sync::{InMemoryBlockStore, RemoteBlockStore};
pub use systems::{ChunkMeshReady, ChunkUnloaded};
pub use world::{ChunkCoord, ChunkStore};

use systems::*;

/// Order of the per-frame world update
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorldSet {
    Physics,
    Edit,
    Sync,
    Streaming,
}

/// Everything needed to run a world: resources, the observer and the frame systems
pub struct VoxelWorldPlugin {
    pub config: WorldConfig,
    pub remote: Arc<dyn RemoteBlockStore>,
}

impl VoxelWorldPlugin {
    /// Rejects configs the world can't be laid out with
    pub fn new(
        config: WorldConfig,
        remote: impl RemoteBlockStore + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            remote: Arc::new(remote),
        })
    }
}

impl Default for VoxelWorldPlugin {
    fn default() -> Self {
        Self {
            config: WorldConfig::default(),
            remote: Arc::new(InMemoryBlockStore::new()),
        }
    }
}

impl Plugin for VoxelWorldPlugin {
    fn build(&self, app: &mut App) {
        info!(
            "Creating {:?} world with seed {}, render distance {}",
            self.config.generation, self.config.seed, self.config.render_distance
        );

        app.insert_resource(self.config.clone())
            .insert_resource(BlockRegistry::vanilla())
            .insert_resource(ChunkStore::from_config(&self.config))
            .insert_resource(RemoteSync::new(self.remote.clone()))
            .init_resource::<InputState>()
            .add_event::<ChunkMeshReady>()
            .add_event::<ChunkUnloaded>()
            .configure_sets(
                Update,
                (WorldSet::Physics, WorldSet::Edit, WorldSet::Sync, WorldSet::Streaming).chain(),
            )
            .add_systems(Startup, (spawn_observer, connect_remote_feed))
            .add_systems(
                Update,
                (
                    observer_movement.in_set(WorldSet::Physics),
                    (block_interaction, clear_input_triggers)
                        .chain()
                        .in_set(WorldSet::Edit),
                    sync_remote_blocks.in_set(WorldSet::Sync),
                    stream_chunks.in_set(WorldSet::Streaming),
                ),
            );
    }
}
