use bevy::prelude::*;

use crate::blocks::BlockRegistry;
use crate::components::Observer;
use crate::config::WorldConfig;
use crate::physics::{spawn_position, step_observer};
use crate::resources::InputState;
use crate::world::ChunkStore;

/// Place the observer above the terrain at the world origin column
pub fn spawn_observer(mut commands: Commands, config: Res<WorldConfig>, store: Res<ChunkStore>) {
    let spawn = spawn_position(store.generator(), store.layout(), &config.physics, IVec2::ZERO);
    info!("Spawning observer at {:?}", spawn);
    commands.spawn(Observer::new(spawn));
}

/// Look, move and collide the observer for this frame
pub fn observer_movement(
    time: Res<Time>,
    config: Res<WorldConfig>,
    input: Res<InputState>,
    store: Res<ChunkStore>,
    block_registry: Res<BlockRegistry>,
    mut observers: Query<&mut Observer>,
) {
    let dt = time.delta_secs();

    for mut observer in observers.iter_mut() {
        let next = step_observer(&observer, &input, dt, &store, &block_registry, &config.physics);
        *observer = next;
    }
}
