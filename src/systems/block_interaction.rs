use bevy::prelude::*;

use crate::blocks::BlockRegistry;
use crate::components::Observer;
use crate::config::WorldConfig;
use crate::resources::{InputState, RemoteSync};
use crate::sync::{break_block, place_block, EditContext};
use crate::world::ChunkStore;

/// Break (primary) and place (secondary) against the block under the aim.
/// Accepted edits land in the chunk store now and are queued for the remote
/// store; rejected ones change nothing.
pub fn block_interaction(
    config: Res<WorldConfig>,
    block_registry: Res<BlockRegistry>,
    input: Res<InputState>,
    mut store: ResMut<ChunkStore>,
    mut remote: ResMut<RemoteSync>,
    observers: Query<&Observer>,
) {
    if !input.break_block && !input.place_block {
        return;
    }
    let Ok(observer) = observers.get_single() else {
        return;
    };

    let context = EditContext {
        observer,
        physics: &config.physics,
        reach: config.reach,
        selected: input.selected,
    };

    if input.break_block {
        match break_block(&mut store, &context) {
            Ok(write) => {
                info!("Broke block {}", write.key());
                remote.queue(write);
            }
            Err(rejected) => debug!("Break rejected: {}", rejected),
        }
    }

    if input.place_block {
        match place_block(&mut store, &context) {
            Ok(write) => {
                let name = input
                    .selected
                    .map_or("nothing", |block| block_registry.display_name(block));
                info!("Placed {} at {}", name, write.key());
                remote.queue(write);
            }
            Err(rejected) => debug!("Place rejected: {}", rejected),
        }
    }
}
