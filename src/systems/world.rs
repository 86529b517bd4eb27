use bevy::prelude::*;

use crate::blocks::BlockRegistry;
use crate::components::Observer;
use crate::config::WorldConfig;
use crate::world::{drain_dirty_meshes, update_streaming, ChunkCoord, ChunkMesh, ChunkStore};

/// A chunk finished a mesh rebuild. `mesh` is `None` when nothing in the
/// chunk is visible; the renderer should drop whatever it drew before.
#[derive(Event, Debug, Clone)]
pub struct ChunkMeshReady {
    pub coord: ChunkCoord,
    /// World-space origin the mesh positions are relative to
    pub origin: Vec3,
    pub revision: u32,
    pub mesh: Option<ChunkMesh>,
}

/// A chunk left the resident set; its mesh is gone
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkUnloaded {
    pub coord: ChunkCoord,
}

/// Load and unload chunks around the observer, then rebuild a bounded
/// number of dirty meshes and hand them to the renderer.
pub fn stream_chunks(
    config: Res<WorldConfig>,
    block_registry: Res<BlockRegistry>,
    mut store: ResMut<ChunkStore>,
    observers: Query<&Observer>,
    mut mesh_ready: EventWriter<ChunkMeshReady>,
    mut unloaded: EventWriter<ChunkUnloaded>,
) {
    let Ok(observer) = observers.get_single() else {
        return;
    };

    let center = store.layout().chunk_at(observer.eye);
    let report = update_streaming(&mut store, center, config.render_distance);
    if !report.is_empty() {
        info!(
            "Streaming around {:?}: {} chunks created, {} destroyed, {} resident",
            center,
            report.created.len(),
            report.destroyed.len(),
            store.len()
        );
    }
    for coord in report.destroyed {
        unloaded.send(ChunkUnloaded { coord });
    }

    let rebuilt = drain_dirty_meshes(&mut store, &block_registry, center, config.mesh_budget);
    if !rebuilt.is_empty() {
        debug!("Rebuilt {} chunk meshes: {:?}", rebuilt.len(), rebuilt);
    }
    for coord in rebuilt {
        let Some(chunk) = store.get(coord) else {
            continue;
        };
        mesh_ready.send(ChunkMeshReady {
            coord,
            origin: store.layout().chunk_origin(coord),
            revision: chunk.mesh_revision(),
            mesh: chunk.mesh().cloned(),
        });
    }
}
