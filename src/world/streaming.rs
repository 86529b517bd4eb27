use std::collections::HashSet;

use super::coord::ChunkCoord;
use super::store::ChunkStore;
use crate::blocks::BlockRegistry;

/// Chunks created and destroyed by one streaming pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamingReport {
    pub created: Vec<ChunkCoord>,
    pub destroyed: Vec<ChunkCoord>,
}

impl StreamingReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty()
    }
}

/// Every chunk within `radius` (Euclidean, in chunks) of `center`
pub fn desired_chunks(center: ChunkCoord, radius: i32) -> HashSet<ChunkCoord> {
    let mut desired = HashSet::new();
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            let coord = ChunkCoord::new(center.x + dx, center.z + dz);
            if coord.distance_squared(&center) <= radius * radius {
                desired.insert(coord);
            }
        }
    }
    desired
}

/// Make the resident set exactly the chunks around `center`: destroy the ones
/// out of range first, then generate the missing ones nearest-first.
pub fn update_streaming(store: &mut ChunkStore, center: ChunkCoord, radius: i32) -> StreamingReport {
    let desired = desired_chunks(center, radius);
    let mut report = StreamingReport::default();

    let mut stale: Vec<ChunkCoord> = store
        .loaded_coords()
        .filter(|coord| !desired.contains(coord))
        .collect();
    stale.sort();
    for coord in stale {
        store.destroy(coord);
        report.destroyed.push(coord);
    }

    let mut missing: Vec<ChunkCoord> = desired
        .into_iter()
        .filter(|coord| !store.is_loaded(*coord))
        .collect();
    missing.sort_by_key(|coord| (coord.distance_squared(&center), *coord));
    for coord in missing {
        store.create(coord);
        report.created.push(coord);
    }

    report
}

/// Rebuild at most `budget` dirty meshes, closest to `center` first.
/// The rest stay dirty for later frames.
pub fn drain_dirty_meshes(
    store: &mut ChunkStore,
    block_registry: &BlockRegistry,
    center: ChunkCoord,
    budget: usize,
) -> Vec<ChunkCoord> {
    let mut dirty = store.dirty_chunks();
    dirty.sort_by_key(|coord| (coord.distance_squared(&center), *coord));
    dirty.truncate(budget);

    for coord in &dirty {
        store.rebuild_mesh(*coord, block_registry);
    }
    dirty
}
