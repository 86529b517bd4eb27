use bevy::prelude::*;

use crate::resources::RemoteSync;
use crate::sync::{apply_remote_change, ApplyOutcome};
use crate::world::ChunkStore;

pub fn connect_remote_feed(mut remote: ResMut<RemoteSync>) {
    match remote.connect() {
        Ok(()) => info!("Subscribed to remote block store"),
        Err(err) => warn!("Remote block store unavailable: {}", err),
    }
}

/// Push queued local edits, then fold in whatever the feed delivered.
/// Resulting re-meshes happen in the streaming pass, not here.
pub fn sync_remote_blocks(mut remote: ResMut<RemoteSync>, mut store: ResMut<ChunkStore>) {
    for err in remote.flush() {
        warn!("Dropped remote write: {}", err);
    }

    if !remote.is_connected() {
        return;
    }
    let changes = match remote.poll() {
        Ok(changes) => changes,
        Err(err) => {
            warn!("Remote feed closed: {}", err);
            return;
        }
    };

    let mut changed = 0;
    for change in &changes {
        match apply_remote_change(&mut store, change) {
            Ok(ApplyOutcome::Changed) => changed += 1,
            Ok(_) => {}
            Err(err) => warn!("Skipping remote change {}: {}", change.key(), err),
        }
    }
    if !changes.is_empty() {
        debug!("Applied {} remote changes, {} altered resident blocks", changes.len(), changed);
    }
}
