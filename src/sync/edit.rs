use bevy::prelude::*;

use super::record::{block_key, RemoteBlockRecord};
use crate::blocks::BlockType;
use crate::components::Observer;
use crate::config::PhysicsConfig;
use crate::error::{EditRejected, WorldError};
use crate::physics::{observer_bounds, Aabb};
use crate::world::{raycast, ChunkStore, RaycastHit};

/// Write to mirror to the remote store after a local edit
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteWrite {
    Upsert(RemoteBlockRecord),
    Delete(String),
}

impl RemoteWrite {
    pub fn key(&self) -> String {
        match self {
            RemoteWrite::Upsert(record) => record.key(),
            RemoteWrite::Delete(key) => key.clone(),
        }
    }
}

/// Everything a break/place action needs besides the world itself
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    pub observer: &'a Observer,
    pub physics: &'a PhysicsConfig,
    /// Maximum ray length in world units
    pub reach: f32,
    pub selected: Option<BlockType>,
}

impl EditContext<'_> {
    fn target(&self, store: &ChunkStore) -> Option<RaycastHit> {
        raycast(
            self.observer.eye,
            self.observer.aim(),
            self.reach,
            store.layout(),
            |cell| store.get_block(cell),
        )
    }
}

/// Remove the block under the crosshair
pub fn break_block(store: &mut ChunkStore, context: &EditContext) -> Result<RemoteWrite, EditRejected> {
    let hit = context.target(store).ok_or(EditRejected::NoTarget)?;
    let target = hit.break_target(store.layout());

    store.clear_block(target)?;
    Ok(RemoteWrite::Delete(block_key(store.layout(), target)))
}

/// Put the selected block against the face under the crosshair
pub fn place_block(store: &mut ChunkStore, context: &EditContext) -> Result<RemoteWrite, EditRejected> {
    let block_type = context.selected.ok_or(EditRejected::NothingSelected)?;
    let hit = context.target(store).ok_or(EditRejected::NoTarget)?;
    let layout = *store.layout();
    let target = hit.place_target(&layout);

    if Aabb::block(&layout, target).intersects(&observer_bounds(context.observer, context.physics)) {
        return Err(EditRejected::OverlapsObserver);
    }

    match store.get_block(target) {
        None => {
            let coord = layout.chunk_of(target);
            return Err(WorldError::ChunkNotLoaded { cx: coord.x, cz: coord.z }.into());
        }
        Some(existing) if !existing.is_air() => return Err(EditRejected::Occupied),
        Some(_) => {}
    }

    store.upsert_remote(target, block_type);
    Ok(RemoteWrite::Upsert(RemoteBlockRecord::new(&layout, target, block_type)))
}
