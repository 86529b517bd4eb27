use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blocks::BlockType;
use crate::error::RemoteError;
use crate::world::ChunkLayout;

/// One synchronized block, positioned in world units at its minimum corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemoteBlockRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub block_type: BlockType,
}

impl RemoteBlockRecord {
    pub fn new(layout: &ChunkLayout, block: IVec3, block_type: BlockType) -> Self {
        let origin = layout.block_origin(block);
        Self {
            x: origin.x,
            y: origin.y,
            z: origin.z,
            block_type,
        }
    }

    pub fn key(&self) -> String {
        record_key(Vec3::new(self.x, self.y, self.z))
    }

    /// Block cell the record refers to. Samples the cell center so float
    /// error on the stored corner can't push it into the previous cell.
    pub fn block_position(&self, layout: &ChunkLayout) -> IVec3 {
        let center = Vec3::new(self.x, self.y, self.z) + Vec3::splat(layout.block_size / 2.0);
        layout.block_at(center)
    }

    pub fn to_document(&self) -> Result<Value, RemoteError> {
        serde_json::to_value(self).map_err(|source| RemoteError::Encode {
            key: self.key(),
            source,
        })
    }

    pub fn from_document(key: &str, document: &Value) -> Result<Self, RemoteError> {
        Self::deserialize(document).map_err(|source| RemoteError::Decode {
            key: key.to_string(),
            source,
        })
    }
}

/// Record key for a world-unit position: the coordinates joined by `_`
pub fn record_key(world: Vec3) -> String {
    format!("{}_{}_{}", world.x, world.y, world.z)
}

/// Key of the record that would describe `block`
pub fn block_key(layout: &ChunkLayout, block: IVec3) -> String {
    record_key(layout.block_origin(block))
}

/// Inverse of `record_key`
pub fn parse_record_key(key: &str) -> Option<Vec3> {
    let mut parts = key.split('_').map(|part| part.parse::<f32>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Vec3::new(x, y, z))
}
