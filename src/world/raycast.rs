use bevy::prelude::*;

use super::coord::ChunkLayout;
use crate::blocks::BlockType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub block: IVec3,        // Block cell that was hit
    pub face_normal: IVec3,  // Outward normal of the face the ray entered through
    pub point: Vec3,         // Entry point on that face, in world units
    pub distance: f32,       // World units from the ray origin
}

impl RaycastHit {
    /// Cell behind the hit face: half a block into the surface
    pub fn break_target(&self, layout: &ChunkLayout) -> IVec3 {
        layout.block_at(self.point - self.face_normal.as_vec3() * layout.block_size * 0.5)
    }

    /// Cell in front of the hit face: half a block out along the normal
    pub fn place_target(&self, layout: &ChunkLayout) -> IVec3 {
        layout.block_at(self.point + self.face_normal.as_vec3() * layout.block_size * 0.5)
    }
}

/// Walk the block grid along a ray and return the first non-air cell within
/// `max_distance` world units. Cells in unknown chunks (`None`) are passed
/// through. The cell containing the origin is never reported.
pub fn raycast(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    layout: &ChunkLayout,
    block_at: impl Fn(IVec3) -> Option<BlockType>,
) -> Option<RaycastHit> {
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO || max_distance <= 0.0 {
        return None;
    }

    // Grid space: one unit per block
    let start = origin / layout.block_size;
    let max_t = max_distance / layout.block_size;
    let mut cell = start.floor().as_ivec3();

    let step = IVec3::new(
        direction.x.signum() as i32,
        direction.y.signum() as i32,
        direction.z.signum() as i32,
    );
    let axis_delta = |d: f32| if d == 0.0 { f32::INFINITY } else { 1.0 / d.abs() };
    let axis_boundary = |s: f32, c: i32, d: f32| {
        if d > 0.0 {
            (c as f32 + 1.0 - s) / d
        } else if d < 0.0 {
            (s - c as f32) / -d
        } else {
            f32::INFINITY
        }
    };

    let t_delta = Vec3::new(axis_delta(direction.x), axis_delta(direction.y), axis_delta(direction.z));
    let mut t_max = Vec3::new(
        axis_boundary(start.x, cell.x, direction.x),
        axis_boundary(start.y, cell.y, direction.y),
        axis_boundary(start.z, cell.z, direction.z),
    );

    loop {
        // Step across whichever cell boundary comes first
        let (t, face_normal) = if t_max.x < t_max.y && t_max.x < t_max.z {
            cell.x += step.x;
            let t = t_max.x;
            t_max.x += t_delta.x;
            (t, IVec3::new(-step.x, 0, 0))
        } else if t_max.y < t_max.z {
            cell.y += step.y;
            let t = t_max.y;
            t_max.y += t_delta.y;
            (t, IVec3::new(0, -step.y, 0))
        } else {
            cell.z += step.z;
            let t = t_max.z;
            t_max.z += t_delta.z;
            (t, IVec3::new(0, 0, -step.z))
        };

        if t > max_t {
            return None;
        }

        if matches!(block_at(cell), Some(block) if !block.is_air()) {
            return Some(RaycastHit {
                block: cell,
                face_normal,
                point: (start + direction * t) * layout.block_size,
                distance: t * layout.block_size,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stone floor at y <= 2 everywhere, plus a wall at x == 5
    fn floor_and_wall(pos: IVec3) -> Option<BlockType> {
        if pos.y <= 2 || (pos.x == 5 && pos.y < 10) {
            Some(BlockType::Stone)
        } else {
            Some(BlockType::Air)
        }
    }

    #[test]
    fn test_look_down_at_floor() {
        let layout = ChunkLayout::new(16, 16, 1.0);
        let hit = raycast(Vec3::new(0.5, 4.6, 0.5), Vec3::NEG_Y, 8.0, &layout, floor_and_wall).unwrap();

        assert_eq!(hit.block, IVec3::new(0, 2, 0));
        assert_eq!(hit.face_normal, IVec3::Y);
        assert!((hit.distance - 1.6).abs() < 1e-4);
        assert_eq!(hit.break_target(&layout), IVec3::new(0, 2, 0));
        assert_eq!(hit.place_target(&layout), IVec3::new(0, 3, 0));
    }

    #[test]
    fn test_look_at_wall() {
        let layout = ChunkLayout::new(16, 16, 1.0);
        let direction = Vec3::new(1.0, 0.0, 0.3);
        let hit = raycast(Vec3::new(1.5, 5.5, 0.5), direction, 8.0, &layout, floor_and_wall).unwrap();

        assert_eq!(hit.block.x, 5);
        assert_eq!(hit.face_normal, IVec3::NEG_X);
        assert_eq!(hit.place_target(&layout).x, 4);
        assert_eq!(hit.break_target(&layout), hit.block);
    }

    #[test]
    fn test_out_of_reach() {
        let layout = ChunkLayout::new(16, 16, 1.0);
        assert!(raycast(Vec3::new(0.5, 20.0, 0.5), Vec3::NEG_Y, 8.0, &layout, floor_and_wall).is_none());
        assert!(raycast(Vec3::new(0.5, 5.0, 0.5), Vec3::ZERO, 8.0, &layout, floor_and_wall).is_none());
    }

    #[test]
    fn test_unknown_cells_are_transparent() {
        let layout = ChunkLayout::new(16, 16, 1.0);
        let only_far = |pos: IVec3| if pos.x >= 3 { Some(BlockType::Dirt) } else { None };
        let hit = raycast(Vec3::new(0.5, 0.5, 0.5), Vec3::X, 8.0, &layout, only_far).unwrap();
        assert_eq!(hit.block, IVec3::new(3, 0, 0));
    }

    #[test]
    fn test_scaled_blocks() {
        let layout = ChunkLayout::new(16, 16, 0.5);
        let hit = raycast(Vec3::new(0.25, 3.0, 0.25), Vec3::NEG_Y, 4.0, &layout, floor_and_wall).unwrap();

        // Floor top is at y = 3 cells = 1.5 world units
        assert_eq!(hit.block, IVec3::new(0, 2, 0));
        assert!((hit.point.y - 1.5).abs() < 1e-4);
        assert!((hit.distance - 1.5).abs() < 1e-4);
        assert_eq!(hit.place_target(&layout), IVec3::new(0, 3, 0));
    }
}
