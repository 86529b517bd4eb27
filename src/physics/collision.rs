use bevy::prelude::*;

use crate::world::ChunkLayout;

/// Gap kept between the observer and any surface it is clamped against.
/// Boxes closer than this do not count as overlapping.
pub const SKIN: f32 = 1e-4;

/// Axis-aligned bounding box in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box standing on `feet`, centered horizontally
    pub fn from_feet(feet: Vec3, width: f32, height: f32) -> Self {
        let half = width / 2.0;
        Self::new(
            Vec3::new(feet.x - half, feet.y, feet.z - half),
            Vec3::new(feet.x + half, feet.y + height, feet.z + half),
        )
    }

    pub fn block(layout: &ChunkLayout, block: IVec3) -> Self {
        let min = layout.block_origin(block);
        Self::new(min, min + Vec3::splat(layout.block_size))
    }

    /// Overlap deeper than `SKIN` on every axis
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.overlaps_on(other, axis))
    }

    fn overlaps_on(&self, other: &Aabb, axis: usize) -> bool {
        other.min[axis] < self.max[axis] - SKIN && other.max[axis] > self.min[axis] + SKIN
    }

    /// Block cells this box overlaps, inclusive
    pub fn block_range(&self, layout: &ChunkLayout) -> (IVec3, IVec3) {
        let lo = ((self.min + Vec3::splat(SKIN)) / layout.block_size).floor().as_ivec3();
        let hi = ((self.max - Vec3::splat(SKIN)) / layout.block_size).floor().as_ivec3();
        (lo, hi)
    }
}

/// Try to move `bounds` by `delta` along one axis (0 = x, 1 = y, 2 = z).
///
/// Cell layers are scanned nearest-first in the direction of motion across
/// the swept range; the first layer holding a blocking cell stops the move
/// at that cell's boundary. Cells the box already overlaps are ignored so an
/// observer embedded by an edit can walk out. Returns the distance actually
/// travelled and whether the move was cut short.
pub fn sweep_axis(
    bounds: &Aabb,
    axis: usize,
    delta: f32,
    layout: &ChunkLayout,
    is_blocking: impl Fn(IVec3) -> bool,
) -> (f32, bool) {
    if delta == 0.0 {
        return (0.0, false);
    }

    let size = layout.block_size;
    let (lo, hi) = bounds.block_range(layout);
    let (a, b) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    let leading = if delta > 0.0 { bounds.max[axis] } else { bounds.min[axis] };
    let first = (leading / size).floor() as i32;
    let last = ((leading + delta) / size).floor() as i32;
    let step = if delta > 0.0 { 1 } else { -1 };

    let mut layer = first;
    loop {
        let face = if delta > 0.0 {
            layer as f32 * size
        } else {
            (layer + 1) as f32 * size
        };
        // Only cells fully ahead of the leading face can stop us
        let ahead = if delta > 0.0 { face >= leading - SKIN } else { face <= leading + SKIN };

        if ahead {
            for i in lo[a]..=hi[a] {
                for j in lo[b]..=hi[b] {
                    let mut cell = IVec3::ZERO;
                    cell[axis] = layer;
                    cell[a] = i;
                    cell[b] = j;
                    if is_blocking(cell) {
                        let allowed = if delta > 0.0 {
                            (face - SKIN - leading).max(0.0)
                        } else {
                            (face + SKIN - leading).min(0.0)
                        };
                        return (allowed, true);
                    }
                }
            }
        }

        if layer == last {
            return (delta, false);
        }
        layer += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ChunkLayout {
        ChunkLayout::new(16, 16, 1.0)
    }

    #[test]
    fn test_touching_is_not_overlapping() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let c = Aabb::new(Vec3::splat(0.5), Vec3::splat(1.5));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_block_range() {
        let bounds = Aabb::from_feet(Vec3::new(0.5, 3.0, -0.5), 0.6, 1.8);
        let (lo, hi) = bounds.block_range(&layout());
        assert_eq!(lo, IVec3::new(0, 3, -1));
        assert_eq!(hi, IVec3::new(0, 4, -1));
    }

    #[test]
    fn test_fall_onto_floor() {
        let floor = |cell: IVec3| cell.y <= 2;
        let bounds = Aabb::from_feet(Vec3::new(0.5, 3.5, 0.5), 0.6, 1.8);

        let (moved, hit) = sweep_axis(&bounds, 1, -2.0, &layout(), floor);
        assert!(hit);
        assert!((moved + 0.5 - SKIN).abs() < 1e-5);

        // Short fall that doesn't reach the floor
        let (moved, hit) = sweep_axis(&bounds, 1, -0.25, &layout(), floor);
        assert!(!hit);
        assert_eq!(moved, -0.25);
    }

    #[test]
    fn test_large_step_does_not_tunnel() {
        let thin_wall = |cell: IVec3| cell.x == 6;
        let bounds = Aabb::from_feet(Vec3::new(0.5, 3.0, 0.5), 0.6, 1.8);
        let (moved, hit) = sweep_axis(&bounds, 0, 40.0, &layout(), thin_wall);
        assert!(hit);
        assert!((bounds.max.x + moved - (6.0 - SKIN)).abs() < 1e-4);
    }

    #[test]
    fn test_resting_contact_stays_put() {
        let wall = |cell: IVec3| cell.z == -3;
        let mut bounds = Aabb::from_feet(Vec3::new(0.5, 3.0, 0.0), 0.6, 1.8);
        let (moved, _) = sweep_axis(&bounds, 2, -5.0, &layout(), wall);
        bounds.min.z += moved;
        bounds.max.z += moved;

        let (again, hit) = sweep_axis(&bounds, 2, -0.1, &layout(), wall);
        assert!(hit);
        assert!(again.abs() < 1e-5);
        assert!(!bounds.intersects(&Aabb::block(&layout(), IVec3::new(0, 3, -3))));
    }

    #[test]
    fn test_embedded_cells_are_ignored() {
        // Box sits inside a solid column; only the cell ahead should matter
        let column = |cell: IVec3| cell.x == 0 || cell.x == 3;
        let bounds = Aabb::from_feet(Vec3::new(0.5, 3.0, 0.5), 0.6, 1.8);
        let (moved, hit) = sweep_axis(&bounds, 0, 5.0, &layout(), column);
        assert!(hit);
        assert!((bounds.max.x + moved - (3.0 - SKIN)).abs() < 1e-4);
    }
}
