//! Observer movement: drag, gravity and input, then per-axis collision
//! against the chunk store in the fixed order x, z, y.

mod collision;

pub use collision::{sweep_axis, Aabb, SKIN};

use bevy::prelude::*;

use crate::blocks::BlockRegistry;
use crate::components::Observer;
use crate::config::PhysicsConfig;
use crate::resources::InputState;
use crate::world::{ChunkLayout, ChunkStore, TerrainGenerator};

/// Axis order for collision resolution: x, then z, then y
const AXIS_ORDER: [usize; 3] = [0, 2, 1];

/// Whether a cell stops the observer. Unknown chunks never do.
pub fn is_blocking(store: &ChunkStore, block_registry: &BlockRegistry, cell: IVec3) -> bool {
    store
        .get_block(cell)
        .is_some_and(|block| block_registry.is_solid(block))
}

pub fn observer_bounds(observer: &Observer, physics: &PhysicsConfig) -> Aabb {
    Aabb::from_feet(
        observer.feet(physics.eye_height),
        physics.observer_width,
        physics.observer_height,
    )
}

/// Advance the observer by one tick. Pure: the result depends only on the
/// previous state, the input, `dt` and the world.
pub fn step_observer(
    previous: &Observer,
    input: &InputState,
    dt: f32,
    store: &ChunkStore,
    block_registry: &BlockRegistry,
    physics: &PhysicsConfig,
) -> Observer {
    let mut observer = *previous;
    observer.look(input.look_delta, physics.look_sensitivity);

    // Drag on the horizontal plane, gravity on the vertical
    let drag = if observer.grounded { physics.ground_drag } else { physics.air_drag };
    let damping = (-drag * dt).exp();
    observer.velocity.x *= damping;
    observer.velocity.z *= damping;
    observer.velocity.y = (observer.velocity.y - physics.gravity * dt).max(-physics.terminal_velocity);

    let axes = input.movement_axes();
    if axes != Vec2::ZERO {
        let (forward, right) = observer.ground_axes();
        let acceleration = if observer.grounded {
            physics.ground_acceleration
        } else {
            physics.air_acceleration
        };
        observer.velocity += (forward * axes.y + right * axes.x) * acceleration * dt;
    }

    if input.jump && observer.grounded {
        observer.velocity.y = physics.jump_speed;
    }
    observer.grounded = false;

    let layout = store.layout();
    let mut bounds = observer_bounds(&observer, physics);
    for axis in AXIS_ORDER {
        let delta = observer.velocity[axis] * dt;
        let (moved, blocked) = sweep_axis(&bounds, axis, delta, layout, |cell| {
            is_blocking(store, block_registry, cell)
        });

        bounds.min[axis] += moved;
        bounds.max[axis] += moved;
        observer.eye[axis] += moved;

        if blocked {
            if axis == 1 && delta < 0.0 {
                observer.grounded = true;
            }
            observer.velocity[axis] = 0.0;
        }
    }

    if observer.feet(physics.eye_height).y < physics.void_threshold {
        info!("Observer fell out of the world at {:?}, respawning", observer.eye);
        observer.eye = observer.spawn;
        observer.velocity = Vec3::ZERO;
        observer.grounded = false;
    }

    observer
}

/// Eye position above the terrain surface of a world column
pub fn spawn_position(
    generator: &TerrainGenerator,
    layout: &ChunkLayout,
    physics: &PhysicsConfig,
    column: IVec2,
) -> Vec3 {
    let surface = generator.surface_height(column.x, column.y);
    let feet = layout.block_origin(IVec3::new(column.x, surface + 1, column.y));
    let half = layout.block_size / 2.0;

    Vec3::new(feet.x + half, feet.y + physics.eye_height + 0.1, feet.z + half)
}
