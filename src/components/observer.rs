use bevy::prelude::*;

/// Pitch stays just short of straight up/down so the aim never flips
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// The moving viewpoint the world streams around. Exactly one per session.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub eye: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub yaw: f32,   // Horizontal rotation (left/right)
    pub pitch: f32, // Vertical rotation (up/down)
    /// Eye position used for void recovery
    pub spawn: Vec3,
}

impl Observer {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            eye: spawn,
            velocity: Vec3::ZERO,
            grounded: false,
            yaw: 0.0,
            pitch: 0.0,
            spawn,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Unit vector the observer is looking along
    pub fn aim(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Horizontal forward and right vectors for movement input
    pub fn ground_axes(&self) -> (Vec3, Vec3) {
        let forward = Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos());
        let right = Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin());
        (forward, right)
    }

    pub fn feet(&self, eye_height: f32) -> Vec3 {
        self.eye - Vec3::Y * eye_height
    }

    /// Turn by a look delta (screen-space, positive x = right, positive y = down)
    pub fn look(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}
