use bevy::prelude::*;

use crate::blocks::BlockType;

/// One frame of raw input, written by whatever captures devices before
/// `Update` runs. Triggers are edge events and are cleared after use.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub look_delta: Vec2,
    pub break_block: bool,
    pub place_block: bool,
    /// Block type in hand; `None` means placing does nothing
    pub selected: Option<BlockType>,
}

impl InputState {
    /// Movement intent in the observer's frame: x = strafe right, y = forward
    pub fn movement_axes(&self) -> Vec2 {
        let mut axes = Vec2::ZERO;
        if self.forward {
            axes.y += 1.0;
        }
        if self.back {
            axes.y -= 1.0;
        }
        if self.right {
            axes.x += 1.0;
        }
        if self.left {
            axes.x -= 1.0;
        }
        axes.normalize_or_zero()
    }

    /// Drop the one-shot signals once a frame has consumed them
    pub fn clear_triggers(&mut self) {
        self.jump = false;
        self.look_delta = Vec2::ZERO;
        self.break_block = false;
        self.place_block = false;
    }
}
