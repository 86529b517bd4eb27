use bevy::prelude::*;

use crate::resources::InputState;

/// Edge triggers last one frame; held keys and the selection persist
pub fn clear_input_triggers(mut input: ResMut<InputState>) {
    input.clear_triggers();
}
