mod registry;
mod block_type;

pub use registry::BlockRegistry;
pub use block_type::{BlockDefinition, BlockDefinitionBuilder, BlockFace, BlockProperties, BlockType};
