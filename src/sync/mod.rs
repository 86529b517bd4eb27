//! Edits made locally and the shared block store they are mirrored to.

mod apply;
mod edit;
mod record;
mod store;

pub use apply::{apply_remote_change, ApplyOutcome};
pub use edit::{break_block, place_block, EditContext, RemoteWrite};
pub use record::{block_key, parse_record_key, record_key, RemoteBlockRecord};
pub use store::{InMemoryBlockStore, RemoteBlockStore, RemoteChange};
