mod input;
mod remote;

pub use input::InputState;
pub use remote::RemoteSync;
