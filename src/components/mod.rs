mod observer;

pub use observer::{Observer, PITCH_LIMIT};
