pub mod known_ids;
pub mod push;

pub use known_ids::load_known_ids;
pub use push::{push, PushConfig};
