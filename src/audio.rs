//! Audio output: the `MediaBackend` contract and its rodio implementation.

mod player;
mod sink;
mod types;

pub use player::RodioBackend;
pub use types::{BackendError, MediaBackend, PlayerStatus};
