//! Media backend contract.
//!
//! The controller drives any player through `MediaBackend`: load a file,
//! start it, stop it, and poll how it is doing.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// What the player reports when polled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Audio is being produced.
    Playing,
    /// Loaded but held; not finished.
    Paused,
    /// The loaded track played to its end.
    Ended,
    /// Nothing is loaded or playback was stopped.
    Stopped,
    /// The last load or playback attempt failed.
    Error,
}

impl PlayerStatus {
    /// Whether a track that should be playing needs to be replaced.
    pub fn ends_track(self) -> bool {
        matches!(self, Self::Ended | Self::Stopped | Self::Error)
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no audio output device: {0}")]
    Device(String),
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("nothing loaded")]
    NothingLoaded,
}

pub trait MediaBackend {
    /// Prepare `path` for playback without starting it.
    fn load(&mut self, path: &Path) -> Result<(), BackendError>;

    /// Start the loaded track.
    fn play(&mut self) -> Result<(), BackendError>;

    fn stop(&mut self);

    fn status(&self) -> PlayerStatus;

    /// Stop (fading out over `fade_out` where supported) and let go of the output device.
    fn release(&mut self, fade_out: Duration) {
        let _ = fade_out;
        self.stop();
    }
}
