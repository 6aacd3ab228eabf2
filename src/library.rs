//! Library scanning: turns a music directory into the list of playable tracks.

use std::path::PathBuf;

use thiserror::Error;

mod model;
mod scan;

pub use model::Track;
pub use scan::{load_playlist, scan};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("music directory {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),
}
