//! The shuffled play order.
//!
//! The playlist owns the scanned tracks in a random order plus a cursor.
//! Every full pass through the list is followed by an immediate reshuffle,
//! so consecutive cycles use independent orders.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::info;

use crate::library::Track;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("no tracks to play")]
    Empty,
}

pub struct ShuffledPlaylist {
    tracks: Vec<Track>,
    cursor: usize,
    rng: StdRng,
    avoid_immediate_repeat: bool,
}

impl ShuffledPlaylist {
    /// An empty playlist. A `seed` makes every shuffle reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            tracks: Vec::new(),
            cursor: 0,
            rng,
            avoid_immediate_repeat: false,
        }
    }

    /// Keep a reshuffle from opening with the track that just closed the previous pass.
    pub fn with_avoid_immediate_repeat(mut self, on: bool) -> Self {
        self.avoid_immediate_repeat = on;
        self
    }

    /// Replace the contents with a fresh permutation of `tracks` and rewind.
    pub fn rebuild(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.tracks.shuffle(&mut self.rng);
        self.cursor = 0;
    }

    /// Return the track under the cursor and advance, reshuffling on wraparound.
    pub fn next(&mut self) -> Result<Track, PlaylistError> {
        if self.tracks.is_empty() {
            return Err(PlaylistError::Empty);
        }

        let track = self.tracks[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.tracks.len();

        if self.cursor == 0 {
            info!(count = self.tracks.len(), "reshuffling playlist");
            self.tracks.shuffle(&mut self.rng);
            if self.avoid_immediate_repeat && self.tracks.len() > 1 && self.tracks[0] == track {
                let swap_with = self.rng.gen_range(1..self.tracks.len());
                self.tracks.swap(0, swap_with);
            }
        }

        Ok(track)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The current order; `next()` walks it from the cursor.
    pub fn order(&self) -> &[Track] {
        &self.tracks
    }
}
