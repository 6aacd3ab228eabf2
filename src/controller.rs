//! The playback state machine.
//!
//! `Controller::handle` is the only way session state changes. The runtime
//! feeds it switch edges and poll ticks from a single thread, so transitions
//! never overlap.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::audio::MediaBackend;
use crate::library::Track;
use crate::playlist::{PlaylistError, ShuffledPlaylist};

/// Whether the switch currently asks for music.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Playing,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    SwitchActivated,
    SwitchDeactivated,
    /// Periodic check for a finished track.
    Poll,
}

pub struct Controller<B: MediaBackend> {
    backend: B,
    playlist: ShuffledPlaylist,
    state: SessionState,
    current: Option<Track>,
    empty_reported: bool,
    empty_reports: usize,
    stall_reported: bool,
}

impl<B: MediaBackend> Controller<B> {
    pub fn new(backend: B, playlist: ShuffledPlaylist) -> Self {
        Self {
            backend,
            playlist,
            state: SessionState::Idle,
            current: None,
            empty_reported: false,
            empty_reports: 0,
            stall_reported: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The track handed to the backend most recently, while playing.
    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// How many times an empty playlist has been reported.
    #[cfg(test)]
    pub(crate) fn empty_playlist_reports(&self) -> usize {
        self.empty_reports
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    pub fn handle(&mut self, event: ControllerEvent) {
        match (self.state, event) {
            (SessionState::Idle, ControllerEvent::SwitchActivated) => {
                info!("switch ON - starting playback");
                self.state = SessionState::Playing;
                self.advance();
            }
            (SessionState::Playing, ControllerEvent::SwitchDeactivated) => {
                info!("switch OFF - stopping playback");
                self.state = SessionState::Idle;
                self.current = None;
                self.empty_reported = false;
                self.stall_reported = false;
                self.backend.stop();
            }
            (SessionState::Playing, ControllerEvent::Poll) => {
                let finished = match self.current {
                    // Nothing loaded (empty playlist or every load failed): try again.
                    None => true,
                    Some(_) => self.backend.status().ends_track(),
                };
                if finished {
                    self.advance();
                }
            }
            (SessionState::Playing, ControllerEvent::SwitchActivated)
            | (SessionState::Idle, ControllerEvent::SwitchDeactivated)
            | (SessionState::Idle, ControllerEvent::Poll) => {}
        }
    }

    /// Stop whatever is playing and let go of the backend.
    pub fn shutdown(&mut self, fade_out: Duration) {
        self.state = SessionState::Idle;
        self.current = None;
        self.backend.release(fade_out);
    }

    /// Load and start the next playable track; at most one attempt per track.
    ///
    /// Once nothing could be played, later calls try a single track each.
    fn advance(&mut self) {
        self.current = None;
        let total = self.playlist.len();
        let mut tried: HashSet<Track> = HashSet::new();

        // Two passes always cover every track, even across a reshuffle.
        let budget = if self.stall_reported {
            1
        } else {
            (total * 2).max(1)
        };
        for _ in 0..budget {
            let track = match self.playlist.next() {
                Ok(t) => t,
                Err(PlaylistError::Empty) => {
                    if !self.empty_reported {
                        warn!("no tracks to play; waiting with the switch ON");
                        self.empty_reported = true;
                        self.empty_reports += 1;
                    }
                    return;
                }
            };
            if !tried.insert(track.clone()) {
                continue;
            }

            match self
                .backend
                .load(track.path())
                .and_then(|()| self.backend.play())
            {
                Ok(()) => {
                    info!(track = %track, "playing");
                    self.current = Some(track);
                    self.stall_reported = false;
                    return;
                }
                Err(e) if self.stall_reported => {
                    debug!(path = %track.path().display(), error = %e, "still unable to play track");
                }
                Err(e) => {
                    warn!(path = %track.path().display(), error = %e, "skipping track that failed to play");
                }
            }

            if tried.len() == total {
                break;
            }
        }

        if !self.stall_reported {
            error!(tried = tried.len(), "no track could be played; retrying one track per poll");
            self.stall_reported = true;
        }
    }
}
