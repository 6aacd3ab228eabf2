use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::audio::MediaBackend;
use crate::controller::{Controller, ControllerEvent};
use crate::input::SwitchEdge;

/// Everything that reaches the controller thread from the outside.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    Switch(SwitchEdge),
    Shutdown,
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Switch(SwitchEdge),
    Shutdown,
}

/// Fold `first` and whatever is already queued into one step.
///
/// Only the last switch position matters; a shutdown anywhere in the batch wins.
fn coalesce(first: ControlEvent, rx: &Receiver<ControlEvent>) -> Step {
    let mut last = match first {
        ControlEvent::Switch(edge) => edge,
        ControlEvent::Shutdown => return Step::Shutdown,
    };
    while let Ok(ev) = rx.try_recv() {
        match ev {
            ControlEvent::Switch(edge) => last = edge,
            ControlEvent::Shutdown => return Step::Shutdown,
        }
    }
    Step::Switch(last)
}

/// Drive `controller` until a shutdown request arrives or every sender is gone.
///
/// Switch events are applied as they arrive; a poll runs every `poll_interval`.
pub fn run<B: MediaBackend>(
    controller: &mut Controller<B>,
    rx: &Receiver<ControlEvent>,
    poll_interval: Duration,
) {
    let mut next_poll = Instant::now() + poll_interval;

    loop {
        let wait = next_poll.saturating_duration_since(Instant::now());
        match rx.recv_timeout(wait) {
            Ok(ev) => match coalesce(ev, rx) {
                Step::Shutdown => break,
                Step::Switch(SwitchEdge::Activated) => {
                    controller.handle(ControllerEvent::SwitchActivated)
                }
                Step::Switch(SwitchEdge::Deactivated) => {
                    controller.handle(ControllerEvent::SwitchDeactivated)
                }
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                debug!("all event senders closed");
                break;
            }
        }

        let now = Instant::now();
        if now >= next_poll {
            controller.handle(ControllerEvent::Poll);
            next_poll = now + poll_interval;
        }
    }
}
