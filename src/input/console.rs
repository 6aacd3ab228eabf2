use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tracing::{info, warn};

use super::{EdgeCallback, InputDevice, InputError, InputHandle, SwitchEdge};

/// Bench stand-in for the physical switch, driven by lines on stdin.
///
/// `on`/`1` activates, `off`/`0` deactivates, an empty line flips the last position.
pub struct ConsoleSwitch {
    on: bool,
}

impl ConsoleSwitch {
    pub fn new() -> Self {
        Self { on: false }
    }

    fn interpret(&mut self, line: &str) -> Option<SwitchEdge> {
        let edge = match line.trim().to_ascii_lowercase().as_str() {
            "on" | "1" => SwitchEdge::Activated,
            "off" | "0" => SwitchEdge::Deactivated,
            "" if self.on => SwitchEdge::Deactivated,
            "" => SwitchEdge::Activated,
            _ => return None,
        };
        self.on = edge == SwitchEdge::Activated;
        Some(edge)
    }
}

impl Default for ConsoleSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDevice for ConsoleSwitch {
    fn start(mut self: Box<Self>, mut on_edge: EdgeCallback) -> Result<InputHandle, InputError> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = stop.clone();

        info!("console switch ready: type `on`, `off`, or press Enter to toggle");
        // Detached: a blocking stdin read cannot be interrupted, so the handle does not join it.
        thread::Builder::new()
            .name("console-switch".into())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    if stop_for_thread.load(Ordering::Relaxed) {
                        break;
                    }
                    let Ok(line) = line else { break };
                    match self.interpret(&line) {
                        Some(edge) => on_edge(edge),
                        None => warn!(input = %line.trim(), "unrecognized switch command"),
                    }
                }
            })?;

        Ok(InputHandle::new(stop, None))
    }
}
