//! Switch input: the `InputDevice` contract and its adapters.
//!
//! An adapter watches one digital line and reports debounced level changes
//! as `SwitchEdge`s through a callback. The controller never reads the line.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use thiserror::Error;

use crate::config::{InputKind, InputSettings};

mod console;
mod debounce;
#[cfg(feature = "gpio")]
mod gpio;

pub use console::ConsoleSwitch;
pub use debounce::Debouncer;
#[cfg(feature = "gpio")]
pub use gpio::GpioSwitch;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SwitchEdge {
    Activated,
    Deactivated,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot open GPIO pin {pin}: {reason}")]
    Gpio { pin: u8, reason: String },
    #[error("GPIO input requested but this build lacks the `gpio` feature")]
    Unsupported,
    #[error("failed to start input thread: {0}")]
    Thread(#[from] io::Error),
}

pub type EdgeCallback = Box<dyn FnMut(SwitchEdge) + Send + 'static>;

pub trait InputDevice {
    /// Claim the line and start reporting edges to `on_edge`.
    fn start(self: Box<Self>, on_edge: EdgeCallback) -> Result<InputHandle, InputError>;
}

/// Keeps an adapter running; dropping it asks the adapter thread to finish.
pub struct InputHandle {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl InputHandle {
    pub(crate) fn new(stop: Arc<AtomicBool>, join: Option<JoinHandle<()>>) -> Self {
        Self { stop, join }
    }
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

/// Build the adapter selected by `settings.kind`.
pub fn open_device(settings: &InputSettings) -> Result<Box<dyn InputDevice>, InputError> {
    match settings.kind {
        InputKind::Console => Ok(Box::new(ConsoleSwitch::new())),
        #[cfg(feature = "gpio")]
        InputKind::Gpio => Ok(Box::new(GpioSwitch::new(settings))),
        #[cfg(not(feature = "gpio"))]
        InputKind::Gpio => Err(InputError::Unsupported),
    }
}
