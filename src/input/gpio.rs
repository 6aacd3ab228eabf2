use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rppal::gpio::{Gpio, Level};
use tracing::{debug, info};

use crate::config::InputSettings;

use super::{Debouncer, EdgeCallback, InputDevice, InputError, InputHandle};

/// A switch on a Raspberry Pi GPIO line, sampled and debounced on its own thread.
pub struct GpioSwitch {
    pin: u8,
    active_low: bool,
    debounce: Duration,
    sample: Duration,
}

impl GpioSwitch {
    pub fn new(settings: &InputSettings) -> Self {
        Self {
            pin: settings.pin,
            active_low: settings.active_low,
            debounce: Duration::from_millis(settings.debounce_ms),
            sample: Duration::from_millis(settings.sample_ms.max(1)),
        }
    }
}

impl InputDevice for GpioSwitch {
    fn start(self: Box<Self>, mut on_edge: EdgeCallback) -> Result<InputHandle, InputError> {
        let err = |e: rppal::gpio::Error| InputError::Gpio {
            pin: self.pin,
            reason: e.to_string(),
        };
        let gpio = Gpio::new().map_err(err)?;
        let pin = gpio.get(self.pin).map_err(err)?;
        // Switch to ground with the internal pull-up, or to 3V3 with the pull-down.
        let line = if self.active_low {
            pin.into_input_pullup()
        } else {
            pin.into_input_pulldown()
        };
        let active_level = if self.active_low {
            Level::Low
        } else {
            Level::High
        };

        info!(
            pin = self.pin,
            active_low = self.active_low,
            debounce_ms = self.debounce.as_millis() as u64,
            "GPIO switch ready"
        );

        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = stop.clone();
        let mut debouncer = Debouncer::new(self.debounce);
        let sample = self.sample;

        let join = thread::Builder::new()
            .name("gpio-switch".into())
            .spawn(move || {
                while !stop_for_thread.load(Ordering::Relaxed) {
                    let active = line.read() == active_level;
                    if let Some(edge) = debouncer.update(active, Instant::now()) {
                        debug!(?edge, "switch edge");
                        on_edge(edge);
                    }
                    thread::sleep(sample);
                }
            })?;

        Ok(InputHandle::new(stop, Some(join)))
    }
}
