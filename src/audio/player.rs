use std::path::Path;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use super::sink::{create_sink, fade_out_sink};
use super::types::{BackendError, MediaBackend, PlayerStatus};

/// `MediaBackend` on top of rodio's default output device.
pub struct RodioBackend {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    failed: bool,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open() -> Result<Self, BackendError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| BackendError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; shutdown is logged by us.
        stream.log_on_drop(false);

        Ok(Self {
            stream: Some(stream),
            sink: None,
            failed: false,
        })
    }
}

impl MediaBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<(), BackendError> {
        self.stop();
        let Some(stream) = self.stream.as_ref() else {
            return Err(BackendError::Device("output released".to_string()));
        };
        match create_sink(stream, path) {
            Ok(sink) => {
                self.sink = Some(sink);
                Ok(())
            }
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }

    fn play(&mut self) -> Result<(), BackendError> {
        let sink = self.sink.as_ref().ok_or(BackendError::NothingLoaded)?;
        sink.play();
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.failed = false;
    }

    fn status(&self) -> PlayerStatus {
        match self.sink.as_ref() {
            None if self.failed => PlayerStatus::Error,
            None => PlayerStatus::Stopped,
            Some(s) if s.is_paused() => PlayerStatus::Paused,
            Some(s) if s.empty() => PlayerStatus::Ended,
            Some(_) => PlayerStatus::Playing,
        }
    }

    fn release(&mut self, fade_out: Duration) {
        if let Some(s) = self.sink.as_ref() {
            if !s.is_paused() && !s.empty() {
                fade_out_sink(s, fade_out);
            }
        }
        self.stop();
        if self.stream.take().is_some() {
            debug!("audio output released");
        }
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.stop();
    }
}
