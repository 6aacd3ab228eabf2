//! Utilities for creating `rodio` sinks from file paths.
//!
//! The helpers here encapsulate opening/decoding a file into a paused
//! `Sink`, and fading a sink out before it is stopped.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink};

use super::types::BackendError;

/// Create a paused `Sink` holding the decoded contents of `path`.
pub(super) fn create_sink(handle: &OutputStream, path: &Path) -> Result<Sink, BackendError> {
    let source = open_decoder(path)?;
    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

/// Decode `path` as a seekable source of known length.
///
/// MP4 files with the index after the media data only open when the
/// demuxer may seek.
pub(super) fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, BackendError> {
    let open_err = |source| BackendError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_err)?;
    let byte_len = file.metadata().map_err(open_err)?.len();

    let mut builder = Decoder::builder()
        .with_data(BufReader::new(file))
        .with_byte_len(byte_len)
        .with_seekable(true);
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        builder = builder.with_hint(ext);
    }

    builder.build().map_err(|e| BackendError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Ramp the volume down to silence over `fade_out`; blocks for that long.
pub(super) fn fade_out_sink(sink: &Sink, fade_out: Duration) {
    if fade_out.is_zero() {
        sink.set_volume(0.0);
        return;
    }
    let steps: u32 = 20;
    let step = (fade_out / steps).max(Duration::from_millis(1));
    sink.set_volume(1.0);
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(step);
    }
    sink.set_volume(0.0);
}
