use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use crate::audio::RodioBackend;
use crate::config::Settings;
use crate::controller::Controller;
use crate::input;

mod event_loop;
mod settings;
mod signals;
mod startup;

pub use event_loop::ControlEvent;
pub use settings::load_settings;

/// Scan, open the devices, and play until interrupted.
///
/// `dir_arg` overrides `library.directory`. Errors are startup failures; the
/// loop itself never fails.
pub fn run(settings: Settings, dir_arg: Option<String>) -> anyhow::Result<()> {
    let dir = startup::music_dir(&settings.library, dir_arg);
    let playlist = startup::build_playlist(&settings, &dir);

    let backend = RodioBackend::open().context("cannot open the audio output")?;
    let mut controller = Controller::new(backend, playlist);

    let (tx, rx) = mpsc::channel::<ControlEvent>();

    let device = input::open_device(&settings.input).context("switch input unavailable")?;
    let edge_tx = tx.clone();
    let _input = device
        .start(Box::new(move |edge: input::SwitchEdge| {
            let _ = edge_tx.send(ControlEvent::Switch(edge));
        }))
        .context("switch input unavailable")?;

    signals::spawn_shutdown_listener(tx).context("cannot install signal handlers")?;

    let poll_interval = Duration::from_millis(settings.playback.poll_interval_ms);
    info!(
        dir = %dir.display(),
        poll_interval_ms = settings.playback.poll_interval_ms,
        "player ready; flip the switch to start playback"
    );

    event_loop::run(&mut controller, &rx, poll_interval);

    if let Some(track) = controller.current_track() {
        info!(track = %track, "stopping playback");
    }
    controller.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));
    info!("goodbye");
    Ok(())
}
