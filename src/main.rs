//! Sound pot entry point
//!
//! Runs a scripted session against the logging audio backend and the
//! simulated merge service. Set `RUST_LOG=debug` to see every step.
//!
//! Usage: `soundpot [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sound pot (native) starting...");

    let settings_json = std::env::args().nth(1).and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read settings from {}: {}", path, e);
            None
        }
    });
    let settings = soundpot::Settings::load_or_default(settings_json.as_deref());

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_time().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Failed to start async runtime: {}", e);
            return;
        }
    };
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, demo::run(settings));

    log::info!("Sound pot finished");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::Duration;

    use glam::Vec2;
    use soundpot::audio::LogAudio;
    use soundpot::consts::{DEFAULT_POT_HEIGHT, DEFAULT_POT_WIDTH, SIM_DT};
    use soundpot::service::SimulatedMergeService;
    use soundpot::sim::{CreationOrigin, DropTarget, Pot, PotEvent};
    use soundpot::{PotRuntime, Settings};

    pub async fn run(settings: Settings) {
        let mut pot = Pot::new(LogAudio::new(), settings);
        pot.resize(DEFAULT_POT_WIDTH, DEFAULT_POT_HEIGHT);
        let mut collisions = pot.subscribe_ripples();

        let runtime = PotRuntime::new(pot, SimulatedMergeService::new(Duration::from_millis(500)));

        let (rain, bell) = runtime.with_pot(|pot| {
            let rain = pot.add(Some("rain.wav"), Vec2::new(200.0, 300.0), CreationOrigin::Library);
            let bell = pot.add(Some("bell.wav"), Vec2::new(600.0, 300.0), CreationOrigin::Library);
            (rain, bell)
        });
        log::info!("Added rain #{} and bell #{}", rain, bell);

        // Drag bell onto rain
        runtime.with_pot(|pot| {
            pot.drag_start(bell);
            for step in 1..=10 {
                let x = 600.0 - 36.0 * step as f32;
                pot.drag_move(bell, Vec2::new(x, 300.0));
            }
            for (dragged, target) in pot.merge_preview() {
                log::info!("Dropping #{} would merge it with #{}", dragged, target);
            }
        });
        match runtime.drag_end(bell, Vec2::new(240.0, 300.0), DropTarget::Pot) {
            Some(merge) => log::info!("Merge {} requested", merge),
            None => log::warn!("Drop did not start a merge"),
        }

        runtime.with_pot(|pot| pot.tap(Vec2::new(400.0, 300.0)));
        let recording = runtime.start_recording(Vec2::new(400.0, 500.0));
        runtime.run_for(Duration::from_secs(4)).await;
        runtime.settle().await;
        if runtime.with_pot(|pot| pot.fulfil_pending(recording, "recording-1.wav")) {
            log::info!("Recording #{} saved", recording);
        }
        // Let the merged sound ring once more
        runtime.with_pot(|pot| pot.tap(Vec2::new(220.0, 300.0)));
        for _ in 0..60 {
            runtime.run_frame(SIM_DT);
        }

        while let Ok(collision) = collisions.try_recv() {
            log::info!("Ripple {} reached instance #{}", collision.ripple, collision.instance);
        }

        let events = runtime.with_pot(|pot| pot.drain_events());
        for event in &events {
            match event {
                PotEvent::MergeResolved { placeholder, sound } => {
                    log::info!("Placeholder #{} became \"{}\"", placeholder, sound)
                }
                PotEvent::MergeAborted { placeholder } => log::warn!("Merge into #{} aborted", placeholder),
                PotEvent::RecordingArmed { id } => log::info!("Microphone armed for #{}", id),
                other => log::debug!("{:?}", other),
            }
        }

        runtime.with_pot(|pot| {
            log::info!(
                "{} instance(s) in the pot, {} ripple(s) active, {} play call(s)",
                pot.registry().len(),
                pot.ripples().len(),
                pot.audio().played.len()
            );
        });
    }
}
