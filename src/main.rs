use loophost::messaging::NotificationLevel;
use loophost::{create_notification_channel, AudioEngine, HostConfig, LoadedInstrument, Score};
use ringbuf::traits::Consumer;
use std::path::Path;
use std::time::Duration;

// The callback reports at most one fatal notification per session plus the
// occasional device warning; a small channel is plenty.
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 64;

const DEFAULT_CONFIG_PATH: &str = "loophost.ron";

fn main() {
    println!("=== loophost ===\n");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = match HostConfig::load(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            println!("No usable config at {} ({}), using defaults", config_path, e);
            HostConfig::default()
        }
    };

    println!(
        "Tempo {} BPM, loop {} beats",
        config.bpm, config.loop_length_beats
    );

    println!("Loading instrument from {}...", config.plugin_path.display());
    let instrument = match LoadedInstrument::load(&config.plugin_path) {
        Ok(instrument) => instrument,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };

    let (notification_tx, mut notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);

    println!("Audio engine initialisation...");
    let engine = match AudioEngine::new(
        Box::new(instrument),
        Score::demo_melody(),
        config.bpm,
        config.loop_length_beats,
        notification_tx,
    ) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };

    println!("\n=== Playing (Ctrl+C to quit) ===\n");

    // The stream runs on its own thread; here we only surface what it
    // reports. A fatal notification means the stream is dead and there is
    // nothing to do but tear the session down.
    loop {
        while let Some(notification) = notification_rx.try_pop() {
            match notification.level {
                NotificationLevel::Error => {
                    eprintln!("FATAL: {}", notification.message);
                    engine.stop();
                    return;
                }
                NotificationLevel::Warning => eprintln!("WARNING: {}", notification.message),
                NotificationLevel::Info => println!("{}", notification.message),
            }
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}
