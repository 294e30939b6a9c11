// loophost - hosts a dynamically loaded instrument and drives it with a
// looping MIDI sequence scheduled sample-accurately inside the audio
// callback

pub mod audio;
pub mod config;
pub mod instrument;
pub mod messaging;
pub mod midi;
pub mod score;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use audio::{render_block, AudioEngine, AudioError, BlockBuffer};
pub use config::HostConfig;
pub use instrument::{Instrument, InstrumentError, LoadedInstrument};
pub use messaging::{create_notification_channel, Notification, NotificationLevel};
pub use midi::{MidiEvent, MidiEventTimed};
pub use score::{NoteEvent, Score};
pub use sequencer::{schedule_block, Transport};
