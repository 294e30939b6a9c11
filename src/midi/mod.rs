// MIDI module

pub mod event;

pub use event::{velocity_to_midi, MidiEvent, MidiEventTimed};
