// Instrument hosting - the boundary to the third-party instrument
// The host only ever sees this trait; the real synthesis lives in a cdylib

pub mod host;

pub use host::LoadedInstrument;

use crate::audio::buffer::BlockBuffer;
use crate::midi::MidiEventTimed;
use thiserror::Error;

/// Instrument-related errors
#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("Failed to load instrument: {0}")]
    LoadFailed(String),

    #[error("Instrument entry point not found: {0}")]
    MissingEntryPoint(String),

    #[error("Instrument prepare failed: {0}")]
    PrepareFailed(String),

    #[error("Instrument processing failed: {0}")]
    ProcessingFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Library loading error: {0}")]
    Library(#[from] libloading::Error),
}

pub type InstrumentResult<T> = Result<T, InstrumentError>;

/// The hosted instrument's processing contract
///
/// `prepare` is called once before the first block with the negotiated
/// sample rate and the largest block size the host will ever pass;
/// `release` once after the last block. Between the two, `process` is called
/// from the real-time callback: it receives a zeroed buffer plus the MIDI
/// events for this block (offsets in `[0, num_frames)`, not necessarily
/// sorted) and renders audio into the buffer in place. Implementations must
/// not allocate or block inside `process`.
pub trait Instrument: Send {
    /// Human-readable instrument name
    fn name(&self) -> &str;

    fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> InstrumentResult<()>;

    fn process(
        &mut self,
        buffer: &mut BlockBuffer,
        events: &[MidiEventTimed],
        num_frames: usize,
    ) -> InstrumentResult<()>;

    fn release(&mut self);
}
