// Render step - per-block glue between scheduler, instrument and transport
//
// Runs entirely inside the real-time callback: no allocation, no blocking,
// no retry. An instrument failure is fatal for the stream and propagates to
// the caller.

use crate::audio::buffer::BlockBuffer;
use crate::instrument::{Instrument, InstrumentResult};
use crate::midi::MidiEventTimed;
use crate::score::Score;
use crate::sequencer::{schedule_block, Transport};

/// Render one audio block.
///
/// Computes this block's MIDI events, hands them to the instrument together
/// with the zeroed scratch buffer, and advances the transport by exactly
/// `num_frames`. Degenerate blocks (`num_frames <= 0`) skip the instrument
/// entirely but still advance the transport by the given amount.
///
/// After a successful return, `scratch` holds the instrument's rendered
/// audio for `num_frames` frames and `events` holds the block's event set
/// (kept for inspection; it is cleared again on the next call).
pub fn render_block(
    instrument: &mut dyn Instrument,
    score: &Score,
    transport: &mut Transport,
    scratch: &mut BlockBuffer,
    events: &mut Vec<MidiEventTimed>,
    num_frames: i64,
) -> InstrumentResult<()> {
    events.clear();
    schedule_block(score, transport, num_frames, events);

    let result = if num_frames > 0 {
        scratch.clear();
        instrument.process(scratch, events, num_frames as usize)
    } else {
        Ok(())
    };

    transport.advance(num_frames);
    result
}
