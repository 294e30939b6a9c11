// Loop scheduler - sample-accurate MIDI event derivation per audio block
//
// Each block is scheduled independently from the transport position alone:
// there is no "currently sounding notes" set. A note spanning a block
// boundary is two unrelated events, its note-on in one block and its
// note-off in a later one. Correct voice handling is the instrument's job.
//
// When the loop wraps mid-note, the note-off fires in the next cycle and the
// heard sustain is shortened. That is accepted, observable behavior of the
// stateless design, not a bug.

use crate::midi::{velocity_to_midi, MidiEvent, MidiEventTimed};
use crate::score::Score;
use crate::sequencer::transport::Transport;

/// Compute the MIDI events falling inside the block of `num_samples` samples
/// starting at the transport's current position, and append them to `out`.
///
/// Events carry sample offsets in `[0, num_samples)`. They are appended in
/// score-iteration order, not offset order; ordering simultaneous events is
/// delegated to the instrument. `out` is caller-provided so the steady state
/// allocates nothing; the caller clears it between blocks.
///
/// A block with `num_samples <= 0` produces no events. The function is pure
/// in `(sample_position, samples_per_beat, loop length, score)`: identical
/// inputs always yield the identical event sequence.
pub fn schedule_block(
    score: &Score,
    transport: &Transport,
    num_samples: i64,
    out: &mut Vec<MidiEventTimed>,
) {
    if num_samples <= 0 {
        return;
    }

    let samples_per_beat = transport.samples_per_beat();
    let loop_len = transport.loop_length_beats();

    let position = transport.sample_position();
    let block_start_beat = position as f64 / samples_per_beat;
    let block_end_beat = (position + num_samples as u64) as f64 / samples_per_beat;

    let loop_start = block_start_beat % loop_len;
    let loop_end = block_end_beat % loop_len;

    // The block's beat window crosses a loop-cycle boundary somewhere inside
    // the block.
    let wrapped = loop_end < loop_start;

    for note in score.notes() {
        let on_beat = note.start_beat % loop_len;
        if in_window(on_beat, loop_start, loop_end, wrapped) {
            if let Some(offset) =
                offset_in_block(on_beat, loop_start, loop_len, samples_per_beat, num_samples)
            {
                out.push(MidiEventTimed {
                    event: MidiEvent::NoteOn {
                        note: note.pitch,
                        velocity: velocity_to_midi(note.velocity),
                    },
                    sample_offset: offset,
                });
            }
        }

        let off_beat = note.end_beat() % loop_len;
        if in_window(off_beat, loop_start, loop_end, wrapped) {
            if let Some(offset) =
                offset_in_block(off_beat, loop_start, loop_len, samples_per_beat, num_samples)
            {
                out.push(MidiEventTimed {
                    event: MidiEvent::NoteOff { note: note.pitch },
                    sample_offset: offset,
                });
            }
        }
    }
}

/// Window membership for a loop-relative event time.
///
/// The lower bound is inclusive and the upper bound exclusive; which block a
/// boundary event lands in depends on exactly this operator pair, so it must
/// not change.
fn in_window(t: f64, loop_start: f64, loop_end: f64, wrapped: bool) -> bool {
    if wrapped {
        t >= loop_start || t < loop_end
    } else {
        t >= loop_start && t < loop_end
    }
}

/// Convert an in-window event time to a sample offset within the block.
///
/// Returns `None` when floating-point error at the window edges pushes the
/// offset outside `[0, num_samples)`; the event is then silently dropped for
/// this block (at most one sample of jitter at loop edges, by design).
fn offset_in_block(
    t: f64,
    loop_start: f64,
    loop_len: f64,
    samples_per_beat: f64,
    num_samples: i64,
) -> Option<u32> {
    let mut beat_offset = t - loop_start;
    if beat_offset < 0.0 {
        // Wrapped window, event time lies after the cycle boundary
        beat_offset += loop_len;
    }

    let offset = (beat_offset * samples_per_beat).floor() as i64;
    if offset >= 0 && offset < num_samples {
        Some(offset as u32)
    } else {
        None
    }
}
