// MIDI event types

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
}

/// MIDI event with sample-accurate timing
/// `sample_offset` is the position of this event relative to the first
/// sample of the audio block it was scheduled into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEventTimed {
    pub event: MidiEvent,
    pub sample_offset: u32,
}

/// Map a normalized velocity in (0.0, 1.0] onto the MIDI range 1-127
///
/// 0 is never produced: a note-on with velocity 0 means note-off on the
/// wire, which is not what the score intends.
pub fn velocity_to_midi(velocity: f32) -> u8 {
    ((velocity * 127.0).round() as u8).clamp(1, 127)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_full_scale() {
        assert_eq!(velocity_to_midi(1.0), 127);
    }

    #[test]
    fn test_velocity_midpoint() {
        // 0.5 * 127 = 63.5, rounds up
        assert_eq!(velocity_to_midi(0.5), 64);
    }

    #[test]
    fn test_velocity_never_zero() {
        // Tiny but nonzero velocities must stay audible note-ons
        assert_eq!(velocity_to_midi(0.001), 1);
    }

    #[test]
    fn test_timed_event_fields() {
        let timed = MidiEventTimed {
            event: MidiEvent::NoteOn {
                note: 60,
                velocity: 100,
            },
            sample_offset: 256,
        };

        assert_eq!(timed.sample_offset, 256);
        match timed.event {
            MidiEvent::NoteOn { note, velocity } => {
                assert_eq!(note, 60);
                assert_eq!(velocity, 100);
            }
            _ => panic!("Expected NoteOn"),
        }
    }
}
