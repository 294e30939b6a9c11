// Score - immutable note material for the looper
// A score is an ordered list of note events; all timing is in beats

/// A single note in the score
///
/// `start_beat` is the beat offset within one loop cycle; values are taken
/// modulo the loop length at scheduling time, so the score does not need to
/// be beat-sorted or to fit inside one cycle. `start_beat + duration_beats`
/// may cross the loop boundary, in which case the note-off wraps into the
/// next cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// MIDI note number (0-127, where 60 = C4)
    pub pitch: u8,

    /// Beat offset within one loop cycle at which the note begins
    pub start_beat: f64,

    /// Length in beats (> 0)
    pub duration_beats: f64,

    /// Note-on intensity in (0.0, 1.0]
    pub velocity: f32,
}

impl NoteEvent {
    /// Creates a new note event
    pub fn new(pitch: u8, start_beat: f64, duration_beats: f64, velocity: f32) -> Self {
        assert!(pitch <= 127, "MIDI pitch must be 0-127");
        assert!(start_beat >= 0.0, "Note start beat must be >= 0");
        assert!(duration_beats > 0.0, "Note duration must be > 0");
        assert!(
            velocity > 0.0 && velocity <= 1.0,
            "Note velocity must be in (0, 1]"
        );

        Self {
            pitch,
            start_beat,
            duration_beats,
            velocity,
        }
    }

    /// Beat at which the note-off is due (may exceed the loop length)
    pub fn end_beat(&self) -> f64 {
        self.start_beat + self.duration_beats
    }
}

/// Immutable ordered sequence of note events
///
/// Pure data: no operations beyond iteration, no failure modes.
#[derive(Debug, Clone, Default)]
pub struct Score {
    notes: Vec<NoteEvent>,
}

impl Score {
    pub fn new(notes: Vec<NoteEvent>) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// The compiled-in demo melody: a C-major arpeggio up and back down.
    ///
    /// Total span is 5 beats; the final C4 is held 1.5 beats from beat 3.5,
    /// so its note-off lands exactly on the next cycle's start. Played over a
    /// 5-beat loop the melody repeats seamlessly.
    pub fn demo_melody() -> Self {
        Self::new(vec![
            NoteEvent::new(60, 0.0, 0.5, 0.8), // C4
            NoteEvent::new(64, 0.5, 0.5, 0.8), // E4
            NoteEvent::new(67, 1.0, 0.5, 0.8), // G4
            NoteEvent::new(72, 1.5, 1.0, 0.9), // C5
            NoteEvent::new(67, 2.5, 0.5, 0.7), // G4
            NoteEvent::new(64, 3.0, 0.5, 0.7), // E4
            NoteEvent::new(60, 3.5, 1.5, 0.8), // C4
        ])
    }
}
