// Transport - beat clock for the looping sequencer
// Owns the absolute sample position and the tempo-derived conversion factor

/// Transport state for one device-stream session
///
/// Owned exclusively by the audio callback thread while the stream is
/// running; created at stream start and discarded at stream stop. It carries
/// no cross-block event state: every block is scheduled from
/// `sample_position` alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    /// Samples rendered since stream start (monotonic, never reset)
    sample_position: u64,

    /// Samples per quarter note (`sample_rate * 60 / bpm`)
    samples_per_beat: f64,

    /// Repeat period of the score, in beats
    loop_length_beats: f64,

    /// Fixed tempo; kept so `samples_per_beat` can be recomputed when the
    /// device reports a new sample rate
    bpm: f64,
}

impl Transport {
    pub fn new(sample_rate: f64, bpm: f64, loop_length_beats: f64) -> Self {
        assert!(sample_rate > 0.0, "Sample rate must be > 0");
        assert!(bpm > 0.0, "BPM must be > 0");
        assert!(loop_length_beats > 0.0, "Loop length must be > 0 beats");

        Self {
            sample_position: 0,
            samples_per_beat: sample_rate * 60.0 / bpm,
            loop_length_beats,
            bpm,
        }
    }

    pub fn sample_position(&self) -> u64 {
        self.sample_position
    }

    pub fn samples_per_beat(&self) -> f64 {
        self.samples_per_beat
    }

    pub fn loop_length_beats(&self) -> f64 {
        self.loop_length_beats
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Recompute `samples_per_beat` for a (possibly new) device sample rate
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        assert!(sample_rate > 0.0, "Sample rate must be > 0");
        self.samples_per_beat = sample_rate * 60.0 / self.bpm;
    }

    /// Advance the position by exactly one block
    ///
    /// The delta is signed because the device contract allows degenerate
    /// zero or negative block sizes; those still advance the transport by
    /// the given amount (saturating at zero).
    pub fn advance(&mut self, num_samples: i64) {
        self.sample_position = self.sample_position.saturating_add_signed(num_samples);
    }

    /// Beat position of the block start, unquantized
    pub fn block_start_beat(&self) -> f64 {
        self.sample_position as f64 / self.samples_per_beat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport = Transport::new(44100.0, 120.0, 5.0);

        assert_eq!(transport.sample_position(), 0);
        assert_eq!(transport.samples_per_beat(), 22050.0);
        assert_eq!(transport.loop_length_beats(), 5.0);
    }

    #[test]
    fn test_advance() {
        let mut transport = Transport::new(44100.0, 120.0, 5.0);

        transport.advance(512);
        assert_eq!(transport.sample_position(), 512);

        transport.advance(512);
        assert_eq!(transport.sample_position(), 1024);
    }

    #[test]
    fn test_advance_zero_and_negative() {
        let mut transport = Transport::new(44100.0, 120.0, 5.0);

        transport.advance(0);
        assert_eq!(transport.sample_position(), 0);

        transport.advance(1000);
        transport.advance(-300);
        assert_eq!(transport.sample_position(), 700);

        // Saturates rather than underflows
        transport.advance(-10_000);
        assert_eq!(transport.sample_position(), 0);
    }

    #[test]
    fn test_set_sample_rate_recomputes_conversion() {
        let mut transport = Transport::new(44100.0, 120.0, 5.0);
        assert_eq!(transport.samples_per_beat(), 22050.0);

        transport.set_sample_rate(48000.0);
        assert_eq!(transport.samples_per_beat(), 24000.0);
        assert_eq!(transport.bpm(), 120.0);
    }

    #[test]
    fn test_block_start_beat() {
        let mut transport = Transport::new(44100.0, 120.0, 5.0);
        assert_eq!(transport.block_start_beat(), 0.0);

        transport.advance(22050);
        assert_eq!(transport.block_start_beat(), 1.0);

        transport.advance(11025);
        assert_eq!(transport.block_start_beat(), 1.5);
    }
}
