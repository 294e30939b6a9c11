// Format conversion for CPAL audio streams
//
// The instrument renders planar f32; the device wants interleaved frames in
// whatever sample format CPAL negotiated (f32, i16 or u16). Conversion goes
// through CPAL's `FromSample` trait at the point of writing, without
// allocation, so it is safe inside the real-time callback.

use crate::audio::buffer::BlockBuffer;
use cpal::{FromSample, Sample};

/// Write one planar frame of the scratch buffer into one interleaved device
/// frame.
///
/// Device channels beyond what the instrument rendered receive silence (the
/// analogue of skipping a null output channel pointer); instrument channels
/// beyond what the device has are dropped.
#[inline]
pub fn write_frame_interleaved<T>(scratch: &BlockBuffer, frame: usize, output_frame: &mut [T])
where
    T: Sample + FromSample<f32>,
{
    for (channel, out) in output_frame.iter_mut().enumerate() {
        let sample = if channel < scratch.num_channels() {
            scratch.sample(channel, frame)
        } else {
            0.0
        };
        *out = T::from_sample(sample);
    }
}

/// Fill an interleaved device buffer with silence
#[inline]
pub fn write_silence<T>(output: &mut [T])
where
    T: Sample + FromSample<f32>,
{
    for out in output.iter_mut() {
        *out = T::from_sample(0.0f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_frame_f32() {
        let mut scratch = BlockBuffer::new(2, 4);
        scratch.channel_mut(0)[1] = 0.5;
        scratch.channel_mut(1)[1] = -0.5;

        let mut frame = [0.0f32; 2];
        write_frame_interleaved(&scratch, 1, &mut frame);

        assert_eq!(frame, [0.5, -0.5]);
    }

    #[test]
    fn test_extra_device_channels_get_silence() {
        let mut scratch = BlockBuffer::new(2, 4);
        scratch.channel_mut(0)[0] = 1.0;
        scratch.channel_mut(1)[0] = 1.0;

        let mut frame = [0.7f32; 4];
        write_frame_interleaved(&scratch, 0, &mut frame);

        assert_eq!(frame, [1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_write_frame_i16() {
        let mut scratch = BlockBuffer::new(1, 4);
        scratch.channel_mut(0)[0] = 1.0;

        let mut frame = [0i16; 1];
        write_frame_interleaved(&scratch, 0, &mut frame);

        // Full-scale f32 maps to (close to) full-scale i16
        assert!(frame[0] >= i16::MAX - 1);
    }

    #[test]
    fn test_write_silence() {
        let mut output = [0.9f32; 8];
        write_silence(&mut output);
        assert!(output.iter().all(|&s| s == 0.0));

        let mut output_u16 = [0u16; 8];
        write_silence(&mut output_u16);
        // u16 silence is the offset-binary midpoint, not zero
        assert!(output_u16.iter().all(|&s| s == u16::MAX / 2 + 1));
    }
}
