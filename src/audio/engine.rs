// Audio engine - real-time CPAL callback hosting the instrument
//
// The device format is negotiated at session start. Internally everything is
// planar f32; conversion to the device's sample format (f32, i16 or u16)
// happens at the moment of writing into the output buffer, without
// allocation.
//
// Error semantics follow the session model: anything that fails while
// building the engine is a configuration error and the stream never starts;
// anything that fails inside a callback is fatal to the stream, which then
// outputs silence until the session is torn down.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SizedSample, Stream, StreamConfig};
use ringbuf::traits::Producer;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::audio::buffer::BlockBuffer;
use crate::audio::format_conversion::{write_frame_interleaved, write_silence};
use crate::audio::render::render_block;
use crate::instrument::{Instrument, InstrumentError};
use crate::messaging::{Notification, NotificationCategory, NotificationProducer};
use crate::midi::MidiEventTimed;
use crate::score::Score;
use crate::sequencer::Transport;

/// Channels the instrument renders; extra device channels get silence
pub const INSTRUMENT_CHANNELS: usize = 2;

/// Scratch sizing when the device does not commit to a buffer size
const DEFAULT_MAX_BLOCK: usize = 8192;

/// Session-level audio errors (configuration time only)
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Device configuration error: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("Failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error(transparent)]
    Instrument(#[from] InstrumentError),
}

/// Everything the real-time callback owns
///
/// The transport, scratch buffer and event buffer move into the stream
/// closure and are touched by no other thread. The instrument sits behind a
/// `try_lock` so `stop()` can release it once the stream is gone; the
/// callback never blocks on it.
struct CallbackState {
    instrument: Arc<Mutex<Box<dyn Instrument>>>,
    score: Score,
    transport: Transport,
    scratch: BlockBuffer,
    events: Vec<MidiEventTimed>,
    notification_tx: Arc<Mutex<NotificationProducer>>,
    failed: bool,
}

impl CallbackState {
    fn render_into<T>(&mut self, data: &mut [T], device_channels: usize)
    where
        T: SizedSample + FromSample<f32>,
    {
        let num_frames = data.len() / device_channels;

        if self.failed || num_frames > self.scratch.max_frames() {
            if !self.failed {
                self.fail("Device delivered a larger block than negotiated".to_string());
            }
            write_silence(data);
            return;
        }

        let result = match self.instrument.try_lock() {
            Ok(mut instrument) => render_block(
                instrument.as_mut(),
                &self.score,
                &mut self.transport,
                &mut self.scratch,
                &mut self.events,
                num_frames as i64,
            ),
            // Contended only around stop(); skip the block, keep the clock
            Err(_) => {
                self.transport.advance(num_frames as i64);
                write_silence(data);
                return;
            }
        };

        match result {
            Ok(()) => {
                for (frame, output_frame) in data.chunks_mut(device_channels).enumerate() {
                    write_frame_interleaved(&self.scratch, frame, output_frame);
                }
            }
            Err(e) => {
                self.fail(format!("Instrument processing failed: {e}"));
                write_silence(data);
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.failed = true;
        if let Ok(mut tx) = self.notification_tx.try_lock() {
            let _ = tx.try_push(Notification::error(NotificationCategory::Audio, message));
        }
    }
}

pub struct AudioEngine {
    _device: Device,
    stream: Option<Stream>,
    instrument: Arc<Mutex<Box<dyn Instrument>>>,
    sample_rate: f64,
}

impl AudioEngine {
    /// Open the default output device, prepare the instrument for the
    /// negotiated sample rate and block size, and start the stream.
    pub fn new(
        mut instrument: Box<dyn Instrument>,
        score: Score,
        bpm: f64,
        loop_length_beats: f64,
        notification_tx: NotificationProducer,
    ) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        println!(
            "Audio device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f64;
        let device_channels = supported_config.channels() as usize;

        let config: StreamConfig = supported_config.into();
        let max_block = match config.buffer_size {
            cpal::BufferSize::Fixed(size) => size as usize,
            cpal::BufferSize::Default => DEFAULT_MAX_BLOCK,
        };

        println!(
            "Audio output: {} channels, {} Hz, {:?}, blocks up to {} frames",
            device_channels, sample_rate, sample_format, max_block
        );

        // Session start hook: prepare the instrument before the first block.
        // A failure here is a configuration error and the stream never
        // starts.
        instrument.prepare(sample_rate, max_block)?;

        let instrument = Arc::new(Mutex::new(instrument));
        let notification_tx = Arc::new(Mutex::new(notification_tx));

        let state = CallbackState {
            instrument: instrument.clone(),
            transport: Transport::new(sample_rate, bpm, loop_length_beats),
            scratch: BlockBuffer::new(INSTRUMENT_CHANNELS, max_block),
            events: Vec::with_capacity((score.len() * 2).max(16)),
            score,
            notification_tx: notification_tx.clone(),
            failed: false,
        };

        let stream = match sample_format {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config, device_channels, state, notification_tx)
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config, device_channels, state, notification_tx)
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config, device_channels, state, notification_tx)
            }
            other => {
                return Err(AudioError::UnsupportedFormat(format!(
                    "{other:?} (supported: F32, I16, U16)"
                )))
            }
        }?;

        stream.play()?;

        Ok(Self {
            _device: device,
            stream: Some(stream),
            instrument,
            sample_rate,
        })
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        device_channels: usize,
        mut state: CallbackState,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                state.render_into(data, device_channels);
            },
            move |err| {
                if let Ok(mut tx) = notification_tx.try_lock() {
                    let _ = tx.try_push(Notification::error(
                        NotificationCategory::Audio,
                        format!("Stream error: {err}"),
                    ));
                }
            },
            None,
        )?;

        Ok(stream)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Tear the session down: stop the callback, then release the
    /// instrument. Stream start/stop are serialized by the device layer, so
    /// once the stream is dropped no callback is in flight.
    pub fn stop(mut self) {
        self.stream.take();
        if let Ok(mut instrument) = self.instrument.lock() {
            instrument.release();
        }
    }
}
