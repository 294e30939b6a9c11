// Audio module - scratch buffers, render step, device engine

pub mod buffer;
pub mod engine;
pub mod format_conversion;
pub mod render;

pub use buffer::BlockBuffer;
pub use engine::{AudioEngine, AudioError, INSTRUMENT_CHANNELS};
pub use render::render_block;
