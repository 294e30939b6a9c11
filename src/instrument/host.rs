// Dynamic instrument loading via libloading
//
// An instrument cdylib exposes a single C-ABI entry point:
//
//     #[no_mangle]
//     pub extern "C" fn instrument_create() -> *mut Box<dyn Instrument> {
//         Box::into_raw(Box::new(Box::new(MyInstrument::default())))
//     }
//
// The double Box keeps the FFI pointer thin. The host owns the instance and
// keeps the library mapped for as long as the instance lives.

use crate::audio::buffer::BlockBuffer;
use crate::instrument::{Instrument, InstrumentError, InstrumentResult};
use crate::midi::MidiEventTimed;
use libloading::Library;
use std::path::Path;

/// Symbol name every instrument library must export
pub const INSTRUMENT_ENTRY_POINT: &[u8] = b"instrument_create";

type InstrumentCreate = unsafe extern "C" fn() -> *mut Box<dyn Instrument>;

/// An instrument instance backed by a dynamically loaded library
///
/// Field order matters: the instance is dropped before the library is
/// unmapped.
pub struct LoadedInstrument {
    instance: Box<dyn Instrument>,
    _library: Library,
}

impl LoadedInstrument {
    /// Load an instrument library and create its instance
    ///
    /// This is a configuration-time operation; any failure here means the
    /// stream never starts.
    pub fn load(path: &Path) -> InstrumentResult<Self> {
        if !path.exists() {
            return Err(InstrumentError::LoadFailed(format!(
                "No instrument library at {}",
                path.display()
            )));
        }

        let library = unsafe { Library::new(path) }.map_err(|e| {
            InstrumentError::LoadFailed(format!("{}: {}", path.display(), e))
        })?;

        let create = unsafe { library.get::<InstrumentCreate>(INSTRUMENT_ENTRY_POINT) }
            .map_err(|_| {
                InstrumentError::MissingEntryPoint(format!(
                    "{} does not export `instrument_create`",
                    path.display()
                ))
            })?;

        let raw = unsafe { create() };
        if raw.is_null() {
            return Err(InstrumentError::LoadFailed(format!(
                "{}: instrument_create returned null",
                path.display()
            )));
        }
        let instance = *unsafe { Box::from_raw(raw) };

        Ok(Self {
            instance,
            _library: library,
        })
    }
}

impl Instrument for LoadedInstrument {
    fn name(&self) -> &str {
        self.instance.name()
    }

    fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> InstrumentResult<()> {
        self.instance.prepare(sample_rate, max_block_size)
    }

    fn process(
        &mut self,
        buffer: &mut BlockBuffer,
        events: &[MidiEventTimed],
        num_frames: usize,
    ) -> InstrumentResult<()> {
        self.instance.process(buffer, events, num_frames)
    }

    fn release(&mut self) {
        self.instance.release();
    }
}
