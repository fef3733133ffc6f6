//! Cropframe WASM - WebAssembly bindings for the crop engine
//!
//! This crate exposes cropframe-core to JavaScript/TypeScript pages.
//!
//! # Module Structure
//!
//! - `controller` - `JsCropController`, a crop session driven by pointer events
//! - `types` - WASM-compatible wrapper types for bitmap data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropController } from '@cropframe/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsCropController(1, undefined, 0, false, false, 100, undefined);
//! session.bind_image(image.width, image.height, new Uint8Array(image.data.buffer));
//! const out = session.extract(1024, 2);
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(out.pixels()), out.width), 0, 0);
//! ```

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

mod controller;
mod types;

pub use controller::JsCropController;
pub use types::JsBitmap;

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn level_filter_from_u8(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Warn);
    }
}

/// Set console verbosity: 0 = off, 1 = error, 2 = warn, 3 = info, 4 = debug, 5 = trace.
#[wasm_bindgen]
pub fn set_log_level(level: u8) {
    log::set_max_level(level_filter_from_u8(level));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_level_filter_from_u8() {
        assert_eq!(level_filter_from_u8(0), LevelFilter::Off);
        assert_eq!(level_filter_from_u8(2), LevelFilter::Warn);
        assert_eq!(level_filter_from_u8(4), LevelFilter::Debug);
        assert_eq!(level_filter_from_u8(9), LevelFilter::Trace);
    }
}
