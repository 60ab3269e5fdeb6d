#![deny(unsafe_code)]
//! Browser bindings for the constellation site.
//!
//! - [`mount`] runs a scene on a `<canvas>` and restarts it on resize and
//!   on the `themeChanged` event
//! - [`ThemeController`] persists the theme and broadcasts changes
//! - [`start_typewriter`] and [`TransmitControl`] drive the page effects

mod canvas;
mod dom;
mod effects;
mod frame;
mod mount;
mod options;
mod theme;

pub use canvas::CanvasSurface;
pub use dom::{BrowserStore, ComputedStyle, StorageKind};
pub use effects::{start_typewriter, TransmitControl, TypewriterHandle};
pub use frame::RafScheduler;
pub use mount::{mount, MountedScene};
pub use options::{Fit, MountOptions};
pub use theme::{theme_from_event, ThemeController, THEME_CHANGED_EVENT};

use log::LevelFilter;
use wasm_bindgen::prelude::*;

/// Module start: panics and `log` output go to the browser console, at
/// `warn` until [`init_logging`] says otherwise.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Warn).is_err() {
        log::debug!("console logger already installed");
    }
}

/// Parses `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"` or `"off"`;
/// anything else is `warn`.
fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Warn)
}

/// Changes the console log level.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    log::set_max_level(parse_level(level));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" INFO "), LevelFilter::Info);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("loud"), LevelFilter::Warn);
    }
}
