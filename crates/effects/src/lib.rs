//! Page effects outside the particle canvases.
//!
//! - [`Typewriter`]: types, pauses on and deletes the hero texts in turn
//! - [`FormulaDrift`]: the intro overlay, a [`Scene`](constellation_core::Scene)
//!   like the constellations so the same driver and rasterizer run it
//! - [`TransmitButton`]: label and enabled state of the contact form button
//!
//! None of these touch the DOM; the wasm crate applies their output.

#![deny(unsafe_code)]

pub mod intro;
pub mod transmit;
pub mod typewriter;

pub use intro::{DriftConfig, Formula, FormulaDrift, FORMULAS};
pub use transmit::{TransmitButton, TransmitState};
pub use typewriter::{Typewriter, TypewriterStep, TypewriterTiming, HERO_TEXTS};
