#![deny(unsafe_code)]
//! Core types and traits for constellation, the portfolio site's canvas
//! animations.
//!
//! Provides the `Scene` trait, the `Surface` drawing abstraction, the
//! frame-loop `Animator`, theme ids and the `ThemeManager`, style lookups,
//! CSS colors (`Rgba`), the `Xorshift64` PRNG, `SceneSeed`, and parameter
//! helpers.

pub mod color;
pub mod driver;
pub mod error;
pub mod params;
pub mod prng;
pub mod scene;
pub mod seed;
pub mod style;
pub mod surface;
pub mod theme;

pub use color::Rgba;
pub use driver::{Animator, DriverState, FrameHandle, FrameScheduler, ManualScheduler};
pub use error::SceneError;
pub use prng::Xorshift64;
pub use scene::{FrameInput, Scene, Viewport};
pub use seed::SceneSeed;
pub use style::{StyleContext, StyleSheet, StyleSource};
pub use surface::{DrawCommand, Recording, Surface};
pub use theme::{KeyValueStore, MemoryStore, ThemeId, ThemeManager};
