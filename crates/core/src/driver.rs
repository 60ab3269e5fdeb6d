//! Frame-loop driver.
//!
//! An [`Animator`] owns one scene, the surface it draws on, the host's frame
//! scheduler and the handle of the frame it is waiting for. Because the
//! pending handle lives in the instance, restarting always cancels the old
//! chain before scheduling a new one: at most one loop per animator can
//! exist.
//!
//! ```text
//!            start / restart                 on_frame(pending)
//!   Stopped ────────────────▶ Running{h} ──────────────────────▶ Running{h'}
//!      ▲                        │   ▲                               │
//!      └──────── stop ──────────┘   └────────── start (cancel h) ───┘
//! ```

use crate::scene::{FrameInput, Scene, Viewport};
use crate::style::StyleContext;
use crate::surface::Surface;
use glam::DVec2;
use std::collections::BTreeSet;

/// Identifier returned by the host when a frame callback is requested
/// (`requestAnimationFrame` ids are `i32`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub i32);

/// The host's per-frame callback primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    /// The host delivered `handle`. Browsers forget fired ids on their own.
    fn frame_delivered(&mut self, _handle: FrameHandle) {}
}

/// A scheduler whose frames are fired by the caller. Used natively (CLI
/// snapshots) and in tests; it keeps count of requests and cancellations.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i32,
    pending: BTreeSet<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles requested and not yet cancelled or fired.
    pub fn pending(&self) -> impl Iterator<Item = FrameHandle> + '_ {
        self.pending.iter().copied()
    }

    /// Marks `handle` as fired. Returns false when it was not pending.
    pub fn fire(&mut self, handle: FrameHandle) -> bool {
        self.pending.remove(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.insert(handle);
        self.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.remove(&handle) {
            self.cancelled += 1;
        }
    }

    fn frame_delivered(&mut self, handle: FrameHandle) {
        self.pending.remove(&handle);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running { pending: FrameHandle },
}

/// Owns one scene and runs its frame loop on one surface.
pub struct Animator<S: Scene, D: Surface, F: FrameScheduler> {
    scene: S,
    surface: Option<D>,
    scheduler: F,
    state: DriverState,
    viewport: Option<Viewport>,
    pointer: Option<DVec2>,
    reduced_motion: bool,
    starts: usize,
}

impl<S: Scene, D: Surface, F: FrameScheduler> Animator<S, D, F> {
    /// `surface` is `None` when the host element is absent; every entry
    /// point then does nothing.
    pub fn new(scene: S, surface: Option<D>, scheduler: F) -> Self {
        Self {
            scene,
            surface,
            scheduler,
            state: DriverState::Stopped,
            viewport: None,
            pointer: None,
            reduced_motion: false,
            starts: 0,
        }
    }

    /// With reduced motion the animator never runs; `start` only cancels.
    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    /// (Re)starts the loop: cancels the pending frame, rebuilds the scene for
    /// `viewport` and requests the first frame. Returns whether the animator
    /// is running afterwards.
    pub fn start(&mut self, viewport: Viewport, style: &StyleContext<'_>) -> bool {
        if self.surface.is_none() {
            return false;
        }
        self.cancel_pending();
        if self.reduced_motion {
            log::debug!("{}: reduced motion, not starting", self.scene.name());
            return false;
        }

        self.scene.rebuild(viewport, style);
        self.viewport = Some(viewport);
        let first = self.scheduler.request_frame();
        self.state = DriverState::Running { pending: first };
        self.starts += 1;
        log::debug!(
            "{}: started at {}x{}",
            self.scene.name(),
            viewport.width(),
            viewport.height()
        );
        true
    }

    /// Restarts with the last viewport, e.g. after a theme change. Does
    /// nothing if the animator was never started.
    pub fn restart(&mut self, style: &StyleContext<'_>) -> bool {
        match self.viewport {
            Some(viewport) => self.start(viewport, style),
            None => false,
        }
    }

    /// Cancels the pending frame and stops.
    pub fn stop(&mut self) {
        self.cancel_pending();
    }

    /// Runs one frame if `handle` is the frame this animator is waiting for.
    ///
    /// Clears the surface, steps every entity, draws, and requests the next
    /// frame. Stale or unknown handles are ignored and return false.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp_ms: f64) -> bool {
        match self.state {
            DriverState::Running { pending } if pending == handle => {}
            _ => return false,
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        self.scheduler.frame_delivered(handle);

        let input = FrameInput {
            pointer: self.pointer,
            timestamp_ms,
        };
        surface.clear();
        self.scene.step(&input);
        self.scene.draw(surface);

        let next = self.scheduler.request_frame();
        self.state = DriverState::Running { pending: next };
        true
    }

    /// Runs the frame currently pending, for hosts whose callback does not
    /// carry the handle (`requestAnimationFrame`).
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        match self.state {
            DriverState::Running { pending } => self.on_frame(pending, timestamp_ms),
            DriverState::Stopped => false,
        }
    }

    /// Clears and draws the current state without stepping or scheduling.
    /// Used for still frames (snapshots of frame zero).
    pub fn redraw(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        surface.clear();
        self.scene.draw(surface);
        true
    }

    /// Pointer position relative to the surface; `None` on pointer leave.
    pub fn set_pointer(&mut self, pointer: Option<DVec2>) {
        self.pointer = pointer;
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running { .. })
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        match self.state {
            DriverState::Running { pending } => Some(pending),
            DriverState::Stopped => None,
        }
    }

    /// How many times the loop has been (re)started.
    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn surface(&self) -> Option<&D> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut D> {
        self.surface.as_mut()
    }

    /// Stops the loop and hands back the surface.
    pub fn into_surface(mut self) -> Option<D> {
        self.cancel_pending();
        self.surface.take()
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    fn cancel_pending(&mut self) {
        if let DriverState::Running { pending } = self.state {
            self.scheduler.cancel_frame(pending);
            log::debug!("{}: cancelled frame {}", self.scene.name(), pending.0);
        }
        self.state = DriverState::Stopped;
    }
}
