//! `requestAnimationFrame` as a [`FrameScheduler`].

use constellation_core::driver::{FrameHandle, FrameScheduler};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub struct RafScheduler {
    window: Window,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: None,
        }
    }

    /// The closure every requested frame invokes with its timestamp.
    pub fn set_callback(&mut self, callback: Closure<dyn FnMut(f64)>) {
        self.callback = Some(callback);
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let Some(callback) = &self.callback else {
            log::warn!("frame requested before the callback was set");
            return FrameHandle(0);
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => FrameHandle(id),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {e:?}");
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::debug!("cancelAnimationFrame({}) failed: {e:?}", handle.0);
        }
    }
}
