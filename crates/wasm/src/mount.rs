//! Mounting a scene on a `<canvas>`: sizing, the frame loop, pointer
//! tracking, and restarts on resize and theme change.

use crate::canvas::CanvasSurface;
use crate::dom::ComputedStyle;
use crate::frame::RafScheduler;
use crate::options::{Fit, MountOptions};
use crate::theme::{theme_from_event, THEME_CHANGED_EVENT};
use constellation_core::driver::Animator;
use constellation_core::scene::{Scene, Viewport};
use constellation_core::style::StyleContext;
use constellation_core::theme::ThemeId;
use constellation_scenes::SceneKind;
use glam::DVec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

type WebAnimator = Animator<SceneKind, CanvasSurface, RafScheduler>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    fn remove(&self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            log::debug!("could not remove {} listener: {e:?}", self.kind);
        }
    }
}

/// The theme currently applied to the document element.
fn document_theme(window: &Window) -> ThemeId {
    let Some(root) = window.document().and_then(|d| d.document_element()) else {
        return ThemeId::default();
    };
    let classes = root.class_list();
    (0..classes.length())
        .filter_map(|i| classes.item(i))
        .find_map(|c| c.parse().ok())
        .unwrap_or_default()
}

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|q| q.matches())
}

fn px(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

fn fitted_size(window: &Window, canvas: &HtmlCanvasElement, fit: Fit) -> (u32, u32) {
    let (w, h) = match (fit, canvas.parent_element()) {
        (Fit::Parent, Some(parent)) => (
            f64::from(parent.client_width()),
            f64::from(parent.client_height()),
        ),
        _ => (px(window.inner_width()), px(window.inner_height())),
    };
    (w.max(0.0) as u32, h.max(0.0) as u32)
}

const POINTER_MOVE: &str = "mousemove";
const POINTER_OUT: &str = "mouseout";

/// New pointer state for a window pointer event, or `None` to keep the
/// current one. Positions are relative to the canvas rect at `origin`; a
/// move outside it clears the pointer, as does leaving the window (a
/// `mouseout` without a related target).
fn pointer_change(
    kind: &str,
    client: DVec2,
    leaves_window: bool,
    origin: DVec2,
    size: DVec2,
) -> Option<Option<DVec2>> {
    match kind {
        POINTER_MOVE => {
            let p = client - origin;
            let inside = p.x >= 0.0 && p.y >= 0.0 && p.x <= size.x && p.y <= size.y;
            Some(inside.then_some(p))
        }
        POINTER_OUT if leaves_window => Some(None),
        _ => None,
    }
}

/// Sizes the canvas and (re)starts the animator with freshly read styles.
fn fit_and_start(window: &Window, animator: &mut WebAnimator, fit: Fit, theme: ThemeId) {
    let Some(surface) = animator.surface_mut() else {
        return;
    };
    let (w, h) = fitted_size(window, surface.canvas(), fit);
    surface.resize(w, h);
    let style = ComputedStyle::of_document(window);
    animator.start(
        Viewport::new(f64::from(w), f64::from(h)),
        &StyleContext::new(theme, &style),
    );
}

/// Runs `f` on the animator unless it is already borrowed (a nested event).
fn with_animator(animator: &Rc<RefCell<WebAnimator>>, f: impl FnOnce(&mut WebAnimator)) {
    match animator.try_borrow_mut() {
        Ok(mut a) => f(&mut a),
        Err(_) => log::debug!("animator busy, event dropped"),
    }
}

/// A scene running on a canvas. Dropping it (or `destroy`) stops the loop
/// and removes its listeners.
#[wasm_bindgen]
pub struct MountedScene {
    window: Window,
    fit: Fit,
    animator: Rc<RefCell<WebAnimator>>,
    listeners: Vec<Listener>,
}

/// Mounts `scene` on the canvas with id `canvas_id`.
///
/// A missing canvas (or one without a 2D context) yields an inert handle.
/// Unknown scene names and malformed options are errors.
#[wasm_bindgen]
pub fn mount(canvas_id: &str, scene: &str, options: &str) -> Result<MountedScene, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let options =
        MountOptions::parse(scene, options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let seed = options
        .seed
        .unwrap_or_else(|| (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64);
    let kind = SceneKind::from_name(scene, seed, &options.params)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let canvas = window
        .document()
        .and_then(|d| d.get_element_by_id(canvas_id))
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
    let surface = canvas.clone().and_then(CanvasSurface::new);
    if surface.is_none() {
        log::debug!("#{canvas_id} missing or without a 2d context, {scene} stays idle");
    }

    let reduced_motion = options
        .reduced_motion
        .unwrap_or_else(|| prefers_reduced_motion(&window));
    let animator = Rc::new(RefCell::new(
        Animator::new(kind, surface, RafScheduler::new(window.clone()))
            .with_reduced_motion(reduced_motion),
    ));

    let weak = Rc::downgrade(&animator);
    animator
        .borrow_mut()
        .scheduler_mut()
        .set_callback(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            if let Some(animator) = weak.upgrade() {
                with_animator(&animator, |a| {
                    a.tick(timestamp);
                });
            }
        }));

    let mut mounted = MountedScene {
        window: window.clone(),
        fit: options.fit,
        animator,
        listeners: Vec::new(),
    };
    let Some(canvas) = canvas.filter(|_| mounted.animator.borrow().surface().is_some()) else {
        return Ok(mounted);
    };

    fit_and_start(
        &window,
        &mut mounted.animator.borrow_mut(),
        options.fit,
        document_theme(&window),
    );
    mounted.listen(canvas)?;
    log::info!("mounted {scene} on #{canvas_id}");
    Ok(mounted)
}

impl MountedScene {
    fn listen(&mut self, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
        let target = EventTarget::from(self.window.clone());
        let target = &target;

        let (window, animator, fit) = (self.window.clone(), self.animator.clone(), self.fit);
        self.listeners.push(Listener::add(target, "resize", move |_| {
            with_animator(&animator, |a| {
                fit_and_start(&window, a, fit, document_theme(&window))
            });
        })?);

        let (window, animator) = (self.window.clone(), self.animator.clone());
        self.listeners
            .push(Listener::add(target, THEME_CHANGED_EVENT, move |event| {
                let theme = theme_from_event(&event).unwrap_or_else(|| document_theme(&window));
                let style = ComputedStyle::of_document(&window);
                with_animator(&animator, |a| {
                    a.restart(&StyleContext::new(theme, &style));
                });
            })?);

        for kind in [POINTER_MOVE, POINTER_OUT] {
            let (animator, canvas) = (self.animator.clone(), canvas.clone());
            self.listeners.push(Listener::add(target, kind, move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let rect = canvas.get_bounding_client_rect();
                let change = pointer_change(
                    kind,
                    DVec2::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())),
                    mouse.related_target().is_none(),
                    DVec2::new(rect.left(), rect.top()),
                    DVec2::new(rect.width(), rect.height()),
                );
                if let Some(pointer) = change {
                    with_animator(&animator, |a| a.set_pointer(pointer));
                }
            })?);
        }
        Ok(())
    }
}

#[wasm_bindgen]
impl MountedScene {
    /// Refits the canvas and restarts with the current document theme.
    pub fn start(&self) {
        with_animator(&self.animator, |a| {
            fit_and_start(&self.window, a, self.fit, document_theme(&self.window))
        });
    }

    pub fn stop(&self) {
        with_animator(&self.animator, |a| a.stop());
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.animator.borrow().is_running()
    }

    /// The scene's current parameters as JSON.
    pub fn params(&self) -> String {
        self.animator.borrow().scene().params().to_string()
    }

    #[wasm_bindgen(js_name = paramSchema)]
    pub fn param_schema(&self) -> String {
        self.animator.borrow().scene().param_schema().to_string()
    }

    /// Stops the loop and removes every listener.
    pub fn destroy(&mut self) {
        self.stop();
        for listener in self.listeners.drain(..) {
            listener.remove();
        }
    }
}

impl Drop for MountedScene {
    fn drop(&mut self) {
        self.destroy();
    }
}
