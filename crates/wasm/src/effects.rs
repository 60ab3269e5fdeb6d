//! Page effects outside the canvas: the hero typewriter and the contact
//! form's transmit button.

use constellation_effects::transmit::{TransmitButton, FAILURE_HOLD_MS};
use constellation_effects::typewriter::Typewriter;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Window};

type TimeoutSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn set_timeout(window: &Window, callback: &Closure<dyn FnMut()>, delay_ms: f64) -> Option<i32> {
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms.round() as i32,
        )
        .map_err(|e| log::warn!("setTimeout failed: {e:?}"))
        .ok()
}

fn element_by_id(window: &Window, id: &str) -> Option<Element> {
    window.document()?.get_element_by_id(id)
}

/// A running typewriter. Dropping it (or `stop`) clears the pending timeout.
#[wasm_bindgen]
pub struct TypewriterHandle {
    window: Window,
    slot: TimeoutSlot,
    timer: Rc<Cell<Option<i32>>>,
}

/// Starts typing the hero texts into the element with id `element_id`.
/// Returns `None` if there is no such element.
#[wasm_bindgen(js_name = startTypewriter)]
pub fn start_typewriter(element_id: &str) -> Option<TypewriterHandle> {
    let window = web_sys::window()?;
    let Some(element) = element_by_id(&window, element_id) else {
        log::debug!("typewriter target #{element_id} not found");
        return None;
    };

    let slot: TimeoutSlot = Rc::new(RefCell::new(None));
    let timer = Rc::new(Cell::new(None));
    let mut typewriter = Typewriter::hero();

    let (w, s, t) = (window.clone(), slot.clone(), timer.clone());
    let tick = Closure::<dyn FnMut()>::new(move || {
        let step = typewriter.tick();
        element.set_text_content(Some(&step.text));
        if let Some(callback) = s.borrow().as_ref() {
            t.set(set_timeout(&w, callback, step.delay_ms));
        }
    });
    timer.set(set_timeout(&window, &tick, 0.0));
    *slot.borrow_mut() = Some(tick);

    Some(TypewriterHandle {
        window,
        slot,
        timer,
    })
}

#[wasm_bindgen]
impl TypewriterHandle {
    pub fn stop(&mut self) {
        if let Some(id) = self.timer.take() {
            self.window.clear_timeout_with_handle(id);
        }
        // The closure holds the slot; dropping it breaks the cycle.
        self.slot.borrow_mut().take();
    }
}

impl Drop for TypewriterHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn render_button(button: &Element, state: &TransmitButton) {
    button.set_text_content(Some(state.label()));
    let result = if state.is_enabled() {
        button.remove_attribute("disabled")
    } else {
        button.set_attribute("disabled", "")
    };
    if let Err(e) = result {
        log::debug!("could not update disabled attribute: {e:?}");
    }
}

/// Drives the contact form's submit button. The host sends the request
/// itself and reports the outcome through `succeed` or `fail`.
#[wasm_bindgen]
pub struct TransmitControl {
    window: Window,
    button: Element,
    state: Rc<RefCell<TransmitButton>>,
    restore: Option<Closure<dyn FnMut()>>,
    timer: Option<i32>,
}

#[wasm_bindgen]
impl TransmitControl {
    #[wasm_bindgen(constructor)]
    pub fn new(button_id: &str) -> Result<TransmitControl, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let button = element_by_id(&window, button_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{button_id}")))?;
        let state = TransmitButton::new();
        render_button(&button, &state);
        Ok(Self {
            window,
            button,
            state: Rc::new(RefCell::new(state)),
            restore: None,
            timer: None,
        })
    }

    /// A click. Returns whether the form should be sent.
    pub fn submit(&mut self) -> bool {
        let send = self.state.borrow_mut().submit();
        render_button(&self.button, &self.state.borrow());
        send
    }

    pub fn succeed(&mut self) {
        self.state.borrow_mut().succeed();
        render_button(&self.button, &self.state.borrow());
    }

    /// Shows the failure label, then re-enables the button after the hold.
    pub fn fail(&mut self) {
        let now = js_sys::Date::now();
        self.state.borrow_mut().fail(now);
        render_button(&self.button, &self.state.borrow());

        let (button, state) = (self.button.clone(), self.state.clone());
        let restore = Closure::<dyn FnMut()>::new(move || {
            // The timer firing means the hold has elapsed.
            if state.borrow_mut().tick(now + FAILURE_HOLD_MS) {
                render_button(&button, &state.borrow());
            }
        });
        if let Some(id) = self.timer.take() {
            self.window.clear_timeout_with_handle(id);
        }
        self.timer = set_timeout(&self.window, &restore, FAILURE_HOLD_MS);
        self.restore = Some(restore);
    }

    pub fn label(&self) -> String {
        self.state.borrow().label().to_owned()
    }

    #[wasm_bindgen(js_name = isEnabled)]
    pub fn is_enabled(&self) -> bool {
        self.state.borrow().is_enabled()
    }
}

impl Drop for TransmitControl {
    fn drop(&mut self) {
        if let Some(id) = self.timer.take() {
            self.window.clear_timeout_with_handle(id);
        }
    }
}
