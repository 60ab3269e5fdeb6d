//! Theme controller: persistence through browser storage, document classes,
//! and the `themeChanged` window event that mounted animators listen for.

use crate::dom::{BrowserStore, StorageKind};
use constellation_core::theme::{ThemeId, ThemeManager};
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Element, Window};

pub const THEME_CHANGED_EVENT: &str = "themeChanged";
const THEME_CLASS_PREFIX: &str = "theme-";

/// Replaces every `theme-*` class of `element` with `theme`.
fn set_theme_class(element: &Element, theme: ThemeId) {
    let classes = element.class_list();
    let stale: Vec<String> = (0..classes.length())
        .filter_map(|i| classes.item(i))
        .filter(|c| c.starts_with(THEME_CLASS_PREFIX))
        .collect();
    for class in &stale {
        if let Err(e) = classes.remove_1(class) {
            log::debug!("could not remove class {class}: {e:?}");
        }
    }
    if let Err(e) = classes.add_1(theme.as_str()) {
        log::warn!("could not add class {theme}: {e:?}");
    }
}

fn apply_document_classes(window: &Window, theme: ThemeId) {
    let Some(document) = window.document() else {
        return;
    };
    if let Some(root) = document.document_element() {
        set_theme_class(&root, theme);
    }
    if let Some(body) = document.body() {
        set_theme_class(&body, theme);
    }
}

fn dispatch_theme_changed(window: &Window, theme: ThemeId) -> Result<(), JsValue> {
    let detail = js_sys::Object::new();
    js_sys::Reflect::set(&detail, &"theme".into(), &theme.as_str().into())?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(THEME_CHANGED_EVENT, &init)?;
    window.dispatch_event(&event)?;
    Ok(())
}

/// Reads the theme id out of a `themeChanged` event.
pub fn theme_from_event(event: &web_sys::Event) -> Option<ThemeId> {
    let event = event.dyn_ref::<CustomEvent>()?;
    let theme = js_sys::Reflect::get(&event.detail(), &"theme".into()).ok()?;
    theme.as_string()?.parse().ok()
}

#[wasm_bindgen]
pub struct ThemeController {
    manager: ThemeManager<BrowserStore, BrowserStore>,
}

#[wasm_bindgen]
impl ThemeController {
    /// Resolves the active theme, writes it back to both stores with the
    /// version marker, applies its document classes, and starts broadcasting
    /// changes. The initial apply does not dispatch an event.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ThemeController, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let mut manager = ThemeManager::new(
            BrowserStore::open(&window, StorageKind::Local),
            BrowserStore::open(&window, StorageKind::Session),
        );
        let theme = match manager.initialize() {
            Ok(theme) => theme,
            Err(e) => {
                log::warn!("could not persist the initial theme: {e}");
                manager.active_theme()
            }
        };
        apply_document_classes(&window, theme);

        manager.subscribe(move |theme| {
            apply_document_classes(&window, theme);
            if let Err(e) = dispatch_theme_changed(&window, theme) {
                log::warn!("could not dispatch {THEME_CHANGED_EVENT}: {e:?}");
            }
        });
        Ok(Self { manager })
    }

    #[wasm_bindgen(js_name = activeTheme)]
    pub fn active_theme(&mut self) -> String {
        self.manager.active_theme().as_str().to_owned()
    }

    /// Applies a theme by id; unknown ids fall back to the default theme.
    /// Returns the id actually applied.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, name: &str) -> Result<String, JsValue> {
        self.manager
            .apply_theme_name(name)
            .map(|t| t.as_str().to_owned())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn toggle(&mut self) -> Result<String, JsValue> {
        let next = self.manager.active_theme().toggled();
        self.set_theme(next.as_str())
    }

    #[wasm_bindgen(js_name = isDark)]
    pub fn is_dark(&self) -> bool {
        self.manager.is_dark()
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.manager
            .clear()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
