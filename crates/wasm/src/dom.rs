//! Browser-backed style source and key-value stores.

use constellation_core::error::SceneError;
use constellation_core::style::StyleSource;
use constellation_core::theme::KeyValueStore;
use web_sys::{CssStyleDeclaration, Storage, Window};

/// Computed style of the document element, read live.
pub struct ComputedStyle {
    declaration: Option<CssStyleDeclaration>,
}

impl ComputedStyle {
    /// Snapshot handle for the current document. Custom properties are read
    /// through it on demand, so create one per rebuild.
    pub fn of_document(window: &Window) -> Self {
        let declaration = window
            .document()
            .and_then(|d| d.document_element())
            .and_then(|root| window.get_computed_style(&root).ok().flatten());
        if declaration.is_none() {
            log::warn!("no computed style for the document element");
        }
        Self { declaration }
    }
}

impl StyleSource for ComputedStyle {
    fn property(&self, name: &str) -> Option<String> {
        let value = self.declaration.as_ref()?.get_property_value(name).ok()?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Local,
    Session,
}

/// `localStorage` or `sessionStorage`. Storage may be unavailable (privacy
/// modes, sandboxed frames); reads then miss and writes fail.
pub struct BrowserStore {
    kind: StorageKind,
    storage: Option<Storage>,
}

impl BrowserStore {
    pub fn open(window: &Window, kind: StorageKind) -> Self {
        let storage = match kind {
            StorageKind::Local => window.local_storage(),
            StorageKind::Session => window.session_storage(),
        }
        .ok()
        .flatten();
        if storage.is_none() {
            log::warn!("{kind:?} storage unavailable");
        }
        Self { kind, storage }
    }

    fn storage(&self) -> Result<&Storage, SceneError> {
        self.storage
            .as_ref()
            .ok_or_else(|| SceneError::Storage(format!("{:?} storage unavailable", self.kind)))
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SceneError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| SceneError::Storage(format!("{:?} set {key}: {e:?}", self.kind)))
    }

    fn remove(&mut self, key: &str) -> Result<(), SceneError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| SceneError::Storage(format!("{:?} remove {key}: {e:?}", self.kind)))
    }
}
