//! Visual themes and their persistence.
//!
//! The site has two themes. The active one is stored under a durable key
//! (browser `localStorage`) and mirrored into a volatile key
//! (`sessionStorage`) so that a cleared durable store can be restored within
//! the same session. A version marker is written alongside. Every change is
//! broadcast to subscribers, which is how animators learn they must rebuild
//! their fields with the new colors.

use crate::error::SceneError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Durable key holding the active theme id.
pub const STORAGE_KEY: &str = "theme";
/// Volatile key mirroring [`STORAGE_KEY`].
pub const SESSION_BACKUP_KEY: &str = "themeSessionBackup";
/// Durable key holding [`STORAGE_VERSION`].
pub const VERSION_KEY: &str = "themeVersion";
pub const STORAGE_VERSION: &str = "2.0";

/// The enumerated set of site themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeId {
    /// Light theme.
    #[default]
    #[serde(rename = "theme-lucid-blue")]
    LucidBlue,
    /// Dark theme.
    #[serde(rename = "theme-metallic-sky")]
    MetallicSky,
}

impl ThemeId {
    pub const ALL: [ThemeId; 2] = [ThemeId::LucidBlue, ThemeId::MetallicSky];

    /// The id as stored and as used for the document class name.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::LucidBlue => "theme-lucid-blue",
            ThemeId::MetallicSky => "theme-metallic-sky",
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeId::MetallicSky
    }

    /// The other theme.
    pub fn toggled(self) -> ThemeId {
        match self {
            ThemeId::LucidBlue => ThemeId::MetallicSky,
            ThemeId::MetallicSky => ThemeId::LucidBlue,
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SceneError::UnknownTheme(s.to_owned()))
    }
}

/// String key-value storage (browser `Storage`, a JSON file, memory).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), SceneError>;

    fn remove(&mut self, key: &str) -> Result<(), SceneError>;
}

/// In-memory store; the native stand-in for `sessionStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SceneError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SceneError> {
        self.entries.remove(key);
        Ok(())
    }
}

type Subscriber = Box<dyn FnMut(ThemeId)>;

/// Reads, validates, persists and broadcasts the active theme.
pub struct ThemeManager<D: KeyValueStore, V: KeyValueStore> {
    durable: D,
    volatile: V,
    subscribers: Vec<Subscriber>,
}

impl<D: KeyValueStore, V: KeyValueStore> ThemeManager<D, V> {
    pub fn new(durable: D, volatile: V) -> Self {
        Self {
            durable,
            volatile,
            subscribers: Vec::new(),
        }
    }

    /// Registers a callback run after every successful theme change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(ThemeId) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Resolves the active theme, repairing whichever store is stale.
    ///
    /// A valid durable value wins and is mirrored into the volatile store.
    /// Otherwise a valid volatile value is restored into the durable store.
    /// Otherwise the default theme is returned. Unrecognized stored values
    /// are logged and ignored.
    pub fn active_theme(&mut self) -> ThemeId {
        if let Some(theme) = read_valid(&self.durable, STORAGE_KEY) {
            if let Err(e) = self.volatile.set(SESSION_BACKUP_KEY, theme.as_str()) {
                log::debug!("could not mirror theme into volatile store: {e}");
            }
            return theme;
        }
        if let Some(theme) = read_valid(&self.volatile, SESSION_BACKUP_KEY) {
            if let Err(e) = self.durable.set(STORAGE_KEY, theme.as_str()) {
                log::debug!("could not restore theme into durable store: {e}");
            }
            return theme;
        }
        ThemeId::default()
    }

    /// The durable value only, without repair. Defaults when missing or invalid.
    pub fn current_theme(&self) -> ThemeId {
        read_valid(&self.durable, STORAGE_KEY).unwrap_or_default()
    }

    pub fn is_dark(&self) -> bool {
        self.current_theme().is_dark()
    }

    /// Persists `theme` in both stores plus the version marker, then
    /// notifies every subscriber once.
    ///
    /// A durable write failure is logged and tolerated as long as the
    /// volatile mirror accepts the value.
    pub fn set_theme(&mut self, theme: ThemeId) -> Result<(), SceneError> {
        self.persist(theme)?;
        log::debug!("theme changed to {theme}");
        for subscriber in &mut self.subscribers {
            subscriber(theme);
        }
        Ok(())
    }

    /// Resolves the active theme on page load and writes it back to both
    /// stores with the version marker. Subscribers are not notified.
    pub fn initialize(&mut self) -> Result<ThemeId, SceneError> {
        let theme = self.active_theme();
        self.persist(theme)?;
        Ok(theme)
    }

    fn persist(&mut self, theme: ThemeId) -> Result<(), SceneError> {
        let durable = self
            .durable
            .set(STORAGE_KEY, theme.as_str())
            .and_then(|()| self.durable.set(VERSION_KEY, STORAGE_VERSION));
        let volatile = self.volatile.set(SESSION_BACKUP_KEY, theme.as_str());

        match (durable, volatile) {
            (Err(d), Err(v)) => {
                return Err(SceneError::Storage(format!("durable: {d}; volatile: {v}")));
            }
            (Err(d), Ok(())) => {
                log::warn!("durable theme store rejected write, using session mirror: {d}");
            }
            (Ok(()), Err(v)) => {
                log::warn!("volatile theme mirror rejected write: {v}");
            }
            (Ok(()), Ok(())) => {}
        }
        Ok(())
    }

    /// Applies a theme by its string id. Unknown ids log a warning and
    /// apply the default theme instead.
    pub fn apply_theme_name(&mut self, name: &str) -> Result<ThemeId, SceneError> {
        let theme = name.parse::<ThemeId>().unwrap_or_else(|_| {
            log::warn!("invalid theme: {name}, using default");
            ThemeId::default()
        });
        self.set_theme(theme)?;
        Ok(theme)
    }

    /// Removes every key this manager writes.
    pub fn clear(&mut self) -> Result<(), SceneError> {
        self.durable.remove(STORAGE_KEY)?;
        self.durable.remove(VERSION_KEY)?;
        self.volatile.remove(SESSION_BACKUP_KEY)?;
        log::info!("theme data cleared");
        Ok(())
    }

    pub fn durable(&self) -> &D {
        &self.durable
    }

    pub fn volatile(&self) -> &V {
        &self.volatile
    }

    pub fn into_stores(self) -> (D, V) {
        (self.durable, self.volatile)
    }
}

fn read_valid(store: &impl KeyValueStore, key: &str) -> Option<ThemeId> {
    let raw = store.get(key)?;
    match raw.parse::<ThemeId>() {
        Ok(theme) => Some(theme),
        Err(_) => {
            log::warn!("ignoring unrecognized stored theme '{raw}' under '{key}'");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store whose writes always fail, like storage in a locked-down browser.
    #[derive(Default)]
    struct RejectingStore;

    impl KeyValueStore for RejectingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), SceneError> {
            Err(SceneError::Storage("quota exceeded".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), SceneError> {
            Ok(())
        }
    }

    fn manager() -> ThemeManager<MemoryStore, MemoryStore> {
        ThemeManager::new(MemoryStore::new(), MemoryStore::new())
    }

    #[test]
    fn theme_ids_round_trip_through_strings() {
        for theme in ThemeId::ALL {
            assert_eq!(theme.as_str().parse::<ThemeId>().unwrap(), theme);
        }
        assert!("theme-neon".parse::<ThemeId>().is_err());
    }

    #[test]
    fn serde_uses_class_names() {
        let json = serde_json::to_string(&ThemeId::MetallicSky).unwrap();
        assert_eq!(json, "\"theme-metallic-sky\"");
    }

    #[test]
    fn empty_storage_yields_default() {
        assert_eq!(manager().active_theme(), ThemeId::LucidBlue);
    }

    #[test]
    fn corrupted_storage_yields_default() {
        let mut durable = MemoryStore::new();
        durable.set(STORAGE_KEY, "theme-\u{0}garbage").unwrap();
        let mut volatile = MemoryStore::new();
        volatile.set(SESSION_BACKUP_KEY, "").unwrap();
        let mut mgr = ThemeManager::new(durable, volatile);
        assert_eq!(mgr.active_theme(), ThemeId::default());
        assert_eq!(mgr.current_theme(), ThemeId::default());
    }

    #[test]
    fn durable_value_is_mirrored_to_volatile() {
        let mut durable = MemoryStore::new();
        durable.set(STORAGE_KEY, "theme-metallic-sky").unwrap();
        let mut mgr = ThemeManager::new(durable, MemoryStore::new());
        assert_eq!(mgr.active_theme(), ThemeId::MetallicSky);
        assert_eq!(
            mgr.volatile().get(SESSION_BACKUP_KEY).as_deref(),
            Some("theme-metallic-sky")
        );
    }

    #[test]
    fn initialize_persists_resolved_theme_without_notifying() {
        let mut volatile = MemoryStore::new();
        volatile
            .set(SESSION_BACKUP_KEY, "theme-metallic-sky")
            .unwrap();
        let mut mgr = ThemeManager::new(MemoryStore::new(), volatile);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        mgr.subscribe(move |t| sink.borrow_mut().push(t));

        assert_eq!(mgr.initialize().unwrap(), ThemeId::MetallicSky);
        assert_eq!(
            mgr.durable().get(STORAGE_KEY).as_deref(),
            Some("theme-metallic-sky")
        );
        assert_eq!(mgr.durable().get(VERSION_KEY).as_deref(), Some(STORAGE_VERSION));
        assert!(seen.borrow().is_empty());

        let mut fresh = manager();
        assert_eq!(fresh.initialize().unwrap(), ThemeId::LucidBlue);
        assert_eq!(
            fresh.volatile().get(SESSION_BACKUP_KEY).as_deref(),
            Some("theme-lucid-blue")
        );
    }

    #[test]
    fn volatile_value_restores_cleared_durable() {
        let mut volatile = MemoryStore::new();
        volatile
            .set(SESSION_BACKUP_KEY, "theme-metallic-sky")
            .unwrap();
        let mut mgr = ThemeManager::new(MemoryStore::new(), volatile);
        assert_eq!(mgr.active_theme(), ThemeId::MetallicSky);
        assert_eq!(
            mgr.durable().get(STORAGE_KEY).as_deref(),
            Some("theme-metallic-sky")
        );
    }

    #[test]
    fn set_theme_writes_both_stores_and_version() {
        let mut mgr = manager();
        mgr.set_theme(ThemeId::MetallicSky).unwrap();
        assert_eq!(
            mgr.durable().get(STORAGE_KEY).as_deref(),
            Some("theme-metallic-sky")
        );
        assert_eq!(
            mgr.durable().get(VERSION_KEY).as_deref(),
            Some(STORAGE_VERSION)
        );
        assert_eq!(
            mgr.volatile().get(SESSION_BACKUP_KEY).as_deref(),
            Some("theme-metallic-sky")
        );
        assert!(mgr.is_dark());
    }

    #[test]
    fn set_theme_notifies_each_subscriber_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut mgr = manager();
        let a = Rc::clone(&seen);
        mgr.subscribe(move |t| a.borrow_mut().push(("a", t)));
        let b = Rc::clone(&seen);
        mgr.subscribe(move |t| b.borrow_mut().push(("b", t)));

        mgr.set_theme(ThemeId::MetallicSky).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![("a", ThemeId::MetallicSky), ("b", ThemeId::MetallicSky)]
        );
    }

    #[test]
    fn unknown_name_applies_default() {
        let mut mgr = manager();
        mgr.set_theme(ThemeId::MetallicSky).unwrap();
        let applied = mgr.apply_theme_name("theme-unicorn").unwrap();
        assert_eq!(applied, ThemeId::LucidBlue);
        assert_eq!(mgr.current_theme(), ThemeId::LucidBlue);
    }

    #[test]
    fn durable_failure_falls_back_to_volatile() {
        let mut mgr = ThemeManager::new(RejectingStore, MemoryStore::new());
        let notified = Rc::new(RefCell::new(0));
        let n = Rc::clone(&notified);
        mgr.subscribe(move |_| *n.borrow_mut() += 1);

        mgr.set_theme(ThemeId::MetallicSky).unwrap();

        assert_eq!(*notified.borrow(), 1);
        assert_eq!(mgr.active_theme(), ThemeId::MetallicSky);
    }

    #[test]
    fn both_stores_failing_is_an_error_without_notification() {
        let mut mgr = ThemeManager::new(RejectingStore, RejectingStore);
        let notified = Rc::new(RefCell::new(0));
        let n = Rc::clone(&notified);
        mgr.subscribe(move |_| *n.borrow_mut() += 1);

        assert!(matches!(
            mgr.set_theme(ThemeId::MetallicSky),
            Err(SceneError::Storage(_))
        ));
        assert_eq!(*notified.borrow(), 0);
    }

    #[test]
    fn clear_removes_all_keys() {
        let mut mgr = manager();
        mgr.set_theme(ThemeId::MetallicSky).unwrap();
        mgr.clear().unwrap();
        assert!(mgr.durable().get(STORAGE_KEY).is_none());
        assert!(mgr.durable().get(VERSION_KEY).is_none());
        assert!(mgr.volatile().get(SESSION_BACKUP_KEY).is_none());
        assert_eq!(mgr.active_theme(), ThemeId::default());
    }

    #[test]
    fn toggled_flips_between_themes() {
        assert_eq!(ThemeId::LucidBlue.toggled(), ThemeId::MetallicSky);
        assert_eq!(ThemeId::MetallicSky.toggled(), ThemeId::LucidBlue);
    }
}
