//! Durable string storage for the theme preference.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::ThemeError;

pub trait PreferenceStore {
    fn read(&self, name: &str) -> Option<String>;
    fn write(&self, name: &str, value: &str) -> Result<(), ThemeError>;
}

/// In-memory store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Rc<RefCell<HashMap<String, String>>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(name: &str, value: &str) -> Self {
        let store = Self::new();
        store.0.borrow_mut().insert(name.into(), value.into());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, name: &str) -> Option<String> {
        self.0.borrow().get(name).cloned()
    }

    fn write(&self, name: &str, value: &str) -> Result<(), ThemeError> {
        self.0.borrow_mut().insert(name.into(), value.into());
        Ok(())
    }
}

/// JSON object of string values in a single file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/<app>/preferences.json`
    pub fn in_config_dir(app: &str) -> Result<Self, ThemeError> {
        let dir = dirs::config_dir().ok_or(ThemeError::NoConfigDir)?;
        Ok(Self::new(dir.join(app).join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, ThemeError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for FileStore {
    fn read(&self, name: &str) -> Option<String> {
        match self.load() {
            Ok(mut map) => map.remove(name),
            Err(e) => {
                log::debug!("ignoring unreadable preference file {}: {e}", self.path.display());
                None
            }
        }
    }

    fn write(&self, name: &str, value: &str) -> Result<(), ThemeError> {
        // a corrupt file is replaced rather than blocking every write
        let mut map = self.load().unwrap_or_default();
        map.insert(name.into(), value.into());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;
        Ok(())
    }
}
