//! Saving and restoring session progress.
//!
//! Storage is a plain key-value capability over JSON values. The
//! [`PersistenceGateway`] layers typed access on top, one key per log:
//!
//! | key                 | value                        |
//! |---------------------|------------------------------|
//! | `settings`          | [`Settings`]                 |
//! | `player`            | [`PlayerState`]              |
//! | `visitedNodes`      | node ids, in visit order     |
//! | `currentNode`       | node id                      |
//! | `freeInputsHistory` | accepted free-text inputs    |
//! | `choiceHistory`     | `"nodeId:choiceId"` records  |

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use tw_story::PlayerState;

use crate::config::Settings;
use crate::error::{EngineError, EngineResult};

/// A key-value store for JSON values.
pub trait Storage {
    /// The stored value, or `None` if the key is absent.
    fn load(&self, key: &str) -> Option<Value>;
    /// Store a value, replacing any previous one.
    fn save(&mut self, key: &str, value: Value) -> EngineResult<()>;
    /// Delete a key. Deleting an absent key is fine.
    fn remove(&mut self, key: &str) -> EngineResult<()>;
}

/// In-memory storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, Value>>>,
}

impl MemoryStorage {
/// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    fn save(&mut self, key: &str, value: Value) -> EngineResult<()> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> EngineResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object on disk.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so a crash leaves either the old or the new file.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl JsonFileStorage {
    /// Open the save file at `path`. A missing file starts empty; an
    /// unreadable one is discarded with a warning.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(source) => match serde_json::from_str::<Map<String, Value>>(&source) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), %err, "save file is corrupt, starting empty");
                    Map::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(EngineError::Storage { path, source }),
        };
        debug!(path = %path.display(), keys = entries.len(), "save file opened");
        Ok(Self { path, entries })
    }

    fn flush(&self) -> EngineResult<()> {
        let storage_err = |source| EngineError::Storage {
            path: self.path.clone(),
            source,
        };
        let body = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, body).map_err(storage_err)?;
        std::fs::rename(&tmp, &self.path).map_err(storage_err)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: Value) -> EngineResult<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> EngineResult<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// The persisted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Player settings.
    Settings,
    /// Player state.
    Player,
    /// Visited node ids, in order.
    VisitedNodes,
    /// The node the player is on.
    CurrentNode,
    /// Accepted free-text inputs.
    FreeInputsHistory,
    /// `"nodeId:choiceId"` pick records.
    ChoiceHistory,
}

impl StorageKey {
    /// Keys wiped by a restart. Settings survive.
    pub const SESSION: [StorageKey; 5] = [
        StorageKey::Player,
        StorageKey::VisitedNodes,
        StorageKey::CurrentNode,
        StorageKey::FreeInputsHistory,
        StorageKey::ChoiceHistory,
    ];

    /// Key name in the save file.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Settings => "settings",
            StorageKey::Player => "player",
            StorageKey::VisitedNodes => "visitedNodes",
            StorageKey::CurrentNode => "currentNode",
            StorageKey::FreeInputsHistory => "freeInputsHistory",
            StorageKey::ChoiceHistory => "choiceHistory",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed access to a [`Storage`].
pub struct PersistenceGateway {
    storage: Box<dyn Storage>,
}

impl PersistenceGateway {
    /// Wrap a storage backend.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Load and decode a value. A value of the wrong shape counts as absent.
    pub fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let value = self.storage.load(key.as_str())?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(%key, %err, "ignoring stored value with unexpected shape");
                None
            }
        }
    }

    /// Encode and store a value.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: StorageKey, value: &T) -> EngineResult<()> {
        let value = serde_json::to_value(value)?;
        self.storage.save(key.as_str(), value)
    }

    /// Delete a value.
    pub fn remove(&mut self, key: StorageKey) -> EngineResult<()> {
        self.storage.remove(key.as_str())
    }

    /// Saved settings, if any.
    pub fn load_settings(&self) -> Option<Settings> {
        self.load(StorageKey::Settings)
    }

    /// Saved player state, if any.
    pub fn load_player(&self) -> Option<PlayerState> {
        self.load(StorageKey::Player)
    }

    /// A string log, empty when absent.
    pub fn load_log(&self, key: StorageKey) -> Vec<String> {
        self.load(key).unwrap_or_default()
    }

    /// Remove everything a restart wipes.
    pub fn clear_session(&mut self) -> EngineResult<()> {
        for key in StorageKey::SESSION {
            self.remove(key)?;
        }
        Ok(())
    }
}
