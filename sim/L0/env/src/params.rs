//! Parameter store: the key/value service configuration is read from.
//!
//! Keys are `/`-separated paths into a tree of JSON values, so reading a
//! namespace (`initial_joint_positions`) returns the whole sub-tree and
//! reading a leaf (`initial_joint_positions/joint_map`) returns just that
//! value. A leading `/` and empty segments are ignored.

use std::path::Path;
use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Read side of a parameter service.
///
/// The environment only ever reads; writers are whoever owns the concrete
/// store (tests, the CLI, a transport layer).
pub trait ParamStore: Send + Sync {
    /// Value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Option<Value>;
}

/// Thread-safe in-memory parameter tree.
#[derive(Debug, Default)]
pub struct MemoryParamStore {
    root: RwLock<Map<String, Value>>,
}

impl MemoryParamStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a JSON object document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON and
    /// [`ConfigError::NotAnObject`] if the root is not an object.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(root) => Ok(Self {
                root: RwLock::new(root),
            }),
            other => Err(ConfigError::NotAnObject(other.to_string())),
        }
    }

    /// Build a store from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Store `value` under `key`, creating intermediate namespaces.
    ///
    /// A non-object value sitting on the path is replaced by a namespace.
    /// An empty key is ignored.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        let mut segments = split_key(key).peekable();
        let mut root = self.root.write().unwrap_or_else(PoisonError::into_inner);
        let mut node = &mut *root;
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                node.insert(segment.to_string(), value.into());
                return;
            }
            let child = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            let Value::Object(map) = child else {
                return;
            };
            node = map;
        }
    }

    /// Remove `key` (and everything under it), returning the old value.
    pub fn delete(&self, key: &str) -> Option<Value> {
        let mut root = self.root.write().unwrap_or_else(PoisonError::into_inner);
        let (parent, last) = match key.trim_matches('/').rsplit_once('/') {
            Some((parent, last)) => (Some(parent), last),
            None => (None, key.trim_matches('/')),
        };
        let map = match parent {
            Some(parent) => lookup_mut(&mut root, parent)?.as_object_mut()?,
            None => &mut *root,
        };
        map.remove(last)
    }

}

impl ParamStore for MemoryParamStore {
    fn get(&self, key: &str) -> Option<Value> {
        let root = self.root.read().unwrap_or_else(PoisonError::into_inner);
        let mut segments = split_key(key);
        let mut node = root.get(segments.next()?)?;
        for segment in segments {
            node = node.as_object()?.get(segment)?;
        }
        Some(node.clone())
    }
}

fn split_key(key: &str) -> impl Iterator<Item = &str> {
    key.split('/').filter(|s| !s.is_empty())
}

fn lookup_mut<'a>(root: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Value> {
    let mut segments = split_key(key);
    let mut node = root.get_mut(segments.next()?)?;
    for segment in segments {
        node = node.as_object_mut()?.get_mut(segment)?;
    }
    Some(node)
}
