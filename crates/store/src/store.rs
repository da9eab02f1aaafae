//! The configuration store: an insertion-ordered string/string mapping
//! overlaid by a read-only environment source.
//!
//! Responsibilities:
//! - Key/value access (`set`, `get`, `get_or`, `get_as`, `keys`).
//! - Precedence: the environment source wins over the store on every read.
//! - Merging external mappings (other stores, bytes, JSON text) with
//!   atomic string-only validation.
//! - JSON file persistence, synchronous and asynchronous.
//!
//! Does NOT handle:
//! - Coercion rules (see coerce.rs).
//! - Environment lookup semantics (see env.rs).
//!
//! Invariants:
//! - Every stored value is `Value::String`; `set` stringifies and `merge`
//!   validates before mutating.
//! - `set` upper-cases keys; `get` looks keys up exactly as given. The
//!   asymmetry is part of the contract.
//! - `keys()` and merged-key lists preserve insertion/source order.

use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};

use crate::coerce::{self, Coerce, Coerced};
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{Result, StoreError};

/// An insertion-ordered configuration mapping with environment overlay.
///
/// All values are stored as strings. Reads consult the injected
/// [`EnvSource`] first and fall back to the store mapping; typed reads go
/// through [`Store::get_as`].
pub struct Store {
    /// The mapping. Values are always `Value::String`.
    data: Map<String, Value>,
    /// Read-only overlay consulted ahead of `data`.
    env: Box<dyn EnvSource>,
}

impl Store {
    /// An empty store over the real process environment.
    pub fn new() -> Self {
        Self::with_env(ProcessEnv)
    }

    /// An empty store over an injected environment source.
    pub fn with_env(env: impl EnvSource + 'static) -> Self {
        Self {
            data: Map::new(),
            env: Box::new(env),
        }
    }

    /// A store populated by a synchronous [`Store::load`] of `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a JSON object,
    /// or contains a non-string value.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new();
        store.load(path)?;
        Ok(store)
    }

    /// Store a value under the upper-cased form of `key`, overwriting any
    /// existing entry.
    ///
    /// Non-string keys and values are stringified (scalars by their textual
    /// form, composites by compact JSON text); a null value becomes the
    /// empty string.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for a null key.
    pub fn set(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Result<()> {
        let key = Self::key_text(key.into())?.to_uppercase();
        let value = coerce::stringify(&value.into());
        self.data.insert(key, Value::String(value));
        Ok(())
    }

    /// Look up `key` (exactly as given, no case normalization): the
    /// environment source first, then the store.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for a null key.
    pub fn get(&self, key: impl Into<Value>) -> Result<Option<String>> {
        let key = Self::key_text(key.into())?;
        if let Some(value) = self.env.get(&key) {
            return Ok(Some(value));
        }
        Ok(self
            .data
            .get(&key)
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    /// Like [`Store::get`], but resolve to `default` when the key is absent
    /// everywhere. The default is returned unmodified; no coercion applies.
    pub fn get_or(&self, key: impl Into<Value>, default: impl Into<Value>) -> Result<Value> {
        let key = Self::key_text(key.into())?;
        if let Some(value) = self.env.get(&key) {
            return Ok(Value::String(value));
        }
        match self.data.get(&key) {
            Some(value) => Ok(value.clone()),
            None => Ok(default.into()),
        }
    }

    /// Typed read: resolve the raw value (environment, then store, then
    /// `default`) and apply `kind` to it.
    ///
    /// A null raw value yields the kind's empty sentinel: NaN for
    /// [`Coerce::Number`], `false` for [`Coerce::Boolean`],
    /// [`Coerced::Null`] otherwise. Pass `Value::Null` as the default to
    /// read without one.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for a null key,
    /// [`StoreError::Parse`] when a [`Coerce::Json`] request meets
    /// malformed text, and [`StoreError::CodeUnsupported`] when
    /// [`Coerce::Code`] meets a textual value.
    pub fn get_as(
        &self,
        key: impl Into<Value>,
        default: impl Into<Value>,
        kind: &Coerce,
    ) -> Result<Coerced> {
        let key = Self::key_text(key.into())?;
        let raw = if let Some(value) = self.env.get(&key) {
            Value::String(value)
        } else {
            match self.data.get(&key) {
                Some(value) => value.clone(),
                None => default.into(),
            }
        };
        coerce::apply(kind, raw)
    }

    /// All store keys, in insertion order. Environment entries are not
    /// enumerated.
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Number of entries in the store mapping.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Merge an external mapping into the store, overwriting on collision,
    /// and return the merged keys in source order.
    ///
    /// Accepted sources: another [`Store`], raw bytes, JSON text, an
    /// existing JSON map, or [`MergeSource::Null`] (an empty mapping).
    /// Validation runs before any mutation: a non-string value fails the
    /// whole merge and leaves the store untouched.
    ///
    /// # Errors
    /// Returns [`StoreError::Parse`] for malformed or non-object JSON and
    /// [`StoreError::InvalidValue`] naming the first offending key.
    pub fn merge(&mut self, source: impl Into<MergeSource>) -> Result<Vec<String>> {
        let map = source.into().into_map()?;
        for (key, value) in &map {
            if !value.is_string() {
                return Err(StoreError::InvalidValue { key: key.clone() });
            }
        }

        let keys: Vec<String> = map.keys().cloned().collect();
        self.data.extend(map);
        tracing::debug!(merged = keys.len(), "merged entries into store");
        Ok(keys)
    }

    /// Read `path`, parse it as a flat JSON object of strings, and merge it
    /// into the store. Returns the merged keys.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] when the file cannot be read, otherwise
    /// the same errors as [`Store::merge`].
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let merged = self.merge(bytes)?;
        tracing::debug!(path = %path.display(), keys = merged.len(), "loaded store from file");
        Ok(merged)
    }

    /// Asynchronous [`Store::load`]. All failures, including I/O, surface
    /// as `Err` through the future.
    pub async fn load_async(&mut self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let merged = self.merge(bytes)?;
        tracing::debug!(path = %path.display(), keys = merged.len(), "loaded store from file");
        Ok(merged)
    }

    /// Serialize the store mapping to JSON text, write it to `path`, and
    /// return the serialized text. Serialization happens before the write.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] when the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let data = serde_json::to_string(&self.data)?;
        std::fs::write(path, &data)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "saved store to file");
        Ok(data)
    }

    /// Asynchronous [`Store::save`].
    pub async fn save_async(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let data = serde_json::to_string(&self.data)?;
        tokio::fs::write(path, &data).await?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "saved store to file");
        Ok(data)
    }

    /// Stringify a dynamic key, rejecting null.
    fn key_text(key: Value) -> Result<String> {
        if key.is_null() {
            return Err(StoreError::InvalidKey);
        }
        Ok(coerce::stringify(&key))
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// An external mapping accepted by [`Store::merge`], normalized to a flat
/// JSON map before validation.
#[derive(Debug, Clone)]
pub enum MergeSource {
    /// An already-parsed JSON object.
    Map(Map<String, Value>),
    /// Raw bytes: decoded as UTF-8 (lossily), then parsed as a JSON object.
    Bytes(Vec<u8>),
    /// JSON text of a flat object.
    Text(String),
    /// No source; merges nothing.
    Null,
}

impl MergeSource {
    fn into_map(self) -> Result<Map<String, Value>> {
        match self {
            MergeSource::Map(map) => Ok(map),
            MergeSource::Bytes(bytes) => parse_object(&String::from_utf8_lossy(&bytes)),
            MergeSource::Text(text) => parse_object(&text),
            MergeSource::Null => Ok(Map::new()),
        }
    }
}

fn parse_object(text: &str) -> Result<Map<String, Value>> {
    Ok(serde_json::from_str(text)?)
}

impl From<&Store> for MergeSource {
    fn from(store: &Store) -> Self {
        MergeSource::Map(store.data.clone())
    }
}

impl From<Map<String, Value>> for MergeSource {
    fn from(map: Map<String, Value>) -> Self {
        MergeSource::Map(map)
    }
}

impl From<Vec<u8>> for MergeSource {
    fn from(bytes: Vec<u8>) -> Self {
        MergeSource::Bytes(bytes)
    }
}

impl From<&[u8]> for MergeSource {
    fn from(bytes: &[u8]) -> Self {
        MergeSource::Bytes(bytes.to_vec())
    }
}

impl From<String> for MergeSource {
    fn from(text: String) -> Self {
        MergeSource::Text(text)
    }
}

impl From<&str> for MergeSource {
    fn from(text: &str) -> Self {
        MergeSource::Text(text.to_string())
    }
}

impl<T: Into<MergeSource>> From<Option<T>> for MergeSource {
    fn from(source: Option<T>) -> Self {
        match source {
            Some(source) => source.into(),
            None => MergeSource::Null,
        }
    }
}
