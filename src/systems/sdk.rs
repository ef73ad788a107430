// src/systems/sdk.rs

//! # Systems SDK
//!
//! Seams shared by the stateful systems (progress store, resource store).
//! Every system is a read-modify-write loop over one JSON document stored
//! under a fixed key:
//!
//! - `"user_progress"`  → [`UserProgress`](crate::systems::progress::UserProgress)
//! - `"resource_store"` → `ResourceState` (with `system-resources`)
//!
//! ## What this SDK gives you
//! - [`Backend`]: where documents live. [`MemoryBackend`] for tests and
//!   embedding, [`FileBackend`] for one `<key>.json` per key on disk. Stores
//!   own their backend; wrap it in `Rc` to share one between stores.
//! - [`Clock`]: where "now" comes from. History timestamps and the 7-day
//!   prediction window read it, so tests pin it with [`FixedClock`].
//! - [`Observer`]: a hook notified with the new snapshot after each save.
//! - [`read_or_default`] / [`write_document`]: the document codec. A missing
//!   or malformed document reads as the default value (logged, not raised).
//!
//! ## Consistency model
//! Writes replace the whole document. There is no locking and no version
//! check: two stores over the same backend that read, modify and write the
//! same key in interleaved order lose one of the updates. Callers run one
//! update at a time on one thread.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Error, Result};

/// Key-value store for serialized documents.
pub trait Backend {
    /// Raw document text, or `None` if nothing was stored yet.
    fn load(&self, key: &str) -> Result<Option<String>>;
    /// Replaces the document stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: Backend + ?Sized> Backend for Rc<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }
    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

impl<T: Backend + ?Sized> Backend for &T {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }
    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

/// In-process backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    docs: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.docs.borrow().get(key).cloned()
    }

    /// Stores text as-is, bypassing serialization (seeding legacy or damaged records).
    pub fn put_raw(&self, key: &str, text: impl Into<String>) {
        self.docs.borrow_mut().insert(key.to_string(), text.into());
    }
}

impl Backend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.put_raw(key, value);
        Ok(())
    }
}

/// One `<key>.json` file per key under `dir`.
#[derive(Clone, Debug)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(Error::InvalidInput(format!("storage key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Backend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // replaced via rename; readers never see a partial document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock.
#[derive(Clone, Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<T: Clock + ?Sized> Clock for Rc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Notified with the fresh snapshot after a system persists a change.
pub trait Observer<S> {
    fn on_change(&mut self, state: &S);
}

impl<S, F: FnMut(&S)> Observer<S> for F {
    fn on_change(&mut self, state: &S) {
        self(state)
    }
}

/// Reads the document under `key`. Missing → `T::default()`; unparsable →
/// warning + `T::default()`. Backend failures propagate.
pub fn read_or_default<T, B>(backend: &B, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    B: Backend + ?Sized,
{
    let Some(text) = backend.load(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&text) {
        Ok(doc) => Ok(doc),
        Err(e) => {
            warn!(key, error = %e, "stored document is malformed; starting from defaults");
            Ok(T::default())
        }
    }
}

/// Serializes and replaces the document under `key`.
pub fn write_document<T, B>(backend: &B, key: &str, doc: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    B: Backend + ?Sized,
{
    let text = serde_json::to_string(doc)?;
    backend.save(key, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        n: u32,
    }

    #[test]
    fn missing_document_reads_as_default() {
        let b = MemoryBackend::new();
        let d: Doc = read_or_default(&b, "doc").unwrap();
        assert_eq!(d, Doc::default());
    }

    #[test]
    fn malformed_document_reads_as_default() {
        let b = MemoryBackend::new();
        b.put_raw("doc", "{not json");
        let d: Doc = read_or_default(&b, "doc").unwrap();
        assert_eq!(d, Doc::default());
    }

    #[test]
    fn write_then_read() {
        let b = MemoryBackend::new();
        write_document(&b, "doc", &Doc { n: 9 }).unwrap();
        assert_eq!(b.raw("doc").as_deref(), Some(r#"{"n":9}"#));
        let d: Doc = read_or_default(&b, "doc").unwrap();
        assert_eq!(d.n, 9);
    }

    #[test]
    fn file_backend_rejects_path_like_keys() {
        let b = FileBackend::new("unused");
        assert!(matches!(b.load("../etc/passwd"), Err(Error::InvalidInput(_))));
        assert!(matches!(b.save("", "{}"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn fixed_clock_advances() {
        let t0 = DateTime::parse_from_rfc3339("2025-03-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let c = FixedClock::new(t0);
        c.advance(Duration::days(2));
        assert_eq!(c.now(), t0 + Duration::days(2));
    }
}
