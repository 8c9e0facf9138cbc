//! # Persistence Bridge
//!
//! Moves drawing bytes between surfaces and the document store. Files are
//! matched by exact path over the store's file listing; the store
//! guarantees at most one file per path, so the first match wins.
//!
//! Loads only write into a surface and saves only read from one, so a save
//! started after a load resolved is never clobbered by that load.

use crate::EmbedError;
use futures::future::{FutureExt, LocalBoxFuture};
use scrawl_common::{DocumentStore, StoreError, StoredFile};
use std::rc::Rc;
use tracing::{debug, info};

/// What a save did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Overwrote,
    Created,
}

#[derive(Clone)]
pub struct PersistenceBridge {
    store: Rc<dyn DocumentStore>,
}

impl PersistenceBridge {
    pub fn new(store: Rc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The file stored at exactly `path`
    pub fn find(&self, path: &str) -> Option<StoredFile> {
        self.store.files().into_iter().find(|file| file.path() == path)
    }

    /// Read a drawing; `Ok(None)` when no file exists yet
    ///
    /// The store is consulted when the future is first polled.
    pub fn load(&self, path: &str) -> LocalBoxFuture<'static, Result<Option<Vec<u8>>, EmbedError>> {
        let bridge = self.clone();
        let path = path.to_string();
        async move {
            let Some(file) = bridge.find(&path) else {
                debug!(path = %path, "No drawing file yet");
                return Ok(None);
            };
            match bridge.store.read_binary(&file).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(StoreError::NotFound(_)) => Ok(None),
                Err(e) => Err(e.into()),
            }
        }
        .boxed_local()
    }

    /// Overwrite the file at `path`, or create it
    pub fn save(&self, path: &str, bytes: Vec<u8>) -> LocalBoxFuture<'static, Result<SaveOutcome, EmbedError>> {
        let bridge = self.clone();
        let path = path.to_string();
        async move {
            match bridge.find(&path) {
                Some(file) => {
                    info!(path = %path, bytes = bytes.len(), "Overwriting drawing");
                    bridge.store.modify_binary(&file, bytes).await?;
                    Ok(SaveOutcome::Overwrote)
                }
                None => {
                    info!(path = %path, bytes = bytes.len(), "Creating drawing");
                    bridge.store.create_binary(&path, bytes).await?;
                    Ok(SaveOutcome::Created)
                }
            }
        }
        .boxed_local()
    }

    /// URL a static rendering can display the drawing from
    pub fn resource_url(&self, path: &str) -> Option<String> {
        self.find(path).map(|file| self.store.resource_url(&file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use scrawl_common::MemoryStore;

    fn bridge() -> (MemoryStore, PersistenceBridge) {
        let store = MemoryStore::new();
        let bridge = PersistenceBridge::new(Rc::new(store.clone()));
        (store, bridge)
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let (_, bridge) = bridge();
        assert_eq!(block_on(bridge.load("draw.png")).unwrap(), None);
    }

    #[test]
    fn test_save_creates_then_overwrites() {
        let (store, bridge) = bridge();

        assert_eq!(block_on(bridge.save("draw.png", vec![1])).unwrap(), SaveOutcome::Created);
        assert_eq!(block_on(bridge.save("draw.png", vec![2])).unwrap(), SaveOutcome::Overwrote);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("draw.png"), Some(vec![2]));
    }

    #[test]
    fn test_save_then_load_is_bit_identical() {
        let (_, bridge) = bridge();
        let bytes = vec![0x89, b'P', b'N', b'G', 0, 255, 7];

        block_on(bridge.save("sketches/a.png", bytes.clone())).unwrap();

        assert_eq!(block_on(bridge.load("sketches/a.png")).unwrap(), Some(bytes));
    }

    #[test]
    fn test_find_requires_exact_path() {
        let (store, bridge) = bridge();
        store.insert("dir/draw.png", vec![1]);

        assert!(bridge.find("draw.png").is_none());
        assert!(bridge.find("dir/draw.png").is_some());
        assert_eq!(bridge.resource_url("dir/draw.png").as_deref(), Some("memory://dir/draw.png"));
    }
}
