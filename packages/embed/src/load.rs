//! # Surface Cells and Image Loads
//!
//! A [`SurfaceCell`] holds the drawing surface for one path together with
//! the state of its image load. Every placement of that path in the open
//! note shares the cell.
//!
//! ## Load states
//!
//! ```text
//! Pending ──▶ Loaded   (file existed and decoded)
//!         ├─▶ Blank    (no file yet)
//!         └─▶ Failed   (read or decode error; surface stays unready)
//! ```
//!
//! The load task only holds a weak reference to its cell. If the cell is
//! gone by the time the bytes arrive, the result is dropped; a second
//! completion for the same cell is ignored.

use crate::persistence::PersistenceBridge;
use crate::EmbedError;
use futures::task::{LocalSpawn, LocalSpawnExt};
use scrawl_canvas::DrawingSurface;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    Blank,
    Failed(String),
}

pub struct SurfaceCell {
    identity: String,
    surface: RefCell<Box<dyn DrawingSurface>>,
    state: RefCell<LoadState>,
}

impl SurfaceCell {
    pub fn new(identity: impl Into<String>, surface: Box<dyn DrawingSurface>) -> Rc<Self> {
        Rc::new(Self {
            identity: identity.into(),
            surface: RefCell::new(surface),
            state: RefCell::new(LoadState::Pending),
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn load_state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&dyn DrawingSurface) -> R) -> Result<R, EmbedError> {
        let surface = self
            .surface
            .try_borrow()
            .map_err(|_| EmbedError::SurfaceBusy(self.identity.clone()))?;
        Ok(f(&**surface))
    }

    pub fn with_surface_mut<R>(&self, f: impl FnOnce(&mut dyn DrawingSurface) -> R) -> Result<R, EmbedError> {
        let mut surface = self
            .surface
            .try_borrow_mut()
            .map_err(|_| EmbedError::SurfaceBusy(self.identity.clone()))?;
        Ok(f(&mut **surface))
    }

    /// Complete the pending load; returns `false` if it already completed
    pub fn resolve(&self, result: Result<Option<Vec<u8>>, EmbedError>) -> bool {
        if *self.state.borrow() != LoadState::Pending {
            debug!(path = %self.identity, "Ignoring repeated load completion");
            return false;
        }

        let next = match result {
            Ok(Some(bytes)) => match self.with_surface_mut(|s| s.load_from_bytes(&bytes)) {
                Ok(Ok(())) => LoadState::Loaded,
                Ok(Err(e)) => LoadState::Failed(e.to_string()),
                Err(e) => LoadState::Failed(e.to_string()),
            },
            Ok(None) => match self.with_surface_mut(|s| s.mark_blank()) {
                Ok(()) => LoadState::Blank,
                Err(e) => LoadState::Failed(e.to_string()),
            },
            Err(e) => LoadState::Failed(e.to_string()),
        };

        match &next {
            LoadState::Failed(reason) => warn!(path = %self.identity, reason = %reason, "Drawing failed to load"),
            state => debug!(path = %self.identity, state = ?state, "Drawing load resolved"),
        }
        *self.state.borrow_mut() = next;
        true
    }
}

/// Start reading the cell's persisted image without waiting for it
pub fn spawn_load(
    spawner: &dyn LocalSpawn,
    bridge: &PersistenceBridge,
    cell: &Rc<SurfaceCell>,
) -> Result<(), EmbedError> {
    let path = cell.identity().to_string();
    let pending = Rc::downgrade(cell);
    let load = bridge.load(&path);

    spawner.spawn_local(async move {
        let result = load.await;
        match pending.upgrade() {
            Some(cell) => {
                cell.resolve(result);
            }
            None => debug!(path = %path, "Surface dropped before its load finished"),
        }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::LocalPool;
    use scrawl_canvas::{build_surface, encode_png, RgbaImage, SurfaceOptions};
    use scrawl_common::MemoryStore;

    fn cell(path: &str) -> Rc<SurfaceCell> {
        SurfaceCell::new(path, build_surface(&SurfaceOptions::default()).unwrap())
    }

    #[test]
    fn test_load_does_not_block_creation() {
        let store = MemoryStore::new();
        store.insert("a.png", encode_png(&RgbaImage::new(8, 4)).unwrap());
        let bridge = PersistenceBridge::new(Rc::new(store));
        let mut pool = LocalPool::new();
        let cell = cell("a.png");

        spawn_load(&pool.spawner(), &bridge, &cell).unwrap();
        assert_eq!(cell.load_state(), LoadState::Pending);
        assert_eq!(cell.with_surface(|s| s.dimensions()).unwrap(), None);

        pool.run_until_stalled();
        assert_eq!(cell.load_state(), LoadState::Loaded);
        assert_eq!(cell.with_surface(|s| s.dimensions()).unwrap(), Some((8, 4)));
    }

    #[test]
    fn test_missing_file_resolves_blank() {
        let bridge = PersistenceBridge::new(Rc::new(MemoryStore::new()));
        let mut pool = LocalPool::new();
        let cell = cell("new.png");

        spawn_load(&pool.spawner(), &bridge, &cell).unwrap();
        pool.run_until_stalled();

        assert_eq!(cell.load_state(), LoadState::Blank);
        assert_eq!(cell.with_surface(|s| s.dimensions()).unwrap(), Some((700, 495)));
    }

    #[test]
    fn test_completion_after_drop_is_ignored() {
        let store = MemoryStore::new();
        store.insert("a.png", encode_png(&RgbaImage::new(2, 2)).unwrap());
        let bridge = PersistenceBridge::new(Rc::new(store));
        let mut pool = LocalPool::new();
        let cell = cell("a.png");
        let weak = Rc::downgrade(&cell);

        spawn_load(&pool.spawner(), &bridge, &cell).unwrap();
        drop(cell);
        pool.run_until_stalled();

        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let cell = cell("a.png");

        assert!(cell.resolve(Ok(None)));
        assert!(!cell.resolve(Ok(Some(encode_png(&RgbaImage::new(3, 3)).unwrap()))));
        assert_eq!(cell.load_state(), LoadState::Blank);
        assert_eq!(cell.with_surface(|s| s.dimensions()).unwrap(), Some((700, 495)));
    }

    #[test]
    fn test_corrupt_file_fails_without_blanking() {
        let cell = cell("a.png");

        cell.resolve(Ok(Some(b"not png".to_vec())));

        assert!(matches!(cell.load_state(), LoadState::Failed(_)));
        assert!(!cell.with_surface(|s| s.is_ready()).unwrap());
    }
}
