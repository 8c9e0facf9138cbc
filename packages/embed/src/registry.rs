//! # Widget Registry
//!
//! Caches one [`SurfaceCell`] per drawing path for an open note, so a
//! drawing keeps its pixels and history while its tag scrolls out of view,
//! moves, or is briefly deleted.
//!
//! ## Eviction
//!
//! The reconciler brackets every pass with [`WidgetRegistry::begin_pass`]
//! and [`WidgetRegistry::end_pass`]. A path not seen for `evict_after`
//! consecutive passes is dropped; a later tag for it builds a fresh
//! surface and reloads the image. With `evict_after = None` entries live
//! until the registry does.

use crate::load::{spawn_load, SurfaceCell};
use crate::persistence::PersistenceBridge;
use crate::EmbedError;
use futures::task::LocalSpawn;
use scrawl_canvas::{build_surface, SurfaceOptions};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

struct RegistryEntry {
    cell: Rc<SurfaceCell>,
    seen: bool,
    missed_passes: u32,
}

pub struct WidgetRegistry {
    bridge: PersistenceBridge,
    spawner: Rc<dyn LocalSpawn>,
    options: SurfaceOptions,
    evict_after: Option<u32>,
    entries: HashMap<String, RegistryEntry>,
}

impl WidgetRegistry {
    pub fn new(
        bridge: PersistenceBridge,
        spawner: Rc<dyn LocalSpawn>,
        options: SurfaceOptions,
        evict_after: Option<u32>,
    ) -> Self {
        Self {
            bridge,
            spawner,
            options,
            evict_after,
            entries: HashMap::new(),
        }
    }

    /// The cached surface for `identity`, or a new one whose image load
    /// has been started
    pub fn get_or_create(&mut self, identity: &str) -> Result<Rc<SurfaceCell>, EmbedError> {
        if let Some(entry) = self.entries.get_mut(identity) {
            entry.seen = true;
            return Ok(entry.cell.clone());
        }

        let surface = build_surface(&self.options)?;
        let cell = SurfaceCell::new(identity, surface);
        spawn_load(self.spawner.as_ref(), &self.bridge, &cell)?;
        debug!(path = identity, "Created drawing surface");

        self.entries.insert(
            identity.to_string(),
            RegistryEntry {
                cell: cell.clone(),
                seen: true,
                missed_passes: 0,
            },
        );
        Ok(cell)
    }

    /// Record that a kept placement still shows `cell`
    ///
    /// Re-registers the cell if its entry was evicted or cleared while the
    /// placement survived.
    pub fn retain(&mut self, cell: &Rc<SurfaceCell>) {
        let entry = self
            .entries
            .entry(cell.identity().to_string())
            .or_insert_with(|| RegistryEntry {
                cell: cell.clone(),
                seen: false,
                missed_passes: 0,
            });
        entry.seen = true;
    }

    pub fn begin_pass(&mut self) {
        for entry in self.entries.values_mut() {
            entry.seen = false;
        }
    }

    /// Age unseen entries and evict the expired ones
    pub fn end_pass(&mut self) -> Vec<String> {
        let mut evicted = Vec::new();
        let evict_after = self.evict_after;

        self.entries.retain(|identity, entry| {
            if entry.seen {
                entry.missed_passes = 0;
                return true;
            }
            entry.missed_passes += 1;
            let expired = evict_after.is_some_and(|limit| entry.missed_passes >= limit);
            if expired {
                evicted.push(identity.clone());
            }
            !expired
        });

        if !evicted.is_empty() {
            debug!(evicted = ?evicted, "Evicted drawing surfaces");
        }
        evicted
    }

    pub fn get(&self, identity: &str) -> Option<Rc<SurfaceCell>> {
        self.entries.get(identity).map(|entry| entry.cell.clone())
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached surface
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
