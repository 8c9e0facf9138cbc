use crate::notice::Notifier;
use crate::persistence::PersistenceBridge;
use futures::task::LocalSpawn;
use scrawl_common::DocumentStore;
use std::rc::Rc;

/// Capabilities the host application hands to the extension
#[derive(Clone)]
pub struct Host {
    pub store: Rc<dyn DocumentStore>,
    pub notifier: Rc<dyn Notifier>,

    /// Runs store reads and writes off the update path
    pub spawner: Rc<dyn LocalSpawn>,
}

impl Host {
    pub fn new(
        store: Rc<dyn DocumentStore>,
        notifier: Rc<dyn Notifier>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        Self {
            store,
            notifier,
            spawner,
        }
    }

    pub fn bridge(&self) -> PersistenceBridge {
        PersistenceBridge::new(self.store.clone())
    }
}
