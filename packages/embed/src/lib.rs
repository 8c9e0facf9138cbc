//! # Scrawl Embed
//!
//! Editable drawings embedded in notes with `?[[path.png]]`.
//!
//! ## Architecture
//!
//! ```text
//! note text ──parse──▶ SyntaxTree
//!                          │
//!                 ┌────────┴─────────┐
//!                 ▼                  ▼
//!         DrawingReconciler     ConcealField
//!          │  locate_tags        hides ?[[…]] away
//!          │  WidgetRegistry     from the cursor
//!          ▼
//!   DrawingWidget (per placement) ──▶ SurfaceCell (per path)
//!                                        │  load / save
//!                                        ▼
//!                                 PersistenceBridge ──▶ DocumentStore
//! ```
//!
//! Static rendering goes through [`DrawingPostProcessor`] instead.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let host = Host::new(Rc::new(store), Rc::new(LogNotifier), Rc::new(pool.spawner()));
//! let plugin = DrawingPlugin::load(host, vault_dir)?;
//! let mut session = plugin.open(EditorState::new(text));
//! pool.run_until_stalled(); // image loads
//! ```

mod conceal;
mod config;
mod error;
mod host;
mod load;
mod locator;
mod notice;
mod persistence;
mod plugin;
mod post_process;
mod reconciler;
mod registry;
mod widget;

pub use conceal::ConcealField;
pub use config::{EmbedConfig, SavePolicy, DEFAULT_CONFIG_NAME};
pub use error::EmbedError;
pub use host::Host;
pub use load::{spawn_load, LoadState, SurfaceCell};
pub use locator::{locate_tags, TagMatch, CLOSE_LEN, EMBED_MARKER};
pub use notice::{CollectingNotifier, LogNotifier, Notifier};
pub use persistence::{PersistenceBridge, SaveOutcome};
pub use plugin::{DrawingPlugin, DrawingSession};
pub use post_process::DrawingPostProcessor;
pub use reconciler::DrawingReconciler;
pub use registry::WidgetRegistry;
pub use widget::{DrawingWidget, WidgetContext};

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`)
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
