//! # Plugin Wiring
//!
//! [`DrawingPlugin`] is what a host registers. It receives every host
//! capability explicitly through [`Host`] and hands out:
//!
//! - per-view decoration fields (reconciler and concealment) sharing one
//!   fresh [`WidgetRegistry`], so cached surfaces live exactly as long as
//!   the view
//! - the static-rendering post-processor

use crate::conceal::ConcealField;
use crate::config::EmbedConfig;
use crate::host::Host;
use crate::post_process::DrawingPostProcessor;
use crate::reconciler::DrawingReconciler;
use crate::registry::WidgetRegistry;
use crate::widget::{DrawingWidget, WidgetContext};
use crate::EmbedError;
use scrawl_editor::{
    DecorationField, EditorState, EditorView, PostProcessorRegistry, TransactionSpec,
};
use std::cell::{Ref, RefCell};
use std::path::Path;
use std::rc::Rc;
use tracing::info;

pub struct DrawingPlugin {
    host: Host,
    config: EmbedConfig,
}

impl DrawingPlugin {
    pub fn new(host: Host, config: EmbedConfig) -> Self {
        info!(surface = ?config.surface, save_policy = ?config.save_policy, "Drawing plugin loaded");
        Self { host, config }
    }

    /// Build a plugin with the config found in `vault_dir`
    pub fn load(host: Host, vault_dir: impl AsRef<Path>) -> Result<Self, EmbedError> {
        Ok(Self::new(host, EmbedConfig::load(vault_dir)?))
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    fn widget_context(&self) -> WidgetContext {
        WidgetContext {
            bridge: self.host.bridge(),
            notifier: self.host.notifier.clone(),
            spawner: self.host.spawner.clone(),
            save_policy: self.config.save_policy,
        }
    }

    fn new_registry(&self) -> Rc<RefCell<WidgetRegistry>> {
        Rc::new(RefCell::new(WidgetRegistry::new(
            self.host.bridge(),
            self.host.spawner.clone(),
            self.config.surface_options(),
            self.config.evict_after_passes,
        )))
    }

    fn fields_for(&self, registry: Rc<RefCell<WidgetRegistry>>) -> Vec<Box<dyn DecorationField>> {
        let reconciler = DrawingReconciler::new(registry, self.widget_context());
        vec![Box::new(reconciler), Box::new(ConcealField::new())]
    }

    /// Decoration fields for one new view
    pub fn editor_fields(&self) -> Vec<Box<dyn DecorationField>> {
        self.fields_for(self.new_registry())
    }

    pub fn register_post_processors(&self, registry: &mut PostProcessorRegistry) {
        registry.register(Box::new(DrawingPostProcessor::new(self.host.bridge())));
    }

    /// Open a note with drawing embeds enabled
    pub fn open(&self, state: EditorState) -> DrawingSession {
        let registry = self.new_registry();
        DrawingSession {
            view: EditorView::new(state, self.fields_for(registry.clone())),
            registry,
        }
    }
}

/// An open note and the surfaces cached for it
pub struct DrawingSession {
    view: EditorView,
    registry: Rc<RefCell<WidgetRegistry>>,
}

impl DrawingSession {
    pub fn view(&self) -> &EditorView {
        &self.view
    }

    pub fn dispatch(&mut self, spec: TransactionSpec) -> Result<(), EmbedError> {
        Ok(self.view.dispatch(spec)?)
    }

    pub fn registry(&self) -> Ref<'_, WidgetRegistry> {
        self.registry.borrow()
    }

    /// Mounted drawing widgets and their positions, in document order
    pub fn drawings(&self) -> Vec<(usize, &DrawingWidget)> {
        self.view
            .mounted_widgets()
            .iter()
            .filter_map(|m| DrawingWidget::from_widget(m.widget.as_ref()).map(|d| (m.pos, d)))
            .collect()
    }

    /// The drawing mounted at `pos`
    pub fn drawing_at(&self, pos: usize) -> Option<&DrawingWidget> {
        self.drawings()
            .into_iter()
            .find_map(|(at, drawing)| (at == pos).then_some(drawing))
    }

    /// Tear down the view and drop every cached surface
    pub fn close(&mut self) {
        self.view.destroy();
        self.registry.borrow_mut().clear();
    }
}

impl Drop for DrawingSession {
    fn drop(&mut self) {
        self.close();
    }
}
