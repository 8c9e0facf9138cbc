//! # Decoration Reconciler
//!
//! Keeps exactly one drawing widget alive per embed occurrence as the note
//! is edited.
//!
//! ## Pass
//!
//! On every document change:
//!
//! 1. Map the previous decorations through the change, so widgets follow
//!    their tags across unrelated edits
//! 2. Locate every embed in the new tree and compute its insertion offset
//! 3. Keep the mapped widget at that offset when it shows the same path;
//!    otherwise get the path's surface from the registry and place a new
//!    widget there
//! 4. Drop every mapped widget whose offset no embed produced
//! 5. Publish the result
//!
//! Selection-only transactions cannot change the tree; they only map the
//! set. At most one widget is placed per offset; later duplicates are
//! dropped.

use crate::load::SurfaceCell;
use crate::locator::locate_tags;
use crate::registry::WidgetRegistry;
use crate::widget::{DrawingWidget, WidgetContext};
use scrawl_editor::{
    Decoration, DecorationField, DecorationSet, DecorationSetBuilder, EditorState, Transaction,
    WidgetType,
};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use tracing::{debug, trace, warn};

pub struct DrawingReconciler {
    registry: Rc<RefCell<WidgetRegistry>>,
    context: WidgetContext,
    decorations: DecorationSet,
    passes: u64,
}

impl DrawingReconciler {
    pub fn new(registry: Rc<RefCell<WidgetRegistry>>, context: WidgetContext) -> Self {
        Self {
            registry,
            context,
            decorations: DecorationSet::none(),
            passes: 0,
        }
    }

    /// Number of reconciliation passes run so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    fn reconcile(&mut self, previous: DecorationSet, state: &EditorState) -> DecorationSet {
        self.passes += 1;

        let mut kept: HashMap<usize, Rc<dyn WidgetType>> = previous
            .widgets()
            .filter(|(_, w)| DrawingWidget::from_widget(w.widget.as_ref()).is_some())
            .map(|(pos, w)| (pos, w.widget.clone()))
            .collect();

        let mut registry = self.registry.borrow_mut();
        registry.begin_pass();

        let mut builder = DecorationSetBuilder::new();
        let mut offsets = BTreeSet::new();
        let mut created = 0;

        for tag in locate_tags(state.syntax_tree(), state.doc()) {
            let offset = tag.insertion_offset();
            if !offsets.insert(offset) {
                debug!(offset, path = %tag.identity, "Duplicate embed offset dropped");
                continue;
            }

            let reusable = kept.remove(&offset).filter(|widget| {
                DrawingWidget::from_widget(widget.as_ref()).is_some_and(|d| d.identity() == tag.identity)
            });

            let widget = match reusable {
                Some(widget) => {
                    if let Some(drawing) = DrawingWidget::from_widget(widget.as_ref()) {
                        registry.retain(drawing.cell());
                    }
                    widget
                }
                None => match registry.get_or_create(&tag.identity) {
                    Ok(cell) => {
                        created += 1;
                        self.place(cell)
                    }
                    Err(e) => {
                        warn!(path = %tag.identity, error = %e, "Could not create drawing widget");
                        continue;
                    }
                },
            };

            if let Err(e) = builder.add(offset, offset, Decoration::block_widget(widget)) {
                warn!(offset, error = %e, "Drawing decoration rejected");
            }
        }

        registry.end_pass();
        let decorations = builder.finish();
        trace!(
            pass = self.passes,
            widgets = decorations.len(),
            created,
            dropped = kept.len(),
            "Reconciled drawing widgets"
        );
        decorations
    }

    fn place(&self, cell: Rc<SurfaceCell>) -> Rc<dyn WidgetType> {
        Rc::new(DrawingWidget::new(cell, self.context.clone()))
    }
}

impl DecorationField for DrawingReconciler {
    fn name(&self) -> &str {
        "scrawl-drawings"
    }

    fn create(&mut self, state: &EditorState) {
        self.decorations = self.reconcile(DecorationSet::none(), state);
    }

    fn update(&mut self, tr: &Transaction) {
        let mapped = self.decorations.map(&tr.changes);
        self.decorations = if tr.doc_changed() {
            self.reconcile(mapped, &tr.state)
        } else {
            mapped
        };
    }

    fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }
}
