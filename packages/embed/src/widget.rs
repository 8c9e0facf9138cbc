//! # Drawing Widget
//!
//! One placement of a drawing in the editor. Placements of the same path
//! share a [`SurfaceCell`]; each placement builds its own DOM when the view
//! asks for it and detaches it again on `destroy`.
//!
//! Rendered DOM:
//!
//! ```text
//! div.scrawl-drawing[data-path]
//! ├── div.scrawl-toolbar   (buttons carry data-action)
//! └── canvas.scrawl-canvas
//! ```

use crate::config::SavePolicy;
use crate::load::SurfaceCell;
use crate::notice::Notifier;
use crate::persistence::PersistenceBridge;
use crate::EmbedError;
use futures::task::{LocalSpawn, LocalSpawnExt};
use scrawl_canvas::{PointerEvent, SurfaceEvent, ToolbarAction};
use scrawl_common::DomElement;
use scrawl_editor::{EditorError, WidgetType};
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// What every drawing widget needs from the host
#[derive(Clone)]
pub struct WidgetContext {
    pub bridge: PersistenceBridge,
    pub notifier: Rc<dyn Notifier>,
    pub spawner: Rc<dyn LocalSpawn>,
    pub save_policy: SavePolicy,
}

pub struct DrawingWidget {
    cell: Rc<SurfaceCell>,
    context: WidgetContext,
    containers: RefCell<Vec<DomElement>>,
}

impl DrawingWidget {
    pub fn new(cell: Rc<SurfaceCell>, context: WidgetContext) -> Self {
        Self {
            cell,
            context,
            containers: RefCell::new(Vec::new()),
        }
    }

    /// The drawing widget behind a mounted widget, if it is one
    pub fn from_widget(widget: &dyn WidgetType) -> Option<&DrawingWidget> {
        widget.as_any().downcast_ref::<DrawingWidget>()
    }

    pub fn identity(&self) -> &str {
        self.cell.identity()
    }

    pub fn cell(&self) -> &Rc<SurfaceCell> {
        &self.cell
    }

    /// Forward pointer input to the surface
    pub fn handle_pointer(&self, event: PointerEvent) -> Option<SurfaceEvent> {
        let outcome = match self.cell.with_surface_mut(|s| s.handle_pointer(event)) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(path = self.identity(), error = %e, "Pointer input dropped");
                return None;
            }
        };

        if outcome == Some(SurfaceEvent::StrokeFinished)
            && self.context.save_policy == SavePolicy::OnPointerRelease
        {
            // Failures were already reported by `save`
            let _ = self.save();
        }
        outcome
    }

    /// Handle a toolbar button press by its `data-action` value
    pub fn press(&self, data_action: &str) -> Result<Option<SurfaceEvent>, EmbedError> {
        let action = ToolbarAction::parse(data_action)?;
        self.apply_action(&action)
    }

    pub fn apply_action(&self, action: &ToolbarAction) -> Result<Option<SurfaceEvent>, EmbedError> {
        let outcome = self.cell.with_surface_mut(|s| s.apply_action(action))?;
        if outcome == Some(SurfaceEvent::SaveRequested) {
            self.save()?;
        }
        Ok(outcome)
    }

    /// Encode the drawing now and write it to the store in the background
    ///
    /// A "saved" notice follows once the write lands.
    pub fn save(&self) -> Result<(), EmbedError> {
        let path = self.identity().to_string();
        let encoded = self
            .cell
            .with_surface(|s| s.render_to_bytes())
            .and_then(|bytes| bytes.map_err(EmbedError::from));
        let bytes = match encoded {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path, error = %e, "Could not encode drawing");
                self.context
                    .notifier
                    .notify(&format!("Could not save drawing {}: {}", path, e));
                return Err(e);
            }
        };

        let write = self.context.bridge.save(&path, bytes);
        let notifier = self.context.notifier.clone();
        self.context.spawner.spawn_local(async move {
            match write.await {
                Ok(outcome) => {
                    debug!(path = %path, outcome = ?outcome, "Drawing saved");
                    notifier.notify(&format!("Drawing saved as {}", path));
                }
                Err(e) => {
                    warn!(path = %path, error = %e, "Drawing save failed");
                    notifier.notify(&format!("Could not save drawing {}: {}", path, e));
                }
            }
        })?;
        Ok(())
    }

    /// Number of DOM containers this placement currently has
    pub fn mounted_count(&self) -> usize {
        self.containers.borrow().len()
    }
}

impl WidgetType for DrawingWidget {
    fn to_dom(&self) -> Result<DomElement, EditorError> {
        let busy = |e: EmbedError| EditorError::Widget(e.to_string());
        let canvas = self.cell.with_surface_mut(|s| s.attach_to_dom()).map_err(busy)?;
        let toolbar = self.cell.with_surface_mut(|s| s.attach_toolbar()).map_err(busy)?;

        let container = DomElement::new("div")
            .with_attribute("class", "scrawl-drawing")
            .with_attribute("data-path", self.identity());
        container.append_child(toolbar);
        container.append_child(canvas);

        self.containers.borrow_mut().push(container.clone());
        debug!(path = self.identity(), "Mounted drawing widget");
        Ok(container)
    }

    fn destroy(&self, dom: &DomElement) {
        let detached = self.cell.with_surface_mut(|s| {
            for child in dom.children() {
                if child.has_class("scrawl-toolbar") {
                    s.detach_toolbar(&child);
                }
            }
            for canvas in dom.descendants_by_tag("canvas") {
                s.detach_from_dom(&canvas);
            }
        });
        if let Err(e) = detached {
            warn!(path = self.identity(), error = %e, "Could not detach drawing");
        }
        self.containers.borrow_mut().retain(|c| !c.ptr_eq(dom));
        debug!(path = self.identity(), "Destroyed drawing widget");
    }

    fn estimated_height(&self) -> Option<u32> {
        self.cell.with_surface(|s| s.estimated_height()).ok().flatten()
    }

    fn eq(&self, other: &dyn WidgetType) -> bool {
        DrawingWidget::from_widget(other).is_some_and(|other| Rc::ptr_eq(&self.cell, &other.cell))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
