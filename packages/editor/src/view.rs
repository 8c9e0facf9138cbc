//! # Editor View
//!
//! Owns the current [`EditorState`] and the decoration fields registered
//! for one open note, and keeps the mounted widget elements in sync with
//! the fields' decorations.
//!
//! ## Widget lifecycle
//!
//! After every transaction the view walks the merged widget decorations:
//!
//! 1. A widget already mounted (same `Rc`) keeps its element
//! 2. Otherwise a mounted widget at the same position that reports
//!    [`WidgetType::eq`] hands its element over
//! 3. Otherwise [`WidgetType::to_dom`] builds a new element
//!
//! Elements whose widgets disappeared are passed to [`WidgetType::destroy`].
//! A widget that fails to render is logged and skipped; it never takes the
//! view down with it.

use crate::changes::Assoc;
use crate::decoration::DecorationSet;
use crate::field::DecorationField;
use crate::state::EditorState;
use crate::transaction::TransactionSpec;
use crate::widget::WidgetType;
use crate::EditorError;
use scrawl_common::DomElement;
use std::rc::Rc;
use tracing::{debug, warn};

/// A widget whose element is currently in the view
#[derive(Clone)]
pub struct MountedWidget {
    pub pos: usize,
    pub widget: Rc<dyn WidgetType>,
    pub dom: DomElement,
}

/// One open note
pub struct EditorView {
    state: EditorState,
    fields: Vec<Box<dyn DecorationField>>,
    mounted: Vec<MountedWidget>,
    destroyed: bool,
}

impl EditorView {
    /// Open a view and run every field's `create`
    pub fn new(state: EditorState, mut fields: Vec<Box<dyn DecorationField>>) -> Self {
        for field in &mut fields {
            field.create(&state);
            debug!(
                field = field.name(),
                decorations = field.decorations().len(),
                "Created decoration field"
            );
        }

        let mut view = Self {
            state,
            fields,
            mounted: Vec::new(),
            destroyed: false,
        };
        view.sync_widgets();
        view
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Apply a transaction and bring decorations and widgets up to date
    pub fn dispatch(&mut self, spec: TransactionSpec) -> Result<(), EditorError> {
        if self.destroyed {
            return Err(EditorError::ViewDestroyed);
        }

        let tr = self.state.update(spec)?;
        for field in &mut self.fields {
            field.update(&tr);
        }
        for mounted in &mut self.mounted {
            mounted.pos = tr.changes.map_pos(mounted.pos, Assoc::Before);
        }
        self.state = tr.state;
        self.sync_widgets();
        Ok(())
    }

    /// Decorations of every field, merged
    pub fn decorations(&self) -> DecorationSet {
        DecorationSet::merge(self.fields.iter().map(|f| f.decorations()))
    }

    pub fn mounted_widgets(&self) -> &[MountedWidget] {
        &self.mounted
    }

    /// Document text as displayed: replaced ranges are hidden
    pub fn rendered_text(&self) -> String {
        let doc = self.state.doc();
        let mut out = String::with_capacity(doc.len());
        let mut cursor = 0;
        for (from, to) in self.decorations().replaced() {
            if from > cursor {
                out.push_str(&doc[cursor..from]);
            }
            cursor = cursor.max(to);
        }
        out.push_str(&doc[cursor.min(doc.len())..]);
        out
    }

    /// Tear down every widget element and drop the fields
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        for mounted in self.mounted.drain(..) {
            mounted.widget.destroy(&mounted.dom);
        }
        self.fields.clear();
        self.destroyed = true;
        debug!("Destroyed editor view");
    }

    fn sync_widgets(&mut self) {
        let decorations = self.decorations();
        let mut previous: Vec<Option<MountedWidget>> =
            std::mem::take(&mut self.mounted).into_iter().map(Some).collect();
        let mut mounted = Vec::new();

        for (pos, decoration) in decorations.widgets() {
            let same_widget = previous.iter().position(|slot| {
                slot.as_ref()
                    .is_some_and(|m| Rc::ptr_eq(&m.widget, &decoration.widget))
            });
            let equal_widget = || {
                previous.iter().position(|slot| {
                    slot.as_ref().is_some_and(|m| {
                        m.pos == pos && decoration.widget.eq(m.widget.as_ref())
                    })
                })
            };
            let reusable = same_widget.or_else(equal_widget);

            match reusable.and_then(|index| previous[index].take()) {
                Some(existing) => mounted.push(MountedWidget {
                    pos,
                    widget: decoration.widget.clone(),
                    dom: existing.dom,
                }),
                None => match decoration.widget.to_dom() {
                    Ok(dom) => mounted.push(MountedWidget {
                        pos,
                        widget: decoration.widget.clone(),
                        dom,
                    }),
                    Err(e) => warn!(pos, error = %e, "Widget failed to render"),
                },
            }
        }

        for stale in previous.into_iter().flatten() {
            stale.widget.destroy(&stale.dom);
        }
        self.mounted = mounted;
    }
}

impl Drop for EditorView {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::{Decoration, DecorationSetBuilder};
    use crate::transaction::Transaction;
    use std::any::Any;
    use std::cell::Cell;

    struct Counter {
        rendered: Cell<usize>,
        destroyed: Cell<usize>,
        fail: bool,
    }

    impl Counter {
        fn new(fail: bool) -> Rc<Self> {
            Rc::new(Self {
                rendered: Cell::new(0),
                destroyed: Cell::new(0),
                fail,
            })
        }
    }

    impl WidgetType for Counter {
        fn to_dom(&self) -> Result<DomElement, EditorError> {
            if self.fail {
                return Err(EditorError::Widget("no context".to_string()));
            }
            self.rendered.set(self.rendered.get() + 1);
            Ok(DomElement::new("div"))
        }

        fn destroy(&self, _dom: &DomElement) {
            self.destroyed.set(self.destroyed.get() + 1);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Places fixed widgets at the positions of every `@` in the text
    struct AtSigns {
        widgets: Vec<Rc<Counter>>,
        set: DecorationSet,
    }

    impl AtSigns {
        fn rebuild(&mut self, doc: &str) {
            let mut builder = DecorationSetBuilder::new();
            for (i, (pos, _)) in doc.match_indices('@').enumerate() {
                if let Some(widget) = self.widgets.get(i) {
                    let widget: Rc<dyn WidgetType> = widget.clone();
                    builder.add(pos, pos, Decoration::block_widget(widget)).unwrap();
                }
            }
            self.set = builder.finish();
        }
    }

    impl DecorationField for AtSigns {
        fn name(&self) -> &str {
            "at-signs"
        }

        fn create(&mut self, state: &EditorState) {
            self.rebuild(state.doc());
        }

        fn update(&mut self, tr: &Transaction) {
            self.rebuild(tr.state.doc());
        }

        fn decorations(&self) -> &DecorationSet {
            &self.set
        }
    }

    fn view_with(doc: &str, widgets: Vec<Rc<Counter>>) -> EditorView {
        let field = AtSigns {
            widgets,
            set: DecorationSet::none(),
        };
        EditorView::new(EditorState::new(doc), vec![Box::new(field)])
    }

    #[test]
    fn test_widget_rendered_once_across_edits() {
        let widget = Counter::new(false);
        let mut view = view_with("a @ b", vec![widget.clone()]);

        view.dispatch(TransactionSpec::insert(0, "xyz ")).unwrap();
        view.dispatch(TransactionSpec::insert(view.state().len(), "!")).unwrap();

        assert_eq!(widget.rendered.get(), 1);
        assert_eq!(widget.destroyed.get(), 0);
        assert_eq!(view.mounted_widgets()[0].pos, 6);
    }

    #[test]
    fn test_removed_widget_destroyed() {
        let widget = Counter::new(false);
        let mut view = view_with("a @ b", vec![widget.clone()]);

        view.dispatch(TransactionSpec::delete(2, 3)).unwrap();

        assert!(view.mounted_widgets().is_empty());
        assert_eq!(widget.destroyed.get(), 1);
    }

    #[test]
    fn test_failing_widget_does_not_break_view() {
        let broken = Counter::new(true);
        let healthy = Counter::new(false);
        let mut view = view_with("@ @", vec![broken, healthy.clone()]);

        assert_eq!(view.mounted_widgets().len(), 1);
        assert_eq!(healthy.rendered.get(), 1);

        view.dispatch(TransactionSpec::insert(0, "ok ")).unwrap();
        assert_eq!(view.mounted_widgets().len(), 1);
    }

    #[test]
    fn test_destroy_tears_down_and_rejects_dispatch() {
        let widget = Counter::new(false);
        let mut view = view_with("@", vec![widget.clone()]);

        view.destroy();

        assert_eq!(widget.destroyed.get(), 1);
        assert_eq!(
            view.dispatch(TransactionSpec::insert(0, "x")),
            Err(EditorError::ViewDestroyed)
        );
    }

    #[test]
    fn test_drop_destroys_widgets() {
        let widget = Counter::new(false);
        {
            let _view = view_with("@", vec![widget.clone()]);
        }
        assert_eq!(widget.destroyed.get(), 1);
    }
}
