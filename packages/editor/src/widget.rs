//! Widgets: stateful elements the view mounts at a document position.

use crate::EditorError;
use scrawl_common::DomElement;
use std::any::Any;

/// Element an extension places in the document through a widget decoration
///
/// The view calls [`WidgetType::to_dom`] lazily, the first time a widget
/// becomes visible, and [`WidgetType::destroy`] when its decoration goes
/// away. Widget state that must outlive the element belongs outside it.
pub trait WidgetType {
    /// Build the element for this widget
    fn to_dom(&self) -> Result<DomElement, EditorError>;

    /// Release anything tied to an element built by [`WidgetType::to_dom`]
    fn destroy(&self, _dom: &DomElement) {}

    /// Expected height in pixels, when known
    fn estimated_height(&self) -> Option<u32> {
        None
    }

    /// Whether `other` renders identically, letting the view keep the
    /// existing element when one widget replaces another
    fn eq(&self, _other: &dyn WidgetType) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
}
