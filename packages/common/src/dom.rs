//! # Host DOM
//!
//! A small retained element tree. Widgets hand these to the editor view,
//! which mounts them next to the text they decorate. Clones are handles to
//! the same element.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Shared handle to an element
#[derive(Clone)]
pub struct DomElement(Rc<RefCell<ElementData>>);

#[derive(Debug)]
struct ElementData {
    id: u64,
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<DomElement>,
}

impl DomElement {
    /// Create a detached element
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(ElementData {
            id: NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed),
            tag: tag.into(),
            attributes: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        })))
    }

    /// Builder-style attribute setter
    pub fn with_attribute(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style text setter
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Process-unique element id
    pub fn id(&self) -> u64 {
        self.0.borrow().id
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.0.borrow_mut().attributes.insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.0.borrow_mut().attributes.remove(name)
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.0.borrow_mut().text = Some(text.into());
    }

    pub fn text(&self) -> Option<String> {
        self.0.borrow().text.clone()
    }

    /// Whitespace-separated `class` attribute contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn append_child(&self, child: DomElement) {
        self.0.borrow_mut().children.push(child);
    }

    /// Remove a direct child, returning whether it was present
    pub fn remove_child(&self, child: &DomElement) -> bool {
        let mut data = self.0.borrow_mut();
        let before = data.children.len();
        data.children.retain(|c| !c.ptr_eq(child));
        data.children.len() != before
    }

    pub fn children(&self) -> Vec<DomElement> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// All descendants (depth-first, document order) with the given tag
    pub fn descendants_by_tag(&self, tag: &str) -> Vec<DomElement> {
        let mut found = Vec::new();
        for child in self.children() {
            if child.tag() == tag {
                found.push(child.clone());
            }
            found.extend(child.descendants_by_tag(tag));
        }
        found
    }

    /// Whether both handles point at the same element
    pub fn ptr_eq(&self, other: &DomElement) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DomElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("DomElement")
            .field("id", &data.id)
            .field("tag", &data.tag)
            .field("attributes", &data.attributes)
            .field("children", &data.children.len())
            .finish()
    }
}
