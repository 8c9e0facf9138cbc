//! # Decorations
//!
//! Visual annotations bound to document ranges for one editing session.
//!
//! - **Widget**: mounts a [`WidgetType`] at a single position
//! - **Replace**: hides the text of a non-empty range
//!
//! A [`DecorationSet`] keeps its ranges sorted by position and can be
//! carried through a transaction with [`DecorationSet::map`], so unrelated
//! edits leave decorations attached to the text they annotate.

use crate::changes::{Assoc, ChangeSet};
use crate::widget::WidgetType;
use crate::EditorError;
use std::fmt;
use std::rc::Rc;

/// Widget placement
#[derive(Clone)]
pub struct WidgetDecoration {
    pub widget: Rc<dyn WidgetType>,

    /// Rendered as its own block rather than inline
    pub block: bool,

    /// Negative sides stay before text inserted at the widget's position
    pub side: i32,
}

impl fmt::Debug for WidgetDecoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDecoration")
            .field("widget", &Rc::as_ptr(&self.widget))
            .field("block", &self.block)
            .field("side", &self.side)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Decoration {
    Widget(WidgetDecoration),
    Replace,
}

impl Decoration {
    /// Block widget that sticks before text typed at its position
    pub fn block_widget(widget: Rc<dyn WidgetType>) -> Self {
        Decoration::Widget(WidgetDecoration {
            widget,
            block: true,
            side: -1,
        })
    }

    pub fn inline_widget(widget: Rc<dyn WidgetType>, side: i32) -> Self {
        Decoration::Widget(WidgetDecoration {
            widget,
            block: false,
            side,
        })
    }

    pub fn replace() -> Self {
        Decoration::Replace
    }

    fn start_side(&self) -> i32 {
        match self {
            Decoration::Widget(w) => w.side,
            Decoration::Replace => 0,
        }
    }
}

/// A decoration and the range it covers
#[derive(Debug, Clone)]
pub struct DecorationRange {
    pub from: usize,
    pub to: usize,
    pub decoration: Decoration,
}

impl DecorationRange {
    fn sort_key(&self) -> (usize, i32) {
        (self.from, self.decoration.start_side())
    }

    pub fn as_widget(&self) -> Option<&WidgetDecoration> {
        match &self.decoration {
            Decoration::Widget(w) => Some(w),
            Decoration::Replace => None,
        }
    }
}

/// Sorted collection of decorations
#[derive(Debug, Clone, Default)]
pub struct DecorationSet {
    ranges: Vec<DecorationRange>,
}

impl DecorationSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecorationRange> {
        self.ranges.iter()
    }

    /// Widget decorations with their positions
    pub fn widgets(&self) -> impl Iterator<Item = (usize, &WidgetDecoration)> {
        self.ranges
            .iter()
            .filter_map(|r| r.as_widget().map(|w| (r.from, w)))
    }

    /// Ranges hidden by replace decorations
    pub fn replaced(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.ranges
            .iter()
            .filter(|r| matches!(r.decoration, Decoration::Replace))
            .map(|r| (r.from, r.to))
    }

    /// Carry every decoration through a transaction's changes
    ///
    /// Replace ranges whose text was deleted entirely are dropped.
    pub fn map(&self, changes: &ChangeSet) -> Self {
        if changes.is_empty() {
            return self.clone();
        }

        let mut ranges: Vec<DecorationRange> = self
            .ranges
            .iter()
            .filter_map(|range| match &range.decoration {
                Decoration::Widget(w) => {
                    let assoc = if w.side < 0 { Assoc::Before } else { Assoc::After };
                    let pos = changes.map_pos(range.from, assoc);
                    Some(DecorationRange {
                        from: pos,
                        to: pos,
                        decoration: range.decoration.clone(),
                    })
                }
                Decoration::Replace => {
                    let from = changes.map_pos(range.from, Assoc::After);
                    let to = changes.map_pos(range.to, Assoc::Before);
                    (from < to).then(|| DecorationRange {
                        from,
                        to,
                        decoration: Decoration::Replace,
                    })
                }
            })
            .collect();
        ranges.sort_by_key(DecorationRange::sort_key);

        Self { ranges }
    }

    /// Combine several sets into one sorted set
    pub fn merge<'a>(sets: impl IntoIterator<Item = &'a DecorationSet>) -> Self {
        let mut ranges: Vec<DecorationRange> = sets
            .into_iter()
            .flat_map(|set| set.ranges.iter().cloned())
            .collect();
        ranges.sort_by_key(DecorationRange::sort_key);
        Self { ranges }
    }
}

/// Builds a [`DecorationSet`] from ranges added in document order
#[derive(Debug, Default)]
pub struct DecorationSetBuilder {
    ranges: Vec<DecorationRange>,
}

impl DecorationSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a range; ranges must arrive sorted by position
    pub fn add(&mut self, from: usize, to: usize, decoration: Decoration) -> Result<(), EditorError> {
        let well_formed = match &decoration {
            Decoration::Widget(_) => from == to,
            Decoration::Replace => from < to,
        };
        if !well_formed {
            return Err(EditorError::InvalidDecorationRange { from, to });
        }

        let range = DecorationRange {
            from,
            to,
            decoration,
        };
        if let Some(last) = self.ranges.last() {
            if range.sort_key() < last.sort_key() {
                return Err(EditorError::UnsortedDecoration {
                    from,
                    previous: last.from,
                });
            }
        }
        self.ranges.push(range);
        Ok(())
    }

    pub fn finish(self) -> DecorationSet {
        DecorationSet {
            ranges: self.ranges,
        }
    }
}
