//! # Static Rendering Post-Processors
//!
//! Outside live editing a note is rendered block by block (blocks are runs
//! of non-blank lines). Each rendered block is handed to every registered
//! [`PostProcessor`] together with a [`PostProcessContext`] describing where
//! the block came from.
//!
//! ## Design
//!
//! - Processors run in registration order
//! - A failing processor aborts only its own work on that block; the
//!   failure is logged and the remaining processors still run
//! - Section info may be unavailable (e.g. the block was rendered from a
//!   transcluded fragment); processors that need it must fail explicitly

use crate::EditorError;
use scrawl_common::DomElement;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where a rendered block sits in its source note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    /// Full text of the note
    pub text: String,

    /// First line of the block (0-based)
    pub line_start: usize,

    /// Last line of the block (inclusive)
    pub line_end: usize,
}

impl SectionInfo {
    /// Text of the block's own lines
    pub fn section_text(&self) -> String {
        self.text
            .lines()
            .skip(self.line_start)
            .take((self.line_end + 1).saturating_sub(self.line_start))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Context handed to post-processors alongside a block
#[derive(Debug, Clone)]
pub struct PostProcessContext {
    pub source_path: String,
    section: Option<SectionInfo>,
}

impl PostProcessContext {
    pub fn new(source_path: impl Into<String>, section: Option<SectionInfo>) -> Self {
        Self {
            source_path: source_path.into(),
            section,
        }
    }

    pub fn section_info(&self) -> Option<&SectionInfo> {
        self.section.as_ref()
    }
}

/// Hook invoked once per rendered block
pub trait PostProcessor {
    fn name(&self) -> &str;

    fn process(&self, element: &DomElement, ctx: &PostProcessContext) -> Result<(), EditorError>;
}

/// A rendered block and its context
#[derive(Debug, Clone)]
pub struct RenderedBlock {
    pub element: DomElement,
    pub context: PostProcessContext,
}

/// Render a note into blocks without running any processors
pub fn render_blocks(source_path: &str, text: &str) -> Vec<RenderedBlock> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;

    for index in 0..=lines.len() {
        let blank = lines.get(index).map_or(true, |line| line.trim().is_empty());
        match (start, blank) {
            (None, false) => start = Some(index),
            (Some(first), true) => {
                let paragraph = DomElement::new("p").with_text(lines[first..index].join("\n"));
                let element = DomElement::new("div").with_attribute("class", "markdown-block");
                element.append_child(paragraph);

                let section = SectionInfo {
                    text: text.to_string(),
                    line_start: first,
                    line_end: index - 1,
                };
                blocks.push(RenderedBlock {
                    element,
                    context: PostProcessContext::new(source_path, Some(section)),
                });
                start = None;
            }
            _ => {}
        }
    }

    blocks
}

/// Registered post-processors
#[derive(Default)]
pub struct PostProcessorRegistry {
    processors: Vec<Box<dyn PostProcessor>>,
}

impl PostProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, processor: Box<dyn PostProcessor>) {
        debug!(processor = processor.name(), "Registered post-processor");
        self.processors.push(processor);
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run every processor on one block, returning the failures
    pub fn run(&self, block: &RenderedBlock) -> Vec<EditorError> {
        let mut failures = Vec::new();
        for processor in &self.processors {
            if let Err(e) = processor.process(&block.element, &block.context) {
                warn!(
                    processor = processor.name(),
                    source = %block.context.source_path,
                    error = %e,
                    "Post-processor failed"
                );
                failures.push(e);
            }
        }
        failures
    }

    /// Render a note and post-process every block
    pub fn render(&self, source_path: &str, text: &str) -> Vec<RenderedBlock> {
        let blocks = render_blocks(source_path, text);
        for block in &blocks {
            self.run(block);
        }
        blocks
    }
}
