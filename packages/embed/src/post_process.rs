//! Static rendering: every embed in a rendered block whose drawing exists
//! in the store becomes an `<img>` appended to the block.
//!
//! A block without section info cannot be mapped back to its source text,
//! so the embeds in it cannot be found. That is a hard error for the block.

use crate::locator::locate_tags;
use crate::persistence::PersistenceBridge;
use crate::EmbedError;
use scrawl_common::DomElement;
use scrawl_editor::{EditorError, PostProcessContext, PostProcessor};
use scrawl_parser::parse;
use tracing::debug;

pub struct DrawingPostProcessor {
    bridge: PersistenceBridge,
}

impl DrawingPostProcessor {
    pub fn new(bridge: PersistenceBridge) -> Self {
        Self { bridge }
    }

    /// Append images for the block's embeds; returns how many were added
    pub fn render(&self, element: &DomElement, ctx: &PostProcessContext) -> Result<usize, EmbedError> {
        let section = ctx.section_info().ok_or_else(|| EmbedError::MissingSectionInfo {
            source_path: ctx.source_path.clone(),
        })?;

        let text = section.section_text();
        let tree = parse(&text);
        let mut added = 0;

        for tag in locate_tags(&tree, &text) {
            let Some(url) = self.bridge.resource_url(&tag.identity) else {
                debug!(path = %tag.identity, "Embedded drawing has no file yet");
                continue;
            };
            let img = DomElement::new("img")
                .with_attribute("class", "scrawl-drawing")
                .with_attribute("src", url)
                .with_attribute("alt", tag.identity.as_str());
            element.append_child(img);
            added += 1;
        }
        Ok(added)
    }
}

impl PostProcessor for DrawingPostProcessor {
    fn name(&self) -> &str {
        "scrawl-drawings"
    }

    fn process(&self, element: &DomElement, ctx: &PostProcessContext) -> Result<(), EditorError> {
        self.render(element, ctx)
            .map(|_| ())
            .map_err(|e| EditorError::PostProcess {
                processor: self.name().to_string(),
                message: e.to_string(),
            })
    }
}
