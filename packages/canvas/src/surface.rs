//! # Drawing Surfaces
//!
//! A [`DrawingSurface`] owns the pixels of one drawing. It can be attached
//! to any number of DOM elements at once; every attached element shows the
//! same drawing and every attached element's input reaches it.
//!
//! ## Lifecycle
//!
//! 1. Built with its configured default size but not yet *ready*
//! 2. Becomes ready through [`DrawingSurface::load_from_bytes`] (an
//!    existing PNG, which also sets the size) or
//!    [`DrawingSurface::mark_blank`] (no file yet)
//! 3. Input before that point is ignored and rendering fails with
//!    [`CanvasError::NotReady`], so a save can never overwrite a file
//!    with a drawing that has not loaded yet
//!
//! Dimensions are unknown until the surface is ready.

use crate::raster::RasterCanvas;
use crate::scene::SceneCanvas;
use crate::{CanvasError, Color, ToolbarAction};
use image::RgbaImage;
use scrawl_common::DomElement;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Freehand dots straight into a pixel buffer
    Raster,
    /// Shapes with tools, colors and undo over a base image
    #[default]
    Scene,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Leave,
}

/// Pointer input in display coordinates of the element that received it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,

    /// Size the element is displayed at
    pub display_width: f32,
    pub display_height: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32, display: (f32, f32)) -> Self {
        Self {
            kind,
            x,
            y,
            display_width: display.0,
            display_height: display.1,
        }
    }

    /// Position in canvas pixels for a canvas of `dimensions`, or `None`
    /// when the input does not map to a finite point
    pub fn to_canvas(&self, dimensions: (u32, u32)) -> Option<(f32, f32)> {
        let scale = |canvas: u32, display: f32| {
            if display > 0.0 {
                canvas as f32 / display
            } else {
                1.0
            }
        };
        let x = self.x * scale(dimensions.0, self.display_width);
        let y = self.y * scale(dimensions.1, self.display_height);
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }
}

/// What happened on the surface as a result of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Pixels changed mid-gesture
    Changed,
    /// A gesture completed and changed the drawing
    StrokeFinished,
    /// The user pressed save
    SaveRequested,
}

pub trait DrawingSurface {
    fn kind(&self) -> SurfaceKind;

    /// Replace the drawing with a decoded PNG; the surface takes its size
    fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<(), CanvasError>;

    /// No persisted drawing exists; start blank at the default size
    fn mark_blank(&mut self);

    fn is_ready(&self) -> bool;

    /// Pixel size, once ready
    fn dimensions(&self) -> Option<(u32, u32)>;

    /// Flattened pixels, once ready
    fn snapshot(&self) -> Result<RgbaImage, CanvasError>;

    /// The drawing as PNG bytes
    fn render_to_bytes(&self) -> Result<Vec<u8>, CanvasError> {
        crate::encode_png(&self.snapshot()?)
    }

    /// Create an element displaying this surface
    fn attach_to_dom(&mut self) -> DomElement;

    fn detach_from_dom(&mut self, element: &DomElement);

    fn attached_count(&self) -> usize;

    fn estimated_height(&self) -> Option<u32> {
        self.dimensions().map(|(_, height)| height)
    }

    /// Toolbar element matching this surface's capabilities
    fn render_toolbar(&self) -> DomElement;

    /// Create a toolbar element that follows this surface's tool and color
    fn attach_toolbar(&mut self) -> DomElement;

    fn detach_toolbar(&mut self, element: &DomElement);

    fn handle_pointer(&mut self, event: PointerEvent) -> Option<SurfaceEvent>;

    fn apply_action(&mut self, action: &ToolbarAction) -> Option<SurfaceEvent>;
}

/// How to build a surface
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    pub kind: SurfaceKind,
    pub width: u32,
    pub height: u32,
    pub ink: Color,
    pub brush_width: f32,
    pub palette: Vec<Color>,
    pub history_levels: usize,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            kind: SurfaceKind::default(),
            width: 700,
            height: 495,
            ink: Color::WHITE,
            brush_width: 2.0,
            palette: crate::default_palette(),
            history_levels: 100,
        }
    }
}

/// Build a surface, failing when no drawing context of that size exists
pub fn build_surface(options: &SurfaceOptions) -> Result<Box<dyn DrawingSurface>, CanvasError> {
    if options.width == 0 || options.height == 0 {
        return Err(CanvasError::ContextUnavailable {
            width: options.width,
            height: options.height,
        });
    }
    debug!(kind = ?options.kind, width = options.width, height = options.height, "Building surface");

    Ok(match options.kind {
        SurfaceKind::Raster => Box::new(RasterCanvas::new(options)),
        SurfaceKind::Scene => Box::new(SceneCanvas::new(options)),
    })
}

/// Elements currently displaying one surface
///
/// Each element is a `<canvas>` whose `data-revision` attribute changes
/// whenever the drawing does.
#[derive(Debug, Default)]
pub(crate) struct Attachments {
    elements: Vec<DomElement>,
    revision: u64,
}

impl Attachments {
    pub(crate) fn attach(&mut self, class: &str, dimensions: Option<(u32, u32)>) -> DomElement {
        let element = DomElement::new("canvas")
            .with_attribute("class", class)
            .with_attribute("style", "width: 100%");
        Self::describe(&element, dimensions, self.revision);
        self.elements.push(element.clone());
        element
    }

    pub(crate) fn detach(&mut self, element: &DomElement) {
        self.elements.retain(|e| !e.ptr_eq(element));
    }

    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    /// Push new state to every attached element
    pub(crate) fn refresh(&mut self, dimensions: Option<(u32, u32)>) {
        self.revision += 1;
        for element in &self.elements {
            Self::describe(element, dimensions, self.revision);
        }
    }

    fn describe(element: &DomElement, dimensions: Option<(u32, u32)>, revision: u64) {
        match dimensions {
            Some((width, height)) => {
                element.set_attribute("width", width.to_string());
                element.set_attribute("height", height.to_string());
                element.remove_attribute("data-state");
            }
            None => element.set_attribute("data-state", "loading"),
        }
        element.set_attribute("data-revision", revision.to_string());
    }
}

/// Toolbar elements currently showing one surface's state
///
/// Refreshing swaps every toolbar's buttons for freshly rendered ones, so
/// the elements themselves stay where their containers put them.
#[derive(Debug, Default)]
pub(crate) struct Toolbars {
    elements: Vec<DomElement>,
}

impl Toolbars {
    pub(crate) fn attach(&mut self, rendered: DomElement) -> DomElement {
        self.elements.push(rendered.clone());
        rendered
    }

    pub(crate) fn detach(&mut self, element: &DomElement) {
        self.elements.retain(|e| !e.ptr_eq(element));
    }

    pub(crate) fn refresh(&self, render: impl Fn() -> DomElement) {
        for element in &self.elements {
            for stale in element.children() {
                element.remove_child(&stale);
            }
            for button in render().children() {
                element.append_child(button);
            }
        }
    }
}
