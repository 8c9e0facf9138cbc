//! # Scene Canvas
//!
//! Shapes drawn over a base image. The base image is the loaded PNG (or
//! nothing for a new drawing); every brush stroke or rectangle is kept as a
//! [`Shape`] so it can be undone. Rendering flattens base and shapes into
//! one raster.
//!
//! A gesture becomes a shape only when the pointer is released. One
//! gesture is one undo step.

use crate::history::{Edit, History};
use crate::surface::{Attachments, PointerKind, Toolbars};
use crate::{
    paint, toolbar, CanvasError, Color, DrawingSurface, PointerEvent, SurfaceEvent, SurfaceKind,
    SurfaceOptions, Tool, ToolbarAction,
};
use image::RgbaImage;
use scrawl_common::DomElement;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Stroke {
        points: Vec<(f32, f32)>,
        color: Color,
        width: f32,
    },
    Rect {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        width: f32,
    },
}

impl Shape {
    pub fn paint(&self, raster: &mut RgbaImage) {
        match self {
            Shape::Stroke {
                points,
                color,
                width,
            } => match points.as_slice() {
                [] => {}
                [only] => paint::stamp(raster, only.0, only.1, *width, *color),
                _ => {
                    for pair in points.windows(2) {
                        paint::draw_line(raster, pair[0], pair[1], *width, *color);
                    }
                }
            },
            Shape::Rect {
                from,
                to,
                color,
                width,
            } => paint::stroke_rect(raster, *from, *to, *width, *color),
        }
    }
}

/// Committed shapes, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone)]
pub enum SceneEdit {
    Push(Shape),
    Pop,
}

impl Edit for SceneEdit {
    type Target = Scene;

    fn inverse(&self, scene: &Scene) -> Self {
        match self {
            SceneEdit::Push(_) => SceneEdit::Pop,
            SceneEdit::Pop => match scene.shapes.last() {
                Some(shape) => SceneEdit::Push(shape.clone()),
                None => SceneEdit::Pop,
            },
        }
    }

    fn apply(&self, scene: &mut Scene) {
        match self {
            SceneEdit::Push(shape) => scene.shapes.push(shape.clone()),
            SceneEdit::Pop => {
                scene.shapes.pop();
            }
        }
    }
}

pub struct SceneCanvas {
    size: (u32, u32),
    base: Option<RgbaImage>,
    scene: Scene,
    active: Option<Shape>,
    history: History<SceneEdit>,
    tool: Tool,
    color: Color,
    brush_width: f32,
    palette: Vec<Color>,
    ready: bool,
    attachments: Attachments,
    toolbars: Toolbars,
}

impl SceneCanvas {
    pub fn new(options: &SurfaceOptions) -> Self {
        Self {
            size: (options.width, options.height),
            base: None,
            scene: Scene::default(),
            active: None,
            history: History::with_max_levels(options.history_levels),
            tool: Tool::default(),
            color: options.ink,
            brush_width: options.brush_width,
            palette: options.palette.clone(),
            ready: false,
            attachments: Attachments::default(),
            toolbars: Toolbars::default(),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.scene.shapes
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn refresh(&mut self) {
        let dimensions = self.dimensions();
        self.attachments.refresh(dimensions);
    }

    fn begin_gesture(&mut self, at: (f32, f32)) {
        self.active = Some(match self.tool {
            Tool::Brush => Shape::Stroke {
                points: vec![at],
                color: self.color,
                width: self.brush_width,
            },
            Tool::Rectangle => Shape::Rect {
                from: at,
                to: at,
                color: self.color,
                width: self.brush_width,
            },
        });
    }

    fn extend_gesture(&mut self, at: (f32, f32)) -> bool {
        match &mut self.active {
            Some(Shape::Stroke { points, .. }) => {
                points.push(at);
                true
            }
            Some(Shape::Rect { to, .. }) => {
                *to = at;
                true
            }
            None => false,
        }
    }

    fn finish_gesture(&mut self) -> Option<SurfaceEvent> {
        let shape = self.active.take()?;
        trace!(shapes = self.scene.shapes.len() + 1, "Committing shape");
        self.history.apply(SceneEdit::Push(shape), &mut self.scene);
        self.refresh();
        Some(SurfaceEvent::StrokeFinished)
    }
}

impl DrawingSurface for SceneCanvas {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Scene
    }

    fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<(), CanvasError> {
        let base = crate::decode_png(bytes)?;
        self.size = base.dimensions();
        self.base = Some(base);
        self.ready = true;
        debug!(width = self.size.0, height = self.size.1, "Scene base image loaded");
        self.refresh();
        Ok(())
    }

    fn mark_blank(&mut self) {
        self.ready = true;
        self.refresh();
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.ready.then_some(self.size)
    }

    fn snapshot(&self) -> Result<RgbaImage, CanvasError> {
        if !self.ready {
            return Err(CanvasError::NotReady);
        }
        let mut raster = match &self.base {
            Some(base) => base.clone(),
            None => RgbaImage::new(self.size.0, self.size.1),
        };
        for shape in self.scene.shapes.iter().chain(self.active.iter()) {
            shape.paint(&mut raster);
        }
        Ok(raster)
    }

    fn attach_to_dom(&mut self) -> DomElement {
        let dimensions = self.dimensions();
        self.attachments.attach("scrawl-canvas scrawl-scene", dimensions)
    }

    fn detach_from_dom(&mut self, element: &DomElement) {
        self.attachments.detach(element);
    }

    fn attached_count(&self) -> usize {
        self.attachments.len()
    }

    fn attach_toolbar(&mut self) -> DomElement {
        let rendered = self.render_toolbar();
        self.toolbars.attach(rendered)
    }

    fn detach_toolbar(&mut self, element: &DomElement) {
        self.toolbars.detach(element);
    }

    fn render_toolbar(&self) -> DomElement {
        toolbar::render_full(&self.palette, self.tool, self.color)
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> Option<SurfaceEvent> {
        let dimensions = self.dimensions()?;
        let at = event.to_canvas(dimensions);

        match event.kind {
            PointerKind::Down => {
                self.begin_gesture(at?);
                self.refresh();
                Some(SurfaceEvent::Changed)
            }
            PointerKind::Move => {
                if at.is_some_and(|at| self.extend_gesture(at)) {
                    self.refresh();
                    Some(SurfaceEvent::Changed)
                } else {
                    None
                }
            }
            PointerKind::Up | PointerKind::Leave => self.finish_gesture(),
        }
    }

    fn apply_action(&mut self, action: &ToolbarAction) -> Option<SurfaceEvent> {
        match action {
            ToolbarAction::SelectTool(tool) => {
                self.tool = *tool;
                self.toolbars.refresh(|| self.render_toolbar());
                None
            }
            ToolbarAction::SetColor(color) => {
                self.color = *color;
                self.toolbars.refresh(|| self.render_toolbar());
                None
            }
            ToolbarAction::Undo => {
                self.active = None;
                let undone = self.history.undo(&mut self.scene);
                if undone {
                    self.refresh();
                }
                undone.then_some(SurfaceEvent::Changed)
            }
            ToolbarAction::Redo => {
                let redone = self.history.redo(&mut self.scene);
                if redone {
                    self.refresh();
                }
                redone.then_some(SurfaceEvent::Changed)
            }
            ToolbarAction::Save => Some(SurfaceEvent::SaveRequested),
        }
    }
}
