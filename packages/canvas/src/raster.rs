//! Freehand raster canvas: while the pointer is held, every move paints a
//! small square dot in the ink color directly into the pixel buffer.

use crate::surface::{Attachments, PointerKind, Toolbars};
use crate::{
    paint, toolbar, CanvasError, Color, DrawingSurface, PointerEvent, SurfaceEvent, SurfaceKind,
    SurfaceOptions, ToolbarAction,
};
use image::RgbaImage;
use scrawl_common::DomElement;
use tracing::debug;

/// Side of the painted dot, in canvas pixels
pub const DOT_SIZE: f32 = 2.0;

pub struct RasterCanvas {
    pixels: RgbaImage,
    ready: bool,
    drawing: bool,
    dirty: bool,
    ink: Color,
    attachments: Attachments,
    toolbars: Toolbars,
}

impl RasterCanvas {
    pub fn new(options: &SurfaceOptions) -> Self {
        Self {
            pixels: RgbaImage::new(options.width, options.height),
            ready: false,
            drawing: false,
            dirty: false,
            ink: options.ink,
            attachments: Attachments::default(),
            toolbars: Toolbars::default(),
        }
    }

    pub fn ink(&self) -> Color {
        self.ink
    }

    fn refresh(&mut self) {
        let dimensions = self.dimensions();
        self.attachments.refresh(dimensions);
    }
}

impl DrawingSurface for RasterCanvas {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Raster
    }

    fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<(), CanvasError> {
        self.pixels = crate::decode_png(bytes)?;
        self.ready = true;
        self.drawing = false;
        debug!(width = self.pixels.width(), height = self.pixels.height(), "Raster loaded");
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
        self.ready.then(|| self.pixels.dimensions())
    }

    fn snapshot(&self) -> Result<RgbaImage, CanvasError> {
        if !self.ready {
            return Err(CanvasError::NotReady);
        }
        Ok(self.pixels.clone())
    }

    fn attach_to_dom(&mut self) -> DomElement {
        let dimensions = self.dimensions();
        self.attachments.attach("scrawl-canvas scrawl-raster", dimensions)
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
        toolbar::render_save_only()
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> Option<SurfaceEvent> {
        let dimensions = self.dimensions()?;

        match event.kind {
            PointerKind::Down => {
                self.drawing = true;
                None
            }
            PointerKind::Move if self.drawing => {
                let (x, y) = event.to_canvas(dimensions)?;
                paint::fill_rect(&mut self.pixels, x, y, DOT_SIZE, DOT_SIZE, self.ink);
                self.dirty = true;
                self.refresh();
                Some(SurfaceEvent::Changed)
            }
            PointerKind::Move => None,
            PointerKind::Up | PointerKind::Leave => {
                let finished = self.drawing && self.dirty;
                self.drawing = false;
                self.dirty = false;
                finished.then_some(SurfaceEvent::StrokeFinished)
            }
        }
    }

    fn apply_action(&mut self, action: &ToolbarAction) -> Option<SurfaceEvent> {
        match action {
            ToolbarAction::Save => Some(SurfaceEvent::SaveRequested),
            ToolbarAction::SetColor(color) => {
                self.ink = *color;
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PointerKind::*;
    use image::Rgba;

    fn canvas() -> RasterCanvas {
        RasterCanvas::new(&SurfaceOptions {
            kind: SurfaceKind::Raster,
            width: 100,
            height: 50,
            ..SurfaceOptions::default()
        })
    }

    fn at(kind: PointerKind, x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(kind, x, y, (100.0, 50.0))
    }

    #[test]
    fn test_input_ignored_until_ready() {
        let mut raster = canvas();
        assert_eq!(raster.dimensions(), None);
        assert_eq!(raster.handle_pointer(at(Down, 1.0, 1.0)), None);
        assert!(matches!(raster.render_to_bytes(), Err(CanvasError::NotReady)));
    }

    #[test]
    fn test_drag_paints_white_dots() {
        let mut raster = canvas();
        raster.mark_blank();

        raster.handle_pointer(at(Down, 10.0, 10.0));
        assert_eq!(raster.handle_pointer(at(Move, 10.0, 10.0)), Some(SurfaceEvent::Changed));
        assert_eq!(raster.handle_pointer(at(Up, 10.0, 10.0)), Some(SurfaceEvent::StrokeFinished));

        let pixels = raster.snapshot().unwrap();
        assert_eq!(pixels.get_pixel(10, 10), &Rgba([255, 255, 255, 255]));
        assert_eq!(pixels.get_pixel(11, 11), &Rgba([255, 255, 255, 255]));
        assert_eq!(pixels.get_pixel(12, 12), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_move_without_press_does_not_paint() {
        let mut raster = canvas();
        raster.mark_blank();

        assert_eq!(raster.handle_pointer(at(Move, 5.0, 5.0)), None);
        assert_eq!(raster.handle_pointer(at(Up, 5.0, 5.0)), None);
        assert!(raster.snapshot().unwrap().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_display_scaling() {
        let mut raster = canvas();
        raster.mark_blank();

        raster.handle_pointer(at(Down, 0.0, 0.0));
        raster.handle_pointer(PointerEvent::new(Move, 25.0, 10.0, (50.0, 25.0)));

        assert_eq!(raster.snapshot().unwrap().get_pixel(50, 20)[3], 255);
    }

    #[test]
    fn test_load_adopts_image_size() {
        let mut raster = canvas();
        let bytes = crate::encode_png(&RgbaImage::new(30, 20)).unwrap();

        raster.load_from_bytes(&bytes).unwrap();

        assert_eq!(raster.dimensions(), Some((30, 20)));
        assert_eq!(raster.estimated_height(), Some(20));
    }

    #[test]
    fn test_attached_elements_track_load() {
        let mut raster = canvas();
        let element = raster.attach_to_dom();
        assert_eq!(element.attribute("data-state").as_deref(), Some("loading"));

        raster.mark_blank();
        assert_eq!(element.attribute("width").as_deref(), Some("100"));
        assert_eq!(element.attribute("data-state"), None);
    }
}
