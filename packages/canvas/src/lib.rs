//! # Scrawl Canvas
//!
//! Drawing surfaces for embedded drawings.
//!
//! Two surface kinds share the [`DrawingSurface`] contract:
//!
//! - [`RasterCanvas`]: freehand dots painted straight into pixels
//! - [`SceneCanvas`]: brush strokes and rectangles over a base image, with
//!   colors and undo/redo
//!
//! Both persist as plain PNG through [`encode_png`] and [`decode_png`].

mod codec;
mod color;
mod error;
pub mod history;
pub mod paint;
mod raster;
mod scene;
mod surface;
mod toolbar;

pub use codec::{decode_png, encode_png};
pub use color::{default_palette, Color};
pub use error::{CanvasError, Result};
pub use raster::{RasterCanvas, DOT_SIZE};
pub use scene::{Scene, SceneCanvas, SceneEdit, Shape};
pub use surface::{
    build_surface, DrawingSurface, PointerEvent, PointerKind, SurfaceEvent, SurfaceKind, SurfaceOptions,
};
pub use toolbar::{render_full, render_save_only, Tool, ToolbarAction};

pub use image::RgbaImage;
