//! Rasterization primitives shared by both surface kinds. All coordinates
//! are in canvas pixels; anything outside the raster is clipped.

use crate::Color;
use image::{Pixel, RgbaImage};

/// Fill an axis-aligned rectangle with its top-left corner at `(x, y)`
pub fn fill_rect(raster: &mut RgbaImage, x: f32, y: f32, width: f32, height: f32, color: Color) {
    let (raster_w, raster_h) = raster.dimensions();
    let x0 = x.floor().max(0.0) as u32;
    let y0 = y.floor().max(0.0) as u32;
    let x1 = ((x + width).ceil().max(0.0) as u32).min(raster_w);
    let y1 = ((y + height).ceil().max(0.0) as u32).min(raster_h);

    let source = color.to_rgba();
    for py in y0..y1 {
        for px in x0..x1 {
            if source[3] == 0xff {
                raster.put_pixel(px, py, source);
            } else {
                raster.get_pixel_mut(px, py).blend(&source);
            }
        }
    }
}

/// Square brush stamp centered on `(x, y)`
pub fn stamp(raster: &mut RgbaImage, x: f32, y: f32, size: f32, color: Color) {
    let half = size / 2.0;
    fill_rect(raster, x - half, y - half, size, size, color);
}

/// Thick line made of overlapping stamps no more than a pixel apart
///
/// Only the part of the segment within a brush width of the raster is
/// stamped; segments with non-finite ends are skipped.
pub fn draw_line(raster: &mut RgbaImage, from: (f32, f32), to: (f32, f32), width: f32, color: Color) {
    let (raster_w, raster_h) = raster.dimensions();
    let margin = width.abs().max(1.0);
    let bounds = (-margin, -margin, raster_w as f32 + margin, raster_h as f32 + margin);
    let Some((from, to)) = clip_segment(from, to, bounds) else {
        return;
    };

    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp(raster, from.0 + dx * t, from.1 + dy * t, width, color);
    }
}

/// Liang-Barsky clip of a segment to `(min_x, min_y, max_x, max_y)`
fn clip_segment(
    from: (f32, f32),
    to: (f32, f32),
    (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut enter, mut exit) = (0.0f32, 1.0f32);
    for (p, q) in [
        (-dx, from.0 - min_x),
        (dx, max_x - from.0),
        (-dy, from.1 - min_y),
        (dy, max_y - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                enter = enter.max(r);
            } else {
                exit = exit.min(r);
            }
        }
    }

    (enter <= exit).then(|| {
        (
            (from.0 + dx * enter, from.1 + dy * enter),
            (from.0 + dx * exit, from.1 + dy * exit),
        )
    })
}

/// Outline of the rectangle spanned by two opposite corners
pub fn stroke_rect(raster: &mut RgbaImage, a: (f32, f32), b: (f32, f32), width: f32, color: Color) {
    let corners = [a, (b.0, a.1), b, (a.0, b.1)];
    for i in 0..corners.len() {
        draw_line(raster, corners[i], corners[(i + 1) % corners.len()], width, color);
    }
}
