use image::{ImageBuffer, Rgb, RgbImage};

/// RGB drawing surface for a transition card
///
/// Wraps an image buffer and adds the handful of primitives cards need:
/// ring outlines, rectangle outlines and coverage-blended glyph pixels.
/// Coordinates outside the surface are clipped silently.
#[derive(Clone, Debug)]
pub struct Canvas {
    buffer: RgbImage,
}

impl Canvas {
    /// Create a new canvas with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
        Self { buffer }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64
    }

    /// Set a pixel, ignoring out-of-bounds coordinates
    pub fn put(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if self.contains(x, y) {
            self.buffer.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }

    /// Blend `color` over the existing pixel with `coverage` in 0..=255
    pub fn blend(&mut self, x: i64, y: i64, color: [u8; 3], coverage: u8) {
        if coverage == 0 || !self.contains(x, y) {
            return;
        }

        let alpha = coverage as f32 / 255.0;
        let pixel = self.buffer.get_pixel_mut(x as u32, y as u32);
        for channel in 0..3 {
            let under = pixel[channel] as f32;
            pixel[channel] = (under * (1.0 - alpha) + color[channel] as f32 * alpha).round() as u8;
        }
    }

    /// Draw a circle outline whose stroke grows inward from `radius`
    pub fn draw_ring(&mut self, cx: f32, cy: f32, radius: f32, stroke: f32, color: [u8; 3]) {
        let inner = (radius - stroke).max(0.0);
        let x0 = (cx - radius).floor() as i64;
        let x1 = (cx + radius).ceil() as i64;
        let y0 = (cy - radius).floor() as i64;
        let y1 = (cy + radius).ceil() as i64;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance <= radius && distance >= inner {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Draw a rectangle outline; corners are inclusive and the stroke grows inward
    pub fn draw_rect_outline(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, stroke: i64, color: [u8; 3]) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                let on_edge = x - x0 < stroke || x1 - x < stroke || y - y0 < stroke || y1 - y < stroke;
                if on_edge {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Save the canvas as a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save_with_format(path, image::ImageFormat::Png)
    }
}
