//! Output surface types.

use bytes::Bytes;

use crate::error::MatrixError;
use crate::MatrixResult;

/// A 24-bit color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `factor` (0.0 - 1.0).
    pub fn dim(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * factor).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// A rectangle in display coordinates. `max` is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Rect {
    /// Create a rectangle from its corners.
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A rectangle at the origin with the given size.
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }
}

/// An immutable block of rendered pixels.
///
/// Pixel data is packed RGB888, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    width: u32,
    height: u32,
    data: Bytes,
}

impl Fragment {
    /// Wrap packed RGB888 data. Returns `None` if the size does not match.
    pub fn new(width: u32, height: u32, data: Bytes) -> Option<Self> {
        if data.len() != Self::buffer_size(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Build a fragment by evaluating `f` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Self {
        let mut data = Vec::with_capacity(Self::buffer_size(width, height));
        for y in 0..height {
            for x in 0..width {
                let c = f(x, y);
                data.extend_from_slice(&[c.r, c.g, c.b]);
            }
        }
        Self {
            width,
            height,
            data: Bytes::from(data),
        }
    }

    /// A fragment of a single color.
    pub fn solid(width: u32, height: u32, color: Rgb) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    /// Expected buffer size for the given dimensions.
    pub fn buffer_size(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Color at `(x, y)`, if inside the fragment.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }
}

/// A physical or simulated display.
pub trait Matrix: Send {
    /// Display size as `(width, height)`.
    fn geometry(&self) -> (u32, u32);

    /// Show a full frame. `pixels` is row-major with `width * height` entries.
    fn render(&mut self, pixels: &[Rgb]) -> MatrixResult<()>;

    /// Release the display.
    fn close(&mut self) -> MatrixResult<()>;
}

/// Text rendering primitive supplied by the process.
pub trait TextWriter: Send + Sync {
    /// Write `lines` top to bottom inside `bounds`.
    fn write(&self, canvas: &mut Canvas, bounds: Rect, lines: &[String], color: Rgb)
        -> anyhow::Result<()>;
}

/// A drawable frame buffer bound to a display.
pub struct Canvas {
    bounds: Rect,
    pixels: Vec<Rgb>,
    matrix: Box<dyn Matrix>,
}

impl Canvas {
    /// Create a canvas for `matrix`. Geometry is queried once.
    pub fn new(matrix: Box<dyn Matrix>) -> MatrixResult<Self> {
        let (width, height) = matrix.geometry();
        if width == 0 || height == 0 {
            return Err(MatrixError::Surface(format!(
                "invalid matrix geometry {}x{}",
                width, height
            )));
        }
        Ok(Self {
            bounds: Rect::sized(width, height),
            pixels: vec![Rgb::BLACK; width as usize * height as usize],
            matrix,
        })
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.bounds
            .contains(x, y)
            .then(|| y as usize * self.bounds.width() as usize + x as usize)
    }

    /// Set a pixel. Out of bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Get a pixel.
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Fill the whole canvas.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Reset to black.
    pub fn clear(&mut self) {
        self.fill(Rgb::BLACK);
    }

    /// Draw a fragment with its top-left corner at `(x, y)`, clipped.
    pub fn draw(&mut self, fragment: &Fragment, x: i32, y: i32) {
        for fy in 0..fragment.height() {
            for fx in 0..fragment.width() {
                if let Some(color) = fragment.pixel(fx, fy) {
                    self.set(x + fx as i32, y + fy as i32, color);
                }
            }
        }
    }

    /// Push the current frame to the display.
    pub fn commit(&mut self) -> MatrixResult<()> {
        self.matrix.render(&self.pixels)
    }

    /// Release the underlying display.
    pub fn close(&mut self) -> MatrixResult<()> {
        self.matrix.close()
    }
}
