//! Simulated display and a built-in block font.

use matrix_engine::{Canvas, HardwareConfig, Matrix, MatrixError, MatrixResult, Rect, Rgb, TextWriter};
use tracing::{debug, info};

/// An in-memory display that logs committed frames.
pub struct SimulatedMatrix {
    width: u32,
    height: u32,
    brightness: f32,
    frames: u64,
    closed: bool,
}

impl SimulatedMatrix {
    pub fn new(hardware: &HardwareConfig) -> Self {
        let (width, height) = hardware.geometry();
        info!(
            width,
            height,
            mapping = %hardware.hardware_mapping,
            brightness = hardware.brightness,
            "Simulated matrix created"
        );
        Self {
            width,
            height,
            brightness: hardware.brightness.min(100) as f32 / 100.0,
            frames: 0,
            closed: false,
        }
    }
}

impl Matrix for SimulatedMatrix {
    fn geometry(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn render(&mut self, pixels: &[Rgb]) -> MatrixResult<()> {
        if self.closed {
            return Err(MatrixError::Surface("matrix is closed".to_string()));
        }
        let lit = pixels
            .iter()
            .map(|p| p.dim(self.brightness))
            .filter(|p| *p != Rgb::BLACK)
            .count();
        self.frames += 1;
        debug!(frame = self.frames, lit, "frame committed");
        Ok(())
    }

    fn close(&mut self) -> MatrixResult<()> {
        self.closed = true;
        info!(frames = self.frames, "Simulated matrix closed");
        Ok(())
    }
}

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;

/// 3x5 glyph rows, high bit on the left.
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ' ' => [0; 5],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        _ => [0b111; 5],
    }
}

/// Draws text with a fixed 3x5 block font, centered in the bounds.
#[derive(Debug, Default)]
pub struct BlockTextWriter;

impl TextWriter for BlockTextWriter {
    fn write(&self, canvas: &mut Canvas, bounds: Rect, lines: &[String], color: Rgb) -> anyhow::Result<()> {
        let line_height = GLYPH_HEIGHT + 1;
        let block_height = lines.len() as i32 * line_height - 1;
        let mut y = bounds.min_y + (bounds.height() as i32 - block_height).max(0) / 2;

        for line in lines {
            let chars = line.chars().count() as i32;
            let width = chars * (GLYPH_WIDTH + 1) - 1;
            let mut x = bounds.min_x + (bounds.width() as i32 - width).max(0) / 2;

            for c in line.chars() {
                for (row, bits) in glyph(c).iter().enumerate() {
                    for col in 0..GLYPH_WIDTH {
                        let (px, py) = (x + col, y + row as i32);
                        if bits & (0b100 >> col) != 0 && bounds.contains(px, py) {
                            canvas.set(px, py, color);
                        }
                    }
                }
                x += GLYPH_WIDTH + 1;
            }
            y += line_height;
        }
        Ok(())
    }
}
