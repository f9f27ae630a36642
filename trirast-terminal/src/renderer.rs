/// Terminal display for rasterized frames
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Vector3;
use std::io::Write;

/// Character luminosity ramp (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Pick a ramp character for a 0..=255 RGB color
pub fn shade(color: &Vector3<f32>) -> char {
    let luminance = (color.x + color.y + color.z) / (3.0 * 255.0);
    let index = (luminance.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Writes one frame buffer pixel per terminal cell
pub struct AsciiRenderer {
    width: usize,
    height: usize,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Queue the frame as colored characters, one row per line
    ///
    /// `frame` must hold `width * height` pixels, top row first.
    pub fn draw<W: Write>(&self, frame: &[Vector3<f32>], writer: &mut W) -> std::io::Result<()> {
        if self.width == 0 {
            return Ok(());
        }

        for row in frame.chunks(self.width).take(self.height) {
            for pixel in row {
                let c = shade(pixel);
                if c != ' ' {
                    writer.queue(SetForegroundColor(Color::Rgb {
                        r: pixel.x.clamp(0.0, 255.0) as u8,
                        g: pixel.y.clamp(0.0, 255.0) as u8,
                        b: pixel.z.clamp(0.0, 255.0) as u8,
                    }))?;
                }
                writer.queue(Print(c))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}
