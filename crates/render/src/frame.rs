//! RGB frame buffer returned by the renderer.

use std::path::Path;

use crate::error::RenderError;

/// Tightly packed RGB8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Allocate a frame filled with the given color.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..width as usize * height as usize {
            pixels.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Write one pixel. Out-of-bounds coordinates are ignored.
    pub fn put(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[idx..idx + 3].copy_from_slice(&color);
    }

    /// Read one pixel, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Encode the frame as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        let img = image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or(RenderError::EmptyFrame)?;
        img.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}
