//! Shared frame buffer written by render workers and read by the display.

use std::sync::atomic::{AtomicU32, Ordering};

/// Packed RGBA shown for pixels that have not been rendered yet.
pub const BACKGROUND_PIXEL: [u8; 4] = [0x1e, 0x1e, 0x1e, 0xff];

/// Pack RGBA bytes into one word. Byte order in memory stays RGBA.
#[inline]
pub fn pack_rgba(rgba: [u8; 4]) -> u32 {
    bytemuck::cast(rgba)
}

#[inline]
pub fn unpack_rgba(pixel: u32) -> [u8; 4] {
    bytemuck::cast(pixel)
}

/// Receives finished or in-progress frames, e.g. a window or an image writer.
pub trait DisplaySink {
    /// `rgba` holds `width * height` row-major pixels, top row first.
    fn present(&mut self, rgba: &[u8], width: u32, height: u32);
}

/// Fixed-size grid of packed pixels.
///
/// Each pixel is an independent atomic so workers can write concurrently
/// while readers take snapshots. A snapshot may mix pixels from before and
/// after a concurrent write, but never a torn pixel.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<AtomicU32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32, fill: [u8; 4]) -> Self {
        let packed = pack_rgba(fill);
        let pixels = (0..width as usize * height as usize)
            .map(|_| AtomicU32::new(packed))
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fill(&self, rgba: [u8; 4]) {
        let packed = pack_rgba(rgba);
        for pixel in &self.pixels {
            pixel.store(packed, Ordering::Relaxed);
        }
    }

    /// Write one pixel. Out-of-range coordinates are ignored.
    pub fn set(&self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx].store(pack_rgba(rgba), Ordering::Relaxed);
    }

    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        Some(unpack_rgba(self.pixels[idx].load(Ordering::Relaxed)))
    }

    /// Copy of all packed pixels.
    pub fn snapshot(&self) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|pixel| pixel.load(Ordering::Relaxed))
            .collect()
    }

    /// Copy of all pixels as RGBA bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.snapshot()).to_vec()
    }
}
