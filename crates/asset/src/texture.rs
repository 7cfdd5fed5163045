//! Texture loading and data structures: RGBA8 from PNG/JPEG files.

use std::path::Path;

use anyhow::{Context, Result, ensure};

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Wrap raw RGBA8 pixels; the buffer must hold exactly `width * height` texels.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        ensure!(
            data.len() == expected,
            "RGBA8 {width}x{height} needs {expected} bytes, got {}",
            data.len()
        );
        Ok(Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        })
    }

    /// Load and convert any PNG or JPEG image to RGBA8.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading texture from {:?}", path);

        let img = image::open(path).with_context(|| format!("Failed to open image {:?}", path))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!("Loaded texture {:?} {}x{}", path, width, height);
        Self::new_rgba8(width, height, data)
    }

    /// Number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected = self.width as usize * self.height as usize * self.bytes_per_pixel() as usize;
        self.data.len() == expected && self.width > 0 && self.height > 0
    }
}
