use image::{DynamicImage, RgbImage, RgbaImage};

/// One captured screen region, RGB, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        Self::new(DynamicImage::ImageRgba8(image).to_rgb8())
    }

    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(RgbImage::new(width, height))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    /// Packs pixels as `0x00RRGGBB`, the layout window buffers expect.
    pub fn to_argb(&self) -> Vec<u32> {
        rgb_bytes_to_argb(self.image.as_raw())
    }
}

pub fn rgb_bytes_to_argb(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(3)
        .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
        .collect()
}
