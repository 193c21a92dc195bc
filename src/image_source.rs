//! File-backed weight images.
//!
//! Weight images on disk are ordinary color images; their grayscale
//! reduction (Rec. 601 luminance) is done once at decode time so every
//! later `intensity` read is a plain lookup.

use std::path::Path;

use crate::grid::Grid;
use crate::layers::WeightImage;

/// Weight image decoded from an image file, reduced to grayscale.
#[derive(Clone, Debug)]
pub struct FileWeightImage {
    intensities: Grid<f32>,
}

impl FileWeightImage {
    /// Decode from RGBA8 pixels, row-major from the top-left.
    pub fn from_rgba8(pixels: &image::RgbaImage) -> Self {
        let mut intensities =
            Grid::new_with(pixels.width() as usize, pixels.height() as usize, 0.0f32);
        for (x, y, value) in intensities.iter_mut() {
            let [r, g, b, _] = pixels.get_pixel(x as u32, y as u32).0;
            *value = luminance(r, g, b);
        }
        Self { intensities }
    }
}

impl WeightImage for FileWeightImage {
    fn width(&self) -> usize {
        self.intensities.width
    }

    fn height(&self) -> usize {
        self.intensities.height
    }

    fn intensity(&self, x: usize, y: usize) -> f32 {
        // Reads past the image edge clamp, as texture sampling does.
        *self.intensities.get(
            x.min(self.intensities.width - 1),
            y.min(self.intensities.height - 1),
        )
    }
}

/// Rec. 601 luminance of an 8-bit RGB pixel, in [0, 1].
fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

/// Load a weight image from disk.
pub fn load_weight_image<P: AsRef<Path>>(path: P) -> Result<FileWeightImage, WeightImageError> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|source| WeightImageError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    Ok(FileWeightImage::from_rgba8(&decoded.to_rgba8()))
}

/// Errors loading a weight image.
#[derive(Debug)]
pub enum WeightImageError {
    /// The file could not be opened or decoded.
    Decode {
        path: String,
        source: image::ImageError,
    },
}

impl std::fmt::Display for WeightImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightImageError::Decode { path, source } => {
                write!(f, "failed to load weight image {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for WeightImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeightImageError::Decode { source, .. } => Some(source),
        }
    }
}
