//! Layer data model shared by the validator, normalizer, and applier.
//!
//! A splatmap profile is an ordered list of layer definitions. Order is
//! significant: it fixes each layer's index in the output weight field and
//! its visual stacking order.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Read-only grayscale weight image. Intensities are in [0, 1].
///
/// Pixel data is externally owned and must stay unmutated for the duration
/// of a validate/normalize/apply sequence.
pub trait WeightImage {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn intensity(&self, x: usize, y: usize) -> f32;
}

/// Weight image with the same intensity everywhere.
#[derive(Clone, Copy, Debug)]
pub struct ConstantImage {
    pub width: usize,
    pub height: usize,
    pub value: f32,
}

impl ConstantImage {
    pub fn new(width: usize, height: usize, value: f32) -> Self {
        Self { width, height, value }
    }
}

impl WeightImage for ConstantImage {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn intensity(&self, _x: usize, _y: usize) -> f32 {
        self.value
    }
}

/// Weight image backed by an in-memory grid of intensities.
#[derive(Clone, Debug)]
pub struct BufferImage {
    grid: Grid<f32>,
}

impl BufferImage {
    pub fn new(grid: Grid<f32>) -> Self {
        Self { grid }
    }

    /// Build from a row-major slice of intensities.
    pub fn from_rows(width: usize, height: usize, values: &[f32]) -> Self {
        assert_eq!(values.len(), width * height);
        let mut grid = Grid::new_with(width, height, 0.0f32);
        for (idx, &v) in values.iter().enumerate() {
            grid.set(idx % width, idx / width, v);
        }
        Self { grid }
    }
}

impl WeightImage for BufferImage {
    fn width(&self) -> usize {
        self.grid.width
    }

    fn height(&self) -> usize {
        self.grid.height
    }

    fn intensity(&self, x: usize, y: usize) -> f32 {
        // Reads past the image edge clamp, as texture sampling does.
        *self
            .grid
            .get(x.min(self.grid.width - 1), y.min(self.grid.height - 1))
    }
}

/// Per-layer material descriptor handed through to the terrain store.
///
/// Plain value type; converting to whatever native prototype structure a
/// store uses is the store's business.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    /// Albedo texture reference (path or asset id).
    pub albedo: String,

    /// Optional normal map reference.
    pub normal_map: Option<String>,

    /// Tiling size in world units.
    pub tile_size: [f32; 2],

    /// Tiling offset in world units.
    pub tile_offset: [f32; 2],

    /// Metallic factor in [0, 1].
    pub metallic: f32,

    /// Smoothness factor in [0, 1].
    pub smoothness: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            albedo: String::new(),
            normal_map: None,
            // Default tiling matches the terrain editor's texture settings.
            tile_size: [15.0, 15.0],
            tile_offset: [0.0, 0.0],
            metallic: 0.0,
            smoothness: 0.0,
        }
    }
}

/// One blend layer: a weight image (possibly absent while authoring),
/// its readability flag from import metadata, and material parameters.
pub struct LayerDefinition {
    pub weight_image: Option<Box<dyn WeightImage>>,
    pub readable: bool,
    pub material: MaterialParams,
}

impl LayerDefinition {
    pub fn new(weight_image: Box<dyn WeightImage>, material: MaterialParams) -> Self {
        Self {
            weight_image: Some(weight_image),
            readable: true,
            material,
        }
    }

    /// Layer with no weight image assigned yet.
    pub fn without_image(material: MaterialParams) -> Self {
        Self {
            weight_image: None,
            readable: false,
            material,
        }
    }

    pub fn with_readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }
}

/// Source row for output row `z`. Weight images are authored top-down while
/// the terrain store addresses rows bottom-up, so reads are vertically
/// flipped. The coverage scan and the normalizer both go through this
/// helper, so they always agree on which source row maps to which output row.
pub(crate) fn source_row(z: usize, height: usize) -> usize {
    height - 1 - z
}

/// Summed intensity of every layer at output pixel `(x, z)`.
///
/// This is the single reduction both the coverage check and the normalizer
/// use; the coverage check passing guarantees the normalizer's divisor is
/// strictly positive.
pub(crate) fn total_intensity(layers: &[LayerDefinition], x: usize, z: usize, height: usize) -> f32 {
    let y = source_row(z, height);
    layers
        .iter()
        .filter_map(|layer| layer.weight_image.as_deref())
        .map(|image| image.intensity(x, y))
        .sum()
}
