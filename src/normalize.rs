//! Weight normalization.
//!
//! Turns per-layer weight images into per-pixel fractional blend weights
//! that sum to 1. The caller must have run `validate` first and seen an
//! empty diagnostic list; `normalize` does not re-validate and assumes
//! every per-pixel intensity total is strictly positive.

use crate::layers::{source_row, total_intensity, LayerDefinition};

/// Dense per-pixel, per-layer fractional blend weights, laid out
/// `[row = z][col = x][layer = i]` to match the terrain store's
/// multi-layer weight call.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightField {
    width: usize,
    height: usize,
    layer_count: usize,
    data: Vec<f32>,
}

impl WeightField {
    fn new(width: usize, height: usize, layer_count: usize) -> Self {
        Self {
            width,
            height,
            layer_count,
            data: vec![0.0; width * height * layer_count],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    fn index(&self, z: usize, x: usize, layer: usize) -> usize {
        debug_assert!(z < self.height && x < self.width && layer < self.layer_count);
        (z * self.width + x) * self.layer_count + layer
    }

    /// Weight of `layer` at output pixel `(x, z)`.
    pub fn get(&self, z: usize, x: usize, layer: usize) -> f32 {
        self.data[self.index(z, x, layer)]
    }

    /// All layer weights at output pixel `(x, z)`, in layer order.
    pub fn pixel(&self, z: usize, x: usize) -> &[f32] {
        let start = self.index(z, x, 0);
        &self.data[start..start + self.layer_count]
    }

    fn set(&mut self, z: usize, x: usize, layer: usize, value: f32) {
        let idx = self.index(z, x, layer);
        self.data[idx] = value;
    }
}

/// Normalize the layer weight images into a weight field.
///
/// For every output pixel, each layer's intensity is divided by the summed
/// intensity of all layers at that pixel. The sum is the same reduction the
/// coverage check scans with, so a clean validation means the divisor is
/// never zero here. Always a full recompute; callers wanting to skip
/// redundant runs memoize at their level.
pub fn normalize(layers: &[LayerDefinition], width: usize, height: usize) -> WeightField {
    // Sum pass: per-pixel intensity totals, used as divisors below.
    let mut totals = vec![0.0f32; width * height];
    for x in 0..width {
        for z in 0..height {
            totals[z * width + x] = total_intensity(layers, x, z, height);
        }
    }

    // Divide pass: each layer's share of its pixel total.
    let mut field = WeightField::new(width, height, layers.len());
    for x in 0..width {
        for z in 0..height {
            let y = source_row(z, height);
            let total = totals[z * width + x];
            for (i, layer) in layers.iter().enumerate() {
                if let Some(image) = layer.weight_image.as_deref() {
                    field.set(z, x, i, image.intensity(x, y) / total);
                }
            }
        }
    }

    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{BufferImage, ConstantImage, MaterialParams};
    use crate::validate::validate;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const TOLERANCE: f32 = 1e-5;

    fn constant_layer(width: usize, height: usize, value: f32) -> LayerDefinition {
        LayerDefinition::new(
            Box::new(ConstantImage::new(width, height, value)),
            MaterialParams::default(),
        )
    }

    fn random_layers(width: usize, height: usize, count: usize, seed: u64) -> Vec<LayerDefinition> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                // Keep intensities strictly positive so coverage holds.
                let values: Vec<f32> = (0..width * height)
                    .map(|_| rng.gen_range(0.05f32..1.0))
                    .collect();
                LayerDefinition::new(
                    Box::new(BufferImage::from_rows(width, height, &values)),
                    MaterialParams::default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_two_constant_layers_split_proportionally() {
        // Layer 0 at 1.0 and layer 1 at 3.0 everywhere: 0.25 / 0.75 splits.
        let layers = vec![constant_layer(2, 2, 1.0), constant_layer(2, 2, 3.0)];
        assert!(validate(&layers, 2, 2).is_empty());

        let field = normalize(&layers, 2, 2);
        assert_eq!(field.layer_count(), 2);
        for z in 0..2 {
            for x in 0..2 {
                assert!((field.get(z, x, 0) - 0.25).abs() < TOLERANCE);
                assert!((field.get(z, x, 1) - 0.75).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn test_weights_sum_to_one_for_random_input() {
        let (width, height) = (7, 5);
        let layers = random_layers(width, height, 4, 0xA11CE);
        assert!(validate(&layers, width, height).is_empty());

        let field = normalize(&layers, width, height);
        for z in 0..height {
            for x in 0..width {
                let sum: f32 = field.pixel(z, x).iter().sum();
                assert!((sum - 1.0).abs() < TOLERANCE, "sum {} at ({}, {})", sum, x, z);
            }
        }
    }

    #[test]
    fn test_normalize_is_idempotent_on_frozen_input() {
        let layers = random_layers(6, 4, 3, 42);
        let first = normalize(&layers, 6, 4);
        let second = normalize(&layers, 6, 4);
        // Bit-identical, not just within tolerance.
        assert_eq!(first, second);
    }

    #[test]
    fn test_permuting_layers_permutes_the_layer_axis() {
        let (width, height) = (4, 4);
        let mut layers = random_layers(width, height, 3, 7);
        let field = normalize(&layers, width, height);

        layers.swap(0, 2);
        let swapped = normalize(&layers, width, height);

        for z in 0..height {
            for x in 0..width {
                assert_eq!(field.get(z, x, 0), swapped.get(z, x, 2));
                assert_eq!(field.get(z, x, 1), swapped.get(z, x, 1));
                assert_eq!(field.get(z, x, 2), swapped.get(z, x, 0));

                let before: f32 = field.pixel(z, x).iter().sum();
                let after: f32 = swapped.pixel(z, x).iter().sum();
                assert!((before - after).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn test_output_rows_are_vertically_flipped_reads() {
        // Source image: top row 1.0, bottom row 0.2 (plus a uniform second
        // layer so every pixel is covered). Output row 0 reads the source
        // bottom row.
        let layers = vec![
            LayerDefinition::new(
                Box::new(BufferImage::from_rows(2, 2, &[1.0, 1.0, 0.2, 0.2])),
                MaterialParams::default(),
            ),
            constant_layer(2, 2, 0.8),
        ];
        let field = normalize(&layers, 2, 2);
        assert!((field.get(0, 0, 0) - 0.2 / 1.0).abs() < TOLERANCE);
        assert!((field.get(1, 0, 0) - 1.0 / 1.8).abs() < TOLERANCE);
    }
}
