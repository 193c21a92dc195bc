//! Preview export for normalized weight fields.

use std::path::{Path, PathBuf};

use image::{GrayImage, ImageBuffer, Luma};

use crate::normalize::WeightField;

/// Export one layer of a weight field as an 8-bit grayscale PNG.
/// Weights are expected to be normalized (0.0-1.0).
pub fn export_weight_layer(
    field: &WeightField,
    layer: usize,
    path: &Path,
) -> Result<(), image::ImageError> {
    let mut img: GrayImage = ImageBuffer::new(field.width() as u32, field.height() as u32);

    for z in 0..field.height() {
        for x in 0..field.width() {
            let weight = field.get(z, x, layer).clamp(0.0, 1.0);
            img.put_pixel(x as u32, z as u32, Luma([(weight * 255.0) as u8]));
        }
    }

    img.save(path)
}

/// Export every layer of a weight field into `dir` as `layer_<i>.png`.
/// Returns the written paths in layer order.
pub fn export_layer_previews(
    field: &WeightField,
    dir: &Path,
) -> Result<Vec<PathBuf>, image::ImageError> {
    let mut paths = Vec::with_capacity(field.layer_count());
    for layer in 0..field.layer_count() {
        let path = dir.join(format!("layer_{}.png", layer));
        export_weight_layer(field, layer, &path)?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{ConstantImage, LayerDefinition, MaterialParams};
    use crate::normalize::normalize;

    #[test]
    fn test_export_writes_one_png_per_layer() {
        let layers = vec![
            LayerDefinition::new(
                Box::new(ConstantImage::new(4, 4, 1.0)),
                MaterialParams::default(),
            ),
            LayerDefinition::new(
                Box::new(ConstantImage::new(4, 4, 3.0)),
                MaterialParams::default(),
            ),
        ];
        let field = normalize(&layers, 4, 4);

        let dir = tempfile::tempdir().unwrap();
        let paths = export_layer_previews(&field, dir.path()).unwrap();
        assert_eq!(paths.len(), 2);

        // Layer 1 holds 0.75 everywhere; the preview should read it back.
        let img = image::open(&paths[1]).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(img.get_pixel(2, 2).0[0], (0.75f32 * 255.0) as u8);
    }
}
