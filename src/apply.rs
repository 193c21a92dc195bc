//! Boundary between the engine and the external terrain data store.
//!
//! `apply` performs one replace-all write: per-layer material descriptors
//! first, then the weight field. It does no validation; the caller gates it
//! on an empty diagnostic list. Atomicity is whatever the store guarantees.

use crate::layers::{LayerDefinition, MaterialParams};
use crate::normalize::WeightField;

/// External terrain data store: the consumer of layer materials and
/// normalized weights. Implementations convert `MaterialParams` to their
/// native prototype structure as needed.
pub trait TerrainStore {
    /// Resolution of the store's weight grid, `(width, height)`.
    fn alphamap_resolution(&self) -> (usize, usize);

    /// Replace all layer material descriptors.
    fn set_layer_materials(&mut self, materials: &[MaterialParams]);

    /// Replace the full multi-layer weight grid.
    fn set_weights(&mut self, field: &WeightField);
}

/// Write the layers' materials and the weight field into the store,
/// replacing all prior layer and weight content.
pub fn apply(layers: &[LayerDefinition], field: &WeightField, store: &mut dyn TerrainStore) {
    let materials: Vec<MaterialParams> =
        layers.iter().map(|layer| layer.material.clone()).collect();
    store.set_layer_materials(&materials);
    store.set_weights(field);
}

/// Terrain store backed by plain memory, for tests and tooling.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    pub width: usize,
    pub height: usize,
    pub materials: Vec<MaterialParams>,
    pub weights: Option<WeightField>,
}

impl InMemoryStore {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            materials: Vec::new(),
            weights: None,
        }
    }
}

impl TerrainStore for InMemoryStore {
    fn alphamap_resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_layer_materials(&mut self, materials: &[MaterialParams]) {
        self.materials = materials.to_vec();
    }

    fn set_weights(&mut self, field: &WeightField) {
        self.weights = Some(field.clone());
    }
}
