//! Profile orchestration: owns the layer list and drives the
//! validate -> normalize -> apply sequence as one gated call.
//!
//! The full-coverage check is expensive (it reads every pixel of every
//! layer), so validation results are memoized against a revision counter
//! that every mutation bumps. The layers must be treated as a frozen
//! snapshot for the duration of one `apply_to` call.

use crate::apply::{apply, TerrainStore};
use crate::layers::LayerDefinition;
use crate::normalize::normalize;
use crate::validate::{validate, Diagnostic};

/// An ordered set of blend layers plus memoized validation state.
#[derive(Default)]
pub struct SplatmapProfile {
    layers: Vec<LayerDefinition>,
    revision: u64,
    cached: Option<CachedValidation>,
}

impl std::fmt::Debug for SplatmapProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplatmapProfile")
            .field("layer_count", &self.layers.len())
            .field("revision", &self.revision)
            .finish()
    }
}

struct CachedValidation {
    revision: u64,
    width: usize,
    height: usize,
    diagnostics: Vec<Diagnostic>,
}

impl SplatmapProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[LayerDefinition] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Monotonic content token; bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn push_layer(&mut self, layer: LayerDefinition) {
        self.layers.push(layer);
        self.touch();
    }

    pub fn remove_layer(&mut self, index: usize) -> LayerDefinition {
        let layer = self.layers.remove(index);
        self.touch();
        layer
    }

    /// Mutable access to a layer. Counts as a mutation whether or not the
    /// caller ends up changing anything.
    pub fn layer_mut(&mut self, index: usize) -> &mut LayerDefinition {
        self.touch();
        &mut self.layers[index]
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.cached = None;
    }

    /// Validate against the target dimensions, reusing the memoized result
    /// when neither the layers nor the dimensions have changed.
    pub fn diagnostics(&mut self, width: usize, height: usize) -> &[Diagnostic] {
        let stale = !matches!(
            &self.cached,
            Some(c) if c.revision == self.revision && c.width == width && c.height == height
        );
        if stale {
            self.cached = Some(CachedValidation {
                revision: self.revision,
                width,
                height,
                diagnostics: validate(&self.layers, width, height),
            });
        }
        match &self.cached {
            Some(cached) => &cached.diagnostics,
            None => &[],
        }
    }

    pub fn can_apply(&mut self, width: usize, height: usize) -> bool {
        self.diagnostics(width, height).is_empty()
    }

    /// Run the full validate -> normalize -> apply sequence against the
    /// store. Refuses to touch the store when validation finds anything;
    /// there is no partial apply.
    pub fn apply_to(&mut self, store: &mut dyn TerrainStore) -> Result<(), ApplyError> {
        let (width, height) = store.alphamap_resolution();
        let diagnostics = self.diagnostics(width, height);
        if !diagnostics.is_empty() {
            return Err(ApplyError::Rejected(diagnostics.to_vec()));
        }

        let field = normalize(&self.layers, width, height);
        apply(&self.layers, &field, store);
        Ok(())
    }
}

/// Errors from a gated apply.
#[derive(Debug)]
pub enum ApplyError {
    /// Validation found problems; nothing was written to the store.
    Rejected(Vec<Diagnostic>),
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyError::Rejected(diagnostics) => {
                write!(f, "profile cannot be applied ({} problem", diagnostics.len())?;
                if diagnostics.len() != 1 {
                    write!(f, "s")?;
                }
                write!(f, ")")?;
                for d in diagnostics {
                    write!(f, "\n  {}", d)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ApplyError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::InMemoryStore;
    use crate::layers::{BufferImage, ConstantImage, LayerDefinition, MaterialParams};
    use crate::validate::DiagnosticCategory;

    fn constant_layer(value: f32) -> LayerDefinition {
        LayerDefinition::new(
            Box::new(ConstantImage::new(2, 2, value)),
            MaterialParams::default(),
        )
    }

    #[test]
    fn test_apply_to_writes_store_on_clean_input() {
        let mut profile = SplatmapProfile::new();
        profile.push_layer(constant_layer(1.0));
        profile.push_layer(constant_layer(3.0));

        let mut store = InMemoryStore::new(2, 2);
        profile.apply_to(&mut store).unwrap();

        let weights = store.weights.as_ref().unwrap();
        assert!((weights.get(1, 1, 0) - 0.25).abs() < 1e-5);
        assert!((weights.get(1, 1, 1) - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_apply_to_rejects_without_touching_store() {
        // Single layer with a hole at output pixel (0, 0): source row 1 of
        // a 2-row image holds output row 0.
        let mut profile = SplatmapProfile::new();
        profile.push_layer(LayerDefinition::new(
            Box::new(BufferImage::from_rows(2, 2, &[1.0, 1.0, 0.0, 1.0])),
            MaterialParams::default(),
        ));

        let mut store = InMemoryStore::new(2, 2);
        let err = profile.apply_to(&mut store).unwrap_err();
        let ApplyError::Rejected(diagnostics) = err;
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].category,
            DiagnosticCategory::CoverageGap { x: 0, z: 0 }
        );
        assert!(store.weights.is_none());
        assert!(store.materials.is_empty());
    }

    #[test]
    fn test_diagnostics_are_memoized_until_mutation() {
        let mut profile = SplatmapProfile::new();
        let rev = profile.revision();

        assert!(!profile.can_apply(2, 2)); // empty set
        assert!(!profile.can_apply(2, 2));
        assert_eq!(profile.revision(), rev);

        profile.push_layer(constant_layer(1.0));
        assert!(profile.revision() > rev);
        assert!(profile.can_apply(2, 2));
    }

    #[test]
    fn test_dimension_change_invalidates_cache() {
        let mut profile = SplatmapProfile::new();
        profile.push_layer(constant_layer(1.0));

        assert!(profile.can_apply(2, 2));
        // Same revision, different target: must re-run, not reuse.
        assert!(profile.can_apply(8, 8));
    }

    #[test]
    fn test_layer_mut_invalidates_cache() {
        let mut profile = SplatmapProfile::new();
        profile.push_layer(constant_layer(1.0));
        assert!(profile.can_apply(2, 2));

        profile.layer_mut(0).readable = false;
        assert!(!profile.can_apply(2, 2));
        assert_eq!(
            profile.diagnostics(2, 2)[0].category,
            DiagnosticCategory::UnreadableAsset { layer: 0 }
        );
    }
}
