//! Precondition checks for a layer set.
//!
//! `validate` is the gate in front of the normalizer: an empty diagnostic
//! list means the layer set is eligible for normalization. Each check
//! reports only the first offending index or pixel, so a full validation
//! costs one pass per check.

use crate::layers::{total_intensity, LayerDefinition};

/// What kind of problem a diagnostic reports. Carries the precise location
/// so callers don't have to parse it back out of the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    /// The layer set is empty, or the named layer has no weight image.
    MissingInput { layer: Option<usize> },
    /// Import metadata marks the named layer's weight image non-readable.
    UnreadableAsset { layer: usize },
    /// Every layer is fully transparent at the named pixel.
    CoverageGap { x: usize, z: usize },
}

/// One validation finding, ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub message: String,
}

impl Diagnostic {
    fn empty_layer_set() -> Self {
        Self {
            category: DiagnosticCategory::MissingInput { layer: None },
            message: "No layer definitions.".to_string(),
        }
    }

    fn missing_image(layer: usize) -> Self {
        Self {
            category: DiagnosticCategory::MissingInput { layer: Some(layer) },
            message: format!("Layer {} is missing a weight image.", layer),
        }
    }

    fn unreadable_image(layer: usize) -> Self {
        Self {
            category: DiagnosticCategory::UnreadableAsset { layer },
            message: format!("Layer {} has an unreadable weight image.", layer),
        }
    }

    fn coverage_gap(x: usize, z: usize) -> Self {
        Self {
            category: DiagnosticCategory::CoverageGap { x, z },
            message: format!(
                "Every weight image is fully transparent at ({}, {}). \
                 Update the weight images so that at least one covers this position.",
                x, z
            ),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Check a layer set against the target grid dimensions.
///
/// Checks run in dependency order and short-circuit: a missing image makes
/// the readability and coverage checks meaningless, and an unreadable image
/// makes the coverage check meaningless. Pure; never mutates the layers.
pub fn validate(layers: &[LayerDefinition], width: usize, height: usize) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if layers.is_empty() {
        diagnostics.push(Diagnostic::empty_layer_set());
        return diagnostics;
    }

    if let Some(i) = first_missing_image(layers) {
        diagnostics.push(Diagnostic::missing_image(i));
        return diagnostics;
    }

    if let Some(i) = first_unreadable_image(layers) {
        diagnostics.push(Diagnostic::unreadable_image(i));
        return diagnostics;
    }

    if let Some((x, z)) = first_uncovered_pixel(layers, width, height) {
        diagnostics.push(Diagnostic::coverage_gap(x, z));
    }

    diagnostics
}

/// Index of the first layer without a weight image, if any.
fn first_missing_image(layers: &[LayerDefinition]) -> Option<usize> {
    layers.iter().position(|layer| layer.weight_image.is_none())
}

/// Index of the first layer whose weight image is not readable, if any.
/// Callers must have already established that every layer has an image.
fn first_unreadable_image(layers: &[LayerDefinition]) -> Option<usize> {
    layers.iter().position(|layer| !layer.readable)
}

/// First pixel where the summed intensity of every layer is zero, if any.
///
/// Scans with `x` as the outer loop and `z` as the inner loop so the
/// reported pixel is deterministic. The sum uses the same flipped-row
/// reduction the normalizer divides by.
fn first_uncovered_pixel(
    layers: &[LayerDefinition],
    width: usize,
    height: usize,
) -> Option<(usize, usize)> {
    for x in 0..width {
        for z in 0..height {
            if total_intensity(layers, x, z, height) <= 0.0 {
                return Some((x, z));
            }
        }
    }
    None
}
