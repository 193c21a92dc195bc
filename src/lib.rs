//! Terrain splatmap profile engine.
//!
//! Converts per-layer grayscale weight images into a normalized multi-layer
//! weight field for a terrain blend, after validating that the inputs are
//! well-formed. Re-exports modules for use by binaries and tools.

pub mod apply;
pub mod config;
pub mod export;
pub mod grid;
pub mod image_source;
pub mod layers;
pub mod normalize;
pub mod profile;
pub mod validate;

pub use apply::{apply, InMemoryStore, TerrainStore};
pub use layers::{BufferImage, ConstantImage, LayerDefinition, MaterialParams, WeightImage};
pub use normalize::{normalize, WeightField};
pub use profile::{ApplyError, SplatmapProfile};
pub use validate::{validate, Diagnostic, DiagnosticCategory};
