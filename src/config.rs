//! Profile descriptions on disk.
//!
//! A profile file is a JSON document listing layers by weight-image path
//! plus material parameters. Loading one resolves the image paths into
//! decoded weight images and yields a ready-to-validate profile.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::image_source::{load_weight_image, WeightImageError};
use crate::layers::{LayerDefinition, MaterialParams};
use crate::profile::SplatmapProfile;

/// One layer as described in a profile file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Path to the grayscale weight image, relative to the profile file.
    pub weight_image: PathBuf,

    /// Material parameters for this layer.
    #[serde(default)]
    pub material: MaterialParams,
}

/// A profile file: an ordered list of layer descriptions.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub layers: Vec<LayerConfig>,
}

impl ProfileConfig {
    /// Read and parse a profile file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ProfileConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Resolve weight-image paths against `base_dir` and decode them into
    /// a profile. Layer order is preserved.
    pub fn into_profile(self, base_dir: &Path) -> Result<SplatmapProfile, ProfileConfigError> {
        let mut profile = SplatmapProfile::new();
        for layer in self.layers {
            let path = base_dir.join(&layer.weight_image);
            let image = load_weight_image(&path)?;
            profile.push_layer(LayerDefinition::new(Box::new(image), layer.material));
        }
        Ok(profile)
    }
}

/// Errors reading a profile file.
#[derive(Debug)]
pub enum ProfileConfigError {
    /// The profile file could not be read.
    Io(std::io::Error),
    /// The profile file is not valid JSON.
    Parse(serde_json::Error),
    /// A referenced weight image could not be loaded.
    Image(WeightImageError),
}

impl std::fmt::Display for ProfileConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileConfigError::Io(e) => write!(f, "failed to read profile: {}", e),
            ProfileConfigError::Parse(e) => write!(f, "failed to parse profile: {}", e),
            ProfileConfigError::Image(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProfileConfigError {}

impl From<std::io::Error> for ProfileConfigError {
    fn from(e: std::io::Error) -> Self {
        ProfileConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ProfileConfigError {
    fn from(e: serde_json::Error) -> Self {
        ProfileConfigError::Parse(e)
    }
}

impl From<WeightImageError> for ProfileConfigError {
    fn from(e: WeightImageError) -> Self {
        ProfileConfigError::Image(e)
    }
}
