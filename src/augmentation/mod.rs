//! Randomised spatial augmentation applied jointly to image, label and weight map
//!
//! Every layer follows the same lifecycle per volume: `randomise` draws new
//! parameters, then `apply` is called once for each of the three volumes with
//! those same parameters. Layers are cloned into every sampling session, so
//! the drawn parameters never leak between sessions.

/// Shape-preserving affine resampling
pub mod resample;
/// Random rotation layer
pub mod rotation;
/// Random per-axis zoom layer
pub mod scaling;

use crate::io::configuration::{ROTATION_MAX_ANGLE, ROTATION_MIN_ANGLE, SCALING_MAX_PERCENTAGE};
use crate::io::error::{Result, SamplerError, configuration_error};
use crate::volume::image::Volume;
use rand::rngs::StdRng;
use std::fmt;
use std::str::FromStr;

pub use rotation::RandomRotation;
pub use scaling::RandomSpatialScaling;

/// A randomisable spatial transform
pub trait AugmentationLayer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Draw new transform parameters for a volume of the given spatial rank
    fn randomise(&mut self, spatial_rank: usize, rng: &mut StdRng);

    /// Transform a present volume with the current parameters
    fn transform(&self, volume: Volume) -> Volume;

    /// Transform a volume that may be absent
    ///
    /// An absent volume stays absent.
    fn apply(&self, volume: Option<Volume>) -> Option<Volume> {
        volume.map(|volume| self.transform(volume))
    }

    /// Clone into a new boxed layer
    fn box_clone(&self) -> Box<dyn AugmentationLayer>;
}

impl Clone for Box<dyn AugmentationLayer> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

impl fmt::Debug for dyn AugmentationLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AugmentationLayer({})", self.name())
    }
}

/// Built-in augmentation methods selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugmentationMethod {
    /// Rotation by a random angle in `[-10°, 10°]`
    Rotation,
    /// Zoom by a random percentage within ±10 % per axis
    SpatialScaling,
}

impl AugmentationMethod {
    /// Configuration name of the method
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rotation => "rotation",
            Self::SpatialScaling => "spatial_scaling",
        }
    }

    /// Build the layer with its default parameter range
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the default range is rejected by
    /// the layer.
    pub fn build(self) -> Result<Box<dyn AugmentationLayer>> {
        let layer: Box<dyn AugmentationLayer> = match self {
            Self::Rotation => Box::new(RandomRotation::new(ROTATION_MIN_ANGLE, ROTATION_MAX_ANGLE)?),
            Self::SpatialScaling => Box::new(RandomSpatialScaling::new(SCALING_MAX_PERCENTAGE)?),
        };
        Ok(layer)
    }
}

impl fmt::Display for AugmentationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AugmentationMethod {
    type Err = SamplerError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "rotation" => Ok(Self::Rotation),
            "spatial_scaling" => Ok(Self::SpatialScaling),
            other => Err(configuration_error(
                "data_augmentation_methods",
                &other,
                &"unknown data augmentation method; expected 'rotation' or 'spatial_scaling'",
            )),
        }
    }
}

/// Parse method names and build their layers in order
///
/// # Errors
///
/// Returns a configuration error on the first unrecognised name.
pub fn build_layers<S: AsRef<str>>(names: &[S]) -> Result<Vec<Box<dyn AugmentationLayer>>> {
    names
        .iter()
        .map(|name| name.as_ref().parse::<AugmentationMethod>()?.build())
        .collect()
}
