//! Random rotation about the volume centre

use crate::augmentation::AugmentationLayer;
use crate::augmentation::resample::resample_volume;
use crate::io::error::{Result, configuration_error};
use crate::math::affine::AffineMap;
use crate::volume::image::Volume;
use rand::Rng;
use rand::rngs::StdRng;

/// Rotation by uniformly drawn angles
///
/// Two-dimensional volumes rotate in their single plane. Volumes with three
/// or more spatial axes draw one angle per axis of the first three.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomRotation {
    min_angle: f64,
    max_angle: f64,
    angles: [f64; 3],
}

impl RandomRotation {
    /// Create a rotation layer drawing angles in degrees from `[min_angle, max_angle]`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the range is empty or not finite.
    pub fn new(min_angle: f64, max_angle: f64) -> Result<Self> {
        if !min_angle.is_finite() || !max_angle.is_finite() || min_angle > max_angle {
            return Err(configuration_error(
                "rotation",
                &format!("[{min_angle}, {max_angle}]"),
                &"angle range must be finite with min <= max",
            ));
        }
        Ok(Self {
            min_angle,
            max_angle,
            angles: [0.0; 3],
        })
    }

    /// Angles in degrees drawn by the last `randomise`
    pub const fn angles(&self) -> [f64; 3] {
        self.angles
    }

    fn draw_angle(&self, rng: &mut StdRng) -> f64 {
        if self.min_angle < self.max_angle {
            rng.random_range(self.min_angle..=self.max_angle)
        } else {
            self.min_angle
        }
    }
}

impl AugmentationLayer for RandomRotation {
    fn name(&self) -> &'static str {
        "rotation"
    }

    fn randomise(&mut self, spatial_rank: usize, rng: &mut StdRng) {
        self.angles = if spatial_rank >= 3 {
            [
                self.draw_angle(rng),
                self.draw_angle(rng),
                self.draw_angle(rng),
            ]
        } else {
            // In-plane rotation of the first two axes
            [0.0, 0.0, self.draw_angle(rng)]
        };
    }

    fn transform(&self, volume: Volume) -> Volume {
        resample_volume(volume, &AffineMap::rotation(self.angles))
    }

    fn box_clone(&self) -> Box<dyn AugmentationLayer> {
        Box::new(self.clone())
    }
}
