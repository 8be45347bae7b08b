//! Random per-axis zoom about the volume centre

use crate::augmentation::AugmentationLayer;
use crate::augmentation::resample::resample_volume;
use crate::io::error::{Result, configuration_error};
use crate::math::affine::AffineMap;
use crate::volume::image::Volume;
use rand::Rng;
use rand::rngs::StdRng;

/// Zoom with an independent random factor per spatial axis
///
/// Each factor is `1 + u / 100` with `u` uniform in
/// `[-max_percentage, max_percentage]`. The volume keeps its shape, so
/// zooming out leaves a zero border and zooming in crops the edges.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomSpatialScaling {
    max_percentage: f64,
    factors: [f64; 3],
}

impl RandomSpatialScaling {
    /// Create a scaling layer
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless `0 <= max_percentage < 100`.
    pub fn new(max_percentage: f64) -> Result<Self> {
        if !(0.0..100.0).contains(&max_percentage) {
            return Err(configuration_error(
                "spatial_scaling",
                &max_percentage,
                &"percentage must be in [0, 100)",
            ));
        }
        Ok(Self {
            max_percentage,
            factors: [1.0; 3],
        })
    }

    /// Zoom factors drawn by the last `randomise`
    pub const fn factors(&self) -> [f64; 3] {
        self.factors
    }
}

impl AugmentationLayer for RandomSpatialScaling {
    fn name(&self) -> &'static str {
        "spatial_scaling"
    }

    fn randomise(&mut self, spatial_rank: usize, rng: &mut StdRng) {
        let scaled_axes = spatial_rank.min(3);
        let limit = self.max_percentage;
        for (axis, factor) in self.factors.iter_mut().enumerate() {
            *factor = if axis < scaled_axes && limit > 0.0 {
                1.0 + rng.random_range(-limit..=limit) / 100.0
            } else {
                1.0
            };
        }
    }

    fn transform(&self, volume: Volume) -> Volume {
        resample_volume(volume, &AffineMap::scaling(self.factors))
    }

    fn box_clone(&self) -> Box<dyn AugmentationLayer> {
        Box::new(self.clone())
    }
}
