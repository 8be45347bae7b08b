//! Synthetic phantom volumes for demos and benchmarks
//!
//! Each phantom is a cube of background with one sphere per label class
//! painted at a random position. Images carry the class times a fixed
//! contrast plus uniform noise; weight maps double the weight of
//! foreground voxels.

use crate::io::error::{Result, source_error};
use crate::volume::image::{Volume, VolumeSample};
use crate::volume::source::VolumeSource;
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Intensity step between neighbouring label classes
const CLASS_CONTRAST: f32 = 100.0;
/// Upper bound of the additive image noise
const NOISE_LEVEL: f32 = 10.0;

/// Sphere painted with a single label class
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sphere {
    centre: [f64; 3],
    radius: f64,
    class: f32,
}

impl Sphere {
    fn contains(&self, point: [usize; 3]) -> bool {
        let distance_squared: f64 = point
            .iter()
            .zip(self.centre)
            .map(|(&p, c)| (p as f64 - c).powi(2))
            .sum();
        distance_squared <= self.radius * self.radius
    }
}

/// Deterministic source of synthetic volumes
#[derive(Debug, Clone)]
pub struct PhantomSource {
    remaining: usize,
    next_id: usize,
    extent: usize,
    label_classes: usize,
    with_weight_map: bool,
    rng: StdRng,
}

impl PhantomSource {
    /// Create a source of `count` cubes with edge length `extent`
    pub fn new(count: usize, extent: usize, label_classes: usize, seed: u64) -> Self {
        Self {
            remaining: count,
            next_id: 0,
            extent,
            label_classes,
            with_weight_map: true,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose whether samples carry a weight map
    #[must_use]
    pub const fn with_weight_map(mut self, enabled: bool) -> Self {
        self.with_weight_map = enabled;
        self
    }

    /// Volumes left to generate
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Generate one phantom regardless of the remaining count
    pub fn generate(&mut self, volume_id: usize) -> VolumeSample {
        let extent = self.extent;
        let extent_f64 = extent as f64;
        let spheres: Vec<Sphere> = (1..=self.label_classes)
            .map(|class| {
                let radius = self
                    .rng
                    .random_range((extent_f64 / 8.0)..=(extent_f64 / 4.0).max(extent_f64 / 8.0));
                let centre = [(); 3].map(|()| self.rng.random_range(0.0..=extent_f64.max(1.0)));
                Sphere {
                    centre,
                    radius,
                    class: class as f32,
                }
            })
            .collect();

        let label = Array3::from_shape_fn((extent, extent, extent), |(x, y, z)| {
            spheres
                .iter()
                .rev()
                .find(|sphere| sphere.contains([x, y, z]))
                .map_or(0.0, |sphere| sphere.class)
        });

        let rng = &mut self.rng;
        let image = label.mapv(|class| class.mul_add(CLASS_CONTRAST, rng.random_range(0.0..NOISE_LEVEL)));
        let weight_map = label.mapv(|class| if class > 0.0 { 2.0 } else { 1.0 });

        let sample = VolumeSample::new(volume_id, Volume::image(image.into_dyn()))
            .with_label(Volume::label(label.into_dyn()));
        if self.with_weight_map {
            sample.with_weight_map(Volume::weight_map(weight_map.into_dyn()))
        } else {
            sample
        }
    }
}

impl VolumeSource for PhantomSource {
    fn has_next(&self) -> bool {
        self.remaining > 0
    }

    fn next_volume(&mut self) -> Result<VolumeSample> {
        if self.remaining == 0 {
            return Err(source_error(&"phantom source is exhausted"));
        }
        self.remaining -= 1;
        let volume_id = self.next_id;
        self.next_id += 1;
        Ok(self.generate(volume_id))
    }
}
