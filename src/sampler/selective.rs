//! Selective patch sampling with bounded rejection search
//!
//! A `SelectiveSampler` holds immutable templates. Every call to `sample`
//! opens a `SamplingSession` that owns fresh clones of those templates and
//! its own random number generator, then pulls volumes lazily:
//! align, augment, initialise the location check, search for valid
//! locations, and hand out one patch per accepted location.

use crate::augmentation::{AugmentationLayer, build_layers};
use crate::io::configuration::{
    CANDIDATES_PER_PATCH, DEFAULT_AUGMENTATION_METHODS, DEFAULT_PATCH_PER_VOLUME, MAX_TRIALS,
};
use crate::io::error::{ErrorContext, Result, SamplerError, WithContext, configuration_error};
use crate::sampler::coordinates::rand_spatial_coordinates;
use crate::sampler::location_check::{AcceptAll, LocationValidator};
use crate::volume::image::{Volume, VolumeSample};
use crate::volume::patch::{Location, Patch, PatchGeometry};
use crate::volume::shape::{align, align_volume};
use crate::volume::source::VolumeSource;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Construction-time options for a `SelectiveSampler`
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Geometry template of every produced patch
    pub patch: PatchGeometry,
    /// Number of valid locations targeted per volume
    pub patch_per_volume: usize,
    /// Ordered augmentation method names; empty disables augmentation
    pub data_augmentation_methods: Vec<String>,
    /// Location check; `None` accepts every location
    pub spatial_location_check: Option<Box<dyn LocationValidator>>,
    /// Seed for every session; `None` seeds each session from the OS
    pub seed: Option<u64>,
}

impl SamplerConfig {
    /// Default options for the given patch geometry
    ///
    /// One patch per volume, rotation and spatial scaling enabled, no
    /// location check and OS seeding.
    pub fn new(patch: PatchGeometry) -> Self {
        Self {
            patch,
            patch_per_volume: DEFAULT_PATCH_PER_VOLUME,
            data_augmentation_methods: DEFAULT_AUGMENTATION_METHODS
                .iter()
                .map(|&name| name.to_owned())
                .collect(),
            spatial_location_check: None,
            seed: None,
        }
    }

    /// Set the number of locations targeted per volume
    #[must_use]
    pub fn with_patch_per_volume(mut self, patch_per_volume: usize) -> Self {
        self.patch_per_volume = patch_per_volume;
        self
    }

    /// Replace the augmentation methods
    #[must_use]
    pub fn with_augmentation<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_augmentation_methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Disable augmentation
    #[must_use]
    pub fn without_augmentation(mut self) -> Self {
        self.data_augmentation_methods.clear();
        self
    }

    /// Set the location check
    #[must_use]
    pub fn with_location_check(mut self, check: impl LocationValidator + 'static) -> Self {
        self.spatial_location_check = Some(Box::new(check));
        self
    }

    /// Seed every session deterministically
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Locations found for one volume and the work spent finding them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Accepted locations in the order they were drawn
    pub locations: Vec<Location>,
    /// Candidate batches drawn
    pub trials: usize,
    /// Validator calls made
    pub evaluations: usize,
}

/// Bounded rejection search for valid patch locations
///
/// Draws batches of `patch_per_volume * CANDIDATES_PER_PATCH` candidates,
/// evaluates the validator on every candidate of a batch and keeps the
/// accepted ones in draw order. Stops as soon as `patch_per_volume`
/// locations have been collected or after `MAX_TRIALS` batches. A batch may
/// overshoot the target; every accepted location is kept. Finding fewer
/// locations, even none, is not an error.
pub fn select_locations<R: Rng + ?Sized>(
    validator: &dyn LocationValidator,
    spatial_rank: usize,
    volume_shape: &[usize],
    window_shape: &[usize],
    patch_per_volume: usize,
    rng: &mut R,
) -> SelectionOutcome {
    let n_locations_to_check = patch_per_volume * CANDIDATES_PER_PATCH;
    let mut outcome = SelectionOutcome::default();

    while outcome.locations.len() < patch_per_volume && outcome.trials < MAX_TRIALS {
        let candidates = rand_spatial_coordinates(
            spatial_rank,
            volume_shape,
            window_shape,
            n_locations_to_check,
            &mut *rng,
        );

        let mut accepted = 0_usize;
        for candidate in candidates {
            outcome.evaluations += 1;
            if validator.is_valid(&candidate, spatial_rank) {
                outcome.locations.push(candidate);
                accepted += 1;
            }
        }
        outcome.trials += 1;

        debug!(
            "{accepted} good samples from {n_locations_to_check} candidates (trial {})",
            outcome.trials
        );
    }

    outcome
}

/// Running totals for one sampling session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Volumes pulled from the source and fully prepared
    pub volumes: usize,
    /// Patches handed out
    pub patches: usize,
    /// Candidate batches drawn across all volumes
    pub trials: usize,
    /// Validator calls across all volumes
    pub evaluations: usize,
    /// Volumes that yielded fewer than `patch_per_volume` patches
    pub short_volumes: usize,
}

/// Draws patches from volumes at locations accepted by a location check
#[derive(Debug, Clone)]
pub struct SelectiveSampler {
    patch: PatchGeometry,
    data_augmentation_layers: Vec<Box<dyn AugmentationLayer>>,
    spatial_location_check: Box<dyn LocationValidator>,
    patch_per_volume: usize,
    seed: Option<u64>,
}

impl SelectiveSampler {
    /// Build a sampler from its configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `patch_per_volume` is zero or an
    /// augmentation method name is not recognised.
    pub fn new(config: SamplerConfig) -> Result<Self> {
        if config.patch_per_volume == 0 {
            return Err(configuration_error(
                "patch_per_volume",
                &config.patch_per_volume,
                &"must be positive",
            ));
        }

        let data_augmentation_layers = build_layers(config.data_augmentation_methods.as_slice())?;
        let spatial_location_check: Box<dyn LocationValidator> = match config.spatial_location_check {
            Some(check) => check,
            None => Box::new(AcceptAll),
        };

        Ok(Self {
            patch: config.patch,
            data_augmentation_layers,
            spatial_location_check,
            patch_per_volume: config.patch_per_volume,
            seed: config.seed,
        })
    }

    /// Append a custom augmentation layer after the configured ones
    pub fn add_augmentation_layer(&mut self, layer: Box<dyn AugmentationLayer>) {
        self.data_augmentation_layers.push(layer);
    }

    /// Geometry template of produced patches
    pub const fn patch(&self) -> &PatchGeometry {
        &self.patch
    }

    /// Number of valid locations targeted per volume
    pub const fn patch_per_volume(&self) -> usize {
        self.patch_per_volume
    }

    /// Names of the augmentation layers in application order
    pub fn augmentation_names(&self) -> Vec<&'static str> {
        self.data_augmentation_layers
            .iter()
            .map(|layer| layer.name())
            .collect()
    }

    /// Start a sampling session over `volume_loader`
    ///
    /// `batch_size` only has to be positive; it is exposed on the session for
    /// callers that group patches and does not affect sampling.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `batch_size` is zero.
    pub fn sample<S: VolumeSource>(
        &self,
        volume_loader: S,
        batch_size: usize,
    ) -> Result<SamplingSession<S>> {
        let rng = self
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        self.sample_with_rng(volume_loader, batch_size, rng)
    }

    /// Start a sampling session driven by an explicit generator
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `batch_size` is zero.
    pub fn sample_with_rng<S: VolumeSource>(
        &self,
        volume_loader: S,
        batch_size: usize,
        rng: StdRng,
    ) -> Result<SamplingSession<S>> {
        if batch_size == 0 {
            return Err(configuration_error(
                "batch_size",
                &batch_size,
                &"must be positive",
            ));
        }

        Ok(SamplingSession {
            volume_loader,
            spatial_rank: self.patch.spatial_rank(),
            patch_per_volume: self.patch_per_volume,
            batch_size,
            local_layers: self.data_augmentation_layers.clone(),
            spatial_location_check: self.spatial_location_check.clone(),
            patch: Patch::new(self.patch.clone()),
            rng,
            pending: None,
            finished: false,
            stats: SessionStats::default(),
        })
    }
}

/// Prepared volume with the locations still to be emitted
#[derive(Debug)]
struct PendingVolume {
    volume_id: usize,
    image: Volume,
    label: Option<Volume>,
    weight_map: Option<Volume>,
    locations: VecDeque<Location>,
}

/// Lazy stream of patches from one pass over a volume source
///
/// Owns clones of the sampler's templates, so several sessions from one
/// sampler never observe each other's state. After an error or source
/// exhaustion the session yields nothing further.
#[derive(Debug)]
pub struct SamplingSession<S> {
    volume_loader: S,
    spatial_rank: usize,
    patch_per_volume: usize,
    batch_size: usize,
    local_layers: Vec<Box<dyn AugmentationLayer>>,
    spatial_location_check: Box<dyn LocationValidator>,
    patch: Patch,
    rng: StdRng,
    pending: Option<PendingVolume>,
    finished: bool,
    stats: SessionStats,
}

impl<S: VolumeSource> SamplingSession<S> {
    /// Refill the session's patch buffer with the next patch
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error met while preparing a volume; the
    /// session is finished afterwards.
    pub fn next_patch(&mut self) -> Result<Option<&Patch>> {
        if self.advance()? {
            Ok(Some(&self.patch))
        } else {
            Ok(None)
        }
    }

    /// Batch size requested when the session was opened
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Totals accumulated so far
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Whether the session has stopped producing patches
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Move to the next patch, preparing volumes as needed
    fn advance(&mut self) -> Result<bool> {
        loop {
            if let Some(pending) = &mut self.pending {
                if let Some(location) = pending.locations.pop_front() {
                    let written = self.patch.set_data(
                        pending.volume_id,
                        location,
                        &pending.image,
                        pending.label.as_ref(),
                        pending.weight_map.as_ref(),
                    );
                    if let Err(error) = written {
                        self.finish();
                        return Err(error);
                    }
                    self.stats.patches += 1;
                    return Ok(true);
                }
                self.pending = None;
            }

            if self.finished || !self.volume_loader.has_next() {
                self.finish();
                return Ok(false);
            }

            match self.prepare_volume() {
                Ok(pending) => self.pending = Some(pending),
                Err(error) => {
                    self.finish();
                    return Err(error);
                }
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.pending = None;
    }

    /// Pull, align, augment and search one volume
    fn prepare_volume(&mut self) -> Result<PendingVolume> {
        let VolumeSample {
            image,
            label,
            weight_map,
            volume_id,
        } = self.volume_loader.next_volume()?;

        let spatial_rank = self.spatial_rank;
        let geometry = self.patch.geometry();

        // Match every present volume to the patch definition
        let image = align(image, &geometry.full_image_shape(), spatial_rank);
        check_dimensionality(volume_id, &image)?;
        let label = align_volume(label, &geometry.full_label_shape(), spatial_rank);
        let weight_map = align_volume(weight_map, &geometry.full_weight_map_shape(), spatial_rank);
        for volume in label.iter().chain(weight_map.iter()) {
            check_dimensionality(volume_id, volume)?;
            check_extent(volume_id, &image, volume)?;
        }
        warn_channel_mismatch(volume_id, "image", Some(&image), &geometry.full_image_shape());
        warn_channel_mismatch(volume_id, "label", label.as_ref(), &geometry.full_label_shape());
        warn_channel_mismatch(
            volume_id,
            "weight map",
            weight_map.as_ref(),
            &geometry.full_weight_map_shape(),
        );
        let window_shape = geometry.window_shape();

        // Volume-level augmentation with one parameter draw per layer
        let mut image = image;
        let mut label = label;
        let mut weight_map = weight_map;
        for layer in &mut self.local_layers {
            layer.randomise(spatial_rank, &mut self.rng);
            image = layer.transform(image);
            label = layer.apply(label);
            weight_map = layer.apply(weight_map);
        }

        self.spatial_location_check
            .sampling_from(label.as_ref())
            .with_context(ErrorContext {
                volume_id: Some(volume_id),
                ..Default::default()
            })?;

        let outcome = select_locations(
            self.spatial_location_check.as_ref(),
            spatial_rank,
            image.data.shape(),
            &window_shape,
            self.patch_per_volume,
            &mut self.rng,
        );

        self.stats.volumes += 1;
        self.stats.trials += outcome.trials;
        self.stats.evaluations += outcome.evaluations;
        if outcome.locations.len() < self.patch_per_volume {
            self.stats.short_volumes += 1;
            warn!(
                "Volume {volume_id}: only {} of {} valid locations after {} trials",
                outcome.locations.len(),
                self.patch_per_volume,
                outcome.trials
            );
        } else {
            info!(
                "Volume {volume_id}: {} locations after {} trials",
                outcome.locations.len(),
                outcome.trials
            );
        }

        Ok(PendingVolume {
            volume_id,
            image,
            label,
            weight_map,
            locations: outcome.locations.into(),
        })
    }
}

fn check_dimensionality(volume_id: usize, volume: &Volume) -> Result<()> {
    // Time series and other multi-frame data are unsupported
    if volume.non_spatial_ndim() > 1 {
        return Err(SamplerError::Dimensionality {
            volume_id,
            ndim: volume.data.ndim(),
            spatial_rank: volume.spatial_rank,
        });
    }
    Ok(())
}

/// Patches keep the leading channels and zero-fill missing ones
fn warn_channel_mismatch(
    volume_id: usize,
    kind: &str,
    volume: Option<&Volume>,
    full_shape: &[usize],
) {
    let Some(volume) = volume else {
        return;
    };
    let channels = volume.data.shape().get(volume.spatial_rank).copied().unwrap_or(1);
    let expected = full_shape.last().copied().unwrap_or(1);
    if channels != expected {
        warn!("Volume {volume_id}: {kind} has {channels} channels, patches keep {expected}");
    }
}

fn check_extent(volume_id: usize, image: &Volume, other: &Volume) -> Result<()> {
    if image.spatial_shape() != other.spatial_shape() {
        return Err(SamplerError::ShapeMismatch {
            volume_id,
            expected: image.spatial_shape().to_vec(),
            found: other.spatial_shape().to_vec(),
        });
    }
    Ok(())
}

impl<S: VolumeSource> Iterator for SamplingSession<S> {
    type Item = Result<Patch>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(true) => Some(Ok(self.patch.clone())),
            Ok(false) => None,
            Err(error) => Some(Err(error)),
        }
    }
}

impl<S: VolumeSource> FusedIterator for SamplingSession<S> {}
