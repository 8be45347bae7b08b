//! Validity predicates for candidate patch locations
//!
//! A validator is initialised once per volume from the (augmented) label and
//! then queried for every candidate drawn for that volume. Sessions own a
//! private clone, so per-volume state never crosses sessions.

use crate::io::error::{Result, SamplerError};
use crate::sampler::label_set::LabelSet;
use crate::volume::image::Volume;
use crate::volume::patch::Location;
use ndarray::{ArrayD, Slice};
use num_traits::ToPrimitive;
use std::collections::BTreeSet;
use std::fmt;

/// Stateful predicate deciding whether a candidate location is acceptable
pub trait LocationValidator: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Re-initialise from the label of the volume about to be sampled
    ///
    /// # Errors
    ///
    /// Returns an error if the validator cannot work with the given label,
    /// for example because it needs one and none is present.
    fn sampling_from(&mut self, label: Option<&Volume>) -> Result<()>;

    /// Whether a window with its lower corner at `location` is acceptable
    fn is_valid(&self, location: &Location, spatial_rank: usize) -> bool;

    /// Clone into a new boxed validator
    fn box_clone(&self) -> Box<dyn LocationValidator>;
}

impl Clone for Box<dyn LocationValidator> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

impl fmt::Debug for dyn LocationValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationValidator({})", self.name())
    }
}

/// Validator accepting every location, usable without labels
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl LocationValidator for AcceptAll {
    fn name(&self) -> &'static str {
        "accept_all"
    }

    fn sampling_from(&mut self, _label: Option<&Volume>) -> Result<()> {
        Ok(())
    }

    fn is_valid(&self, _location: &Location, _spatial_rank: usize) -> bool {
        true
    }

    fn box_clone(&self) -> Box<dyn LocationValidator> {
        Box::new(*self)
    }
}

/// Label-driven check on the classes inside a patch window
///
/// A window passes when it contains at least `min_distinct_labels` classes,
/// every compulsory class, and a foreground (non-zero class) fraction of at
/// least `minimum_ratio`. Label values are rounded to the nearest class;
/// negative and non-finite values count towards the window size only.
///
/// Window sets are indexed by a class's position among the label's distinct
/// classes, so their size never depends on the class values themselves.
#[derive(Debug, Clone)]
pub struct SpatialLocationCheck {
    window_size: usize,
    min_distinct_labels: usize,
    compulsory_labels: Vec<usize>,
    minimum_ratio: f32,
    label: Option<ArrayD<f32>>,
    classes: Vec<usize>,
    // Positions of the compulsory classes; `None` when one is absent
    compulsory_slots: Option<Vec<usize>>,
}

impl SpatialLocationCheck {
    /// Create a check for cubic windows of the given edge length
    ///
    /// By default any non-empty window passes.
    pub const fn new(window_size: usize) -> Self {
        Self {
            window_size,
            min_distinct_labels: 1,
            compulsory_labels: Vec::new(),
            minimum_ratio: 0.0,
            label: None,
            classes: Vec::new(),
            compulsory_slots: None,
        }
    }

    /// Require at least `count` distinct classes per window
    #[must_use]
    pub fn with_min_distinct_labels(mut self, count: usize) -> Self {
        self.min_distinct_labels = count;
        self
    }

    /// Require every listed class to appear in the window
    #[must_use]
    pub fn with_compulsory_labels(mut self, classes: Vec<usize>) -> Self {
        self.compulsory_labels = classes;
        self
    }

    /// Require this fraction of foreground voxels, clamped to `[0, 1]`
    #[must_use]
    pub fn with_minimum_ratio(mut self, ratio: f32) -> Self {
        self.minimum_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Edge length of the inspected window
    pub const fn window_size(&self) -> usize {
        self.window_size
    }
}

fn class_of(value: f32) -> Option<usize> {
    if value.is_finite() && value >= 0.0 {
        value.round().to_usize()
    } else {
        None
    }
}

impl LocationValidator for SpatialLocationCheck {
    fn name(&self) -> &'static str {
        "spatial_location_check"
    }

    fn sampling_from(&mut self, label: Option<&Volume>) -> Result<()> {
        let Some(label) = label else {
            self.label = None;
            self.classes.clear();
            self.compulsory_slots = None;
            // The sampler fills in the volume identifier
            return Err(SamplerError::MissingLabel { volume_id: 0 });
        };

        let distinct: BTreeSet<usize> = label
            .data
            .iter()
            .filter_map(|&value| class_of(value))
            .collect();
        self.classes = distinct.into_iter().collect();
        self.compulsory_slots = self
            .compulsory_labels
            .iter()
            .map(|class| self.classes.binary_search(class).ok())
            .collect();
        self.label = Some(label.data.clone());
        Ok(())
    }

    fn is_valid(&self, location: &Location, spatial_rank: usize) -> bool {
        let (Some(label), Some(compulsory)) = (&self.label, &self.compulsory_slots) else {
            return false;
        };

        let window = label.slice_each_axis(|axis| {
            let index = axis.axis.index();
            if index < spatial_rank {
                let start = location
                    .coordinates()
                    .get(index)
                    .copied()
                    .unwrap_or(0)
                    .min(axis.len);
                Slice::from(start..(start + self.window_size).min(axis.len))
            } else {
                Slice::from(..)
            }
        });

        let mut present = LabelSet::new(self.classes.len());
        let mut foreground = 0_usize;
        let mut total = 0_usize;
        for &value in &window {
            total += 1;
            if let Some(class) = class_of(value) {
                if let Ok(slot) = self.classes.binary_search(&class) {
                    present.insert(slot);
                }
                if class != 0 {
                    foreground += 1;
                }
            }
        }

        total > 0
            && present.count() >= self.min_distinct_labels
            && present.contains_all(compulsory)
            && foreground as f32 / total as f32 >= self.minimum_ratio
    }

    fn box_clone(&self) -> Box<dyn LocationValidator> {
        Box::new(self.clone())
    }
}
