//! Volume sources feeding the sampler

use crate::io::error::{Result, source_error};
use crate::volume::image::VolumeSample;
use std::collections::VecDeque;

/// Exhaustible supply of volume samples
///
/// The sampler asks `has_next` before every pull and stops as soon as it
/// returns false.
pub trait VolumeSource {
    /// Whether another sample can be pulled
    fn has_next(&self) -> bool;

    /// Pull the next sample
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot produce a sample.
    fn next_volume(&mut self) -> Result<VolumeSample>;
}

impl<S: VolumeSource + ?Sized> VolumeSource for &mut S {
    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next_volume(&mut self) -> Result<VolumeSample> {
        (**self).next_volume()
    }
}

impl<S: VolumeSource + ?Sized> VolumeSource for Box<S> {
    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next_volume(&mut self) -> Result<VolumeSample> {
        (**self).next_volume()
    }
}

/// Source backed by a queue of samples held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    samples: VecDeque<VolumeSample>,
}

impl InMemorySource {
    /// Create a source yielding the given samples in order
    pub fn new(samples: Vec<VolumeSample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    /// Queue another sample
    pub fn push(&mut self, sample: VolumeSample) {
        self.samples.push_back(sample);
    }

    /// Samples not yet pulled
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether every sample has been pulled
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<VolumeSample>> for InMemorySource {
    fn from(samples: Vec<VolumeSample>) -> Self {
        Self::new(samples)
    }
}

impl VolumeSource for InMemorySource {
    fn has_next(&self) -> bool {
        !self.samples.is_empty()
    }

    fn next_volume(&mut self) -> Result<VolumeSample> {
        self.samples
            .pop_front()
            .ok_or_else(|| source_error(&"in-memory source is exhausted"))
    }
}
