//! Selective patch sampling from volumetric images
//!
//! The sampler pulls whole volumes (image, optional label, optional weight
//! map), aligns them to a patch definition, applies randomised spatial
//! augmentation identically to all three, searches for patch locations that
//! satisfy a location check under a bounded retry budget, and lazily yields
//! one patch per accepted location.

#![forbid(unsafe_code)]

/// Randomised spatial augmentation layers
pub mod augmentation;
/// Input/output operations, configuration and error handling
pub mod io;
/// Affine maps and voxel interpolation
pub mod math;
/// Location search and sampler orchestration
pub mod sampler;
/// Volumes, shape alignment, patches and volume sources
pub mod volume;

pub use io::error::{Result, SamplerError};
pub use sampler::{SamplerConfig, SamplingSession, SelectiveSampler};
