//! Volume data structures and shape handling
//!
//! This module contains volume-related functionality including:
//! - Volumes tagged with spatial rank and interpolation mode
//! - Shape alignment against the patch definition
//! - Patch geometry and window extraction
//! - Volume sources

/// Volumes and volume samples
pub mod image;
/// Patch geometry, locations and patch buffers
pub mod patch;
/// Shape alignment utilities
pub mod shape;
/// Volume source trait and in-memory source
pub mod source;

pub use image::{Interpolation, Volume, VolumeSample};
pub use patch::{Location, Patch, PatchGeometry};
pub use source::{InMemorySource, VolumeSource};
