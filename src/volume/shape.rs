//! Shape alignment between raw volumes and the patch definition
//!
//! Raw arrays arrive with whatever rank their source produced. Alignment
//! appends singleton modality axes until the rank matches the patch
//! definition and zero-pads spatial axes that are shorter than the patch
//! window, so every aligned volume admits at least one placement. Voxel
//! values are never rescaled, and surplus axes are left in place for the
//! caller to reject.

use crate::volume::image::Volume;
use ndarray::{ArrayD, Axis, IxDyn, Slice};

/// Padding requirements calculated from the current and required shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingInfo {
    /// Shape after padding
    pub padded_shape: Vec<usize>,
    /// Whether any axis actually grows
    pub needs_padding: bool,
}

/// Calculate the spatial padding needed to fit a patch window
///
/// Only the leading `spatial_rank` axes are compared against `full_shape`;
/// modality axes keep their extent.
pub fn calculate_padding(shape: &[usize], full_shape: &[usize], spatial_rank: usize) -> PaddingInfo {
    let padded_shape: Vec<usize> = shape
        .iter()
        .enumerate()
        .map(|(axis, &extent)| {
            if axis < spatial_rank {
                full_shape
                    .get(axis)
                    .map_or(extent, |&required| extent.max(required))
            } else {
                extent
            }
        })
        .collect();

    let needs_padding = padded_shape != shape;

    PaddingInfo {
        padded_shape,
        needs_padding,
    }
}

/// Zero-pad an array at the far end of each axis
///
/// Returns a copy of the original array unchanged if no axis grows.
pub fn pad_to_shape(data: &ArrayD<f32>, padded_shape: &[usize]) -> ArrayD<f32> {
    if data.shape() == padded_shape {
        return data.clone();
    }

    let original_shape = data.shape().to_vec();
    let mut padded = ArrayD::zeros(IxDyn(padded_shape));
    padded
        .slice_each_axis_mut(|axis| {
            let extent = original_shape.get(axis.axis.index()).copied().unwrap_or(0);
            Slice::from(0..extent.min(axis.len))
        })
        .assign(data);
    padded
}

/// Match a raw array to the rank and minimum extent of a patch definition
///
/// Trailing singleton axes are appended until the array has at least as many
/// axes as `full_shape`, then short spatial axes are zero-padded.
pub fn match_volume_shape_to_patch_definition(
    data: ArrayD<f32>,
    full_shape: &[usize],
    spatial_rank: usize,
) -> ArrayD<f32> {
    let mut data = data;
    while data.ndim() < full_shape.len() {
        let ndim = data.ndim();
        data = data.insert_axis(Axis(ndim));
    }

    let padding = calculate_padding(data.shape(), full_shape, spatial_rank);
    if padding.needs_padding {
        pad_to_shape(&data, &padding.padded_shape)
    } else {
        data
    }
}

/// Declare the session's spatial rank on a volume and align its data
pub fn align(mut volume: Volume, full_shape: &[usize], spatial_rank: usize) -> Volume {
    volume.spatial_rank = spatial_rank;
    volume.data = match_volume_shape_to_patch_definition(volume.data, full_shape, spatial_rank);
    volume
}

/// Align a volume that may be absent
///
/// Absent volumes stay absent.
pub fn align_volume(
    volume: Option<Volume>,
    full_shape: &[usize],
    spatial_rank: usize,
) -> Option<Volume> {
    volume.map(|volume| align(volume, full_shape, spatial_rank))
}
