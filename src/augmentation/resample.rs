//! Shape-preserving affine resampling of volumes
//!
//! The first two or three spatial axes are resampled about the volume
//! centre. Any further spatial axes and all modality axes are carried along
//! unchanged, so image, label and weight map volumes with the same spatial
//! extent stay aligned after the same map is applied to each.

use crate::math::affine::AffineMap;
use crate::math::interpolation::VoxelGrid;
use crate::volume::image::{Interpolation, Volume};
use ndarray::{ArrayD, IxDyn};

/// Resample a volume through `map`, keeping its shape
///
/// Voxels mapped from outside the volume become zero. Volumes with fewer
/// than two spatial axes, and identity maps, are returned untouched.
pub fn resample_volume(volume: Volume, map: &AffineMap) -> Volume {
    if map.is_identity() {
        return volume;
    }

    let shape = volume.data.shape().to_vec();
    let plane_axes = volume.spatial_rank.min(3).min(shape.len());
    if plane_axes < 2 {
        return volume;
    }

    let mut dims = [1_usize; 3];
    for (dim, &extent) in dims.iter_mut().zip(&shape) {
        *dim = extent;
    }
    if plane_axes == 2 {
        dims[2] = 1;
    }
    let channels: usize = shape.iter().skip(plane_axes).product();

    let values: Vec<f32> = volume.data.iter().copied().collect();
    let Some(grid) = VoxelGrid::new(&values, dims, channels) else {
        return volume;
    };
    if values.is_empty() {
        return volume;
    }

    let centre = dims.map(|d| (d as f64 - 1.0) / 2.0);
    let mut resampled = vec![0.0_f32; values.len()];
    let mut voxels = resampled.chunks_mut(channels);

    for i0 in 0..dims[0] {
        for i1 in 0..dims[1] {
            for i2 in 0..dims[2] {
                let offset = [
                    i0 as f64 - centre[0],
                    i1 as f64 - centre[1],
                    i2 as f64 - centre[2],
                ];
                let mapped = map.apply(offset);
                let point = [
                    mapped[0] + centre[0],
                    mapped[1] + centre[1],
                    mapped[2] + centre[2],
                ];

                let Some(voxel) = voxels.next() else {
                    continue;
                };
                for (channel, value) in voxel.iter_mut().enumerate() {
                    *value = match volume.interpolation {
                        Interpolation::Nearest => grid.nearest(point, channel),
                        Interpolation::Linear => grid.linear(point, channel),
                    };
                }
            }
        }
    }

    match ArrayD::from_shape_vec(IxDyn(&shape), resampled) {
        Ok(data) => Volume { data, ..volume },
        Err(_) => volume,
    }
}
