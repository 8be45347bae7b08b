//! Voxel lookups at fractional coordinates
//!
//! Volumes are viewed as a row-major grid of three spatial axes followed by a
//! flattened run of channels. Lookups outside the grid read as zero.

/// Borrowed row-major voxel grid with trailing channels
#[derive(Debug, Clone, Copy)]
pub struct VoxelGrid<'a> {
    values: &'a [f32],
    dims: [usize; 3],
    channels: usize,
}

impl<'a> VoxelGrid<'a> {
    /// View `values` as a grid of `dims` voxels with `channels` values each
    ///
    /// Returns `None` if the slice length does not match the layout.
    pub fn new(values: &'a [f32], dims: [usize; 3], channels: usize) -> Option<Self> {
        let expected = dims.iter().product::<usize>() * channels;
        (values.len() == expected).then_some(Self {
            values,
            dims,
            channels,
        })
    }

    /// Spatial extent of the grid
    pub const fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Values stored per voxel
    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// Value at integer coordinates, zero when outside the grid
    pub fn value(&self, index: [i64; 3], channel: usize) -> f32 {
        let mut flat = 0usize;
        for (&i, &d) in index.iter().zip(&self.dims) {
            if i < 0 || i as usize >= d {
                return 0.0;
            }
            flat = flat * d + i as usize;
        }
        self.values
            .get(flat * self.channels + channel)
            .copied()
            .unwrap_or(0.0)
    }

    /// Value of the voxel closest to `point`
    pub fn nearest(&self, point: [f64; 3], channel: usize) -> f32 {
        self.value(point.map(|p| p.round() as i64), channel)
    }

    /// Trilinear blend of the eight voxels surrounding `point`
    pub fn linear(&self, point: [f64; 3], channel: usize) -> f32 {
        let base = point.map(f64::floor);
        let fraction = [point[0] - base[0], point[1] - base[1], point[2] - base[2]];
        let base = base.map(|b| b as i64);

        let mut total = 0.0;
        for corner in 0..8_usize {
            let mut weight = 1.0;
            let mut index = base;
            for (axis, (offset, frac)) in index.iter_mut().zip(fraction).enumerate() {
                if (corner >> axis) & 1 == 1 {
                    *offset += 1;
                    weight *= frac;
                } else {
                    weight *= 1.0 - frac;
                }
            }
            if weight > 0.0 {
                total += weight * f64::from(self.value(index, channel));
            }
        }
        total as f32
    }
}
