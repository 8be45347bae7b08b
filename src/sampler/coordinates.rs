//! Uniform candidate generation for patch locations

use crate::volume::patch::Location;
use rand::Rng;

/// Largest valid lower corner along each spatial axis
///
/// An axis shorter than the window only admits a start of zero.
pub fn placement_range(spatial_rank: usize, volume_shape: &[usize], window_shape: &[usize]) -> Vec<usize> {
    (0..spatial_rank)
        .map(|axis| {
            let extent = volume_shape.get(axis).copied().unwrap_or(0);
            let window = window_shape.get(axis).copied().unwrap_or(0);
            extent.saturating_sub(window)
        })
        .collect()
}

/// Draw `count` candidate locations uniformly over the placement range
///
/// Each coordinate is drawn independently, so a window placed at any
/// candidate lies entirely within the volume. Duplicates are possible.
pub fn rand_spatial_coordinates<R: Rng + ?Sized>(
    spatial_rank: usize,
    volume_shape: &[usize],
    window_shape: &[usize],
    count: usize,
    rng: &mut R,
) -> Vec<Location> {
    let max_starts = placement_range(spatial_rank, volume_shape, window_shape);

    (0..count)
        .map(|_| {
            let coordinates = max_starts
                .iter()
                .map(|&max_start| rng.random_range(0..=max_start))
                .collect();
            Location::new(coordinates)
        })
        .collect()
}
