/// Centre-relative linear maps for spatial transforms
pub mod affine;
/// Voxel lookups at fractional coordinates
pub mod interpolation;
