//! Volumetric arrays tagged with their spatial rank and resampling mode

use ndarray::ArrayD;

/// Resampling rule used when a volume is spatially transformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Nearest neighbour, keeps label values intact
    Nearest,
    /// Multi-linear blending of the surrounding voxels
    Linear,
}

/// One modality stack of a scan, label map or weight map
///
/// The leading `spatial_rank` axes are spatial; any remaining axes hold
/// modalities or channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Raw voxel data
    pub data: ArrayD<f32>,
    /// Number of leading spatial axes
    pub spatial_rank: usize,
    /// How the volume is resampled by augmentation
    pub interpolation: Interpolation,
}

impl Volume {
    /// Wrap intensity data resampled with linear interpolation
    pub fn image(data: ArrayD<f32>) -> Self {
        Self::new(data, Interpolation::Linear)
    }

    /// Wrap segmentation data resampled with nearest neighbour lookup
    pub fn label(data: ArrayD<f32>) -> Self {
        Self::new(data, Interpolation::Nearest)
    }

    /// Wrap per-voxel weights resampled with linear interpolation
    pub fn weight_map(data: ArrayD<f32>) -> Self {
        Self::new(data, Interpolation::Linear)
    }

    fn new(data: ArrayD<f32>, interpolation: Interpolation) -> Self {
        // Until a session aligns it, every axis up to three is treated as spatial
        let spatial_rank = data.ndim().min(3);
        Self {
            data,
            spatial_rank,
            interpolation,
        }
    }

    /// Replace the declared spatial rank
    #[must_use]
    pub fn with_spatial_rank(mut self, spatial_rank: usize) -> Self {
        self.spatial_rank = spatial_rank;
        self
    }

    /// Extent of the spatial axes
    pub fn spatial_shape(&self) -> &[usize] {
        let shape = self.data.shape();
        shape.get(..self.spatial_rank).unwrap_or(shape)
    }

    /// Number of axes beyond the spatial ones
    pub fn non_spatial_ndim(&self) -> usize {
        self.data.ndim().saturating_sub(self.spatial_rank)
    }
}

/// Image, label and weight map for one subject as delivered by a source
#[derive(Debug, Clone)]
pub struct VolumeSample {
    /// Intensity data, always present
    pub image: Volume,
    /// Segmentation, if available
    pub label: Option<Volume>,
    /// Per-voxel loss weights, if available
    pub weight_map: Option<Volume>,
    /// Identifier forwarded to every patch cut from this sample
    pub volume_id: usize,
}

impl VolumeSample {
    /// Build a sample with only image data
    pub fn new(volume_id: usize, image: Volume) -> Self {
        Self {
            image,
            label: None,
            weight_map: None,
            volume_id,
        }
    }

    /// Attach a label volume
    #[must_use]
    pub fn with_label(mut self, label: Volume) -> Self {
        self.label = Some(label);
        self
    }

    /// Attach a weight map volume
    #[must_use]
    pub fn with_weight_map(mut self, weight_map: Volume) -> Self {
        self.weight_map = Some(weight_map);
        self
    }
}
