//! Patch geometry and the reusable patch buffer
//!
//! A `PatchGeometry` is the immutable template shared by every session. Each
//! session owns one `Patch` built from it and refills that buffer in place
//! for every accepted location.

use crate::io::configuration::MAX_SPATIAL_RANK;
use crate::io::error::{Result, SamplerError, configuration_error};
use crate::volume::image::Volume;
use ndarray::{ArrayD, IxDyn, Slice};
use std::fmt;

/// Lower corner of a patch window within a volume
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location(Vec<usize>);

impl Location {
    /// Create a location from one coordinate per spatial axis
    pub const fn new(coordinates: Vec<usize>) -> Self {
        Self(coordinates)
    }

    /// Coordinates of the lower corner
    pub fn coordinates(&self) -> &[usize] {
        &self.0
    }

    /// Number of spatial axes this location addresses
    pub fn spatial_rank(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<usize>> for Location {
    fn from(coordinates: Vec<usize>) -> Self {
        Self(coordinates)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, coordinate) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{coordinate}")?;
        }
        write!(f, ")")
    }
}

/// Immutable description of the patches a sampler produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchGeometry {
    spatial_rank: usize,
    image_size: usize,
    num_image_modality: usize,
    num_label_modality: usize,
    num_weight_map: usize,
}

impl PatchGeometry {
    /// Create a cubic patch geometry
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the spatial rank is outside `2..=4`
    /// or any size or modality count is zero.
    pub fn new(
        spatial_rank: usize,
        image_size: usize,
        num_image_modality: usize,
        num_label_modality: usize,
        num_weight_map: usize,
    ) -> Result<Self> {
        if !(2..=MAX_SPATIAL_RANK).contains(&spatial_rank) {
            return Err(configuration_error(
                "spatial_rank",
                &spatial_rank,
                &format!("must be between 2 and {MAX_SPATIAL_RANK}"),
            ));
        }
        if image_size == 0 {
            return Err(configuration_error(
                "image_size",
                &image_size,
                &"patch windows must not be empty",
            ));
        }
        for (parameter, value) in [
            ("num_image_modality", num_image_modality),
            ("num_label_modality", num_label_modality),
            ("num_weight_map", num_weight_map),
        ] {
            if value == 0 {
                return Err(configuration_error(parameter, &value, &"must be positive"));
            }
        }

        Ok(Self {
            spatial_rank,
            image_size,
            num_image_modality,
            num_label_modality,
            num_weight_map,
        })
    }

    /// Number of spatial axes of every patch
    pub const fn spatial_rank(&self) -> usize {
        self.spatial_rank
    }

    /// Edge length of the patch window
    pub const fn image_size(&self) -> usize {
        self.image_size
    }

    /// Spatial extent of the patch window
    pub fn window_shape(&self) -> Vec<usize> {
        vec![self.image_size; self.spatial_rank]
    }

    /// Full image patch shape, spatial window plus modalities
    pub fn full_image_shape(&self) -> Vec<usize> {
        self.full_shape(self.num_image_modality)
    }

    /// Full label patch shape, spatial window plus label channels
    pub fn full_label_shape(&self) -> Vec<usize> {
        self.full_shape(self.num_label_modality)
    }

    /// Full weight map patch shape, spatial window plus weight channels
    pub fn full_weight_map_shape(&self) -> Vec<usize> {
        self.full_shape(self.num_weight_map)
    }

    fn full_shape(&self, channels: usize) -> Vec<usize> {
        let mut shape = self.window_shape();
        shape.push(channels);
        shape
    }
}

/// One extracted window of an image, label and weight map
///
/// The buffers always have the geometry's full shapes. Regions of the window
/// that fall outside the source volume, and surplus channels, read as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    geometry: PatchGeometry,
    volume_id: usize,
    location: Location,
    image: ArrayD<f32>,
    label: Option<ArrayD<f32>>,
    weight_map: Option<ArrayD<f32>>,
}

impl Patch {
    /// Create an empty patch buffer for the given geometry
    pub fn new(geometry: PatchGeometry) -> Self {
        let image = ArrayD::zeros(IxDyn(&geometry.full_image_shape()));
        let location = Location::new(vec![0; geometry.spatial_rank()]);
        Self {
            geometry,
            volume_id: 0,
            location,
            image,
            label: None,
            weight_map: None,
        }
    }

    /// Overwrite every buffer with the windows at `location`
    ///
    /// Absent label or weight map volumes clear the corresponding buffer.
    ///
    /// # Errors
    ///
    /// Returns a dimensionality error if a volume's rank differs from the
    /// patch shape; the patch contents are unspecified afterwards.
    pub fn set_data(
        &mut self,
        volume_id: usize,
        location: Location,
        image: &Volume,
        label: Option<&Volume>,
        weight_map: Option<&Volume>,
    ) -> Result<()> {
        let spatial_rank = self.geometry.spatial_rank();

        copy_window(&mut self.image, &image.data, &location, spatial_rank, volume_id)?;

        self.label = match label {
            Some(volume) => {
                let mut buffer = self
                    .label
                    .take()
                    .unwrap_or_else(|| ArrayD::zeros(IxDyn(&self.geometry.full_label_shape())));
                copy_window(&mut buffer, &volume.data, &location, spatial_rank, volume_id)?;
                Some(buffer)
            }
            None => None,
        };

        self.weight_map = match weight_map {
            Some(volume) => {
                let mut buffer = self.weight_map.take().unwrap_or_else(|| {
                    ArrayD::zeros(IxDyn(&self.geometry.full_weight_map_shape()))
                });
                copy_window(&mut buffer, &volume.data, &location, spatial_rank, volume_id)?;
                Some(buffer)
            }
            None => None,
        };

        self.volume_id = volume_id;
        self.location = location;
        Ok(())
    }

    /// Geometry this patch was built from
    pub const fn geometry(&self) -> &PatchGeometry {
        &self.geometry
    }

    /// Identifier of the source volume
    pub const fn volume_id(&self) -> usize {
        self.volume_id
    }

    /// Lower corner of the window within the source volume
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Image window
    pub const fn image(&self) -> &ArrayD<f32> {
        &self.image
    }

    /// Label window, if the source had a label
    pub const fn label(&self) -> Option<&ArrayD<f32>> {
        self.label.as_ref()
    }

    /// Weight map window, if the source had a weight map
    pub const fn weight_map(&self) -> Option<&ArrayD<f32>> {
        self.weight_map.as_ref()
    }
}

/// Copy the window at `location` from `source` into `target`
///
/// `target` is zeroed first so nothing from a previous window survives.
fn copy_window(
    target: &mut ArrayD<f32>,
    source: &ArrayD<f32>,
    location: &Location,
    spatial_rank: usize,
    volume_id: usize,
) -> Result<()> {
    if target.ndim() != source.ndim() {
        return Err(SamplerError::Dimensionality {
            volume_id,
            ndim: source.ndim(),
            spatial_rank,
        });
    }

    // (source start, copied length) per axis
    let ranges: Vec<(usize, usize)> = source
        .shape()
        .iter()
        .zip(target.shape())
        .enumerate()
        .map(|(axis, (&source_len, &target_len))| {
            let start = if axis < spatial_rank {
                location
                    .coordinates()
                    .get(axis)
                    .copied()
                    .unwrap_or(0)
                    .min(source_len)
            } else {
                0
            };
            let length = target_len.min(source_len - start);
            (start, length)
        })
        .collect();

    target.fill(0.0);
    let window = source.slice_each_axis(|axis| {
        let (start, length) = ranges.get(axis.axis.index()).copied().unwrap_or((0, 0));
        Slice::from(start..start + length)
    });
    target
        .slice_each_axis_mut(|axis| {
            let (_, length) = ranges.get(axis.axis.index()).copied().unwrap_or((0, 0));
            Slice::from(0..length)
        })
        .assign(&window);
    Ok(())
}
