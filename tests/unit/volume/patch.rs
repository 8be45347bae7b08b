//! Tests for patch geometry, locations and window extraction

#[cfg(test)]
mod tests {
    use ndarray::{Array4, ArrayD, IxDyn};
    use volpatch::SamplerError;
    use volpatch::volume::image::Volume;
    use volpatch::volume::patch::{Location, Patch, PatchGeometry};

    fn indexed_volume(extent: usize) -> Volume {
        let data = Array4::from_shape_fn((extent, extent, extent, 1), |(x, y, z, _)| {
            (x * 100 + y * 10 + z) as f32
        });
        Volume::image(data.into_dyn())
    }

    // Tests geometry validation of rank, size and modality counts
    // Verified by allowing spatial rank one
    #[test]
    fn test_geometry_validation() {
        assert!(PatchGeometry::new(1, 4, 1, 1, 1).is_err());
        assert!(PatchGeometry::new(5, 4, 1, 1, 1).is_err());
        assert!(PatchGeometry::new(3, 0, 1, 1, 1).is_err());
        assert!(matches!(
            PatchGeometry::new(3, 4, 1, 0, 1),
            Err(SamplerError::Configuration {
                parameter: "num_label_modality",
                ..
            })
        ));
        assert!(PatchGeometry::new(2, 4, 1, 1, 1).is_ok());
        assert!(PatchGeometry::new(4, 4, 1, 1, 1).is_ok());
    }

    // Tests full shapes append the channel count to the window
    // Verified by prepending the channel axis
    #[test]
    fn test_geometry_shapes() {
        let geometry = PatchGeometry::new(3, 8, 2, 1, 3).unwrap();
        assert_eq!(geometry.window_shape(), vec![8, 8, 8]);
        assert_eq!(geometry.full_image_shape(), vec![8, 8, 8, 2]);
        assert_eq!(geometry.full_label_shape(), vec![8, 8, 8, 1]);
        assert_eq!(geometry.full_weight_map_shape(), vec![8, 8, 8, 3]);
        assert_eq!(geometry.image_size(), 8);
        assert_eq!(geometry.spatial_rank(), 3);
    }

    // Tests location helpers and formatting
    // Verified by formatting without separators
    #[test]
    fn test_location() {
        let location = Location::from(vec![1, 2, 3]);
        assert_eq!(location.spatial_rank(), 3);
        assert_eq!(location.to_string(), "(1, 2, 3)");
    }

    // Tests a new patch has zeroed image and no optional buffers
    // Verified by allocating label buffers eagerly
    #[test]
    fn test_new_patch() {
        let patch = Patch::new(PatchGeometry::new(2, 5, 1, 1, 1).unwrap());
        assert_eq!(patch.image().shape(), &[5, 5, 1]);
        assert!(patch.image().iter().all(|&v| v == 0.0));
        assert!(patch.label().is_none());
        assert_eq!(patch.location().coordinates(), &[0, 0]);
    }

    // Tests the copied window matches the source at the location
    // Verified by offsetting the copy by one voxel
    #[test]
    fn test_set_data_copies_window() {
        let mut patch = Patch::new(PatchGeometry::new(3, 2, 1, 1, 1).unwrap());
        let image = indexed_volume(6);
        let label = indexed_volume(6);

        patch
            .set_data(4, Location::new(vec![1, 2, 3]), &image, Some(&label), None)
            .unwrap();

        assert_eq!(patch.volume_id(), 4);
        assert_eq!(patch.location().coordinates(), &[1, 2, 3]);
        assert!((patch.image()[[0, 0, 0, 0]] - 123.0).abs() < f32::EPSILON);
        assert!((patch.image()[[1, 1, 1, 0]] - 234.0).abs() < f32::EPSILON);
        assert_eq!(patch.label().map(ArrayD::shape), Some(&[2, 2, 2, 1][..]));
        assert!(patch.weight_map().is_none());
    }

    // Tests windows reaching beyond the volume read as zero
    // Verified by clamping the window to the volume edge
    #[test]
    fn test_set_data_zero_fills_outside() {
        let mut patch = Patch::new(PatchGeometry::new(3, 4, 1, 1, 1).unwrap());
        let image = indexed_volume(5);

        patch
            .set_data(0, Location::new(vec![3, 0, 0]), &image, None, None)
            .unwrap();

        assert!((patch.image()[[1, 0, 0, 0]] - 400.0).abs() < f32::EPSILON);
        assert!(patch.image()[[2, 0, 0, 0]].abs() < f32::EPSILON);
        assert!(patch.image()[[3, 3, 3, 0]].abs() < f32::EPSILON);
    }

    // Tests nothing from a previous window survives a refill
    // Verified by skipping the zero fill before copying
    #[test]
    fn test_set_data_clears_previous() {
        let mut patch = Patch::new(PatchGeometry::new(3, 4, 1, 1, 1).unwrap());
        let image = indexed_volume(5);
        let weights = indexed_volume(5);

        patch
            .set_data(0, Location::new(vec![0, 0, 0]), &image, None, Some(&weights))
            .unwrap();
        assert!(patch.weight_map().is_some());

        patch
            .set_data(1, Location::new(vec![4, 4, 4]), &image, None, None)
            .unwrap();
        assert!(patch.weight_map().is_none());
        assert!((patch.image()[[0, 0, 0, 0]] - 444.0).abs() < f32::EPSILON);
        assert!(patch.image()[[1, 0, 0, 0]].abs() < f32::EPSILON);
    }

    // Tests surplus source channels are dropped and missing ones zeroed
    // Verified by copying channels past the patch shape
    #[test]
    fn test_set_data_channels() {
        let mut patch = Patch::new(PatchGeometry::new(3, 2, 2, 1, 1).unwrap());
        let data = Array4::from_shape_fn((2, 2, 2, 1), |_| 7.0_f32).into_dyn();

        patch
            .set_data(0, Location::new(vec![0, 0, 0]), &Volume::image(data), None, None)
            .unwrap();
        assert!((patch.image()[[0, 0, 0, 0]] - 7.0).abs() < f32::EPSILON);
        assert!(patch.image()[[0, 0, 0, 1]].abs() < f32::EPSILON);
    }

    // Tests rank mismatches are reported as dimensionality errors
    // Verified by broadcasting the source into the patch
    #[test]
    fn test_set_data_rank_mismatch() {
        let mut patch = Patch::new(PatchGeometry::new(3, 2, 1, 1, 1).unwrap());
        let flat = Volume::image(ArrayD::zeros(IxDyn(&[4, 4, 4])));

        let result = patch.set_data(6, Location::new(vec![0, 0, 0]), &flat, None, None);
        assert!(matches!(
            result,
            Err(SamplerError::Dimensionality { volume_id: 6, .. })
        ));
    }
}
