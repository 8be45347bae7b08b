//! Tests for synthetic phantom volume generation

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use volpatch::io::phantom::PhantomSource;
    use volpatch::volume::source::VolumeSource;

    // Tests the source yields exactly the requested number of volumes
    // Verified by never decrementing the remaining count
    #[test]
    fn test_source_exhausts() {
        let mut source = PhantomSource::new(2, 8, 2, 1);
        assert_eq!(source.remaining(), 2);

        let first = source.next_volume().unwrap();
        let second = source.next_volume().unwrap();
        assert_eq!(first.volume_id, 0);
        assert_eq!(second.volume_id, 1);

        assert!(!source.has_next());
        assert!(source.next_volume().is_err());
    }

    // Tests every generated volume has matching image, label and weight extents
    // Verified by generating the weight map at half resolution
    #[test]
    fn test_volume_shapes() {
        let mut source = PhantomSource::new(1, 12, 3, 7);
        let sample = source.next_volume().unwrap();

        assert_eq!(sample.image.data.shape(), &[12, 12, 12]);
        assert_eq!(
            sample.label.as_ref().map(|label| label.data.shape().to_vec()),
            Some(vec![12, 12, 12])
        );
        assert_eq!(
            sample
                .weight_map
                .as_ref()
                .map(|weights| weights.data.shape().to_vec()),
            Some(vec![12, 12, 12])
        );
    }

    // Tests labels only contain configured classes
    // Verified by painting spheres with class indices starting at zero
    #[test]
    fn test_label_classes_bounded() {
        let mut source = PhantomSource::new(1, 32, 3, 11);
        let sample = source.next_volume().unwrap();
        let label = sample.label.unwrap();

        let classes: BTreeSet<i64> = label.data.iter().map(|&v| v as i64).collect();
        assert!(classes.iter().all(|class| (0..=3).contains(class)));
        assert!(classes.contains(&0));
        assert!(classes.len() >= 2);
    }

    // Tests weight maps mark foreground voxels
    // Verified by assigning uniform weights
    #[test]
    fn test_weight_map_marks_foreground() {
        let mut source = PhantomSource::new(1, 16, 2, 3);
        let sample = source.next_volume().unwrap();
        let label = sample.label.unwrap();
        let weights = sample.weight_map.unwrap();

        for (&class, &weight) in label.data.iter().zip(weights.data.iter()) {
            let expected = if class > 0.0 { 2.0 } else { 1.0 };
            assert!((weight - expected).abs() < f32::EPSILON);
        }
    }

    // Tests weight maps can be switched off
    // Verified by ignoring the weight map flag
    #[test]
    fn test_without_weight_map() {
        let mut source = PhantomSource::new(1, 8, 1, 0).with_weight_map(false);
        let sample = source.next_volume().unwrap();
        assert!(sample.weight_map.is_none());
        assert!(sample.label.is_some());
    }

    // Tests identical seeds generate identical volumes
    // Verified by seeding from entropy
    #[test]
    fn test_deterministic_generation() {
        let mut a = PhantomSource::new(1, 10, 2, 99);
        let mut b = PhantomSource::new(1, 10, 2, 99);
        assert_eq!(
            a.next_volume().unwrap().image,
            b.next_volume().unwrap().image
        );
    }
}
