//! Tests for volume sources

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};
    use volpatch::SamplerError;
    use volpatch::volume::image::{Volume, VolumeSample};
    use volpatch::volume::source::{InMemorySource, VolumeSource};

    fn sample(volume_id: usize) -> VolumeSample {
        VolumeSample::new(volume_id, Volume::image(ArrayD::zeros(IxDyn(&[2, 2, 2]))))
    }

    // Tests samples are yielded in insertion order
    // Verified by popping from the back of the queue
    #[test]
    fn test_fifo_order() {
        let mut source = InMemorySource::new(vec![sample(0), sample(1)]);
        source.push(sample(2));
        assert_eq!(source.len(), 3);

        let mut ids = Vec::new();
        while source.has_next() {
            ids.push(source.next_volume().unwrap().volume_id);
        }
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(source.is_empty());
    }

    // Tests pulling from an empty source is an error
    // Verified by returning a default sample
    #[test]
    fn test_exhausted_source() {
        let mut source = InMemorySource::default();
        assert!(!source.has_next());
        assert!(matches!(
            source.next_volume(),
            Err(SamplerError::Source { .. })
        ));
    }

    // Tests borrowed and boxed sources forward to the inner source
    // Verified by reporting the borrowed source as exhausted
    #[test]
    fn test_forwarding_impls() {
        let mut inner = InMemorySource::from(vec![sample(4)]);
        {
            let mut borrowed: &mut InMemorySource = &mut inner;
            assert!(VolumeSource::has_next(&borrowed));
            assert_eq!(
                VolumeSource::next_volume(&mut borrowed).unwrap().volume_id,
                4
            );
        }
        assert!(inner.is_empty());

        let mut boxed: Box<dyn VolumeSource> = Box::new(InMemorySource::from(vec![sample(5)]));
        assert!(boxed.has_next());
        assert_eq!(boxed.next_volume().unwrap().volume_id, 5);
        assert!(!boxed.has_next());
    }
}
