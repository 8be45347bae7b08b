//! Tests for `LabelSet` operations

#[cfg(test)]
mod tests {
    use volpatch::sampler::label_set::LabelSet;

    // Verifies new LabelSet is empty with count 0
    // Verified by initializing set with all bits set to 1
    #[test]
    fn test_new_set() {
        let set = LabelSet::new(10);
        assert_eq!(set.count(), 0);
        assert!(!set.contains(0));
    }

    // Tests insertion and containment checking
    // Verified by removing the bit-setting logic from insert method
    #[test]
    fn test_insert_and_contains() {
        let mut set = LabelSet::new(10);
        set.insert(5);
        set.insert(5);
        assert!(set.contains(5));
        assert!(!set.contains(3));
        assert_eq!(set.count(), 1);
    }

    // Tests slots beyond capacity are ignored
    // Verified by growing the set on insert
    #[test]
    fn test_insert_out_of_range() {
        let mut set = LabelSet::new(3);
        set.insert(7);
        assert_eq!(set.count(), 0);
        assert!(!set.contains(7));
    }

    // Tests compulsory slot checks
    // Verified by returning true when any slot is present
    #[test]
    fn test_contains_all() {
        let mut set = LabelSet::new(5);
        set.insert(1);
        set.insert(3);
        assert!(set.contains_all(&[1, 3]));
        assert!(set.contains_all(&[]));
        assert!(!set.contains_all(&[1, 2]));
    }
}
