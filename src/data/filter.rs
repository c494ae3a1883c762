use super::kinematics::SpeciesBucket;

/// Default half-width of the midrapidity window.
pub const DEFAULT_YMAX: f64 = 0.5;

/// Transverse momenta whose paired rapidity satisfies |y| < `ymax`.
///
/// `rapidity` and `pt` are index-aligned. Entries before `start` are never
/// considered (1 reproduces the legacy loop). A NaN or infinite rapidity
/// fails the comparison and drops the entry. Order is preserved.
pub fn midrapidity_pt(rapidity: &[f64], pt: &[f64], ymax: f64, start: usize) -> Vec<f64> {
    rapidity
        .iter()
        .zip(pt)
        .skip(start)
        .filter(|(y, _)| y.abs() < ymax)
        .map(|(_, &p)| p)
        .collect()
}

/// [`midrapidity_pt`] applied to a whole species bucket.
pub fn bucket_midrapidity(bucket: &SpeciesBucket, ymax: f64, start: usize) -> Vec<f64> {
    midrapidity_pt(&bucket.rapidity, &bucket.pt, ymax, start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_central_entries_in_order() {
        let y = [0.1, -0.7, -0.49, 0.5, 0.0];
        let pt = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(midrapidity_pt(&y, &pt, DEFAULT_YMAX, 0), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn result_is_subsequence_with_central_rapidity() {
        let y: Vec<f64> = (0..50).map(|i| (i as f64 - 25.0) * 0.037).collect();
        let pt: Vec<f64> = (0..50).map(|i| i as f64 * 0.1).collect();

        let mid = midrapidity_pt(&y, &pt, DEFAULT_YMAX, 0);
        assert!(mid.len() < pt.len());

        // walk both sequences: every kept value must appear in order, with |y| < ymax
        let mut cursor = 0;
        for value in &mid {
            let pos = pt[cursor..].iter().position(|p| p == value).unwrap() + cursor;
            assert!(y[pos].abs() < DEFAULT_YMAX);
            cursor = pos + 1;
        }
    }

    #[test]
    fn non_finite_rapidity_is_dropped() {
        let y = [f64::INFINITY, f64::NAN, f64::NEG_INFINITY, 0.2];
        let pt = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(midrapidity_pt(&y, &pt, DEFAULT_YMAX, 0), vec![4.0]);
    }

    #[test]
    fn legacy_start_skips_first_bucket_entry() {
        let y = [0.0, 0.0];
        let pt = [1.0, 2.0];
        assert_eq!(midrapidity_pt(&y, &pt, DEFAULT_YMAX, 1), vec![2.0]);
    }

    #[test]
    fn empty_input() {
        assert!(midrapidity_pt(&[], &[], DEFAULT_YMAX, 0).is_empty());
        assert!(midrapidity_pt(&[], &[], DEFAULT_YMAX, 1).is_empty());
    }
}
