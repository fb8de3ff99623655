//! Shannon entropy over count distributions.

/// Entropy in bits of a distribution given by raw counts.
///
/// Zero counts contribute nothing; an empty or all-zero distribution has
/// entropy 0.
pub fn entropy<I>(counts: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let mut total = 0.0;
    let mut weighted_log_sum = 0.0;
    for count in counts.into_iter().filter(|&c| c > 0) {
        let count = count as f64;
        total += count;
        weighted_log_sum += count * count.log2();
    }

    if total == 0.0 {
        return 0.0;
    }
    (total.log2() - weighted_log_sum / total).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_zero_counts_ignored() {
        let counts: HashMap<&str, usize> = [("a", 1), ("b", 1), ("c", 0)].into_iter().collect();
        assert_eq!(entropy(counts.values().copied()), 1.0);
    }

    #[test]
    fn test_single_outcome() {
        assert_eq!(entropy([7]), 0.0);
    }

    #[test]
    fn test_empty() {
        assert_eq!(entropy(Vec::new()), 0.0);
        assert_eq!(entropy([0, 0]), 0.0);
    }

    #[test]
    fn test_uniform_four() {
        assert!((entropy([3, 3, 3, 3]) - 2.0).abs() < 1e-12);
    }
}
