//! Shared distance functions for vector similarity computation.
//!
//! Every backend ranks with a "higher = better" key from `rank_score`.
//! `report_score` converts that key into the value callers see: cosine and
//! dot product are reported as similarities, euclidean as the L2 distance.
//!
//! No implicit normalization of vectors. Vectors are used as-is.

use ragsearch_core::DistanceMetric;

/// Ranking key between two vectors (higher = more similar)
///
/// Euclidean ranks by negated distance so that ordering matches the
/// similarity metrics.
pub fn rank_score(a: &[f32], b: &[f32], metric: DistanceMetric) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Dimension mismatch in ranking");

    match metric {
        DistanceMetric::Cosine => cosine_similarity(a, b),
        DistanceMetric::Euclidean => -euclidean_distance(a, b),
        DistanceMetric::DotProduct => dot_product(a, b),
    }
}

/// Convert a ranking key into the score reported for the metric
pub fn report_score(rank: f32, metric: DistanceMetric) -> f32 {
    match metric {
        DistanceMetric::Euclidean => -rank,
        DistanceMetric::Cosine | DistanceMetric::DotProduct => rank,
    }
}

/// Cosine of the angle between `a` and `b`, in [-1, 1]
///
/// A zero-norm operand scores 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let denom = l2_norm(a) * l2_norm(b);
    if denom == 0.0 {
        return 0.0;
    }
    dot_product(a, b) / denom
}

/// Inner product
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean length
pub fn l2_norm(v: &[f32]) -> f32 {
    dot_product(v, v).sqrt()
}

/// Squared L2 distance, for comparisons that never report the value
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// L2 distance
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    squared_l2(a, b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_handling() {
        let zero = vec![0.0, 0.0, 0.0];
        let nonzero = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &nonzero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_euclidean_rank_and_report() {
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        let rank = rank_score(&a, &b, DistanceMetric::Euclidean);
        assert!((rank - (-5.0)).abs() < 1e-6);
        assert!((report_score(rank, DistanceMetric::Euclidean) - 5.0).abs() < 1e-6);

        // Closer vector ranks higher
        let near = rank_score(&a, &[1.0, 0.0], DistanceMetric::Euclidean);
        assert!(near > rank);
    }

    #[test]
    fn test_similarities_reported_unchanged() {
        let a = vec![1.0, 0.0, 0.0];
        let c = vec![0.9, 0.1, 0.0];
        let rank = rank_score(&a, &c, DistanceMetric::Cosine);
        assert_eq!(report_score(rank, DistanceMetric::Cosine), rank);

        let dot = rank_score(&[2.0, 1.0], &[3.0, 4.0], DistanceMetric::DotProduct);
        assert!((dot - 10.0).abs() < 1e-6);
        assert_eq!(report_score(dot, DistanceMetric::DotProduct), dot);
    }
}
