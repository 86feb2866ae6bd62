//! Base affinity between a profile vector and a track vector.

use crate::features::FeatureVector;

/// Raw cosine similarity in `[-1, 1]`.
///
/// A zero-magnitude vector on either side yields `0.0`.
#[must_use]
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let norm_a = a.magnitude();
    let norm_b = b.magnitude();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Base score in `[0, 1]`. Negative correlation counts as no match.
#[must_use]
pub fn score(user: &FeatureVector, track: &FeatureVector) -> f64 {
    let similarity = cosine_similarity(user, track).max(0.0);
    log::trace!("Base similarity `{similarity:.4}'.");
    similarity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::features::{vectorize_profile, vectorize_track};
    use crate::feedback::effective_weights;
    use crate::model::{Genre, Mood, Track, UserProfile};

    fn tracks() -> Vec<Track> {
        let mut out = Vec::new();
        for (i, genre) in Genre::ALL.iter().enumerate() {
            for (j, mood) in Mood::ALL.iter().enumerate() {
                let energy = (i as f64) / 10.0;
                let popularity = (j as f64) / 6.0;
                out.push(Track::new(format!("t{i}-{j}"), "T", "A", *genre, [*mood], energy, popularity).unwrap());
            }
        }
        out
    }

    #[test]
    fn test_identical_vectors_score_one() {
        let track = Track::new("t1", "A", "B", Genre::Rock, [Mood::Happy], 0.6, 0.6).unwrap();
        let v = vectorize_track(&track);
        assert!((score(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_magnitude_scores_zero() {
        let track = Track::new("t1", "A", "B", Genre::Rock, [Mood::Happy], 0.6, 0.6).unwrap();
        let v = vectorize_track(&track);
        assert_eq!(score(&FeatureVector::zeros(), &v), 0.0);
        assert_eq!(score(&v, &FeatureVector::zeros()), 0.0);
        assert_eq!(cosine_similarity(&FeatureVector::zeros(), &FeatureVector::zeros()), 0.0);
    }

    #[test]
    fn test_negative_correlation_clamped() {
        let track = Track::new("t1", "A", "B", Genre::Rock, [Mood::Happy], 0.6, 0.6).unwrap();
        let v = vectorize_track(&track);
        let negated = v.scaled(-1.0);
        assert!(cosine_similarity(&negated, &v) < 0.0);
        assert_eq!(score(&negated, &v), 0.0);
    }

    #[test]
    fn test_empty_preferences_are_nonnegative_and_deterministic() {
        let profile = UserProfile::new("u1");
        let weights = effective_weights(&profile, &Catalog::empty(), 0.2);
        let user = vectorize_profile(&profile, &weights);

        for track in tracks() {
            let v = vectorize_track(&track);
            let first = score(&user, &v);
            let second = score(&user, &v);
            assert!(first >= 0.0);
            assert!(first <= 1.0);
            assert_eq!(first, second, "Scoring must be deterministic");
        }
    }

    #[test]
    fn test_scale_invariance() {
        let profile = UserProfile::new("u1")
            .with_genres([Genre::Rock, Genre::Jazz])
            .with_moods([Mood::Happy])
            .with_energy_preference(0.7);
        let weights = effective_weights(&profile, &Catalog::empty(), 0.2);
        let user = vectorize_profile(&profile, &weights);

        for track in tracks() {
            let v = vectorize_track(&track);
            let base = score(&user, &v);
            for factor in [0.01, 0.5, 3.0, 1000.0] {
                let scaled = score(&user, &v.scaled(factor));
                assert!((base - scaled).abs() < 1e-9, "factor {factor}: {base} vs {scaled}");
            }
        }
    }
}
