//! Feature vectors for tracks and user profiles.
//!
//! Layout (identical for both sides):
//!
//! ```text
//! [ genre one-hot (10) | mood flags (6) | energy | popularity ]
//! ```

use crate::feedback::EffectiveWeights;
use crate::model::{Genre, Mood, Track, UserProfile};

pub const GENRE_SLOTS: usize = Genre::ALL.len();
pub const MOOD_SLOTS: usize = Mood::ALL.len();
pub const ENERGY_SLOT: usize = GENRE_SLOTS + MOOD_SLOTS;
pub const POPULARITY_SLOT: usize = ENERGY_SLOT + 1;
pub const DIMENSIONS: usize = POPULARITY_SLOT + 1;

/// Popularity slot of every profile vector. Users are assumed to value
/// generally popular tracks; feedback never touches this slot.
pub const PROFILE_POPULARITY: f64 = 1.0;

/// Fixed-dimension numeric encoding of a track or a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; DIMENSIONS]);

impl FeatureVector {
    #[must_use]
    pub const fn zeros() -> Self {
        Self([0.0; DIMENSIONS])
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn genre(&self, genre: Genre) -> f64 {
        self.0[genre.index()]
    }

    #[must_use]
    pub fn mood(&self, mood: Mood) -> f64 {
        self.0[GENRE_SLOTS + mood.index()]
    }

    #[must_use]
    pub fn energy(&self) -> f64 {
        self.0[ENERGY_SLOT]
    }

    #[must_use]
    pub fn popularity(&self) -> f64 {
        self.0[POPULARITY_SLOT]
    }

    /// Euclidean length.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.0.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Every slot multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = *self;
        out.0.iter_mut().for_each(|x| *x *= factor);
        out
    }
}

/// Encode a track: one-hot genre, mood flags, raw energy and popularity.
#[must_use]
pub fn vectorize_track(track: &Track) -> FeatureVector {
    let mut v = [0.0; DIMENSIONS];
    v[track.genre().index()] = 1.0;
    for mood in track.moods() {
        v[GENRE_SLOTS + mood.index()] = 1.0;
    }
    v[ENERGY_SLOT] = track.energy();
    v[POPULARITY_SLOT] = track.popularity();
    FeatureVector(v)
}

/// Encode a profile through its effective weights.
///
/// Genre and mood blocks carry the normalized effective weights (all zero
/// when the user expressed nothing), energy carries the stated preference.
#[must_use]
pub fn vectorize_profile(profile: &UserProfile, weights: &EffectiveWeights) -> FeatureVector {
    let mut v = [0.0; DIMENSIONS];
    for genre in Genre::ALL {
        v[genre.index()] = weights.genre(genre);
    }
    for mood in Mood::ALL {
        v[GENRE_SLOTS + mood.index()] = weights.mood(mood);
    }
    v[ENERGY_SLOT] = profile.energy_preference.clamp(0.0, 1.0);
    v[POPULARITY_SLOT] = PROFILE_POPULARITY;
    FeatureVector(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::feedback::effective_weights;

    #[test]
    fn test_track_vector_layout() {
        let track = Track::new("t1", "A", "B", Genre::Jazz, [Mood::Relaxed, Mood::Focused], 0.4, 0.75).unwrap();
        let v = vectorize_track(&track);

        assert_eq!(v.as_slice().len(), DIMENSIONS);
        assert_eq!(v.genre(Genre::Jazz), 1.0);
        assert_eq!(Genre::ALL.iter().map(|g| v.genre(*g)).sum::<f64>(), 1.0);
        assert_eq!(v.mood(Mood::Relaxed), 1.0);
        assert_eq!(v.mood(Mood::Focused), 1.0);
        assert_eq!(v.mood(Mood::Happy), 0.0);
        assert_eq!(v.energy(), 0.4);
        assert_eq!(v.popularity(), 0.75);
    }

    #[test]
    fn test_profile_vector_uniform_over_preferences() {
        let profile = UserProfile::new("u1")
            .with_genres([Genre::Rock, Genre::Pop])
            .with_moods([Mood::Happy, Mood::Energetic, Mood::Romantic, Mood::Focused])
            .with_energy_preference(0.8);
        let weights = effective_weights(&profile, &Catalog::empty(), 0.2);
        let v = vectorize_profile(&profile, &weights);

        assert_eq!(v.as_slice().len(), DIMENSIONS);
        assert!((v.genre(Genre::Rock) - 0.5).abs() < 1e-12);
        assert!((v.genre(Genre::Pop) - 0.5).abs() < 1e-12);
        assert_eq!(v.genre(Genre::Jazz), 0.0);
        assert!((v.mood(Mood::Happy) - 0.25).abs() < 1e-12);
        assert_eq!(v.mood(Mood::Relaxed), 0.0);
        assert_eq!(v.energy(), 0.8);
        assert_eq!(v.popularity(), PROFILE_POPULARITY);
    }

    #[test]
    fn test_profile_vector_without_preferences() {
        let profile = UserProfile::new("u1");
        let weights = effective_weights(&profile, &Catalog::empty(), 0.2);
        let v = vectorize_profile(&profile, &weights);

        assert!(Genre::ALL.iter().all(|g| v.genre(*g) == 0.0));
        assert!(Mood::ALL.iter().all(|m| v.mood(*m) == 0.0));
        assert!(v.magnitude() > 0.0);
    }

    #[test]
    fn test_profile_energy_slot_stays_in_range() {
        let mut profile = UserProfile::new("u1").with_genres([Genre::Rock]);
        profile.energy_preference = 7.0;
        let weights = effective_weights(&profile, &Catalog::empty(), 0.2);
        let v = vectorize_profile(&profile, &weights);

        assert_eq!(v.energy(), 1.0);
        assert!((v.genre(Genre::Rock) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_and_dot() {
        let track = Track::new("t1", "A", "B", Genre::Rock, [Mood::Happy], 1.0, 1.0).unwrap();
        let v = vectorize_track(&track);
        assert!((v.dot(&v) - 4.0).abs() < 1e-12);
        assert!((v.scaled(2.0).magnitude() - 4.0).abs() < 1e-12);
        assert_eq!(FeatureVector::zeros().magnitude(), 0.0);
    }
}
