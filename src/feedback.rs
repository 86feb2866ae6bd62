//! Effective preference weights: stated taste adjusted by explicit feedback.
//!
//! Weights are a pure function of the profile's stated preferences and its
//! feedback map; nothing here writes back to the profile. Listening history
//! does not contribute here, it only drives exclusion in [`crate::engine`].

use crate::catalog::Catalog;
use crate::features::{GENRE_SLOTS, MOOD_SLOTS};
use crate::model::{FeedbackSignal, Genre, Mood, UserProfile};
use log::debug;

/// Normalized per-genre and per-mood weights for one user.
///
/// Each block sums to 1, or is entirely zero when the user has no signal
/// for that block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveWeights {
    genres: [f64; GENRE_SLOTS],
    moods: [f64; MOOD_SLOTS],
}

impl EffectiveWeights {
    #[must_use]
    pub fn genre(&self, genre: Genre) -> f64 {
        self.genres[genre.index()]
    }

    #[must_use]
    pub fn mood(&self, mood: Mood) -> f64 {
        self.moods[mood.index()]
    }

    /// Whether any genre or mood weight is non-zero.
    #[must_use]
    pub fn has_taste_signal(&self) -> bool {
        self.genres.iter().chain(self.moods.iter()).any(|w| *w > 0.0)
    }

    /// A genre is top-weighted when its weight is positive and at least
    /// `ratio` of the heaviest genre weight.
    #[must_use]
    pub fn is_top_genre(&self, genre: Genre, ratio: f64) -> bool {
        is_top(&self.genres, genre.index(), ratio)
    }

    #[must_use]
    pub fn is_top_mood(&self, mood: Mood, ratio: f64) -> bool {
        is_top(&self.moods, mood.index(), ratio)
    }
}

fn is_top(weights: &[f64], index: usize, ratio: f64) -> bool {
    let max = weights.iter().copied().fold(0.0, f64::max);
    let weight = weights[index];
    weight > 0.0 && weight >= max * ratio
}

/// Uniform `1/n` weights over the preferred items, zero elsewhere.
fn uniform<const N: usize>(preferred: impl ExactSizeIterator<Item = usize>) -> [f64; N] {
    let mut out = [0.0; N];
    let count = preferred.len();
    if count == 0 {
        return out;
    }
    #[allow(clippy::cast_precision_loss)]
    let share = 1.0 / count as f64;
    for index in preferred {
        out[index] = share;
    }
    out
}

/// Apply summed deltas, floor at zero, then normalize to sum 1.
///
/// Summing before flooring keeps the result independent of the order in
/// which feedback entries are visited.
fn settle<const N: usize>(mut weights: [f64; N], deltas: &[f64; N]) -> [f64; N] {
    for (weight, delta) in weights.iter_mut().zip(deltas.iter()) {
        *weight = (*weight + delta).max(0.0);
    }
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter_mut().for_each(|w| *w /= total);
    } else {
        weights = [0.0; N];
    }
    weights
}

/// Derive the effective weights for `profile`.
///
/// Every `liked` entry adds `increment` to its track's genre and to each of
/// its moods; every `disliked` entry subtracts it. Feedback on tracks that
/// are not in `catalog` is skipped.
#[must_use]
pub fn effective_weights(profile: &UserProfile, catalog: &Catalog, increment: f64) -> EffectiveWeights {
    let genre_base: [f64; GENRE_SLOTS] = uniform(profile.preferred_genres.iter().map(|g| g.index()));
    let mood_base: [f64; MOOD_SLOTS] = uniform(profile.preferred_moods.iter().map(|m| m.index()));

    let mut genre_deltas = [0.0; GENRE_SLOTS];
    let mut mood_deltas = [0.0; MOOD_SLOTS];

    for (track_id, signal) in &profile.feedback {
        let Some(track) = catalog.get(track_id) else {
            debug!("Ignoring feedback on `{track_id}': not in catalog.");
            continue;
        };
        let delta = match signal {
            FeedbackSignal::Liked => increment,
            FeedbackSignal::Disliked => -increment,
        };
        genre_deltas[track.genre().index()] += delta;
        for mood in track.moods() {
            mood_deltas[mood.index()] += delta;
        }
    }

    EffectiveWeights {
        genres: settle(genre_base, &genre_deltas),
        moods: settle(mood_base, &mood_deltas),
    }
}
