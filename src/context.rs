//! Situational re-weighting of base scores.
//!
//! Each context maps to a target energy and a set of favored moods through
//! [`CONTEXT_TABLE`]. New contexts are table rows, not new branches.

use crate::config::ScoringConfig;
use crate::model::{Mood, Track};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Recognized listening situations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    Workout = 0,
    Study = 1,
    Party = 2,
    Romantic = 3,
    Chill = 4,
}

impl Context {
    pub const COUNT: usize = 5;

    pub const ALL: [Context; Context::COUNT] = [
        Context::Workout,
        Context::Study,
        Context::Party,
        Context::Romantic,
        Context::Chill,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Context::Workout => "workout",
            Context::Study => "study",
            Context::Party => "party",
            Context::Romantic => "romantic",
            Context::Chill => "chill",
        }
    }

    /// Row of [`CONTEXT_TABLE`] for this context.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Table entry for this context.
    #[must_use]
    pub fn profile(self) -> &'static ContextProfile {
        &CONTEXT_TABLE[self.index()]
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Context::ALL
            .into_iter()
            .find(|context| context.as_str() == normalized)
            .ok_or_else(|| format!("unknown context `{s}`"))
    }
}

/// What a context asks of a track.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextProfile {
    pub context: Context,
    pub target_energy: f64,
    pub favored_moods: &'static [Mood],
}

/// Target energy and favored moods, one row per [`Context`] in declaration order.
pub static CONTEXT_TABLE: [ContextProfile; Context::COUNT] = [
    ContextProfile {
        context: Context::Workout,
        target_energy: 0.85,
        favored_moods: &[Mood::Energetic],
    },
    ContextProfile {
        context: Context::Study,
        target_energy: 0.3,
        favored_moods: &[Mood::Focused, Mood::Relaxed],
    },
    ContextProfile {
        context: Context::Party,
        target_energy: 0.9,
        favored_moods: &[Mood::Energetic, Mood::Happy],
    },
    ContextProfile {
        context: Context::Romantic,
        target_energy: 0.4,
        favored_moods: &[Mood::Romantic],
    },
    ContextProfile {
        context: Context::Chill,
        target_energy: 0.25,
        favored_moods: &[Mood::Relaxed],
    },
];

/// How well a track fits a context, before blending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextFit {
    /// `1 - |energy - target|`, in `[0, 1]`.
    pub energy_fit: f64,
    /// `1` when the track shares a favored mood, else `0`.
    pub mood_fit: f64,
}

impl ContextFit {
    #[must_use]
    pub fn of(track: &Track, context: Context) -> Self {
        let profile = context.profile();
        let energy_fit = (1.0 - (track.energy() - profile.target_energy).abs()).clamp(0.0, 1.0);
        let mood_fit = if profile.favored_moods.iter().any(|m| track.moods().contains(m)) {
            1.0
        } else {
            0.0
        };
        Self { energy_fit, mood_fit }
    }

    /// Whether either fit crossed `threshold`.
    #[must_use]
    pub fn is_material(&self, threshold: f64) -> bool {
        self.energy_fit > threshold || self.mood_fit > threshold
    }
}

/// Blend a base score with the context fit. No context means no change.
#[must_use]
pub fn adjust(base_score: f64, track: &Track, context: Option<Context>, config: &ScoringConfig) -> f64 {
    let Some(context) = context else {
        return base_score;
    };
    let fit = ContextFit::of(track, context);
    let blended = config.base_weight * base_score + config.energy_weight * fit.energy_fit + config.mood_weight * fit.mood_fit;
    blended.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Genre;

    fn track(energy: f64, moods: &[Mood]) -> Track {
        Track::new("t", "T", "A", Genre::Pop, moods.iter().copied(), energy, 0.5).unwrap()
    }

    #[test]
    fn test_every_context_has_its_own_table_row() {
        for (index, context) in Context::ALL.into_iter().enumerate() {
            assert_eq!(context.index(), index);
            let profile = context.profile();
            assert_eq!(profile.context, context);
            assert!((0.0..=1.0).contains(&profile.target_energy));
            assert!(!profile.favored_moods.is_empty());
        }
        assert_eq!(CONTEXT_TABLE.len(), Context::ALL.len());
    }

    #[test]
    fn test_table_rows_match_labels() {
        assert_eq!(Context::Study.profile().target_energy, 0.3);
        assert_eq!(Context::Party.profile().favored_moods, &[Mood::Energetic, Mood::Happy]);
        assert_eq!(Context::Chill.profile().favored_moods, &[Mood::Relaxed]);
    }

    #[test]
    fn test_context_parsing() {
        assert_eq!("Workout".parse::<Context>(), Ok(Context::Workout));
        assert_eq!(" chill ".parse::<Context>(), Ok(Context::Chill));
        assert!("commute".parse::<Context>().is_err());
    }

    #[test]
    fn test_no_context_is_identity() {
        let config = ScoringConfig::default();
        for base in [0.0, 0.37, 1.0] {
            assert_eq!(adjust(base, &track(0.9, &[Mood::Happy]), None, &config), base);
        }
    }

    #[test]
    fn test_workout_blend() {
        let config = ScoringConfig::default();
        let t = track(0.85, &[Mood::Energetic]);
        let adjusted = adjust(0.5, &t, Some(Context::Workout), &config);
        assert!((adjusted - (0.6 * 0.5 + 0.25 * 1.0 + 0.15 * 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_fit_rewards_matching_track() {
        let config = ScoringConfig::default();
        let calm = track(0.2, &[Mood::Relaxed]);
        let loud = track(0.95, &[Mood::Energetic]);

        let calm_workout = adjust(0.5, &calm, Some(Context::Workout), &config);
        let loud_workout = adjust(0.5, &loud, Some(Context::Workout), &config);
        assert!(loud_workout > calm_workout);

        let calm_chill = adjust(0.5, &calm, Some(Context::Chill), &config);
        let loud_chill = adjust(0.5, &loud, Some(Context::Chill), &config);
        assert!(calm_chill > loud_chill);
    }

    #[test]
    fn test_adjusted_score_bounded() {
        let config = ScoringConfig::default();
        for context in Context::ALL {
            for energy in [0.0, 0.5, 1.0] {
                for base in [0.0, 0.5, 1.0] {
                    let s = adjust(base, &track(energy, &[Mood::Melancholic]), Some(context), &config);
                    assert!((0.0..=1.0).contains(&s));
                }
            }
        }
    }

    #[test]
    fn test_material_fit() {
        let fit = ContextFit::of(&track(0.1, &[Mood::Melancholic]), Context::Party);
        assert_eq!(fit.mood_fit, 0.0);
        assert!(!fit.is_material(0.5));

        let fit = ContextFit::of(&track(0.1, &[Mood::Happy]), Context::Party);
        assert!(fit.is_material(0.5));
    }
}
