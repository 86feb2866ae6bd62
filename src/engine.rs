//! Recommendation assembly.
//!
//! Pipeline for one request:
//!
//! 1. pick candidates (unheard, not disliked; re-admit the oldest heard
//!    tracks when too few remain),
//! 2. derive effective weights and score each candidate,
//! 3. apply the context blend,
//! 4. rank, truncate, explain.
//!
//! Everything here is a pure computation over the catalog snapshot and the
//! caller's profile. The only writes go through [`Recommender::record_feedback`]
//! and [`Recommender::record_listen`].

use crate::catalog::Catalog;
use crate::config::ScoringConfig;
use crate::context::{self, Context, ContextFit};
use crate::error::RecommendError;
use crate::features::{vectorize_profile, vectorize_track, FeatureVector};
use crate::feedback::{effective_weights, EffectiveWeights};
use crate::model::{
    FeedbackSignal, RecommendationItem, RecommendationRequest, RecommendationResponse, Track, UserProfile,
    NEUTRAL_ENERGY,
};
use crate::similarity;
use crate::store::ProfileStore;
use chrono::Utc;
use log::{debug, info, trace, warn};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

const GENERIC_CLAUSE: &str = "matches your general taste profile";

/// A candidate with its intermediate scores.
#[derive(Debug, Clone, Copy)]
struct ScoredTrack<'a> {
    track: &'a Track,
    adjusted: f64,
    fit: Option<ContextFit>,
}

/// The request context after parsing.
#[derive(Debug, Clone, PartialEq)]
enum ResolvedContext {
    None,
    Known(Context),
    /// Label that matched no table row; scoring ignores it.
    Unrecognized(String),
}

impl ResolvedContext {
    fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim).filter(|l| !l.is_empty()) {
            None => Self::None,
            Some(label) => match label.parse::<Context>() {
                Ok(context) => Self::Known(context),
                Err(_) => {
                    warn!("Unrecognized context `{label}', scoring without context.");
                    Self::Unrecognized(label.to_string())
                }
            },
        }
    }

    fn known(&self) -> Option<Context> {
        match self {
            Self::Known(context) => Some(*context),
            _ => None,
        }
    }
}

/// Scores a fixed catalog against user profiles.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    config: ScoringConfig,
}

impl Recommender {
    pub fn new(catalog: Catalog, config: ScoringConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Rank the catalog for `request.profile`.
    ///
    /// Never fails: an empty catalog, a fully excluded catalog or a zero
    /// count all produce a response with `total == 0`.
    #[must_use]
    pub fn get_recommendations(&self, request: &RecommendationRequest<'_>) -> RecommendationResponse {
        let profile = request.profile;
        let context = ResolvedContext::from_label(request.context.as_deref());

        let candidates = self.candidates(profile, request.count, request.exclude_recent);
        debug!(
            "{} candidates for `{}' out of {} tracks.",
            candidates.len(),
            profile.user_id,
            self.catalog.len()
        );

        let weights = effective_weights(profile, &self.catalog, self.config.feedback_increment);
        let user_vector = vectorize_profile(profile, &weights);
        let popularity_baseline =
            !weights.has_taste_signal() && (profile.energy_preference - NEUTRAL_ENERGY).abs() < f64::EPSILON;
        if popularity_baseline {
            debug!("No taste signal for `{}', ranking by popularity.", profile.user_id);
        }

        let mut scored: Vec<ScoredTrack<'_>> = candidates
            .into_iter()
            .map(|track| self.score_track(track, &user_vector, popularity_baseline, context.known()))
            .collect();

        scored.sort_by(rank_order);
        scored.truncate(request.count);

        let items: Vec<RecommendationItem> = scored
            .iter()
            .enumerate()
            .map(|(position, candidate)| RecommendationItem {
                track: candidate.track.clone(),
                confidence: candidate.adjusted,
                rank: position + 1,
                explanation: self.explain(candidate, &weights, &context),
            })
            .collect();

        info!("Generated {} recommendations for `{}'.", items.len(), profile.user_id);
        RecommendationResponse {
            user_id: profile.user_id.clone(),
            generated_at: Utc::now(),
            total: items.len(),
            items,
        }
    }

    fn score_track<'a>(
        &self,
        track: &'a Track,
        user_vector: &FeatureVector,
        popularity_baseline: bool,
        context: Option<Context>,
    ) -> ScoredTrack<'a> {
        let base = if popularity_baseline {
            track.popularity()
        } else {
            similarity::score(user_vector, &vectorize_track(track))
        };
        let adjusted = context::adjust(base, track, context, &self.config);
        trace!("Track `{}': base {base:.4}, adjusted {adjusted:.4}.", track.id());

        ScoredTrack {
            track,
            adjusted,
            fit: context.map(|c| ContextFit::of(track, c)),
        }
    }

    /// Tracks eligible for this request, deduplicated, in catalog order
    /// followed by re-admitted heard tracks (oldest first).
    fn candidates<'a>(&'a self, profile: &UserProfile, count: usize, exclude_recent: bool) -> Vec<&'a Track> {
        let eligible = |track: &&Track| !profile.is_disliked(track.id());

        if !exclude_recent {
            return self.catalog.iter().filter(eligible).collect();
        }

        // Last position at which each track was heard.
        let mut last_heard: HashMap<&str, usize> = HashMap::new();
        for (position, track_id) in profile.listening_history.iter().enumerate() {
            last_heard.insert(track_id.as_str(), position);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut out: Vec<&Track> = Vec::new();
        for track in self.catalog.iter().filter(eligible) {
            if !last_heard.contains_key(track.id()) && seen.insert(track.id()) {
                out.push(track);
            }
        }

        if out.len() < count {
            let mut heard: Vec<(&str, usize)> = last_heard.into_iter().collect();
            heard.sort_by_key(|&(_, position)| position);

            for (track_id, _) in heard {
                if out.len() >= count {
                    break;
                }
                let Some(track) = self.catalog.get(track_id) else {
                    continue;
                };
                if eligible(&track) && seen.insert(track.id()) {
                    debug!("Re-admitting heard track `{track_id}'.");
                    out.push(track);
                }
            }
        }

        out
    }

    fn explain(&self, candidate: &ScoredTrack<'_>, weights: &EffectiveWeights, context: &ResolvedContext) -> String {
        let track = candidate.track;
        let ratio = self.config.top_weight_ratio;
        let mut clauses: Vec<String> = Vec::new();

        if weights.is_top_genre(track.genre(), ratio) {
            clauses.push(format!("matches your preference for {}", track.genre()));
        }

        let moods: Vec<&str> = track
            .moods()
            .iter()
            .filter(|mood| weights.is_top_mood(**mood, ratio))
            .map(|mood| mood.as_str())
            .collect();
        if !moods.is_empty() {
            clauses.push(format!("fits your {} mood preference", moods.join(", ")));
        }

        if let (Some(ctx), Some(fit)) = (context.known(), candidate.fit) {
            if fit.is_material(self.config.explanation_threshold) {
                clauses.push(format!("suits a {ctx} session"));
            }
        }

        if clauses.is_empty() {
            clauses.push(GENERIC_CLAUSE.to_string());
        }

        let mut explanation = format!("Recommended because it {}", clauses.join(" and "));
        if let ResolvedContext::Unrecognized(label) = context {
            explanation.push_str(&format!(" (context '{label}' not recognized; ignored)"));
        }
        explanation
    }

    /// Record a feedback signal on a profile, checking the track exists.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::UnknownTrack`] when `track_id` is not in
    /// the catalog snapshot.
    pub fn apply_feedback(
        &self,
        profile: &mut UserProfile,
        track_id: &str,
        signal: FeedbackSignal,
    ) -> Result<(), RecommendError> {
        if !self.catalog.contains(track_id) {
            return Err(RecommendError::UnknownTrack(track_id.to_string()));
        }
        profile.record_feedback(track_id, signal);
        Ok(())
    }

    /// Record feedback for a stored user and persist the profile.
    ///
    /// Recording the same signal twice leaves the profile unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::UnknownUser`], [`RecommendError::UnknownTrack`]
    /// or a wrapped store failure.
    pub fn record_feedback<S: ProfileStore + ?Sized>(
        &self,
        store: &mut S,
        user_id: &str,
        track_id: &str,
        signal: FeedbackSignal,
    ) -> Result<UserProfile, RecommendError> {
        let mut profile = store
            .load(user_id)?
            .ok_or_else(|| RecommendError::UnknownUser(user_id.to_string()))?;
        self.apply_feedback(&mut profile, track_id, signal)?;
        store.save(&profile)?;
        info!("Recorded `{signal}' for `{track_id}' by `{user_id}'.");
        Ok(profile)
    }

    /// Append a track to a stored user's listening history.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Recommender::record_feedback`].
    pub fn record_listen<S: ProfileStore + ?Sized>(
        &self,
        store: &mut S,
        user_id: &str,
        track_id: &str,
    ) -> Result<UserProfile, RecommendError> {
        let mut profile = store
            .load(user_id)?
            .ok_or_else(|| RecommendError::UnknownUser(user_id.to_string()))?;
        if !self.catalog.contains(track_id) {
            return Err(RecommendError::UnknownTrack(track_id.to_string()));
        }
        profile.record_listen(track_id);
        store.save(&profile)?;
        info!("Recorded listen of `{track_id}' by `{user_id}'.");
        Ok(profile)
    }
}

/// Adjusted score descending, then popularity descending, then id ascending.
fn rank_order(a: &ScoredTrack<'_>, b: &ScoredTrack<'_>) -> Ordering {
    b.adjusted
        .total_cmp(&a.adjusted)
        .then_with(|| b.track.popularity().total_cmp(&a.track.popularity()))
        .then_with(|| a.track.id().cmp(b.track.id()))
}
