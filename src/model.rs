//! # Data Model
//!
//! Tracks, user profiles and the request/response values exchanged with the
//! recommendation core.
//!
//! Genres and moods are closed enumerations: their order fixes the layout of
//! every feature vector (see [`crate::features`]), so adding a variant grows
//! the vector for tracks and profiles alike.

use crate::error::RecommendError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Default number of recommendations when the caller does not ask for a count.
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 5;

/// Neutral energy preference for a fresh profile.
pub const NEUTRAL_ENERGY: f64 = 0.5;

/// Music genres known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Rock,
    Pop,
    Jazz,
    Classical,
    Electronic,
    HipHop,
    Country,
    Blues,
    Reggae,
    Folk,
}

impl Genre {
    /// Every genre, in feature-vector slot order.
    pub const ALL: [Genre; 10] = [
        Genre::Rock,
        Genre::Pop,
        Genre::Jazz,
        Genre::Classical,
        Genre::Electronic,
        Genre::HipHop,
        Genre::Country,
        Genre::Blues,
        Genre::Reggae,
        Genre::Folk,
    ];

    /// Slot of this genre inside the genre block of a feature vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Genre::Rock => "rock",
            Genre::Pop => "pop",
            Genre::Jazz => "jazz",
            Genre::Classical => "classical",
            Genre::Electronic => "electronic",
            Genre::HipHop => "hip_hop",
            Genre::Country => "country",
            Genre::Blues => "blues",
            Genre::Reggae => "reggae",
            Genre::Folk => "folk",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == normalized)
            .ok_or_else(|| format!("unknown genre `{s}`"))
    }
}

/// Moods a track can carry and a user can prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Energetic,
    Relaxed,
    Happy,
    Melancholic,
    Focused,
    Romantic,
}

impl Mood {
    /// Every mood, in feature-vector slot order.
    pub const ALL: [Mood; 6] = [
        Mood::Energetic,
        Mood::Relaxed,
        Mood::Happy,
        Mood::Melancholic,
        Mood::Focused,
        Mood::Romantic,
    ];

    /// Slot of this mood inside the mood block of a feature vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mood::Energetic => "energetic",
            Mood::Relaxed => "relaxed",
            Mood::Happy => "happy",
            Mood::Melancholic => "melancholic",
            Mood::Focused => "focused",
            Mood::Romantic => "romantic",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == normalized)
            .ok_or_else(|| format!("unknown mood `{s}`"))
    }
}

/// A catalog entry. Immutable once built.
///
/// Energy and popularity are clamped to `[0, 1]` on construction and the
/// mood set is never empty, so every `Track` in circulation is valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    id: String,
    title: String,
    artist: String,
    album: Option<String>,
    genre: Genre,
    moods: BTreeSet<Mood>,
    energy: f64,
    popularity: f64,
    duration_secs: Option<u32>,
    release_year: Option<u16>,
}

impl Track {
    /// Build a validated track.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::InvalidTrackData`] when `moods` is empty or
    /// when energy or popularity is not a number.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        genre: Genre,
        moods: impl IntoIterator<Item = Mood>,
        energy: f64,
        popularity: f64,
    ) -> Result<Self, RecommendError> {
        let id = id.into();
        let moods: BTreeSet<Mood> = moods.into_iter().collect();

        if id.trim().is_empty() {
            return Err(RecommendError::invalid_track(id, "empty identifier"));
        }
        if moods.is_empty() {
            return Err(RecommendError::invalid_track(id, "mood set is empty"));
        }
        if energy.is_nan() || popularity.is_nan() {
            return Err(RecommendError::invalid_track(id, "energy and popularity must be numbers"));
        }

        Ok(Self {
            id,
            title: title.into(),
            artist: artist.into(),
            album: None,
            genre,
            moods,
            energy: energy.clamp(0.0, 1.0),
            popularity: popularity.clamp(0.0, 1.0),
            duration_secs: None,
            release_year: None,
        })
    }

    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    #[must_use]
    pub fn with_duration_secs(mut self, duration_secs: u32) -> Self {
        self.duration_secs = Some(duration_secs);
        self
    }

    #[must_use]
    pub fn with_release_year(mut self, release_year: u16) -> Self {
        self.release_year = Some(release_year);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn moods(&self) -> &BTreeSet<Mood> {
        &self.moods
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn popularity(&self) -> f64 {
        self.popularity
    }

    pub fn duration_secs(&self) -> Option<u32> {
        self.duration_secs
    }

    pub fn release_year(&self) -> Option<u16> {
        self.release_year
    }
}

/// Explicit feedback a user gave on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSignal {
    Liked,
    Disliked,
}

impl FeedbackSignal {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FeedbackSignal::Liked => "liked",
            FeedbackSignal::Disliked => "disliked",
        }
    }
}

impl fmt::Display for FeedbackSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackSignal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "liked" | "like" => Ok(FeedbackSignal::Liked),
            "disliked" | "dislike" => Ok(FeedbackSignal::Disliked),
            other => Err(format!("unknown feedback signal `{other}` (use liked or disliked)")),
        }
    }
}

/// A user's stated taste plus what they have heard and rated.
///
/// Derived weights are never stored here; the profile stays the single
/// source of truth and [`crate::feedback`] recomputes them per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub preferred_genres: BTreeSet<Genre>,
    #[serde(default)]
    pub preferred_moods: BTreeSet<Mood>,
    #[serde(default = "neutral_energy", deserialize_with = "deserialize_energy")]
    pub energy_preference: f64,
    /// Chronological, append-only.
    #[serde(default)]
    pub listening_history: Vec<String>,
    /// At most one signal per track; the latest one wins.
    #[serde(default)]
    pub feedback: BTreeMap<String, FeedbackSignal>,
    #[serde(default)]
    pub age_range: Option<String>,
}

fn neutral_energy() -> f64 {
    NEUTRAL_ENERGY
}

fn clamp_energy(energy: f64) -> f64 {
    if energy.is_nan() {
        NEUTRAL_ENERGY
    } else {
        energy.clamp(0.0, 1.0)
    }
}

/// Stored profiles get the same `[0, 1]` clamp as the builder.
fn deserialize_energy<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_energy)
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            preferred_genres: BTreeSet::new(),
            preferred_moods: BTreeSet::new(),
            energy_preference: NEUTRAL_ENERGY,
            listening_history: Vec::new(),
            feedback: BTreeMap::new(),
            age_range: None,
        }
    }

    #[must_use]
    pub fn with_genres(mut self, genres: impl IntoIterator<Item = Genre>) -> Self {
        self.preferred_genres = genres.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_moods(mut self, moods: impl IntoIterator<Item = Mood>) -> Self {
        self.preferred_moods = moods.into_iter().collect();
        self
    }

    /// Set the energy preference, clamped to `[0, 1]`. NaN falls back to neutral.
    #[must_use]
    pub fn with_energy_preference(mut self, energy: f64) -> Self {
        self.energy_preference = clamp_energy(energy);
        self
    }

    #[must_use]
    pub fn with_age_range(mut self, age_range: impl Into<String>) -> Self {
        self.age_range = Some(age_range.into());
        self
    }

    /// Append a track to the listening history.
    pub fn record_listen(&mut self, track_id: impl Into<String>) {
        self.listening_history.push(track_id.into());
    }

    /// Record (or overwrite) the feedback for a track. Idempotent.
    pub fn record_feedback(&mut self, track_id: impl Into<String>, signal: FeedbackSignal) {
        self.feedback.insert(track_id.into(), signal);
    }

    #[must_use]
    pub fn has_heard(&self, track_id: &str) -> bool {
        self.listening_history.iter().any(|heard| heard == track_id)
    }

    #[must_use]
    pub fn is_disliked(&self, track_id: &str) -> bool {
        self.feedback.get(track_id) == Some(&FeedbackSignal::Disliked)
    }
}

/// What the caller asks the core for.
#[derive(Debug, Clone)]
pub struct RecommendationRequest<'a> {
    pub profile: &'a UserProfile,
    pub count: usize,
    /// Free-form label; unknown labels degrade to no context.
    pub context: Option<String>,
    /// Skip tracks already in the listening history (default `true`).
    pub exclude_recent: bool,
}

impl<'a> RecommendationRequest<'a> {
    pub fn new(profile: &'a UserProfile) -> Self {
        Self {
            profile,
            count: DEFAULT_RECOMMENDATION_COUNT,
            context: None,
            exclude_recent: true,
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn including_heard(mut self) -> Self {
        self.exclude_recent = false;
        self
    }
}

/// One ranked entry of a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationItem {
    pub track: Track,
    /// Final adjusted score, in `[0, 1]`.
    pub confidence: f64,
    /// 1-based position in the response.
    pub rank: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub user_id: String,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<RecommendationItem>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> Track {
        Track::new("t1", "Song", "Band", Genre::Rock, [Mood::Happy], 0.5, 0.5).unwrap()
    }

    #[test]
    fn test_track_clamps_energy_and_popularity() {
        let track = Track::new("t1", "Loud", "Band", Genre::Rock, [Mood::Energetic], 1.7, -0.3).unwrap();
        assert_eq!(track.energy(), 1.0);
        assert_eq!(track.popularity(), 0.0);
    }

    #[test]
    fn test_track_rejects_empty_moods() {
        let err = Track::new("t1", "Silent", "Band", Genre::Jazz, Vec::<Mood>::new(), 0.5, 0.5).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidTrackData { .. }));
    }

    #[test]
    fn test_track_rejects_nan_features() {
        let err = Track::new("t1", "Odd", "Band", Genre::Jazz, [Mood::Happy], f64::NAN, 0.5).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidTrackData { .. }));
    }

    #[test]
    fn test_track_optional_attributes() {
        let track = sample_track()
            .with_album("Record")
            .with_duration_secs(210)
            .with_release_year(1999);
        assert_eq!(track.album(), Some("Record"));
        assert_eq!(track.duration_secs(), Some(210));
        assert_eq!(track.release_year(), Some(1999));
    }

    #[test]
    fn test_genre_parsing_accepts_aliases() {
        assert_eq!("Rock".parse::<Genre>(), Ok(Genre::Rock));
        assert_eq!("hip-hop".parse::<Genre>(), Ok(Genre::HipHop));
        assert_eq!("hip hop".parse::<Genre>(), Ok(Genre::HipHop));
        assert!("polka".parse::<Genre>().is_err());
    }

    #[test]
    fn test_enum_indices_follow_slot_order() {
        for (i, genre) in Genre::ALL.iter().enumerate() {
            assert_eq!(genre.index(), i);
        }
        for (i, mood) in Mood::ALL.iter().enumerate() {
            assert_eq!(mood.index(), i);
        }
    }

    #[test]
    fn test_feedback_latest_signal_wins() {
        let mut profile = UserProfile::new("u1");
        profile.record_feedback("t1", FeedbackSignal::Liked);
        profile.record_feedback("t1", FeedbackSignal::Disliked);

        assert_eq!(profile.feedback.len(), 1);
        assert!(profile.is_disliked("t1"));
    }

    #[test]
    fn test_profile_energy_clamped() {
        assert_eq!(UserProfile::new("u").with_energy_preference(3.0).energy_preference, 1.0);
        assert_eq!(
            UserProfile::new("u").with_energy_preference(f64::NAN).energy_preference,
            NEUTRAL_ENERGY
        );
    }

    #[test]
    fn test_request_defaults() {
        let profile = UserProfile::new("u1");
        let request = RecommendationRequest::new(&profile);
        assert_eq!(request.count, DEFAULT_RECOMMENDATION_COUNT);
        assert!(request.context.is_none());
        assert!(request.exclude_recent);
    }

    #[test]
    fn test_profile_json_defaults() {
        let profile: UserProfile = serde_json::from_str(r#"{"user_id": "u1"}"#).unwrap();
        assert_eq!(profile.energy_preference, NEUTRAL_ENERGY);
        assert!(profile.preferred_genres.is_empty());
        assert!(profile.feedback.is_empty());
    }

    #[test]
    fn test_profile_json_energy_clamped() {
        let high: UserProfile = serde_json::from_str(r#"{"user_id": "x", "energy_preference": 7.0}"#).unwrap();
        assert_eq!(high.energy_preference, 1.0);
        let low: UserProfile = serde_json::from_str(r#"{"user_id": "x", "energy_preference": -0.4}"#).unwrap();
        assert_eq!(low.energy_preference, 0.0);
        let inside: UserProfile = serde_json::from_str(r#"{"user_id": "x", "energy_preference": 0.35}"#).unwrap();
        assert_eq!(inside.energy_preference, 0.35);
    }
}
