//! # Catalog Module
//!
//! Read-only snapshot of validated tracks, plus the JSON loader that builds
//! one. Validation happens eagerly: a single bad record rejects the whole
//! file, so the core never sees a partial catalog.
//!
//! ## File Format
//!
//! ```json
//! [
//!   {
//!     "id": "track_001",
//!     "title": "Bohemian Rhapsody",
//!     "artist": "Queen",
//!     "album": "A Night at the Opera",
//!     "genre": "rock",
//!     "moods": ["energetic", "happy"],
//!     "energy": 0.8,
//!     "popularity": 0.95,
//!     "duration_secs": 355,
//!     "release_year": 1975
//!   }
//! ]
//! ```

use crate::error::RecommendError;
use crate::model::{Genre, Mood, Track};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Ordered collection of unique tracks with lookup by identifier.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::InvalidTrackData`] on a duplicate identifier.
    pub fn new(tracks: Vec<Track>) -> Result<Self, RecommendError> {
        let mut index = HashMap::with_capacity(tracks.len());
        for (position, track) in tracks.iter().enumerate() {
            if index.insert(track.id().to_string(), position).is_some() {
                return Err(RecommendError::invalid_track(track.id(), "duplicate track identifier"));
            }
        }
        Ok(Self { tracks, index })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate raw records into a catalog. Fails on the first bad record.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::InvalidTrackData`] for unknown genres or
    /// moods, empty mood lists, non-numeric features or duplicate ids.
    pub fn from_records(records: Vec<TrackRecord>) -> Result<Self, RecommendError> {
        let tracks = records
            .into_iter()
            .map(TrackRecord::into_track)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tracks)
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.index.get(id).map(|&position| &self.tracks[position])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Summary figures for the `stats` command.
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        let mut genre_distribution: BTreeMap<Genre, usize> = Genre::ALL.iter().map(|g| (*g, 0)).collect();
        for track in &self.tracks {
            *genre_distribution.entry(track.genre()).or_insert(0) += 1;
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = |f: fn(&Track) -> f64| match self.tracks.len() {
            0 => 0.0,
            n => self.tracks.iter().map(f).sum::<f64>() / n as f64,
        };

        CatalogStats {
            total_tracks: self.tracks.len(),
            genre_distribution,
            average_popularity: mean(Track::popularity),
            average_energy: mean(Track::energy),
        }
    }
}

/// Aggregate view of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total_tracks: usize,
    /// Every genre, including those with no tracks.
    pub genre_distribution: BTreeMap<Genre, usize>,
    pub average_popularity: f64,
    pub average_energy: f64,
}

/// Unvalidated track as it appears on disk. Enumerated fields stay strings
/// so that a bad value is reported against its track id.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    pub genre: String,
    #[serde(default)]
    pub moods: Vec<String>,
    pub energy: f64,
    pub popularity: f64,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub release_year: Option<u16>,
}

impl TrackRecord {
    /// # Errors
    ///
    /// Returns [`RecommendError::InvalidTrackData`] when any field is invalid.
    pub fn into_track(self) -> Result<Track, RecommendError> {
        let genre: Genre = self
            .genre
            .parse()
            .map_err(|reason: String| RecommendError::invalid_track(&self.id, reason))?;
        let moods = self
            .moods
            .iter()
            .map(|m| m.parse::<Mood>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| RecommendError::invalid_track(&self.id, reason))?;

        let mut track = Track::new(self.id, self.title, self.artist, genre, moods, self.energy, self.popularity)?;
        if let Some(album) = self.album {
            track = track.with_album(album);
        }
        if let Some(duration) = self.duration_secs {
            track = track.with_duration_secs(duration);
        }
        if let Some(year) = self.release_year {
            track = track.with_release_year(year);
        }
        Ok(track)
    }
}

/// Parse a catalog from a JSON array of track records.
///
/// # Errors
///
/// Fails on malformed JSON or on the first invalid record.
pub fn parse_catalog(json: &str) -> Result<Catalog> {
    let records: Vec<TrackRecord> = serde_json::from_str(json).context("Catalog is not a JSON array of tracks")?;
    debug!("Parsed {} raw track records.", records.len());
    Ok(Catalog::from_records(records)?)
}

/// Load and validate a catalog file.
///
/// # Errors
///
/// Fails when the file cannot be read, is not valid JSON, or contains an
/// invalid record.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    let catalog = parse_catalog(&json).with_context(|| format!("Invalid catalog file {}", path.display()))?;
    info!("Loaded {} tracks from {}", catalog.len(), path.display());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"[
        {"id": "a", "title": "A", "artist": "X", "genre": "rock", "moods": ["energetic"], "energy": 0.9, "popularity": 0.8},
        {"id": "b", "title": "B", "artist": "Y", "album": "Z", "genre": "hip-hop", "moods": ["Focused", "happy"],
         "energy": 1.4, "popularity": 0.4, "duration_secs": 200, "release_year": 2002}
    ]"#;

    fn invalid_track_reason(err: &anyhow::Error) -> Option<String> {
        err.chain().find_map(|cause| match cause.downcast_ref::<RecommendError>() {
            Some(RecommendError::InvalidTrackData { reason, .. }) => Some(reason.clone()),
            _ => None,
        })
    }

    #[test]
    fn test_parse_valid_catalog() {
        let catalog = parse_catalog(VALID).unwrap();
        assert_eq!(catalog.len(), 2);

        let b = catalog.get("b").unwrap();
        assert_eq!(b.genre(), Genre::HipHop);
        assert_eq!(b.energy(), 1.0);
        assert_eq!(b.album(), Some("Z"));
        assert_eq!(b.release_year(), Some(2002));
        assert_eq!(catalog.tracks()[0].id(), "a");
    }

    #[test]
    fn test_unknown_genre_rejects_catalog() {
        let json = r#"[{"id": "a", "title": "A", "artist": "X", "genre": "polka", "moods": ["happy"], "energy": 0.5, "popularity": 0.5}]"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(invalid_track_reason(&err).unwrap().contains("polka"));
    }

    #[test]
    fn test_unknown_mood_rejects_catalog() {
        let json = r#"[{"id": "a", "title": "A", "artist": "X", "genre": "pop", "moods": ["angry"], "energy": 0.5, "popularity": 0.5}]"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(invalid_track_reason(&err).unwrap().contains("angry"));
    }

    #[test]
    fn test_empty_moods_rejects_catalog() {
        let json = r#"[{"id": "a", "title": "A", "artist": "X", "genre": "pop", "moods": [], "energy": 0.5, "popularity": 0.5}]"#;
        assert!(invalid_track_reason(&parse_catalog(json).unwrap_err()).is_some());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let track = Track::new("a", "A", "X", Genre::Pop, [Mood::Happy], 0.5, 0.5).unwrap();
        let err = Catalog::new(vec![track.clone(), track]).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidTrackData { .. }));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_catalog("{not json").is_err());
    }

    #[test]
    fn test_stats() {
        let stats = parse_catalog(VALID).unwrap().stats();
        assert_eq!(stats.total_tracks, 2);
        assert_eq!(stats.genre_distribution.len(), Genre::ALL.len());
        assert_eq!(stats.genre_distribution[&Genre::Rock], 1);
        assert_eq!(stats.genre_distribution[&Genre::Jazz], 0);
        assert!((stats.average_popularity - 0.6).abs() < 1e-12);
        assert!((stats.average_energy - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_stats_of_empty_catalog() {
        let stats = Catalog::empty().stats();
        assert_eq!(stats.total_tracks, 0);
        assert_eq!(stats.average_energy, 0.0);
    }

    #[test]
    fn test_load_catalog_from_file() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("catalog.json");
        fs::write(&path, VALID)?;

        let catalog = load_catalog(&path)?;
        assert!(catalog.contains("a"));
        assert!(!catalog.contains("c"));

        assert!(load_catalog(&dir.path().join("missing.json")).is_err());
        Ok(())
    }
}
