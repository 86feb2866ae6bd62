//! Built-in catalog and users so the CLI works without any input files.

use crate::catalog::Catalog;
use crate::error::RecommendError;
use crate::model::{FeedbackSignal, Genre, Mood, Track, UserProfile};

struct SampleTrack {
    id: &'static str,
    title: &'static str,
    artist: &'static str,
    album: &'static str,
    genre: Genre,
    moods: &'static [Mood],
    energy: f64,
    popularity: f64,
    duration_secs: u32,
    release_year: u16,
}

const SAMPLE_TRACKS: [SampleTrack; 10] = [
    SampleTrack {
        id: "track_001",
        title: "Bohemian Rhapsody",
        artist: "Queen",
        album: "A Night at the Opera",
        genre: Genre::Rock,
        moods: &[Mood::Energetic, Mood::Happy],
        energy: 0.8,
        popularity: 0.95,
        duration_secs: 355,
        release_year: 1975,
    },
    SampleTrack {
        id: "track_002",
        title: "Shape of You",
        artist: "Ed Sheeran",
        album: "÷ (Divide)",
        genre: Genre::Pop,
        moods: &[Mood::Happy, Mood::Romantic],
        energy: 0.7,
        popularity: 0.92,
        duration_secs: 233,
        release_year: 2017,
    },
    SampleTrack {
        id: "track_003",
        title: "Take Five",
        artist: "Dave Brubeck",
        album: "Time Out",
        genre: Genre::Jazz,
        moods: &[Mood::Relaxed, Mood::Focused],
        energy: 0.4,
        popularity: 0.75,
        duration_secs: 324,
        release_year: 1959,
    },
    SampleTrack {
        id: "track_004",
        title: "Clair de Lune",
        artist: "Claude Debussy",
        album: "Suite Bergamasque",
        genre: Genre::Classical,
        moods: &[Mood::Relaxed, Mood::Romantic],
        energy: 0.2,
        popularity: 0.82,
        duration_secs: 300,
        release_year: 1905,
    },
    SampleTrack {
        id: "track_005",
        title: "Strobe",
        artist: "Deadmau5",
        album: "For Lack of a Better Name",
        genre: Genre::Electronic,
        moods: &[Mood::Energetic, Mood::Focused],
        energy: 0.9,
        popularity: 0.78,
        duration_secs: 645,
        release_year: 2009,
    },
    SampleTrack {
        id: "track_006",
        title: "Lose Yourself",
        artist: "Eminem",
        album: "8 Mile Soundtrack",
        genre: Genre::HipHop,
        moods: &[Mood::Energetic, Mood::Focused],
        energy: 0.85,
        popularity: 0.88,
        duration_secs: 326,
        release_year: 2002,
    },
    SampleTrack {
        id: "track_007",
        title: "The Sound of Silence",
        artist: "Simon & Garfunkel",
        album: "Sounds of Silence",
        genre: Genre::Folk,
        moods: &[Mood::Melancholic, Mood::Relaxed],
        energy: 0.3,
        popularity: 0.85,
        duration_secs: 204,
        release_year: 1965,
    },
    SampleTrack {
        id: "track_008",
        title: "Sweet Child O' Mine",
        artist: "Guns N' Roses",
        album: "Appetite for Destruction",
        genre: Genre::Rock,
        moods: &[Mood::Energetic, Mood::Happy],
        energy: 0.9,
        popularity: 0.91,
        duration_secs: 356,
        release_year: 1987,
    },
    SampleTrack {
        id: "track_009",
        title: "Hotel California",
        artist: "Eagles",
        album: "Hotel California",
        genre: Genre::Rock,
        moods: &[Mood::Melancholic, Mood::Relaxed],
        energy: 0.6,
        popularity: 0.93,
        duration_secs: 391,
        release_year: 1976,
    },
    SampleTrack {
        id: "track_010",
        title: "Blinding Lights",
        artist: "The Weeknd",
        album: "After Hours",
        genre: Genre::Pop,
        moods: &[Mood::Energetic, Mood::Happy],
        energy: 0.8,
        popularity: 0.96,
        duration_secs: 200,
        release_year: 2019,
    },
];

/// The ten built-in tracks.
///
/// # Errors
///
/// Only fails if the built-in table itself is inconsistent.
pub fn sample_catalog() -> Result<Catalog, RecommendError> {
    let tracks = SAMPLE_TRACKS
        .iter()
        .map(|s| {
            Track::new(s.id, s.title, s.artist, s.genre, s.moods.iter().copied(), s.energy, s.popularity).map(|t| {
                t.with_album(s.album)
                    .with_duration_secs(s.duration_secs)
                    .with_release_year(s.release_year)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Catalog::new(tracks)
}

/// Three users with distinct tastes, histories and one dislike each for two
/// of them.
#[must_use]
pub fn sample_users() -> Vec<UserProfile> {
    let mut rock_fan = UserProfile::new("user_001")
        .with_genres([Genre::Rock, Genre::Pop])
        .with_moods([Mood::Energetic, Mood::Happy])
        .with_energy_preference(0.8)
        .with_age_range("25-35");
    rock_fan.record_listen("track_001");
    rock_fan.record_listen("track_008");

    let mut jazz_fan = UserProfile::new("user_002")
        .with_genres([Genre::Jazz, Genre::Classical])
        .with_moods([Mood::Relaxed, Mood::Focused])
        .with_energy_preference(0.3)
        .with_age_range("35-50");
    jazz_fan.record_listen("track_003");
    jazz_fan.record_listen("track_004");
    jazz_fan.record_feedback("track_005", FeedbackSignal::Disliked);

    let mut club_fan = UserProfile::new("user_003")
        .with_genres([Genre::Electronic, Genre::HipHop])
        .with_moods([Mood::Energetic, Mood::Focused])
        .with_energy_preference(0.9)
        .with_age_range("18-25");
    club_fan.record_listen("track_005");
    club_fan.record_listen("track_006");
    club_fan.record_feedback("track_007", FeedbackSignal::Disliked);

    vec![rock_fan, jazz_fan, club_fan]
}
