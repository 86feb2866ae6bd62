//! Terminal rendering of responses, profiles and catalog figures.
//!
//! Every function returns a `String`; `main` decides where it goes.

use crate::catalog::{Catalog, CatalogStats};
use crate::model::{RecommendationResponse, Track, UserProfile};
use std::fmt::Write;

const RULE: &str = "═══════════════════════════════";

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{RULE}");
}

fn track_line(track: &Track) -> String {
    let mut line = format!("{} - {}", track.artist(), track.title());
    if let Some(year) = track.release_year() {
        let _ = write!(line, " ({year})");
    }
    line
}

fn duration(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn join<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    let parts: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

#[must_use]
pub fn format_recommendations(response: &RecommendationResponse, context: Option<&str>) -> String {
    let mut out = String::new();
    let title = match context {
        Some(context) => format!("🎵 Recommendations for {} ({context})", response.user_id),
        None => format!("🎵 Recommendations for {}", response.user_id),
    };
    heading(&mut out, &title);

    if response.items.is_empty() {
        let _ = writeln!(out, "No tracks to recommend.");
        return out;
    }

    for item in &response.items {
        let track = &item.track;
        let _ = writeln!(out, "{:>2}. {}", item.rank, track_line(track));
        let _ = writeln!(
            out,
            "    {} | {} | confidence {:.3}",
            track.genre(),
            join(track.moods()),
            item.confidence
        );
        let _ = writeln!(out, "    {}", item.explanation);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} recommendations generated at {}",
        response.total,
        response.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out
}

#[must_use]
pub fn format_profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    heading(&mut out, &format!("👤 Profile {}", profile.user_id));
    let _ = writeln!(out, "Genres:  {}", join(&profile.preferred_genres));
    let _ = writeln!(out, "Moods:   {}", join(&profile.preferred_moods));
    let _ = writeln!(out, "Energy:  {:.2}", profile.energy_preference);
    if let Some(age_range) = &profile.age_range {
        let _ = writeln!(out, "Age:     {age_range}");
    }
    let _ = writeln!(out, "Heard:   {} plays", profile.listening_history.len());
    for (track_id, signal) in &profile.feedback {
        let _ = writeln!(out, "  {signal}: {track_id}");
    }
    out
}

#[must_use]
pub fn format_stats(stats: &CatalogStats, total_users: usize) -> String {
    let mut out = String::new();
    heading(&mut out, "📊 Catalog Statistics");
    let _ = writeln!(out, "Total tracks:       {}", stats.total_tracks);
    let _ = writeln!(out, "Total users:        {total_users}");
    let _ = writeln!(out, "Average popularity: {:.3}", stats.average_popularity);
    let _ = writeln!(out, "Average energy:     {:.3}", stats.average_energy);
    let _ = writeln!(out);
    let _ = writeln!(out, "Genre distribution:");
    for (genre, count) in &stats.genre_distribution {
        let _ = writeln!(out, "  {:<12} {count}", genre.as_str());
    }
    out
}

#[must_use]
pub fn format_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    heading(&mut out, &format!("💿 Catalog ({} tracks)", catalog.len()));
    for track in catalog.iter() {
        let length = track.duration_secs().map(duration).unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<10} {:<50} {:<11} energy {:.2}  popularity {:.2}  {length}",
            track.id(),
            track_line(track),
            track.genre().as_str(),
            track.energy(),
            track.popularity()
        );
    }
    out
}
