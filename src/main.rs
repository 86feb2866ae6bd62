//! # Tastemaker
//!
//! Recommends tracks from a catalog by matching them against a user's taste
//! profile and, optionally, a listening context. Profiles live in a SQLite
//! database in the platform data directory.
//!
//! ## Usage
//!
//! ```bash
//! # Seed the sample users
//! tastemaker init
//!
//! # Recommendations, plain and for a context
//! tastemaker recommend --user user_001
//! tastemaker recommend --user user_002 --context study -n 3
//!
//! # Teach it
//! tastemaker feedback user_001 track_009 disliked
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use std::path::Path;
use tastemaker::catalog::{self, Catalog};
use tastemaker::cli::{self, ProfileAction};
use tastemaker::config::RuntimeConfig;
use tastemaker::engine::Recommender;
use tastemaker::error::RecommendError;
use tastemaker::model::{FeedbackSignal, Genre, Mood, RecommendationRequest, UserProfile};
use tastemaker::store::{ProfileStore, SqliteProfileStore};
use tastemaker::{completion, display, sample_data};

/// The catalog at `path`, or the built-in sample catalog.
fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => catalog::load_catalog(path),
        None => {
            debug!("Using the built-in sample catalog");
            Ok(sample_data::sample_catalog()?)
        }
    }
}

fn open_store(runtime: &RuntimeConfig) -> Result<SqliteProfileStore> {
    SqliteProfileStore::open(&runtime.db_path)
        .with_context(|| format!("Failed to open profile database {}", runtime.db_path.display()))
}

fn load_profile(store: &SqliteProfileStore, user: &str) -> Result<UserProfile> {
    store
        .load(user)?
        .ok_or_else(|| RecommendError::UnknownUser(user.to_string()))
        .context("Create the profile with `tastemaker profile add` or seed samples with `tastemaker init`")
}

fn parse_all<T>(values: &[String]) -> Result<Vec<T>>
where
    T: std::str::FromStr<Err = String>,
{
    values
        .iter()
        .map(|v| v.parse::<T>().map_err(anyhow::Error::msg))
        .collect()
}

/// Main entry point for the Tastemaker application.
///
/// Initializes logging, resolves configuration, and routes commands. Logging
/// is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug tastemaker recommend --user u` - Pipeline decisions
/// - `RUST_LOG=tastemaker::engine=trace tastemaker recommend --user u` - Per-track scores
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    // Completion never touches the data directory
    if let cli::Command::Completion { shell } = &args.command {
        let mut cmd = cli::Args::command();
        completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        return Ok(());
    }

    let runtime = RuntimeConfig::resolve(args.db, args.config)?;
    debug!("Profile database: {}", runtime.db_path.display());

    match args.command {
        cli::Command::Recommend { user, context, num, include_heard, catalog, json } => {
            let engine = Recommender::new(load_catalog(catalog.as_deref())?, runtime.scoring.clone());
            let store = open_store(&runtime)?;
            let profile = load_profile(&store, &user)?;

            let mut request = RecommendationRequest::new(&profile).with_count(num.unwrap_or(runtime.scoring.default_count));
            if let Some(context) = &context {
                request = request.with_context(context.as_str());
            }
            if include_heard {
                request = request.including_heard();
            }

            info!("Recommending for {user}");
            let response = engine.get_recommendations(&request);
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", display::format_recommendations(&response, context.as_deref()));
            }
        }
        cli::Command::Feedback { user, track, signal, catalog } => {
            let signal = signal.parse::<FeedbackSignal>().map_err(anyhow::Error::msg)?;
            let engine = Recommender::new(load_catalog(catalog.as_deref())?, runtime.scoring.clone());
            let mut store = open_store(&runtime)?;
            engine.record_feedback(&mut store, &user, &track, signal)?;
            println!("Recorded: {user} {signal} {track}");
        }
        cli::Command::Listen { user, track, catalog } => {
            let engine = Recommender::new(load_catalog(catalog.as_deref())?, runtime.scoring.clone());
            let mut store = open_store(&runtime)?;
            let profile = engine.record_listen(&mut store, &user, &track)?;
            println!("Recorded listen: {user} -> {track} ({} plays)", profile.listening_history.len());
        }
        cli::Command::Profile { action } => {
            let mut store = open_store(&runtime)?;
            match action {
                ProfileAction::Add { user, genres, moods, energy, age_range } => {
                    if !(0.0..=1.0).contains(&energy) {
                        anyhow::bail!("Energy preference must be between 0 and 1, got {energy}");
                    }
                    let mut profile = UserProfile::new(user.as_str())
                        .with_genres(parse_all::<Genre>(&genres)?)
                        .with_moods(parse_all::<Mood>(&moods)?)
                        .with_energy_preference(energy);
                    if let Some(age_range) = age_range {
                        profile = profile.with_age_range(age_range);
                    }
                    if store.load(&user)?.is_some() {
                        info!("Replacing existing profile {user}");
                    }
                    store.save(&profile)?;
                    print!("{}", display::format_profile(&profile));
                }
                ProfileAction::Show { user } => {
                    let profile = load_profile(&store, &user)?;
                    print!("{}", display::format_profile(&profile));
                }
                ProfileAction::List => {
                    for user in store.user_ids()? {
                        println!("{user}");
                    }
                }
            }
        }
        cli::Command::Init { force } => {
            let mut store = open_store(&runtime)?;
            for profile in sample_data::sample_users() {
                if !force && store.load(&profile.user_id)?.is_some() {
                    println!("Keeping existing profile {}", profile.user_id);
                    continue;
                }
                store.save(&profile)?;
                println!("Saved sample profile {}", profile.user_id);
            }
            info!("Sample profiles stored in {}", runtime.db_path.display());
        }
        cli::Command::Stats { catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let total_users = open_store(&runtime)?.user_ids()?.len();
            print!("{}", display::format_stats(&catalog.stats(), total_users));
        }
        cli::Command::List { catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            print!("{}", display::format_catalog(&catalog));
        }
        cli::Command::CompleteUsers => {
            completion::print_user_completions(&runtime.db_path)?;
        }
        cli::Command::Completion { .. } => {}
    }

    Ok(())
}
