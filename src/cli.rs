//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `tastemaker` binary.
//!
//! ## Commands
//!
//! - `recommend`: Rank the catalog for a user, optionally for a context
//! - `feedback`: Record a liked/disliked signal for a track
//! - `listen`: Append a track to a user's listening history
//! - `profile`: Create, show and list user profiles
//! - `init`: Seed the profile store with the sample users
//! - `stats` / `list`: Inspect the catalog
//!
//! ## Examples
//!
//! ```bash
//! tastemaker init
//! tastemaker recommend --user user_001 --context workout
//! tastemaker feedback user_001 track_009 liked
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
///
/// Global options locate the profile database and the scoring config; every
/// piece of functionality lives in a subcommand.
#[derive(Parser, Debug)]
#[command(name = "tastemaker")]
#[command(about = "Tastemaker: explained music recommendations from your taste and your moment")]
#[command(version)]
pub struct Args {
    /// Scoring config file (JSON)
    ///
    /// Defaults to `config.json` in the data directory. A missing file means
    /// built-in defaults.
    #[arg(long, global = true, env = "TASTEMAKER_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Profile database file (SQLite)
    ///
    /// Defaults to `profiles.db` in the data directory.
    #[arg(long, global = true, env = "TASTEMAKER_DB", value_hint = clap::ValueHint::FilePath)]
    pub db: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recommend tracks for a user
    ///
    /// Scores every eligible catalog track against the user's taste profile,
    /// optionally re-weighted for a listening context, and prints a ranked,
    /// explained list. Tracks already heard are skipped unless too few
    /// remain.
    ///
    /// Contexts: workout, study, party, romantic, chill
    Recommend {
        /// User identifier
        #[arg(short, long, value_hint = clap::ValueHint::Other)]
        user: String,

        /// Listening context
        ///
        /// Unrecognized labels are reported and ignored.
        #[arg(short, long)]
        context: Option<String>,

        /// Number of recommendations
        ///
        /// Defaults to `default_count` from the scoring config.
        #[arg(short, long)]
        num: Option<usize>,

        /// Let already heard tracks compete with new ones
        #[arg(long)]
        include_heard: bool,

        /// Catalog file (JSON array of tracks)
        ///
        /// Defaults to the built-in sample catalog.
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        catalog: Option<PathBuf>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record feedback on a track
    ///
    /// Liked tracks pull the user's genre and mood weights towards them,
    /// disliked tracks push them away and are never recommended again.
    Feedback {
        /// User identifier
        user: String,

        /// Track identifier
        track: String,

        /// `liked` or `disliked`
        signal: String,

        /// Catalog file the track belongs to
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },

    /// Record that a user listened to a track
    Listen {
        /// User identifier
        user: String,

        /// Track identifier
        track: String,

        /// Catalog file the track belongs to
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },

    /// Manage user profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Seed the profile store with the sample users
    ///
    /// Existing profiles with the same identifiers are left alone unless
    /// `--force` is given.
    Init {
        /// Overwrite existing sample profiles
        #[arg(long)]
        force: bool,
    },

    /// Show catalog statistics
    ///
    /// Track count, genre distribution, average popularity and energy.
    Stats {
        /// Catalog file (JSON array of tracks)
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },

    /// List all tracks in the catalog
    List {
        /// Catalog file (JSON array of tracks)
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },

    /// Generate shell completions
    ///
    /// Usage: tastemaker completion bash > ~/.local/share/bash-completion/completions/tastemaker
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },

    /// List stored user identifiers for completion (hidden command)
    #[command(hide = true)]
    CompleteUsers,
}

/// Profile management actions
#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Create or replace a profile
    Add {
        /// User identifier
        #[arg(short, long)]
        user: String,

        /// Preferred genres, comma separated
        ///
        /// rock, pop, jazz, classical, electronic, hip_hop, country, blues,
        /// reggae, folk
        #[arg(short, long, value_delimiter = ',')]
        genres: Vec<String>,

        /// Preferred moods, comma separated
        ///
        /// energetic, relaxed, happy, melancholic, focused, romantic
        #[arg(short, long, value_delimiter = ',')]
        moods: Vec<String>,

        /// Preferred energy level in [0, 1]
        #[arg(short, long, default_value_t = crate::model::NEUTRAL_ENERGY)]
        energy: f64,

        /// Age range label, e.g. "25-35"
        #[arg(long)]
        age_range: Option<String>,
    },

    /// Show a stored profile
    Show {
        /// User identifier
        user: String,
    },

    /// List stored user identifiers
    List,
}
