//! Explained music recommendations from a taste profile and a listening
//! context.
//!
//! Core modules:
//! - [`features`] - Track and profile feature vectors
//! - [`similarity`] - Cosine similarity scoring
//! - [`context`] - Situational re-weighting
//! - [`feedback`] - Effective preference weights from liked/disliked tracks
//! - [`engine`] - Candidate selection, ranking and explanations
//!
//! ### Supporting Modules
//!
//! - [`model`] - Tracks, profiles, requests and responses
//! - [`catalog`] - Validated track catalog and its JSON loader
//! - [`store`] - Profile persistence (in-memory and SQLite)
//! - [`config`] - Data directory and scoring parameters
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`display`] - Terminal formatting
//! - [`sample_data`] - Built-in catalog and users
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use tastemaker::config::ScoringConfig;
//! use tastemaker::engine::Recommender;
//! use tastemaker::model::{Genre, Mood, RecommendationRequest, UserProfile};
//! use tastemaker::sample_data;
//!
//! let engine = Recommender::new(sample_data::sample_catalog()?, ScoringConfig::default());
//! let profile = UserProfile::new("me")
//!     .with_genres([Genre::Rock])
//!     .with_moods([Mood::Energetic])
//!     .with_energy_preference(0.8);
//!
//! let request = RecommendationRequest::new(&profile).with_context("workout").with_count(3);
//! for item in engine.get_recommendations(&request).items {
//!     println!("{}. {} ({:.2}): {}", item.rank, item.track.title(), item.confidence, item.explanation);
//! }
//! # Ok::<(), tastemaker::error::RecommendError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod context;
pub mod display;
pub mod engine;
pub mod error;
pub mod features;
pub mod feedback;
pub mod model;
pub mod sample_data;
pub mod similarity;
pub mod store;
