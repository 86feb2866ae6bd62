//! Profile persistence behind the [`ProfileStore`] trait.
//!
//! The scoring core only needs load/save by user id; the CLI persists
//! profiles in SQLite between runs, tests use the in-memory store.

use crate::error::StoreError;
use crate::model::{FeedbackSignal, Genre, Mood, UserProfile};
use log::{debug, trace};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;

/// Read/write access to user profiles by identifier.
pub trait ProfileStore {
    /// Fetch a profile, `None` when the user is unknown.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    fn load(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Insert or fully replace a profile.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError>;

    /// All known user ids, sorted.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend fails.
    fn user_ids(&self) -> Result<Vec<String>, StoreError>;
}

/// Profiles held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profiles: BTreeMap<String, UserProfile>,
}

impl MemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.user_id.clone(), p)).collect(),
        }
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.get(user_id).cloned())
    }

    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        self.profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    fn user_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.profiles.keys().cloned().collect())
    }
}

/// Profiles persisted in a SQLite database.
pub struct SqliteProfileStore {
    conn: Connection,
}

impl SqliteProfileStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] when the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        debug!("Opening profile store at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    /// In-memory database, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] when the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS profile (
                user_id           TEXT PRIMARY KEY,
                energy_preference REAL NOT NULL,
                age_range         TEXT
            );
            CREATE TABLE IF NOT EXISTS profile_genre (
                user_id TEXT NOT NULL REFERENCES profile(user_id) ON DELETE CASCADE,
                genre   TEXT NOT NULL,
                PRIMARY KEY (user_id, genre)
            );
            CREATE TABLE IF NOT EXISTS profile_mood (
                user_id TEXT NOT NULL REFERENCES profile(user_id) ON DELETE CASCADE,
                mood    TEXT NOT NULL,
                PRIMARY KEY (user_id, mood)
            );
            CREATE TABLE IF NOT EXISTS listening_history (
                user_id  TEXT    NOT NULL REFERENCES profile(user_id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                track_id TEXT    NOT NULL,
                PRIMARY KEY (user_id, position)
            );
            CREATE TABLE IF NOT EXISTS feedback (
                user_id  TEXT NOT NULL REFERENCES profile(user_id) ON DELETE CASCADE,
                track_id TEXT NOT NULL,
                signal   TEXT NOT NULL,
                PRIMARY KEY (user_id, track_id)
            );",
        )?;
        Ok(Self { conn })
    }

    fn corrupt(user_id: &str, reason: String) -> StoreError {
        StoreError::Corrupt {
            user_id: user_id.to_string(),
            reason,
        }
    }

    fn strings(&self, sql: &str, user_id: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([user_id], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl ProfileStore for SqliteProfileStore {
    fn load(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT energy_preference, age_range FROM profile WHERE user_id = ?1",
                [user_id],
                |row| Ok((row.get::<_, f64>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;
        let Some((energy_preference, age_range)) = row else {
            return Ok(None);
        };

        let genres = self
            .strings("SELECT genre FROM profile_genre WHERE user_id = ?1", user_id)?
            .iter()
            .map(|g| g.parse::<Genre>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| Self::corrupt(user_id, reason))?;
        let moods = self
            .strings("SELECT mood FROM profile_mood WHERE user_id = ?1", user_id)?
            .iter()
            .map(|m| m.parse::<Mood>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| Self::corrupt(user_id, reason))?;
        let history = self.strings(
            "SELECT track_id FROM listening_history WHERE user_id = ?1 ORDER BY position",
            user_id,
        )?;

        let mut profile = UserProfile::new(user_id)
            .with_genres(genres)
            .with_moods(moods)
            .with_energy_preference(energy_preference);
        profile.age_range = age_range;
        profile.listening_history = history;

        let mut stmt = self
            .conn
            .prepare("SELECT track_id, signal FROM feedback WHERE user_id = ?1")?;
        let rows = stmt.query_map([user_id], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (track_id, signal) = row?;
            let signal: FeedbackSignal = signal.parse().map_err(|reason| Self::corrupt(user_id, reason))?;
            profile.record_feedback(track_id, signal);
        }

        trace!("Loaded profile `{user_id}'.");
        Ok(Some(profile))
    }

    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let user_id = profile.user_id.as_str();

        tx.execute(
            "INSERT INTO profile (user_id, energy_preference, age_range) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                energy_preference = excluded.energy_preference,
                age_range = excluded.age_range",
            params![user_id, profile.energy_preference, profile.age_range],
        )?;
        for table in ["profile_genre", "profile_mood", "listening_history", "feedback"] {
            tx.execute(&format!("DELETE FROM {table} WHERE user_id = ?1"), [user_id])?;
        }

        {
            let mut stmt = tx.prepare("INSERT INTO profile_genre (user_id, genre) VALUES (?1, ?2)")?;
            for genre in &profile.preferred_genres {
                stmt.execute(params![user_id, genre.as_str()])?;
            }
            let mut stmt = tx.prepare("INSERT INTO profile_mood (user_id, mood) VALUES (?1, ?2)")?;
            for mood in &profile.preferred_moods {
                stmt.execute(params![user_id, mood.as_str()])?;
            }
            let mut stmt =
                tx.prepare("INSERT INTO listening_history (user_id, position, track_id) VALUES (?1, ?2, ?3)")?;
            for (position, track_id) in profile.listening_history.iter().enumerate() {
                let position = i64::try_from(position).unwrap_or(i64::MAX);
                stmt.execute(params![user_id, position, track_id])?;
            }
            let mut stmt = tx.prepare("INSERT INTO feedback (user_id, track_id, signal) VALUES (?1, ?2, ?3)")?;
            for (track_id, signal) in &profile.feedback {
                stmt.execute(params![user_id, track_id, signal.as_str()])?;
            }
        }

        tx.commit()?;
        debug!("Saved profile `{user_id}'.");
        Ok(())
    }

    fn user_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT user_id FROM profile ORDER BY user_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
