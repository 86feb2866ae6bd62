//! # Shell Completion Module
//!
//! Completion scripts via `clap_complete`, plus the dynamic list of stored
//! user identifiers used by the hidden `complete-users` command.
//!
//! ## Usage
//!
//! ```bash
//! tastemaker completion bash > ~/.local/share/bash-completion/completions/tastemaker
//! tastemaker completion zsh > ~/.config/zsh/completions/_tastemaker
//! ```

use crate::store::{ProfileStore, SqliteProfileStore};
use anyhow::Result;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use log::debug;
use std::io;
use std::path::Path;

/// Generate shell completions for the given shell
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Convert our Shell enum to clap_complete's Shell enum
pub fn shell_to_completion_shell(shell: &crate::cli::Shell) -> CompletionShell {
    match shell {
        crate::cli::Shell::Bash => CompletionShell::Bash,
        crate::cli::Shell::Zsh => CompletionShell::Zsh,
        crate::cli::Shell::Fish => CompletionShell::Fish,
        crate::cli::Shell::PowerShell => CompletionShell::PowerShell,
        crate::cli::Shell::Elvish => CompletionShell::Elvish,
    }
}

/// Stored user identifiers, sorted. A missing or unreadable database yields
/// an empty list so that completion never prints errors.
pub fn get_user_completions(db_path: &Path) -> Vec<String> {
    if !db_path.exists() {
        return Vec::new();
    }
    match SqliteProfileStore::open(db_path).and_then(|store| store.user_ids()) {
        Ok(ids) => ids,
        Err(e) => {
            debug!("No user completions from {}: {e}", db_path.display());
            Vec::new()
        }
    }
}

/// Print stored user identifiers, one per line.
pub fn print_user_completions(db_path: &Path) -> Result<()> {
    for user in get_user_completions(db_path) {
        if user.contains(char::is_whitespace) {
            println!("\"{}\"", user.replace('"', "\\\""));
        } else {
            println!("{user}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserProfile;

    #[test]
    fn test_shell_conversion() {
        assert_eq!(
            shell_to_completion_shell(&crate::cli::Shell::Bash),
            CompletionShell::Bash
        );
        assert_eq!(
            shell_to_completion_shell(&crate::cli::Shell::Zsh),
            CompletionShell::Zsh
        );
    }

    #[test]
    fn test_user_completions_missing_db() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(get_user_completions(&dir.path().join("absent.db")).is_empty());
    }

    #[test]
    fn test_user_completions_lists_stored_users() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("profiles.db");
        let mut store = SqliteProfileStore::open(&path).unwrap();
        store.save(&UserProfile::new("zoe")).unwrap();
        store.save(&UserProfile::new("adam")).unwrap();
        drop(store);

        assert_eq!(get_user_completions(&path), vec!["adam", "zoe"]);
    }
}
