//! Runtime configuration read from the environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{answerer, relevance};

/// Settings shared by the CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Ollama base URL; `None` lets the client builder apply its default.
    pub ollama_host: Option<String>,
    /// Model name for both LLM stages.
    pub ollama_model: Option<String>,
    /// Location of the local SQLite notes store.
    pub database_path: PathBuf,
    pub relevance_max_tokens: u32,
    pub qa_max_tokens: u32,
    /// Serve demo notes when retrieval finds nothing.
    pub sample_fallback: bool,
}

impl Config {
    /// Loads `.env` (if present) and reads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable does not parse, or
    /// if no data directory can be determined for the default database path.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_path = match non_blank("NOTEQA_DB") {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        Ok(Self {
            ollama_host: non_blank("OLLAMA_HOST"),
            ollama_model: non_blank("OLLAMA_MODEL"),
            database_path,
            relevance_max_tokens: parse_or(
                non_blank("NOTEQA_RELEVANCE_MAX_TOKENS"),
                "NOTEQA_RELEVANCE_MAX_TOKENS",
                relevance::DEFAULT_MAX_TOKENS,
            )?,
            qa_max_tokens: parse_or(
                non_blank("NOTEQA_QA_MAX_TOKENS"),
                "NOTEQA_QA_MAX_TOKENS",
                answerer::DEFAULT_MAX_TOKENS,
            )?,
            sample_fallback: match non_blank("NOTEQA_SAMPLE_FALLBACK") {
                Some(raw) => parse_bool(&raw)
                    .with_context(|| format!("NOTEQA_SAMPLE_FALLBACK: invalid value '{raw}'"))?,
                None => true,
            },
        })
    }
}

fn parse_or(raw: Option<String>, key: &str, default: u32) -> Result<u32> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key}: expected a positive integer, got '{raw}'")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("expected true/false"),
    }
}

/// Gets the cross-platform database path.
///
/// Returns the path as `{data_dir}/noteqa/notes.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn default_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("noteqa").join("notes.db"))
}

/// Ensures the parent directory of the database file exists.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}
