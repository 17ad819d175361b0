//! Bridge configuration: credentials from the environment plus an optional
//! TOML tuning file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::merge_writer::MarkPolicy;
use crate::core::schema::SheetSchema;

pub const ENV_CLIENT_EMAIL: &str = "GOOGLE_CLIENT_EMAIL";
pub const ENV_PRIVATE_KEY: &str = "GOOGLE_PRIVATE_KEY";
pub const ENV_SHEET_ID: &str = "GOOGLE_SHEET_ID";
pub const ENV_PAGE_NAME: &str = "GOOGLE_SHEET_PAGE_NAME";

/// Tuning options (TOML). Missing fields default to the deployed values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RsvpConfig {
    /// A1 range read on fetch and before every submit.
    pub read_range: String,

    /// A1 range replaced on submit.
    pub write_range: String,

    /// Deadline for a single store call, in seconds.
    pub store_timeout_secs: u64,

    pub mark_policy: MarkPolicy,

    pub headers: SheetSchema,
}

impl Default for RsvpConfig {
    fn default() -> Self {
        Self {
            read_range: "A1:J137".to_string(),
            write_range: "A1:K137".to_string(),
            store_timeout_secs: 30,
            mark_policy: MarkPolicy::default(),
            headers: SheetSchema::default(),
        }
    }
}

impl RsvpConfig {
    pub fn validate(&self) -> Result<()> {
        if self.read_range.trim().is_empty() {
            return Err(anyhow!("read_range must not be empty"));
        }
        if self.write_range.trim().is_empty() {
            return Err(anyhow!("write_range must not be empty"));
        }
        if self.store_timeout_secs == 0 {
            return Err(anyhow!("store_timeout_secs must be > 0"));
        }
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RsvpConfig::default()`.
pub fn load_config(path: &Path) -> Result<RsvpConfig> {
    if !path.exists() {
        let cfg = RsvpConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RsvpConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Service-account credentials and sheet address.
#[derive(Clone, PartialEq, Eq)]
pub struct SheetCredentials {
    pub client_email: String,
    /// PEM private key with real newlines.
    pub private_key: String,
    pub sheet_id: String,
    pub page_name: String,
}

impl std::fmt::Debug for SheetCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetCredentials")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("sheet_id", &self.sheet_id)
            .field("page_name", &self.page_name)
            .finish()
    }
}

impl SheetCredentials {
    /// Read credentials from the process environment (after `.env`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through `lookup`. Every variable is required.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("environment variable {key} is not set"))
        };
        Ok(Self {
            client_email: require(ENV_CLIENT_EMAIL)?,
            private_key: unescape_newlines(&require(ENV_PRIVATE_KEY)?),
            sheet_id: require(ENV_SHEET_ID)?,
            page_name: require(ENV_PAGE_NAME)?,
        })
    }
}

/// Keys pasted into a single-line env var carry literal `\n` sequences.
fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}

/// Load the nearest `.env` at or above the working directory.
///
/// Runs before logging is set up so `.env` can carry `RUST_LOG`; the caller
/// logs the returned path once the subscriber exists.
pub fn load_dotenv() -> Option<PathBuf> {
    load_dotenv_from(&std::env::current_dir().ok()?)
}

/// Load the nearest `.env` at or above `start`, returning its path.
pub fn load_dotenv_from(start: &Path) -> Option<PathBuf> {
    let path = start
        .ancestors()
        .map(|dir| dir.join(".env"))
        .find(|path| path.is_file())?;
    dotenvy::from_path(&path).ok()?;
    Some(path)
}
