//! Configuration file handling for the smoke runner CLI
//!
//! Manages loading and saving configuration from ~/.zentra/smoke.toml and
//! resolving run settings from flags, the file, the environment and defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::scenario::fixtures::DEFAULT_PASSWORD;

pub const BASE_URL_ENV: &str = "ZENTRA_BASE_URL";
pub const TIMEOUT_ENV: &str = "ZENTRA_TIMEOUT";
pub const PASSWORD_ENV: &str = "ZENTRA_SMOKE_PASSWORD";

/// CLI configuration stored in ~/.zentra/smoke.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmokeConfig {
    /// Base URL of the versioned API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Password used for the throwaway test account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl SmokeConfig {
    /// Get the default configuration file path (~/.zentra/smoke.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Unable to determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".zentra");
        path.push("smoke.toml");

        Ok(path)
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// Load configuration from a specific path; a missing file yields defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolve the base URL
///
/// Checks sources in the following priority order:
/// 1. --base-url command line flag
/// 2. config file
/// 3. ZENTRA_BASE_URL environment variable
/// 4. Default: http://localhost:8080/api/v1
pub fn resolve_base_url(flag: Option<String>, config: &SmokeConfig) -> String {
    pick_base_url(flag, config, std::env::var(BASE_URL_ENV).ok())
}

fn pick_base_url(flag: Option<String>, config: &SmokeConfig, env: Option<String>) -> String {
    if let Some(url) = non_empty(flag) {
        debug!("Using base URL from --base-url flag: {}", url);
        return url;
    }

    if let Some(url) = non_empty(config.base_url.clone()) {
        debug!("Using base URL from config file: {}", url);
        return url;
    }

    if let Some(url) = non_empty(env) {
        debug!("Using base URL from {} environment variable: {}", BASE_URL_ENV, url);
        return url;
    }

    debug!("Using default base URL: {}", DEFAULT_BASE_URL);
    DEFAULT_BASE_URL.to_string()
}

/// Resolve the request timeout in seconds
///
/// Checks sources in the following priority order:
/// 1. --timeout command line flag
/// 2. config file
/// 3. ZENTRA_TIMEOUT environment variable
/// 4. Default: 30 seconds
pub fn resolve_timeout(flag: Option<u64>, config: &SmokeConfig) -> Result<u64> {
    pick_timeout(flag, config, std::env::var(TIMEOUT_ENV).ok())
}

fn pick_timeout(flag: Option<u64>, config: &SmokeConfig, env: Option<String>) -> Result<u64> {
    if let Some(timeout) = flag {
        debug!("Using timeout from --timeout flag: {} seconds", timeout);
        return Ok(timeout);
    }

    if let Some(timeout) = config.timeout {
        debug!("Using timeout from config file: {} seconds", timeout);
        return Ok(timeout);
    }

    if let Some(raw) = non_empty(env) {
        let timeout: u64 = raw.trim().parse().with_context(|| {
            format!("Invalid {} value '{}'. Must be a number in seconds", TIMEOUT_ENV, raw)
        })?;
        debug!("Using timeout from {} environment variable: {} seconds", TIMEOUT_ENV, timeout);
        return Ok(timeout);
    }

    debug!("Using default timeout: {} seconds", DEFAULT_TIMEOUT_SECS);
    Ok(DEFAULT_TIMEOUT_SECS)
}

/// Resolve the password for the test account
///
/// Checks sources in the following priority order:
/// 1. --password command line flag
/// 2. config file
/// 3. ZENTRA_SMOKE_PASSWORD environment variable
/// 4. Built-in default that satisfies the backend's strong-password rule
pub fn resolve_password(flag: Option<String>, config: &SmokeConfig) -> String {
    pick_password(flag, config, std::env::var(PASSWORD_ENV).ok())
}

fn pick_password(flag: Option<String>, config: &SmokeConfig, env: Option<String>) -> String {
    if let Some(password) = non_empty(flag) {
        debug!("Using password from --password flag");
        return password;
    }

    if let Some(password) = non_empty(config.password.clone()) {
        debug!("Using password from config file");
        return password;
    }

    if let Some(password) = non_empty(env) {
        debug!("Using password from {} environment variable", PASSWORD_ENV);
        return password;
    }

    DEFAULT_PASSWORD.to_string()
}
