//! # zentra-smoke
//!
//! End-to-end smoke test runner for the Zentra chat/community HTTP API. It drives
//! one fixed happy-path scenario against a running backend and stops at the first
//! unmet expectation.
//!
//! ## Architecture
//!
//! ```text
//! CLI (clap) → SmokeRunner → ZentraClient (reqwest) → backend /api/v1
//!                  ↓
//!             RunReport → text / JSON / YAML
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use zentra_smoke::client::{ClientConfig, ZentraClient};
//! use zentra_smoke::scenario::{RunOptions, ScenarioData, SmokeRunner};
//!
//! #[tokio::main]
//! async fn main() -> zentra_smoke::Result<()> {
//!     let client = ZentraClient::new(ClientConfig::default())?;
//!     let data = ScenarioData::generate("StrongPassword123!");
//!     let report = SmokeRunner::new(client, data, RunOptions::default()).run().await?;
//!     println!("{} steps passed", report.passed_steps());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod errors;
pub mod scenario;

// Re-export commonly used types
pub use errors::{Result, SmokeError};
pub use scenario::{RunOptions, RunReport, ScenarioData, SmokeRunner, Step};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
