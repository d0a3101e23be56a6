//! # cectl
//!
//! Command-line client for the Cloud Elements integration platform.
//!
//! Provides commands for:
//! - Profile management (offline)
//! - Elements, Element Instances and their transformations
//! - Formulas, Formula Instances and executions
//! - Jobs, Common Resources, Hubs and users
//! - Account summaries, metrics, branding and asset export
//!
//! # Architecture
//!
//! Every API command resolves a profile from the TOML config file, builds an
//! [`client::ApiClient`] from it and performs one or more REST calls. The
//! response is either passed through raw (`--json`) or decoded into
//! [`model`] types and rendered as a table or CSV.
//!
//! ```text
//! ┌───────────┐   profile   ┌───────────┐     HTTPS/JSON     ┌──────────────┐
//! │ cectl.toml│────────────►│   cectl   │◄──────────────────►│ CE REST API  │
//! └───────────┘             └───────────┘                    └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod fanout;
pub mod login;
pub mod model;
pub mod output;

pub use cli::{Cli, Commands, Format};
pub use client::{ApiClient, ApiResponse};
pub use config::{Profile, ProfileStore};
pub use error::CliError;
pub use output::OutputFormat;
