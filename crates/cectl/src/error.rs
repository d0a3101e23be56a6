//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by `cectl` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The platform could not be reached at all.
    #[error("Unable to reach CE API. Please check your configuration / profile.")]
    Unreachable(#[source] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("{status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error envelope, or the raw body.
        message: String,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("unable to decode response: {0}")]
    Decode(String),

    /// The named profile is absent from the config file.
    #[error("No {name} profile exists in config file {}.", path.display())]
    ProfileNotFound {
        /// Profile name that was requested.
        name: String,
        /// Config file that was searched.
        path: PathBuf,
    },

    /// A profile with this name is already configured.
    #[error("Profile {0} exists.")]
    ProfileExists(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("{0}")]
    InvalidArgument(String),

    /// Element key could not be mapped to an id.
    #[error("unable to find Element ID for Element Key {0}")]
    ElementKeyNotFound(String),

    /// Login failed.
    #[error("login failed: {0}")]
    Login(String),

    /// An input file could not be read.
    #[error("unable to read file {path}: {source}")]
    InputFile {
        /// File that was requested.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request construction failed before anything was sent.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL in a profile.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// CSV writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Interactive prompt failed.
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl CliError {
    /// Build an [`CliError::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
