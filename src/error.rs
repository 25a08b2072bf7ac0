use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    #[error("invalid flight number: {0}")]
    InvalidFlightNumber(String),

    #[error("invalid launch date: {0}")]
    InvalidLaunchDate(String),

    #[error("no matching target found: {0}")]
    InvalidTarget(String),

    #[error("launch not found: flight number {0}")]
    LaunchNotFound(u32),

    #[error("launch feed request failed: {0}")]
    FeedHttp(String),

    #[error("launch feed returned status {status}: {message}")]
    FeedStatus { status: u16, message: String },

    #[error("launch store error: {0}")]
    Store(String),

    #[error("target catalog error: {0}")]
    Catalog(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
