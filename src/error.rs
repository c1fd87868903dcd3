//! Error types for llamenu
//!
//! Every failure is handled at the boundary of the operation that caused it
//! and turned into a console message, so these types mostly exist to carry a
//! readable description up to that boundary.

use std::path::PathBuf;
use std::process::ExitStatus;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while fetching the installed model list.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The server could not be reached or the request failed mid-flight
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server returned status {0}")]
    Status(StatusCode),

    /// The body was not the expected JSON
    #[error("failed to decode model list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure reading from or writing to the console.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// End of input, Ctrl-C or Ctrl-D
    #[error("input closed")]
    Closed,

    #[error("console I/O failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConsoleError {
    fn from(e: std::io::Error) -> Self {
        ConsoleError::Io(e.to_string())
    }
}

/// A generation parameter could not be captured.
#[derive(Error, Debug)]
pub enum ParameterError {
    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error("invalid value for {field}: '{value}' is not a number ({source})")]
    Float {
        field: &'static str,
        value: String,
        source: std::num::ParseFloatError,
    },

    #[error("invalid value for {field}: '{value}' is not an integer ({source})")]
    Int {
        field: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },
}

/// Writing a modelfile or running the model-creation tool failed.
#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to run '{tool}': {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },

    #[error("'{tool}' exited with {status}")]
    Exit { tool: String, status: ExitStatus },
}

/// Failure of a streaming chat call.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed stream line '{line}': {source}")]
    Decode {
        line: String,
        source: serde_json::Error,
    },

    #[error("server error: {0}")]
    Server(String),
}

/// A chat session ended abnormally.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to write session log {}: {source}", .path.display())]
    Log {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error("console output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error(transparent)]
    Stream(#[from] ChatError),
}
