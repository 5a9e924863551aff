use std::fmt;
use thiserror::Error;

/// Step of the clear sequence that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearStep {
    /// Reading the dataset back before deleting it
    Inspect,
    /// Recursive, forced delete
    Delete,
    /// Re-creating the dataset under the same name and type
    Recreate,
}

impl fmt::Display for ClearStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            ClearStep::Inspect => "inspect",
            ClearStep::Delete => "delete",
            ClearStep::Recreate => "recreate",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Error)]
pub enum ManageError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to encode request: {0}")]
    Encode(serde_json::Error),

    #[error("Failed to decode response: {0}")]
    Decode(serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A step of the delete-then-recreate sequence failed. When `step` is
    /// [`ClearStep::Recreate`] the dataset no longer exists on the server.
    #[error("Failed to {step} dataset '{dataset}'{}: {source}", left_deleted(.step))]
    Clear {
        step: ClearStep,
        dataset: String,
        #[source]
        source: Box<ManageError>,
    },
}

fn left_deleted(step: &ClearStep) -> &'static str {
    match step {
        ClearStep::Recreate => " (it was deleted and is now missing)",
        _ => "",
    }
}

impl ManageError {
    /// HTTP status carried by an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ManageError::Api { status, .. } => Some(*status),
            ManageError::Clear { source, .. } => source.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManageError>;
