//! Error types for the host binding and the widget
//!
//! Application plumbing (components, main loop) uses `anyhow`; these typed
//! errors exist at the seams where callers need to tell failures apart.

use std::path::PathBuf;
use thiserror::Error;

pub type BindingResult<T> = Result<T, BindingError>;
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Failures talking to the host model
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("failed to access host document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in host document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML in host document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("host document must be an object at the top level")]
    NotAnObject,

    #[error("host rejected save: {0}")]
    SaveRejected(String),
}

/// Failures inside the recommendation widget
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("host value for `{key}` has an unexpected shape: {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("no recommendation tab named `{0}`")]
    UnknownTab(String),

    #[error("no chart {index} in tab {tab}")]
    CardOutOfRange { tab: usize, index: usize },

    #[error("widget is already mounted")]
    AlreadyMounted,
}
