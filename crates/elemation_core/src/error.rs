//! Elemation error types

use thiserror::Error;

/// Errors raised while configuring or activating an elemation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElemationError {
    /// The trigger selector matched no element in the document
    #[error("No element matches selector `{0}`")]
    MissingElement(String),

    /// The selector could not be parsed by the host
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Configuration failed to parse or validate
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The host environment is unavailable
    #[error("Host unavailable: {0}")]
    Host(String),
}

impl ElemationError {
    pub fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for elemation operations
pub type Result<T> = std::result::Result<T, ElemationError>;
