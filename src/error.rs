use miette::Diagnostic;
use thiserror::Error;

/// Main error type for retroize operations
#[derive(Error, Diagnostic, Debug)]
pub enum RetroError {
    #[error("IO error: {0}")]
    #[diagnostic(code(retroize::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(retroize::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Input error: {message}")]
    #[diagnostic(code(retroize::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(retroize::config))]
    Configuration {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(retroize::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl RetroError {
    /// Shorthand for a rejected parameter.
    pub(crate) fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        RetroError::Configuration {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RetroError>;
