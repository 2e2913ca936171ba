//! Error types for workload generation.
//!
//! Configuration and library errors are raised before any file is opened, so
//! a failing pair never leaves output behind. I/O errors carry the path that
//! was being written.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while turning a configuration into a file.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The test case cannot produce a well-formed source file
    #[error("invalid configuration `{case}`: {reason}")]
    #[diagnostic(code(enumbench::invalid_configuration))]
    InvalidConfiguration {
        /// The `base_filename` of the offending test case
        case: String,
        /// What is wrong with it
        reason: String,
    },

    /// No profile is registered under this identifier
    #[error("unknown library `{name}`")]
    #[diagnostic(
        code(enumbench::unknown_library),
        help("{}", unknown_library_help(suggestion.as_deref(), known))
    )]
    UnknownLibrary {
        /// The identifier that was asked for
        name: String,
        /// Closest registered identifier, if any is similar enough
        suggestion: Option<&'static str>,
        /// Every registered identifier
        known: Vec<&'static str>,
    },

    /// A file could not be read, written or persisted
    #[error("I/O error on {}", path.display())]
    #[diagnostic(code(enumbench::io))]
    Io {
        /// The file being accessed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// A batch file is not a valid list of test cases
    #[error("could not parse batch file {}: {message}", path.display())]
    #[diagnostic(
        code(enumbench::batch),
        help("a batch file is a JSON array of test case objects")
    )]
    Batch {
        /// The batch file
        path: PathBuf,
        /// Deserializer message
        message: String,
    },

    /// Interactive input could not be turned into a value
    #[error("invalid answer for `{prompt}`: {reason}")]
    #[diagnostic(code(enumbench::prompt))]
    Prompt {
        /// The question that was asked
        prompt: String,
        /// Why the answer was rejected
        reason: String,
    },
}

impl Error {
    pub(crate) fn invalid(case: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            case: case.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// True for filesystem failures, which halt a batch unless it keeps going.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. })
    }
}

fn unknown_library_help(suggestion: Option<&str>, known: &[&str]) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? registered libraries: {}", known.join(", ")),
        None => format!("registered libraries: {}", known.join(", ")),
    }
}
