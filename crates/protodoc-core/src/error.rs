//! Error types for the protodoc-core library.
//!
//! Every failure the parser can produce is a variant of [`Error`]. Statement
//! level failures carry the raw statement text and the name of the scope it
//! was found in, so a caller can report exactly what went wrong without
//! re-reading the source.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for protodoc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all protodoc operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The `syntax` statement names neither proto2 nor proto3
    #[error("unsupported proto syntax: '{statement}'")]
    UnsupportedSyntaxVersion {
        /// The raw syntax statement
        statement: String,
    },

    /// A statement did not match the shape expected for its keyword
    #[error("malformed statement in '{scope}': {reason}: '{statement}'")]
    MalformedStatement {
        /// Name of the enclosing scope
        scope: String,
        /// The raw statement text
        statement: String,
        /// What was expected
        reason: &'static str,
    },

    /// End of input was reached inside a brace-delimited block
    #[error("unterminated block '{name}' in '{scope}'")]
    UnterminatedBlock {
        /// Name of the enclosing scope
        scope: String,
        /// Block name read so far (may be empty)
        name: String,
    },

    /// End of input was reached inside a `/* ... */` comment
    #[error("unterminated block comment in '{scope}'")]
    UnterminatedComment {
        /// Name of the enclosing scope
        scope: String,
    },

    /// An error raised while parsing a particular file
    #[error("{path}: {source}")]
    InFile {
        /// Path of the file being parsed
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new unsupported syntax error
    pub fn unsupported_syntax(statement: impl Into<String>) -> Self {
        Self::UnsupportedSyntaxVersion {
            statement: statement.into().trim().to_string(),
        }
    }

    /// Creates a new malformed statement error
    pub fn malformed(
        scope: impl Into<String>,
        statement: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::MalformedStatement {
            scope: scope.into(),
            statement: statement.into().trim().to_string(),
            reason,
        }
    }

    /// Creates a new unterminated block error
    pub fn unterminated_block(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnterminatedBlock {
            scope: scope.into(),
            name: name.into(),
        }
    }

    /// Creates a new unterminated comment error
    pub fn unterminated_comment(scope: impl Into<String>) -> Self {
        Self::UnterminatedComment {
            scope: scope.into(),
        }
    }

    /// Attaches the path of the file being parsed
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::InFile { .. } | Self::FileRead { .. } => self,
            other => Self::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns true if this is a recoverable error that should be skipped
    ///
    /// Only statement-level failures are recoverable: the scanner still knows
    /// where the next declaration starts. Structural failures lose the block
    /// boundaries and always abort the file.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::MalformedStatement { .. } => true,
            Self::InFile { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}
