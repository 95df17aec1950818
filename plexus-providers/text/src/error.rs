//! Errors raised by the text loaders, each with a stable machine-readable
//! code.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Failure while reading a text graph source.
///
/// Missing files are reported as [`TextProviderError::NotFound`], distinct
/// from malformed content.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TextProviderError {
    /// The source file does not exist.
    #[error("`{}` not found", path.display())]
    NotFound {
        /// Path that was opened.
        path: PathBuf,
    },
    /// Reading the source failed.
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        /// Path or name of the source.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A field could not be parsed as a number.
    #[error("`{}` line {line}: cannot parse {field} from `{value}`", path.display())]
    Parse {
        /// Path or name of the source.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Name of the field being read.
        field: &'static str,
        /// Offending text.
        value: String,
    },
    /// A required field was absent.
    #[error("`{}` line {line}: missing {field}", path.display())]
    MissingField {
        /// Path or name of the source.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Name of the missing field.
        field: &'static str,
    },
    /// The vertex stream ended inside a simplex.
    #[error("simplex {simplex} declares {expected} vertices but only {found} remain")]
    TruncatedSimplex {
        /// One-based simplex index.
        simplex: usize,
        /// Vertex count declared by the counts file.
        expected: usize,
        /// Vertices actually available.
        found: usize,
    },
    /// The times and counts files describe different numbers of simplices.
    #[error("times file lists {times} simplices but counts file lists {counts}")]
    MisalignedSimplexFiles {
        /// Records in the times file.
        times: usize,
        /// Records in the counts file.
        counts: usize,
    },
    /// A temporal step of zero was requested.
    #[error("temporal step must be greater than zero")]
    InvalidStep,
    /// A coalescing window of zero was requested.
    #[error("time window must be greater than zero")]
    InvalidWindow,
}

/// Stable codes describing [`TextProviderError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TextProviderErrorCode {
    /// Source file missing.
    NotFound,
    /// Read failure.
    Io,
    /// Unparsable field.
    Parse,
    /// Missing field.
    MissingField,
    /// Vertex stream ended early.
    TruncatedSimplex,
    /// Times and counts files disagree.
    MisalignedSimplexFiles,
    /// Zero temporal step.
    InvalidStep,
    /// Zero coalescing window.
    InvalidWindow,
}

impl TextProviderErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "TEXT_NOT_FOUND",
            Self::Io => "TEXT_IO",
            Self::Parse => "TEXT_PARSE",
            Self::MissingField => "TEXT_MISSING_FIELD",
            Self::TruncatedSimplex => "TEXT_TRUNCATED_SIMPLEX",
            Self::MisalignedSimplexFiles => "TEXT_MISALIGNED_SIMPLEX_FILES",
            Self::InvalidStep => "TEXT_INVALID_STEP",
            Self::InvalidWindow => "TEXT_INVALID_WINDOW",
        }
    }
}

impl fmt::Display for TextProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TextProviderError {
    /// Retrieve the stable [`TextProviderErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> TextProviderErrorCode {
        match self {
            Self::NotFound { .. } => TextProviderErrorCode::NotFound,
            Self::Io { .. } => TextProviderErrorCode::Io,
            Self::Parse { .. } => TextProviderErrorCode::Parse,
            Self::MissingField { .. } => TextProviderErrorCode::MissingField,
            Self::TruncatedSimplex { .. } => TextProviderErrorCode::TruncatedSimplex,
            Self::MisalignedSimplexFiles { .. } => TextProviderErrorCode::MisalignedSimplexFiles,
            Self::InvalidStep => TextProviderErrorCode::InvalidStep,
            Self::InvalidWindow => TextProviderErrorCode::InvalidWindow,
        }
    }
}
