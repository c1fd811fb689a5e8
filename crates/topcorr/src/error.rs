use std::fmt;

/// Errors raised by the filters and transforms.
///
/// Numeric degeneration (for example `|C[i,k]| > 1` under a square root) is
/// not an error: it shows up as NaN entries in the returned data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The caller supplied a matrix or parameter the operation cannot accept.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A lower-level routine was called with a malformed node or face.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The correlation matrix could not be inverted.
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Machine-readable classification of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::SingularMatrix => ErrorCode::SingularMatrix,
        }
    }
}

/// Stable error codes for callers that branch on error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidInput,
    InvalidArgument,
    SingularMatrix,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidInput => "E1001",
            Self::InvalidArgument => "E1002",
            Self::SingularMatrix => "E2001",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidInput => Some("Pass a square p x p matrix with parameters in range."),
            Self::InvalidArgument => None,
            Self::SingularMatrix => {
                Some("Drop collinear variables or shrink the matrix towards the identity.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
