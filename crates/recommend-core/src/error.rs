use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidParameter,
    EmptyIdentifier,
    InvalidPattern,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidParameter => "E1001",
            Self::EmptyIdentifier => "E1002",
            Self::InvalidPattern => "E1003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidParameter => "Invalid ranking parameter",
            Self::EmptyIdentifier => "Empty contributor identifier",
            Self::InvalidPattern => "Invalid bot pattern",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter => {
                Some("Check k1, b, and rrf k in .git-recommend.toml or on the command line.")
            }
            Self::EmptyIdentifier => {
                Some("Every pull request and commit needs an author login or name.")
            }
            Self::InvalidPattern => Some("Fix the regex syntax in [filter] patterns."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by the ranking core.
///
/// Empty corpora, empty queries and empty event lists are not errors; they
/// produce empty or zero results.
#[derive(Debug, thiserror::Error)]
pub enum RankError {
    /// A tuning parameter is out of its valid domain.
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A document or event resolved to an empty identifier.
    #[error("empty identifier in {field}")]
    EmptyIdentifier { field: &'static str },

    /// A bot-detection pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl RankError {
    /// The stable [`ErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            Self::EmptyIdentifier { .. } => ErrorCode::EmptyIdentifier,
            Self::InvalidPattern { .. } => ErrorCode::InvalidPattern,
        }
    }
}

/// Reject non-finite values; used for every `f64` knob.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] when `value` is NaN or infinite.
pub fn ensure_finite(name: &'static str, value: f64) -> Result<f64, RankError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RankError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}
