//! Error types for specimen resolution
//!
//! Provides [`FixtureError`] for:
//! - Exhausted builder pipelines (no specimen for a request)
//! - Detected recursion under the throwing policy
//! - Invalid configuration and invalid arguments
//! - Type-erasure mismatches and constructor failures

/// Main fixture error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixtureError {
    /// No builder in the pipeline could satisfy a request
    #[error("object creation failed for {request}: no specimen along {}", render_path(.path))]
    ObjectCreationFailed {
        /// The top-level request
        request: String,
        /// Request chain down to the deepest unsatisfied request
        path: Vec<String>,
    },

    /// A request was observed while already in progress on the same path
    #[error("recursion detected for {request}: {}", render_path(.path))]
    RecursionDetected {
        /// The request that closed the cycle
        request: String,
        /// The in-flight requests, outermost first, including the repeat
        path: Vec<String>,
    },

    /// Contradictory or out-of-range configuration
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Guard-clause failure on a public API argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A type-erased value did not hold the expected type
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Requested type name
        expected: &'static str,
        /// Actual type name held by the value
        actual: &'static str,
    },

    /// A constructor was selected and invoked but reported failure
    #[error("constructor {ty}::{constructor} failed: {reason}")]
    ConstructorFailed {
        /// Owning type
        ty: &'static str,
        /// Constructor name
        constructor: &'static str,
        /// Failure reason
        reason: String,
    },

    /// A named member does not exist on the type
    #[error("type {ty} has no writable member named {member}")]
    MemberNotFound {
        /// Owning type
        ty: &'static str,
        /// Requested member name
        member: String,
    },

    /// The pattern collaborator produced a string that does not match
    #[error("generated string {generated:?} does not match pattern {pattern:?}")]
    PatternMismatch {
        /// Requested pattern
        pattern: String,
        /// Offending output
        generated: String,
    },
}

impl FixtureError {
    /// Check if error reports a cycle
    #[inline]
    #[must_use]
    pub fn is_recursion(&self) -> bool {
        matches!(self, Self::RecursionDetected { .. })
    }

    /// Check if error reports an exhausted pipeline
    #[inline]
    #[must_use]
    pub fn is_creation_failure(&self) -> bool {
        matches!(self, Self::ObjectCreationFailed { .. })
    }

    /// Create invalid configuration error
    #[inline]
    #[must_use]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Create invalid argument error
    #[inline]
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Request chain carried by the error, if any
    #[must_use]
    pub fn path(&self) -> &[String] {
        match self {
            Self::ObjectCreationFailed { path, .. } | Self::RecursionDetected { path, .. } => path,
            _ => &[],
        }
    }
}

fn render_path(path: &[String]) -> String {
    path.join(" -> ")
}
