//! Draft session error types.

/// Kinds of draft session errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DraftErrorKind {
    /// The submission gate refused the submit action
    #[display("Submission blocked: {}", _0)]
    SubmissionBlocked(String),
    /// The draft was already submitted or closed
    #[display("Draft session is closed")]
    Closed,
    /// A background upload or delete task panicked or was aborted
    #[display("Background task failed: {}", _0)]
    TaskFailed(String),
}

/// Draft session error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Draft Error: {} at line {} in {}", kind, line, file)]
pub struct DraftError {
    /// The kind of error that occurred
    pub kind: DraftErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DraftError {
    /// Create a new draft error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DraftErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DraftErrorKind {
        &self.kind
    }
}
