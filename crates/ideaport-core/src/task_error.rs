//! Task execution error types
//!
//! Error wrapper for background task execution, allowing a task handler to
//! indicate whether a failure is recoverable (should be retried by the queue)
//! or unrecoverable (should fail immediately without retrying).

use std::fmt;

/// Task execution error that can be either recoverable or unrecoverable
#[derive(Debug)]
pub struct TaskError {
    inner: anyhow::Error,
    recoverable: bool,
}

impl TaskError {
    /// Create a new unrecoverable task error.
    ///
    /// Unrecoverable errors fail the task immediately without retrying. Use
    /// for errors that will not change on retry: a deleted record referenced
    /// by the payload, malformed payload data, missing configuration.
    pub fn unrecoverable(err: impl Into<anyhow::Error>) -> Self {
        Self {
            inner: err.into(),
            recoverable: false,
        }
    }

    /// Create a new recoverable task error.
    ///
    /// Recoverable errors are retried according to the task's retry policy.
    /// Use for transient failures: network errors, collaborator timeouts.
    pub fn recoverable(err: impl Into<anyhow::Error>) -> Self {
        Self {
            inner: err.into(),
            recoverable: true,
        }
    }

    /// Check if this error is recoverable (should be retried)
    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }

    /// Get the inner error
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    /// Consume self and return the inner error
    pub fn into_inner(self) -> anyhow::Error {
        self.inner
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for TaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

impl From<anyhow::Error> for TaskError {
    /// Default conversion from anyhow::Error creates a recoverable error
    fn from(err: anyhow::Error) -> Self {
        Self::recoverable(err)
    }
}

/// Extension trait for Result to easily create unrecoverable task errors
pub trait TaskResultExt<T> {
    /// Mark this result as unrecoverable on error
    fn unrecoverable(self) -> Result<T, TaskError>;
}

impl<T, E: Into<anyhow::Error>> TaskResultExt<T> for Result<T, E> {
    fn unrecoverable(self) -> Result<T, TaskError> {
        self.map_err(|e| TaskError::unrecoverable(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecoverable_error() {
        let err = TaskError::unrecoverable(anyhow::anyhow!("document not found"));
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("document not found"));
    }

    #[test]
    fn test_recoverable_error() {
        let err = TaskError::recoverable(anyhow::anyhow!("scan daemon timeout"));
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("scan daemon timeout"));
    }

    #[test]
    fn test_from_anyhow_defaults_to_recoverable() {
        let err: TaskError = anyhow::anyhow!("some error").into();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_result_ext() {
        let result: Result<(), anyhow::Error> = Err(anyhow::anyhow!("bad payload"));
        let task_result = result.unrecoverable();
        assert!(!task_result.unwrap_err().is_recoverable());
    }
}
