//! CLI error types.

use thiserror::Error;

/// Errors that end a CLI run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading the snapshot or configuration failed.
    #[error(transparent)]
    Core(#[from] modelgen_core::Error),

    /// Resolution produced more diagnostics than allowed.
    #[error("{count} diagnostics exceed the limit of {limit}")]
    TooManyWarnings {
        /// Diagnostics recorded.
        count: usize,
        /// Configured limit.
        limit: usize,
    },
}
