use thiserror::Error;

/// Errors from talking to git.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("`git {command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("unexpected output from `git {command}`: {detail}")]
    Malformed { command: &'static str, detail: String },

    #[error("refusing revision argument `{0}`")]
    InvalidRevision(String),

    #[error("page size must be greater than zero")]
    InvalidPageSize,
}
