use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("delete phase failed: {0}")]
    Delete(#[source] diesel::result::Error),

    #[error("delete phase aborted before commit: {0}")]
    Aborted(String),

    #[error("commit phase failed: {0}")]
    Commit(#[from] diesel::result::Error),
}
