use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = TodoError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TodoError {
  /// The backing file exists but cannot be read back as a list of todos.
  #[error("todo file {} is corrupt: {reason}", path.display())]
  CorruptStore { path: PathBuf, reason: String },

  #[error("no todo with id {0}")]
  NotFound(u64),

  #[error("every todo id has been used; remove the todo with the highest id from the file")]
  IdsExhausted,

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("cannot write {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("cannot write output: {0}")]
  Output(#[from] io::Error),

  #[error("prompt failed: {0}")]
  Prompt(#[from] dialoguer::Error),
}

impl TodoError {
  pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
    TodoError::CorruptStore {
      path: path.into(),
      reason: reason.to_string(),
    }
  }

  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    TodoError::Io {
      path: path.into(),
      source,
    }
  }
}
