use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing knowledge file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Computation failed: {0}")]
    Computation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
