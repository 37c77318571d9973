use adt::display::PrintError;
use std::io;
use thiserror_no_std::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Could not open {path}: {error}")]
    Open { path: String, error: io::Error },
    #[error("Could not map {path} into memory: {error}")]
    Map { path: String, error: io::Error },
    #[error("{0}")]
    Print(PrintError),
    #[error("Could not write to stdout: {0}")]
    Output(io::Error),
}

impl CliError {
    /// The process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Open { .. } | CliError::Map { .. } => 2,
            CliError::Print(_) | CliError::Output(_) => 3,
        }
    }
}
