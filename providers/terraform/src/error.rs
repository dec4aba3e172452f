use std::path::PathBuf;

use thiserror::Error;

pub type TerraformResult<T> = Result<T, TerraformError>;

#[derive(Error, Debug)]
pub enum TerraformError {
    #[error("terraform is not installed or not in PATH")]
    NotInstalled,

    #[error("working directory not found: {}", .0.display())]
    WorkingDirNotFound(PathBuf),

    #[error("terraform init failed: {0}")]
    InitFailed(String),

    #[error("terraform output failed: {0}")]
    OutputFailed(String),

    #[error("could not parse terraform output")]
    OutputParse(#[from] serde_json::Error),

    #[error("could not run terraform")]
    Io(#[from] std::io::Error),
}
