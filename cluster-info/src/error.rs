use std::{io, path::PathBuf};

use terraform::TerraformError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "failed to find terraform directory: could not find terraform/main.tf from {}\n\n\
         Use --terraform-dir to specify it manually",
        .0.display()
    )]
    ProjectRootNotFound(PathBuf),

    #[error("terraform directory not found: {}", .0.display())]
    TerraformDirNotFound(PathBuf),

    #[error("could not determine the current directory")]
    CurrentDir(#[source] io::Error),

    #[error("could not determine the home directory, use --ssh-key to choose the key path")]
    HomeNotFound,

    #[error(
        "credentials file not found: {}\n\nCreate the file with your S3 credentials:\n  cp {} {}",
        .path.display(),
        .template.display(),
        .path.display()
    )]
    CredentialsNotFound { path: PathBuf, template: PathBuf },

    #[error("failed to read credentials file {}", .path.display())]
    CredentialsRead { path: PathBuf, source: io::Error },

    #[error("failed to parse JSON file {}", .path.display())]
    CredentialsParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("access_key missing in {}", .0.display())]
    MissingAccessKey(PathBuf),

    #[error("secret_key missing in {}", .0.display())]
    MissingSecretKey(PathBuf),

    #[error("no data found - the cluster may not be deployed")]
    NotDeployed,

    #[error("failed to create {}", .path.display())]
    KeyDir { path: PathBuf, source: io::Error },

    #[error("failed to write SSH key {}", .path.display())]
    KeyWrite { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Terraform(#[from] TerraformError),
}
