use std::path::PathBuf;

use clap::{ArgAction, Parser};

const LONG_ABOUT: &str = "Retrieve K8s-Lab cluster information from the Terraform state.

Reads the Terraform state stored in an S3 backend, displays the public and
private IPs of the nodes and can save the SSH key.

Examples:
  # Basic usage (auto-detect terraform directory)
  get-cluster-info

  # Specify terraform directory
  get-cluster-info -t /path/to/terraform

  # Use a custom credentials file
  get-cluster-info -c /path/to/creds.json

  # JSON output for scripting
  get-cluster-info --json

  # Skip terraform init (if already initialized)
  get-cluster-info --no-init";

#[derive(Debug, Default, Parser)]
#[command(name = "get-cluster-info", author, version)]
#[command(about = "Retrieve K8s-Lab cluster information")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    /// Directory containing Terraform files (default: auto-detect)
    #[arg(long, short)]
    pub terraform_dir: Option<PathBuf>,

    /// Path to credentials JSON file (default: <terraform-dir>/backend.json)
    #[arg(long, short)]
    pub credentials: Option<PathBuf>,

    /// Path where to save the SSH key (default: ~/.ssh/k8s-lab.pem)
    #[arg(long = "ssh-key", short = 'k')]
    pub ssh_key: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, short, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Skip Terraform initialization (useful if already initialized)
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_init: bool,

    /// Do not save SSH key to disk
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_save_key: bool,

    /// Quiet mode (less output)
    #[arg(long, short, action = ArgAction::SetTrue)]
    pub quiet: bool,
}
