use std::{
    env,
    io,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    args::Cli,
    error::{Error, Result},
};

pub const TERRAFORM_DIR: &str = "terraform";
pub const MARKER_FILE: &str = "main.tf";
pub const CREDENTIALS_FILE: &str = "backend.json";
pub const CREDENTIALS_TEMPLATE: &str = "backend.json.example";
pub const SSH_KEY_FILE: &str = "k8s-lab.pem";

/// Settings for a single run, resolved once from the flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub terraform_dir: PathBuf,
    pub credentials_file: PathBuf,
    pub ssh_key_path: PathBuf,
    pub json_output: bool,
    pub no_init: bool,
    pub no_save_key: bool,
    pub quiet: bool,
}

impl Config {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        Self::resolve_from(cli, env::current_dir, home::home_dir().as_deref())
    }

    /// Fills in every unset path. `cwd` anchors the project search and is
    /// only consulted when no terraform directory was given; `home` anchors
    /// the default key location.
    pub fn resolve_from(
        cli: &Cli,
        cwd: impl FnOnce() -> io::Result<PathBuf>,
        home: Option<&Path>,
    ) -> Result<Self> {
        let terraform_dir = match &cli.terraform_dir {
            Some(dir) => dir.clone(),
            None => {
                let cwd = cwd().map_err(Error::CurrentDir)?;
                find_project_root(&cwd)?.join(TERRAFORM_DIR)
            }
        };

        if !terraform_dir.exists() {
            return Err(Error::TerraformDirNotFound(terraform_dir));
        }

        let credentials_file = cli
            .credentials
            .clone()
            .unwrap_or_else(|| terraform_dir.join(CREDENTIALS_FILE));

        let ssh_key_path = match &cli.ssh_key {
            Some(path) => path.clone(),
            None => default_ssh_key_path(home.ok_or(Error::HomeNotFound)?),
        };

        info!("terraform directory {}", terraform_dir.display());
        Ok(Self {
            terraform_dir,
            credentials_file,
            ssh_key_path,
            json_output: cli.json,
            no_init: cli.no_init,
            no_save_key: cli.no_save_key,
            quiet: cli.quiet,
        })
    }

    pub fn credentials_template(&self) -> PathBuf {
        self.terraform_dir.join(CREDENTIALS_TEMPLATE)
    }
}

pub fn default_ssh_key_path(home: &Path) -> PathBuf {
    home.join(".ssh").join(SSH_KEY_FILE)
}

/// Returns the closest ancestor of `start` (itself included) that holds
/// `terraform/main.tf`.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(TERRAFORM_DIR).join(MARKER_FILE).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::ProjectRootNotFound(start.to_path_buf()))
}
