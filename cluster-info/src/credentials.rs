use std::{collections::HashMap, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::{
    config::Config,
    error::{Error, Result},
};

pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// OpenStack variables forwarded to terraform when set in our environment.
pub const OPENSTACK_VARS: &[&str] = &[
    "OS_AUTH_URL",
    "OS_TENANT_ID",
    "OS_TENANT_NAME",
    "OS_USERNAME",
    "OS_PASSWORD",
    "OS_REGION_NAME",
];

/// S3 backend credentials as stored in `backend.json`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Environment handed to terraform: the backend key pair plus every
    /// OpenStack variable that `lookup` reports as set.
    pub fn environment(&self, lookup: impl Fn(&str) -> Option<String>) -> HashMap<String, String> {
        let mut env = HashMap::from([
            (AWS_ACCESS_KEY_ID.to_owned(), self.access_key.clone()),
            (AWS_SECRET_ACCESS_KEY.to_owned(), self.secret_key.clone()),
        ]);

        for &var in OPENSTACK_VARS {
            if let Some(val) = lookup(var).filter(|v| !v.is_empty()) {
                env.insert(var.to_owned(), val);
            }
        }
        env
    }
}

/// Reads and validates the credentials file named by `config`.
pub fn load_credentials(config: &Config) -> Result<Credentials> {
    let path = &config.credentials_file;
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::CredentialsNotFound {
                path: path.clone(),
                template: config.credentials_template(),
            });
        }
        Err(source) => {
            return Err(Error::CredentialsRead {
                path: path.clone(),
                source,
            });
        }
    };

    let creds: Credentials = match serde_json::from_slice(&data) {
        Ok(creds) => creds,
        Err(source) => {
            return Err(Error::CredentialsParse {
                path: path.clone(),
                source,
            });
        }
    };

    if creds.access_key.is_empty() {
        return Err(Error::MissingAccessKey(path.clone()));
    }
    if creds.secret_key.is_empty() {
        return Err(Error::MissingSecretKey(path.clone()));
    }

    debug!("loaded credentials from {}", path.display());
    Ok(creds)
}

/// Verifies terraform is installed and the credentials file exists, returning
/// the terraform binary.
pub fn check_prerequisites(config: &Config) -> Result<PathBuf> {
    let terraform = terraform::find_terraform()?;
    if !config.credentials_file.exists() {
        return Err(Error::CredentialsNotFound {
            path: config.credentials_file.clone(),
            template: config.credentials_template(),
        });
    }
    Ok(terraform)
}
