use std::{
    fs::Permissions,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, Serializer};
use terraform::{extract_string_output, OutputSource, Outputs};
use tokio::{
    fs::{set_permissions, DirBuilder, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::info;

use crate::error::{Error, Result};

pub const CONTROL_PLANE_PUBLIC_IP: &str = "control_plane_public_ip";
pub const CONTROL_PLANE_PRIVATE_IP: &str = "control_plane_private_ip";
pub const WORKER_PUBLIC_IP: &str = "worker_public_ip";
pub const WORKER_PRIVATE_IP: &str = "worker_private_ip";
pub const SSH_PRIVATE_KEY: &str = "ssh_private_key";

const KEY_DIR_MODE: u32 = 0o700;
const KEY_FILE_MODE: u32 = 0o600;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub public_ip: String,
    pub private_ip: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub control_plane: NodeInfo,
    pub worker: NodeInfo,
    #[serde(serialize_with = "serialize_path_lossy")]
    pub ssh_key_path: PathBuf,
}

/// Writes a path as a JSON string, replacing bytes that are not UTF-8.
fn serialize_path_lossy<S>(path: &Path, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&path.to_string_lossy())
}

impl ClusterInfo {
    /// Builds the cluster record from terraform outputs.
    ///
    /// Only the control-plane public IP is mandatory: without it the cluster
    /// is considered not deployed. Every other value may be empty.
    pub fn from_outputs(outputs: &Outputs, ssh_key_path: &Path) -> Result<Self> {
        let info = ClusterInfo {
            control_plane: NodeInfo {
                public_ip: extract_string_output(outputs, CONTROL_PLANE_PUBLIC_IP),
                private_ip: extract_string_output(outputs, CONTROL_PLANE_PRIVATE_IP),
            },
            worker: NodeInfo {
                public_ip: extract_string_output(outputs, WORKER_PUBLIC_IP),
                private_ip: extract_string_output(outputs, WORKER_PRIVATE_IP),
            },
            ssh_key_path: ssh_key_path.to_path_buf(),
        };

        if info.control_plane.public_ip.is_empty() {
            return Err(Error::NotDeployed);
        }
        Ok(info)
    }
}

pub async fn get_cluster_info(
    source: &dyn OutputSource,
    ssh_key_path: &Path,
) -> Result<ClusterInfo> {
    let outputs = source.output().await?;
    ClusterInfo::from_outputs(&outputs, ssh_key_path)
}

/// Fetches the private key output and writes it to `path`.
///
/// Returns `Ok(false)` when the deployment exposes no key.
pub async fn save_ssh_key(source: &dyn OutputSource, path: &Path) -> Result<bool> {
    let outputs = source.output().await?;
    let key = extract_string_output(&outputs, SSH_PRIVATE_KEY);
    if key.is_empty() {
        return Ok(false);
    }

    write_private_key(path, &key).await?;
    Ok(true)
}

/// Writes `key` to `path` readable by the owner only, replacing any previous
/// file. Missing parent directories are created owner-only as well.
pub async fn write_private_key(path: &Path, key: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        DirBuilder::new()
            .recursive(true)
            .mode(KEY_DIR_MODE)
            .create(dir)
            .await
            .map_err(|source| Error::KeyDir {
                path: dir.to_path_buf(),
                source,
            })?;
    }

    let key_write_err = |source: std::io::Error| Error::KeyWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(KEY_FILE_MODE)
        .open(path)
        .await
        .map_err(key_write_err)?;
    let written = async {
        file.write_all(key.as_bytes()).await?;
        file.flush().await
    };
    written.await.map_err(key_write_err)?;

    set_permissions(path, Permissions::from_mode(KEY_FILE_MODE))
        .await
        .map_err(key_write_err)?;

    info!("wrote private key to {}", path.display());
    Ok(())
}
