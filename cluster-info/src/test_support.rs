use std::sync::atomic::{AtomicUsize, Ordering};

use terraform::{OutputMeta, OutputSource, Outputs, TerraformError, TerraformResult};

use crate::cluster::{
    CONTROL_PLANE_PRIVATE_IP, CONTROL_PLANE_PUBLIC_IP, WORKER_PRIVATE_IP, WORKER_PUBLIC_IP,
};

/// Outputs of a fully deployed cluster, without the SSH key.
pub const DEPLOYED: &[(&str, &str)] = &[
    (CONTROL_PLANE_PUBLIC_IP, r#""203.0.113.10""#),
    (CONTROL_PLANE_PRIVATE_IP, r#""10.0.1.10""#),
    (WORKER_PUBLIC_IP, r#""203.0.113.20""#),
    (WORKER_PRIVATE_IP, r#""10.0.1.20""#),
];

/// Serves fixed outputs and counts how often they were requested.
pub struct StaticOutputs {
    outputs: Outputs,
    calls: AtomicUsize,
}

impl StaticOutputs {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            outputs: entries
                .iter()
                .map(|(k, v)| (k.to_string(), OutputMeta::new(*v)))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl OutputSource for StaticOutputs {
    async fn output(&self) -> TerraformResult<Outputs> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outputs.clone())
    }
}

pub struct FailingOutputs;

#[async_trait::async_trait]
impl OutputSource for FailingOutputs {
    async fn output(&self) -> TerraformResult<Outputs> {
        Err(TerraformError::OutputFailed("Error: state lock".to_owned()))
    }
}
