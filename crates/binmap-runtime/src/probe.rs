//! `RuntimeProber` backed by the runtime command.

use async_trait::async_trait;
use binmap_core::{ChildEnv, ProbeError, RehashConfig, RuntimeProber, RuntimeProfile};
use tracing::debug;

use crate::command::{RunError, run_captured, runtime_command};

/// Script printing version, package root, engine and engine ABI version.
pub const PROBE_SCRIPT: &str = include_str!("../scripts/probe.rb");

/// Probes a runtime version by running the probe script under it.
#[derive(Debug, Clone)]
pub struct CommandProber {
    config: RehashConfig,
    base_env: ChildEnv,
}

impl CommandProber {
    /// Prober whose children start from the current process environment.
    pub fn new(config: RehashConfig) -> Self {
        Self::with_base_env(config, ChildEnv::capture())
    }

    pub const fn with_base_env(config: RehashConfig, base_env: ChildEnv) -> Self {
        Self { config, base_env }
    }
}

#[async_trait]
impl RuntimeProber for CommandProber {
    async fn probe(&self, version_id: &str) -> Result<Option<RuntimeProfile>, ProbeError> {
        let env = self.base_env.for_runtime(version_id, &self.config);
        let cmd = runtime_command(&self.config.runtime_command, PROBE_SCRIPT, &env, None);
        let label = format!("probe {version_id}");

        let captured = run_captured(cmd, &label, self.config.probe_timeout())
            .await
            .map_err(|e| match e {
                RunError::Spawn(source) => ProbeError::Spawn {
                    version_id: version_id.to_string(),
                    reason: source.to_string(),
                },
                RunError::TimedOut(secs) => ProbeError::TimedOut {
                    version_id: version_id.to_string(),
                    secs,
                },
                RunError::Io(source) => ProbeError::Failed {
                    version_id: version_id.to_string(),
                    status: source.to_string(),
                },
            })?;

        // No output means the version manager has no such version.
        if captured.stdout.trim().is_empty() {
            debug!(version_id, status = %captured.status, "Probe printed nothing");
            return Ok(None);
        }
        if !captured.status.success() {
            return Err(ProbeError::Failed {
                version_id: version_id.to_string(),
                status: captured.status.to_string(),
            });
        }

        RuntimeProfile::from_probe_output(version_id, &captured.stdout)
    }
}
