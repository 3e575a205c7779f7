use std::sync::Arc;

use interview_backend::InterviewBackend;
use interview_backend_mock::ScriptedBackend;
use interview_gateway::{BackendKind, GatewayConfig, HttpBackend};

/// Builds the backend the host selected explicitly.
pub fn backend_for_kind(
    kind: BackendKind,
    config: &GatewayConfig,
) -> Result<Arc<dyn InterviewBackend>, String> {
    match kind {
        BackendKind::Http => HttpBackend::new(config.api.clone())
            .map(|backend| Arc::new(backend) as Arc<dyn InterviewBackend>)
            .map_err(|error| format!("cannot configure HTTP backend: {error}")),
        BackendKind::Mock => Ok(Arc::new(ScriptedBackend::demo())),
    }
}
