use crate::registry::ResourceKind;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("mount container not found")]
    MissingContainer,
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("failed to allocate {kind:?}: {reason}")]
    Allocation { kind: ResourceKind, reason: String },
    #[error("failed to attach '{event}' listener: {reason}")]
    Listener { event: &'static str, reason: String },
    #[error("frame request failed: {0}")]
    Frame(String),
    #[error("render failed: {0}")]
    Render(String),
}

impl EngineError {
    pub fn allocation(kind: ResourceKind, reason: impl Into<String>) -> Self {
        EngineError::Allocation {
            kind,
            reason: reason.into(),
        }
    }
}
