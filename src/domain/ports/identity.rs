//! Identity provider port.

use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Supplies the subject an action is attributed to.
pub trait IdentityProvider: Send + Sync {
    fn current_subject(&self) -> DomainResult<Uuid>;
}

/// Identity fixed at startup (CLI flag or configuration).
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIdentity {
    subject_id: Option<Uuid>,
}

impl StaticIdentity {
    pub fn new(subject_id: Option<Uuid>) -> Self {
        Self { subject_id }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_subject(&self) -> DomainResult<Uuid> {
        self.subject_id.ok_or_else(|| {
            DomainError::ValidationFailed(
                "No acting subject: pass --subject or set identity.subject_id".to_string(),
            )
        })
    }
}
