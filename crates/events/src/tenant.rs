use wms_core::TenantId;

use crate::EventEnvelope;

/// Helper trait for tenant-scoped messages.
///
/// Lets consumers that fan in events from every warehouse (the HTTP event
/// stream, for one) filter down to a single tenant without knowing the
/// payload type.
pub trait TenantScoped {
    fn tenant_id(&self) -> &TenantId;

    fn belongs_to(&self, tenant_id: &TenantId) -> bool {
        self.tenant_id() == tenant_id
    }
}

impl<E> TenantScoped for EventEnvelope<E> {
    fn tenant_id(&self) -> &TenantId {
        EventEnvelope::tenant_id(self)
    }
}
