//! Tenant → warehouse mapping.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::{TenantId, WarehouseId};

/// A tenant known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub warehouse_id: WarehouseId,
}

/// Injective, total mapping from tenant to its single warehouse.
///
/// The mapping is provisioned outside this core and handed in at startup; the
/// directory only validates it and answers lookups. It is immutable once built.
#[derive(Debug, Clone, Default)]
pub struct TenantDirectory {
    tenants: BTreeMap<TenantId, Tenant>,
    by_warehouse: HashMap<WarehouseId, TenantId>,
}

impl TenantDirectory {
    pub fn new(tenants: impl IntoIterator<Item = Tenant>) -> DomainResult<Self> {
        let mut dir = Self::default();
        for tenant in tenants {
            if dir.tenants.contains_key(&tenant.id) {
                return Err(DomainError::TenantMapping(format!(
                    "tenant {} is listed twice",
                    tenant.id
                )));
            }
            if let Some(owner) = dir.by_warehouse.get(&tenant.warehouse_id) {
                return Err(DomainError::TenantMapping(format!(
                    "warehouse {} is already owned by tenant {owner}",
                    tenant.warehouse_id
                )));
            }
            dir.by_warehouse
                .insert(tenant.warehouse_id.clone(), tenant.id.clone());
            dir.tenants.insert(tenant.id.clone(), tenant);
        }
        Ok(dir)
    }

    /// Parse `tenant-1=WH-001,tenant-2=WH-002`.
    ///
    /// Tenant names default to the tenant id.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let mut tenants = Vec::new();
        for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (tenant, warehouse) = pair.split_once('=').ok_or_else(|| {
                DomainError::TenantMapping(format!("expected tenant=warehouse, got {pair:?}"))
            })?;
            let id = TenantId::new(tenant)?;
            tenants.push(Tenant {
                name: id.to_string(),
                id,
                warehouse_id: WarehouseId::new(warehouse)?,
            });
        }
        Self::new(tenants)
    }

    pub fn warehouse_of(&self, tenant_id: &TenantId) -> DomainResult<&WarehouseId> {
        self.tenants
            .get(tenant_id)
            .map(|t| &t.warehouse_id)
            .ok_or_else(|| DomainError::UnknownTenant(tenant_id.to_string()))
    }

    pub fn tenant_of(&self, warehouse_id: &WarehouseId) -> Option<&TenantId> {
        self.by_warehouse.get(warehouse_id)
    }

    pub fn get(&self, tenant_id: &TenantId) -> Option<&Tenant> {
        self.tenants.get(tenant_id)
    }

    /// Tenants in identifier order.
    pub fn tenants(&self) -> impl Iterator<Item = &Tenant> {
        self.tenants.values()
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}
