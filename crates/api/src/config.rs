//! Environment configuration, read once at startup.

use std::net::SocketAddr;

use anyhow::Context;

use wms_core::TenantDirectory;

pub const BIND_ADDR: &str = "WMS_BIND_ADDR";
pub const TENANTS: &str = "WMS_TENANTS";
pub const SEED_DEMO: &str = "WMS_SEED_DEMO";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Tenant → warehouse mapping, validated injective.
    pub tenants: TenantDirectory,
    /// Load the demo fixtures at startup.
    pub seed_demo: bool,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup(BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("{BIND_ADDR} is not a socket address: {bind_addr:?}"))?;

        let tenants = match lookup(TENANTS) {
            Some(raw) => TenantDirectory::parse(&raw)
                .with_context(|| format!("invalid {TENANTS}"))?,
            None => wms_infra::demo_directory().context("demo tenant mapping")?,
        };
        if tenants.is_empty() {
            anyhow::bail!("{TENANTS} must name at least one tenant");
        }

        let seed_demo = match lookup(SEED_DEMO) {
            None => true,
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("{SEED_DEMO} must be true or false, got {raw:?}"))?,
        };

        Ok(Self {
            bind_addr,
            tenants,
            seed_demo,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
