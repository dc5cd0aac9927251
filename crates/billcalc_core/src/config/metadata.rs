//! Human-readable names for billing entities
//!
//! `BillingMetadata` maps service names to the IDs assigned while building an
//! account, so configs and the builder DSL can refer to services by name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::ServiceId;

/// Metadata entry for a service
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EntityMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BillingMetadata {
    /// Service ID to metadata mapping
    pub services: HashMap<ServiceId, EntityMetadata>,

    /// Name to Service ID reverse lookup
    #[serde(default)]
    pub service_names: HashMap<String, ServiceId>,
}

impl BillingMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service with optional name and description
    pub fn register_service(
        &mut self,
        id: ServiceId,
        name: Option<String>,
        description: Option<String>,
    ) {
        if let Some(ref n) = name {
            self.service_names.insert(n.clone(), id);
        }
        self.services.insert(id, EntityMetadata { name, description });
    }

    /// Look up a service ID by name
    #[must_use]
    pub fn service_id(&self, name: &str) -> Option<ServiceId> {
        self.service_names.get(name).copied()
    }

    /// Get the name of a service by ID
    #[must_use]
    pub fn service_name(&self, id: ServiceId) -> Option<&str> {
        self.services.get(&id).and_then(|m| m.name.as_deref())
    }
}
