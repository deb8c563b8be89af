//! Local application directory.
//!
//! Stands in for the destination platform's application registry: creation
//! mints an identifier and records when it happened. Create-application
//! steps only see the `ApplicationDirectory` port, so swapping in a remote
//! client later is an adapter change, not an engine change.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use prefab_core::{
    application::{ApplicationDirectory, ApplicationError},
    error::EngineResult,
};

/// One registered application.
#[derive(Debug, Clone)]
pub struct ApplicationRecord {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Thread-safe, process-local application registry.
#[derive(Debug, Clone, Default)]
pub struct LocalApplicationDirectory {
    inner: Arc<RwLock<HashMap<String, ApplicationRecord>>>,
}

impl LocalApplicationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a registered application by name (testing/CLI helper).
    pub fn get(&self, name: &str) -> Option<ApplicationRecord> {
        self.inner.read().ok()?.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ApplicationDirectory for LocalApplicationDirectory {
    fn create_application(&self, name: &str) -> EngineResult<String> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.contains_key(name) {
            return Err(ApplicationError::ApplicationCreate {
                name: name.into(),
                reason: "an application with this name already exists".into(),
            }
            .into());
        }

        let record = ApplicationRecord {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
        };
        let id = record.id.clone();
        inner.insert(name.into(), record);

        info!(application = %name, id = %id, "application registered");
        Ok(id)
    }
}
