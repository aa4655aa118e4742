//! Party and alert persistence
//!
//! The core only consumes two operations: an IBAN-keyed party lookup and an
//! alert insert. Production stores live outside this crate; the in-memory
//! implementation backs tests and the demo binary.

use crate::models::{AlertRecord, ClientProfile};
use crate::Result;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Trait for the external persistence collaborator
#[async_trait::async_trait]
pub trait PartyStore: Send + Sync {
    /// Single-key equality lookup. `Ok(None)` means no such party.
    async fn find_party_by_iban(&self, iban: &str) -> Result<Option<ClientProfile>>;

    /// Record one fraud alert. Exactly one write per call; not idempotent.
    async fn insert_alert(
        &self,
        tx_summary: Value,
        client_summary: Value,
        reason: &str,
    ) -> Result<AlertRecord>;
}

/// In-memory party store for development and tests
pub struct InMemoryPartyStore {
    parties_by_iban: Arc<RwLock<HashMap<String, ClientProfile>>>,
    alerts: Arc<RwLock<Vec<AlertRecord>>>,
}

impl InMemoryPartyStore {
    pub fn new() -> Self {
        Self {
            parties_by_iban: Arc::new(RwLock::new(HashMap::new())),
            alerts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_parties(parties: Vec<ClientProfile>) -> Self {
        let mut map = HashMap::new();
        for party in parties {
            map.insert(party.iban.clone(), party);
        }
        Self {
            parties_by_iban: Arc::new(RwLock::new(map)),
            alerts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn insert_party(&self, party: ClientProfile) {
        let mut parties = self.parties_by_iban.write().await;
        parties.insert(party.iban.clone(), party);
    }

    pub async fn alert_count(&self) -> usize {
        self.alerts.read().await.len()
    }

    pub async fn alerts(&self) -> Vec<AlertRecord> {
        self.alerts.read().await.clone()
    }
}

impl Default for InMemoryPartyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PartyStore for InMemoryPartyStore {
    async fn find_party_by_iban(&self, iban: &str) -> Result<Option<ClientProfile>> {
        let parties = self.parties_by_iban.read().await;
        Ok(parties.get(iban).cloned())
    }

    async fn insert_alert(
        &self,
        tx_summary: Value,
        client_summary: Value,
        reason: &str,
    ) -> Result<AlertRecord> {
        let record = AlertRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            tx_summary,
            client_summary,
            reason: reason.to_string(),
        };

        let mut alerts = self.alerts.write().await;
        alerts.push(record.clone());

        Ok(record)
    }
}
