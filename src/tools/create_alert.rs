//! Alert creation tool
//!
//! One external write per call; repeated identical calls create repeated
//! alerts. Malformed JSON input is rejected before anything is written.

use crate::store::PartyStore;
use crate::tools::{require_arg, ArgMap, Tool};
use crate::Result;
use chrono::SecondsFormat;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct CreateAlertTool {
    store: Arc<dyn PartyStore>,
}

impl CreateAlertTool {
    pub fn new(store: Arc<dyn PartyStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for CreateAlertTool {
    fn name(&self) -> &'static str {
        "create_alert"
    }

    fn description(&self) -> &'static str {
        "Create a fraud alert in the database for suspicious transactions"
    }

    fn usage(&self) -> &'static str {
        r#"create_alert:
  Description: Create a fraud alert in the database for suspicious transactions
  Parameters:
    - tx_json (str): JSON string with transaction summary
    - client_json (str): JSON string with client summary
    - reason (str): Human-readable reason for the alert
  Returns: JSON string with alert_id and created_at timestamp
  Example: create_alert(tx_json="{...}", client_json="{...}", reason="High value transaction from suspended account")
"#
    }

    async fn invoke(&self, args: &ArgMap) -> Result<String> {
        let tx_json = require_arg(args, "tx_json")?;
        let reason = require_arg(args, "reason")?;

        // Both summaries must parse before any write happens.
        let tx_summary: Value = serde_json::from_str(tx_json)?;
        let client_summary: Value = match args.get("client_json") {
            Some(raw) if !raw.is_empty() => serde_json::from_str(raw)?,
            _ => json!({}),
        };

        let record = self
            .store
            .insert_alert(tx_summary, client_summary, reason)
            .await?;

        info!(alert_id = %record.id, reason = %record.reason, "Fraud alert created");

        Ok(json!({
            "alert_id": record.id,
            "created_at": record.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            "reason": reason,
        })
        .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryPartyStore;

    fn args(tx: &str, client: &str, reason: &str) -> ArgMap {
        let mut map = ArgMap::new();
        map.insert("tx_json".to_string(), tx.to_string());
        map.insert("client_json".to_string(), client.to_string());
        map.insert("reason".to_string(), reason.to_string());
        map
    }

    #[tokio::test]
    async fn creates_alert_and_reports_utc_timestamp() {
        let store = Arc::new(InMemoryPartyStore::new());
        let tool = CreateAlertTool::new(store.clone());

        let observation = tool
            .invoke(&args(
                r#"{"amount": 20000, "debtor_iban": "NO9386011117947"}"#,
                r#"{"found": false}"#,
                "High risk score of 80",
            ))
            .await
            .unwrap();

        let parsed: Value = serde_json::from_str(&observation).unwrap();
        assert!(parsed["alert_id"].is_string());
        assert!(parsed["created_at"].as_str().unwrap().ends_with('Z'));
        assert_eq!(parsed["reason"], "High risk score of 80");
        assert_eq!(store.alert_count().await, 1);
    }

    #[tokio::test]
    async fn malformed_tx_json_writes_nothing() {
        let store = Arc::new(InMemoryPartyStore::new());
        let tool = CreateAlertTool::new(store.clone());

        let result = tool
            .invoke(&args("{broken", r#"{}"#, "bad input"))
            .await;

        assert!(result.is_err());
        assert_eq!(store.alert_count().await, 0);
    }

    #[tokio::test]
    async fn empty_client_json_defaults_to_empty_object() {
        let store = Arc::new(InMemoryPartyStore::new());
        let tool = CreateAlertTool::new(store.clone());

        let mut map = ArgMap::new();
        map.insert("tx_json".to_string(), r#"{"amount": 9000}"#.to_string());
        map.insert("reason".to_string(), "unknown client".to_string());

        tool.invoke(&map).await.unwrap();

        let alerts = store.alerts().await;
        assert_eq!(alerts[0].client_summary, json!({}));
    }

    #[tokio::test]
    async fn repeated_calls_create_repeated_alerts() {
        let store = Arc::new(InMemoryPartyStore::new());
        let tool = CreateAlertTool::new(store.clone());
        let call = args(r#"{"amount": 9000}"#, r#"{}"#, "dup check");

        tool.invoke(&call).await.unwrap();
        tool.invoke(&call).await.unwrap();

        assert_eq!(store.alert_count().await, 2);
    }
}
