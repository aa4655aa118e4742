//! Client lookup tool
//!
//! Single-key equality query against the party store. Lookup failures are
//! reported inside the observation, never raised.

use crate::models::LookupResult;
use crate::store::PartyStore;
use crate::tools::{ArgMap, Tool};
use crate::Result;
use serde_json::json;
use std::sync::Arc;

pub struct GetClientByIbanTool {
    store: Arc<dyn PartyStore>,
}

impl GetClientByIbanTool {
    pub fn new(store: Arc<dyn PartyStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for GetClientByIbanTool {
    fn name(&self) -> &'static str {
        "get_client_by_iban"
    }

    fn description(&self) -> &'static str {
        "Retrieve client information from the database by IBAN"
    }

    fn usage(&self) -> &'static str {
        r#"get_client_by_iban:
  Description: Retrieve client information from the database by IBAN
  Parameters:
    - iban (str): The IBAN to look up
  Returns: JSON string with client details (risk_score, mean_sum, account_status, etc.) or {"found": false}
  Example: get_client_by_iban(iban="GB29NWBK60161331926819")
"#
    }

    async fn invoke(&self, args: &ArgMap) -> Result<String> {
        let iban = args.get("iban").map(|s| s.as_str()).unwrap_or_default();

        if iban.is_empty() {
            return Ok(json!({"found": false, "error": "no iban provided"}).to_string());
        }

        let result = match self.store.find_party_by_iban(iban).await {
            Ok(Some(client)) => LookupResult {
                found: true,
                client: Some(client),
                error: None,
            },
            Ok(None) => LookupResult::default(),
            Err(e) => LookupResult {
                found: false,
                client: None,
                error: Some(format!("db error: {}", e)),
            },
        };

        Ok(serde_json::to_string(&result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientProfile;
    use crate::store::InMemoryPartyStore;
    use crate::AgentError;
    use serde_json::Value;

    fn store_with_lambda() -> Arc<InMemoryPartyStore> {
        Arc::new(InMemoryPartyStore::with_parties(vec![ClientProfile {
            id: 13,
            name: "Lambda AB".to_string(),
            iban: "NO9386011117947".to_string(),
            mean_sum: 1000.0,
            country: Some("NO".to_string()),
            currency: Some("NOK".to_string()),
            account_status: "active".to_string(),
            risk_score: 5.0,
        }]))
    }

    async fn invoke_with_iban(tool: &GetClientByIbanTool, iban: &str) -> Value {
        let mut args = ArgMap::new();
        args.insert("iban".to_string(), iban.to_string());
        serde_json::from_str(&tool.invoke(&args).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn known_iban_returns_client() {
        let tool = GetClientByIbanTool::new(store_with_lambda());
        let result = invoke_with_iban(&tool, "NO9386011117947").await;

        assert_eq!(result["found"], true);
        assert_eq!(result["client"]["name"], "Lambda AB");
        assert_eq!(result["client"]["mean_sum"], 1000.0);
    }

    #[tokio::test]
    async fn unknown_iban_returns_not_found() {
        let tool = GetClientByIbanTool::new(store_with_lambda());
        let result = invoke_with_iban(&tool, "GB29NWBK60161331926819").await;

        assert_eq!(result["found"], false);
        assert!(result.get("client").is_none());
    }

    #[tokio::test]
    async fn empty_iban_reports_missing_input() {
        let tool = GetClientByIbanTool::new(store_with_lambda());
        let result = tool.invoke(&ArgMap::new()).await.unwrap();
        let parsed: Value = serde_json::from_str(&result).unwrap();

        assert_eq!(parsed["found"], false);
        assert_eq!(parsed["error"], "no iban provided");
    }

    struct BrokenStore;

    #[async_trait::async_trait]
    impl PartyStore for BrokenStore {
        async fn find_party_by_iban(
            &self,
            _iban: &str,
        ) -> Result<Option<ClientProfile>> {
            Err(AgentError::Store("connection refused".to_string()))
        }

        async fn insert_alert(
            &self,
            _tx: Value,
            _client: Value,
            _reason: &str,
        ) -> Result<crate::models::AlertRecord> {
            Err(AgentError::Store("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_db_error() {
        let tool = GetClientByIbanTool::new(Arc::new(BrokenStore));
        let result = invoke_with_iban(&tool, "NO9386011117947").await;

        assert_eq!(result["found"], false);
        assert!(result["error"].as_str().unwrap().starts_with("db error:"));
    }
}
