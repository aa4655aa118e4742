//! Core data models for the fraud investigation agent

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

//
// ================= Conversation =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message in the conversation. The orchestrator owns the
/// message sequence for the lifetime of a single `run` call; it is
/// append-only and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

//
// ================= Actions =================
//

/// A tool call extracted from the latest assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: HashMap<String, String>,
}

//
// ================= Transaction =================
//

/// Fields extracted from one pain.001 credit-transfer-initiation document.
/// Every field is optional: a missing element yields a null, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionSummary {
    pub msg_id: Option<String>,
    pub created_at: Option<String>,
    pub nb_of_txs: Option<String>,
    pub ctrl_sum: Option<String>,
    pub initiating_party: Option<String>,
    pub pmt_inf_id: Option<String>,
    pub debtor_name: Option<String>,
    pub debtor_iban: Option<String>,
    pub creditor_name: Option<String>,
    pub creditor_iban: Option<String>,
    pub end_to_end_id: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

//
// ================= Client =================
//

/// Read-only snapshot of a party record, as returned by the party store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProfile {
    pub id: i64,
    pub name: String,
    pub iban: String,
    pub mean_sum: f64,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub account_status: String,
    pub risk_score: f64,
}

/// Wire shape of a client lookup observation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

//
// ================= Risk =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Ok,
    Suspicious,
    Fraud,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Classification::Ok => "ok",
            Classification::Suspicious => "suspicious",
            Classification::Fraud => "fraud",
        };
        write!(f, "{}", s)
    }
}

/// Deterministic risk assessment for one transaction. Pure function of the
/// transaction summary and an optional client profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub classification: Classification,
    pub reasons: Vec<String>,
    pub amount: f64,
}

//
// ================= Alerts =================
//

/// A fraud alert as recorded by the party store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub tx_summary: Value,
    pub client_summary: Value,
    pub reason: String,
}
