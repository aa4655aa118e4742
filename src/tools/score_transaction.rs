//! Deterministic fraud risk scorer
//!
//! Pure function of a transaction summary and an optional client profile.
//! Thresholds and rule ordering are part of the contract: the same inputs
//! must always produce the same score, classification and reason list.

use crate::models::{Classification, ClientProfile, LookupResult, RiskAssessment, TransactionSummary};
use crate::tools::{require_arg, ArgMap, Tool};
use crate::Result;

/// Guards the mean-sum division against exact zero.
const EPSILON: f64 = 1e-9;

/// Score one transaction. Rules fire in a fixed order; their reason strings
/// are appended in that order.
pub fn score(tx: &TransactionSummary, client: Option<&ClientProfile>) -> RiskAssessment {
    let amount = tx.amount.unwrap_or(0.0);
    let mut reasons = Vec::new();
    let mut score = 0.0_f64;

    match client {
        Some(c) => {
            let mean_sum = c.mean_sum;

            let ratio = if mean_sum > 0.0 {
                amount / (mean_sum + EPSILON)
            } else if amount > 0.0 {
                f64::INFINITY
            } else {
                0.0
            };

            // Highest applicable band only
            if ratio >= 10.0 {
                score += 60.0;
                reasons.push(format!("amount is {:.1}x mean_sum (very large)", ratio));
            } else if ratio >= 4.0 {
                score += 35.0;
                reasons.push(format!("amount is {:.1}x mean_sum (large)", ratio));
            } else if ratio >= 2.0 {
                score += 15.0;
                reasons.push(format!("amount is {:.1}x mean_sum (moderate)", ratio));
            }

            score += (c.risk_score * 0.3).min(30.0);

            let status = c.account_status.to_lowercase();
            if matches!(status.as_str(), "suspended" | "blocked" | "closed") {
                score += 25.0;
                reasons.push(format!("account_status={}", c.account_status));
            }

            if amount >= 10_000.0 {
                score += 20.0;
                reasons.push("absolute amount >= 10k".to_string());
            }
        }
        None => {
            if amount >= 5_000.0 {
                score += 50.0;
                reasons.push("unknown client + amount >= 5k".to_string());
            } else if amount >= 1_000.0 {
                score += 20.0;
                reasons.push("unknown client + amount >= 1k".to_string());
            }
        }
    }

    let score = score.min(100.0);
    let classification = if score >= 70.0 {
        Classification::Fraud
    } else if score >= 35.0 {
        Classification::Suspicious
    } else {
        Classification::Ok
    };

    RiskAssessment {
        score,
        classification,
        reasons,
        amount,
    }
}

pub struct ScoreTransactionTool;

#[async_trait::async_trait]
impl Tool for ScoreTransactionTool {
    fn name(&self) -> &'static str {
        "score_transaction"
    }

    fn description(&self) -> &'static str {
        "Calculate a fraud risk score for a transaction based on amount, client history, and risk factors"
    }

    fn usage(&self) -> &'static str {
        r#"score_transaction:
  Description: Calculate a fraud risk score for a transaction based on amount, client history, and risk factors
  Parameters:
    - tx_json (str): JSON string from parse_transaction
    - client_json (str, optional): JSON string from get_client_by_iban
  Returns: JSON string with score (0-100), classification (ok/suspicious/fraud), and reasons
  Example: score_transaction(tx_json="{...}", client_json="{...}")
"#
    }

    async fn invoke(&self, args: &ArgMap) -> Result<String> {
        let tx_json = require_arg(args, "tx_json")?;
        let tx: TransactionSummary = serde_json::from_str(tx_json)?;

        let lookup: Option<LookupResult> = match args.get("client_json") {
            Some(raw) if !raw.is_empty() => Some(serde_json::from_str(raw)?),
            _ => None,
        };
        let client = lookup
            .as_ref()
            .filter(|l| l.found)
            .and_then(|l| l.client.as_ref());

        let assessment = score(&tx, client);
        Ok(serde_json::to_string(&assessment)?)
    }
}
