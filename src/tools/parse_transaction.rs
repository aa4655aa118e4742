//! ISO 20022 pain.001 transaction parser
//!
//! Extracts the summary fields of one customer credit-transfer-initiation
//! document. Tolerant of missing optional elements; strict only about
//! overall well-formedness.

use crate::models::TransactionSummary;
use crate::tools::{require_arg, ArgMap, Tool};
use crate::Result;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::json;

/// Parse one pain.001.001.03 document into a [`TransactionSummary`].
///
/// A missing element leaves its field as `None`. Input that is not
/// well-formed XML yields an error message prefixed `"XML parse error:"`.
pub fn parse_transaction(xml: &str) -> std::result::Result<TransactionSummary, String> {
    let mut reader = Reader::from_str(xml.trim());
    reader.config_mut().trim_text(true);

    let mut summary = TransactionSummary::default();
    let mut path: Vec<String> = Vec::new();
    let mut saw_root = false;
    // Amount and currency come from the first InstdAmt under CdtTrfTxInf only.
    let mut seen_instd_amt = false;
    let mut capturing_amount = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                saw_root = true;
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

                if name == "InstdAmt" && in_credit_transfer(&path) && !seen_instd_amt {
                    seen_instd_amt = true;
                    capturing_amount = true;
                    summary.currency = currency_attribute(&e)?;
                }

                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                saw_root = true;
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

                if name == "InstdAmt" && in_credit_transfer(&path) && !seen_instd_amt {
                    seen_instd_amt = true;
                    summary.currency = currency_attribute(&e)?;
                }
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| format!("XML parse error: {}", e))?
                    .into_owned();
                if text.is_empty() {
                    continue;
                }

                if capturing_amount {
                    let value = text
                        .parse::<f64>()
                        .map_err(|_| format!("invalid amount value '{}'", text))?;
                    summary.amount.get_or_insert(value);
                    continue;
                }

                assign_field(&mut summary, &path, text);
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"InstdAmt" {
                    capturing_amount = false;
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("XML parse error: {}", e)),
        }
    }

    if !saw_root {
        return Err("XML parse error: no element found".to_string());
    }

    Ok(summary)
}

fn in_credit_transfer(path: &[String]) -> bool {
    path.iter().any(|seg| seg == "CdtTrfTxInf")
}

fn currency_attribute(
    e: &quick_xml::events::BytesStart<'_>,
) -> std::result::Result<Option<String>, String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| format!("XML parse error: {}", e))?;
        if attr.key.local_name().as_ref() == b"Ccy" {
            let value = attr
                .unescape_value()
                .map_err(|e| format!("XML parse error: {}", e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Route element text to its summary field based on the enclosing elements.
/// First occurrence wins for every field.
fn assign_field(summary: &mut TransactionSummary, path: &[String], text: String) {
    let leaf = match path.last() {
        Some(leaf) => leaf.as_str(),
        None => return,
    };
    let parent = path
        .len()
        .checked_sub(2)
        .map(|i| path[i].as_str())
        .unwrap_or("");
    let grandparent = path
        .len()
        .checked_sub(3)
        .map(|i| path[i].as_str())
        .unwrap_or("");

    let slot = match (parent, leaf) {
        ("GrpHdr", "MsgId") => &mut summary.msg_id,
        ("GrpHdr", "CreDtTm") => &mut summary.created_at,
        ("GrpHdr", "NbOfTxs") => &mut summary.nb_of_txs,
        ("GrpHdr", "CtrlSum") => &mut summary.ctrl_sum,
        ("InitgPty", "Nm") => &mut summary.initiating_party,
        ("PmtInf", "PmtInfId") => &mut summary.pmt_inf_id,
        ("Dbtr", "Nm") => &mut summary.debtor_name,
        ("Id", "IBAN") if grandparent == "DbtrAcct" => &mut summary.debtor_iban,
        ("Cdtr", "Nm") => &mut summary.creditor_name,
        ("Id", "IBAN") if grandparent == "CdtrAcct" => &mut summary.creditor_iban,
        ("PmtId", "EndToEndId") => &mut summary.end_to_end_id,
        _ => return,
    };

    slot.get_or_insert(text);
}

pub struct ParseTransactionTool;

#[async_trait::async_trait]
impl Tool for ParseTransactionTool {
    fn name(&self) -> &'static str {
        "parse_transaction"
    }

    fn description(&self) -> &'static str {
        "Parse an ISO 20022 XML transaction string and extract key fields"
    }

    fn usage(&self) -> &'static str {
        r#"parse_transaction:
  Description: Parse an ISO 20022 XML transaction string and extract key fields
  Parameters:
    - xml_string (str): The XML transaction as a string
  Returns: JSON string with transaction details (msg_id, debtor_iban, creditor_iban, amount, currency, etc.)
  Example: parse_transaction(xml_string="<Document>...</Document>")
"#
    }

    async fn invoke(&self, args: &ArgMap) -> Result<String> {
        let xml = require_arg(args, "xml_string")?;

        let observation = match parse_transaction(xml) {
            Ok(summary) => serde_json::to_string(&summary)?,
            Err(message) => json!({"error": message}).to_string(),
        };

        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="urn:iso:std:iso:20022:tech:xsd:pain.001.001.03">
  <CstmrCdtTrfInitn>
    <GrpHdr>
      <MsgId>MSG-1</MsgId>
      <CreDtTm>2025-10-28T09:59:50Z</CreDtTm>
      <NbOfTxs>1</NbOfTxs>
      <CtrlSum>1214.15</CtrlSum>
      <InitgPty>
        <Nm>Lambda AB</Nm>
      </InitgPty>
    </GrpHdr>
    <PmtInf>
      <PmtInfId>PmtInf-1</PmtInfId>
      <PmtMtd>TRF</PmtMtd>
      <Dbtr>
        <Nm>Lambda AB</Nm>
      </Dbtr>
      <DbtrAcct>
        <Id>
          <IBAN>NO9386011117947</IBAN>
        </Id>
      </DbtrAcct>
      <CdtTrfTxInf>
        <PmtId>
          <EndToEndId>E2E-1</EndToEndId>
        </PmtId>
        <Amt>
          <InstdAmt Ccy="EUR">1214.15</InstdAmt>
        </Amt>
        <Cdtr>
          <Nm>Pi Enterprises</Nm>
        </Cdtr>
        <CdtrAcct>
          <Id>
            <IBAN>PT50000201231234567890154</IBAN>
          </Id>
        </CdtrAcct>
      </CdtTrfTxInf>
    </PmtInf>
  </CstmrCdtTrfInitn>
</Document>
"#;

    #[test]
    fn parses_full_document() {
        let summary = parse_transaction(EXAMPLE_XML).unwrap();

        assert_eq!(summary.msg_id.as_deref(), Some("MSG-1"));
        assert_eq!(summary.created_at.as_deref(), Some("2025-10-28T09:59:50Z"));
        assert_eq!(summary.nb_of_txs.as_deref(), Some("1"));
        assert_eq!(summary.ctrl_sum.as_deref(), Some("1214.15"));
        assert_eq!(summary.initiating_party.as_deref(), Some("Lambda AB"));
        assert_eq!(summary.pmt_inf_id.as_deref(), Some("PmtInf-1"));
        assert_eq!(summary.debtor_name.as_deref(), Some("Lambda AB"));
        assert_eq!(summary.debtor_iban.as_deref(), Some("NO9386011117947"));
        assert_eq!(summary.creditor_name.as_deref(), Some("Pi Enterprises"));
        assert_eq!(
            summary.creditor_iban.as_deref(),
            Some("PT50000201231234567890154")
        );
        assert_eq!(summary.end_to_end_id.as_deref(), Some("E2E-1"));
        assert_eq!(summary.amount, Some(1214.15));
        assert_eq!(summary.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn parsing_is_deterministic() {
        let first = parse_transaction(EXAMPLE_XML).unwrap();
        let second = parse_transaction(EXAMPLE_XML).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_xml_returns_parse_error() {
        let result = parse_transaction("this is not xml");
        let message = result.unwrap_err();
        assert!(
            message.starts_with("XML parse error:"),
            "unexpected message: {}",
            message
        );
    }

    #[test]
    fn missing_amount_yields_nulls_not_error() {
        let minimal = r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="urn:iso:std:iso:20022:tech:xsd:pain.001.001.03">
  <CstmrCdtTrfInitn>
    <GrpHdr><MsgId>MSG-2</MsgId></GrpHdr>
    <PmtInf><PmtInfId>P-2</PmtInfId></PmtInf>
  </CstmrCdtTrfInitn>
</Document>
"#;
        let summary = parse_transaction(minimal).unwrap();
        assert_eq!(summary.msg_id.as_deref(), Some("MSG-2"));
        assert_eq!(summary.pmt_inf_id.as_deref(), Some("P-2"));
        assert_eq!(summary.amount, None);
        assert_eq!(summary.currency, None);
        assert_eq!(summary.debtor_iban, None);
    }

    #[tokio::test]
    async fn tool_reports_parse_error_as_observation() {
        let tool = ParseTransactionTool;
        let mut args = ArgMap::new();
        args.insert("xml_string".to_string(), "<broken".to_string());

        let observation = tool.invoke(&args).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&observation).unwrap();
        assert!(parsed["error"]
            .as_str()
            .unwrap()
            .starts_with("XML parse error:"));
    }
}
