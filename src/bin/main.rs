use fraud_sentinel::{
    agent::Orchestrator,
    config::AgentConfig,
    models::ClientProfile,
    ollama::OllamaClient,
    store::InMemoryPartyStore,
    tools::default_registry,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Demo party records matching the seeded bank database.
fn demo_parties() -> Vec<ClientProfile> {
    let raw = [
        (1, "ACME Corp", "DE89370400440532013000", "DE", "EUR"),
        (2, "John Doe", "GB29NWBK60161331926819", "GB", "GBP"),
        (3, "Alpha Ltd", "FR1420041010050500013M02606", "FR", "EUR"),
        (13, "Lambda AB", "NO9386011117947", "NO", "NOK"),
        (18, "Pi Enterprises", "PT50000201231234567890154", "PT", "EUR"),
    ];

    raw.iter()
        .map(|(id, name, iban, country, currency)| ClientProfile {
            id: *id,
            name: name.to_string(),
            iban: iban.to_string(),
            mean_sum: 1000.0,
            country: Some(country.to_string()),
            currency: Some(currency.to_string()),
            account_status: "active".to_string(),
            risk_score: 0.0,
        })
        .collect()
}

fn task_for_xml(transaction_xml: &str) -> String {
    format!(
        r#"
Analyze this banking transaction for fraud:

{transaction_xml}

Please:
1. Parse the XML transaction to extract details
2. Check if the debtor client exists in our database using their IBAN
3. Check if the creditor client exists in our database using their IBAN
4. Calculate a fraud risk score for this transaction
5. If the score indicates 'suspicious' or 'fraud' classification, create an alert in the database
6. Provide a summary of your findings
"#
    )
}

fn example_task() -> String {
    r#"
Analyze a hypothetical banking transaction for fraud:

Transaction details:
- Message ID: MSG-2024-001
- Debtor: John Smith
- Debtor IBAN: GB29NWBK60161331926819
- Creditor: Acme Corp
- Creditor IBAN: FR1420041010050500013M02606
- Amount: 25000 EUR
- Date: 2024-11-18

Please:
1. Check if the debtor (GB29NWBK60161331926819) exists in our database
2. Check if the creditor (FR1420041010050500013M02606) exists in our database
3. Create a mock transaction summary in JSON format
4. Calculate a fraud risk score based on the amount and any client data found
5. If the score is concerning, create an alert
6. Provide a summary of your findings
"#
    .to_string()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Fraud Sentinel starting");

    let config = AgentConfig::from_env();

    let store = Arc::new(InMemoryPartyStore::with_parties(demo_parties()));
    let registry = default_registry(store.clone());
    let model = OllamaClient::new(&config);
    let orchestrator = Orchestrator::new(config, Box::new(model), registry);

    let task = match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "Loading transaction XML");
            let xml = std::fs::read_to_string(Path::new(&path))?;
            task_for_xml(&xml)
        }
        None => {
            println!("No transaction file provided. Using example task.");
            println!("Usage: sentinel <path_to_transaction.xml>");
            example_task()
        }
    };

    match orchestrator.run(&task).await {
        Ok(answer) => {
            println!("\n=== INVESTIGATION RESULT ===");
            println!("{}", answer);
            println!("\nAlerts recorded: {}", store.alert_count().await);
            Ok(())
        }
        Err(e) => {
            eprintln!("Investigation failed: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
