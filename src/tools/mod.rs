//! Tool trait, registry and dispatch boundary
//!
//! Tools are the deterministic leaves of the reasoning loop. The registry is
//! populated once at process start; dispatch never raises to the caller -
//! any tool fault becomes an error-shaped observation fed back into the
//! conversation.

pub mod create_alert;
pub mod get_client;
pub mod parse_transaction;
pub mod score_transaction;

pub use create_alert::CreateAlertTool;
pub use get_client::GetClientByIbanTool;
pub use parse_transaction::ParseTransactionTool;
pub use score_transaction::ScoreTransactionTool;

use crate::store::PartyStore;
use crate::Result;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Arguments as extracted by the action parser: flat string-to-string.
pub type ArgMap = HashMap<String, String>;

/// Trait for a single tool
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// Parameter documentation and one worked example, verbatim material for
    /// the system prompt.
    fn usage(&self) -> &'static str;
    /// Run the tool. The returned string is the observation text; failures
    /// are converted to error observations at the dispatch boundary.
    async fn invoke(&self, args: &ArgMap) -> Result<String>;
}

/// Tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted for deterministic prompts.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Concatenated usage blocks for the system prompt.
    pub fn catalog(&self) -> String {
        self.list()
            .iter()
            .filter_map(|name| self.tools.get(*name))
            .map(|tool| tool.usage())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Invoke `name` with `args`. Always returns an observation string: any
    /// fault inside a tool is caught here and converted to
    /// `{"error": "<tool> failed: <message>"}` so the loop never crashes
    /// because a tool failed.
    pub async fn dispatch(&self, name: &str, args: &ArgMap) -> String {
        let Some(tool) = self.get(name) else {
            warn!(tool = name, "Dispatch of unregistered tool");
            return json!({"error": format!("{} failed: tool not registered", name)})
                .to_string();
        };

        match tool.invoke(args).await {
            Ok(observation) => observation,
            Err(e) => {
                warn!(tool = name, error = %e, "Tool execution failed");
                json!({"error": format!("{} failed: {}", name, e)}).to_string()
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch a required argument or fail with a uniform message.
pub(crate) fn require_arg<'a>(args: &'a ArgMap, name: &str) -> Result<&'a str> {
    args.get(name)
        .map(|s| s.as_str())
        .ok_or_else(|| crate::AgentError::Tool(format!("missing required argument '{}'", name)))
}

/// Create the fixed investigation tool set over one party store.
pub fn default_registry(store: Arc<dyn PartyStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(ParseTransactionTool));
    registry.register(Arc::new(GetClientByIbanTool::new(store.clone())));
    registry.register(Arc::new(ScoreTransactionTool));
    registry.register(Arc::new(CreateAlertTool::new(store)));

    registry
}
