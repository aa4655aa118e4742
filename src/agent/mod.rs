//! Fraud investigation orchestrator
//!
//! Drives the Thought/Action/Observation loop: ask the model for the next
//! step, execute at most one tool, feed the observation back, repeat until a
//! final answer appears or the iteration cap is hit.

use crate::action::parse_action;
use crate::config::AgentConfig;
use crate::models::ChatMessage;
use crate::ollama::ModelClient;
use crate::tools::ToolRegistry;
use crate::Result;
use tracing::{debug, info, warn};

const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Returned when the iteration cap is exhausted. A soft failure, not an
/// error: the caller decides what to do with an inconclusive investigation.
pub const MAX_ITERATIONS_MESSAGE: &str = "Maximum iterations reached without a final answer.";

/// Sent back when a response carries neither a final answer nor a usable
/// action. Protocol violations are recovered locally, never surfaced.
const CORRECTIVE_PROMPT: &str =
    "Please provide your next Thought and Action, or a Final Answer if you're done.";

/// One investigation driver. Independent instances may run concurrently;
/// each `run` call owns its conversation state exclusively.
pub struct Orchestrator {
    config: AgentConfig,
    model: Box<dyn ModelClient>,
    registry: ToolRegistry,
}

impl Orchestrator {
    pub fn new(config: AgentConfig, model: Box<dyn ModelClient>, registry: ToolRegistry) -> Self {
        Self {
            config,
            model,
            registry,
        }
    }

    /// Run the investigation loop on a free-text task.
    ///
    /// Returns the model's final answer, or [`MAX_ITERATIONS_MESSAGE`] when
    /// the cap runs out. Only a model-service fault is an `Err`.
    pub async fn run(&self, task: &str) -> Result<String> {
        let mut messages = vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(task),
        ];

        info!(max_iterations = self.config.max_iterations, "Starting investigation");

        for iteration in 1..=self.config.max_iterations {
            debug!(iteration, "Requesting next model step");

            let response = self.model.chat(&messages).await?;

            // Last marker wins: the model sometimes restates the format
            // before concluding.
            if let Some(idx) = response.rfind(FINAL_ANSWER_MARKER) {
                let answer = response[idx + FINAL_ANSWER_MARKER.len()..].trim().to_string();
                info!(iteration, "Investigation concluded with a final answer");
                return Ok(answer);
            }

            let known_tools = self.registry.list();
            match parse_action(&response, &known_tools) {
                Some(invocation) => {
                    debug!(tool = %invocation.name, "Executing action");

                    let observation = self
                        .registry
                        .dispatch(&invocation.name, &invocation.arguments)
                        .await;

                    debug!(tool = %invocation.name, observation = %observation, "Tool observation");

                    messages.push(ChatMessage::assistant(response));
                    messages.push(ChatMessage::user(format!("Observation: {}", observation)));
                }
                None => {
                    warn!(iteration, "Response had no action or final answer, re-prompting");

                    messages.push(ChatMessage::assistant(response));
                    messages.push(ChatMessage::user(CORRECTIVE_PROMPT));
                }
            }
        }

        info!("Iteration cap exhausted without a final answer");
        Ok(MAX_ITERATIONS_MESSAGE.to_string())
    }

    /// System instructions: agent role, the tool catalog, and the exact
    /// Thought/Action/Observation grammar the model must follow.
    fn system_prompt(&self) -> String {
        format!(
            r#"You are a fraud detection AI agent. You analyze banking transactions and create alerts for suspicious activity.

You have access to these tools:
{catalog}

You must use the ReACT (Reasoning and Acting) format:

Thought: [your reasoning about what to do next]
Action: [tool_name(param1="value1", param2="value2")]
Observation: [result will be provided by the system]
... (repeat Thought/Action/Observation as needed)
Thought: I now have enough information to provide a final answer
Final Answer: [your conclusion]

IMPORTANT RULES:
1. Always start with "Thought:" to reason about the next step
2. Use "Action:" to call exactly ONE tool at a time
3. Wait for "Observation:" before proceeding (the system will provide this)
4. Use the EXACT tool names and parameter names shown above
5. When calling actions, use this exact format: tool_name(param1="value", param2="value")
6. Parameter values must be properly escaped strings
7. When you have a final answer, use "Final Answer:" to conclude

Example flow for analyzing a transaction:
Thought: I need to first parse the XML transaction to extract details
Action: parse_transaction(xml_string="<Document>...</Document>")
Observation: {{"debtor_iban": "GB29...", "amount": 15000, ...}}
Thought: Now I should check if the debtor client exists in our database
Action: get_client_by_iban(iban="GB29...")
Observation: {{"found": true, "client": {{"risk_score": 75, ...}}}}
Thought: I have the transaction and client data, let me calculate the risk score
Action: score_transaction(tx_json="{{...}}", client_json="{{...}}")
Observation: {{"score": 85, "classification": "fraud", ...}}
Thought: The score is 85 (fraud level), I should create an alert
Action: create_alert(tx_json="{{...}}", client_json="{{...}}", reason="High risk score of 85")
Observation: {{"alert_id": 123, ...}}
Thought: I have completed the analysis and created an alert
Final Answer: Transaction analyzed. Fraud score: 85. Alert #123 created.

Begin!"#,
            catalog = self.registry.catalog()
        )
    }
}
