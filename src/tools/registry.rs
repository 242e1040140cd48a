use std::future::Future;
use std::pin::Pin;

use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};

use crate::error::{ChatbotError, Result};

pub type ToolFuture = Pin<Box<dyn Future<Output = Result<String>> + Send>>;
pub type ToolHandler = Box<dyn Fn(String) -> ToolFuture + Send + Sync>;

/// Name of the single free-text argument every catalog tool takes.
pub const QUERY_ARGUMENT: &str = "query";

pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: ToolHandler,
}

impl ToolSpec {
    /// A tool taking one required string argument named `query`.
    pub fn text_tool(
        name: impl Into<String>,
        description: impl Into<String>,
        argument_description: &str,
        handler: ToolHandler,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    QUERY_ARGUMENT: {
                        "type": "string",
                        "description": argument_description
                    }
                },
                "required": [QUERY_ARGUMENT],
                "additionalProperties": false
            }),
            handler,
        }
    }
}

/// Ordered set of tools offered to the model.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; a tool with the same name is replaced.
    pub fn register(&mut self, spec: ToolSpec) {
        self.tools.retain(|t| t.name != spec.name);
        self.tools.push(spec);
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn list(&self) -> Vec<&ToolSpec> {
        self.tools.iter().collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn validate_arguments(
        &self,
        tool_name: &str,
        arguments: &Value,
    ) -> std::result::Result<(), String> {
        let tool = self
            .get(tool_name)
            .ok_or_else(|| format!("Tool '{}' not found", tool_name))?;

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&tool.input_schema)
            .map_err(|e| format!("Invalid tool schema: {}", e))?;

        if let Err(errors) = schema.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(error_messages.join("; "));
        }

        Ok(())
    }

    /// Decode and validate the JSON argument string of a tool call, returning
    /// the free-text query. The error text is meant for the model.
    pub fn parse_query(
        &self,
        tool_name: &str,
        raw_arguments: &str,
    ) -> std::result::Result<String, String> {
        let arguments: Value = serde_json::from_str(raw_arguments).map_err(|e| {
            format!("failed to parse arguments for tool '{}': {}", tool_name, e)
        })?;
        self.validate_arguments(tool_name, &arguments)?;
        arguments
            .get(QUERY_ARGUMENT)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| format!("Missing required argument: {}", QUERY_ARGUMENT))
    }

    /// Run a tool by name. Unknown names are a routing failure.
    pub async fn call(&self, tool_name: &str, query: &str) -> Result<String> {
        let tool = self
            .get(tool_name)
            .ok_or_else(|| ChatbotError::UnknownTool(tool_name.to_string()))?;
        (tool.handler)(query.to_string()).await
    }
}

/// Tool definitions in the chat-completions `tools` format.
pub fn format_tools_for_llm(registry: &ToolRegistry) -> Vec<Value> {
    registry
        .list()
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.input_schema,
                }
            })
        })
        .collect()
}
