//! Tool trait: the abstraction over the operations this server exposes.
//!
//! A tool is a named operation with a declared input shape. Tools are
//! registered once in the [`ToolRegistry`], which callers enumerate and
//! dispatch against by name.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::schema::InputShape;

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// A typed payload block in a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
        }
    }
}

/// The result of a tool execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The output content blocks
    pub content: Vec<ContentBlock>,
}

impl ToolResult {
    /// A result holding a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Concatenated text of all text blocks.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What callers see when they enumerate tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// The core Tool trait.
///
/// `execute` only ever sees arguments that already passed validation against
/// `input_shape`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "getComplianceRoadmap").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the caller).
    fn description(&self) -> &str;

    /// The arguments this tool accepts.
    fn input_shape(&self) -> InputShape;

    /// Execute the tool with validated arguments.
    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for enumeration.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_shape().to_json_schema(),
        }
    }
}

/// A registry of available tools.
///
/// Built once at startup and read-only afterwards. Enumeration follows
/// registration order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Fails if a tool with the same name already exists.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::Duplicate(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    /// Get all tool definitions, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// Look up, validate and execute a tool call.
    ///
    /// Arguments are checked in full before the handler runs. Any failure
    /// inside the handler comes back as `ToolError::ExecutionFailed`.
    pub async fn dispatch(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;

        tool.input_shape()
            .validate(&call.arguments)
            .map_err(|violations| ToolError::InvalidArguments {
                tool_name: call.name.clone(),
                violations,
            })?;

        debug!(tool = %call.name, "Dispatching tool call");

        match tool.execute(call.arguments.clone()).await {
            Ok(result) => Ok(result),
            Err(ToolError::ExecutionFailed { tool_name, reason }) => {
                warn!(tool = %tool_name, reason = %reason, "Tool execution failed");
                Err(ToolError::ExecutionFailed { tool_name, reason })
            }
            Err(other) => {
                warn!(tool = %call.name, error = %other, "Tool execution failed");
                Err(ToolError::ExecutionFailed {
                    tool_name: call.name.clone(),
                    reason: other.to_string(),
                })
            }
        }
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
