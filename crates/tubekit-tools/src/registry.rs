//! Registry - Tool registration and dispatch
//!
//! Tools are registered with metadata and can be listed (in registration
//! order), filtered by category, or invoked by name.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Risk level of a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Read-only
    Low,
    /// Changes channel or calendar state
    Medium,
    /// Deletes content or spends a large share of the daily quota
    High,
}

impl RiskLevel {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Whether the tool leaves channel state untouched
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Low)
    }

    /// Whether the tool may destroy or irreversibly publish content
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tool category for organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    /// Own-channel video management
    Video,
    /// Channel and video analytics
    Analytics,
    /// Titles, descriptions, tags, chapters
    Seo,
    /// Trends, competitors, public search
    Research,
    /// Playlist management
    Playlist,
    /// Comment moderation
    Comment,
    /// Community tab
    Community,
    /// Content calendar
    Calendar,
    /// Utility operations
    Utility,
}

impl ToolCategory {
    /// All categories in display order
    pub const ALL: [ToolCategory; 9] = [
        Self::Video,
        Self::Analytics,
        Self::Seo,
        Self::Research,
        Self::Playlist,
        Self::Comment,
        Self::Community,
        Self::Calendar,
        Self::Utility,
    ];

    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Analytics => "analytics",
            Self::Seo => "seo",
            Self::Research => "research",
            Self::Playlist => "playlist",
            Self::Comment => "comment",
            Self::Community => "community",
            Self::Calendar => "calendar",
            Self::Utility => "utility",
        }
    }
}

/// Tool metadata and schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema for parameters
    pub parameters: serde_json::Value,
    /// Risk level
    pub risk_level: RiskLevel,
    /// Tool category
    pub category: ToolCategory,
}

impl ToolDefinition {
    /// Create a new tool definition
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
            risk_level: RiskLevel::Low,
            category: ToolCategory::Utility,
        }
    }

    /// Set the parameters schema
    #[must_use]
    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set the risk level
    #[must_use]
    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: ToolCategory) -> Self {
        self.category = category;
        self
    }
}

/// Output of a completed tool call. Failures are reported as [`Error`](crate::Error).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Output data
    pub output: serde_json::Value,
    /// Execution duration in milliseconds
    pub duration_ms: u64,
}

impl ToolResult {
    /// Create a successful result
    #[must_use]
    pub fn success(output: serde_json::Value, duration_ms: u64) -> Self {
        Self {
            output,
            duration_ms,
        }
    }
}

/// Trait for tool implementations
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition
    fn definition(&self) -> &ToolDefinition;

    /// Execute the tool with given input
    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult>;

    /// Validate input before execution
    fn validate_input(&self, input: &serde_json::Value) -> Result<()> {
        if !input.is_object() {
            return Err(Error::InvalidInput("Input must be an object".to_string()));
        }
        Ok(())
    }
}

/// Registry for managing tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    definitions: HashMap<String, ToolDefinition>,
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let def = tool.definition();
        let name = def.name.clone();
        debug!(tool = %name, "Registering tool");
        if self.definitions.insert(name.clone(), def.clone()).is_some() {
            warn!(tool = %name, "Replacing previously registered tool");
        } else {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
    }

    /// Get a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Get a tool definition by name
    #[must_use]
    pub fn get_definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions.get(name)
    }

    /// Check if a tool exists
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tool names in registration order
    #[must_use]
    pub fn list_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// List all tool definitions in registration order
    #[must_use]
    pub fn list_definitions(&self) -> Vec<&ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.definitions.get(name))
            .collect()
    }

    /// List tools by category
    #[must_use]
    pub fn list_by_category(&self, category: ToolCategory) -> Vec<&ToolDefinition> {
        self.list_definitions()
            .into_iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Validate `input` and run the named tool.
    ///
    /// A `null` input is treated as an empty argument object.
    pub async fn execute(&self, name: &str, input: serde_json::Value) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        let input = if input.is_null() {
            serde_json::json!({})
        } else {
            input
        };
        tool.validate_input(&input)?;
        debug!(tool = %name, "Executing tool");
        tool.execute(input).await
    }

    /// Get tool count
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool {
        definition: ToolDefinition,
    }

    impl EchoTool {
        fn named(name: &str) -> Self {
            Self {
                definition: ToolDefinition::new(name, "Echo the input")
                    .with_category(ToolCategory::Utility),
            }
        }
    }

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
            Ok(ToolResult::success(input, 0))
        }
    }

    #[test]
    fn test_risk_level() {
        assert_eq!(RiskLevel::Low.as_str(), "low");
        assert!(RiskLevel::Low.is_read_only());
        assert!(!RiskLevel::Medium.is_read_only());
        assert!(!RiskLevel::Medium.is_destructive());
        assert!(RiskLevel::High.is_destructive());
    }

    #[test]
    fn test_tool_definition_builder() {
        let def = ToolDefinition::new("test_tool", "A test tool")
            .with_risk_level(RiskLevel::Medium)
            .with_category(ToolCategory::Playlist);

        assert_eq!(def.name, "test_tool");
        assert_eq!(def.risk_level, RiskLevel::Medium);
        assert_eq!(def.category, ToolCategory::Playlist);
        assert_eq!(def.parameters["type"], "object");
    }

    #[test]
    fn test_tool_result() {
        let result = ToolResult::success(json!({"data": "test"}), 100);
        assert_eq!(result.output["data"], "test");
        assert_eq!(result.duration_ms, 100);
    }

    #[test]
    fn test_registry_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        for name in ["zeta", "alpha", "mid"] {
            registry.register(Arc::new(EchoTool::named(name)));
        }
        registry.register(Arc::new(EchoTool::named("alpha")));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.list_names(), vec!["zeta", "alpha", "mid"]);
        assert!(registry.has("mid"));
        assert!(registry.get_definition("nope").is_none());
        assert_eq!(registry.list_by_category(ToolCategory::Utility).len(), 3);
        assert!(registry.list_by_category(ToolCategory::Video).is_empty());
    }

    #[tokio::test]
    async fn test_execute_dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::named("echo")));

        let result = registry.execute("echo", json!({"a": 1})).await.unwrap();
        assert_eq!(result.output, json!({"a": 1}));

        let result = registry.execute("echo", serde_json::Value::Null).await.unwrap();
        assert_eq!(result.output, json!({}));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.execute("missing", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: missing");
    }

    #[tokio::test]
    async fn test_execute_rejects_non_object_input() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::named("echo")));
        let err = registry.execute("echo", json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
