//! Content calendar tools

use crate::args::{output, parse};
use crate::error::{Error, Result};
use crate::registry::{RiskLevel, Tool, ToolCategory, ToolDefinition, ToolResult};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tubekit_core::{CalendarStore, ContentPlanUpdate, NewContentPlan, PlanFilter, PlanStatus};

fn status_schema(description: &str) -> serde_json::Value {
    let names: Vec<&str> = PlanStatus::ALL.iter().map(PlanStatus::as_str).collect();
    json!({"type": "string", "enum": names, "description": description})
}

fn check_plan_id(id: i64) -> Result<i64> {
    if id < 1 {
        return Err(Error::InvalidInput(format!(
            "plan_id must be a positive integer, got {id}"
        )));
    }
    Ok(id)
}

/// Add a plan to the calendar
pub struct AddContentPlanTool {
    definition: ToolDefinition,
    store: Arc<CalendarStore>,
}

impl AddContentPlanTool {
    /// Create the tool
    #[must_use]
    pub fn new(store: Arc<CalendarStore>) -> Self {
        let definition =
            ToolDefinition::new("add_content_plan", "Add a new content plan to the calendar.")
                .with_parameters(json!({
                    "type": "object",
                    "properties": {
                        "title": {"type": "string", "description": "Content title"},
                        "planned_date": {"type": "string", "description": "Planned date (YYYY-MM-DD)"},
                        "status": status_schema("Status (default: idea)"),
                        "notes": {"type": "string", "description": "Additional notes"}
                    },
                    "required": ["title", "planned_date"]
                }))
                .with_risk_level(RiskLevel::Medium)
                .with_category(ToolCategory::Calendar);

        Self { definition, store }
    }
}

#[async_trait::async_trait]
impl Tool for AddContentPlanTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let plan: NewContentPlan = parse("add_content_plan", input)?;
        let plan = self.store.add(plan).await?;
        output(&json!({"success": true, "plan": plan}), start)
    }
}

/// List plans with optional status and date filters
pub struct ListContentPlansTool {
    definition: ToolDefinition,
    store: Arc<CalendarStore>,
}

impl ListContentPlansTool {
    /// Create the tool
    #[must_use]
    pub fn new(store: Arc<CalendarStore>) -> Self {
        let definition = ToolDefinition::new(
            "list_content_plans",
            "List content plans from the calendar with optional filters.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "status_filter": status_schema("Filter by status"),
                "date_from": {"type": "string", "description": "Start date filter (YYYY-MM-DD)"},
                "date_to": {"type": "string", "description": "End date filter (YYYY-MM-DD)"}
            }
        }))
        .with_category(ToolCategory::Calendar);

        Self { definition, store }
    }
}

#[derive(Debug, Deserialize)]
struct ListInput {
    status_filter: Option<PlanStatus>,
    date_from: Option<String>,
    date_to: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ListContentPlansTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: ListInput = parse("list_content_plans", input)?;
        let listing = self
            .store
            .list(&PlanFilter {
                status: input.status_filter,
                date_from: input.date_from,
                date_to: input.date_to,
            })
            .await?;
        output(&listing, start)
    }
}

/// Change fields of a plan
pub struct UpdateContentPlanTool {
    definition: ToolDefinition,
    store: Arc<CalendarStore>,
}

impl UpdateContentPlanTool {
    /// Create the tool
    #[must_use]
    pub fn new(store: Arc<CalendarStore>) -> Self {
        let definition =
            ToolDefinition::new("update_content_plan", "Update an existing content plan.")
                .with_parameters(json!({
                    "type": "object",
                    "properties": {
                        "plan_id": {"type": "number", "description": "Content plan ID"},
                        "title": {"type": "string", "description": "New title"},
                        "planned_date": {"type": "string", "description": "New planned date (YYYY-MM-DD)"},
                        "status": status_schema("New status"),
                        "notes": {"type": "string", "description": "New notes"}
                    },
                    "required": ["plan_id"]
                }))
                .with_risk_level(RiskLevel::Medium)
                .with_category(ToolCategory::Calendar);

        Self { definition, store }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateInput {
    plan_id: i64,
    #[serde(flatten)]
    changes: ContentPlanUpdate,
}

#[async_trait::async_trait]
impl Tool for UpdateContentPlanTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: UpdateInput = parse("update_content_plan", input)?;
        let plan = self
            .store
            .update(check_plan_id(input.plan_id)?, input.changes)
            .await?;
        output(&json!({"success": true, "plan": plan}), start)
    }
}

/// Remove a plan
pub struct DeleteContentPlanTool {
    definition: ToolDefinition,
    store: Arc<CalendarStore>,
}

impl DeleteContentPlanTool {
    /// Create the tool
    #[must_use]
    pub fn new(store: Arc<CalendarStore>) -> Self {
        let definition = ToolDefinition::new(
            "delete_content_plan",
            "Delete a content plan from the calendar.",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "plan_id": {"type": "number", "description": "Content plan ID to delete"}
            },
            "required": ["plan_id"]
        }))
        .with_risk_level(RiskLevel::Medium)
        .with_category(ToolCategory::Calendar);

        Self { definition, store }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteInput {
    plan_id: i64,
}

#[async_trait::async_trait]
impl Tool for DeleteContentPlanTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
        let start = Instant::now();
        let input: DeleteInput = parse("delete_content_plan", input)?;
        let id = check_plan_id(input.plan_id)?;

        let existing = self.store.get(id).await?;
        self.store.delete(id).await?;
        output(&json!({"success": true, "deletedPlan": existing}), start)
    }
}
