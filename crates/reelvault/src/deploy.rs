//! Table deployment: pure planning plus imperative execution.

use std::time::Duration;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;

use reelvault_core::schema::{AttributeType, FieldDef, TableSchema};
use reelvault_core::store::{Result, StoreError};

use crate::store::dynamodb::{get_table_state, TableStatus};

/// Planned changes for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployPlan {
    /// Table doesn't exist, needs to be created.
    CreateTable { table_name: String },
    /// Table is up to date, no changes needed.
    NoChanges { table_name: String },
}

/// Plan for destroying a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyPlan {
    /// Table exists and will be deleted.
    DeleteTable { table_name: String },
    /// Table doesn't exist, nothing to do.
    AlreadyGone { table_name: String },
}

/// Pure function: Calculate what changes are needed to reach desired state.
pub fn calculate_deploy_plan(current: Option<TableStatus>, table_name: &str) -> DeployPlan {
    match current {
        None => DeployPlan::CreateTable {
            table_name: table_name.to_string(),
        },
        Some(_) => DeployPlan::NoChanges {
            table_name: table_name.to_string(),
        },
    }
}

/// Pure function: Calculate destroy plan.
pub fn calculate_destroy_plan(current: Option<TableStatus>, table_name: &str) -> DestroyPlan {
    match current {
        Some(_) => DestroyPlan::DeleteTable {
            table_name: table_name.to_string(),
        },
        None => DestroyPlan::AlreadyGone {
            table_name: table_name.to_string(),
        },
    }
}

/// Pure function: Format a deploy plan for display.
pub fn format_deploy_plan(plan: &DeployPlan, schema: &TableSchema) -> Vec<String> {
    match plan {
        DeployPlan::CreateTable { table_name } => {
            let mut lines = vec![
                format!("+ Create table: {}", table_name),
                format!(
                    "  Partition key: {} ({})",
                    schema.partition_key.name,
                    type_display(&schema.partition_key)
                ),
            ];
            if let Some(sk) = &schema.sort_key {
                lines.push(format!("  Sort key: {} ({})", sk.name, type_display(sk)));
            }
            lines.push("  Billing: PAY_PER_REQUEST".to_string());
            lines
        }
        DeployPlan::NoChanges { table_name } => {
            vec![format!("= Table '{}' is up to date", table_name)]
        }
    }
}

/// Pure function: Format a destroy plan for display.
pub fn format_destroy_plan(plan: &DestroyPlan) -> Vec<String> {
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            vec![format!(
                "- Delete table: {} (ALL DATA WILL BE LOST)",
                table_name
            )]
        }
        DestroyPlan::AlreadyGone { table_name } => {
            vec![format!("= Table '{}' does not exist", table_name)]
        }
    }
}

/// Execute a deploy plan.
pub async fn execute_deploy_plan(
    client: &Client,
    plan: &DeployPlan,
    schema: &TableSchema,
) -> Result<()> {
    match plan {
        DeployPlan::CreateTable { table_name } => {
            create_table(client, table_name, schema).await?;
            wait_for_table_active(client, table_name).await?;
        }
        DeployPlan::NoChanges { .. } => {
            // Nothing to do
        }
    }
    Ok(())
}

/// Execute a destroy plan.
pub async fn execute_destroy_plan(client: &Client, plan: &DestroyPlan) -> Result<()> {
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            delete_table(client, table_name).await?;
        }
        DestroyPlan::AlreadyGone { .. } => {
            // Nothing to do
        }
    }
    Ok(())
}

async fn create_table(client: &Client, table_name: &str, schema: &TableSchema) -> Result<()> {
    let mut key_schema = vec![KeySchemaElement::builder()
        .attribute_name(&schema.partition_key.name)
        .key_type(KeyType::Hash)
        .build()
        .map_err(|e| StoreError::Operation(e.to_string()))?];

    let mut attribute_definitions = vec![AttributeDefinition::builder()
        .attribute_name(&schema.partition_key.name)
        .attribute_type(to_scalar_type(schema.partition_key.attribute_type))
        .build()
        .map_err(|e| StoreError::Operation(e.to_string()))?];

    if let Some(sk) = &schema.sort_key {
        key_schema.push(
            KeySchemaElement::builder()
                .attribute_name(&sk.name)
                .key_type(KeyType::Range)
                .build()
                .map_err(|e| StoreError::Operation(e.to_string()))?,
        );
        attribute_definitions.push(
            AttributeDefinition::builder()
                .attribute_name(&sk.name)
                .attribute_type(to_scalar_type(sk.attribute_type))
                .build()
                .map_err(|e| StoreError::Operation(e.to_string()))?,
        );
    }

    client
        .create_table()
        .table_name(table_name)
        .set_key_schema(Some(key_schema))
        .set_attribute_definitions(Some(attribute_definitions))
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(|e| StoreError::Operation(e.to_string()))?;

    Ok(())
}

async fn delete_table(client: &Client, table_name: &str) -> Result<()> {
    client
        .delete_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| StoreError::Operation(e.to_string()))?;
    Ok(())
}

/// Polls until the table reports Active.
pub async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    let max_attempts = 60;
    let delay = Duration::from_secs(2);

    for _ in 0..max_attempts {
        if let Some(TableStatus::Active) = get_table_state(client, table_name).await? {
            return Ok(());
        }
        tokio::time::sleep(delay).await;
    }

    Err(StoreError::Operation(
        "timed out waiting for table to become active".to_string(),
    ))
}

fn to_scalar_type(attr_type: AttributeType) -> ScalarAttributeType {
    match attr_type {
        AttributeType::Number => ScalarAttributeType::N,
        AttributeType::String => ScalarAttributeType::S,
    }
}

// FieldDef carries its own type; keep the display form next to the SDK
// mapping so they cannot drift apart.
fn type_display(field: &FieldDef) -> &'static str {
    match field.attribute_type {
        AttributeType::Number => "N",
        AttributeType::String => "S",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelvault_core::schema::movies_schema;

    #[test]
    fn test_deploy_plan_for_missing_table() {
        let plan = calculate_deploy_plan(None, "movies");
        assert_eq!(
            plan,
            DeployPlan::CreateTable {
                table_name: "movies".to_string()
            }
        );
    }

    #[test]
    fn test_deploy_plan_for_existing_table() {
        let plan = calculate_deploy_plan(Some(TableStatus::Active), "movies");
        assert_eq!(
            plan,
            DeployPlan::NoChanges {
                table_name: "movies".to_string()
            }
        );
    }

    #[test]
    fn test_destroy_plans() {
        assert_eq!(
            calculate_destroy_plan(Some(TableStatus::Active), "movies"),
            DestroyPlan::DeleteTable {
                table_name: "movies".to_string()
            }
        );
        assert_eq!(
            calculate_destroy_plan(None, "movies"),
            DestroyPlan::AlreadyGone {
                table_name: "movies".to_string()
            }
        );
    }

    #[test]
    fn test_create_plan_formatting() {
        let schema = movies_schema();
        let plan = calculate_deploy_plan(None, "movies");
        let lines = format_deploy_plan(&plan, &schema);

        assert_eq!(lines[0], "+ Create table: movies");
        assert_eq!(lines[1], "  Partition key: Year (N)");
        assert_eq!(lines[2], "  Sort key: Title (S)");
        assert_eq!(lines[3], "  Billing: PAY_PER_REQUEST");
    }

    #[test]
    fn test_destroy_plan_formatting() {
        let plan = calculate_destroy_plan(Some(TableStatus::Active), "movies");
        let lines = format_destroy_plan(&plan);

        assert_eq!(lines, vec!["- Delete table: movies (ALL DATA WILL BE LOST)"]);
    }
}
