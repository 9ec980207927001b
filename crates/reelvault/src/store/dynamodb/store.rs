//! `TableStore` implementation backed by DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use reelvault_core::attr::AttributeMap;
use reelvault_core::expr::{QuerySpec, UpdateSpec};
use reelvault_core::store::{Result, TablePage, TableStore};

use super::conversions::{from_sdk_map, to_sdk_map, to_sdk_value};
use super::error::{
    map_delete_item_error, map_get_item_error, map_list_tables_error, map_put_item_error,
    map_scan_error, map_update_item_error,
};

/// DynamoDB-backed movie table client.
///
/// The handle is passed explicitly to every caller; there is no global
/// client. Timeouts and connection pooling are the SDK's concern.
pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl DynamoStore {
    /// Creates a new store with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl TableStore for DynamoStore {
    async fn list_tables(
        &self,
        limit: Option<i32>,
        start_table: Option<String>,
    ) -> Result<TablePage> {
        let mut request = self.client.list_tables();
        if let Some(limit) = limit {
            request = request.limit(limit);
        }
        if let Some(start) = start_table {
            request = request.exclusive_start_table_name(start);
        }

        let result = request.send().await.map_err(map_list_tables_error)?;

        Ok(TablePage {
            names: result.table_names.unwrap_or_default(),
            next: result.last_evaluated_table_name,
        })
    }

    async fn get_item(&self, key: &AttributeMap) -> Result<Option<AttributeMap>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(to_sdk_map(key)))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, &self.table_name))?;

        match result.item {
            Some(item) => Ok(Some(from_sdk_map(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_item(&self, item: AttributeMap) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_sdk_map(&item)))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &self.table_name))?;

        Ok(())
    }

    async fn update_item(&self, key: AttributeMap, update: &UpdateSpec) -> Result<()> {
        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(to_sdk_map(&key)))
            .update_expression(&update.update_expression);

        if !update.names.is_empty() {
            request = request.set_expression_attribute_names(Some(update.names.clone()));
        }
        if !update.values.is_empty() {
            request = request.set_expression_attribute_values(Some(
                update
                    .values
                    .iter()
                    .map(|(token, value)| (token.clone(), to_sdk_value(value)))
                    .collect(),
            ));
        }

        request
            .send()
            .await
            .map_err(|e| map_update_item_error(e, &self.table_name))?;

        Ok(())
    }

    async fn delete_item(&self, key: AttributeMap) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(to_sdk_map(&key)))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, &self.table_name))?;

        Ok(())
    }

    async fn scan(&self, spec: &QuerySpec) -> Result<Vec<AttributeMap>> {
        let mut request = self.client.scan().table_name(&self.table_name);

        if let Some(filter) = &spec.filter_expression {
            request = request.filter_expression(filter);
        }
        if let Some(projection) = &spec.projection_expression {
            request = request.projection_expression(projection);
        }
        if !spec.names.is_empty() {
            request = request.set_expression_attribute_names(Some(spec.names.clone()));
        }
        if !spec.values.is_empty() {
            request = request.set_expression_attribute_values(Some(
                spec.values
                    .iter()
                    .map(|(token, value)| (token.clone(), to_sdk_value(value)))
                    .collect(),
            ));
        }

        let result = request
            .send()
            .await
            .map_err(|e| map_scan_error(e, &self.table_name))?;

        let items = result.items.unwrap_or_default();
        let mut out = Vec::with_capacity(items.len());
        for item in &items {
            out.push(from_sdk_map(item)?);
        }
        Ok(out)
    }
}
