use chrono::Utc;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::reports::models::{Report, Stage, StageRecord};
use crate::features::reports::schema;
use crate::features::reports::services::MockDataService;
use crate::modules::dynamodb::attribute_value::{key, require_s};
use crate::modules::dynamodb::{TableDefinition, TableStore};
use crate::shared::constants::{ATTR_REPORT_ID, REPORT_TABLE};

/// Create `definition` and wait for it to become active.
///
/// A table that already exists is not an error.
pub async fn ensure_table(store: &dyn TableStore, definition: &TableDefinition) -> Result<()> {
    let table_name = &definition.table_name;

    match store.create_table(definition).await {
        Ok(()) => {
            store.wait_until_exists(table_name).await?;
            if definition.indexes.is_empty() {
                tracing::info!(
                    "Table '{}' (key: {}) created successfully",
                    table_name,
                    definition.key_attributes().join(", ")
                );
            } else {
                let indexes: Vec<&str> = definition
                    .indexes
                    .iter()
                    .map(|index| index.index_name.as_str())
                    .collect();
                tracing::info!(
                    "Table '{}' with GSI {:?} created successfully",
                    table_name,
                    indexes
                );
            }
            Ok(())
        }
        Err(e) if e.is_resource_in_use() => {
            tracing::info!("Table '{}' already exists", table_name);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Seeds the staged layout: `Report` plus one table per stage
pub struct SeedService {
    store: Arc<dyn TableStore>,
    mock: MockDataService,
}

impl SeedService {
    pub fn new(store: Arc<dyn TableStore>, mock: MockDataService) -> Self {
        Self { store, mock }
    }

    /// Create `Report` with its `StatusIndex`
    pub async fn create_report_table(&self) -> Result<()> {
        ensure_table(self.store.as_ref(), &schema::report_table()).await
    }

    /// Create the table for one stage
    pub async fn create_stage_table(&self, stage: Stage) -> Result<()> {
        ensure_table(self.store.as_ref(), &schema::stage_table(stage)).await
    }

    /// Insert `count` fresh reports, all with status `Report`
    pub async fn insert_report_data(&self, count: usize) -> Result<usize> {
        let now = Utc::now();

        for _ in 0..count {
            let report = self.mock.report(now);
            self.store.put_item(REPORT_TABLE, report.to_item()).await?;
        }

        tracing::info!("{} records inserted into '{}' table", count, REPORT_TABLE);
        Ok(count)
    }

    /// Insert up to `count` records into the table of `stage`.
    ///
    /// Candidates are the first `count` ids found in the previous stage's
    /// table, so every stage is a subset of the one before it. Each record
    /// copies the report's department and is dated after the previous
    /// stage's record.
    pub async fn insert_stage_data(&self, stage: Stage, count: usize) -> Result<usize> {
        let table_name = stage.table_name();
        let previous_table = stage.previous_table_name();

        let candidates = self
            .store
            .scan(previous_table, Some(&[ATTR_REPORT_ID][..]))
            .await?;

        let mut inserted = 0;
        for candidate in candidates.iter().take(count) {
            let report_id = require_s(candidate, ATTR_REPORT_ID)?;

            let Some(report_item) = self
                .store
                .get_item(REPORT_TABLE, key(ATTR_REPORT_ID, report_id))
                .await?
            else {
                tracing::warn!(
                    "Report {} not found, skipping '{}' record",
                    report_id,
                    table_name
                );
                continue;
            };
            let report = Report::from_item(&report_item)?;

            let previous_created_at = if previous_table == REPORT_TABLE {
                report.created_at
            } else {
                match self
                    .store
                    .get_item(previous_table, key(ATTR_REPORT_ID, report_id))
                    .await?
                {
                    Some(item) => StageRecord::from_item(&item)?.created_at,
                    None => {
                        tracing::warn!(
                            "No '{}' record for report {}, skipping '{}' record",
                            previous_table,
                            report_id,
                            table_name
                        );
                        continue;
                    }
                }
            };

            let record = self
                .mock
                .stage_record(report_id, report.department, previous_created_at);
            self.store.put_item(table_name, record.to_item()).await?;
            inserted += 1;
        }

        tracing::info!("{} records inserted into '{}' table", inserted, table_name);
        Ok(inserted)
    }
}
