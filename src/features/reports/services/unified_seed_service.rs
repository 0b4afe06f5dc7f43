use chrono::Utc;
use std::sync::Arc;

use crate::core::config::SeedCounts;
use crate::core::error::Result;
use crate::features::reports::models::ReportStatus;
use crate::features::reports::schema;
use crate::features::reports::services::ensure_table;
use crate::features::reports::services::MockDataService;
use crate::modules::dynamodb::TableStore;
use crate::shared::constants::REPORT_TABLE;

/// Final status of each generated report, in insertion order: `done` Done,
/// then `processing` Processing, then `ack` Ack, then `report` Report.
pub fn status_plan(counts: &SeedCounts) -> Vec<ReportStatus> {
    [
        (ReportStatus::Done, counts.done),
        (ReportStatus::Processing, counts.processing),
        (ReportStatus::Ack, counts.ack),
        (ReportStatus::Report, counts.report),
    ]
    .into_iter()
    .flat_map(|(status, n)| std::iter::repeat(status).take(n))
    .collect()
}

/// Seeds the unified layout: one `Report` table whose items carry their own
/// stage history
pub struct UnifiedSeedService {
    store: Arc<dyn TableStore>,
    mock: MockDataService,
}

impl UnifiedSeedService {
    pub fn new(store: Arc<dyn TableStore>, mock: MockDataService) -> Self {
        Self { store, mock }
    }

    /// Create `Report` (composite key) with its `DepartmentIndex`
    pub async fn create_report_table(&self) -> Result<()> {
        ensure_table(self.store.as_ref(), &schema::unified_report_table()).await
    }

    /// Insert one report per planned status
    pub async fn generate_mock_data(&self, counts: &SeedCounts) -> Result<usize> {
        let now = Utc::now();
        let plan = status_plan(counts);

        for status in &plan {
            let report = self.mock.unified_report(*status, now);
            self.store.put_item(REPORT_TABLE, report.to_item()).await?;
        }

        tracing::info!(
            "{} mock reports added to unified '{}' table",
            plan.len(),
            REPORT_TABLE
        );
        Ok(plan.len())
    }
}
