use std::sync::Arc;

use crate::core::error::Result;
use crate::features::reports::models::{ReportStatus, Stage};
use crate::modules::dynamodb::attribute_value::{self as attr, key, optional_s, require_s};
use crate::modules::dynamodb::TableStore;
use crate::shared::constants::{ATTR_REPORT_ID, ATTR_STATUS, REPORT_TABLE};

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Reports returned by the scan
    pub scanned: usize,
    /// Reports whose status was rewritten
    pub updated: usize,
    /// Reports whose stored status already matched
    pub unchanged: usize,
    /// A failure stopped the pass before every report was visited
    pub aborted: bool,
}

/// Rewrites each report's `status` to the furthest stage with a record in
/// the matching stage table.
///
/// Scan-then-update with no transaction: a concurrent writer can race it.
/// A failure ends the pass; updates already issued stay applied.
pub struct StatusReconciler {
    store: Arc<dyn TableStore>,
}

impl StatusReconciler {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Run one pass. Errors are logged, never returned or retried.
    pub async fn run(&self) -> ReconcileSummary {
        tracing::info!("Starting report status reconciliation");

        let mut summary = ReconcileSummary::default();
        if let Err(e) = self.reconcile_all(&mut summary).await {
            tracing::error!("Error updating report statuses: {:?}", e);
            summary.aborted = true;
        }

        tracing::info!(
            "Reconciliation finished: scanned={}, updated={}, unchanged={}, aborted={}",
            summary.scanned,
            summary.updated,
            summary.unchanged,
            summary.aborted
        );
        summary
    }

    async fn reconcile_all(&self, summary: &mut ReconcileSummary) -> Result<()> {
        let reports = self
            .store
            .scan(REPORT_TABLE, Some(&[ATTR_REPORT_ID, ATTR_STATUS][..]))
            .await?;
        summary.scanned = reports.len();

        for report in &reports {
            let report_id = require_s(report, ATTR_REPORT_ID)?;
            // Missing or unknown stored values never match, so they get rewritten
            let current = optional_s(report, ATTR_STATUS).and_then(|s| s.parse::<ReportStatus>().ok());

            let derived = self.derive_status(report_id).await?;
            if current == Some(derived) {
                summary.unchanged += 1;
                continue;
            }

            self.store
                .update_attribute(
                    REPORT_TABLE,
                    key(ATTR_REPORT_ID, report_id),
                    ATTR_STATUS,
                    attr::s(derived.as_str()),
                )
                .await?;

            tracing::info!(
                "Updated report_id: {} to status: {} ({})",
                report_id,
                derived,
                summary.updated
            );
            summary.updated += 1;
        }

        Ok(())
    }

    /// Done beats Processing beats Ack beats the default `Report`.
    /// Lookups stop at the first stage table holding the id.
    pub async fn derive_status(&self, report_id: &str) -> Result<ReportStatus> {
        for stage in Stage::BY_PRIORITY {
            let record = self
                .store
                .get_item(stage.table_name(), key(ATTR_REPORT_ID, report_id))
                .await?;
            if record.is_some() {
                return Ok(stage.status());
            }
        }
        Ok(ReportStatus::Report)
    }
}
