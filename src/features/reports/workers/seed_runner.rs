use std::sync::Arc;

use crate::core::config::{SeedConfig, SeedMode};
use crate::features::reports::models::Stage;
use crate::features::reports::services::{
    MockDataService, SeedService, StatsService, StatusMatrix, UnifiedSeedService,
};
use crate::features::reports::workers::{ReconcileSummary, StatusReconciler};
use crate::modules::dynamodb::TableStore;

/// What a seeding run achieved
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Items written across all tables
    pub inserted: usize,
    /// Steps that failed and were skipped
    pub failed_steps: usize,
    pub reconcile: Option<ReconcileSummary>,
    pub matrix: Option<StatusMatrix>,
}

/// One-shot seeding run for the configured layout.
///
/// Every step is independent: a failing step is logged and the run moves
/// on to the next one.
pub struct SeedRunner {
    config: SeedConfig,
    seed_service: SeedService,
    unified_seed_service: UnifiedSeedService,
    reconciler: StatusReconciler,
    stats_service: StatsService,
}

impl SeedRunner {
    pub fn new(store: Arc<dyn TableStore>, config: SeedConfig) -> Self {
        let mock = MockDataService::new();
        Self {
            config,
            seed_service: SeedService::new(Arc::clone(&store), mock.clone()),
            unified_seed_service: UnifiedSeedService::new(Arc::clone(&store), mock),
            reconciler: StatusReconciler::new(Arc::clone(&store)),
            stats_service: StatsService::new(store),
        }
    }

    pub async fn run(&self) -> RunSummary {
        tracing::info!(
            "Seeding '{}' layout: report={}, ack={}, processing={}, done={}",
            self.config.mode,
            self.config.counts.report,
            self.config.counts.ack,
            self.config.counts.processing,
            self.config.counts.done
        );

        let mut summary = RunSummary::default();

        match self.config.mode {
            SeedMode::Staged => self.run_staged(&mut summary).await,
            SeedMode::Unified => self.run_unified(&mut summary).await,
        }

        if self.config.summary {
            match self.stats_service.status_matrix(self.config.mode).await {
                Ok(matrix) => {
                    tracing::info!("Report status summary:\n{}", matrix);
                    summary.matrix = Some(matrix);
                }
                Err(e) => {
                    tracing::error!("Error building status summary: {:?}", e);
                    summary.failed_steps += 1;
                }
            }
        }

        tracing::info!(
            "Seeding finished: inserted={}, failed_steps={}",
            summary.inserted,
            summary.failed_steps
        );
        summary
    }

    async fn run_staged(&self, summary: &mut RunSummary) {
        if let Err(e) = self.seed_service.create_report_table().await {
            tracing::error!("Error creating table: {:?}", e);
            summary.failed_steps += 1;
        }
        for stage in Stage::ALL {
            if let Err(e) = self.seed_service.create_stage_table(stage).await {
                tracing::error!("Table creation failed for '{}': {:?}", stage.table_name(), e);
                summary.failed_steps += 1;
            }
        }

        match self
            .seed_service
            .insert_report_data(self.config.counts.report)
            .await
        {
            Ok(n) => summary.inserted += n,
            Err(e) => {
                tracing::error!("Error inserting reports: {:?}", e);
                summary.failed_steps += 1;
            }
        }

        for stage in Stage::ALL {
            let count = match stage {
                Stage::Ack => self.config.counts.ack,
                Stage::Processing => self.config.counts.processing,
                Stage::Done => self.config.counts.done,
            };
            match self.seed_service.insert_stage_data(stage, count).await {
                Ok(n) => summary.inserted += n,
                Err(e) => {
                    tracing::error!(
                        "Error inserting '{}' records: {:?}",
                        stage.table_name(),
                        e
                    );
                    summary.failed_steps += 1;
                }
            }
        }

        if self.config.reconcile {
            let outcome = self.reconciler.run().await;
            if outcome.aborted {
                summary.failed_steps += 1;
            }
            summary.reconcile = Some(outcome);
        }
    }

    async fn run_unified(&self, summary: &mut RunSummary) {
        if let Err(e) = self.unified_seed_service.create_report_table().await {
            tracing::error!("Error creating table: {:?}", e);
            summary.failed_steps += 1;
        }

        match self
            .unified_seed_service
            .generate_mock_data(&self.config.counts)
            .await
        {
            Ok(n) => summary.inserted += n,
            Err(e) => {
                tracing::error!("Error generating unified reports: {:?}", e);
                summary.failed_steps += 1;
            }
        }
    }
}
