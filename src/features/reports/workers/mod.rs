mod seed_runner;
mod status_reconciler;

pub use seed_runner::SeedRunner;
pub use status_reconciler::{ReconcileSummary, StatusReconciler};
