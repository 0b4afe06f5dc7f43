mod mock_data_service;
mod seed_service;
mod stats_service;
mod unified_seed_service;

pub use mock_data_service::MockDataService;
pub use seed_service::{ensure_table, SeedService};
pub use stats_service::{StatsService, StatusMatrix};
pub use unified_seed_service::UnifiedSeedService;
