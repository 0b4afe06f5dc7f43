mod report;
mod stage_record;
mod unified_report;

pub use report::{Department, Location, Report, ReportStatus};
pub use stage_record::{Stage, StageRecord};
pub use unified_report::{StageComment, UnifiedReport};
