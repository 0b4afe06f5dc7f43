use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::report::{Department, ReportStatus};
use crate::core::error::Result;
use crate::modules::dynamodb::attribute_value::{self as attr, optional_s, require_s, Item};
use crate::shared::constants::{
    ATTR_CREATED_AT, ATTR_DEPARTMENT, ATTR_REPORT_ID, REPORT_ACK_TABLE, REPORT_DONE_TABLE,
    REPORT_PROCESSING_TABLE, REPORT_TABLE,
};
use crate::shared::timestamp::{format_timestamp, parse_timestamp};

/// Milestone a report passes through after it is filed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Ack,
    Processing,
    Done,
}

impl Stage {
    /// Lifecycle order
    pub const ALL: [Stage; 3] = [Stage::Ack, Stage::Processing, Stage::Done];

    /// Order in which stage tables are consulted when deriving a status;
    /// the first hit wins.
    pub const BY_PRIORITY: [Stage; 3] = [Stage::Done, Stage::Processing, Stage::Ack];

    pub fn table_name(&self) -> &'static str {
        match self {
            Stage::Ack => REPORT_ACK_TABLE,
            Stage::Processing => REPORT_PROCESSING_TABLE,
            Stage::Done => REPORT_DONE_TABLE,
        }
    }

    /// Table holding the records of the stage before this one
    pub fn previous_table_name(&self) -> &'static str {
        match self {
            Stage::Ack => REPORT_TABLE,
            Stage::Processing => REPORT_ACK_TABLE,
            Stage::Done => REPORT_PROCESSING_TABLE,
        }
    }

    /// Report status once this stage is reached
    pub fn status(&self) -> ReportStatus {
        match self {
            Stage::Ack => ReportStatus::Ack,
            Stage::Processing => ReportStatus::Processing,
            Stage::Done => ReportStatus::Done,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status())
    }
}

/// One row of a stage table (`ReportAck`, `ReportProcessing`, `ReportDone`)
#[derive(Debug, Clone, PartialEq)]
pub struct StageRecord {
    pub report_id: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub updater: String,
    pub updater_role: String,
    pub department: Department,
}

impl StageRecord {
    pub fn to_item(&self) -> Item {
        HashMap::from([
            (ATTR_REPORT_ID.to_string(), attr::s(&self.report_id)),
            ("comment".to_string(), attr::s(&self.comment)),
            (
                ATTR_CREATED_AT.to_string(),
                attr::s(format_timestamp(self.created_at)),
            ),
            (
                "imageUrl".to_string(),
                attr::s(self.image_url.clone().unwrap_or_default()),
            ),
            ("updater".to_string(), attr::s(&self.updater)),
            (
                "updater_role".to_string(),
                attr::s(&self.updater_role),
            ),
            (
                ATTR_DEPARTMENT.to_string(),
                attr::s(self.department.as_str()),
            ),
        ])
    }

    pub fn from_item(item: &Item) -> Result<Self> {
        Ok(Self {
            report_id: require_s(item, ATTR_REPORT_ID)?.to_string(),
            comment: require_s(item, "comment")?.to_string(),
            created_at: parse_timestamp(require_s(item, ATTR_CREATED_AT)?)?,
            image_url: optional_s(item, "imageUrl")
                .filter(|url| !url.is_empty())
                .map(String::from),
            updater: require_s(item, "updater")?.to_string(),
            updater_role: require_s(item, "updater_role")?.to_string(),
            department: require_s(item, ATTR_DEPARTMENT)?.parse()?,
        })
    }
}
