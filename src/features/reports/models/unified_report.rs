use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::report::{Department, Location, ReportStatus};
use super::stage_record::Stage;
use crate::modules::dynamodb::attribute_value as attr;
use crate::modules::dynamodb::{AttributeValue, Item};
use crate::shared::constants::{ATTR_CREATED_AT, ATTR_DEPARTMENT, ATTR_REPORT_ID, ATTR_STATUS};
use crate::shared::timestamp::format_timestamp;

impl Stage {
    /// Fixed comment recorded when a unified report reaches this stage
    pub fn unified_comment(&self) -> &'static str {
        match self {
            Stage::Ack => "Report acknowledged",
            Stage::Processing => "Processing started",
            Stage::Done => "Issue resolved",
        }
    }

    /// Role of whoever moves a unified report into this stage
    pub fn unified_role(&self) -> &'static str {
        match self {
            Stage::Ack => "admin",
            Stage::Processing => "technician",
            Stage::Done => "supervisor",
        }
    }
}

/// Entry of the `comments` list embedded in a unified report
#[derive(Debug, Clone, PartialEq)]
pub struct StageComment {
    pub stage: Stage,
    pub comment: String,
    pub image_url: String,
    pub updater: String,
    pub updater_role: String,
    pub created_at: DateTime<Utc>,
}

impl StageComment {
    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::M(HashMap::from([
            (
                ATTR_STATUS.to_string(),
                attr::s(self.stage.status().as_str()),
            ),
            ("comment".to_string(), attr::s(&self.comment)),
            ("imageUrl".to_string(), attr::s(&self.image_url)),
            ("updater".to_string(), attr::s(&self.updater)),
            (
                "updater_role".to_string(),
                attr::s(&self.updater_role),
            ),
            (
                ATTR_CREATED_AT.to_string(),
                attr::s(format_timestamp(self.created_at)),
            ),
        ]))
    }
}

/// Report item of the unified layout (single table, key `report_id` + `createdAt`)
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedReport {
    pub report_id: String,
    pub department: Department,
    pub details: String,
    pub location: Location,
    pub status: ReportStatus,
    pub topic: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub processing_started_at: Option<DateTime<Utc>>,
    pub done_at: Option<DateTime<Utc>>,
    pub image_url: String,
    pub comments: Vec<StageComment>,
}

impl UnifiedReport {
    pub fn to_item(&self) -> Item {
        HashMap::from([
            (ATTR_REPORT_ID.to_string(), attr::s(&self.report_id)),
            (
                ATTR_DEPARTMENT.to_string(),
                attr::s(self.department.as_str()),
            ),
            ("details".to_string(), attr::s(&self.details)),
            (
                "location".to_string(),
                AttributeValue::M(HashMap::from([
                    (
                        "latitude".to_string(),
                        attr::s(self.location.latitude.to_string()),
                    ),
                    (
                        "longitude".to_string(),
                        attr::s(self.location.longitude.to_string()),
                    ),
                ])),
            ),
            (ATTR_STATUS.to_string(), attr::s(self.status.as_str())),
            ("topic".to_string(), attr::s(&self.topic)),
            ("username".to_string(), attr::s(&self.username)),
            (
                ATTR_CREATED_AT.to_string(),
                attr::s(format_timestamp(self.created_at)),
            ),
            (
                "acknowledgedAt".to_string(),
                attr::s_or_null(self.acknowledged_at.map(format_timestamp)),
            ),
            (
                "processingStartedAt".to_string(),
                attr::s_or_null(self.processing_started_at.map(format_timestamp)),
            ),
            (
                "doneAt".to_string(),
                attr::s_or_null(self.done_at.map(format_timestamp)),
            ),
            ("imageUrl".to_string(), attr::s(&self.image_url)),
            (
                "comments".to_string(),
                AttributeValue::L(self.comments.iter().map(StageComment::to_attribute).collect()),
            ),
        ])
    }
}
