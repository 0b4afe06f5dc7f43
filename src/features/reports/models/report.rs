use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::str::FromStr;

use crate::core::error::{AppError, Result};
use crate::modules::dynamodb::attribute_value::{self as attr, optional_s, require_n, require_s};
use crate::modules::dynamodb::{AttributeValue, Item};
use crate::shared::constants::{ATTR_CREATED_AT, ATTR_DEPARTMENT, ATTR_REPORT_ID, ATTR_STATUS};
use crate::shared::timestamp::{format_timestamp, parse_timestamp};

/// Report lifecycle status. Variants are declared in lifecycle order so
/// `Ord` gives Report < Ack < Processing < Done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportStatus {
    Report,
    Ack,
    Processing,
    Done,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Report,
        ReportStatus::Ack,
        ReportStatus::Processing,
        ReportStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Report => "Report",
            ReportStatus::Ack => "Ack",
            ReportStatus::Processing => "Processing",
            ReportStatus::Done => "Done",
        }
    }

    /// Number of stages passed (Report = 0, Done = 3)
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::InvalidItem(format!("unknown report status '{}'", s)))
    }
}

/// Department a report is filed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    Hr,
    Facility,
    Production,
    Finance,
    Maintenance,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::Hr,
        Department::Facility,
        Department::Production,
        Department::Finance,
        Department::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Hr => "HR",
            Department::Facility => "Facility",
            Department::Production => "Production",
            Department::Finance => "Finance",
            Department::Maintenance => "Maintenance",
        }
    }

    /// Role given to stage updaters in the staged layout, e.g. `HR-Worker`
    pub fn worker_role(&self) -> String {
        format!("{}-Worker", self.as_str())
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Department {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Department::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| AppError::InvalidItem(format!("unknown department '{}'", s)))
    }
}

/// Geolocation of a report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Report item of the staged layout
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub report_id: String,
    pub department: Department,
    pub details: String,
    pub location: Location,
    pub topic: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub image_url: Option<String>,
}

impl Report {
    pub fn to_item(&self) -> Item {
        HashMap::from([
            (ATTR_REPORT_ID.to_string(), attr::s(&self.report_id)),
            (
                ATTR_DEPARTMENT.to_string(),
                attr::s(self.department.as_str()),
            ),
            ("details".to_string(), attr::s(&self.details)),
            (
                "imageUrl".to_string(),
                attr::s(self.image_url.clone().unwrap_or_default()),
            ),
            (
                "location".to_string(),
                AttributeValue::M(HashMap::from([
                    (
                        "latitude".to_string(),
                        attr::n(self.location.latitude),
                    ),
                    (
                        "longitude".to_string(),
                        attr::n(self.location.longitude),
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
        ])
    }

    pub fn from_item(item: &Item) -> Result<Self> {
        let location = item
            .get("location")
            .and_then(|value| value.as_m().ok())
            .ok_or_else(|| AppError::InvalidItem("missing map attribute 'location'".to_string()))?;

        Ok(Self {
            report_id: require_s(item, ATTR_REPORT_ID)?.to_string(),
            department: require_s(item, ATTR_DEPARTMENT)?.parse()?,
            details: require_s(item, "details")?.to_string(),
            location: Location {
                latitude: require_n(location, "latitude")?,
                longitude: require_n(location, "longitude")?,
            },
            topic: require_s(item, "topic")?.to_string(),
            username: require_s(item, "username")?.to_string(),
            created_at: parse_timestamp(require_s(item, ATTR_CREATED_AT)?)?,
            status: require_s(item, ATTR_STATUS)?.parse()?,
            image_url: optional_s(item, "imageUrl")
                .filter(|url| !url.is_empty())
                .map(String::from),
        })
    }
}
