//! Table definitions for both seeding layouts

use crate::features::reports::models::Stage;
use crate::modules::dynamodb::model::{Capacity, IndexDefinition, IndexProjection};
use crate::modules::dynamodb::TableDefinition;
use crate::shared::constants::{
    ATTR_CREATED_AT, ATTR_DEPARTMENT, ATTR_REPORT_ID, ATTR_STATUS, DEPARTMENT_INDEX, REPORT_TABLE,
    STATUS_INDEX,
};

/// `Report` keyed by `report_id`, with `StatusIndex` projecting `department`
pub fn report_table() -> TableDefinition {
    TableDefinition {
        table_name: REPORT_TABLE.to_string(),
        hash_key: ATTR_REPORT_ID.to_string(),
        range_key: None,
        capacity: Capacity::new(10, 10),
        indexes: vec![IndexDefinition {
            index_name: STATUS_INDEX.to_string(),
            hash_key: ATTR_STATUS.to_string(),
            range_key: None,
            projection: IndexProjection::Include(vec![ATTR_DEPARTMENT.to_string()]),
            capacity: Capacity::new(5, 5),
        }],
    }
}

/// One of `ReportAck`, `ReportProcessing`, `ReportDone`
pub fn stage_table(stage: Stage) -> TableDefinition {
    TableDefinition {
        table_name: stage.table_name().to_string(),
        hash_key: ATTR_REPORT_ID.to_string(),
        range_key: None,
        capacity: Capacity::new(10, 10),
        indexes: Vec::new(),
    }
}

/// Unified `Report` keyed by `report_id` + `createdAt`, with `DepartmentIndex`
pub fn unified_report_table() -> TableDefinition {
    TableDefinition {
        table_name: REPORT_TABLE.to_string(),
        hash_key: ATTR_REPORT_ID.to_string(),
        range_key: Some(ATTR_CREATED_AT.to_string()),
        capacity: Capacity::new(5, 5),
        indexes: vec![IndexDefinition {
            index_name: DEPARTMENT_INDEX.to_string(),
            hash_key: ATTR_DEPARTMENT.to_string(),
            range_key: Some(ATTR_CREATED_AT.to_string()),
            projection: IndexProjection::All,
            capacity: Capacity::new(5, 5),
        }],
    }
}
