// =============================================================================
// TABLE NAMES
// =============================================================================

/// Primary report table (both layouts)
pub const REPORT_TABLE: &str = "Report";

/// Stage tables of the staged layout
pub const REPORT_ACK_TABLE: &str = "ReportAck";
pub const REPORT_PROCESSING_TABLE: &str = "ReportProcessing";
pub const REPORT_DONE_TABLE: &str = "ReportDone";

// =============================================================================
// INDEX NAMES
// =============================================================================

/// GSI on `status` (staged layout)
pub const STATUS_INDEX: &str = "StatusIndex";

/// GSI on `department` + `createdAt` (unified layout)
pub const DEPARTMENT_INDEX: &str = "DepartmentIndex";

// =============================================================================
// ATTRIBUTE NAMES
// =============================================================================

pub const ATTR_REPORT_ID: &str = "report_id";
pub const ATTR_STATUS: &str = "status";
pub const ATTR_DEPARTMENT: &str = "department";
pub const ATTR_CREATED_AT: &str = "createdAt";
