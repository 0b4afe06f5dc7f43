use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::config::SeedMode;
use crate::core::error::Result;
use crate::features::reports::models::{Department, ReportStatus};
use crate::modules::dynamodb::attribute_value as attr;
use crate::modules::dynamodb::{IndexCountQuery, TableStore};
use crate::shared::constants::{
    ATTR_DEPARTMENT, ATTR_STATUS, DEPARTMENT_INDEX, REPORT_TABLE, STATUS_INDEX,
};

/// Report counts per status, one entry per department in `Department::ALL` order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMatrix {
    pub departments: Vec<Department>,
    pub counts: BTreeMap<ReportStatus, Vec<usize>>,
}

impl StatusMatrix {
    pub fn count(&self, department: Department, status: ReportStatus) -> usize {
        let Some(position) = self.departments.iter().position(|d| *d == department) else {
            return 0;
        };
        self.counts
            .get(&status)
            .and_then(|row| row.get(position))
            .copied()
            .unwrap_or(0)
    }

    pub fn status_total(&self, status: ReportStatus) -> usize {
        self.counts
            .get(&status)
            .map(|row| row.iter().sum())
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().flatten().sum()
    }
}

impl std::fmt::Display for StatusMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<12}", "")?;
        for status in self.counts.keys() {
            write!(f, "{:>11}", status.as_str())?;
        }
        for department in &self.departments {
            write!(f, "\n{:<12}", department.as_str())?;
            for status in self.counts.keys() {
                write!(f, "{:>11}", self.count(*department, *status))?;
            }
        }
        write!(f, "\n{:<12}", "Total")?;
        for status in self.counts.keys() {
            write!(f, "{:>11}", self.status_total(*status))?;
        }
        Ok(())
    }
}

/// Counts reports per department and status through the layout's secondary index
pub struct StatsService {
    store: Arc<dyn TableStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    pub async fn status_matrix(&self, layout: SeedMode) -> Result<StatusMatrix> {
        let departments = Department::ALL.to_vec();
        let mut counts = BTreeMap::new();

        for status in ReportStatus::ALL {
            let mut row = Vec::with_capacity(departments.len());
            for department in &departments {
                let query = Self::count_query(layout, *department, status);
                row.push(self.store.query_count(&query).await?);
            }
            counts.insert(status, row);
        }

        Ok(StatusMatrix {
            departments,
            counts,
        })
    }

    /// Staged layout keys `StatusIndex` on status and filters on department;
    /// unified layout keys `DepartmentIndex` on department and filters on status.
    fn count_query(layout: SeedMode, department: Department, status: ReportStatus) -> IndexCountQuery {
        let status_value = attr::s(status.as_str());
        let department_value = attr::s(department.as_str());

        match layout {
            SeedMode::Staged => IndexCountQuery {
                table_name: REPORT_TABLE.to_string(),
                index_name: STATUS_INDEX.to_string(),
                key_attribute: ATTR_STATUS.to_string(),
                key_value: status_value,
                filter: Some((ATTR_DEPARTMENT.to_string(), department_value)),
            },
            SeedMode::Unified => IndexCountQuery {
                table_name: REPORT_TABLE.to_string(),
                index_name: DEPARTMENT_INDEX.to_string(),
                key_attribute: ATTR_DEPARTMENT.to_string(),
                key_value: department_value,
                filter: Some((ATTR_STATUS.to_string(), status_value)),
            },
        }
    }
}
