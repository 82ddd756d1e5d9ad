//! The null-audit report: missing-value counts for both tables.

use crate::dataset::CovidDataset;
use crate::stats::{CaseTableAudit, ColumnAudit, VaxTableAudit};

/// One row per `(table, column)` pair with the missing-value share, case
/// table first.
pub fn null_audit(dataset: &CovidDataset) -> Vec<ColumnAudit> {
    let mut rows = CaseTableAudit::from_rows(&dataset.cases).column_rows();
    rows.extend(VaxTableAudit::from_rows(&dataset.vaccinations).column_rows());
    rows
}
