//! The report catalog: each submodule computes one family of report
//! tables from a loaded [`CovidDataset`](crate::dataset::CovidDataset),
//! and [`runner`] dispatches them by name.

pub mod audit;
pub mod cases;
pub mod global;
pub mod positivity;
pub mod rankings;
pub mod runner;
pub mod types;
pub mod utility;
pub mod vaccination;

pub use runner::{ALL, ReportKind, run_report};
pub use types::ReportOptions;
