pub mod dataset;
pub mod fetch;
pub mod filters;
pub mod output;
pub mod reports;
pub mod rolling;
pub mod stats;
