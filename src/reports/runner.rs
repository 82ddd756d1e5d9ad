//! Report catalog and dispatch.
//!
//! Every report is addressable by a stable kebab-case name so the CLI
//! can run one by name or iterate the whole catalog.

use anyhow::{Context, Result};
use tracing::info;

use std::path::Path;

use crate::dataset::CovidDataset;
use crate::output::{self, OutputFormat};
use crate::reports::types::ReportOptions;
use crate::reports::{audit, cases, global, positivity, rankings, vaccination};

/// One entry in the report catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Preview,
    DeathRate,
    InfectionRate,
    RollingCases,
    InfectionRanking,
    DeathRanking,
    ContinentDeaths,
    GlobalDaily,
    GlobalTotals,
    VaccinationRollout,
    VaccinationCoverage,
    Positivity,
    NullAudit,
}

/// Catalog order is the order `run-all` executes and `list-reports`
/// prints.
pub const ALL: [ReportKind; 13] = [
    ReportKind::Preview,
    ReportKind::DeathRate,
    ReportKind::InfectionRate,
    ReportKind::RollingCases,
    ReportKind::InfectionRanking,
    ReportKind::DeathRanking,
    ReportKind::ContinentDeaths,
    ReportKind::GlobalDaily,
    ReportKind::GlobalTotals,
    ReportKind::VaccinationRollout,
    ReportKind::VaccinationCoverage,
    ReportKind::Positivity,
    ReportKind::NullAudit,
];

impl ReportKind {
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::Preview => "preview",
            ReportKind::DeathRate => "death-rate",
            ReportKind::InfectionRate => "infection-rate",
            ReportKind::RollingCases => "rolling-cases",
            ReportKind::InfectionRanking => "infection-ranking",
            ReportKind::DeathRanking => "death-ranking",
            ReportKind::ContinentDeaths => "continent-deaths",
            ReportKind::GlobalDaily => "global-daily",
            ReportKind::GlobalTotals => "global-totals",
            ReportKind::VaccinationRollout => "vaccination-rollout",
            ReportKind::VaccinationCoverage => "vaccination-coverage",
            ReportKind::Positivity => "positivity",
            ReportKind::NullAudit => "null-audit",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ReportKind::Preview => "First rows of the case table, ordered by location and date",
            ReportKind::DeathRate => "Daily deaths as a share of reported cases per country",
            ReportKind::InfectionRate => "Daily cases as a share of population, countries and aggregates",
            ReportKind::RollingCases => "Trailing-window sum and average of new cases per country",
            ReportKind::InfectionRanking => "Countries ranked by peak infection share of population",
            ReportKind::DeathRanking => "Countries ranked by total death count",
            ReportKind::ContinentDeaths => "Continent-level aggregates ranked by total death count",
            ReportKind::GlobalDaily => "Worldwide daily case and death totals with death share",
            ReportKind::GlobalTotals => "Single worldwide summary over the whole date range",
            ReportKind::VaccinationRollout => "Running vaccination totals per country against population",
            ReportKind::VaccinationCoverage => "Peak vaccination coverage per country",
            ReportKind::Positivity => "Trailing-window share of tests coming back positive",
            ReportKind::NullAudit => "Missing-value counts for every audited column",
        }
    }

    /// Looks a report up by its catalog name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Runs one report against an already loaded dataset and writes it to
/// `path`. Returns the number of rows written.
pub fn run_report(
    kind: ReportKind,
    dataset: &CovidDataset,
    opts: &ReportOptions,
    path: &Path,
    format: OutputFormat,
) -> Result<usize> {
    let location = opts.location.as_deref();

    let rows = match kind {
        ReportKind::Preview => {
            let rows = cases::preview(dataset, opts.limit);
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::DeathRate => {
            let rows = cases::death_rate(dataset, location);
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::InfectionRate => {
            let rows = cases::infection_rate(dataset, location);
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::RollingCases => {
            let rows = cases::rolling_cases(dataset, opts.window)
                .context("rolling cases aggregation failed")?;
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::InfectionRanking => {
            let rows = rankings::infection_ranking(dataset, opts.limit);
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::DeathRanking => {
            let rows = rankings::death_ranking(dataset, opts.limit);
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::ContinentDeaths => {
            let rows = rankings::continent_deaths(dataset);
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::GlobalDaily => {
            let rows = global::global_daily(dataset);
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::GlobalTotals => {
            let rows = vec![global::global_totals(dataset)];
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::VaccinationRollout => {
            let rows = vaccination::vaccination_rollout(dataset);
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::VaccinationCoverage => {
            let rows = vaccination::vaccination_coverage(dataset);
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::Positivity => {
            let rows = positivity::positivity(dataset, opts.window, location)
                .context("positivity aggregation failed")?;
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
        ReportKind::NullAudit => {
            let rows = audit::null_audit(dataset);
            output::write_rows(path, format, &rows)?;
            rows.len()
        }
    };

    info!(
        report = kind.name(),
        rows,
        path = %path.display(),
        "Report written"
    );

    Ok(rows)
}
