//! Page pipelines.
//!
//! Each page loads its tables from the catalog, reshapes them to long form,
//! joins on `(country, year)` and applies a fixed filter chain. The result is
//! a [`PageOutput`] ready for the summary table or an export.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use anyhow::{Context, Result, bail};
use tidy_ingest::load_wide_table;
use tidy_model::{COUNTRY_COLUMN, JoinedTable, LongTable};
use tidy_transform::stats::latest_year;
use tidy_transform::{
    Filter, MeltOptions, apply_filters, fit_metrics, join_long, melt_with, normalize_table,
};
use tracing::{info, info_span};

use crate::catalog::{DatasetCatalog, DatasetId};
use crate::types::{ChartData, ChartHints, ChartKind, PageOutput};

/// Latest year any page selects by default.
pub const DEFAULT_MAX_YEAR: i32 = 2024;

pub const DEFAULT_TREND_COUNTRIES: [&str; 7] = [
    "Argentina",
    "Australia",
    "China",
    "India",
    "South Africa",
    "UK",
    "USA",
];

const YEAR: &str = "year";

/// Load one catalog table and reshape it to long form.
pub fn load_long(
    catalog: &DatasetCatalog,
    id: DatasetId,
    years: Option<RangeInclusive<i32>>,
) -> Result<LongTable> {
    let spec = catalog.get(id);
    let wide = load_wide_table(&spec.source(), id.as_str(), &spec.load_options())
        .with_context(|| format!("load {id} from {}", spec.source))?;
    let (wide, report) = normalize_table(wide, spec.numeric);
    info!(
        table = %id,
        parsed = report.parsed,
        missing = report.missing,
        failed = report.failures.len(),
        "normalized table"
    );

    let mut options = MeltOptions::default();
    if let Some(years) = years {
        options = options.with_years(years);
    }
    melt_with(&wide, &spec.metric, &options).with_context(|| format!("reshape {id}"))
}

fn resolve_year(requested: Option<i32>, table: &JoinedTable, cap: i32) -> Option<i32> {
    requested.or_else(|| latest_year(table, Some(cap)))
}

fn year_slice(table: JoinedTable, year: Option<i32>) -> Result<JoinedTable> {
    Ok(match year {
        Some(year) => apply_filters(table, &[Filter::YearEquals(year)])?,
        None => JoinedTable {
            metrics: table.metrics,
            records: Vec::new(),
        },
    })
}

/// Options of the `map` page.
#[derive(Debug, Clone, Default)]
pub struct MapRequest {
    pub year: Option<i32>,
}

/// Child mortality for every country in one year.
pub fn map_page(catalog: &DatasetCatalog, request: &MapRequest) -> Result<PageOutput> {
    let _span = info_span!("page", page = "map").entered();
    let mortality = JoinedTable::from(load_long(catalog, DatasetId::ChildMortality, None)?);
    let metric = catalog.child_mortality.metric.clone();

    let year = resolve_year(request.year, &mortality, DEFAULT_MAX_YEAR);
    let slice = year_slice(mortality, year)?;
    let chart = ChartHints::new(
        ChartKind::Choropleth,
        "Child mortality",
        COUNTRY_COLUMN,
        &[metric.as_str()],
    );

    Ok(PageOutput {
        page: "map",
        title: "Child mortality by country".to_string(),
        year,
        datasets: vec![ChartData::new("mortality", chart, slice)],
    })
}

/// Options of the `trends` page.
#[derive(Debug, Clone)]
pub struct TrendsRequest {
    pub countries: BTreeSet<String>,
    pub from: i32,
    pub to: i32,
}

impl Default for TrendsRequest {
    fn default() -> Self {
        Self {
            countries: DEFAULT_TREND_COUNTRIES
                .iter()
                .map(|country| (*country).to_string())
                .collect(),
            from: 1900,
            to: DEFAULT_MAX_YEAR,
        }
    }
}

/// Mortality and life expectancy over time for a set of countries.
pub fn trends_page(catalog: &DatasetCatalog, request: &TrendsRequest) -> Result<PageOutput> {
    let _span = info_span!("page", page = "trends").entered();
    if request.from > request.to {
        bail!("--from {} is after --to {}", request.from, request.to);
    }
    let years = request.from..=request.to;
    let filters = [Filter::Countries(request.countries.clone())];

    let mortality = apply_filters(
        load_long(catalog, DatasetId::ChildMortality, Some(years.clone()))?,
        &filters,
    )?;
    let expectancy = apply_filters(
        load_long(catalog, DatasetId::LifeExpectancy, Some(years))?,
        &filters,
    )?;
    let (mortality_metric, expectancy_metric) =
        (mortality.metric.clone(), expectancy.metric.clone());

    let joined = join_long(vec![mortality.clone(), expectancy.clone()])?;

    let datasets = vec![
        ChartData::new(
            "mortality",
            ChartHints::new(
                ChartKind::Line,
                "Child mortality over time",
                YEAR,
                &[mortality_metric.as_str()],
            )
            .with_color(COUNTRY_COLUMN),
            mortality.into(),
        ),
        ChartData::new(
            "life_expectancy",
            ChartHints::new(
                ChartKind::Line,
                "Life expectancy over time",
                YEAR,
                &[expectancy_metric.as_str()],
            )
            .with_color(COUNTRY_COLUMN),
            expectancy.into(),
        ),
        ChartData::from_outcome(
            "joined",
            ChartHints::new(
                ChartKind::Scatter,
                "Child mortality vs life expectancy",
                &mortality_metric,
                &[expectancy_metric.as_str()],
            )
            .with_color(COUNTRY_COLUMN),
            joined,
        ),
    ];

    Ok(PageOutput {
        page: "trends",
        title: format!("Trends {}-{}", request.from, request.to),
        year: None,
        datasets,
    })
}

/// Options of the `population` page.
#[derive(Debug, Clone)]
pub struct PopulationRequest {
    pub country: String,
    pub every: u32,
}

impl Default for PopulationRequest {
    fn default() -> Self {
        Self {
            country: "India".to_string(),
            every: 20,
        }
    }
}

/// Mortality against population for one country, thinned to every k-th year.
pub fn population_page(
    catalog: &DatasetCatalog,
    request: &PopulationRequest,
) -> Result<PageOutput> {
    let _span =
        info_span!("page", page = "population", country = %request.country).entered();
    let selected = Filter::Countries(BTreeSet::from([request.country.clone()]));

    let mortality = apply_filters(
        load_long(catalog, DatasetId::ChildMortality, None)?,
        std::slice::from_ref(&selected),
    )?;
    let population = apply_filters(
        load_long(catalog, DatasetId::Population, None)?,
        std::slice::from_ref(&selected),
    )?;
    let metrics = [mortality.metric.clone(), population.metric.clone()];

    let joined = join_long(vec![mortality, population])?.into_table();
    let thinned = apply_filters(joined, &[Filter::YearMultipleOf(request.every)])?;

    let chart = ChartHints::new(
        ChartKind::DualAxisLine,
        format!("Child mortality and population, {}", request.country),
        YEAR,
        &[metrics[0].as_str(), metrics[1].as_str()],
    );
    Ok(PageOutput {
        page: "population",
        title: format!("{} every {} years", request.country, request.every),
        year: None,
        datasets: vec![ChartData::new("mortality_population", chart, thinned)],
    })
}

/// Options of the `gdp` page.
#[derive(Debug, Clone)]
pub struct GdpRequest {
    pub year: Option<i32>,
    pub top: usize,
    pub exclude: BTreeSet<String>,
}

impl Default for GdpRequest {
    fn default() -> Self {
        Self {
            year: None,
            top: 30,
            exclude: BTreeSet::new(),
        }
    }
}

/// The richest countries of one year with a mortality-on-GDP regression.
pub fn gdp_page(catalog: &DatasetCatalog, request: &GdpRequest) -> Result<PageOutput> {
    let _span = info_span!("page", page = "gdp").entered();
    let mortality = load_long(catalog, DatasetId::ChildMortality, None)?;
    let gdp = load_long(catalog, DatasetId::GdpPerCapita, None)?;
    let (mortality_metric, gdp_metric) = (mortality.metric.clone(), gdp.metric.clone());

    let mut filters = vec![Filter::DropMissing];
    if !request.exclude.is_empty() {
        filters.push(Filter::ExcludeCountries(request.exclude.clone()));
    }
    let joined = apply_filters(join_long(vec![mortality, gdp])?.into_table(), &filters)?;

    let year = resolve_year(request.year, &joined, DEFAULT_MAX_YEAR);
    let top = match year {
        Some(year) => apply_filters(
            joined,
            &[
                Filter::YearEquals(year),
                Filter::TopN {
                    n: request.top,
                    metric: gdp_metric.clone(),
                },
            ],
        )?,
        None => year_slice(joined, None)?,
    };
    let fit = fit_metrics(&top, &gdp_metric, &mortality_metric)?;

    let chart = ChartHints::new(
        ChartKind::Scatter,
        "Child mortality vs GDP per capita",
        &gdp_metric,
        &[mortality_metric.as_str()],
    )
    .with_color(COUNTRY_COLUMN)
    .with_regression();
    Ok(PageOutput {
        page: "gdp",
        title: format!("Top {} countries by {gdp_metric}", request.top),
        year,
        datasets: vec![ChartData::new("gdp", chart, top).with_regression(fit)],
    })
}

/// Options of the `income` page.
#[derive(Debug, Clone)]
pub struct IncomeRequest {
    pub year: Option<i32>,
    pub max_year: i32,
    pub exclude: BTreeSet<String>,
}

impl Default for IncomeRequest {
    fn default() -> Self {
        Self {
            year: None,
            max_year: DEFAULT_MAX_YEAR,
            exclude: BTreeSet::new(),
        }
    }
}

/// Mortality against daily income for one year.
pub fn income_page(catalog: &DatasetCatalog, request: &IncomeRequest) -> Result<PageOutput> {
    let _span = info_span!("page", page = "income").entered();
    if let Some(year) = request.year {
        if year > request.max_year {
            bail!("--year {year} is after --max-year {}", request.max_year);
        }
    }
    let income = load_long(catalog, DatasetId::Income, None)?;
    let mortality = load_long(catalog, DatasetId::ChildMortality, None)?;
    let (income_metric, mortality_metric) = (income.metric.clone(), mortality.metric.clone());

    let mut filters = vec![
        Filter::DropMissing,
        Filter::YearRange {
            lo: i32::MIN,
            hi: request.max_year,
        },
    ];
    if !request.exclude.is_empty() {
        filters.push(Filter::ExcludeCountries(request.exclude.clone()));
    }
    let joined = apply_filters(join_long(vec![income, mortality])?.into_table(), &filters)?;

    let year = resolve_year(request.year, &joined, request.max_year);
    let slice = year_slice(joined, year)?;

    let chart = ChartHints::new(
        ChartKind::Scatter,
        "Child mortality vs daily income",
        &income_metric,
        &[mortality_metric.as_str()],
    )
    .with_color(COUNTRY_COLUMN)
    .with_log_x();
    Ok(PageOutput {
        page: "income",
        title: "Child mortality vs income".to_string(),
        year,
        datasets: vec![ChartData::new("income", chart, slice)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_model::JoinedRecord;

    fn table(years: &[i32]) -> JoinedTable {
        JoinedTable {
            metrics: vec!["v".to_string()],
            records: years
                .iter()
                .map(|year| JoinedRecord {
                    country: "Chad".to_string(),
                    year: *year,
                    values: vec![Some(1.0)],
                })
                .collect(),
        }
    }

    #[test]
    fn test_load_long_parses_cells_once_per_mode() {
        let dir = tempfile::tempdir().unwrap();
        let pop = dir.path().join("pop.csv");
        let gdp = dir.path().join("gdp.csv");
        std::fs::write(&pop, "country,2000,2020\nChad,8.5M,oops\n").unwrap();
        std::fs::write(&gdp, "country,2000,2020\nChad,1010,3k\n").unwrap();
        let mut catalog = DatasetCatalog::default();
        catalog.population.source = pop.display().to_string();
        catalog.gdp_per_capita.source = gdp.display().to_string();

        let population = load_long(&catalog, DatasetId::Population, None).unwrap();
        let values: Vec<_> = population.records.iter().map(|r| r.value).collect();
        assert_eq!(values, [Some(8_500_000.0), None]);

        let gdp = load_long(&catalog, DatasetId::GdpPerCapita, Some(2020..=2020)).unwrap();
        let values: Vec<_> = gdp.records.iter().map(|r| r.value).collect();
        assert_eq!(values, [None]);
    }

    #[test]
    fn test_resolve_year_prefers_request() {
        assert_eq!(resolve_year(Some(1990), &table(&[2000]), 2024), Some(1990));
    }

    #[test]
    fn test_resolve_year_caps_latest() {
        assert_eq!(resolve_year(None, &table(&[2000, 2024, 2100]), 2024), Some(2024));
        assert_eq!(resolve_year(None, &table(&[2100]), 2024), None);
    }

    #[test]
    fn test_year_slice_without_year_is_empty() {
        let slice = year_slice(table(&[2000]), None).unwrap();
        assert!(slice.records.is_empty());
        assert_eq!(slice.metrics, ["v"]);
    }

    #[test]
    fn test_default_trends_request() {
        let request = TrendsRequest::default();
        assert_eq!(request.countries.len(), 7);
        assert!(request.countries.contains("South Africa"));
        assert_eq!((request.from, request.to), (1900, 2024));
    }
}
