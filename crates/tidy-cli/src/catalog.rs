//! Dataset catalog: where each page's tables come from.
//!
//! The built-in catalog points at the public Gapminder extracts. A TOML file
//! passed with `--catalog` replaces individual entries:
//!
//! ```toml
//! [population]
//! source = "data/pop.csv"
//! metric = "population"
//! numeric = "suffixed"
//! ```
//!
//! Relative paths of the entries a catalog file sets are resolved against
//! the file's directory. Built-in entries it omits are left as they are.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tidy_ingest::{LoadOptions, Source};
use tidy_transform::NumericMode;

const BASE_URL: &str = "https://huggingface.co/spaces/jiyachachan/fp2/resolve/main";

/// The tables the pages know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DatasetId {
    ChildMortality,
    LifeExpectancy,
    Population,
    GdpPerCapita,
    Income,
}

impl DatasetId {
    pub const ALL: [Self; 5] = [
        Self::ChildMortality,
        Self::LifeExpectancy,
        Self::Population,
        Self::GdpPerCapita,
        Self::Income,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChildMortality => "child_mortality",
            Self::LifeExpectancy => "life_expectancy",
            Self::Population => "population",
            Self::GdpPerCapita => "gdp_per_capita",
            Self::Income => "income",
        }
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Local path or `http(s)` URL of the wide CSV.
    pub source: String,
    /// Name given to the value column after reshaping.
    pub metric: String,
    /// How text cells are read.
    #[serde(default)]
    pub numeric: NumericMode,
    /// Keys dropped on load (e.g. `"undefined"`).
    #[serde(default)]
    pub placeholder_keys: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl DatasetSpec {
    fn remote(file: &str, metric: &str, description: &str) -> Self {
        Self {
            source: format!("{BASE_URL}/{file}"),
            metric: metric.to_string(),
            numeric: NumericMode::Plain,
            placeholder_keys: Vec::new(),
            description: description.to_string(),
        }
    }

    pub fn source(&self) -> Source {
        Source::parse(&self.source)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default().with_placeholder_keys(self.placeholder_keys.iter().cloned())
    }
}

/// All datasets used by the pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetCatalog {
    pub child_mortality: DatasetSpec,
    pub life_expectancy: DatasetSpec,
    pub population: DatasetSpec,
    pub gdp_per_capita: DatasetSpec,
    pub income: DatasetSpec,
}

impl Default for DatasetCatalog {
    fn default() -> Self {
        let mut gdp_per_capita = DatasetSpec::remote(
            "gdp_pcap.csv",
            "gdp_per_capita",
            "GDP per capita, constant 2017 international dollars",
        );
        gdp_per_capita.placeholder_keys = vec!["undefined".to_string()];

        Self {
            child_mortality: DatasetSpec::remote(
                "child_mortality_0_5_year_olds_dying_per_1000_born.csv",
                "child_mortality",
                "Deaths of children under five per 1,000 live births",
            ),
            life_expectancy: DatasetSpec::remote(
                "life_expectancy.csv",
                "life_expectancy",
                "Life expectancy at birth, years",
            ),
            population: DatasetSpec {
                source: "pop.csv".to_string(),
                metric: "population".to_string(),
                numeric: NumericMode::Suffixed,
                placeholder_keys: Vec::new(),
                description: "Total population, B/M/k abbreviated".to_string(),
            },
            gdp_per_capita,
            income: DatasetSpec::remote(
                "mincpcap_cppp.csv",
                "income",
                "Mean daily household income per capita, USD",
            ),
        }
    }
}

impl DatasetCatalog {
    pub fn get(&self, id: DatasetId) -> &DatasetSpec {
        match id {
            DatasetId::ChildMortality => &self.child_mortality,
            DatasetId::LifeExpectancy => &self.life_expectancy,
            DatasetId::Population => &self.population,
            DatasetId::GdpPerCapita => &self.gdp_per_capita,
            DatasetId::Income => &self.income,
        }
    }

    fn get_mut(&mut self, id: DatasetId) -> &mut DatasetSpec {
        match id {
            DatasetId::ChildMortality => &mut self.child_mortality,
            DatasetId::LifeExpectancy => &mut self.life_expectancy,
            DatasetId::Population => &mut self.population,
            DatasetId::GdpPerCapita => &mut self.gdp_per_capita,
            DatasetId::Income => &mut self.income,
        }
    }

    /// Parse a catalog, filling omitted entries with the built-in defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse dataset catalog")
    }

    /// Load a catalog file, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read dataset catalog {}", path.display()))?;
        let mut catalog = Self::from_toml_str(&content)
            .with_context(|| format!("in {}", path.display()))?;
        // Built-in entries keep resolving against the working directory.
        let entries: toml::Table = toml::from_str(&content)
            .with_context(|| format!("parse dataset catalog {}", path.display()))?;
        let overridden: Vec<DatasetId> = DatasetId::ALL
            .into_iter()
            .filter(|id| entries.contains_key(id.as_str()))
            .collect();
        if let Some(base) = path.parent() {
            catalog.resolve_relative(base, &overridden);
        }
        tracing::info!(path = %path.display(), "loaded dataset catalog");
        Ok(catalog)
    }

    /// Rebase the relative local sources of `ids` onto `base`.
    pub fn resolve_relative(&mut self, base: &Path, ids: &[DatasetId]) {
        for &id in ids {
            let spec = self.get_mut(id);
            if let Source::Path(path) = spec.source() {
                if path.is_relative() {
                    spec.source = base.join(path).display().to_string();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = DatasetCatalog::default();
        assert!(catalog.child_mortality.source().is_remote());
        assert_eq!(catalog.population.numeric, NumericMode::Suffixed);
        assert_eq!(catalog.gdp_per_capita.placeholder_keys, vec!["undefined"]);
        assert_eq!(catalog.get(DatasetId::Income).metric, "income");
    }

    #[test]
    fn test_partial_override() {
        let catalog = DatasetCatalog::from_toml_str(
            r#"
            [population]
            source = "data/pop.csv"
            metric = "pop"
            numeric = "suffixed"
            "#,
        )
        .unwrap();

        assert_eq!(catalog.population.source, "data/pop.csv");
        assert_eq!(catalog.population.metric, "pop");
        assert_eq!(catalog.population.numeric, NumericMode::Suffixed);
        assert_eq!(catalog.income, DatasetCatalog::default().income);
    }

    #[test]
    fn test_invalid_numeric_mode() {
        let result = DatasetCatalog::from_toml_str(
            r#"
            [income]
            source = "income.csv"
            metric = "income"
            numeric = "roman"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_relative_keeps_urls() {
        let mut catalog = DatasetCatalog::default();
        catalog.resolve_relative(Path::new("/data"), &DatasetId::ALL);

        assert_eq!(
            catalog.population.source(),
            Source::Path(Path::new("/data").join("pop.csv"))
        );
        assert!(catalog.income.source().is_remote());
    }

    #[test]
    fn test_load_rebases_only_file_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(
            &path,
            r#"
            [income]
            source = "income.csv"
            metric = "income"
            "#,
        )
        .unwrap();

        let catalog = DatasetCatalog::load(&path).unwrap();
        assert_eq!(
            catalog.income.source(),
            Source::Path(dir.path().join("income.csv"))
        );
        assert_eq!(catalog.population.source, "pop.csv");
        assert_eq!(catalog.child_mortality, DatasetCatalog::default().child_mortality);
    }

    #[test]
    fn test_default_catalog_serializable() {
        let catalog = DatasetCatalog::default();
        let toml_str = toml::to_string_pretty(&catalog).unwrap();
        let parsed = DatasetCatalog::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, catalog);
    }
}
