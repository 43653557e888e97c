//! Tidy-data transforms for country/year tables.
//!
//! The pipeline stages, in the order a page runs them:
//!
//! 1. [`normalization`]: read raw cells as numbers, including `B`/`M`/`k`
//!    suffixed population values.
//! 2. [`reshape`]: wide (one column per year) to long `(country, year, value)`.
//! 3. [`join`]: inner join of long tables on `(country, year)`.
//! 4. [`filter`]: year slices, ranges, country selection, top-N, thinning.
//!
//! [`stats`] holds the summaries pages use for defaults and overlays.
//!
//! # Example
//!
//! ```ignore
//! use tidy_transform::{filter, join, reshape};
//!
//! let mortality = reshape::melt(&mortality_wide, "child_mortality")?;
//! let gdp = reshape::melt(&gdp_wide, "gdp_per_capita")?;
//! let joined = join::join_long(vec![mortality, gdp])?.into_table();
//! let slice = filter::year_equals(joined, 2020);
//! ```

pub mod filter;
pub mod join;
pub mod normalization;
pub mod reshape;
pub mod stats;

pub use filter::{Filter, apply_filters};
pub use join::{inner_join, join_long};
pub use normalization::{NormalizationReport, NumericMode, normalize_table, parse_suffixed};
pub use reshape::{MeltOptions, melt, melt_with};
pub use stats::{LinearFit, fit_metrics, linear_fit, year_bounds};
