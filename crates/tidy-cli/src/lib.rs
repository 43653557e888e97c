//! Observatory pages over Gapminder-style country/year tables.
//!
//! Each page is a fixed pipeline: load the catalog's tables, normalize and
//! melt them, join on `(country, year)` and filter. The binary prints the
//! result as a table or exports it.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod export;
pub mod logging;
pub mod pages;
pub mod summary;
pub mod types;
