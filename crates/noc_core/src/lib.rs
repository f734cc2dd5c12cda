//! Availability and downtime engine for the NOC incident log.
//!
//! Pipeline: [`normalize`] turns records into outage intervals, [`window`] clips them to the
//! reporting window, [`aggregate`] sums minutes per entity and cause, [`availability`] turns
//! minutes into percentages and [`report`] shapes the results. Every entry point is a pure
//! function of its inputs.

pub mod aggregate;
pub mod analytics;
pub mod availability;
pub mod demo;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod normalize;
pub mod report;
pub mod sector;
pub mod universe;
pub mod validate;
pub mod window;
