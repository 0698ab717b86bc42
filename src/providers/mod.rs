//! Remote data sources.

pub mod geo;
